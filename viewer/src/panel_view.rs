use crate::Message;
use eclipsecore::panel::{PanelFields, PanelImage};
use eclipsecore::InteractionMode;
use iced::{
    mouse,
    widget::{
        canvas::{self, Canvas, Frame, Geometry, Path},
        button, column, container, mouse_area, row, text, tooltip, Column,
    },
    Color, Element, Length, Point, Rectangle, Renderer, Theme,
};

/// Attribute panel clipped to the slide offset. `visible` is the width
/// currently on screen, out of `width`.
pub fn info_panel<'a>(fields: &'a PanelFields, width: f32, visible: f32) -> Element<'a, Message> {
    let rows = fields
        .rows()
        .into_iter()
        .fold(Column::new().spacing(6), |col, (field, value)| {
            let label = tooltip(
                text(field.label()).size(12),
                container(text(field.help()).size(12))
                    .padding(8)
                    .max_width(260.0)
                    .style(container::rounded_box),
                tooltip::Position::Left,
            );
            col.push(column![label, text(value).size(15)].spacing(1))
        });

    let content = column![
        Canvas::new(EclipseGlyph {
            image: fields.image
        })
        .width(Length::Fixed(width - 24.0))
        .height(Length::Fixed(72.0)),
        text(&fields.type_label).size(18),
        rows,
    ]
    .spacing(10)
    .padding(12)
    .width(Length::Fixed(width));

    let panel = container(content)
        .width(Length::Fixed(visible.max(0.0)))
        .height(Length::Fill)
        .clip(true)
        .style(container::rounded_box);

    // A non-`None` interaction keeps the map below from seeing the cursor.
    mouse_area(panel)
        .interaction(mouse::Interaction::Idle)
        .on_enter(Message::PanelEntered)
        .on_exit(Message::PanelLeft)
        .into()
}

pub fn tutorial<'a>(mode: InteractionMode) -> Element<'a, Message> {
    let steps = match mode {
        InteractionMode::Click => [
            "Click anywhere on the map to list the eclipse paths crossing that spot.",
            "Click a path to open its details; click the background to close them.",
        ],
        InteractionMode::Hover => [
            "Every known eclipse path is drawn on the map.",
            "Rest the pointer on a path to open its details; they close after a few idle seconds.",
        ],
    };
    let content = column![
        text("How to use").size(22),
        text(steps[0]).size(14),
        text(steps[1]).size(14),
        text("Teal paths have already happened; orange paths are still to come.").size(14),
        text("Hover a field name in the panel for an explanation. Scroll to zoom.").size(14),
        row![button("Got it").on_press(Message::ToggleTutorial)],
    ]
    .spacing(10)
    .padding(20)
    .max_width(460.0);

    mouse_area(content)
        .interaction(mouse::Interaction::Idle)
        .into()
}

/// Stand-in for the eclipse photograph: a corona ring or a dark disc.
struct EclipseGlyph {
    image: PanelImage,
}

impl canvas::Program<Message> for EclipseGlyph {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(Point::ORIGIN, bounds.size(), Color::from_rgb(0.02, 0.02, 0.05));

        let center = Point::new(bounds.width / 2.0, bounds.height / 2.0);
        let radius = bounds.height.min(bounds.width) / 2.0 - 8.0;
        let corona = Color::from_rgb(1.0, 0.86, 0.45);
        match self.image {
            PanelImage::Annular => {
                frame.fill(&Path::circle(center, radius), corona);
                frame.fill(
                    &Path::circle(center, radius * 0.88),
                    Color::from_rgb(0.02, 0.02, 0.05),
                );
            }
            PanelImage::Total => {
                frame.fill(
                    &Path::circle(center, radius + 4.0),
                    Color { a: 0.35, ..corona },
                );
                frame.fill(&Path::circle(center, radius), Color::BLACK);
            }
        }

        vec![frame.into_geometry()]
    }
}
