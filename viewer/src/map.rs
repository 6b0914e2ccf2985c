use crate::Message;
use eclipsecore::geometry::{MapPoint, Viewport};
use eclipsecore::selection::{Palette, RenderedShape, ShapeColor};
use iced::{
    mouse,
    widget::canvas::{
        self, fill, gradient, Action, Fill, Frame, Geometry, Gradient, Path, Stroke, Style,
    },
    Color, Point, Rectangle, Renderer, Theme,
};

const GRATICULE_STEP: i32 = 30;
const WHEEL_ZOOM_STEP: f64 = 0.5;

/// Fill colours resolved from the configured palette.
#[derive(Debug, Clone, Copy)]
pub struct ShapeColors {
    past: Color,
    future: Color,
    highlight: Color,
}

impl ShapeColors {
    pub fn from_palette(palette: &Palette) -> eclipsecore::ViewerResult<Self> {
        let resolve = |color| {
            palette
                .rgb(color)
                .map(|rgb| Color::from_rgb8(rgb.r, rgb.g, rgb.b))
        };
        Ok(Self {
            past: resolve(ShapeColor::Past)?,
            future: resolve(ShapeColor::Future)?,
            highlight: resolve(ShapeColor::Highlight)?,
        })
    }

    fn color(&self, color: ShapeColor) -> Color {
        match color {
            ShapeColor::Past => self.past,
            ShapeColor::Future => self.future,
            ShapeColor::Highlight => self.highlight,
        }
    }
}

/// Horizontal fade across a path: clear at both edges, solid at the middle.
/// Inner rings stay unfilled, matching the even-odd hit test.
fn shape_fill(color: Color, left: f32, right: f32, y: f32) -> Fill {
    let clear = Color { a: 0.0, ..color };
    let fade = gradient::Linear::new(Point::new(left, y), Point::new(right, y))
        .add_stop(0.0, clear)
        .add_stop(0.5, color)
        .add_stop(1.0, clear);
    Fill {
        style: Style::Gradient(Gradient::Linear(fade)),
        rule: fill::Rule::EvenOdd,
    }
}

/// Gray basemap with the eclipse paths and the pushpin on top.
pub struct EclipseMap<'a> {
    pub shapes: &'a [RenderedShape],
    pub viewport: Viewport,
    pub pushpin: Option<MapPoint>,
    pub colors: ShapeColors,
}

#[derive(Default)]
pub struct MapState {
    cursor_inside: bool,
}

impl EclipseMap<'_> {
    fn viewport_for(&self, bounds: Rectangle) -> Viewport {
        self.viewport
            .with_size(bounds.width as f64, bounds.height as f64)
    }

    fn draw_graticule(&self, frame: &mut Frame, viewport: &Viewport) {
        let line = |frame: &mut Frame, from: MapPoint, to: MapPoint, color: Color| {
            let (x0, y0) = viewport.project(from);
            let (x1, y1) = viewport.project(to);
            let path = Path::line(
                Point::new(x0 as f32, y0 as f32),
                Point::new(x1 as f32, y1 as f32),
            );
            frame.stroke(&path, Stroke::default().with_width(1.0).with_color(color));
        };
        let grid = Color::from_rgb(0.74, 0.74, 0.76);
        for lon in (-180..=180).step_by(GRATICULE_STEP as usize) {
            let lon = lon as f64;
            line(frame, MapPoint::new(lon, -90.0), MapPoint::new(lon, 90.0), grid);
        }
        for lat in (-90..=90).step_by(GRATICULE_STEP as usize) {
            let color = if lat == 0 {
                Color::from_rgb(0.6, 0.6, 0.64)
            } else {
                grid
            };
            let lat = lat as f64;
            line(frame, MapPoint::new(-180.0, lat), MapPoint::new(180.0, lat), color);
        }
    }

    fn draw_shape(&self, frame: &mut Frame, viewport: &Viewport, shape: &RenderedShape) {
        let path = Path::new(|builder| {
            for ring in &shape.feature.geometry.rings {
                for (i, &[lon, lat]) in ring.iter().enumerate() {
                    let (x, y) = viewport.project(MapPoint::new(lon, lat));
                    let point = Point::new(x as f32, y as f32);
                    if i == 0 {
                        builder.move_to(point);
                    } else {
                        builder.line_to(point);
                    }
                }
                builder.close();
            }
        });
        let Some(extent) = shape.feature.geometry.bounds() else {
            return;
        };
        let (left, top) = viewport.project(MapPoint::new(extent.min.lon, extent.max.lat));
        let (right, bottom) = viewport.project(MapPoint::new(extent.max.lon, extent.min.lat));
        let color = Color {
            a: shape.style.opacity,
            ..self.colors.color(shape.style.color)
        };
        frame.fill(
            &path,
            shape_fill(color, left as f32, right as f32, ((top + bottom) / 2.0) as f32),
        );
    }

    fn draw_pushpin(&self, frame: &mut Frame, viewport: &Viewport, point: MapPoint) {
        let (x, y) = viewport.project(point);
        let tip = Point::new(x as f32, y as f32);
        let head = Point::new(tip.x, tip.y - 14.0);
        frame.stroke(
            &Path::line(tip, head),
            Stroke::default()
                .with_width(2.0)
                .with_color(Color::from_rgb(0.3, 0.3, 0.3)),
        );
        frame.fill(
            &Path::circle(head, 6.0),
            Color::from_rgb(0.86, 0.16, 0.16),
        );
    }
}

impl canvas::Program<Message> for EclipseMap<'_> {
    type State = MapState;

    fn update(
        &self,
        state: &mut Self::State,
        event: &canvas::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<Action<Message>> {
        let viewport = self.viewport_for(bounds);
        let position = cursor.position_in(bounds);
        let canvas::Event::Mouse(mouse_event) = event else {
            return None;
        };

        match (mouse_event, position) {
            (mouse::Event::ButtonPressed(mouse::Button::Left), Some(position)) => {
                let point = viewport.unproject(position.x as f64, position.y as f64);
                Some(Action::publish(Message::MapPressed(point)).and_capture())
            }
            (mouse::Event::CursorMoved { .. }, Some(position)) => {
                state.cursor_inside = true;
                let point = viewport.unproject(position.x as f64, position.y as f64);
                Some(Action::publish(Message::MapHovered(point)))
            }
            (mouse::Event::CursorMoved { .. }, None) if state.cursor_inside => {
                state.cursor_inside = false;
                Some(Action::publish(Message::MapLeft))
            }
            (mouse::Event::WheelScrolled { delta }, Some(position)) => {
                let lines = match delta {
                    mouse::ScrollDelta::Lines { y, .. } => *y as f64,
                    mouse::ScrollDelta::Pixels { y, .. } => *y as f64 / 60.0,
                };
                if lines == 0.0 {
                    return None;
                }
                let mut zoomed = viewport;
                zoomed.zoom_at(
                    position.x as f64,
                    position.y as f64,
                    lines.signum() * WHEEL_ZOOM_STEP,
                );
                Some(Action::publish(Message::ViewportChanged(zoomed)).and_capture())
            }
            _ => None,
        }
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let viewport = self.viewport_for(bounds);
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            Color::from_rgb(0.84, 0.84, 0.85),
        );

        self.draw_graticule(&mut frame, &viewport);
        for shape in self.shapes {
            self.draw_shape(&mut frame, &viewport, shape);
        }
        if let Some(point) = self.pushpin {
            self.draw_pushpin(&mut frame, &viewport, point);
        }

        vec![frame.into_geometry()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_fade_towards_their_edges() {
        let orange = Color::from_rgb8(0xFF, 0x80, 0x00);
        let paint = shape_fill(orange, 10.0, 110.0, 40.0);
        assert_eq!(paint.rule, fill::Rule::EvenOdd);

        let Style::Gradient(Gradient::Linear(fade)) = paint.style else {
            panic!("path fill should be a linear gradient");
        };
        assert_eq!(fade.start, Point::new(10.0, 40.0));
        assert_eq!(fade.end, Point::new(110.0, 40.0));
        let stops: Vec<(f32, f32)> = fade
            .stops
            .iter()
            .flatten()
            .map(|stop| (stop.offset, stop.color.a))
            .collect();
        assert_eq!(stops, vec![(0.0, 0.0), (0.5, 1.0), (1.0, 0.0)]);
    }

    #[test]
    fn palette_resolves_to_shape_colours() {
        let colors = ShapeColors::from_palette(&Palette::default()).unwrap();
        assert_eq!(colors.color(ShapeColor::Past), Color::from_rgb8(0x00, 0x80, 0x80));
        assert_eq!(colors.color(ShapeColor::Highlight), Color::from_rgb8(0x00, 0xFF, 0xFF));
    }
}
