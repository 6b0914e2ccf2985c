use crate::model::{EclipseFeature, FeatureId};
use crate::prelude::{ViewerError, ViewerResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Colour class assigned to a rendered path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeColor {
    Past,
    Future,
    Highlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Parses `#RRGGBB` or `#RGB`.
    pub fn from_hex(text: &str) -> ViewerResult<Self> {
        let digits = text.trim().trim_start_matches('#');
        let invalid = || ViewerError::InvalidConfig(format!("invalid colour {text:?}"));
        if !digits.is_ascii() {
            return Err(invalid());
        }
        let channel = |hex: &str| u8::from_str_radix(hex, 16).map_err(|_| invalid());
        match digits.len() {
            6 => Ok(Self {
                r: channel(&digits[0..2])?,
                g: channel(&digits[2..4])?,
                b: channel(&digits[4..6])?,
            }),
            3 => {
                let expand = |hex: &str| channel(hex).map(|v| v * 17);
                Ok(Self {
                    r: expand(&digits[0..1])?,
                    g: expand(&digits[1..2])?,
                    b: expand(&digits[2..3])?,
                })
            }
            _ => Err(invalid()),
        }
    }
}

/// Hex colours for the three shape classes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Palette {
    pub past: String,
    pub future: String,
    pub highlight: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            past: "#008080".into(),
            future: "#FF8000".into(),
            highlight: "#00FFFF".into(),
        }
    }
}

impl Palette {
    pub fn rgb(&self, color: ShapeColor) -> ViewerResult<Rgb> {
        match color {
            ShapeColor::Past => Rgb::from_hex(&self.past),
            ShapeColor::Future => Rgb::from_hex(&self.future),
            ShapeColor::Highlight => Rgb::from_hex(&self.highlight),
        }
    }

    pub fn validate(&self) -> ViewerResult<()> {
        for color in [ShapeColor::Past, ShapeColor::Future, ShapeColor::Highlight] {
            self.rgb(color)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeStyle {
    pub color: ShapeColor,
    pub opacity: f32,
}

#[derive(Debug, Clone)]
pub struct RenderedShape {
    pub feature: EclipseFeature,
    pub style: ShapeStyle,
}

/// Tracks the single selected path and recolours every rendered shape.
pub struct SelectionController {
    shapes: Vec<RenderedShape>,
    selected: Option<FeatureId>,
    reference: DateTime<Utc>,
}

impl SelectionController {
    pub fn new(reference: DateTime<Utc>) -> Self {
        Self {
            shapes: Vec::new(),
            selected: None,
            reference,
        }
    }

    pub fn selected(&self) -> Option<FeatureId> {
        self.selected
    }

    pub fn selected_feature(&self) -> Option<&EclipseFeature> {
        let id = self.selected?;
        self.find(id)
    }

    pub fn find(&self, id: FeatureId) -> Option<&EclipseFeature> {
        self.shapes
            .iter()
            .map(|shape| &shape.feature)
            .find(|feature| feature.id == id)
    }

    pub fn shapes(&self) -> &[RenderedShape] {
        &self.shapes
    }

    /// Replaces the selection and recolours. Ids not in the rendered set clear it.
    pub fn select(&mut self, id: Option<FeatureId>) {
        self.selected = id.filter(|id| self.find(*id).is_some());
        self.recolor();
    }

    pub fn on_background_click(&mut self) {
        self.select(None);
    }

    pub fn replace_shapes(&mut self, features: Vec<EclipseFeature>) {
        self.shapes = features
            .into_iter()
            .map(|feature| RenderedShape {
                feature,
                style: ShapeStyle {
                    color: ShapeColor::Future,
                    opacity: 1.0,
                },
            })
            .collect();
        if let Some(id) = self.selected {
            if self.find(id).is_none() {
                self.selected = None;
            }
        }
        self.recolor();
    }

    pub fn set_reference_date(&mut self, reference: DateTime<Utc>) {
        self.reference = reference;
        self.recolor();
    }

    /// Topmost shape containing the point; later shapes draw over earlier ones.
    pub fn hit_test(&self, point: crate::geometry::MapPoint) -> Option<FeatureId> {
        self.shapes
            .iter()
            .rev()
            .find(|shape| shape.feature.contains(point))
            .map(|shape| shape.feature.id)
    }

    pub fn shape_style(&self, index: usize) -> Option<ShapeStyle> {
        self.shapes.get(index).map(|shape| shape.style)
    }

    pub fn highlighted_count(&self) -> usize {
        self.shapes
            .iter()
            .filter(|shape| shape.style.color == ShapeColor::Highlight)
            .count()
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
        self.selected = None;
    }

    fn recolor(&mut self) {
        for shape in &mut self.shapes {
            let color = if Some(shape.feature.id) == self.selected {
                ShapeColor::Highlight
            } else if shape.feature.record.is_past(self.reference) {
                ShapeColor::Past
            } else {
                ShapeColor::Future
            };
            shape.style = ShapeStyle {
                color,
                opacity: 1.0,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::MapPoint;
    use crate::model::fixtures::feature;
    use chrono::TimeZone;

    fn controller() -> SelectionController {
        let mut controller =
            SelectionController::new(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
        controller.replace_shapes(vec![
            feature(1, 2017, 0.0, 0.0),
            feature(2, 2024, 5.0, 5.0),
            feature(3, 2045, 20.0, 20.0),
        ]);
        controller
    }

    fn color_of(controller: &SelectionController, id: i64) -> ShapeColor {
        controller
            .shapes()
            .iter()
            .find(|shape| shape.feature.id == FeatureId(id))
            .map(|shape| shape.style.color)
            .unwrap()
    }

    #[test]
    fn colours_follow_date_when_nothing_is_selected() {
        let controller = controller();
        assert_eq!(color_of(&controller, 1), ShapeColor::Past);
        assert_eq!(color_of(&controller, 2), ShapeColor::Past);
        assert_eq!(color_of(&controller, 3), ShapeColor::Future);
        assert_eq!(
            controller.shape_style(2),
            Some(ShapeStyle {
                color: ShapeColor::Future,
                opacity: 1.0
            })
        );
        assert_eq!(controller.shape_style(3), None);
        assert!(controller
            .shapes()
            .iter()
            .all(|shape| shape.style.opacity == 1.0));
    }

    #[test]
    fn selecting_another_path_moves_the_highlight() {
        let mut controller = controller();
        controller.select(Some(FeatureId(1)));
        assert_eq!(color_of(&controller, 1), ShapeColor::Highlight);

        controller.select(Some(FeatureId(3)));
        assert_eq!(controller.highlighted_count(), 1);
        assert_eq!(color_of(&controller, 3), ShapeColor::Highlight);
        assert_eq!(color_of(&controller, 1), ShapeColor::Past);
    }

    #[test]
    fn background_click_clears_highlight() {
        let mut controller = controller();
        controller.select(Some(FeatureId(2)));
        controller.on_background_click();
        assert_eq!(controller.highlighted_count(), 0);
        assert_eq!(controller.selected(), None);
        assert_eq!(color_of(&controller, 2), ShapeColor::Past);
    }

    #[test]
    fn selection_of_unknown_id_is_ignored() {
        let mut controller = controller();
        controller.select(Some(FeatureId(99)));
        assert_eq!(controller.selected(), None);
        assert_eq!(controller.highlighted_count(), 0);
    }

    #[test]
    fn replacing_shapes_drops_missing_selection() {
        let mut controller = controller();
        controller.select(Some(FeatureId(3)));
        controller.replace_shapes(vec![feature(1, 2017, 0.0, 0.0)]);
        assert_eq!(controller.selected(), None);
        assert_eq!(controller.highlighted_count(), 0);
    }

    #[test]
    fn moving_reference_date_recolours() {
        let mut controller = controller();
        controller.set_reference_date(Utc.with_ymd_and_hms(2050, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(color_of(&controller, 3), ShapeColor::Past);
    }

    #[test]
    fn path_dated_on_the_reference_is_future() {
        let mut controller =
            SelectionController::new(Utc.with_ymd_and_hms(2030, 4, 8, 0, 0, 0).unwrap());
        controller.replace_shapes(vec![feature(7, 2030, 0.0, 0.0)]);
        assert_eq!(color_of(&controller, 7), ShapeColor::Future);
    }

    #[test]
    fn hit_test_prefers_topmost_shape() {
        let controller = controller();
        assert_eq!(controller.hit_test(MapPoint::new(7.0, 7.0)), Some(FeatureId(2)));
        assert_eq!(controller.hit_test(MapPoint::new(1.0, 1.0)), Some(FeatureId(1)));
        assert_eq!(controller.hit_test(MapPoint::new(-50.0, 1.0)), None);
    }

    #[test]
    fn palette_parses_short_and_long_hex() {
        let palette = Palette::default();
        assert_eq!(
            palette.rgb(ShapeColor::Past).unwrap(),
            Rgb { r: 0, g: 128, b: 128 }
        );
        assert_eq!(
            Rgb::from_hex("#0ff").unwrap(),
            Rgb { r: 0, g: 255, b: 255 }
        );
        assert!(Rgb::from_hex("#12").is_err());
        assert!(Rgb::from_hex("zzzzzz").is_err());
    }
}
