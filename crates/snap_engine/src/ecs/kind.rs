//! Entity variants
//!
//! Every entity carries one [`EntityKind`]. Its [`KindTag`] selects the draw
//! plugin; the variant payload holds what that plugin needs.

use crate::assets::ImageHandle;
use crate::foundation::math::{Rect, Vec2};
use crate::scene::camera::CameraData;
use crate::ui::menu::MenuData;
use crate::ui::widgets::{ButtonData, DialogData, TextData};

/// Plugin lookup key, one per variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KindTag {
    /// Geometric shape
    Shape,
    /// Image
    Image,
    /// Text
    Text,
    /// Button
    Button,
    /// Dialog box
    Dialog,
    /// Menu
    Menu,
    /// Camera
    Camera,
    /// Application-defined variant
    Custom(&'static str),
}

/// Geometric nature of a shape entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShapeNature {
    /// Single point at the top-left corner
    Dot,
    /// Line from the top-left to the bottom-right corner
    Line,
    /// Rectangle
    #[default]
    Rectangle,
    /// Ellipse inscribed in the bounds
    Ellipse,
    /// Polygon, points relative to the top-left corner
    Polygon,
}

/// Precise outline, recomputed from the bounds after every physics step
#[derive(Debug, Clone, PartialEq)]
pub enum PreciseShape {
    /// Axis-aligned rectangle
    Rect(Rect),
    /// Ellipse inscribed in a rectangle
    Ellipse(Rect),
    /// Polygon in absolute coordinates
    Polygon(Vec<Vec2>),
}

impl Default for PreciseShape {
    fn default() -> Self {
        Self::Rect(Rect::default())
    }
}

/// Payload of [`EntityKind::Shape`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShapeData {
    /// Shape nature
    pub nature: ShapeNature,
    /// Polygon vertices relative to the entity position
    pub points: Vec<Vec2>,
    shape: PreciseShape,
}

impl ShapeData {
    /// Shape of the given nature
    pub fn new(nature: ShapeNature) -> Self {
        Self { nature, ..Self::default() }
    }

    /// Polygon from vertices relative to the entity position
    pub fn polygon(points: Vec<Vec2>) -> Self {
        Self { nature: ShapeNature::Polygon, points, shape: PreciseShape::default() }
    }

    /// Recompute the precise outline for `bounds`
    pub fn refresh(&mut self, bounds: Rect) {
        self.shape = match self.nature {
            ShapeNature::Ellipse => PreciseShape::Ellipse(bounds),
            ShapeNature::Polygon => {
                PreciseShape::Polygon(self.points.iter().map(|p| p + bounds.position()).collect())
            }
            ShapeNature::Dot | ShapeNature::Line | ShapeNature::Rectangle => PreciseShape::Rect(bounds),
        };
    }

    /// Outline as of the last refresh
    pub fn shape(&self) -> &PreciseShape {
        &self.shape
    }
}

/// Payload of [`EntityKind::Image`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImageData {
    /// Image to draw; nothing is drawn when absent
    pub image: Option<ImageHandle>,
}

/// Variant of an entity and its variant-specific data
#[derive(Debug, Clone, PartialEq)]
pub enum EntityKind {
    /// Geometric shape
    Shape(ShapeData),
    /// Image
    Image(ImageData),
    /// Formatted text
    Text(TextData),
    /// Clickable button
    Button(ButtonData),
    /// Dialog box
    Dialog(DialogData),
    /// Selection menu
    Menu(MenuData),
    /// Tracking camera
    Camera(CameraData),
    /// Application-defined variant, drawn by the plugin registered for its tag
    Custom(&'static str),
}

impl Default for EntityKind {
    fn default() -> Self {
        Self::Shape(ShapeData::default())
    }
}

impl EntityKind {
    /// Plugin lookup key
    pub fn tag(&self) -> KindTag {
        match self {
            Self::Shape(_) => KindTag::Shape,
            Self::Image(_) => KindTag::Image,
            Self::Text(_) => KindTag::Text,
            Self::Button(_) => KindTag::Button,
            Self::Dialog(_) => KindTag::Dialog,
            Self::Menu(_) => KindTag::Menu,
            Self::Camera(_) => KindTag::Camera,
            Self::Custom(tag) => KindTag::Custom(tag),
        }
    }

    /// Text payload of text-bearing variants
    pub fn text(&self) -> Option<&TextData> {
        match self {
            Self::Text(text) => Some(text),
            Self::Button(button) => Some(&button.label),
            Self::Dialog(dialog) => Some(&dialog.label),
            _ => None,
        }
    }

    /// Mutable text payload of text-bearing variants
    pub fn text_mut(&mut self) -> Option<&mut TextData> {
        match self {
            Self::Text(text) => Some(text),
            Self::Button(button) => Some(&mut button.label),
            Self::Dialog(dialog) => Some(&mut dialog.label),
            _ => None,
        }
    }

    /// Camera payload
    pub fn camera(&self) -> Option<&CameraData> {
        match self {
            Self::Camera(camera) => Some(camera),
            _ => None,
        }
    }

    /// Mutable camera payload
    pub fn camera_mut(&mut self) -> Option<&mut CameraData> {
        match self {
            Self::Camera(camera) => Some(camera),
            _ => None,
        }
    }

    /// Mutable menu payload
    pub fn menu_mut(&mut self) -> Option<&mut MenuData> {
        match self {
            Self::Menu(menu) => Some(menu),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_refresh_follows_nature() {
        let bounds = Rect::new(10.0, 20.0, 8.0, 4.0);
        let mut ellipse = ShapeData::new(ShapeNature::Ellipse);
        ellipse.refresh(bounds);
        assert_eq!(ellipse.shape(), &PreciseShape::Ellipse(bounds));

        let mut polygon = ShapeData::polygon(vec![Vec2::new(0.0, 0.0), Vec2::new(4.0, 2.0)]);
        polygon.refresh(bounds);
        assert_eq!(
            polygon.shape(),
            &PreciseShape::Polygon(vec![Vec2::new(10.0, 20.0), Vec2::new(14.0, 22.0)])
        );
    }

    #[test]
    fn test_text_accessor_covers_widgets() {
        let mut kind = EntityKind::Button(ButtonData::new("OK"));
        assert_eq!(kind.tag(), KindTag::Button);
        kind.text_mut().unwrap().text = "Cancel".into();
        assert_eq!(kind.text().unwrap().text, "Cancel");
        assert!(EntityKind::default().text().is_none());
    }
}
