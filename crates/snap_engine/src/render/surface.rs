//! Abstract 2D drawing surface
//!
//! The renderer issues every draw call through [`Surface`]; the presentation
//! layer decides how the result reaches the screen.

use crate::assets::{FontHandle, ImageHandle};
use crate::foundation::math::{Rect, Vec2};
use crate::render::Color;

/// Size of a rendered string
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextMetrics {
    /// Advance width in pixels
    pub width: f64,
    /// Line height in pixels
    pub height: f64,
    /// Distance from baseline to the lowest glyph pixel
    pub descent: f64,
}

/// 2D drawing surface with a current color, font and translation.
///
/// Coordinates are in buffer pixels, before the current translation.
pub trait Surface {
    /// Surface size in pixels
    fn size(&self) -> (u32, u32);

    /// Fill the whole surface, ignoring the translation
    fn clear(&mut self, color: Color);

    /// Shift the origin of all following draw calls
    fn translate(&mut self, dx: f64, dy: f64);

    /// Color used by following draw calls
    fn set_color(&mut self, color: Color);

    /// Font used by following text calls; `None` selects the default font
    fn set_font(&mut self, font: Option<&FontHandle>);

    /// Filled rectangle
    fn fill_rect(&mut self, rect: Rect);

    /// Rectangle outline
    fn draw_rect(&mut self, rect: Rect);

    /// Filled ellipse inscribed in `rect`
    fn fill_ellipse(&mut self, rect: Rect);

    /// Ellipse outline inscribed in `rect`
    fn draw_ellipse(&mut self, rect: Rect);

    /// Filled polygon
    fn fill_polygon(&mut self, points: &[Vec2]);

    /// Closed polygon outline
    fn draw_polygon(&mut self, points: &[Vec2]);

    /// Line segment
    fn draw_line(&mut self, from: Vec2, to: Vec2);

    /// Image stretched into `rect`
    fn draw_image(&mut self, image: &ImageHandle, rect: Rect);

    /// Text with its baseline starting at `(x, y)`
    fn draw_text(&mut self, text: &str, x: f64, y: f64);

    /// Measure `text` as drawn with `font` (the default font for `None`)
    fn text_metrics(&self, text: &str, font: Option<&FontHandle>) -> TextMetrics;
}
