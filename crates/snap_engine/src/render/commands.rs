//! Draw command recording
//!
//! [`RecordingSurface`] implements [`Surface`] by storing every call as a
//! [`DrawCommand`]. Headless runs present these lists instead of pixels and
//! tests assert on them.

use crate::assets::{FontHandle, ImageHandle};
use crate::foundation::math::{Rect, Vec2};
use crate::render::surface::{Surface, TextMetrics};
use crate::render::Color;

/// Font size assumed when no font is selected
pub const DEFAULT_FONT_SIZE: u32 = 12;

/// A single recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Whole-surface clear
    Clear(Color),
    /// Origin shift
    Translate {
        /// Horizontal shift
        dx: f64,
        /// Vertical shift
        dy: f64,
    },
    /// Current color change
    SetColor(Color),
    /// Current font change
    SetFont(Option<FontHandle>),
    /// Filled rectangle
    FillRect(Rect),
    /// Rectangle outline
    DrawRect(Rect),
    /// Filled ellipse
    FillEllipse(Rect),
    /// Ellipse outline
    DrawEllipse(Rect),
    /// Filled polygon
    FillPolygon(Vec<Vec2>),
    /// Polygon outline
    DrawPolygon(Vec<Vec2>),
    /// Line segment
    Line {
        /// Start point
        from: Vec2,
        /// End point
        to: Vec2,
    },
    /// Image blit
    Image {
        /// Image drawn
        image: ImageHandle,
        /// Destination rectangle
        rect: Rect,
    },
    /// Text
    Text {
        /// Text drawn
        text: String,
        /// Baseline x
        x: f64,
        /// Baseline y
        y: f64,
    },
}

/// [`Surface`] that records instead of rasterizing.
///
/// Text is measured with a fixed-pitch approximation: each character is half
/// the font size wide.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    offset: Vec2,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    /// Empty surface of the given size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            offset: Vec2::zeros(),
            commands: Vec::new(),
        }
    }

    /// Commands recorded since the last [`take_commands`](Self::take_commands)
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take the recorded commands, leaving the list empty
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Accumulated translation
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Texts drawn, in call order
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Filled rectangles drawn, in call order
    pub fn filled_rects(&self) -> Vec<Rect> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::FillRect(rect) => Some(*rect),
                _ => None,
            })
            .collect()
    }

    fn record(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Color) {
        self.record(DrawCommand::Clear(color));
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.offset += Vec2::new(dx, dy);
        self.record(DrawCommand::Translate { dx, dy });
    }

    fn set_color(&mut self, color: Color) {
        self.record(DrawCommand::SetColor(color));
    }

    fn set_font(&mut self, font: Option<&FontHandle>) {
        self.record(DrawCommand::SetFont(font.cloned()));
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.record(DrawCommand::FillRect(rect));
    }

    fn draw_rect(&mut self, rect: Rect) {
        self.record(DrawCommand::DrawRect(rect));
    }

    fn fill_ellipse(&mut self, rect: Rect) {
        self.record(DrawCommand::FillEllipse(rect));
    }

    fn draw_ellipse(&mut self, rect: Rect) {
        self.record(DrawCommand::DrawEllipse(rect));
    }

    fn fill_polygon(&mut self, points: &[Vec2]) {
        self.record(DrawCommand::FillPolygon(points.to_vec()));
    }

    fn draw_polygon(&mut self, points: &[Vec2]) {
        self.record(DrawCommand::DrawPolygon(points.to_vec()));
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2) {
        self.record(DrawCommand::Line { from, to });
    }

    fn draw_image(&mut self, image: &ImageHandle, rect: Rect) {
        self.record(DrawCommand::Image { image: image.clone(), rect });
    }

    fn draw_text(&mut self, text: &str, x: f64, y: f64) {
        self.record(DrawCommand::Text { text: text.to_string(), x, y });
    }

    fn text_metrics(&self, text: &str, font: Option<&FontHandle>) -> TextMetrics {
        let size = f64::from(font.map_or(DEFAULT_FONT_SIZE, |f| f.size.max(1)));
        TextMetrics {
            width: text.chars().count() as f64 * size * 0.5,
            height: size + 2.0,
            descent: (size * 0.25).floor(),
        }
    }
}
