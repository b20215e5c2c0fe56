//! Rendering
//!
//! The [`Renderer`] walks the active scene and issues draw calls against a
//! [`Surface`]; per-variant drawing lives in [`plugins`]. Presenting the
//! surface on screen is the platform's job.

pub mod color;
pub mod commands;
pub mod plugins;
pub mod renderer;
pub mod surface;

pub use color::Color;
pub use commands::{DrawCommand, RecordingSurface};
pub use plugins::{DrawPlugin, PluginRegistry};
pub use renderer::Renderer;
pub use surface::{Surface, TextMetrics};
