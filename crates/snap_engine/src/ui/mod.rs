//! UI widgets and policies
//!
//! Widgets are ordinary entities with a text-bearing [`EntityKind`]
//! (`Text`, `Button`, `Dialog`, `Menu`) plus the behaviors that give them
//! their interactive feel.
//!
//! [`EntityKind`]: crate::ecs::EntityKind

pub mod align;
pub mod menu;
pub mod policy;
pub mod text_format;
pub mod widgets;

pub use align::AlignBehavior;
pub use menu::{MenuBehavior, MenuData, MenuItem};
pub use policy::UiPolicy;
pub use text_format::format_value;
pub use widgets::{ButtonData, DialogData, TextData};

/// Space between a widget border and its content
pub const MARGIN: f64 = 2.0;
/// Space between a container border and the widgets it places
pub const PADDING: f64 = 2.0;

/// Horizontal (and reserved vertical) alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    /// Left
    #[default]
    Left,
    /// Right
    Right,
    /// Centered
    Center,
    /// Top, not used for placement yet
    Top,
    /// Bottom, not used for placement yet
    Bottom,
}
