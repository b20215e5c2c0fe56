//! Text, button and dialog widgets

use std::borrow::Cow;

use crate::assets::FontHandle;
use crate::ecs::kind::EntityKind;
use crate::ecs::{AttributeValue, Entity};
use crate::render::Color;
use crate::ui::align::AlignBehavior;
use crate::ui::policy::UiPolicy;
use crate::ui::text_format::format_value;
use crate::ui::Align;

/// Default dialog size
pub const DIALOG_SIZE: (f64, f64) = (100.0, 48.0);

/// Payload of [`EntityKind::Text`], also the label of buttons and dialogs
#[derive(Debug, Clone, PartialEq)]
pub struct TextData {
    /// Template, formatted with `value` when it contains `%`
    pub text: String,
    /// Value injected into the template
    pub value: Option<AttributeValue>,
    /// Font, the surface default when absent
    pub font: Option<FontHandle>,
    /// Text color
    pub color: Color,
    /// Alignment around the entity position
    pub align: Align,
}

impl Default for TextData {
    fn default() -> Self {
        Self {
            text: String::new(),
            value: None,
            font: None,
            color: Color::WHITE,
            align: Align::Left,
        }
    }
}

impl TextData {
    /// Left-aligned white text
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), ..Self::default() }
    }

    /// Builder: template value
    pub fn with_value(mut self, value: impl Into<AttributeValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Builder: font
    pub fn with_font(mut self, font: Option<FontHandle>) -> Self {
        self.font = font;
        self
    }

    /// Builder: text color
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Builder: alignment
    pub fn with_align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    /// Text as displayed
    pub fn display_text(&self) -> Cow<'_, str> {
        match &self.value {
            Some(value) if self.text.contains('%') => Cow::Owned(format_value(&self.text, value)),
            _ => Cow::Borrowed(&self.text),
        }
    }
}

/// Payload of [`EntityKind::Button`]
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonData {
    /// Centered label
    pub label: TextData,
    /// Placement inside the parent container
    pub align: Align,
}

impl ButtonData {
    /// Button with a centered label, placed on the left of its container
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            label: TextData::new(text).with_align(Align::Center),
            align: Align::Left,
        }
    }
}

/// Payload of [`EntityKind::Dialog`]
#[derive(Debug, Clone, PartialEq)]
pub struct DialogData {
    /// Message
    pub label: TextData,
}

impl DialogData {
    /// Dialog with a white message
    pub fn new(text: impl Into<String>) -> Self {
        Self { label: TextData::new(text) }
    }
}

/// Text entity. Its size is measured by the renderer on every frame.
pub fn text(name: impl Into<String>, data: TextData) -> Entity {
    Entity::new(name).with_kind(EntityKind::Text(data))
}

/// Interactive, camera-relative button with the UI color policy attached
pub fn button(name: impl Into<String>, label: impl Into<String>, align: Align) -> Entity {
    let mut data = ButtonData::new(label);
    data.align = align;
    Entity::new(name)
        .with_kind(EntityKind::Button(data))
        .with_fill_color(Color::GRAY)
        .with_interactive(true)
        .with_relative_to_camera(true)
        .with_behavior(UiPolicy)
}

/// Hidden dialog box centered in a `buffer_width` x `buffer_height` buffer.
///
/// Buttons added as children are placed along its bottom edge.
pub fn dialog(name: impl Into<String>, message: impl Into<String>, buffer_width: f64, buffer_height: f64) -> Entity {
    let (width, height) = DIALOG_SIZE;
    Entity::new(name)
        .with_kind(EntityKind::Dialog(DialogData::new(message)))
        .with_size(width, height)
        .with_position((buffer_width - width) * 0.5, (buffer_height - height) * 0.5)
        .with_active(false)
        .with_interactive(true)
        .with_relative_to_camera(true)
        .with_fill_color(Color::BLUE)
        .with_border_color(Color::CYAN)
        .with_behavior(AlignBehavior)
}
