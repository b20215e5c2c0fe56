//! Shared interaction colors for widgets

use crate::ecs::behavior::{Behavior, HookContext, HookResult};
use crate::ecs::kind::EntityKind;
use crate::ecs::{Entity, EntityKey};
use crate::foundation::math::Vec2;
use crate::input::MouseButton;
use crate::render::Color;

/// Border color of a widget the pointer just left
pub const IDLE_BORDER: Color = Color::rgb(0.1, 0.1, 0.1);

/// Pressed, released and hover feedback.
///
/// Widget factories attach it first, so behaviors attached afterwards can
/// override its colors in the same event.
#[derive(Debug, Clone, Copy, Default)]
pub struct UiPolicy;

fn set_label_color(entity: &mut Entity, color: Color) {
    if let EntityKind::Button(button) = &mut entity.kind {
        button.label.color = color;
    }
}

impl Behavior for UiPolicy {
    fn name(&self) -> &str {
        "UiPolicy"
    }

    fn on_mouse_pressed(
        &mut self,
        ctx: &mut HookContext<'_>,
        entity: EntityKey,
        _pointer: Vec2,
        _button: MouseButton,
    ) -> HookResult {
        let entity = ctx.require_mut(entity)?;
        entity.fill_color = Color::CYAN;
        set_label_color(entity, Color::BLUE);
        Ok(())
    }

    fn on_mouse_released(
        &mut self,
        ctx: &mut HookContext<'_>,
        entity: EntityKey,
        _pointer: Vec2,
        _button: MouseButton,
    ) -> HookResult {
        let entity = ctx.require_mut(entity)?;
        entity.fill_color = Color::GRAY;
        set_label_color(entity, Color::WHITE);
        Ok(())
    }

    fn on_mouse_in(&mut self, ctx: &mut HookContext<'_>, entity: EntityKey, _pointer: Vec2) -> HookResult {
        let entity = ctx.require_mut(entity)?;
        entity.fill_color = Color::LIGHT_GRAY;
        entity.border_color = Color::WHITE;
        Ok(())
    }

    fn on_mouse_out(&mut self, ctx: &mut HookContext<'_>, entity: EntityKey, _pointer: Vec2) -> HookResult {
        let entity = ctx.require_mut(entity)?;
        entity.fill_color = Color::GRAY;
        entity.border_color = IDLE_BORDER;
        Ok(())
    }
}
