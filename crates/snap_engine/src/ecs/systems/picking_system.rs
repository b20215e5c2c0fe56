//! Pointer hit-testing and mouse event routing
//!
//! Hit-testing is the inverse of draw order: among the active interactive
//! entities under the pointer, the highest priority wins (ties go to the
//! most recently created entity, which is also drawn last).

use crate::ecs::behavior::HookContext;
use crate::ecs::systems::dispatch::{dispatch_entity, Hook};
use crate::ecs::EntityKey;
use crate::foundation::math::Vec2;
use crate::input::MouseButton;
use crate::scene::SceneContent;

/// Attribute set on the entity under the pointer
pub const MOUSE_HOVER: &str = "mouse_hover";

/// Front-most interactive entity under `pointer` (buffer coordinates).
///
/// Camera-relative entities are tested against the pointer as is; world
/// entities against the pointer shifted by the active camera position.
/// Children of a hidden parent are not drawn, so they are never hit.
pub fn entity_under_pointer(scene: &SceneContent, pointer: Vec2) -> Option<EntityKey> {
    let store = scene.store();
    let camera = scene
        .active_camera()
        .filter(|&key| store.get(key).is_some_and(|e| e.active))
        .map_or_else(Vec2::zeros, |_| scene.camera_position());
    store
        .iter()
        .filter(|&(key, entity)| entity.interactive && store.is_active_in_tree(key))
        .filter(|&(key, entity)| {
            let point = if entity.relative_to_camera { pointer } else { pointer + camera };
            store
                .absolute_bounds(key)
                .is_some_and(|bounds| bounds.contains_point(point.x, point.y))
        })
        .max_by_key(|(_, entity)| (entity.priority, entity.id()))
        .map(|(key, _)| key)
}

/// Routes pointer events to the entity under the pointer and tracks hover
#[derive(Debug, Default)]
pub struct PickingSystem {
    hovered: Option<EntityKey>,
}

impl PickingSystem {
    /// Create a picking system with nothing hovered
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently hovered entity
    pub fn hovered(&self) -> Option<EntityKey> {
        self.hovered
    }

    /// Forget the hovered entity, e.g. after a scene switch
    pub fn reset(&mut self) {
        self.hovered = None;
    }

    /// Pointer moved: fire `on_mouse_out` on the entity it left (even when
    /// moving onto empty space) and `on_mouse_in` on the one it entered
    pub fn handle_move(&mut self, ctx: &mut HookContext<'_>, pointer: Vec2) -> usize {
        let target = entity_under_pointer(ctx.scene, pointer);
        if target == self.hovered {
            return 0;
        }
        let mut faults = 0;
        if let Some(previous) = self.hovered.take() {
            if let Some(entity) = ctx.scene.get_mut(previous) {
                entity.attributes.set(MOUSE_HOVER, false);
                log::debug!("Pointer left '{}'", entity.name());
                faults += dispatch_entity(ctx, previous, Hook::MouseOut(pointer));
            }
        }
        if let Some(key) = target {
            if let Some(entity) = ctx.scene.get_mut(key) {
                entity.attributes.set(MOUSE_HOVER, true);
                log::debug!("Pointer entered '{}'", entity.name());
            }
            faults += dispatch_entity(ctx, key, Hook::MouseIn(pointer));
        }
        self.hovered = target;
        faults
    }

    /// A button went down
    pub fn handle_pressed(&mut self, ctx: &mut HookContext<'_>, pointer: Vec2, button: MouseButton) -> usize {
        self.route(ctx, pointer, Hook::MousePressed(pointer, button))
    }

    /// A button went up
    pub fn handle_released(&mut self, ctx: &mut HookContext<'_>, pointer: Vec2, button: MouseButton) -> usize {
        self.route(ctx, pointer, Hook::MouseReleased(pointer, button))
    }

    /// A button was clicked
    pub fn handle_clicked(&mut self, ctx: &mut HookContext<'_>, pointer: Vec2, button: MouseButton) -> usize {
        self.route(ctx, pointer, Hook::MouseClick(pointer, button))
    }

    fn route(&mut self, ctx: &mut HookContext<'_>, pointer: Vec2, hook: Hook<'_>) -> usize {
        let Some(key) = entity_under_pointer(ctx.scene, pointer) else {
            return 0;
        };
        if let Some(entity) = ctx.scene.get(key) {
            log::debug!("{} on '{}' at ({}, {})", hook.name(), entity.name(), pointer.x, pointer.y);
        }
        dispatch_entity(ctx, key, hook)
    }
}
