//! Behavior hooks
//!
//! A [`Behavior`] is a bundle of optional callbacks attached to an entity (or
//! to a scene). Every hook has a no-op default, so an implementation only
//! overrides what it needs. Hooks of one entity run in attachment order.
//!
//! Hooks get mutable access to the scene content, the world and the runtime
//! context through [`HookContext`]. Anything that must happen outside the
//! current scene (switching scenes, resetting) is requested through
//! [`RuntimeContext`] commands and applied by the engine between phases.

use thiserror::Error;

use crate::core::RuntimeContext;
use crate::ecs::{Entity, EntityKey};
use crate::foundation::math::Vec2;
use crate::input::{InputState, KeyEvent, MouseButton};
use crate::physics::World;
use crate::render::Surface;
use crate::scene::SceneContent;

/// Result of a hook invocation
pub type HookResult = Result<(), BehaviorError>;

/// Failure raised inside a hook; logged, never fatal for the frame
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BehaviorError {
    /// The hook reported an error
    #[error("behavior fault: {message}")]
    Fault {
        /// Description
        message: String,
    },

    /// The hook panicked
    #[error("behavior panicked: {message}")]
    Panicked {
        /// Panic payload, when it was a string
        message: String,
    },
}

impl BehaviorError {
    /// Build a [`BehaviorError::Fault`]
    pub fn fault(message: impl Into<String>) -> Self {
        Self::Fault { message: message.into() }
    }
}

/// Mutable view handed to every hook except draw
pub struct HookContext<'a> {
    /// Active scene content
    pub scene: &'a mut SceneContent,
    /// Simulation world
    pub world: &'a mut World,
    /// Key table and pointer
    pub input: &'a InputState,
    /// Exit/pause/debug switches and the command queue
    pub runtime: &'a mut RuntimeContext,
}

impl HookContext<'_> {
    /// Entity by key
    pub fn entity(&self, key: EntityKey) -> Option<&Entity> {
        self.scene.get(key)
    }

    /// Mutable entity by key
    pub fn entity_mut(&mut self, key: EntityKey) -> Option<&mut Entity> {
        self.scene.get_mut(key)
    }

    /// Key of a named entity
    pub fn find(&self, name: &str) -> Option<EntityKey> {
        self.scene.key_of(name)
    }

    /// Mutable entity by key, or a fault naming the missing key
    pub fn require_mut(&mut self, key: EntityKey) -> Result<&mut Entity, BehaviorError> {
        self.scene
            .get_mut(key)
            .ok_or_else(|| BehaviorError::fault(format!("entity {key:?} no longer exists")))
    }
}

/// Read-only view handed to draw hooks
pub struct DrawContext<'a> {
    /// Active scene content
    pub scene: &'a SceneContent,
    /// Simulation world
    pub world: &'a World,
    /// Key table and pointer
    pub input: &'a InputState,
    /// Exit/pause/debug switches
    pub runtime: &'a RuntimeContext,
}

/// Optional lifecycle and event callbacks.
///
/// Scene-level behaviors only receive the key hooks, with `entity` set to
/// `None`.
#[allow(unused_variables)]
pub trait Behavior {
    /// Name used in fault reports
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Once, when the entity joins a scene
    fn on_create(&mut self, ctx: &mut HookContext<'_>, entity: EntityKey) -> HookResult {
        Ok(())
    }

    /// Every frame, before update
    fn on_input(&mut self, ctx: &mut HookContext<'_>, entity: EntityKey) -> HookResult {
        Ok(())
    }

    /// Every frame, after physics; `elapsed` in milliseconds
    fn on_update(&mut self, ctx: &mut HookContext<'_>, entity: EntityKey, elapsed: f64) -> HookResult {
        Ok(())
    }

    /// Every frame, after the entity itself is drawn
    fn on_draw(&self, ctx: &DrawContext<'_>, entity: EntityKey, surface: &mut dyn Surface) -> HookResult {
        Ok(())
    }

    /// A key went down
    fn on_key_pressed(&mut self, ctx: &mut HookContext<'_>, entity: Option<EntityKey>, key: &KeyEvent) -> HookResult {
        Ok(())
    }

    /// A key went up
    fn on_key_released(&mut self, ctx: &mut HookContext<'_>, entity: Option<EntityKey>, key: &KeyEvent) -> HookResult {
        Ok(())
    }

    /// The entity became visible
    fn on_activate(&mut self, ctx: &mut HookContext<'_>, entity: EntityKey) -> HookResult {
        Ok(())
    }

    /// The entity was hidden
    fn on_deactivate(&mut self, ctx: &mut HookContext<'_>, entity: EntityKey) -> HookResult {
        Ok(())
    }

    /// The pointer entered the entity
    fn on_mouse_in(&mut self, ctx: &mut HookContext<'_>, entity: EntityKey, pointer: Vec2) -> HookResult {
        Ok(())
    }

    /// The pointer left the entity
    fn on_mouse_out(&mut self, ctx: &mut HookContext<'_>, entity: EntityKey, pointer: Vec2) -> HookResult {
        Ok(())
    }

    /// A button was clicked over the entity
    fn on_mouse_click(
        &mut self,
        ctx: &mut HookContext<'_>,
        entity: EntityKey,
        pointer: Vec2,
        button: MouseButton,
    ) -> HookResult {
        Ok(())
    }

    /// A button went down over the entity
    fn on_mouse_pressed(
        &mut self,
        ctx: &mut HookContext<'_>,
        entity: EntityKey,
        pointer: Vec2,
        button: MouseButton,
    ) -> HookResult {
        Ok(())
    }

    /// A button went up over the entity
    fn on_mouse_released(
        &mut self,
        ctx: &mut HookContext<'_>,
        entity: EntityKey,
        pointer: Vec2,
        button: MouseButton,
    ) -> HookResult {
        Ok(())
    }
}
