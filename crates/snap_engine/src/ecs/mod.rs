//! Entity and behavior model
//!
//! Entities live in a slot-map arena owned by their scene; behaviors are
//! trait objects attached to entities (or to the scene) and invoked by the
//! systems in [`systems`].

pub mod attributes;
pub mod behavior;
pub mod entity;
pub mod kind;
pub mod store;
pub mod systems;

pub use attributes::{AttributeValue, Attributes};
pub use behavior::{Behavior, BehaviorError, DrawContext, HookContext, HookResult};
pub use entity::Entity;
pub use kind::{EntityKind, KindTag, ShapeData, ShapeNature};
pub use store::{EntityKey, EntityStore};
