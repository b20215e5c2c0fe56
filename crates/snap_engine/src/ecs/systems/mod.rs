//! Per-frame systems over the active scene

pub mod dispatch;
pub mod picking_system;
pub mod simulation_system;

pub use dispatch::{dispatch_entity, dispatch_scene, Hook};
pub use picking_system::{entity_under_pointer, PickingSystem, MOUSE_HOVER};
pub use simulation_system::{dispatch_key, flush_creates, run_input, run_update, set_visible};
