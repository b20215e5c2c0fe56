//! Simplified 2D physics
//!
//! Materials, the world description, the per-frame integrator and the
//! play-area boundary response.

pub mod boundary;
pub mod integrator;
pub mod material;
pub mod world;

pub use boundary::{bounce_factor, resolve_boundaries};
pub use integrator::apply_physics;
pub use material::Material;
pub use world::World;
