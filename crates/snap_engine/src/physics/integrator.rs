//! Forces → acceleration → velocity → position integrator
//!
//! A deliberately simplified model, not a rigid-body solver. It is run once
//! per frame for every active world-space entity while the game is not paused.

use crate::ecs::Entity;
use crate::foundation::math::{sign_clamp, Vec2};
use crate::foundation::time::MIN_ELAPSED_MS;
use crate::physics::World;

/// Gravity contributes `gravity * GRAVITY_SCALE` to the y force each frame
pub const GRAVITY_SCALE: f64 = 0.1;
/// Per-axis acceleration limit
pub const MAX_ACCELERATION: f64 = 1.0;
/// Per-axis velocity limit
pub const MAX_VELOCITY: f64 = 4.0;

/// Integrate one frame of motion for `entity`.
///
/// `elapsed_ms` is the frame time in milliseconds. A non-positive value is a
/// caller bug; it is replaced by [`MIN_ELAPSED_MS`] so the velocity division
/// stays finite.
pub fn apply_physics(world: &World, entity: &mut Entity, elapsed_ms: f64) {
    let dt = if elapsed_ms > 0.0 {
        elapsed_ms
    } else {
        log::warn!("Non-positive elapsed time {elapsed_ms} for '{}', using {MIN_ELAPSED_MS}", entity.name());
        MIN_ELAPSED_MS
    };

    entity.forces.push(Vec2::new(0.0, world.gravity * GRAVITY_SCALE));

    // Acceleration accumulates across frames; only roughness and boundary
    // contacts bring it back down.
    for force in &entity.forces {
        entity.acceleration += force;
    }
    entity.acceleration.x = sign_clamp(entity.acceleration.x, MAX_ACCELERATION);
    entity.acceleration.y = sign_clamp(entity.acceleration.y, MAX_ACCELERATION);

    // Mass only weighs on the vertical axis.
    entity.velocity.x = entity.acceleration.x / dt;
    entity.velocity.y = entity.acceleration.y * entity.mass / dt;
    entity.velocity.x = sign_clamp(entity.velocity.x, MAX_VELOCITY);
    entity.velocity.y = sign_clamp(entity.velocity.y, MAX_VELOCITY);

    // Roughness affects the next frame, not this displacement.
    entity.acceleration *= entity.material.roughness;

    entity.bounds.x += entity.velocity.x * dt;
    entity.bounds.y += entity.velocity.y * dt;

    entity.forces.clear();
}
