//! Play-area boundary resolution
//!
//! Runs right after integration. An entity that left the play area is
//! snapped back onto the crossed edge and bounces off it.

use crate::ecs::Entity;
use crate::physics::World;

/// Damping factor applied when `entity_elasticity` meets the world boundary.
///
/// World elasticity appears twice and world roughness once.
pub fn bounce_factor(entity_elasticity: f64, world: &World) -> f64 {
    entity_elasticity * world.material.roughness * world.material.elasticity
}

/// Keep `entity` inside `world.play_area`.
///
/// Each crossed edge snaps the position and reflects the matching velocity
/// and acceleration axis, scaled by [`bounce_factor`]. The bottom edge is the
/// exception: its acceleration is only negated, without damping.
///
/// Returns `true` when a correction happened.
pub fn resolve_boundaries(world: &World, entity: &mut Entity) -> bool {
    if world.play_area.contains_rect(&entity.bounds) {
        return false;
    }

    let factor = bounce_factor(entity.material.elasticity, world);
    let max_x = world.play_area.width - entity.bounds.width;
    let max_y = world.play_area.height - entity.bounds.height;

    if entity.bounds.x < 0.0 {
        entity.bounds.x = 0.0;
        entity.velocity.x = -entity.velocity.x * factor;
        entity.acceleration.x = -entity.acceleration.x * factor;
    }
    if entity.bounds.y < 0.0 {
        entity.bounds.y = 0.0;
        entity.velocity.y = -entity.velocity.y * factor;
        entity.acceleration.y = -entity.acceleration.y * factor;
    }
    if entity.bounds.x > max_x {
        entity.bounds.x = max_x;
        entity.velocity.x = -entity.velocity.x * factor;
        entity.acceleration.x = -entity.acceleration.x * factor;
    }
    if entity.bounds.y > max_y {
        entity.bounds.y = max_y;
        entity.velocity.y = -entity.velocity.y * factor;
        // FIXME: undamped unlike the three other edges; kept until the demo
        // scenes are retuned against a symmetric response.
        entity.acceleration.y = -entity.acceleration.y;
    }
    true
}
