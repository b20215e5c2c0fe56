//! Tracking camera
//!
//! A camera is an entity whose variant holds a target and a tween factor.
//! Each frame it moves a fraction of the way toward the position that would
//! center the target in its viewport.

use crate::ecs::kind::EntityKind;
use crate::ecs::{Entity, EntityKey, EntityStore};
use crate::foundation::math::{Rect, Vec2};

/// Payload of [`EntityKind::Camera`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CameraData {
    /// Tracked entity
    pub target: Option<EntityKey>,
    /// Fraction of the remaining distance covered per frame, in `[0, 1]`
    pub tween: f64,
    /// Mirror of the camera bounds after the last update
    pub viewport: Rect,
}

/// Camera entity with a viewport of `width` x `height`
pub fn camera(name: impl Into<String>, width: f64, height: f64, tween: f64) -> Entity {
    Entity::new(name)
        .with_size(width, height)
        .with_kind(EntityKind::Camera(CameraData {
            target: None,
            tween: tween.clamp(0.0, 1.0),
            viewport: Rect::from_size(width, height),
        }))
}

/// Next top-left corner of a camera at `camera` tracking `target`.
///
/// The step is `ceil(delta * tween * min(dt, 1))` per axis.
pub fn tween_position(camera: Rect, target: Rect, tween: f64, elapsed_ms: f64) -> Vec2 {
    let desired = target.center() - camera.size() * 0.5;
    let factor = tween * elapsed_ms.min(1.0);
    let delta = desired - camera.position();
    Vec2::new(
        camera.x + (delta.x * factor).ceil(),
        camera.y + (delta.y * factor).ceil(),
    )
}

/// Move the camera at `key` toward its target.
///
/// Returns `false` when the key is not a camera or has no live target; the
/// camera then stays where it is.
pub fn update_camera(store: &mut EntityStore, key: EntityKey, elapsed_ms: f64) -> bool {
    let Some((target, tween)) = store
        .get(key)
        .and_then(|e| e.kind.camera())
        .and_then(|c| c.target.map(|t| (t, c.tween)))
    else {
        return false;
    };
    let Some(target_bounds) = store.absolute_bounds(target) else {
        return false;
    };
    let Some(entity) = store.get_mut(key) else {
        return false;
    };
    let position = tween_position(entity.bounds, target_bounds, tween, elapsed_ms);
    entity.set_position(position.x, position.y);
    let bounds = entity.bounds;
    if let Some(data) = entity.kind.camera_mut() {
        data.viewport = bounds;
    }
    true
}

/// Point the camera at `key` to `target`
pub fn set_target(store: &mut EntityStore, key: EntityKey, target: Option<EntityKey>) -> bool {
    match store.get_mut(key).and_then(|e| e.kind.camera_mut()) {
        Some(data) => {
            data.target = target;
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn distance(store: &EntityStore, cam: EntityKey, desired: Vec2) -> f64 {
        (store.get(cam).unwrap().bounds.position() - desired).norm()
    }

    #[test]
    fn test_converges_without_overshoot() {
        let mut store = EntityStore::new();
        let target = store.insert(Entity::new("player").with_position(400.0, 300.0).with_size(16.0, 16.0));
        let cam = store.insert(camera("cam", 320.0, 240.0, 0.1));
        set_target(&mut store, cam, Some(target));

        // center of the target minus half the viewport
        let desired = Vec2::new(408.0 - 160.0, 308.0 - 120.0);
        let mut last = distance(&store, cam, desired);
        for _ in 0..200 {
            assert!(update_camera(&mut store, cam, 16.0));
            let position = store.get(cam).unwrap().bounds.position();
            assert!(position.x <= desired.x && position.y <= desired.y);
            let now = distance(&store, cam, desired);
            assert!(now <= last);
            last = now;
        }
        assert_relative_eq!(last, 0.0);
    }

    #[test]
    fn test_viewport_mirrors_bounds() {
        let mut store = EntityStore::new();
        let target = store.insert(Entity::new("player").with_position(100.0, 100.0).with_size(10.0, 10.0));
        let cam = store.insert(camera("cam", 50.0, 40.0, 1.0));
        set_target(&mut store, cam, Some(target));
        update_camera(&mut store, cam, 16.0);

        let entity = store.get(cam).unwrap();
        assert_eq!(entity.bounds.position(), Vec2::new(80.0, 85.0));
        assert_eq!(entity.kind.camera().unwrap().viewport, entity.bounds);
    }

    #[test]
    fn test_no_target_no_move() {
        let mut store = EntityStore::new();
        let cam = store.insert(camera("cam", 50.0, 40.0, 1.0));
        assert!(!update_camera(&mut store, cam, 16.0));
        assert_eq!(store.get(cam).unwrap().bounds.position(), Vec2::zeros());
    }
}
