//! Input and update phases
//!
//! Walks the active scene's root entities (and, recursively, their active
//! children), running physics on world-space entities and dispatching the
//! phase hooks. The camera runs after the roots.

use crate::ecs::behavior::HookContext;
use crate::ecs::systems::dispatch::{dispatch_entity, dispatch_scene, Hook};
use crate::ecs::EntityKey;
use crate::physics::{apply_physics, resolve_boundaries};
use crate::scene::camera::update_camera;

/// Rounds of `on_create` flushing before giving up on entities that keep
/// spawning entities from their creation hook
const MAX_CREATE_ROUNDS: usize = 64;

/// Run `on_create` for every entity added since the last flush.
///
/// Entities added by a creation hook are flushed in the same call.
pub fn flush_creates(ctx: &mut HookContext<'_>) -> usize {
    let mut faults = 0;
    for _ in 0..MAX_CREATE_ROUNDS {
        let pending = ctx.scene.take_pending_creates();
        if pending.is_empty() {
            return faults;
        }
        for key in pending {
            faults += dispatch_entity(ctx, key, Hook::Create);
        }
    }
    log::warn!(
        "Scene '{}' still has entities to create after {MAX_CREATE_ROUNDS} rounds",
        ctx.scene.name()
    );
    faults
}

/// Input phase: `on_input` on every active entity, then the camera
pub fn run_input(ctx: &mut HookContext<'_>) -> usize {
    let mut faults = 0;
    for root in ctx.scene.roots() {
        faults += walk_active(ctx, root, &mut |ctx, key| dispatch_entity(ctx, key, Hook::Input));
    }
    if let Some(camera) = active_camera(ctx) {
        faults += dispatch_entity(ctx, camera, Hook::Input);
    }
    faults
}

/// Update phase.
///
/// Unless paused, world-space entities are integrated and pushed back inside
/// the play area before their `on_update` hooks run. Camera-relative entities
/// never move by physics. Parent-relative children are integrated but not
/// bounded, their position being an offset.
pub fn run_update(ctx: &mut HookContext<'_>, elapsed_ms: f64) -> usize {
    let mut faults = 0;
    for root in ctx.scene.roots() {
        faults += walk_active(ctx, root, &mut |ctx, key| update_entity(ctx, key, elapsed_ms));
    }
    if let Some(camera) = active_camera(ctx) {
        update_camera(ctx.scene.store_mut(), camera, elapsed_ms);
        faults += dispatch_entity(ctx, camera, Hook::Update(elapsed_ms));
    }
    faults
}

fn update_entity(ctx: &mut HookContext<'_>, key: EntityKey, elapsed_ms: f64) -> usize {
    let paused = ctx.runtime.is_paused();
    if let Some(entity) = ctx.scene.get_mut(key) {
        if !paused && !entity.relative_to_camera {
            apply_physics(ctx.world, entity, elapsed_ms);
            if !entity.relative_to_parent {
                resolve_boundaries(ctx.world, entity);
            }
            entity.refresh_shape();
        }
    }
    dispatch_entity(ctx, key, Hook::Update(elapsed_ms))
}

/// Key phase: the hook goes to every active entity, the camera, then the
/// scene-level behaviors
pub fn dispatch_key(ctx: &mut HookContext<'_>, hook: Hook<'_>) -> usize {
    let mut faults = 0;
    for root in ctx.scene.roots() {
        faults += walk_active(ctx, root, &mut |ctx, key| dispatch_entity(ctx, key, hook));
    }
    if let Some(camera) = active_camera(ctx) {
        faults += dispatch_entity(ctx, camera, hook);
    }
    faults + dispatch_scene(ctx, hook)
}

/// Show or hide an entity with its whole subtree.
///
/// Every affected entity receives `on_activate` or `on_deactivate`, parents
/// before children. Returns the fault count.
pub fn set_visible(ctx: &mut HookContext<'_>, key: EntityKey, visible: bool) -> usize {
    let keys = ctx.scene.store().subtree(key);
    if keys.is_empty() {
        log::warn!("Cannot change visibility of a missing entity");
        return 0;
    }
    ctx.scene.store_mut().set_active_recursive(key, visible);
    let hook = if visible { Hook::Activate } else { Hook::Deactivate };
    keys.into_iter().map(|k| dispatch_entity(ctx, k, hook)).sum()
}

fn active_camera(ctx: &HookContext<'_>) -> Option<EntityKey> {
    let camera = ctx.scene.active_camera()?;
    ctx.scene.get(camera).filter(|e| e.active).map(|_| camera)
}

/// Visit `key` then its children in order, skipping inactive subtrees.
/// Children are read after the visit so hooks may add or remove them.
fn walk_active(
    ctx: &mut HookContext<'_>,
    key: EntityKey,
    visit: &mut dyn FnMut(&mut HookContext<'_>, EntityKey) -> usize,
) -> usize {
    if !ctx.scene.get(key).is_some_and(|e| e.active) {
        return 0;
    }
    let mut faults = visit(ctx, key);
    for child in ctx.scene.store().children_of(key) {
        faults += walk_active(ctx, child, visit);
    }
    faults
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RuntimeContext;
    use crate::ecs::behavior::{Behavior, HookResult};
    use crate::ecs::Entity;
    use crate::foundation::math::Rect;
    use crate::input::{InputState, KeyCode, KeyEvent};
    use crate::physics::{Material, World};
    use crate::scene::camera::{camera, set_target};
    use crate::scene::SceneContent;
    use approx::assert_relative_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Trace(Log);

    impl Trace {
        fn push(&self, ctx: &HookContext<'_>, key: Option<EntityKey>, hook: &str) {
            let name = key
                .and_then(|k| ctx.entity(k))
                .map_or_else(|| "scene".to_string(), |e| e.name().to_string());
            self.0.borrow_mut().push(format!("{hook}:{name}"));
        }
    }

    impl Behavior for Trace {
        fn on_create(&mut self, ctx: &mut HookContext<'_>, entity: EntityKey) -> HookResult {
            self.push(ctx, Some(entity), "create");
            Ok(())
        }

        fn on_update(&mut self, ctx: &mut HookContext<'_>, entity: EntityKey, _elapsed: f64) -> HookResult {
            self.push(ctx, Some(entity), "update");
            Ok(())
        }

        fn on_key_released(&mut self, ctx: &mut HookContext<'_>, entity: Option<EntityKey>, _key: &KeyEvent) -> HookResult {
            self.push(ctx, entity, "key");
            Ok(())
        }

        fn on_deactivate(&mut self, ctx: &mut HookContext<'_>, entity: EntityKey) -> HookResult {
            self.push(ctx, Some(entity), "deactivate");
            Ok(())
        }
    }

    struct Harness {
        scene: SceneContent,
        world: World,
        input: InputState,
        runtime: RuntimeContext,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                scene: SceneContent::new("test"),
                world: World::new("earth", 0.0981, Rect::from_size(320.0, 240.0), Material::new("limits", 1.0, 1.0, 1.0)),
                input: InputState::default(),
                runtime: RuntimeContext::default(),
            }
        }

        fn ctx(&mut self) -> HookContext<'_> {
            HookContext {
                scene: &mut self.scene,
                world: &mut self.world,
                input: &self.input,
                runtime: &mut self.runtime,
            }
        }
    }

    #[test]
    fn test_update_moves_world_entities_only() {
        let mut h = Harness::new();
        let body = h.scene.add(Entity::new("body").with_position(160.0, 120.0).with_size(16.0, 16.0).with_mass(10.0));
        let hud = h.scene.add(Entity::new("hud").with_position(4.0, 4.0).with_relative_to_camera(true));

        run_update(&mut h.ctx(), 16.0);

        assert!(h.scene.get(body).unwrap().bounds.y > 120.0);
        assert!(h.scene.get(body).unwrap().velocity.y > 0.0);
        assert_relative_eq!(h.scene.get(hud).unwrap().bounds.y, 4.0);
    }

    #[test]
    fn test_pause_freezes_physics_but_not_hooks() {
        let log: Log = Rc::default();
        let mut h = Harness::new();
        let body = h.scene.add(
            Entity::new("body")
                .with_position(160.0, 120.0)
                .with_size(16.0, 16.0)
                .with_behavior(Trace(log.clone())),
        );
        h.runtime.set_pause(true);

        run_update(&mut h.ctx(), 16.0);

        assert_relative_eq!(h.scene.get(body).unwrap().bounds.y, 120.0);
        assert_eq!(*log.borrow(), vec!["update:body".to_string()]);
    }

    #[test]
    fn test_inactive_subtrees_are_skipped() {
        let log: Log = Rc::default();
        let mut h = Harness::new();
        let dialog = h.scene.add(Entity::new("dialog").with_active(false).with_behavior(Trace(log.clone())));
        h.scene.add_child(dialog, Entity::new("ok").with_behavior(Trace(log.clone()))).unwrap();
        let menu = h.scene.add(Entity::new("menu").with_behavior(Trace(log.clone())));
        h.scene.add_child(menu, Entity::new("start").with_behavior(Trace(log.clone()))).unwrap();

        run_update(&mut h.ctx(), 16.0);

        assert_eq!(*log.borrow(), vec!["update:menu".to_string(), "update:start".to_string()]);
    }

    #[test]
    fn test_flush_creates_runs_once() {
        let log: Log = Rc::default();
        let mut h = Harness::new();
        h.scene.add(Entity::new("a").with_behavior(Trace(log.clone())));
        h.scene.add(Entity::new("b").with_behavior(Trace(log.clone())));

        flush_creates(&mut h.ctx());
        flush_creates(&mut h.ctx());

        assert_eq!(*log.borrow(), vec!["create:a".to_string(), "create:b".to_string()]);
        assert!(!h.scene.has_pending_creates());
    }

    #[test]
    fn test_key_reaches_entities_then_scene() {
        let log: Log = Rc::default();
        let mut h = Harness::new();
        h.scene.add(Entity::new("player").with_behavior(Trace(log.clone())));
        h.scene.add(Entity::new("hidden").with_active(false).with_behavior(Trace(log.clone())));
        h.scene.add_behavior(Trace(log.clone()));

        let event = KeyEvent::new(KeyCode::ESCAPE);
        dispatch_key(&mut h.ctx(), Hook::KeyReleased(&event));

        assert_eq!(*log.borrow(), vec!["key:player".to_string(), "key:scene".to_string()]);
    }

    #[test]
    fn test_set_visible_covers_children() {
        let log: Log = Rc::default();
        let mut h = Harness::new();
        let dialog = h.scene.add(Entity::new("dialog").with_behavior(Trace(log.clone())));
        let ok = h.scene.add_child(dialog, Entity::new("ok").with_behavior(Trace(log.clone()))).unwrap();

        let faults = set_visible(&mut h.ctx(), dialog, false);

        assert_eq!(faults, 0);
        assert!(!h.scene.get(dialog).unwrap().active);
        assert!(!h.scene.get(ok).unwrap().active);
        assert_eq!(*log.borrow(), vec!["deactivate:dialog".to_string(), "deactivate:ok".to_string()]);
    }

    #[test]
    fn test_camera_follows_after_roots() {
        let mut h = Harness::new();
        let player = h.scene.add(
            Entity::new("player").with_position(200.0, 150.0).with_size(16.0, 16.0).with_relative_to_camera(true),
        );
        let cam = h.scene.set_camera(camera("cam", 100.0, 80.0, 1.0));
        set_target(h.scene.store_mut(), cam, Some(player));

        run_update(&mut h.ctx(), 16.0);

        // camera is excluded from physics; it only tweens
        assert_eq!(h.scene.get(cam).unwrap().bounds, Rect::new(158.0, 118.0, 100.0, 80.0));
    }
}
