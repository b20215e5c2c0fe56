//! Fail-soft hook dispatch
//!
//! Runs one hook on every behavior of an entity (or of the scene). A hook that
//! returns an error or panics is logged with the entity and hook names and the
//! remaining behaviors still run.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::ecs::behavior::{Behavior, BehaviorError, HookContext, HookResult};
use crate::ecs::EntityKey;
use crate::foundation::math::Vec2;
use crate::input::{KeyEvent, MouseButton};

/// A hook invocation with its phase parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hook<'k> {
    /// `on_create`
    Create,
    /// `on_input`
    Input,
    /// `on_update` with the elapsed milliseconds
    Update(f64),
    /// `on_key_pressed`
    KeyPressed(&'k KeyEvent),
    /// `on_key_released`
    KeyReleased(&'k KeyEvent),
    /// `on_activate`
    Activate,
    /// `on_deactivate`
    Deactivate,
    /// `on_mouse_in`
    MouseIn(Vec2),
    /// `on_mouse_out`
    MouseOut(Vec2),
    /// `on_mouse_click`
    MouseClick(Vec2, MouseButton),
    /// `on_mouse_pressed`
    MousePressed(Vec2, MouseButton),
    /// `on_mouse_released`
    MouseReleased(Vec2, MouseButton),
}

impl Hook<'_> {
    /// Hook method name, for fault reports
    pub fn name(&self) -> &'static str {
        match self {
            Self::Create => "on_create",
            Self::Input => "on_input",
            Self::Update(_) => "on_update",
            Self::KeyPressed(_) => "on_key_pressed",
            Self::KeyReleased(_) => "on_key_released",
            Self::Activate => "on_activate",
            Self::Deactivate => "on_deactivate",
            Self::MouseIn(_) => "on_mouse_in",
            Self::MouseOut(_) => "on_mouse_out",
            Self::MouseClick(..) => "on_mouse_click",
            Self::MousePressed(..) => "on_mouse_pressed",
            Self::MouseReleased(..) => "on_mouse_released",
        }
    }
}

/// Run `hook` on every behavior of `entity`, in attachment order.
///
/// Behaviors attached while the hook runs are kept and only see later hooks.
/// Returns the number of faults.
pub fn dispatch_entity(ctx: &mut HookContext<'_>, entity: EntityKey, hook: Hook<'_>) -> usize {
    let Some(target) = ctx.scene.get_mut(entity) else {
        return 0;
    };
    if target.behaviors.is_empty() {
        return 0;
    }
    let owner = target.name().to_string();
    let mut behaviors = std::mem::take(&mut target.behaviors);

    let mut faults = 0;
    for behavior in &mut behaviors {
        if let Err(error) = guarded(|| invoke(behavior.as_mut(), ctx, Some(entity), hook)) {
            report(&owner, behavior.as_ref(), hook, &error);
            faults += 1;
        }
    }

    // The entity may have been removed by one of its own hooks.
    if let Some(target) = ctx.scene.get_mut(entity) {
        let added = std::mem::replace(&mut target.behaviors, behaviors);
        target.behaviors.extend(added);
    }
    faults
}

/// Run a key hook on the scene-level behaviors, with no entity argument
pub fn dispatch_scene(ctx: &mut HookContext<'_>, hook: Hook<'_>) -> usize {
    let mut behaviors = ctx.scene.take_behaviors();
    let owner = format!("scene:{}", ctx.scene.name());

    let mut faults = 0;
    for behavior in &mut behaviors {
        if let Err(error) = guarded(|| invoke(behavior.as_mut(), ctx, None, hook)) {
            report(&owner, behavior.as_ref(), hook, &error);
            faults += 1;
        }
    }
    ctx.scene.restore_behaviors(behaviors);
    faults
}

fn invoke(
    behavior: &mut dyn Behavior,
    ctx: &mut HookContext<'_>,
    entity: Option<EntityKey>,
    hook: Hook<'_>,
) -> HookResult {
    // Scene behaviors only take key hooks.
    let Some(key) = entity else {
        return match hook {
            Hook::KeyPressed(event) => behavior.on_key_pressed(ctx, None, event),
            Hook::KeyReleased(event) => behavior.on_key_released(ctx, None, event),
            _ => Ok(()),
        };
    };
    match hook {
        Hook::Create => behavior.on_create(ctx, key),
        Hook::Input => behavior.on_input(ctx, key),
        Hook::Update(elapsed) => behavior.on_update(ctx, key, elapsed),
        Hook::KeyPressed(event) => behavior.on_key_pressed(ctx, Some(key), event),
        Hook::KeyReleased(event) => behavior.on_key_released(ctx, Some(key), event),
        Hook::Activate => behavior.on_activate(ctx, key),
        Hook::Deactivate => behavior.on_deactivate(ctx, key),
        Hook::MouseIn(pointer) => behavior.on_mouse_in(ctx, key, pointer),
        Hook::MouseOut(pointer) => behavior.on_mouse_out(ctx, key, pointer),
        Hook::MouseClick(pointer, button) => behavior.on_mouse_click(ctx, key, pointer, button),
        Hook::MousePressed(pointer, button) => behavior.on_mouse_pressed(ctx, key, pointer, button),
        Hook::MouseReleased(pointer, button) => behavior.on_mouse_released(ctx, key, pointer, button),
    }
}

/// Run `f`, turning a panic into [`BehaviorError::Panicked`]
pub(crate) fn guarded(f: impl FnOnce() -> HookResult) -> HookResult {
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
        Err(BehaviorError::Panicked { message: panic_message(payload.as_ref()) })
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

pub(crate) fn report(owner: &str, behavior: &dyn Behavior, hook: Hook<'_>, error: &BehaviorError) {
    log::error!("{} failed in {} of '{}': {}", behavior.name(), hook.name(), owner, error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RuntimeContext;
    use crate::ecs::Entity;
    use crate::input::InputState;
    use crate::physics::World;
    use crate::scene::SceneContent;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder {
        label: &'static str,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Behavior for Recorder {
        fn on_update(&mut self, ctx: &mut HookContext<'_>, entity: EntityKey, _elapsed: f64) -> HookResult {
            let name = ctx.entity(entity).map(|e| e.name().to_string()).unwrap_or_default();
            self.log.borrow_mut().push(format!("{}:{}", self.label, name));
            Ok(())
        }
    }

    struct Failing;

    impl Behavior for Failing {
        fn on_update(&mut self, _ctx: &mut HookContext<'_>, _entity: EntityKey, _elapsed: f64) -> HookResult {
            Err(BehaviorError::fault("boom"))
        }
    }

    struct Panicking;

    impl Behavior for Panicking {
        fn on_update(&mut self, _ctx: &mut HookContext<'_>, _entity: EntityKey, _elapsed: f64) -> HookResult {
            panic!("hook exploded");
        }
    }

    #[test]
    fn test_faults_do_not_stop_other_behaviors() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scene = SceneContent::new("test");
        let key = scene.add(
            Entity::new("hero")
                .with_behavior(Recorder { label: "first", log: log.clone() })
                .with_behavior(Failing)
                .with_behavior(Panicking)
                .with_behavior(Recorder { label: "last", log: log.clone() }),
        );
        let mut world = World::default();
        let input = InputState::default();
        let mut runtime = RuntimeContext::default();
        let mut ctx = HookContext { scene: &mut scene, world: &mut world, input: &input, runtime: &mut runtime };

        let faults = dispatch_entity(&mut ctx, key, Hook::Update(16.0));

        assert_eq!(faults, 2);
        assert_eq!(*log.borrow(), vec!["first:hero".to_string(), "last:hero".to_string()]);
        // behaviors are restored in order
        assert_eq!(scene.get(key).unwrap().behavior_count(), 4);
    }

    #[test]
    fn test_hook_names() {
        assert_eq!(Hook::Update(1.0).name(), "on_update");
        assert_eq!(Hook::MouseClick(Vec2::zeros(), MouseButton::Left).name(), "on_mouse_click");
    }
}
