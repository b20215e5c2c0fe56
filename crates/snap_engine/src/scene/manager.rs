//! Scene manager
//!
//! Owns every registered scene with its content and lifecycle state, and
//! guarantees a single active scene.

use std::collections::HashMap;

use crate::assets::ResourceCache;
use crate::core::{EngineConfig, RuntimeContext};
use crate::ecs::behavior::HookContext;
use crate::ecs::systems::simulation_system::flush_creates;
use crate::input::InputState;
use crate::physics::World;
use crate::scene::{Scene, SceneContent, SceneEnv, SceneError, SceneState};

/// Engine-owned state a transition needs besides the scenes themselves
pub struct SceneServices<'a> {
    /// Simulation world
    pub world: &'a mut World,
    /// Engine configuration
    pub config: &'a EngineConfig,
    /// Resource cache
    pub resources: &'a mut ResourceCache,
    /// Runtime switches and command queue
    pub runtime: &'a mut RuntimeContext,
    /// Key table and pointer
    pub input: &'a InputState,
}

struct SceneSlot {
    scene: Box<dyn Scene>,
    content: SceneContent,
    state: SceneState,
}

impl SceneSlot {
    fn transition(&mut self, to: SceneState) -> Result<(), SceneError> {
        if !self.state.can_transition(to) {
            return Err(SceneError::InvalidTransition {
                scene: self.content.name().to_string(),
                from: self.state,
                to,
            });
        }
        log::debug!("Scene '{}': {} -> {}", self.content.name(), self.state, to);
        self.state = to;
        Ok(())
    }
}

/// Registry of scenes with at most one active
#[derive(Default)]
pub struct SceneManager {
    scenes: HashMap<String, SceneSlot>,
    order: Vec<String>,
    active: Option<String>,
}

impl SceneManager {
    /// Empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a scene and run its `load` step.
    ///
    /// A scene registered under an existing name replaces it; the replaced
    /// scene is disposed and loses active status.
    pub fn register(&mut self, mut scene: Box<dyn Scene>, resources: &mut ResourceCache) -> Result<(), SceneError> {
        let name = scene.name().to_string();
        scene.load(resources)?;

        let mut slot = SceneSlot {
            content: SceneContent::new(name.clone()),
            scene,
            state: SceneState::Unloaded,
        };
        slot.transition(SceneState::Loaded)?;

        if let Some(mut previous) = self.scenes.insert(name.clone(), slot) {
            log::warn!("Scene '{name}' registered twice, replacing it");
            previous.scene.dispose();
            if self.active.as_deref() == Some(name.as_str()) {
                self.active = None;
            }
        } else {
            self.order.push(name.clone());
        }
        log::info!("Scene '{name}' loaded");
        Ok(())
    }

    /// Make `name` the active scene.
    ///
    /// The current scene (if any) is deactivated first, then the target is
    /// reset, rebuilt by `create`, its entities' `on_create` hooks run and
    /// finally `activate` is called. Activating the already active scene
    /// rebuilds it.
    pub fn activate_scene(&mut self, name: &str, services: &mut SceneServices<'_>) -> Result<(), SceneError> {
        if !self.scenes.contains_key(name) {
            return Err(SceneError::UnknownScene(name.to_string()));
        }
        if let Some(current) = self.active.take() {
            if current != name {
                self.deactivate(&current, services);
            }
        }

        let slot = self
            .scenes
            .get_mut(name)
            .ok_or_else(|| SceneError::UnknownScene(name.to_string()))?;
        Self::build(slot, services)?;
        slot.transition(SceneState::Active)?;

        self.active = Some(name.to_string());
        services.runtime.stats.scene = name.to_string();
        log::info!("Scene '{name}' is now active");
        Ok(())
    }

    /// Rebuild the active scene in place (reset, create, activate)
    pub fn reset_active(&mut self, services: &mut SceneServices<'_>) -> Result<(), SceneError> {
        let name = self.active.clone().ok_or(SceneError::NoActiveScene)?;
        log::info!("Resetting scene '{name}'");
        self.activate_scene(&name, services)
    }

    fn deactivate(&mut self, name: &str, services: &mut SceneServices<'_>) {
        let Some(slot) = self.scenes.get_mut(name) else {
            return;
        };
        {
            let mut env = SceneEnv {
                content: &mut slot.content,
                world: services.world,
                config: services.config,
                resources: services.resources,
                runtime: services.runtime,
            };
            slot.scene.deactivate(&mut env);
        }
        slot.content.deactivate_all();
        if let Err(error) = slot.transition(SceneState::Inactive) {
            log::warn!("{error}");
        }
        log::info!("Scene '{name}' deactivated");
    }

    fn build(slot: &mut SceneSlot, services: &mut SceneServices<'_>) -> Result<(), SceneError> {
        slot.content.reset();
        {
            let mut env = SceneEnv {
                content: &mut slot.content,
                world: services.world,
                config: services.config,
                resources: services.resources,
                runtime: services.runtime,
            };
            slot.scene.create(&mut env)?;
        }
        slot.transition(SceneState::Created)?;

        let mut ctx = HookContext {
            scene: &mut slot.content,
            world: services.world,
            input: services.input,
            runtime: services.runtime,
        };
        flush_creates(&mut ctx);

        let mut env = SceneEnv {
            content: &mut slot.content,
            world: services.world,
            config: services.config,
            resources: services.resources,
            runtime: services.runtime,
        };
        slot.scene.activate(&mut env)
    }

    /// Name of the active scene
    pub fn active_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Content of the active scene
    pub fn active_content(&self) -> Option<&SceneContent> {
        self.active.as_ref().and_then(|name| self.scenes.get(name)).map(|slot| &slot.content)
    }

    /// Mutable content of the active scene
    pub fn active_content_mut(&mut self) -> Option<&mut SceneContent> {
        let name = self.active.as_ref()?;
        self.scenes.get_mut(name).map(|slot| &mut slot.content)
    }

    /// Content of any registered scene
    pub fn content(&self, name: &str) -> Option<&SceneContent> {
        self.scenes.get(name).map(|slot| &slot.content)
    }

    /// Lifecycle state; unknown names are `Unloaded`
    pub fn state(&self, name: &str) -> SceneState {
        self.scenes.get(name).map_or(SceneState::Unloaded, |slot| slot.state)
    }

    /// Whether a scene is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.scenes.contains_key(name)
    }

    /// Registered scene names, in registration order
    pub fn names(&self) -> &[String] {
        &self.order
    }

    /// Number of registered scenes
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// Whether no scene is registered
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Dispose every scene, in registration order
    pub fn dispose_all(&mut self) {
        for name in &self.order {
            if let Some(slot) = self.scenes.get_mut(name) {
                slot.content.reset();
                slot.scene.dispose();
            }
        }
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::behavior::{Behavior, HookResult};
    use crate::ecs::{Entity, EntityKey};
    use std::cell::Cell;
    use std::rc::Rc;

    struct CountCreate(Rc<Cell<u32>>);

    impl Behavior for CountCreate {
        fn on_create(&mut self, _ctx: &mut HookContext<'_>, _entity: EntityKey) -> HookResult {
            self.0.set(self.0.get() + 1);
            Ok(())
        }
    }

    struct Crowd {
        name: &'static str,
        size: usize,
        creates: Rc<Cell<u32>>,
    }

    impl Scene for Crowd {
        fn name(&self) -> &str {
            self.name
        }

        fn create(&mut self, env: &mut SceneEnv<'_>) -> Result<(), SceneError> {
            for i in 0..self.size {
                env.content.add(Entity::new(format!("npc_{i}")).with_behavior(CountCreate(self.creates.clone())));
            }
            Ok(())
        }
    }

    struct Broken;

    impl Scene for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn create(&mut self, _env: &mut SceneEnv<'_>) -> Result<(), SceneError> {
            Err(SceneError::create_failed("broken", "no luck"))
        }
    }

    struct Fixture {
        world: World,
        config: EngineConfig,
        resources: ResourceCache,
        runtime: RuntimeContext,
        input: InputState,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                world: World::default(),
                config: EngineConfig::default(),
                resources: ResourceCache::default(),
                runtime: RuntimeContext::default(),
                input: InputState::default(),
            }
        }

        fn services(&mut self) -> SceneServices<'_> {
            SceneServices {
                world: &mut self.world,
                config: &self.config,
                resources: &mut self.resources,
                runtime: &mut self.runtime,
                input: &self.input,
            }
        }
    }

    fn manager_with(fixture: &mut Fixture, creates: &Rc<Cell<u32>>) -> SceneManager {
        let mut manager = SceneManager::new();
        manager
            .register(Box::new(Crowd { name: "title", size: 2, creates: creates.clone() }), &mut fixture.resources)
            .unwrap();
        manager
            .register(Box::new(Crowd { name: "play", size: 5, creates: creates.clone() }), &mut fixture.resources)
            .unwrap();
        manager
    }

    #[test]
    fn test_lifecycle_states() {
        let mut fixture = Fixture::new();
        let creates = Rc::new(Cell::new(0));
        let mut manager = manager_with(&mut fixture, &creates);
        assert_eq!(manager.state("title"), SceneState::Loaded);
        assert_eq!(manager.state("nope"), SceneState::Unloaded);

        manager.activate_scene("title", &mut fixture.services()).unwrap();
        assert_eq!(manager.state("title"), SceneState::Active);
        assert_eq!(manager.active_name(), Some("title"));
        assert_eq!(creates.get(), 2);

        manager.activate_scene("play", &mut fixture.services()).unwrap();
        assert_eq!(manager.state("title"), SceneState::Inactive);
        assert_eq!(manager.state("play"), SceneState::Active);
        assert_eq!(fixture.runtime.stats.scene, "play");
    }

    #[test]
    fn test_reactivation_rebuilds_without_duplicates() {
        let mut fixture = Fixture::new();
        let creates = Rc::new(Cell::new(0));
        let mut manager = manager_with(&mut fixture, &creates);

        manager.activate_scene("play", &mut fixture.services()).unwrap();
        manager.reset_active(&mut fixture.services()).unwrap();
        manager.activate_scene("title", &mut fixture.services()).unwrap();
        manager.activate_scene("play", &mut fixture.services()).unwrap();

        let content = manager.active_content().unwrap();
        assert_eq!(content.len(), 5);
        assert_eq!(content.store().len(), 5);
        assert_eq!(content.active_count(), 5);
        // every build fires on_create once per entity
        assert_eq!(creates.get(), 5 + 5 + 2 + 5);
    }

    #[test]
    fn test_deactivated_scene_keeps_inactive_entities() {
        let mut fixture = Fixture::new();
        let creates = Rc::new(Cell::new(0));
        let mut manager = manager_with(&mut fixture, &creates);

        manager.activate_scene("play", &mut fixture.services()).unwrap();
        manager.activate_scene("title", &mut fixture.services()).unwrap();

        let play = manager.content("play").unwrap();
        assert_eq!(play.len(), 5);
        assert_eq!(play.active_count(), 0);
    }

    #[test]
    fn test_unknown_and_failing_scenes() {
        let mut fixture = Fixture::new();
        let creates = Rc::new(Cell::new(0));
        let mut manager = manager_with(&mut fixture, &creates);
        manager.register(Box::new(Broken), &mut fixture.resources).unwrap();

        assert_eq!(
            manager.activate_scene("missing", &mut fixture.services()),
            Err(SceneError::UnknownScene("missing".into()))
        );
        assert!(matches!(
            manager.activate_scene("broken", &mut fixture.services()),
            Err(SceneError::CreateFailed { .. })
        ));
        assert_eq!(manager.active_name(), None);
        assert_eq!(manager.reset_active(&mut fixture.services()), Err(SceneError::NoActiveScene));
        assert_eq!(manager.names(), &["title".to_string(), "play".to_string(), "broken".to_string()]);
    }
}
