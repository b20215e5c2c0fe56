//! Main engine implementation
//!
//! [`Engine`] owns every subsystem and drives the frame-synchronous loop:
//! poll events, input phase, update phase, render, present, sleep. Requests
//! made by hooks are queued on the [`RuntimeContext`] and applied between
//! phases, so nothing re-enters the scene manager while a hook runs.

use std::time::Instant;

use crate::application::Application;
use crate::assets::ResourceCache;
use crate::config::ConfigError;
use crate::core::{Command, EngineConfig, RuntimeContext};
use crate::ecs::behavior::{DrawContext, HookContext};
use crate::ecs::systems::{
    dispatch_key, flush_creates, run_input, run_update, set_visible, Hook, PickingSystem,
};
use crate::foundation::time::{frame_sleep, FrameTimer, RateCounter, MIN_ELAPSED_MS};
use crate::input::{InputEvent, InputState, KeyCode, KeyEvent, Modifiers};
use crate::physics::World;
use crate::platform::Platform;
use crate::render::{Color, Renderer, Surface};
use crate::scene::{Scene, SceneError, SceneManager, SceneServices};

/// Rounds of command application before a self-feeding queue is dropped
const MAX_COMMAND_ROUNDS: usize = 16;

/// Main engine struct that coordinates all subsystems
pub struct Engine {
    config: EngineConfig,
    world: World,
    input: InputState,
    runtime: RuntimeContext,
    resources: ResourceCache,
    scenes: SceneManager,
    renderer: Renderer,
    picking: PickingSystem,
    fps: RateCounter,
    ups: RateCounter,
    last_elapsed: f64,
}

impl Engine {
    /// Create an engine with an in-memory resource loader
    pub fn new(config: EngineConfig) -> Self {
        Self::with_resources(config, ResourceCache::default())
    }

    /// Create an engine on top of an existing resource cache
    pub fn with_resources(config: EngineConfig, resources: ResourceCache) -> Self {
        log::info!(
            "Initializing engine '{}': window {}x{}, buffer {}x{}, play area {}x{}, {} ups",
            config.title,
            config.window.width,
            config.window.height,
            config.buffer.width,
            config.buffer.height,
            config.play_area.width,
            config.play_area.height,
            config.ups,
        );
        let input = InputState::new(
            config.window.width,
            config.window.height,
            config.buffer.width,
            config.buffer.height,
        );
        Self {
            world: World::from_config(&config),
            runtime: RuntimeContext::new(config.debug_level),
            input,
            resources,
            scenes: SceneManager::new(),
            renderer: Renderer::new(),
            picking: PickingSystem::new(),
            fps: RateCounter::new(),
            ups: RateCounter::new(),
            last_elapsed: MIN_ELAPSED_MS,
            config,
        }
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Simulation world
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable simulation world
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Key table and pointer
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Runtime switches, stats and command queue
    pub fn runtime(&self) -> &RuntimeContext {
        &self.runtime
    }

    /// Mutable runtime context
    pub fn runtime_mut(&mut self) -> &mut RuntimeContext {
        &mut self.runtime
    }

    /// Resource cache
    pub fn resources_mut(&mut self) -> &mut ResourceCache {
        &mut self.resources
    }

    /// Scene registry
    pub fn scenes(&self) -> &SceneManager {
        &self.scenes
    }

    /// Mutable scene registry
    pub fn scenes_mut(&mut self) -> &mut SceneManager {
        &mut self.scenes
    }

    /// Renderer, for plugin registration
    pub fn renderer_mut(&mut self) -> &mut Renderer {
        &mut self.renderer
    }

    /// Register a scene and run its `load` step
    pub fn add_scene(&mut self, scene: impl Scene + 'static) -> Result<(), EngineError> {
        self.scenes.register(Box::new(scene), &mut self.resources)?;
        Ok(())
    }

    /// Switch to (or rebuild) the scene `name`
    pub fn activate_scene(&mut self, name: &str) -> Result<(), EngineError> {
        let mut services = SceneServices {
            world: &mut self.world,
            config: &self.config,
            resources: &mut self.resources,
            runtime: &mut self.runtime,
            input: &self.input,
        };
        let result = self.scenes.activate_scene(name, &mut services);
        self.picking.reset();
        self.refresh_counts();
        result.map_err(EngineError::from)
    }

    /// Reset and rebuild the active scene
    pub fn reset_scene(&mut self) -> Result<(), EngineError> {
        let mut services = SceneServices {
            world: &mut self.world,
            config: &self.config,
            resources: &mut self.resources,
            runtime: &mut self.runtime,
            input: &self.input,
        };
        let result = self.scenes.reset_active(&mut services);
        self.picking.reset();
        self.refresh_counts();
        result.map_err(EngineError::from)
    }

    /// Route one platform event to the input table, the active scene and
    /// the global keys, then apply whatever the hooks requested.
    pub fn handle_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::KeyPressed(key) => {
                self.input.set_key_state(key.code, true);
                if let Some(mut ctx) = hook_context(&mut self.scenes, &mut self.world, &self.input, &mut self.runtime) {
                    dispatch_key(&mut ctx, Hook::KeyPressed(key));
                }
            }
            InputEvent::KeyReleased(key) => {
                // The table is updated first, so Control is still held when Z is released.
                self.input.set_key_state(key.code, false);
                if let Some(mut ctx) = hook_context(&mut self.scenes, &mut self.world, &self.input, &mut self.runtime) {
                    dispatch_key(&mut ctx, Hook::KeyReleased(key));
                }
                self.handle_global_key(key);
            }
            InputEvent::MouseMoved { x, y } => {
                self.input.set_mouse_from_window(*x, *y);
                let pointer = self.input.mouse();
                if let Some(mut ctx) = hook_context(&mut self.scenes, &mut self.world, &self.input, &mut self.runtime) {
                    self.picking.handle_move(&mut ctx, pointer);
                }
            }
            InputEvent::MousePressed(button) => {
                let pointer = self.input.mouse();
                if let Some(mut ctx) = hook_context(&mut self.scenes, &mut self.world, &self.input, &mut self.runtime) {
                    self.picking.handle_pressed(&mut ctx, pointer, *button);
                }
            }
            InputEvent::MouseReleased(button) => {
                let pointer = self.input.mouse();
                if let Some(mut ctx) = hook_context(&mut self.scenes, &mut self.world, &self.input, &mut self.runtime) {
                    self.picking.handle_released(&mut ctx, pointer, *button);
                }
            }
            InputEvent::MouseClicked(button) => {
                let pointer = self.input.mouse();
                if let Some(mut ctx) = hook_context(&mut self.scenes, &mut self.world, &self.input, &mut self.runtime) {
                    self.picking.handle_clicked(&mut ctx, pointer, *button);
                }
            }
            InputEvent::CloseRequested => self.runtime.set_exit(true),
        }
        self.after_phase();
    }

    fn handle_global_key(&mut self, key: &KeyEvent) {
        let ctrl = key.ctrl() || self.input.modifiers().contains(Modifiers::CTRL);
        match key.code {
            KeyCode::Z if ctrl => self.runtime.request(Command::ResetScene),
            KeyCode::D if ctrl => self.runtime.cycle_debug_level(),
            KeyCode::P | KeyCode::PAUSE => self.runtime.toggle_pause(),
            _ => {}
        }
    }

    /// Run `on_input` on the active scene. Returns the number of hook faults.
    pub fn input_phase(&mut self) -> usize {
        let faults = hook_context(&mut self.scenes, &mut self.world, &self.input, &mut self.runtime)
            .map_or(0, |mut ctx| run_input(&mut ctx));
        self.after_phase();
        faults
    }

    /// Run physics, boundaries, camera and `on_update` on the active scene.
    ///
    /// `elapsed` is in milliseconds and must be strictly positive.
    pub fn update_phase(&mut self, elapsed: f64) -> Result<usize, EngineError> {
        if !(elapsed.is_finite() && elapsed > 0.0) {
            return Err(EngineError::InvalidElapsed(elapsed));
        }
        self.last_elapsed = elapsed;
        self.ups.record(elapsed);
        self.runtime.stats.ups = self.ups.rate();

        let faults = hook_context(&mut self.scenes, &mut self.world, &self.input, &mut self.runtime)
            .map_or(0, |mut ctx| run_update(&mut ctx, elapsed));
        self.after_phase();
        Ok(faults)
    }

    /// Lay out and draw the active scene
    pub fn render(&mut self, surface: &mut dyn Surface) {
        self.fps.record(self.last_elapsed);
        self.runtime.stats.fps = self.fps.rate();
        self.runtime.stats.frame_count += 1;
        self.refresh_counts();

        let Some(scene) = self.scenes.active_content_mut() else {
            surface.clear(Color::BLACK);
            return;
        };
        self.renderer.layout(scene, &*surface);
        let ctx = DrawContext {
            scene: &*scene,
            world: &self.world,
            input: &self.input,
            runtime: &self.runtime,
        };
        self.renderer.draw(&ctx, surface);
    }

    /// Apply every queued command, including those queued while applying.
    pub fn apply_commands(&mut self) {
        for _ in 0..MAX_COMMAND_ROUNDS {
            if !self.runtime.has_commands() {
                return;
            }
            for command in self.runtime.drain_commands() {
                self.apply_command(command);
            }
        }
        let dropped = self.runtime.drain_commands();
        if !dropped.is_empty() {
            log::warn!("Dropping {} commands still queued after {MAX_COMMAND_ROUNDS} rounds", dropped.len());
        }
    }

    fn apply_command(&mut self, command: Command) {
        log::debug!("Applying {command:?}");
        match command {
            Command::ActivateScene(name) => {
                if let Err(error) = self.activate_scene(&name) {
                    log::error!("Unable to activate scene '{name}': {error}");
                }
            }
            Command::ResetScene => {
                if let Err(error) = self.reset_scene() {
                    log::error!("Unable to reset scene: {error}");
                }
            }
            Command::SetVisible { entity, visible } => {
                if let Some(mut ctx) = hook_context(&mut self.scenes, &mut self.world, &self.input, &mut self.runtime) {
                    set_visible(&mut ctx, entity, visible);
                    flush_creates(&mut ctx);
                }
            }
            Command::RequestExit => self.runtime.set_exit(true),
        }
    }

    fn after_phase(&mut self) {
        if let Some(mut ctx) = hook_context(&mut self.scenes, &mut self.world, &self.input, &mut self.runtime) {
            flush_creates(&mut ctx);
        }
        self.apply_commands();
    }

    fn refresh_counts(&mut self) {
        let (entities, active) = self
            .scenes
            .active_content()
            .map_or((0, 0), |scene| (scene.len(), scene.active_count()));
        self.runtime.stats.entity_count = entities;
        self.runtime.stats.active_count = active;
    }

    /// Whether the loop should stop after the frame just presented
    pub fn should_stop(&self) -> bool {
        self.runtime.exit_requested()
            || self.config.exit
            || self
                .config
                .max_frames
                .is_some_and(|max| self.runtime.stats.frame_count >= max)
    }

    /// Run the application until exit.
    ///
    /// `initialize` must leave an active scene behind, otherwise the loop
    /// refuses to start.
    pub fn run<A, P>(&mut self, app: &mut A, platform: &mut P) -> Result<(), EngineError>
    where
        A: Application + ?Sized,
        P: Platform + ?Sized,
    {
        log::info!("Initializing application");
        app.initialize(self)
            .map_err(|e| EngineError::ApplicationError(e.to_string()))?;

        if self.scenes.active_name().is_none() {
            app.cleanup(self);
            return Err(EngineError::NoActiveScene);
        }

        let result = self.frame_loop(app, platform);

        log::info!("Frame loop ended after {} frames", self.runtime.stats.frame_count);
        app.cleanup(self);
        self.scenes.dispose_all();
        result
    }

    fn frame_loop<A, P>(&mut self, app: &mut A, platform: &mut P) -> Result<(), EngineError>
    where
        A: Application + ?Sized,
        P: Platform + ?Sized,
    {
        let mut timer = FrameTimer::new();
        let mut elapsed = MIN_ELAPSED_MS;

        loop {
            let started = Instant::now();

            for event in platform.poll_events() {
                if !app.handle_event(self, &event) {
                    self.handle_event(&event);
                }
            }
            if self.scenes.active_name().is_none() {
                return Err(EngineError::NoActiveScene);
            }

            self.input_phase();
            self.update_phase(elapsed)?;
            app.update(self, elapsed)
                .map_err(|e| EngineError::ApplicationError(e.to_string()))?;

            self.render(platform.surface());
            platform.present();

            if self.should_stop() {
                return Ok(());
            }

            let frame_time = started.elapsed().as_secs_f64() * 1000.0;
            self.runtime.stats.frame_time_ms = frame_time;
            platform.sleep(frame_sleep(self.config.ups, frame_time));

            timer.tick();
            elapsed = timer.delta_ms();
        }
    }
}

fn hook_context<'a>(
    scenes: &'a mut SceneManager,
    world: &'a mut World,
    input: &'a InputState,
    runtime: &'a mut RuntimeContext,
) -> Option<HookContext<'a>> {
    let scene = scenes.active_content_mut()?;
    Some(HookContext { scene, world, input, runtime })
}

/// Engine errors
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    /// The loop has no scene to run
    #[error("No active scene")]
    NoActiveScene,

    /// Scene lifecycle error
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Zero, negative or non-finite frame time handed to the update phase
    #[error("Invalid elapsed time: {0} ms")]
    InvalidElapsed(f64),

    /// Application error
    #[error("Application error: {0}")]
    ApplicationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::behavior::HookResult;
    use crate::ecs::{Behavior, Entity, EntityKey};
    use crate::render::RecordingSurface;
    use crate::scene::SceneEnv;

    struct Counting {
        count: usize,
    }

    impl Scene for Counting {
        fn name(&self) -> &str {
            "counting"
        }

        fn create(&mut self, env: &mut SceneEnv<'_>) -> Result<(), SceneError> {
            for i in 0..self.count {
                env.content.add(Entity::new(format!("e{i}")).with_position(10.0 * i as f64, 10.0));
            }
            Ok(())
        }
    }

    struct Hider;

    impl Behavior for Hider {
        fn on_key_released(&mut self, ctx: &mut HookContext<'_>, _: Option<EntityKey>, key: &KeyEvent) -> HookResult {
            if key.code == KeyCode::N {
                if let Some(target) = ctx.find("e0") {
                    ctx.runtime.set_visible(target, false);
                }
            }
            Ok(())
        }
    }

    fn engine_with(count: usize) -> Engine {
        let mut engine = Engine::new(EngineConfig::default());
        engine.add_scene(Counting { count }).unwrap();
        engine.activate_scene("counting").unwrap();
        engine
    }

    #[test]
    fn test_activation_updates_stats() {
        let engine = engine_with(3);
        assert_eq!(engine.scenes().active_name(), Some("counting"));
        assert_eq!(engine.runtime().stats.entity_count, 3);
        assert_eq!(engine.runtime().stats.active_count, 3);
        assert_eq!(engine.runtime().stats.scene, "counting");
    }

    #[test]
    fn test_unknown_scene_is_an_error() {
        let mut engine = engine_with(1);
        assert!(matches!(
            engine.activate_scene("nowhere"),
            Err(EngineError::Scene(SceneError::UnknownScene(_)))
        ));
    }

    #[test]
    fn test_zero_elapsed_is_rejected() {
        let mut engine = engine_with(1);
        assert!(matches!(engine.update_phase(0.0), Err(EngineError::InvalidElapsed(_))));
        assert!(engine.update_phase(16.0).is_ok());
    }

    #[test]
    fn test_global_keys() {
        let mut engine = engine_with(2);
        engine.handle_event(&InputEvent::KeyReleased(KeyEvent::new(KeyCode::P)));
        assert!(engine.runtime().is_paused());

        engine.handle_event(&InputEvent::KeyPressed(KeyEvent::new(KeyCode::CONTROL)));
        engine.handle_event(&InputEvent::KeyReleased(KeyEvent::new(KeyCode::D)));
        assert_eq!(engine.runtime().debug_level(), 1);

        engine.handle_event(&InputEvent::KeyReleased(KeyEvent::new(KeyCode::Z)));
        assert_eq!(engine.runtime().stats.entity_count, 2);
        assert!(!engine.runtime().has_commands());
    }

    #[test]
    fn test_hook_commands_applied_after_dispatch() {
        let mut engine = engine_with(2);
        engine
            .scenes
            .active_content_mut()
            .unwrap()
            .add_behavior(Hider);

        engine.handle_event(&InputEvent::KeyReleased(KeyEvent::new(KeyCode::N)));
        let scene = engine.scenes().active_content().unwrap();
        assert!(!scene.entity("e0").unwrap().active);
        assert!(scene.entity("e1").unwrap().active);
    }

    #[test]
    fn test_close_request_stops_loop() {
        let mut engine = engine_with(1);
        assert!(!engine.should_stop());
        engine.handle_event(&InputEvent::CloseRequested);
        assert!(engine.should_stop());
    }

    #[test]
    fn test_render_counts_frames() {
        let mut engine = engine_with(1);
        let mut surface = RecordingSurface::new(320, 240);
        engine.render(&mut surface);
        engine.render(&mut surface);
        assert_eq!(engine.runtime().stats.frame_count, 2);
        assert!(!surface.commands().is_empty());
    }
}
