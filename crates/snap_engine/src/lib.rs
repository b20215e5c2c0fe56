//! # Snap Engine
//!
//! A small frame-synchronous 2D simulation runtime: scenes of entities with
//! attached behaviors, a simplified physics integrator, a tweening camera and
//! a priority-ordered renderer drawing onto an abstract surface.
//!
//! ## Features
//!
//! - **Scenes**: named entity collections with a checked lifecycle
//! - **Behaviors**: optional hooks, dispatched fail-soft
//! - **Physics**: gravity, forces, friction and play-area bounces
//! - **Rendering**: per-kind draw plugins, camera translation, debug overlay
//! - **UI**: texts, buttons, dialogs and menus built from entities
//! - **Headless**: a recording surface and scripted input for tests
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use snap_engine::prelude::*;
//!
//! struct Empty;
//!
//! impl Scene for Empty {
//!     fn name(&self) -> &str {
//!         "empty"
//!     }
//!
//!     fn create(&mut self, env: &mut SceneEnv<'_>) -> Result<(), SceneError> {
//!         env.content.add(Entity::new("box").with_position(10.0, 10.0));
//!         Ok(())
//!     }
//! }
//!
//! struct MyApp;
//!
//! impl Application for MyApp {
//!     fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
//!         engine.add_scene(Empty)?;
//!         engine.activate_scene("empty")?;
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EngineConfig { max_frames: Some(60), ..EngineConfig::default() };
//!     let mut platform = HeadlessPlatform::new(config.buffer.width, config.buffer.height);
//!     let mut engine = Engine::new(config);
//!     engine.run(&mut MyApp, &mut platform)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod core;
pub mod foundation;
pub mod config;

// Simulation
pub mod ecs;
pub mod physics;
pub mod scene;

// Presentation
pub mod assets;
pub mod input;
pub mod render;
pub mod ui;
pub mod platform;

mod application;
mod engine;

pub use application::{Application, AppError};
pub use engine::{Engine, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        Application, AppError,
        Engine, EngineError,
        assets::{FontHandle, ImageHandle, MemoryLoader, ResourceCache},
        config::{Config, ConfigError, Properties},
        core::{Command, EngineConfig, RuntimeContext, Size},
        ecs::{
            AttributeValue, Behavior, BehaviorError, DrawContext, Entity, EntityKey, EntityKind,
            HookContext, HookResult,
        },
        foundation::math::{Rect, Vec2},
        input::{InputEvent, KeyCode, KeyEvent, Modifiers, MouseButton},
        physics::{Material, World},
        platform::{HeadlessPlatform, Platform},
        render::{Color, RecordingSurface, Surface},
        scene::{camera::camera, Scene, SceneEnv, SceneError, SceneState},
        ui::{Align, ButtonData, DialogData, MenuData, MenuItem, TextData},
    };
}
