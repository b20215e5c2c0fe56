//! Application trait and related types

use crate::config::ConfigError;
use crate::engine::{Engine, EngineError};
use crate::input::InputEvent;
use crate::scene::SceneError;

/// Main application trait that games implement.
///
/// The engine owns scenes, input and rendering; an application registers its
/// scenes in [`initialize`](Application::initialize) and may observe frames
/// and raw events afterwards.
#[allow(unused_variables)]
pub trait Application {
    /// Register scenes and pick the first active one
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError>;

    /// Called once per frame after the update phase; `elapsed` in milliseconds
    fn update(&mut self, engine: &mut Engine, elapsed: f64) -> Result<(), AppError> {
        Ok(())
    }

    /// Raw platform event, seen before the engine routes it.
    ///
    /// Return `true` to consume the event.
    fn handle_event(&mut self, engine: &mut Engine, event: &InputEvent) -> bool {
        false
    }

    /// Called once when the loop ends
    fn cleanup(&mut self, engine: &mut Engine) {}
}

/// Application-specific errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Engine error
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Custom application error
    #[error("Application error: {0}")]
    Custom(String),
}

impl From<SceneError> for AppError {
    fn from(error: SceneError) -> Self {
        Self::Engine(EngineError::Scene(error))
    }
}
