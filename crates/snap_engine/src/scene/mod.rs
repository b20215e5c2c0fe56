//! Scene lifecycle
//!
//! A [`Scene`] describes how to build a set of entities; the
//! [`SceneManager`] owns every registered scene together with its
//! [`SceneContent`] and drives the lifecycle:
//!
//! ```text
//! Unloaded --load--> Loaded --create--> Created --activate--> Active
//!                                          ^                    |
//!                                          |                deactivate
//!                                          +----create---- Inactive
//! ```
//!
//! `create` always runs on a freshly reset content, so rebuilding never
//! accumulates entities.

pub mod camera;
pub mod content;
pub mod manager;

pub use content::SceneContent;
pub use manager::{SceneManager, SceneServices};

use std::fmt;

use thiserror::Error;

use crate::assets::ResourceCache;
use crate::core::{EngineConfig, RuntimeContext};
use crate::physics::World;

/// Lifecycle state of a registered scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneState {
    /// Not registered yet
    Unloaded,
    /// Resources acquired
    Loaded,
    /// Entities built
    Created,
    /// The one scene receiving input, update and draw
    Active,
    /// Lost active status; entities kept but inactive
    Inactive,
}

impl SceneState {
    /// Whether the lifecycle allows going from `self` to `to`
    pub fn can_transition(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Unloaded, Self::Loaded)
                | (Self::Loaded | Self::Created | Self::Active | Self::Inactive, Self::Created)
                | (Self::Created, Self::Active)
                | (Self::Active, Self::Inactive)
        )
    }
}

impl fmt::Display for SceneState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Scene errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// No scene registered under that name
    #[error("Unknown scene: {0}")]
    UnknownScene(String),

    /// `load` failed
    #[error("Scene '{scene}' failed to load: {reason}")]
    LoadFailed {
        /// Scene name
        scene: String,
        /// Cause
        reason: String,
    },

    /// `create` or `activate` failed
    #[error("Scene '{scene}' failed to build: {reason}")]
    CreateFailed {
        /// Scene name
        scene: String,
        /// Cause
        reason: String,
    },

    /// The lifecycle does not allow this transition
    #[error("Scene '{scene}' cannot go from {from} to {to}")]
    InvalidTransition {
        /// Scene name
        scene: String,
        /// Current state
        from: SceneState,
        /// Requested state
        to: SceneState,
    },

    /// An operation needs an active scene and there is none
    #[error("No active scene")]
    NoActiveScene,
}

impl SceneError {
    /// Build a [`SceneError::CreateFailed`]
    pub fn create_failed(scene: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::CreateFailed { scene: scene.into(), reason: reason.to_string() }
    }
}

/// What a scene sees while building or activating
pub struct SceneEnv<'a> {
    /// Content being built
    pub content: &'a mut SceneContent,
    /// Simulation world
    pub world: &'a mut World,
    /// Engine configuration (buffer size, play area...)
    pub config: &'a EngineConfig,
    /// Resource cache
    pub resources: &'a mut ResourceCache,
    /// Runtime switches
    pub runtime: &'a mut RuntimeContext,
}

/// A named, rebuildable set of entities and scene behaviors
pub trait Scene {
    /// Unique scene name
    fn name(&self) -> &str;

    /// One-time resource acquisition, on registration
    fn load(&mut self, resources: &mut ResourceCache) -> Result<(), SceneError> {
        let _ = resources;
        Ok(())
    }

    /// Build the entities and behaviors. Runs on every activation, on an
    /// empty content.
    fn create(&mut self, env: &mut SceneEnv<'_>) -> Result<(), SceneError>;

    /// Once per activation, after `create`
    fn activate(&mut self, env: &mut SceneEnv<'_>) -> Result<(), SceneError> {
        let _ = env;
        Ok(())
    }

    /// When another scene becomes active. Entities are marked inactive by
    /// the manager afterwards.
    fn deactivate(&mut self, env: &mut SceneEnv<'_>) {
        let _ = env;
    }

    /// On shutdown
    fn dispose(&mut self) {}
}
