//! Runtime context shared by the frame loop and every behavior hook
//!
//! Holds the process-level switches (exit, pause, debug level), the frame
//! statistics and the queue of deferred requests hooks make to the engine.

use crate::core::config::MAX_DEBUG_LEVEL;
use crate::ecs::EntityKey;

/// Request made from inside a hook, applied by the engine between phases
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Make another scene the active one
    ActivateScene(String),
    /// Reset and rebuild the active scene
    ResetScene,
    /// Show or hide an entity and its children, firing activation hooks
    SetVisible {
        /// Target entity
        entity: EntityKey,
        /// New visibility
        visible: bool,
    },
    /// Stop the frame loop after the current iteration
    RequestExit,
}

/// Frame statistics reported by the debug overlay
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameStats {
    /// Rendered frames during the last complete second
    pub fps: u64,
    /// Updates during the last complete second
    pub ups: u64,
    /// Duration of the previous frame in milliseconds
    pub frame_time_ms: f64,
    /// Total frames since start
    pub frame_count: u64,
    /// Entities owned by the active scene
    pub entity_count: usize,
    /// Active entities owned by the active scene
    pub active_count: usize,
    /// Name of the active scene
    pub scene: String,
}

/// Explicit replacement for process-wide mutable flags
#[derive(Debug, Default)]
pub struct RuntimeContext {
    exit: bool,
    pause: bool,
    debug_level: u8,
    /// Frame statistics, updated by the engine loop
    pub stats: FrameStats,
    commands: Vec<Command>,
}

impl RuntimeContext {
    /// Create a context with the given debug level
    pub fn new(debug_level: u8) -> Self {
        Self {
            debug_level: debug_level.min(MAX_DEBUG_LEVEL),
            ..Self::default()
        }
    }

    /// Whether the loop should stop after the current iteration
    pub fn exit_requested(&self) -> bool {
        self.exit
    }

    /// Set or clear the exit request
    pub fn set_exit(&mut self, exit: bool) {
        if exit && !self.exit {
            log::info!("Exit requested");
        }
        self.exit = exit;
    }

    /// Whether world-space entities are frozen
    pub fn is_paused(&self) -> bool {
        self.pause
    }

    /// Freeze or resume world-space physics
    pub fn set_pause(&mut self, pause: bool) {
        self.pause = pause;
    }

    /// Flip the pause flag
    pub fn toggle_pause(&mut self) {
        self.pause = !self.pause;
        log::debug!("Pause is now {}", self.pause);
    }

    /// Current debug level (0..=5)
    pub fn debug_level(&self) -> u8 {
        self.debug_level
    }

    /// Set the debug level, clamped to the accepted range
    pub fn set_debug_level(&mut self, level: u8) {
        self.debug_level = level.min(MAX_DEBUG_LEVEL);
    }

    /// Step the debug level, wrapping back to 0 after the maximum
    pub fn cycle_debug_level(&mut self) {
        self.debug_level = if self.debug_level < MAX_DEBUG_LEVEL { self.debug_level + 1 } else { 0 };
        log::info!("Debug level set to {}", self.debug_level);
    }

    /// Whether the debug level is at least `level`
    pub fn is_debug_at_least(&self, level: u8) -> bool {
        self.debug_level >= level
    }

    /// Queue a request for the engine
    pub fn request(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Request a scene switch
    pub fn activate_scene(&mut self, name: impl Into<String>) {
        self.request(Command::ActivateScene(name.into()));
    }

    /// Request a visibility change
    pub fn set_visible(&mut self, entity: EntityKey, visible: bool) {
        self.request(Command::SetVisible { entity, visible });
    }

    /// Take all pending requests, oldest first
    pub fn drain_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    /// Whether requests are waiting
    pub fn has_commands(&self) -> bool {
        !self.commands.is_empty()
    }
}
