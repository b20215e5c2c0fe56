//! Core engine state: configuration and the runtime context
//!
//! ## Modules
//!
//! - **config**: engine settings, property and CLI layering
//! - **runtime**: exit/pause/debug switches, frame stats, deferred commands

pub mod config;
pub mod runtime;

pub use config::{EngineConfig, Size};
pub use runtime::{Command, FrameStats, RuntimeContext};
