//! Snap demo application
//!
//! Runs the title and play scenes on a headless platform: frames are
//! recorded instead of shown and the input comes from a scripted
//! playthrough.
//!
//! Arguments are `key=value` settings (`w=800x600`, `d=2`, `ups=30`,
//! `frames=300`, ...) and optionally one `.properties`, `.toml` or `.ron`
//! configuration file, loaded before the settings are applied.

mod app;
mod scenes;
mod script;

use snap_engine::assets::{MemoryLoader, ResourceCache};
use snap_engine::config::ConfigError;
use snap_engine::core::EngineConfig;
use snap_engine::foundation::logging;
use snap_engine::platform::HeadlessPlatform;
use snap_engine::{Engine, EngineError};

use crate::app::DemoApp;

/// Upper bound on a headless run when nothing else stops the loop
const DEFAULT_MAX_FRAMES: u64 = 600;

#[derive(thiserror::Error, Debug)]
enum DemoError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
}

fn is_config_file(arg: &str) -> bool {
    !arg.contains('=')
        && [".properties", ".toml", ".ron"]
            .iter()
            .any(|ext| arg.ends_with(ext))
}

fn build_config(args: &[String]) -> Result<EngineConfig, ConfigError> {
    let (files, settings): (Vec<&String>, Vec<&String>) = args.iter().partition(|arg| is_config_file(arg));
    let mut config = match files.last() {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    config.apply_cli_args(settings);
    if config.max_frames.is_none() {
        config.max_frames = Some(DEFAULT_MAX_FRAMES);
    }
    Ok(config)
}

fn run() -> Result<(), DemoError> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = build_config(&args)?;
    logging::init_with_debug_level(config.debug_level);
    log::info!("Starting {} with {config:?}", config.title);

    let mut loader = MemoryLoader::new();
    scenes::register_resources(&mut loader);

    let mut platform = HeadlessPlatform::new(config.buffer.width, config.buffer.height).with_real_time(true);
    script::playthrough(&mut platform, &config);

    let mut engine = Engine::with_resources(config, ResourceCache::new(Box::new(loader)));
    engine.run(&mut DemoApp::new(), &mut platform)?;

    log::info!(
        "{} frames presented, last one with {} draw calls",
        platform.frames_presented(),
        platform.last_frame().len()
    );
    Ok(())
}

fn main() {
    if let Err(error) = run() {
        logging::init();
        log::error!("{error}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snap_engine::core::Size;

    #[test]
    fn test_settings_override_defaults() {
        let args = vec!["b=400x300".to_string(), "d=2".to_string(), "frames=12".to_string()];
        let config = build_config(&args).unwrap();
        assert_eq!(config.buffer, Size::new(400, 300));
        assert_eq!(config.debug_level, 2);
        assert_eq!(config.max_frames, Some(12));
    }

    #[test]
    fn test_headless_runs_are_bounded() {
        let config = build_config(&[]).unwrap();
        assert_eq!(config.max_frames, Some(DEFAULT_MAX_FRAMES));
    }

    #[test]
    fn test_config_file_detection() {
        assert!(is_config_file("demo.properties"));
        assert!(is_config_file("settings.toml"));
        assert!(!is_config_file("t=game.toml"));
        assert!(!is_config_file("d=1"));
    }

    #[test]
    fn test_scripted_playthrough_exits_from_play() {
        let config = build_config(&["x=false".to_string()]).unwrap();
        let mut loader = MemoryLoader::new();
        scenes::register_resources(&mut loader);
        let mut platform = HeadlessPlatform::new(config.buffer.width, config.buffer.height);
        script::playthrough(&mut platform, &config);

        let mut engine = Engine::with_resources(config, ResourceCache::new(Box::new(loader)));
        engine.run(&mut DemoApp::new(), &mut platform).unwrap();

        assert!(engine.runtime().exit_requested());
        assert_eq!(engine.runtime().stats.scene, "play");
        // the OK click at frame 151 ends the run, well before the Y key
        assert!(platform.frames_presented() <= 153);
    }
}
