//! Demo application: registers the scenes and reports progress

use snap_engine::prelude::*;

use crate::scenes::{PlayScene, TitleScene};

/// Frames between two progress reports
const REPORT_EVERY: u64 = 120;

/// The demo application
#[derive(Debug, Default)]
pub struct DemoApp {
    last_scene: Option<String>,
}

impl DemoApp {
    /// Create the application
    pub fn new() -> Self {
        Self::default()
    }
}

impl Application for DemoApp {
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        log::info!("Initializing {}", engine.config().title);
        engine.add_scene(TitleScene::new())?;
        engine.add_scene(PlayScene::new())?;
        engine.activate_scene("title")?;
        Ok(())
    }

    fn update(&mut self, engine: &mut Engine, _elapsed: f64) -> Result<(), AppError> {
        let stats = &engine.runtime().stats;
        if self.last_scene.as_deref() != Some(stats.scene.as_str()) {
            log::info!("Now playing '{}' with {} entities", stats.scene, stats.entity_count);
            self.last_scene = Some(stats.scene.clone());
        }
        if stats.frame_count > 0 && stats.frame_count % REPORT_EVERY == 0 {
            log::debug!(
                "frame {} fps {} ups {} entities {}/{}",
                stats.frame_count,
                stats.fps,
                stats.ups,
                stats.active_count,
                stats.entity_count,
            );
        }
        Ok(())
    }

    fn cleanup(&mut self, engine: &mut Engine) {
        let stats = &engine.runtime().stats;
        log::info!("Demo ends on '{}' after {} frames", stats.scene, stats.frame_count);
    }
}
