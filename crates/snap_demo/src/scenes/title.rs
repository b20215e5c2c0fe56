//! Title screen: background, texts and the start/quit menu

use snap_engine::ecs::kind::ImageData;
use snap_engine::prelude::*;
use snap_engine::ui::menu::menu;
use snap_engine::ui::widgets::text;

use super::{BACKGROUND, SCORE_FONT, TEXT_FONT};

/// Menu value starting the game
pub const START: i64 = 1;
/// Menu value leaving the demo
pub const QUIT: i64 = 2;

/// Title scene
#[derive(Debug, Default)]
pub struct TitleScene {
    score_font: Option<FontHandle>,
    text_font: Option<FontHandle>,
}

impl TitleScene {
    /// New title scene; fonts are resolved on registration
    pub fn new() -> Self {
        Self::default()
    }

    fn font(font: Option<&FontHandle>, size: u32) -> Option<FontHandle> {
        font.map(|f| f.with_size(size))
    }
}

impl Scene for TitleScene {
    fn name(&self) -> &str {
        "title"
    }

    fn load(&mut self, resources: &mut ResourceCache) -> Result<(), SceneError> {
        self.score_font = resources.font(SCORE_FONT);
        self.text_font = resources.font(TEXT_FONT);
        Ok(())
    }

    fn create(&mut self, env: &mut SceneEnv<'_>) -> Result<(), SceneError> {
        let area = env.world.play_area;
        let buffer_w = f64::from(env.config.buffer.width);
        let buffer_h = f64::from(env.config.buffer.height);

        env.content.add(
            Entity::new("forest")
                .with_kind(EntityKind::Image(ImageData { image: env.resources.image(BACKGROUND) }))
                .with_position(0.0, 0.0)
                .with_size(area.width, area.height),
        );

        let title = TextData::new("Demo01")
            .with_font(Self::font(self.score_font.as_ref(), 18))
            .with_align(Align::Center);
        env.content.add(
            text("game-title", title)
                .with_position(buffer_w * 0.5, buffer_h * 0.15)
                .with_border_color(Color::WHITE)
                .with_relative_to_camera(true),
        );

        let welcome = TextData::new("Welcome to the Snap demo")
            .with_font(Self::font(self.text_font.as_ref(), 8))
            .with_align(Align::Center);
        env.content.add(
            text("welcome-msg", welcome)
                .with_position(buffer_w * 0.5, buffer_h * 0.75)
                .with_border_color(Color::WHITE)
                .with_relative_to_camera(true),
        );

        let copyright = TextData::new("(c) SnapGames")
            .with_font(Self::font(self.text_font.as_ref(), 6))
            .with_align(Align::Right);
        env.content.add(
            text("copyright-msg", copyright)
                .with_position(buffer_w - 10.0, buffer_h - 20.0)
                .with_border_color(Color::WHITE)
                .with_relative_to_camera(true),
        );

        let choices = MenuData::new(TextData::new("Choose").with_font(Self::font(self.text_font.as_ref(), 10)))
            .with_item("Start", START)
            .with_item("Quit", QUIT);
        env.content.add(
            menu("menu", choices, |ctx, _, item| {
                match item.value {
                    START => ctx.runtime.activate_scene("play"),
                    QUIT => ctx.runtime.request(Command::RequestExit),
                    other => log::warn!("Unknown menu value {other}"),
                }
                Ok(())
            })
            .with_position(buffer_w * 0.3, buffer_h * 0.45),
        );
        Ok(())
    }
}
