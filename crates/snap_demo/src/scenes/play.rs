//! Play scene: a keyboard-driven player among bouncing enemies, tracked by
//! the camera, with a HUD and an exit confirmation dialog.

use rand::Rng;

use snap_engine::ecs::kind::{ImageData, ShapeData, ShapeNature};
use snap_engine::prelude::*;
use snap_engine::scene::camera::set_target;
use snap_engine::scene::SceneContent;
use snap_engine::ui::widgets::{button, dialog, text};

use super::{BACKGROUND, HEART, SCORE_FONT, TEXT_FONT};

/// Force unit applied by the arrow keys
pub const PLAYER_SPEED: f64 = 0.025;
/// Camera tween factor
pub const CAMERA_TWEEN: f64 = 0.01;
/// Name of the exit confirmation dialog
pub const EXIT_DIALOG: &str = "exitConfirmBox";
/// Enemies generated when the scene is built, in two batches
pub const ENEMY_BATCH: usize = 20;
/// Enemies added by PAGE_UP
pub const ENEMY_REINFORCEMENT: usize = 10;

const SCORE: &str = "score";
const LIFE: &str = "life";
const ENEMY_SERIAL: &str = "enemy_serial";

/// Play scene
#[derive(Debug, Default)]
pub struct PlayScene {
    score_font: Option<FontHandle>,
    text_font: Option<FontHandle>,
}

impl PlayScene {
    /// New play scene; fonts are resolved on registration
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scene for PlayScene {
    fn name(&self) -> &str {
        "play"
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
        let small_font = self.text_font.as_ref().map(|f| f.with_size(8));

        env.content.attributes.set(SCORE, 0);
        env.content.attributes.set(LIFE, 3);

        env.content.add(
            Entity::new("forest")
                .with_kind(EntityKind::Image(ImageData { image: env.resources.image(BACKGROUND) }))
                .with_position(0.0, 0.0)
                .with_size(area.width, area.height),
        );

        // HUD
        let score = TextData::new("%05d")
            .with_value(0)
            .with_font(self.score_font.as_ref().map(|f| f.with_size(18)));
        env.content.add(
            text(SCORE, score)
                .with_position(20.0, 16.0)
                .with_border_color(Color::WHITE)
                .with_relative_to_camera(true)
                .with_behavior(HudValue::new(SCORE)),
        );
        env.content.add(
            Entity::new("heart")
                .with_kind(EntityKind::Image(ImageData { image: env.resources.image(HEART) }))
                .with_position(buffer_w - 40.0, 3.0)
                .with_size(16.0, 16.0)
                .with_relative_to_camera(true),
        );
        let life = TextData::new("%01d").with_value(3).with_font(small_font.clone());
        env.content.add(
            text("Life", life)
                .with_position(buffer_w - 32.0, 16.0)
                .with_border_color(Color::WHITE)
                .with_relative_to_camera(true)
                .with_behavior(HudValue::new(LIFE)),
        );

        let mut rng = rand::thread_rng();
        spawn_enemies(env.content, area, ENEMY_BATCH, &mut rng);

        let player = env.content.add(
            Entity::new("player")
                .with_position(area.width * 0.5, area.height * 0.5)
                .with_size(16.0, 16.0)
                .with_priority(200)
                .with_material(Material::new("Player_MAT", 1.0, 0.998, 0.98))
                .with_mass(10.0)
                .with_behavior(PlayerControl),
        );

        spawn_enemies(env.content, area, ENEMY_BATCH, &mut rng);

        let cam = env.content.set_camera(
            camera("cam01", buffer_w, buffer_h, CAMERA_TWEEN).with_behavior(ViewportOverlay { font: small_font.clone() }),
        );
        set_target(env.content.store_mut(), cam, Some(player));

        let confirm = dialog(EXIT_DIALOG, "Quit the game ?", buffer_w, buffer_h)
            .with_size(140.0, 40.0)
            .with_position((buffer_w - 140.0) * 0.5, (buffer_h - 40.0) * 0.5)
            .with_fill_color(Color::DARK_GRAY)
            .with_border_color(Color::BLACK)
            .with_priority(10)
            .with_behavior(PauseWhileVisible)
            .with_behavior(ConfirmExit);
        let confirm = env.content.add(confirm);

        let ok = button("OK", "Ok", Align::Right)
            .with_active(false)
            .with_size(40.0, 12.0)
            .with_priority(20)
            .with_behavior(DialogButton::Confirm);
        let cancel = button("Cancel", "Cancel", Align::Left)
            .with_active(false)
            .with_size(40.0, 12.0)
            .with_priority(20)
            .with_behavior(DialogButton::Cancel);
        for child in [ok, cancel] {
            if env.content.add_child(confirm, child).is_none() {
                return Err(SceneError::create_failed("play", "exit dialog is missing"));
            }
        }

        env.content.add_behavior(PlayKeys);
        Ok(())
    }
}

/// Add `count` red ellipses at random positions with a random kick
fn spawn_enemies(content: &mut SceneContent, area: Rect, count: usize, rng: &mut impl Rng) {
    let first = content.attributes.get_int(ENEMY_SERIAL, 0);
    for i in 0..count {
        let priority = 100 + i as i32;
        content.add(
            Entity::new(format!("enemy_{}", first + i as i64))
                .with_kind(EntityKind::Shape(ShapeData::new(ShapeNature::Ellipse)))
                .with_position(area.width * rng.gen::<f64>(), area.height * rng.gen::<f64>())
                .with_size(8.0, 8.0)
                .with_priority(priority)
                .with_fill_color(Color::RED)
                .with_acceleration(0.25 - rng.gen::<f64>() * 0.5, 0.25 - rng.gen::<f64>() * 0.5)
                .with_material(Material::new("Enemy_MAT", 1.0, 0.96, 0.98))
                .with_mass(2.0 + 5.0 * rng.gen::<f64>()),
        );
    }
    content.attributes.set(ENEMY_SERIAL, first + count as i64);
}

/// Copies a scene attribute into the text value on every input phase
struct HudValue {
    attribute: &'static str,
}

impl HudValue {
    fn new(attribute: &'static str) -> Self {
        Self { attribute }
    }
}

impl Behavior for HudValue {
    fn on_input(&mut self, ctx: &mut HookContext<'_>, entity: EntityKey) -> HookResult {
        let value = ctx.scene.attributes.get_int(self.attribute, 0);
        if let Some(data) = ctx.require_mut(entity)?.kind.text_mut() {
            data.value = Some(value.into());
        }
        Ok(())
    }
}

/// Arrow keys push the player around
struct PlayerControl;

impl Behavior for PlayerControl {
    fn on_input(&mut self, ctx: &mut HookContext<'_>, entity: EntityKey) -> HookResult {
        let input = ctx.input;
        let mut push = Vec2::zeros();
        if input.is_key_pressed(KeyCode::UP) {
            push.y -= PLAYER_SPEED * 2.0;
        }
        if input.is_key_pressed(KeyCode::DOWN) {
            push.y += PLAYER_SPEED;
        }
        if input.is_key_pressed(KeyCode::LEFT) {
            push.x -= PLAYER_SPEED;
        }
        if input.is_key_pressed(KeyCode::RIGHT) {
            push.x += PLAYER_SPEED;
        }
        if push != Vec2::zeros() {
            ctx.require_mut(entity)?.apply_force(push);
        }
        Ok(())
    }
}

/// Camera overlay: viewport frame and camera name from debug level 2
struct ViewportOverlay {
    font: Option<FontHandle>,
}

impl Behavior for ViewportOverlay {
    fn on_draw(&self, ctx: &DrawContext<'_>, _entity: EntityKey, surface: &mut dyn Surface) -> HookResult {
        if !ctx.runtime.is_debug_at_least(2) {
            return Ok(());
        }
        let (width, height) = surface.size();
        let (width, height) = (f64::from(width), f64::from(height));
        let label = "cam01";
        surface.set_color(Color::ORANGE);
        surface.set_font(self.font.as_ref());
        let metrics = surface.text_metrics(label, self.font.as_ref());
        surface.draw_text(label, width - metrics.width - 10.0, height - 10.0);
        surface.draw_rect(Rect::new(10.0, 10.0, width - 20.0, height - 20.0));
        Ok(())
    }
}

/// Freezes the world while the dialog is shown
struct PauseWhileVisible;

impl Behavior for PauseWhileVisible {
    fn on_activate(&mut self, ctx: &mut HookContext<'_>, _entity: EntityKey) -> HookResult {
        ctx.runtime.set_pause(true);
        Ok(())
    }

    fn on_deactivate(&mut self, ctx: &mut HookContext<'_>, _entity: EntityKey) -> HookResult {
        ctx.runtime.set_pause(false);
        Ok(())
    }
}

/// Y or SPACE leaves, N or BACKSPACE closes the dialog
struct ConfirmExit;

impl Behavior for ConfirmExit {
    fn on_key_released(&mut self, ctx: &mut HookContext<'_>, entity: Option<EntityKey>, key: &KeyEvent) -> HookResult {
        let Some(entity) = entity else {
            return Ok(());
        };
        match key.code {
            KeyCode::Y | KeyCode::SPACE => ctx.runtime.request(Command::RequestExit),
            KeyCode::N | KeyCode::BACKSPACE => {
                ctx.runtime.set_exit(false);
                ctx.runtime.set_visible(entity, false);
            }
            _ => {}
        }
        Ok(())
    }
}

/// Click handlers of the dialog buttons
enum DialogButton {
    Confirm,
    Cancel,
}

impl Behavior for DialogButton {
    fn on_mouse_click(
        &mut self,
        ctx: &mut HookContext<'_>,
        entity: EntityKey,
        _pointer: Vec2,
        _button: MouseButton,
    ) -> HookResult {
        match self {
            Self::Confirm => ctx.runtime.request(Command::RequestExit),
            Self::Cancel => {
                ctx.runtime.set_exit(false);
                if let Some(dialog) = ctx.require_mut(entity)?.parent() {
                    ctx.runtime.set_visible(dialog, false);
                }
            }
        }
        ctx.require_mut(entity)?.fill_color = Color::CYAN;
        Ok(())
    }
}

/// Scene-wide keys
struct PlayKeys;

impl Behavior for PlayKeys {
    fn on_key_released(&mut self, ctx: &mut HookContext<'_>, _entity: Option<EntityKey>, key: &KeyEvent) -> HookResult {
        match key.code {
            KeyCode::ESCAPE => {
                let dialog = ctx
                    .find(EXIT_DIALOG)
                    .ok_or_else(|| BehaviorError::fault("exit dialog is missing"))?;
                ctx.runtime.set_visible(dialog, true);
            }
            KeyCode::PAGE_UP => {
                let area = ctx.world.play_area;
                spawn_enemies(ctx.scene, area, ENEMY_REINFORCEMENT, &mut rand::thread_rng());
            }
            KeyCode::G if key.ctrl() || ctx.input.modifiers().contains(Modifiers::CTRL) => {
                ctx.world.flip_gravity();
            }
            KeyCode::F12 => ctx.runtime.activate_scene("title"),
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenes::register_resources;

    fn engine() -> Engine {
        let mut loader = MemoryLoader::new();
        register_resources(&mut loader);
        let mut engine = Engine::with_resources(EngineConfig::default(), ResourceCache::new(Box::new(loader)));
        engine.add_scene(PlayScene::new()).unwrap();
        engine.activate_scene("play").unwrap();
        engine
    }

    fn release(engine: &mut Engine, code: KeyCode) {
        engine.handle_event(&InputEvent::KeyReleased(KeyEvent::new(code)));
    }

    #[test]
    fn test_scene_population() {
        let engine = engine();
        let scene = engine.scenes().active_content().unwrap();
        // forest, score, heart, life, player, dialog and 40 enemies
        assert_eq!(scene.len(), 46);
        assert!(scene.active_camera().is_some());
        let dialog = scene.entity(EXIT_DIALOG).unwrap();
        assert!(!dialog.active);
        assert_eq!(dialog.children().len(), 2);
        assert_eq!(scene.entity("player").unwrap().priority, 200);
    }

    #[test]
    fn test_page_up_adds_reinforcements() {
        let mut engine = engine();
        release(&mut engine, KeyCode::PAGE_UP);
        let scene = engine.scenes().active_content().unwrap();
        assert_eq!(scene.len(), 56);
        assert!(scene.entity("enemy_49").is_some());
    }

    #[test]
    fn test_escape_shows_dialog_and_pauses() {
        let mut engine = engine();
        release(&mut engine, KeyCode::ESCAPE);
        assert!(engine.runtime().is_paused());
        let scene = engine.scenes().active_content().unwrap();
        let dialog = scene.entity(EXIT_DIALOG).unwrap();
        assert!(dialog.active);
        assert!(dialog.children().iter().all(|&k| scene.get(k).unwrap().active));

        release(&mut engine, KeyCode::N);
        assert!(!engine.runtime().is_paused());
        assert!(!engine.scenes().active_content().unwrap().entity(EXIT_DIALOG).unwrap().active);
        assert!(!engine.runtime().exit_requested());
    }

    #[test]
    fn test_dialog_y_requests_exit() {
        let mut engine = engine();
        release(&mut engine, KeyCode::ESCAPE);
        release(&mut engine, KeyCode::Y);
        assert!(engine.runtime().exit_requested());
    }

    #[test]
    fn test_ctrl_g_flips_gravity() {
        let mut engine = engine();
        let gravity = engine.world().gravity;
        engine.handle_event(&InputEvent::KeyReleased(KeyEvent::with_modifiers(KeyCode::G, Modifiers::CTRL)));
        assert!((engine.world().gravity + gravity).abs() < f64::EPSILON);
        release(&mut engine, KeyCode::G);
        assert!((engine.world().gravity + gravity).abs() < f64::EPSILON);
    }

    #[test]
    fn test_player_pushed_by_arrows() {
        let mut engine = engine();
        engine.handle_event(&InputEvent::KeyPressed(KeyEvent::new(KeyCode::RIGHT)));
        engine.input_phase();
        engine.update_phase(16.0).unwrap();
        let player = engine.scenes().active_content().unwrap().entity("player").unwrap();
        assert!(player.acceleration.x > 0.0);
        assert!(player.bounds.x > 160.0);
    }

    #[test]
    fn test_hud_follows_attributes() {
        let mut engine = engine();
        if let Some(scene) = engine.scenes_mut().active_content_mut() {
            scene.attributes.set(SCORE, 42);
        }
        engine.input_phase();
        let scene = engine.scenes().active_content().unwrap();
        let score = scene.entity(SCORE).unwrap().kind.text().unwrap();
        assert_eq!(score.display_text(), "00042");
        let life = scene.entity("Life").unwrap().kind.text().unwrap();
        assert_eq!(life.display_text(), "3");
    }
}
