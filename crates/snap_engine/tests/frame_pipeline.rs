//! Headless runs of the complete frame loop

use snap_engine::prelude::*;
use snap_engine::ui::menu::menu;
use snap_engine::ui::widgets::button;

struct Title;

impl Scene for Title {
    fn name(&self) -> &str {
        "title"
    }

    fn create(&mut self, env: &mut SceneEnv<'_>) -> Result<(), SceneError> {
        let data = MenuData::new(TextData::new("Snap")).with_item("Start", 1).with_item("Quit", 2);
        env.content.add(menu("menu", data, |ctx, _, item| {
            match item.value {
                1 => ctx.runtime.activate_scene("play"),
                _ => ctx.runtime.request(Command::RequestExit),
            }
            Ok(())
        }));
        Ok(())
    }
}

struct Play;

impl Scene for Play {
    fn name(&self) -> &str {
        "play"
    }

    fn create(&mut self, env: &mut SceneEnv<'_>) -> Result<(), SceneError> {
        env.content.add(
            Entity::new("player")
                .with_position(160.0, 120.0)
                .with_size(16.0, 16.0)
                .with_mass(10.0)
                .with_material(Material::new("player", 1.0, 0.998, 0.98)),
        );
        let mut ok = button("ok", "OK", Align::Left)
            .with_position(100.0, 100.0)
            .with_size(40.0, 12.0)
            .with_priority(20);
        ok.add_behavior(ClickCounter);
        env.content.add(ok);
        Ok(())
    }
}

struct ClickCounter;

impl Behavior for ClickCounter {
    fn on_mouse_click(
        &mut self,
        ctx: &mut HookContext<'_>,
        _entity: EntityKey,
        _pointer: Vec2,
        _button: MouseButton,
    ) -> HookResult {
        let clicks = ctx.scene.attributes.get_int("clicks", 0);
        ctx.scene.attributes.set("clicks", clicks + 1);
        Ok(())
    }
}

#[derive(Default)]
struct Recorder {
    scenes: Vec<String>,
    player_y: Vec<f64>,
}

impl Application for Recorder {
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        engine.add_scene(Title)?;
        engine.add_scene(Play)?;
        engine.activate_scene("title")?;
        Ok(())
    }

    fn update(&mut self, engine: &mut Engine, _elapsed: f64) -> Result<(), AppError> {
        let Some(scene) = engine.scenes().active_content() else {
            return Err(AppError::Custom("no scene".into()));
        };
        if self.scenes.last().map(String::as_str) != Some(scene.name()) {
            self.scenes.push(scene.name().to_string());
        }
        if let Some(player) = scene.entity("player") {
            self.player_y.push(player.bounds.y);
        }
        Ok(())
    }
}

struct Idle;

impl Application for Idle {
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        engine.add_scene(Title)?;
        Ok(())
    }
}

fn config(frames: u64) -> EngineConfig {
    EngineConfig { max_frames: Some(frames), ..EngineConfig::default() }
}

#[test]
fn test_menu_switches_scene_and_player_falls() {
    let mut platform = HeadlessPlatform::new(320, 240);
    platform.schedule(2, InputEvent::KeyReleased(KeyEvent::new(KeyCode::ENTER)));

    let mut engine = Engine::new(config(12));
    let mut app = Recorder::default();
    engine.run(&mut app, &mut platform).unwrap();

    assert_eq!(platform.frames_presented(), 12);
    assert_eq!(app.scenes, vec!["title".to_string(), "play".to_string()]);
    assert!(app.player_y.len() >= 2);
    assert!(app.player_y.windows(2).all(|pair| pair[1] >= pair[0]));
    assert!(app.player_y.last().unwrap() > &120.0);
}

#[test]
fn test_quit_item_requests_exit() {
    let mut platform = HeadlessPlatform::new(320, 240);
    platform
        .schedule(1, InputEvent::KeyReleased(KeyEvent::new(KeyCode::DOWN)))
        .schedule(1, InputEvent::KeyReleased(KeyEvent::new(KeyCode::SPACE)));

    let mut engine = Engine::new(config(100));
    engine.run(&mut Recorder::default(), &mut platform).unwrap();

    assert_eq!(platform.frames_presented(), 2);
    assert!(engine.runtime().exit_requested());
}

#[test]
fn test_auto_exit_runs_one_frame() {
    let mut platform = HeadlessPlatform::new(320, 240);
    let mut engine = Engine::new(EngineConfig { exit: true, ..EngineConfig::default() });
    engine.run(&mut Recorder::default(), &mut platform).unwrap();
    assert_eq!(platform.frames_presented(), 1);
}

#[test]
fn test_missing_active_scene_is_fatal() {
    let mut platform = HeadlessPlatform::new(320, 240);
    let mut engine = Engine::new(config(5));
    let result = engine.run(&mut Idle, &mut platform);
    assert!(matches!(result, Err(EngineError::NoActiveScene)));
    assert_eq!(platform.frames_presented(), 0);
}

#[test]
fn test_debug_overlay_reports_scene() {
    let mut platform = HeadlessPlatform::new(320, 240);
    let mut engine = Engine::new(EngineConfig { debug_level: 1, ..config(3) });
    engine.run(&mut Recorder::default(), &mut platform).unwrap();

    let texts = platform.last_frame_texts();
    let overlay = texts.last().copied().unwrap();
    assert!(overlay.starts_with("[ dbg:1 / fps:"));
    assert!(overlay.ends_with("/ scn:title ]"));
    assert!(overlay.contains("obj:0001 active:0001"));
}

#[test]
fn test_pointer_is_scaled_into_buffer_for_clicks() {
    let mut engine = Engine::new(EngineConfig::default());
    engine.add_scene(Play).unwrap();
    engine.activate_scene("play").unwrap();

    // window 640x480 over a 320x240 buffer: (240, 212) lands on (120, 106)
    engine.handle_event(&InputEvent::MouseMoved { x: 240.0, y: 212.0 });
    engine.handle_event(&InputEvent::MouseClicked(MouseButton::Left));
    engine.handle_event(&InputEvent::MouseMoved { x: 20.0, y: 20.0 });
    engine.handle_event(&InputEvent::MouseClicked(MouseButton::Left));

    let scene = engine.scenes().active_content().unwrap();
    assert_eq!(engine.input().mouse(), Vec2::new(10.0, 10.0));
    assert_eq!(scene.attributes.get_int("clicks", 0), 1);
    assert_eq!(scene.entity("ok").unwrap().fill_color, Color::GRAY);
}

#[test]
fn test_pause_freezes_world_entities() {
    let mut engine = Engine::new(EngineConfig::default());
    engine.add_scene(Play).unwrap();
    engine.activate_scene("play").unwrap();

    engine.handle_event(&InputEvent::KeyReleased(KeyEvent::new(KeyCode::PAUSE)));
    engine.update_phase(16.0).unwrap();
    let y = engine.scenes().active_content().unwrap().entity("player").unwrap().bounds.y;
    assert_eq!(y, 120.0);

    engine.handle_event(&InputEvent::KeyReleased(KeyEvent::new(KeyCode::PAUSE)));
    engine.update_phase(16.0).unwrap();
    let y = engine.scenes().active_content().unwrap().entity("player").unwrap().bounds.y;
    assert!(y > 120.0);
}
