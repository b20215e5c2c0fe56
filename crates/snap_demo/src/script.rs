//! Scripted playthrough fed to the headless platform

use snap_engine::core::EngineConfig;
use snap_engine::input::{InputEvent, KeyCode, KeyEvent, MouseButton};
use snap_engine::platform::HeadlessPlatform;

/// Schedule a short session: start from the menu, move the player around,
/// call reinforcements, open the exit dialog and confirm it.
pub fn playthrough(platform: &mut HeadlessPlatform, config: &EngineConfig) {
    let press = |code| InputEvent::KeyPressed(KeyEvent::new(code));
    let release = |code| InputEvent::KeyReleased(KeyEvent::new(code));

    platform
        .schedule(30, release(KeyCode::ENTER))
        .schedule(40, press(KeyCode::RIGHT))
        .schedule(70, release(KeyCode::RIGHT))
        .schedule(75, press(KeyCode::UP))
        .schedule(90, release(KeyCode::UP))
        .schedule(100, release(KeyCode::PAGE_UP))
        .schedule(130, release(KeyCode::ESCAPE));

    // The OK button sits in the bottom-right corner of the centered dialog.
    let (bw, bh) = (f64::from(config.buffer.width), f64::from(config.buffer.height));
    let (ww, wh) = (f64::from(config.window.width), f64::from(config.window.height));
    let ok = (bw * 0.5 + 46.0, bh * 0.5 + 10.0);
    platform
        .schedule(150, InputEvent::MouseMoved { x: ok.0 * ww / bw, y: ok.1 * wh / bh })
        .schedule(151, InputEvent::MouseClicked(MouseButton::Left))
        // in case the click missed
        .schedule(180, release(KeyCode::Y));
}
