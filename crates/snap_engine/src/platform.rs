//! Presentation seam
//!
//! The engine never opens windows. A [`Platform`] hands it raw input events
//! and a drawing [`Surface`] each frame, and shows the result on `present`.
//! [`HeadlessPlatform`] records frames instead and replays a scripted event
//! timeline, which is what the demo binary and the integration tests run on.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::input::InputEvent;
use crate::render::{DrawCommand, RecordingSurface, Surface};

/// Window/event collaborator driven by [`Engine::run`](crate::Engine::run)
pub trait Platform {
    /// Events received since the previous call, oldest first
    fn poll_events(&mut self) -> Vec<InputEvent>;

    /// Surface the renderer draws into this frame
    fn surface(&mut self) -> &mut dyn Surface;

    /// Show the frame drawn into [`surface`](Platform::surface)
    fn present(&mut self);

    /// End-of-frame pause
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Platform without a window: recorded frames and scripted input
#[derive(Debug)]
pub struct HeadlessPlatform {
    surface: RecordingSurface,
    script: BTreeMap<u64, Vec<InputEvent>>,
    frame: u64,
    last_frame: Vec<DrawCommand>,
    real_time: bool,
}

impl HeadlessPlatform {
    /// Headless platform with a buffer of the given size.
    ///
    /// Sleeps are skipped unless [`with_real_time`](Self::with_real_time) is set.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            surface: RecordingSurface::new(width, height),
            script: BTreeMap::new(),
            frame: 0,
            last_frame: Vec::new(),
            real_time: false,
        }
    }

    /// Honor end-of-frame sleeps
    pub fn with_real_time(mut self, real_time: bool) -> Self {
        self.real_time = real_time;
        self
    }

    /// Deliver `event` when frame `frame` polls (frames count from 0)
    pub fn schedule(&mut self, frame: u64, event: InputEvent) -> &mut Self {
        self.script.entry(frame).or_default().push(event);
        self
    }

    /// Deliver `event` on the next poll
    pub fn push_event(&mut self, event: InputEvent) -> &mut Self {
        self.schedule(self.frame, event)
    }

    /// Frames presented so far
    pub fn frames_presented(&self) -> u64 {
        self.frame
    }

    /// Draw calls of the last presented frame
    pub fn last_frame(&self) -> &[DrawCommand] {
        &self.last_frame
    }

    /// Texts of the last presented frame, in draw order
    pub fn last_frame_texts(&self) -> Vec<&str> {
        self.last_frame
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Whether scripted events are still waiting
    pub fn has_pending_events(&self) -> bool {
        !self.script.is_empty()
    }
}

impl Platform for HeadlessPlatform {
    fn poll_events(&mut self) -> Vec<InputEvent> {
        // Anything scheduled for a frame that already passed is delivered now.
        let later = self.script.split_off(&(self.frame + 1));
        let due = std::mem::replace(&mut self.script, later);
        due.into_values().flatten().collect()
    }

    fn surface(&mut self) -> &mut dyn Surface {
        &mut self.surface
    }

    fn present(&mut self) {
        self.last_frame = self.surface.take_commands();
        log::trace!("Frame {} presented with {} draw calls", self.frame, self.last_frame.len());
        self.frame += 1;
    }

    fn sleep(&mut self, duration: Duration) {
        if self.real_time {
            std::thread::sleep(duration);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{KeyCode, KeyEvent};
    use crate::render::Color;

    #[test]
    fn test_scripted_events_follow_frames() {
        let mut platform = HeadlessPlatform::new(320, 240);
        platform
            .schedule(1, InputEvent::KeyPressed(KeyEvent::new(KeyCode::LEFT)))
            .schedule(0, InputEvent::MouseMoved { x: 4.0, y: 4.0 })
            .schedule(3, InputEvent::CloseRequested);

        assert_eq!(platform.poll_events(), vec![InputEvent::MouseMoved { x: 4.0, y: 4.0 }]);
        platform.present();
        assert_eq!(platform.poll_events().len(), 1);
        platform.present();
        assert!(platform.poll_events().is_empty());
        assert!(platform.has_pending_events());
        platform.present();
        assert_eq!(platform.poll_events(), vec![InputEvent::CloseRequested]);
        assert!(!platform.has_pending_events());
    }

    #[test]
    fn test_present_keeps_last_frame() {
        let mut platform = HeadlessPlatform::new(320, 240);
        platform.surface().clear(Color::BLACK);
        platform.surface().draw_text("score", 1.0, 2.0);
        platform.present();

        assert_eq!(platform.frames_presented(), 1);
        assert_eq!(platform.last_frame().len(), 2);
        assert_eq!(platform.last_frame_texts(), vec!["score"]);
    }
}
