//! Input state consumed by the frame loop and behavior hooks
//!
//! The platform layer feeds raw events in; the core only reads a boolean key
//! table and a pointer position expressed in rendering-buffer pixels.

use bitflags::bitflags;

use crate::foundation::math::Vec2;

/// Number of entries in the key-state table
pub const KEY_TABLE_SIZE: usize = 1024;

/// Platform key code, indexing the key-state table.
///
/// The named constants follow the classic desktop virtual-key numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyCode(pub u16);

#[allow(missing_docs)]
impl KeyCode {
    pub const BACKSPACE: Self = Self(8);
    pub const ENTER: Self = Self(10);
    pub const SHIFT: Self = Self(16);
    pub const CONTROL: Self = Self(17);
    pub const ALT: Self = Self(18);
    pub const PAUSE: Self = Self(19);
    pub const ESCAPE: Self = Self(27);
    pub const SPACE: Self = Self(32);
    pub const PAGE_UP: Self = Self(33);
    pub const PAGE_DOWN: Self = Self(34);
    pub const LEFT: Self = Self(37);
    pub const UP: Self = Self(38);
    pub const RIGHT: Self = Self(39);
    pub const DOWN: Self = Self(40);
    pub const A: Self = Self(65);
    pub const D: Self = Self(68);
    pub const G: Self = Self(71);
    pub const N: Self = Self(78);
    pub const P: Self = Self(80);
    pub const Q: Self = Self(81);
    pub const S: Self = Self(83);
    pub const W: Self = Self(87);
    pub const Y: Self = Self(89);
    pub const Z: Self = Self(90);
    pub const F11: Self = Self(122);
    pub const F12: Self = Self(123);
}

impl KeyCode {
    /// Key code of an ASCII letter or digit, case-insensitive
    pub fn from_char(c: char) -> Option<Self> {
        let upper = c.to_ascii_uppercase();
        if upper.is_ascii_uppercase() || upper.is_ascii_digit() {
            Some(Self(upper as u16))
        } else {
            None
        }
    }

    /// Index into the key-state table, if the code fits
    pub fn index(self) -> Option<usize> {
        let index = usize::from(self.0);
        (index < KEY_TABLE_SIZE).then_some(index)
    }
}

bitflags! {
    /// Modifier keys held while a key event fired
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Control
        const CTRL = 0b0001;
        /// Shift
        const SHIFT = 0b0010;
        /// Alt
        const ALT = 0b0100;
    }
}

/// A key press or release, as seen by key hooks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Key that changed
    pub code: KeyCode,
    /// Modifiers held at that time
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Key event without modifiers
    pub fn new(code: KeyCode) -> Self {
        Self { code, modifiers: Modifiers::empty() }
    }

    /// Key event with modifiers
    pub fn with_modifiers(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// Whether Control was held
    pub fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left button
    Left,
    /// Right button
    Right,
    /// Middle button
    Middle,
}

impl MouseButton {
    /// Conventional 1-based button number
    pub fn number(self) -> u8 {
        match self {
            Self::Left => 1,
            Self::Middle => 2,
            Self::Right => 3,
        }
    }
}

/// Raw event delivered by the platform layer
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A key went down
    KeyPressed(KeyEvent),
    /// A key went up
    KeyReleased(KeyEvent),
    /// Pointer moved, in window pixels
    MouseMoved {
        /// X in window pixels
        x: f64,
        /// Y in window pixels
        y: f64,
    },
    /// Mouse button went down
    MousePressed(MouseButton),
    /// Mouse button went up
    MouseReleased(MouseButton),
    /// Press and release without movement
    MouseClicked(MouseButton),
    /// The window asked to close
    CloseRequested,
}

/// Key table and pointer position for the current frame
#[derive(Debug, Clone)]
pub struct InputState {
    keys: Box<[bool; KEY_TABLE_SIZE]>,
    modifiers: Modifiers,
    mouse: Vec2,
    window_mouse: Vec2,
    window_size: (f64, f64),
    buffer_size: (f64, f64),
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(640, 480, 320, 240)
    }
}

impl InputState {
    /// Create an input state for the given window and buffer sizes
    pub fn new(window_width: u32, window_height: u32, buffer_width: u32, buffer_height: u32) -> Self {
        Self {
            keys: Box::new([false; KEY_TABLE_SIZE]),
            modifiers: Modifiers::empty(),
            mouse: Vec2::zeros(),
            window_mouse: Vec2::zeros(),
            window_size: (f64::from(window_width), f64::from(window_height)),
            buffer_size: (f64::from(buffer_width), f64::from(buffer_height)),
        }
    }

    /// Record a key state change. Codes outside the table are ignored.
    pub fn set_key_state(&mut self, code: KeyCode, pressed: bool) {
        match code.index() {
            Some(index) => self.keys[index] = pressed,
            None => log::debug!("Key code {} is outside the key table", code.0),
        }
        let modifier = match code {
            KeyCode::CONTROL => Modifiers::CTRL,
            KeyCode::SHIFT => Modifiers::SHIFT,
            KeyCode::ALT => Modifiers::ALT,
            _ => return,
        };
        self.modifiers.set(modifier, pressed);
    }

    /// Whether the key is currently held
    pub fn is_key_pressed(&self, code: KeyCode) -> bool {
        code.index().is_some_and(|index| self.keys[index])
    }

    /// Modifier keys currently held
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Release every key
    pub fn clear_keys(&mut self) {
        self.keys.fill(false);
        self.modifiers = Modifiers::empty();
    }

    /// Pointer position in buffer pixels
    pub fn mouse(&self) -> Vec2 {
        self.mouse
    }

    /// Pointer position in window pixels
    pub fn window_mouse(&self) -> Vec2 {
        self.window_mouse
    }

    /// Set the pointer position directly in buffer pixels
    pub fn set_mouse(&mut self, x: f64, y: f64) {
        self.mouse = Vec2::new(x, y);
    }

    /// Set the pointer from window pixels, scaling into the buffer
    pub fn set_mouse_from_window(&mut self, x: f64, y: f64) {
        self.window_mouse = Vec2::new(x, y);
        let (ww, wh) = self.window_size;
        let (bw, bh) = self.buffer_size;
        let sx = if ww > 0.0 { bw / ww } else { 1.0 };
        let sy = if wh > 0.0 { bh / wh } else { 1.0 };
        self.mouse = Vec2::new(x * sx, y * sy);
    }

    /// Update the window size used for pointer scaling
    pub fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_size = (f64::from(width), f64::from(height));
    }

    /// Update the buffer size used for pointer scaling
    pub fn set_buffer_size(&mut self, width: u32, height: u32) {
        self.buffer_size = (f64::from(width), f64::from(height));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_table() {
        let mut input = InputState::default();
        input.set_key_state(KeyCode::LEFT, true);
        assert!(input.is_key_pressed(KeyCode::LEFT));
        assert!(!input.is_key_pressed(KeyCode::RIGHT));
        input.set_key_state(KeyCode::LEFT, false);
        assert!(!input.is_key_pressed(KeyCode::LEFT));

        // out of range codes never panic
        input.set_key_state(KeyCode(5000), true);
        assert!(!input.is_key_pressed(KeyCode(5000)));
    }

    #[test]
    fn test_modifiers_follow_keys() {
        let mut input = InputState::default();
        input.set_key_state(KeyCode::CONTROL, true);
        assert!(input.modifiers().contains(Modifiers::CTRL));
        input.set_key_state(KeyCode::CONTROL, false);
        assert!(input.modifiers().is_empty());
    }

    #[test]
    fn test_mouse_scaled_to_buffer() {
        let mut input = InputState::new(640, 480, 320, 240);
        input.set_mouse_from_window(100.0, 50.0);
        assert_eq!(input.mouse(), Vec2::new(50.0, 25.0));
        assert_eq!(input.window_mouse(), Vec2::new(100.0, 50.0));
    }

    #[test]
    fn test_key_from_char() {
        assert_eq!(KeyCode::from_char('z'), Some(KeyCode::Z));
        assert_eq!(KeyCode::from_char('#'), None);
    }
}
