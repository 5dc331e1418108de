//! # Host Interfaces
//!
//! The two outbound seams to the game: its key-event queue and its text
//! terminal. The bridge only ever pushes key codes and draws/erases short
//! text runs; everything else about the terminal belongs to the host.

use crate::input::keys::KeyCode;

/// Text colours the overlays use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    White,
    Yellow,
    LightBlue,
}

/// The host's key-event queue.
#[cfg_attr(test, mockall::automock)]
pub trait KeySink {
    /// Queues one key press as if typed on the keyboard.
    fn key_press(&mut self, code: KeyCode);
}

/// The host's text terminal.
pub trait Screen {
    /// Draws at most `width` characters of `text` at column `x`, row `y`.
    fn put_text(&mut self, x: u16, y: u16, width: u16, color: Color, text: &str);

    /// Blanks `width` cells starting at column `x`, row `y`.
    fn erase(&mut self, x: u16, y: u16, width: u16);
}

impl KeySink for Vec<KeyCode> {
    fn key_press(&mut self, code: KeyCode) {
        self.push(code);
    }
}

/// Screen that discards everything; for hosts without a terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullScreen;

impl Screen for NullScreen {
    fn put_text(&mut self, _x: u16, _y: u16, _width: u16, _color: Color, _text: &str) {}

    fn erase(&mut self, _x: u16, _y: u16, _width: u16) {}
}

/// One recorded screen operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenOp {
    Text {
        x: u16,
        y: u16,
        width: u16,
        color: Color,
        text: String,
    },
    Erase {
        x: u16,
        y: u16,
        width: u16,
    },
}

/// Screen that keeps a log of every call. Handy for tests and for hosts that
/// want to replay overlay output later.
#[derive(Debug, Default, Clone)]
pub struct RecordingScreen {
    pub ops: Vec<ScreenOp>,
}

impl RecordingScreen {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All text drawn so far, in call order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            ScreenOp::Text { text, .. } => Some(text.as_str()),
            ScreenOp::Erase { .. } => None,
        })
    }

    /// Number of erase calls so far.
    #[must_use]
    pub fn erase_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, ScreenOp::Erase { .. }))
            .count()
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }
}

impl Screen for RecordingScreen {
    fn put_text(&mut self, x: u16, y: u16, width: u16, color: Color, text: &str) {
        self.ops.push(ScreenOp::Text {
            x,
            y,
            width,
            color,
            text: text.to_string(),
        });
    }

    fn erase(&mut self, x: u16, y: u16, width: u16) {
        self.ops.push(ScreenOp::Erase { x, y, width });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_key_sink_collects() {
        let mut keys: Vec<KeyCode> = Vec::new();
        keys.key_press(13);
        keys.key_press(u32::from(b'i'));
        assert_eq!(keys, vec![13, 105]);
    }

    #[test]
    fn test_recording_screen() {
        let mut screen = RecordingScreen::new();
        screen.put_text(10, 4, 30, Color::White, "Title");
        screen.erase(8, 3, 80);
        screen.put_text(10, 5, 18, Color::LightBlue, "Item");

        assert_eq!(screen.texts().collect::<Vec<_>>(), vec!["Title", "Item"]);
        assert_eq!(screen.erase_count(), 1);
        assert_eq!(
            screen.ops[1],
            ScreenOp::Erase {
                x: 8,
                y: 3,
                width: 80
            }
        );

        screen.clear();
        assert!(screen.ops.is_empty());
    }
}
