//! # Terminal Host
//!
//! Plain-terminal implementations of the host seams, used by the
//! `steamband-pad` binary:
//!
//! - [`StdoutKeys`] writes each key code to stdout as a character, so the
//!   output can be piped into a game that reads its keyboard from stdin
//! - [`AnsiScreen`] draws overlays with ANSI cursor positioning on stderr
//!
//! Write failures are logged at debug level and otherwise ignored; a closed
//! pipe must not take the bridge down.

use std::io::{self, Write};

use tracing::debug;

use crate::host::{Color, KeySink, Screen};
use crate::input::keys::{KeyCode, KEY_ENTER};

/// Key sink that writes characters to stdout.
#[derive(Debug)]
pub struct StdoutKeys<W: Write = io::Stdout> {
    out: W,
}

impl Default for StdoutKeys {
    fn default() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> StdoutKeys<W> {
    #[must_use]
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> KeySink for StdoutKeys<W> {
    fn key_press(&mut self, code: KeyCode) {
        // Enter goes out as a newline so line-buffered readers see it
        let c = match code {
            KEY_ENTER => '\n',
            _ => match char::from_u32(code) {
                Some(c) => c,
                None => {
                    debug!("Dropping key code {} with no character", code);
                    return;
                }
            },
        };

        let mut buf = [0u8; 4];
        let result = self
            .out
            .write_all(c.encode_utf8(&mut buf).as_bytes())
            .and_then(|()| self.out.flush());
        if let Err(e) = result {
            debug!("Failed to write key {}: {}", code, e);
        }
    }
}

/// Screen that draws with ANSI escape sequences.
///
/// Coordinates are zero-based columns and rows from the top-left corner.
#[derive(Debug)]
pub struct AnsiScreen<W: Write = io::Stderr> {
    out: W,
}

impl Default for AnsiScreen {
    fn default() -> Self {
        Self::new(io::stderr())
    }
}

fn sgr(color: Color) -> &'static str {
    match color {
        Color::White => "\x1b[37m",
        Color::Yellow => "\x1b[33m",
        Color::LightBlue => "\x1b[94m",
    }
}

impl<W: Write> AnsiScreen<W> {
    #[must_use]
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, x: u16, y: u16, body: &str) {
        let result = write!(
            self.out,
            "\x1b7\x1b[{};{}H{}\x1b[0m\x1b8",
            u32::from(y) + 1,
            u32::from(x) + 1,
            body
        )
        .and_then(|()| self.out.flush());
        if let Err(e) = result {
            debug!("Failed to draw overlay: {}", e);
        }
    }
}

impl<W: Write> Screen for AnsiScreen<W> {
    fn put_text(&mut self, x: u16, y: u16, width: u16, color: Color, text: &str) {
        let clipped: String = text.chars().take(usize::from(width)).collect();
        let body = format!("{}{}", sgr(color), clipped);
        self.emit(x, y, &body);
    }

    fn erase(&mut self, x: u16, y: u16, width: u16) {
        let blank = " ".repeat(usize::from(width));
        self.emit(x, y, &blank);
    }
}
