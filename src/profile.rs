//! # Button Profile Module
//!
//! Loads and saves the mapping table as `controller.prf` in the user
//! directory.
//!
//! ## File Format
//!
//! One binding per line, fields separated by colons:
//!
//! ```text
//! # comment
//! BUTTON_NAME:key_code:repeat_delay_ms:repeat_rate_ms
//! DPAD_UP:56:200:50
//! X:105:0:0
//! ```
//!
//! | Field | Meaning |
//! |-------|---------|
//! | `BUTTON_NAME` | One of `A B X Y DPAD_UP DPAD_DOWN DPAD_LEFT DPAD_RIGHT START BACK LEFT_SHOULDER RIGHT_SHOULDER` |
//! | `key_code` | Key queued on press |
//! | `repeat_delay_ms` | Hold time before auto-repeat (0 with rate 0 = one-shot) |
//! | `repeat_rate_ms` | Interval between repeats |
//!
//! Parsing is forgiving: blank lines and `#` lines are skipped, unknown button
//! names skip the line, and numbers are read from their leading digits with
//! anything unparsable counting as 0. Later lines override earlier ones.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::controller::buttons::Button;
use crate::error::{PadError, Result};
use crate::input::bindings::MappingTable;
use crate::input::keys::KeyCode;

/// File name of the profile inside the user directory.
pub const PROFILE_FILE_NAME: &str = "controller.prf";

const PROFILE_HEADER: &str = "\
# Controller button mapping
#
# Format: BUTTON_NAME:key_code:repeat_delay_ms:repeat_rate_ms
#
# Buttons: A B X Y DPAD_UP DPAD_DOWN DPAD_LEFT DPAD_RIGHT
#          START BACK LEFT_SHOULDER RIGHT_SHOULDER
# Key codes are character values (105 = 'i', 13 = Enter, 27 = Escape).
# A delay and rate of 0 make the button fire once per press.
";

/// One parsed profile line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileEntry {
    pub button: Button,
    pub action_key: KeyCode,
    pub repeat_delay_ms: u32,
    pub repeat_rate_ms: u32,
}

/// Persistent storage for the mapping table.
#[cfg_attr(test, mockall::automock)]
pub trait ProfileStore {
    /// Applies the stored profile to `table`.
    ///
    /// # Returns
    ///
    /// `Ok(true)` if a profile was read, `Ok(false)` if there was nothing to
    /// read and `table` is untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile exists but cannot be read.
    fn load(&mut self, table: &mut MappingTable) -> Result<bool>;

    /// Writes every binding of `table`.
    ///
    /// # Errors
    ///
    /// Returns an error if there is nowhere to save or the write fails.
    fn save(&mut self, table: &MappingTable) -> Result<()>;
}

/// Reads a number the way C's `atoi` does: optional leading whitespace and
/// sign, then as many digits as there are. Negative values clamp to 0.
fn parse_number(field: &str) -> u32 {
    let field = field.trim_start();
    let (negative, digits) = match field.as_bytes().first() {
        Some(b'-') => (true, &field[1..]),
        Some(b'+') => (false, &field[1..]),
        _ => (false, field),
    };

    let value = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u32, |acc, d| acc.saturating_mul(10).saturating_add(u32::from(d - b'0')));

    if negative {
        0
    } else {
        value
    }
}

/// Parses one line. `None` for comments, blanks, unknown buttons and lines
/// without a key field.
#[must_use]
pub fn parse_line(line: &str) -> Option<ProfileEntry> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let mut fields = line.split(':').map(str::trim);
    let name = fields.next()?;
    let Some(button) = Button::from_name(name) else {
        debug!("Skipping profile line for unknown button {:?}", name);
        return None;
    };
    let action_key = parse_number(fields.next()?);
    let repeat_delay_ms = fields.next().map_or(0, parse_number);
    let repeat_rate_ms = fields.next().map_or(0, parse_number);

    Some(ProfileEntry {
        button,
        action_key,
        repeat_delay_ms,
        repeat_rate_ms,
    })
}

/// Parses a whole profile, in file order.
///
/// # Examples
///
/// ```
/// use steamband_pad::controller::buttons::Button;
/// use steamband_pad::profile::parse_profile;
///
/// let entries = parse_profile("# mine\nX:119:0:0\nBOGUS:1:2:3\n");
/// assert_eq!(entries.len(), 1);
/// assert_eq!(entries[0].button, Button::X);
/// assert_eq!(entries[0].action_key, 119);
/// ```
#[must_use]
pub fn parse_profile(text: &str) -> Vec<ProfileEntry> {
    text.lines().filter_map(parse_line).collect()
}

/// Applies a profile's entries to `table`, releasing each touched binding.
///
/// # Returns
///
/// Number of lines applied.
pub fn apply_profile(table: &mut MappingTable, text: &str) -> usize {
    let entries = parse_profile(text);
    for entry in &entries {
        table.apply(
            entry.button,
            entry.action_key,
            entry.repeat_delay_ms,
            entry.repeat_rate_ms,
        );
    }
    entries.len()
}

/// Renders `table` as profile text: the header, then one line per binding in
/// table order.
#[must_use]
pub fn render_profile(table: &MappingTable) -> String {
    let mut out = String::from(PROFILE_HEADER);
    out.push('\n');
    for binding in table.iter() {
        let (button, key, delay, rate) = binding.settings();
        out.push_str(&format!("{}:{}:{}:{}\n", button.name(), key, delay, rate));
    }
    out
}

/// [`ProfileStore`] backed by `<user_dir>/controller.prf`.
#[derive(Debug, Clone, Default)]
pub struct FileProfileStore {
    user_dir: Option<PathBuf>,
}

impl FileProfileStore {
    /// Creates a store. `None` means the user directory is not known, in
    /// which case loading is skipped and saving fails.
    #[must_use]
    pub fn new(user_dir: Option<PathBuf>) -> Self {
        Self { user_dir }
    }

    #[must_use]
    pub fn user_dir(&self) -> Option<&Path> {
        self.user_dir.as_deref()
    }

    /// Full path of the profile file, if the user directory is known.
    #[must_use]
    pub fn profile_path(&self) -> Option<PathBuf> {
        self.user_dir.as_ref().map(|dir| dir.join(PROFILE_FILE_NAME))
    }
}

impl ProfileStore for FileProfileStore {
    fn load(&mut self, table: &mut MappingTable) -> Result<bool> {
        let Some(path) = self.profile_path() else {
            info!("User directory not set, using default controller bindings");
            return Ok(false);
        };

        // Lossy decoding: a stray non-UTF-8 byte only spoils its own line
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(
                    "No controller profile at {}, using default bindings",
                    path.display()
                );
                return Ok(false);
            }
            Err(e) => return Err(PadError::Io(e)),
        };

        let applied = apply_profile(table, &String::from_utf8_lossy(&bytes));
        info!(
            "Loaded controller profile from {} ({} bindings)",
            path.display(),
            applied
        );
        Ok(true)
    }

    fn save(&mut self, table: &MappingTable) -> Result<()> {
        let (Some(dir), Some(path)) = (self.user_dir.as_ref(), self.profile_path()) else {
            return Err(PadError::Profile(
                "user directory not set, cannot save controller profile".to_string(),
            ));
        };

        fs::create_dir_all(dir)?;
        fs::write(&path, render_profile(table))?;
        info!("Saved controller profile to {}", path.display());
        Ok(())
    }
}
