//! # Game Key Codes
//!
//! Key codes the bridge queues into the game. The game reads plain ASCII
//! keypresses, so codes are just character values plus the two control keys.

/// A key code as understood by the host's key queue.
pub type KeyCode = u32;

/// Sentinel "no key" code returned by out-of-range lookups.
pub const KEY_NONE: KeyCode = 0;

/// Enter / Return.
pub const KEY_ENTER: KeyCode = 13;
/// Escape.
pub const KEY_ESCAPE: KeyCode = 27;

/// Inventory list.
pub const KEY_INVENTORY: KeyCode = b'i' as KeyCode;
/// Equipment list.
pub const KEY_EQUIPMENT: KeyCode = b'e' as KeyCode;
/// Dungeon map.
pub const KEY_MAP: KeyCode = b'M' as KeyCode;
/// Rest.
pub const KEY_REST: KeyCode = b'R' as KeyCode;
/// Search.
pub const KEY_SEARCH: KeyCode = b's' as KeyCode;

/// Movement keys in numeric-keypad layout:
///
/// ```text
/// 7 8 9
/// 4   6
/// 1 2 3
/// ```
pub const KEY_MOVE_UP: KeyCode = b'8' as KeyCode;
pub const KEY_MOVE_DOWN: KeyCode = b'2' as KeyCode;
pub const KEY_MOVE_LEFT: KeyCode = b'4' as KeyCode;
pub const KEY_MOVE_RIGHT: KeyCode = b'6' as KeyCode;
pub const KEY_MOVE_UP_LEFT: KeyCode = b'7' as KeyCode;
pub const KEY_MOVE_UP_RIGHT: KeyCode = b'9' as KeyCode;
pub const KEY_MOVE_DOWN_LEFT: KeyCode = b'1' as KeyCode;
pub const KEY_MOVE_DOWN_RIGHT: KeyCode = b'3' as KeyCode;

/// Renders a key code for the remap overlay.
///
/// # Examples
///
/// ```
/// use steamband_pad::input::keys::key_display_name;
///
/// assert_eq!(key_display_name(105), "'i' (105)");
/// assert_eq!(key_display_name(13), "Enter");
/// assert_eq!(key_display_name(27), "Escape");
/// assert_eq!(key_display_name(300), "Key 300");
/// ```
#[must_use]
pub fn key_display_name(code: KeyCode) -> String {
    match code {
        32..=126 => {
            // Printable ASCII, always a valid char
            let c = char::from_u32(code).unwrap_or('?');
            format!("'{}' ({})", c, code)
        }
        KEY_ENTER => "Enter".to_string(),
        KEY_ESCAPE => "Escape".to_string(),
        _ => format!("Key {}", code),
    }
}
