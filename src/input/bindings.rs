//! # Button Bindings Module
//!
//! The mapping table: one [`Binding`] per physical button, saying which key
//! the button types and how it auto-repeats while held.
//!
//! ## Default Bindings
//!
//! | Button | Key | Delay / Rate (ms) |
//! |--------|-----|-------------------|
//! | A | Enter | one-shot |
//! | B | Escape | one-shot |
//! | X | `i` (inventory) | one-shot |
//! | Y | `e` (equipment) | one-shot |
//! | D-Pad Up / Down / Left / Right | `8` / `2` / `4` / `6` | 200 / 50 |
//! | Start | Escape | one-shot |
//! | Back | `M` (map) | one-shot |
//! | Left shoulder | `R` (rest) | one-shot |
//! | Right shoulder | `s` (search) | one-shot |
//!
//! ## Index Accessors
//!
//! The remap overlay addresses bindings by position. Position lookups take a
//! signed index and answer with the sentinel `0` (or do nothing) when it is
//! negative or past the end, so callers never have to range-check first.
//!
//! ```
//! use steamband_pad::input::bindings::MappingTable;
//!
//! let mut table = MappingTable::default();
//! assert_eq!(table.len(), 12);
//! assert_eq!(table.button_code(0), 0x1000); // A
//! assert_eq!(table.button_code(-1), 0);
//! assert_eq!(table.key_code(12), 0);
//!
//! table.set_key_code(0, 'w' as u32);
//! assert_eq!(table.key_code(0), 'w' as u32);
//! ```

use crate::clock::Millis;
use crate::controller::buttons::{Button, ButtonSet};

use super::keys::{
    KeyCode, KEY_ENTER, KEY_EQUIPMENT, KEY_ESCAPE, KEY_INVENTORY, KEY_MAP, KEY_MOVE_DOWN,
    KEY_MOVE_LEFT, KEY_MOVE_RIGHT, KEY_MOVE_UP, KEY_NONE, KEY_REST, KEY_SEARCH,
};

/// Initial hold time before a D-Pad binding starts repeating.
pub const DPAD_REPEAT_DELAY_MS: u32 = 200;
/// Interval between D-Pad repeats once repeating.
pub const DPAD_REPEAT_RATE_MS: u32 = 50;

/// One button → key association plus its runtime press state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// Physical button.
    pub button: Button,
    /// Key queued when the button goes down (and on every repeat).
    pub action_key: KeyCode,
    /// Hold time before auto-repeat starts.
    pub repeat_delay_ms: u32,
    /// Interval between auto-repeats.
    pub repeat_rate_ms: u32,
    /// Whether the button was down on the last processed poll.
    pub pressed: bool,
    /// When the current press started (0 while released).
    pub press_time: Millis,
    /// When the last key for this press was queued (0 while released).
    pub last_repeat: Millis,
    /// Held through an overlay; stays silent until the button is released.
    pub suppressed: bool,
}

impl Binding {
    /// A released binding.
    #[must_use]
    pub const fn new(
        button: Button,
        action_key: KeyCode,
        repeat_delay_ms: u32,
        repeat_rate_ms: u32,
    ) -> Self {
        Self {
            button,
            action_key,
            repeat_delay_ms,
            repeat_rate_ms,
            pressed: false,
            press_time: 0,
            last_repeat: 0,
            suppressed: false,
        }
    }

    /// A released, one-shot binding.
    #[must_use]
    pub const fn one_shot(button: Button, action_key: KeyCode) -> Self {
        Self::new(button, action_key, 0, 0)
    }

    /// Zero delay and zero rate together mean "fire once per press".
    #[must_use]
    pub const fn repeats(&self) -> bool {
        !(self.repeat_delay_ms == 0 && self.repeat_rate_ms == 0)
    }

    /// Marks the button held since `now`.
    pub fn press(&mut self, now: Millis) {
        self.pressed = true;
        self.press_time = now;
        self.last_repeat = now;
    }

    /// Marks the button released and clears its timers.
    pub fn release(&mut self) {
        self.pressed = false;
        self.press_time = 0;
        self.last_repeat = 0;
        self.suppressed = false;
    }

    /// The persisted part of the binding.
    #[must_use]
    pub fn settings(&self) -> (Button, KeyCode, u32, u32) {
        (
            self.button,
            self.action_key,
            self.repeat_delay_ms,
            self.repeat_rate_ms,
        )
    }
}

/// Built-in bindings, in table order.
#[must_use]
pub fn default_bindings() -> Vec<Binding> {
    vec![
        Binding::one_shot(Button::A, KEY_ENTER),
        Binding::one_shot(Button::B, KEY_ESCAPE),
        Binding::one_shot(Button::X, KEY_INVENTORY),
        Binding::one_shot(Button::Y, KEY_EQUIPMENT),
        Binding::new(Button::DpadUp, KEY_MOVE_UP, DPAD_REPEAT_DELAY_MS, DPAD_REPEAT_RATE_MS),
        Binding::new(Button::DpadDown, KEY_MOVE_DOWN, DPAD_REPEAT_DELAY_MS, DPAD_REPEAT_RATE_MS),
        Binding::new(Button::DpadLeft, KEY_MOVE_LEFT, DPAD_REPEAT_DELAY_MS, DPAD_REPEAT_RATE_MS),
        Binding::new(Button::DpadRight, KEY_MOVE_RIGHT, DPAD_REPEAT_DELAY_MS, DPAD_REPEAT_RATE_MS),
        Binding::one_shot(Button::Start, KEY_ESCAPE),
        Binding::one_shot(Button::Back, KEY_MAP),
        Binding::one_shot(Button::LeftShoulder, KEY_REST),
        Binding::one_shot(Button::RightShoulder, KEY_SEARCH),
    ]
}

/// Ordered table of bindings, exactly one per physical button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingTable {
    bindings: Vec<Binding>,
}

impl Default for MappingTable {
    fn default() -> Self {
        Self {
            bindings: default_bindings(),
        }
    }
}

impl MappingTable {
    /// Creates a table with the built-in defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Binding> {
        self.bindings.iter_mut()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Binding> {
        self.bindings.get(index)
    }

    /// The binding for `button`.
    #[must_use]
    pub fn binding_for(&self, button: Button) -> Option<&Binding> {
        self.bindings.iter().find(|binding| binding.button == button)
    }

    pub fn binding_for_mut(&mut self, button: Button) -> Option<&mut Binding> {
        self.bindings.iter_mut().find(|binding| binding.button == button)
    }

    fn checked(&self, index: isize) -> Option<&Binding> {
        usize::try_from(index).ok().and_then(|i| self.bindings.get(i))
    }

    /// Button code at `index`, or 0 when out of range.
    #[must_use]
    pub fn button_code(&self, index: isize) -> u16 {
        self.checked(index).map_or(0, |binding| binding.button.code())
    }

    /// Key code at `index`, or 0 when out of range.
    #[must_use]
    pub fn key_code(&self, index: isize) -> KeyCode {
        self.checked(index).map_or(KEY_NONE, |binding| binding.action_key)
    }

    /// Sets the key code at `index`; does nothing when out of range.
    pub fn set_key_code(&mut self, index: isize, code: KeyCode) {
        let Ok(i) = usize::try_from(index) else {
            return;
        };
        if let Some(binding) = self.bindings.get_mut(i) {
            binding.action_key = code;
        }
    }

    /// Replaces the persisted settings of `button`'s binding and releases it.
    pub fn apply(&mut self, button: Button, action_key: KeyCode, delay_ms: u32, rate_ms: u32) {
        if let Some(binding) = self.binding_for_mut(button) {
            binding.action_key = action_key;
            binding.repeat_delay_ms = delay_ms;
            binding.repeat_rate_ms = rate_ms;
            binding.release();
        }
    }

    /// Brings every binding's press state in line with `buttons` without
    /// queueing anything.
    ///
    /// Used while an overlay owns the input. Every held binding is marked
    /// suppressed, so a button still down when the overlay closes neither
    /// fires as a fresh press nor auto-repeats until it is released.
    pub fn absorb(&mut self, buttons: ButtonSet, now: Millis) {
        for binding in &mut self.bindings {
            if buttons.contains(binding.button) {
                if !binding.pressed {
                    binding.press(now);
                }
                binding.suppressed = true;
            } else if binding.pressed {
                binding.release();
            }
        }
    }
}
