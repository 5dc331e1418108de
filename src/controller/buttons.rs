//! # Gamepad Buttons
//!
//! The fixed set of twelve physical buttons the bridge understands, and the
//! bitset a controller snapshot reports them in.
//!
//! ## Button Codes
//!
//! Codes follow the XInput `wButtons` layout so a snapshot's bitset can be
//! tested with a plain mask:
//!
//! | Button | Code | Profile name | Display name |
//! |--------|------|--------------|--------------|
//! | D-Pad Up | `0x0001` | `DPAD_UP` | D-Pad Up |
//! | D-Pad Down | `0x0002` | `DPAD_DOWN` | D-Pad Down |
//! | D-Pad Left | `0x0004` | `DPAD_LEFT` | D-Pad Left |
//! | D-Pad Right | `0x0008` | `DPAD_RIGHT` | D-Pad Right |
//! | Start | `0x0010` | `START` | Start |
//! | Back | `0x0020` | `BACK` | Back |
//! | Left shoulder | `0x0100` | `LEFT_SHOULDER` | Left Bumper |
//! | Right shoulder | `0x0200` | `RIGHT_SHOULDER` | Right Bumper |
//! | A | `0x1000` | `A` | A Button |
//! | B | `0x2000` | `B` | B Button |
//! | X | `0x4000` | `X` | X Button |
//! | Y | `0x8000` | `Y` | Y Button |
//!
//! ## Usage
//!
//! ```
//! use steamband_pad::controller::buttons::{Button, ButtonSet};
//!
//! let held = ButtonSet::from(Button::A) | Button::DpadUp;
//! assert!(held.contains(Button::A));
//! assert_eq!(Button::from_name("DPAD_UP"), Some(Button::DpadUp));
//! assert_eq!(Button::from_code(0x2000), Some(Button::B));
//! ```

use std::fmt;
use std::ops::BitOr;

/// Display name returned for codes that are not one of the twelve buttons.
pub const UNKNOWN_BUTTON_NAME: &str = "Unknown";

/// One physical gamepad button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    /// Bottom face button.
    A,
    /// Right face button.
    B,
    /// Left face button.
    X,
    /// Top face button.
    Y,
    /// D-Pad up.
    DpadUp,
    /// D-Pad down.
    DpadDown,
    /// D-Pad left.
    DpadLeft,
    /// D-Pad right.
    DpadRight,
    /// Start / Menu.
    Start,
    /// Back / View / Select. Also the overlay gesture button.
    Back,
    /// Left shoulder (LB).
    LeftShoulder,
    /// Right shoulder (RB).
    RightShoulder,
}

impl Button {
    /// Every button, in default binding-table order.
    pub const ALL: [Button; 12] = [
        Button::A,
        Button::B,
        Button::X,
        Button::Y,
        Button::DpadUp,
        Button::DpadDown,
        Button::DpadLeft,
        Button::DpadRight,
        Button::Start,
        Button::Back,
        Button::LeftShoulder,
        Button::RightShoulder,
    ];

    /// Bit mask of this button inside a [`ButtonSet`].
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Button::DpadUp => 0x0001,
            Button::DpadDown => 0x0002,
            Button::DpadLeft => 0x0004,
            Button::DpadRight => 0x0008,
            Button::Start => 0x0010,
            Button::Back => 0x0020,
            Button::LeftShoulder => 0x0100,
            Button::RightShoulder => 0x0200,
            Button::A => 0x1000,
            Button::B => 0x2000,
            Button::X => 0x4000,
            Button::Y => 0x8000,
        }
    }

    /// Name used in the `controller.prf` profile.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Button::A => "A",
            Button::B => "B",
            Button::X => "X",
            Button::Y => "Y",
            Button::DpadUp => "DPAD_UP",
            Button::DpadDown => "DPAD_DOWN",
            Button::DpadLeft => "DPAD_LEFT",
            Button::DpadRight => "DPAD_RIGHT",
            Button::Start => "START",
            Button::Back => "BACK",
            Button::LeftShoulder => "LEFT_SHOULDER",
            Button::RightShoulder => "RIGHT_SHOULDER",
        }
    }

    /// Human-readable name shown in the remap overlay.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Button::A => "A Button",
            Button::B => "B Button",
            Button::X => "X Button",
            Button::Y => "Y Button",
            Button::DpadUp => "D-Pad Up",
            Button::DpadDown => "D-Pad Down",
            Button::DpadLeft => "D-Pad Left",
            Button::DpadRight => "D-Pad Right",
            Button::Start => "Start",
            Button::Back => "Back",
            Button::LeftShoulder => "Left Bumper",
            Button::RightShoulder => "Right Bumper",
        }
    }

    /// Looks a button up by its bit mask. Combined masks are not a button.
    #[must_use]
    pub fn from_code(code: u16) -> Option<Button> {
        Self::ALL.into_iter().find(|button| button.code() == code)
    }

    /// Looks a button up by its profile name (exact, case-sensitive).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Button> {
        Self::ALL.into_iter().find(|button| button.name() == name)
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Display name for a raw button code, or `"Unknown"`.
#[must_use]
pub fn button_display_name(code: u16) -> &'static str {
    Button::from_code(code).map_or(UNKNOWN_BUTTON_NAME, Button::display_name)
}

/// Set of held buttons, stored as XInput-style bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ButtonSet(u16);

impl ButtonSet {
    /// No buttons held.
    pub const EMPTY: ButtonSet = ButtonSet(0);

    /// Wraps raw bits. Bits outside the twelve known buttons are kept but never
    /// reported by [`ButtonSet::iter`].
    #[must_use]
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// Every known button held.
    #[must_use]
    pub fn all() -> Self {
        Button::ALL.into_iter().fold(Self::EMPTY, |set, button| set | button)
    }

    /// Raw bits.
    #[must_use]
    pub const fn bits(self) -> u16 {
        self.0
    }

    #[must_use]
    pub const fn contains(self, button: Button) -> bool {
        self.0 & button.code() != 0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn insert(&mut self, button: Button) {
        self.0 |= button.code();
    }

    pub fn remove(&mut self, button: Button) {
        self.0 &= !button.code();
    }

    /// Buttons held in `self` but not in `previous`.
    #[must_use]
    pub const fn newly_pressed(self, previous: ButtonSet) -> ButtonSet {
        ButtonSet(self.0 & !previous.0)
    }

    /// Iterates over held buttons in table order.
    pub fn iter(self) -> impl Iterator<Item = Button> {
        Button::ALL.into_iter().filter(move |button| self.contains(*button))
    }
}

impl From<Button> for ButtonSet {
    fn from(button: Button) -> Self {
        Self(button.code())
    }
}

impl BitOr<Button> for ButtonSet {
    type Output = ButtonSet;

    fn bitor(self, rhs: Button) -> ButtonSet {
        ButtonSet(self.0 | rhs.code())
    }
}

impl BitOr for ButtonSet {
    type Output = ButtonSet;

    fn bitor(self, rhs: ButtonSet) -> ButtonSet {
        ButtonSet(self.0 | rhs.0)
    }
}

impl FromIterator<Button> for ButtonSet {
    fn from_iter<I: IntoIterator<Item = Button>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, |set, button| set | button)
    }
}
