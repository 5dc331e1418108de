//! # Controller Snapshot Module
//!
//! The per-poll view of the gamepad and the trait every input backend
//! implements to produce it.
//!
//! ## Axis Convention
//!
//! | Field | Range | Direction |
//! |-------|-------|-----------|
//! | `stick_x` | -32768..=32767 | negative = left, positive = right |
//! | `stick_y` | -32768..=32767 | negative = up, positive = down |
//!
//! `stick_y` grows downward (screen/evdev convention). The directional engine
//! inverts it so that "up" is geometrically north.
//!
//! ## Usage
//!
//! ```
//! use steamband_pad::controller::buttons::Button;
//! use steamband_pad::controller::snapshot::ControllerSnapshot;
//!
//! let snapshot = ControllerSnapshot::new(Button::A.into(), 0, -20_000, 7);
//! assert!(snapshot.is_pressed(Button::A));
//! assert_eq!(snapshot.stick_y, -20_000);
//! ```

use super::buttons::{Button, ButtonSet};
use crate::error::Result;

/// State of the gamepad at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerSnapshot {
    /// Held buttons.
    pub buttons: ButtonSet,
    /// Left stick X axis.
    pub stick_x: i16,
    /// Left stick Y axis (positive = down).
    pub stick_y: i16,
    /// Packet sequence number; changes whenever the hardware state changes.
    pub sequence: u32,
}

impl ControllerSnapshot {
    #[must_use]
    pub fn new(buttons: ButtonSet, stick_x: i16, stick_y: i16, sequence: u32) -> Self {
        Self {
            buttons,
            stick_x,
            stick_y,
            sequence,
        }
    }

    /// Whether `button` is held in this snapshot.
    #[must_use]
    pub fn is_pressed(&self, button: Button) -> bool {
        self.buttons.contains(button)
    }
}

/// Outcome of one successful poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollResult {
    /// No controller on the port.
    Disconnected,
    /// Controller present; here is its state.
    Connected(ControllerSnapshot),
}

/// Source of gamepad snapshots (the platform polling API).
///
/// Implementations must not block. `Ok(PollResult::Disconnected)` means "nobody
/// is plugged in"; `Err` is reserved for genuine polling failures. Both are
/// treated as "no input this tick" by the poll driver.
#[cfg_attr(test, mockall::automock)]
pub trait SnapshotSource {
    /// Reads the current controller state.
    fn poll(&mut self) -> Result<PollResult>;
}

impl<S: SnapshotSource + ?Sized> SnapshotSource for Box<S> {
    fn poll(&mut self) -> Result<PollResult> {
        (**self).poll()
    }
}
