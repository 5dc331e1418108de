//! # Debounce & Repeat Engine
//!
//! Turns held buttons into key presses: one press on the down edge, then
//! optional auto-repeat while the button stays down.
//!
//! ## Timing
//!
//! ```text
//! down edge            delay elapsed    +rate      +rate
//!     |------------------|----------------|----------|---- ...
//!   press              repeat           repeat     repeat
//! ```
//!
//! A binding with `repeat_delay_ms == 0 && repeat_rate_ms == 0` only fires on
//! the down edge. Every comparison uses the single timestamp of the current
//! poll, so the number of repeats depends on simulated time and poll spacing,
//! never on how long the computation itself takes.

use crate::clock::Millis;
use crate::controller::buttons::ButtonSet;
use crate::host::KeySink;

use super::bindings::{Binding, MappingTable};
use super::keys::KeyCode;

/// Advances one binding by one poll.
///
/// # Arguments
///
/// * `binding` - Binding to update
/// * `held` - Whether its button is down in this poll
/// * `now` - Poll timestamp
///
/// # Returns
///
/// The key to queue, if this poll produces one.
///
/// # Examples
///
/// ```
/// use steamband_pad::controller::buttons::Button;
/// use steamband_pad::input::bindings::Binding;
/// use steamband_pad::input::repeat::step;
///
/// let mut up = Binding::new(Button::DpadUp, '8' as u32, 200, 50);
/// assert_eq!(step(&mut up, true, 0), Some('8' as u32));   // down edge
/// assert_eq!(step(&mut up, true, 150), None);             // still in delay
/// assert_eq!(step(&mut up, true, 200), Some('8' as u32)); // first repeat
/// assert_eq!(step(&mut up, false, 210), None);            // up edge
/// assert!(!up.pressed);
/// ```
pub fn step(binding: &mut Binding, held: bool, now: Millis) -> Option<KeyCode> {
    match (held, binding.pressed) {
        // Down edge
        (true, false) => {
            binding.press(now);
            Some(binding.action_key)
        }
        // Up edge
        (false, true) => {
            binding.release();
            None
        }
        // Held through an overlay
        (true, true) if binding.suppressed => None,
        // Held
        (true, true) if binding.repeats() => {
            let held_for = now.saturating_sub(binding.press_time);
            let since_last = now.saturating_sub(binding.last_repeat);

            if held_for >= u64::from(binding.repeat_delay_ms)
                && since_last >= u64::from(binding.repeat_rate_ms)
            {
                binding.last_repeat = now;
                Some(binding.action_key)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Runs every binding in `table` against `buttons`, queueing keys into `keys`.
///
/// # Returns
///
/// `true` if at least one key was queued.
pub fn process_bindings(
    table: &mut MappingTable,
    buttons: ButtonSet,
    now: Millis,
    keys: &mut dyn KeySink,
) -> bool {
    let mut handled = false;

    for binding in table.iter_mut() {
        if let Some(code) = step(binding, buttons.contains(binding.button), now) {
            keys.key_press(code);
            handled = true;
        }
    }

    handled
}
