//! # Gesture Detector
//!
//! Multi-press gestures on the Back button that open and close the overlays.
//!
//! | Gesture | Condition | Action |
//! |---------|-----------|--------|
//! | Double press | Remap overlay not active | Toggle the command overlay |
//! | Triple press | Always | Toggle the remap overlay |
//!
//! Both counters watch the same down edges of Back and count independently:
//! the first two presses of a triple press also complete a double
//! press. A press arriving more than `window_ms` after the previous one
//! counted by a gesture restarts that gesture at 1.

use crate::clock::Millis;

/// Default maximum gap between the presses of one gesture.
pub const DEFAULT_GESTURE_WINDOW_MS: Millis = 500;

/// Counter for one "N presses in a row" gesture.
#[derive(Debug, Clone, Default)]
struct PressCounter {
    count: u32,
    last_press: Millis,
}

impl PressCounter {
    /// Counts a press; returns `true` when `target` presses have been reached
    /// (the counter then starts over).
    fn register(&mut self, now: Millis, window_ms: Millis, target: u32) -> bool {
        if self.count > 0 && now.saturating_sub(self.last_press) <= window_ms {
            self.count += 1;
        } else {
            self.count = 1;
        }
        self.last_press = now;

        if self.count >= target {
            self.count = 0;
            true
        } else {
            false
        }
    }
}

/// Overlay toggles requested by one poll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GestureOutcome {
    /// Double press completed: toggle the command overlay.
    pub toggle_command_menu: bool,
    /// Triple press completed: toggle the remap overlay.
    pub toggle_remap_menu: bool,
}

impl GestureOutcome {
    #[must_use]
    pub fn any(&self) -> bool {
        self.toggle_command_menu || self.toggle_remap_menu
    }
}

/// Back-button gesture detector.
#[derive(Debug, Clone)]
pub struct GestureDetector {
    window_ms: Millis,
    was_pressed: bool,
    double: PressCounter,
    triple: PressCounter,
}

impl Default for GestureDetector {
    fn default() -> Self {
        Self::new(DEFAULT_GESTURE_WINDOW_MS)
    }
}

impl GestureDetector {
    #[must_use]
    pub fn new(window_ms: Millis) -> Self {
        Self {
            window_ms,
            was_pressed: false,
            double: PressCounter::default(),
            triple: PressCounter::default(),
        }
    }

    /// Feeds one poll's Back state.
    ///
    /// # Arguments
    ///
    /// * `back_held` - Whether Back is down in this poll
    /// * `remap_active` - Whether the remap overlay is currently shown
    /// * `now` - Poll timestamp
    ///
    /// # Examples
    ///
    /// ```
    /// use steamband_pad::input::gesture::GestureDetector;
    ///
    /// let mut gestures = GestureDetector::default();
    /// assert!(!gestures.update(true, false, 0).any());
    /// gestures.update(false, false, 50);
    /// assert!(gestures.update(true, false, 200).toggle_command_menu);
    /// ```
    pub fn update(&mut self, back_held: bool, remap_active: bool, now: Millis) -> GestureOutcome {
        let edge = back_held && !self.was_pressed;
        self.was_pressed = back_held;

        if !edge {
            return GestureOutcome::default();
        }

        let toggle_command_menu =
            !remap_active && self.double.register(now, self.window_ms, 2);
        let toggle_remap_menu = self.triple.register(now, self.window_ms, 3);

        GestureOutcome {
            toggle_command_menu,
            toggle_remap_menu,
        }
    }
}
