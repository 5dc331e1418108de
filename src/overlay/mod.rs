//! # Overlay Module
//!
//! Modal on-screen menus that take over gamepad input while visible.
//!
//! This module handles:
//! - The command grid (quick access to game commands)
//! - The remap editor (change which key each button types)
//! - Navigation rate limiting and press-edge tracking shared by both
//!
//! Overlays draw through the host's [`Screen`](crate::host::Screen) and erase
//! a fixed rectangle when hidden.

pub mod command_menu;
pub mod remap_menu;

use crate::clock::Millis;
use crate::controller::buttons::ButtonSet;

/// Default minimum time between two D-Pad navigation steps.
pub const DEFAULT_NAV_REPEAT_MS: Millis = 200;

/// Allows one navigation step per interval.
#[derive(Debug, Clone)]
pub(crate) struct NavLimiter {
    interval_ms: Millis,
    last_nav: Option<Millis>,
}

impl NavLimiter {
    pub(crate) fn new(interval_ms: Millis) -> Self {
        Self {
            interval_ms,
            last_nav: None,
        }
    }

    pub(crate) fn ready(&self, now: Millis) -> bool {
        self.last_nav
            .map_or(true, |last| now.saturating_sub(last) >= self.interval_ms)
    }

    pub(crate) fn mark(&mut self, now: Millis) {
        self.last_nav = Some(now);
    }

    pub(crate) fn reset(&mut self) {
        self.last_nav = None;
    }
}

/// Reports buttons that went down since the previous poll.
///
/// After [`EdgeTracker::arm`] every button counts as held, so anything the
/// player is still holding when an overlay opens has to be released before it
/// can act inside the overlay.
#[derive(Debug, Clone, Default)]
pub(crate) struct EdgeTracker {
    previous: ButtonSet,
}

impl EdgeTracker {
    pub(crate) fn arm(&mut self) {
        self.previous = ButtonSet::all();
    }

    pub(crate) fn fresh(&mut self, current: ButtonSet) -> ButtonSet {
        let fresh = current.newly_pressed(self.previous);
        self.previous = current;
        fresh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::buttons::Button;

    #[test]
    fn test_nav_limiter() {
        let mut nav = NavLimiter::new(200);
        assert!(nav.ready(0));

        nav.mark(1_000);
        assert!(!nav.ready(1_100));
        assert!(!nav.ready(1_199));
        assert!(nav.ready(1_200));

        nav.reset();
        assert!(nav.ready(1_001));
    }

    #[test]
    fn test_edge_tracker_requires_release_after_arm() {
        let mut edges = EdgeTracker::default();
        edges.arm();

        // Held through the arm: not fresh
        assert!(edges.fresh(Button::A.into()).is_empty());
        assert!(edges.fresh(Button::A.into()).is_empty());

        // Released and pressed again
        assert!(edges.fresh(ButtonSet::EMPTY).is_empty());
        assert_eq!(edges.fresh(Button::A.into()), ButtonSet::from(Button::A));
    }

    #[test]
    fn test_edge_tracker_reports_each_press_once() {
        let mut edges = EdgeTracker::default();
        assert_eq!(edges.fresh(Button::B.into()), ButtonSet::from(Button::B));
        assert!(edges.fresh(Button::B.into()).is_empty());

        let both = ButtonSet::from(Button::B) | Button::X;
        assert_eq!(edges.fresh(both), ButtonSet::from(Button::X));
    }
}
