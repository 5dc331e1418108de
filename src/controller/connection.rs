//! # Connection Tracking
//!
//! Derives "connected / not connected" from each poll and logs only the
//! transitions, never the steady state.
//!
//! Transition logging can be switched off with the environment variable
//! `STEAMBAND_CONTROLLER_LOG=0` (also `false`, `off`, `no`).

use tracing::{debug, info, warn};

use super::snapshot::PollResult;
use crate::error::{PadError, Result};

/// Environment variable that toggles transition logging.
pub const CONTROLLER_LOG_ENV: &str = "STEAMBAND_CONTROLLER_LOG";

/// Interprets a value of [`CONTROLLER_LOG_ENV`]. Unset means enabled.
///
/// # Examples
///
/// ```
/// use steamband_pad::controller::connection::logging_enabled_from;
///
/// assert!(logging_enabled_from(None));
/// assert!(logging_enabled_from(Some("1")));
/// assert!(!logging_enabled_from(Some("0")));
/// assert!(!logging_enabled_from(Some("off")));
/// ```
#[must_use]
pub fn logging_enabled_from(value: Option<&str>) -> bool {
    match value.map(|v| v.trim().to_ascii_lowercase()) {
        Some(v) => !matches!(v.as_str(), "0" | "false" | "off" | "no"),
        None => true,
    }
}

/// Reads [`CONTROLLER_LOG_ENV`] from the process environment.
#[must_use]
pub fn logging_enabled_from_env() -> bool {
    logging_enabled_from(std::env::var(CONTROLLER_LOG_ENV).ok().as_deref())
}

/// A change in controller availability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Disconnected → connected.
    Connected,
    /// Connected → disconnected (device gone).
    Disconnected,
    /// Connected → unavailable because polling failed.
    Failed(String),
}

/// Remembers whether the controller was available on the previous poll.
#[derive(Debug, Clone)]
pub struct ConnectionTracker {
    connected: bool,
    logging_enabled: bool,
}

impl ConnectionTracker {
    /// Starts out disconnected.
    #[must_use]
    pub fn new(logging_enabled: bool) -> Self {
        Self {
            connected: false,
            logging_enabled,
        }
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    #[must_use]
    pub fn logging_enabled(&self) -> bool {
        self.logging_enabled
    }

    /// Folds one poll outcome into the state, logging transitions.
    ///
    /// # Returns
    ///
    /// The transition this poll caused, if any.
    pub fn observe(&mut self, outcome: &Result<PollResult>) -> Option<Transition> {
        let now_connected = matches!(outcome, Ok(PollResult::Connected(_)));
        let was_connected = std::mem::replace(&mut self.connected, now_connected);

        let transition = match (was_connected, now_connected, outcome) {
            (false, true, _) => Transition::Connected,
            (true, false, Err(e)) => Transition::Failed(describe(e)),
            (true, false, _) => Transition::Disconnected,
            (false, false, Err(e)) => {
                debug!("Controller still unavailable: {}", e);
                return None;
            }
            _ => return None,
        };

        if self.logging_enabled {
            match &transition {
                Transition::Connected => info!("Controller connected"),
                Transition::Disconnected => warn!("Controller disconnected"),
                Transition::Failed(reason) => warn!("Controller error: {}", reason),
            }
        }

        Some(transition)
    }
}

fn describe(error: &PadError) -> String {
    match error {
        PadError::Controller(msg) => msg.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::snapshot::ControllerSnapshot;

    fn connected() -> Result<PollResult> {
        Ok(PollResult::Connected(ControllerSnapshot::default()))
    }

    #[test]
    fn test_logging_enabled_values() {
        for off in ["0", "false", "FALSE", "off", "no", " 0 "] {
            assert!(!logging_enabled_from(Some(off)), "{:?} should disable", off);
        }
        for on in ["1", "true", "yes", "", "anything"] {
            assert!(logging_enabled_from(Some(on)), "{:?} should enable", on);
        }
        assert!(logging_enabled_from(None));
    }

    #[test]
    fn test_starts_disconnected() {
        let tracker = ConnectionTracker::new(true);
        assert!(!tracker.is_connected());
    }

    #[test]
    fn test_transitions_reported_once() {
        let mut tracker = ConnectionTracker::new(true);

        assert_eq!(tracker.observe(&connected()), Some(Transition::Connected));
        assert_eq!(tracker.observe(&connected()), None);
        assert!(tracker.is_connected());

        assert_eq!(
            tracker.observe(&Ok(PollResult::Disconnected)),
            Some(Transition::Disconnected)
        );
        assert_eq!(tracker.observe(&Ok(PollResult::Disconnected)), None);
        assert!(!tracker.is_connected());
    }

    #[test]
    fn test_poll_error_is_a_failure_transition() {
        let mut tracker = ConnectionTracker::new(false);
        tracker.observe(&connected());

        let failed = Err(PadError::Controller("Failed to read /dev/input/event3".to_string()));
        assert_eq!(
            tracker.observe(&failed),
            Some(Transition::Failed("Failed to read /dev/input/event3".to_string()))
        );

        // Errors while already down are not transitions
        let again = Err(PadError::ControllerNotFound);
        assert_eq!(tracker.observe(&again), None);
    }

    #[test]
    fn test_logging_flag_does_not_change_state() {
        let mut quiet = ConnectionTracker::new(false);
        assert!(!quiet.logging_enabled());
        assert_eq!(quiet.observe(&connected()), Some(Transition::Connected));
        assert!(quiet.is_connected());
    }
}
