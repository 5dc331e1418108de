//! # Linux Gamepad Source
//!
//! Reads an Xbox-style gamepad through the Linux evdev interface and presents
//! it as a [`SnapshotSource`].
//!
//! ## Controller Detection
//!
//! Without a configured device path, the first `/dev/input/event*` device (in
//! sorted path order) that advertises `BTN_SOUTH` is used.
//!
//! ## State Reading
//!
//! Instead of draining the event queue, every poll asks the kernel for the
//! current key and absolute-axis state (`EVIOCGKEY` / `EVIOCGABS`). That
//! keeps `poll()` non-blocking and makes every snapshot self-contained.
//!
//! | Button | evdev Code |
//! |--------|------------|
//! | A / B / X / Y | BTN_SOUTH / BTN_EAST / BTN_WEST / BTN_NORTH |
//! | Left / Right shoulder | BTN_TL / BTN_TR |
//! | Start / Back | BTN_START / BTN_SELECT |
//! | D-Pad | BTN_DPAD_* or ABS_HAT0X / ABS_HAT0Y |
//!
//! The left stick (ABS_X / ABS_Y) is rescaled from the device's reported range
//! to `i16`, keeping evdev's "Y grows downward" orientation.

use evdev::{AbsoluteAxisType, AttributeSetRef, Device, Key};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::buttons::{Button, ButtonSet};
use super::snapshot::{ControllerSnapshot, PollResult, SnapshotSource};
use crate::error::{PadError, Result};

/// `errno` reported by evdev ioctls once the device has been unplugged.
const ENODEV: i32 = 19;

/// Key code to button table.
const KEY_MAP: &[(Key, Button)] = &[
    (Key::BTN_SOUTH, Button::A),
    (Key::BTN_EAST, Button::B),
    (Key::BTN_WEST, Button::X),
    (Key::BTN_NORTH, Button::Y),
    (Key::BTN_TL, Button::LeftShoulder),
    (Key::BTN_TR, Button::RightShoulder),
    (Key::BTN_START, Button::Start),
    (Key::BTN_SELECT, Button::Back),
    (Key::BTN_DPAD_UP, Button::DpadUp),
    (Key::BTN_DPAD_DOWN, Button::DpadDown),
    (Key::BTN_DPAD_LEFT, Button::DpadLeft),
    (Key::BTN_DPAD_RIGHT, Button::DpadRight),
];

/// Folds pressed keys and the hat switch into a [`ButtonSet`].
///
/// Pads that report the D-Pad as a hat (`-1/0/1` on HAT0X/HAT0Y) and pads
/// that report it as buttons both end up on the same four bits.
#[must_use]
pub fn buttons_from_keys(keys: &AttributeSetRef<Key>, hat_x: i32, hat_y: i32) -> ButtonSet {
    let mut buttons: ButtonSet = KEY_MAP
        .iter()
        .filter(|(key, _)| keys.contains(*key))
        .map(|(_, button)| *button)
        .collect();

    if hat_x < 0 {
        buttons.insert(Button::DpadLeft);
    } else if hat_x > 0 {
        buttons.insert(Button::DpadRight);
    }

    if hat_y < 0 {
        buttons.insert(Button::DpadUp);
    } else if hat_y > 0 {
        buttons.insert(Button::DpadDown);
    }

    buttons
}

/// Rescales a raw axis reading from `[minimum, maximum]` onto `i16`.
///
/// Axes with an empty range (not present on the device) read as centred.
///
/// # Examples
///
/// ```
/// use steamband_pad::controller::gamepad::scale_axis;
///
/// assert_eq!(scale_axis(-32768, -32768, 32767), -32768);
/// assert_eq!(scale_axis(255, 0, 255), 32767);
/// assert_eq!(scale_axis(0, 0, 0), 0);
/// ```
#[must_use]
pub fn scale_axis(value: i32, minimum: i32, maximum: i32) -> i16 {
    if maximum <= minimum {
        return 0;
    }

    let span = i64::from(maximum) - i64::from(minimum);
    let offset = (i64::from(value) - i64::from(minimum)).clamp(0, span);
    let scaled = offset * 65_535 / span - 32_768;

    scaled.clamp(i64::from(i16::MIN), i64::from(i16::MAX)) as i16
}

/// Evdev-backed gamepad.
///
/// Keeps trying to (re)open the device every `reconnect_interval`, so a pad
/// plugged in after start-up is picked up automatically.
pub struct EvdevGamepad {
    device: Option<Device>,
    configured_path: Option<String>,
    device_path: String,
    reconnect_interval: Duration,
    last_attempt: Option<Instant>,
    last_state: Option<(ButtonSet, i16, i16)>,
    sequence: u32,
}

impl std::fmt::Debug for EvdevGamepad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvdevGamepad")
            .field("device_path", &self.device_path)
            .field("connected", &self.device.is_some())
            .field("sequence", &self.sequence)
            .finish_non_exhaustive()
    }
}

impl EvdevGamepad {
    /// Creates a gamepad source. Nothing is opened until the first poll.
    ///
    /// # Arguments
    ///
    /// * `device_path` - Explicit `/dev/input/eventX` path, or `None` to auto-detect
    /// * `reconnect_interval_ms` - Minimum time between open attempts
    #[must_use]
    pub fn new(device_path: Option<String>, reconnect_interval_ms: u64) -> Self {
        Self {
            device: None,
            configured_path: device_path,
            device_path: String::new(),
            reconnect_interval: Duration::from_millis(reconnect_interval_ms),
            last_attempt: None,
            last_state: None,
            sequence: 0,
        }
    }

    /// Path of the currently (or last) opened device; empty before the first
    /// successful open.
    pub fn device_path(&self) -> &str {
        &self.device_path
    }

    /// Detect and open a gamepad.
    ///
    /// # Errors
    ///
    /// - `ControllerNotFound`: No device advertising `BTN_SOUTH` found
    /// - `Controller`: The configured path could not be opened, or `/dev/input`
    ///   could not be read
    pub fn open_device(path: Option<&str>) -> Result<(Device, String)> {
        if let Some(path) = path {
            let device = Device::open(path)
                .map_err(|e| PadError::Controller(format!("Failed to open {}: {}", path, e)))?;
            return Ok((device, path.to_string()));
        }

        let input_dir = Path::new("/dev/input");
        if !input_dir.exists() {
            return Err(PadError::Controller(
                "/dev/input directory not found".to_string(),
            ));
        }

        let mut entries: Vec<_> = std::fs::read_dir(input_dir)
            .map_err(|e| PadError::Controller(format!("Failed to read /dev/input: {}", e)))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| PadError::Controller(format!("Failed to read directory entry: {}", e)))?;

        // Deterministic pick when several pads are connected
        entries.sort_by_key(|entry| entry.path());

        for entry in entries {
            let path = entry.path();

            let is_event_node = path
                .file_name()
                .is_some_and(|name| name.to_string_lossy().starts_with("event"));
            if !is_event_node {
                continue;
            }

            match Device::open(&path) {
                Ok(device) => {
                    let is_gamepad = device
                        .supported_keys()
                        .is_some_and(|keys| keys.contains(Key::BTN_SOUTH));
                    debug!(
                        "Found input device: {} ({}, gamepad: {})",
                        path.display(),
                        device.name().unwrap_or("unnamed"),
                        is_gamepad
                    );

                    if is_gamepad {
                        return Ok((device, path.to_string_lossy().to_string()));
                    }
                }
                Err(e) => {
                    // Permission denied or other errors - skip device
                    debug!("Could not open {}: {}", path.display(), e);
                }
            }
        }

        Err(PadError::ControllerNotFound)
    }

    /// Tries to open the device if the reconnect interval has elapsed.
    fn try_reconnect(&mut self) -> bool {
        let now = Instant::now();
        if let Some(last) = self.last_attempt {
            if now.duration_since(last) < self.reconnect_interval {
                return false;
            }
        }
        self.last_attempt = Some(now);

        match Self::open_device(self.configured_path.as_deref()) {
            Ok((device, path)) => {
                info!(
                    "Opened gamepad {} at {}",
                    device.name().unwrap_or("unnamed"),
                    path
                );
                self.device = Some(device);
                self.device_path = path;
                true
            }
            Err(e) => {
                debug!("Gamepad not available: {}", e);
                false
            }
        }
    }

    /// Assigns a sequence number, bumping it whenever the folded state changes.
    fn stamp(&mut self, state: (ButtonSet, i16, i16)) -> ControllerSnapshot {
        if self.last_state != Some(state) {
            self.sequence = self.sequence.wrapping_add(1);
            self.last_state = Some(state);
        }
        let (buttons, stick_x, stick_y) = state;
        ControllerSnapshot::new(buttons, stick_x, stick_y, self.sequence)
    }
}

fn read_state(device: &Device) -> std::io::Result<(ButtonSet, i16, i16)> {
    let keys = device.get_key_state()?;
    let abs = device.get_abs_state()?;

    let hat_x = abs[AbsoluteAxisType::ABS_HAT0X.0 as usize].value;
    let hat_y = abs[AbsoluteAxisType::ABS_HAT0Y.0 as usize].value;
    let x = &abs[AbsoluteAxisType::ABS_X.0 as usize];
    let y = &abs[AbsoluteAxisType::ABS_Y.0 as usize];

    Ok((
        buttons_from_keys(&keys, hat_x, hat_y),
        scale_axis(x.value, x.minimum, x.maximum),
        scale_axis(y.value, y.minimum, y.maximum),
    ))
}

impl SnapshotSource for EvdevGamepad {
    fn poll(&mut self) -> Result<PollResult> {
        if self.device.is_none() && !self.try_reconnect() {
            return Ok(PollResult::Disconnected);
        }

        let Some(device) = self.device.as_ref() else {
            return Ok(PollResult::Disconnected);
        };

        match read_state(device) {
            Ok(state) => Ok(PollResult::Connected(self.stamp(state))),
            Err(e) => {
                self.device = None;
                self.last_state = None;
                if e.raw_os_error() == Some(ENODEV) {
                    Ok(PollResult::Disconnected)
                } else {
                    Err(PadError::Controller(format!(
                        "Failed to read {}: {}",
                        self.device_path, e
                    )))
                }
            }
        }
    }
}
