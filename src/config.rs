//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//!
//! Every section and field is optional; an empty file gives the same result
//! as [`Config::default`].

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::clock::Millis;
use crate::error::{PadError, Result};
use crate::input::directional::{DEFAULT_DEADZONE, DEFAULT_STICK_REPEAT_MS};
use crate::input::gesture::DEFAULT_GESTURE_WINDOW_MS;
use crate::overlay::DEFAULT_NAV_REPEAT_MS;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub input: InputConfig,

    #[serde(default)]
    pub device: DeviceConfig,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Stick, navigation and gesture timing
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct InputConfig {
    #[serde(default = "default_deadzone")]
    pub deadzone: i32,

    #[serde(default = "default_stick_repeat_ms")]
    pub stick_repeat_ms: Millis,

    #[serde(default = "default_nav_repeat_ms")]
    pub nav_repeat_ms: Millis,

    #[serde(default = "default_gesture_window_ms")]
    pub gesture_window_ms: Millis,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

/// Gamepad device selection
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DeviceConfig {
    /// Empty means auto-detect.
    #[serde(default)]
    pub path: String,

    #[serde(default = "default_reconnect_interval_ms")]
    pub reconnect_interval_ms: u64,
}

/// Where the button profile lives
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct PathsConfig {
    /// Empty means unresolved: the profile is neither loaded nor saved.
    #[serde(default)]
    pub user_dir: String,
}

/// Log output
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Log controller connect/disconnect transitions.
    #[serde(default = "default_controller_log")]
    pub controller_log: bool,

    /// Append-only log file; empty means stderr only.
    #[serde(default)]
    pub file: String,
}

// Default value functions
fn default_deadzone() -> i32 { DEFAULT_DEADZONE }
fn default_stick_repeat_ms() -> Millis { DEFAULT_STICK_REPEAT_MS }
fn default_nav_repeat_ms() -> Millis { DEFAULT_NAV_REPEAT_MS }
fn default_gesture_window_ms() -> Millis { DEFAULT_GESTURE_WINDOW_MS }
fn default_poll_interval_ms() -> u64 { 16 }

fn default_reconnect_interval_ms() -> u64 { 1000 }

fn default_controller_log() -> bool { true }

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            deadzone: default_deadzone(),
            stick_repeat_ms: default_stick_repeat_ms(),
            nav_repeat_ms: default_nav_repeat_ms(),
            gesture_window_ms: default_gesture_window_ms(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            reconnect_interval_ms: default_reconnect_interval_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            controller_log: default_controller_log(),
            file: String::new(),
        }
    }
}

impl DeviceConfig {
    /// Configured device path, `None` to auto-detect.
    #[must_use]
    pub fn device_path(&self) -> Option<String> {
        non_empty(&self.path).map(str::to_string)
    }
}

impl PathsConfig {
    /// User directory, `None` if not configured.
    #[must_use]
    pub fn user_dir(&self) -> Option<PathBuf> {
        non_empty(&self.user_dir).map(PathBuf::from)
    }
}

impl LoggingConfig {
    /// Log file path, `None` if logging to stderr only.
    #[must_use]
    pub fn file_path(&self) -> Option<PathBuf> {
        non_empty(&self.file).map(PathBuf::from)
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

fn invalid(message: &str) -> PadError {
    PadError::Config(toml::de::Error::custom(message))
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// * `Result<Config>` - Loaded and validated configuration
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use steamband_pad::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        if !(0..=i32::from(i16::MAX)).contains(&self.input.deadzone) {
            return Err(invalid("deadzone must be between 0 and 32767"));
        }

        if self.input.stick_repeat_ms == 0 || self.input.stick_repeat_ms > 5000 {
            return Err(invalid("stick_repeat_ms must be between 1 and 5000"));
        }

        if self.input.nav_repeat_ms == 0 || self.input.nav_repeat_ms > 5000 {
            return Err(invalid("nav_repeat_ms must be between 1 and 5000"));
        }

        if self.input.gesture_window_ms == 0 || self.input.gesture_window_ms > 5000 {
            return Err(invalid("gesture_window_ms must be between 1 and 5000"));
        }

        if self.input.poll_interval_ms == 0 || self.input.poll_interval_ms > 1000 {
            return Err(invalid("poll_interval_ms must be between 1 and 1000"));
        }

        if self.device.reconnect_interval_ms == 0 || self.device.reconnect_interval_ms > 60000 {
            return Err(invalid("reconnect_interval_ms must be between 1 and 60000"));
        }

        Ok(())
    }
}
