//! # Error Types
//!
//! Custom error types for Steamband Pad using `thiserror`.
//!
//! None of these reach the host game: the poll driver turns every failure into a
//! log line and carries on with "no input this tick" or the built-in defaults.

use thiserror::Error;

/// Main error type for Steamband Pad
#[derive(Debug, Error)]
pub enum PadError {
    /// Gamepad polling or device errors
    #[error("Controller error: {0}")]
    Controller(String),

    /// No usable gamepad device on the system
    #[error("No gamepad found")]
    ControllerNotFound,

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Button profile errors (e.g. no user directory to save into)
    #[error("Profile error: {0}")]
    Profile(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Steamband Pad
pub type Result<T> = std::result::Result<T, PadError>;
