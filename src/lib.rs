//! # Steamband Pad Library
//!
//! Play a text-mode roguelike with a gamepad.
//!
//! This library turns per-tick gamepad snapshots into the key presses the
//! game already understands, and adds two on-screen overlays: a quick-command
//! grid and a button remapping editor. Bindings persist in a small text
//! profile in the player's user directory.
//!
//! The host game is reached only through the traits in [`host`]
//! ([`host::KeySink`], [`host::Screen`]) and the gamepad through
//! [`controller::snapshot::SnapshotSource`]; [`driver::PollDriver`] ties them
//! together.

pub mod clock;
pub mod config;
pub mod controller;
pub mod driver;
pub mod error;
pub mod host;
pub mod input;
pub mod overlay;
pub mod profile;
pub mod terminal;
