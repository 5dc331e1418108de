//! # Controller Module
//!
//! Gamepad input acquisition.
//!
//! This module handles:
//! - The fixed set of supported buttons and their codes/names
//! - Per-poll controller snapshots and the `SnapshotSource` trait
//! - Linux evdev gamepad detection and state reading
//! - Connect/disconnect transition tracking

pub mod buttons;
pub mod connection;
pub mod gamepad;
pub mod snapshot;
