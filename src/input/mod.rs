//! # Input Mapping Module
//!
//! Everything that turns gamepad state into game keys outside the overlays.
//!
//! This module handles:
//! - The button → key mapping table and its index-based accessors
//! - Per-button debounce and auto-repeat
//! - Stick deadzone and 8-way direction mapping
//! - Back-button multi-press gestures that toggle the overlays

pub mod bindings;
pub mod directional;
pub mod gesture;
pub mod keys;
pub mod repeat;
