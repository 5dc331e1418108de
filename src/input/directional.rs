//! # Directional Engine
//!
//! Turns the left stick into the eight movement keys.
//!
//! ## Deadzone
//!
//! The stick is ignored while both axes stay within `±deadzone`. As soon as
//! either axis leaves that square, the stick direction is classified.
//!
//! ## Sectors
//!
//! The angle of `(x, -y)` (Y is flipped so pushing up points north) is split
//! into eight 45° sectors centred on the compass directions. Sector `D` covers
//! `[D·45° − 22.5°, D·45° + 22.5°)`:
//!
//! | Sector | Centre | Direction | Key |
//! |--------|--------|-----------|-----|
//! | 0 | 0° | Right | `6` |
//! | 1 | 45° | Up-right | `9` |
//! | 2 | 90° | Up | `8` |
//! | 3 | 135° | Up-left | `7` |
//! | 4 | 180° | Left | `4` |
//! | 5 | 225° | Down-left | `1` |
//! | 6 | 270° | Down | `2` |
//! | 7 | 315° | Down-right | `3` |
//!
//! ## Rate Limit
//!
//! At most one key per `rate_ms` (150 ms by default). The first deflection
//! after start-up fires immediately.
//!
//! ## Usage
//!
//! ```
//! use steamband_pad::input::directional::{Direction, DirectionalEngine};
//!
//! let mut engine = DirectionalEngine::default();
//! assert_eq!(engine.update(0, -20_000, 0), Some(Direction::Up.key()));
//! assert_eq!(engine.update(0, -20_000, 100), None); // rate limited
//! assert_eq!(engine.update(20_000, 0, 150), Some(Direction::Right.key()));
//! assert_eq!(engine.update(100, 100, 400), None);   // inside deadzone
//! ```

use crate::clock::Millis;

use super::keys::{
    KeyCode, KEY_MOVE_DOWN, KEY_MOVE_DOWN_LEFT, KEY_MOVE_DOWN_RIGHT, KEY_MOVE_LEFT,
    KEY_MOVE_RIGHT, KEY_MOVE_UP, KEY_MOVE_UP_LEFT, KEY_MOVE_UP_RIGHT,
};

/// Default stick deadzone (the conventional XInput left-thumb deadzone).
pub const DEFAULT_DEADZONE: i32 = 7849;

/// Default minimum time between two directional keys.
pub const DEFAULT_STICK_REPEAT_MS: u64 = 150;

/// One of the eight movement directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Right,
    UpRight,
    Up,
    UpLeft,
    Left,
    DownLeft,
    Down,
    DownRight,
}

impl Direction {
    /// Directions in sector order, counter-clockwise from east.
    pub const SECTORS: [Direction; 8] = [
        Direction::Right,
        Direction::UpRight,
        Direction::Up,
        Direction::UpLeft,
        Direction::Left,
        Direction::DownLeft,
        Direction::Down,
        Direction::DownRight,
    ];

    /// Movement key for this direction.
    #[must_use]
    pub const fn key(self) -> KeyCode {
        match self {
            Direction::Right => KEY_MOVE_RIGHT,
            Direction::UpRight => KEY_MOVE_UP_RIGHT,
            Direction::Up => KEY_MOVE_UP,
            Direction::UpLeft => KEY_MOVE_UP_LEFT,
            Direction::Left => KEY_MOVE_LEFT,
            Direction::DownLeft => KEY_MOVE_DOWN_LEFT,
            Direction::Down => KEY_MOVE_DOWN,
            Direction::DownRight => KEY_MOVE_DOWN_RIGHT,
        }
    }

    /// Classifies a stick position, or `None` inside the deadzone.
    ///
    /// # Arguments
    ///
    /// * `x` - Stick X (positive = right)
    /// * `y` - Stick Y (positive = down)
    /// * `deadzone` - Per-axis deadzone
    #[must_use]
    pub fn from_stick(x: i32, y: i32, deadzone: i32) -> Option<Direction> {
        if x.abs() <= deadzone && y.abs() <= deadzone {
            return None;
        }

        let degrees = f64::from(-y).atan2(f64::from(x)).to_degrees().rem_euclid(360.0);
        let sector = ((degrees + 22.5) / 45.0).floor() as usize % 8;

        Some(Self::SECTORS[sector])
    }
}

/// Stick → movement key mapper with a timestamp-based rate limit.
#[derive(Debug, Clone)]
pub struct DirectionalEngine {
    deadzone: i32,
    rate_ms: Millis,
    last_move: Option<Millis>,
}

impl Default for DirectionalEngine {
    fn default() -> Self {
        Self::new(DEFAULT_DEADZONE, DEFAULT_STICK_REPEAT_MS)
    }
}

impl DirectionalEngine {
    /// Creates an engine.
    ///
    /// # Arguments
    ///
    /// * `deadzone` - Per-axis deadzone (negative values are treated as 0)
    /// * `rate_ms` - Minimum time between two keys
    #[must_use]
    pub fn new(deadzone: i32, rate_ms: Millis) -> Self {
        Self {
            deadzone: deadzone.max(0),
            rate_ms,
            last_move: None,
        }
    }

    /// Returns the configured deadzone.
    #[must_use]
    pub fn deadzone(&self) -> i32 {
        self.deadzone
    }

    /// Processes one stick reading.
    ///
    /// # Returns
    ///
    /// The movement key to queue, if the stick is deflected and the rate
    /// limit allows a key at `now`.
    pub fn update(&mut self, stick_x: i16, stick_y: i16, now: Millis) -> Option<KeyCode> {
        let direction =
            Direction::from_stick(i32::from(stick_x), i32::from(stick_y), self.deadzone)?;

        if let Some(last) = self.last_move {
            if now.saturating_sub(last) < self.rate_ms {
                return None;
            }
        }

        self.last_move = Some(now);
        Some(direction.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Stick position at `degrees` (0 = right, 90 = up) with length `radius`.
    fn stick_at(degrees: f64, radius: f64) -> (i32, i32) {
        let rad = degrees.to_radians();
        let x = (radius * rad.cos()).round() as i32;
        let y = -(radius * rad.sin()).round() as i32;
        (x, y)
    }

    // ==================== Sector Tests ====================

    #[test]
    fn test_cardinal_and_diagonal_centres() {
        let cases = [
            (0.0, Direction::Right),
            (45.0, Direction::UpRight),
            (90.0, Direction::Up),
            (135.0, Direction::UpLeft),
            (180.0, Direction::Left),
            (225.0, Direction::DownLeft),
            (270.0, Direction::Down),
            (315.0, Direction::DownRight),
        ];
        for (degrees, expected) in cases {
            let (x, y) = stick_at(degrees, 30_000.0);
            assert_eq!(
                Direction::from_stick(x, y, DEFAULT_DEADZONE),
                Some(expected),
                "{} degrees",
                degrees
            );
        }
    }

    #[test]
    fn test_exact_axes() {
        assert_eq!(Direction::from_stick(32_767, 0, DEFAULT_DEADZONE), Some(Direction::Right));
        assert_eq!(Direction::from_stick(0, -32_768, DEFAULT_DEADZONE), Some(Direction::Up));
        assert_eq!(Direction::from_stick(-32_768, 0, DEFAULT_DEADZONE), Some(Direction::Left));
        assert_eq!(Direction::from_stick(0, 32_767, DEFAULT_DEADZONE), Some(Direction::Down));
        assert_eq!(
            Direction::from_stick(20_000, -20_000, DEFAULT_DEADZONE),
            Some(Direction::UpRight)
        );
    }

    #[test]
    fn test_sector_boundaries_are_half_open() {
        // 22.5 degrees belongs to up-right, just below it to right
        assert_eq!(Direction::from_stick(1_000_000, -414_214, 0), Some(Direction::UpRight));
        assert_eq!(Direction::from_stick(1_000_000, -414_213, 0), Some(Direction::Right));
        // Just below 360 wraps to right
        let (x, y) = stick_at(359.0, 30_000.0);
        assert_eq!(Direction::from_stick(x, y, DEFAULT_DEADZONE), Some(Direction::Right));
        let (x, y) = stick_at(337.0, 30_000.0);
        assert_eq!(Direction::from_stick(x, y, DEFAULT_DEADZONE), Some(Direction::DownRight));
    }

    #[test]
    fn test_deadzone_square() {
        let dz = DEFAULT_DEADZONE;
        assert_eq!(Direction::from_stick(0, 0, dz), None);
        assert_eq!(Direction::from_stick(dz, dz, dz), None);
        assert_eq!(Direction::from_stick(-dz, -dz, dz), None);
        assert_eq!(Direction::from_stick(dz + 1, 0, dz), Some(Direction::Right));
        assert_eq!(Direction::from_stick(0, -(dz + 1), dz), Some(Direction::Up));
    }

    #[test]
    fn test_every_sector_has_distinct_key() {
        let mut keys: Vec<KeyCode> = Direction::SECTORS.iter().map(|d| d.key()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), 8);
    }

    // ==================== Rate Limit Tests ====================

    #[test]
    fn test_first_deflection_fires_immediately() {
        let mut engine = DirectionalEngine::default();
        assert_eq!(engine.update(30_000, 0, 0), Some(KEY_MOVE_RIGHT));
    }

    #[test]
    fn test_at_most_one_key_per_window() {
        let mut engine = DirectionalEngine::default();
        let fired = (0..150)
            .filter(|&now| engine.update(0, 30_000, now).is_some())
            .count();
        assert_eq!(fired, 1);
        assert_eq!(engine.update(0, 30_000, 150), Some(KEY_MOVE_DOWN));
    }

    #[test]
    fn test_deadzone_does_not_consume_rate_limit() {
        let mut engine = DirectionalEngine::default();
        assert_eq!(engine.update(0, 0, 0), None);
        assert_eq!(engine.update(0, 0, 10), None);
        assert_eq!(engine.update(-30_000, 0, 20), Some(KEY_MOVE_LEFT));
    }

    #[test]
    fn test_rate_limit_spans_direction_changes() {
        let mut engine = DirectionalEngine::new(DEFAULT_DEADZONE, 150);
        assert!(engine.update(30_000, 0, 1_000).is_some());
        assert!(engine.update(-30_000, 0, 1_100).is_none());
        assert_eq!(engine.update(-30_000, 0, 1_150), Some(KEY_MOVE_LEFT));
    }

    #[test]
    fn test_negative_deadzone_clamped() {
        let engine = DirectionalEngine::new(-5, 150);
        assert_eq!(engine.deadzone(), 0);
    }
}
