//! Seat pool and seat selection
//!
//! This module manages the numbered participant slots on the wheel: the
//! [`Seat`] identifier, the configurable pool size, and the uniform draw
//! used by the spin. Seats leave the pool one at a time as participants are
//! picked; the pool never grows back within a session except through
//! reconfiguration.

use std::{fmt::Display, num::ParseIntError, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::constants::seats::{DEFAULT_SEATS, MAX_SEATS, MIN_SEATS};

/// A numbered participant slot on the wheel
///
/// Seats are small integers in `[1, max_seats]`, printed on the wheel
/// segments and called out to the audience when drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Seat(u16);

impl Seat {
    /// Wraps a raw seat number
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Returns the raw seat number
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Seat {
    type Err = ParseIntError;

    /// Parses a seat from its decimal representation
    ///
    /// # Errors
    ///
    /// Returns a `ParseIntError` if the string is not a valid `u16`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Clamps a requested seat count into the supported range
///
/// Out-of-range configuration is clamped rather than rejected; the setup
/// screen mirrors the same bounds on its input field.
pub fn clamp_seat_count(requested: u16) -> u16 {
    requested.clamp(MIN_SEATS, MAX_SEATS)
}

/// The pool of seats still available for drawing
///
/// Holds the configured wheel size and the ordered list of seats that have
/// not been selected yet. Drawing is read-only; removal happens through the
/// seat-selection transition so that the pool and the selected seat can
/// never disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatPool {
    /// Configured number of seats on the wheel
    max_seats: u16,
    /// Seats not yet drawn, in ascending wheel order
    available: Vec<Seat>,
}

impl Default for SeatPool {
    /// A full pool of [`DEFAULT_SEATS`] seats
    fn default() -> Self {
        Self::new(DEFAULT_SEATS)
    }
}

impl SeatPool {
    /// Creates a full pool for the requested wheel size
    ///
    /// The size is clamped to `[MIN_SEATS, MAX_SEATS]` and the pool starts
    /// with every seat in `[1, max_seats]` available.
    pub fn new(requested: u16) -> Self {
        let max_seats = clamp_seat_count(requested);
        Self {
            max_seats,
            available: (1..=max_seats).map(Seat::new).collect(),
        }
    }

    /// Returns the configured number of seats on the wheel
    pub fn max_seats(&self) -> u16 {
        self.max_seats
    }

    /// Returns the seats still available for drawing, in wheel order
    pub fn available(&self) -> &[Seat] {
        &self.available
    }

    /// Returns the number of seats still available
    pub fn remaining(&self) -> usize {
        self.available.len()
    }

    /// Checks whether every seat has been drawn
    pub fn is_exhausted(&self) -> bool {
        self.available.is_empty()
    }

    /// Whether a seat is still available for drawing
    pub fn contains(&self, seat: Seat) -> bool {
        self.available.contains(&seat)
    }

    /// Draws one available seat uniformly at random
    ///
    /// Returns `None` when the pool is exhausted; callers must disable the
    /// spin control in that case. The pool is not modified; removal
    /// happens through the seat-selection transition.
    pub fn draw(&self) -> Option<Seat> {
        fastrand::choice(&self.available).copied()
    }

    /// Removes a seat from the pool
    ///
    /// Returns `true` if the seat was available and is now gone, `false`
    /// if it had already been drawn (the pool is left unchanged).
    pub(crate) fn take(&mut self, seat: Seat) -> bool {
        let before = self.available.len();
        self.available.retain(|candidate| *candidate != seat);
        self.available.len() < before
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_default_pool_size() {
        let pool = SeatPool::default();
        assert_eq!(pool.max_seats(), DEFAULT_SEATS);
        assert_eq!(pool.remaining(), usize::from(DEFAULT_SEATS));
    }

    #[test]
    fn test_clamp_seat_count() {
        assert_eq!(clamp_seat_count(5), MIN_SEATS);
        assert_eq!(clamp_seat_count(500), MAX_SEATS);
        assert_eq!(clamp_seat_count(MIN_SEATS), MIN_SEATS);
        assert_eq!(clamp_seat_count(MAX_SEATS), MAX_SEATS);
        assert_eq!(clamp_seat_count(42), 42);
    }

    #[test]
    fn test_new_pool_covers_full_range() {
        let pool = SeatPool::new(12);
        assert_eq!(pool.remaining(), 12);
        for n in 1..=12 {
            assert!(pool.contains(Seat::new(n)));
        }
        assert!(!pool.contains(Seat::new(13)));
    }

    #[test]
    fn test_new_pool_clamps_request() {
        assert_eq!(SeatPool::new(3).max_seats(), MIN_SEATS);
        assert_eq!(SeatPool::new(1000).max_seats(), MAX_SEATS);
    }

    #[test]
    fn test_draw_returns_available_seat() {
        let pool = SeatPool::new(10);
        for _ in 0..50 {
            let seat = pool.draw().expect("pool is not empty");
            assert!(pool.contains(seat));
        }
        // Drawing never mutates the pool.
        assert_eq!(pool.remaining(), 10);
    }

    #[test]
    fn test_take_removes_exactly_one() {
        let mut pool = SeatPool::new(10);
        let seat = Seat::new(7);

        assert!(pool.take(seat));
        assert_eq!(pool.remaining(), 9);
        assert!(!pool.contains(seat));

        // Taking the same seat again is rejected and changes nothing.
        assert!(!pool.take(seat));
        assert_eq!(pool.remaining(), 9);
    }

    #[test]
    fn test_draw_on_exhausted_pool() {
        let mut pool = SeatPool::new(10);
        for n in 1..=10 {
            assert!(pool.take(Seat::new(n)));
        }
        assert!(pool.is_exhausted());
        assert!(pool.draw().is_none());
    }

    #[test]
    fn test_seat_display_and_parse() {
        let seat = Seat::new(42);
        assert_eq!(seat.to_string(), "42");
        assert_eq!(Seat::from_str("42").unwrap(), seat);
        assert!(Seat::from_str("not a seat").is_err());
    }

    #[test]
    fn test_seat_serialization() {
        let seat = Seat::new(9);
        let serialized = serde_json::to_string(&seat).unwrap();
        assert_eq!(serialized, "9");

        let deserialized: Seat = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, seat);
    }
}
