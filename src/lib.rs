//! # Lucky Wheel Game Library
//!
//! This library provides the core game logic for a live-event lucky wheel
//! trivia game: a spinning wheel draws a numbered seat, and the picked
//! participant answers trivia questions against the clock with a limited
//! number of attempts. It handles the screen state machine, seat and
//! question selection, attempt and timer bookkeeping, and the view/alarm
//! message contract for the presentation layer.
//!
//! Rendering, animation, and sound live outside this crate; the embedder
//! owns a [`game::Game`], renders from [`game::Game::state_message`], and
//! dispatches [`game::Action`] values back into it.

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]

use serde::{Deserialize, Serialize};

pub mod catalog;
pub mod constants;
pub mod game;
pub mod round;
pub mod seats;

/// Alarm messages for timed events in the game
///
/// Alarms are handed to the presentation layer through the scheduling hook
/// when a transition starts a clock, and delivered back through
/// [`game::Game::receive_alarm`] when that clock runs out.
#[derive(Debug, Clone, derive_more::From, Serialize, Deserialize)]
pub enum AlarmMessage {
    /// Question round countdown alarms
    Round(round::AlarmMessage),
}

impl AlarmMessage {
    /// Converts the alarm message to a JSON string for transmission
    ///
    /// # Panics
    ///
    /// This method panics if serialization fails, which should never happen
    /// with the default JSON serializer for well-formed data.
    pub fn to_message(&self) -> String {
        serde_json::to_string(self).expect("default serializer cannot fail")
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_alarm_message_to_message() {
        let alarm = AlarmMessage::from(round::AlarmMessage::TimeUp { serial: 3 });
        let json = alarm.to_message();

        assert!(json.contains("Round"));
        assert!(json.contains("TimeUp"));
        assert!(json.contains('3'));
    }

    #[test]
    fn test_alarm_message_round_trips_through_serde() {
        let alarm = AlarmMessage::from(round::AlarmMessage::TimeUp { serial: 7 });
        let json = alarm.to_message();

        let AlarmMessage::Round(round::AlarmMessage::TimeUp { serial }) =
            serde_json::from_str(&json).unwrap();
        assert_eq!(serial, 7);
    }
}
