//! Question round state and the attempt/timer policy
//!
//! A round is the stretch of play on one question between its start (or
//! reset) and the reveal. This module owns the attempt bookkeeping: how
//! many answers a participant may submit, when the correct option and
//! explanation are revealed, when a retry is allowed, and how much time a
//! round gets on the clock. The countdown itself ticks in the presentation
//! layer; the round only stamps its start time and carries the budget.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use web_time::SystemTime;

use crate::{
    catalog::Question,
    constants::round::{
        FIRST_TIME_LIMIT, MAX_LIFETIME_ROUNDS, MAX_ROUND_ATTEMPTS, RETRY_TIME_LIMIT,
    },
};

/// Outcome of the most recent submitted answer in a round
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// No answer has been submitted yet
    #[default]
    Unanswered,
    /// The most recent answer was correct
    Correct,
    /// The most recent answer was incorrect
    Incorrect,
}

/// Alarm messages for the round countdown
///
/// Scheduled when a round starts and delivered back by the presentation
/// layer when the countdown expires. The serial fences off stale alarms:
/// an alarm whose serial no longer matches the current round is discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AlarmMessage {
    /// The countdown for the round with this serial ran out
    TimeUp {
        /// Serial of the round the countdown belonged to
        serial: u64,
    },
}

/// Returns the time budget for a round of a question
///
/// The first-ever round of a question gets the full budget; any later
/// round of the same question (after a reset or a fresh start) runs on the
/// shorter retry clock.
pub fn time_limit_for(lifetime_rounds: u8) -> Duration {
    if lifetime_rounds > 0 {
        Duration::from_secs(RETRY_TIME_LIMIT)
    } else {
        Duration::from_secs(FIRST_TIME_LIMIT)
    }
}

/// Runtime state of the question currently in play
///
/// Cloned question content plus the attempt counters for this round. The
/// round resolves when an answer is correct, when the attempt cap is
/// reached, or when the countdown expires; after that only a reset or a
/// new question starts the clock again.
#[serde_with::serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    /// The question being answered
    question: Question,
    /// Serial fencing this round's countdown against stale alarms
    serial: u64,
    /// Number of answers submitted this round
    attempts: u8,
    /// Outcome of the most recent submission
    outcome: Outcome,
    /// Whether the outcome/explanation UI is showing
    result_visible: bool,
    /// Time budget for this round
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    time_limit: Duration,
    /// When this round's countdown started
    started_at: SystemTime,
}

impl Round {
    /// Starts a round on a question
    ///
    /// `lifetime_rounds` is the question's resolved-round count so far and
    /// selects the time budget; `serial` must come from the game's round
    /// counter so countdown alarms can be fenced.
    pub(crate) fn start(
        question: Question,
        serial: u64,
        lifetime_rounds: u8,
        now: SystemTime,
    ) -> Self {
        Self {
            question,
            serial,
            attempts: 0,
            outcome: Outcome::Unanswered,
            result_visible: false,
            time_limit: time_limit_for(lifetime_rounds),
            started_at: now,
        }
    }

    /// Returns the question being answered
    pub fn question(&self) -> &Question {
        &self.question
    }

    /// Returns the serial fencing this round's countdown
    pub fn serial(&self) -> u64 {
        self.serial
    }

    /// Returns the number of answers submitted this round
    pub fn attempts(&self) -> u8 {
        self.attempts
    }

    /// Returns the outcome of the most recent submission
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Whether the outcome/explanation UI should be showing
    pub fn result_visible(&self) -> bool {
        self.result_visible
    }

    /// Returns the time budget for this round
    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }

    /// Whether this round has run to its conclusion
    ///
    /// A round is over once an answer was correct, the attempt cap was
    /// reached, or the reveal is showing; further submissions and countdown
    /// expiries are rejected until a reset or a new question.
    pub fn resolved(&self) -> bool {
        self.result_visible
            || self.outcome == Outcome::Correct
            || self.attempts >= MAX_ROUND_ATTEMPTS
    }

    /// Time left on this round's clock at `now`
    ///
    /// Saturates at zero; the clock never goes negative even if the
    /// presentation reads it after expiry.
    pub fn remaining(&self, now: SystemTime) -> Duration {
        let elapsed = now.duration_since(self.started_at).unwrap_or_default();
        self.time_limit.saturating_sub(elapsed)
    }

    /// Records a submitted answer
    ///
    /// Returns `true` when this submission resolves the round (correct
    /// answer, or the attempt cap was reached); the caller then bumps the
    /// question's lifetime counter. Submissions on a resolved round are
    /// rejected and leave the state unchanged.
    pub(crate) fn submit(&mut self, correct: bool) -> bool {
        if self.resolved() {
            return false;
        }
        self.attempts += 1;
        self.outcome = if correct {
            Outcome::Correct
        } else {
            Outcome::Incorrect
        };
        self.result_visible = correct || self.attempts >= MAX_ROUND_ATTEMPTS;
        self.result_visible
    }

    /// Handles an expired countdown
    ///
    /// A single expiry consumes the whole round: no time remains for
    /// further attempts, so the attempt counter jumps to the cap, the
    /// outcome is incorrect, and the reveal shows. Returns `true` when the
    /// round resolved here; alarms with a stale serial or arriving after
    /// resolution are discarded.
    pub(crate) fn expire(&mut self, serial: u64) -> bool {
        if serial != self.serial || self.resolved() {
            return false;
        }
        self.attempts = MAX_ROUND_ATTEMPTS;
        self.outcome = Outcome::Incorrect;
        self.result_visible = true;
        true
    }

    /// Overrides the reveal flag
    pub(crate) fn set_result_visible(&mut self, visible: bool) {
        self.result_visible = visible;
    }

    /// Whether a reset/retry of this question is currently permitted
    ///
    /// Exactly the one-reset-per-question rule: both attempts of this
    /// round were spent, the latest outcome was incorrect, and the
    /// question's lifetime resolved-round counter has not reached its cap.
    pub fn can_reset(&self, lifetime_rounds: u8) -> bool {
        self.outcome == Outcome::Incorrect
            && self.attempts == MAX_ROUND_ATTEMPTS
            && lifetime_rounds < MAX_LIFETIME_ROUNDS
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, QuestionId};

    fn test_round(serial: u64, lifetime_rounds: u8) -> Round {
        let question = Catalog::builtin()
            .get(QuestionId::new(1))
            .expect("builtin question 1 exists")
            .clone();
        Round::start(question, serial, lifetime_rounds, SystemTime::now())
    }

    #[test]
    fn test_time_limit_policy() {
        assert_eq!(time_limit_for(0), Duration::from_secs(FIRST_TIME_LIMIT));
        assert_eq!(time_limit_for(1), Duration::from_secs(RETRY_TIME_LIMIT));
        assert_eq!(time_limit_for(2), Duration::from_secs(RETRY_TIME_LIMIT));
    }

    #[test]
    fn test_fresh_round_state() {
        let round = test_round(1, 0);
        assert_eq!(round.attempts(), 0);
        assert_eq!(round.outcome(), Outcome::Unanswered);
        assert!(!round.result_visible());
        assert!(!round.resolved());
        assert_eq!(round.time_limit(), Duration::from_secs(FIRST_TIME_LIMIT));
    }

    #[test]
    fn test_retry_round_uses_shorter_clock() {
        let round = test_round(2, 1);
        assert_eq!(round.time_limit(), Duration::from_secs(RETRY_TIME_LIMIT));
    }

    #[test]
    fn test_correct_on_first_attempt_resolves() {
        let mut round = test_round(1, 0);

        assert!(round.submit(true));
        assert_eq!(round.attempts(), 1);
        assert_eq!(round.outcome(), Outcome::Correct);
        assert!(round.result_visible());
        assert!(round.resolved());
    }

    #[test]
    fn test_first_incorrect_leaves_round_open() {
        let mut round = test_round(1, 0);

        assert!(!round.submit(false));
        assert_eq!(round.attempts(), 1);
        assert_eq!(round.outcome(), Outcome::Incorrect);
        assert!(!round.result_visible());
        assert!(!round.resolved());
    }

    #[test]
    fn test_second_incorrect_forces_reveal() {
        let mut round = test_round(1, 0);

        assert!(!round.submit(false));
        assert!(round.submit(false));
        assert_eq!(round.attempts(), 2);
        assert!(round.result_visible());

        // A third submission is rejected and changes nothing.
        assert!(!round.submit(true));
        assert_eq!(round.attempts(), 2);
        assert_eq!(round.outcome(), Outcome::Incorrect);
    }

    #[test]
    fn test_correct_on_second_attempt() {
        let mut round = test_round(1, 0);

        assert!(!round.submit(false));
        assert!(round.submit(true));
        assert_eq!(round.attempts(), 2);
        assert_eq!(round.outcome(), Outcome::Correct);
        assert!(round.result_visible());
    }

    #[test]
    fn test_expire_consumes_round() {
        let mut round = test_round(7, 0);

        assert!(round.expire(7));
        assert_eq!(round.attempts(), MAX_ROUND_ATTEMPTS);
        assert_eq!(round.outcome(), Outcome::Incorrect);
        assert!(round.result_visible());
    }

    #[test]
    fn test_expire_after_one_attempt() {
        let mut round = test_round(7, 0);
        round.submit(false);

        assert!(round.expire(7));
        assert_eq!(round.attempts(), MAX_ROUND_ATTEMPTS);
        assert!(round.result_visible());
    }

    #[test]
    fn test_stale_expiry_is_discarded() {
        let mut round = test_round(7, 0);

        assert!(!round.expire(6));
        assert!(!round.resolved());
        assert_eq!(round.attempts(), 0);
    }

    #[test]
    fn test_duplicate_expiry_is_discarded() {
        let mut round = test_round(7, 0);

        assert!(round.expire(7));
        assert!(!round.expire(7));
        assert_eq!(round.attempts(), MAX_ROUND_ATTEMPTS);
    }

    #[test]
    fn test_expiry_after_correct_answer_is_discarded() {
        let mut round = test_round(7, 0);
        round.submit(true);

        assert!(!round.expire(7));
        assert_eq!(round.outcome(), Outcome::Correct);
    }

    #[test]
    fn test_reset_eligibility_boundaries() {
        // One incorrect attempt: not eligible yet.
        let mut round = test_round(1, 0);
        round.submit(false);
        assert!(!round.can_reset(0));

        // Two incorrect attempts: eligible while lifetime rounds remain.
        round.submit(false);
        assert!(round.can_reset(1));

        // Lifetime cap reached: rejected even though the round qualifies.
        assert!(!round.can_reset(MAX_LIFETIME_ROUNDS));
    }

    #[test]
    fn test_reset_not_offered_after_correct_answer() {
        let mut round = test_round(1, 0);
        round.submit(false);
        round.submit(true);
        assert!(!round.can_reset(1));
    }

    #[test]
    fn test_remaining_saturates_at_zero() {
        let round = test_round(1, 0);
        let now = SystemTime::now();

        assert!(round.remaining(now) <= Duration::from_secs(FIRST_TIME_LIMIT));

        let long_after = now + Duration::from_secs(FIRST_TIME_LIMIT * 10);
        assert_eq!(round.remaining(long_after), Duration::ZERO);
    }
}
