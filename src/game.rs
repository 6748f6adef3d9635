//! Core game state and transition logic
//!
//! This module contains the single source of truth for a game session and
//! the pure transition function that advances it. The session moves
//! through three screens (setup, wheel, questions) modeled as a typed
//! [`Phase`] so that data like the selected seat or the question in play
//! only exists on the screens where it is meaningful.
//!
//! Transitions are total: any action that does not apply to the current
//! phase (an unavailable seat, a completed question, a stale countdown)
//! returns the state unchanged. Randomness and timestamps never enter the
//! transition function directly; the seat and question selectors run on
//! the caller's side and their results arrive as action payloads.

use std::{collections::HashSet, fmt::Debug, time::Duration};

use enum_map::EnumMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use web_time::SystemTime;

use crate::{
    AlarmMessage,
    catalog::{Catalog, Question, QuestionId},
    constants::round::MAX_ROUND_ATTEMPTS,
    round::{self, Outcome, Round},
    seats::{Seat, SeatPool},
};

/// The screen a session is currently on, without associated data
///
/// This is the discriminant of [`Phase`], useful for rendering decisions
/// and assertions that do not need the per-screen payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Screen {
    /// Configuring the wheel before play begins
    Setup,
    /// Spinning the wheel to pick a participant
    Wheel,
    /// The picked participant is answering questions
    Questions,
}

/// The screen a session is on, with the data that only exists there
///
/// The selected seat exists only on the questions screen, and the question
/// in play only while a round is active; states the original had to guard
/// against at runtime are simply not representable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Phase {
    /// Configuring the wheel before play begins
    Setup,
    /// Spinning the wheel to pick a participant
    Wheel,
    /// The picked participant is choosing and answering questions
    Questions {
        /// The seat drawn by the wheel
        seat: Seat,
        /// The question round in play, if one has started
        round: Option<Box<Round>>,
    },
}

impl Phase {
    /// Returns the screen this phase belongs to
    pub fn screen(&self) -> Screen {
        match self {
            Phase::Setup => Screen::Setup,
            Phase::Wheel => Screen::Wheel,
            Phase::Questions { .. } => Screen::Questions,
        }
    }
}

/// Session-long question progress
///
/// Tracks which questions are completed, how many rounds each question has
/// resolved over the whole session (bounding resets and shortening retry
/// clocks), and the serial counter that fences countdown alarms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    /// Questions answered correctly; never offered again
    completed: HashSet<QuestionId>,
    /// Resolved-round count per question
    lifetime_rounds: EnumMap<QuestionId, u8>,
    /// Number of rounds ever started, used to stamp round serials
    rounds_started: u64,
}

impl Progress {
    /// Returns the completed question ids
    pub fn completed(&self) -> &HashSet<QuestionId> {
        &self.completed
    }

    /// Whether a question has been completed
    pub fn is_completed(&self, id: QuestionId) -> bool {
        self.completed.contains(&id)
    }

    /// Returns how many rounds of a question have resolved so far
    pub fn lifetime_rounds(&self, id: QuestionId) -> u8 {
        self.lifetime_rounds[id]
    }

    /// Marks a question as completed (idempotent)
    fn complete(&mut self, id: QuestionId) {
        self.completed.insert(id);
    }

    /// Records that a round of a question resolved
    fn resolve(&mut self, id: QuestionId) {
        self.lifetime_rounds[id] = self.lifetime_rounds[id].saturating_add(1);
    }

    /// Stamps the next round serial
    fn next_serial(&mut self) -> u64 {
        self.rounds_started += 1;
        self.rounds_started
    }
}

/// An action dispatched into the game
///
/// Actions carry everything a transition needs: the presentation runs the
/// selectors and the clock and hands their results in as payloads, keeping
/// the transition function itself free of randomness and I/O.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum Action {
    /// Replace the wheel size (setup screen only); clamped to the
    /// supported range
    Configure {
        /// Requested number of seats on the wheel
        max_seats: u16,
    },
    /// Leave setup and show the wheel
    StartGame,
    /// A spin ended on this seat
    SelectSeat(Seat),
    /// Start a round on a question drawn from the catalog
    StartQuestion {
        /// The drawn question
        question: QuestionId,
        /// Start of the round's countdown
        now: SystemTime,
    },
    /// The participant submitted an answer
    SubmitAnswer {
        /// Whether the chosen option was the correct one
        correct: bool,
    },
    /// The round countdown ran out
    TimeExpired {
        /// Serial of the round the countdown belonged to
        serial: u64,
    },
    /// Override the reveal flag of the active round
    ShowResult(bool),
    /// Spend the question's one reset on a fresh retry round
    ResetQuestion {
        /// Start of the retry round's countdown
        now: SystemTime,
    },
    /// Mark a question as completed
    CompleteQuestion(QuestionId),
    /// Leave the questions screen and show the wheel again
    ReturnToWheel,
}

/// The complete state of a game session
///
/// A single aggregate owned exclusively by [`Game`]; every transition
/// consumes it and returns its replacement, so a reference to an old state
/// never observes a later change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Wheel configuration and the seats still available
    seats: SeatPool,
    /// Session-long question progress
    progress: Progress,
    /// Current screen and its data
    phase: Phase,
}

impl Default for GameState {
    /// A fresh session: setup screen, default wheel size, no progress
    fn default() -> Self {
        Self {
            seats: SeatPool::default(),
            progress: Progress::default(),
            phase: Phase::Setup,
        }
    }
}

impl GameState {
    /// Returns the current screen
    pub fn screen(&self) -> Screen {
        self.phase.screen()
    }

    /// Returns the current phase with its data
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Returns the seat pool
    pub fn seats(&self) -> &SeatPool {
        &self.seats
    }

    /// Returns the session's question progress
    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    /// Returns the seat being quizzed, if any
    pub fn selected_seat(&self) -> Option<Seat> {
        match &self.phase {
            Phase::Questions { seat, .. } => Some(*seat),
            _ => None,
        }
    }

    /// Returns the round in play, if any
    pub fn round(&self) -> Option<&Round> {
        match &self.phase {
            Phase::Questions {
                round: Some(round), ..
            } => Some(round),
            _ => None,
        }
    }

    /// Whether resetting the current question is permitted right now
    pub fn can_reset(&self) -> bool {
        self.round()
            .is_some_and(|round| round.can_reset(self.progress.lifetime_rounds(round.question().id)))
    }

    /// Applies an action, returning the next state
    ///
    /// Total over all `(state, action)` pairs: actions that do not apply
    /// to the current phase return the state unchanged.
    pub fn apply(self, action: Action, catalog: &Catalog) -> Self {
        match action {
            Action::Configure { max_seats } => self.configure(max_seats),
            Action::StartGame => self.start_game(),
            Action::SelectSeat(seat) => self.select_seat(seat),
            Action::StartQuestion { question, now } => self.start_question(question, now, catalog),
            Action::SubmitAnswer { correct } => self.submit_answer(correct),
            Action::TimeExpired { serial } => self.time_expired(serial),
            Action::ShowResult(visible) => self.show_result(visible),
            Action::ResetQuestion { now } => self.reset_question(now),
            Action::CompleteQuestion(id) => self.complete_question(id, catalog),
            Action::ReturnToWheel => self.return_to_wheel(),
        }
    }

    /// Replaces the wheel size and refills the pool (setup screen only)
    fn configure(mut self, max_seats: u16) -> Self {
        if matches!(self.phase, Phase::Setup) {
            self.seats = SeatPool::new(max_seats);
        }
        self
    }

    /// Leaves setup for the wheel
    fn start_game(mut self) -> Self {
        if matches!(self.phase, Phase::Setup) {
            self.phase = Phase::Wheel;
        }
        self
    }

    /// Moves a drawn seat out of the pool and onto the questions screen
    fn select_seat(mut self, seat: Seat) -> Self {
        if matches!(self.phase, Phase::Wheel) && self.seats.take(seat) {
            self.phase = Phase::Questions { seat, round: None };
        }
        self
    }

    /// Starts a round on an uncompleted catalog question
    fn start_question(mut self, id: QuestionId, now: SystemTime, catalog: &Catalog) -> Self {
        let Phase::Questions { round, .. } = &mut self.phase else {
            return self;
        };
        if self.progress.is_completed(id) {
            return self;
        }
        let Some(question) = catalog.get(id) else {
            return self;
        };
        let serial = self.progress.next_serial();
        *round = Some(Box::new(Round::start(
            question.clone(),
            serial,
            self.progress.lifetime_rounds(id),
            now,
        )));
        self
    }

    /// Records a submitted answer on the active round
    fn submit_answer(mut self, correct: bool) -> Self {
        let Phase::Questions {
            round: Some(round), ..
        } = &mut self.phase
        else {
            return self;
        };
        if round.submit(correct) {
            let id = round.question().id;
            self.progress.resolve(id);
        }
        self
    }

    /// Resolves the active round after its countdown expired
    fn time_expired(mut self, serial: u64) -> Self {
        let Phase::Questions {
            round: Some(round), ..
        } = &mut self.phase
        else {
            return self;
        };
        if round.expire(serial) {
            let id = round.question().id;
            self.progress.resolve(id);
        }
        self
    }

    /// Overrides the reveal flag of the active round
    fn show_result(mut self, visible: bool) -> Self {
        if let Phase::Questions {
            round: Some(round), ..
        } = &mut self.phase
        {
            round.set_result_visible(visible);
        }
        self
    }

    /// Spends the question's one reset on a fresh retry round
    fn reset_question(mut self, now: SystemTime) -> Self {
        let Phase::Questions {
            round: Some(round), ..
        } = &mut self.phase
        else {
            return self;
        };
        let id = round.question().id;
        let lifetime_rounds = self.progress.lifetime_rounds(id);
        if !round.can_reset(lifetime_rounds) {
            return self;
        }
        let question = round.question().clone();
        let serial = self.progress.next_serial();
        **round = Round::start(question, serial, lifetime_rounds, now);
        self
    }

    /// Adds a catalog question to the completed set (idempotent)
    fn complete_question(mut self, id: QuestionId, catalog: &Catalog) -> Self {
        if !matches!(self.phase, Phase::Questions { .. }) {
            return self;
        }
        if catalog.get(id).is_none() {
            return self;
        }
        self.progress.complete(id);
        self
    }

    /// Drops the seat and any round and shows the wheel again
    fn return_to_wheel(mut self) -> Self {
        if matches!(self.phase, Phase::Questions { .. }) {
            self.phase = Phase::Wheel;
        }
        self
    }
}

/// View synchronization messages for the presentation layer
///
/// One message per screen, carrying everything the renderer needs without
/// reaching back into the game: pool contents, question content, attempt
/// counters, remaining time, and the affordance flags for disabled
/// controls.
#[serde_with::serde_as]
#[derive(Debug, Serialize, Clone)]
pub enum SyncMessage {
    /// The setup screen
    Setup {
        /// Currently configured wheel size
        max_seats: u16,
        /// Number of questions in the catalog
        question_count: usize,
    },
    /// The wheel screen
    Wheel {
        /// Configured wheel size
        max_seats: u16,
        /// Seats still available for drawing, in wheel order
        available: Vec<Seat>,
        /// Whether the spin control should be enabled
        can_spin: bool,
    },
    /// The question board, before a round starts
    QuestionBoard {
        /// The seat being quizzed
        seat: Seat,
        /// Number of questions in the catalog
        question_count: usize,
        /// Completed question ids, ascending
        completed: Vec<QuestionId>,
        /// Whether every question has been completed
        all_completed: bool,
    },
    /// A question round in play
    Question {
        /// The seat being quizzed
        seat: Seat,
        /// Identifier of the question in play
        question: QuestionId,
        /// The prompt text
        prompt: String,
        /// The ordered answer options
        options: Vec<String>,
        /// 1-based number of the attempt being made
        attempt: u8,
        /// Total attempts allowed per round
        attempts_allowed: u8,
        /// Time budget of this round
        #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
        time_limit: Duration,
        /// Time left on the clock
        #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
        remaining: Duration,
    },
    /// The reveal after a round resolved
    Result {
        /// The seat being quizzed
        seat: Seat,
        /// Identifier of the question that was in play
        question: QuestionId,
        /// Outcome of the round
        outcome: Outcome,
        /// Index of the correct option
        correct_option: usize,
        /// Text of the correct option
        correct_text: String,
        /// Explanation to show alongside the reveal
        explanation: String,
        /// Whether the reset control should be enabled
        can_reset: bool,
    },
}

impl SyncMessage {
    /// Converts the sync message to a JSON string for the renderer
    ///
    /// # Panics
    ///
    /// This method panics if serialization fails, which should never happen
    /// with the default JSON serializer for well-formed data.
    pub fn to_message(&self) -> String {
        serde_json::to_string(self).expect("default serializer cannot fail")
    }
}

/// A game session: the catalog plus the current state
///
/// This is the handle the embedder threads through its presentation
/// components: a state snapshot to render from and a dispatch entry point
/// to request transitions. There is no ambient singleton.
#[derive(Serialize, Deserialize)]
pub struct Game {
    /// The fixed question catalog for this session
    catalog: Catalog,
    /// Current session state
    state: GameState,
}

impl Debug for Game {
    /// Custom debug implementation that avoids printing the whole catalog
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("screen", &self.state.screen())
            .finish_non_exhaustive()
    }
}

impl Default for Game {
    /// A fresh session over the builtin catalog
    fn default() -> Self {
        Self::new(Catalog::builtin().clone())
    }
}

impl Game {
    /// Creates a new session over the given catalog
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            state: GameState::default(),
        }
    }

    /// Returns the session's catalog
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Returns the current state snapshot
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Draws one available seat uniformly at random
    ///
    /// Returns `None` when every seat has been drawn; the spin control
    /// must be disabled in that case. The result is dispatched back as
    /// [`Action::SelectSeat`] once the wheel animation lands on it.
    pub fn draw_seat(&self) -> Option<Seat> {
        self.state.seats.draw()
    }

    /// Draws one uncompleted question uniformly at random
    ///
    /// Returns `None` once every question is completed; further draws must
    /// be disabled. The result is dispatched back as
    /// [`Action::StartQuestion`].
    pub fn draw_question(&self) -> Option<&Question> {
        self.catalog.draw(self.state.progress.completed())
    }

    /// Applies an action and schedules any countdown it started
    ///
    /// The transition itself is pure; when it starts a round (a question
    /// start or a reset), `schedule_message` is handed the countdown alarm
    /// and its duration so the presentation can deliver it back through
    /// [`Game::receive_alarm`] when the clock runs out.
    pub fn dispatch<S: FnMut(AlarmMessage, Duration)>(
        &mut self,
        action: Action,
        mut schedule_message: S,
    ) {
        let serial_before = self.state.round().map(Round::serial);

        let state = std::mem::take(&mut self.state);
        self.state = state.apply(action, &self.catalog);

        if let Some(round) = self.state.round() {
            if serial_before != Some(round.serial()) {
                schedule_message(
                    round::AlarmMessage::TimeUp {
                        serial: round.serial(),
                    }
                    .into(),
                    round.time_limit(),
                );
            }
        }
    }

    /// Handles a countdown alarm delivered by the presentation layer
    ///
    /// Synthesizes the time-expired action for the round the alarm was
    /// scheduled for. Alarms for rounds that have since ended (question
    /// changed, round reset, screen left) carry a stale serial and are
    /// silently discarded, so a missed teardown cannot corrupt later play.
    pub fn receive_alarm<S: FnMut(AlarmMessage, Duration)>(
        &mut self,
        message: AlarmMessage,
        schedule_message: S,
    ) {
        match message {
            AlarmMessage::Round(round::AlarmMessage::TimeUp { serial }) => {
                self.dispatch(Action::TimeExpired { serial }, schedule_message);
            }
        }
    }

    /// Returns the message necessary to render the current screen
    pub fn state_message(&self) -> SyncMessage {
        match &self.state.phase {
            Phase::Setup => SyncMessage::Setup {
                max_seats: self.state.seats.max_seats(),
                question_count: self.catalog.len(),
            },
            Phase::Wheel => SyncMessage::Wheel {
                max_seats: self.state.seats.max_seats(),
                available: self.state.seats.available().to_vec(),
                can_spin: !self.state.seats.is_exhausted(),
            },
            Phase::Questions { seat, round } => match round.as_deref() {
                None => SyncMessage::QuestionBoard {
                    seat: *seat,
                    question_count: self.catalog.len(),
                    completed: self
                        .state
                        .progress
                        .completed()
                        .iter()
                        .copied()
                        .sorted()
                        .collect_vec(),
                    all_completed: self.catalog.remaining(self.state.progress.completed()) == 0,
                },
                Some(round) if round.result_visible() => {
                    let question = round.question();
                    SyncMessage::Result {
                        seat: *seat,
                        question: question.id,
                        outcome: round.outcome(),
                        correct_option: question.correct,
                        correct_text: question
                            .options
                            .get(question.correct)
                            .cloned()
                            .unwrap_or_default(),
                        explanation: question.explanation.clone(),
                        can_reset: self.state.can_reset(),
                    }
                }
                Some(round) => SyncMessage::Question {
                    seat: *seat,
                    question: round.question().id,
                    prompt: round.question().prompt.clone(),
                    options: round.question().options.clone(),
                    attempt: (round.attempts() + 1).min(MAX_ROUND_ATTEMPTS),
                    attempts_allowed: MAX_ROUND_ATTEMPTS,
                    time_limit: round.time_limit(),
                    remaining: round.remaining(SystemTime::now()),
                },
            },
        }
    }
}
