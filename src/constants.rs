//! Configuration constants for the lucky wheel game
//!
//! This module contains all the configuration limits and constraints
//! used throughout the game to keep seat configuration, round timing,
//! and catalog contents within consistent boundaries.

/// Seat and wheel configuration constants
pub mod seats {
    /// Smallest configurable number of seats on the wheel
    pub const MIN_SEATS: u16 = 10;
    /// Largest configurable number of seats on the wheel
    pub const MAX_SEATS: u16 = 100;
    /// Number of seats used when no configuration is supplied
    pub const DEFAULT_SEATS: u16 = 60;
}

/// Question round timing and attempt constants
pub mod round {
    /// Time limit in seconds for the first round of a question
    pub const FIRST_TIME_LIMIT: u64 = 15;
    /// Time limit in seconds for any later round of the same question
    pub const RETRY_TIME_LIMIT: u64 = 10;
    /// Maximum number of submitted answers per round before the reveal
    pub const MAX_ROUND_ATTEMPTS: u8 = 2;
    /// Maximum number of resolved rounds per question, bounding resets
    pub const MAX_LIFETIME_ROUNDS: u8 = 2;
}

/// Question catalog configuration constants
pub mod catalog {
    /// Number of answer options every question carries
    pub const OPTION_COUNT: usize = 4;
    /// Largest question identifier a catalog may contain
    pub const MAX_QUESTION_COUNT: usize = 100;
    /// Number of questions in the compiled-in catalog
    pub const BUILTIN_QUESTION_COUNT: usize = 10;
    /// Maximum length of a question prompt in characters
    pub const MAX_PROMPT_LENGTH: usize = 400;
    /// Maximum length of a single answer option in characters
    pub const MAX_OPTION_LENGTH: usize = 200;
    /// Maximum length of an explanation in characters
    pub const MAX_EXPLANATION_LENGTH: usize = 400;
}
