//! Question catalog and question selection
//!
//! This module defines the trivia questions used by the game: the
//! [`Question`] record, the dense [`QuestionId`] identifier, and the
//! immutable [`Catalog`] they live in. The compiled-in catalog of ten
//! questions is exposed through [`Catalog::builtin`]; custom catalogs can
//! be constructed and validated at startup but there is no loading or
//! authoring surface beyond that.

use std::{collections::HashSet, fmt::Display, num::ParseIntError, str::FromStr};

use enum_map::{Enum, EnumArray};
use garde::Validate;
use itertools::Itertools;
use once_cell_serde::sync::OnceCell;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest valid question identifier
const MIN_ID: u8 = 1;
/// Largest valid question identifier
const MAX_ID: u8 = crate::constants::catalog::MAX_QUESTION_COUNT as u8;

/// A unique identifier for a question in a catalog
///
/// Identifiers are small integers in `[1, MAX_QUESTION_COUNT]`, which keeps
/// them cheap to display on the question board and lets per-question
/// counters live in a dense [`enum_map::EnumMap`] instead of a hash map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(u8);

impl QuestionId {
    /// Wraps a raw identifier value
    ///
    /// The value is not range-checked here; [`Catalog::new`] rejects
    /// out-of-range identifiers when a catalog is assembled.
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Returns the raw identifier value
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Whether the identifier lies within the valid catalog range
    pub const fn in_range(self) -> bool {
        MIN_ID <= self.0 && self.0 <= MAX_ID
    }
}

impl Display for QuestionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for QuestionId {
    type Err = ParseIntError;

    /// Parses a question ID from its decimal representation
    ///
    /// # Errors
    ///
    /// Returns a `ParseIntError` if the string is not a valid `u8`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl Enum for QuestionId {
    /// Total number of possible question IDs
    const LENGTH: usize = crate::constants::catalog::MAX_QUESTION_COUNT;

    /// Creates a question ID from a usize index
    ///
    /// # Panics
    ///
    /// Panics if the value is out of range for the enum.
    fn from_usize(value: usize) -> Self {
        Self(u8::try_from(value).expect("index out of range for Enum::from_usize") + MIN_ID)
    }

    /// Converts the question ID to a usize index
    ///
    /// The returned value is clamped to the valid range to prevent
    /// array access violations.
    fn into_usize(self) -> usize {
        usize::from(self.0.saturating_sub(MIN_ID)).min(Self::LENGTH - 1)
    }
}

impl<V> EnumArray<V> for QuestionId {
    /// Array type for storing values indexed by `QuestionId`
    type Array = [V; Self::LENGTH];
}

/// Validates the answer options of a question
///
/// Every question carries exactly [`crate::constants::catalog::OPTION_COUNT`]
/// options, each within the option length limit.
fn validate_options(val: &[String]) -> garde::Result {
    if val.len() != crate::constants::catalog::OPTION_COUNT {
        return Err(garde::Error::new(format!(
            "expected exactly {} options, got {}",
            crate::constants::catalog::OPTION_COUNT,
            val.len()
        )));
    }
    if let Some(too_long) = val
        .iter()
        .find(|option| option.chars().count() > crate::constants::catalog::MAX_OPTION_LENGTH)
    {
        return Err(garde::Error::new(format!(
            "option {too_long:?} exceeds {} characters",
            crate::constants::catalog::MAX_OPTION_LENGTH
        )));
    }
    Ok(())
}

/// A single trivia question
///
/// Questions are immutable records: a prompt, exactly four answer options,
/// the index of the correct option, and a short explanation revealed after
/// the round resolves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Question {
    /// Identifier of this question, unique within its catalog
    #[garde(skip)]
    pub id: QuestionId,
    /// The prompt text shown to the participant
    #[garde(length(max = crate::constants::catalog::MAX_PROMPT_LENGTH))]
    pub prompt: String,
    /// The ordered answer options
    #[garde(custom(|v, _| validate_options(v)))]
    pub options: Vec<String>,
    /// Index into `options` of the correct answer
    #[garde(range(max = crate::constants::catalog::OPTION_COUNT - 1))]
    pub correct: usize,
    /// Explanation shown alongside the reveal
    #[garde(length(max = crate::constants::catalog::MAX_EXPLANATION_LENGTH))]
    pub explanation: String,
}

impl Question {
    /// Whether the given option index answers this question correctly
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct
    }
}

/// Errors that can occur when assembling a catalog
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The catalog contains no questions
    #[error("catalog cannot be empty")]
    Empty,
    /// Two questions share the same identifier
    #[error("duplicate question id {0}")]
    DuplicateId(QuestionId),
    /// A question identifier lies outside the valid range
    #[error("question id {0} is out of range")]
    IdOutOfRange(QuestionId),
}

/// An immutable collection of questions
///
/// A catalog is assembled once at startup and never changes afterwards;
/// game progress (which questions are completed, how many rounds each has
/// seen) lives in the game state, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Catalog {
    /// The questions, in board display order
    #[garde(length(min = 1, max = crate::constants::catalog::MAX_QUESTION_COUNT), dive)]
    questions: Vec<Question>,
}

/// The compiled-in ten-question catalog
static BUILTIN: OnceCell<Catalog> = OnceCell::new();

impl Catalog {
    /// Assembles a catalog from a list of questions
    ///
    /// # Errors
    ///
    /// Returns [`Error::Empty`] for an empty list, [`Error::IdOutOfRange`]
    /// for an identifier outside `[1, MAX_QUESTION_COUNT]`, and
    /// [`Error::DuplicateId`] when two questions share an identifier.
    pub fn new(questions: Vec<Question>) -> Result<Self, Error> {
        if questions.is_empty() {
            return Err(Error::Empty);
        }
        let mut seen = HashSet::new();
        for question in &questions {
            if !question.id.in_range() {
                return Err(Error::IdOutOfRange(question.id));
            }
            if !seen.insert(question.id) {
                return Err(Error::DuplicateId(question.id));
            }
        }
        Ok(Self { questions })
    }

    /// Returns the fixed catalog the game ships with
    ///
    /// The ten questions (and their explanations) of the live event,
    /// assembled once and shared for the lifetime of the process.
    pub fn builtin() -> &'static Self {
        BUILTIN.get_or_init(|| {
            Self::new(builtin_questions()).expect("builtin catalog is well-formed")
        })
    }

    /// Returns the number of questions in this catalog
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Checks whether this catalog contains any questions
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Returns the questions in board display order
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Looks up a question by its identifier
    pub fn get(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|question| question.id == id)
    }

    /// Number of questions not yet in `completed`
    pub fn remaining(&self, completed: &HashSet<QuestionId>) -> usize {
        self.questions
            .iter()
            .filter(|question| !completed.contains(&question.id))
            .count()
    }

    /// Draws one uncompleted question uniformly at random
    ///
    /// Returns `None` once every question in the catalog is completed;
    /// callers must disable further draws in that case. The catalog itself
    /// is not modified; completion is recorded through game transitions.
    pub fn draw(&self, completed: &HashSet<QuestionId>) -> Option<&Question> {
        let open = self
            .questions
            .iter()
            .filter(|question| !completed.contains(&question.id))
            .collect_vec();
        fastrand::choice(open)
    }
}

/// The ten questions of the running-themed live event
fn builtin_questions() -> Vec<Question> {
    let question = |id: u8, prompt: &str, options: [&str; 4], correct: usize, explanation: &str| {
        Question {
            id: QuestionId::new(id),
            prompt: prompt.to_owned(),
            options: options.iter().map(|option| (*option).to_owned()).collect(),
            correct,
            explanation: explanation.to_owned(),
        }
    };

    vec![
        question(
            1,
            "Tên gọi chính thức của cuộc thi chạy có quãng đường 42,195 km là gì?",
            ["Half Marathon", "Marathon", "Ultra Marathon", "Sprint Marathon"],
            1,
            "Marathon là cự ly chạy chuẩn dài 42,195 km.",
        ),
        question(
            2,
            "Khởi động trước khi chạy có tác dụng chính là gì?",
            [
                "Tăng sức bền",
                "Giúp giảm cân",
                "Giảm nguy cơ chấn thương",
                "Tăng tốc độ",
            ],
            2,
            "Khởi động kỹ giúp cơ thể sẵn sàng và giảm nguy cơ chấn thương.",
        ),
        question(
            3,
            "Loại chấn thương phổ biến nhất mà người chạy bộ hay gặp phải là gì?",
            [
                "Chấn thương cổ tay",
                "Đau đầu gối (Runner's Knee)",
                "Đau lưng",
                "Chấn thương vai",
            ],
            1,
            "Đau đầu gối là chấn thương thường gặp nhất ở người chạy bộ.",
        ),
        question(
            4,
            "Thời gian tốt nhất để nạp năng lượng sau khi chạy là trong khoảng thời gian nào?",
            ["Ngay lập tức", "Sau 2 giờ", "30 phút đầu tiên", "Sau 4 giờ"],
            2,
            "Nạp năng lượng trong 30 phút đầu giúp cơ thể phục hồi tốt nhất.",
        ),
        question(
            5,
            "Biểu hiện của \"chuột rút\" là gì?",
            [
                "Cảm giác châm chích ở chân",
                "Buồn nôn",
                "Co thắt cơ đột ngột",
                "Hoa mắt",
            ],
            2,
            "Chuột rút là hiện tượng co thắt cơ đột ngột và gây đau.",
        ),
        question(
            6,
            "Đôi giày chuyên dụng cho chạy bộ có đặc điểm gì nổi bật?",
            [
                "Cứng và nhẹ",
                "Có độ đàn hồi và đệm tốt",
                "Lớp đế mỏng",
                "Bề mặt nhẵn",
            ],
            1,
            "Giày chạy bộ cần độ đàn hồi và đệm tốt để giảm chấn động.",
        ),
        question(
            7,
            "Mục đích của việc hít thở bằng bụng khi chạy là gì?",
            [
                "Giảm đau",
                "Tăng hiệu quả hô hấp",
                "Giúp cơ bắp săn chắc",
                "Giảm mệt mỏi",
            ],
            1,
            "Hít thở bằng bụng giúp tăng hiệu quả hô hấp khi chạy.",
        ),
        question(
            8,
            "Tại sao không nên chạy quá sức khi mới bắt đầu?",
            [
                "Gây lãng phí năng lượng",
                "Dễ dẫn đến chấn thương và nản chí",
                "Giảm tốc độ",
                "Giảm khả năng đốt mỡ",
            ],
            1,
            "Chạy quá sức khi mới bắt đầu dễ dẫn đến chấn thương và nản chí.",
        ),
        question(
            9,
            "Tên tiếng Anh của môn chạy bộ là gì?",
            ["Walking", "Swimming", "Running", "Cycling"],
            2,
            "Môn chạy bộ trong tiếng Anh gọi là Running.",
        ),
        question(
            10,
            "Tác dụng của việc bổ sung nước điện giải khi chạy là gì?",
            [
                "Hỗ trợ tiêu hóa",
                "Bù nước và khoáng chất bị mất",
                "Tăng tốc độ",
                "Giảm cân nhanh hơn",
            ],
            1,
            "Nước điện giải giúp bù nước và khoáng chất bị mất qua mồ hôi.",
        ),
    ]
}
