use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{AnswerId, QuestionId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("question points must be > 0")]
    InvalidPoints,

    #[error("unknown question type: {0}")]
    UnknownType(String),
}

//
// ─── QUESTION TYPE ─────────────────────────────────────────────────────────────
//

/// How a question is meant to be answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
    ShortAnswer,
}

impl QuestionType {
    /// Stable string encoding used by providers.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::TrueFalse => "true_false",
            QuestionType::ShortAnswer => "short_answer",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = QuestionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "multiple_choice" => Ok(QuestionType::MultipleChoice),
            "true_false" => Ok(QuestionType::TrueFalse),
            "short_answer" => Ok(QuestionType::ShortAnswer),
            other => Err(QuestionError::UnknownType(other.to_owned())),
        }
    }
}

//
// ─── ANSWER ────────────────────────────────────────────────────────────────────
//

/// One candidate response to a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    id: AnswerId,
    text: String,
    is_correct: bool,
}

impl Answer {
    #[must_use]
    pub fn new(id: AnswerId, text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            id,
            text: text.into(),
            is_correct,
        }
    }

    #[must_use]
    pub fn id(&self) -> &AnswerId {
        &self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.is_correct
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single prompt with its ordered candidate answers and point value.
///
/// For multiple-choice and true/false questions the provider is trusted to
/// supply exactly one correct answer; that is not checked here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    kind: QuestionType,
    points: u32,
    answers: Vec<Answer>,
}

impl Question {
    /// Create a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyPrompt` for a blank prompt and
    /// `QuestionError::InvalidPoints` when `points` is zero.
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        kind: QuestionType,
        points: u32,
        answers: Vec<Answer>,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if points == 0 {
            return Err(QuestionError::InvalidPoints);
        }

        Ok(Self {
            id,
            prompt,
            kind,
            points,
            answers,
        })
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn kind(&self) -> QuestionType {
        self.kind
    }

    #[must_use]
    pub fn points(&self) -> u32 {
        self.points
    }

    #[must_use]
    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    #[must_use]
    pub fn answer(&self, index: usize) -> Option<&Answer> {
        self.answers.get(index)
    }

    /// True when `index` points at an answer flagged correct.
    /// Out-of-range indices are simply incorrect.
    #[must_use]
    pub fn is_correct_choice(&self, index: usize) -> bool {
        self.answer(index).is_some_and(Answer::is_correct)
    }

    #[must_use]
    pub fn correct_answer_index(&self) -> Option<usize> {
        self.answers.iter().position(Answer::is_correct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn true_false(id: &str) -> Question {
        Question::new(
            QuestionId::new(id),
            "Rust has a garbage collector.",
            QuestionType::TrueFalse,
            1,
            vec![
                Answer::new(AnswerId::new("1"), "True", false),
                Answer::new(AnswerId::new("2"), "False", true),
            ],
        )
        .unwrap()
    }

    #[test]
    fn correct_choice_checks_flag_and_bounds() {
        let q = true_false("1");
        assert!(!q.is_correct_choice(0));
        assert!(q.is_correct_choice(1));
        assert!(!q.is_correct_choice(2));
        assert_eq!(q.correct_answer_index(), Some(1));
    }

    #[test]
    fn question_rejects_zero_points() {
        let err = Question::new(
            QuestionId::new("1"),
            "Prompt",
            QuestionType::ShortAnswer,
            0,
            Vec::new(),
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::InvalidPoints);
    }

    #[test]
    fn question_rejects_blank_prompt() {
        let err = Question::new(
            QuestionId::new("1"),
            "\n ",
            QuestionType::MultipleChoice,
            2,
            Vec::new(),
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::EmptyPrompt);
    }

    #[test]
    fn question_type_parses_wire_names() {
        for kind in [
            QuestionType::MultipleChoice,
            QuestionType::TrueFalse,
            QuestionType::ShortAnswer,
        ] {
            assert_eq!(kind.as_str().parse::<QuestionType>().unwrap(), kind);
        }
        assert!(matches!(
            "essay".parse::<QuestionType>(),
            Err(QuestionError::UnknownType(raw)) if raw == "essay"
        ));
    }
}
