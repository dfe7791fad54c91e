//! Wire shapes of the remote quiz data store.
//!
//! Field names follow the store's table columns (`question_text`,
//! `is_correct`, a nested `QuizAnswer` array, ...) so JSON coming back from it
//! decodes without renaming at the call site. Ids may arrive as text or as
//! integers. Conversion into domain types validates and reports failures as
//! `ProviderError::Serialization`.

use quiz_core::model::{
    Answer, AnswerId, Question, QuestionId, QuestionType, Quiz, QuizId,
};
use serde::{Deserialize, Serialize};

use crate::repository::ProviderError;

fn ser<E: core::fmt::Display>(e: E) -> ProviderError {
    ProviderError::Serialization(e.to_string())
}

/// Embedded aggregate, e.g. `QuizQuestion(count)` in a select list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRecord {
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizRecord {
    pub id: QuizId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_count: Option<u32>,
    #[serde(rename = "QuizQuestion", default, skip_serializing_if = "Vec::is_empty")]
    pub question_counts: Vec<CountRecord>,
    #[serde(default)]
    pub time_limit: Option<u32>,
}

impl QuizRecord {
    #[must_use]
    pub fn from_quiz(quiz: &Quiz) -> Self {
        Self {
            id: quiz.id().clone(),
            title: quiz.title().to_owned(),
            description: quiz.description().map(ToOwned::to_owned),
            question_count: Some(quiz.question_count()),
            question_counts: Vec::new(),
            time_limit: quiz.time_limit_minutes(),
        }
    }

    /// Convert into a validated `Quiz`.
    ///
    /// The question count comes from `question_count` when present, otherwise
    /// from an embedded count aggregate, otherwise 0.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Serialization` if the quiz fails validation.
    pub fn into_quiz(self) -> Result<Quiz, ProviderError> {
        let count = self
            .question_count
            .or_else(|| self.question_counts.first().map(|c| c.count))
            .unwrap_or(0);
        Quiz::new(
            self.id,
            self.title,
            self.description,
            count,
            self.time_limit,
        )
        .map_err(ser)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub id: AnswerId,
    pub answer_text: String,
    pub is_correct: bool,
}

impl AnswerRecord {
    #[must_use]
    pub fn from_answer(answer: &Answer) -> Self {
        Self {
            id: answer.id().clone(),
            answer_text: answer.text().to_owned(),
            is_correct: answer.is_correct(),
        }
    }

    #[must_use]
    pub fn into_answer(self) -> Answer {
        Answer::new(self.id, self.answer_text, self.is_correct)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: QuestionId,
    pub question_text: String,
    pub question_type: String,
    pub points: u32,
    #[serde(rename = "QuizAnswer", alias = "answers", default)]
    pub answers: Vec<AnswerRecord>,
}

impl QuestionRecord {
    #[must_use]
    pub fn from_question(question: &Question) -> Self {
        Self {
            id: question.id().clone(),
            question_text: question.prompt().to_owned(),
            question_type: question.kind().as_str().to_owned(),
            points: question.points(),
            answers: question.answers().iter().map(AnswerRecord::from_answer).collect(),
        }
    }

    /// Convert into a validated `Question`, keeping answer order.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Serialization` for an unknown question type or
    /// a question that fails validation.
    pub fn into_question(self) -> Result<Question, ProviderError> {
        let kind: QuestionType = self.question_type.parse().map_err(ser)?;
        let answers = self
            .answers
            .into_iter()
            .map(AnswerRecord::into_answer)
            .collect();
        Question::new(
            self.id,
            self.question_text,
            kind,
            self.points,
            answers,
        )
        .map_err(ser)
    }
}

/// Decode a JSON array of quiz records into domain quizzes.
///
/// # Errors
///
/// Returns `ProviderError::Serialization` for malformed JSON or invalid records.
pub fn decode_quizzes(json: &str) -> Result<Vec<Quiz>, ProviderError> {
    let records: Vec<QuizRecord> = serde_json::from_str(json).map_err(ser)?;
    records.into_iter().map(QuizRecord::into_quiz).collect()
}

/// Decode a JSON array of question records into domain questions.
///
/// # Errors
///
/// Returns `ProviderError::Serialization` for malformed JSON or invalid records.
pub fn decode_questions(json: &str) -> Result<Vec<Question>, ProviderError> {
    let records: Vec<QuestionRecord> = serde_json::from_str(json).map_err(ser)?;
    records
        .into_iter()
        .map(QuestionRecord::into_question)
        .collect()
}
