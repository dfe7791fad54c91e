use chrono::Duration;
use thiserror::Error;

use crate::model::ids::QuizId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz title cannot be empty")]
    EmptyTitle,

    #[error("time limit must be > 0 minutes")]
    InvalidTimeLimit,
}

/// A named collection of questions, as listed by a provider.
///
/// `question_count` is whatever the provider reported and is not reconciled
/// with the questions fetched later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    id: QuizId,
    title: String,
    description: Option<String>,
    question_count: u32,
    time_limit_minutes: Option<u32>,
}

impl Quiz {
    /// Create a validated quiz.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::EmptyTitle` if the title is blank, or
    /// `QuizError::InvalidTimeLimit` if a zero-minute limit is given.
    pub fn new(
        id: QuizId,
        title: impl Into<String>,
        description: Option<String>,
        question_count: u32,
        time_limit_minutes: Option<u32>,
    ) -> Result<Self, QuizError> {
        let raw = title.into();
        let title = raw.trim();
        if title.is_empty() {
            return Err(QuizError::EmptyTitle);
        }
        if time_limit_minutes == Some(0) {
            return Err(QuizError::InvalidTimeLimit);
        }

        let description = description
            .map(|d| d.trim().to_owned())
            .filter(|d| !d.is_empty());

        Ok(Self {
            id,
            title: title.to_owned(),
            description,
            question_count,
            time_limit_minutes,
        })
    }

    #[must_use]
    pub fn id(&self) -> &QuizId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    #[must_use]
    pub fn time_limit_minutes(&self) -> Option<u32> {
        self.time_limit_minutes
    }

    /// The same quiz with a recomputed question count.
    #[must_use]
    pub fn with_question_count(mut self, question_count: u32) -> Self {
        self.question_count = question_count;
        self
    }

    /// The time limit as a duration, if the quiz has one.
    #[must_use]
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_minutes
            .map(|minutes| Duration::minutes(i64::from(minutes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiz_trims_title_and_drops_blank_description() {
        let quiz = Quiz::new(QuizId::new("1"), "  Rust basics ", Some("   ".into()), 3, None).unwrap();
        assert_eq!(quiz.title(), "Rust basics");
        assert_eq!(quiz.description(), None);
        assert_eq!(quiz.time_limit(), None);
    }

    #[test]
    fn quiz_rejects_empty_title() {
        let err = Quiz::new(QuizId::new("1"), " ", None, 0, None).unwrap_err();
        assert_eq!(err, QuizError::EmptyTitle);
    }

    #[test]
    fn quiz_rejects_zero_time_limit() {
        let err = Quiz::new(QuizId::new("1"), "Timed", None, 1, Some(0)).unwrap_err();
        assert_eq!(err, QuizError::InvalidTimeLimit);
    }

    #[test]
    fn time_limit_converts_minutes() {
        let quiz = Quiz::new(QuizId::new("2"), "Timed", None, 5, Some(15)).unwrap();
        assert_eq!(quiz.time_limit(), Some(Duration::minutes(15)));
    }
}
