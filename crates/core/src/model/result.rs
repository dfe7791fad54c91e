use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::model::{QuizId, ScoreCard};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResultError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,
}

/// Outcome of a finished quiz attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizResult {
    quiz_id: QuizId,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    score: ScoreCard,
    time_limit: Option<Duration>,
}

impl QuizResult {
    /// Build a result for a completed attempt.
    ///
    /// # Errors
    ///
    /// Returns `ResultError::InvalidTimeRange` if `completed_at` is before `started_at`.
    pub fn new(
        quiz_id: QuizId,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        score: ScoreCard,
        time_limit: Option<Duration>,
    ) -> Result<Self, ResultError> {
        if completed_at < started_at {
            return Err(ResultError::InvalidTimeRange);
        }
        Ok(Self {
            quiz_id,
            started_at,
            completed_at,
            score,
            time_limit,
        })
    }

    #[must_use]
    pub fn quiz_id(&self) -> &QuizId {
        &self.quiz_id
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn score(&self) -> &ScoreCard {
        &self.score
    }

    #[must_use]
    pub fn percent(&self) -> f64 {
        self.score.percent()
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.completed_at - self.started_at
    }

    /// True when the attempt took longer than the quiz allowed.
    #[must_use]
    pub fn overtime(&self) -> bool {
        self.time_limit.is_some_and(|limit| self.elapsed() > limit)
    }
}
