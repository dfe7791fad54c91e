use std::sync::Arc;

use log::{debug, warn};
use rand::rng;
use rand::seq::SliceRandom;

use quiz_core::model::{Question, Quiz, QuizId};
use storage::repository::QuestionProvider;

use crate::Clock;
use crate::error::QuizServiceError;
use crate::runner::QuizRunner;

/// Fetches quizzes from a provider and starts attempts at them.
#[derive(Clone)]
pub struct QuizService {
    clock: Clock,
    provider: Arc<dyn QuestionProvider>,
    shuffle_questions: bool,
}

impl QuizService {
    #[must_use]
    pub fn new(clock: Clock, provider: Arc<dyn QuestionProvider>) -> Self {
        Self {
            clock,
            provider,
            shuffle_questions: false,
        }
    }

    #[must_use]
    pub fn with_shuffle_questions(mut self, shuffle_questions: bool) -> Self {
        self.shuffle_questions = shuffle_questions;
        self
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// List the quizzes the provider currently offers.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Provider` unchanged from the provider.
    pub async fn list_quizzes(&self) -> Result<Vec<Quiz>, QuizServiceError> {
        let quizzes = self.provider.list_quizzes().await.inspect_err(|e| {
            warn!("[quiz] listing quizzes failed: {e}");
        })?;
        debug!("[quiz] listed {} quizzes", quizzes.len());
        Ok(quizzes)
    }

    /// Fetch the questions of a quiz, shuffled if configured.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Provider` unchanged from the provider.
    pub async fn load_questions(&self, quiz_id: &QuizId) -> Result<Vec<Question>, QuizServiceError> {
        let mut questions = self.provider.get_questions(quiz_id).await.inspect_err(|e| {
            warn!("[quiz] fetching questions for quiz {quiz_id} failed: {e}");
        })?;
        if self.shuffle_questions {
            questions.shuffle(&mut rng());
        }
        Ok(questions)
    }

    /// Fetch the questions of `quiz` and start an attempt.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Provider` if the fetch fails; no session is
    /// created in that case.
    pub async fn start_quiz(&self, quiz: &Quiz) -> Result<QuizRunner, QuizServiceError> {
        let questions = self.load_questions(quiz.id()).await?;
        Ok(self.begin(quiz.clone(), questions)?)
    }

    /// Start an attempt from questions that were fetched elsewhere.
    ///
    /// # Errors
    ///
    /// Propagates `SessionError` from the session.
    pub fn begin(
        &self,
        quiz: Quiz,
        questions: Vec<Question>,
    ) -> Result<QuizRunner, quiz_core::model::SessionError> {
        QuizRunner::start(self.clock, quiz, questions)
    }
}
