use async_trait::async_trait;
use log::debug;
use quiz_core::model::{Question, Quiz, QuizId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by question providers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProviderError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Read contract consumed by quiz sessions.
///
/// Implementations return the backing store's state at call time. Errors are
/// reported as-is; callers decide whether to retry.
#[async_trait]
pub trait QuestionProvider: Send + Sync {
    /// List every quiz available to take.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` if the backing store cannot be read.
    async fn list_quizzes(&self) -> Result<Vec<Quiz>, ProviderError>;

    /// Fetch the ordered questions of a quiz.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::NotFound` for an unknown quiz, or other provider errors.
    async fn get_questions(&self, quiz_id: &QuizId) -> Result<Vec<Question>, ProviderError>;
}

/// Write side used to seed a store.
#[async_trait]
pub trait QuizCatalog: Send + Sync {
    /// Persist or update a quiz.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` if the quiz cannot be stored.
    async fn upsert_quiz(&self, quiz: &Quiz) -> Result<(), ProviderError>;

    /// Replace the full, ordered question list of a quiz.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::NotFound` if the quiz does not exist.
    async fn replace_questions(
        &self,
        quiz_id: &QuizId,
        questions: &[Question],
    ) -> Result<(), ProviderError>;
}

#[derive(Default)]
struct Catalog {
    // Insertion order drives listing order.
    order: Vec<QuizId>,
    quizzes: HashMap<QuizId, Quiz>,
    questions: HashMap<QuizId, Vec<Question>>,
}

/// Simple in-memory provider for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryProvider {
    catalog: Arc<Mutex<Catalog>>,
}

impl InMemoryProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Catalog>, ProviderError> {
        self.catalog
            .lock()
            .map_err(|e| ProviderError::Connection(e.to_string()))
    }
}

#[async_trait]
impl QuestionProvider for InMemoryProvider {
    async fn list_quizzes(&self) -> Result<Vec<Quiz>, ProviderError> {
        let guard = self.lock()?;
        Ok(guard
            .order
            .iter()
            .filter_map(|id| {
                let stored = guard.questions.get(id).map_or(0, Vec::len);
                let count = u32::try_from(stored).unwrap_or(u32::MAX);
                guard
                    .quizzes
                    .get(id)
                    .map(|quiz| quiz.clone().with_question_count(count))
            })
            .collect())
    }

    async fn get_questions(&self, quiz_id: &QuizId) -> Result<Vec<Question>, ProviderError> {
        let guard = self.lock()?;
        if !guard.quizzes.contains_key(quiz_id) {
            return Err(ProviderError::NotFound);
        }
        let questions = guard.questions.get(quiz_id).cloned().unwrap_or_default();
        debug!("[memory] quiz {quiz_id}: {} questions", questions.len());
        Ok(questions)
    }
}

#[async_trait]
impl QuizCatalog for InMemoryProvider {
    async fn upsert_quiz(&self, quiz: &Quiz) -> Result<(), ProviderError> {
        let mut guard = self.lock()?;
        if guard.quizzes.insert(quiz.id().clone(), quiz.clone()).is_none() {
            guard.order.push(quiz.id().clone());
        }
        Ok(())
    }

    async fn replace_questions(
        &self,
        quiz_id: &QuizId,
        questions: &[Question],
    ) -> Result<(), ProviderError> {
        let mut guard = self.lock()?;
        if !guard.quizzes.contains_key(quiz_id) {
            return Err(ProviderError::NotFound);
        }
        guard.questions.insert(quiz_id.clone(), questions.to_vec());
        Ok(())
    }
}

/// Aggregates the read and write sides behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub questions: Arc<dyn QuestionProvider>,
    pub catalog: Arc<dyn QuizCatalog>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryProvider::new();
        let questions: Arc<dyn QuestionProvider> = Arc::new(repo.clone());
        let catalog: Arc<dyn QuizCatalog> = Arc::new(repo);
        Self { questions, catalog }
    }
}
