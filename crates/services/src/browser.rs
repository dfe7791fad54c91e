use log::{debug, warn};

use quiz_core::model::{Question, Quiz, QuizId};

use crate::error::QuizServiceError;
use crate::quiz_service::QuizService;
use crate::runner::QuizRunner;

/// Load status of the quiz list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(String),
}

/// Identity of a pending question fetch.
///
/// Issued by [`QuizBrowser::select`]; a fetch result is applied only while
/// its ticket still matches the current selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionTicket {
    quiz_id: QuizId,
    generation: u64,
}

impl SelectionTicket {
    #[must_use]
    pub fn quiz_id(&self) -> &QuizId {
        &self.quiz_id
    }
}

/// What happened to a fetch result handed to [`QuizBrowser::apply_questions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Started,
    Stale,
}

#[derive(Debug)]
struct Selection {
    quiz: Quiz,
    generation: u64,
}

/// Application-level state for browsing and taking quizzes.
///
/// Owns the quiz list, the selected quiz and at most one live attempt.
/// Selecting another quiz or going back to the list discards the attempt.
#[derive(Debug, Default)]
pub struct QuizBrowser {
    load_state: LoadState,
    quizzes: Vec<Quiz>,
    selection: Option<Selection>,
    runner: Option<QuizRunner>,
    generation: u64,
}

impl QuizBrowser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    #[must_use]
    pub fn quizzes(&self) -> &[Quiz] {
        &self.quizzes
    }

    #[must_use]
    pub fn selected_quiz(&self) -> Option<&Quiz> {
        self.selection.as_ref().map(|s| &s.quiz)
    }

    #[must_use]
    pub fn runner(&self) -> Option<&QuizRunner> {
        self.runner.as_ref()
    }

    pub fn runner_mut(&mut self) -> Option<&mut QuizRunner> {
        self.runner.as_mut()
    }

    /// Reload the quiz list.
    ///
    /// # Errors
    ///
    /// Returns the provider error after recording it in the load state.
    pub async fn refresh(&mut self, service: &QuizService) -> Result<&[Quiz], QuizServiceError> {
        self.load_state = LoadState::Loading;
        match service.list_quizzes().await {
            Ok(quizzes) => {
                self.quizzes = quizzes;
                self.load_state = LoadState::Ready;
                Ok(&self.quizzes)
            }
            Err(err) => {
                self.load_state = LoadState::Failed(err.to_string());
                Err(err)
            }
        }
    }

    /// Make `quiz` the current selection, discarding any live attempt.
    pub fn select(&mut self, quiz: Quiz) -> SelectionTicket {
        self.generation += 1;
        self.runner = None;
        let ticket = SelectionTicket {
            quiz_id: quiz.id().clone(),
            generation: self.generation,
        };
        debug!("[browser] selected quiz {}", ticket.quiz_id);
        self.selection = Some(Selection {
            quiz,
            generation: self.generation,
        });
        ticket
    }

    /// True while `ticket` still describes the current selection.
    #[must_use]
    pub fn is_current(&self, ticket: &SelectionTicket) -> bool {
        self.selection
            .as_ref()
            .is_some_and(|s| *s.quiz.id() == ticket.quiz_id && s.generation == ticket.generation)
    }

    /// Apply the outcome of a question fetch started for `ticket`.
    ///
    /// Results for a superseded selection, or for a selection that already has
    /// a live attempt, are dropped and reported as `Applied::Stale`.
    ///
    /// # Errors
    ///
    /// Returns the fetch error when it belongs to the current selection.
    pub fn apply_questions(
        &mut self,
        service: &QuizService,
        ticket: &SelectionTicket,
        fetched: Result<Vec<Question>, QuizServiceError>,
    ) -> Result<Applied, QuizServiceError> {
        if !self.is_current(ticket) || self.runner.is_some() {
            warn!(
                "[browser] discarding stale question fetch for quiz {}",
                ticket.quiz_id
            );
            return Ok(Applied::Stale);
        }

        let questions = fetched?;
        let quiz = self
            .selection
            .as_ref()
            .map(|s| s.quiz.clone())
            .ok_or(QuizServiceError::NoSelection)?;
        self.runner = Some(service.begin(quiz, questions)?);
        Ok(Applied::Started)
    }

    /// Select `quiz`, fetch its questions and start an attempt.
    ///
    /// # Errors
    ///
    /// Returns the provider error if the fetch fails.
    pub async fn open(
        &mut self,
        service: &QuizService,
        quiz: Quiz,
    ) -> Result<Applied, QuizServiceError> {
        let ticket = self.select(quiz);
        let fetched = service.load_questions(ticket.quiz_id()).await;
        self.apply_questions(service, &ticket, fetched)
    }

    /// Return to the quiz list, discarding the selection and any attempt.
    pub fn back_to_list(&mut self) {
        self.generation += 1;
        self.selection = None;
        self.runner = None;
    }
}
