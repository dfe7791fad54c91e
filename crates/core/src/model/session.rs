use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use crate::model::{Question, QuestionId, Quiz, ScoreCard};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    /// A transition was invoked outside the state it is valid in.
    #[error("cannot {operation} while session is {state}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },

    #[error("question {0} is not part of this session")]
    UnknownQuestion(QuestionId),
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SessionState::NotStarted => "not started",
            SessionState::InProgress => "in progress",
            SessionState::Completed => "completed",
        })
    }
}

/// Aggregated view of session progress, useful for a progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    /// 1-based position of the current question; 0 before start or for an empty quiz.
    pub position: usize,
    pub answered: usize,
    pub is_complete: bool,
}

impl SessionProgress {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        100.0 * self.position as f64 / self.total as f64
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-progress state of a single quiz attempt.
///
/// All transitions are synchronous and touch only in-memory fields. Each one
/// returns the resulting [`SessionState`]; invalid transitions fail with
/// [`SessionError::InvalidState`] and leave the session untouched.
#[derive(Debug, Clone, Default)]
pub struct QuizSession {
    state: SessionState,
    quiz: Option<Quiz>,
    questions: Vec<Question>,
    current_index: usize,
    answers: HashMap<QuestionId, usize>,
    completed: bool,
}

impl QuizSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin an attempt at `quiz` with the already-fetched `questions`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` unless the session is `NotStarted`.
    pub fn start(
        &mut self,
        quiz: Quiz,
        questions: Vec<Question>,
    ) -> Result<SessionState, SessionError> {
        self.require("start", SessionState::NotStarted)?;

        self.quiz = Some(quiz);
        self.questions = questions;
        self.current_index = 0;
        self.answers.clear();
        self.completed = false;
        self.state = SessionState::InProgress;
        Ok(self.state)
    }

    /// Record `answer_index` as the response to `question_id`.
    ///
    /// Last write wins; the session does not advance.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` unless the session is `InProgress`,
    /// and `SessionError::UnknownQuestion` if the id is not in this session.
    pub fn record_answer(
        &mut self,
        question_id: QuestionId,
        answer_index: usize,
    ) -> Result<SessionState, SessionError> {
        self.require("record an answer", SessionState::InProgress)?;
        if !self.questions.iter().any(|q| *q.id() == question_id) {
            return Err(SessionError::UnknownQuestion(question_id));
        }

        self.answers.insert(question_id, answer_index);
        Ok(self.state)
    }

    /// Record `answer_index` against the question currently shown.
    ///
    /// # Errors
    ///
    /// Same as [`QuizSession::record_answer`]. An in-progress session with no
    /// questions has nothing to answer and reports `InvalidState`.
    pub fn record_current_answer(&mut self, answer_index: usize) -> Result<SessionState, SessionError> {
        self.require("record an answer", SessionState::InProgress)?;
        let Some(question_id) = self.current_question().map(|q| q.id().clone()) else {
            return Err(SessionError::InvalidState {
                operation: "record an answer without questions",
                state: self.state,
            });
        };
        self.record_answer(question_id, answer_index)
    }

    /// Move to the next question, or complete the session from the last one.
    ///
    /// Repeated calls once completed are a no-op so duplicate UI events are
    /// harmless.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` if the session was never started.
    pub fn advance(&mut self) -> Result<SessionState, SessionError> {
        match self.state {
            SessionState::NotStarted => Err(SessionError::InvalidState {
                operation: "advance",
                state: self.state,
            }),
            SessionState::Completed => Ok(self.state),
            SessionState::InProgress => {
                if self.current_index + 1 < self.questions.len() {
                    self.current_index += 1;
                } else {
                    self.completed = true;
                    self.state = SessionState::Completed;
                }
                Ok(self.state)
            }
        }
    }

    /// Discard the attempt and return to `NotStarted`.
    pub fn reset(&mut self) -> SessionState {
        *self = Self::default();
        self.state
    }

    /// Points-weighted percentage of correct answers; 0 when there are no points.
    #[must_use]
    pub fn score(&self) -> f64 {
        self.score_card().percent()
    }

    #[must_use]
    pub fn score_card(&self) -> ScoreCard {
        ScoreCard::tally(&self.questions, &self.answers)
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.questions.len();
        let position = if self.state == SessionState::NotStarted || total == 0 {
            0
        } else {
            self.current_index + 1
        };
        SessionProgress {
            total,
            position,
            answered: self.answers.len(),
            is_complete: self.completed,
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn quiz(&self) -> Option<&Quiz> {
        self.quiz.as_ref()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The question on screen; `None` before start or when there are no questions.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.state == SessionState::NotStarted {
            return None;
        }
        self.questions.get(self.current_index)
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    #[must_use]
    pub fn answers(&self) -> &HashMap<QuestionId, usize> {
        &self.answers
    }

    #[must_use]
    pub fn answer_for(&self, question_id: &QuestionId) -> Option<usize> {
        self.answers.get(question_id).copied()
    }

    fn require(&self, operation: &'static str, expected: SessionState) -> Result<(), SessionError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidState {
                operation,
                state: self.state,
            })
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Answer, AnswerId, QuestionType, QuizId};

    fn quiz() -> Quiz {
        Quiz::new(QuizId::new("1"), "Ownership", None, 2, Some(10)).unwrap()
    }

    fn question(id: u64, points: u32) -> Question {
        Question::new(
            QuestionId::new(id.to_string()),
            format!("Question {id}"),
            QuestionType::MultipleChoice,
            points,
            vec![
                Answer::new(AnswerId::new(format!("{id}-a")), "right", true),
                Answer::new(AnswerId::new(format!("{id}-b")), "wrong", false),
            ],
        )
        .unwrap()
    }

    fn started(questions: Vec<Question>) -> QuizSession {
        let mut session = QuizSession::new();
        session.start(quiz(), questions).unwrap();
        session
    }

    #[test]
    fn half_right_scores_fifty() {
        let mut session = started(vec![question(1, 1), question(2, 1)]);

        session.record_answer(QuestionId::new("1"), 0).unwrap();
        session.advance().unwrap();
        session.record_answer(QuestionId::new("2"), 1).unwrap();
        let state = session.advance().unwrap();

        assert_eq!(state, SessionState::Completed);
        assert!((session.score() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn last_answer_wins() {
        let mut session = started(vec![question(1, 1)]);

        session.record_answer(QuestionId::new("1"), 1).unwrap();
        session.record_answer(QuestionId::new("1"), 0).unwrap();
        session.advance().unwrap();

        assert_eq!(session.answer_for(&QuestionId::new("1")), Some(0));
        assert_eq!(session.answers().len(), 1);
        assert!((session.score() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn recording_does_not_advance() {
        let mut session = started(vec![question(1, 1), question(2, 1)]);
        session.record_current_answer(0).unwrap();
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.answer_for(&QuestionId::new("1")), Some(0));
    }

    #[test]
    fn advance_completes_once_then_is_noop() {
        let mut session = started(vec![question(1, 1), question(2, 1), question(3, 1)]);

        assert_eq!(session.advance().unwrap(), SessionState::InProgress);
        assert_eq!(session.advance().unwrap(), SessionState::InProgress);
        assert_eq!(session.current_index(), 2);
        assert_eq!(session.advance().unwrap(), SessionState::Completed);
        assert!(session.is_completed());

        assert_eq!(session.advance().unwrap(), SessionState::Completed);
        assert_eq!(session.current_index(), 2);
    }

    #[test]
    fn record_after_completion_is_rejected() {
        let mut session = started(vec![question(1, 1)]);
        session.advance().unwrap();

        let err = session.record_answer(QuestionId::new("1"), 0).unwrap_err();
        assert_eq!(
            err,
            SessionError::InvalidState {
                operation: "record an answer",
                state: SessionState::Completed,
            }
        );
        assert!(session.answers().is_empty());
    }

    #[test]
    fn empty_quiz_completes_with_zero_score() {
        let mut session = started(Vec::new());

        assert!(session.current_question().is_none());
        assert_eq!(
            session.record_current_answer(0).unwrap_err(),
            SessionError::InvalidState {
                operation: "record an answer without questions",
                state: SessionState::InProgress,
            }
        );
        assert!(session.answers().is_empty());

        assert_eq!(session.advance().unwrap(), SessionState::Completed);
        assert_eq!(session.score(), 0.0);
        assert_eq!(session.progress().percent(), 0.0);
    }

    #[test]
    fn reset_allows_a_fresh_start() {
        let mut session = started(vec![question(1, 1), question(2, 1)]);
        session.record_answer(QuestionId::new("1"), 0).unwrap();
        session.advance().unwrap();
        session.advance().unwrap();
        assert!(session.is_completed());

        assert_eq!(session.reset(), SessionState::NotStarted);
        assert_eq!(session.current_index(), 0);
        assert!(session.answers().is_empty());
        assert!(!session.is_completed());
        assert!(session.quiz().is_none());

        session.start(quiz(), vec![question(3, 2)]).unwrap();
        assert_eq!(session.state(), SessionState::InProgress);
    }

    #[test]
    fn start_twice_is_rejected() {
        let mut session = started(vec![question(1, 1)]);
        let err = session.start(quiz(), Vec::new()).unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidState {
                state: SessionState::InProgress,
                ..
            }
        ));
        assert_eq!(session.questions().len(), 1);
    }

    #[test]
    fn transitions_before_start_are_rejected() {
        let mut session = QuizSession::new();
        assert!(session.advance().is_err());
        assert!(session.record_answer(QuestionId::new("1"), 0).is_err());
        assert_eq!(session.score(), 0.0);
    }

    #[test]
    fn unknown_question_is_rejected_without_mutation() {
        let mut session = started(vec![question(1, 1)]);
        let err = session.record_answer(QuestionId::new("42"), 0).unwrap_err();
        assert_eq!(err, SessionError::UnknownQuestion(QuestionId::new("42")));
        assert!(session.answers().is_empty());
    }

    #[test]
    fn progress_tracks_position() {
        let mut session = started(vec![question(1, 1), question(2, 1)]);
        assert_eq!(session.progress().position, 1);
        assert!((session.progress().percent() - 50.0).abs() < f64::EPSILON);
        session.advance().unwrap();
        assert_eq!(session.progress().position, 2);
    }

    #[test]
    fn unanswered_questions_count_against_weighted_score() {
        let mut session = started(vec![question(1, 3), question(2, 1)]);
        session.record_answer(QuestionId::new("2"), 0).unwrap();
        session.advance().unwrap();
        session.advance().unwrap();
        assert!((session.score() - 25.0).abs() < f64::EPSILON);
    }
}
