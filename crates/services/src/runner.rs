use chrono::{DateTime, Duration, Utc};
use log::debug;
use std::fmt;

use quiz_core::model::{
    Question, QuestionId, Quiz, QuizId, QuizResult, QuizSession, SessionError, SessionProgress,
    SessionState,
};
use quiz_core::time::remaining_until;

use crate::Clock;
use crate::error::QuizServiceError;

/// A `QuizSession` plus the wall-clock facts of the attempt.
///
/// The quiz time limit is informational: running past the deadline does not
/// complete the session, it only marks the result as overtime.
pub struct QuizRunner {
    clock: Clock,
    quiz_id: QuizId,
    session: QuizSession,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    time_limit: Option<Duration>,
}

impl QuizRunner {
    /// Start a fresh attempt at `quiz`.
    ///
    /// # Errors
    ///
    /// Propagates `SessionError` from the underlying session.
    pub fn start(clock: Clock, quiz: Quiz, questions: Vec<Question>) -> Result<Self, SessionError> {
        let quiz_id = quiz.id().clone();
        let time_limit = quiz.time_limit();
        let mut session = QuizSession::new();
        session.start(quiz, questions)?;
        let started_at = clock.now();
        debug!(
            "[runner] quiz {quiz_id} started with {} questions",
            session.questions().len()
        );

        Ok(Self {
            clock,
            quiz_id,
            session,
            started_at,
            completed_at: None,
            time_limit,
        })
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    #[must_use]
    pub fn quiz_id(&self) -> &QuizId {
        &self.quiz_id
    }

    #[must_use]
    pub fn quiz(&self) -> Option<&Quiz> {
        self.session.quiz()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.session.current_question()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        self.session.progress()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.session.is_completed()
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// # Errors
    ///
    /// See [`QuizSession::record_answer`].
    pub fn record_answer(
        &mut self,
        question_id: QuestionId,
        answer_index: usize,
    ) -> Result<SessionState, SessionError> {
        self.session.record_answer(question_id, answer_index)
    }

    /// Answer the question currently shown.
    ///
    /// # Errors
    ///
    /// See [`QuizSession::record_current_answer`].
    pub fn answer_current(&mut self, answer_index: usize) -> Result<SessionState, SessionError> {
        self.session.record_current_answer(answer_index)
    }

    /// Advance the session, stamping the completion time on the completing call.
    ///
    /// # Errors
    ///
    /// See [`QuizSession::advance`].
    pub fn advance(&mut self) -> Result<SessionState, SessionError> {
        let was_complete = self.session.is_completed();
        let state = self.session.advance()?;
        if state == SessionState::Completed && !was_complete {
            let now = self.clock.now();
            self.completed_at = Some(now);
            debug!(
                "[runner] quiz {} completed, score {:.2}",
                self.quiz_id,
                self.session.score()
            );
        }
        Ok(state)
    }

    /// Throw the current attempt away and start over with the same questions.
    ///
    /// # Errors
    ///
    /// Propagates `SessionError` if the quiz was never started.
    pub fn retake(&mut self) -> Result<SessionState, SessionError> {
        let Some(quiz) = self.session.quiz().cloned() else {
            return Err(SessionError::InvalidState {
                operation: "retake",
                state: self.session.state(),
            });
        };
        let questions = self.session.questions().to_vec();
        self.session.reset();
        let state = self.session.start(quiz, questions)?;
        self.started_at = self.clock.now();
        self.completed_at = None;
        Ok(state)
    }

    /// When the time limit runs out, if the quiz has one.
    #[must_use]
    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.time_limit.map(|limit| self.started_at + limit)
    }

    #[must_use]
    pub fn time_remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.deadline().map(|deadline| remaining_until(deadline, now))
    }

    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.deadline().is_some_and(|deadline| now >= deadline)
    }

    /// Build the result of a completed attempt.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Session` if the attempt is not complete.
    pub fn result(&self) -> Result<QuizResult, QuizServiceError> {
        let completed_at = self.completed_at.ok_or(SessionError::InvalidState {
            operation: "build a result",
            state: self.session.state(),
        })?;
        Ok(QuizResult::new(
            self.quiz_id.clone(),
            self.started_at,
            completed_at,
            self.session.score_card(),
            self.time_limit,
        )?)
    }
}

impl fmt::Debug for QuizRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizRunner")
            .field("quiz_id", &self.quiz_id)
            .field("state", &self.session.state())
            .field("current_index", &self.session.current_index())
            .field("answered", &self.session.answers().len())
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{Answer, AnswerId, QuestionType};
    use quiz_core::time::fixed_now;

    fn quiz(limit: Option<u32>) -> Quiz {
        Quiz::new(QuizId::new("3"), "Pattern matching", None, 2, limit).unwrap()
    }

    fn question(id: u64) -> Question {
        Question::new(
            QuestionId::new(id.to_string()),
            format!("Q{id}"),
            QuestionType::TrueFalse,
            1,
            vec![
                Answer::new(AnswerId::new("1"), "True", true),
                Answer::new(AnswerId::new("2"), "False", false),
            ],
        )
        .unwrap()
    }

    #[test]
    fn completion_is_stamped_once() {
        let mut clock = Clock::fixed(fixed_now());
        let mut runner = QuizRunner::start(clock, quiz(None), vec![question(1)]).unwrap();

        runner.answer_current(0).unwrap();
        clock.advance(Duration::minutes(1));
        runner.clock = clock;
        runner.advance().unwrap();
        let first = runner.completed_at();

        clock.advance(Duration::minutes(1));
        runner.clock = clock;
        runner.advance().unwrap();

        assert_eq!(runner.completed_at(), first);
        assert_eq!(first, Some(fixed_now() + Duration::minutes(1)));

        let result = runner.result().unwrap();
        assert_eq!(result.elapsed(), Duration::minutes(1));
        assert!((result.percent() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn result_requires_completion() {
        let runner = QuizRunner::start(Clock::fixed(fixed_now()), quiz(None), vec![question(1)]).unwrap();
        assert!(matches!(
            runner.result(),
            Err(QuizServiceError::Session(SessionError::InvalidState { .. }))
        ));
    }

    #[test]
    fn deadline_and_expiry_follow_time_limit() {
        let now = fixed_now();
        let runner = QuizRunner::start(Clock::fixed(now), quiz(Some(10)), vec![question(1)]).unwrap();

        assert_eq!(runner.deadline(), Some(now + Duration::minutes(10)));
        assert_eq!(
            runner.time_remaining(now + Duration::minutes(4)),
            Some(Duration::minutes(6))
        );
        assert!(!runner.is_expired(now + Duration::minutes(9)));
        assert!(runner.is_expired(now + Duration::minutes(10)));
    }

    #[test]
    fn untimed_quiz_never_expires() {
        let runner = QuizRunner::start(Clock::fixed(fixed_now()), quiz(None), vec![question(1)]).unwrap();
        assert_eq!(runner.deadline(), None);
        assert!(!runner.is_expired(fixed_now() + Duration::days(1)));
    }

    #[test]
    fn overtime_is_reported_but_does_not_block_answers() {
        let mut clock = Clock::fixed(fixed_now());
        let mut runner = QuizRunner::start(clock, quiz(Some(1)), vec![question(1)]).unwrap();

        clock.advance(Duration::minutes(2));
        runner.clock = clock;
        runner.answer_current(0).unwrap();
        runner.advance().unwrap();

        assert!(runner.result().unwrap().overtime());
    }

    #[test]
    fn retake_clears_answers_and_restarts_clock() {
        let mut clock = Clock::fixed(fixed_now());
        let mut runner = QuizRunner::start(clock, quiz(None), vec![question(1), question(2)]).unwrap();
        runner.answer_current(1).unwrap();
        runner.advance().unwrap();
        runner.advance().unwrap();
        assert!(runner.is_complete());

        clock.advance(Duration::minutes(5));
        runner.clock = clock;
        assert_eq!(runner.retake().unwrap(), SessionState::InProgress);
        assert!(runner.session().answers().is_empty());
        assert_eq!(runner.session().current_index(), 0);
        assert_eq!(runner.started_at(), fixed_now() + Duration::minutes(5));
        assert_eq!(runner.completed_at(), None);
        assert_eq!(runner.session().questions().len(), 2);
    }
}
