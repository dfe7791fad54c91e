use std::sync::Arc;

use chrono::Duration;
use quiz_core::model::{Answer, AnswerId, Question, QuestionId, QuestionType, Quiz, QuizId, SessionState};
use quiz_core::time::fixed_now;
use services::{Applied, Clock, QuizBrowser, QuizService};
use storage::repository::{QuizCatalog, Storage};

fn question(id: u64, points: u32) -> Question {
    Question::new(
        QuestionId::new(id.to_string()),
        format!("Q{id}"),
        QuestionType::MultipleChoice,
        points,
        vec![
            Answer::new(AnswerId::new("1"), "right", true),
            Answer::new(AnswerId::new("2"), "wrong", false),
        ],
    )
    .unwrap()
}

#[tokio::test]
async fn quiz_flow_scores_points_weighted_attempt() {
    let storage = Storage::in_memory();
    let quiz = Quiz::new(QuizId::new("1"), "Smoke Quiz", None, 3, Some(5)).unwrap();
    storage.catalog.upsert_quiz(&quiz).await.unwrap();
    storage
        .catalog
        .replace_questions(quiz.id(), &[question(1, 2), question(2, 1), question(3, 1)])
        .await
        .unwrap();

    let service = QuizService::new(Clock::fixed(fixed_now()), Arc::clone(&storage.questions));
    let mut browser = QuizBrowser::new();
    let quizzes = browser.refresh(&service).await.unwrap().to_vec();
    assert_eq!(browser.open(&service, quizzes[0].clone()).await.unwrap(), Applied::Started);

    let runner = browser.runner_mut().expect("attempt started");
    for choice in [0, 1, 0] {
        runner.answer_current(choice).unwrap();
        runner.advance().unwrap();
    }
    assert_eq!(runner.advance().unwrap(), SessionState::Completed);

    let result = runner.result().unwrap();
    assert_eq!(result.score().earned_points, 3);
    assert_eq!(result.score().total_points, 4);
    assert!((result.percent() - 75.0).abs() < f64::EPSILON);
    assert!(!result.score().is_celebration());
    assert_eq!(result.elapsed(), Duration::zero());
    assert!(!result.overtime());

    browser.back_to_list();
    assert!(browser.runner().is_none());
}

#[tokio::test]
async fn quiz_flow_empty_quiz_scores_zero() {
    let storage = Storage::in_memory();
    let quiz = Quiz::new(QuizId::new("2"), "Empty", None, 0, None).unwrap();
    storage.catalog.upsert_quiz(&quiz).await.unwrap();

    let service = QuizService::new(Clock::fixed(fixed_now()), Arc::clone(&storage.questions));
    let mut runner = service.start_quiz(&quiz).await.unwrap();

    assert!(runner.current_question().is_none());
    assert_eq!(runner.advance().unwrap(), SessionState::Completed);
    assert_eq!(runner.result().unwrap().percent(), 0.0);
}
