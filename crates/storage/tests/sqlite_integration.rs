use quiz_core::model::{Answer, AnswerId, Question, QuestionId, QuestionType, Quiz, QuizId};
use storage::repository::{ProviderError, QuestionProvider, QuizCatalog, Storage};
use storage::sqlite::SqliteRepository;

fn question(id: &str, kind: QuestionType, points: u32, correct: usize) -> Question {
    let answers = (0..3)
        .map(|i| Answer::new(AnswerId::new(format!("{id}-{i}")), format!("answer {i}"), i == correct))
        .collect();
    Question::new(QuestionId::new(id), format!("prompt {id}"), kind, points, answers).unwrap()
}

async fn connect(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let repo = SqliteRepository::connect(&url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

#[tokio::test]
async fn sqlite_roundtrip_preserves_question_and_answer_order() {
    let repo = connect("memdb_roundtrip").await;

    let quiz = Quiz::new(QuizId::new("1"), "Borrowing", Some("refs".into()), 0, Some(15)).unwrap();
    repo.upsert_quiz(&quiz).await.unwrap();

    let questions = vec![
        question("b7e2", QuestionType::MultipleChoice, 2, 2),
        question("0a9d", QuestionType::TrueFalse, 1, 0),
    ];
    repo.replace_questions(quiz.id(), &questions).await.unwrap();

    let fetched = repo.get_questions(quiz.id()).await.expect("fetch");
    assert_eq!(fetched, questions);

    let listed = repo.list_quizzes().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title(), "Borrowing");
    assert_eq!(listed[0].question_count(), 2);
    assert_eq!(listed[0].time_limit_minutes(), Some(15));
}

#[tokio::test]
async fn sqlite_replace_questions_overwrites_previous_set() {
    let repo = connect("memdb_replace").await;

    let quiz = Quiz::new(QuizId::new("2"), "Traits", None, 0, None).unwrap();
    repo.upsert_quiz(&quiz).await.unwrap();
    repo.replace_questions(
        quiz.id(),
        &[
            question("1", QuestionType::TrueFalse, 1, 0),
            question("2", QuestionType::TrueFalse, 1, 1),
        ],
    )
    .await
    .unwrap();
    repo.replace_questions(quiz.id(), &[question("3", QuestionType::ShortAnswer, 5, 0)])
        .await
        .unwrap();

    let fetched = repo.get_questions(quiz.id()).await.unwrap();
    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].id(), &QuestionId::new("3"));
    assert_eq!(fetched[0].points(), 5);
}

#[tokio::test]
async fn sqlite_unknown_quiz_is_not_found() {
    let repo = connect("memdb_missing").await;
    let err = repo.get_questions(&QuizId::new("99")).await.unwrap_err();
    assert_eq!(err, ProviderError::NotFound);
}

#[tokio::test]
async fn storage_sqlite_wires_both_sides() {
    let storage = Storage::sqlite("sqlite:file:memdb_storage?mode=memory&cache=shared")
        .await
        .expect("storage");

    let quiz = Quiz::new(QuizId::new("5"), "Iterators", None, 0, None).unwrap();
    storage.catalog.upsert_quiz(&quiz).await.unwrap();

    let listed = storage.questions.list_quizzes().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].question_count(), 0);
    assert!(storage.questions.get_questions(quiz.id()).await.unwrap().is_empty());
}

#[tokio::test]
async fn sqlite_lists_quizzes_in_insertion_order() {
    let repo = connect("memdb_order").await;

    for (id, title) in [("zeta", "Closures"), ("alpha", "Generics")] {
        let quiz = Quiz::new(QuizId::new(id), title, None, 0, None).unwrap();
        repo.upsert_quiz(&quiz).await.unwrap();
    }
    let renamed = Quiz::new(QuizId::new("zeta"), "Closures, again", None, 0, None).unwrap();
    repo.upsert_quiz(&renamed).await.unwrap();

    let listed = repo.list_quizzes().await.unwrap();
    let ids: Vec<_> = listed.iter().map(|q| q.id().as_str()).collect();
    assert_eq!(ids, ["zeta", "alpha"]);
    assert_eq!(listed[0].title(), "Closures, again");
}
