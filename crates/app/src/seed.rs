use log::info;
use quiz_core::model::{Answer, AnswerId, Question, QuestionId, QuestionType, Quiz, QuizId};
use storage::repository::QuizCatalog;

fn choices(options: &[(&str, bool)]) -> Vec<Answer> {
    options
        .iter()
        .zip(1_u64..)
        .map(|((text, correct), id)| Answer::new(AnswerId::new(id.to_string()), *text, *correct))
        .collect()
}

/// Sample quiz shipped for trying the binary out.
pub fn sample_quiz() -> Result<(Quiz, Vec<Question>), quiz_core::Error> {
    let questions = vec![
        Question::new(
            QuestionId::new("1"),
            "Which keyword introduces an immutable binding?",
            QuestionType::MultipleChoice,
            1,
            choices(&[("var", false), ("let", true), ("const mut", false)]),
        )?,
        Question::new(
            QuestionId::new("2"),
            "A value can have several mutable borrows at the same time.",
            QuestionType::TrueFalse,
            1,
            choices(&[("True", false), ("False", true)]),
        )?,
        Question::new(
            QuestionId::new("3"),
            "Which trait lets a type be duplicated by a plain bitwise copy?",
            QuestionType::MultipleChoice,
            2,
            choices(&[("Clone", false), ("Copy", true), ("Default", false), ("Send", false)]),
        )?,
        Question::new(
            QuestionId::new("4"),
            "Which type represents an optional value?",
            QuestionType::MultipleChoice,
            1,
            choices(&[("Result", false), ("Box", false), ("Option", true)]),
        )?,
    ];

    let quiz = Quiz::new(
        QuizId::new("1"),
        "Rust fundamentals",
        Some("Bindings, borrowing and core traits".into()),
        u32::try_from(questions.len()).unwrap_or(u32::MAX),
        Some(10),
    )?;

    Ok((quiz, questions))
}

/// Store the sample quiz, replacing any previous copy.
pub async fn seed(catalog: &dyn QuizCatalog) -> Result<Quiz, Box<dyn std::error::Error>> {
    let (quiz, questions) = sample_quiz()?;
    catalog.upsert_quiz(&quiz).await?;
    catalog.replace_questions(quiz.id(), &questions).await?;
    info!("seeded quiz {} with {} questions", quiz.id(), questions.len());
    Ok(quiz)
}
