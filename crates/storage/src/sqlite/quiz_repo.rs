use std::collections::HashMap;

use log::debug;
use quiz_core::model::{Answer, Question, QuestionId, QuestionType, Quiz, QuizId};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use super::SqliteRepository;
use super::mapping::{answer_id_column, question_id_column, quiz_id_column, ser, u32_from_i64};
use crate::repository::{ProviderError, QuestionProvider, QuizCatalog};

fn conn<E: core::fmt::Display>(e: E) -> ProviderError {
    ProviderError::Connection(e.to_string())
}

impl SqliteRepository {
    async fn quiz_exists(&self, quiz_id: &QuizId) -> Result<bool, ProviderError> {
        let row = sqlx::query("SELECT 1 FROM quizzes WHERE id = ?1")
            .bind(quiz_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;
        Ok(row.is_some())
    }
}

#[async_trait::async_trait]
impl QuestionProvider for SqliteRepository {
    async fn list_quizzes(&self) -> Result<Vec<Quiz>, ProviderError> {
        let rows = sqlx::query(
            r"
            SELECT q.id, q.title, q.description, q.time_limit_minutes,
                   (SELECT COUNT(*) FROM questions qq WHERE qq.quiz_id = q.id) AS question_count
            FROM quizzes q
            ORDER BY q.rowid ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut quizzes = Vec::with_capacity(rows.len());
        for row in rows {
            quizzes.push(quiz_from_row(&row)?);
        }
        Ok(quizzes)
    }

    async fn get_questions(&self, quiz_id: &QuizId) -> Result<Vec<Question>, ProviderError> {
        let id = quiz_id.as_str();
        if !self.quiz_exists(quiz_id).await? {
            return Err(ProviderError::NotFound);
        }

        let answer_rows = sqlx::query(
            r"
            SELECT question_id, id, answer_text, is_correct
            FROM answers
            WHERE quiz_id = ?1
            ORDER BY question_id ASC, position ASC
            ",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut answers: HashMap<QuestionId, Vec<Answer>> = HashMap::new();
        for row in answer_rows {
            let question_id = question_id_column(&row, "question_id")?;
            let answer = Answer::new(
                answer_id_column(&row, "id")?,
                row.try_get::<String, _>("answer_text").map_err(ser)?,
                row.try_get::<i64, _>("is_correct").map_err(ser)? != 0,
            );
            answers.entry(question_id).or_default().push(answer);
        }

        let question_rows = sqlx::query(
            r"
            SELECT id, question_text, question_type, points
            FROM questions
            WHERE quiz_id = ?1
            ORDER BY position ASC
            ",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut questions = Vec::with_capacity(question_rows.len());
        for row in question_rows {
            let question_id = question_id_column(&row, "id")?;
            let answers = answers.remove(&question_id).unwrap_or_default();
            let kind: QuestionType = row
                .try_get::<String, _>("question_type")
                .map_err(ser)?
                .parse()
                .map_err(ser)?;
            let question = Question::new(
                question_id,
                row.try_get::<String, _>("question_text").map_err(ser)?,
                kind,
                u32_from_i64("points", row.try_get("points").map_err(ser)?)?,
                answers,
            )
            .map_err(ser)?;
            questions.push(question);
        }

        debug!("[sqlite] quiz {quiz_id}: {} questions", questions.len());
        Ok(questions)
    }
}

#[async_trait::async_trait]
impl QuizCatalog for SqliteRepository {
    async fn upsert_quiz(&self, quiz: &Quiz) -> Result<(), ProviderError> {
        sqlx::query(
            r"
            INSERT INTO quizzes (id, title, description, time_limit_minutes)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                time_limit_minutes = excluded.time_limit_minutes
            ",
        )
        .bind(quiz.id().as_str())
        .bind(quiz.title())
        .bind(quiz.description())
        .bind(quiz.time_limit_minutes().map(i64::from))
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(())
    }

    async fn replace_questions(
        &self,
        quiz_id: &QuizId,
        questions: &[Question],
    ) -> Result<(), ProviderError> {
        let id = quiz_id.as_str();
        if !self.quiz_exists(quiz_id).await? {
            return Err(ProviderError::NotFound);
        }

        let mut tx = self.pool.begin().await.map_err(conn)?;

        sqlx::query("DELETE FROM answers WHERE quiz_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        sqlx::query("DELETE FROM questions WHERE quiz_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(conn)?;

        for (position, question) in questions.iter().enumerate() {
            let question_id = question.id().as_str();
            sqlx::query(
                r"
                INSERT INTO questions (quiz_id, id, position, question_text, question_type, points)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                ",
            )
            .bind(id)
            .bind(question_id)
            .bind(i64::try_from(position).map_err(ser)?)
            .bind(question.prompt())
            .bind(question.kind().as_str())
            .bind(i64::from(question.points()))
            .execute(&mut *tx)
            .await
            .map_err(conn)?;

            for (answer_position, answer) in question.answers().iter().enumerate() {
                sqlx::query(
                    r"
                    INSERT INTO answers (quiz_id, question_id, position, id, answer_text, is_correct)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                    ",
                )
                .bind(id)
                .bind(question_id)
                .bind(i64::try_from(answer_position).map_err(ser)?)
                .bind(answer.id().as_str())
                .bind(answer.text())
                .bind(i64::from(answer.is_correct()))
                .execute(&mut *tx)
                .await
                .map_err(conn)?;
            }
        }

        tx.commit().await.map_err(conn)?;
        debug!("[sqlite] quiz {quiz_id}: stored {} questions", questions.len());
        Ok(())
    }
}

fn quiz_from_row(row: &SqliteRow) -> Result<Quiz, ProviderError> {
    Quiz::new(
        quiz_id_column(row, "id")?,
        row.try_get::<String, _>("title").map_err(ser)?,
        row.try_get::<Option<String>, _>("description").map_err(ser)?,
        u32_from_i64("question_count", row.try_get("question_count").map_err(ser)?)?,
        row.try_get::<Option<i64>, _>("time_limit_minutes")
            .map_err(ser)?
            .map(|v| u32_from_i64("time_limit_minutes", v))
            .transpose()?,
    )
    .map_err(ser)
}
