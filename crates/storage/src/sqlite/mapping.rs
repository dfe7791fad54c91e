use std::str::FromStr;

use quiz_core::model::{AnswerId, QuestionId, QuizId};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::ProviderError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> ProviderError {
    ProviderError::Serialization(e.to_string())
}

pub(crate) fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, ProviderError> {
    u32::try_from(v).map_err(|_| ProviderError::Serialization(format!("invalid {field}: {v}")))
}

/// Parse a TEXT id column; blank ids are rejected.
fn id_from_text<T>(field: &'static str, raw: &str) -> Result<T, ProviderError>
where
    T: FromStr,
    T::Err: core::fmt::Display,
{
    raw.parse()
        .map_err(|e| ProviderError::Serialization(format!("invalid {field}: {e}")))
}

pub(crate) fn quiz_id_column(row: &SqliteRow, column: &'static str) -> Result<QuizId, ProviderError> {
    id_from_text(column, &row.try_get::<String, _>(column).map_err(ser)?)
}

pub(crate) fn question_id_column(
    row: &SqliteRow,
    column: &'static str,
) -> Result<QuestionId, ProviderError> {
    id_from_text(column, &row.try_get::<String, _>(column).map_err(ser)?)
}

pub(crate) fn answer_id_column(
    row: &SqliteRow,
    column: &'static str,
) -> Result<AnswerId, ProviderError> {
    id_from_text(column, &row.try_get::<String, _>(column).map_err(ser)?)
}
