use std::env;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, RequestBuilder, StatusCode};

use quiz_core::model::{Question, Quiz, QuizId};
use storage::records::{decode_questions, decode_quizzes};
use storage::repository::{ProviderError, QuestionProvider};

use crate::error::RemoteConfigError;

const QUIZ_SELECT: &str = "id,title,description,time_limit,QuizQuestion(count)";
const QUESTION_SELECT: &str =
    "id,question_text,question_type,points,QuizAnswer(id,answer_text,is_correct)";

#[derive(Clone, Debug)]
pub struct RemoteConfig {
    pub base_url: String,
    pub api_key: String,
}

impl RemoteConfig {
    /// Read `QUIZ_REMOTE_URL` and `QUIZ_REMOTE_KEY`.
    ///
    /// # Errors
    ///
    /// Returns `RemoteConfigError::Missing` naming the first unset or blank variable.
    pub fn from_env() -> Result<Self, RemoteConfigError> {
        let base_url = non_blank_var("QUIZ_REMOTE_URL")?;
        let api_key = non_blank_var("QUIZ_REMOTE_KEY")?;
        Ok(Self { base_url, api_key })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url.trim_end_matches('/'))
    }
}

fn non_blank_var(name: &'static str) -> Result<String, RemoteConfigError> {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or(RemoteConfigError::Missing(name))
}

/// `QuestionProvider` backed by a PostgREST-style HTTP data store.
#[derive(Clone)]
pub struct RestQuestionProvider {
    client: Client,
    config: RemoteConfig,
}

impl RestQuestionProvider {
    #[must_use]
    pub fn new(config: RemoteConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// # Errors
    ///
    /// See [`RemoteConfig::from_env`].
    pub fn from_env() -> Result<Self, RemoteConfigError> {
        Ok(Self::new(RemoteConfig::from_env()?))
    }

    fn quizzes_request(&self) -> RequestBuilder {
        self.authorized(self.client.get(self.config.table_url("Quiz")))
            .query(&[("select", QUIZ_SELECT), ("order", "id.asc")])
    }

    fn questions_request(&self, quiz_id: &QuizId) -> RequestBuilder {
        self.authorized(self.client.get(self.config.table_url("QuizQuestion")))
            .query(&[
                ("select", QUESTION_SELECT.to_owned()),
                ("quiz_id", format!("eq.{quiz_id}")),
                ("order", "id.asc".to_owned()),
            ])
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
    }

    async fn fetch(request: RequestBuilder) -> Result<String, ProviderError> {
        let response = request.send().await.map_err(conn)?;
        let status = response.status();
        let body = response.text().await.map_err(conn)?;
        successful_body(status, body)
    }
}

fn conn<E: core::fmt::Display>(e: E) -> ProviderError {
    ProviderError::Connection(e.to_string())
}

/// Error statuses are transport failures; only a 2xx body is decoded.
fn successful_body(status: StatusCode, body: String) -> Result<String, ProviderError> {
    if status.is_success() {
        Ok(body)
    } else {
        Err(ProviderError::Connection(format!(
            "request failed with status {status}"
        )))
    }
}

#[async_trait]
impl QuestionProvider for RestQuestionProvider {
    async fn list_quizzes(&self) -> Result<Vec<Quiz>, ProviderError> {
        let body = Self::fetch(self.quizzes_request()).await?;
        let quizzes = decode_quizzes(&body)?;
        debug!("[remote] fetched {} quizzes", quizzes.len());
        Ok(quizzes)
    }

    async fn get_questions(&self, quiz_id: &QuizId) -> Result<Vec<Question>, ProviderError> {
        let body = Self::fetch(self.questions_request(quiz_id)).await?;
        let questions = decode_questions(&body)?;
        debug!("[remote] quiz {quiz_id}: fetched {} questions", questions.len());
        Ok(questions)
    }
}
