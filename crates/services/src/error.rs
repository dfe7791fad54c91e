//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{ResultError, SessionError};
use storage::repository::ProviderError;

/// Errors emitted by quiz orchestration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizServiceError {
    #[error("no quiz is selected")]
    NoSelection,
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Result(#[from] ResultError),
}

/// Errors raised while reading remote provider configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RemoteConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
}
