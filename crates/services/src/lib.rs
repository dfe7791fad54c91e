#![forbid(unsafe_code)]

pub mod browser;
pub mod error;
pub mod quiz_service;
pub mod remote;
pub mod runner;

pub use quiz_core::Clock;

pub use browser::{Applied, LoadState, QuizBrowser, SelectionTicket};
pub use error::{QuizServiceError, RemoteConfigError};
pub use quiz_service::QuizService;
pub use remote::{RemoteConfig, RestQuestionProvider};
pub use runner::QuizRunner;
