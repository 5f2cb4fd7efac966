//! Error taxonomy shared by the repository, the HTTP layer and the client store.
//!
//! "Not found" on id-addressed operations is deliberately absent from the
//! repository's error path: it is reported through [`WriteOutcome`] or an
//! `Option`. [`TaskError::NotFound`] only exists so the client store can surface
//! a 404 from the server to its caller.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A single failed validation rule, addressed by wire field name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub param: String,
    pub msg: String,
}

impl FieldError {
    pub fn new(param: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            param: param.into(),
            msg: msg.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} for '{}'", self.msg, self.param)
    }
}

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("validation failed: {}", format_fields(.0))]
    Validation(Vec<FieldError>),

    #[error("task {0} not found")]
    NotFound(i64),

    #[error("persistence error: {0}")]
    Persistence(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("malformed row: {0}")]
    MalformedRow(String),
}

impl TaskError {
    /// Transport failures and timeouts may succeed on a later attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TaskError::Network(_))
    }
}

impl From<rusqlite::Error> for TaskError {
    fn from(e: rusqlite::Error) -> Self {
        TaskError::Persistence(e.to_string())
    }
}

impl From<reqwest::Error> for TaskError {
    fn from(e: reqwest::Error) -> Self {
        TaskError::Network(e.to_string())
    }
}

/// Result of an id-addressed write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Applied,
    NotFound,
}

fn format_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, e)| format!("{}. {}", i, e))
        .collect::<Vec<_>>()
        .join(", ")
}
