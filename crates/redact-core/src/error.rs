//! Error types for RE-DACT.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// User input rejected before the engine runs.
    #[error("{0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Recognizer error: {0}")]
    Recognizer(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True for errors caused by the caller's input rather than the service.
    pub fn is_user_error(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
