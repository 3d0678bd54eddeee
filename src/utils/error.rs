//! Error types and handling
//!
//! Common error types used across the recognizer.

use crate::library::store::StoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Crate-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid input: {0}")]
    UserInput(String),

    #[error("Invalid landmark frame: {0}")]
    InvalidFrame(String),

    #[error("Sequence contains no frames")]
    EmptySequence,

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Error response for drivers that surface errors to a UI
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        let code = match &error {
            AppError::Io(_) => "IO_ERROR",
            AppError::Serialization(_) => "SERIALIZATION_ERROR",
            AppError::Store(_) => "STORAGE_ERROR",
            AppError::UserInput(_) => "USER_INPUT",
            AppError::InvalidFrame(_) => "INVALID_FRAME",
            AppError::EmptySequence => "EMPTY_SEQUENCE",
            AppError::Config(_) => "CONFIG_ERROR",
        };

        ErrorResponse {
            code: code.to_string(),
            message: error.to_string(),
        }
    }
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_codes() {
        let response = ErrorResponse::from(AppError::UserInput("sign name cannot be empty".into()));
        assert_eq!(response.code, "USER_INPUT");
        assert!(response.message.contains("sign name cannot be empty"));

        let response = ErrorResponse::from(AppError::EmptySequence);
        assert_eq!(response.code, "EMPTY_SEQUENCE");
    }
}
