//! Error handling for the bakery management backend
//!
//! Only boundary failures surface here: persistence errors, invalid inputs,
//! and illegal order transitions. Resolution misses and division guards
//! inside the computation layer degrade to zero instead (see the shared
//! crate) and never produce an `AppError`.

use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias for services
pub type AppResult<T> = Result<T, AppError>;
