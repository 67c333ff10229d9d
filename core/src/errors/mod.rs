//! Domain-specific error types and error handling.

mod types;


// Re-export all error types
pub use types::{SessionError, TokenError, Unauthorized};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Unauthorized(#[from] Unauthorized),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl DomainError {
    /// Stable machine-readable code for logs and responses
    pub fn error_code(&self) -> &'static str {
        match self {
            DomainError::Validation { .. } => "validation_error",
            DomainError::Internal { .. } => "internal_error",
            DomainError::Token(err) => err.error_code(),
            DomainError::Unauthorized(err) => err.error_code(),
            DomainError::Session(_) => "session_rejected",
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
