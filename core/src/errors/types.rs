//! Error types for token handling and request authorization

use thiserror::Error;

/// Token-related errors
///
/// Produced while inspecting a token. Callers of `TokenService::validate`
/// never see them; they collapse into an invalid result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,

    #[error("Token not yet valid")]
    NotYetValid,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token signed with an unexpected algorithm")]
    InvalidAlgorithm,

    #[error("Malformed token")]
    Malformed,

    #[error("Token generation failed")]
    GenerationFailed,

    #[error("Unsupported signing algorithm: {name}")]
    UnsupportedAlgorithm { name: String },
}

impl TokenError {
    pub fn error_code(&self) -> &'static str {
        match self {
            TokenError::Expired => "token_expired",
            TokenError::NotYetValid => "token_not_yet_valid",
            TokenError::InvalidSignature => "invalid_signature",
            TokenError::InvalidAlgorithm => "invalid_algorithm",
            TokenError::Malformed => "malformed_token",
            TokenError::GenerationFailed => "token_generation_failed",
            TokenError::UnsupportedAlgorithm { .. } => "unsupported_algorithm",
        }
    }
}

/// Outcome of a failed header authorization
///
/// `MissingToken` and `InvalidToken` are kept apart only so the boundary
/// layer can pick the user-facing message.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unauthorized {
    #[error("Missing token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Session rejected")]
    SessionRejected,
}

impl Unauthorized {
    /// Plaintext body sent with the 401 response
    pub fn message(&self) -> &'static str {
        match self {
            Unauthorized::MissingToken => "JWT token is required.",
            Unauthorized::InvalidToken | Unauthorized::SessionRejected => "Invalid token.",
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Unauthorized::MissingToken => "missing_token",
            Unauthorized::InvalidToken => "invalid_token",
            Unauthorized::SessionRejected => "session_rejected",
        }
    }
}

/// Errors raised by a `SessionAuthority`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Session refused for subject {subject}")]
    Refused { subject: String },

    #[error("Session store unavailable: {message}")]
    Unavailable { message: String },
}
