use crate::domain::entities::token::SubjectId;
use crate::errors::SessionError;

/// Establishes a session for an authenticated subject
pub trait SessionAuthority: Send + Sync {
    /// Authorize the current request context as `subject`
    fn authorize_as(&self, subject: &SubjectId) -> Result<(), SessionError>;
}
