//! Process-local session authority

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::domain::entities::token::SubjectId;
use crate::errors::SessionError;

use super::SessionAuthority;

/// Records every granted subject in memory and refuses a fixed deny-list.
#[derive(Debug, Default)]
pub struct InMemorySessionAuthority {
    denied: HashSet<String>,
    grants: Mutex<Vec<SubjectId>>,
}

impl InMemorySessionAuthority {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse sessions for the given subject ids
    pub fn with_denied<I, S>(mut self, subjects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.denied.extend(subjects.into_iter().map(Into::into));
        self
    }

    /// Subjects authorized so far, in grant order
    pub fn grants(&self) -> Vec<SubjectId> {
        self.grants
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authorized(&self, subject: &SubjectId) -> bool {
        self.grants
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(subject)
    }
}

impl SessionAuthority for InMemorySessionAuthority {
    fn authorize_as(&self, subject: &SubjectId) -> Result<(), SessionError> {
        if self.denied.contains(subject.as_str()) {
            return Err(SessionError::Refused {
                subject: subject.to_string(),
            });
        }

        self.grants
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(subject.clone());
        debug!(subject = %subject, "session authorized");
        Ok(())
    }
}
