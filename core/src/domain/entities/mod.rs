//! Domain entities representing core business objects.

pub mod token;

// Re-export commonly used types
pub use token::{Claims, Payload, Principal, SubjectId, DEFAULT_SUBJECT_CLAIM};

#[cfg(test)]
mod tests;
