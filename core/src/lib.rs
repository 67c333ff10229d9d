//! # Warden Core
//!
//! Core domain layer for Warden: the signed token claim set, the token
//! service that issues and validates tokens, the session authority
//! capability, the settings store interface, and the error types shared by
//! the outer crates.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
