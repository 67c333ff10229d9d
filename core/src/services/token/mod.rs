//! Token service module for JWT management
//!
//! This module handles all token-related operations including:
//! - Signed token issuance with a host-bound claim set
//! - Fail-closed validation of signature and time window
//! - Resolving the `Authorization` carrier header into a subject
//! - Handing the subject to a `SessionAuthority`

mod clock;
mod config;
mod service;

#[cfg(test)]
mod tests;

pub use clock::{Clock, SystemClock};
#[cfg(any(test, feature = "test-util"))]
pub use clock::FixedClock;
pub use config::{
    SigningAlgorithm, TokenServiceConfig, DEFAULT_TOKEN_LIFETIME_SECONDS,
    MAX_TOKEN_LIFETIME_SECONDS, SETTINGS_LIFETIME_KEY, SETTINGS_SECTION,
};
pub use service::TokenService;
