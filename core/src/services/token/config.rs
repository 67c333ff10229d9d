//! Configuration for the token service

use std::fmt;
use std::str::FromStr;

use jsonwebtoken::Algorithm;
use tracing::debug;
use wd_shared::config::JwtConfig;

use crate::domain::entities::token::DEFAULT_SUBJECT_CLAIM;
use crate::errors::{DomainError, TokenError};
use crate::repositories::SettingsStore;

/// Token lifetime when neither configuration nor settings store provide one
pub const DEFAULT_TOKEN_LIFETIME_SECONDS: i64 = 1200;

/// Longest accepted token lifetime, ten years
pub const MAX_TOKEN_LIFETIME_SECONDS: i64 = 10 * 365 * 24 * 60 * 60;

/// Settings store section holding the lifetime override
pub const SETTINGS_SECTION: &str = "auth";

/// Settings store key holding the lifetime override, in seconds
pub const SETTINGS_LIFETIME_KEY: &str = "session_time";

/// Symmetric signing algorithms usable with a shared secret
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SigningAlgorithm {
    #[default]
    HS256,
    HS384,
    HS512,
}

impl SigningAlgorithm {
    pub fn as_jwt_algorithm(&self) -> Algorithm {
        match self {
            SigningAlgorithm::HS256 => Algorithm::HS256,
            SigningAlgorithm::HS384 => Algorithm::HS384,
            SigningAlgorithm::HS512 => Algorithm::HS512,
        }
    }
}

impl fmt::Display for SigningAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SigningAlgorithm::HS256 => write!(f, "HS256"),
            SigningAlgorithm::HS384 => write!(f, "HS384"),
            SigningAlgorithm::HS512 => write!(f, "HS512"),
        }
    }
}

impl FromStr for SigningAlgorithm {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "HS256" => Ok(SigningAlgorithm::HS256),
            "HS384" => Ok(SigningAlgorithm::HS384),
            "HS512" => Ok(SigningAlgorithm::HS512),
            _ => Err(DomainError::Token(TokenError::UnsupportedAlgorithm {
                name: s.to_string(),
            })),
        }
    }
}

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// JWT signing secret
    pub secret: String,
    /// JWT signing algorithm
    pub algorithm: SigningAlgorithm,
    /// Token lifetime in seconds
    pub lifetime_seconds: i64,
    /// Host name used as issuer and audience
    pub host: String,
    /// Payload key carrying the subject identifier
    pub subject_claim: String,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            secret: "development-secret-please-change-in-production".to_string(),
            algorithm: SigningAlgorithm::default(),
            lifetime_seconds: DEFAULT_TOKEN_LIFETIME_SECONDS,
            host: "localhost".to_string(),
            subject_claim: DEFAULT_SUBJECT_CLAIM.to_string(),
        }
    }
}

impl TokenServiceConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Builds the service configuration from the application's JWT section
    ///
    /// # Returns
    ///
    /// * `Ok(TokenServiceConfig)` - Validated configuration
    /// * `Err(DomainError)` - Unknown algorithm, empty secret or lifetime out of range
    pub fn from_jwt_config(jwt: &JwtConfig) -> Result<Self, DomainError> {
        if jwt.secret.is_empty() {
            return Err(DomainError::Validation {
                message: "JWT secret must not be empty".to_string(),
            });
        }
        if !lifetime_in_range(jwt.token_lifetime) {
            return Err(DomainError::Validation {
                message: format!(
                    "token lifetime must be between 1 and {} seconds, got {}",
                    MAX_TOKEN_LIFETIME_SECONDS, jwt.token_lifetime
                ),
            });
        }

        Ok(Self {
            secret: jwt.secret.clone(),
            algorithm: jwt.algorithm.parse()?,
            lifetime_seconds: jwt.token_lifetime,
            host: jwt.host.clone(),
            subject_claim: jwt.subject_claim.clone(),
        })
    }

    /// Applies the lifetime override from an external settings store
    ///
    /// Missing, unparsable or out-of-range values keep the current lifetime.
    pub fn with_settings(mut self, store: &dyn SettingsStore) -> Self {
        match store.get_i64(SETTINGS_SECTION, SETTINGS_LIFETIME_KEY) {
            Some(lifetime) if lifetime_in_range(lifetime) => {
                debug!(lifetime, "token lifetime overridden by settings store");
                self.lifetime_seconds = lifetime;
            }
            Some(lifetime) => {
                debug!(lifetime, "ignoring out-of-range token lifetime from settings store");
            }
            None => {}
        }
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_lifetime(mut self, seconds: i64) -> Self {
        self.lifetime_seconds = seconds;
        self
    }

    pub fn with_algorithm(mut self, algorithm: SigningAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }
}

fn lifetime_in_range(seconds: i64) -> bool {
    (1..=MAX_TOKEN_LIFETIME_SECONDS).contains(&seconds)
}
