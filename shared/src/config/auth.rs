//! Authentication configuration

use serde::{Deserialize, Serialize};

const DEFAULT_SECRET: &str = "your-secret-key-change-in-production";

/// JWT authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// JWT secret key for signing tokens
    pub secret: String,

    /// Algorithm for JWT signing (default: HS256)
    #[serde(default = "default_algorithm")]
    pub algorithm: String,

    /// Token lifetime in seconds, used when the settings store has no override
    #[serde(default = "default_token_lifetime")]
    pub token_lifetime: i64,

    /// Host name written to the `iss` and `aud` claims
    #[serde(default = "default_host")]
    pub host: String,

    /// Payload key carrying the subject identifier
    #[serde(default = "default_subject_claim")]
    pub subject_claim: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEFAULT_SECRET),
            algorithm: default_algorithm(),
            token_lifetime: default_token_lifetime(),
            host: default_host(),
            subject_claim: default_subject_claim(),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Set token lifetime in minutes
    pub fn with_lifetime_minutes(mut self, minutes: i64) -> Self {
        self.token_lifetime = minutes * 60;
        self
    }

    /// Set the issuing host
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    #[serde(default)]
    pub jwt: JwtConfig,
}

fn default_algorithm() -> String {
    String::from("HS256")
}

fn default_token_lifetime() -> i64 {
    1200 // 20 minutes
}

fn default_host() -> String {
    String::from("localhost")
}

fn default_subject_claim() -> String {
    String::from("userId")
}
