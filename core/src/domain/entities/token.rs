//! Token entities for JWT-based authentication.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::TokenError;

/// Payload key carrying the subject identifier unless configured otherwise
pub const DEFAULT_SUBJECT_CLAIM: &str = "userId";

/// Opaque caller-supplied data embedded in a token
pub type Payload = Map<String, Value>;

/// Claims structure for JWT payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer (serving host)
    pub iss: String,

    /// Audience (serving host)
    pub aud: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Caller payload
    #[serde(default)]
    pub data: Payload,
}

impl Claims {
    /// Creates the claim set for a new token
    ///
    /// # Arguments
    ///
    /// * `host` - Host name used as issuer and audience
    /// * `data` - Caller payload
    /// * `issued_at` - Creation instant, also used as `nbf`
    /// * `lifetime_seconds` - Seconds until `exp`
    ///
    /// # Returns
    ///
    /// * `Err(TokenError::GenerationFailed)` - `exp` does not fit in a timestamp
    pub fn new(
        host: &str,
        data: Payload,
        issued_at: DateTime<Utc>,
        lifetime_seconds: i64,
    ) -> Result<Self, TokenError> {
        let now = issued_at.timestamp();
        let exp = now
            .checked_add(lifetime_seconds)
            .ok_or(TokenError::GenerationFailed)?;

        Ok(Self {
            iss: host.to_string(),
            aud: host.to_string(),
            iat: now,
            nbf: now,
            exp,
            data,
        })
    }

    /// Checks whether `now` falls inside `[nbf, exp)`
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        let now = now.timestamp();
        now >= self.nbf && now < self.exp
    }

    /// Checks whether the claims have expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Checks whether the claims are not yet usable at `now`
    pub fn is_premature_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() < self.nbf
    }

    /// Extracts the subject identifier stored under `claim` in the payload
    pub fn subject(&self, claim: &str) -> Option<SubjectId> {
        SubjectId::from_payload(&self.data, claim)
    }
}

/// Identifier of the principal a token was issued for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(String);

impl SubjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Reads a subject from a payload value.
    ///
    /// Non-empty strings and integers are accepted; integers keep their
    /// decimal form.
    pub fn from_claim(value: &Value) -> Option<Self> {
        match value {
            Value::String(id) if !id.trim().is_empty() => Some(Self(id.trim().to_string())),
            Value::Number(n) if n.is_i64() || n.is_u64() => Some(Self(n.to_string())),
            _ => None,
        }
    }

    pub fn from_payload(payload: &Payload, claim: &str) -> Option<Self> {
        payload.get(claim).and_then(Self::from_claim)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Subject and payload of an accepted token
#[derive(Debug, Clone, PartialEq)]
pub struct Principal {
    pub subject: SubjectId,
    pub payload: Payload,
}

impl AsRef<str> for SubjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
