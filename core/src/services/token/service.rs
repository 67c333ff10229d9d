//! Main token service implementation

use std::collections::HashSet;
use std::sync::Arc;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::{debug, warn};

use crate::domain::entities::token::{Claims, Payload, Principal, SubjectId};
use crate::errors::{DomainError, TokenError, Unauthorized};
use crate::services::session::SessionAuthority;

use super::clock::{Clock, SystemClock};
use super::config::TokenServiceConfig;

const BEARER_PREFIX: &str = "bearer ";

/// Issues and validates signed, time-bound tokens
///
/// The validity window is checked against the service clock with no leeway.
pub struct TokenService {
    config: TokenServiceConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    /// Creates a token service driven by the system clock
    pub fn new(config: TokenServiceConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a token service with an explicit time source
    ///
    /// # Arguments
    ///
    /// * `config` - Token service configuration
    /// * `clock` - Clock used both for `iat`/`nbf`/`exp` and for validation
    pub fn with_clock(config: TokenServiceConfig, clock: Arc<dyn Clock>) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        // Signature and algorithm are checked by jsonwebtoken; the time
        // window is checked against `clock` in `inspect`.
        let mut validation = Validation::new(config.algorithm.as_jwt_algorithm());
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.required_spec_claims = HashSet::new();

        Self {
            config,
            encoding_key,
            decoding_key,
            validation,
            clock,
        }
    }

    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }

    /// Token lifetime in seconds
    pub fn lifetime_seconds(&self) -> i64 {
        self.config.lifetime_seconds
    }

    /// Issues a token carrying `payload`
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The compact encoded token
    /// * `Err(DomainError)` - Expiry overflowed or encoding failed
    pub fn issue(&self, payload: Payload) -> Result<String, DomainError> {
        let claims = Claims::new(
            &self.config.host,
            payload,
            self.clock.now(),
            self.config.lifetime_seconds,
        )?;
        let token = self.encode_jwt(&claims)?;
        debug!(exp = claims.exp, algorithm = %self.config.algorithm, "issued token");
        Ok(token)
    }

    /// Encodes claims into a JWT
    pub(crate) fn encode_jwt(&self, claims: &Claims) -> Result<String, DomainError> {
        let header = Header::new(self.config.algorithm.as_jwt_algorithm());
        encode(&header, claims, &self.encoding_key)
            .map_err(|_| DomainError::Token(TokenError::GenerationFailed))
    }

    /// Validates a token and returns its payload
    ///
    /// Any failure (bad signature, expired, not yet valid, malformed) yields
    /// `None`. Use [`TokenService::inspect`] when the reason matters.
    pub fn validate(&self, token: &str) -> Option<Payload> {
        match self.inspect(token) {
            Ok(claims) => Some(claims.data),
            Err(reason) => {
                debug!(reason = %reason, "token rejected");
                None
            }
        }
    }

    /// Decodes and verifies a token, reporting why it was rejected
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - Signature verified and `nbf <= now < exp`
    /// * `Err(TokenError)` - The first check that failed
    pub fn inspect(&self, token: &str) -> Result<Claims, TokenError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::InvalidAlgorithm => TokenError::InvalidAlgorithm,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::ImmatureSignature => TokenError::NotYetValid,
                _ => TokenError::Malformed,
            })?;

        let claims = token_data.claims;
        let now = self.clock.now();
        if claims.is_premature_at(now) {
            return Err(TokenError::NotYetValid);
        }
        if claims.is_expired_at(now) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    /// Resolves the subject carried by an `Authorization` header value
    ///
    /// An optional `Bearer` scheme is accepted. An absent or blank header
    /// maps to `MissingToken`; anything that fails validation or lacks a
    /// subject claim maps to `InvalidToken`.
    pub fn authorize_from_header(&self, header: Option<&str>) -> Result<SubjectId, Unauthorized> {
        self.authenticate(header).map(|principal| principal.subject)
    }

    /// Same checks as [`TokenService::authorize_from_header`], keeping the payload
    pub fn authenticate(&self, header: Option<&str>) -> Result<Principal, Unauthorized> {
        let token = match header.map(extract_token) {
            Some(token) if !token.is_empty() => token,
            _ => return Err(Unauthorized::MissingToken),
        };

        let payload = self.validate(token).ok_or(Unauthorized::InvalidToken)?;
        let subject = SubjectId::from_payload(&payload, &self.config.subject_claim).ok_or_else(|| {
            debug!(claim = %self.config.subject_claim, "token payload has no usable subject");
            Unauthorized::InvalidToken
        })?;

        Ok(Principal { subject, payload })
    }

    /// Authenticates the header and establishes a session for the subject
    ///
    /// The authority is only consulted once the token has been accepted.
    pub fn authorize_session(
        &self,
        header: Option<&str>,
        authority: &dyn SessionAuthority,
    ) -> Result<Principal, Unauthorized> {
        let principal = self.authenticate(header)?;

        authority.authorize_as(&principal.subject).map_err(|e| {
            warn!(subject = %principal.subject, error = %e, "session authority refused subject");
            Unauthorized::SessionRejected
        })?;

        Ok(principal)
    }
}

/// Strips surrounding whitespace and an optional case-insensitive `Bearer ` prefix
pub(crate) fn extract_token(header: &str) -> &str {
    let header = header.trim();
    match header.get(..BEARER_PREFIX.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(BEARER_PREFIX) => {
            header[BEARER_PREFIX.len()..].trim()
        }
        _ if header.eq_ignore_ascii_case(BEARER_PREFIX.trim_end()) => "",
        _ => header,
    }
}
