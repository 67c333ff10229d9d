//! Unit tests for token service

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use serde_json::json;

use crate::domain::entities::token::{Payload, SubjectId};
use crate::errors::{DomainError, TokenError, Unauthorized};
use crate::repositories::InMemorySettingsStore;
use crate::services::session::InMemorySessionAuthority;
use crate::services::token::service::extract_token;
use crate::services::token::{
    Clock, FixedClock, SigningAlgorithm, TokenService, TokenServiceConfig, SETTINGS_LIFETIME_KEY,
    SETTINGS_SECTION,
};

fn payload(value: serde_json::Value) -> Payload {
    value.as_object().cloned().unwrap()
}

fn create_test_service() -> (TokenService, Arc<FixedClock>) {
    let clock = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap(),
    ));
    let config = TokenServiceConfig::new("test-secret")
        .with_host("portal.example.com")
        .with_lifetime(1200);
    (TokenService::with_clock(config, clock.clone()), clock)
}

#[test]
fn test_issue_then_validate_returns_payload() {
    let (service, _) = create_test_service();
    let data = payload(json!({ "userId": 42, "roles": ["editor"], "nested": { "a": true } }));

    let token = service.issue(data.clone()).unwrap();

    assert_eq!(token.split('.').count(), 3);
    assert_eq!(service.validate(&token), Some(data));
}

#[test]
fn test_empty_payload_is_permitted() {
    let (service, _) = create_test_service();

    let token = service.issue(Payload::new()).unwrap();

    assert_eq!(service.validate(&token), Some(Payload::new()));
}

#[test]
fn test_claims_are_bound_to_host_and_lifetime() {
    let (service, clock) = create_test_service();
    let token = service.issue(Payload::new()).unwrap();

    let claims = service.inspect(&token).unwrap();

    assert_eq!(claims.iss, "portal.example.com");
    assert_eq!(claims.aud, "portal.example.com");
    assert_eq!(claims.iat, clock.now().timestamp());
    assert_eq!(claims.nbf, claims.iat);
    assert_eq!(claims.exp, claims.iat + 1200);
}

#[test]
fn test_expired_token_is_invalid() {
    let (service, clock) = create_test_service();
    let token = service.issue(payload(json!({ "userId": 1 }))).unwrap();

    clock.advance(Duration::seconds(1199));
    assert!(service.validate(&token).is_some());

    clock.advance(Duration::seconds(1));
    assert_eq!(service.validate(&token), None);
    assert_eq!(service.inspect(&token), Err(TokenError::Expired));
}

#[test]
fn test_token_before_not_before_is_invalid() {
    let (service, clock) = create_test_service();
    let token = service.issue(payload(json!({ "userId": 1 }))).unwrap();

    // No leeway: one second before issuance is already rejected.
    clock.advance(Duration::seconds(-1));

    assert_eq!(service.validate(&token), None);
    assert_eq!(service.inspect(&token), Err(TokenError::NotYetValid));
}

#[test]
fn test_token_signed_with_other_secret_is_invalid() {
    let (service, _) = create_test_service();
    let foreign = TokenService::new(TokenServiceConfig::new("another-secret"));
    let token = foreign.issue(payload(json!({ "userId": 1 }))).unwrap();

    assert_eq!(service.validate(&token), None);
    assert_eq!(service.inspect(&token), Err(TokenError::InvalidSignature));
}

#[test]
fn test_token_signed_with_other_algorithm_is_invalid() {
    let (service, _) = create_test_service();
    let foreign = TokenService::new(
        TokenServiceConfig::new("test-secret").with_algorithm(SigningAlgorithm::HS512),
    );
    let token = foreign.issue(payload(json!({ "userId": 1 }))).unwrap();

    assert_eq!(service.validate(&token), None);
    assert_eq!(service.inspect(&token), Err(TokenError::InvalidAlgorithm));
}

#[test]
fn test_malformed_tokens_are_invalid() {
    let (service, _) = create_test_service();

    for token in ["", "not-a-token", "a.b.c", "eyJhbGciOiJIUzI1NiJ9.e30"] {
        assert_eq!(service.validate(token), None, "token {:?}", token);
    }
}

#[test]
fn test_tampered_payload_is_invalid() {
    let (service, _) = create_test_service();
    let token = service.issue(payload(json!({ "userId": 1 }))).unwrap();
    let other = service.issue(payload(json!({ "userId": 2 }))).unwrap();

    let parts: Vec<&str> = token.split('.').collect();
    let other_parts: Vec<&str> = other.split('.').collect();
    let forged = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);

    assert_eq!(service.validate(&forged), None);
}

#[test]
fn test_authorize_from_header_missing_token() {
    let (service, _) = create_test_service();

    assert_eq!(service.authorize_from_header(None), Err(Unauthorized::MissingToken));
    assert_eq!(service.authorize_from_header(Some("")), Err(Unauthorized::MissingToken));
    assert_eq!(service.authorize_from_header(Some("   ")), Err(Unauthorized::MissingToken));
    assert_eq!(service.authorize_from_header(Some("Bearer ")), Err(Unauthorized::MissingToken));
}

#[test]
fn test_authorize_from_header_invalid_token() {
    let (service, _) = create_test_service();
    let foreign = TokenService::new(TokenServiceConfig::new("another-secret"));
    let unsigned_by_us = foreign.issue(payload(json!({ "userId": 1 }))).unwrap();

    assert_eq!(
        service.authorize_from_header(Some(unsigned_by_us.as_str())),
        Err(Unauthorized::InvalidToken)
    );
    assert_eq!(
        service.authorize_from_header(Some("garbage")),
        Err(Unauthorized::InvalidToken)
    );
}

#[test]
fn test_authorize_from_header_requires_subject() {
    let (service, _) = create_test_service();
    let token = service.issue(payload(json!({ "role": "guest" }))).unwrap();

    assert_eq!(
        service.authorize_from_header(Some(token.as_str())),
        Err(Unauthorized::InvalidToken)
    );
}

#[test]
fn test_authorize_from_header_accepts_raw_and_bearer() {
    let (service, _) = create_test_service();
    let token = service.issue(payload(json!({ "userId": 42 }))).unwrap();

    assert_eq!(service.authorize_from_header(Some(token.as_str())), Ok(SubjectId::new("42")));
    assert_eq!(
        service.authorize_from_header(Some(format!("Bearer {}", token).as_str())),
        Ok(SubjectId::new("42"))
    );
    assert_eq!(
        service.authorize_from_header(Some(format!("bearer   {}  ", token).as_str())),
        Ok(SubjectId::new("42"))
    );
}

#[test]
fn test_oversized_settings_lifetime_still_issues() {
    let store = InMemorySettingsStore::new().with(
        SETTINGS_SECTION,
        SETTINGS_LIFETIME_KEY,
        i64::MAX.to_string(),
    );
    let config = TokenServiceConfig::new("test-secret").with_settings(&store);
    let service = TokenService::with_clock(config, Arc::new(FixedClock::new(Utc::now())));

    let token = service.issue(Payload::new()).unwrap();

    assert_eq!(service.lifetime_seconds(), 1200);
    assert_eq!(service.validate(&token), Some(Payload::new()));
}

#[test]
fn test_issue_fails_when_expiry_overflows() {
    let config = TokenServiceConfig::new("test-secret").with_lifetime(i64::MAX);
    let service = TokenService::with_clock(config, Arc::new(FixedClock::new(Utc::now())));

    let result = service.issue(Payload::new());

    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::GenerationFailed))
    ));
}

#[test]
fn test_authorize_from_header_honours_subject_claim() {
    let clock = Arc::new(FixedClock::new(Utc::now()));
    let mut config = TokenServiceConfig::new("test-secret");
    config.subject_claim = "sub".to_string();
    let service = TokenService::with_clock(config, clock);
    let token = service.issue(payload(json!({ "sub": "alice", "userId": 9 }))).unwrap();

    assert_eq!(service.authorize_from_header(Some(token.as_str())), Ok(SubjectId::new("alice")));
}

#[test]
fn test_authorize_session_grants_once() {
    let (service, _) = create_test_service();
    let authority = InMemorySessionAuthority::new();
    let token = service.issue(payload(json!({ "userId": "7" }))).unwrap();

    let principal = service.authorize_session(Some(token.as_str()), &authority).unwrap();

    assert_eq!(principal.subject, SubjectId::new("7"));
    assert_eq!(principal.payload["userId"], "7");
    assert_eq!(authority.grants(), vec![SubjectId::new("7")]);
}

#[test]
fn test_authorize_session_skips_authority_for_invalid_token() {
    let (service, _) = create_test_service();
    let authority = InMemorySessionAuthority::new();

    let result = service.authorize_session(Some("Bearer nope"), &authority);

    assert_eq!(result, Err(Unauthorized::InvalidToken));
    assert!(authority.grants().is_empty());
}

#[test]
fn test_authorize_session_reports_refusal() {
    let (service, _) = create_test_service();
    let authority = InMemorySessionAuthority::new().with_denied(["7"]);
    let token = service.issue(payload(json!({ "userId": 7 }))).unwrap();

    let result = service.authorize_session(Some(token.as_str()), &authority);

    assert_eq!(result, Err(Unauthorized::SessionRejected));
}

#[test]
fn test_extract_token() {
    assert_eq!(extract_token("Bearer abc"), "abc");
    assert_eq!(extract_token("BEARER abc"), "abc");
    assert_eq!(extract_token("  abc  "), "abc");
    assert_eq!(extract_token("Bearer"), "");
    assert_eq!(extract_token("Bearerabc"), "Bearerabc");
}
