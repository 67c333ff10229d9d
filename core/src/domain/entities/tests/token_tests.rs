//! Unit tests for token entities

use chrono::{Duration, TimeZone, Utc};
use serde_json::json;

use crate::domain::entities::token::{Claims, Payload, SubjectId, DEFAULT_SUBJECT_CLAIM};
use crate::errors::TokenError;

fn payload(value: serde_json::Value) -> Payload {
    value.as_object().cloned().unwrap()
}

#[test]
fn test_new_claims_window() {
    let issued_at = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();
    let claims = Claims::new("portal.example.com", Payload::new(), issued_at, 1200).unwrap();

    assert_eq!(claims.iss, "portal.example.com");
    assert_eq!(claims.aud, "portal.example.com");
    assert_eq!(claims.iat, issued_at.timestamp());
    assert_eq!(claims.nbf, claims.iat);
    assert_eq!(claims.exp, claims.iat + 1200);
    assert!(claims.data.is_empty());
}

#[test]
fn test_new_claims_rejects_overflowing_expiry() {
    let issued_at = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();

    let result = Claims::new("host", Payload::new(), issued_at, i64::MAX);

    assert_eq!(result, Err(TokenError::GenerationFailed));
}

#[test]
fn test_claims_validity_is_half_open() {
    let issued_at = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();
    let claims = Claims::new("host", Payload::new(), issued_at, 60).unwrap();

    assert!(claims.is_valid_at(issued_at));
    assert!(claims.is_valid_at(issued_at + Duration::seconds(59)));
    assert!(!claims.is_valid_at(issued_at + Duration::seconds(60)));
    assert!(claims.is_expired_at(issued_at + Duration::seconds(60)));
    assert!(claims.is_premature_at(issued_at - Duration::seconds(1)));
    assert!(!claims.is_valid_at(issued_at - Duration::seconds(1)));
}

#[test]
fn test_subject_from_string_and_integer() {
    let issued_at = Utc::now();
    let by_string = Claims::new("host", payload(json!({ "userId": "42" })), issued_at, 60).unwrap();
    let by_number = Claims::new("host", payload(json!({ "userId": 42 })), issued_at, 60).unwrap();

    assert_eq!(by_string.subject(DEFAULT_SUBJECT_CLAIM), Some(SubjectId::new("42")));
    assert_eq!(by_number.subject(DEFAULT_SUBJECT_CLAIM), Some(SubjectId::new("42")));
}

#[test]
fn test_subject_rejects_unusable_values() {
    assert_eq!(SubjectId::from_claim(&json!("")), None);
    assert_eq!(SubjectId::from_claim(&json!("   ")), None);
    assert_eq!(SubjectId::from_claim(&json!(1.5)), None);
    assert_eq!(SubjectId::from_claim(&json!(null)), None);
    assert_eq!(SubjectId::from_claim(&json!({ "id": 1 })), None);
}

#[test]
fn test_claims_serialization_shape() {
    let issued_at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let claims = Claims::new("host", payload(json!({ "userId": 7, "role": "admin" })), issued_at, 10).unwrap();
    let value = serde_json::to_value(&claims).unwrap();

    assert_eq!(value["iss"], "host");
    assert_eq!(value["data"]["userId"], 7);
    assert_eq!(value["data"]["role"], "admin");

    let decoded: Claims = serde_json::from_value(value).unwrap();
    assert_eq!(decoded, claims);
}
