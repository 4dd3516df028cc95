use super::*;
use serde_json::json;

fn token_with(payload: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{header}.{body}.c2lnbmF0dXJl")
}

fn roles(names: &[&str]) -> BTreeSet<Role> {
    names.iter().map(|name| Role::from(*name)).collect()
}

// =============================================================================
// well-formed tokens
// =============================================================================

#[test]
fn decodes_subject_roles_and_expiry() {
    let token = token_with(&json!({ "sub": "alice", "roles": ["ROLE_USER"], "exp": 1_900_000_000_u64 }));
    let claims = UnverifiedJwtDecoder.decode(&token).unwrap();
    assert_eq!(claims.subject.as_deref(), Some("alice"));
    assert_eq!(claims.roles, roles(&["ROLE_USER"]));
    assert_eq!(claims.expires_at, Some(1_900_000_000));
}

#[test]
fn role_set_is_order_independent_and_deduplicated() {
    let a = token_with(&json!({ "sub": "bob", "roles": ["ROLE_ADMIN", "ROLE_USER", "ROLE_ADMIN"] }));
    let b = token_with(&json!({ "sub": "bob", "roles": ["ROLE_USER", "ROLE_ADMIN"] }));
    let a = UnverifiedJwtDecoder.decode(&a).unwrap();
    let b = UnverifiedJwtDecoder.decode(&b).unwrap();
    assert_eq!(a.roles, b.roles);
    assert_eq!(a.roles.len(), 2);
    assert!(a.roles.contains(&Role::ADMIN));
}

#[test]
fn merges_role_and_authorities_claims() {
    let token = token_with(&json!({ "sub": "c", "role": "ROLE_ADMIN", "authorities": ["ROLE_USER"] }));
    let claims = UnverifiedJwtDecoder.decode(&token).unwrap();
    assert_eq!(claims.roles, roles(&["ROLE_ADMIN", "ROLE_USER"]));
}

#[test]
fn space_separated_role_string_is_split() {
    let token = token_with(&json!({ "sub": "d", "roles": "ROLE_USER ROLE_LIBRARIAN" }));
    let claims = UnverifiedJwtDecoder.decode(&token).unwrap();
    assert_eq!(claims.roles, roles(&["ROLE_USER", "ROLE_LIBRARIAN"]));
}

#[test]
fn username_claim_is_subject_fallback() {
    let token = token_with(&json!({ "username": "erin" }));
    let claims = UnverifiedJwtDecoder.decode(&token).unwrap();
    assert_eq!(claims.subject.as_deref(), Some("erin"));
    assert!(claims.roles.is_empty());
    assert_eq!(claims.expires_at, None);
}

#[test]
fn padded_claims_segment_is_accepted() {
    let header = URL_SAFE_NO_PAD.encode(b"{}");
    let body = base64::engine::general_purpose::URL_SAFE.encode(br#"{"sub":"pad"}"#);
    let token = format!("{header}.{body}.sig");
    let claims = UnverifiedJwtDecoder.decode(&token).unwrap();
    assert_eq!(claims.subject.as_deref(), Some("pad"));
}

#[test]
fn forged_signature_still_decodes() {
    let token = token_with(&json!({ "sub": "mallory", "roles": ["ROLE_ADMIN"] }));
    let (head, _) = token.rsplit_once('.').unwrap();
    let forged = format!("{head}.Zm9yZ2Vk");
    let claims = UnverifiedJwtDecoder.decode(&forged).unwrap();
    assert!(claims.roles.contains(&Role::ADMIN));
}

// =============================================================================
// malformed tokens
// =============================================================================

#[test]
fn malformed_tokens_fail_with_decode_error() {
    let not_json = format!("e30.{}.sig", URL_SAFE_NO_PAD.encode(b"not json"));
    let array = format!("e30.{}.sig", URL_SAFE_NO_PAD.encode(b"[1,2]"));
    let cases: Vec<(&str, String)> = vec![
        ("empty", String::new()),
        ("one segment", "abc".to_owned()),
        ("two segments", "abc.def".to_owned()),
        ("four segments", "a.b.c.d".to_owned()),
        ("bad base64", "e30.!!!.sig".to_owned()),
        ("bad header chars", format!("e3 0.{}.sig", URL_SAFE_NO_PAD.encode(b"{}"))),
        ("not json", not_json),
        ("not an object", array),
    ];
    for (label, token) in cases {
        assert!(UnverifiedJwtDecoder.decode(&token).is_err(), "expected DecodeError for {label}");
    }
}

#[test]
fn segment_count_error_reports_count() {
    assert_eq!(UnverifiedJwtDecoder.decode("a.b").unwrap_err(), DecodeError::SegmentCount(2));
}

#[test]
fn array_payload_is_not_an_object() {
    let token = format!("e30.{}.sig", URL_SAFE_NO_PAD.encode(b"\"str\""));
    assert_eq!(UnverifiedJwtDecoder.decode(&token).unwrap_err(), DecodeError::NotAnObject);
}
