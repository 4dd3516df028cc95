//! Claim extraction from bearer tokens.
//!
//! TRUST BOUNDARY
//! ==============
//! Decoding performs no signature verification: a syntactically valid but
//! forged token decodes successfully. The client cannot verify the issuer's
//! signature; the transport channel and backend-side validation are the
//! boundary. `ClaimsDecoder` is the seam where a server-verified session
//! lookup can replace local decoding without touching callers.

use std::collections::BTreeSet;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::{Map, Value};

use super::roles::Role;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("expected 3 dot-separated segments, found {0}")]
    SegmentCount(usize),

    #[error("claims segment is not valid base64url")]
    Base64,

    #[error("claims segment is not valid JSON: {0}")]
    Json(String),

    #[error("claims segment is not a JSON object")]
    NotAnObject,
}

/// Fields read out of a token.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Claims {
    pub subject: Option<String>,
    pub roles: BTreeSet<Role>,
    /// Expiry in seconds since the Unix epoch, when the token carries one.
    pub expires_at: Option<u64>,
}

/// Extracts subject and roles from a token.
pub trait ClaimsDecoder: Send + Sync {
    /// # Errors
    ///
    /// Returns `DecodeError` if the token is not well formed.
    fn decode(&self, token: &str) -> Result<Claims, DecodeError>;
}

/// Reads JWT-shaped tokens (`header.claims.signature`) without verifying them.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnverifiedJwtDecoder;

impl ClaimsDecoder for UnverifiedJwtDecoder {
    fn decode(&self, token: &str) -> Result<Claims, DecodeError> {
        let payload = claims_object(token)?;
        Ok(claims_from_object(&payload))
    }
}

fn claims_object(token: &str) -> Result<Map<String, Value>, DecodeError> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    if segments.len() != 3 {
        return Err(DecodeError::SegmentCount(segments.len()));
    }
    for segment in [segments[0], segments[2]] {
        if !segment.bytes().all(is_base64url_byte) {
            return Err(DecodeError::Base64);
        }
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(segments[1].trim_end_matches('='))
        .map_err(|_| DecodeError::Base64)?;
    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(DecodeError::NotAnObject),
        Err(e) => Err(DecodeError::Json(e.to_string())),
    }
}

fn is_base64url_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'=')
}

fn claims_from_object(payload: &Map<String, Value>) -> Claims {
    let subject = ["sub", "username"]
        .iter()
        .find_map(|key| payload.get(*key).and_then(Value::as_str))
        .map(str::to_owned);

    let mut roles = BTreeSet::new();
    for key in ["roles", "role", "authorities"] {
        match payload.get(key) {
            Some(Value::String(role)) => {
                roles.extend(role.split_whitespace().map(Role::from));
            }
            Some(Value::Array(items)) => {
                roles.extend(items.iter().filter_map(Value::as_str).map(Role::from));
            }
            _ => {}
        }
    }

    let expires_at = payload.get("exp").and_then(Value::as_u64);

    Claims { subject, roles, expires_at }
}

#[cfg(test)]
#[path = "claims_test.rs"]
mod tests;
