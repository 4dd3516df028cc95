//! Client error taxonomy.
//!
//! ERROR HANDLING
//! ==============
//! Domain clients surface the raw failure; the caller decides what to show.
//! `user_message` implements the usual presentation rule: the server's
//! `message` field when it sent one, otherwise the caller's generic text.
//! Nothing here retries.

use crate::auth::claims::DecodeError;
use crate::auth::token_store::StoreError;
use crate::config::Domain;

/// Errors produced by session and domain-client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The stored or freshly issued token is not well formed.
    #[error("malformed token: {0}")]
    Decode(#[from] DecodeError),

    /// 401 or 403 from a domain.
    #[error("{domain}: not authorized (status {status}): {}", describe(message.as_deref(), *status))]
    Auth { domain: Domain, status: u16, message: Option<String> },

    /// Any other 4xx from a domain.
    #[error("{domain}: request rejected (status {status}): {}", describe(message.as_deref(), *status))]
    Validation { domain: Domain, status: u16, message: Option<String> },

    /// 5xx from a domain.
    #[error("{domain}: server error (status {status}): {}", describe(message.as_deref(), *status))]
    Server { domain: Domain, status: u16, message: Option<String> },

    /// No response was received.
    #[error("{domain}: network error: {message}")]
    Network { domain: Domain, message: String },

    /// A 2xx response body did not have the expected shape.
    #[error("{domain}: response parse failed: {message}")]
    Parse { domain: Domain, message: String },

    /// Login or registration succeeded without returning an access token.
    #[error("identity response did not include an access token")]
    MissingCredential,

    /// The token slot could not be written.
    #[error("token store: {0}")]
    Storage(#[from] StoreError),
}

/// Grepable error code plus an informational retry hint.
///
/// `retryable` is advice for the caller's UI; the client never retries.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;
    fn retryable(&self) -> bool;
}

impl ErrorCode for ClientError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Decode(_) => "E_DECODE",
            Self::Auth { .. } => "E_AUTH",
            Self::Validation { .. } => "E_VALIDATION",
            Self::Server { .. } => "E_SERVER",
            Self::Network { .. } => "E_NETWORK",
            Self::Parse { .. } => "E_PARSE",
            Self::MissingCredential => "E_MISSING_CREDENTIAL",
            Self::Storage(_) => "E_STORAGE",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Server { .. } | Self::Validation { status: 429, .. })
    }
}

impl ClientError {
    /// Classify a non-2xx status into the taxonomy.
    #[must_use]
    pub fn from_status(domain: Domain, status: u16, message: Option<String>) -> Self {
        match status {
            401 | 403 => Self::Auth { domain, status, message },
            500..=599 => Self::Server { domain, status, message },
            _ => Self::Validation { domain, status, message },
        }
    }

    /// HTTP status when the server answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Auth { status, .. } | Self::Validation { status, .. } | Self::Server { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Message supplied by the server, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Auth { message, .. } | Self::Validation { message, .. } | Self::Server { message, .. } => {
                message.as_deref()
            }
            _ => None,
        }
    }

    /// Text for a user-facing error line.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().map_or_else(|| fallback.to_owned(), str::to_owned)
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Auth { status: 401, .. })
    }
}

fn describe(message: Option<&str>, status: u16) -> String {
    match message {
        Some(message) => message.to_owned(),
        None => generic_description(status).to_owned(),
    }
}

/// Generic description used when the server sent no message.
#[must_use]
pub fn generic_description(status: u16) -> &'static str {
    match status {
        400 => "bad request",
        401 => "authentication required",
        403 => "access denied",
        404 => "not found",
        409 => "conflict",
        422 => "invalid input",
        429 => "too many requests",
        500..=599 => "server unavailable",
        _ => "request failed",
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
