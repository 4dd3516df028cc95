//! Wire records exchanged with the backend domains.
//!
//! DESIGN
//! ======
//! Field names follow the backends' camelCase JSON. Optional and defaulted
//! fields are lenient so a partial record from one service version does not
//! break listing views in another.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// IDENTITY
// =============================================================================

/// Response body of `/auth/login` and `/auth/register`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: Option<String>,
    /// Anything else the identity service returned (token type, expiry, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

// =============================================================================
// CATALOG
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Book {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub quantity: i32,
}

impl Book {
    #[must_use]
    pub fn new(title: impl Into<String>, author: impl Into<String>, isbn: impl Into<String>, quantity: i32) -> Self {
        Self { id: None, title: title.into(), author: author.into(), isbn: isbn.into(), quantity }
    }
}

// =============================================================================
// BORROWING
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanStatus {
    Active,
    Returned,
    Overdue,
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub id: i64,
    pub user_id: i64,
    pub book_id: i64,
    pub quantity: i32,
    pub status: LoanStatus,
    #[serde(default)]
    pub borrowed_at: Option<String>,
    #[serde(default)]
    pub due_at: Option<String>,
    #[serde(default)]
    pub returned_at: Option<String>,
    #[serde(default)]
    pub fine_amount: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLoan {
    pub user_id: i64,
    pub book_id: i64,
    pub quantity: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BorrowedCount {
    #[serde(default)]
    pub borrowed_count: u32,
}

// =============================================================================
// NOTIFICATION
// =============================================================================

/// A stored notification document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl Notification {
    /// Label for list rows: the subject, else the type.
    #[must_use]
    pub fn label(&self) -> &str {
        self.subject.as_deref().or(self.kind.as_deref()).unwrap_or_default()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl From<&EmailMessage> for Notification {
    fn from(message: &EmailMessage) -> Self {
        Self {
            id: None,
            kind: Some("EMAIL".to_owned()),
            to: Some(message.to.clone()),
            subject: Some(message.subject.clone()),
            body: Some(message.body.clone()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailReceipt {
    pub status: String,
    #[serde(default)]
    pub to: Option<String>,
}

// =============================================================================
// ADMIN
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    #[serde(default)]
    pub total_books: u64,
    #[serde(default)]
    pub total_loans: u64,
    #[serde(default)]
    pub active_loans: u64,
    /// A count, or a placeholder string when the identity service has none.
    #[serde(default)]
    pub total_users: Value,
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
