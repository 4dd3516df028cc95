use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Capability tag carried in the token's role claims.
///
/// Roles stay opaque strings; only `ROLE_ADMIN` has meaning to the guard.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub const ADMIN: Role = Role(Cow::Borrowed("ROLE_ADMIN"));
    pub const USER: Role = Role(Cow::Borrowed("ROLE_USER"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        Self(Cow::Owned(value.to_owned()))
    }
}
