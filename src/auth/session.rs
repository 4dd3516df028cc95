//! Session manager: the single writer of the token slot.
//!
//! SYSTEM CONTEXT
//! ==============
//! Built once at startup and shared as `Arc<SessionManager>` with every
//! domain client. Clients read the token through it; only its own
//! operations (`login`, `register`, `logout`, `on_unauthorized`) write.
//!
//! DESIGN
//! ======
//! `Session` is never stored. `current()` re-derives it from the slot on
//! every call, so roles are always replaced wholesale and cannot drift from
//! the token. The watch channel only announces transitions to subscribers
//! such as the navigator; the value it carries is the freshly derived one.
//!
//! Concurrent `login`/`register` calls are not serialized. Each one writes
//! the slot when its response arrives, so the last response wins.

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::sync::watch;

use super::claims::ClaimsDecoder;
use super::roles::Role;
use super::token_store::TokenStore;
use crate::config::{AuthFailurePolicy, Domain};
use crate::error::ClientError;
use crate::net::types::AuthResponse;

static NO_ROLES: BTreeSet<Role> = BTreeSet::new();

/// Identity derived from the current token.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated { subject: Option<String>, roles: BTreeSet<Role> },
}

impl Session {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated { .. })
    }

    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        match self {
            Session::Anonymous => None,
            Session::Authenticated { subject, .. } => subject.as_deref(),
        }
    }

    #[must_use]
    pub fn roles(&self) -> &BTreeSet<Role> {
        match self {
            Session::Anonymous => &NO_ROLES,
            Session::Authenticated { roles, .. } => roles,
        }
    }

    #[must_use]
    pub fn has_role(&self, role: &Role) -> bool {
        self.roles().contains(role)
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.has_role(&Role::ADMIN)
    }
}

/// Backend that exchanges user credentials for a bearer token.
#[async_trait::async_trait]
pub trait CredentialIssuer: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, ClientError>;

    async fn register(&self, username: &str, email: &str, password: &str) -> Result<AuthResponse, ClientError>;
}

pub struct SessionManager {
    store: Arc<dyn TokenStore>,
    decoder: Arc<dyn ClaimsDecoder>,
    policy: AuthFailurePolicy,
    changes: watch::Sender<Session>,
}

impl SessionManager {
    /// Resolve the initial session from whatever the slot already holds.
    pub fn new(store: Arc<dyn TokenStore>, decoder: Arc<dyn ClaimsDecoder>, policy: AuthFailurePolicy) -> Self {
        let initial = derive(store.as_ref(), decoder.as_ref());
        match &initial {
            Session::Anonymous => tracing::debug!("session initialized anonymous"),
            Session::Authenticated { subject, roles } => {
                tracing::info!(subject = subject.as_deref().unwrap_or("-"), roles = roles.len(), "session restored");
            }
        }
        let (changes, _) = watch::channel(initial);
        Self { store, decoder, policy, changes }
    }

    /// Re-derive the session from the slot.
    ///
    /// A token that no longer decodes is destroyed.
    pub fn current(&self) -> Session {
        let session = derive(self.store.as_ref(), self.decoder.as_ref());
        self.announce(&session);
        session
    }

    /// Token to attach to outgoing requests.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.store.get()
    }

    /// Observe session transitions.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.changes.subscribe()
    }

    #[must_use]
    pub fn policy(&self) -> AuthFailurePolicy {
        self.policy
    }

    /// Exchange a username and password for a token and store it.
    ///
    /// # Errors
    ///
    /// Returns the issuer's error, `MissingCredential` when no token came
    /// back, `Decode` when the token is malformed, or `Storage` when it
    /// could not be persisted.
    pub async fn login<I>(&self, issuer: &I, username: &str, password: &str) -> Result<Session, ClientError>
    where
        I: CredentialIssuer + ?Sized,
    {
        let response = issuer.login(username, password).await?;
        let session = self.establish(response)?;
        tracing::info!(subject = session.subject().unwrap_or(username), "logged in");
        Ok(session)
    }

    /// Create an account; success authenticates the new user.
    ///
    /// # Errors
    ///
    /// Same as [`SessionManager::login`].
    pub async fn register<I>(
        &self,
        issuer: &I,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Session, ClientError>
    where
        I: CredentialIssuer + ?Sized,
    {
        let response = issuer.register(username, email, password).await?;
        let session = self.establish(response)?;
        tracing::info!(subject = session.subject().unwrap_or(username), "registered");
        Ok(session)
    }

    /// Drop the credential. Idempotent.
    pub fn logout(&self) {
        self.store.clear();
        self.announce(&Session::Anonymous);
        tracing::info!("logged out");
    }

    /// Apply the auth-failure policy after a domain answered 401 to a
    /// request sent with `sent_token`.
    ///
    /// Only the credential that was actually rejected is cleared: a 401 to an
    /// unauthenticated request, or to a token that has since been replaced,
    /// leaves the current session alone. Returns `true` when the session was
    /// cleared.
    pub fn on_unauthorized(&self, domain: Domain, sent_token: Option<&str>) -> bool {
        match self.policy {
            AuthFailurePolicy::Surface => false,
            AuthFailurePolicy::ForceLogout => {
                let Some(sent) = sent_token else {
                    return false;
                };
                if self.store.get().as_deref() != Some(sent) {
                    tracing::debug!(%domain, "401 for a replaced credential; session kept");
                    return false;
                }
                tracing::warn!(%domain, "credential rejected; clearing session");
                self.logout();
                true
            }
        }
    }

    fn establish(&self, response: AuthResponse) -> Result<Session, ClientError> {
        let token = response.access_token.filter(|t| !t.trim().is_empty()).ok_or(ClientError::MissingCredential)?;
        let claims = match self.decoder.decode(&token) {
            Ok(claims) => claims,
            Err(e) => {
                self.store.clear();
                self.announce(&Session::Anonymous);
                return Err(e.into());
            }
        };
        self.store.set(&token)?;
        let session = Session::Authenticated { subject: claims.subject, roles: claims.roles };
        self.announce(&session);
        Ok(session)
    }

    fn announce(&self, session: &Session) {
        self.changes.send_if_modified(|published| {
            if published == session {
                false
            } else {
                *published = session.clone();
                true
            }
        });
    }
}

fn derive(store: &dyn TokenStore, decoder: &dyn ClaimsDecoder) -> Session {
    let Some(token) = store.get() else {
        return Session::Anonymous;
    };
    match decoder.decode(&token) {
        Ok(claims) => Session::Authenticated { subject: claims.subject, roles: claims.roles },
        Err(e) => {
            tracing::warn!(error = %e, "stored token is malformed; discarding");
            store.clear();
            Session::Anonymous
        }
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
