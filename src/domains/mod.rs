//! Typed clients for each backend domain.
//!
//! SYSTEM CONTEXT
//! ==============
//! `Backend` is the composition root: it resolves one `DomainClient` per
//! domain from `ClientConfig`, shares a single connection pool and a single
//! `SessionManager` between them, and exposes the session lifecycle next to
//! the clients that depend on it.
//!
//! DESIGN
//! ======
//! Base addresses are fixed at construction. Swapping a gateway means
//! building a new `Backend`; nothing re-reads configuration per request.

pub mod admin;
pub mod borrowing;
pub mod catalog;
pub mod identity;
pub mod media;
pub mod notification;
pub mod search;

use std::sync::Arc;

use tokio::sync::watch;

pub use admin::AdminClient;
pub use borrowing::BorrowingClient;
pub use catalog::CatalogClient;
pub use identity::IdentityClient;
pub use media::MediaClient;
pub use notification::NotificationClient;
pub use search::SearchClient;

use crate::auth::{FileTokenStore, Session, SessionManager, TokenStore, UnverifiedJwtDecoder};
use crate::config::{ClientConfig, Domain};
use crate::error::ClientError;
use crate::net::DomainClient;

/// The shared HTTP client could not be constructed.
#[derive(Debug, thiserror::Error)]
#[error("failed to build http client: {0}")]
pub struct BuildError(#[from] reqwest::Error);

pub struct Backend {
    session: Arc<SessionManager>,
    identity: IdentityClient,
    catalog: CatalogClient,
    borrowing: BorrowingClient,
    search: SearchClient,
    admin: AdminClient,
    notification: NotificationClient,
    media: MediaClient,
}

impl Backend {
    /// Wire every domain client to `session`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig, session: Arc<SessionManager>) -> Result<Self, BuildError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        let client = |domain: Domain| {
            DomainClient::new(config.endpoints.get(domain).clone(), http.clone(), Arc::clone(&session))
        };

        let backend = Self {
            identity: IdentityClient::new(client(Domain::Identity)),
            catalog: CatalogClient::new(client(Domain::Catalog)),
            borrowing: BorrowingClient::new(client(Domain::Borrowing)),
            search: SearchClient::new(client(Domain::Search)),
            admin: AdminClient::new(client(Domain::Admin)),
            notification: NotificationClient::new(client(Domain::Notification)),
            media: MediaClient::new(client(Domain::Media)),
            session,
        };
        for domain in Domain::ALL {
            tracing::debug!(%domain, base_url = %config.endpoints.get(domain).base_url, "domain client ready");
        }
        Ok(backend)
    }

    /// Build a backend whose session lives in `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_store(config: &ClientConfig, store: Arc<dyn TokenStore>) -> Result<Self, BuildError> {
        let session = SessionManager::new(store, Arc::new(UnverifiedJwtDecoder), config.auth_failure);
        Self::new(config, Arc::new(session))
    }

    /// Build a backend whose session persists to `config.token_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn open(config: &ClientConfig) -> Result<Self, BuildError> {
        let store = FileTokenStore::open(&config.token_path);
        tracing::debug!(path = %store.path().display(), "token store opened");
        Self::with_store(config, Arc::new(store))
    }

    // =========================================================================
    // SESSION
    // =========================================================================

    #[must_use]
    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    #[must_use]
    pub fn current_session(&self) -> Session {
        self.session.current()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.session.subscribe()
    }

    /// # Errors
    ///
    /// See [`SessionManager::login`].
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, ClientError> {
        self.session.login(&self.identity, username, password).await
    }

    /// # Errors
    ///
    /// See [`SessionManager::register`].
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<Session, ClientError> {
        self.session.register(&self.identity, username, email, password).await
    }

    pub fn logout(&self) {
        self.session.logout();
    }

    /// Drop every client and this handle on the session manager.
    ///
    /// Subscribers see their channel close once no other handle on the
    /// manager remains.
    pub fn shutdown(self) {
        tracing::debug!(handles = Arc::strong_count(&self.session), "backend shut down");
    }

    // =========================================================================
    // DOMAINS
    // =========================================================================

    #[must_use]
    pub fn identity(&self) -> &IdentityClient {
        &self.identity
    }

    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.catalog
    }

    #[must_use]
    pub fn borrowing(&self) -> &BorrowingClient {
        &self.borrowing
    }

    #[must_use]
    pub fn search(&self) -> &SearchClient {
        &self.search
    }

    #[must_use]
    pub fn admin(&self) -> &AdminClient {
        &self.admin
    }

    #[must_use]
    pub fn notification(&self) -> &NotificationClient {
        &self.notification
    }

    #[must_use]
    pub fn media(&self) -> &MediaClient {
        &self.media
    }
}
