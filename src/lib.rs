//! BookVault client core.
//!
//! ARCHITECTURE
//! ============
//! The platform is split into independently addressed backend domains
//! (identity, catalog, borrowing, search, admin, notification, media). This
//! crate owns the pieces every one of them depends on:
//!
//! - `auth`: the bearer-token slot, unverified claim decoding, the session
//!   manager and the route guard.
//! - `net`: the per-domain HTTP client, the paging contract and wire records.
//! - `domains`: typed clients for each backend domain.
//! - `state`: views that guard against out-of-order responses and keep
//!   navigation consistent with the session.
//!
//! Everything is resolved once at startup from [`config::ClientConfig`] and
//! injected; nothing reads ambient global state.

pub mod auth;
pub mod config;
pub mod domains;
pub mod error;
pub mod net;
pub mod state;

pub use auth::{Role, Route, Session, SessionManager};
pub use config::{ClientConfig, Domain};
pub use domains::Backend;
pub use error::ClientError;
pub use net::paging::{Page, PageRequest};
