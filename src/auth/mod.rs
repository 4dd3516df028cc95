//! Session and authorization core.
//!
//! SYSTEM CONTEXT
//! ==============
//! The bearer token is the only local signal of authentication. The token
//! store owns it, the claims decoder reads subject and roles out of it
//! without verifying it, the session manager turns that into a `Session`,
//! and the guard maps `(route, session)` to a navigation decision. Domain
//! clients read the token through the session manager on every request.

pub mod claims;
pub mod guard;
pub mod roles;
pub mod session;
pub mod token_store;

pub use claims::{Claims, ClaimsDecoder, DecodeError, UnverifiedJwtDecoder};
pub use guard::{Access, AdminSection, Decision, Route, guard, nav_links};
pub use roles::Role;
pub use session::{CredentialIssuer, Session, SessionManager};
pub use token_store::{FileTokenStore, MemoryTokenStore, StoreError, TokenStore};
