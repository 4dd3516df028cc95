//! Identity domain: credentials and user accounts.
//!
//! `IdentityClient` is the production [`CredentialIssuer`]; the session
//! manager drives it for login and registration and owns what happens to the
//! returned token.

use async_trait::async_trait;
use serde::Serialize;

use crate::auth::CredentialIssuer;
use crate::error::ClientError;
use crate::net::types::{AuthResponse, User};
use crate::net::{DomainClient, Page, PageRequest};

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Clone)]
pub struct IdentityClient {
    http: DomainClient,
}

impl IdentityClient {
    #[must_use]
    pub fn new(http: DomainClient) -> Self {
        Self { http }
    }

    #[must_use]
    pub fn http(&self) -> &DomainClient {
        &self.http
    }

    /// The signed-in user's account. `username` narrows the lookup on
    /// deployments where the service cannot resolve it from the token.
    ///
    /// # Errors
    ///
    /// Returns the classified request failure.
    pub async fn me(&self, username: Option<&str>) -> Result<User, ClientError> {
        let query: Vec<(&str, String)> = username.map(|name| ("username", name.to_owned())).into_iter().collect();
        self.http.get("/users/me", &query).await
    }

    /// Update the signed-in user's account with a partial payload.
    ///
    /// # Errors
    ///
    /// Returns the classified request failure.
    pub async fn update_me<B: Serialize + ?Sized>(&self, payload: &B) -> Result<User, ClientError> {
        self.http.put("/users/me", payload).await
    }

    /// # Errors
    ///
    /// Returns the classified request failure.
    pub async fn list_users(&self, request: PageRequest) -> Result<Page<User>, ClientError> {
        self.http.get_page("/users", request, &[]).await
    }
}

#[async_trait]
impl CredentialIssuer for IdentityClient {
    async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, ClientError> {
        self.http.post_anonymous("/auth/login", &LoginRequest { username, password }).await
    }

    async fn register(&self, username: &str, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        self.http.post_anonymous("/auth/register", &RegisterRequest { username, email, password }).await
    }
}
