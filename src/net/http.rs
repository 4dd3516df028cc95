//! Per-domain HTTP client.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every domain client wraps one `DomainClient`: a base address fixed at
//! construction, the shared `reqwest::Client`, and the shared session
//! manager. Each request reads the token at send time and attaches
//! `Authorization: Bearer <token>` when one is present; otherwise the request
//! goes out unauthenticated and the server decides.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures become `ClientError::Network`; non-2xx statuses are
//! classified by `ClientError::from_status` with the body's `message` field
//! when it has one. A 401 is also reported to the session manager together
//! with the token the request carried, so only that credential can be
//! cleared by the auth-failure policy. Credential endpoints are called
//! without a bearer and never trigger the policy. There are no retries.

use std::sync::Arc;

use reqwest::header::AUTHORIZATION;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::paging::{Page, PageRequest, decode_page};
use crate::auth::SessionManager;
use crate::config::{Domain, DomainEndpoint};
use crate::error::{ClientError, ErrorCode};

#[derive(Clone)]
pub struct DomainClient {
    endpoint: DomainEndpoint,
    http: reqwest::Client,
    session: Arc<SessionManager>,
}

impl DomainClient {
    #[must_use]
    pub fn new(endpoint: DomainEndpoint, http: reqwest::Client, session: Arc<SessionManager>) -> Self {
        Self { endpoint, http, session }
    }

    #[must_use]
    pub fn domain(&self) -> Domain {
        self.endpoint.domain
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.endpoint.base_url
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        self.endpoint.url(path)
    }

    // =========================================================================
    // JSON VERBS
    // =========================================================================

    /// # Errors
    ///
    /// Returns the classified failure or `Parse` for an unexpected body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T, ClientError> {
        let response = self.send(self.request(Method::GET, path).map(|b| b.query(query))).await?;
        self.json(response).await
    }

    /// # Errors
    ///
    /// Returns the classified failure or `Parse` for an unexpected body.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(self.request(Method::POST, path).map(|b| b.json(body))).await?;
        self.json(response).await
    }

    /// POST a credential exchange. No bearer is attached, so a rejection
    /// never touches the current session.
    ///
    /// # Errors
    ///
    /// Returns the classified failure or `Parse` for an unexpected body.
    pub async fn post_anonymous<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.http.request(Method::POST, self.endpoint.url(path)).json(body);
        let response = self.send(Outgoing { builder, token: None }).await?;
        self.json(response).await
    }

    /// POST without a request body. Whatever the service answers with is
    /// discarded.
    ///
    /// # Errors
    ///
    /// Returns the classified failure.
    pub async fn post_empty(&self, path: &str) -> Result<(), ClientError> {
        self.send(self.request(Method::POST, path)).await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns the classified failure or `Parse` for an unexpected body.
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(self.request(Method::PUT, path).map(|b| b.json(body))).await?;
        self.json(response).await
    }

    /// # Errors
    ///
    /// Returns the classified failure.
    pub async fn delete(&self, path: &str) -> Result<(), ClientError> {
        self.send(self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    /// GET a paged envelope. `extra` is sent before `page`/`size`.
    ///
    /// # Errors
    ///
    /// Returns the classified failure or `Parse` when the body is not JSON.
    /// A JSON body of the wrong shape decodes to an empty page.
    pub async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        request: PageRequest,
        extra: &[(&str, String)],
    ) -> Result<Page<T>, ClientError> {
        let outgoing = self.request(Method::GET, path).map(|b| b.query(extra).query(&request.query()));
        let response = self.send(outgoing).await?;
        let envelope: Value = self.json(response).await?;
        Ok(decode_page(&envelope, request))
    }

    /// POST a multipart form.
    ///
    /// # Errors
    ///
    /// Returns the classified failure.
    pub async fn post_multipart(&self, path: &str, form: reqwest::multipart::Form) -> Result<Response, ClientError> {
        self.send(self.request(Method::POST, path).map(|b| b.multipart(form))).await
    }

    // =========================================================================
    // EXECUTION
    // =========================================================================

    fn request(&self, method: Method, path: &str) -> Outgoing {
        let builder = self.http.request(method, self.endpoint.url(path));
        let token = self.session.token();
        let builder = match &token {
            Some(token) => builder.header(AUTHORIZATION, format!("Bearer {token}")),
            None => builder,
        };
        Outgoing { builder, token }
    }

    async fn send(&self, outgoing: Outgoing) -> Result<Response, ClientError> {
        let domain = self.endpoint.domain;
        let Outgoing { builder, token } = outgoing;
        let response = builder.send().await.map_err(|e| {
            tracing::warn!(%domain, error = %e, "request failed without a response");
            ClientError::Network { domain, message: e.to_string() }
        })?;

        let status = response.status();
        tracing::debug!(%domain, status = status.as_u16(), url = %response.url(), "response");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = ClientError::from_status(domain, status.as_u16(), server_message(&body));
        if status == StatusCode::UNAUTHORIZED {
            self.session.on_unauthorized(domain, token.as_deref());
        }
        tracing::info!(%domain, status = status.as_u16(), code = err.error_code(), "request rejected");
        Err(err)
    }

    async fn json<T: DeserializeOwned>(&self, response: Response) -> Result<T, ClientError> {
        let domain = self.endpoint.domain;
        let text = response.text().await.map_err(|e| ClientError::Network { domain, message: e.to_string() })?;
        parse_body(domain, &text)
    }
}

/// A request plus the token it was built with.
struct Outgoing {
    builder: RequestBuilder,
    token: Option<String>,
}

impl Outgoing {
    fn map(self, f: impl FnOnce(RequestBuilder) -> RequestBuilder) -> Self {
        Self { builder: f(self.builder), token: self.token }
    }
}

/// Parse a success body. An empty body parses as JSON `null`.
pub(crate) fn parse_body<T: DeserializeOwned>(domain: Domain, text: &str) -> Result<T, ClientError> {
    let text = if text.trim().is_empty() { "null" } else { text };
    serde_json::from_str(text).map_err(|e| ClientError::Parse { domain, message: e.to_string() })
}

/// The `message` field of an error body, when the body is JSON and has one.
pub(crate) fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "error", "detail"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
