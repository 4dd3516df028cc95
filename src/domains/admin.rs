//! Admin domain: aggregate dashboard figures.

use crate::error::ClientError;
use crate::net::DomainClient;
use crate::net::types::AdminStats;

#[derive(Clone)]
pub struct AdminClient {
    http: DomainClient,
}

impl AdminClient {
    #[must_use]
    pub fn new(http: DomainClient) -> Self {
        Self { http }
    }

    /// # Errors
    ///
    /// Returns the classified request failure.
    pub async fn stats(&self) -> Result<AdminStats, ClientError> {
        self.http.get("/stats", &[]).await
    }
}
