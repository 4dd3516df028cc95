//! Search domain: paged full-text book search.

use crate::error::ClientError;
use crate::net::types::Book;
use crate::net::{DomainClient, Page, PageRequest};

#[derive(Clone)]
pub struct SearchClient {
    http: DomainClient,
}

impl SearchClient {
    #[must_use]
    pub fn new(http: DomainClient) -> Self {
        Self { http }
    }

    /// Search books by title or author.
    ///
    /// A blank query is answered locally with an empty page.
    ///
    /// # Errors
    ///
    /// Returns the classified request failure.
    pub async fn search(&self, query: &str, request: PageRequest) -> Result<Page<Book>, ClientError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Page::empty(request));
        }
        self.http.get_page("/books/paged", request, &[("query", query.to_owned())]).await
    }
}
