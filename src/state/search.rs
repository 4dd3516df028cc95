//! Search results view.

use crate::domains::SearchClient;
use crate::error::ClientError;
use crate::net::types::Book;
use crate::net::{Page, PageRequest};

use super::paged::PagedView;

/// Search box plus result pages. A new query restarts at the first page;
/// `next`/`prev` page through the current query.
pub struct SearchView {
    client: SearchClient,
    page_size: u32,
    view: PagedView<Book, String>,
}

impl SearchView {
    #[must_use]
    pub fn new(client: SearchClient, page_size: u32) -> Self {
        Self { client, page_size, view: PagedView::new(String::new(), PageRequest::first(page_size)) }
    }

    /// Run `query` from the first page.
    ///
    /// # Errors
    ///
    /// See [`PagedView::load`].
    pub async fn submit(&self, query: &str) -> Result<bool, ClientError> {
        let query = query.trim().to_owned();
        tracing::debug!(query = %query, "search submitted");
        self.view.load(query, PageRequest::first(self.page_size), |q, r| self.fetch(q, r)).await
    }

    /// # Errors
    ///
    /// See [`PagedView::load`].
    pub async fn next(&self) -> Result<bool, ClientError> {
        self.view.next(|q, r| self.fetch(q, r)).await
    }

    /// # Errors
    ///
    /// See [`PagedView::load`].
    pub async fn prev(&self) -> Result<bool, ClientError> {
        self.view.prev(|q, r| self.fetch(q, r)).await
    }

    #[must_use]
    pub fn query(&self) -> String {
        self.view.position().0
    }

    #[must_use]
    pub fn cursor(&self) -> PageRequest {
        self.view.cursor()
    }

    #[must_use]
    pub fn results(&self) -> Option<Page<Book>> {
        self.view.page()
    }

    async fn fetch(&self, query: String, request: PageRequest) -> Result<Page<Book>, ClientError> {
        self.client.search(&query, request).await
    }
}
