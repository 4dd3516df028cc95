//! Paged list view with an out-of-order response guard.

use std::future::Future;

use parking_lot::Mutex;

use crate::error::ClientError;
use crate::net::{Page, PageRequest};

struct ViewState<T, Q> {
    /// Sequence number of the newest submission.
    issued: u64,
    /// Sequence number of the submission whose page is shown.
    applied: u64,
    /// Query and cursor of the shown page. Pending submissions do not move
    /// them, so paging after a failed load continues from what is shown.
    query: Q,
    request: PageRequest,
    page: Option<Page<T>>,
}

/// A list view keyed by a query `Q` and a page cursor.
///
/// `load` may be called concurrently from several tasks; only the response
/// to the newest call is kept.
pub struct PagedView<T, Q = ()> {
    state: Mutex<ViewState<T, Q>>,
}

impl<T, Q: Clone + Default> Default for PagedView<T, Q> {
    fn default() -> Self {
        Self::new(Q::default(), PageRequest::default())
    }
}

impl<T, Q: Clone> PagedView<T, Q> {
    #[must_use]
    pub fn new(query: Q, request: PageRequest) -> Self {
        Self { state: Mutex::new(ViewState { issued: 0, applied: 0, query, request, page: None }) }
    }

    /// Submit `(query, request)` and apply the result if it is still the
    /// newest submission when it completes.
    ///
    /// Returns `Ok(true)` when the page was applied and `Ok(false)` when a
    /// newer submission superseded it.
    ///
    /// # Errors
    ///
    /// Returns the fetch error only for the newest submission. Failures of
    /// superseded submissions are dropped.
    pub async fn load<F, Fut>(&self, query: Q, request: PageRequest, fetch: F) -> Result<bool, ClientError>
    where
        F: FnOnce(Q, PageRequest) -> Fut,
        Fut: Future<Output = Result<Page<T>, ClientError>>,
    {
        let ticket = {
            let mut state = self.state.lock();
            state.issued += 1;
            state.issued
        };

        let result = fetch(query.clone(), request).await;

        let mut state = self.state.lock();
        if ticket != state.issued {
            tracing::debug!(ticket, newest = state.issued, "discarding superseded response");
            return Ok(false);
        }
        let page = result?;
        state.applied = ticket;
        state.query = query;
        state.request = request;
        state.page = Some(page);
        Ok(true)
    }

    /// Load the page after the shown one with the shown query.
    ///
    /// # Errors
    ///
    /// See [`PagedView::load`].
    pub async fn next<F, Fut>(&self, fetch: F) -> Result<bool, ClientError>
    where
        F: FnOnce(Q, PageRequest) -> Fut,
        Fut: Future<Output = Result<Page<T>, ClientError>>,
    {
        let (query, request) = self.position();
        self.load(query, request.next(), fetch).await
    }

    /// Load the page before the shown one, clamped at the first page.
    ///
    /// # Errors
    ///
    /// See [`PagedView::load`].
    pub async fn prev<F, Fut>(&self, fetch: F) -> Result<bool, ClientError>
    where
        F: FnOnce(Q, PageRequest) -> Fut,
        Fut: Future<Output = Result<Page<T>, ClientError>>,
    {
        let (query, request) = self.position();
        self.load(query, request.prev(), fetch).await
    }

    /// Query and cursor of the shown page, or the initial ones before any
    /// load has applied.
    #[must_use]
    pub fn position(&self) -> (Q, PageRequest) {
        let state = self.state.lock();
        (state.query.clone(), state.request)
    }

    #[must_use]
    pub fn cursor(&self) -> PageRequest {
        self.state.lock().request
    }

    /// Sequence number of the page currently shown; 0 before any load.
    #[must_use]
    pub fn applied(&self) -> u64 {
        self.state.lock().applied
    }

    /// Drop the shown page. In-flight submissions are superseded.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.issued += 1;
        state.page = None;
    }
}

impl<T: Clone, Q> PagedView<T, Q> {
    #[must_use]
    pub fn page(&self) -> Option<Page<T>> {
        self.state.lock().page.clone()
    }
}

#[cfg(test)]
#[path = "paged_test.rs"]
mod tests;
