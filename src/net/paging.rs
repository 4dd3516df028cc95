//! Paging contract shared by every list-capable domain.
//!
//! Requests carry `page` (zero-based) and `size` query parameters. Responses
//! are Spring-style envelopes: `content` plus `number`, `size`,
//! `totalElements` and `totalPages`.
//!
//! Decoding never fails. An envelope without `content` is an empty page, so
//! listing views survive partial backend responses. `next` does not know
//! where the last page is; past the end the server returns empty content.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::DEFAULT_PAGE_SIZE;

/// Position of a page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 0, size: DEFAULT_PAGE_SIZE }
    }
}

impl PageRequest {
    #[must_use]
    pub fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }

    #[must_use]
    pub fn first(size: u32) -> Self {
        Self { page: 0, size }
    }

    /// Query parameters for this request.
    #[must_use]
    pub fn query(self) -> [(&'static str, String); 2] {
        [("page", self.page.to_string()), ("size", self.size.to_string())]
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self { page: self.page.saturating_add(1), ..self }
    }

    #[must_use]
    pub fn prev(self) -> Self {
        Self { page: self.page.saturating_sub(1), ..self }
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page_index: u32,
    pub page_size: u32,
    pub total_elements: u64,
    pub total_pages: Option<u32>,
}

impl<T> Page<T> {
    #[must_use]
    pub fn empty(request: PageRequest) -> Self {
        Self { content: Vec::new(), page_index: request.page, page_size: request.size, total_elements: 0, total_pages: None }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    #[must_use]
    pub fn request(&self) -> PageRequest {
        PageRequest { page: self.page_index, size: self.page_size }
    }

    /// Whether the server reported a page after this one.
    ///
    /// Unknown when the envelope carried no `totalPages`.
    #[must_use]
    pub fn has_next(&self) -> Option<bool> {
        self.total_pages.map(|total| self.page_index.saturating_add(1) < total)
    }
}

/// Decode a paged envelope, falling back to `request` for missing metadata.
pub fn decode_page<T: DeserializeOwned>(envelope: &Value, request: PageRequest) -> Page<T> {
    let page_index = read_u32(envelope, &["number", "page", "pageIndex"]).unwrap_or(request.page);
    let page_size = read_u32(envelope, &["size", "pageSize"]).unwrap_or(request.size);
    let total_pages = read_u32(envelope, &["totalPages"]);

    let mut content: Vec<T> = match envelope.get("content") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match T::deserialize(item) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping malformed page item");
                    None
                }
            })
            .collect(),
        Some(_) => {
            tracing::warn!("page envelope `content` is not an array; treating as empty");
            Vec::new()
        }
        None => Vec::new(),
    };

    let page_size = if page_size == 0 { u32::try_from(content.len()).unwrap_or(u32::MAX) } else { page_size };
    if content.len() > page_size as usize {
        tracing::warn!(len = content.len(), page_size, "page content exceeds page size; truncating");
        content.truncate(page_size as usize);
    }

    let total_elements = envelope.get("totalElements").and_then(Value::as_u64).unwrap_or(content.len() as u64);

    Page { content, page_index, page_size, total_elements, total_pages }
}

fn read_u32(envelope: &Value, keys: &[&str]) -> Option<u32> {
    keys.iter()
        .find_map(|key| envelope.get(*key).and_then(Value::as_u64))
        .and_then(|n| u32::try_from(n).ok())
}

#[cfg(test)]
#[path = "paging_test.rs"]
mod tests;
