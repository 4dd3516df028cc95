//! Catalog domain: books and stock.

use serde::Serialize;

use crate::error::ClientError;
use crate::net::types::Book;
use crate::net::{DomainClient, Page, PageRequest};

fn book_path(id: i64) -> String {
    format!("/books/{id}")
}

fn quantity_path(id: i64) -> String {
    format!("/books/{id}/quantity")
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QuantityChange {
    quantity_change: i32,
}

#[derive(Clone)]
pub struct CatalogClient {
    http: DomainClient,
}

impl CatalogClient {
    #[must_use]
    pub fn new(http: DomainClient) -> Self {
        Self { http }
    }

    /// # Errors
    ///
    /// Returns the classified request failure.
    pub async fn list_books(&self) -> Result<Vec<Book>, ClientError> {
        self.http.get("/books", &[]).await
    }

    /// # Errors
    ///
    /// Returns the classified request failure.
    pub async fn list_books_paged(&self, request: PageRequest) -> Result<Page<Book>, ClientError> {
        self.http.get_page("/books/paged", request, &[]).await
    }

    /// # Errors
    ///
    /// Returns the classified request failure.
    pub async fn get_book(&self, id: i64) -> Result<Book, ClientError> {
        self.http.get(&book_path(id), &[]).await
    }

    /// # Errors
    ///
    /// Returns the classified request failure.
    pub async fn create_book(&self, book: &Book) -> Result<Book, ClientError> {
        self.http.post("/books", book).await
    }

    /// # Errors
    ///
    /// Returns the classified request failure.
    pub async fn update_book(&self, id: i64, book: &Book) -> Result<Book, ClientError> {
        self.http.put(&book_path(id), book).await
    }

    /// # Errors
    ///
    /// Returns the classified request failure.
    pub async fn delete_book(&self, id: i64) -> Result<(), ClientError> {
        self.http.delete(&book_path(id)).await
    }

    /// Add `change` copies to the stock of `id`; negative values remove.
    ///
    /// # Errors
    ///
    /// Returns the classified request failure.
    pub async fn adjust_quantity(&self, id: i64, change: i32) -> Result<Book, ClientError> {
        self.http.put(&quantity_path(id), &QuantityChange { quantity_change: change }).await
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
