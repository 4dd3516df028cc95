//! Borrowing domain: loans, returns and per-book counts.

use crate::error::ClientError;
use crate::net::types::{BorrowedCount, Loan, NewLoan};
use crate::net::{DomainClient, Page, PageRequest};

fn loan_path(id: i64) -> String {
    format!("/loans/{id}")
}

fn return_path(id: i64) -> String {
    format!("/loans/{id}/return")
}

fn user_loans_path(user_id: i64, active_only: bool) -> String {
    if active_only { format!("/users/{user_id}/loans/active") } else { format!("/users/{user_id}/loans") }
}

fn book_loans_path(book_id: i64) -> String {
    format!("/books/{book_id}/loans")
}

fn borrowed_count_path(book_id: i64) -> String {
    format!("/books/{book_id}/borrowed-count")
}

#[derive(Clone)]
pub struct BorrowingClient {
    http: DomainClient,
}

impl BorrowingClient {
    #[must_use]
    pub fn new(http: DomainClient) -> Self {
        Self { http }
    }

    /// # Errors
    ///
    /// Returns the classified request failure.
    pub async fn list_loans(&self, request: PageRequest) -> Result<Page<Loan>, ClientError> {
        self.http.get_page("/loans", request, &[]).await
    }

    /// # Errors
    ///
    /// Returns the classified request failure.
    pub async fn get_loan(&self, id: i64) -> Result<Loan, ClientError> {
        self.http.get(&loan_path(id), &[]).await
    }

    /// # Errors
    ///
    /// Returns the classified request failure; the service rejects loans
    /// beyond available stock with a 4xx and a message.
    pub async fn create_loan(&self, loan: &NewLoan) -> Result<Loan, ClientError> {
        self.http.post("/loans", loan).await
    }

    /// Mark a loan returned. The service answers with an empty body.
    ///
    /// # Errors
    ///
    /// Returns the classified request failure.
    pub async fn return_loan(&self, id: i64) -> Result<(), ClientError> {
        self.http.post_empty(&return_path(id)).await
    }

    /// # Errors
    ///
    /// Returns the classified request failure.
    pub async fn user_loans(&self, user_id: i64) -> Result<Vec<Loan>, ClientError> {
        self.http.get(&user_loans_path(user_id, false), &[]).await
    }

    /// # Errors
    ///
    /// Returns the classified request failure.
    pub async fn user_active_loans(&self, user_id: i64) -> Result<Vec<Loan>, ClientError> {
        self.http.get(&user_loans_path(user_id, true), &[]).await
    }

    /// # Errors
    ///
    /// Returns the classified request failure.
    pub async fn book_loans(&self, book_id: i64) -> Result<Vec<Loan>, ClientError> {
        self.http.get(&book_loans_path(book_id), &[]).await
    }

    /// # Errors
    ///
    /// Returns the classified request failure.
    pub async fn overdue_loans(&self) -> Result<Vec<Loan>, ClientError> {
        self.http.get("/loans/overdue", &[]).await
    }

    /// Copies of `book_id` currently out on loan.
    ///
    /// # Errors
    ///
    /// Returns the classified request failure.
    pub async fn borrowed_count(&self, book_id: i64) -> Result<u32, ClientError> {
        let count: BorrowedCount = self.http.get(&borrowed_count_path(book_id), &[]).await?;
        Ok(count.borrowed_count)
    }
}

#[cfg(test)]
#[path = "borrowing_test.rs"]
mod tests;
