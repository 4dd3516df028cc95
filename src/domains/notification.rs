//! Notification domain: stored notifications and outgoing email.

use crate::error::ClientError;
use crate::net::DomainClient;
use crate::net::types::{EmailMessage, EmailReceipt, Notification};

fn notification_path(id: &str) -> String {
    format!("/notifications/{}", urlencoding::encode(id))
}

#[derive(Clone)]
pub struct NotificationClient {
    http: DomainClient,
}

impl NotificationClient {
    #[must_use]
    pub fn new(http: DomainClient) -> Self {
        Self { http }
    }

    /// All stored notifications. A `null` body is an empty list.
    ///
    /// # Errors
    ///
    /// Returns the classified request failure.
    pub async fn list(&self) -> Result<Vec<Notification>, ClientError> {
        let items: Option<Vec<Notification>> = self.http.get("/notifications", &[]).await?;
        Ok(items.unwrap_or_default())
    }

    /// # Errors
    ///
    /// Returns the classified request failure.
    pub async fn create(&self, notification: &Notification) -> Result<Notification, ClientError> {
        self.http.post("/notifications", notification).await
    }

    /// # Errors
    ///
    /// Returns the classified request failure.
    pub async fn delete(&self, id: &str) -> Result<(), ClientError> {
        self.http.delete(&notification_path(id)).await
    }

    /// # Errors
    ///
    /// Returns the classified request failure.
    pub async fn send_email(&self, message: &EmailMessage) -> Result<EmailReceipt, ClientError> {
        self.http.post("/email", message).await
    }

    /// Send `message` by email, then record it as an `EMAIL` notification.
    ///
    /// Nothing is recorded when the email is rejected.
    ///
    /// # Errors
    ///
    /// Returns the first failing request's error.
    pub async fn send_notification(&self, message: &EmailMessage) -> Result<Notification, ClientError> {
        let receipt = self.send_email(message).await?;
        tracing::debug!(status = %receipt.status, "email accepted");
        self.create(&Notification::from(message)).await
    }
}

#[cfg(test)]
#[path = "notification_test.rs"]
mod tests;
