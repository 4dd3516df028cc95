//! Media domain: file upload and addressing.
//!
//! The service answers an upload with the stored object name, which is the
//! original file name behind a generated prefix. Depending on the deployment
//! that name arrives as plain text, a JSON string, or an object with a
//! `fileName` field; all three are accepted.

use reqwest::multipart::{Form, Part};
use serde_json::Value;

use crate::config::Domain;
use crate::error::ClientError;
use crate::net::DomainClient;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

fn file_path(name: &str) -> String {
    format!("/files/{}", urlencoding::encode(name))
}

/// Stored name from an upload response body.
fn stored_name(body: &str) -> Option<String> {
    let body = body.trim();
    let name = match serde_json::from_str::<Value>(body) {
        Ok(Value::String(name)) => name,
        Ok(Value::Object(fields)) => ["fileName", "filename", "name"]
            .iter()
            .find_map(|key| fields.get(*key).and_then(Value::as_str))
            .map(str::to_owned)?,
        Ok(_) => return None,
        Err(_) => body.to_owned(),
    };
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_owned())
}

#[derive(Clone)]
pub struct MediaClient {
    http: DomainClient,
}

impl MediaClient {
    #[must_use]
    pub fn new(http: DomainClient) -> Self {
        Self { http }
    }

    /// Upload `bytes` as multipart field `file` and return the stored name.
    ///
    /// # Errors
    ///
    /// Returns `Validation` without sending when `content_type` is not a
    /// MIME type, the classified request failure, or `Parse` when the
    /// response carries no name.
    pub async fn upload(&self, file_name: &str, bytes: Vec<u8>, content_type: Option<&str>) -> Result<String, ClientError> {
        let content_type = content_type.unwrap_or(DEFAULT_CONTENT_TYPE);
        let part = Part::bytes(bytes).file_name(file_name.to_owned()).mime_str(content_type).map_err(|e| {
            ClientError::Validation {
                domain: Domain::Media,
                status: 415,
                message: Some(format!("invalid content type `{content_type}`: {e}")),
            }
        })?;
        let form = Form::new().part("file", part);

        let response = self.http.post_multipart("/files", form).await?;
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Network { domain: Domain::Media, message: e.to_string() })?;
        let name = stored_name(&body).ok_or_else(|| ClientError::Parse {
            domain: Domain::Media,
            message: "upload response did not name the stored file".to_owned(),
        })?;
        tracing::info!(file = %name, "uploaded");
        Ok(name)
    }

    /// Absolute address of a stored file.
    #[must_use]
    pub fn file_url(&self, name: &str) -> String {
        self.http.url(&file_path(name))
    }
}

#[cfg(test)]
#[path = "media_test.rs"]
mod tests;
