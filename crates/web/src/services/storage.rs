//! Storage service client for media uploads.
//!
//! Slide media follows the upload pipeline: binary to the storage project,
//! public URL back, metadata row into the registry afterwards.

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use thiserror::Error;
use uuid::Uuid;

use crate::config::RegPointConfig;

/// Bucket holding uploaded site media.
const MEDIA_BUCKET: &str = "media";

/// Errors that can occur when interacting with the storage service.
#[derive(Debug, Error)]
pub enum StorageError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Storage service returned an error response.
    #[error("Storage API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The configured service key is not a valid header value.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// Client for the storage project.
#[derive(Clone)]
pub struct StorageClient {
    client: reqwest::Client,
    base_url: String,
}

impl StorageClient {
    /// Create a new storage client.
    ///
    /// # Errors
    ///
    /// Returns an error if the service key is malformed or the HTTP client
    /// fails to build.
    pub fn new(config: &RegPointConfig) -> Result<Self, StorageError> {
        let mut headers = HeaderMap::new();
        let auth_value = format!("Bearer {}", config.storage_key.expose_secret());
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&auth_value).map_err(|e| StorageError::InvalidKey(e.to_string()))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.storage_url.clone(),
        })
    }

    /// Upload a media object and return its public URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload request fails.
    pub async fn upload(
        &self,
        name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StorageError> {
        let url = format!("{}/object/{MEDIA_BUCKET}/{name}", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", content_type)
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StorageError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(self.public_url(name))
    }

    /// Public URL for an uploaded object.
    #[must_use]
    pub fn public_url(&self, name: &str) -> String {
        format!("{}/object/public/{MEDIA_BUCKET}/{name}", self.base_url)
    }

    /// Generate a unique object name with an extension derived from the
    /// content type.
    #[must_use]
    pub fn object_name(content_type: &str) -> String {
        let ext = match content_type {
            "image/png" => "png",
            "image/gif" => "gif",
            "image/webp" => "webp",
            "image/svg+xml" => "svg",
            "video/mp4" => "mp4",
            "video/webm" => "webm",
            _ => "jpg",
        };
        format!("{}.{ext}", Uuid::new_v4())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_object_name_extension() {
        assert!(StorageClient::object_name("image/png").ends_with(".png"));
        assert!(StorageClient::object_name("video/mp4").ends_with(".mp4"));
        assert!(StorageClient::object_name("application/octet-stream").ends_with(".jpg"));
    }

    #[test]
    fn test_object_names_are_unique() {
        let a = StorageClient::object_name("image/png");
        let b = StorageClient::object_name("image/png");
        assert_ne!(a, b);
    }
}
