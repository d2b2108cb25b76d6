//! Registry REST service client.
//!
//! All business data lives behind this API: service pricing, slides, posts,
//! applications, transactions, the public tracker, and payment
//! initialization. Reads are public; every mutating call carries the bearer
//! token from the current session and is verified server-side.

pub mod types;

use std::time::Duration;

use thiserror::Error;

use regpoint_core::{ApplicationId, ApplicationStatus, PostId, SlideId};

use crate::config::RegPointConfig;

pub use types::{
    Application, ApplicationSubmission, DirectorDetails, MediaType, MediaUpload, NewPayment,
    NewPost, NewSlide, NewTransaction, PaymentInit, Post, ServicePricing, Slide, TrackRecord,
};

/// Wall-clock limit for the content-listing search fetch.
///
/// The only in-flight abort in the system; elapsing surfaces as the
/// distinct [`RegistryError::Timeout`] kind rather than a generic failure.
pub const SEARCH_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur when talking to the registry service.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Registry returned an error response.
    #[error("Registry API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse a registry response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The fetch was aborted after the wall-clock timeout.
    #[error("Registry request timed out")]
    Timeout,
}

impl RegistryError {
    /// Whether this error is a 404 from the registry.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }
}

/// Client for the registry REST service.
#[derive(Clone)]
pub struct RegistryClient {
    client: reqwest::Client,
    base_url: String,
}

impl RegistryClient {
    /// Create a new registry client.
    #[must_use]
    pub fn new(config: &RegPointConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.registry_api_url.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Consume a response, mapping non-success statuses to `Api` errors.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, RegistryError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(RegistryError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, RegistryError> {
        let response = self.client.get(self.url(path)).send().await?;
        let response = Self::check(response).await?;
        response
            .json()
            .await
            .map_err(|e| RegistryError::Parse(e.to_string()))
    }

    // =========================================================================
    // Services
    // =========================================================================

    /// Fetch the server-side pricing rows for all service offerings.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_services(&self) -> Result<Vec<ServicePricing>, RegistryError> {
        self.get_json("/services").await
    }

    /// Update a service's price (admin console).
    ///
    /// # Errors
    ///
    /// Returns an error if the registry rejects the update.
    pub async fn update_service_price(
        &self,
        token: &str,
        id: &str,
        price: &str,
        original_price: Option<&str>,
    ) -> Result<(), RegistryError> {
        let mut body = serde_json::json!({ "price": price });
        if let Some(original) = original_price {
            body["original_price"] = serde_json::Value::String(original.to_string());
        }

        let response = self
            .client
            .put(self.url(&format!("/services/{id}")))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    // =========================================================================
    // Slides
    // =========================================================================

    /// Fetch all slides.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_slides(&self) -> Result<Vec<Slide>, RegistryError> {
        self.get_json("/slides").await
    }

    /// Insert a slide metadata row (media already uploaded to storage).
    ///
    /// # Errors
    ///
    /// Returns an error if the registry rejects the insert.
    pub async fn create_slide(&self, token: &str, slide: &NewSlide) -> Result<(), RegistryError> {
        let response = self
            .client
            .post(self.url("/slides"))
            .bearer_auth(token)
            .json(slide)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Delete a slide by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry rejects the delete.
    pub async fn delete_slide(&self, token: &str, id: SlideId) -> Result<(), RegistryError> {
        let response = self
            .client
            .delete(self.url(&format!("/slides/{id}")))
            .bearer_auth(token)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    // =========================================================================
    // Posts
    // =========================================================================

    /// Fetch all posts.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_posts(&self) -> Result<Vec<Post>, RegistryError> {
        self.get_json("/posts").await
    }

    /// Fetch all posts, aborting after [`SEARCH_FETCH_TIMEOUT`].
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Timeout` when the wall clock elapses before
    /// the response arrives.
    pub async fn get_posts_with_timeout(&self) -> Result<Vec<Post>, RegistryError> {
        tokio::time::timeout(SEARCH_FETCH_TIMEOUT, self.get_posts())
            .await
            .map_err(|_| RegistryError::Timeout)?
    }

    /// Fetch one post by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; a missing post is an `Api`
    /// error with status 404 (see [`RegistryError::is_not_found`]).
    pub async fn get_post(&self, id: PostId) -> Result<Post, RegistryError> {
        self.get_json(&format!("/posts/{id}")).await
    }

    /// Create a post via multipart submission.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry rejects the submission.
    pub async fn create_post(&self, token: &str, post: NewPost) -> Result<(), RegistryError> {
        let mut form = reqwest::multipart::Form::new()
            .text("title", post.title)
            .text("excerpt", post.excerpt)
            .text("category", post.category);

        if let Some(media) = post.media {
            let part = reqwest::multipart::Part::bytes(media.bytes)
                .file_name(media.file_name)
                .mime_str(&media.content_type)
                .map_err(|e| RegistryError::Parse(e.to_string()))?;
            form = form.part("media", part);
        }

        let response = self
            .client
            .post(self.url("/posts"))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Delete a post by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry rejects the delete.
    pub async fn delete_post(&self, token: &str, id: PostId) -> Result<(), RegistryError> {
        let response = self
            .client
            .delete(self.url(&format!("/posts/{id}")))
            .bearer_auth(token)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    // =========================================================================
    // Applications
    // =========================================================================

    /// Submit a paid application draft.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry rejects the submission; the caller
    /// keeps the draft staged for an out-of-band retry.
    pub async fn submit_application(
        &self,
        submission: &ApplicationSubmission,
    ) -> Result<(), RegistryError> {
        let response = self
            .client
            .post(self.url("/applications"))
            .json(submission)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Fetch all applications (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_applications(&self, token: &str) -> Result<Vec<Application>, RegistryError> {
        let response = self
            .client
            .get(self.url("/applications"))
            .bearer_auth(token)
            .send()
            .await?;
        let response = Self::check(response).await?;
        response
            .json()
            .await
            .map_err(|e| RegistryError::Parse(e.to_string()))
    }

    /// Advance an application's status.
    ///
    /// The registry sends the applicant notification as a side-effect, so
    /// the body carries the contact email and business name along with the
    /// new status.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry rejects the update.
    pub async fn update_application_status(
        &self,
        token: &str,
        id: ApplicationId,
        status: ApplicationStatus,
        email: &str,
        business_name: &str,
    ) -> Result<(), RegistryError> {
        let body = serde_json::json!({
            "status": status,
            "email": email,
            "businessName": business_name,
        });

        let response = self
            .client
            .put(self.url(&format!("/applications/{id}/status")))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    // =========================================================================
    // Transactions, tracking, payments
    // =========================================================================

    /// Write the once-only transaction audit record.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry rejects the record.
    pub async fn create_transaction(
        &self,
        transaction: &NewTransaction,
    ) -> Result<(), RegistryError> {
        let response = self
            .client
            .post(self.url("/transactions"))
            .json(transaction)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Look up application status by email or payment reference.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn track(&self, query: &str) -> Result<Vec<TrackRecord>, RegistryError> {
        self.get_json(&format!("/track?query={}", urlencoding::encode(query)))
            .await
    }

    /// Initialize a payment, returning the provider's authorization URL.
    ///
    /// # Errors
    ///
    /// Returns an error if initialization fails.
    pub async fn initialize_payment(
        &self,
        payment: &NewPayment,
    ) -> Result<PaymentInit, RegistryError> {
        let response = self
            .client
            .post(self.url("/payments/initialize"))
            .json(payment)
            .send()
            .await?;
        let response = Self::check(response).await?;
        response
            .json()
            .await
            .map_err(|e| RegistryError::Parse(e.to_string()))
    }
}
