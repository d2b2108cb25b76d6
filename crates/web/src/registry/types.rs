//! Wire types for the registry REST service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use regpoint_core::{ApplicationId, ApplicationStatus, Naira, PostId, SlideId};

/// Server-side pricing row for a service offering.
///
/// Prices travel as display strings; the catalog parses them when merging
/// with the local templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicePricing {
    pub id: String,
    pub price: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<String>,
}

/// Media kind for slides and posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    /// Classify an HTTP content type.
    #[must_use]
    pub fn from_content_type(content_type: &str) -> Self {
        if content_type.starts_with("video/") {
            Self::Video
        } else {
            Self::Image
        }
    }

    /// Wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

/// A homepage/section slide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slide {
    pub id: SlideId,
    pub section: String,
    pub media_url: String,
    pub media_type: MediaType,
}

/// Metadata row inserted after a slide's media has been uploaded.
#[derive(Debug, Clone, Serialize)]
pub struct NewSlide {
    pub section: String,
    pub media_url: String,
    pub media_type: MediaType,
}

/// A news/content post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub excerpt: String,
    pub category: String,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub media_type: Option<MediaType>,
    pub created_at: DateTime<Utc>,
}

/// Fields for a new post; the media binary travels alongside as multipart.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub excerpt: String,
    pub category: String,
    pub media: Option<MediaUpload>,
}

/// An in-memory media file destined for a multipart submission.
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Director identity fields on an application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectorDetails {
    pub full_name: String,
    pub email: String,
    pub phone: String,
}

/// A registration application as the registry returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub business_names: Vec<String>,
    pub director: DirectorDetails,
    pub address: String,
    pub status: ApplicationStatus,
    pub payment_ref: String,
    pub created_at: DateTime<Utc>,
}

/// A draft application submitted after payment confirmation.
///
/// Never sent without a payment reference: the draft stays in the local
/// slot until the confirmation callback supplies one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationSubmission {
    pub reference: String,
    pub service_id: String,
    pub business_names: Vec<String>,
    pub director: DirectorDetails,
    pub address: String,
    pub status: ApplicationStatus,
    pub payment_ref: String,
    pub amount: Naira,
}

/// Audit record written once at payment success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransaction {
    pub client: String,
    pub service: String,
    pub amount: Naira,
    pub status: String,
}

/// A row from the public application tracker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackRecord {
    pub reference: String,
    pub business_name: String,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Fields sent to initialize a payment with the provider.
#[derive(Debug, Clone, Serialize)]
pub struct NewPayment {
    /// Merchant public key identifying the site with the provider.
    pub key: String,
    pub email: String,
    /// Amount in the currency's minor unit (kobo).
    pub amount: i64,
    pub reference: String,
    /// Where the provider redirects after payment settles.
    pub callback_url: String,
}

/// Response from payment initialization.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentInit {
    pub authorization_url: String,
}
