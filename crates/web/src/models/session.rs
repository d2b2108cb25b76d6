//! Session-related types.
//!
//! Types stored in the session for authentication state. The session is the
//! single accessor for the bearer token: every authorized registry call
//! takes its token from [`CurrentUser`], never from a second storage path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use regpoint_core::Email;

use crate::services::auth::ProviderSession;

/// Session-stored user identity and provider tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's email address.
    pub email: Email,
    /// Bearer token for authorized registry calls.
    pub access_token: String,
    /// Refresh token for provider session rotation.
    pub refresh_token: String,
    /// Access token expiry.
    pub expires_at: DateTime<Utc>,
}

impl CurrentUser {
    /// Whether the access token has expired as of `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

impl From<ProviderSession> for CurrentUser {
    fn from(session: ProviderSession) -> Self {
        Self {
            email: session.email,
            access_token: session.access_token,
            refresh_token: session.refresh_token,
            expires_at: session.expires_at,
        }
    }
}

/// Session keys for authentication and checkout data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the staged draft application awaiting payment.
    pub const PENDING_APPLICATION: &str = "pending_application";

    /// Key for the checkout countdown deadline.
    pub const CHECKOUT_DEADLINE: &str = "checkout_deadline";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn user(expires_at: DateTime<Utc>) -> CurrentUser {
        CurrentUser {
            email: Email::parse("user@example.com").unwrap(),
            access_token: "token".to_string(),
            refresh_token: "refresh".to_string(),
            expires_at,
        }
    }

    #[test]
    fn test_is_expired() {
        let now = Utc::now();
        assert!(user(now - Duration::seconds(1)).is_expired(now));
        assert!(user(now).is_expired(now));
        assert!(!user(now + Duration::hours(1)).is_expired(now));
    }
}
