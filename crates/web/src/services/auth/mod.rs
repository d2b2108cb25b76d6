//! Hosted auth provider client.
//!
//! The site never stores credentials; sign-in, token rotation, sign-out and
//! password recovery are all delegated to the provider's REST endpoints.
//! Bad credentials and failed refreshes map to distinct error variants so
//! the guard can fail closed without retrying.

mod error;

pub use error::AuthError;

use chrono::{DateTime, Duration, Utc};
use regpoint_core::Email;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Deserialize;

use crate::config::RegPointConfig;

/// A session issued by the auth provider.
#[derive(Debug, Clone)]
pub struct ProviderSession {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub email: Email,
}

/// Token response wire format.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    /// Lifetime in seconds.
    expires_in: i64,
    user: UserPayload,
}

#[derive(Debug, Deserialize)]
struct UserPayload {
    email: String,
}

impl TokenResponse {
    fn into_session(self, issued_at: DateTime<Utc>) -> Result<ProviderSession, AuthError> {
        let email = Email::parse(&self.user.email)
            .map_err(|e| AuthError::Parse(format!("provider returned bad email: {e}")))?;
        Ok(ProviderSession {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at: issued_at + Duration::seconds(self.expires_in),
            email,
        })
    }
}

/// Client for the hosted auth provider.
#[derive(Clone)]
pub struct AuthClient {
    client: reqwest::Client,
    base_url: String,
}

impl AuthClient {
    /// Create a new auth provider client.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not a valid header value or the
    /// HTTP client fails to build.
    pub fn new(config: &RegPointConfig) -> Result<Self, AuthError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(config.auth_api_key.expose_secret())
                .map_err(|e| AuthError::Parse(format!("Invalid API key format: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.auth_url.clone(),
        })
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` when the provider rejects the
    /// credentials, or a transport/parse error otherwise.
    pub async fn sign_in(&self, email: &Email, password: &str) -> Result<ProviderSession, AuthError> {
        let url = format!("{}/token?grant_type=password", self.base_url);
        let body = serde_json::json!({
            "email": email.as_str(),
            "password": password,
        });

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::BAD_REQUEST || status == reqwest::StatusCode::UNAUTHORIZED
        {
            return Err(AuthError::InvalidCredentials);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AuthError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Parse(e.to_string()))?;
        token.into_session(Utc::now())
    }

    /// Exchange a refresh token for a rotated session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SessionExpired` when the provider refuses the
    /// refresh token; the caller must sign in again.
    pub async fn refresh(&self, refresh_token: &str) -> Result<ProviderSession, AuthError> {
        let url = format!("{}/token?grant_type=refresh_token", self.base_url);
        let body = serde_json::json!({ "refresh_token": refresh_token });

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();

        if status.is_client_error() {
            return Err(AuthError::SessionExpired);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AuthError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Parse(e.to_string()))?;
        token.into_session(Utc::now())
    }

    /// Revoke the provider session behind an access token.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; callers treat sign-out
    /// failures as non-fatal (the local session is cleared regardless).
    pub async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let url = format!("{}/logout", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AuthError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }

    /// Ask the provider to send a password-reset email.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn request_password_reset(
        &self,
        email: &Email,
        redirect_url: &str,
    ) -> Result<(), AuthError> {
        let url = format!(
            "{}/recover?redirect_to={}",
            self.base_url,
            urlencoding::encode(redirect_url)
        );
        let body = serde_json::json!({ "email": email.as_str() });

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AuthError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }

    /// Update the signed-in user's password.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider rejects the update.
    pub async fn update_password(
        &self,
        access_token: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let url = format!("{}/user", self.base_url);
        let body = serde_json::json!({ "password": new_password });

        let response = self
            .client
            .put(&url)
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AuthError::SessionExpired);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AuthError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_into_session() {
        let token = TokenResponse {
            access_token: "at".to_string(),
            refresh_token: "rt".to_string(),
            expires_in: 3600,
            user: UserPayload {
                email: "user@example.com".to_string(),
            },
        };
        let issued_at = Utc::now();
        let session = token.into_session(issued_at).unwrap();
        assert_eq!(session.email.as_str(), "user@example.com");
        assert_eq!(session.expires_at, issued_at + Duration::seconds(3600));
    }

    #[test]
    fn test_token_response_bad_email() {
        let token = TokenResponse {
            access_token: "at".to_string(),
            refresh_token: "rt".to_string(),
            expires_in: 3600,
            user: UserPayload {
                email: "not-an-email".to_string(),
            },
        };
        assert!(matches!(
            token.into_session(Utc::now()),
            Err(AuthError::Parse(_))
        ));
    }

    #[test]
    fn test_token_response_deserializes_provider_payload() {
        let json = r#"{
            "access_token": "at",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "rt",
            "user": { "id": "abc", "email": "user@example.com" }
        }"#;
        let token: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(token.expires_in, 3600);
        assert_eq!(token.user.email, "user@example.com");
    }
}
