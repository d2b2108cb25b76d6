//! Integration tests for RegPoint.
//!
//! # Running Tests
//!
//! These tests drive a running instance end-to-end and are `#[ignore]`d by
//! default. They require:
//!
//! - The web binary running (`cargo run -p regpoint-web`)
//! - A reachable registry API, auth provider and storage project
//!   (see the environment variables in `regpoint-web/src/config.rs`)
//! - `ADMIN_EMAIL`/`ADMIN_PASSWORD` set for the admin scenarios
//!
//! ```bash
//! cargo test -p regpoint-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `admin_services` - Price console scenarios
//! - `checkout` - Payment confirmation callback behavior
//! - `public` - Anonymous pages, guard redirects, tracker

use reqwest::Client;

/// Base URL for the web app (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("REGPOINT_TEST_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Create an HTTP client with a cookie store and no redirect following,
/// so guard redirects can be asserted directly.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// Sign in as the configured admin, populating the client's session cookie.
///
/// # Panics
///
/// Panics if `ADMIN_EMAIL`/`ADMIN_PASSWORD` are unset or sign-in fails.
pub async fn sign_in_admin(client: &Client) {
    let base_url = base_url();
    let email = std::env::var("ADMIN_EMAIL").expect("ADMIN_EMAIL not set");
    let password = std::env::var("ADMIN_PASSWORD").expect("ADMIN_PASSWORD not set");

    let resp = client
        .post(format!("{base_url}/auth/login"))
        .form(&[("email", email.as_str()), ("password", password.as_str())])
        .send()
        .await
        .expect("Failed to sign in");

    // A successful sign-in redirects to /admin
    assert!(resp.status().is_redirection(), "sign-in did not redirect");
    let location = resp
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert_eq!(location, "/admin", "admin sign-in landed on {location}");
}
