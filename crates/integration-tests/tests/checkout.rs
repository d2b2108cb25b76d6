//! Integration tests for the checkout confirmation callback.
//!
//! Run with: `cargo test -p regpoint-integration-tests -- --ignored`

use regpoint_integration_tests::{base_url, client};
use reqwest::StatusCode;

#[tokio::test]
#[ignore = "Requires running web binary"]
async fn test_confirmation_with_empty_slot_shows_success() {
    let client = client();

    // Direct navigation with no staged draft: the success view renders and
    // no application is submitted
    let resp = client
        .get(format!("{}/checkout/confirm?reference=ABC123", base_url()))
        .send()
        .await
        .expect("Failed to load confirmation view");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Payment successful"));
    assert!(body.contains("ABC123"));
}

#[tokio::test]
#[ignore = "Requires running web binary"]
async fn test_confirmation_without_reference_redirects_home() {
    let client = client();

    let resp = client
        .get(format!("{}/checkout/confirm", base_url()))
        .send()
        .await
        .expect("Failed to load confirmation view");

    assert!(resp.status().is_redirection());
}

#[tokio::test]
#[ignore = "Requires running web binary"]
async fn test_checkout_rejects_incomplete_form() {
    let client = client();

    let resp = client
        .post(format!("{}/checkout", base_url()))
        .form(&[
            ("service_id", "company"),
            ("business_name_1", ""),
            ("applicant_name", "Ada Obi"),
            ("email", "ada@example.com"),
            ("phone", "2348012345678"),
            ("address", "4 Marina Rd, Lagos"),
        ])
        .send()
        .await
        .expect("Failed to submit checkout");

    // Validation blocks locally: back to the service page with an error flash
    assert!(resp.status().is_redirection());
    let location = resp
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(location.starts_with("/services/company"));
    assert!(location.contains("error="));
}

#[tokio::test]
#[ignore = "Requires running web binary"]
async fn test_cancel_returns_to_service_page() {
    let client = client();

    let resp = client
        .get(format!("{}/checkout/cancel?service=company", base_url()))
        .send()
        .await
        .expect("Failed to cancel checkout");

    assert!(resp.status().is_redirection());
    let location = resp
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(location.starts_with("/services/company"));
}
