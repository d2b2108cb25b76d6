//! Checkout route handlers.
//!
//! `POST /checkout` enters `AwaitingPayment`: the draft is staged in the
//! pending slot, a countdown deadline is stamped into the session, and the
//! browser is redirected to the payment provider's authorization URL. The
//! provider calls back on `/checkout/confirm` (success, with a reference)
//! or the user lands on `/checkout/cancel` (widget closed).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;

use regpoint_core::Email;

use crate::catalog;
use crate::checkout::{self, pending};
use crate::checkout::pending::{DraftApplication, FlushOutcome};
use crate::models::session_keys;
use crate::registry::{NewPayment, NewTransaction};
use crate::state::AppState;
use crate::sync::Collection;

use super::redirect_with;

/// Order form fields.
///
/// The fixed set every application carries: proposed names, director
/// identity fields, and address. Each service's schema renders these same
/// fields; submission is typed rather than read back out of the page.
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    pub service_id: String,
    pub business_name_1: String,
    #[serde(default)]
    pub business_name_2: Option<String>,
    pub applicant_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

/// Confirmation callback query parameters.
#[derive(Debug, Deserialize, Default)]
pub struct ConfirmQuery {
    pub reference: Option<String>,
}

/// Cancel callback query parameters.
#[derive(Debug, Deserialize, Default)]
pub struct CancelQuery {
    pub service: Option<String>,
}

/// Payment confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/confirm.html")]
pub struct ConfirmTemplate {
    pub reference: String,
    pub service_title: Option<String>,
    pub amount: Option<String>,
    pub receipt_link: Option<String>,
    pub notices: Vec<String>,
}

/// Validate the order form, returning a trimmed copy.
fn validate(form: &CheckoutForm) -> std::result::Result<(Email, Vec<String>), String> {
    let email = Email::parse(form.email.trim()).map_err(|e| e.to_string())?;

    let mut business_names = vec![form.business_name_1.trim().to_string()];
    if let Some(second) = form.business_name_2.as_deref() {
        let second = second.trim();
        if !second.is_empty() {
            business_names.push(second.to_string());
        }
    }

    let required = [
        ("proposed business name", form.business_name_1.trim()),
        ("director's full name", form.applicant_name.trim()),
        ("phone number", form.phone.trim()),
        ("business address", form.address.trim()),
    ];
    for (label, value) in required {
        if value.is_empty() {
            return Err(format!("Please provide the {label}"));
        }
    }

    Ok((email, business_names))
}

/// Enter `AwaitingPayment`.
///
/// Validation failures block locally, before any network call. Once the
/// draft is staged and payment initialization succeeds, the browser is
/// redirected to the provider; the draft waits in the slot for the
/// confirmation callback.
#[instrument(skip_all)]
pub async fn start(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CheckoutForm>,
) -> Response {
    let service_path = format!("/services/{}", form.service_id);

    // ValidationFailure: blocked before any network call
    let (email, business_names) = match validate(&form) {
        Ok(ok) => ok,
        Err(message) => return redirect_with(&service_path, "error", &message).into_response(),
    };

    // Prices are authoritative on the server; refresh before deriving the amount
    state.sync().resync(Collection::Services, None).await;
    let services = catalog::merge_pricing(&state.sync().services().await);
    let Some(service) = services.into_iter().find(|s| s.id == form.service_id) else {
        return redirect_with("/", "error", "Select a service before checking out").into_response();
    };

    let amount = match checkout::derive_amount(&service.price.to_string()) {
        Ok(amount) => amount,
        Err(e) => return redirect_with(&service_path, "error", &e.to_string()).into_response(),
    };

    let draft = DraftApplication {
        reference: Uuid::new_v4(),
        service_id: service.id.clone(),
        service_title: service.title.clone(),
        amount,
        business_names,
        applicant_name: form.applicant_name.trim().to_string(),
        email: email.clone(),
        phone: form.phone.trim().to_string(),
        address: form.address.trim().to_string(),
        created_at: Utc::now(),
    };

    // At-most-one: staging overwrites any abandoned draft
    if let Err(e) = pending::stage(&session, &draft).await {
        tracing::error!(error = %e, "Failed to stage draft application");
        return redirect_with(&service_path, "error", "Could not start checkout, please try again")
            .into_response();
    }

    // Countdown is a UI affordance only; elapsing enforces nothing
    let deadline = checkout::payment_deadline(Utc::now());
    if let Err(e) = session
        .insert(session_keys::CHECKOUT_DEADLINE, deadline)
        .await
    {
        tracing::warn!(error = %e, "Failed to store checkout deadline");
    }

    let payment = NewPayment {
        key: state.config().payment_public_key.clone(),
        email: email.into(),
        amount: amount.kobo(),
        reference: draft.reference.to_string(),
        callback_url: format!("{}/checkout/confirm", state.config().base_url),
    };
    match state.registry().initialize_payment(&payment).await {
        Ok(init) => Redirect::to(&init.authorization_url).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Payment initialization failed");
            redirect_with(
                &service_path,
                "error",
                "Could not reach the payment provider, please try again",
            )
            .into_response()
        }
    }
}

/// Payment confirmation callback (`Confirmed` transition).
///
/// Flushes the pending slot (a no-op when empty), writes the transaction
/// audit record, and renders the success view with the receipt hand-off
/// link. Registry failures here are surfaced but never roll back the
/// payment: the provider has already captured it.
#[instrument(skip_all)]
pub async fn confirm(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<ConfirmQuery>,
) -> Response {
    let Some(reference) = params.reference.filter(|r| !r.is_empty()) else {
        return Redirect::to("/").into_response();
    };

    let _ = session
        .remove::<DateTime<Utc>>(session_keys::CHECKOUT_DEADLINE)
        .await;

    let mut notices = Vec::new();
    let outcome = pending::flush(&session, state.registry(), &reference).await;

    let draft = match outcome {
        FlushOutcome::Submitted(draft) => Some(draft),
        FlushOutcome::Deferred(draft) => {
            notices.push(
                "Your payment is confirmed. We are finalizing your registration record and will \
                 follow up by email."
                    .to_string(),
            );
            Some(draft)
        }
        FlushOutcome::Empty => None,
    };

    let (service_title, amount, receipt_link) = match &draft {
        Some(draft) => {
            let transaction = NewTransaction {
                client: draft.email.to_string(),
                service: draft.service_title.clone(),
                amount: draft.amount,
                status: "success".to_string(),
            };
            if let Err(e) = state.registry().create_transaction(&transaction).await {
                tracing::error!(error = %e, reference, "Failed to record transaction");
                notices.push(
                    "We could not record your receipt automatically; keep your reference handy."
                        .to_string(),
                );
            }

            let receipt_link = state.config().contact_phone.as_deref().map(|phone| {
                let message =
                    checkout::receipt_message(&draft.service_title, draft.amount, &reference);
                checkout::contact_link(phone, &message)
            });

            (
                Some(draft.service_title.clone()),
                Some(draft.amount.to_string()),
                receipt_link,
            )
        }
        None => (None, None, None),
    };

    ConfirmTemplate {
        reference,
        service_title,
        amount,
        receipt_link,
        notices,
    }
    .into_response()
}

/// Payment cancelled (`Cancelled` transition).
///
/// Returns to selection and releases the in-flight state; the staged draft
/// simply expires with the slot.
#[instrument(skip_all)]
pub async fn cancel(session: Session, Query(params): Query<CancelQuery>) -> Response {
    let _ = session
        .remove::<DateTime<Utc>>(session_keys::CHECKOUT_DEADLINE)
        .await;

    let target = match params.service.filter(|s| !s.is_empty()) {
        Some(service) => format!("/services/{service}"),
        None => "/".to_string(),
    };
    redirect_with(&target, "error", "Payment was cancelled").into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form() -> CheckoutForm {
        CheckoutForm {
            service_id: "company".to_string(),
            business_name_1: "Acme Ventures".to_string(),
            business_name_2: Some("Acme Global".to_string()),
            applicant_name: "Ada Obi".to_string(),
            email: "ada@example.com".to_string(),
            phone: "2348012345678".to_string(),
            address: "4 Marina Rd, Lagos".to_string(),
        }
    }

    #[test]
    fn test_validate_accepts_complete_form() {
        let (email, names) = validate(&form()).unwrap();
        assert_eq!(email.as_str(), "ada@example.com");
        assert_eq!(names, vec!["Acme Ventures", "Acme Global"]);
    }

    #[test]
    fn test_validate_drops_blank_second_name() {
        let mut f = form();
        f.business_name_2 = Some("   ".to_string());
        let (_, names) = validate(&f).unwrap();
        assert_eq!(names, vec!["Acme Ventures"]);
    }

    #[test]
    fn test_validate_rejects_bad_email() {
        let mut f = form();
        f.email = "not-an-email".to_string();
        assert!(validate(&f).is_err());
    }

    #[test]
    fn test_validate_rejects_missing_required_field() {
        let mut f = form();
        f.address = "  ".to_string();
        let err = validate(&f).unwrap_err();
        assert!(err.contains("business address"));
    }
}
