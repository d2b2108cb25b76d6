//! Pending-submission cache.
//!
//! At most one draft application is staged in the durable session slot while
//! payment is in flight. The slot is read-and-cleared exactly once, when the
//! payment confirmation arrives; the clear happens only after the registry
//! accepts the submission, so a failed submit leaves the draft in place for
//! an out-of-band retry. An application is never submitted without a payment
//! reference, and an abandoned draft simply expires with the slot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use uuid::Uuid;

use regpoint_core::{ApplicationStatus, Email, Naira};

use crate::models::session_keys;
use crate::registry::{ApplicationSubmission, DirectorDetails, RegistryError};

/// A draft application staged before payment completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftApplication {
    /// Client-generated reference, also handed to the payment provider.
    pub reference: Uuid,
    pub service_id: String,
    pub service_title: String,
    pub amount: Naira,
    pub business_names: Vec<String>,
    pub applicant_name: String,
    pub email: Email,
    pub phone: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

impl DraftApplication {
    /// Build the registry submission for this draft.
    ///
    /// The payment reference arrives with the confirmation callback; the
    /// submission goes out as `Processing`.
    #[must_use]
    pub fn into_submission(self, payment_ref: &str) -> ApplicationSubmission {
        ApplicationSubmission {
            reference: self.reference.to_string(),
            service_id: self.service_id,
            business_names: self.business_names,
            director: DirectorDetails {
                full_name: self.applicant_name,
                email: self.email.into(),
                phone: self.phone,
            },
            address: self.address,
            status: ApplicationStatus::Processing,
            payment_ref: payment_ref.to_string(),
            amount: self.amount,
        }
    }
}

/// Submission target for the flush; implemented by the registry client.
#[allow(async_fn_in_trait)]
pub trait ApplicationSink {
    async fn submit_application(
        &self,
        submission: &ApplicationSubmission,
    ) -> Result<(), RegistryError>;
}

impl ApplicationSink for crate::registry::RegistryClient {
    async fn submit_application(
        &self,
        submission: &ApplicationSubmission,
    ) -> Result<(), RegistryError> {
        Self::submit_application(self, submission).await
    }
}

/// Result of a read-and-clear pass over the slot.
#[derive(Debug)]
pub enum FlushOutcome {
    /// The draft was submitted and the slot cleared.
    Submitted(DraftApplication),
    /// The slot was empty; nothing was sent.
    Empty,
    /// The submit failed; the slot is left intact for a later retry.
    Deferred(DraftApplication),
}

/// Stage a draft in the slot, overwriting any prior draft.
///
/// A second checkout attempt silently discards an earlier abandoned one.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn stage(
    session: &Session,
    draft: &DraftApplication,
) -> Result<(), tower_sessions::session::Error> {
    session
        .insert(session_keys::PENDING_APPLICATION, draft)
        .await
}

/// Read the slot without clearing it.
pub async fn peek(session: &Session) -> Option<DraftApplication> {
    session
        .get(session_keys::PENDING_APPLICATION)
        .await
        .ok()
        .flatten()
}

/// Read-and-clear the slot against a payment confirmation.
///
/// Empty slot (direct navigation, already flushed): no-op, no network call.
/// Otherwise the draft is submitted with the payment reference attached and
/// the slot cleared only once the registry accepts it. A failed submit is
/// logged and deferred; payment success is never rolled back.
pub async fn flush<S: ApplicationSink>(
    session: &Session,
    sink: &S,
    payment_ref: &str,
) -> FlushOutcome {
    let Some(draft) = peek(session).await else {
        return FlushOutcome::Empty;
    };

    let submission = draft.clone().into_submission(payment_ref);
    match sink.submit_application(&submission).await {
        Ok(()) => {
            if let Err(e) = session
                .remove::<DraftApplication>(session_keys::PENDING_APPLICATION)
                .await
            {
                tracing::error!(
                    reference = %draft.reference,
                    error = %e,
                    "Submitted application but failed to clear the pending slot"
                );
            }
            FlushOutcome::Submitted(draft)
        }
        Err(e) => {
            tracing::error!(
                reference = %draft.reference,
                payment_ref,
                error = %e,
                "Application submit failed after successful payment; draft kept for retry"
            );
            FlushOutcome::Deferred(draft)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use tower_sessions::MemoryStore;

    use super::*;

    #[derive(Default)]
    struct CountingSink {
        calls: AtomicUsize,
        fail: AtomicBool,
    }

    impl ApplicationSink for CountingSink {
        async fn submit_application(
            &self,
            _submission: &ApplicationSubmission,
        ) -> Result<(), RegistryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(RegistryError::Api {
                    status: 500,
                    message: "boom".to_string(),
                });
            }
            Ok(())
        }
    }

    fn test_session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    fn draft() -> DraftApplication {
        DraftApplication {
            reference: Uuid::new_v4(),
            service_id: "company".to_string(),
            service_title: "Limited Liability Company".to_string(),
            amount: Naira::new(55_000),
            business_names: vec!["Acme Ventures".to_string()],
            applicant_name: "Ada Obi".to_string(),
            email: Email::parse("ada@example.com").unwrap(),
            phone: "2348012345678".to_string(),
            address: "4 Marina Rd, Lagos".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_into_submission_attaches_reference_and_status() {
        let d = draft();
        let submission = d.clone().into_submission("PSK_abc");
        assert_eq!(submission.payment_ref, "PSK_abc");
        assert_eq!(submission.status, ApplicationStatus::Processing);
        assert_eq!(submission.reference, d.reference.to_string());
        assert_eq!(submission.director.email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_stage_overwrites_prior_draft() {
        let session = test_session();
        let first = draft();
        let second = draft();

        stage(&session, &first).await.unwrap();
        stage(&session, &second).await.unwrap();

        let staged = peek(&session).await.unwrap();
        assert_eq!(staged.reference, second.reference);
    }

    #[tokio::test]
    async fn test_flush_submits_and_clears() {
        let session = test_session();
        let sink = CountingSink::default();
        stage(&session, &draft()).await.unwrap();

        let outcome = flush(&session, &sink, "PSK_1").await;

        assert!(matches!(outcome, FlushOutcome::Submitted(_)));
        assert_eq!(sink.calls.load(Ordering::SeqCst), 1);
        assert!(peek(&session).await.is_none());
    }

    #[tokio::test]
    async fn test_second_flush_is_a_no_op_with_no_network_call() {
        let session = test_session();
        let sink = CountingSink::default();
        stage(&session, &draft()).await.unwrap();

        flush(&session, &sink, "PSK_1").await;
        let outcome = flush(&session, &sink, "PSK_1").await;

        assert!(matches!(outcome, FlushOutcome::Empty));
        assert_eq!(sink.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_flush_empty_slot_makes_no_network_call() {
        let session = test_session();
        let sink = CountingSink::default();

        let outcome = flush(&session, &sink, "ABC123").await;

        assert!(matches!(outcome, FlushOutcome::Empty));
        assert_eq!(sink.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_submit_leaves_slot_intact() {
        let session = test_session();
        let sink = CountingSink::default();
        sink.fail.store(true, Ordering::SeqCst);
        stage(&session, &draft()).await.unwrap();

        let outcome = flush(&session, &sink, "PSK_1").await;

        assert!(matches!(outcome, FlushOutcome::Deferred(_)));
        assert!(peek(&session).await.is_some());

        // Retry succeeds once the registry recovers.
        sink.fail.store(false, Ordering::SeqCst);
        let outcome = flush(&session, &sink, "PSK_1").await;
        assert!(matches!(outcome, FlushOutcome::Submitted(_)));
        assert!(peek(&session).await.is_none());
    }
}
