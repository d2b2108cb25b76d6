//! Checkout and payment hand-off.
//!
//! The flow runs `Selecting -> AwaitingPayment -> Confirmed | Cancelled`.
//! Entering `AwaitingPayment` stages the draft in the pending slot, stamps a
//! countdown deadline into the session, and redirects to the payment
//! provider's authorization URL. The provider redirects back with a
//! reference, which drives the confirmed transition.

pub mod pending;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use regpoint_core::{Naira, NairaParseError};

/// Countdown shown while payment is awaited. Display only: elapsing does
/// not cancel or invalidate the transaction.
pub const COUNTDOWN_MINUTES: i64 = 15;

/// Phases of a checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutPhase {
    Selecting,
    AwaitingPayment,
    Confirmed,
    Cancelled,
}

impl CheckoutPhase {
    /// Whether a transition between two phases is part of the flow.
    ///
    /// Cancellation returns the user to selection; confirmation is terminal.
    #[must_use]
    pub const fn can_transition(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Selecting, Self::AwaitingPayment)
                | (Self::AwaitingPayment, Self::Confirmed | Self::Cancelled)
                | (Self::Cancelled, Self::Selecting)
        )
    }
}

/// Errors that block entry to `AwaitingPayment`.
///
/// All of these are validation failures: they surface locally, before any
/// network call is made.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// No service was selected.
    #[error("Select a service before checking out")]
    NoService,

    /// The price string could not be turned into an amount.
    #[error("This service has no valid price; please contact support")]
    InvalidAmount(#[from] NairaParseError),

    /// The derived amount is not positive.
    #[error("This service has no valid price; please contact support")]
    NotPositive,
}

/// Derive the payable amount from a display price string.
///
/// Non-numeric characters are stripped (`"₦55,000"` becomes 55000 naira);
/// the result must be strictly positive or the checkout aborts before the
/// payment widget ever opens. The kobo multiplier is applied later, at the
/// provider boundary.
///
/// # Errors
///
/// Returns a [`CheckoutError`] if the string has no digits or the amount is
/// not positive.
pub fn derive_amount(price: &str) -> Result<Naira, CheckoutError> {
    let amount = Naira::parse_display(price)?;
    if !amount.is_positive() {
        return Err(CheckoutError::NotPositive);
    }
    Ok(amount)
}

/// Deadline for the payment countdown, starting now.
#[must_use]
pub fn payment_deadline(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::minutes(COUNTDOWN_MINUTES)
}

/// Receipt message for the external contact hand-off after confirmation.
#[must_use]
pub fn receipt_message(service_title: &str, amount: Naira, reference: &str) -> String {
    format!(
        "Hello RegPoint, I just paid {amount} for {service_title}. My payment reference is {reference}."
    )
}

/// Pre-filled external contact link for the receipt message.
#[must_use]
pub fn contact_link(phone: &str, message: &str) -> String {
    format!("https://wa.me/{phone}?text={}", urlencoding::encode(message))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_amount_from_display_price() {
        assert_eq!(derive_amount("\u{20a6}55,000").unwrap(), Naira::new(55_000));
        assert_eq!(derive_amount("60000").unwrap(), Naira::new(60_000));
    }

    #[test]
    fn test_derive_amount_rejects_zero() {
        assert!(matches!(
            derive_amount("\u{20a6}0"),
            Err(CheckoutError::NotPositive)
        ));
    }

    #[test]
    fn test_derive_amount_rejects_unparsable() {
        assert!(matches!(
            derive_amount("free"),
            Err(CheckoutError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_kobo_applied_at_provider_boundary() {
        let amount = derive_amount("\u{20a6}55,000").unwrap();
        assert_eq!(amount.kobo(), 5_500_000);
    }

    #[test]
    fn test_phase_transitions() {
        use CheckoutPhase::{AwaitingPayment, Cancelled, Confirmed, Selecting};

        assert!(Selecting.can_transition(AwaitingPayment));
        assert!(AwaitingPayment.can_transition(Confirmed));
        assert!(AwaitingPayment.can_transition(Cancelled));
        assert!(Cancelled.can_transition(Selecting));

        // No skipping straight to confirmation, no reopening a confirmed flow.
        assert!(!Selecting.can_transition(Confirmed));
        assert!(!Confirmed.can_transition(AwaitingPayment));
        assert!(!Confirmed.can_transition(Selecting));
    }

    #[test]
    fn test_payment_deadline_is_fifteen_minutes_out() {
        let now = Utc::now();
        assert_eq!(payment_deadline(now) - now, Duration::minutes(15));
    }

    #[test]
    fn test_contact_link_encodes_message() {
        let message = receipt_message("Limited Liability Company", Naira::new(55_000), "PSK_1");
        let link = contact_link("2348000000000", &message);
        assert!(link.starts_with("https://wa.me/2348000000000?text="));
        assert!(!link.contains(' '));
        assert!(link.contains("PSK_1"));
    }
}
