//! Validated email addresses.
//!
//! Emails show up in three places: the applicant contact on an application,
//! the configured admin identity, and identities in auth-provider payloads.
//! Parsing trims and lowercases at the boundary, so the admin-identity check
//! and tracker lookups are plain equality with no case juggling at call
//! sites. Deserialization goes through the same validation, so a malformed
//! address in a provider payload is rejected rather than carried along.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Upper bound on address length (RFC 5321 path limit).
const MAX_LEN: usize = 254;

/// Rejection from [`Email::parse`].
///
/// Every caller surfaces the message verbatim (form flash text, config
/// diagnostics, provider-payload errors) and none branches on a cause, so
/// this is one opaque rejection carrying the offending input rather than a
/// taxonomy of failure modes.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{0:?} is not a valid email address")]
pub struct InvalidEmail(String);

/// An email address, stored trimmed and lowercased.
///
/// The shape check is deliberately shallow (one `@`, non-empty halves, no
/// whitespace); the auth provider and the registry are the authorities on
/// whether an address actually exists.
///
/// ```
/// use regpoint_core::Email;
///
/// let admin = Email::parse("admin@regpoint.ng").unwrap();
/// let typed = Email::parse("  Admin@RegPoint.NG ").unwrap();
/// assert_eq!(admin, typed);
/// assert!(Email::parse("not-an-email").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Parse and normalize an email address.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidEmail`] if the trimmed input is empty, over-long,
    /// contains whitespace, or does not split into `name@domain`.
    pub fn parse(input: &str) -> Result<Self, InvalidEmail> {
        let value = input.trim();

        let shape_ok = value.split_once('@').is_some_and(|(local, domain)| {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@')
        });
        if value.is_empty()
            || value.len() > MAX_LEN
            || value.chars().any(char::is_whitespace)
            || !shape_ok
        {
            return Err(InvalidEmail(value.to_owned()));
        }

        Ok(Self(value.to_lowercase()))
    }

    /// The normalized address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = InvalidEmail;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_case_and_whitespace() {
        let email = Email::parse("  Ada.Obi@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "ada.obi@example.com");
    }

    #[test]
    fn test_admin_identity_comparison_is_plain_equality() {
        let configured = Email::parse("admin@regpoint.ng").unwrap();
        let signed_in = Email::parse("ADMIN@REGPOINT.NG").unwrap();
        assert_eq!(configured, signed_in);
    }

    #[test]
    fn test_parse_rejects_blank_and_over_long_input() {
        assert!(Email::parse("").is_err());
        assert!(Email::parse("   ").is_err());

        let over_long = "director".repeat(40) + "@regpoint.ng";
        assert!(Email::parse(&over_long).is_err());
    }

    #[test]
    fn test_parse_rejects_malformed_shapes() {
        for input in ["no-at-symbol", "@regpoint.ng", "ada@", "ada@reg@point.ng", "ada obi@x.com"] {
            assert!(Email::parse(input).is_err(), "{input}");
        }
    }

    #[test]
    fn test_rejection_message_names_the_input() {
        let err = Email::parse("not-an-email").unwrap_err();
        assert!(err.to_string().contains("not-an-email"));
    }

    #[test]
    fn test_deserialization_validates_and_normalizes() {
        let email: Email = serde_json::from_str("\"Ada@Example.com\"").unwrap();
        assert_eq!(email.as_str(), "ada@example.com");

        let bad: Result<Email, _> = serde_json::from_str("\"not-an-email\"");
        assert!(bad.is_err());
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let email = Email::parse("ada@example.com").unwrap();
        assert_eq!(serde_json::to_string(&email).unwrap(), "\"ada@example.com\"");
    }

    #[test]
    fn test_into_string_yields_normalized_form() {
        let email = Email::parse("Ada@Example.com").unwrap();
        assert_eq!(String::from(email), "ada@example.com");
    }
}
