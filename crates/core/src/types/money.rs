//! Naira amounts.
//!
//! Registry prices travel as display strings ("₦55,000", "60000"). Amounts
//! are whole naira; the payment provider takes kobo (minor unit, x100).

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Naira`] amount.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NairaParseError {
    /// The input contains no digits at all.
    #[error("amount contains no digits: {0:?}")]
    NoDigits(String),
    /// The digit string is too large to represent.
    #[error("amount out of range: {0:?}")]
    OutOfRange(String),
}

/// A whole-naira amount.
///
/// Parsing strips every non-digit character, so `"₦55,000"`, `"55,000"` and
/// `"55000"` all produce the same amount. Fractional kobo never appear in
/// price strings; the minor-unit conversion happens only at the payment
/// provider boundary via [`Naira::kobo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Naira(i64);

impl Naira {
    /// Largest representable amount (guards the kobo multiplication).
    pub const MAX: i64 = i64::MAX / 100;

    /// Create an amount from whole naira.
    #[must_use]
    pub const fn new(amount: i64) -> Self {
        Self(amount)
    }

    /// Parse an amount from a display price string by stripping every
    /// non-digit character.
    ///
    /// # Errors
    ///
    /// Returns an error if the input contains no digits or the resulting
    /// amount does not fit in range.
    pub fn parse_display(s: &str) -> Result<Self, NairaParseError> {
        let digits: String = s.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return Err(NairaParseError::NoDigits(s.to_owned()));
        }

        let amount: i64 = digits
            .parse()
            .map_err(|_| NairaParseError::OutOfRange(s.to_owned()))?;
        if amount > Self::MAX {
            return Err(NairaParseError::OutOfRange(s.to_owned()));
        }

        Ok(Self(amount))
    }

    /// Whole-naira value.
    #[must_use]
    pub const fn amount(&self) -> i64 {
        self.0
    }

    /// Minor-unit value for the payment provider (kobo, x100).
    #[must_use]
    pub const fn kobo(&self) -> i64 {
        self.0 * 100
    }

    /// Whether the amount is strictly positive.
    #[must_use]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for Naira {
    /// Formats with the naira sign and thousands separators, e.g. `₦55,000`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{sign}\u{20a6}{grouped}")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_display_with_symbol_and_commas() {
        assert_eq!(Naira::parse_display("\u{20a6}55,000").unwrap().amount(), 55_000);
    }

    #[test]
    fn test_parse_display_bare_digits() {
        assert_eq!(Naira::parse_display("60000").unwrap().amount(), 60_000);
    }

    #[test]
    fn test_parse_display_zero() {
        let zero = Naira::parse_display("\u{20a6}0").unwrap();
        assert_eq!(zero.amount(), 0);
        assert!(!zero.is_positive());
    }

    #[test]
    fn test_parse_display_no_digits() {
        assert!(matches!(
            Naira::parse_display("free"),
            Err(NairaParseError::NoDigits(_))
        ));
        assert!(matches!(
            Naira::parse_display(""),
            Err(NairaParseError::NoDigits(_))
        ));
    }

    #[test]
    fn test_parse_display_out_of_range() {
        let huge = "9".repeat(30);
        assert!(matches!(
            Naira::parse_display(&huge),
            Err(NairaParseError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_kobo_multiplier() {
        assert_eq!(Naira::new(55_000).kobo(), 5_500_000);
    }

    #[test]
    fn test_display_grouping() {
        assert_eq!(Naira::new(60_000).to_string(), "\u{20a6}60,000");
        assert_eq!(Naira::new(1_234_567).to_string(), "\u{20a6}1,234,567");
        assert_eq!(Naira::new(999).to_string(), "\u{20a6}999");
        assert_eq!(Naira::new(0).to_string(), "\u{20a6}0");
    }

    #[test]
    fn test_display_parse_roundtrip() {
        let price = Naira::new(55_000);
        assert_eq!(Naira::parse_display(&price.to_string()).unwrap(), price);
    }

    #[test]
    fn test_serde_transparent() {
        let price = Naira::new(55_000);
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "55000");
        let back: Naira = serde_json::from_str(&json).unwrap();
        assert_eq!(back, price);
    }
}
