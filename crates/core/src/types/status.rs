//! Status enums for various entities.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a registration application.
///
/// Created as `Pending` on the client, submitted as `Processing` once
/// payment confirms, and advanced to `Completed` by an admin action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Processing,
    Completed,
}

impl ApplicationStatus {
    /// Wire representation, matching the registry's status strings.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
        }
    }

    /// Parse from the registry's status strings.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "processing" => Some(Self::Processing),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    /// The next status an admin can advance to, if any.
    #[must_use]
    pub const fn next(&self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Processing),
            Self::Processing => Some(Self::Completed),
            Self::Completed => None,
        }
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_roundtrip() {
        for status in [
            ApplicationStatus::Pending,
            ApplicationStatus::Processing,
            ApplicationStatus::Completed,
        ] {
            assert_eq!(ApplicationStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ApplicationStatus::parse("unknown"), None);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&ApplicationStatus::Processing).unwrap();
        assert_eq!(json, "\"processing\"");
        let back: ApplicationStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(back, ApplicationStatus::Completed);
    }

    #[test]
    fn test_next_advances_in_order() {
        assert_eq!(
            ApplicationStatus::Pending.next(),
            Some(ApplicationStatus::Processing)
        );
        assert_eq!(
            ApplicationStatus::Processing.next(),
            Some(ApplicationStatus::Completed)
        );
        assert_eq!(ApplicationStatus::Completed.next(), None);
    }
}
