//! Outcome of interpreting one scan.

use serde::Serialize;

use super::{Fee, Visit};

/// What a scan did to the scanned vehicle's session.
///
/// Repeated scans of the same vehicle strictly alternate
/// `CheckedIn, CheckedOut, CheckedIn, ...`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum ScanResult {
    /// No visit was open; a new one was opened.
    #[serde(rename = "check_in")]
    CheckedIn {
        /// The newly opened visit.
        visit: Visit,
    },
    /// The open visit was closed.
    #[serde(rename = "check_out")]
    CheckedOut {
        /// The visit in its closed state.
        visit: Visit,
        /// Whole minutes parked.
        duration_minutes: i64,
        /// Fee charged for the session.
        fee: Fee,
    },
}

impl ScanResult {
    /// Returns the visit opened or closed by the scan.
    #[must_use]
    pub const fn visit(&self) -> &Visit {
        match self {
            Self::CheckedIn { visit } | Self::CheckedOut { visit, .. } => visit,
        }
    }

    /// Returns `true` for a check-in.
    #[must_use]
    pub const fn is_check_in(&self) -> bool {
        matches!(self, Self::CheckedIn { .. })
    }

    /// Short discriminator used on the wire (`"check_in"` / `"check_out"`).
    #[must_use]
    pub const fn kind_str(&self) -> &'static str {
        match self {
            Self::CheckedIn { .. } => "check_in",
            Self::CheckedOut { .. } => "check_out",
        }
    }

    /// User-facing summary of the scan.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::CheckedIn { .. } => "checked in".to_string(),
            Self::CheckedOut { fee, .. } => format!("checked out, fee={fee}"),
        }
    }
}
