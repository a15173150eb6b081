// ── Alert stream domain types ──
//
// Alerts arrive from an append-ordered push stream keyed by opaque ids.
// Severity on the wire is a string-or-number union; both forms resolve
// through one normalization path in `convert`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum::{Display, EnumString};

/// Alert category, case-normalized. Unknown or missing categories default
/// to `System`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AlertCategory {
    Authentication,
    Firewall,
    Network,
    #[default]
    System,
    Threat,
}

/// Alert severity band. Named wire values are matched case-insensitively;
/// numeric values band at ≥4 critical, ≥3 high, ≥2 medium, ≥1 low, else
/// info. Missing or unrecognized severities default to `Medium`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AlertSeverity {
    Critical,
    High,
    #[default]
    Medium,
    Warning,
    Low,
    Info,
}

/// One normalized alert from the log stream.
#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    /// Stream-supplied opaque id, or a synthetic v4 uuid when absent.
    pub id: String,
    /// `None` marks an unparseable or missing timestamp.
    pub timestamp: Option<DateTime<Utc>>,
    pub event: String,
    pub source: String,
    pub category: AlertCategory,
    pub severity: AlertSeverity,
    pub details: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!(
            "Firewall".parse::<AlertCategory>().unwrap(),
            AlertCategory::Firewall
        );
        assert_eq!(
            "THREAT".parse::<AlertCategory>().unwrap(),
            AlertCategory::Threat
        );
        assert!("bogus".parse::<AlertCategory>().is_err());
    }

    #[test]
    fn severity_displays_lowercase() {
        assert_eq!(AlertSeverity::Critical.to_string(), "critical");
        assert_eq!(AlertSeverity::Warning.to_string(), "warning");
    }
}
