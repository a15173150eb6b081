// ── Source connectivity tracking ──
//
// One health record per polled source, owned exclusively by the monitor.
// `connected` transitions false only on a completed failed fetch and back
// to true only on the next completed success — it is never speculatively
// reset from cached data.

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum::Display;

/// The independently-polled backend feeds (plus the alert push stream).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SourceId {
    SystemStats,
    IdsStatus,
    FirewallStats,
    Rules,
    Events,
    ThreatLog,
    MlStatus,
    AlertStream,
}

impl SourceId {
    /// All sources, in a fixed order.
    pub const ALL: [Self; 8] = [
        Self::SystemStats,
        Self::IdsStatus,
        Self::FirewallStats,
        Self::Rules,
        Self::Events,
        Self::ThreatLog,
        Self::MlStatus,
        Self::AlertStream,
    ];

    pub(crate) fn index(self) -> usize {
        match self {
            Self::SystemStats => 0,
            Self::IdsStatus => 1,
            Self::FirewallStats => 2,
            Self::Rules => 3,
            Self::Events => 4,
            Self::ThreatLog => 5,
            Self::MlStatus => 6,
            Self::AlertStream => 7,
        }
    }
}

// `CoreError::SourceUnavailable` carries a field named `source`, which
// thiserror treats as the error cause and therefore requires to implement
// `std::error::Error`. `SourceId` already provides the required `Display`
// (via strum) and `Debug`, so the impl is an empty one.
impl std::error::Error for SourceId {}

/// Connectivity state of a single source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceHealth {
    pub connected: bool,
    pub last_success_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

impl SourceHealth {
    /// Record a completed successful fetch.
    pub(crate) fn record_success(&mut self, at: DateTime<Utc>) {
        self.connected = true;
        self.last_success_at = Some(at);
        self.last_error = None;
    }

    /// Record a completed failed fetch. The last success timestamp is
    /// kept so staleness stays observable.
    pub(crate) fn record_failure(&mut self, error: String) {
        self.connected = false;
        self.last_error = Some(error);
    }
}
