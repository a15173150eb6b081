// ── Runtime monitor configuration ──
//
// Describes where the backend lives and how often each source is polled.
// Built by the CLI (from netwarden-config) and handed in; core never
// reads config files itself.

use std::time::Duration;

use url::Url;

use crate::filter::TimeRange;
use crate::model::EventKind;

/// Per-source polling cadences. Intervals are configuration, not
/// structure: any source can run at any cadence without blocking the
/// others, and a zero duration disables that source's poll task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollIntervals {
    pub system: Duration,
    pub ids_status: Duration,
    pub firewall: Duration,
    pub rules: Duration,
    pub events: Duration,
    pub threat_log: Duration,
    pub ml_status: Duration,
}

impl Default for PollIntervals {
    fn default() -> Self {
        Self {
            system: Duration::from_secs(5),
            ids_status: Duration::from_secs(10),
            firewall: Duration::from_secs(10),
            rules: Duration::from_secs(30),
            events: Duration::from_secs(10),
            threat_log: Duration::from_secs(10),
            ml_status: Duration::from_secs(30),
        }
    }
}

impl PollIntervals {
    /// All sources disabled; polls then only happen via `refresh_all`.
    pub fn disabled() -> Self {
        Self {
            system: Duration::ZERO,
            ids_status: Duration::ZERO,
            firewall: Duration::ZERO,
            rules: Duration::ZERO,
            events: Duration::ZERO,
            threat_log: Duration::ZERO,
            ml_status: Duration::ZERO,
        }
    }
}

/// Server-side query defaults for the event feed poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQuery {
    pub event_type: Option<EventKind>,
    pub time_range: TimeRange,
}

impl Default for EventQuery {
    fn default() -> Self {
        Self {
            event_type: Some(EventKind::Alert),
            time_range: TimeRange::LastDay,
        }
    }
}

/// Configuration for a single monitor instance.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Backend base URL (e.g. `http://127.0.0.1:5050`).
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Accept self-signed certificates on TLS backends.
    pub accept_invalid_certs: bool,
    pub intervals: PollIntervals,
    pub event_query: EventQuery,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse("http://127.0.0.1:5050").expect("static URL"),
            timeout: Duration::from_secs(10),
            accept_invalid_certs: false,
            intervals: PollIntervals::default(),
            event_query: EventQuery::default(),
        }
    }
}
