// ── Wire-to-domain normalization ──
//
// Bridges raw `netwarden_api` payloads into canonical domain types. Each
// conversion normalizes casing, resolves the string/number severity union
// through a single path, parses timestamps leniently, and fills defaults
// for missing fields. Conversions are deterministic on repeated input;
// the only generated values are synthetic ids when a source supplies none.

use chrono::{DateTime, Utc};

use netwarden_api::models::{RawAlert, RawEvent, RawSeverity, RawTimestamp};

use crate::model::{Alert, AlertSeverity, EventAction, EventKind, EventSeverity, SecurityEvent};

// ── Helpers ──────────────────────────────────────────────────────────

/// Parse a timestamp string leniently: RFC 3339 first, then the IDS
/// engine's compact offset form (`2025-06-21T12:00:00.000000+0000`), then
/// a bare naive datetime treated as UTC. Unparseable input is `None`.
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    None
}

/// Epoch milliseconds to a UTC timestamp.
fn millis_to_datetime(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
}

/// Synthetic id for records the source delivered without one.
fn synthetic_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Resolve the severity union for the event stream: numbers clamp into
/// the 0–4 ordinal scale, numeric strings parse first, anything else
/// takes the feed default.
pub(crate) fn event_severity(raw: Option<&RawSeverity>) -> EventSeverity {
    match raw {
        Some(RawSeverity::Numeric(n)) => EventSeverity::new(*n as i64),
        Some(RawSeverity::Named(s)) => s
            .trim()
            .parse::<i64>()
            .map(EventSeverity::new)
            .unwrap_or_default(),
        None => EventSeverity::default(),
    }
}

/// Resolve the severity union for the alert stream: named values are
/// lower-cased and matched, numeric values band at ≥4 critical, ≥3 high,
/// ≥2 medium, ≥1 low, else info. Unrecognized input takes the default.
pub(crate) fn alert_severity(raw: Option<&RawSeverity>) -> AlertSeverity {
    match raw {
        Some(RawSeverity::Named(s)) => s.trim().parse().unwrap_or_default(),
        Some(RawSeverity::Numeric(n)) => {
            if *n >= 4.0 {
                AlertSeverity::Critical
            } else if *n >= 3.0 {
                AlertSeverity::High
            } else if *n >= 2.0 {
                AlertSeverity::Medium
            } else if *n >= 1.0 {
                AlertSeverity::Low
            } else {
                AlertSeverity::Info
            }
        }
        None => AlertSeverity::default(),
    }
}

// ── Event ────────────────────────────────────────────────────────────

impl From<RawEvent> for SecurityEvent {
    fn from(raw: RawEvent) -> Self {
        let kind = raw
            .event_type
            .as_deref()
            .map(str::to_ascii_lowercase)
            .and_then(|t| t.parse::<EventKind>().ok())
            .unwrap_or(EventKind::Other(String::from("unknown")));

        SecurityEvent {
            id: raw.id.unwrap_or_else(synthetic_id),
            timestamp: raw.timestamp.as_deref().and_then(parse_timestamp),
            kind,
            severity: event_severity(raw.severity.as_ref()),
            signature: raw.signature,
            src_ip: raw.src_ip,
            dest_ip: raw.dest_ip,
            protocol: raw.proto,
            action: EventAction::parse(raw.action.as_deref()),
        }
    }
}

// ── Alert ────────────────────────────────────────────────────────────

impl From<RawAlert> for Alert {
    fn from(raw: RawAlert) -> Self {
        let timestamp = match raw.timestamp {
            Some(RawTimestamp::Millis(ms)) => millis_to_datetime(ms),
            Some(RawTimestamp::Text(ref s)) => parse_timestamp(s),
            None => None,
        };

        let category = raw
            .category
            .as_deref()
            .and_then(|c| c.trim().parse().ok())
            .unwrap_or_default();

        Alert {
            id: raw.id.unwrap_or_else(synthetic_id),
            timestamp,
            event: raw
                .title
                .or(raw.event)
                .unwrap_or_else(|| String::from("Security Alert")),
            source: raw.source.unwrap_or_else(|| String::from("Unknown")),
            category,
            severity: alert_severity(raw.severity.as_ref()),
            details: raw
                .description
                .or(raw.details)
                .unwrap_or_else(|| String::from("No details available")),
        }
    }
}

/// Normalize a full alert-stream push. The stream is append-ordered
/// (oldest first); the external contract is newest-first, so the set is
/// reversed here. Each push replaces the previous set wholesale.
pub fn normalize_alert_push(raw: Vec<RawAlert>) -> Vec<Alert> {
    raw.into_iter().rev().map(Alert::from).collect()
}
