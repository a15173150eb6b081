// ── IDS event domain types ──

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum::{Display, EnumString};

/// Event type discriminator from the IDS feed.
#[derive(Debug, Clone, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EventKind {
    Alert,
    Dns,
    Http,
    Tls,
    Flow,
    Fileinfo,
    /// Anything the feed emits outside the known set, lower-cased.
    #[strum(default, to_string = "{0}")]
    Other(String),
}

impl Serialize for EventKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

/// What the IDS did about an event. Absent or unrecognized actions default
/// to `Detected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EventAction {
    Blocked,
    Allowed,
    #[default]
    Detected,
    Dropped,
    Rejected,
}

impl EventAction {
    /// Parse a wire action; anything unrecognized degrades to `Detected`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::to_ascii_lowercase).as_deref() {
            Some("blocked") => Self::Blocked,
            Some("allowed") => Self::Allowed,
            Some("dropped") => Self::Dropped,
            Some("rejected") => Self::Rejected,
            _ => Self::Detected,
        }
    }
}

/// Categorical bucket a numeric severity maps into at presentation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SeverityBand {
    Low,
    Medium,
    High,
    Critical,
}

/// IDS event severity on the 0–4 ordinal scale. Construction clamps into
/// the defined set, so a band is always derivable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct EventSeverity(u8);

impl EventSeverity {
    pub const MAX: u8 = 4;

    /// Clamp an arbitrary numeric severity into 0..=4. Out-of-range values
    /// round to the nearest defined ordinal rather than rejecting the event.
    pub fn new(raw: i64) -> Self {
        Self(raw.clamp(0, i64::from(Self::MAX)) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Presentation-time band: 4 is critical, 3 high, 2 medium, 0/1 low.
    pub fn band(self) -> SeverityBand {
        match self.0 {
            4 => SeverityBand::Critical,
            3 => SeverityBand::High,
            2 => SeverityBand::Medium,
            _ => SeverityBand::Low,
        }
    }
}

impl Default for EventSeverity {
    /// The feed's default when severity is absent or malformed.
    fn default() -> Self {
        Self(2)
    }
}

/// Rendered in place of a timestamp that failed to parse. Formatting never
/// raises on bad input.
pub const INVALID_DATE: &str = "Invalid date";

/// One normalized IDS event.
#[derive(Debug, Clone, Serialize)]
pub struct SecurityEvent {
    /// Source-supplied id, or a synthetic v4 uuid when absent.
    pub id: String,
    /// `None` marks an unparseable or missing timestamp.
    pub timestamp: Option<DateTime<Utc>>,
    pub kind: EventKind,
    pub severity: EventSeverity,
    pub signature: Option<String>,
    pub src_ip: Option<String>,
    pub dest_ip: Option<String>,
    pub protocol: Option<String>,
    pub action: EventAction,
}

impl SecurityEvent {
    /// Render the timestamp, falling back to the fixed invalid-date
    /// literal instead of raising.
    pub fn format_timestamp(&self) -> String {
        match self.timestamp {
            Some(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => INVALID_DATE.to_owned(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn severity_clamps_into_ordinal_set() {
        assert_eq!(EventSeverity::new(4).value(), 4);
        assert_eq!(EventSeverity::new(9).value(), 4);
        assert_eq!(EventSeverity::new(-3).value(), 0);
    }

    #[test]
    fn severity_bands() {
        assert_eq!(EventSeverity::new(4).band(), SeverityBand::Critical);
        assert_eq!(EventSeverity::new(3).band(), SeverityBand::High);
        assert_eq!(EventSeverity::new(2).band(), SeverityBand::Medium);
        assert_eq!(EventSeverity::new(1).band(), SeverityBand::Low);
        assert_eq!(EventSeverity::new(0).band(), SeverityBand::Low);
    }

    #[test]
    fn banding_is_idempotent() {
        // Re-normalizing an already-clamped severity changes nothing.
        for raw in -2..8 {
            let once = EventSeverity::new(raw);
            let twice = EventSeverity::new(i64::from(once.value()));
            assert_eq!(once, twice);
            assert_eq!(once.band(), twice.band());
        }
    }

    #[test]
    fn kind_parses_known_and_preserves_unknown() {
        assert_eq!("alert".parse::<EventKind>().unwrap(), EventKind::Alert);
        assert_eq!("TLS".parse::<EventKind>().unwrap(), EventKind::Tls);
        assert_eq!(
            "netflow".parse::<EventKind>().unwrap(),
            EventKind::Other("netflow".into())
        );
    }

    #[test]
    fn action_defaults_to_detected() {
        assert_eq!(EventAction::parse(Some("blocked")), EventAction::Blocked);
        assert_eq!(EventAction::parse(Some("whatever")), EventAction::Detected);
        assert_eq!(EventAction::parse(None), EventAction::Detected);
    }

    #[test]
    fn invalid_timestamp_renders_fixed_literal() {
        let event = SecurityEvent {
            id: "e1".into(),
            timestamp: None,
            kind: EventKind::Alert,
            severity: EventSeverity::default(),
            signature: None,
            src_ip: None,
            dest_ip: None,
            protocol: None,
            action: EventAction::Detected,
        };
        assert_eq!(event.format_timestamp(), INVALID_DATE);
    }
}
