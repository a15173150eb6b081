// ── Service status domain types ──
//
// System resource metrics, the parsed IDS status blob, the firewall
// overview, and detection-model metrics.

use serde::Serialize;
use strum::Display;

use netwarden_api::models::{FirewallSnapshotResponse, MlStatusResponse, SystemStatsResponse};

// ── System ───────────────────────────────────────────────────────────

/// Coarse host health derived from CPU and memory utilization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
pub enum SystemHealth {
    Healthy,
    Moderate,
    Stressed,
}

/// Host resource metrics from the system-stats source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemSnapshot {
    pub cpu: f64,
    pub memory_percent: f64,
    pub memory_used_mb: f64,
    pub memory_total_mb: f64,
    /// Seconds since boot.
    pub uptime_secs: u64,
    pub platform: String,
    pub processes: u64,
}

impl SystemSnapshot {
    /// Health banding: either metric above 85% is stressed, above 70%
    /// moderate, otherwise healthy.
    pub fn health(&self) -> SystemHealth {
        if self.cpu > 85.0 || self.memory_percent > 85.0 {
            SystemHealth::Stressed
        } else if self.cpu > 70.0 || self.memory_percent > 70.0 {
            SystemHealth::Moderate
        } else {
            SystemHealth::Healthy
        }
    }

    /// Uptime as `"{d}d {h}h"`.
    pub fn format_uptime(&self) -> String {
        let days = self.uptime_secs / 86_400;
        let hours = (self.uptime_secs % 86_400) / 3_600;
        format!("{days}d {hours}h")
    }
}

impl From<SystemStatsResponse> for SystemSnapshot {
    fn from(raw: SystemStatsResponse) -> Self {
        Self {
            cpu: raw.cpu,
            memory_percent: raw.memory_percent,
            memory_used_mb: raw.memory_used_mb,
            memory_total_mb: raw.memory_total_mb,
            uptime_secs: raw.uptime,
            platform: raw.platform,
            processes: raw.processes,
        }
    }
}

// ── IDS status ───────────────────────────────────────────────────────

/// Parsed fields from the IDS service's free-text status blob.
///
/// The blob is systemd-style output; parsing is labeled-field extraction
/// with per-field defaults. A blob that matches nothing yields the default
/// struct, never an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdsStatus {
    /// The `Active:` value up to its parenthesized qualifier, e.g. `"active"`.
    pub active: String,
    /// The `since ...` portion of the Active line.
    pub uptime: String,
    pub memory: String,
    pub cpu: String,
    pub version: String,
    pub threads: u64,
    pub alerts: u64,
    /// The unparsed blob, kept for raw display.
    pub raw: String,
}

impl Default for IdsStatus {
    fn default() -> Self {
        Self {
            active: "unknown".into(),
            uptime: "N/A".into(),
            memory: "N/A".into(),
            cpu: "N/A".into(),
            version: "Unknown".into(),
            threads: 0,
            alerts: 0,
            raw: String::new(),
        }
    }
}

impl IdsStatus {
    /// Extract labeled fields from a status blob. Missing labels keep
    /// their defaults.
    pub fn parse(text: &str) -> Self {
        let mut status = Self {
            raw: text.to_owned(),
            ..Self::default()
        };

        for line in text.lines() {
            let line = line.trim();
            if let Some(rest) = line.strip_prefix("Active:") {
                let rest = rest.trim();
                // "active (running) since Mon 2025-06-16 08:00:12 UTC"
                let state = rest.split(" (").next().unwrap_or(rest);
                if !state.is_empty() {
                    status.active = state.to_owned();
                }
                if let Some(idx) = rest.find("since ") {
                    status.uptime = rest[idx + "since ".len()..].trim().to_owned();
                }
            } else if let Some(rest) = line.strip_prefix("Memory:") {
                status.memory = rest.trim().to_owned();
            } else if let Some(rest) = line.strip_prefix("CPU:") {
                status.cpu = rest.trim().to_owned();
            } else if let Some(rest) = line.strip_prefix("Version:") {
                status.version = rest.trim().to_owned();
            } else if let Some(rest) = line.strip_prefix("Threads:") {
                status.threads = rest.trim().parse().unwrap_or(0);
            } else if let Some(rest) = line.strip_prefix("Alerts:") {
                status.alerts = rest.trim().parse().unwrap_or(0);
            }
        }

        status
    }

    /// Whether the service reports itself running. Prefix match, so
    /// `"inactive"` does not pass.
    pub fn is_active(&self) -> bool {
        self.active.starts_with("active")
    }
}

// ── Firewall overview ────────────────────────────────────────────────

/// Summary derived from the firewall-stats source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FirewallOverview {
    pub input_policy: String,
    pub input_rule_count: usize,
    pub blocked_ips: u64,
}

impl FirewallOverview {
    /// The firewall counts as active when the INPUT chain has a
    /// restrictive default policy and at least one rule.
    pub fn is_active(&self) -> bool {
        matches!(self.input_policy.as_str(), "DROP" | "REJECT") && self.input_rule_count > 0
    }
}

impl From<&FirewallSnapshotResponse> for FirewallOverview {
    fn from(raw: &FirewallSnapshotResponse) -> Self {
        let (policy, count) = raw
            .chains
            .input
            .as_ref()
            .map_or((String::from("Unknown"), 0), |c| {
                (c.policy.clone(), c.rules.len())
            });
        Self {
            input_policy: policy,
            input_rule_count: count,
            blocked_ips: raw.blocked_ips,
        }
    }
}

// ── ML model status ──────────────────────────────────────────────────

/// Detection-model quality metrics and training metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MlModelStatus {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub last_trained: Option<String>,
    pub training_samples: Option<u64>,
    pub model_version: Option<String>,
}

impl From<MlStatusResponse> for MlModelStatus {
    fn from(raw: MlStatusResponse) -> Self {
        Self {
            accuracy: raw.accuracy,
            precision: raw.precision,
            recall: raw.recall,
            f1_score: raw.f1_score,
            last_trained: raw.last_trained,
            training_samples: raw.training_samples,
            model_version: raw.model_version,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const BLOB: &str = "\
● suricata.service - Suricata IDS
   Active: active (running) since Mon 2025-06-16 08:00:12 UTC
   Version: 7.0.5
   Threads: 9
   Memory: 412.3M
   CPU: 2min 11.204s
   Alerts: 1284
";

    #[test]
    fn parses_labeled_fields() {
        let status = IdsStatus::parse(BLOB);
        assert_eq!(status.active, "active");
        assert_eq!(status.uptime, "Mon 2025-06-16 08:00:12 UTC");
        assert_eq!(status.version, "7.0.5");
        assert_eq!(status.threads, 9);
        assert_eq!(status.memory, "412.3M");
        assert_eq!(status.alerts, 1284);
        assert!(status.is_active());
    }

    #[test]
    fn garbage_blob_yields_defaults() {
        let status = IdsStatus::parse("no labels here\njust noise\n");
        assert_eq!(status.active, "unknown");
        assert_eq!(status.version, "Unknown");
        assert_eq!(status.threads, 0);
        assert!(!status.is_active());
    }

    #[test]
    fn inactive_is_not_active() {
        let status = IdsStatus::parse("Active: inactive (dead)\n");
        assert_eq!(status.active, "inactive");
        assert!(!status.is_active());
    }

    #[test]
    fn system_health_bands() {
        let mut snap = SystemSnapshot {
            cpu: 10.0,
            memory_percent: 20.0,
            memory_used_mb: 1024.0,
            memory_total_mb: 8192.0,
            uptime_secs: 90_000,
            platform: "Linux".into(),
            processes: 100,
        };
        assert_eq!(snap.health(), SystemHealth::Healthy);
        snap.cpu = 75.0;
        assert_eq!(snap.health(), SystemHealth::Moderate);
        snap.memory_percent = 90.0;
        assert_eq!(snap.health(), SystemHealth::Stressed);
        assert_eq!(snap.format_uptime(), "1d 1h");
    }

    #[test]
    fn firewall_active_needs_restrictive_policy_and_rules() {
        let mut overview = FirewallOverview {
            input_policy: "DROP".into(),
            input_rule_count: 3,
            blocked_ips: 2,
        };
        assert!(overview.is_active());
        overview.input_rule_count = 0;
        assert!(!overview.is_active());
        overview.input_rule_count = 3;
        overview.input_policy = "ACCEPT".into();
        assert!(!overview.is_active());
    }
}
