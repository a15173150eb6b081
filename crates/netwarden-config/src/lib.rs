//! On-disk configuration for netwarden tools.
//!
//! Loads `config.toml` from the platform config directory, layers
//! `NETWARDEN_*` environment variables on top (figment), and resolves the
//! result into the core's runtime [`MonitorConfig`].
//!
//! ```toml
//! backend_url = "http://127.0.0.1:5050"
//! timeout_secs = 10
//!
//! [intervals]
//! system = 5
//! rules = 30
//!
//! [events]
//! event_type = "alert"
//! time_range = "24h"
//! ```

use std::path::PathBuf;
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Toml};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use netwarden_core::{EventQuery, MonitorConfig, PollIntervals};

/// Configuration loading/resolution failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("invalid {field}: {reason}")]
    Invalid { field: String, reason: String },
}

/// Per-source poll intervals in seconds; `0` disables a source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntervalsFile {
    pub system: u64,
    pub ids_status: u64,
    pub firewall: u64,
    pub rules: u64,
    pub events: u64,
    pub threat_log: u64,
    pub ml_status: u64,
}

impl Default for IntervalsFile {
    fn default() -> Self {
        Self {
            system: 5,
            ids_status: 10,
            firewall: 10,
            rules: 30,
            events: 10,
            threat_log: 10,
            ml_status: 30,
        }
    }
}

/// Server-side query defaults for the event feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsFile {
    /// `alert`, `dns`, `http`, ... — empty disables the filter.
    pub event_type: String,
    /// `1h`, `24h`, `7d`, or `all`.
    pub time_range: String,
}

impl Default for EventsFile {
    fn default() -> Self {
        Self {
            event_type: "alert".into(),
            time_range: "24h".into(),
        }
    }
}

/// The on-disk configuration shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub backend_url: String,
    pub timeout_secs: u64,
    pub accept_invalid_certs: bool,
    /// Default page size for paged listings.
    pub page_size: usize,
    pub intervals: IntervalsFile,
    pub events: EventsFile,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:5050".into(),
            timeout_secs: 10,
            accept_invalid_certs: false,
            page_size: 10,
            intervals: IntervalsFile::default(),
            events: EventsFile::default(),
        }
    }
}

impl FileConfig {
    /// Resolve into the core's runtime config, validating the URL and
    /// query tokens.
    pub fn into_monitor_config(&self) -> Result<MonitorConfig, ConfigError> {
        let base_url = self
            .backend_url
            .parse()
            .map_err(|e| ConfigError::Invalid {
                field: "backend_url".into(),
                reason: format!("{e}: {}", self.backend_url),
            })?;

        let time_range =
            self.events
                .time_range
                .parse()
                .map_err(|_| ConfigError::Invalid {
                    field: "events.time_range".into(),
                    reason: format!(
                        "expected one of 1h/24h/7d/all, got {}",
                        self.events.time_range
                    ),
                })?;

        let event_type = if self.events.event_type.is_empty() {
            None
        } else {
            // The kind parser is total: unknown types pass through verbatim.
            self.events.event_type.parse().ok()
        };

        let i = &self.intervals;
        Ok(MonitorConfig {
            base_url,
            timeout: Duration::from_secs(self.timeout_secs),
            accept_invalid_certs: self.accept_invalid_certs,
            intervals: PollIntervals {
                system: Duration::from_secs(i.system),
                ids_status: Duration::from_secs(i.ids_status),
                firewall: Duration::from_secs(i.firewall),
                rules: Duration::from_secs(i.rules),
                events: Duration::from_secs(i.events),
                threat_log: Duration::from_secs(i.threat_log),
                ml_status: Duration::from_secs(i.ml_status),
            },
            event_query: EventQuery {
                event_type,
                time_range,
            },
        })
    }
}

/// Platform config file path: `<config dir>/netwarden/config.toml`.
pub fn config_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "netwarden")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("netwarden.toml"))
}

/// Load configuration from the default path plus `NETWARDEN_*` env vars.
pub fn load() -> Result<FileConfig, ConfigError> {
    load_from(&config_path())
}

/// Load configuration from an explicit path plus `NETWARDEN_*` env vars.
/// A missing file is not an error; defaults fill every absent field.
pub fn load_from(path: &std::path::Path) -> Result<FileConfig, ConfigError> {
    Figment::from(figment::providers::Serialized::defaults(
        FileConfig::default(),
    ))
    .merge(Toml::file(path))
    .merge(Env::prefixed("NETWARDEN_").split("__"))
    .extract()
    .map_err(|e| ConfigError::Load(Box::new(e)))
}
