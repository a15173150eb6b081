// ── Core error types ──
//
// User-facing errors from netwarden-core. Transient per-source fetch
// failures never appear here: the monitor contains them and records them
// in `SourceHealth`. What does surface is what a caller can act on —
// validation failures, rejected writes, stale handles, and configuration
// problems.

use thiserror::Error;

use crate::model::{Chain, SourceId};
use crate::translate::TranslateError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Validation ───────────────────────────────────────────────────
    /// Free-text rule translation failed; no write was issued.
    #[error("rule translation failed: {0}")]
    Translation(#[from] TranslateError),

    /// A delete addressed an ordinal that no longer exists in the latest
    /// poll. Ordinals shift on every insert/delete; re-resolve and retry.
    #[error("no rule at {chain}/{ordinal} in the latest poll -- refresh and retry")]
    StaleRuleHandle { chain: Chain, ordinal: u32 },

    // ── Writes ───────────────────────────────────────────────────────
    /// The backend rejected a write. A re-poll has already been forced so
    /// the local view reflects true backend state.
    #[error("write rejected by backend: {message}")]
    WriteRejected { message: String },

    // ── Lifecycle ────────────────────────────────────────────────────
    /// A command was issued against a stopped monitor.
    #[error("monitor is not running")]
    MonitorStopped,

    /// A required source has never produced a snapshot.
    #[error("source {source} has no data yet")]
    SourceUnavailable { source: SourceId },

    // ── Configuration ────────────────────────────────────────────────
    #[error("configuration error: {message}")]
    Config { message: String },

    // ── API (wrapped, not exposed raw) ───────────────────────────────
    #[error("backend API error: {message}")]
    Api {
        message: String,
        status: Option<u16>,
    },
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<netwarden_api::Error> for CoreError {
    fn from(err: netwarden_api::Error) -> Self {
        match err {
            netwarden_api::Error::Api { status, message } => {
                // Client-side rejections (4xx) are write rejections with a
                // user-meaningful message; everything else stays an API error.
                if (400..500).contains(&status) {
                    CoreError::WriteRejected { message }
                } else {
                    CoreError::Api {
                        message,
                        status: Some(status),
                    }
                }
            }
            netwarden_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid URL: {e}"),
            },
            other => CoreError::Api {
                message: other.to_string(),
                status: None,
            },
        }
    }
}
