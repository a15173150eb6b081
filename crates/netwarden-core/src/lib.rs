//! Data-aggregation and command-translation core for a network-security
//! operations dashboard.
//!
//! This crate owns the non-trivial machinery between the backend REST
//! surface (`netwarden-api`) and any presentation layer:
//!
//! - **[`DashboardAggregate`]** — lifecycle facade:
//!   [`start()`](DashboardAggregate::start) runs an initial refresh and
//!   spawns per-source poll tasks; the returned [`DashboardHandle`]
//!   exposes [`snapshot()`](DashboardHandle::snapshot),
//!   [`stop()`](DashboardHandle::stop), and the user-action entry points.
//!
//! - **[`Monitor`]** — the polling synchronizer: one independent cadence
//!   per source, per-source [`SourceHealth`] tracking, and atomic
//!   snapshot replacement so consumers never observe a half-updated view.
//!
//! - **[`translate_rule`]** — free text → structured firewall rule, with
//!   fail-safe defaults (ambiguous action parses as DROP).
//!
//! - **Normalization** ([`convert`]) — heterogeneous event/alert payloads
//!   into the canonical severity/category model; never throws on
//!   malformed input.
//!
//! - **[`FilterPager`]** — deterministic filtering, time-bucketing, and
//!   clamped pagination, generic over events, alerts, and rules.
//!
//! - **[`RuleCatalog`]** — the ordinal-addressed rule list, rebuilt
//!   wholesale per poll; `(chain, ordinal)` is the only delete handle.

pub mod aggregate;
pub mod catalog;
pub mod command;
pub mod config;
pub mod convert;
pub mod error;
pub mod filter;
pub mod model;
pub mod monitor;
pub mod store;
pub mod translate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use aggregate::{DashboardAggregate, DashboardHandle};
pub use catalog::RuleCatalog;
pub use command::{Command, CommandResult};
pub use config::{EventQuery, MonitorConfig, PollIntervals};
pub use error::CoreError;
pub use filter::{FilterPager, PageView, Pageable, Selection, TimeRange};
pub use monitor::{Monitor, MonitorState};
pub use store::AggregateView;
pub use translate::{TranslateError, translate_rule};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Alert, AlertCategory, AlertSeverity, Chain, Direction, EventAction, EventKind, EventSeverity,
    FirewallOverview, FirewallRule, IdsStatus, MlModelStatus, RuleKey, RuleSeverity, RuleSpec,
    RuleTarget, SecurityEvent, SeverityBand, SourceHealth, SourceId, SystemHealth, SystemSnapshot,
};
