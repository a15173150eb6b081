// ── Dashboard aggregate ──
//
// Process-scoped lifecycle facade over the monitor: explicit start and
// stop calls, a synchronous snapshot accessor, and the user-action entry
// points. This is the one surface presentation code talks to.

use std::sync::Arc;

use tokio::sync::watch;

use netwarden_api::models::RawAlert;

use crate::command::{Command, CommandResult};
use crate::config::{MonitorConfig, PollIntervals};
use crate::error::CoreError;
use crate::model::{RuleSpec, SourceHealth, SourceId};
use crate::monitor::Monitor;
use crate::store::AggregateView;
use crate::translate::translate_rule;

/// Entry point for consumers.
pub struct DashboardAggregate;

impl DashboardAggregate {
    /// Start a dashboard: build the monitor, run the initial refresh,
    /// spawn the poll tasks, and hand back the lifecycle handle.
    pub async fn start(config: MonitorConfig) -> Result<DashboardHandle, CoreError> {
        let monitor = Monitor::new(config)?;
        monitor.start().await?;
        Ok(DashboardHandle { monitor })
    }

    /// One-shot: start with periodic polling disabled, run the closure,
    /// stop. Sized for single CLI invocations that need exactly one
    /// request-response cycle.
    pub async fn oneshot<F, Fut, T>(config: MonitorConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(DashboardHandle) -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let mut config = config;
        config.intervals = PollIntervals::disabled();

        let handle = Self::start(config).await?;
        let stopper = handle.monitor.clone();
        let result = f(handle).await;
        stopper.stop().await;
        result
    }
}

/// Running dashboard handle. Cheap to clone; all clones share one
/// monitor.
#[derive(Clone)]
pub struct DashboardHandle {
    monitor: Monitor,
}

impl DashboardHandle {
    /// The latest published aggregate view. Synchronous and lock-free;
    /// the returned view is immutable and never mutated by a concurrent
    /// poll.
    pub fn snapshot(&self) -> Arc<AggregateView> {
        self.monitor.snapshot()
    }

    /// Fetch every source now, independent of the periodic timers, and
    /// publish the aggregate once everything has settled.
    pub async fn refresh_all(&self) {
        self.monitor.refresh_all().await;
    }

    /// Stop all polling. In-flight responses are discarded, not applied.
    pub async fn stop(&self) {
        self.monitor.stop().await;
    }

    /// Execute a write command.
    pub async fn execute(&self, command: Command) -> Result<CommandResult, CoreError> {
        self.monitor.execute(command).await
    }

    /// Translate a free-text rule request and submit it.
    ///
    /// Translation failures surface synchronously with no network call,
    /// leaving the caller's input intact for correction.
    pub async fn submit_rule_text(&self, text: &str) -> Result<RuleSpec, CoreError> {
        let spec = translate_rule(text)?;
        self.execute(Command::AddRule(spec.clone())).await?;
        Ok(spec)
    }

    /// Ingest one full-set push from the external alert stream.
    pub fn apply_alert_snapshot(&self, raw: Vec<RawAlert>) {
        self.monitor.apply_alert_snapshot(raw);
    }

    /// Current health of one source.
    pub fn health(&self, source: SourceId) -> SourceHealth {
        self.monitor.health(source)
    }

    /// Subscribe to health changes of one source.
    pub fn subscribe_health(&self, source: SourceId) -> watch::Receiver<SourceHealth> {
        self.monitor.subscribe_health(source)
    }
}
