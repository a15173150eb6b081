// ── Polling synchronizer ──
//
// One background task per source, each on its own cadence, all feeding
// the telemetry store. Transient fetch errors stay in here: they are
// logged, recorded in `SourceHealth`, and retried on the next tick —
// never thrown upward. Writes are routed through a command channel and
// always end in a re-poll so the store reflects true backend state.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{Mutex, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use netwarden_api::models::RawAlert;
use netwarden_api::{BackendClient, TransportConfig};

use crate::catalog::RuleCatalog;
use crate::command::{Command, CommandEnvelope, CommandResult};
use crate::config::MonitorConfig;
use crate::convert::normalize_alert_push;
use crate::error::CoreError;
use crate::model::{FirewallOverview, IdsStatus, SecurityEvent, SourceHealth, SourceId};
use crate::store::{AggregateView, TelemetryStore};

const COMMAND_CHANNEL_SIZE: usize = 64;

/// Monitor lifecycle state observable by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Idle,
    Running,
}

/// The polling synchronizer.
///
/// Cheaply cloneable via `Arc<MonitorInner>`. Owns the per-source fetch
/// cadences, all `SourceHealth` records, and the latest-snapshot cells;
/// downstream components only ever see read-only snapshot clones.
#[derive(Clone)]
pub struct Monitor {
    inner: Arc<MonitorInner>,
}

struct MonitorInner {
    config: MonitorConfig,
    client: BackendClient,
    store: TelemetryStore,
    state: watch::Sender<MonitorState>,
    cancel: CancellationToken,
    /// Child token for the current run — cancelled on stop, replaced on
    /// the next start.
    cancel_child: Mutex<CancellationToken>,
    command_tx: Mutex<mpsc::Sender<CommandEnvelope>>,
    command_rx: Mutex<Option<mpsc::Receiver<CommandEnvelope>>>,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Monitor {
    /// Create a new monitor from configuration. Does NOT fetch anything —
    /// call [`start()`](Self::start) to run the initial refresh and spawn
    /// the poll tasks.
    pub fn new(config: MonitorConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            timeout: config.timeout,
            accept_invalid_certs: config.accept_invalid_certs,
        };
        let client = BackendClient::new(config.base_url.clone(), &transport)?;

        let (state, _) = watch::channel(MonitorState::Idle);
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);
        let cancel = CancellationToken::new();
        let cancel_child = cancel.child_token();

        Ok(Self {
            inner: Arc::new(MonitorInner {
                config,
                client,
                store: TelemetryStore::new(),
                state,
                cancel,
                cancel_child: Mutex::new(cancel_child),
                command_tx: Mutex::new(command_tx),
                command_rx: Mutex::new(Some(command_rx)),
                task_handles: Mutex::new(Vec::new()),
            }),
        })
    }

    /// Access the monitor configuration.
    pub fn config(&self) -> &MonitorConfig {
        &self.inner.config
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Start the monitor: perform an initial refresh of every source,
    /// then spawn the command processor and one poll task per source
    /// with a non-zero interval.
    pub async fn start(&self) -> Result<(), CoreError> {
        if *self.inner.state.borrow() == MonitorState::Running {
            return Ok(());
        }

        // Fresh child token for this run (supports restart after stop).
        let child = self.inner.cancel.child_token();
        *self.inner.cancel_child.lock().await = child.clone();

        // Initial data load before any task starts.
        self.refresh_all().await;

        let mut handles = self.inner.task_handles.lock().await;

        if let Some(rx) = self.inner.command_rx.lock().await.take() {
            let monitor = self.clone();
            let cancel = child.clone();
            handles.push(tokio::spawn(command_processor_task(monitor, rx, cancel)));
        }

        let intervals = &self.inner.config.intervals;
        let sources = [
            (SourceId::SystemStats, intervals.system),
            (SourceId::IdsStatus, intervals.ids_status),
            (SourceId::FirewallStats, intervals.firewall),
            (SourceId::Rules, intervals.rules),
            (SourceId::Events, intervals.events),
            (SourceId::ThreatLog, intervals.threat_log),
            (SourceId::MlStatus, intervals.ml_status),
        ];
        for (source, period) in sources {
            if period.is_zero() {
                continue;
            }
            let monitor = self.clone();
            let cancel = child.clone();
            handles.push(tokio::spawn(poll_task(monitor, source, period, cancel)));
        }

        let _ = self.inner.state.send(MonitorState::Running);
        info!("monitor started");
        Ok(())
    }

    /// Stop the monitor.
    ///
    /// Cancels all poll tasks and in-flight requests for this run; a
    /// response arriving after cancellation is discarded, never applied.
    pub async fn stop(&self) {
        self.inner.cancel_child.lock().await.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }

        // Recreate the command channel so a restart gets a fresh receiver.
        {
            let (tx, rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);
            *self.inner.command_tx.lock().await = tx;
            *self.inner.command_rx.lock().await = Some(rx);
        }

        let _ = self.inner.state.send(MonitorState::Idle);
        debug!("monitor stopped");
    }

    /// Subscribe to lifecycle state changes.
    pub fn state(&self) -> watch::Receiver<MonitorState> {
        self.inner.state.subscribe()
    }

    // ── Polling ──────────────────────────────────────────────────────

    /// Fetch every source concurrently, let each settle independently
    /// (success or failure), and only then publish the aggregate view.
    /// Runs as an additional round alongside the periodic timers.
    pub async fn refresh_all(&self) {
        let cancel = self.inner.cancel_child.lock().await.clone();
        tokio::join!(
            self.poll_source(SourceId::SystemStats, &cancel),
            self.poll_source(SourceId::IdsStatus, &cancel),
            self.poll_source(SourceId::FirewallStats, &cancel),
            self.poll_source(SourceId::Rules, &cancel),
            self.poll_source(SourceId::Events, &cancel),
            self.poll_source(SourceId::ThreatLog, &cancel),
            self.poll_source(SourceId::MlStatus, &cancel),
        );
        self.inner.store.publish_aggregate();
    }

    /// Fetch one source and apply the result to its snapshot cell.
    /// Results landing after cancellation are dropped without touching
    /// state.
    pub(crate) async fn poll_source(&self, source: SourceId, cancel: &CancellationToken) {
        let client = &self.inner.client;
        match source {
            SourceId::SystemStats => {
                self.poll_with(source, cancel, client.get_system_stats(), |store, raw| {
                    store.set_system(raw.into());
                })
                .await;
            }
            SourceId::IdsStatus => {
                self.poll_with(source, cancel, client.get_ids_status(), |store, raw| {
                    store.set_ids(IdsStatus::parse(&raw.status));
                })
                .await;
            }
            SourceId::FirewallStats => {
                self.poll_with(source, cancel, client.get_firewall_stats(), |store, raw| {
                    store.set_firewall(FirewallOverview::from(&raw));
                })
                .await;
            }
            SourceId::Rules => {
                self.poll_with(source, cancel, client.list_rules(), |store, raw| {
                    store.set_rules(RuleCatalog::from_snapshot(&raw, Utc::now()));
                })
                .await;
            }
            SourceId::Events => {
                let query = &self.inner.config.event_query;
                let event_type = query.event_type.as_ref().map(ToString::to_string);
                let time_range = query.time_range.to_string();
                self.poll_with(
                    source,
                    cancel,
                    client.list_events(event_type.as_deref(), Some(&time_range), None),
                    |store, raw| {
                        store.set_events(
                            raw.events.into_iter().map(SecurityEvent::from).collect(),
                        );
                    },
                )
                .await;
            }
            SourceId::ThreatLog => {
                self.poll_with(source, cancel, client.get_threat_log(), |store, raw| {
                    store.set_threat_log(raw.log);
                })
                .await;
            }
            SourceId::MlStatus => {
                self.poll_with(source, cancel, client.get_ml_status(), |store, raw| {
                    store.set_ml(raw.into());
                })
                .await;
            }
            // Push-driven; nothing to poll.
            SourceId::AlertStream => {}
        }
    }

    /// Shared poll mechanics: await the fetch, drop abandoned responses,
    /// then apply + record health. `connected` flips strictly on the
    /// completed fetch outcome.
    async fn poll_with<T>(
        &self,
        source: SourceId,
        cancel: &CancellationToken,
        fetch: impl Future<Output = Result<T, netwarden_api::Error>>,
        apply: impl FnOnce(&TelemetryStore, T),
    ) {
        let result = fetch.await;
        if cancel.is_cancelled() {
            debug!(source = %source, "discarding response after cancellation");
            return;
        }
        match result {
            Ok(raw) => {
                apply(&self.inner.store, raw);
                self.inner.store.record_success(source, Utc::now());
            }
            Err(e) => {
                warn!(source = %source, error = %e, "fetch failed");
                self.inner.store.record_failure(source, e.to_string());
            }
        }
    }

    // ── Alert push stream ────────────────────────────────────────────

    /// Ingest one push from the external alert stream. Each push carries
    /// the entire current set (append-ordered); it replaces the previous
    /// set wholesale, newest-first.
    pub fn apply_alert_snapshot(&self, raw: Vec<RawAlert>) {
        let alerts = normalize_alert_push(raw);
        debug!(count = alerts.len(), "alert stream push");
        self.inner.store.set_alerts(alerts);
        self.inner
            .store
            .record_success(SourceId::AlertStream, Utc::now());
        self.inner.store.publish_aggregate();
    }

    /// Record an alert-stream delivery failure reported by the ingress.
    pub fn mark_alert_stream_failed(&self, error: impl Into<String>) {
        self.inner
            .store
            .record_failure(SourceId::AlertStream, error.into());
        self.inner.store.publish_aggregate();
    }

    // ── Snapshots & health ───────────────────────────────────────────

    /// Current aggregate view (lock-free load of the latest publish).
    pub fn snapshot(&self) -> Arc<AggregateView> {
        self.inner.store.aggregate()
    }

    /// Current health of one source.
    pub fn health(&self, source: SourceId) -> SourceHealth {
        self.inner.store.health(source)
    }

    /// Subscribe to health changes of one source.
    pub fn subscribe_health(&self, source: SourceId) -> watch::Receiver<SourceHealth> {
        self.inner.store.subscribe_health(source)
    }

    // ── Command execution ────────────────────────────────────────────

    /// Execute a write command.
    ///
    /// Sends the command through the internal channel to the processor
    /// task and awaits the result. Fails fast when the monitor is idle.
    pub async fn execute(&self, command: Command) -> Result<CommandResult, CoreError> {
        if *self.inner.state.borrow() != MonitorState::Running {
            return Err(CoreError::MonitorStopped);
        }

        let (tx, rx) = oneshot::channel();
        let command_tx = self.inner.command_tx.lock().await.clone();
        command_tx
            .send(CommandEnvelope {
                command,
                response_tx: tx,
            })
            .await
            .map_err(|_| CoreError::MonitorStopped)?;

        rx.await.map_err(|_| CoreError::MonitorStopped)?
    }

    /// Re-poll the rule-ish sources after a write and publish.
    async fn resync_rules(&self, cancel: &CancellationToken) {
        tokio::join!(
            self.poll_source(SourceId::Rules, cancel),
            self.poll_source(SourceId::FirewallStats, cancel),
        );
        self.inner.store.publish_aggregate();
    }
}

// ── Background tasks ─────────────────────────────────────────────────

/// Periodic poll loop for one source. The loop body is sequential, so a
/// source never has more than one in-flight fetch from its own timer; a
/// tick that fires while a fetch is still running is delayed, not queued.
async fn poll_task(
    monitor: Monitor,
    source: SourceId,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                monitor.poll_source(source, &cancel).await;
                monitor.inner.store.publish_aggregate();
            }
        }
    }
}

/// Process commands from the mpsc channel, routing each to the backend.
async fn command_processor_task(
    monitor: Monitor,
    mut rx: mpsc::Receiver<CommandEnvelope>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            envelope = rx.recv() => {
                let Some(envelope) = envelope else { break };
                let result = route_command(&monitor, envelope.command, &cancel).await;
                let _ = envelope.response_tx.send(result);
            }
        }
    }
}

/// Route one command to the backend.
///
/// Every write — accepted or rejected — ends in a re-poll: a rejected
/// write may still have had a partial effect, and only a fresh poll can
/// say. Validation failures return before any network call.
async fn route_command(
    monitor: &Monitor,
    command: Command,
    cancel: &CancellationToken,
) -> Result<CommandResult, CoreError> {
    match command {
        Command::AddRule(spec) => {
            let result = monitor.inner.client.create_rule(&spec.to_request()).await;
            monitor.resync_rules(cancel).await;
            result.map_err(CoreError::from)?;
            info!(port = spec.port, target = %spec.target, "rule added");
            Ok(CommandResult::Ok)
        }

        Command::DeleteRule { chain, ordinal } => {
            // The authoritative handle is (chain, ordinal) from the most
            // recent poll; anything else is stale.
            let catalog = monitor
                .inner
                .store
                .rules_snapshot()
                .ok_or(CoreError::SourceUnavailable {
                    source: SourceId::Rules,
                })?;
            if catalog.rule_at(chain, ordinal).is_none() {
                return Err(CoreError::StaleRuleHandle { chain, ordinal });
            }

            let result = monitor
                .inner
                .client
                .delete_rule(&chain.to_string(), ordinal)
                .await;
            monitor.resync_rules(cancel).await;
            result.map_err(CoreError::from)?;
            info!(%chain, ordinal, "rule deleted");
            Ok(CommandResult::Ok)
        }

        Command::BlockIp { ip } => {
            let result = monitor.inner.client.block_ip(&ip).await;
            monitor.resync_rules(cancel).await;
            let response = result.map_err(CoreError::from)?;
            info!(ip, "IP blocked");
            Ok(CommandResult::Message(response.message))
        }
    }
}
