// ── Telemetry store ──
//
// Per-source latest-snapshot cells plus the composed aggregate view. Each
// cell is written exactly once per completed (non-abandoned) fetch and
// read-only everywhere else: the update is a single atomic replace, so a
// reader mid-render never observes a half-updated value. Across sources,
// cells are mutually unordered; each is individually monotonic.

use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;

use crate::catalog::RuleCatalog;
use crate::model::{
    Alert, FirewallOverview, IdsStatus, MlModelStatus, SecurityEvent, SourceHealth, SourceId,
    SystemSnapshot,
};

/// The single read model consumed by presentation: every source's latest
/// snapshot, the rule catalog, newest-first events/alerts, and the full
/// health map, stamped at composition time.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateView {
    pub generated_at: DateTime<Utc>,
    pub system: Option<Arc<SystemSnapshot>>,
    pub ids: Option<Arc<IdsStatus>>,
    pub firewall: Option<Arc<FirewallOverview>>,
    pub rules: Option<Arc<RuleCatalog>>,
    pub events: Arc<Vec<SecurityEvent>>,
    pub alerts: Arc<Vec<Alert>>,
    pub threat_log: Option<Arc<String>>,
    pub ml: Option<Arc<MlModelStatus>>,
    pub health: Vec<(SourceId, SourceHealth)>,
}

impl AggregateView {
    fn empty() -> Self {
        Self {
            generated_at: Utc::now(),
            system: None,
            ids: None,
            firewall: None,
            rules: None,
            events: Arc::new(Vec::new()),
            alerts: Arc::new(Vec::new()),
            threat_log: None,
            ml: None,
            health: SourceId::ALL
                .into_iter()
                .map(|s| (s, SourceHealth::default()))
                .collect(),
        }
    }

    /// Health record for one source.
    pub fn health_of(&self, source: SourceId) -> Option<&SourceHealth> {
        self.health
            .iter()
            .find(|(s, _)| *s == source)
            .map(|(_, h)| h)
    }
}

/// Reactive storage for everything the monitor fetches.
pub(crate) struct TelemetryStore {
    system: watch::Sender<Option<Arc<SystemSnapshot>>>,
    ids: watch::Sender<Option<Arc<IdsStatus>>>,
    firewall: watch::Sender<Option<Arc<FirewallOverview>>>,
    rules: watch::Sender<Option<Arc<RuleCatalog>>>,
    events: watch::Sender<Arc<Vec<SecurityEvent>>>,
    threat_log: watch::Sender<Option<Arc<String>>>,
    ml: watch::Sender<Option<Arc<MlModelStatus>>>,
    alerts: watch::Sender<Arc<Vec<Alert>>>,
    health: Vec<watch::Sender<SourceHealth>>,
    aggregate: ArcSwap<AggregateView>,
}

impl TelemetryStore {
    pub(crate) fn new() -> Self {
        Self {
            system: watch::channel(None).0,
            ids: watch::channel(None).0,
            firewall: watch::channel(None).0,
            rules: watch::channel(None).0,
            events: watch::channel(Arc::new(Vec::new())).0,
            threat_log: watch::channel(None).0,
            ml: watch::channel(None).0,
            alerts: watch::channel(Arc::new(Vec::new())).0,
            health: SourceId::ALL
                .iter()
                .map(|_| watch::channel(SourceHealth::default()).0)
                .collect(),
            aggregate: ArcSwap::from_pointee(AggregateView::empty()),
        }
    }

    // ── Snapshot cell writes (one per completed fetch) ───────────────

    pub(crate) fn set_system(&self, snap: SystemSnapshot) {
        self.system.send_replace(Some(Arc::new(snap)));
    }

    pub(crate) fn set_ids(&self, status: IdsStatus) {
        self.ids.send_replace(Some(Arc::new(status)));
    }

    pub(crate) fn set_firewall(&self, overview: FirewallOverview) {
        self.firewall.send_replace(Some(Arc::new(overview)));
    }

    pub(crate) fn set_rules(&self, catalog: RuleCatalog) {
        self.rules.send_replace(Some(Arc::new(catalog)));
    }

    pub(crate) fn set_events(&self, events: Vec<SecurityEvent>) {
        self.events.send_replace(Arc::new(events));
    }

    pub(crate) fn set_threat_log(&self, log: String) {
        self.threat_log.send_replace(Some(Arc::new(log)));
    }

    pub(crate) fn set_ml(&self, status: MlModelStatus) {
        self.ml.send_replace(Some(Arc::new(status)));
    }

    pub(crate) fn set_alerts(&self, alerts: Vec<Alert>) {
        self.alerts.send_replace(Arc::new(alerts));
    }

    // ── Snapshot reads ───────────────────────────────────────────────

    pub(crate) fn rules_snapshot(&self) -> Option<Arc<RuleCatalog>> {
        self.rules.borrow().clone()
    }

    // ── Health ───────────────────────────────────────────────────────

    pub(crate) fn health(&self, source: SourceId) -> SourceHealth {
        self.health[source.index()].borrow().clone()
    }

    pub(crate) fn subscribe_health(&self, source: SourceId) -> watch::Receiver<SourceHealth> {
        self.health[source.index()].subscribe()
    }

    pub(crate) fn record_success(&self, source: SourceId, at: DateTime<Utc>) {
        self.health[source.index()].send_modify(|h| h.record_success(at));
    }

    pub(crate) fn record_failure(&self, source: SourceId, error: String) {
        self.health[source.index()].send_modify(|h| h.record_failure(error));
    }

    // ── Aggregate view ───────────────────────────────────────────────

    /// Current aggregate view (lock-free load).
    pub(crate) fn aggregate(&self) -> Arc<AggregateView> {
        self.aggregate.load_full()
    }

    /// Recompose the aggregate from the current cells and publish it as
    /// one atomic replace.
    pub(crate) fn publish_aggregate(&self) {
        let view = AggregateView {
            generated_at: Utc::now(),
            system: self.system.borrow().clone(),
            ids: self.ids.borrow().clone(),
            firewall: self.firewall.borrow().clone(),
            rules: self.rules.borrow().clone(),
            events: self.events.borrow().clone(),
            alerts: self.alerts.borrow().clone(),
            threat_log: self.threat_log.borrow().clone(),
            ml: self.ml.borrow().clone(),
            health: SourceId::ALL
                .into_iter()
                .map(|s| (s, self.health(s)))
                .collect(),
        };
        self.aggregate.store(Arc::new(view));
    }
}
