#![allow(clippy::unwrap_used)]
// End-to-end tests for the polling synchronizer against a wiremock
// backend: health transitions, refresh idempotence, ordinal-addressed
// deletes, and the alert push path.

use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use netwarden_core::model::{Chain, RuleTarget, SourceId};
use netwarden_core::{
    Command, CommandResult, CoreError, DashboardAggregate, Monitor, MonitorConfig, PollIntervals,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn config_for(server: &MockServer) -> MonitorConfig {
    MonitorConfig {
        base_url: Url::parse(&server.uri()).unwrap(),
        intervals: PollIntervals::disabled(),
        ..MonitorConfig::default()
    }
}

fn rules_body_v1() -> serde_json::Value {
    json!({
        "chains": {
            "INPUT": { "policy": "DROP", "rules": [
                { "num": 1, "target": "ACCEPT", "prot": "tcp", "extra": "tcp dpt:22" },
                { "num": 2, "target": "DROP", "prot": "tcp",
                  "source": "203.0.113.0/24", "extra": "tcp dpt:23" },
                { "num": 3, "target": "REJECT", "prot": "udp", "extra": "udp dpt:53" }
            ]},
            "OUTPUT": { "policy": "ACCEPT", "rules": [] },
            "FORWARD": { "policy": "ACCEPT", "rules": [] }
        },
        "blockedIPs": 2
    })
}

/// The same listing after the backend deleted INPUT ordinal 2: what was
/// ordinal 3 is now addressable at ordinal 2.
fn rules_body_v2() -> serde_json::Value {
    json!({
        "chains": {
            "INPUT": { "policy": "DROP", "rules": [
                { "num": 1, "target": "ACCEPT", "prot": "tcp", "extra": "tcp dpt:22" },
                { "num": 2, "target": "REJECT", "prot": "udp", "extra": "udp dpt:53" }
            ]},
            "OUTPUT": { "policy": "ACCEPT", "rules": [] },
            "FORWARD": { "policy": "ACCEPT", "rules": [] }
        },
        "blockedIPs": 2
    })
}

/// Mount 200 responses for every polled endpoint.
async fn mount_baseline(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/system/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cpu": 21.0, "memory_percent": 48.0, "memory_used_mb": 3932.0,
            "memory_total_mb": 8192.0, "uptime": 90000, "platform": "Linux", "processes": 180
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/suricata/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "Active: active (running) since Mon 2025-06-16 08:00:12 UTC\nVersion: 7.0.5\nThreads: 9\nMemory: 412.3M\nCPU: 2min\nAlerts: 12\n"
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/firewall/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rules_body_v1()))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/suricata/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "events": [
                { "id": "e1", "timestamp": "2025-06-21T11:59:00Z", "event_type": "alert",
                  "severity": 3, "signature": "ET SCAN nmap", "src_ip": "203.0.113.9" },
                { "id": "e2", "timestamp": "2025-06-21T11:58:00Z", "event_type": "alert",
                  "severity": 2, "signature": "ET POLICY curl", "src_ip": "198.51.100.3" }
            ]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/suricata/threat-log"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "log": "scan from 203.0.113.9\n" })),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/ml/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accuracy": 98.2, "precision": 97.1, "recall": 96.4, "f1_score": 96.7
        })))
        .mount(server)
        .await;
}

// ── Startup & aggregate composition ─────────────────────────────────

#[tokio::test]
async fn start_populates_the_aggregate_view() {
    let server = MockServer::start().await;
    mount_baseline(&server).await;
    Mock::given(method("GET"))
        .and(path("/firewall/rules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rules_body_v1()))
        .mount(&server)
        .await;

    let handle = DashboardAggregate::start(config_for(&server)).await.unwrap();
    let view = handle.snapshot();

    assert_eq!(view.system.as_ref().unwrap().processes, 180);
    assert!(view.ids.as_ref().unwrap().is_active());
    assert_eq!(view.firewall.as_ref().unwrap().blocked_ips, 2);
    assert_eq!(view.rules.as_ref().unwrap().len(), 3);
    assert_eq!(view.events.len(), 2);
    assert_eq!(view.ml.as_ref().unwrap().accuracy, 98.2);
    assert!(view.health_of(SourceId::SystemStats).unwrap().connected);
    // The push stream has not delivered anything yet.
    assert!(!view.health_of(SourceId::AlertStream).unwrap().connected);

    handle.stop().await;
}

// ── Health transitions ──────────────────────────────────────────────

#[tokio::test]
async fn connected_flips_false_on_failure_and_true_on_next_success() {
    let server = MockServer::start().await;
    mount_baseline(&server).await;

    // Three failing polls of the rule source, then recovery.
    Mock::given(method("GET"))
        .and(path("/firewall/rules"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(3)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/firewall/rules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rules_body_v1()))
        .mount(&server)
        .await;

    let monitor = Monitor::new(config_for(&server)).unwrap();

    for tick in 0..3 {
        monitor.refresh_all().await;
        let health = monitor.health(SourceId::Rules);
        assert!(!health.connected, "tick {tick} should be disconnected");
        assert!(health.last_error.is_some());
        // Other sources are unaffected by this source's failures.
        assert!(monitor.health(SourceId::SystemStats).connected);
    }

    monitor.refresh_all().await;
    let health = monitor.health(SourceId::Rules);
    assert!(health.connected, "tick 4 should reconnect");
    assert!(health.last_error.is_none());
}

#[tokio::test]
async fn failed_source_keeps_last_known_snapshot() {
    let server = MockServer::start().await;
    mount_baseline(&server).await;
    Mock::given(method("GET"))
        .and(path("/firewall/rules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rules_body_v1()))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/firewall/rules"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let monitor = Monitor::new(config_for(&server)).unwrap();
    monitor.refresh_all().await;
    assert_eq!(monitor.snapshot().rules.as_ref().unwrap().len(), 3);

    // The next poll fails: disconnected, but the stale data stays
    // visible rather than blanking out.
    monitor.refresh_all().await;
    assert!(!monitor.health(SourceId::Rules).connected);
    assert_eq!(monitor.snapshot().rules.as_ref().unwrap().len(), 3);
}

// ── Refresh idempotence ─────────────────────────────────────────────

#[tokio::test]
async fn refresh_with_unchanged_backend_is_idempotent() {
    let server = MockServer::start().await;
    mount_baseline(&server).await;
    Mock::given(method("GET"))
        .and(path("/firewall/rules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rules_body_v1()))
        .mount(&server)
        .await;

    let monitor = Monitor::new(config_for(&server)).unwrap();
    monitor.refresh_all().await;
    let before = monitor.snapshot();

    monitor.refresh_all().await;
    let after = monitor.snapshot();

    // Identical modulo timestamps (generated_at / last_success_at).
    assert_eq!(before.system, after.system);
    assert_eq!(before.ids, after.ids);
    assert_eq!(before.firewall, after.firewall);
    assert_eq!(
        before.rules.as_ref().unwrap().len(),
        after.rules.as_ref().unwrap().len()
    );
    let ids_before: Vec<&str> = before.events.iter().map(|e| e.id.as_str()).collect();
    let ids_after: Vec<&str> = after.events.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids_before, ids_after);
    assert_eq!(
        before.health_of(SourceId::Rules).unwrap().connected,
        after.health_of(SourceId::Rules).unwrap().connected
    );
}

// ── Ordinal-addressed deletes ───────────────────────────────────────

#[tokio::test]
async fn delete_revalidates_ordinals_against_latest_poll() {
    let server = MockServer::start().await;
    mount_baseline(&server).await;
    Mock::given(method("GET"))
        .and(path("/firewall/rules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rules_body_v1()))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/firewall/rules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rules_body_v2()))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/firewall/rules/INPUT/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "deleted": true })))
        .expect(1)
        .mount(&server)
        .await;

    let handle = DashboardAggregate::start(config_for(&server)).await.unwrap();

    // Delete INPUT/2, then the forced re-poll picks up shifted ordinals.
    let result = handle
        .execute(Command::DeleteRule {
            chain: Chain::Input,
            ordinal: 2,
        })
        .await
        .unwrap();
    assert_eq!(result, CommandResult::Ok);

    let view = handle.snapshot();
    let catalog = view.rules.as_ref().unwrap();
    assert_eq!(catalog.len(), 2);
    // What was ordinal 3 (REJECT) is now addressable at ordinal 2.
    assert_eq!(
        catalog.rule_at(Chain::Input, 2).unwrap().target,
        RuleTarget::Reject
    );

    // A handle that no longer resolves fails fast, without a DELETE.
    let err = handle
        .execute(Command::DeleteRule {
            chain: Chain::Input,
            ordinal: 3,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::StaleRuleHandle { ordinal: 3, .. }));

    handle.stop().await;
}

// ── Write rejection ─────────────────────────────────────────────────

#[tokio::test]
async fn rejected_rule_submission_surfaces_message_and_resyncs() {
    let server = MockServer::start().await;
    mount_baseline(&server).await;
    Mock::given(method("GET"))
        .and(path("/firewall/rules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rules_body_v1()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/firewall/rules"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "duplicate rule" })),
        )
        .mount(&server)
        .await;

    let handle = DashboardAggregate::start(config_for(&server)).await.unwrap();

    let err = handle
        .submit_rule_text("Block traffic from 203.0.113.0/24 port 23")
        .await
        .unwrap_err();
    match err {
        CoreError::WriteRejected { message } => assert_eq!(message, "duplicate rule"),
        other => panic!("expected WriteRejected, got {other:?}"),
    }

    // The view still reflects backend truth after the forced re-poll.
    assert_eq!(handle.snapshot().rules.as_ref().unwrap().len(), 3);

    handle.stop().await;
}

#[tokio::test]
async fn missing_port_fails_synchronously_without_any_write() {
    let server = MockServer::start().await;
    mount_baseline(&server).await;
    Mock::given(method("GET"))
        .and(path("/firewall/rules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rules_body_v1()))
        .mount(&server)
        .await;
    // Any POST would violate this expectation.
    Mock::given(method("POST"))
        .and(path("/firewall/rules"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let handle = DashboardAggregate::start(config_for(&server)).await.unwrap();

    let err = handle
        .submit_rule_text("Block traffic from 10.0.0.0/8")
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Translation(_)));

    handle.stop().await;
}

// ── Block IP ────────────────────────────────────────────────────────

#[tokio::test]
async fn block_ip_returns_backend_message() {
    let server = MockServer::start().await;
    mount_baseline(&server).await;
    Mock::given(method("GET"))
        .and(path("/firewall/rules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rules_body_v1()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/firewall/block-ip"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "message": "blocked 203.0.113.9" })),
        )
        .mount(&server)
        .await;

    let handle = DashboardAggregate::start(config_for(&server)).await.unwrap();
    let result = handle
        .execute(Command::BlockIp {
            ip: "203.0.113.9".into(),
        })
        .await
        .unwrap();
    assert_eq!(result, CommandResult::Message("blocked 203.0.113.9".into()));

    handle.stop().await;
}

// ── Alert push stream ───────────────────────────────────────────────

#[tokio::test]
async fn alert_push_replaces_set_newest_first() {
    let server = MockServer::start().await;
    mount_baseline(&server).await;
    Mock::given(method("GET"))
        .and(path("/firewall/rules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rules_body_v1()))
        .mount(&server)
        .await;

    let handle = DashboardAggregate::start(config_for(&server)).await.unwrap();

    let push = |ids: &[&str]| -> Vec<netwarden_api::models::RawAlert> {
        ids.iter()
            .map(|id| serde_json::from_value(json!({ "id": id, "title": "t" })).unwrap())
            .collect()
    };

    handle.apply_alert_snapshot(push(&["a1", "a2"]));
    let view = handle.snapshot();
    let ids: Vec<&str> = view.alerts.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, ["a2", "a1"]);
    assert!(view.health_of(SourceId::AlertStream).unwrap().connected);

    // The next push is a full replacement, not a merge.
    handle.apply_alert_snapshot(push(&["a3"]));
    let view = handle.snapshot();
    let ids: Vec<&str> = view.alerts.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, ["a3"]);

    handle.stop().await;
}

// ── Lifecycle ───────────────────────────────────────────────────────

#[tokio::test]
async fn commands_fail_fast_after_stop() {
    let server = MockServer::start().await;
    mount_baseline(&server).await;
    Mock::given(method("GET"))
        .and(path("/firewall/rules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rules_body_v1()))
        .mount(&server)
        .await;

    let handle = DashboardAggregate::start(config_for(&server)).await.unwrap();
    handle.stop().await;

    let err = handle
        .execute(Command::BlockIp { ip: "10.0.0.1".into() })
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::MonitorStopped));
}
