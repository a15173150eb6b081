// ── Rule catalog ──
//
// The canonical flat rule list, rebuilt wholesale from the backend's
// chain dump on every successful rule poll. No incremental diffing:
// ordinals shift whenever any rule is inserted or removed, so only the
// latest rebuild can resolve a delete handle.

use chrono::{DateTime, Utc};
use serde::Serialize;

use netwarden_api::models::{ChainDump, FirewallSnapshotResponse, RawRule};

use crate::model::rule::display_id;
use crate::model::{ANY_ADDR, Chain, Direction, FirewallRule, RuleKey, RuleSeverity, RuleTarget};

/// All rules across the three chains, as of one fetch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RuleCatalog {
    rules: Vec<FirewallRule>,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl RuleCatalog {
    /// Rebuild the catalog from a chain dump. Chains are walked in the
    /// fixed order INPUT, OUTPUT, FORWARD; within a chain, the backend's
    /// `num` is the ordinal when present, else the 1-based position.
    pub fn from_snapshot(snapshot: &FirewallSnapshotResponse, fetched_at: DateTime<Utc>) -> Self {
        let mut rules = Vec::new();

        let chains: [(Chain, Option<&ChainDump>); 3] = [
            (Chain::Input, snapshot.chains.input.as_ref()),
            (Chain::Output, snapshot.chains.output.as_ref()),
            (Chain::Forward, snapshot.chains.forward.as_ref()),
        ];

        for (chain, dump) in chains {
            let Some(dump) = dump else { continue };
            for (index, raw) in dump.rules.iter().enumerate() {
                let ordinal = raw.num.unwrap_or(index as u32 + 1);
                rules.push(build_rule(chain, ordinal, raw, fetched_at));
            }
        }

        Self {
            rules,
            fetched_at: Some(fetched_at),
        }
    }

    pub fn rules(&self) -> &[FirewallRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Resolve a rule by its authoritative key against this — the most
    /// recent — poll. Returns `None` when the ordinal no longer exists,
    /// which callers must treat as a stale handle.
    pub fn rule_at(&self, chain: Chain, ordinal: u32) -> Option<&FirewallRule> {
        self.rules
            .iter()
            .find(|r| r.key == RuleKey { chain, ordinal })
    }

    /// Count of high-severity inbound rules (the "blocked IPs" stat).
    pub fn blocked_inbound(&self) -> usize {
        self.rules
            .iter()
            .filter(|r| r.severity() == RuleSeverity::High && r.direction() == Direction::Inbound)
            .count()
    }

    /// Count of high-severity rules across all chains.
    pub fn high_severity(&self) -> usize {
        self.rules
            .iter()
            .filter(|r| r.severity() == RuleSeverity::High)
            .count()
    }
}

fn build_rule(
    chain: Chain,
    ordinal: u32,
    raw: &RawRule,
    fetched_at: DateTime<Utc>,
) -> FirewallRule {
    let target = RuleTarget::parse(&raw.target);
    let protocol = raw
        .prot
        .clone()
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| String::from("all"));
    let source = canonical_addr(raw.source.as_deref());
    let destination = canonical_addr(raw.destination.as_deref());
    let summary = render_summary(&target, &protocol, &source, &destination, raw.extra.as_deref());

    FirewallRule {
        key: RuleKey { chain, ordinal },
        display_id: display_id(chain, ordinal, fetched_at),
        target,
        protocol,
        source,
        destination,
        summary,
    }
}

/// Normalize an address field: absent, empty, and `anywhere` all collapse
/// to the canonical any-address.
fn canonical_addr(raw: Option<&str>) -> String {
    match raw {
        Some(a) if !a.is_empty() && !a.eq_ignore_ascii_case("anywhere") => a.to_owned(),
        _ => ANY_ADDR.into(),
    }
}

/// One-line human rendering, e.g.
/// `DROP TCP traffic from 10.0.0.0/8 to anywhere tcp dpt:23`.
fn render_summary(
    target: &RuleTarget,
    protocol: &str,
    source: &str,
    destination: &str,
    extra: Option<&str>,
) -> String {
    let show = |addr: &str| {
        if addr == ANY_ADDR {
            "anywhere".to_owned()
        } else {
            addr.to_owned()
        }
    };
    let mut summary = format!(
        "{target} {} traffic from {} to {}",
        protocol.to_uppercase(),
        show(source),
        show(destination),
    );
    if let Some(extra) = extra.filter(|e| !e.is_empty()) {
        summary.push(' ');
        summary.push_str(extra);
    }
    summary
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn snapshot(json: serde_json::Value) -> FirewallSnapshotResponse {
        serde_json::from_value(json).unwrap()
    }

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-06-21T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn three_input_rules() -> FirewallSnapshotResponse {
        snapshot(serde_json::json!({
            "chains": {
                "INPUT": { "policy": "DROP", "rules": [
                    { "num": 1, "target": "ACCEPT", "prot": "tcp", "extra": "tcp dpt:22" },
                    { "num": 2, "target": "DROP", "prot": "tcp",
                      "source": "203.0.113.0/24", "extra": "tcp dpt:23" },
                    { "num": 3, "target": "REJECT", "prot": "udp", "extra": "udp dpt:53" }
                ]}
            },
            "blockedIPs": 1
        }))
    }

    #[test]
    fn rebuild_walks_chains_in_fixed_order() {
        let snap = snapshot(serde_json::json!({
            "chains": {
                "FORWARD": { "policy": "ACCEPT", "rules": [ { "target": "DROP" } ] },
                "INPUT":   { "policy": "DROP",   "rules": [ { "target": "ACCEPT" } ] },
                "OUTPUT":  { "policy": "ACCEPT", "rules": [ { "target": "REJECT" } ] }
            }
        }));
        let catalog = RuleCatalog::from_snapshot(&snap, now());
        let chains: Vec<Chain> = catalog.rules().iter().map(|r| r.key.chain).collect();
        assert_eq!(chains, [Chain::Input, Chain::Output, Chain::Forward]);
    }

    #[test]
    fn ordinal_falls_back_to_position() {
        let snap = snapshot(serde_json::json!({
            "chains": { "INPUT": { "policy": "DROP", "rules": [
                { "target": "ACCEPT" }, { "target": "DROP" }
            ]}}
        }));
        let catalog = RuleCatalog::from_snapshot(&snap, now());
        let ordinals: Vec<u32> = catalog.rules().iter().map(|r| r.key.ordinal).collect();
        assert_eq!(ordinals, [1, 2]);
    }

    #[test]
    fn display_id_combines_chain_ordinal_and_fetch_time() {
        let catalog = RuleCatalog::from_snapshot(&three_input_rules(), now());
        let rule = catalog.rule_at(Chain::Input, 2).unwrap();
        assert_eq!(
            rule.display_id,
            format!("INPUT-2-{}", now().timestamp_millis())
        );
    }

    #[test]
    fn summary_renders_anywhere_for_any_address() {
        let catalog = RuleCatalog::from_snapshot(&three_input_rules(), now());
        let rule = catalog.rule_at(Chain::Input, 2).unwrap();
        assert_eq!(
            rule.summary,
            "DROP TCP traffic from 203.0.113.0/24 to anywhere tcp dpt:23"
        );
        assert_eq!(rule.destination, ANY_ADDR);
    }

    #[test]
    fn deletion_shifts_ordinals_on_refetch() {
        // Three rules; the backend deletes ordinal 2 and we re-fetch.
        let before = RuleCatalog::from_snapshot(&three_input_rules(), now());
        assert_eq!(before.rule_at(Chain::Input, 2).unwrap().target, RuleTarget::Drop);

        let after_snap = snapshot(serde_json::json!({
            "chains": { "INPUT": { "policy": "DROP", "rules": [
                { "num": 1, "target": "ACCEPT", "prot": "tcp", "extra": "tcp dpt:22" },
                { "num": 2, "target": "REJECT", "prot": "udp", "extra": "udp dpt:53" }
            ]}}
        }));
        let after = RuleCatalog::from_snapshot(&after_snap, now());

        // What was ordinal 3 is now addressable at ordinal 2.
        assert_eq!(
            after.rule_at(Chain::Input, 2).unwrap().target,
            RuleTarget::Reject
        );
        assert!(after.rule_at(Chain::Input, 3).is_none());
    }

    #[test]
    fn derived_stats() {
        let snap = snapshot(serde_json::json!({
            "chains": {
                "INPUT": { "policy": "DROP", "rules": [
                    { "num": 1, "target": "DROP" },
                    { "num": 2, "target": "ACCEPT" }
                ]},
                "OUTPUT": { "policy": "ACCEPT", "rules": [
                    { "num": 1, "target": "DROP" }
                ]}
            }
        }));
        let catalog = RuleCatalog::from_snapshot(&snap, now());
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.high_severity(), 2);
        assert_eq!(catalog.blocked_inbound(), 1);
    }
}
