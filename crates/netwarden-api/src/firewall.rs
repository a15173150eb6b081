// Firewall endpoints
//
// Chain/rule dumps plus the three write operations: rule creation, rule
// deletion by (chain, ordinal), and one-shot IP blocking. Rule storage is
// ordinal on the backend, so DELETE addresses a position, not an id.

use tracing::debug;

use crate::client::BackendClient;
use crate::error::Error;
use crate::models::{BlockIpResponse, FirewallSnapshotResponse, NewRuleRequest};

impl BackendClient {
    /// Get firewall statistics (chain policies, rules, blocked IP count).
    ///
    /// `GET /firewall/stats`
    pub async fn get_firewall_stats(&self) -> Result<FirewallSnapshotResponse, Error> {
        let url = self.url("firewall/stats")?;
        debug!("fetching firewall stats");
        self.get(url).await
    }

    /// List all firewall rules (same chain shape as the stats endpoint).
    ///
    /// `GET /firewall/rules`
    pub async fn list_rules(&self) -> Result<FirewallSnapshotResponse, Error> {
        let url = self.url("firewall/rules")?;
        debug!("listing firewall rules");
        self.get(url).await
    }

    /// Create a firewall rule.
    ///
    /// `POST /firewall/rules`
    ///
    /// Returns loosely-typed JSON: the backend echoes the created rule in
    /// a shape that varies with its iptables frontend version.
    pub async fn create_rule(&self, rule: &NewRuleRequest) -> Result<serde_json::Value, Error> {
        let url = self.url("firewall/rules")?;
        debug!(chain = %rule.chain, target = %rule.target, port = %rule.port, "creating rule");
        self.post(url, rule).await
    }

    /// Delete a rule by chain and 1-based ordinal.
    ///
    /// `DELETE /firewall/rules/{chain}/{ruleNum}`
    ///
    /// Ordinals shift on every insert/delete, so callers must resolve the
    /// ordinal against the most recent rule listing before calling this.
    pub async fn delete_rule(&self, chain: &str, rule_num: u32) -> Result<(), Error> {
        let url = self.url(&format!("firewall/rules/{chain}/{rule_num}"))?;
        debug!(chain, rule_num, "deleting rule");
        let _: serde_json::Value = self.delete(url).await?;
        Ok(())
    }

    /// Block a single IP address.
    ///
    /// `POST /firewall/block-ip`
    pub async fn block_ip(&self, ip: &str) -> Result<BlockIpResponse, Error> {
        let url = self.url("firewall/block-ip")?;
        debug!(ip, "blocking IP");
        self.post(url, &serde_json::json!({ "ip": ip })).await
    }
}
