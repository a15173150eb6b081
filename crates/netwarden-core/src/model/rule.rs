// ── Firewall rule domain types ──
//
// Rule identity is ordinal: the backend addresses rules by (chain,
// position), and positions shift on every insert/delete. `RuleKey` is the
// authoritative handle from the most recent poll; `display_id` exists only
// for list identity in a UI and must never drive a delete.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use netwarden_api::models::NewRuleRequest;

/// The three firewall chains the backend exposes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Chain {
    Input,
    Output,
    Forward,
}

/// A rule's verdict. `Other` carries verbatim backend targets (LOG,
/// RETURN, ...) that appear in chain dumps; the translator never emits it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleTarget {
    Accept,
    Drop,
    Reject,
    Other(String),
}

impl RuleTarget {
    /// Parse a dumped target string. Unknown targets are preserved verbatim.
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_uppercase().as_str() {
            "ACCEPT" => Self::Accept,
            "DROP" => Self::Drop,
            "REJECT" => Self::Reject,
            _ => Self::Other(raw.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Accept => "ACCEPT",
            Self::Drop => "DROP",
            Self::Reject => "REJECT",
            Self::Other(raw) => raw,
        }
    }
}

impl std::fmt::Display for RuleTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RuleTarget {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Traffic direction, derived from the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    Inbound,
    Outbound,
    Internal,
}

/// Rule severity, derived from the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RuleSeverity {
    Low,
    Medium,
    High,
}

/// The authoritative backend-addressable handle for a rule: its chain and
/// 1-based position within that chain, as of the most recent poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RuleKey {
    pub chain: Chain,
    pub ordinal: u32,
}

impl std::fmt::Display for RuleKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.chain, self.ordinal)
    }
}

/// One firewall rule, reconstructed wholesale on every successful poll of
/// the rule source.
#[derive(Debug, Clone, Serialize)]
pub struct FirewallRule {
    /// Authoritative delete key from the most recent poll.
    pub key: RuleKey,
    /// Synthetic list-identity id (`"{CHAIN}-{ordinal}-{fetch millis}"`).
    /// Never used to address the backend.
    pub display_id: String,
    pub target: RuleTarget,
    /// Protocol as dumped; `"all"` when the backend omits it.
    pub protocol: String,
    /// `"0.0.0.0/0"` is the canonical "any" value.
    pub source: String,
    pub destination: String,
    /// Human-readable one-line rendering of the rule.
    pub summary: String,
}

impl FirewallRule {
    /// Traffic direction, derived from the chain: INPUT is inbound,
    /// FORWARD is internal, anything else is outbound.
    pub fn direction(&self) -> Direction {
        match self.key.chain {
            Chain::Input => Direction::Inbound,
            Chain::Forward => Direction::Internal,
            Chain::Output => Direction::Outbound,
        }
    }

    /// Severity, derived from the target: DROP is high, REJECT is medium,
    /// everything else is low.
    pub fn severity(&self) -> RuleSeverity {
        match self.target {
            RuleTarget::Drop => RuleSeverity::High,
            RuleTarget::Reject => RuleSeverity::Medium,
            _ => RuleSeverity::Low,
        }
    }
}

/// The canonical "match anything" source/destination.
pub const ANY_ADDR: &str = "0.0.0.0/0";

/// A structured rule-creation request, as produced by the natural-language
/// translator. Protocol is fixed to TCP and the chain to INPUT: the
/// translator does not infer either from text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleSpec {
    pub chain: Chain,
    pub target: RuleTarget,
    pub protocol: String,
    pub port: u16,
    pub source: String,
    pub destination: String,
}

impl RuleSpec {
    /// Build the wire request. The backend expects `port` as a string.
    pub fn to_request(&self) -> NewRuleRequest {
        NewRuleRequest {
            chain: self.chain.to_string(),
            target: self.target.to_string(),
            protocol: self.protocol.clone(),
            port: self.port.to_string(),
            source: self.source.clone(),
            destination: self.destination.clone(),
        }
    }
}

/// Synthetic display id for list identity, unique per fetch.
pub(crate) fn display_id(chain: Chain, ordinal: u32, fetched_at: DateTime<Utc>) -> String {
    format!("{chain}-{ordinal}-{}", fetched_at.timestamp_millis())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn chain_round_trips_wire_names() {
        assert_eq!(Chain::Input.to_string(), "INPUT");
        assert_eq!("FORWARD".parse::<Chain>().unwrap(), Chain::Forward);
        assert_eq!("output".parse::<Chain>().unwrap(), Chain::Output);
    }

    #[test]
    fn target_preserves_unknown_verbatim() {
        assert_eq!(RuleTarget::parse("accept"), RuleTarget::Accept);
        assert_eq!(RuleTarget::parse("LOG"), RuleTarget::Other("LOG".into()));
        assert_eq!(RuleTarget::parse("LOG").to_string(), "LOG");
    }

    #[test]
    fn direction_derives_from_chain() {
        let rule = |chain| FirewallRule {
            key: RuleKey { chain, ordinal: 1 },
            display_id: String::new(),
            target: RuleTarget::Drop,
            protocol: "tcp".into(),
            source: ANY_ADDR.into(),
            destination: ANY_ADDR.into(),
            summary: String::new(),
        };
        assert_eq!(rule(Chain::Input).direction(), Direction::Inbound);
        assert_eq!(rule(Chain::Forward).direction(), Direction::Internal);
        assert_eq!(rule(Chain::Output).direction(), Direction::Outbound);
    }

    #[test]
    fn severity_derives_from_target() {
        let rule = |target| FirewallRule {
            key: RuleKey {
                chain: Chain::Input,
                ordinal: 1,
            },
            display_id: String::new(),
            target,
            protocol: "tcp".into(),
            source: ANY_ADDR.into(),
            destination: ANY_ADDR.into(),
            summary: String::new(),
        };
        assert_eq!(rule(RuleTarget::Drop).severity(), RuleSeverity::High);
        assert_eq!(rule(RuleTarget::Reject).severity(), RuleSeverity::Medium);
        assert_eq!(rule(RuleTarget::Accept).severity(), RuleSeverity::Low);
        assert_eq!(
            rule(RuleTarget::Other("LOG".into())).severity(),
            RuleSeverity::Low
        );
    }

    #[test]
    fn spec_serializes_port_as_string() {
        let spec = RuleSpec {
            chain: Chain::Input,
            target: RuleTarget::Accept,
            protocol: "tcp".into(),
            port: 80,
            source: "10.0.0.5".into(),
            destination: "192.168.1.10".into(),
        };
        let req = spec.to_request();
        assert_eq!(req.chain, "INPUT");
        assert_eq!(req.target, "ACCEPT");
        assert_eq!(req.port, "80");
    }
}
