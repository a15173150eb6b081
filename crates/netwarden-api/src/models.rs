// Backend wire types
//
// Models for the security backend's JSON responses. Fields use
// `#[serde(default)]` liberally because the backend is inconsistent about
// field presence, and unknown fields land in an `extra` catch-all so new
// backend versions never break decoding.

use serde::{Deserialize, Deserializer, Serialize};

// ── System stats ─────────────────────────────────────────────────────

/// Response from `GET /api/system/stats`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemStatsResponse {
    #[serde(default)]
    pub cpu: f64,
    #[serde(default)]
    pub memory_percent: f64,
    #[serde(default)]
    pub memory_used_mb: f64,
    #[serde(default)]
    pub memory_total_mb: f64,
    /// Uptime in seconds.
    #[serde(default)]
    pub uptime: u64,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub processes: u64,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── IDS status ───────────────────────────────────────────────────────

/// Response from `GET /suricata/status`: a free-text systemd-style status
/// blob that the core parses via labeled-field extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdsStatusResponse {
    #[serde(default)]
    pub status: String,
}

/// Response from `GET /suricata/threat-log`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatLogResponse {
    #[serde(default)]
    pub log: String,
}

// ── Events ───────────────────────────────────────────────────────────

/// Response from `GET /suricata/events`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsResponse {
    #[serde(default)]
    pub events: Vec<RawEvent>,
}

/// A severity value as it appears on the wire: the backend emits numbers,
/// the alert stream sometimes emits names. Anything else deserializes to
/// absent rather than failing the whole record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawSeverity {
    Numeric(f64),
    Named(String),
}

/// Lenient severity field: numbers and strings pass through, any other
/// JSON shape (object, bool, ...) degrades to `None`.
fn de_raw_severity<'de, D>(deserializer: D) -> Result<Option<RawSeverity>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64().map(RawSeverity::Numeric),
        serde_json::Value::String(s) => Some(RawSeverity::Named(s)),
        _ => None,
    })
}

/// One event record from the IDS event feed. All fields are optional on
/// the wire; normalization in the core supplies defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default, deserialize_with = "de_raw_severity")]
    pub severity: Option<RawSeverity>,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub src_ip: Option<String>,
    #[serde(default)]
    pub dest_ip: Option<String>,
    #[serde(default)]
    pub proto: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Alert stream ─────────────────────────────────────────────────────

/// A timestamp as the alert stream delivers it: epoch milliseconds or a
/// datetime string, depending on the producer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Millis(i64),
    Text(String),
}

/// One record from the append-ordered alert stream. Each push delivers
/// the entire current set; the core treats it as a full replacement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawAlert {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<RawTimestamp>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "de_raw_severity")]
    pub severity: Option<RawSeverity>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Firewall ─────────────────────────────────────────────────────────

/// One rule as dumped by the backend. The backend's rule storage is
/// ordinal: `num` is the rule's 1-based position within its chain and the
/// only handle a delete can address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRule {
    #[serde(default)]
    pub num: Option<u32>,
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub prot: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    /// Trailing match text (e.g. `"tcp dpt:22"`).
    #[serde(default)]
    pub extra: Option<String>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

/// One chain's dump: default policy plus its ordered rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChainDump {
    #[serde(default)]
    pub policy: String,
    #[serde(default)]
    pub rules: Vec<RawRule>,
}

/// The three iptables chains the backend exposes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChainsDump {
    #[serde(default, rename = "INPUT")]
    pub input: Option<ChainDump>,
    #[serde(default, rename = "OUTPUT")]
    pub output: Option<ChainDump>,
    #[serde(default, rename = "FORWARD")]
    pub forward: Option<ChainDump>,
}

/// Response shape shared by `GET /firewall/stats` and `GET /firewall/rules`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FirewallSnapshotResponse {
    #[serde(default)]
    pub chains: ChainsDump,
    #[serde(default, rename = "blockedIPs")]
    pub blocked_ips: u64,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Body for `POST /firewall/rules`. The backend expects `port` as a
/// string, matching its CLI-oriented rule builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRuleRequest {
    pub chain: String,
    pub target: String,
    pub protocol: String,
    pub port: String,
    pub source: String,
    pub destination: String,
}

/// Response from `POST /firewall/block-ip`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockIpResponse {
    #[serde(default)]
    pub message: String,
}

// ── ML status ────────────────────────────────────────────────────────

/// Response from `GET /ml/status`: detection-model quality metrics plus
/// training metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MlStatusResponse {
    #[serde(default)]
    pub accuracy: f64,
    #[serde(default)]
    pub precision: f64,
    #[serde(default)]
    pub recall: f64,
    #[serde(default)]
    pub f1_score: f64,
    #[serde(default)]
    pub last_trained: Option<String>,
    #[serde(default)]
    pub training_samples: Option<u64>,
    #[serde(default)]
    pub model_version: Option<String>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Error body ───────────────────────────────────────────────────────

/// The backend's error envelope: `{ "error": "..." }`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}
