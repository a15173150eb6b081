// ── Command API ──
//
// All write operations flow through a unified `Command` enum, routed by
// the monitor's command processor. Reads never go through the channel —
// they are snapshot loads.

use crate::error::CoreError;
use crate::model::{Chain, RuleSpec};

/// A command envelope sent through the command channel.
/// Contains the command and a oneshot response channel.
pub(crate) struct CommandEnvelope {
    pub command: Command,
    pub response_tx: tokio::sync::oneshot::Sender<Result<CommandResult, CoreError>>,
}

/// All write operations against the security backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a firewall rule from a structured spec.
    AddRule(RuleSpec),
    /// Delete the rule at `(chain, ordinal)` as of the most recent poll.
    /// The handle is validated against the latest catalog before any
    /// network call; stale ordinals fail fast.
    DeleteRule { chain: Chain, ordinal: u32 },
    /// Block a single IP address.
    BlockIp { ip: String },
}

/// Result of a command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    Ok,
    /// Backend confirmation message (block-ip).
    Message(String),
}
