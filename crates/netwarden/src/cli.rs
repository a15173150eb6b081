//! Clap derive structures for the `netwarden` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// netwarden -- security-dashboard core for the command line
#[derive(Debug, Parser)]
#[command(
    name = "netwarden",
    version,
    about = "Query and steer a network-security backend from the command line",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend base URL (overrides the config file)
    #[arg(long, short = 'c', env = "NETWARDEN_BACKEND", global = true)]
    pub backend: Option<String>,

    /// Explicit config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'o', default_value = "table", global = true)]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, default_value = "10", global = true)]
    pub timeout: u64,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show backend status: system, IDS, firewall, model, source health
    #[command(alias = "st")]
    Status,

    /// List IDS events with filtering and paging
    #[command(alias = "ev")]
    Events(EventsArgs),

    /// Manage firewall rules
    #[command(alias = "r")]
    Rules(RulesArgs),

    /// Block a single IP address
    BlockIp(BlockIpArgs),

    /// Poll continuously and re-render a status summary
    Watch(WatchArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Events ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct EventsArgs {
    /// Server-side event type (alert, dns, http, tls, flow, fileinfo)
    #[arg(long = "type", default_value = "alert")]
    pub event_type: String,

    /// Time window: 1h, 24h, 7d, all
    #[arg(long, default_value = "24h")]
    pub range: String,

    /// Case-insensitive substring search
    #[arg(long)]
    pub search: Option<String>,

    /// Severity band filter (low, medium, high, critical); `all` disables
    #[arg(long, default_value = "all")]
    pub severity: String,

    /// Page number (1-indexed, clamped)
    #[arg(long, default_value = "1")]
    pub page: usize,

    /// Items per page (defaults to the configured page size)
    #[arg(long)]
    pub page_size: Option<usize>,
}

// ── Rules ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RulesArgs {
    #[command(subcommand)]
    pub command: RulesCommand,
}

#[derive(Debug, Subcommand)]
pub enum RulesCommand {
    /// List rules from the latest poll
    List(RulesListArgs),

    /// Add a rule from free text, e.g.
    /// `netwarden rules add block traffic from 10.0.0.0/8 port 23`
    Add(RulesAddArgs),

    /// Delete the rule at a chain ordinal from the latest poll
    Delete(RulesDeleteArgs),
}

#[derive(Debug, Args)]
pub struct RulesListArgs {
    /// Direction filter (inbound, outbound, internal); `all` disables
    #[arg(long, default_value = "all")]
    pub direction: String,

    /// Page number (1-indexed, clamped)
    #[arg(long, default_value = "1")]
    pub page: usize,

    /// Items per page (defaults to the configured page size)
    #[arg(long)]
    pub page_size: Option<usize>,
}

#[derive(Debug, Args)]
pub struct RulesAddArgs {
    /// The rule request in plain words (joined with spaces)
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
}

#[derive(Debug, Args)]
pub struct RulesDeleteArgs {
    /// Chain name (INPUT, OUTPUT, FORWARD)
    pub chain: String,

    /// 1-based rule position within the chain, from the latest listing
    pub ordinal: u32,
}

// ── Block IP ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct BlockIpArgs {
    /// The address to block
    pub ip: String,
}

// ── Watch ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Seconds between re-renders
    #[arg(long, default_value = "5")]
    pub interval: u64,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
