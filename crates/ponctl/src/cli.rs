//! Clap derive structures for the `ponctl` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use ponctl_core::{HttpMethod, TransportKind, ValueKind};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// ponctl -- one operation surface for multi-vendor OLTs
#[derive(Debug, Parser)]
#[command(
    name = "ponctl",
    version,
    about = "Read, walk and configure OLTs over SNMP or vendor HTTP APIs",
    long_about = "Protocol-agnostic operations against multi-vendor GPON OLTs.\n\n\
        Each element is reached over the transports its model supports, with\n\
        retry and failover, and every operation lands in the audit log.",
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
    /// Configuration file (defaults to the platform config dir)
    #[arg(long, short = 'c', env = "PONCTL_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format (defaults to `defaults.output` from the config)
    #[arg(long, short = 'o', env = "PONCTL_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Per-attempt timeout, e.g. `2s` or `500ms` (overrides the config)
    #[arg(long, short = 't', value_parser = humantime::parse_duration, global = true)]
    pub timeout: Option<Duration>,

    /// Answer SNMP from a recorded MIB snapshot (JSON) instead of the network
    #[arg(long, env = "PONCTL_MIB_SNAPSHOT", global = true)]
    pub mib_snapshot: Option<PathBuf>,

    /// Audit log file (overrides the config)
    #[arg(long, env = "PONCTL_AUDIT_LOG", global = true)]
    pub audit_log: Option<PathBuf>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

/// Transport choice on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Via {
    Snmp,
    Http,
}

impl From<Via> for TransportKind {
    fn from(via: Via) -> Self {
        match via {
            Via::Snmp => TransportKind::Snmp,
            Via::Http => TransportKind::Http,
        }
    }
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Read one management object
    #[command(alias = "get")]
    Read(ReadArgs),

    /// Enumerate every object under a subtree root
    Walk(WalkArgs),

    /// Write one management object
    Set(SetArgs),

    /// Call a vendor HTTP endpoint
    Invoke(InvokeArgs),

    /// Query the operation audit log
    Audit(AuditArgs),

    /// Show the projected state of an element's ONTs
    Onts(OntsArgs),

    /// Show the transports a dispatch to an element would try
    Plan(PlanArgs),

    /// List the capability table
    #[command(alias = "caps")]
    Capabilities(CapabilitiesArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Operation commands ───────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ReadArgs {
    /// Element id from the config
    pub element: String,

    /// Object identifier (dotted numeric)
    pub oid: String,

    /// Force a transport when the model supports it
    #[arg(long)]
    pub via: Option<Via>,
}

#[derive(Debug, Args)]
pub struct WalkArgs {
    /// Element id from the config
    pub element: String,

    /// Subtree root (dotted numeric)
    pub root: String,

    /// Force a transport when the model supports it
    #[arg(long)]
    pub via: Option<Via>,
}

#[derive(Debug, Args)]
pub struct SetArgs {
    /// Element id from the config
    pub element: String,

    /// Object identifier (dotted numeric)
    pub oid: String,

    /// New value, interpreted according to `--type`
    pub value: String,

    /// Value type: integer, counter, gauge, time_ticks, float, text, bytes,
    /// object_id, ip_address, json, null
    #[arg(long = "type", short = 'T', default_value = "integer", value_parser = parse_value_kind)]
    pub kind: ValueKind,

    /// Force a transport when the model supports it
    #[arg(long)]
    pub via: Option<Via>,
}

#[derive(Debug, Args)]
pub struct InvokeArgs {
    /// Element id from the config
    pub element: String,

    /// Endpoint path below the model's API prefix
    pub path: String,

    /// HTTP method
    #[arg(long, short = 'X', default_value = "GET", value_parser = parse_http_method)]
    pub method: HttpMethod,

    /// Inline JSON request body
    #[arg(long, short = 'd', conflicts_with = "body_file")]
    pub body: Option<String>,

    /// Read the JSON request body from a file
    #[arg(long)]
    pub body_file: Option<PathBuf>,
}

// ── Inspection commands ──────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AuditArgs {
    /// Only entries for this element
    #[arg(long, short = 'e')]
    pub element: Option<String>,

    /// Only entries newer than this: a duration (`1h`, `30m`) or RFC 3339 time
    #[arg(long, short = 's')]
    pub since: Option<String>,

    /// Maximum entries, newest first
    #[arg(long, short = 'l', default_value = "50")]
    pub limit: usize,
}

#[derive(Debug, Args)]
pub struct OntsArgs {
    /// Element id from the config
    pub element: String,

    /// Walk the vendor's monitored columns first to refresh the state
    #[arg(long, short = 'r')]
    pub refresh: bool,
}

#[derive(Debug, Args)]
pub struct PlanArgs {
    /// Element id from the config
    pub element: String,

    /// Apply a per-request transport preference
    #[arg(long)]
    pub via: Option<Via>,
}

#[derive(Debug, Args)]
pub struct CapabilitiesArgs {
    /// Only models of this vendor
    #[arg(long)]
    pub vendor: Option<String>,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}

// ── Value parsers ────────────────────────────────────────────────────

fn parse_value_kind(raw: &str) -> Result<ValueKind, String> {
    raw.parse().map_err(|_| format!("unknown value type '{raw}'"))
}

fn parse_http_method(raw: &str) -> Result<HttpMethod, String> {
    raw.parse().map_err(|_| format!("unsupported HTTP method '{raw}'"))
}
