//! Clap derive structures for the `portsec` CLI.
//!
//! Defines the command tree, global flags, and shared value enums. Kept
//! free of workspace crates so `build.rs` can include it for man pages.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// portsec -- switch port-security control
#[derive(Debug, Parser)]
#[command(
    name = "portsec",
    version,
    about = "Configure switch port security from the command line",
    long_about = "Enable, disable, clear and inspect port security on a switch.\n\n\
        Runs against a built-in mock switch by default; use --mode real with\n\
        --address to drive a switch over its vty line.",
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
    /// Switch profile to use
    #[arg(long, short = 'p', env = "PORTSEC_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Switch mode (overrides profile)
    #[arg(long, short = 'm', env = "PORTSEC_MODE", global = true)]
    pub mode: Option<ModeArg>,

    /// Switch host or IP, optionally host:port (overrides profile)
    #[arg(long, short = 'a', env = "PORTSEC_ADDRESS", global = true)]
    pub address: Option<String>,

    /// Login username (overrides profile)
    #[arg(long, short = 'u', env = "PORTSEC_USERNAME", global = true)]
    pub username: Option<String>,

    /// Login password
    #[arg(long, env = "PORTSEC_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Prompt for the login password
    #[arg(long, global = true, conflicts_with = "password")]
    pub ask_password: bool,

    /// Connect and per-command timeout in seconds (overrides profile)
    #[arg(long, env = "PORTSEC_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "PORTSEC_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Print the session log to stderr after the command
    #[arg(long, global = true)]
    pub show_log: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Value Enums ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Built-in simulated switch
    Mock,
    /// Real switch over its vty line
    Real,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ViolationArg {
    /// Err-disable the port
    Shutdown,
    /// Drop and count offending frames
    Restrict,
    /// Drop offending frames silently
    Protect,
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

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List switch interfaces
    #[command(alias = "ifaces", alias = "i")]
    Interfaces,

    /// Enable port security on an interface
    Enable(EnableArgs),

    /// Disable port security on an interface
    Disable(InterfaceArgs),

    /// Clear learned sticky MAC addresses and violations on an interface
    Clear(InterfaceArgs),

    /// Show the port-security report for an interface
    #[command(alias = "st")]
    Status(InterfaceArgs),

    /// Show switch model and software version
    Info,

    /// Interactive session keeping one connection open
    #[command(alias = "sh")]
    Shell,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Port-security arguments ──────────────────────────────────────────

#[derive(Debug, Args)]
pub struct InterfaceArgs {
    /// Interface name, e.g. Gi0/1 or GigabitEthernet0/1
    pub interface: String,
}

#[derive(Debug, Args)]
pub struct EnableArgs {
    /// Interface name, e.g. Gi0/1 or GigabitEthernet0/1
    pub interface: String,

    /// Maximum secure MAC addresses (switch default when omitted)
    #[arg(long, short = 'n', allow_hyphen_values = true)]
    pub max_mac: Option<i64>,

    /// Action taken when the limit is exceeded
    #[arg(long)]
    pub violation: Option<ViolationArg>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration (secrets redacted)
    Show,

    /// Print the config file path
    Path,

    /// Write a starter config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
