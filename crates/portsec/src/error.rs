//! CLI error types with miette diagnostics.
//!
//! Session operations report failure as `ExecutionResult { success: false }`;
//! the command handlers lift those into these errors so the process exits
//! with a meaningful code.

use miette::Diagnostic;
use thiserror::Error;

use portsec_config::ConfigError;
use portsec_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to the switch")]
    #[diagnostic(
        code(portsec::connection_failed),
        help(
            "{detail}\n\
             Check the address and credentials, or try the mock: portsec --mode mock interfaces"
        )
    )]
    ConnectionFailed { detail: String },

    #[error("Not connected to switch")]
    #[diagnostic(code(portsec::not_connected), help("Run `connect` first."))]
    NotConnected,

    // ── Switch commands ──────────────────────────────────────────────
    #[error("{action} failed")]
    #[diagnostic(code(portsec::command_failed), help("{output}"))]
    CommandFailed { action: String, output: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(portsec::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(portsec::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: portsec config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Config file already exists at {path}")]
    #[diagnostic(code(portsec::config_exists), help("Use --force to overwrite it."))]
    ConfigExists { path: String },

    #[error(transparent)]
    #[diagnostic(code(portsec::config))]
    Config(ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::NotConnected => exit_code::CONNECTION,
            Self::Validation { .. } | Self::ConfigExists { .. } => exit_code::USAGE,
            Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::CommandFailed { .. } | Self::Config(_) | Self::Io(_) => exit_code::GENERAL,
        }
    }
}

// ── Upstream error mapping ───────────────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::UnknownProfile { name } => Self::ProfileNotFound {
                name,
                available: "(run `portsec config show`)".into(),
            },
            other => Self::Config(other),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotConnected => Self::NotConnected,
            CoreError::ConnectionFailed { .. } | CoreError::AlreadyConnected { .. } => {
                Self::ConnectionFailed {
                    detail: err.to_string(),
                }
            }
            CoreError::ValidationFailed { message } => Self::Validation {
                field: "input".into(),
                reason: message,
            },
            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::Transport { .. } | CoreError::Rejected { .. } => Self::CommandFailed {
                action: "Switch command".into(),
                output: err.to_string(),
            },
        }
    }
}
