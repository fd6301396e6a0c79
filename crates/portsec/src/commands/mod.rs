//! Command dispatch: bridges CLI args -> session operations -> output formatting.
//!
//! Every one-shot command opens its own connection, runs, and disconnects.
//! `shell` keeps a single session open across many commands.

pub mod config_cmd;
pub mod info;
pub mod interfaces;
pub mod port_security;
pub mod shell;

use portsec_core::{ExecutionResult, SwitchSession};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;
use crate::output;

/// Dispatch a switch-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, session: &SwitchSession, global: &GlobalOpts) -> Result<(), CliError> {
    if let Command::Shell = cmd {
        return shell::handle(session, global).await;
    }

    connect(session).await?;

    let outcome = match cmd {
        Command::Interfaces => interfaces::handle(session, global).await,
        Command::Enable(args) => port_security::enable(session, args, global).await,
        Command::Disable(args) => port_security::disable(session, args, global).await,
        Command::Clear(args) => port_security::clear(session, args, global).await,
        Command::Status(args) => port_security::status(session, args, global).await,
        Command::Info => info::handle(session, global).await,
        // Shell, Config and Completions are handled before the connection opens
        Command::Shell | Command::Config(_) | Command::Completions(_) => Ok(()),
    };

    session.disconnect().await;
    show_log(session, global);
    outcome
}

/// Open the session, turning a failed connect into a connection error.
async fn connect(session: &SwitchSession) -> Result<(), CliError> {
    let result = session.connect().await;
    if result.success {
        return Ok(());
    }
    Err(CliError::ConnectionFailed { detail: result.output })
}

/// Lift a failed `ExecutionResult` into a CLI error, passing successes through.
fn require_success(action: &str, result: ExecutionResult) -> Result<ExecutionResult, CliError> {
    if result.success {
        Ok(result)
    } else {
        Err(CliError::CommandFailed {
            action: action.to_string(),
            output: result.output,
        })
    }
}

fn show_log(session: &SwitchSession, global: &GlobalOpts) {
    if global.show_log {
        output::print_log(&session.logs(), output::should_color(&global.color));
    }
}
