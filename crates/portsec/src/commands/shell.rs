//! Interactive shell: one long-lived session driven by stdin lines.
//!
//! Unlike the one-shot commands, the shell never connects on its own;
//! the operator issues `connect`, works, and `quit`s. Mode and address
//! changes go through `set_config`, so a mode switch tears down the link.

use std::io::{IsTerminal, Write};

use tokio::io::{AsyncBufReadExt, BufReader};

use portsec_core::{
    CoreError, ExecutionResult, InterfaceName, PortSecurityRequest, SwitchMode, SwitchSession,
};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

const DEFAULT_LOG_LINES: usize = 50;

const HELP: &str = "\
Commands:
  connect                          open the switch session
  disconnect                       close the switch session
  mode <mock|real>                 switch transport (disconnects)
  address <host[:port]>            set the switch address
  interfaces                       list switch interfaces
  enable <if> [max] [violation]    enable port security
  disable <if>                     disable port security
  clear <if>                       clear sticky MACs and violations
  status <if>                      show port-security report
  info                             show switch model and version
  logs [n]                         show the last n log entries (default 50)
  clear-logs                       empty the session log
  config                           show the session configuration
  state                            show the connection state
  help                             show this help
  quit | exit                      leave the shell";

// ── Parsing ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
enum ShellCommand {
    Connect,
    Disconnect,
    Mode(SwitchMode),
    Address(String),
    Interfaces,
    PortSecurity(PortSecurityRequest),
    Info,
    Logs(usize),
    ClearLogs,
    Config,
    State,
    Help,
    Quit,
    Empty,
}

fn parse_line(line: &str) -> Result<ShellCommand, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(ShellCommand::Empty);
    };
    let rest: Vec<&str> = words.collect();

    let command = match head.to_ascii_lowercase().as_str() {
        "connect" => ShellCommand::Connect,
        "disconnect" => ShellCommand::Disconnect,
        "mode" => {
            let [mode] = rest.as_slice() else {
                return Err("usage: mode <mock|real>".into());
            };
            let mode = mode
                .parse::<SwitchMode>()
                .map_err(|_| format!("unknown mode '{mode}', expected mock or real"))?;
            return Ok(ShellCommand::Mode(mode));
        }
        "address" => {
            let [address] = rest.as_slice() else {
                return Err("usage: address <host[:port]>".into());
            };
            return Ok(ShellCommand::Address((*address).to_string()));
        }
        "interfaces" => ShellCommand::Interfaces,
        "enable" => {
            let (interface, tail) = rest
                .split_first()
                .ok_or_else(|| "usage: enable <interface> [max] [violation]".to_string())?;
            if tail.len() > 2 {
                return Err("usage: enable <interface> [max] [violation]".into());
            }
            let max_mac = tail
                .first()
                .map(|n| n.parse::<i64>().map_err(|_| format!("max must be a number, got '{n}'")))
                .transpose()?;
            return Ok(ShellCommand::PortSecurity(PortSecurityRequest {
                interface: (*interface).to_string(),
                action: "enable".into(),
                max_mac,
                violation_action: tail.get(1).map(|v| (*v).to_string()),
            }));
        }
        action @ ("disable" | "clear" | "status") => {
            let [interface] = rest.as_slice() else {
                return Err(format!("usage: {action} <interface>"));
            };
            return Ok(ShellCommand::PortSecurity(PortSecurityRequest {
                interface: (*interface).to_string(),
                action: action.to_string(),
                ..PortSecurityRequest::default()
            }));
        }
        "info" => ShellCommand::Info,
        "logs" => {
            let n = match rest.as_slice() {
                [] => DEFAULT_LOG_LINES,
                [n] => n.parse().map_err(|_| format!("logs takes a count, got '{n}'"))?,
                _ => return Err("usage: logs [n]".into()),
            };
            return Ok(ShellCommand::Logs(n));
        }
        "clear-logs" => ShellCommand::ClearLogs,
        "config" => ShellCommand::Config,
        "state" => ShellCommand::State,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => return Err(format!("unknown command '{other}', try 'help'")),
    };

    if rest.is_empty() {
        Ok(command)
    } else {
        Err(format!("'{head}' takes no arguments"))
    }
}

// ── Loop ────────────────────────────────────────────────────────────

pub async fn handle(session: &SwitchSession, global: &GlobalOpts) -> Result<(), CliError> {
    let interactive = std::io::stdin().is_terminal();
    let color = output::should_color(&global.color);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        if interactive {
            prompt(session);
        }
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_line(&line) {
            Ok(ShellCommand::Quit) => break,
            Ok(command) => run(session, command, color).await,
            Err(message) => eprintln!("error: {message}"),
        }
    }

    if session.is_connected() {
        session.disconnect().await;
    }
    Ok(())
}

fn prompt(session: &SwitchSession) {
    let mut stderr = std::io::stderr().lock();
    let _ = write!(stderr, "portsec({})> ", session.state());
    let _ = stderr.flush();
}

async fn run(session: &SwitchSession, command: ShellCommand, color: bool) {
    match command {
        ShellCommand::Connect => report(&session.connect().await),
        ShellCommand::Disconnect => report(&session.disconnect().await),
        ShellCommand::Mode(mode) => {
            let mut config = session.config();
            config.mode = mode;
            session.set_config(config).await;
            println!("Mode: {mode}");
        }
        ShellCommand::Address(address) => {
            let mut config = session.config();
            config.address = address;
            session.set_config(config).await;
            println!("Address: {}", session.config().address);
        }
        ShellCommand::Interfaces => match interface_listing(session.list_interfaces().await) {
            Ok(names) => names.iter().for_each(|name| println!("{name}")),
            Err(message) => eprintln!("error: {message}"),
        },
        ShellCommand::PortSecurity(request) => report(&session.execute_request(&request).await),
        ShellCommand::Info => report(&session.device_info().await),
        ShellCommand::Logs(n) => output::print_log(&session.recent_logs(n), color),
        ShellCommand::ClearLogs => {
            session.clear_logs();
            println!("Log cleared");
        }
        ShellCommand::Config => {
            let config = session.config();
            println!(
                "mode: {}\naddress: {}\nport: {}\nusername: {}\ntimeout: {}s",
                config.mode,
                config.address,
                config.port,
                config.username,
                config.timeout.as_secs()
            );
        }
        ShellCommand::State => println!("{}", session.state()),
        ShellCommand::Help => println!("{HELP}"),
        ShellCommand::Quit | ShellCommand::Empty => {}
    }
}

/// Disconnected shells show an empty list; any other failure is reported.
fn interface_listing(listed: Result<Vec<InterfaceName>, CoreError>) -> Result<Vec<InterfaceName>, String> {
    match listed {
        Ok(names) => Ok(names),
        Err(CoreError::NotConnected) => Ok(Vec::new()),
        Err(e) => Err(format!("Failed to get interfaces: {e}")),
    }
}

fn report(result: &ExecutionResult) {
    if result.success {
        if !result.output.is_empty() {
            println!("{}", result.output);
        }
    } else {
        eprintln!("error: {}", result.output);
    }
}
