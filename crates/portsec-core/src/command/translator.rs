// ── Intent translator ──
//
// Validation happens entirely in `plan()`, before anything reaches the
// device. `run()` sends a plan line by line and stops at the first failure,
// keeping what the device printed so far. Already-applied lines are not
// rolled back.

use std::sync::Arc;

use tracing::{debug, warn};

use portsec_api::{SessionHandle, Transport};

use crate::error::CoreError;
use crate::model::{InterfaceName, PortSecurityAction, PortSecurityIntent};

use super::{CiscoIos, CommandSet};

const MAX_INTERFACE_LEN: usize = 64;

/// Validated command sequence for one intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandPlan {
    pub commands: Vec<String>,
    /// Acknowledgement shown when every command succeeds.
    pub summary: String,
}

/// What a successful plan produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub summary: String,
    /// Device output, one block per command that printed anything.
    pub transcript: String,
}

/// Builds and runs command plans for one command set.
#[derive(Clone)]
pub struct Translator {
    commands: Arc<dyn CommandSet>,
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(Arc::new(CiscoIos))
    }
}

impl std::fmt::Debug for Translator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Translator")
            .field("commands", &self.commands.name())
            .finish()
    }
}

impl Translator {
    pub fn new(commands: Arc<dyn CommandSet>) -> Self {
        Self { commands }
    }

    pub fn command_set(&self) -> &dyn CommandSet {
        self.commands.as_ref()
    }

    // ── Planning ─────────────────────────────────────────────────────

    /// Validate `intent` and build its command sequence.
    pub fn plan(&self, intent: &PortSecurityIntent) -> Result<CommandPlan, CoreError> {
        let interface = &intent.interface;
        validate_interface(interface)?;
        let set = self.command_set();

        let plan = match intent.action {
            PortSecurityAction::Enable { max_mac, violation } => {
                let maximum = max_mac.unwrap_or_else(|| set.default_maximum());
                let bound = set.max_secure_addresses();
                if maximum == 0 || maximum > bound {
                    return Err(CoreError::validation(format!(
                        "max_mac must be between 1 and {bound}, got {maximum}"
                    )));
                }
                let violation = violation.unwrap_or_else(|| set.default_violation());
                CommandPlan {
                    commands: set.enable(interface, maximum, violation),
                    summary: format!(
                        "Port security enabled on {interface} with max MAC addresses: {maximum}, violation action: {violation}"
                    ),
                }
            }
            PortSecurityAction::Disable => CommandPlan {
                commands: set.disable(interface),
                summary: format!("Port security disabled on {interface}"),
            },
            PortSecurityAction::Clear => CommandPlan {
                commands: set.clear(interface),
                summary: format!("Port security cleared on {interface}"),
            },
            PortSecurityAction::Status => CommandPlan {
                commands: set.status(interface),
                summary: format!("Port security status for {interface}"),
            },
        };
        Ok(plan)
    }

    // ── Execution ────────────────────────────────────────────────────

    /// Validate and run `intent` against an open transport session.
    pub async fn execute(
        &self,
        transport: &mut dyn Transport,
        handle: SessionHandle,
        intent: &PortSecurityIntent,
    ) -> Result<CommandOutput, CoreError> {
        let plan = self.plan(intent)?;
        let transcript = self.run(transport, handle, &plan.commands).await?;
        Ok(CommandOutput {
            summary: plan.summary,
            transcript,
        })
    }

    /// Send `commands` in order, returning the joined device output.
    ///
    /// On the first transport error or device rejection the sequence stops
    /// and the error carries the output collected up to that point. If the
    /// failure left the device in configuration mode, the exit command is
    /// sent on a best-effort basis.
    pub async fn run(
        &self,
        transport: &mut dyn Transport,
        handle: SessionHandle,
        commands: &[String],
    ) -> Result<String, CoreError> {
        let set = self.command_set();
        let mut collected: Vec<String> = Vec::with_capacity(commands.len());
        let mut in_config = false;

        for command in commands {
            debug!(%handle, command = %command, "sending");
            let failure = match transport.send(handle, command).await {
                Err(e) => CoreError::from(e),
                Ok(output) => {
                    if let Some(reason) = set.rejection(&output) {
                        CoreError::Rejected {
                            command: command.clone(),
                            reason: reason.to_string(),
                            partial_output: String::new(),
                        }
                    } else {
                        if command == set.enter_config() {
                            in_config = true;
                        } else if command == set.exit_config() {
                            in_config = false;
                        }
                        if !output.trim().is_empty() {
                            collected.push(output);
                        }
                        continue;
                    }
                }
            };

            warn!(%handle, command = %command, error = %failure, "command sequence aborted");
            if in_config && !matches!(failure, CoreError::Transport { .. }) {
                if let Err(e) = transport.send(handle, set.exit_config()).await {
                    debug!(error = %e, "could not leave configuration mode");
                }
            }
            return Err(failure.with_partial_output(collected.join("\n")));
        }

        Ok(collected.join("\n"))
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Interface names in device order.
    pub async fn interfaces(
        &self,
        transport: &mut dyn Transport,
        handle: SessionHandle,
    ) -> Result<Vec<InterfaceName>, CoreError> {
        let set = self.command_set();
        let output = self.run(transport, handle, &[set.inventory()]).await?;
        Ok(set.parse_inventory(&output))
    }

    /// Raw device description.
    pub async fn version(
        &self,
        transport: &mut dyn Transport,
        handle: SessionHandle,
    ) -> Result<String, CoreError> {
        let command = self.command_set().version();
        self.run(transport, handle, &[command]).await
    }
}

fn validate_interface(interface: &InterfaceName) -> Result<(), CoreError> {
    let name = interface.as_str();
    if name.is_empty() {
        return Err(CoreError::validation("interface is required"));
    }
    if name.len() > MAX_INTERFACE_LEN {
        return Err(CoreError::validation(format!(
            "interface name longer than {MAX_INTERFACE_LEN} characters"
        )));
    }
    if name.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(CoreError::validation(format!(
            "interface name '{}' contains whitespace or control characters",
            name.escape_debug()
        )));
    }
    Ok(())
}
