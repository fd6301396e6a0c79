//! Switch session and port-security command engine.
//!
//! This crate sits between `portsec-api` (how bytes reach a switch) and
//! front ends such as the `portsec` CLI:
//!
//! - **[`SwitchSession`]** owns the connection lifecycle to one switch.
//!   [`connect()`](SwitchSession::connect),
//!   [`execute()`](SwitchSession::execute) and friends serialise on one
//!   async mutex and always return an [`ExecutionResult`] rather than an
//!   error, logging each attempt.
//!
//! - **[`Translator`]** validates a [`PortSecurityIntent`] and turns it into
//!   the command lines of a [`CommandSet`] ([`CiscoIos`] by default), then
//!   runs them through the session's transport.
//!
//! - **[`LogStore`]** is the bounded, thread-safe operator log that callers
//!   may poll while commands run.
//!
//! - **[`SwitchConfig`]** selects mock or real mode and carries the target
//!   address and credentials. It never touches disk.

pub mod command;
pub mod config;
pub mod error;
pub mod model;
pub mod session;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{CiscoIos, CommandOutput, CommandPlan, CommandSet, PortSecurityRequest, Translator};
pub use config::{SwitchConfig, SwitchMode};
pub use error::CoreError;
pub use model::{
    ExecutionResult, InterfaceName, LogEntry, LogLevel, PortSecurityAction, PortSecurityIntent,
    ViolationAction,
};
pub use session::{SessionState, SwitchSession, TransportFactory, default_transport};
pub use store::{LOG_CAPACITY, LogStore};
