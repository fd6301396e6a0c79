//! Switch transports for portsec.
//!
//! Everything that actually reaches a device lives here, behind the
//! [`Transport`] capability trait:
//!
//! - **[`MockTransport`]** - deterministic in-memory switch. Never fails to
//!   open, answers IOS-style commands from simulated port state.
//! - **[`VtyTransport`]** - line-oriented administrative session over TCP
//!   with telnet negotiation, login, privilege elevation, and a bounded
//!   timeout on every exchange.
//!
//! `portsec-core` picks one per connect and maps [`Error`] into its own
//! connection-time or command-time errors.

pub mod error;
pub mod mock;
mod telnet;
pub mod transport;
pub mod vty;

pub use error::Error;
pub use mock::{MOCK_HOSTNAME, MockJournal, MockTransport};
pub use transport::{DEFAULT_VTY_PORT, SessionHandle, Transport, TransportConfig, TransportKind};
pub use vty::VtyTransport;
