// Shared transport surface for talking to a switch.
//
// Both the mock switch and the vty line session implement `Transport`,
// so callers hold a `Box<dyn Transport>` and never branch on which
// variant is behind it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use secrecy::SecretString;

use crate::error::Error;

/// Port used when an address carries no explicit port.
pub const DEFAULT_VTY_PORT: u16 = 23;

static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

/// Opaque token for one open device session.
///
/// Issued by [`Transport::open`] and required by every subsequent
/// `send`/`close` call on the same transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionHandle(u64);

impl SessionHandle {
    pub(crate) fn next() -> Self {
        Self(NEXT_HANDLE.fetch_add(1, Ordering::Relaxed))
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which transport implementation is behind a `dyn Transport`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum TransportKind {
    Mock,
    Vty,
}

/// Capability surface every switch transport provides.
///
/// A transport holds at most one open session. Commands are plain text
/// lines; the returned string is whatever the device printed in response,
/// without the trailing prompt that marked the command complete. A command
/// that prints nothing comes back either empty (vty) or as a single
/// prompt-and-command echo line (mock). Callers treat output as free text
/// and recognise failures only by the command set's rejection lines.
#[async_trait]
pub trait Transport: Send {
    fn kind(&self) -> TransportKind;

    /// Open an administrative session to `address`.
    async fn open(&mut self, address: &str) -> Result<SessionHandle, Error>;

    /// Send one command line and collect the device's response.
    async fn send(&mut self, handle: SessionHandle, command: &str) -> Result<String, Error>;

    /// Release the session. Closing an unknown handle is not an error.
    async fn close(&mut self, handle: SessionHandle) -> Result<(), Error>;
}

/// Login and timing settings shared by real transports.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub username: String,
    pub password: SecretString,
    /// Secret for privileged EXEC. Falls back to `password` when unset.
    pub enable_secret: Option<SecretString>,
    /// Bound applied to connect, login, and every command exchange.
    pub timeout: Duration,
    pub default_port: u16,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            username: "admin".into(),
            password: SecretString::from("admin".to_string()),
            enable_secret: None,
            timeout: Duration::from_secs(30),
            default_port: DEFAULT_VTY_PORT,
        }
    }
}

/// Split `address` into host and port.
///
/// Accepts `host`, `host:port`, `[v6]:port`, and bare IPv6 literals.
pub fn split_address(address: &str, default_port: u16) -> Result<(String, u16), Error> {
    let address = address.trim();
    if address.is_empty() {
        return Err(Error::InvalidAddress {
            address: address.into(),
            reason: "address is empty".into(),
        });
    }

    if let Ok(sock) = address.parse::<std::net::SocketAddr>() {
        return Ok((sock.ip().to_string(), sock.port()));
    }
    if let Ok(ip) = address.parse::<std::net::IpAddr>() {
        return Ok((ip.to_string(), default_port));
    }

    match address.rsplit_once(':') {
        Some((host, port)) => {
            let port = port.parse::<u16>().map_err(|_| Error::InvalidAddress {
                address: address.into(),
                reason: format!("invalid port '{port}'"),
            })?;
            let host = host.trim_start_matches('[').trim_end_matches(']');
            if host.is_empty() {
                return Err(Error::InvalidAddress {
                    address: address.into(),
                    reason: "missing host".into(),
                });
            }
            Ok((host.to_string(), port))
        }
        None => Ok((address.to_string(), default_port)),
    }
}
