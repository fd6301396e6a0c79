use thiserror::Error;

/// Top-level error type for the `portsec-api` crate.
///
/// Covers every failure mode of a switch transport: reaching the device,
/// logging in, and exchanging command lines. `portsec-core` maps these into
/// connection-time or command-time errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Reachability ────────────────────────────────────────────────
    /// The address could not be parsed into a host and port.
    #[error("Invalid switch address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    /// TCP connect failed (refused, unreachable, DNS failure, etc.)
    #[error("Cannot reach {address}: {reason}")]
    Unreachable { address: String, reason: String },

    // ── Authentication ──────────────────────────────────────────────
    /// Login or privilege elevation was rejected by the device.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Session ─────────────────────────────────────────────────────
    /// An operation did not complete within the configured timeout.
    #[error("Timed out after {timeout_secs}s waiting for {operation}")]
    Timeout {
        operation: String,
        timeout_secs: u64,
    },

    /// The device closed the channel or the connection was reset.
    #[error("Connection closed by device: {reason}")]
    ConnectionClosed { reason: String },

    /// Low-level socket error while the session was open.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A command was sent with a handle this transport did not issue,
    /// or after the session was closed.
    #[error("No open session for handle {handle}")]
    UnknownSession { handle: u64 },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::ConnectionClosed { .. } | Self::Unreachable { .. } => true,
            Self::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
                    | std::io::ErrorKind::BrokenPipe
                    | std::io::ErrorKind::TimedOut
            ),
            _ => false,
        }
    }

    /// Returns `true` if the device rejected our credentials.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }
}
