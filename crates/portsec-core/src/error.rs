// ── Core error types ──
//
// User-facing errors from portsec-core. Consumers never see socket errors
// or telnet details directly: the `From<portsec_api::Error>` impl turns
// transport failures into command-time errors, and connect-time failures
// are wrapped explicitly by the session.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Session state ────────────────────────────────────────────────
    #[error("Not connected to switch")]
    NotConnected,

    #[error("Already connected to {address}; disconnect first")]
    AlreadyConnected { address: String },

    #[error("Cannot connect to switch at {address}: {reason}")]
    ConnectionFailed { address: String, reason: String },

    // ── Intent errors ────────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── Command errors ───────────────────────────────────────────────
    /// The channel to the device failed mid-command. `partial_output`
    /// holds whatever earlier commands in the sequence printed.
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        retryable: bool,
        partial_output: String,
    },

    /// The device answered a command with an error line.
    #[error("Switch rejected '{command}': {reason}")]
    Rejected {
        command: String,
        reason: String,
        partial_output: String,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
        }
    }

    /// Output collected before a multi-command sequence failed.
    pub fn partial_output(&self) -> Option<&str> {
        match self {
            Self::Transport { partial_output, .. } | Self::Rejected { partial_output, .. } => {
                Some(partial_output.as_str()).filter(|s| !s.is_empty())
            }
            _ => None,
        }
    }

    /// Returns `true` if retrying the same operation might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { retryable: true, .. })
    }

    /// Attach already-collected sequence output to a command error.
    pub(crate) fn with_partial_output(mut self, collected: String) -> Self {
        match &mut self {
            Self::Transport { partial_output, .. } | Self::Rejected { partial_output, .. } => {
                *partial_output = collected;
            }
            _ => {}
        }
        self
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<portsec_api::Error> for CoreError {
    fn from(err: portsec_api::Error) -> Self {
        CoreError::Transport {
            retryable: err.is_transient(),
            message: err.to_string(),
            partial_output: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_timeout_maps_to_retryable() {
        let err: CoreError = portsec_api::Error::Timeout {
            operation: "response to 'show version'".into(),
            timeout_secs: 30,
        }
        .into();
        assert!(err.is_retryable());
        assert!(err.to_string().contains("Timed out after 30s"));
    }

    #[test]
    fn authentication_maps_to_non_retryable() {
        let err: CoreError = portsec_api::Error::Authentication {
            message: "bad password".into(),
        }
        .into();
        assert!(!err.is_retryable());
    }

    #[test]
    fn partial_output_only_when_non_empty() {
        let err = CoreError::Rejected {
            command: "interface Gi9/9".into(),
            reason: "% Invalid input".into(),
            partial_output: String::new(),
        };
        assert_eq!(err.partial_output(), None);

        let err = err.with_partial_output("SW#configure terminal".into());
        assert_eq!(err.partial_output(), Some("SW#configure terminal"));
        assert_eq!(CoreError::NotConnected.partial_output(), None);
    }
}
