// ── Runtime switch configuration ──
//
// Describes *which* switch to talk to and *how*. Carries credentials and
// connection tuning but never touches disk: the CLI (via portsec-config)
// builds a `SwitchConfig` and hands it to the session.

use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use portsec_api::{DEFAULT_VTY_PORT, TransportConfig};

/// Which transport variant a session opens on `connect`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SwitchMode {
    /// Deterministic in-memory switch. Default, as the control panel ships
    /// with mock mode enabled.
    #[default]
    Mock,
    /// Remote administrative session over the switch's vty line.
    Real,
}

/// Configuration for a single switch.
#[derive(Debug, Clone, Serialize)]
pub struct SwitchConfig {
    pub mode: SwitchMode,
    /// Host name or IP, optionally with `:port`.
    pub address: String,
    /// Port used when `address` carries none.
    pub port: u16,
    pub username: String,
    #[serde(skip)]
    pub password: SecretString,
    /// Privileged EXEC secret; the login password is reused when absent.
    #[serde(skip)]
    pub enable_secret: Option<SecretString>,
    /// Connect and per-command timeout.
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
}

impl Default for SwitchConfig {
    fn default() -> Self {
        Self {
            mode: SwitchMode::Mock,
            address: "192.168.1.1".into(),
            port: DEFAULT_VTY_PORT,
            username: "admin".into(),
            password: SecretString::from("admin".to_string()),
            enable_secret: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl SwitchConfig {
    /// Mock-mode config with everything else defaulted.
    pub fn mock() -> Self {
        Self::default()
    }

    /// Real-mode config targeting `address`.
    pub fn real(address: impl Into<String>) -> Self {
        Self {
            mode: SwitchMode::Real,
            address: address.into(),
            ..Self::default()
        }
    }

    /// Transport tuning derived from this config.
    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            username: self.username.clone(),
            password: self.password.clone(),
            enable_secret: self.enable_secret.clone(),
            timeout: self.timeout,
            default_port: self.port,
        }
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn defaults_follow_control_panel() {
        let cfg = SwitchConfig::default();
        assert_eq!(cfg.mode, SwitchMode::Mock);
        assert_eq!(cfg.address, "192.168.1.1");
        assert_eq!(cfg.username, "admin");
        assert_eq!(cfg.password.expose_secret(), "admin");
        assert_eq!(cfg.timeout, Duration::from_secs(30));
    }

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!("REAL".parse::<SwitchMode>().unwrap(), SwitchMode::Real);
        assert_eq!("mock".parse::<SwitchMode>().unwrap(), SwitchMode::Mock);
        assert!("ssh".parse::<SwitchMode>().is_err());
        assert_eq!(SwitchMode::Real.to_string(), "real");
    }

    #[test]
    fn serialized_config_omits_secrets() {
        let json = serde_json::to_value(SwitchConfig::real("10.0.0.2")).unwrap();
        assert_eq!(json["mode"], "real");
        assert_eq!(json["timeout"], 30);
        assert!(json.get("password").is_none());
        assert!(json.get("enable_secret").is_none());
    }

    #[test]
    fn transport_config_carries_tuning() {
        let mut cfg = SwitchConfig::real("10.0.0.2");
        cfg.port = 2323;
        cfg.timeout = Duration::from_secs(5);
        let transport = cfg.transport_config();
        assert_eq!(transport.default_port, 2323);
        assert_eq!(transport.timeout, Duration::from_secs(5));
        assert_eq!(transport.password.expose_secret(), "admin");
    }
}
