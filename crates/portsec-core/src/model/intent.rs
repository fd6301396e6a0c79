// ── Port-security intents ──
//
// High-level description of a change to one switch port. Parameters that
// only make sense for `Enable` live inside that variant, so an intent can
// never carry a MAC limit for a disable or clear.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

// ── InterfaceName ───────────────────────────────────────────────────

/// Interface identifier as the device reports it (e.g. `Gi0/1`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterfaceName(String);

impl InterfaceName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InterfaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for InterfaceName {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().to_owned()))
    }
}

impl From<&str> for InterfaceName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for InterfaceName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for InterfaceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ── ViolationAction ─────────────────────────────────────────────────

/// What the switch does when a port exceeds its secure MAC limit.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ViolationAction {
    /// Err-disable the port.
    #[default]
    Shutdown,
    /// Drop offending frames and count the violation.
    Restrict,
    /// Drop offending frames silently.
    Protect,
}

// ── Intent ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum PortSecurityAction {
    /// Turn port security on. Absent parameters take the command set's
    /// defaults.
    Enable {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_mac: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        violation: Option<ViolationAction>,
    },
    Disable,
    /// Remove learned sticky addresses and reset violation state.
    Clear,
    /// Read the port's current security report.
    Status,
}

impl PortSecurityAction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Enable { .. } => "enable",
            Self::Disable => "disable",
            Self::Clear => "clear",
            Self::Status => "status",
        }
    }

    /// Whether the action changes device configuration.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Self::Status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortSecurityIntent {
    pub interface: InterfaceName,
    #[serde(flatten)]
    pub action: PortSecurityAction,
}

impl PortSecurityIntent {
    pub fn enable(
        interface: impl Into<InterfaceName>,
        max_mac: Option<u32>,
        violation: Option<ViolationAction>,
    ) -> Self {
        Self {
            interface: interface.into(),
            action: PortSecurityAction::Enable { max_mac, violation },
        }
    }

    pub fn disable(interface: impl Into<InterfaceName>) -> Self {
        Self {
            interface: interface.into(),
            action: PortSecurityAction::Disable,
        }
    }

    pub fn clear(interface: impl Into<InterfaceName>) -> Self {
        Self {
            interface: interface.into(),
            action: PortSecurityAction::Clear,
        }
    }

    pub fn status(interface: impl Into<InterfaceName>) -> Self {
        Self {
            interface: interface.into(),
            action: PortSecurityAction::Status,
        }
    }
}
