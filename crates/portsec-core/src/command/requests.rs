// ── Loose port-security requests ──
//
// The shape a request layer receives (form fields, JSON bodies, shell
// arguments): plain strings and signed numbers. `TryFrom` turns one into a
// `PortSecurityIntent` or a validation error.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::{InterfaceName, PortSecurityAction, PortSecurityIntent, ViolationAction};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortSecurityRequest {
    pub interface: String,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_mac: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub violation_action: Option<String>,
}

impl TryFrom<&PortSecurityRequest> for PortSecurityIntent {
    type Error = CoreError;

    fn try_from(req: &PortSecurityRequest) -> Result<Self, Self::Error> {
        let interface = InterfaceName::new(req.interface.trim());

        let action = match req.action.trim().to_ascii_lowercase().as_str() {
            "enable" => {
                let max_mac = req
                    .max_mac
                    .map(|n| {
                        u32::try_from(n).ok().filter(|n| *n > 0).ok_or_else(|| {
                            CoreError::validation(format!("max_mac must be a positive integer, got {n}"))
                        })
                    })
                    .transpose()?;
                let violation = req
                    .violation_action
                    .as_deref()
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(|v| {
                        v.parse::<ViolationAction>().map_err(|_| {
                            CoreError::validation(format!(
                                "violation_action must be shutdown, restrict or protect, got '{v}'"
                            ))
                        })
                    })
                    .transpose()?;
                PortSecurityAction::Enable { max_mac, violation }
            }
            other => {
                let action = match other {
                    "disable" => PortSecurityAction::Disable,
                    "clear" => PortSecurityAction::Clear,
                    "status" => PortSecurityAction::Status,
                    _ => {
                        return Err(CoreError::validation(format!(
                            "Unknown action: {}",
                            req.action
                        )));
                    }
                };
                if req.max_mac.is_some() || req.violation_action.is_some() {
                    return Err(CoreError::validation(format!(
                        "max_mac and violation_action apply only to enable, not {other}"
                    )));
                }
                action
            }
        };

        Ok(Self { interface, action })
    }
}

impl TryFrom<PortSecurityRequest> for PortSecurityIntent {
    type Error = CoreError;

    fn try_from(req: PortSecurityRequest) -> Result<Self, Self::Error> {
        Self::try_from(&req)
    }
}
