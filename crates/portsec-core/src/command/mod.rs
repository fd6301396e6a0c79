// ── Command translation ──
//
// Port-security intents become ordered device command lines here. The
// vendor dialect sits behind `CommandSet`; `Translator` validates intents,
// builds plans, and runs them through whatever transport the session holds.

pub mod ios;
pub mod requests;
mod translator;

use crate::model::{InterfaceName, ViolationAction};

pub use ios::CiscoIos;
pub use requests::PortSecurityRequest;
pub use translator::{CommandOutput, CommandPlan, Translator};

/// One vendor's command dialect for port security.
///
/// Implementations are pure: they build command strings and interpret
/// device output but never perform I/O.
pub trait CommandSet: Send + Sync {
    fn name(&self) -> &'static str;

    /// Highest secure MAC limit the platform accepts.
    fn max_secure_addresses(&self) -> u32;

    /// Limit applied when an enable intent carries none.
    fn default_maximum(&self) -> u32;

    fn default_violation(&self) -> ViolationAction {
        ViolationAction::Shutdown
    }

    fn enable(&self, interface: &InterfaceName, maximum: u32, violation: ViolationAction) -> Vec<String>;
    fn disable(&self, interface: &InterfaceName) -> Vec<String>;
    fn clear(&self, interface: &InterfaceName) -> Vec<String>;
    fn status(&self, interface: &InterfaceName) -> Vec<String>;

    /// Command listing every interface.
    fn inventory(&self) -> String;
    fn parse_inventory(&self, output: &str) -> Vec<InterfaceName>;

    /// Command describing the device (model, software).
    fn version(&self) -> String;

    /// Command that enters configuration mode.
    fn enter_config(&self) -> &'static str;
    /// Command that returns to privileged EXEC from any config sub-mode.
    fn exit_config(&self) -> &'static str;

    /// The device's error line, if `output` reports a rejected command.
    fn rejection<'a>(&self, output: &'a str) -> Option<&'a str>;
}
