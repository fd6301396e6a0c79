// Cisco IOS (Catalyst access switch) port-security dialect.

use crate::model::{InterfaceName, ViolationAction};

use super::CommandSet;

const MAX_SECURE_ADDRESSES: u32 = 132;
const DEFAULT_MAXIMUM: u32 = 1;

#[derive(Debug, Clone, Copy, Default)]
pub struct CiscoIos;

impl CommandSet for CiscoIos {
    fn name(&self) -> &'static str {
        "cisco-ios"
    }

    fn max_secure_addresses(&self) -> u32 {
        MAX_SECURE_ADDRESSES
    }

    fn default_maximum(&self) -> u32 {
        DEFAULT_MAXIMUM
    }

    fn enable(&self, interface: &InterfaceName, maximum: u32, violation: ViolationAction) -> Vec<String> {
        vec![
            self.enter_config().to_string(),
            format!("interface {interface}"),
            // Port security is refused on dynamic ports.
            "switchport mode access".to_string(),
            "switchport port-security".to_string(),
            format!("switchport port-security maximum {maximum}"),
            format!("switchport port-security violation {violation}"),
            self.exit_config().to_string(),
        ]
    }

    fn disable(&self, interface: &InterfaceName) -> Vec<String> {
        vec![
            self.enter_config().to_string(),
            format!("interface {interface}"),
            "no switchport port-security".to_string(),
            self.exit_config().to_string(),
        ]
    }

    fn clear(&self, interface: &InterfaceName) -> Vec<String> {
        vec![format!("clear port-security sticky interface {interface}")]
    }

    fn status(&self, interface: &InterfaceName) -> Vec<String> {
        vec![format!("show port-security interface {interface}")]
    }

    fn inventory(&self) -> String {
        "show interfaces status".to_string()
    }

    /// First column of every row under the `Port` header.
    fn parse_inventory(&self, output: &str) -> Vec<InterfaceName> {
        output
            .lines()
            .filter_map(|line| line.split_whitespace().next())
            .filter(|first| {
                !first.eq_ignore_ascii_case("port")
                    && first.starts_with(|c: char| c.is_ascii_alphabetic())
                    && first.contains(|c: char| c.is_ascii_digit())
            })
            .map(InterfaceName::from)
            .collect()
    }

    fn version(&self) -> String {
        "show version".to_string()
    }

    fn enter_config(&self) -> &'static str {
        "configure terminal"
    }

    fn exit_config(&self) -> &'static str {
        "end"
    }

    fn rejection<'a>(&self, output: &'a str) -> Option<&'a str> {
        output
            .lines()
            .map(str::trim)
            .find(|line| line.starts_with('%'))
    }
}
