// In-memory switch simulator.
//
// Answers IOS-style command lines deterministically with no I/O, keeping
// per-port security state so that a sequence of commands within one
// session behaves like a real access switch would.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use crate::error::Error;
use crate::transport::{SessionHandle, Transport, TransportKind};

pub const MOCK_HOSTNAME: &str = "MOCK-CISCO-SWITCH";

const MAX_SECURE_ADDRESSES: u32 = 132;
const INVALID_INPUT: &str = "% Invalid input detected at '^' marker.";
const INCOMPLETE: &str = "% Incomplete command.";

// ── Simulated device ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkStatus {
    Connected,
    NotConnect,
    ErrDisabled,
}

impl LinkStatus {
    fn as_str(self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::NotConnect => "notconnect",
            Self::ErrDisabled => "err-disabled",
        }
    }
}

#[derive(Debug, Clone)]
struct MockPort {
    name: &'static str,
    description: &'static str,
    link: LinkStatus,
    vlan: u16,
    port_security: bool,
    maximum: u32,
    violation: &'static str,
    sticky: Vec<String>,
    violations: u32,
}

impl MockPort {
    #[allow(clippy::too_many_arguments)]
    fn new(
        name: &'static str,
        description: &'static str,
        link: LinkStatus,
        vlan: u16,
        port_security: bool,
        maximum: u32,
        violation: &'static str,
        sticky: &[&str],
    ) -> Self {
        Self {
            name,
            description,
            link,
            vlan,
            port_security,
            maximum,
            violation,
            sticky: sticky.iter().map(|m| (*m).to_string()).collect(),
            violations: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Exec,
    Config,
    Interface(usize),
}

/// A five-port Catalyst-style access switch.
#[derive(Debug, Clone)]
struct MockSwitch {
    ports: Vec<MockPort>,
    mode: Mode,
}

impl MockSwitch {
    fn new() -> Self {
        use LinkStatus::{Connected, ErrDisabled, NotConnect};

        Self {
            ports: vec![
                MockPort::new("Gi0/1", "AdminPC", Connected, 10, true, 2, "shutdown", &["00:11:22:33:44:55"]),
                MockPort::new("Gi0/2", "HR-PC", NotConnect, 20, false, 1, "restrict", &[]),
                MockPort::new(
                    "Gi0/3",
                    "Camera",
                    Connected,
                    30,
                    true,
                    3,
                    "protect",
                    &["00:AA:BB:CC:DD:EE", "00:FF:FF:FF:FF:FF"],
                ),
                MockPort::new("Gi0/4", "", ErrDisabled, 1, false, 1, "shutdown", &[]),
                MockPort::new("Gi0/5", "", Connected, 1, true, 1, "restrict", &["00:12:34:56:78:90"]),
            ],
            mode: Mode::Exec,
        }
    }

    fn prompt(&self) -> String {
        match self.mode {
            Mode::Exec => format!("{MOCK_HOSTNAME}#"),
            Mode::Config => format!("{MOCK_HOSTNAME}(config)#"),
            Mode::Interface(_) => format!("{MOCK_HOSTNAME}(config-if)#"),
        }
    }

    /// Resolve a long or abbreviated interface name to a port index.
    fn port(&self, name: &str) -> Result<usize, &'static str> {
        let wanted = abbreviate(name);
        self.ports
            .iter()
            .position(|p| p.name.eq_ignore_ascii_case(&wanted))
            .ok_or(INVALID_INPUT)
    }

    /// Run one command line and return what the device prints.
    fn execute(&mut self, line: &str) -> String {
        let line = line.trim();
        let echo = format!("{}{line}", self.prompt());
        let words: Vec<&str> = line.split_whitespace().collect();

        let reply = match (self.mode, words.as_slice()) {
            (_, []) => Ok(String::new()),

            // ── Privileged EXEC ──────────────────────────────────────
            (Mode::Exec, ["configure" | "conf", "terminal" | "t"]) => {
                self.mode = Mode::Config;
                Ok(echo)
            }
            (Mode::Exec, ["terminal", "length", _]) => Ok(String::new()),
            (Mode::Exec, ["show", "version"]) => Ok(self.show_version()),
            (Mode::Exec, ["show", "interfaces", "status"]) => Ok(self.show_interfaces_status()),
            (Mode::Exec, ["show", "port-security", "interface", name]) => self
                .port(name)
                .map(|idx| self.show_port_security(idx)),
            (Mode::Exec, ["clear", "port-security", "sticky", "interface", name]) => {
                self.port(name).map(|idx| {
                    let port = &mut self.ports[idx];
                    port.sticky.clear();
                    port.violations = 0;
                    if port.link == LinkStatus::ErrDisabled {
                        port.link = LinkStatus::Connected;
                    }
                    echo
                })
            }

            // ── Global configuration ─────────────────────────────────
            (Mode::Config | Mode::Interface(_), ["interface", name]) => {
                self.port(name).map(|idx| {
                    self.mode = Mode::Interface(idx);
                    echo
                })
            }
            (Mode::Config | Mode::Interface(_), ["end"]) => {
                self.mode = Mode::Exec;
                Ok(echo)
            }
            (Mode::Config, ["exit"]) => {
                self.mode = Mode::Exec;
                Ok(echo)
            }

            // ── Interface configuration ──────────────────────────────
            (Mode::Interface(_), ["exit"]) => {
                self.mode = Mode::Config;
                Ok(echo)
            }
            (Mode::Interface(_), ["switchport", "mode", "access"]) => Ok(echo),
            (Mode::Interface(idx), ["switchport", "port-security"]) => {
                self.ports[idx].port_security = true;
                Ok(echo)
            }
            (Mode::Interface(_), ["switchport", "port-security", "maximum" | "violation"]) => {
                Err(INCOMPLETE)
            }
            (Mode::Interface(idx), ["switchport", "port-security", "maximum", value]) => {
                match value.parse::<u32>() {
                    Ok(n) if (1..=MAX_SECURE_ADDRESSES).contains(&n) => {
                        self.ports[idx].maximum = n;
                        Ok(echo)
                    }
                    _ => Err(INVALID_INPUT),
                }
            }
            (Mode::Interface(idx), ["switchport", "port-security", "violation", action]) => {
                match *action {
                    "shutdown" => Ok("shutdown"),
                    "restrict" => Ok("restrict"),
                    "protect" => Ok("protect"),
                    _ => Err(INVALID_INPUT),
                }
                .map(|violation| {
                    self.ports[idx].violation = violation;
                    echo
                })
            }
            (Mode::Interface(idx), ["no", "switchport", "port-security"]) => {
                let port = &mut self.ports[idx];
                port.port_security = false;
                port.sticky.clear();
                Ok(echo)
            }

            _ => Err(INVALID_INPUT),
        };

        reply.unwrap_or_else(ToString::to_string)
    }

    fn show_version(&self) -> String {
        [
            "Cisco IOS Software, C2960 Software (C2960-LANBASEK9-M), Version 15.0(2)SE11, RELEASE SOFTWARE (fc3)".to_string(),
            format!("{MOCK_HOSTNAME} uptime is 1 day, 2 hours, 30 minutes"),
            format!(
                "cisco WS-C2960-24TT-L (PowerPC405) processor with 65536K bytes of memory.\n\
                 {} Gigabit Ethernet interfaces",
                self.ports.len()
            ),
            "Model number                    : WS-C2960-24TT-L".to_string(),
        ]
        .join("\n")
    }

    fn show_interfaces_status(&self) -> String {
        let mut lines = vec![format!(
            "{:<9} {:<18} {:<12} {:<10} {:<7} {:<6} {}",
            "Port", "Name", "Status", "Vlan", "Duplex", "Speed", "Type"
        )];
        for port in &self.ports {
            let (duplex, speed) = if port.link == LinkStatus::Connected {
                ("a-full", "a-1000")
            } else {
                ("auto", "auto")
            };
            lines.push(format!(
                "{:<9} {:<18} {:<12} {:<10} {:<7} {:<6} {}",
                port.name,
                port.description,
                port.link.as_str(),
                port.vlan,
                duplex,
                speed,
                "10/100/1000BaseTX"
            ));
        }
        lines.join("\n")
    }

    fn show_port_security(&self, idx: usize) -> String {
        let port = &self.ports[idx];
        let status = match (port.port_security, port.link) {
            (false, _) | (true, LinkStatus::NotConnect) => "Secure-down",
            (true, LinkStatus::ErrDisabled) => "Secure-shutdown",
            (true, LinkStatus::Connected) => "Secure-up",
        };
        let last_source = port.sticky.last().map_or_else(
            || "0000.0000.0000:0".to_string(),
            |mac| format!("{}:{}", dotted_mac(mac), port.vlan),
        );

        [
            field("Port Security", if port.port_security { "Enabled" } else { "Disabled" }),
            field("Port Status", status),
            field("Violation Mode", &capitalize(port.violation)),
            field("Aging Time", "0 mins"),
            field("Aging Type", "Absolute"),
            field("SecureStatic Address Aging", "Disabled"),
            field("Maximum MAC Addresses", &port.maximum.to_string()),
            field("Total MAC Addresses", &port.sticky.len().to_string()),
            field("Configured MAC Addresses", "0"),
            field("Sticky MAC Addresses", &port.sticky.len().to_string()),
            field("Last Source Address:Vlan", &last_source),
            field("Security Violation Count", &port.violations.to_string()),
        ]
        .join("\n")
    }
}

/// `GigabitEthernet0/1` -> `Gi0/1`; already-short names pass through.
fn abbreviate(name: &str) -> String {
    const LONG: &str = "gigabitethernet";
    match (name.get(..LONG.len()), name.get(LONG.len()..)) {
        (Some(prefix), Some(rest)) if prefix.eq_ignore_ascii_case(LONG) && !rest.is_empty() => {
            format!("Gi{rest}")
        }
        _ => name.to_string(),
    }
}

fn field(label: &str, value: &str) -> String {
    format!("{label:<27}: {value}")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// `00:11:22:33:44:55` -> `0011.2233.4455`
fn dotted_mac(mac: &str) -> String {
    let hex: String = mac
        .chars()
        .filter(char::is_ascii_hexdigit)
        .map(|c| c.to_ascii_lowercase())
        .collect();
    hex.as_bytes()
        .chunks(4)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect::<Vec<_>>()
        .join(".")
}

// ── Journal ─────────────────────────────────────────────────────────

/// Shared record of every command line a [`MockTransport`] received.
#[derive(Debug, Clone, Default)]
pub struct MockJournal(Arc<Mutex<Vec<String>>>);

impl MockJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.0.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().is_empty()
    }

    fn record(&self, command: &str) {
        self.0.lock().push(command.to_string());
    }
}

// ── Transport ───────────────────────────────────────────────────────

/// Deterministic transport backed by a simulated switch. `open` never fails.
#[derive(Debug)]
pub struct MockTransport {
    switch: MockSwitch,
    session: Option<SessionHandle>,
    journal: MockJournal,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self::with_journal(MockJournal::new())
    }

    /// Build a transport that records commands into an existing journal.
    pub fn with_journal(journal: MockJournal) -> Self {
        Self {
            switch: MockSwitch::new(),
            session: None,
            journal,
        }
    }

    pub fn journal(&self) -> MockJournal {
        self.journal.clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Mock
    }

    async fn open(&mut self, address: &str) -> Result<SessionHandle, Error> {
        let handle = SessionHandle::next();
        self.switch.mode = Mode::Exec;
        self.session = Some(handle);
        debug!(%handle, address, "mock session opened");
        Ok(handle)
    }

    async fn send(&mut self, handle: SessionHandle, command: &str) -> Result<String, Error> {
        if self.session != Some(handle) {
            return Err(Error::UnknownSession { handle: handle.id() });
        }
        self.journal.record(command);
        Ok(self.switch.execute(command))
    }

    async fn close(&mut self, handle: SessionHandle) -> Result<(), Error> {
        if self.session == Some(handle) {
            self.session = None;
            debug!(%handle, "mock session closed");
        }
        Ok(())
    }
}
