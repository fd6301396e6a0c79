// Client side of telnet option negotiation.
//
// Switch vty lines open with a burst of IAC sequences. We strip them from
// the data stream and answer conservatively: accept the server's ECHO and
// SGA offers, refuse everything else.

const IAC: u8 = 255; // Interpret As Command
const DONT: u8 = 254;
const DO: u8 = 253;
const WONT: u8 = 252;
const WILL: u8 = 251;
const SB: u8 = 250; // Subnegotiation begin
const SE: u8 = 240; // Subnegotiation end

const ECHO: u8 = 1;
const SGA: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Data,
    Iac,
    Option(u8),
    Sub,
    SubIac,
}

/// Incremental IAC filter. Feed raw socket bytes, get plain data back plus
/// any negotiation replies that must be written to the peer.
#[derive(Debug)]
pub(crate) struct TelnetFilter {
    state: State,
}

impl Default for TelnetFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl TelnetFilter {
    pub(crate) fn new() -> Self {
        Self { state: State::Data }
    }

    /// Strip telnet commands from `input`, appending data bytes to `data`
    /// and negotiation replies to `reply`.
    pub(crate) fn feed(&mut self, input: &[u8], data: &mut Vec<u8>, reply: &mut Vec<u8>) {
        for &byte in input {
            self.state = match (self.state, byte) {
                (State::Data, IAC) => State::Iac,
                (State::Data, b) => {
                    data.push(b);
                    State::Data
                }
                // Escaped 0xFF data byte
                (State::Iac, IAC) => {
                    data.push(IAC);
                    State::Data
                }
                (State::Iac, cmd @ (WILL | WONT | DO | DONT)) => State::Option(cmd),
                (State::Iac, SB) => State::Sub,
                (State::Iac, _) => State::Data,
                (State::Option(cmd), opt) => {
                    if let Some(answer) = answer(cmd, opt) {
                        reply.extend_from_slice(&[IAC, answer, opt]);
                    }
                    State::Data
                }
                (State::Sub, IAC) => State::SubIac,
                (State::Sub, _) => State::Sub,
                (State::SubIac, SE) => State::Data,
                (State::SubIac, _) => State::Sub,
            };
        }
    }
}

fn answer(cmd: u8, opt: u8) -> Option<u8> {
    match cmd {
        WILL if opt == ECHO || opt == SGA => Some(DO),
        WILL => Some(DONT),
        DO => Some(WONT),
        // WONT/DONT need no acknowledgement from us.
        _ => None,
    }
}
