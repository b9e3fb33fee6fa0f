use tracing::trace;

pub const IAC: u8 = 255;
pub const DONT: u8 = 254;
pub const DO: u8 = 253;
pub const WONT: u8 = 252;
pub const WILL: u8 = 251;
pub const SB: u8 = 250;
pub const SE: u8 = 240;

pub const OPT_ECHO: u8 = 1;
pub const OPT_SGA: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    #[default]
    Data,
    Iac,
    Negotiate(u8),
    Sub,
    SubIac,
}

/// Output of one [`TelnetDecoder::feed`] call.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Decoded {
    /// Application bytes with every telnet command removed.
    pub data: Vec<u8>,
    /// Negotiation replies to write back to the peer.
    pub replies: Vec<u8>,
}

/// Incremental telnet stream decoder.
///
/// Commands may be split across reads, so the parser state survives between
/// calls. Only echo and suppress-go-ahead are accepted; every other option the
/// peer offers or requests is refused.
#[derive(Debug, Default)]
pub struct TelnetDecoder {
    state: State,
}

impl TelnetDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, input: &[u8]) -> Decoded {
        let mut out: Decoded = Decoded::default();

        for &byte in input {
            self.state = match (self.state, byte) {
                (State::Data, IAC) => State::Iac,
                (State::Data, b) => {
                    out.data.push(b);
                    State::Data
                }
                (State::Iac, IAC) => {
                    out.data.push(IAC);
                    State::Data
                }
                (State::Iac, DO | DONT | WILL | WONT) => State::Negotiate(byte),
                (State::Iac, SB) => State::Sub,
                (State::Iac, _) => State::Data,
                (State::Negotiate(verb), option) => {
                    if let Some(reply) = reply_to(verb, option) {
                        trace!(verb, option, reply = reply[1], "telnet negotiation");
                        out.replies.extend_from_slice(&reply);
                    }
                    State::Data
                }
                (State::Sub, IAC) => State::SubIac,
                (State::Sub, _) => State::Sub,
                (State::SubIac, SE) => State::Data,
                (State::SubIac, _) => State::Sub,
            };
        }

        out
    }
}

fn reply_to(verb: u8, option: u8) -> Option<[u8; 3]> {
    let answer: u8 = match (verb, option) {
        (WILL, OPT_ECHO | OPT_SGA) => DO,
        (WILL, _) => DONT,
        (DO, OPT_SGA) => WILL,
        (DO, _) => WONT,
        _ => return None,
    };
    Some([IAC, answer, option])
}

/// Encodes one command line, doubling literal IAC bytes.
pub fn encode_line(line: &str) -> Vec<u8> {
    let mut buffer: Vec<u8> = Vec::with_capacity(line.len() + 2);
    for &byte in line.as_bytes() {
        if byte == IAC {
            buffer.push(IAC);
        }
        buffer.push(byte);
    }
    buffer.extend_from_slice(b"\r\n");
    buffer
}
