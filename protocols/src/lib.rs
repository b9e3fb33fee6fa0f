//! Wire helpers for line-oriented CLI sessions.
//!
//! * **[`telnet`]**: strips option negotiation out of the byte stream and builds replies.
//! * **[`prompt`]**: classifies what the device is currently asking for and cleans
//!   command output.

pub mod prompt;
pub mod telnet;
