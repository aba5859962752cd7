//! Binary command stream for Tscreen
//!
//! Decodes the length-prefixed screen command stream into frames and typed
//! commands, and encodes commands back into the same wire format.

pub mod command;
pub mod protocol;

pub use command::{encode_commands, Command};
pub use protocol::{Frame, FrameReader, Opcode, MAX_PAYLOAD_LEN};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Truncated stream at offset {offset}: needed {needed} bytes, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("Payload too large: {0} bytes (max 255)")]
    PayloadTooLarge(usize),
}

/// A frame whose payload lacks the fixed fields of its command
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Payload of {opcode:?} too short: expected at least {expected} bytes, got {actual}")]
pub struct ShortPayload {
    pub opcode: Opcode,
    pub expected: usize,
    pub actual: usize,
}
