//! Opcode table and frame-level reader/writer for the Tscreen stream
//!
//! Every command except end-of-stream is `[opcode][length][payload]`.
//! End-of-stream is the single byte `0xFF` with nothing after it.

use crate::ProtocolError;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use tracing::trace;

/// Largest payload a single frame can declare
pub const MAX_PAYLOAD_LEN: usize = u8::MAX as usize;

/// One-byte command tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Setup,
    DrawChar,
    DrawLine,
    RenderText,
    /// Reserved, no defined effect
    CursorMove,
    /// Reserved, no defined effect
    DrawAtCursor,
    ClearScreen,
    EndOfStream,
    Unknown(u8),
}

impl From<u8> for Opcode {
    fn from(byte: u8) -> Self {
        match byte {
            0x01 => Opcode::Setup,
            0x02 => Opcode::DrawChar,
            0x03 => Opcode::DrawLine,
            0x04 => Opcode::RenderText,
            0x05 => Opcode::CursorMove,
            0x06 => Opcode::DrawAtCursor,
            0x07 => Opcode::ClearScreen,
            0xFF => Opcode::EndOfStream,
            other => Opcode::Unknown(other),
        }
    }
}

impl From<Opcode> for u8 {
    fn from(opcode: Opcode) -> Self {
        match opcode {
            Opcode::Setup => 0x01,
            Opcode::DrawChar => 0x02,
            Opcode::DrawLine => 0x03,
            Opcode::RenderText => 0x04,
            Opcode::CursorMove => 0x05,
            Opcode::DrawAtCursor => 0x06,
            Opcode::ClearScreen => 0x07,
            Opcode::EndOfStream => 0xFF,
            Opcode::Unknown(byte) => byte,
        }
    }
}

/// One decoded `(opcode, payload)` unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub opcode: Opcode,
    pub payload: Bytes,
}

impl Frame {
    pub fn new(opcode: Opcode, payload: impl Into<Bytes>) -> Self {
        Self {
            opcode,
            payload: payload.into(),
        }
    }

    pub fn end_of_stream() -> Self {
        Self::new(Opcode::EndOfStream, Bytes::new())
    }

    pub fn is_end_of_stream(&self) -> bool {
        self.opcode == Opcode::EndOfStream
    }

    /// Encode the frame in wire format.
    ///
    /// End-of-stream is written as the bare marker byte; any payload it
    /// carries is dropped.
    pub fn encode(&self, buf: &mut BytesMut) -> Result<(), ProtocolError> {
        if self.is_end_of_stream() {
            buf.put_u8(self.opcode.into());
            return Ok(());
        }

        if self.payload.len() > MAX_PAYLOAD_LEN {
            return Err(ProtocolError::PayloadTooLarge(self.payload.len()));
        }

        buf.put_u8(self.opcode.into());
        buf.put_u8(self.payload.len() as u8);
        buf.extend_from_slice(&self.payload);
        Ok(())
    }
}

/// Pulls frames off a byte cursor one at a time.
///
/// The reader consumes the full declared payload of every frame, including
/// frames with unknown opcodes, so the next read always starts on a frame
/// boundary.
#[derive(Debug, Clone)]
pub struct FrameReader {
    buf: Bytes,
    offset: usize,
    failed: bool,
}

impl FrameReader {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            buf: data.into(),
            offset: 0,
            failed: false,
        }
    }

    /// Bytes consumed so far
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes not yet consumed
    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    /// Read the next frame.
    ///
    /// Returns `Ok(None)` once the input is exhausted on a frame boundary.
    /// A missing length byte or a payload shorter than declared is a
    /// [`ProtocolError::Truncated`] and leaves the cursor where it failed.
    pub fn next_frame(&mut self) -> Result<Option<Frame>, ProtocolError> {
        if !self.buf.has_remaining() {
            return Ok(None);
        }

        let opcode = Opcode::from(self.buf.get_u8());
        self.offset += 1;

        if opcode == Opcode::EndOfStream {
            trace!(offset = self.offset, "end-of-stream marker");
            return Ok(Some(Frame::end_of_stream()));
        }

        if !self.buf.has_remaining() {
            self.failed = true;
            return Err(ProtocolError::Truncated {
                offset: self.offset,
                needed: 1,
                available: 0,
            });
        }

        let length = self.buf.get_u8() as usize;
        self.offset += 1;

        if self.buf.remaining() < length {
            self.failed = true;
            return Err(ProtocolError::Truncated {
                offset: self.offset,
                needed: length,
                available: self.buf.remaining(),
            });
        }

        let payload = self.buf.split_to(length);
        self.offset += length;
        trace!(?opcode, length, offset = self.offset, "frame");

        Ok(Some(Frame { opcode, payload }))
    }
}

impl Iterator for FrameReader {
    type Item = Result<Frame, ProtocolError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        self.next_frame().transpose()
    }
}
