use bytes::{BufMut, Bytes, BytesMut};
use tscreen_protocol::{Command, Frame, Opcode};

/// Builds command streams for tests, including malformed ones
#[derive(Debug, Default)]
pub struct StreamBuilder {
    buf: BytesMut,
}

impl StreamBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn command(mut self, command: Command) -> Self {
        command
            .to_frame()
            .encode(&mut self.buf)
            .expect("test command fits in a frame");
        self
    }

    pub fn setup(self, width: u8, height: u8, color_mode: u8) -> Self {
        self.command(Command::Setup {
            width,
            height,
            color_mode,
        })
    }

    pub fn draw_char(self, x: u8, y: u8, attr: u8, ch: u8) -> Self {
        self.command(Command::DrawChar { x, y, attr, ch })
    }

    pub fn draw_line(self, (x1, y1): (u8, u8), (x2, y2): (u8, u8), attr: u8, ch: u8) -> Self {
        self.command(Command::DrawLine {
            x1,
            y1,
            x2,
            y2,
            attr,
            ch,
        })
    }

    pub fn text(self, x: u8, y: u8, attr: u8, text: &str) -> Self {
        self.command(Command::RenderText {
            x,
            y,
            attr,
            text: Bytes::copy_from_slice(text.as_bytes()),
        })
    }

    pub fn clear(self) -> Self {
        self.command(Command::ClearScreen)
    }

    pub fn end(self) -> Self {
        self.command(Command::EndOfStream)
    }

    /// A frame with an arbitrary opcode byte and payload
    pub fn frame(mut self, opcode: u8, payload: &[u8]) -> Self {
        Frame::new(Opcode::from(opcode), payload.to_vec())
            .encode(&mut self.buf)
            .expect("test frame fits");
        self
    }

    /// Raw bytes appended as-is, for truncated or trailing garbage
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.buf.put_slice(bytes);
        self
    }

    pub fn build(self) -> Bytes {
        self.buf.freeze()
    }
}
