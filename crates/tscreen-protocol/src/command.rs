//! Typed view of stream frames

use crate::protocol::{Frame, Opcode};
use crate::{ProtocolError, ShortPayload};
use bytes::{Bytes, BytesMut};

/// A decoded screen command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Setup {
        width: u8,
        height: u8,
        color_mode: u8,
    },
    DrawChar {
        x: u8,
        y: u8,
        attr: u8,
        ch: u8,
    },
    DrawLine {
        x1: u8,
        y1: u8,
        x2: u8,
        y2: u8,
        attr: u8,
        ch: u8,
    },
    RenderText {
        x: u8,
        y: u8,
        attr: u8,
        text: Bytes,
    },
    /// Reserved opcode, payload kept verbatim
    CursorMove(Bytes),
    /// Reserved opcode, payload kept verbatim
    DrawAtCursor(Bytes),
    ClearScreen,
    EndOfStream,
    Unknown {
        opcode: u8,
        payload: Bytes,
    },
}

impl Command {
    /// Interpret a frame's payload according to its opcode.
    ///
    /// Fixed-size fields must all be present; bytes past them are ignored.
    pub fn parse(frame: &Frame) -> Result<Self, ShortPayload> {
        let command = match frame.opcode {
            Opcode::Setup => {
                let [width, height, color_mode] = fields(frame)?;
                Command::Setup {
                    width,
                    height,
                    color_mode,
                }
            }
            Opcode::DrawChar => {
                let [x, y, attr, ch] = fields(frame)?;
                Command::DrawChar { x, y, attr, ch }
            }
            Opcode::DrawLine => {
                let [x1, y1, x2, y2, attr, ch] = fields(frame)?;
                Command::DrawLine {
                    x1,
                    y1,
                    x2,
                    y2,
                    attr,
                    ch,
                }
            }
            Opcode::RenderText => {
                let [x, y, attr] = fields(frame)?;
                Command::RenderText {
                    x,
                    y,
                    attr,
                    text: frame.payload.slice(3..),
                }
            }
            Opcode::CursorMove => Command::CursorMove(frame.payload.clone()),
            Opcode::DrawAtCursor => Command::DrawAtCursor(frame.payload.clone()),
            Opcode::ClearScreen => Command::ClearScreen,
            Opcode::EndOfStream => Command::EndOfStream,
            Opcode::Unknown(opcode) => Command::Unknown {
                opcode,
                payload: frame.payload.clone(),
            },
        };

        Ok(command)
    }

    pub fn opcode(&self) -> Opcode {
        match self {
            Command::Setup { .. } => Opcode::Setup,
            Command::DrawChar { .. } => Opcode::DrawChar,
            Command::DrawLine { .. } => Opcode::DrawLine,
            Command::RenderText { .. } => Opcode::RenderText,
            Command::CursorMove(_) => Opcode::CursorMove,
            Command::DrawAtCursor(_) => Opcode::DrawAtCursor,
            Command::ClearScreen => Opcode::ClearScreen,
            Command::EndOfStream => Opcode::EndOfStream,
            Command::Unknown { opcode, .. } => Opcode::Unknown(*opcode),
        }
    }

    /// Canonical frame for this command
    pub fn to_frame(&self) -> Frame {
        let payload = match self {
            Command::Setup {
                width,
                height,
                color_mode,
            } => Bytes::copy_from_slice(&[*width, *height, *color_mode]),
            Command::DrawChar { x, y, attr, ch } => Bytes::copy_from_slice(&[*x, *y, *attr, *ch]),
            Command::DrawLine {
                x1,
                y1,
                x2,
                y2,
                attr,
                ch,
            } => Bytes::copy_from_slice(&[*x1, *y1, *x2, *y2, *attr, *ch]),
            Command::RenderText { x, y, attr, text } => {
                let mut buf = BytesMut::with_capacity(3 + text.len());
                buf.extend_from_slice(&[*x, *y, *attr]);
                buf.extend_from_slice(text);
                buf.freeze()
            }
            Command::CursorMove(payload)
            | Command::DrawAtCursor(payload)
            | Command::Unknown { payload, .. } => payload.clone(),
            Command::ClearScreen | Command::EndOfStream => Bytes::new(),
        };

        Frame::new(self.opcode(), payload)
    }
}

/// Encode a command sequence into a complete stream
pub fn encode_commands(commands: &[Command]) -> Result<Bytes, ProtocolError> {
    let mut buf = BytesMut::new();
    for command in commands {
        command.to_frame().encode(&mut buf)?;
    }
    Ok(buf.freeze())
}

fn fields<const N: usize>(frame: &Frame) -> Result<[u8; N], ShortPayload> {
    frame
        .payload
        .get(..N)
        .and_then(|head| <[u8; N]>::try_from(head).ok())
        .ok_or(ShortPayload {
            opcode: frame.opcode,
            expected: N,
            actual: frame.payload.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FrameReader;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_setup_ignores_trailing_bytes() {
        let frame = Frame::new(Opcode::Setup, vec![80u8, 24, 2, 9, 9]);
        assert_eq!(
            Command::parse(&frame).unwrap(),
            Command::Setup {
                width: 80,
                height: 24,
                color_mode: 2,
            }
        );
    }

    #[test]
    fn test_parse_short_setup() {
        let frame = Frame::new(Opcode::Setup, vec![80u8, 24]);
        assert_eq!(
            Command::parse(&frame),
            Err(ShortPayload {
                opcode: Opcode::Setup,
                expected: 3,
                actual: 2,
            })
        );
    }

    #[test]
    fn test_parse_render_text() {
        let frame = Frame::new(Opcode::RenderText, b"\x05\x03\x02Hello".to_vec());
        match Command::parse(&frame).unwrap() {
            Command::RenderText { x, y, attr, text } => {
                assert_eq!((x, y, attr), (5, 3, 2));
                assert_eq!(&text[..], b"Hello");
            }
            other => panic!("Wrong command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_render_text_without_text() {
        let frame = Frame::new(Opcode::RenderText, vec![1u8, 1, 1]);
        match Command::parse(&frame).unwrap() {
            Command::RenderText { text, .. } => assert!(text.is_empty()),
            other => panic!("Wrong command: {other:?}"),
        }
    }

    #[test]
    fn test_reserved_opcodes_keep_payload() {
        let frame = Frame::new(Opcode::CursorMove, vec![4u8, 7]);
        assert_eq!(
            Command::parse(&frame).unwrap(),
            Command::CursorMove(Bytes::from_static(&[4, 7]))
        );
    }

    #[test]
    fn test_encode_known_sequence() {
        let commands = vec![
            Command::Setup {
                width: 80,
                height: 24,
                color_mode: 2,
            },
            Command::DrawChar {
                x: 10,
                y: 5,
                attr: 3,
                ch: b'A',
            },
            Command::EndOfStream,
        ];

        let bytes = encode_commands(&commands).unwrap();
        assert_eq!(
            &bytes[..],
            &[0x01, 0x03, 0x50, 0x18, 0x02, 0x02, 0x04, 0x0A, 0x05, 0x03, 0x41, 0xFF]
        );

        let decoded: Vec<Command> = FrameReader::new(bytes)
            .map(|frame| Command::parse(&frame.unwrap()).unwrap())
            .collect();
        assert_eq!(decoded, commands);
    }
}
