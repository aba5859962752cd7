//! Sample command stream used as a demo and test fixture

use anyhow::{Context, Result};
use bytes::{BufMut, Bytes, BytesMut};
use std::path::Path;
use tracing::info;
use tscreen_protocol::{encode_commands, Command};

/// Commands in the sample stream, in order
pub fn sample_commands() -> Vec<Command> {
    vec![
        // 80x24, 256 colors
        Command::Setup {
            width: 80,
            height: 24,
            color_mode: 0x02,
        },
        Command::DrawChar {
            x: 10,
            y: 5,
            attr: 3,
            ch: b'A',
        },
        Command::DrawLine {
            x1: 20,
            y1: 10,
            x2: 30,
            y2: 15,
            attr: 4,
            ch: b'-',
        },
        Command::RenderText {
            x: 5,
            y: 3,
            attr: 2,
            text: Bytes::from_static(b"Hello"),
        },
        Command::ClearScreen,
        Command::EndOfStream,
    ]
}

/// Encode the sample stream.
///
/// A stray zero byte follows the end-of-stream marker; players must stop at
/// the marker without reading it.
pub fn generate_sample() -> Result<Bytes> {
    let encoded = encode_commands(&sample_commands()).context("Failed to encode sample stream")?;

    let mut buf = BytesMut::with_capacity(encoded.len() + 1);
    buf.extend_from_slice(&encoded);
    buf.put_u8(0x00);
    Ok(buf.freeze())
}

/// Write the sample stream to `path`
pub fn write_sample(path: &Path) -> Result<usize> {
    let data = generate_sample()?;
    std::fs::write(path, &data)
        .with_context(|| format!("Failed to write sample stream to {}", path.display()))?;
    info!(path = %path.display(), bytes = data.len(), "sample stream written");
    Ok(data.len())
}
