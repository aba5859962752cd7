use anyhow::Result;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestFixtures {
    temp_dir: TempDir,
}

impl TestFixtures {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
        })
    }

    pub fn create_stream_file(&self, name: &str, content: &[u8]) -> Result<PathBuf> {
        let file_path = self.temp_dir.path().join(name);
        std::fs::write(&file_path, content)?;
        Ok(file_path)
    }

    pub fn file_path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }
}

// Common test streams
pub mod data {
    /// Setup 80x24 mode 2, 'A' at (10, 5) with attribute 3, end marker, stray byte
    pub const SETUP_DRAW_END: &[u8] = &[
        0x01, 0x03, 0x50, 0x18, 0x02, 0x02, 0x04, 0x0A, 0x05, 0x03, 0x41, 0xFF, 0x00,
    ];

    /// Draw before any setup, then a valid setup
    pub const DRAW_BEFORE_SETUP: &[u8] = &[
        0x02, 0x04, 0x0A, 0x05, 0x03, 0x41, 0x01, 0x03, 0x50, 0x18, 0x02,
    ];

    /// Setup declaring only two payload bytes, then a draw
    pub const SHORT_SETUP: &[u8] = &[0x01, 0x02, 0x50, 0x18, 0x02, 0x04, 0x0A, 0x05, 0x03, 0x41];

    /// Setup followed by a draw char whose payload is cut off
    pub const TRUNCATED_DRAW: &[u8] = &[0x01, 0x03, 0x0A, 0x0A, 0x00, 0x02, 0x04, 0x01, 0x01];
}
