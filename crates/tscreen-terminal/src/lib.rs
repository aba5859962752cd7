//! Screen state and display for Tscreen
//!
//! Holds the character/attribute grid that screen commands draw into and
//! the sink abstraction used to show it.

pub mod display;
pub mod framebuffer;
pub mod sink;

pub use display::{attr_to_color, render_ansi, render_row_ansi};
pub use framebuffer::{Cell, ScreenBuffer, Snapshot};
pub use sink::{CaptureSink, DisplayGuard, DisplaySink};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TerminalError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Display already released")]
    Closed,
}
