//! Tscreen: plays a binary screen command stream onto a character grid

pub mod generator;
pub mod interpreter;
pub mod logging;
pub mod player;
pub mod sample;
pub mod terminal_sink;

pub use interpreter::{Diagnostic, Flow, Interpreter, RunError, RunOutcome, Termination};
pub use terminal_sink::CrosstermSink;
