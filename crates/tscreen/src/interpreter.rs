//! Command interpreter
//!
//! Consumes frames, validates them against the screen state, applies them to
//! the owned [`ScreenBuffer`] and asks the display sink to render after every
//! frame that does not abort the run.

use thiserror::Error;
use tracing::{debug, info, warn};
use tscreen_protocol::{Command, Frame, FrameReader, Opcode, ProtocolError, ShortPayload};
use tscreen_terminal::{DisplaySink, ScreenBuffer, Snapshot, TerminalError};

/// Fatal errors; the run stops as soon as one occurs
#[derive(Error, Debug)]
pub enum RunError {
    #[error("Framing error: {0}")]
    Framing(#[from] ProtocolError),

    #[error("Invalid setup command: payload has {len} bytes, need 3")]
    InvalidSetup { len: usize },

    #[error("Display error: {0}")]
    Display(#[from] TerminalError),
}

/// Recoverable problems. The offending frame is skipped and the run goes on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    #[error("Screen not set up before {opcode:?}")]
    NotSetUp { opcode: Opcode },

    #[error("Unknown command: {0:#04x}")]
    UnknownOpcode(u8),

    #[error("Malformed {opcode:?}: expected at least {expected} payload bytes, got {actual}")]
    ShortPayload {
        opcode: Opcode,
        expected: usize,
        actual: usize,
    },

    #[error("Draw at ({x}, {y}) is outside the screen")]
    OutOfBounds { x: u8, y: u8 },

    #[error("Reserved command {opcode:?} has no effect")]
    Reserved { opcode: Opcode },
}

/// Whether to keep reading after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// How a run ended without a fatal error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The end-of-stream marker was processed
    EndMarker,
    /// The input ran out on a frame boundary
    Exhausted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub termination: Termination,
    pub frames: usize,
    pub renders: usize,
    pub diagnostics: usize,
}

enum State {
    Uninitialized,
    Ready(ScreenBuffer),
}

/// Screen command state machine
pub struct Interpreter<S: DisplaySink> {
    state: State,
    sink: S,
    diagnostics: Vec<Diagnostic>,
    frames: usize,
    renders: usize,
}

impl<S: DisplaySink> Interpreter<S> {
    pub fn new(sink: S) -> Self {
        Self {
            state: State::Uninitialized,
            sink,
            diagnostics: Vec::new(),
            frames: 0,
            renders: 0,
        }
    }

    /// The screen buffer, once a setup command has created it
    pub fn screen(&self) -> Option<&ScreenBuffer> {
        match &self.state {
            State::Ready(buf) => Some(buf),
            State::Uninitialized => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, State::Ready(_))
    }

    /// Recoverable problems reported so far
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Process frames until the end-of-stream marker, the end of input, or
    /// a fatal error.
    pub fn run(&mut self, reader: &mut FrameReader) -> Result<RunOutcome, RunError> {
        loop {
            let Some(frame) = reader.next_frame()? else {
                info!(frames = self.frames, "input exhausted");
                return Ok(self.outcome(Termination::Exhausted));
            };

            if self.step(&frame)? == Flow::Stop {
                info!(
                    frames = self.frames,
                    unread = reader.remaining(),
                    "end-of-stream marker"
                );
                return Ok(self.outcome(Termination::EndMarker));
            }
        }
    }

    /// Apply one frame and render the result
    pub fn step(&mut self, frame: &Frame) -> Result<Flow, RunError> {
        self.frames += 1;
        debug!(opcode = ?frame.opcode, len = frame.payload.len(), "frame");

        let flow = self.apply(frame)?;
        self.render()?;
        Ok(flow)
    }

    fn apply(&mut self, frame: &Frame) -> Result<Flow, RunError> {
        let opcode = frame.opcode;

        // Only Setup and the draw commands have fixed fields, so a short
        // payload before setup is always a draw and reports as NotSetUp
        let command = match Command::parse(frame) {
            Ok(command) => command,
            Err(ShortPayload {
                opcode: Opcode::Setup,
                actual,
                ..
            }) => return Err(RunError::InvalidSetup { len: actual }),
            Err(ShortPayload { opcode, .. }) if !self.is_ready() => {
                self.report(Diagnostic::NotSetUp { opcode });
                return Ok(Flow::Continue);
            }
            Err(ShortPayload {
                opcode,
                expected,
                actual,
            }) => {
                self.report(Diagnostic::ShortPayload {
                    opcode,
                    expected,
                    actual,
                });
                return Ok(Flow::Continue);
            }
        };

        let diagnostic = match (command, &mut self.state) {
            (
                Command::Setup {
                    width,
                    height,
                    color_mode,
                },
                state,
            ) => {
                info!(width, height, color_mode, "screen setup");
                *state = State::Ready(ScreenBuffer::new(
                    width.into(),
                    height.into(),
                    color_mode,
                ));
                None
            }
            (Command::EndOfStream, _) => return Ok(Flow::Stop),
            (Command::CursorMove(_) | Command::DrawAtCursor(_), _) => {
                Some(Diagnostic::Reserved { opcode })
            }
            (Command::Unknown { opcode, .. }, _) => Some(Diagnostic::UnknownOpcode(opcode)),
            (Command::ClearScreen, State::Uninitialized) => None,
            (_, State::Uninitialized) => Some(Diagnostic::NotSetUp { opcode }),
            (Command::ClearScreen, State::Ready(buf)) => {
                buf.clear();
                None
            }
            (Command::DrawChar { x, y, attr, ch }, State::Ready(buf)) => {
                if buf.set_cell(x.into(), y.into(), char::from(ch), attr) {
                    None
                } else {
                    Some(Diagnostic::OutOfBounds { x, y })
                }
            }
            (
                Command::DrawLine {
                    x1,
                    y1,
                    x2,
                    y2,
                    attr,
                    ch,
                },
                State::Ready(buf),
            ) => {
                let written =
                    buf.draw_line(x1.into(), y1.into(), x2.into(), y2.into(), char::from(ch), attr);
                debug!(written, "line");
                None
            }
            (Command::RenderText { x, y, attr, text }, State::Ready(buf)) => {
                let written =
                    buf.draw_text(x.into(), y.into(), text.iter().map(|&b| char::from(b)), attr);
                debug!(written, len = text.len(), "text");
                None
            }
        };

        if let Some(diagnostic) = diagnostic {
            self.report(diagnostic);
        }
        Ok(Flow::Continue)
    }

    fn render(&mut self) -> Result<(), RunError> {
        let snapshot = match &self.state {
            State::Ready(buf) => buf.snapshot(),
            State::Uninitialized => Snapshot::empty(),
        };
        self.sink.render(&snapshot)?;
        self.renders += 1;
        Ok(())
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        warn!("{diagnostic}");
        self.diagnostics.push(diagnostic);
    }

    fn outcome(&self, termination: Termination) -> RunOutcome {
        RunOutcome {
            termination,
            frames: self.frames,
            renders: self.renders,
            diagnostics: self.diagnostics.len(),
        }
    }
}
