//! Display sinks and scoped display ownership

use crate::framebuffer::Snapshot;
use crate::TerminalError;
use tracing::{debug, warn};

/// Anything that can show a screen snapshot.
///
/// `acquire` and `release` bracket the sink's use of a real display
/// surface; sinks without one can rely on the default no-ops.
pub trait DisplaySink {
    fn acquire(&mut self) -> Result<(), TerminalError> {
        Ok(())
    }

    fn render(&mut self, snapshot: &Snapshot<'_>) -> Result<(), TerminalError>;

    fn release(&mut self) -> Result<(), TerminalError> {
        Ok(())
    }
}

impl<S: DisplaySink + ?Sized> DisplaySink for &mut S {
    fn acquire(&mut self) -> Result<(), TerminalError> {
        (**self).acquire()
    }

    fn render(&mut self, snapshot: &Snapshot<'_>) -> Result<(), TerminalError> {
        (**self).render(snapshot)
    }

    fn release(&mut self) -> Result<(), TerminalError> {
        (**self).release()
    }
}

impl<S: DisplaySink + ?Sized> DisplaySink for Box<S> {
    fn acquire(&mut self) -> Result<(), TerminalError> {
        (**self).acquire()
    }

    fn render(&mut self, snapshot: &Snapshot<'_>) -> Result<(), TerminalError> {
        (**self).render(snapshot)
    }

    fn release(&mut self) -> Result<(), TerminalError> {
        (**self).release()
    }
}

/// RAII guard that owns an acquired display sink.
/// The sink is released by [`DisplayGuard::finish`] or, failing that, when
/// the guard is dropped, so early returns and panics still restore the display.
pub struct DisplayGuard<S: DisplaySink> {
    sink: S,
    acquired: bool,
}

impl<S: DisplaySink> DisplayGuard<S> {
    /// Acquire the sink's display surface
    pub fn acquire(mut sink: S) -> Result<Self, TerminalError> {
        sink.acquire()?;
        debug!("display acquired");
        Ok(Self {
            sink,
            acquired: true,
        })
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Release the display and report any failure doing so
    pub fn finish(mut self) -> Result<(), TerminalError> {
        self.acquired = false;
        debug!("display released");
        self.sink.release()
    }
}

impl<S: DisplaySink> Drop for DisplayGuard<S> {
    fn drop(&mut self) {
        if self.acquired {
            self.acquired = false;
            if let Err(e) = self.sink.release() {
                warn!("failed to release display: {e}");
            }
        }
    }
}

/// Headless sink that records the text of every rendered frame
#[derive(Debug, Default, Clone)]
pub struct CaptureSink {
    frames: Vec<Vec<String>>,
    acquired: bool,
    released: bool,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of render calls seen
    pub fn renders(&self) -> usize {
        self.frames.len()
    }

    /// Row text of every rendered frame, oldest first
    pub fn frames(&self) -> &[Vec<String>] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&[String]> {
        self.frames.last().map(Vec::as_slice)
    }

    pub fn was_acquired(&self) -> bool {
        self.acquired
    }

    pub fn was_released(&self) -> bool {
        self.released
    }
}

impl DisplaySink for CaptureSink {
    fn acquire(&mut self) -> Result<(), TerminalError> {
        self.acquired = true;
        self.released = false;
        Ok(())
    }

    fn render(&mut self, snapshot: &Snapshot<'_>) -> Result<(), TerminalError> {
        if self.released {
            return Err(TerminalError::Closed);
        }
        let rows = (0..snapshot.height())
            .filter_map(|y| snapshot.row_text(y))
            .collect();
        self.frames.push(rows);
        Ok(())
    }

    fn release(&mut self) -> Result<(), TerminalError> {
        self.released = true;
        Ok(())
    }
}
