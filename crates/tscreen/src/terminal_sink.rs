//! Display sink drawing to a real terminal through crossterm

use crossterm::{
    cursor, execute, queue,
    style::{Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::Write;
use tscreen_terminal::{attr_to_color, DisplaySink, Snapshot, TerminalError};

/// Draws every snapshot onto the terminal's alternate screen.
///
/// `acquire` switches to raw mode and the alternate screen; `release`
/// restores the original screen. Use it through a
/// [`DisplayGuard`](tscreen_terminal::DisplayGuard) so release happens on
/// every exit path.
pub struct CrosstermSink<W: Write> {
    out: W,
    raw_mode_enabled: bool,
    alternate_screen: bool,
}

impl<W: Write> CrosstermSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            raw_mode_enabled: false,
            alternate_screen: false,
        }
    }

    pub fn is_raw_mode(&self) -> bool {
        self.raw_mode_enabled
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DisplaySink for CrosstermSink<W> {
    fn acquire(&mut self) -> Result<(), TerminalError> {
        if !self.raw_mode_enabled {
            terminal::enable_raw_mode()?;
            self.raw_mode_enabled = true;
        }
        if !self.alternate_screen {
            execute!(
                self.out,
                terminal::EnterAlternateScreen,
                terminal::Clear(ClearType::All),
                cursor::Hide,
            )?;
            self.alternate_screen = true;
        }
        Ok(())
    }

    fn render(&mut self, snapshot: &Snapshot<'_>) -> Result<(), TerminalError> {
        queue!(self.out, ResetColor, terminal::Clear(ClearType::All))?;

        let mut last_attr = None;
        for (y, row) in (0..snapshot.height()).zip(snapshot.rows()) {
            queue!(self.out, cursor::MoveTo(0, y))?;

            for cell in row {
                if last_attr != Some(cell.attr) {
                    queue!(self.out, SetForegroundColor(attr_to_color(cell.attr)))?;
                    last_attr = Some(cell.attr);
                }
                queue!(self.out, Print(cell.ch))?;
            }
        }

        queue!(self.out, ResetColor)?;
        self.out.flush()?;
        Ok(())
    }

    fn release(&mut self) -> Result<(), TerminalError> {
        if self.alternate_screen {
            execute!(
                self.out,
                ResetColor,
                cursor::Show,
                terminal::LeaveAlternateScreen
            )?;
            self.alternate_screen = false;
        }
        if self.raw_mode_enabled {
            terminal::disable_raw_mode()?;
            self.raw_mode_enabled = false;
        }
        Ok(())
    }
}
