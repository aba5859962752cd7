//! Screen display conversion
//!
//! Converts snapshots to formats suitable for display

use crate::framebuffer::{Cell, Snapshot};
use crossterm::style::Color;

/// Map a color attribute to a terminal foreground color.
///
/// Attribute 0 is the terminal default; everything else is used as a raw
/// 256-color palette index.
pub fn attr_to_color(attr: u8) -> Color {
    match attr {
        0 => Color::Reset,
        n => Color::AnsiValue(n),
    }
}

/// Render a row of cells to a string with ANSI escape codes
pub fn render_row_ansi(snapshot: &Snapshot<'_>, row: u16) -> String {
    let mut output = String::new();
    let Some(cells) = snapshot.row(row) else {
        return output;
    };

    let mut last_attr = 0u8;
    for cell in cells {
        if cell.attr != last_attr {
            output.push_str(&cell_to_ansi(cell));
            last_attr = cell.attr;
        }
        output.push(cell.ch);
    }

    // Reset at end of line
    output.push_str("\x1b[0m");
    output
}

/// Render every row, one line per row
pub fn render_ansi(snapshot: &Snapshot<'_>) -> Vec<String> {
    (0..snapshot.height())
        .map(|row| render_row_ansi(snapshot, row))
        .collect()
}

/// Convert a cell's attribute to an SGR escape sequence
fn cell_to_ansi(cell: &Cell) -> String {
    match cell.attr {
        0 => "\x1b[0m".to_string(),
        n if n < 8 => format!("\x1b[0;{}m", 30 + n as u16),
        n if n < 16 => format!("\x1b[0;{}m", 90 + (n - 8) as u16),
        n => format!("\x1b[0;38;5;{n}m"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framebuffer::ScreenBuffer;

    #[test]
    fn test_attr_to_color() {
        assert_eq!(attr_to_color(0), Color::Reset);
        assert_eq!(attr_to_color(3), Color::AnsiValue(3));
        assert_eq!(attr_to_color(200), Color::AnsiValue(200));
    }

    #[test]
    fn test_ansi_rendering() {
        let mut buf = ScreenBuffer::new(5, 1, 2);
        buf.draw_text(0, 0, "RED".chars(), 1);

        let rendered = render_row_ansi(&buf.snapshot(), 0);

        assert!(rendered.starts_with("\x1b[0;31mRED"));
        // Attribute drops back to default for the trailing blanks
        assert!(rendered.contains("RED\x1b[0m  "));
        assert!(rendered.ends_with("\x1b[0m"));
    }

    #[test]
    fn test_ansi_bright_and_indexed() {
        let mut buf = ScreenBuffer::new(2, 1, 2);
        buf.set_cell(0, 0, 'a', 9);
        buf.set_cell(1, 0, 'b', 196);

        let rendered = render_row_ansi(&buf.snapshot(), 0);
        assert_eq!(rendered, "\x1b[0;91ma\x1b[0;38;5;196mb\x1b[0m");
    }

    #[test]
    fn test_plain_row_has_no_color_codes() {
        let mut buf = ScreenBuffer::new(3, 2, 0);
        buf.set_cell(1, 1, 'x', 0);
        assert_eq!(render_ansi(&buf.snapshot()), vec!["   \x1b[0m", " x \x1b[0m"]);
    }

    #[test]
    fn test_row_out_of_range() {
        let buf = ScreenBuffer::new(3, 1, 0);
        assert_eq!(render_row_ansi(&buf.snapshot(), 5), "");
    }
}
