//! Screen buffer holding the character/attribute grid
//!
//! Manages the 2D grid of cells written by screen commands. Every write is
//! bounds-checked: coordinates outside the grid are ignored.

/// A single cell on the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// The character in this cell
    pub ch: char,

    /// Color attribute index, interpreted by the display sink
    pub attr: u8,
}

impl Default for Cell {
    fn default() -> Self {
        Self { ch: ' ', attr: 0 }
    }
}

impl Cell {
    pub fn new(ch: char, attr: u8) -> Self {
        Self { ch, attr }
    }

    pub fn is_default(&self) -> bool {
        *self == Cell::default()
    }
}

/// Screen buffer created by a setup command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenBuffer {
    /// Width in cells
    width: u16,

    /// Height in cells
    height: u16,

    /// Color mode tag from setup
    color_mode: u8,

    /// Cells in row-major order
    cells: Vec<Cell>,
}

impl ScreenBuffer {
    /// Allocate a blank buffer of `height` rows by `width` columns
    pub fn new(width: u16, height: u16, color_mode: u8) -> Self {
        let cells = vec![Cell::default(); (width as usize) * (height as usize)];

        Self {
            width,
            height,
            color_mode,
            cells,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn color_mode(&self) -> u8 {
        self.color_mode
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    /// Get cell at position
    pub fn cell_at(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|index| &self.cells[index])
    }

    /// Write one cell. Returns `false` and leaves the buffer untouched when
    /// `(x, y)` is outside the grid.
    pub fn set_cell(&mut self, x: u16, y: u16, ch: char, attr: u8) -> bool {
        match self.index(x, y) {
            Some(index) => {
                self.cells[index] = Cell::new(ch, attr);
                true
            }
            None => false,
        }
    }

    /// Reset every cell without touching the dimensions
    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Rasterize a line between two points (inclusive) with integer
    /// Bresenham stepping. Returns the number of cells written.
    pub fn draw_line(&mut self, x1: u16, y1: u16, x2: u16, y2: u16, ch: char, attr: u8) -> usize {
        let (x1, y1, x2, y2) = (x1 as i32, y1 as i32, x2 as i32, y2 as i32);
        let dx = (x2 - x1).abs();
        let dy = -(y2 - y1).abs();
        let sx = if x1 < x2 { 1 } else { -1 };
        let sy = if y1 < y2 { 1 } else { -1 };
        let mut err = dx + dy;

        let mut x = x1;
        let mut y = y1;
        let mut written = 0;

        loop {
            if self.set_cell(x as u16, y as u16, ch, attr) {
                written += 1;
            }

            if x == x2 && y == y2 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }

        written
    }

    /// Write `text` left to right starting at `(x, y)`. Characters past the
    /// row edge are clipped. Returns the number of cells written.
    pub fn draw_text<I>(&mut self, x: u16, y: u16, text: I, attr: u8) -> usize
    where
        I: IntoIterator<Item = char>,
    {
        let mut written = 0;
        for (offset, ch) in text.into_iter().enumerate() {
            let Some(col) = u16::try_from(offset).ok().and_then(|o| x.checked_add(o)) else {
                break;
            };
            if col >= self.width {
                break;
            }
            if self.set_cell(col, y, ch, attr) {
                written += 1;
            }
        }
        written
    }

    /// Cells that differ from the blank default, with their positions
    pub fn non_default_cells(&self) -> impl Iterator<Item = (u16, u16, &Cell)> + '_ {
        let width = self.width.max(1) as usize;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| !cell.is_default())
            .map(move |(index, cell)| ((index % width) as u16, (index / width) as u16, cell))
    }

    /// Get all cells in row-major order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Read-only view for rendering
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            width: self.width,
            height: self.height,
            color_mode: self.color_mode,
            cells: &self.cells,
        }
    }
}

/// Immutable view of a screen buffer at one point in time.
///
/// The buffer cannot be mutated while a snapshot borrows it, so a render
/// always sees a complete grid.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    width: u16,
    height: u16,
    color_mode: u8,
    cells: &'a [Cell],
}

impl Snapshot<'static> {
    /// Snapshot used before any buffer exists
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            color_mode: 0,
            cells: &[],
        }
    }
}

impl<'a> Snapshot<'a> {
    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn color_mode(&self) -> u8 {
        self.color_mode
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell_at(&self, x: u16, y: u16) -> Option<&'a Cell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells
            .get((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn row(&self, y: u16) -> Option<&'a [Cell]> {
        if y >= self.height {
            return None;
        }
        let start = (y as usize) * (self.width as usize);
        self.cells.get(start..start + self.width as usize)
    }

    pub fn rows(&self) -> impl Iterator<Item = &'a [Cell]> {
        self.cells.chunks(self.width.max(1) as usize)
    }

    /// Characters of one row as a string
    pub fn row_text(&self, y: u16) -> Option<String> {
        self.row(y).map(|row| row.iter().map(|cell| cell.ch).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_is_blank() {
        let buf = ScreenBuffer::new(80, 24, 2);
        assert_eq!(buf.width(), 80);
        assert_eq!(buf.height(), 24);
        assert_eq!(buf.color_mode(), 2);
        assert_eq!(buf.cells().len(), 80 * 24);
        assert!(buf.cells().iter().all(Cell::is_default));
    }

    #[test]
    fn test_set_cell_bounds() {
        let mut buf = ScreenBuffer::new(3, 2, 0);
        assert!(buf.set_cell(2, 1, 'x', 5));
        assert_eq!(buf.cell_at(2, 1), Some(&Cell::new('x', 5)));

        let before = buf.clone();
        assert!(!buf.set_cell(3, 0, 'y', 1));
        assert!(!buf.set_cell(0, 2, 'y', 1));
        assert_eq!(buf, before);
    }

    #[test]
    fn test_clear_keeps_dimensions() {
        let mut buf = ScreenBuffer::new(4, 4, 1);
        buf.set_cell(1, 1, '#', 9);
        buf.clear();
        assert_eq!((buf.width(), buf.height()), (4, 4));
        assert!(buf.cells().iter().all(Cell::is_default));
    }

    #[test]
    fn test_draw_line_horizontal() {
        let mut buf = ScreenBuffer::new(10, 3, 0);
        assert_eq!(buf.draw_line(2, 1, 6, 1, '-', 4), 5);
        assert_eq!(buf.snapshot().row_text(1).unwrap(), "  -----   ");
    }

    #[test]
    fn test_draw_line_reversed_vertical() {
        let mut buf = ScreenBuffer::new(3, 5, 0);
        assert_eq!(buf.draw_line(1, 4, 1, 0, '|', 1), 5);
        for y in 0..5 {
            assert_eq!(buf.cell_at(1, y).unwrap().ch, '|');
        }
    }

    #[test]
    fn test_draw_line_diagonal() {
        let mut buf = ScreenBuffer::new(4, 4, 0);
        buf.draw_line(0, 0, 3, 3, '\\', 1);
        let marked: Vec<(u16, u16)> = buf.non_default_cells().map(|(x, y, _)| (x, y)).collect();
        assert_eq!(marked, vec![(0, 0), (1, 1), (2, 2), (3, 3)]);
    }

    #[test]
    fn test_draw_line_single_point() {
        let mut buf = ScreenBuffer::new(4, 4, 0);
        assert_eq!(buf.draw_line(2, 2, 2, 2, '*', 1), 1);
        assert_eq!(buf.cell_at(2, 2).unwrap().ch, '*');
    }

    #[test]
    fn test_draw_line_clipped() {
        let mut buf = ScreenBuffer::new(5, 5, 0);
        // Runs off the right edge; only in-bounds cells are written
        assert_eq!(buf.draw_line(2, 0, 9, 0, '=', 1), 3);
        assert_eq!(buf.snapshot().row_text(0).unwrap(), "  ===");
    }

    #[test]
    fn test_draw_text_clips_at_row_edge() {
        let mut buf = ScreenBuffer::new(8, 2, 0);
        assert_eq!(buf.draw_text(5, 0, "Hello".chars(), 2), 3);
        assert_eq!(buf.snapshot().row_text(0).unwrap(), "     Hel");
        assert!(buf.snapshot().row(1).unwrap().iter().all(Cell::is_default));
    }

    #[test]
    fn test_draw_text_outside_rows() {
        let mut buf = ScreenBuffer::new(8, 2, 0);
        assert_eq!(buf.draw_text(0, 2, "abc".chars(), 2), 0);
        assert_eq!(buf.non_default_cells().count(), 0);
    }

    #[test]
    fn test_snapshot_rows() {
        let mut buf = ScreenBuffer::new(2, 2, 0);
        buf.set_cell(0, 0, 'a', 0);
        buf.set_cell(1, 1, 'b', 0);
        let snap = buf.snapshot();
        let rows: Vec<String> = snap
            .rows()
            .map(|row| row.iter().map(|c| c.ch).collect())
            .collect();
        assert_eq!(rows, vec!["a ".to_string(), " b".to_string()]);
        assert!(snap.row(2).is_none());
    }

    #[test]
    fn test_empty_snapshot() {
        let snap = Snapshot::empty();
        assert!(snap.is_empty());
        assert_eq!(snap.rows().count(), 0);
        assert!(snap.cell_at(0, 0).is_none());
    }
}
