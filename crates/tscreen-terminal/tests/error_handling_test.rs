//! Error handling tests for tscreen-terminal module

use tscreen_terminal::{CaptureSink, Cell, DisplayGuard, DisplaySink, ScreenBuffer, Snapshot};

#[test]
fn test_screen_buffer_out_of_bounds() {
    let buf = ScreenBuffer::new(80, 24, 0);

    // Test out of bounds access
    assert!(buf.cell_at(80, 0).is_none());
    assert!(buf.cell_at(0, 24).is_none());
    assert!(buf.cell_at(100, 100).is_none());

    // Test large values that would wrap if converted carelessly
    assert!(buf.cell_at(u16::MAX, u16::MAX).is_none());
}

#[test]
fn test_screen_buffer_zero_dimensions() {
    // Setup may legally declare a zero-sized screen
    let mut buf = ScreenBuffer::new(0, 0, 0);
    assert_eq!(buf.width(), 0);
    assert_eq!(buf.height(), 0);
    assert!(!buf.set_cell(0, 0, 'x', 1));
    assert_eq!(buf.draw_line(0, 0, 5, 5, '-', 1), 0);
    assert_eq!(buf.draw_text(0, 0, "abc".chars(), 1), 0);
    buf.clear();

    // Test with zero width
    let mut buf = ScreenBuffer::new(0, 10, 0);
    assert!(!buf.set_cell(0, 0, 'x', 1));
    assert_eq!(buf.snapshot().row_text(3).unwrap(), "");

    // Test with zero height
    let buf = ScreenBuffer::new(10, 0, 0);
    assert!(buf.cell_at(0, 0).is_none());
    assert_eq!(buf.snapshot().rows().count(), 0);
}

#[test]
fn test_max_wire_dimensions() {
    let mut buf = ScreenBuffer::new(255, 255, 2);
    assert!(buf.set_cell(254, 254, '#', 255));
    assert_eq!(buf.cell_at(254, 254), Some(&Cell::new('#', 255)));
    assert_eq!(buf.draw_line(0, 254, 254, 0, '/', 1), 255);
}

#[test]
fn test_text_starting_off_screen_writes_nothing() {
    let mut buf = ScreenBuffer::new(10, 2, 0);
    assert_eq!(buf.draw_text(10, 0, "overflow".chars(), 1), 0);
    assert_eq!(buf.draw_text(u16::MAX, 0, "x".chars(), 1), 0);
    assert_eq!(buf.non_default_cells().count(), 0);
}

#[test]
fn test_guard_release_failure_is_reported_by_finish() {
    struct FailingRelease;

    impl DisplaySink for FailingRelease {
        fn render(&mut self, _: &Snapshot<'_>) -> Result<(), tscreen_terminal::TerminalError> {
            Ok(())
        }

        fn release(&mut self) -> Result<(), tscreen_terminal::TerminalError> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone").into())
        }
    }

    let guard = DisplayGuard::acquire(FailingRelease).unwrap();
    let err = guard.finish().unwrap_err();
    assert!(format!("{err}").contains("gone"));
}

#[test]
fn test_boxed_sink_forwards_calls() {
    let mut boxed: Box<dyn DisplaySink> = Box::new(CaptureSink::new());
    boxed.acquire().unwrap();
    boxed.render(&Snapshot::empty()).unwrap();
    boxed.release().unwrap();
    assert!(boxed.render(&Snapshot::empty()).is_err());
}
