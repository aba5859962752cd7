//! Tscreen player: reads a command stream and shows the resulting screen

use crate::interpreter::{Diagnostic, Interpreter, RunOutcome, Termination};
use crate::logging::{self, LogLevel, LogTarget};
use crate::sample;
use crate::terminal_sink::CrosstermSink;
use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use std::io;
use std::path::PathBuf;
use tracing::info;
use tscreen_protocol::FrameReader;
use tscreen_terminal::{render_ansi, CaptureSink, DisplayGuard};

#[derive(Parser, Debug)]
#[command(author, version, about = "Tscreen - render a binary screen command stream")]
struct Args {
    /// Binary command stream to play
    input: PathBuf,

    /// Write the sample stream to INPUT before playing it
    #[arg(long)]
    generate: bool,

    /// Render in memory and print the final screen to stdout
    #[arg(long)]
    headless: bool,

    /// Wait for a key press before restoring the terminal
    #[arg(long, conflicts_with = "headless")]
    hold: bool,

    /// Log level [default: warn, or error when logging to stderr]
    #[arg(long, value_enum)]
    log_level: Option<LogLevel>,

    /// Write logs to this file (terminal mode logs nowhere otherwise)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

pub fn run() -> Result<()> {
    let args = Args::parse();

    let target = match (&args.log_file, args.headless) {
        (Some(path), _) => LogTarget::File(path),
        (None, true) => LogTarget::Stderr,
        (None, false) => LogTarget::Disabled,
    };
    // Headless runs already print every diagnostic to stderr
    let level = args.log_level.unwrap_or(match target {
        LogTarget::Stderr => LogLevel::Error,
        _ => LogLevel::Warn,
    });
    logging::init(level, target)?;

    if args.generate {
        sample::write_sample(&args.input)?;
    }

    let data = std::fs::read(&args.input)
        .with_context(|| format!("Failed to read input file {}", args.input.display()))?;
    info!(path = %args.input.display(), bytes = data.len(), "processing command stream");

    let mut reader = FrameReader::new(data);
    let outcome = if args.headless {
        play_headless(&mut reader)?
    } else {
        play_terminal(&mut reader, args.hold)?
    };

    info!(
        termination = ?outcome.termination,
        frames = outcome.frames,
        renders = outcome.renders,
        diagnostics = outcome.diagnostics,
        "run finished"
    );
    Ok(())
}

/// Play into an in-memory sink and print the final screen
fn play_headless(reader: &mut FrameReader) -> Result<RunOutcome> {
    let mut interpreter = Interpreter::new(CaptureSink::new());
    let result = interpreter.run(reader);
    print_diagnostics(interpreter.diagnostics());
    let outcome = result.context("Failed to process command stream")?;

    if let Some(screen) = interpreter.screen() {
        for line in render_ansi(&screen.snapshot()) {
            println!("{line}");
        }
    }
    if outcome.termination == Termination::Exhausted {
        eprintln!("note: input ended without an end-of-stream marker");
    }
    Ok(outcome)
}

/// Play onto the real terminal. The display is released before any error
/// is returned.
fn play_terminal(reader: &mut FrameReader, hold: bool) -> Result<RunOutcome> {
    let mut guard = DisplayGuard::acquire(CrosstermSink::new(io::stdout()))
        .context("Failed to initialize terminal")?;

    let (result, diagnostics) = {
        let mut interpreter = Interpreter::new(guard.sink_mut());
        let result = interpreter.run(reader);
        (result, interpreter.diagnostics().to_vec())
    };

    if result.is_ok() && hold {
        wait_for_key()?;
    }
    guard.finish().context("Failed to restore terminal")?;

    print_diagnostics(&diagnostics);
    result.context("Failed to process command stream")
}

fn wait_for_key() -> Result<()> {
    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(());
            }
        }
    }
}

fn print_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        eprintln!("warning: {diagnostic}");
    }
}
