//! Tscreen sample generator

use crate::logging::{self, LogLevel, LogTarget};
use crate::sample;
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Write the Tscreen sample command stream")]
struct Args {
    /// Output file
    #[arg(default_value = "input.bin")]
    output: PathBuf,

    /// Log level
    #[arg(long, value_enum, default_value = "warn")]
    log_level: LogLevel,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    logging::init(args.log_level, LogTarget::Stderr)?;

    let written = sample::write_sample(&args.output)?;
    println!("Binary file created: {} ({written} bytes)", args.output.display());
    Ok(())
}
