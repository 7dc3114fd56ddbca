//! All subcommand - run both pipelines sequentially, combined first
//!
//! The pipelines stay independent: each fetches its own inputs and
//! writes its own file, and a failure in the first aborts before the
//! second starts.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use owidprep_core::{PipelineConfig, SharedProgress, run_combined, run_modern};

#[derive(Args, Debug)]
pub struct AllArgs {
    /// Output directory for both files
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,
}

pub fn run(args: AllArgs, progress: &SharedProgress) -> Result<()> {
    let config = PipelineConfig::new(args.output);

    let combined = run_combined(&config, progress)?;
    super::print_summary("Combined Summary", &combined);

    let modern = run_modern(&config, progress)?;
    super::print_summary("Modern Summary", &modern);

    Ok(())
}
