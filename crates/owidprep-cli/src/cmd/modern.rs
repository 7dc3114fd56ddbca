//! Modern subcommand - build the modern democracy extract

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use owidprep_core::{PipelineConfig, SharedProgress, run_modern};

#[derive(Args, Debug)]
pub struct ModernArgs {
    /// Output directory for the extract
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,
}

pub fn run(args: ModernArgs, progress: &SharedProgress) -> Result<()> {
    let config = PipelineConfig::new(args.output);
    let summary = run_modern(&config, progress)?;
    super::print_summary("Modern Summary", &summary);
    Ok(())
}
