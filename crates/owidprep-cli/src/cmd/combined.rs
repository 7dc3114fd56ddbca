//! Combined subcommand - build the long-form democracy + GDP dataset

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use owidprep_core::{PipelineConfig, SharedProgress, run_combined};

#[derive(Args, Debug)]
pub struct CombinedArgs {
    /// Output directory for combined-data.csv
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,
}

pub fn run(args: CombinedArgs, progress: &SharedProgress) -> Result<()> {
    let config = PipelineConfig::new(args.output);
    let summary = run_combined(&config, progress)?;
    super::print_summary("Combined Summary", &summary);
    Ok(())
}
