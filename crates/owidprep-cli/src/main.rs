//! owidprep - CLI for the story-data preparation pipelines
//!
//! Fetches Our World in Data grapher exports and writes the flattened
//! CSVs consumed by the visualization story front end.

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod cmd;

#[derive(Parser)]
#[command(name = "owidprep")]
#[command(about = "Prepare Our World in Data extracts for the story front end")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Build the combined long-form dataset (democracy + GDP)
    Combined(cmd::combined::CombinedArgs),
    /// Build the modern democracy extract
    Modern(cmd::modern::ModernArgs),
    /// Run both pipelines, combined first
    All(cmd::all::AllArgs),
    /// Show the configured upstream datasets
    Datasets,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Progress context (TTY auto-detect); logs bridge through it so the
    // per-step progress lines stay readable alongside the spinners.
    let progress = Arc::new(owidprep_core::Progress::new());
    let multi = if progress.is_tty() {
        Some(progress.multi())
    } else {
        None
    };
    owidprep_core::init_logging(false, cli.debug, multi);

    match cli.command {
        Command::Combined(args) => cmd::combined::run(args, &progress),
        Command::Modern(args) => cmd::modern::run(args, &progress),
        Command::All(args) => cmd::all::run(args, &progress),
        Command::Datasets => {
            use comfy_table::{
                Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL,
            };

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_header(vec![
                    Cell::new("Dataset").fg(Color::Cyan),
                    Cell::new("x column").fg(Color::Cyan),
                    Cell::new("Tag").fg(Color::Cyan),
                    Cell::new("Population").fg(Color::Cyan),
                ]);

            for spec in owidprep_core::dataset::COMBINED_DATASETS {
                table.add_row(vec![
                    spec.label,
                    spec.x_column,
                    spec.x_variable,
                    if spec.has_population { "yes" } else { "no" },
                ]);
            }

            eprintln!("\n{table}");
            Ok(())
        }
    }
}
