pub mod all;
pub mod combined;
pub mod modern;

use owidprep_core::{RunSummary, fmt_num};

/// Print a run summary block on stdout (logs go to stderr).
pub fn print_summary(title: &str, summary: &RunSummary) {
    println!();
    println!("=== {title} ===");
    for (variable, rows) in &summary.per_dataset {
        println!("{variable}: {} rows", fmt_num(*rows));
    }
    println!("Total rows: {}", fmt_num(summary.rows_written));
    println!("Output: {}", summary.output_file.display());
}
