//! owidprep core - building blocks for the story-data pipelines
//!
//! This crate provides the pieces the two data-preparation pipelines are
//! assembled from: an HTTP fetcher for grapher CSV exports, an in-memory
//! table model, broadcast lookups, the shared row filter/projector, and
//! atomic CSV sinks.

pub mod dataset;
pub mod fetch;
pub mod logging;
pub mod lookup;
pub mod pipeline;
pub mod progress;
pub mod project;
pub mod sink;
pub mod table;

// Re-exports for convenience
pub use dataset::DatasetSpec;
pub use fetch::{FetchError, fetch_text};
pub use logging::{ProgressLogger, init_logging};
pub use lookup::{PopulationLookup, RegionLookup, population_lookup, region_lookup};
pub use pipeline::{PipelineConfig, RunSummary, combine_datasets, run_combined, run_modern};
pub use progress::{Progress, SharedProgress, fmt_num};
pub use project::{ProjectedRow, RowFilter, project};
pub use sink::{COMBINED_HEADERS, CombinedRow, MODERN_HEADERS, ModernRow, write_rows};
pub use table::{Table, TableError};
