//! The two pipeline runs: fetch → lookups → filter/project → write.
//!
//! Both are strictly linear with no retry and no partial-success path;
//! the first failure aborts the run before any output file is replaced.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::dataset::{self, DatasetSpec};
use crate::fetch::fetch_text;
use crate::lookup::{self, PopulationLookup, RegionLookup};
use crate::progress::{Progress, fmt_num};
use crate::project::{ProjectedRow, RowFilter, project};
use crate::sink::{self, CombinedRow, ModernRow};
use crate::table::{Table, TableError};

/// Everything a pipeline run depends on, passed in explicitly rather
/// than read from module-level state.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub output_dir: PathBuf,
    /// Combined-pipeline processing order. The population-bearing entry
    /// is fetched first regardless of its position here.
    pub datasets: Vec<DatasetSpec>,
    /// Dataset behind the modern extract
    pub modern: DatasetSpec,
    pub filter: RowFilter,
}

impl PipelineConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            datasets: dataset::COMBINED_DATASETS.to_vec(),
            modern: dataset::DEMOCRACY,
            filter: RowFilter::default(),
        }
    }
}

/// Row counts from a completed run.
#[derive(Debug)]
pub struct RunSummary {
    pub output_file: PathBuf,
    pub rows_written: usize,
    /// Rows per x_variable tag, in processing order
    pub per_dataset: Vec<(String, usize)>,
}

/// Project and concatenate already-fetched tables in dataset order.
///
/// Pure over its inputs. No deduplication across datasets: an
/// (entity, year) pair present in both sources yields one row per
/// x_variable, so the output is long form.
pub fn combine_datasets(
    tables: &[(&DatasetSpec, &Table)],
    regions: &RegionLookup,
    populations: &PopulationLookup,
    filter: &RowFilter,
) -> Result<Vec<ProjectedRow>, TableError> {
    let mut all = Vec::new();
    for (spec, table) in tables {
        let rows = project(table, spec, regions, Some(populations), filter)?;
        log::info!("Processing {}: {} rows kept", spec.label, fmt_num(rows.len()));
        all.extend(rows);
    }
    Ok(all)
}

/// Pipeline A: build combined-data.csv from both datasets.
///
/// The GDP dataset is fetched first because the region and population
/// lookups come from it; it is then reused (not re-fetched) when its
/// turn comes in the processing order.
pub fn run_combined(config: &PipelineConfig, progress: &Progress) -> Result<RunSummary> {
    let lookup_spec = config
        .datasets
        .iter()
        .find(|d| d.has_population)
        .context("combined pipeline needs a population-bearing dataset")?;

    let step = progress.step("fetch");
    step.set_message(format!("{} (lookup source)", lookup_spec.label));
    log::info!("Downloading {} for population data", lookup_spec.label);
    let lookup_table = fetch_dataset(lookup_spec)?;
    step.finish_and_clear();

    let regions = lookup::region_lookup(&lookup_table)?;
    let populations = lookup::population_lookup(&lookup_table)?;
    log::info!(
        "Built lookups: {} regions, {} population figures",
        fmt_num(regions.len()),
        fmt_num(populations.len())
    );

    // Fixed processing order; the dataset already in hand is not re-fetched.
    let mut lookup_table = Some(lookup_table);
    let mut tables: Vec<(&DatasetSpec, Table)> = Vec::with_capacity(config.datasets.len());
    for spec in &config.datasets {
        let table = if spec.has_population {
            lookup_table
                .take()
                .context("more than one population-bearing dataset in processing order")?
        } else {
            let step = progress.step("fetch");
            step.set_message(spec.label.to_string());
            log::info!("Downloading {}", spec.label);
            let table = fetch_dataset(spec)?;
            step.finish_and_clear();
            table
        };
        tables.push((spec, table));
    }

    let step = progress.step("combine");
    step.set_message("filter, annotate, concatenate");
    let refs: Vec<(&DatasetSpec, &Table)> = tables.iter().map(|(spec, t)| (*spec, t)).collect();
    let rows = combine_datasets(&refs, &regions, &populations, &config.filter)?;
    step.finish_and_clear();

    let combined: Vec<CombinedRow> = rows.iter().map(CombinedRow::from).collect();
    let written = write_output(config, dataset::COMBINED_FILE, &sink::COMBINED_HEADERS, &combined)?;

    let per_dataset = config
        .datasets
        .iter()
        .map(|spec| {
            let count = rows.iter().filter(|r| r.x_variable == spec.x_variable).count();
            (spec.x_variable.to_string(), count)
        })
        .collect();

    Ok(RunSummary {
        output_file: config.output_dir.join(dataset::COMBINED_FILE),
        rows_written: written,
        per_dataset,
    })
}

/// Pipeline B: build the modern democracy extract from one dataset,
/// with the region lookup drawn from the same table.
pub fn run_modern(config: &PipelineConfig, progress: &Progress) -> Result<RunSummary> {
    let spec = &config.modern;

    let step = progress.step("fetch");
    step.set_message(spec.label.to_string());
    log::info!("Downloading {}", spec.label);
    let table = fetch_dataset(spec)?;
    step.finish_and_clear();

    let regions = lookup::region_lookup(&table)?;
    log::info!("Built region lookup: {} entities", fmt_num(regions.len()));

    let step = progress.step("filter");
    step.set_message("filter and project");
    let rows = project(&table, spec, &regions, None, &config.filter)?;
    log::info!("Processing {}: {} rows kept", spec.label, fmt_num(rows.len()));
    step.finish_and_clear();

    let modern: Vec<ModernRow> = rows.iter().map(ModernRow::from).collect();
    let written = write_output(config, dataset::MODERN_FILE, &sink::MODERN_HEADERS, &modern)?;

    Ok(RunSummary {
        output_file: config.output_dir.join(dataset::MODERN_FILE),
        rows_written: written,
        per_dataset: vec![(spec.x_variable.to_string(), written)],
    })
}

fn fetch_dataset(spec: &DatasetSpec) -> Result<Table> {
    let body = fetch_text(spec.url).with_context(|| format!("fetching {}", spec.url))?;
    let table = Table::parse(&body).with_context(|| format!("parsing {}", spec.label))?;
    log::info!("Fetched {}: {} rows", spec.label, fmt_num(table.len()));
    Ok(table)
}

fn write_output<T: serde::Serialize>(
    config: &PipelineConfig,
    name: &str,
    headers: &[&str],
    rows: &[T],
) -> Result<usize> {
    fs::create_dir_all(&config.output_dir).with_context(|| {
        format!("creating output directory {}", config.output_dir.display())
    })?;
    let written = sink::write_rows(&config.output_dir, name, headers, rows)
        .with_context(|| format!("writing {name}"))?;
    log::info!("Saved {} rows to {name}", fmt_num(written));
    Ok(written)
}
