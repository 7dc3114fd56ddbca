//! Literal configuration for the upstream grapher datasets.
//!
//! These are plain values handed to the pipelines through
//! [`PipelineConfig`](crate::pipeline::PipelineConfig), not module-level
//! state, so the transforms can be exercised against synthetic tables.

/// One upstream dataset and how to interpret it.
#[derive(Debug, Clone)]
pub struct DatasetSpec {
    /// Display name for progress lines
    pub label: &'static str,
    pub url: &'static str,
    /// Column holding the independent variable
    pub x_column: &'static str,
    /// Tag written to the x_variable output column
    pub x_variable: &'static str,
    /// Whether this dataset carries population_historical. The combined
    /// pipeline fetches it first and builds its lookups from it.
    pub has_population: bool,
}

// Query parameters pin the schema version and short column names.
pub const DEMOCRACY: DatasetSpec = DatasetSpec {
    label: "Electoral Democracy Index",
    url: "https://ourworldindata.org/grapher/life-expectancy-vs-electoral-democracy-index.csv?v=1&csvType=full&useColumnShortNames=true",
    x_column: "electdem_vdem__estimate_best",
    x_variable: "democracy",
    has_population: false,
};

pub const GDP: DatasetSpec = DatasetSpec {
    label: "GDP per Capita",
    url: "https://ourworldindata.org/grapher/life-expectancy-vs-gdp-per-capita.csv?v=1&csvType=full&useColumnShortNames=true",
    x_column: "gdp_per_capita",
    x_variable: "gdp",
    has_population: true,
};

/// Processing order for the combined pipeline: democracy, then GDP.
/// Output rows keep this order (long form, no dedup across datasets).
pub const COMBINED_DATASETS: [DatasetSpec; 2] = [DEMOCRACY, GDP];

/// Non-country groupings that never belong in country-level output.
pub const AGGREGATE_ENTITIES: [&str; 11] = [
    "Africa",
    "Asia",
    "Europe",
    "North America",
    "South America",
    "Oceania",
    "World",
    "High-income countries",
    "Low-income countries",
    "Lower-middle-income countries",
    "Upper-middle-income countries",
];

/// Rows before this year are dropped.
pub const MIN_YEAR: i32 = 2001;

// Output files
pub const COMBINED_FILE: &str = "combined-data.csv";
pub const MODERN_FILE: &str = "life-expectancy-vs-electoral-democracy-index-modern.csv";

// Upstream column names (short-name convention)
pub const COL_ENTITY: &str = "entity";
pub const COL_CODE: &str = "code";
pub const COL_YEAR: &str = "year";
pub const COL_LIFE_EXPECTANCY: &str = "life_expectancy_0";
pub const COL_REGION: &str = "owid_region";
pub const COL_POPULATION: &str = "population_historical";
