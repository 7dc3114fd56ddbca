//! Row filtering, projection, and lookup annotation shared by both
//! pipelines.

use rustc_hash::FxHashSet;

use crate::dataset::{
    AGGREGATE_ENTITIES, COL_CODE, COL_ENTITY, COL_LIFE_EXPECTANCY, COL_YEAR, DatasetSpec, MIN_YEAR,
};
use crate::lookup::{PopulationLookup, RegionLookup};
use crate::table::{Table, TableError};

/// Row-level filter thresholds, passed in explicitly so the transform
/// can run against synthetic tables in tests.
#[derive(Debug, Clone)]
pub struct RowFilter {
    pub aggregate_entities: FxHashSet<String>,
    pub min_year: i32,
}

impl Default for RowFilter {
    fn default() -> Self {
        Self {
            aggregate_entities: AGGREGATE_ENTITIES.iter().map(|e| e.to_string()).collect(),
            min_year: MIN_YEAR,
        }
    }
}

/// One surviving row, renamed to canonical fields and annotated.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedRow {
    pub entity: String,
    pub code: Option<String>,
    pub year: i32,
    pub life_expectancy: f64,
    pub x_value: f64,
    /// Which independent variable this row carries ("democracy" or "gdp")
    pub x_variable: &'static str,
    pub region: Option<String>,
    pub population: Option<f64>,
}

/// Filter a raw table and project the survivors.
///
/// Drops aggregate entities, rows with a null life expectancy or
/// independent variable, and rows before `filter.min_year`. Region comes
/// from the entity lookup only; the row's own region cell is not
/// consulted, the broadcast replaces it. Population is annotated when a
/// lookup is supplied, and a missing key is a null, not an error. Input
/// row order is preserved.
pub fn project(
    table: &Table,
    spec: &DatasetSpec,
    regions: &RegionLookup,
    populations: Option<&PopulationLookup>,
    filter: &RowFilter,
) -> Result<Vec<ProjectedRow>, TableError> {
    let entity_col = table.column(COL_ENTITY)?;
    let code_col = table.column(COL_CODE)?;
    let year_col = table.column(COL_YEAR)?;
    let life_col = table.column(COL_LIFE_EXPECTANCY)?;
    let x_col = table.column(spec.x_column)?;

    let mut out = Vec::new();
    for row in 0..table.len() {
        let Some(entity) = table.text(row, entity_col) else {
            continue;
        };
        if filter.aggregate_entities.contains(entity) {
            continue;
        }
        let Some(year) = table.int(row, year_col)? else {
            continue;
        };
        if year < filter.min_year {
            continue;
        }
        let Some(life_expectancy) = table.float(row, life_col)? else {
            continue;
        };
        let Some(x_value) = table.float(row, x_col)? else {
            continue;
        };

        out.push(ProjectedRow {
            entity: entity.to_string(),
            code: table.text(row, code_col).map(str::to_string),
            year,
            life_expectancy,
            x_value,
            x_variable: spec.x_variable,
            region: regions.get(entity).cloned(),
            population: populations.and_then(|p| p.get(&(entity.to_string(), year)).copied()),
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::{population_lookup, region_lookup};

    fn spec() -> DatasetSpec {
        DatasetSpec {
            label: "Test",
            url: "https://example.test/data.csv",
            x_column: "electdem_vdem__estimate_best",
            x_variable: "democracy",
            has_population: false,
        }
    }

    fn filter() -> RowFilter {
        RowFilter {
            aggregate_entities: ["World", "Africa"].iter().map(|e| e.to_string()).collect(),
            min_year: 2001,
        }
    }

    const DEMOCRACY_BODY: &str = "\
entity,code,year,life_expectancy_0,electdem_vdem__estimate_best,owid_region
Chile,CHL,2010,78.5,0.82,South America
Chile,CHL,1995,74.0,0.8,
Norway,NOR,2010,81.0,0.91,
World,OWID_WRL,2015,73.0,0.5,
Ghana,GHA,2010,60.9,,Africa
";

    #[test]
    fn aggregate_entities_never_survive() {
        let table = Table::parse(DEMOCRACY_BODY).unwrap();
        let rows = project(&table, &spec(), &RegionLookup::default(), None, &filter()).unwrap();
        assert!(rows.iter().all(|r| r.entity != "World"));
    }

    #[test]
    fn rows_before_min_year_dropped() {
        let table = Table::parse(DEMOCRACY_BODY).unwrap();
        let rows = project(&table, &spec(), &RegionLookup::default(), None, &filter()).unwrap();
        assert!(rows.iter().all(|r| r.year >= 2001));
    }

    #[test]
    fn null_x_value_dropped() {
        let table = Table::parse(DEMOCRACY_BODY).unwrap();
        let rows = project(&table, &spec(), &RegionLookup::default(), None, &filter()).unwrap();
        assert!(rows.iter().all(|r| r.entity != "Ghana"));
    }

    #[test]
    fn survivors_keep_input_order() {
        let table = Table::parse(DEMOCRACY_BODY).unwrap();
        let rows = project(&table, &spec(), &RegionLookup::default(), None, &filter()).unwrap();
        let entities: Vec<&str> = rows.iter().map(|r| r.entity.as_str()).collect();
        assert_eq!(entities, ["Chile", "Norway"]);
    }

    #[test]
    fn region_broadcast_onto_rows_with_null_region() {
        // Norway's own region cell is empty; the lookup still annotates it.
        let table = Table::parse(DEMOCRACY_BODY).unwrap();
        let mut regions = RegionLookup::default();
        regions.insert("Norway".to_string(), "Europe".to_string());
        let rows = project(&table, &spec(), &regions, None, &filter()).unwrap();
        let norway = rows.iter().find(|r| r.entity == "Norway").unwrap();
        assert_eq!(norway.region.as_deref(), Some("Europe"));
    }

    #[test]
    fn row_region_cell_not_consulted_without_lookup_entry() {
        // Chile's own cell says South America, but the broadcast replaces it.
        let table = Table::parse(DEMOCRACY_BODY).unwrap();
        let rows = project(&table, &spec(), &RegionLookup::default(), None, &filter()).unwrap();
        let chile = rows.iter().find(|r| r.entity == "Chile").unwrap();
        assert_eq!(chile.region, None);
    }

    #[test]
    fn population_null_on_lookup_miss() {
        let table = Table::parse(DEMOCRACY_BODY).unwrap();
        let mut populations = PopulationLookup::default();
        populations.insert(("Chile".to_string(), 2010), 17000000.0);
        let rows = project(
            &table,
            &spec(),
            &RegionLookup::default(),
            Some(&populations),
            &filter(),
        )
        .unwrap();
        let chile = rows.iter().find(|r| r.entity == "Chile").unwrap();
        let norway = rows.iter().find(|r| r.entity == "Norway").unwrap();
        assert_eq!(chile.population, Some(17000000.0));
        assert_eq!(norway.population, None);
    }

    #[test]
    fn chile_example_row() {
        let demo = Table::parse(
            "entity,code,year,life_expectancy_0,electdem_vdem__estimate_best,owid_region\n\
             Chile,CHL,2010,78.5,0.82,South America\n",
        )
        .unwrap();
        let gdp = Table::parse(
            "entity,code,year,life_expectancy_0,gdp_per_capita,owid_region,population_historical\n\
             Chile,CHL,2010,78.5,20000.0,South America,17000000.0\n",
        )
        .unwrap();
        let regions = region_lookup(&gdp).unwrap();
        let populations = population_lookup(&gdp).unwrap();

        let rows = project(&demo, &spec(), &regions, Some(&populations), &filter()).unwrap();
        assert_eq!(
            rows,
            vec![ProjectedRow {
                entity: "Chile".to_string(),
                code: Some("CHL".to_string()),
                year: 2010,
                life_expectancy: 78.5,
                x_value: 0.82,
                x_variable: "democracy",
                region: Some("South America".to_string()),
                population: Some(17000000.0),
            }]
        );
    }

    #[test]
    fn missing_x_column_is_fatal() {
        let table = Table::parse("entity,code,year,life_expectancy_0\nChile,CHL,2010,78.5\n").unwrap();
        let err = project(&table, &spec(), &RegionLookup::default(), None, &filter()).unwrap_err();
        assert!(matches!(err, TableError::MissingColumn { .. }));
    }

    #[test]
    fn default_filter_uses_fixed_exclusions() {
        let filter = RowFilter::default();
        assert_eq!(filter.min_year, 2001);
        assert!(filter.aggregate_entities.contains("World"));
        assert_eq!(filter.aggregate_entities.len(), 11);
    }
}
