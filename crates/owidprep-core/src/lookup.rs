//! Broadcast lookups built from sparsely-populated columns.
//!
//! The upstream tables carry region and population on only some rows of
//! an entity; these maps collect the known values so the projector can
//! broadcast them onto every row sharing the key.

use rustc_hash::FxHashMap;

use crate::dataset::{COL_ENTITY, COL_POPULATION, COL_REGION, COL_YEAR};
use crate::table::{Table, TableError};

/// entity → region classification
pub type RegionLookup = FxHashMap<String, String>;

/// (entity, year) → historical population
pub type PopulationLookup = FxHashMap<(String, i32), f64>;

/// Build the entity-keyed region lookup from rows with a non-null region.
///
/// Last write wins in table row order. [`Table`] preserves the fetched
/// body's order, so a fixed snapshot yields a fixed lookup. The upstream
/// does not guarantee one region per entity, so a conflicting overwrite
/// is logged rather than silently absorbed.
pub fn region_lookup(table: &Table) -> Result<RegionLookup, TableError> {
    let entity_col = table.column(COL_ENTITY)?;
    let region_col = table.column(COL_REGION)?;

    let mut lookup = RegionLookup::default();
    for row in 0..table.len() {
        let (Some(entity), Some(region)) = (table.text(row, entity_col), table.text(row, region_col))
        else {
            continue;
        };
        if let Some(previous) = lookup.insert(entity.to_string(), region.to_string()) {
            if previous != region {
                log::warn!("conflicting region for {entity}: {previous:?} replaced by {region:?}");
            }
        }
    }
    Ok(lookup)
}

/// Build the (entity, year)-keyed population lookup from rows with a
/// non-null population figure.
pub fn population_lookup(table: &Table) -> Result<PopulationLookup, TableError> {
    let entity_col = table.column(COL_ENTITY)?;
    let year_col = table.column(COL_YEAR)?;
    let population_col = table.column(COL_POPULATION)?;

    let mut lookup = PopulationLookup::default();
    for row in 0..table.len() {
        let Some(population) = table.float(row, population_col)? else {
            continue;
        };
        let (Some(entity), Some(year)) = (table.text(row, entity_col), table.int(row, year_col)?)
        else {
            continue;
        };
        lookup.insert((entity.to_string(), year), population);
    }
    Ok(lookup)
}
