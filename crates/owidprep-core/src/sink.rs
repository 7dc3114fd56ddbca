//! CSV output sinks with atomic tmp→rename.
//!
//! Outputs are only replaced on full success: rows are serialized into a
//! `.tmp` sibling first, and the rename happens after the last row is
//! flushed. A failed run leaves any previously-written file untouched.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use serde::Serialize;

use crate::project::ProjectedRow;

/// Column contract of combined-data.csv.
pub const COMBINED_HEADERS: [&str; 8] = [
    "entity",
    "code",
    "year",
    "life_expectancy",
    "x_value",
    "x_variable",
    "owid_region",
    "population",
];

/// Column contract of the modern democracy extract.
///
/// Not harmonized with [`COMBINED_HEADERS`]: the story page consuming
/// this file binds to the lifeExp/democracy/region spelling.
pub const MODERN_HEADERS: [&str; 6] = ["entity", "code", "year", "lifeExp", "democracy", "region"];

/// Long-form output row for combined-data.csv.
/// Field order must match [`COMBINED_HEADERS`].
#[derive(Debug, Serialize)]
pub struct CombinedRow<'a> {
    pub entity: &'a str,
    pub code: Option<&'a str>,
    pub year: i32,
    pub life_expectancy: f64,
    pub x_value: f64,
    pub x_variable: &'a str,
    pub owid_region: Option<&'a str>,
    pub population: Option<f64>,
}

impl<'a> From<&'a ProjectedRow> for CombinedRow<'a> {
    fn from(row: &'a ProjectedRow) -> Self {
        Self {
            entity: &row.entity,
            code: row.code.as_deref(),
            year: row.year,
            life_expectancy: row.life_expectancy,
            x_value: row.x_value,
            x_variable: row.x_variable,
            owid_region: row.region.as_deref(),
            population: row.population,
        }
    }
}

/// Output row for the modern democracy extract.
/// Field order must match [`MODERN_HEADERS`].
#[derive(Debug, Serialize)]
pub struct ModernRow<'a> {
    pub entity: &'a str,
    pub code: Option<&'a str>,
    pub year: i32,
    #[serde(rename = "lifeExp")]
    pub life_exp: f64,
    pub democracy: f64,
    pub region: Option<&'a str>,
}

impl<'a> From<&'a ProjectedRow> for ModernRow<'a> {
    fn from(row: &'a ProjectedRow) -> Self {
        Self {
            entity: &row.entity,
            code: row.code.as_deref(),
            year: row.year,
            life_exp: row.life_expectancy,
            democracy: row.x_value,
            region: row.region.as_deref(),
        }
    }
}

/// Serialize rows into `<name>.tmp` under `dir`, then rename over the
/// final path. The header row is written even when no row survived the
/// filters. Returns the number of data rows written.
pub fn write_rows<T: Serialize>(
    dir: &Path,
    name: &str,
    headers: &[&str],
    rows: &[T],
) -> io::Result<usize> {
    let final_path = dir.join(name);
    let tmp_path = dir.join(format!("{name}.tmp"));

    // Clean up stale tmp file
    if tmp_path.exists() {
        fs::remove_file(&tmp_path)?;
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(File::create(&tmp_path)?);
    writer.write_record(headers).map_err(io::Error::other)?;
    for row in rows {
        writer.serialize(row).map_err(io::Error::other)?;
    }
    writer.flush()?;
    drop(writer);

    fs::rename(&tmp_path, &final_path)?;
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn chile() -> ProjectedRow {
        ProjectedRow {
            entity: "Chile".to_string(),
            code: Some("CHL".to_string()),
            year: 2010,
            life_expectancy: 78.5,
            x_value: 0.82,
            x_variable: "democracy",
            region: Some("South America".to_string()),
            population: Some(17000000.0),
        }
    }

    #[test]
    fn combined_row_matches_header_contract() {
        let row = chile();
        let mut writer = csv::Writer::from_writer(vec![]);
        writer.serialize(CombinedRow::from(&row)).unwrap();
        let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        let header = out.lines().next().unwrap();
        assert_eq!(header, COMBINED_HEADERS.join(","));
    }

    #[test]
    fn modern_row_matches_header_contract() {
        let row = chile();
        let mut writer = csv::Writer::from_writer(vec![]);
        writer.serialize(ModernRow::from(&row)).unwrap();
        let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        let header = out.lines().next().unwrap();
        assert_eq!(header, MODERN_HEADERS.join(","));
        assert!(header.contains("lifeExp"));
    }

    #[test]
    fn write_rows_exact_content() {
        let dir = TempDir::new().unwrap();
        let row = chile();
        let combined = [CombinedRow::from(&row)];
        let count = write_rows(dir.path(), "out.csv", &COMBINED_HEADERS, &combined).unwrap();
        assert_eq!(count, 1);

        let content = fs::read_to_string(dir.path().join("out.csv")).unwrap();
        assert_eq!(
            content,
            "entity,code,year,life_expectancy,x_value,x_variable,owid_region,population\n\
             Chile,CHL,2010,78.5,0.82,democracy,South America,17000000.0\n"
        );
    }

    #[test]
    fn nulls_serialize_as_empty_fields() {
        let dir = TempDir::new().unwrap();
        let row = ProjectedRow {
            code: None,
            region: None,
            population: None,
            ..chile()
        };
        let combined = [CombinedRow::from(&row)];
        write_rows(dir.path(), "out.csv", &COMBINED_HEADERS, &combined).unwrap();

        let content = fs::read_to_string(dir.path().join("out.csv")).unwrap();
        assert!(content.ends_with("Chile,,2010,78.5,0.82,democracy,,\n"));
    }

    #[test]
    fn header_written_even_with_no_rows() {
        let dir = TempDir::new().unwrap();
        let empty: [ModernRow; 0] = [];
        let count = write_rows(dir.path(), "out.csv", &MODERN_HEADERS, &empty).unwrap();
        assert_eq!(count, 0);

        let content = fs::read_to_string(dir.path().join("out.csv")).unwrap();
        assert_eq!(content, "entity,code,year,lifeExp,democracy,region\n");
    }

    #[test]
    fn no_tmp_file_left_behind() {
        let dir = TempDir::new().unwrap();
        let row = chile();
        let combined = [CombinedRow::from(&row)];
        write_rows(dir.path(), "out.csv", &COMBINED_HEADERS, &combined).unwrap();
        assert!(!dir.path().join("out.csv.tmp").exists());
    }

    #[test]
    fn failed_write_leaves_previous_output_untouched() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("out.csv"), "previous run\n").unwrap();
        // A directory squatting on the tmp path makes the write fail early.
        fs::create_dir(dir.path().join("out.csv.tmp")).unwrap();

        let row = chile();
        let combined = [CombinedRow::from(&row)];
        let result = write_rows(dir.path(), "out.csv", &COMBINED_HEADERS, &combined);
        assert!(result.is_err());
        assert_eq!(
            fs::read_to_string(dir.path().join("out.csv")).unwrap(),
            "previous run\n"
        );
    }

    #[test]
    fn rerun_overwrites_previous_output() {
        let dir = TempDir::new().unwrap();
        let row = chile();
        let combined = [CombinedRow::from(&row)];
        write_rows(dir.path(), "out.csv", &COMBINED_HEADERS, &combined).unwrap();
        let first = fs::read_to_string(dir.path().join("out.csv")).unwrap();
        write_rows(dir.path(), "out.csv", &COMBINED_HEADERS, &combined).unwrap();
        let second = fs::read_to_string(dir.path().join("out.csv")).unwrap();
        assert_eq!(first, second);
    }
}
