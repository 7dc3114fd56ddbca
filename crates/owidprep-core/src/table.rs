//! In-memory model of one fetched delimited table.
//!
//! The upstream schema is assumed stable and is not validated up front:
//! a column is only resolved when something downstream consults it, and
//! absence at that point aborts the run.

use csv::StringRecord;
use rustc_hash::FxHashMap;

/// Error from parsing or reading a fetched table.
#[derive(Debug)]
pub enum TableError {
    /// An expected column is absent from the fetched table
    MissingColumn { name: String },
    /// A consulted field holds text that does not parse as its type
    BadField {
        column: String,
        row: usize,
        value: String,
    },
    /// Malformed delimited text
    Parse(csv::Error),
}

impl std::fmt::Display for TableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingColumn { name } => write!(f, "missing column: {name}"),
            Self::BadField { column, row, value } => {
                write!(f, "bad value {value:?} in column {column} (row {row})")
            }
            Self::Parse(e) => write!(f, "parse: {e}"),
        }
    }
}

impl std::error::Error for TableError {}

impl From<csv::Error> for TableError {
    fn from(e: csv::Error) -> Self {
        Self::Parse(e)
    }
}

/// One raw dataset: header row plus all data rows, in source order.
///
/// Row order is load-bearing: the broadcast lookups resolve conflicts
/// last-write-wins over this order, so it must match the fetched body.
#[derive(Debug)]
pub struct Table {
    headers: Vec<String>,
    index: FxHashMap<String, usize>,
    rows: Vec<StringRecord>,
}

impl Table {
    /// Parse a buffered CSV body.
    pub fn parse(body: &str) -> Result<Self, TableError> {
        let mut reader = csv::ReaderBuilder::new().from_reader(body.as_bytes());
        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let index = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), i))
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(record?);
        }
        Ok(Self {
            headers,
            index,
            rows,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Resolve a column name to its index. Absence is a schema mismatch.
    pub fn column(&self, name: &str) -> Result<usize, TableError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| TableError::MissingColumn {
                name: name.to_string(),
            })
    }

    /// Text field; empty cells are nulls.
    pub fn text(&self, row: usize, col: usize) -> Option<&str> {
        match self.rows[row].get(col) {
            Some("") | None => None,
            Some(s) => Some(s),
        }
    }

    /// Float field; empty cells are nulls, malformed text is fatal.
    pub fn float(&self, row: usize, col: usize) -> Result<Option<f64>, TableError> {
        match self.text(row, col) {
            None => Ok(None),
            Some(s) => s
                .parse()
                .map(Some)
                .map_err(|_| self.bad_field(row, col, s)),
        }
    }

    /// Integer field; empty cells are nulls, malformed text is fatal.
    pub fn int(&self, row: usize, col: usize) -> Result<Option<i32>, TableError> {
        match self.text(row, col) {
            None => Ok(None),
            Some(s) => s
                .parse()
                .map(Some)
                .map_err(|_| self.bad_field(row, col, s)),
        }
    }

    fn bad_field(&self, row: usize, col: usize, value: &str) -> TableError {
        TableError::BadField {
            column: self.headers.get(col).cloned().unwrap_or_default(),
            row,
            value: value.to_string(),
        }
    }
}
