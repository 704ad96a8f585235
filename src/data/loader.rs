// ============================================================
// Layer 4 - CSV Table Loader
// ============================================================
// Reads a headered CSV file with the csv crate and infers the
// kind of every column from its cells:
//
//   1. every cell is a finite number          → Numeric
//   2. every cell is true/false/yes/no/t/f/y/n → Boolean
//   3. at most `categorical_limit` distinct    → Categorical
//   4. anything else                           → FreeText
//
// Cells are trimmed before classification.
//
// Reference: csv crate documentation
//            Rust Book §9 (Error Handling)

use std::{collections::BTreeSet, fs::File, io::Read, path::PathBuf};

use anyhow::{bail, Context, Result};
use csv::ReaderBuilder;

use crate::domain::column::{Column, ColumnValues};
use crate::domain::table::Table;
use crate::domain::traits::TableSource;

/// Default upper bound on distinct values for a categorical column
pub const DEFAULT_CATEGORICAL_LIMIT: usize = 32;

/// Loads a table from a CSV file.
/// Implements the TableSource trait from Layer 3.
pub struct CsvLoader {
    path:              PathBuf,
    categorical_limit: usize,
}

impl CsvLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), categorical_limit: DEFAULT_CATEGORICAL_LIMIT }
    }

    pub fn with_categorical_limit(mut self, limit: usize) -> Self {
        self.categorical_limit = limit;
        self
    }
}

impl TableSource for CsvLoader {
    fn load(&self) -> Result<Table> {
        let file = File::open(&self.path)
            .with_context(|| format!("Cannot open '{}'", self.path.display()))?;
        let table = parse_table(self.path.display().to_string(), file, self.categorical_limit)?;

        tracing::info!(
            "Loaded '{}': {} rows, {} columns",
            table.source,
            table.rows(),
            table.columns.len()
        );
        Ok(table)
    }
}

/// Parse CSV text from any reader into a typed table.
pub fn parse_table<R: Read>(source: String, reader: R, categorical_limit: usize) -> Result<Table> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .with_context(|| format!("Cannot read header of '{source}'"))?
        .iter()
        .map(str::to_string)
        .collect();

    if headers.is_empty() || headers.iter().all(String::is_empty) {
        bail!("'{source}' has no header row");
    }

    // Column names key the manifest statistics; they must be unique.
    let mut seen = BTreeSet::new();
    if let Some(dup) = headers.iter().find(|name| !seen.insert(name.as_str())) {
        bail!("'{source}' has duplicate column '{dup}'");
    }

    // Column-major cell storage
    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for (line, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("Malformed record {} in '{source}'", line + 1))?;
        for (col, cell) in cells.iter_mut().zip(record.iter()) {
            col.push(cell.to_string());
        }
    }

    if cells[0].is_empty() {
        bail!("'{source}' has no data rows");
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, cells)| {
            let values = classify(&cells, categorical_limit);
            tracing::debug!("Column '{}' classified as {}", name, values.kind());
            Column::new(name, values)
        })
        .collect();

    Ok(Table::new(source, columns))
}

/// Infer the kind of a column from its raw cells.
pub fn classify(cells: &[String], categorical_limit: usize) -> ColumnValues {
    if let Some(numbers) = cells.iter().map(|c| parse_number(c)).collect::<Option<Vec<_>>>() {
        return ColumnValues::Numeric(numbers);
    }

    if let Some(flags) = cells.iter().map(|c| parse_flag(c)).collect::<Option<Vec<_>>>() {
        return ColumnValues::Boolean(flags);
    }

    let distinct: BTreeSet<&str> = cells.iter().map(String::as_str).collect();
    if distinct.len() <= categorical_limit {
        return ColumnValues::categorical(cells);
    }

    ColumnValues::FreeText(cells.to_vec())
}

fn parse_number(cell: &str) -> Option<f64> {
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_flag(cell: &str) -> Option<bool> {
    match cell.to_ascii_lowercase().as_str() {
        "true" | "yes" | "t" | "y"  => Some(true),
        "false" | "no" | "f" | "n"  => Some(false),
        _ => None,
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::column::ColumnKind;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_classify_numeric() {
        let values = classify(&strings(&["1", "2.5", "-3e2"]), 32);
        assert_eq!(values, ColumnValues::Numeric(vec![1.0, 2.5, -300.0]));
    }

    #[test]
    fn test_classify_boolean_any_case() {
        let values = classify(&strings(&["TRUE", "no", "Y"]), 32);
        assert_eq!(values, ColumnValues::Boolean(vec![true, false, true]));
    }

    #[test]
    fn test_zero_one_is_numeric_not_boolean() {
        assert_eq!(classify(&strings(&["0", "1"]), 32).kind(), ColumnKind::Numeric);
    }

    #[test]
    fn test_classify_categorical_and_free_text() {
        let cells = strings(&["a", "b", "a", "c"]);
        assert_eq!(classify(&cells, 3).kind(), ColumnKind::Categorical);
        assert_eq!(classify(&cells, 2).kind(), ColumnKind::FreeText);
    }

    #[test]
    fn test_nan_cells_are_not_numeric() {
        assert_ne!(classify(&strings(&["1", "NaN"]), 32).kind(), ColumnKind::Numeric);
    }

    #[test]
    fn test_parse_table() {
        let csv = "price, in_stock ,colour\n1.5,yes,red\n 3 ,no,blue\n10,yes,red\n";
        let table = parse_table("mem".into(), csv.as_bytes(), 32).unwrap();

        assert_eq!(table.rows(), 3);
        let names: Vec<_> = table.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["price", "in_stock", "colour"]);
        assert_eq!(table.columns[0].values, ColumnValues::Numeric(vec![1.5, 3.0, 10.0]));
        assert_eq!(table.columns[1].kind(), ColumnKind::Boolean);
        assert_eq!(table.columns[2].kind(), ColumnKind::Categorical);
    }

    #[test]
    fn test_header_only_is_an_error() {
        assert!(parse_table("mem".into(), "a,b\n".as_bytes(), 32).is_err());
    }

    #[test]
    fn test_duplicate_header_is_an_error() {
        let err = parse_table("mem".into(), "a,a\n1,1000\n2,2000\n3,3000\n".as_bytes(), 32)
            .unwrap_err();
        assert!(err.to_string().contains("duplicate column 'a'"), "{err}");
    }

    #[test]
    fn test_trimmed_headers_that_collide_are_an_error() {
        assert!(parse_table("mem".into(), "a, a \n1,2\n3,4\n".as_bytes(), 32).is_err());
    }

    #[test]
    fn test_ragged_rows_are_an_error() {
        assert!(parse_table("mem".into(), "a,b\n1,2\n3\n".as_bytes(), 32).is_err());
    }
}
