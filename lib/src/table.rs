//! A small tabular data model backed by CSV files: an ordered header row
//! plus positionally aligned data rows of cell strings.

use crate::errors::RowShapeError;
use anyhow::{anyhow, Context, Error, Result};
use log::debug;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Builds a table, checking that every data row has the same cell count
    /// as the header.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        for (i, row) in rows.iter().enumerate() {
            if row.len() != headers.len() {
                return Err(Error::new(RowShapeError {
                    row: i + 1,
                    expected: headers.len(),
                    found: row.len(),
                }));
            }
        }
        Ok(Table { headers, rows })
    }

    /// Builds a table from rows already known to match the header shape.
    pub(crate) fn from_parts(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Table { headers, rows }
    }

    /// Reads a CSV file with a mandatory header row. Rows whose shape does
    /// not match the header are a [`RowShapeError`].
    pub fn from_path(path: &Path) -> Result<Self> {
        debug!("Reading table from {}", path.display());
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("Could not read CSV file at {}", path.display()))?;
        let mut records = reader.records();
        let headers: Vec<String> = match records.next() {
            Some(record) => record
                .with_context(|| format!("Could not parse CSV file at {}", path.display()))?
                .iter()
                .map(|s| s.to_string())
                .collect(),
            None => return Err(anyhow!("CSV file at {} has no header row", path.display())),
        };
        let mut rows: Vec<Vec<String>> = vec![];
        for record in records {
            let record = record
                .with_context(|| format!("Could not parse CSV file at {}", path.display()))?;
            rows.push(record.iter().map(|s| s.to_string()).collect());
        }
        Table::new(headers, rows)
            .with_context(|| format!("Malformed table in CSV file at {}", path.display()))
    }

    /// Writes the table, header row first, as CSV.
    pub fn write_to_path(&self, path: &Path) -> Result<()> {
        debug!(
            "Writing table with {} rows to {}",
            self.rows.len(),
            path.display()
        );
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Could not write CSV file to {}", path.display()))?;
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer
            .flush()
            .with_context(|| format!("Could not write CSV file to {}", path.display()))?;
        Ok(())
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows, excluding the header.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RowShapeError;
    use std::fs;

    #[test]
    fn row_shape_is_checked() {
        let headers = vec!["a".to_string(), "b".to_string()];
        let rows = vec![vec!["1".to_string()]];
        let err = Table::new(headers, rows).unwrap_err();
        let shape = err.downcast_ref::<RowShapeError>().unwrap();
        assert_eq!(shape.row, 1);
        assert_eq!(shape.expected, 2);
        assert_eq!(shape.found, 1);
    }

    #[test]
    fn read_and_write_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.csv");
        fs::write(&input, "a,b\n1,2\n3,\"with, comma\"\n").unwrap();
        let table = Table::from_path(&input).unwrap();
        assert_eq!(table.headers(), &["a", "b"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[1][1], "with, comma");

        let output = dir.path().join("out.csv");
        table.write_to_path(&output).unwrap();
        let reread = Table::from_path(&output).unwrap();
        assert_eq!(reread, table);
    }

    #[test]
    fn ragged_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("ragged.csv");
        fs::write(&input, "a,b,c\n1,2,3\n1,2\n").unwrap();
        let err = Table::from_path(&input).unwrap_err();
        assert!(err.to_string().contains("ragged.csv"));
        assert!(err.chain().any(|c| c.is::<RowShapeError>()));
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = Table::from_path(Path::new("no/such/table.csv")).unwrap_err();
        assert!(err.to_string().contains("no/such/table.csv"));
    }
}
