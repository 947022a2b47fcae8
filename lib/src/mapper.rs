//! Rewrites the cells of a data table using a term-to-CURIE mapping plus a
//! small set of per-column rules.

use crate::table::Table;
use anyhow::{anyhow, Context, Result};
use chrono::NaiveDateTime;
use log::{debug, info};
use std::collections::HashMap;
use std::path::Path;

/// A lookup table from a vocabulary term string to a canonical CURIE.
pub type TermMap = HashMap<String, String>;

/// The datetime format the source spreadsheets use, e.g. `1/1/14 10:21 AM`.
const SOURCE_DATE_FORMAT: &str = "%d/%m/%y %I:%M %p";
/// ISO-8601 with a numeric UTC offset, e.g. `2014-01-01T10:21:00+0000`.
const TARGET_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// What to do with a cell whose text is not in the term map, keyed on its
/// column header. Unrecognized headers fall through to `Passthrough`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ColumnRule {
    /// Reformat a spreadsheet datetime to ISO-8601, keeping the cell on
    /// parse failure.
    ReformatDate,
    /// Prefix the cell with `study:subject-`.
    SubjectId,
    /// Prefix the cell with `study:group-`.
    GroupId,
    /// Copy the cell unchanged.
    Passthrough,
}

impl ColumnRule {
    pub fn for_header(header: &str) -> ColumnRule {
        match header {
            "datetime" => ColumnRule::ReformatDate,
            "subject" => ColumnRule::SubjectId,
            "group" => ColumnRule::GroupId,
            _ => ColumnRule::Passthrough,
        }
    }
}

/// Reformats a source datetime cell. `None` means the cell did not parse;
/// callers keep the original text.
fn reformat_datetime(cell: &str) -> Option<String> {
    NaiveDateTime::parse_from_str(cell, SOURCE_DATE_FORMAT)
        .ok()
        .map(|dt| dt.and_utc().format(TARGET_DATE_FORMAT).to_string())
}

fn map_cell(term_map: &TermMap, rule: ColumnRule, cell: &str) -> String {
    // the term map always wins over column rules
    if let Some(replacement) = term_map.get(cell) {
        return replacement.clone();
    }
    match rule {
        ColumnRule::ReformatDate => match reformat_datetime(cell) {
            Some(reformatted) => reformatted,
            None => cell.to_string(),
        },
        ColumnRule::SubjectId => format!("study:subject-{}", cell),
        ColumnRule::GroupId => format!("study:group-{}", cell),
        ColumnRule::Passthrough => cell.to_string(),
    }
}

/// Applies the term map and column rules to every data cell. The header row
/// is passed through unchanged, and the output has the same shape as the
/// input.
pub fn map_table(term_map: &TermMap, input: &Table) -> Table {
    let rules: Vec<ColumnRule> = input
        .headers()
        .iter()
        .map(|h| ColumnRule::for_header(h))
        .collect();
    let rows: Vec<Vec<String>> = input
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .zip(&rules)
                .map(|(cell, rule)| map_cell(term_map, *rule, cell))
                .collect()
        })
        .collect();
    // every output row was built cell for cell from an input row
    Table::from_parts(input.headers().to_vec(), rows)
}

/// Builds a term map from a mapping table: terms in the first column, CURIEs
/// in the fourth, keeping only rows where both are non-empty. The last
/// occurrence of a duplicated term wins.
pub fn load_term_map(path: &Path) -> Result<TermMap> {
    let table = Table::from_path(path)
        .with_context(|| format!("Could not load term mapping from {}", path.display()))?;
    if table.headers().len() < 4 {
        return Err(anyhow!(
            "Term mapping at {} needs at least 4 columns, found {}",
            path.display(),
            table.headers().len()
        ));
    }
    let mut term_map = TermMap::new();
    for row in table.rows() {
        let term = &row[0];
        let curie = &row[3];
        if !term.is_empty() && !curie.is_empty() {
            term_map.insert(term.clone(), curie.clone());
        }
    }
    debug!("Loaded {} term mappings from {}", term_map.len(), path.display());
    Ok(term_map)
}

/// Loads the term mapping and input tables, maps every cell, and writes the
/// result as CSV.
pub fn map_file(term_map_path: &Path, input_path: &Path, output_path: &Path) -> Result<Table> {
    let term_map = load_term_map(term_map_path)?;
    let input = Table::from_path(input_path)?;
    let output = map_table(&term_map, &input);
    output.write_to_path(output_path)?;
    info!(
        "Mapped {} rows from {} to {}",
        output.len(),
        input_path.display(),
        output_path.display()
    );
    Ok(output)
}
