//! Naive table-to-triples conversion: one typed entity per data row, one
//! statement per non-empty cell, with predicates derived from the column
//! headers.

use crate::consts::TYPE;
use crate::prefixes::PrefixMap;
use crate::table::Table;
use crate::util::write_triples;
use anyhow::Result;
use log::info;
use oxigraph::model::{Literal, NamedNode, Term, Triple};
use std::path::Path;

/// Columns whose cells stay plain literals instead of being expanded into
/// IRIs.
fn is_literal_column(header: &str) -> bool {
    matches!(header, "datetime" | "comment")
}

/// Converts a table to triples. Data rows are numbered from 1 in input
/// order; each row gets a `tutorial:row-<n> rdf:type tutorial:row` assertion
/// followed by one statement per non-empty cell, in column order. The
/// statement count is therefore the row count plus the non-empty cell count.
pub fn convert_table(prefixes: &PrefixMap, input: &Table) -> Result<Vec<Triple>> {
    let row_class: NamedNode = prefixes.expand("tutorial:row")?;
    let predicates: Vec<NamedNode> = input
        .headers()
        .iter()
        .map(|header| prefixes.expand(&format!("tutorial:column-{}", header)))
        .collect::<Result<_, _>>()?;

    let mut statements: Vec<Triple> = vec![];
    for (i, row) in input.rows().iter().enumerate() {
        let subject: NamedNode = prefixes.expand(&format!("tutorial:row-{}", i + 1))?;
        statements.push(Triple::new(
            subject.clone(),
            TYPE.into_owned(),
            row_class.clone(),
        ));
        for ((cell, header), predicate) in row.iter().zip(input.headers()).zip(&predicates) {
            if cell.is_empty() {
                continue;
            }
            let object: Term = if is_literal_column(header) {
                Literal::new_simple_literal(cell).into()
            } else {
                prefixes.expand(cell)?.into()
            };
            statements.push(Triple::new(subject.clone(), predicate.clone(), object));
        }
    }
    Ok(statements)
}

/// Loads the prefix document and input table, converts, and serializes the
/// statements together with the prefixes to a Turtle file.
pub fn convert_file(
    prefix_path: &Path,
    input_path: &Path,
    output_path: &Path,
) -> Result<Vec<Triple>> {
    let prefixes = PrefixMap::from_turtle_file(prefix_path)?;
    let input = Table::from_path(input_path)?;
    let statements = convert_table(&prefixes, &input)?;
    write_triples(&statements, &prefixes, output_path)?;
    info!(
        "Converted {} rows into {} statements at {}",
        input.len(),
        statements.len(),
        output_path.display()
    );
    Ok(statements)
}
