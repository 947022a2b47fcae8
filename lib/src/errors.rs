// RowShape and TermExpansion errors

use std::fmt;

/// A data row whose cell count does not match the header row.
#[derive(Debug)]
pub struct RowShapeError {
    /// 1-based data row number (the header is row 0).
    pub row: usize,
    pub expected: usize,
    pub found: usize,
}

impl fmt::Display for RowShapeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Row {} has {} cells but the header has {}",
            self.row, self.found, self.expected
        )
    }
}

impl std::error::Error for RowShapeError {}

/// A term that could not be expanded into a valid IRI.
#[derive(Debug)]
pub struct TermExpansionError {
    pub term: String,
}

impl fmt::Display for TermExpansionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Could not expand term '{}' into an IRI", self.term)
    }
}

impl std::error::Error for TermExpansionError {}
