//! Shared option types that replace boolean flag parameters in the Rust API.

/// Controls whether `owl:imports` statements are resolved against sibling
/// files when loading an ontology.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum ImportResolution {
    /// Scan the ontology file's directory for files declaring imported IRIs.
    #[default]
    Resolve,
    /// Load only the named file; leave imports unresolved.
    Ignore,
}

impl ImportResolution {
    pub fn is_resolve(self) -> bool {
        matches!(self, ImportResolution::Resolve)
    }
}

impl From<bool> for ImportResolution {
    fn from(value: bool) -> Self {
        if value {
            ImportResolution::Resolve
        } else {
            ImportResolution::Ignore
        }
    }
}

impl From<ImportResolution> for bool {
    fn from(value: ImportResolution) -> Self {
        value.is_resolve()
    }
}
