//! Prefix declarations collected from Turtle documents, used to expand
//! CURIEs (`prefix:local`) into full IRIs.

use crate::errors::TermExpansionError;
use anyhow::Result;
use oxigraph::model::NamedNode;
use std::collections::BTreeMap;
use std::path::Path;

/// A mapping from short prefix names to namespace IRIs. The empty prefix
/// name covers bare local names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixMap {
    entries: BTreeMap<String, String>,
}

impl PrefixMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the `@prefix` declarations of a Turtle document, discarding its
    /// triples.
    pub fn from_turtle_file(path: &Path) -> Result<Self> {
        let (_, prefixes) = crate::util::read_graph(path)?;
        Ok(prefixes)
    }

    /// Inserts a declaration, replacing any previous namespace for the name.
    pub fn insert(&mut self, name: impl Into<String>, namespace: impl Into<String>) {
        self.entries.insert(name.into(), namespace.into());
    }

    /// Copies declarations from `other`, keeping existing ones on conflict.
    pub fn merge(&mut self, other: &PrefixMap) {
        for (name, namespace) in other.iter() {
            self.entries
                .entry(name.to_string())
                .or_insert_with(|| namespace.to_string());
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(|s| s.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Expands a term into a named node. A `prefix:local` term with a
    /// declared prefix is expanded against its namespace; a term that is
    /// already an absolute IRI is kept as-is; a bare term is expanded
    /// against the empty prefix. Anything else, or an expansion that is not
    /// a valid IRI, is a [`TermExpansionError`].
    pub fn expand(&self, term: &str) -> Result<NamedNode, TermExpansionError> {
        let err = || TermExpansionError {
            term: term.to_string(),
        };
        if let Some((prefix, local)) = term.split_once(':') {
            if let Some(namespace) = self.entries.get(prefix) {
                return NamedNode::new(format!("{}{}", namespace, local)).map_err(|_| err());
            }
            // not a declared prefix, but possibly an absolute IRI already
            return NamedNode::new(term).map_err(|_| err());
        }
        match self.entries.get("") {
            Some(namespace) => NamedNode::new(format!("{}{}", namespace, term)).map_err(|_| err()),
            None => Err(err()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PrefixMap {
        let mut prefixes = PrefixMap::new();
        prefixes.insert("tutorial", "http://example.com/tutorial/");
        prefixes.insert("study", "http://example.com/study/");
        prefixes
    }

    #[test]
    fn expand_curie() {
        let prefixes = sample();
        let node = prefixes.expand("study:subject-7").unwrap();
        assert_eq!(node.as_str(), "http://example.com/study/subject-7");
    }

    #[test]
    fn expand_absolute_iri_passthrough() {
        let prefixes = sample();
        let node = prefixes.expand("http://example.com/other#thing").unwrap();
        assert_eq!(node.as_str(), "http://example.com/other#thing");
    }

    #[test]
    fn expand_bare_term_uses_empty_prefix() {
        let mut prefixes = sample();
        assert!(prefixes.expand("loner").is_err());
        prefixes.insert("", "http://example.com/default/");
        let node = prefixes.expand("loner").unwrap();
        assert_eq!(node.as_str(), "http://example.com/default/loner");
    }

    #[test]
    fn expand_invalid_expansion_is_an_error() {
        let mut prefixes = PrefixMap::new();
        prefixes.insert("bad", "not an iri ");
        assert!(prefixes.expand("bad:thing").is_err());
    }

    #[test]
    fn merge_keeps_first_declaration() {
        let mut prefixes = sample();
        let mut other = PrefixMap::new();
        other.insert("study", "http://elsewhere.org/study/");
        other.insert("obo", "http://purl.obolibrary.org/obo/");
        prefixes.merge(&other);
        assert_eq!(prefixes.get("study"), Some("http://example.com/study/"));
        assert_eq!(prefixes.get("obo"), Some("http://purl.obolibrary.org/obo/"));
    }
}
