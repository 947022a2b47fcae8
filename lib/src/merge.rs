//! Merges ontology files into a single ontology with a new IRI, resolving
//! `owl:imports` against sibling files in each input's directory.

use crate::options::ImportResolution;
use crate::prefixes::PrefixMap;
use crate::transform::{declare_ontology, declared_ontology, owl_imports, remove_owl_imports};
use crate::util::{read_graph, write_graph};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use oxigraph::model::{Graph, NamedNode, NamedNodeRef};
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

const RDF_EXTENSIONS: [&str; 6] = ["ttl", "n3", "xml", "rdf", "owl", "nt"];

/// One ontology document on its way into the merge.
struct Input {
    path: PathBuf,
    graph: Graph,
    prefixes: PrefixMap,
}

fn load_input(path: &Path) -> Result<Input> {
    let (graph, prefixes) = read_graph(path)
        .with_context(|| format!("Could not load ontology at {}", path.display()))?;
    Ok(Input {
        path: path.to_path_buf(),
        graph,
        prefixes,
    })
}

/// Scans a directory (non-recursively) for an RDF file declaring the given
/// ontology IRI, returning it already parsed. Files that fail to parse are
/// skipped.
fn find_declaring_file(dir: &Path, iri: NamedNodeRef) -> Result<Option<Input>> {
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("Could not scan directory {}", dir.display()))?
    {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let ext = path.extension().and_then(|e| e.to_str());
        if !ext.is_some_and(|e| RDF_EXTENSIONS.contains(&e)) {
            continue;
        }
        let input = match load_input(&path) {
            Ok(input) => input,
            Err(e) => {
                debug!("Skipping unparsable candidate {}: {}", path.display(), e);
                continue;
            }
        };
        if declared_ontology(&input.graph).is_some_and(|n| n.as_str() == iri.as_str()) {
            return Ok(Some(input));
        }
    }
    Ok(None)
}

/// Pulls the local `owl:imports` closure of a graph into it, scanning each
/// importing file's directory for files declaring the imported IRIs.
/// Missing or unparsable imports are logged and skipped.
pub fn pull_local_imports(graph: &mut Graph, origin: &Path, prefixes: &mut PrefixMap) -> Result<()> {
    let origin_dir = origin
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let mut resolved: HashSet<NamedNode> = HashSet::new();
    if let Some(own) = declared_ontology(graph) {
        resolved.insert(own);
    }
    let mut queue: VecDeque<(NamedNode, PathBuf)> = owl_imports(graph)
        .into_iter()
        .map(|iri| (iri, origin_dir.clone()))
        .collect();

    while let Some((iri, dir)) = queue.pop_front() {
        if !resolved.insert(iri.clone()) {
            continue;
        }
        match find_declaring_file(&dir, iri.as_ref())? {
            Some(imported) => {
                debug!("Resolved import {} to {}", iri, imported.path.display());
                let imported_dir = imported.path.parent().map(Path::to_path_buf).unwrap_or(dir);
                for import in owl_imports(&imported.graph) {
                    queue.push_back((import, imported_dir.clone()));
                }
                for triple in imported.graph.iter() {
                    graph.insert(triple);
                }
                prefixes.merge(&imported.prefixes);
            }
            None => {
                warn!(
                    "Could not resolve owl:imports {} in {}",
                    iri,
                    dir.display()
                );
            }
        }
    }
    Ok(())
}

/// Merges the input ontology files into a single graph declared as `iri`,
/// and writes it to `output`. Graphs whose declared ontology IRI was already
/// merged are skipped; the first declaration of a prefix wins.
pub fn merge_files(
    inputs: &[PathBuf],
    output: &Path,
    iri: &str,
    imports: ImportResolution,
) -> Result<Graph> {
    let mut queue: VecDeque<Input> = VecDeque::new();
    for path in inputs {
        queue.push_back(load_input(path)?);
    }

    let mut merged = Graph::new();
    let mut prefixes = PrefixMap::new();
    let mut seen: HashSet<NamedNode> = HashSet::new();
    while let Some(input) = queue.pop_front() {
        if let Some(declared) = declared_ontology(&input.graph) {
            if !seen.insert(declared.clone()) {
                debug!(
                    "Skipping {}: ontology {} already merged",
                    input.path.display(),
                    declared
                );
                continue;
            }
        }
        if imports.is_resolve() {
            let dir = input
                .path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            for import in owl_imports(&input.graph) {
                if seen.contains(&import) {
                    continue;
                }
                match find_declaring_file(&dir, import.as_ref())? {
                    Some(input) => queue.push_back(input),
                    None => warn!(
                        "Could not resolve owl:imports {} in {}",
                        import,
                        dir.display()
                    ),
                }
            }
        }
        for triple in input.graph.iter() {
            merged.insert(triple);
        }
        prefixes.merge(&input.prefixes);
    }

    remove_owl_imports(&mut merged);
    let iri = NamedNode::new(iri).with_context(|| format!("Invalid ontology IRI: {}", iri))?;
    declare_ontology(&mut merged, iri.as_ref());

    info!(
        "Merged {} inputs into {} triples at {}",
        inputs.len(),
        merged.len(),
        output.display()
    );
    write_graph(&merged, &prefixes, output)?;
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{IMPORTS, ONTOLOGY, TYPE};
    use std::fs;

    fn write_onto(path: &Path, iri: &str, body: &str) {
        let content = format!(
            "@prefix owl: <http://www.w3.org/2002/07/owl#> .\n\
             @prefix ex: <http://example.com/> .\n\
             <{}> a owl:Ontology .\n{}",
            iri, body
        );
        fs::write(path, content).unwrap();
    }

    #[test]
    fn merged_output_declares_one_ontology_and_no_imports() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.ttl");
        write_onto(&a, "http://example.com/a", "ex:x ex:p ex:y .\n");
        let b = dir.path().join("b.ttl");
        write_onto(&b, "http://example.com/b", "ex:y ex:p ex:z .\n");
        let output = dir.path().join("merged.ttl");

        let merged = merge_files(
            &[a, b],
            &output,
            "http://example.com/merged",
            ImportResolution::Ignore,
        )
        .unwrap();

        assert_eq!(merged.triples_for_predicate(IMPORTS).count(), 0);
        let declarations: Vec<_> = merged
            .triples_for_object(ONTOLOGY)
            .filter(|t| t.predicate == TYPE)
            .collect();
        assert_eq!(declarations.len(), 1);
        assert_eq!(
            declarations[0].subject.to_string(),
            "<http://example.com/merged>"
        );
        // both bodies made it into the union
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn sibling_imports_are_resolved_when_enabled() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.ttl");
        write_onto(
            &a,
            "http://example.com/a",
            "<http://example.com/a> owl:imports <http://example.com/b> .\n\
             ex:x ex:p ex:y .\n",
        );
        let b = dir.path().join("b.ttl");
        write_onto(&b, "http://example.com/b", "ex:y ex:p ex:z .\n");

        let resolved = merge_files(
            &[a.clone()],
            &dir.path().join("with.ttl"),
            "http://example.com/merged",
            ImportResolution::Resolve,
        )
        .unwrap();
        assert!(resolved.contains(oxigraph::model::TripleRef::new(
            NamedNodeRef::new("http://example.com/y").unwrap(),
            NamedNodeRef::new("http://example.com/p").unwrap(),
            NamedNodeRef::new("http://example.com/z").unwrap(),
        )));

        let unresolved = merge_files(
            &[a],
            &dir.path().join("without.ttl"),
            "http://example.com/merged",
            ImportResolution::Ignore,
        )
        .unwrap();
        assert!(!unresolved.contains(oxigraph::model::TripleRef::new(
            NamedNodeRef::new("http://example.com/y").unwrap(),
            NamedNodeRef::new("http://example.com/p").unwrap(),
            NamedNodeRef::new("http://example.com/z").unwrap(),
        )));
    }

    #[test]
    fn missing_imports_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.ttl");
        write_onto(
            &a,
            "http://example.com/a",
            "<http://example.com/a> owl:imports <http://example.com/nowhere> .\n",
        );
        let merged = merge_files(
            &[a],
            &dir.path().join("merged.ttl"),
            "http://example.com/merged",
            ImportResolution::Resolve,
        )
        .unwrap();
        assert_eq!(merged.triples_for_predicate(IMPORTS).count(), 0);
    }

    #[test]
    fn unparsable_sibling_does_not_abort_the_merge() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.ttl");
        write_onto(
            &a,
            "http://example.com/a",
            "<http://example.com/a> owl:imports <http://example.com/b> .\n",
        );
        fs::write(dir.path().join("b.ttl"), "this is not turtle").unwrap();
        let merged = merge_files(
            &[a],
            &dir.path().join("merged.ttl"),
            "http://example.com/merged",
            ImportResolution::Resolve,
        )
        .unwrap();
        assert_eq!(merged.triples_for_predicate(IMPORTS).count(), 0);
    }

    #[test]
    fn unreadable_input_is_a_hard_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = merge_files(
            &[dir.path().join("missing.ttl")],
            &dir.path().join("merged.ttl"),
            "http://example.com/merged",
            ImportResolution::Ignore,
        )
        .unwrap_err();
        assert!(err.to_string().contains("missing.ttl"));
    }

    #[test]
    fn pull_local_imports_unions_sibling_graphs() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.ttl");
        write_onto(
            &a,
            "http://example.com/a",
            "<http://example.com/a> owl:imports <http://example.com/b> .\n",
        );
        let b = dir.path().join("b.ttl");
        write_onto(&b, "http://example.com/b", "ex:y ex:p ex:z .\n");

        let (mut graph, mut prefixes) = read_graph(&a).unwrap();
        pull_local_imports(&mut graph, &a, &mut prefixes).unwrap();
        assert!(graph.contains(oxigraph::model::TripleRef::new(
            NamedNodeRef::new("http://example.com/y").unwrap(),
            NamedNodeRef::new("http://example.com/p").unwrap(),
            NamedNodeRef::new("http://example.com/z").unwrap(),
        )));
    }
}
