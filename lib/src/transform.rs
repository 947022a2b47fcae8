//! Provides functions for rewriting RDF graphs before serialization.
//! This includes removing OWL imports and ontology declarations and
//! re-declaring a single ontology IRI.

use crate::consts::{IMPORTS, ONTOLOGY, TYPE};
use oxigraph::model::{
    Graph, NamedNode, NamedNodeRef, NamedOrBlankNodeRef, TermRef, Triple, TripleRef,
};

/// Remove all owl:imports statements from a graph. Helpful after computing
/// the union of all imports so that downstream tools do not attempt to fetch
/// these dependencies themselves.
pub fn remove_owl_imports(graph: &mut Graph) {
    let to_remove: Vec<Triple> = graph
        .triples_for_predicate(IMPORTS)
        .map(|triple| triple.into())
        .collect();
    for triple in to_remove {
        graph.remove(triple.as_ref());
    }
}

/// Collects the named-node objects of owl:imports statements.
pub fn owl_imports(graph: &Graph) -> Vec<NamedNode> {
    graph
        .triples_for_predicate(IMPORTS)
        .filter_map(|triple| match triple.object {
            TermRef::NamedNode(obj) => Some(obj.into_owned()),
            _ => None,
        })
        .collect()
}

/// Removes every owl:Ontology declaration from a graph.
pub fn remove_ontology_declarations(graph: &mut Graph) {
    let mut to_remove: Vec<Triple> = vec![];
    for triple in graph.triples_for_object(ONTOLOGY) {
        if triple.predicate == TYPE {
            to_remove.push(triple.into());
        }
    }
    for triple in to_remove {
        graph.remove(triple.as_ref());
    }
}

/// Returns the first named node declared as an owl:Ontology, if any.
pub fn declared_ontology(graph: &Graph) -> Option<NamedNode> {
    graph.triples_for_object(ONTOLOGY).find_map(|triple| {
        if triple.predicate != TYPE {
            return None;
        }
        match triple.subject {
            NamedOrBlankNodeRef::NamedNode(n) => Some(n.into_owned()),
            _ => None,
        }
    })
}

/// Makes `iri` the single owl:Ontology declared in the graph, dropping any
/// carried-over declarations.
pub fn declare_ontology(graph: &mut Graph, iri: NamedNodeRef) {
    remove_ontology_declarations(graph);
    graph.insert(TripleRef::new(iri, TYPE, ONTOLOGY));
}
