//! Extracts a module of terms from a source ontology: term-list parsing,
//! source-graph cleanup, and an upward structural closure over the seed
//! terms. This is a graph-level extraction, not a syntactic-locality module.

use crate::consts::{
    ANNOTATION_PROPERTY, MODULE_LINK_PREDICATES, NAMED_INDIVIDUAL, SUB_CLASS_OF, SUB_PROPERTY_OF,
    TYPE,
};
use crate::transform::declare_ontology;
use crate::util::{read_graph, read_to_string, write_graph};
use anyhow::{Context, Result};
use log::{debug, info};
use oxigraph::model::{
    BlankNode, Graph, NamedNode, NamedOrBlankNode, NamedOrBlankNodeRef, TermRef, Triple,
};
use std::collections::{HashSet, VecDeque};
use std::path::Path;

/// Three sets of term IRIs parsed from a line-oriented file: plain `http…`
/// lines are included in the module, `strip <iri> …` lines lose their
/// anonymous superclasses before extraction, and `remove <iri> …` lines are
/// deleted from the extracted module. Anything else is ignored.
#[derive(Debug, Default)]
pub struct TermList {
    pub include: HashSet<NamedNode>,
    pub strip: HashSet<NamedNode>,
    pub remove: HashSet<NamedNode>,
}

impl TermList {
    pub fn parse(text: &str) -> Result<TermList> {
        let mut terms = TermList::default();
        for line in text.lines() {
            let line = line.trim();
            if let Some(rest) = line.strip_prefix("strip ") {
                if let Some(iri) = first_iri(rest) {
                    terms.strip.insert(NamedNode::new(iri)?);
                }
            } else if let Some(rest) = line.strip_prefix("remove ") {
                if let Some(iri) = first_iri(rest) {
                    terms.remove.insert(NamedNode::new(iri)?);
                }
            } else if let Some(iri) = first_iri(line) {
                terms.include.insert(NamedNode::new(iri)?);
            }
        }
        Ok(terms)
    }

    pub fn from_path(path: &Path) -> Result<TermList> {
        let text = read_to_string(path)?;
        TermList::parse(&text)
            .with_context(|| format!("Could not parse term list at {}", path.display()))
    }
}

/// The IRI token is the first whitespace-delimited word; the rest of the
/// line is a label or comment.
fn first_iri(line: &str) -> Option<&str> {
    let token = line.split_whitespace().next()?;
    token.starts_with("http").then_some(token)
}

/// Removes axioms that get in the way of extraction: rdfs:subPropertyOf
/// triples on declared annotation properties, and every triple mentioning a
/// declared named individual.
pub fn clean_graph(graph: &mut Graph) {
    let annotation_properties: HashSet<NamedOrBlankNode> = graph
        .triples_for_object(ANNOTATION_PROPERTY)
        .filter(|t| t.predicate == TYPE)
        .map(|t| t.subject.into_owned())
        .collect();
    let mut to_remove: Vec<Triple> = graph
        .triples_for_predicate(SUB_PROPERTY_OF)
        .filter(|t| annotation_properties.contains(&t.subject.into_owned()))
        .map(|t| t.into())
        .collect();

    let individuals: HashSet<NamedOrBlankNode> = graph
        .triples_for_object(NAMED_INDIVIDUAL)
        .filter(|t| t.predicate == TYPE)
        .map(|t| t.subject.into_owned())
        .collect();
    for triple in graph.iter() {
        let subject_is_individual = individuals.contains(&triple.subject.into_owned());
        let object_is_individual = match triple.object {
            TermRef::NamedNode(n) => individuals.contains(&NamedOrBlankNode::from(n.into_owned())),
            _ => false,
        };
        if subject_is_individual || object_is_individual {
            to_remove.push(triple.into());
        }
    }

    debug!("Cleaning {} axioms from the source graph", to_remove.len());
    for triple in to_remove {
        graph.remove(triple.as_ref());
    }
}

/// Collects a blank node's description transitively, following nested
/// blank nodes.
fn blank_tree(graph: &Graph, root: &BlankNode, out: &mut Vec<Triple>, seen: &mut HashSet<BlankNode>) {
    if !seen.insert(root.clone()) {
        return;
    }
    for triple in graph.triples_for_subject(root.as_ref()) {
        out.push(triple.into());
        if let TermRef::BlankNode(nested) = triple.object {
            blank_tree(graph, &nested.into_owned(), out, seen);
        }
    }
}

/// For each class in `classes`, removes rdfs:subClassOf axioms whose
/// superclass is anonymous, together with the blank-node expression body.
pub fn strip_anonymous_superclasses(graph: &mut Graph, classes: &HashSet<NamedNode>) {
    let mut to_remove: Vec<Triple> = vec![];
    for class in classes {
        for triple in graph.triples_for_subject(class.as_ref()) {
            if triple.predicate != SUB_CLASS_OF {
                continue;
            }
            if let TermRef::BlankNode(superclass) = triple.object {
                to_remove.push(triple.into());
                let mut seen = HashSet::new();
                blank_tree(graph, &superclass.into_owned(), &mut to_remove, &mut seen);
            }
        }
    }
    for triple in to_remove {
        graph.remove(triple.as_ref());
    }
}

/// Copies a term's description into the module: all its subject triples,
/// following blank-node bodies transitively, enqueuing every named node
/// reached through a structural predicate.
fn copy_description(
    source: &Graph,
    node: NamedOrBlankNodeRef,
    module: &mut Graph,
    queue: &mut VecDeque<NamedNode>,
    seen_blanks: &mut HashSet<BlankNode>,
) {
    for triple in source.triples_for_subject(node) {
        module.insert(triple);
        if MODULE_LINK_PREDICATES.contains(&triple.predicate) {
            if let TermRef::NamedNode(linked) = triple.object {
                queue.push_back(linked.into_owned());
            }
        }
        if let TermRef::BlankNode(body) = triple.object {
            let body = body.into_owned();
            if seen_blanks.insert(body.clone()) {
                copy_description(source, body.as_ref().into(), module, queue, seen_blanks);
            }
        }
    }
}

/// Extracts the upward structural closure of the seed terms: each term's
/// description plus, transitively, everything reachable through the
/// structural predicates in [`MODULE_LINK_PREDICATES`].
pub fn extract_module(source: &Graph, seeds: &HashSet<NamedNode>) -> Graph {
    let mut module = Graph::new();
    let mut queue: VecDeque<NamedNode> = seeds.iter().cloned().collect();
    let mut visited: HashSet<NamedNode> = HashSet::new();
    let mut seen_blanks: HashSet<BlankNode> = HashSet::new();
    while let Some(term) = queue.pop_front() {
        if !visited.insert(term.clone()) {
            continue;
        }
        copy_description(
            source,
            term.as_ref().into(),
            &mut module,
            &mut queue,
            &mut seen_blanks,
        );
    }
    debug!(
        "Extracted {} triples for {} terms",
        module.len(),
        visited.len()
    );
    module
}

/// Removes every triple mentioning one of the given terms.
pub fn remove_terms(graph: &mut Graph, terms: &HashSet<NamedNode>) {
    let mut to_remove: Vec<Triple> = vec![];
    for term in terms {
        to_remove.extend(graph.triples_for_subject(term.as_ref()).map(Triple::from));
        to_remove.extend(graph.triples_for_object(term.as_ref()).map(Triple::from));
    }
    for triple in to_remove {
        graph.remove(triple.as_ref());
    }
}

/// Extracts the terms listed at `terms_path` from the source ontology and
/// writes them as a new ontology named `target_iri`.
pub fn extract_file(
    source_path: &Path,
    terms_path: &Path,
    target_path: &Path,
    target_iri: &str,
) -> Result<()> {
    info!("Loading ontology from {}", source_path.display());
    let (mut source, prefixes) = read_graph(source_path)?;
    clean_graph(&mut source);

    info!("Extracting terms from {}", terms_path.display());
    let terms = TermList::from_path(terms_path)?;
    strip_anonymous_superclasses(&mut source, &terms.strip);

    let mut module = extract_module(&source, &terms.include);
    remove_terms(&mut module, &terms.remove);

    let iri = NamedNode::new(target_iri)
        .with_context(|| format!("Invalid ontology IRI: {}", target_iri))?;
    declare_ontology(&mut module, iri.as_ref());

    info!("Saving extracted ontology to {}", target_path.display());
    write_graph(&module, &prefixes, target_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::ONTOLOGY;
    use crate::transform::declared_ontology;
    use std::fs;

    const OBO: &str = "http://purl.obolibrary.org/obo/";

    fn node(local: &str) -> NamedNode {
        NamedNode::new(format!("{}{}", OBO, local)).unwrap()
    }

    fn source_ttl() -> String {
        format!(
            "@prefix obo: <{obo}> .\n\
             @prefix owl: <http://www.w3.org/2002/07/owl#> .\n\
             @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .\n\
             obo:A_1 a owl:Class ; rdfs:subClassOf obo:A_0 ;\n\
                 rdfs:subClassOf [ a owl:Restriction ;\n\
                     owl:onProperty obo:part_of ;\n\
                     owl:someValuesFrom obo:B_1 ] .\n\
             obo:A_0 a owl:Class ; rdfs:label \"root\" .\n\
             obo:B_1 a owl:Class .\n\
             obo:part_of a owl:ObjectProperty .\n\
             obo:unrelated a owl:Class ; rdfs:subClassOf obo:A_0 .\n\
             obo:note a owl:AnnotationProperty ; rdfs:subPropertyOf obo:meta .\n\
             obo:ind_1 a owl:NamedIndividual, obo:A_1 .\n",
            obo = OBO
        )
    }

    fn load_source() -> Graph {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("source.ttl");
        fs::write(&path, source_ttl()).unwrap();
        let (graph, _) = read_graph(&path).unwrap();
        graph
    }

    #[test]
    fn term_list_routes_lines_to_sets() {
        let terms = TermList::parse(
            "http://a.org/1 first label\n\
             strip http://a.org/2 stripped label\n\
             remove http://a.org/3 removed label\n\
             # a comment line\n\
             not an iri at all\n",
        )
        .unwrap();
        assert!(terms.include.contains(&NamedNode::new("http://a.org/1").unwrap()));
        assert!(terms.strip.contains(&NamedNode::new("http://a.org/2").unwrap()));
        assert!(terms.remove.contains(&NamedNode::new("http://a.org/3").unwrap()));
        assert_eq!(terms.include.len(), 1);
    }

    #[test]
    fn clean_graph_drops_individuals_and_annotation_subproperties() {
        let mut graph = load_source();
        clean_graph(&mut graph);
        assert_eq!(graph.triples_for_subject(node("ind_1").as_ref()).count(), 0);
        assert_eq!(
            graph
                .triples_for_predicate(SUB_PROPERTY_OF)
                .count(),
            0
        );
    }

    #[test]
    fn seed_pulls_in_superclasses_and_restriction_bodies() {
        let graph = load_source();
        let seeds: HashSet<NamedNode> = [node("A_1")].into_iter().collect();
        let module = extract_module(&graph, &seeds);

        // named superclass and its description
        assert!(module
            .triples_for_subject(node("A_0").as_ref())
            .next()
            .is_some());
        // restriction property and filler are reached through the blank body
        assert!(module
            .triples_for_subject(node("part_of").as_ref())
            .next()
            .is_some());
        assert!(module
            .triples_for_subject(node("B_1").as_ref())
            .next()
            .is_some());
        // unrelated classes stay out
        assert_eq!(
            module.triples_for_subject(node("unrelated").as_ref()).count(),
            0
        );
    }

    #[test]
    fn stripped_anonymous_superclasses_do_not_reach_the_module() {
        let mut graph = load_source();
        let strip: HashSet<NamedNode> = [node("A_1")].into_iter().collect();
        strip_anonymous_superclasses(&mut graph, &strip);
        let seeds: HashSet<NamedNode> = [node("A_1")].into_iter().collect();
        let module = extract_module(&graph, &seeds);
        // the restriction filler is no longer reachable
        assert_eq!(module.triples_for_subject(node("B_1").as_ref()).count(), 0);
        // the named superclass still is
        assert!(module
            .triples_for_subject(node("A_0").as_ref())
            .next()
            .is_some());
    }

    #[test]
    fn removed_terms_appear_nowhere() {
        let graph = load_source();
        let seeds: HashSet<NamedNode> = [node("A_1")].into_iter().collect();
        let mut module = extract_module(&graph, &seeds);
        let remove: HashSet<NamedNode> = [node("A_0")].into_iter().collect();
        remove_terms(&mut module, &remove);
        assert_eq!(module.triples_for_subject(node("A_0").as_ref()).count(), 0);
        assert_eq!(module.triples_for_object(node("A_0").as_ref()).count(), 0);
    }

    #[test]
    fn extract_file_declares_exactly_one_ontology() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source.ttl");
        fs::write(&source, source_ttl()).unwrap();
        let terms = dir.path().join("terms.txt");
        fs::write(&terms, format!("{}A_1 a label\n", OBO)).unwrap();
        let target = dir.path().join("module.ttl");
        extract_file(&source, &terms, &target, "http://example.com/module").unwrap();

        let (module, _) = read_graph(&target).unwrap();
        assert_eq!(
            declared_ontology(&module).unwrap().as_str(),
            "http://example.com/module"
        );
        assert_eq!(
            module
                .triples_for_object(ONTOLOGY)
                .filter(|t| t.predicate == TYPE)
                .count(),
            1
        );
    }
}
