//! Runs a SPARQL Update over converted instance data plus an application
//! ontology, and returns the resulting data graph. The `tutorial` prefix of
//! the data file names the working graphs: `<ns>raw` holds the instance
//! data, `<ns>ontology` the ontology, and `<ns>data` the result.

use crate::merge::pull_local_imports;
use crate::options::ImportResolution;
use crate::prefixes::PrefixMap;
use crate::util::{read_graph, read_to_string, write_graph};
use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use oxigraph::model::{Graph, NamedNode, QuadRef, Triple};
use oxigraph::store::Store;
use std::path::Path;

fn graph_name(namespace: &str, suffix: &str) -> Result<NamedNode> {
    NamedNode::new(format!("{}{}", namespace, suffix))
        .with_context(|| format!("Invalid graph name: {}{}", namespace, suffix))
}

/// Loads the instance data and ontology into a fresh in-memory store, runs
/// the SPARQL Update, and returns the contents of the `<ns>data` graph plus
/// the data file's prefix map.
pub fn run_model(
    data_path: &Path,
    ontology_path: &Path,
    update_path: &Path,
    imports: ImportResolution,
) -> Result<(Graph, PrefixMap)> {
    let (data, prefixes) = read_graph(data_path)?;
    let namespace = prefixes
        .get("tutorial")
        .ok_or_else(|| {
            anyhow!(
                "No 'tutorial' prefix declared in {}; it names the working graphs",
                data_path.display()
            )
        })?
        .to_string();

    let (mut ontology, mut ontology_prefixes) = read_graph(ontology_path)?;
    if imports.is_resolve() {
        pull_local_imports(&mut ontology, ontology_path, &mut ontology_prefixes)?;
    }

    let store = Store::new()?;
    let raw_name = graph_name(&namespace, "raw")?;
    for triple in data.iter() {
        store.insert(QuadRef::new(
            triple.subject,
            triple.predicate,
            triple.object,
            raw_name.as_ref(),
        ))?;
    }
    let ontology_name = graph_name(&namespace, "ontology")?;
    for triple in ontology.iter() {
        store.insert(QuadRef::new(
            triple.subject,
            triple.predicate,
            triple.object,
            ontology_name.as_ref(),
        ))?;
    }
    debug!(
        "Loaded {} raw and {} ontology triples into the store",
        data.len(),
        ontology.len()
    );

    let update = read_to_string(update_path)?;
    store
        .update(update.as_str())
        .with_context(|| format!("Could not run SPARQL Update at {}", update_path.display()))?;

    let data_name = graph_name(&namespace, "data")?;
    let mut result = Graph::new();
    for quad in store.quads_for_pattern(None, None, None, Some(data_name.as_ref().into())) {
        let quad = quad?;
        result.insert(&Triple::new(quad.subject, quad.predicate, quad.object));
    }
    info!("Update produced {} triples in {}", result.len(), data_name);
    Ok((result, prefixes))
}

/// Runs the model step and writes the resulting data graph to `output`.
pub fn model_file(
    data_path: &Path,
    ontology_path: &Path,
    update_path: &Path,
    output_path: &Path,
    imports: ImportResolution,
) -> Result<()> {
    let (result, prefixes) = run_model(data_path, ontology_path, update_path, imports)?;
    write_graph(&result, &prefixes, output_path)
}
