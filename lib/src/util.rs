use anyhow::{Context, Result};

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use oxigraph::io::{RdfFormat, RdfParser, RdfSerializer};
use oxigraph::model::{Graph, Triple, TripleRef};

use crate::prefixes::PrefixMap;

use log::debug;

/// Picks an RDF format from a file extension, defaulting to Turtle.
pub fn format_for_path(path: &Path) -> RdfFormat {
    let ext = path.extension().and_then(|ext| ext.to_str());
    match ext {
        Some("ttl") | Some("n3") => RdfFormat::Turtle,
        Some("xml") | Some("rdf") | Some("owl") => RdfFormat::RdfXml,
        Some("nt") => RdfFormat::NTriples,
        _ => RdfFormat::Turtle,
    }
}

/// Reads an RDF file into a graph, capturing the prefix declarations the
/// parser encounters along the way.
pub fn read_graph(path: &Path) -> Result<(Graph, PrefixMap)> {
    debug!("Reading RDF file: {}", path.display());
    let file = File::open(path)
        .with_context(|| format!("Could not read RDF file at {}", path.display()))?;
    let content = BufReader::new(file);
    let mut parser = RdfParser::from_format(format_for_path(path)).for_reader(content);
    let mut graph = Graph::new();
    for quad in &mut parser {
        let quad =
            quad.with_context(|| format!("Could not parse RDF file at {}", path.display()))?;
        graph.insert(&Triple::new(quad.subject, quad.predicate, quad.object));
    }
    let mut prefixes = PrefixMap::new();
    for (name, namespace) in parser.prefixes() {
        prefixes.insert(name, namespace);
    }
    Ok((graph, prefixes))
}

fn write_rdf<'a>(
    triples: impl Iterator<Item = TripleRef<'a>>,
    prefixes: &PrefixMap,
    path: &Path,
) -> Result<()> {
    let mut serializer = RdfSerializer::from_format(format_for_path(path));
    for (name, namespace) in prefixes.iter() {
        serializer = serializer
            .with_prefix(name, namespace)
            .with_context(|| format!("Invalid namespace for prefix '{}'", name))?;
    }
    let mut file = File::create(path)
        .with_context(|| format!("Could not write RDF file to {}", path.display()))?;
    let mut writer = serializer.for_writer(&mut file);
    for triple in triples {
        writer.serialize_triple(triple)?;
    }
    writer.finish()?;
    Ok(())
}

/// Writes a graph to a file with the given prefix declarations, format
/// chosen by extension.
pub fn write_graph(graph: &Graph, prefixes: &PrefixMap, path: &Path) -> Result<()> {
    debug!(
        "Writing graph to file: {} with length {}",
        path.display(),
        graph.len()
    );
    write_rdf(graph.iter(), prefixes, path)
}

/// Writes a triple sequence to a file in its given order.
pub fn write_triples(triples: &[Triple], prefixes: &PrefixMap, path: &Path) -> Result<()> {
    debug!(
        "Writing {} triples to file: {}",
        triples.len(),
        path.display()
    );
    write_rdf(triples.iter().map(|t| t.as_ref()), prefixes, path)
}

/// Reads a whole text file, naming the path on failure.
pub fn read_to_string(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Could not read file at {}", path.display()))
}
