//! Data processing tools for the OBO tutorial pipeline.
//!
//! Five operations, each a thin orchestration over the `oxigraph` RDF
//! toolkit and the `csv` reader:
//!
//! - [`module::extract_file`] pulls a module of terms out of a source
//!   ontology,
//! - [`mapper::map_file`] rewrites the cells of a data table using a
//!   term-to-CURIE mapping plus per-column rules,
//! - [`convert::convert_file`] naively converts a table to triples using
//!   its headers,
//! - [`model::model_file`] runs a SPARQL Update over the converted data
//!   plus an application ontology,
//! - [`merge::merge_files`] merges ontology files into one ontology with a
//!   new IRI.

pub mod consts;
pub mod convert;
pub mod errors;
pub mod mapper;
pub mod merge;
pub mod model;
pub mod module;
pub mod options;
pub mod prefixes;
pub mod table;
pub mod transform;
pub mod util;

pub use crate::mapper::TermMap;
pub use crate::options::ImportResolution;
pub use crate::prefixes::PrefixMap;
pub use crate::table::Table;
