use anyhow::Result;
use clap::{Parser, Subcommand};
use obokit::{convert, mapper, merge, model, module, ImportResolution};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "obokit")]
#[command(about = "Ontology and tabular data tools for the OBO tutorial")]
#[command(arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Verbose mode - sets the log level to info, defaults to warning level
    #[clap(long, short, action, default_value = "false", global = true)]
    verbose: bool,
    /// Debug mode - sets the log level to debug, defaults to warning level
    #[clap(long, action, default_value = "false", global = true)]
    debug: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract a list of terms from a source ontology into a new ontology
    Extract {
        /// The path of the source ontology file
        source: PathBuf,
        /// The path of the term list file
        terms: PathBuf,
        /// The path of the extracted ontology (output) file
        target: PathBuf,
        /// The IRI of the extracted ontology
        iri: String,
    },
    /// Apply a term-to-CURIE mapping to the cells of a CSV file
    Map {
        /// The path of the term mapping CSV file
        term_map: PathBuf,
        /// The path of the input CSV file
        input: PathBuf,
        /// The path of the output CSV file
        output: PathBuf,
    },
    /// Naively convert a CSV file to triples based on its headers
    Convert {
        /// The path of a Turtle file whose prefixes are used for expansion
        prefixes: PathBuf,
        /// The path of the input CSV file
        input: PathBuf,
        /// The path of the output Turtle file
        output: PathBuf,
    },
    /// Run a SPARQL Update over converted data plus an application ontology
    Model {
        /// The path of the input Turtle file with instance data
        data: PathBuf,
        /// The path of the application ontology file
        ontology: PathBuf,
        /// The path of the SPARQL Update file
        update: PathBuf,
        /// The path of the output Turtle file
        output: PathBuf,
        /// Do not resolve owl:imports against sibling files
        #[clap(long = "no-imports", action)]
        no_imports: bool,
    },
    /// Merge ontology files into one ontology with a new IRI
    Merge {
        /// The paths of the input ontology files
        #[clap(num_args = 1.., required = true)]
        inputs: Vec<PathBuf>,
        /// The path of the merged ontology (output) file
        #[clap(long, short)]
        output: PathBuf,
        /// The IRI of the merged ontology
        #[clap(long)]
        iri: String,
        /// Do not resolve owl:imports against sibling files
        #[clap(long = "no-imports", action)]
        no_imports: bool,
    },
}

fn main() -> Result<()> {
    let cmd = Cli::parse();

    let log_level = if cmd.verbose { "info" } else { "warn" };
    let log_level = if cmd.debug { "debug" } else { log_level };
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("OBOKIT_LOG", log_level))
        .init();

    match cmd.command {
        Commands::Extract {
            source,
            terms,
            target,
            iri,
        } => module::extract_file(&source, &terms, &target, &iri)?,
        Commands::Map {
            term_map,
            input,
            output,
        } => {
            mapper::map_file(&term_map, &input, &output)?;
        }
        Commands::Convert {
            prefixes,
            input,
            output,
        } => {
            convert::convert_file(&prefixes, &input, &output)?;
        }
        Commands::Model {
            data,
            ontology,
            update,
            output,
            no_imports,
        } => model::model_file(
            &data,
            &ontology,
            &update,
            &output,
            ImportResolution::from(!no_imports),
        )?,
        Commands::Merge {
            inputs,
            output,
            iri,
            no_imports,
        } => {
            merge::merge_files(&inputs, &output, &iri, ImportResolution::from(!no_imports))?;
        }
    }
    Ok(())
}
