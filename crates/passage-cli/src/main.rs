//! Passage CLI - Alias-annotation corpus tools
//!
//! Usage:
//!   passage convert <ann> <doc> <out> <name>
//!   passage compile <ann-root> <doc-root> <out>
//!   passage report <corpus> <out>
//!   passage graph <path> [--dot <out>]

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use passage_core::{CorpusConfig, PassageError};

#[derive(Parser)]
#[command(name = "passage")]
#[command(about = "Compile alias annotations into character-resolution corpora")]
#[command(version)]
struct Cli {
    /// Path to a TOML corpus configuration (defaults match the Pride and Prejudice corpus)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert one annotation/document pair into a document JSON object
    Convert {
        /// Path to the annotation file
        ann: PathBuf,
        /// Path to the annotation document file
        doc: PathBuf,
        /// Path to the output JSON file
        out: PathBuf,
        /// Name of the output document
        name: String,
    },
    /// Compile parallel annotation and document trees into a corpus artifact
    Compile {
        /// Root of the annotation tree
        ann_root: PathBuf,
        /// Root of the document tree
        doc_root: PathBuf,
        /// Path to the output corpus JSON file
        out: PathBuf,
        /// Skip broken documents with a warning instead of aborting
        #[arg(long)]
        skip_broken: bool,
    },
    /// Tabulate which documents contain each entity type
    Report {
        /// Path to a compiled corpus JSON file
        corpus: PathBuf,
        /// Path to the output delimited table
        out: PathBuf,
    },
    /// Inspect a character graph file
    Graph {
        /// Path to the character graph file
        path: PathBuf,
        /// Write Graphviz DOT to this path
        #[arg(long)]
        dot: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => CorpusConfig::from_file(path)?,
        None => CorpusConfig::default(),
    };

    match cli.command {
        Commands::Convert {
            ann,
            doc,
            out,
            name,
        } => {
            let raw_text = read(&doc)?;
            let ann_text = read(&ann)?;
            let document =
                passage_parser::assemble(name, &raw_text, &ann_text, &doc, &ann, &config)?;

            let json = serde_json::to_string_pretty(&document)
                .map_err(|e| PassageError::Serialize(e.to_string()))?;
            fs::write(&out, json).map_err(|e| PassageError::io(&out, e))?;
            println!(
                "Converted {} ({} entities) -> {}",
                document.name,
                document.entities.len(),
                out.display()
            );
        }
        Commands::Compile {
            ann_root,
            doc_root,
            out,
            skip_broken,
        } => {
            let config = CorpusConfig {
                skip_broken: skip_broken || config.skip_broken,
                ..config
            };
            let corpus = passage_corpus::compile(&ann_root, &doc_root, &config)?;
            passage_corpus::write_corpus(&corpus, &out)?;
            println!(
                "Compiled {} documents -> {}",
                corpus.doc_data.docs.len(),
                out.display()
            );
        }
        Commands::Report { corpus, out } => {
            let corpus = passage_corpus::read_corpus(&corpus)?;
            let rows = passage_corpus::report::type_membership(&corpus);
            passage_corpus::report::write_report(&rows, &out)?;
            println!("Wrote {} rows -> {}", rows.len(), out.display());
        }
        Commands::Graph { path, dot } => {
            let graph = passage_graph::load(&path)?;
            println!(
                "{} nodes, {} edges, {} anti-edges",
                graph.nodes.len(),
                graph.edges.len(),
                graph.antiedges.len()
            );

            let dangling = graph.dangling_endpoints();
            if !dangling.is_empty() {
                println!("unregistered endpoints: {}", join(&dangling));
            }
            for (name, degree) in graph.degree_stats() {
                println!("  {name}: {degree}");
            }

            if let Some(out) = dot {
                fs::write(&out, passage_graph::dot::to_dot(&graph))
                    .map_err(|e| PassageError::io(&out, e))?;
                println!("Wrote DOT -> {}", out.display());
            }
        }
    }

    Ok(())
}

fn read(path: &PathBuf) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn join(names: &std::collections::BTreeSet<&str>) -> String {
    names.iter().copied().collect::<Vec<_>>().join(", ")
}
