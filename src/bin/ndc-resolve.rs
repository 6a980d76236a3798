use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use itertools::Itertools;
use serde_json::{to_string, to_string_pretty};
use tracing::info;

use ndc_tools::config::IngestConfig;
use ndc_tools::ingest::build_concept_graph;
use ndc_tools::logging::init_logging;
use ndc_tools::progress::TracingProgress;
use ndc_tools::search::search_concepts;
use ndc_tools::source::make_document_source;

#[derive(Clone, Debug, PartialEq, ValueEnum)]
enum OutputFormat {
    /// Pretty-printed JSON.
    Pretty,
    /// One JSON record per line.
    Concise,
}

/// Load an NDC JSON-LD document, resolve every concept's ancestors and depth,
/// and print the resolved concepts.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Path or http(s) URL of the JSON-LD document; defaults to the configured
    /// source.
    source: Option<String>,

    /// TOML ingestion config.
    #[arg(short, long, env = "NDC_CONFIG")]
    config: Option<PathBuf>,

    #[arg(short = 'f', long, value_enum, ignore_case = true, default_value = "concise")]
    output_format: OutputFormat,

    /// Only print concepts whose search terms contain this text.
    #[arg(long)]
    filter: Option<String>,

    /// Write to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => IngestConfig::load(path)?,
        None => IngestConfig::default(),
    };

    let location = args.source.clone().unwrap_or_else(|| config.source.clone());
    let source = make_document_source(&location);
    info!(source = %source.describe(), "loading");
    let document = source.fetch_document().await?;

    let mut sink = TracingProgress;
    let (graph, summary) = build_concept_graph(document, &config, &mut sink)?;
    info!(
        concepts = summary.concepts,
        missing_parents = summary.resolve.missing_parents,
        cycles = summary.resolve.cycles,
        "resolved"
    );

    let records = search_concepts(&graph, args.filter.as_deref().unwrap_or(""));

    let out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout()),
    };
    let mut out = BufWriter::new(out);

    match args.output_format {
        OutputFormat::Concise => {
            for record in records {
                writeln!(out, "{}", to_string(record)?)?;
            }
        }
        OutputFormat::Pretty => {
            let rendered: Vec<String> = records
                .into_iter()
                .map(to_string_pretty)
                .collect::<Result<_, _>>()?;
            writeln!(out, "[{}]", rendered.iter().join(",\n"))?;
        }
    }
    out.flush()?;

    Ok(())
}
