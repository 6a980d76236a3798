extern crate serde;
extern crate serde_json;
extern crate tracing;

pub mod config;
pub mod error;
pub mod file_format;
pub mod hierarchy;
pub mod ingest;
pub mod logging;
pub mod normalize;
pub mod progress;
pub mod search;
pub mod source;

pub use config::IngestConfig;
pub use error::{IngestError, Result};
pub use hierarchy::{ConceptGraph, ConceptRecord};
pub use ingest::{build_concept_graph, parse_concept_document, parse_concept_str, IngestSummary};
pub use progress::{LogCollector, NoopProgress, ProgressSink, TracingProgress};
