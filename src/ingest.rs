use std::time::Instant;

use serde_json::Value;
use tracing::{debug, info_span, warn};

use crate::config::IngestConfig;
use crate::error::Result;
use crate::file_format::skos::take_graph;
use crate::hierarchy::{resolve_hierarchy, ConceptGraph, ConceptRecord, ResolveStats};
use crate::normalize::{normalize_value, Normalized};
use crate::progress::ProgressSink;

/// What happened to the nodes of one document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IngestSummary {
    /// Entries in `@graph`.
    pub nodes: usize,
    /// Concepts that made it into the graph.
    pub concepts: usize,
    /// The scheme node and nodes without notation.
    pub rejected: usize,
    /// Nodes with field shapes we could not read.
    pub malformed: usize,
    /// Nodes that replaced an earlier node with the same identifier.
    pub duplicates: usize,
    /// Input fields dropped because they would shadow a derived field.
    pub dropped_fields: usize,
    pub resolve: ResolveStats,
}

/// Normalize every `@graph` node and resolve the hierarchy, returning the
/// graph itself for callers that want lookups.
///
/// Only a document without a `@graph` array is an error.  Bad nodes are skipped
/// and unresolvable parents truncate chains; both are reported to `sink`.
pub fn build_concept_graph(
    mut document: Value,
    config: &IngestConfig,
    sink: &mut dyn ProgressSink,
) -> Result<(ConceptGraph, IngestSummary)> {
    let span = info_span!("build_concept_graph");
    let _span_guard = span.enter();

    let started = Instant::now();
    let nodes = take_graph(&mut document)?;

    let mut summary = IngestSummary {
        nodes: nodes.len(),
        ..IngestSummary::default()
    };
    sink.progress(&format!("Parsing {} graph nodes", summary.nodes));

    let mut graph = ConceptGraph::new();
    for node in nodes {
        match normalize_value(node, config) {
            Ok(Normalized {
                record,
                dropped_keys,
            }) => {
                for key in dropped_keys {
                    summary.dropped_fields += 1;
                    sink.warning(&format!(
                        "Dropped field {} of {}; it collides with a derived field",
                        key, record.id
                    ));
                }
                if let Some(previous) = graph.insert(record) {
                    summary.duplicates += 1;
                    sink.warning(&format!(
                        "Duplicate concept {} replaced an earlier node",
                        previous.id
                    ));
                }
            }
            Err(err) if err.is_rejection() => {
                debug!(reason = %err, "node rejected");
                summary.rejected += 1;
            }
            Err(err) => {
                warn!(reason = %err, "node skipped");
                summary.malformed += 1;
                sink.warning(&format!("Skipped {}", err));
            }
        }
    }
    summary.concepts = graph.len();
    sink.progress(&format!(
        "Normalized {} concepts ({} rejected, {} malformed) in {} ms",
        summary.concepts,
        summary.rejected,
        summary.malformed,
        started.elapsed().as_millis()
    ));

    let resolve_started = Instant::now();
    summary.resolve = resolve_hierarchy(&mut graph, sink);
    sink.progress(&format!(
        "Resolved hierarchy for {} concepts in {} ms",
        summary.resolve.resolved,
        resolve_started.elapsed().as_millis()
    ));
    sink.progress(&format!(
        "Completed in {} ms",
        started.elapsed().as_millis()
    ));

    Ok((graph, summary))
}

/// The resolved concepts of `document` in `@graph` order.
pub fn parse_concept_document(
    document: Value,
    config: &IngestConfig,
    sink: &mut dyn ProgressSink,
) -> Result<Vec<ConceptRecord>> {
    let (graph, _) = build_concept_graph(document, config, sink)?;
    Ok(graph.into_records())
}

/// `parse_concept_document` for a document still in text form.
pub fn parse_concept_str(
    json: &str,
    config: &IngestConfig,
    sink: &mut dyn ProgressSink,
) -> Result<Vec<ConceptRecord>> {
    let document: Value = serde_json::from_str(json)?;
    parse_concept_document(document, config, sink)
}
