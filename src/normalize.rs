//! Record normalization: one raw `@graph` node in, one `ConceptRecord` out.
//!
//! Nothing here looks at other records.  Hierarchy placement happens later in
//! `hierarchy::resolve_hierarchy`, so records leave this module with empty
//! `ancestors` and a depth of 0.

use std::fmt;

use serde_json::{Map, Value};
use ustr::Ustr;

use crate::config::IngestConfig;
use crate::file_format::skos::{IndexedTerm, OneOrMany, RawConceptNode};
use crate::hierarchy::{ConceptRecord, DERIVED_KEYS};

/// Why a single node did not make it into the graph.  Never fatal for the
/// batch; `ingest` reports it and moves on.
#[derive(Debug, PartialEq)]
pub enum NormalizeError {
    /// The scheme-root sentinel itself.
    SchemeRoot,
    /// No notation, or only whitespace.
    MissingNotation { id: Ustr },
    /// Some field had a shape we could not deserialize.
    Malformed { id: Option<String>, message: String },
}

impl NormalizeError {
    /// Rejections are expected in every document (the scheme node, collection
    /// nodes without notation); malformed nodes are not.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, NormalizeError::Malformed { .. })
    }
}

impl fmt::Display for NormalizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizeError::SchemeRoot => write!(f, "scheme root node excluded"),
            NormalizeError::MissingNotation { id } => write!(f, "{} has no notation", id),
            NormalizeError::Malformed { id: Some(id), message } => {
                write!(f, "malformed node {}: {}", id, message)
            }
            NormalizeError::Malformed { id: None, message } => {
                write!(f, "malformed node: {}", message)
            }
        }
    }
}

/// Pick a single display string out of a `skos:prefLabel` value.
///
/// A bare string is returned as-is and a single value object yields its
/// `@value`.  For a list, the first entry tagged with `preferred_language`
/// wins, falling back to the first entry.  Anything else is "".
pub fn resolve_label(label: &Value, preferred_language: &str) -> String {
    match label {
        Value::String(text) => text.clone(),
        Value::Object(_) => literal_value(label).unwrap_or_default(),
        Value::Array(entries) => entries
            .iter()
            .find(|entry| entry.get("@language").and_then(Value::as_str) == Some(preferred_language))
            .or_else(|| entries.first())
            .and_then(literal_value)
            .unwrap_or_default(),
        _ => String::new(),
    }
}

fn literal_value(entry: &Value) -> Option<String> {
    match entry {
        Value::String(text) => Some(text.clone()),
        Value::Object(obj) => obj.get("@value").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

/// Flatten `ndcv:indexedTerm` into literal form, transcription, literal form,
/// ... in source order, skipping absent and empty values.
pub fn indexed_terms(terms: Option<&OneOrMany<IndexedTerm>>) -> Vec<String> {
    let terms = match terms {
        Some(terms) => terms,
        None => return vec![],
    };

    terms
        .iter()
        .flat_map(|term| {
            term.literal_form
                .iter()
                .chain(term.transcription.iter())
                .filter_map(|literal| literal.as_text())
        })
        .filter(|text| !is_blank(text))
        .collect()
}

/// Label first, then notation, then the indexed terms.  Consumers rank on this
/// order so it must not be shuffled or deduplicated.
pub fn search_terms(label: &str, notation: &str, indexed: Vec<String>) -> Vec<String> {
    let mut terms = Vec::with_capacity(indexed.len() + 2);
    terms.push(label.to_string());
    terms.push(notation.to_string());
    terms.extend(indexed);
    terms.retain(|term| !is_blank(term));
    terms
}

fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// A record fresh out of normalization, plus the input keys that had to go.
#[derive(Debug)]
pub struct Normalized {
    pub record: ConceptRecord,
    /// Pass-through keys dropped because they share a name with a derived
    /// output field.
    pub dropped_keys: Vec<String>,
}

/// Normalize one already-deserialized node.
pub fn normalize_node(node: RawConceptNode, config: &IngestConfig) -> Result<Normalized, NormalizeError> {
    if node.id.as_str() == config.scheme_root {
        return Err(NormalizeError::SchemeRoot);
    }

    let notation = node.notation_text();
    if notation.is_empty() {
        return Err(NormalizeError::MissingNotation { id: node.id });
    }

    let id = node.id;
    let malformed = move |err: serde_json::Error| NormalizeError::Malformed {
        id: Some(id.to_string()),
        message: err.to_string(),
    };
    let parent_ref = node.parent_ref().map_err(malformed)?;
    let indexed = indexed_terms(node.indexed_terms().map_err(malformed)?.as_ref());

    let label = node
        .pref_label
        .as_ref()
        .map(|label| resolve_label(label, &config.preferred_language))
        .unwrap_or_default();
    let search_terms = search_terms(&label, &notation, indexed);

    // Rebuilt rather than removed from so the kept keys stay in input order.
    let mut extra = Map::with_capacity(node.extra.len());
    let mut dropped_keys = vec![];
    for (key, value) in node.extra {
        if DERIVED_KEYS.contains(&key.as_str()) {
            dropped_keys.push(key);
        } else {
            extra.insert(key, value);
        }
    }

    let record = ConceptRecord {
        id: node.id,
        notation,
        label,
        search_terms,
        ancestors: vec![],
        depth: 0,
        parent_ref,
        pref_label: node.pref_label.unwrap_or(Value::Null),
        broader: node.broader,
        is_part_of: node.is_part_of,
        indexed_term: node.indexed_term,
        extra,
    };
    Ok(Normalized {
        record,
        dropped_keys,
    })
}

/// Deserialize and normalize one `@graph` entry.
pub fn normalize_value(value: Value, config: &IngestConfig) -> Result<Normalized, NormalizeError> {
    let id = value.get("@id").and_then(Value::as_str).map(str::to_string);
    let node = RawConceptNode::from_value(value).map_err(|err| NormalizeError::Malformed {
        id,
        message: err.to_string(),
    })?;
    normalize_node(node, config)
}
