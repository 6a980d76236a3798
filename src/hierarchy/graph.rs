use std::iter::FromIterator;

use serde::Serialize;
use serde_json::{Map, Value};
use ustr::{existing_ustr, Ustr, UstrMap};

/// Output keys computed during ingestion.  Input fields with these names would
/// collide with them and are dropped by the normalizer.
pub const DERIVED_KEYS: &[&str] = &["prefLabel", "parentRef", "depth", "ancestors", "searchTerms"];

/// A normalized concept.  Serializes with the JSON-LD keys it was read from
/// plus the derived `DERIVED_KEYS`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConceptRecord {
    #[serde(rename = "@id")]
    pub id: Ustr,
    #[serde(rename = "skos:notation")]
    pub notation: String,
    /// The label value as received, for consumers that want every language.
    #[serde(rename = "skos:prefLabel", skip_serializing_if = "Value::is_null")]
    pub pref_label: Value,
    #[serde(rename = "skos:broader", skip_serializing_if = "Option::is_none")]
    pub broader: Option<Value>,
    #[serde(rename = "dct:isPartOf", skip_serializing_if = "Option::is_none")]
    pub is_part_of: Option<Value>,
    /// Literal form and reading pairs as received; `search_terms` has them
    /// flattened.
    #[serde(rename = "ndcv:indexedTerm", skip_serializing_if = "Option::is_none")]
    pub indexed_term: Option<Value>,
    #[serde(rename = "prefLabel")]
    pub label: String,
    #[serde(rename = "parentRef", skip_serializing_if = "Option::is_none")]
    pub parent_ref: Option<Ustr>,
    pub depth: u32,
    /// Root-most first, immediate parent last.
    pub ancestors: Vec<Ustr>,
    #[serde(rename = "searchTerms")]
    pub search_terms: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConceptRecord {
    pub fn is_root(&self) -> bool {
        self.parent_ref.is_none()
    }
}

/// Arena of concept records in insertion order plus an identifier index into
/// it.  Only the resolver gets to change a record once it is inserted, and it
/// only touches `ancestors` and `depth`.
#[derive(Clone, Debug, Default)]
pub struct ConceptGraph {
    records: Vec<ConceptRecord>,
    resolved: Vec<bool>,
    index: UstrMap<usize>,
}

impl ConceptGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record.  A record whose identifier is already present replaces
    /// the earlier one but keeps its position; the replaced record is
    /// returned so the caller can report the duplicate.
    pub fn insert(&mut self, record: ConceptRecord) -> Option<ConceptRecord> {
        match self.index.get(&record.id).copied() {
            Some(slot) => {
                self.resolved[slot] = false;
                Some(std::mem::replace(&mut self.records[slot], record))
            }
            None => {
                self.index.insert(record.id, self.records.len());
                self.records.push(record);
                self.resolved.push(false);
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ConceptRecord> {
        self.records.iter()
    }

    pub fn get_by_id(&self, id: Ustr) -> Option<&ConceptRecord> {
        self.index.get(&id).map(|&slot| &self.records[slot])
    }

    /// Lookup for identifiers that come from outside the document, like a
    /// command line argument.  Uses `existing_ustr` so a bogus query doesn't
    /// get interned.
    pub fn get(&self, id: &str) -> Option<&ConceptRecord> {
        existing_ustr(id).and_then(|id| self.get_by_id(id))
    }

    /// Records whose parent relation points at `id`, in graph order.
    pub fn children_of(&self, id: Ustr) -> Vec<&ConceptRecord> {
        self.records
            .iter()
            .filter(|record| record.parent_ref == Some(id))
            .collect()
    }

    /// `(identifier, label)` for each ancestor of `id`, root first.  Ancestors
    /// that never made it into the graph are labeled with their identifier.
    pub fn breadcrumbs(&self, id: &str) -> Vec<(Ustr, String)> {
        let record = match self.get(id) {
            Some(record) => record,
            None => return vec![],
        };

        record
            .ancestors
            .iter()
            .map(|ancestor| {
                let label = self
                    .get_by_id(*ancestor)
                    .map(|found| found.label.clone())
                    .unwrap_or_else(|| ancestor.to_string());
                (*ancestor, label)
            })
            .collect()
    }

    pub fn into_records(self) -> Vec<ConceptRecord> {
        self.records
    }

    pub(super) fn slot_of(&self, id: Ustr) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub(super) fn record_at(&self, slot: usize) -> &ConceptRecord {
        &self.records[slot]
    }

    pub(super) fn is_resolved(&self, slot: usize) -> bool {
        self.resolved[slot]
    }

    pub(super) fn set_resolution(&mut self, slot: usize, ancestors: Vec<Ustr>, depth: u32) {
        let record = &mut self.records[slot];
        record.ancestors = ancestors;
        record.depth = depth;
        self.resolved[slot] = true;
    }
}

impl FromIterator<ConceptRecord> for ConceptGraph {
    fn from_iter<I: IntoIterator<Item = ConceptRecord>>(iter: I) -> Self {
        let mut graph = ConceptGraph::new();
        for record in iter {
            graph.insert(record);
        }
        graph
    }
}

impl<'a> IntoIterator for &'a ConceptGraph {
    type Item = &'a ConceptRecord;
    type IntoIter = std::slice::Iter<'a, ConceptRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
