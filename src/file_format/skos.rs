//! Serde model of the NDC JSON-LD `@graph` nodes as they are published.
//!
//! Only the fields that normalization reads are named here.  The relation
//! fields and indexed terms stay as received values and are only read through
//! `ConceptRef`/`IndexedTerm` on demand, so the record can hand them on
//! unchanged.  Everything else (`@type`, `rdfs:label`, `skos:narrower`,
//! `skos:note`, `rdfs:seeAlso`, ...) lands in `extra` in the key order it was
//! received in.

use std::slice;

use serde::Deserialize;
use serde_json::{Map, Number, Value};
use ustr::Ustr;

use crate::error::{IngestError, Result};

/// JSON-LD's habit of collapsing single-element arrays into the element.
/// `Many` is tried first since serde will happily read a struct out of an
/// array.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn iter(&self) -> slice::Iter<'_, T> {
        match self {
            OneOrMany::One(item) => slice::from_ref(item).iter(),
            OneOrMany::Many(items) => items.iter(),
        }
    }
}

/// Reference to another concept, either `"ndc9:913"` or `{"@id": "ndc9:913"}`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ConceptRef {
    Id(Ustr),
    Object {
        #[serde(rename = "@id")]
        id: Ustr,
    },
}

impl ConceptRef {
    pub fn id(&self) -> Ustr {
        match self {
            ConceptRef::Id(id) => *id,
            ConceptRef::Object { id } => *id,
        }
    }
}

/// A literal that may or may not be wrapped as a JSON-LD value object.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Literal {
    Text(String),
    Number(Number),
    Value {
        #[serde(rename = "@value")]
        value: Value,
        #[serde(rename = "@language", default)]
        language: Option<String>,
    },
}

impl Literal {
    /// The literal as display text; `None` for value objects wrapping
    /// something other than a string or number.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Literal::Text(text) => Some(text.clone()),
            Literal::Number(num) => Some(num.to_string()),
            Literal::Value { value, .. } => match value {
                Value::String(text) => Some(text.clone()),
                Value::Number(num) => Some(num.to_string()),
                _ => None,
            },
        }
    }
}

/// One `ndcv:indexedTerm` entry: an alternate heading and its reading.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct IndexedTerm {
    #[serde(rename = "xl:literalForm", default)]
    pub literal_form: Option<Literal>,
    #[serde(rename = "ndl:transcription", default)]
    pub transcription: Option<Literal>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawConceptNode {
    #[serde(rename = "@id")]
    pub id: Ustr,
    #[serde(rename = "skos:notation", default)]
    pub notation: Option<Literal>,
    /// Kept as a raw value; `normalize::resolve_label` decides what to make of
    /// its shape so an odd label never costs us the whole node.
    #[serde(rename = "skos:prefLabel", default)]
    pub pref_label: Option<Value>,
    #[serde(rename = "skos:broader", default)]
    pub broader: Option<Value>,
    #[serde(rename = "dct:isPartOf", alias = "dcterms:isPartOf", default)]
    pub is_part_of: Option<Value>,
    #[serde(rename = "ndcv:indexedTerm", default)]
    pub indexed_term: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawConceptNode {
    pub fn from_value(value: Value) -> serde_json::Result<RawConceptNode> {
        serde_json::from_value(value)
    }

    /// `skos:broader` wins; `dct:isPartOf` is only consulted without it.
    pub fn parent_ref(&self) -> serde_json::Result<Option<Ustr>> {
        match self.broader.as_ref().or(self.is_part_of.as_ref()) {
            Some(raw) => ConceptRef::deserialize(raw).map(|parent| Some(parent.id())),
            None => Ok(None),
        }
    }

    pub fn indexed_terms(&self) -> serde_json::Result<Option<OneOrMany<IndexedTerm>>> {
        self.indexed_term
            .as_ref()
            .map(|raw| OneOrMany::deserialize(raw))
            .transpose()
    }

    /// Trimmed notation text, empty when absent or unusable.
    pub fn notation_text(&self) -> String {
        self.notation
            .as_ref()
            .and_then(Literal::as_text)
            .map(|text| text.trim().to_string())
            .unwrap_or_default()
    }
}

/// Move the `@graph` node list out of a parsed document.  This is the one
/// structural check whose failure rejects the whole document.
pub fn take_graph(document: &mut Value) -> Result<Vec<Value>> {
    let obj = match document.as_object_mut() {
        Some(obj) => obj,
        None => {
            return Err(IngestError::invalid_structure(
                "document is not a JSON object",
            ));
        }
    };

    match obj.get_mut("@graph").map(Value::take) {
        Some(Value::Array(nodes)) => Ok(nodes),
        Some(_) => Err(IngestError::invalid_structure("@graph is not an array")),
        None => Err(IngestError::invalid_structure("missing @graph container")),
    }
}
