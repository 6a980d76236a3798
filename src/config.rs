use std::path::Path;

use serde::Deserialize;

use crate::error::Result;
use crate::source::DEFAULT_SOURCE_URL;

/// Identifier of the NDC9 concept scheme itself.  The scheme shows up in the
/// `@graph` alongside its concepts but is not a concept.
pub const DEFAULT_SCHEME_ROOT: &str = "http://jla.or.jp/data/ndc9";

pub const DEFAULT_PREFERRED_LANGUAGE: &str = "ja";

/// Ingestion settings, normally read from a small TOML file like:
///
/// ```toml
/// preferred_language = "ja"
/// scheme_root = "http://jla.or.jp/data/ndc9"
/// source = "ndc9.json"
/// ```
///
/// Every key is optional.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct IngestConfig {
    /// `@language` tag preferred when a concept has several `skos:prefLabel`s.
    pub preferred_language: String,
    /// Reserved identifier excluded from the concept graph.
    pub scheme_root: String,
    /// Path or URL the command line tool loads when no source is given.
    pub source: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        IngestConfig {
            preferred_language: DEFAULT_PREFERRED_LANGUAGE.to_string(),
            scheme_root: DEFAULT_SCHEME_ROOT.to_string(),
            source: DEFAULT_SOURCE_URL.to_string(),
        }
    }
}

impl IngestConfig {
    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        Ok(toml::from_str(config_str)?)
    }

    pub fn load(config_path: impl AsRef<Path>) -> Result<Self> {
        let config_str = std::fs::read_to_string(config_path)?;
        Self::from_toml_str(&config_str)
    }
}
