//! Getting the raw JSON-LD document into memory.  Ingestion itself only ever
//! sees the parsed `Value`, so it does not care which of these produced it.

use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::{from_str, Value};
use tokio::fs::read_to_string;
use tracing::trace;
use url::Url;

use crate::error::{ErrorDetails, ErrorLayer, IngestError, Result};

/// The published NDC9 JSON-LD dump.
pub const DEFAULT_SOURCE_URL: &str =
    "https://gist.githubusercontent.com/cojiso/0eba279374d15c6d77dc4ae6c8535c4a/raw/ndc9.json";

#[async_trait]
pub trait DocumentSource {
    /// Human-readable location for log messages.
    fn describe(&self) -> String;

    async fn fetch_document(&self) -> Result<Value>;
}

#[derive(Debug)]
pub struct LocalDocument {
    pub path: PathBuf,
}

#[async_trait]
impl DocumentSource for LocalDocument {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch_document(&self) -> Result<Value> {
        trace!(path = %self.path.display(), "reading document");
        let contents = read_to_string(&self.path).await?;
        Ok(from_str(&contents)?)
    }
}

#[derive(Debug)]
pub struct RemoteDocument {
    pub url: Url,
}

#[async_trait]
impl DocumentSource for RemoteDocument {
    fn describe(&self) -> String {
        self.url.to_string()
    }

    /// reqwest won't error on an unhappy status by itself, so we check it
    /// before trying to parse whatever error page came back.
    async fn fetch_document(&self) -> Result<Value> {
        trace!(url = %self.url, "fetching document");
        let client = reqwest::Client::new();
        let res = client
            .get(self.url.clone())
            .header("Accept", "application/json")
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(IngestError::Unavailable(ErrorDetails {
                layer: ErrorLayer::TransportLayer,
                message: format!("Server status of {}", res.status()),
            }));
        }

        let body = res.text().await?;
        Ok(from_str(&body)?)
    }
}

/// `location` is fetched over HTTP if it parses as an http(s) URL and read from
/// disk otherwise.
pub fn make_document_source(location: &str) -> Box<dyn DocumentSource + Send + Sync> {
    match Url::parse(location) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {
            Box::new(RemoteDocument { url })
        }
        _ => Box::new(LocalDocument {
            path: PathBuf::from(location),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_selection() {
        assert_eq!(
            make_document_source("https://example.com/ndc9.json").describe(),
            "https://example.com/ndc9.json"
        );
        assert_eq!(make_document_source("data/ndc9.json").describe(), "data/ndc9.json");
        // Windows-ish paths parse as URLs with a one-letter scheme.
        assert_eq!(make_document_source("C:/ndc9.json").describe(), "C:/ndc9.json");
    }

    #[tokio::test]
    async fn test_local_document() {
        let path = std::env::temp_dir().join(format!("ndc-tools-source-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"@graph": []}"#).unwrap();

        let source = LocalDocument { path: path.clone() };
        let doc = source.fetch_document().await.unwrap();
        assert_eq!(doc["@graph"], Value::Array(vec![]));

        std::fs::remove_file(&path).unwrap();
        let err = source.fetch_document().await.unwrap_err();
        assert_eq!(err.details().layer, ErrorLayer::TransportLayer);
    }
}
