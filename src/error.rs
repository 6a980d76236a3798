use std::fmt;

pub type Result<T> = std::result::Result<T, IngestError>;

/// Express which layer an ingestion failure seems to come from.
#[derive(Debug, PartialEq)]
pub enum ErrorLayer {
    /// The document was retrieved and parsed but does not have the shape we
    /// can ingest at all, like a missing `@graph` container.  Individual bad
    /// nodes never produce this; they are skipped instead.
    BadInput,
    /// The bytes we got could not be parsed as JSON.
    DataLayer,
    /// Retrieving the document failed (file system or HTTP).
    TransportLayer,
    /// The TOML configuration could not be read or parsed.
    ConfigLayer,
}

/// Payload to provide details about what went wrong for investigation
/// purposes.
#[derive(Debug)]
pub struct ErrorDetails {
    pub layer: ErrorLayer,
    /// Stringified version of the lower level error.
    pub message: String,
}

/// The only errors that abort an ingestion run.  Per-node and per-chain
/// problems are reported through the progress sink and never show up here.
#[derive(Debug)]
pub enum IngestError {
    /// The document lacks a usable `@graph` container.
    InvalidStructure(ErrorDetails),
    /// Parsing or retrieval failed before ingestion could start.
    Unavailable(ErrorDetails),
}

impl IngestError {
    pub fn invalid_structure(message: impl Into<String>) -> IngestError {
        IngestError::InvalidStructure(ErrorDetails {
            layer: ErrorLayer::BadInput,
            message: message.into(),
        })
    }

    pub fn details(&self) -> &ErrorDetails {
        match self {
            IngestError::InvalidStructure(details) => details,
            IngestError::Unavailable(details) => details,
        }
    }
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::InvalidStructure(details) => {
                write!(f, "Invalid NDC data structure: {}", details.message)
            }
            IngestError::Unavailable(details) => write!(
                f,
                "Document unavailable ({:?}): {}",
                details.layer, details.message
            ),
        }
    }
}

impl std::error::Error for IngestError {}

// JSON parse errors are data problems.
impl From<serde_json::Error> for IngestError {
    fn from(err: serde_json::Error) -> IngestError {
        IngestError::Unavailable(ErrorDetails {
            layer: ErrorLayer::DataLayer,
            message: err.to_string(),
        })
    }
}

impl From<std::io::Error> for IngestError {
    fn from(err: std::io::Error) -> IngestError {
        IngestError::Unavailable(ErrorDetails {
            layer: ErrorLayer::TransportLayer,
            message: err.to_string(),
        })
    }
}

impl From<reqwest::Error> for IngestError {
    fn from(err: reqwest::Error) -> IngestError {
        IngestError::Unavailable(ErrorDetails {
            layer: ErrorLayer::TransportLayer,
            message: err.to_string(),
        })
    }
}

impl From<toml::de::Error> for IngestError {
    fn from(err: toml::de::Error) -> IngestError {
        IngestError::Unavailable(ErrorDetails {
            layer: ErrorLayer::ConfigLayer,
            message: err.to_string(),
        })
    }
}
