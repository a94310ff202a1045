//! Catalog loading errors
//!
//! Every variant is a configuration defect found while loading the static
//! tables at startup. Nothing here is produced while answering a turn.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Data file not found: {0}")]
    MissingFile(String),
    #[error("Failed to read {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid trigger pattern for {intent}: {source}")]
    Pattern {
        intent: String,
        #[source]
        source: regex::Error,
    },
    #[error("Invalid catalog data: {0}")]
    Invalid(String),
}

impl CatalogError {
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
