//! Error types for report generation

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for report generation
pub type Result<T> = std::result::Result<T, ReportError>;

/// Fatal failures. Anything that can degrade (method enrichment, date
/// parsing, summary counters) is modelled as an `Option` instead.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Input file not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize report payload: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Output directory unavailable {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ReportError {
    /// Build the read error for `path`, splitting out the not-found case
    pub fn from_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            ReportError::InputNotFound { path }
        } else {
            ReportError::Read { path, source }
        }
    }
}
