//! Error types for the reconciliation engine.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for reconciliation and validation operations.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A triple component is missing or not valid in its position.
    #[error("Malformed triple: {reason}")]
    MalformedTriple { reason: String },

    /// A persisted graph file could not be parsed.
    #[error("Graph parse error at line {line}: {message}")]
    GraphParse { line: usize, message: String },

    /// An anonymous node was found where only canonical graphs are accepted.
    #[error("Anonymous node in canonical graph: {0}")]
    AnonymousNode(String),

    /// A source document could not be obtained or parsed.
    #[error("Source '{source_id}' unavailable: {reason}")]
    SourceUnavailable { source_id: String, reason: String },

    /// The MIxS schema could not be loaded.
    #[error("Schema load error: {0}")]
    SchemaLoad(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Regex compilation error.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl ReconcileError {
    /// Wrap an IO error with the path it occurred on.
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReconcileError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        ReconcileError::MalformedTriple {
            reason: reason.into(),
        }
    }
}

/// Result type alias for reconciliation operations.
pub type Result<T> = std::result::Result<T, ReconcileError>;
