//! Error types for the graph builder.

use std::path::PathBuf;

use aiact_harvester::HarvesterError;
use thiserror::Error;

/// Main error type for the graph library.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Fetching or reading the input table failed.
    #[error(transparent)]
    Harvester(#[from] HarvesterError),

    /// A cleaning marker produced an invalid pattern.
    #[error("Invalid cleaning rule '{marker}': {source}")]
    InvalidRule {
        marker: String,
        #[source]
        source: regex::Error,
    },

    /// The input table is missing and the corpus source could not fill it.
    #[error("Input table {} is missing and fetching the corpus failed: {source}", .path.display())]
    CorpusUnavailable {
        path: PathBuf,
        #[source]
        source: HarvesterError,
    },

    /// Node lookup for an ID that is not in the graph.
    #[error("Node {0} is not in the graph")]
    UnknownNode(String),

    /// The graph artifact could not be decoded.
    #[error("Graph artifact {} is corrupt: {source}", .path.display())]
    CorruptArtifact {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The graph artifact was written with another layout version.
    #[error(
        "Graph artifact {} has unsupported version {found}; rebuild it with `build --force`",
        .path.display()
    )]
    UnsupportedArtifactVersion { path: PathBuf, found: u32 },

    /// JSON serialization error.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV encoding error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;
