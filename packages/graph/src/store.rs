//! Persistence of the built graph.
//!
//! The graph is stored as pretty-printed JSON next to the input table. Writes
//! go through a temporary file so a crash never leaves a half-written
//! artifact behind.

use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;

use aiact_harvester::table::write_atomically;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};
use crate::graph::{GraphSnapshot, ReferenceGraph};

/// Current layout version of the graph artifact.
pub const ARTIFACT_VERSION: u32 = 1;

/// On-disk form of a built graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphArtifact {
    pub version: u32,
    pub built_at: DateTime<Utc>,
    pub graph: GraphSnapshot,
}

impl GraphArtifact {
    /// Wrap a graph, stamped with the current time.
    #[must_use]
    pub fn new(graph: &ReferenceGraph) -> Self {
        Self {
            version: ARTIFACT_VERSION,
            built_at: Utc::now(),
            graph: graph.to_snapshot(),
        }
    }

    #[must_use]
    pub fn into_graph(self) -> ReferenceGraph {
        ReferenceGraph::from_snapshot(self.graph)
    }
}

/// Save a graph to `path`.
pub fn save_graph(path: &Path, graph: &ReferenceGraph) -> Result<GraphArtifact> {
    let artifact = GraphArtifact::new(graph);
    write_atomically(path, |file| -> Result<()> {
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &artifact)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    })?;
    tracing::info!(path = %path.display(), "Saved graph");
    Ok(artifact)
}

/// Load a previously saved graph.
///
/// Returns `Ok(None)` when no artifact exists yet. An artifact that cannot be
/// decoded, or was written by another layout version, is an error rather
/// than a cache miss.
pub fn load_graph(path: &Path) -> Result<Option<GraphArtifact>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "No saved graph, building");
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    let artifact: GraphArtifact =
        serde_json::from_str(&content).map_err(|source| GraphError::CorruptArtifact {
            path: path.to_path_buf(),
            source,
        })?;
    if artifact.version != ARTIFACT_VERSION {
        return Err(GraphError::UnsupportedArtifactVersion {
            path: path.to_path_buf(),
            found: artifact.version,
        });
    }

    tracing::debug!(path = %path.display(), built_at = %artifact.built_at, "Loaded saved graph");
    Ok(Some(artifact))
}
