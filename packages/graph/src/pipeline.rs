//! End-to-end pipeline: input table, expansion, graph, artifacts.
//!
//! A run reuses the saved graph when there is one. Otherwise it reads the
//! input table (fetching the corpus first if the table is missing), expands
//! every item, builds the graph and writes the processed table and the graph
//! artifact.

use std::io::ErrorKind;

use aiact_harvester::table::{read_items, write_items};
use aiact_harvester::types::Item;
use aiact_harvester::{Corpus, CorpusSource, HarvesterError};

use crate::config::GraphConfig;
use crate::error::{GraphError, Result};
use crate::expand::{ReferenceRow, TableExpander};
use crate::extract::ReferenceExtractor;
use crate::graph::{build_graph, ReferenceGraph};
use crate::store::{load_graph, save_graph};
use crate::table::write_reference_table;

/// Corpus source that never fetches.
///
/// Used for offline runs: a missing input table becomes an error instead of
/// a download.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineSource;

impl CorpusSource for OfflineSource {
    fn fetch_corpus(&self) -> aiact_harvester::Result<Corpus> {
        Err(HarvesterError::InvalidConfig(
            "fetching is disabled in offline mode".to_string(),
        ))
    }
}

/// Where the graph of a run came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphOrigin {
    /// Loaded from the saved artifact.
    Cache,

    /// Built from the input table.
    Built {
        /// Whether the input table had to be fetched first.
        fetched_corpus: bool,
    },
}

/// Result of a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub graph: ReferenceGraph,
    pub origin: GraphOrigin,

    /// Expanded rows, empty when the graph came from the cache.
    pub rows: Vec<ReferenceRow>,
}

/// Runs the pipeline against one data directory.
pub struct Pipeline<'a> {
    config: GraphConfig,
    source: &'a dyn CorpusSource,
}

impl<'a> Pipeline<'a> {
    #[must_use]
    pub fn new(config: GraphConfig, source: &'a dyn CorpusSource) -> Self {
        Self { config, source }
    }

    #[must_use]
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Load the saved graph, or build it when there is none or `force` is set.
    pub fn load_or_build(&self, force: bool) -> Result<PipelineOutcome> {
        if !force {
            if let Some(artifact) = load_graph(&self.config.graph_path())? {
                tracing::info!(built_at = %artifact.built_at, "Using saved graph");
                return Ok(PipelineOutcome {
                    graph: artifact.into_graph(),
                    origin: GraphOrigin::Cache,
                    rows: Vec::new(),
                });
            }
        }
        self.build()
    }

    /// Build the graph from the input table and write all artifacts.
    pub fn build(&self) -> Result<PipelineOutcome> {
        let (items, fetched_corpus) = self.load_items()?;
        let rows = self.expand(&items)?;
        let graph = build_graph(&rows);

        write_reference_table(&self.config.processed_table_path(), &rows)?;
        save_graph(&self.config.graph_path(), &graph)?;

        Ok(PipelineOutcome {
            graph,
            origin: GraphOrigin::Built { fetched_corpus },
            rows,
        })
    }

    /// Read the input table, fetching and saving the corpus if it is missing.
    ///
    /// Returns the items and whether they were fetched.
    pub fn load_items(&self) -> Result<(Vec<Item>, bool)> {
        let path = self.config.input_table_path();
        match read_items(&path) {
            Ok(items) => {
                tracing::debug!(items = items.len(), "Using existing input table");
                Ok((items, false))
            }
            Err(HarvesterError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "Input table missing, fetching corpus");
                let corpus = self
                    .source
                    .fetch_corpus()
                    .map_err(|source| GraphError::CorpusUnavailable {
                        path: path.clone(),
                        source,
                    })?;
                for warning in &corpus.warnings {
                    tracing::warn!("{warning}");
                }
                write_items(&path, &corpus.items)?;
                Ok((corpus.items, true))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Clean, split and tag every item.
    pub fn expand(&self, items: &[Item]) -> Result<Vec<ReferenceRow>> {
        let extractor = ReferenceExtractor::new(&self.config.cleaning)?;
        let expander = TableExpander::new(extractor, self.config.expander.clone());
        Ok(expander.expand(items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aiact_harvester::types::ItemType;
    use std::cell::Cell;
    use tempfile::tempdir;

    struct CountingSource {
        calls: Cell<usize>,
    }

    impl CorpusSource for CountingSource {
        fn fetch_corpus(&self) -> aiact_harvester::Result<Corpus> {
            self.calls.set(self.calls.get() + 1);
            Ok(Corpus {
                items: vec![Item::new(
                    ItemType::Article,
                    1,
                    "Article 1",
                    "Body\nSuitable Recitals\n1\n",
                )?],
                warnings: vec!["Recital 2: page not found".to_string()],
            })
        }
    }

    #[test]
    fn test_offline_source_fails() {
        assert!(OfflineSource.fetch_corpus().is_err());
    }

    #[test]
    fn test_missing_table_is_fetched_once() {
        let dir = tempdir().unwrap();
        let source = CountingSource { calls: Cell::new(0) };
        let pipeline = Pipeline::new(GraphConfig::new(dir.path()), &source);

        let first = pipeline.load_or_build(false).unwrap();
        assert_eq!(first.origin, GraphOrigin::Built { fetched_corpus: true });
        assert!(pipeline.config().input_table_path().exists());

        let rebuilt = pipeline.build().unwrap();
        assert_eq!(rebuilt.origin, GraphOrigin::Built { fetched_corpus: false });
        assert_eq!(source.calls.get(), 1);
    }

    #[test]
    fn test_offline_missing_table_is_corpus_unavailable() {
        let dir = tempdir().unwrap();
        let pipeline = Pipeline::new(GraphConfig::new(dir.path()), &OfflineSource);

        let err = pipeline.load_or_build(false).unwrap_err();
        assert!(matches!(err, GraphError::CorpusUnavailable { .. }), "got {err}");
    }
}
