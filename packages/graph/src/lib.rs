//! AI Act Graph - Cross-reference graph of the EU AI Act.
//!
//! This crate turns the input table produced by `aiact-harvester` into a
//! directed graph between articles and recitals. Each item is cleaned of
//! page boilerplate, split into its body and reference blocks, tagged with
//! canonical IDs and finally linked to everything it refers to.
//!
//! # Example
//!
//! ```
//! use aiact_graph::config::{CleaningRules, ExpanderConfig};
//! use aiact_graph::expand::TableExpander;
//! use aiact_graph::extract::ReferenceExtractor;
//! use aiact_graph::graph::build_graph;
//! use aiact_harvester::types::{CanonicalId, Item, ItemType};
//!
//! let items = vec![Item::new(
//!     ItemType::Article,
//!     4,
//!     "Article 4",
//!     "Copy URL\nSee Article 3.\nSuitable Recitals\n20\nFeedback",
//! ).unwrap()];
//! let extractor = ReferenceExtractor::new(&CleaningRules::default()).unwrap();
//! let rows = TableExpander::new(extractor, ExpanderConfig::default()).expand(&items);
//! let graph = build_graph(&rows);
//!
//! let neighbours = graph.neighbours(&CanonicalId::article(4)).unwrap();
//! assert_eq!(neighbours, vec![CanonicalId::article(3), CanonicalId::recital(20)]);
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Data directory, cleaning markers and expander settings
//! - [`error`]: Error types and Result alias
//! - [`extract`]: Boilerplate cleaning and reference block splitting
//! - [`expand`]: Canonical tagging and in-body mention scanning
//! - [`table`]: Processed reference table (CSV)
//! - [`graph`]: Directed reference graph and its snapshot form
//! - [`store`]: Graph artifact persistence
//! - [`pipeline`]: Cache-or-build orchestration
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod config;
pub mod error;
pub mod expand;
pub mod extract;
pub mod graph;
pub mod pipeline;
pub mod store;
pub mod table;

// Re-export the pipeline entry points
pub use pipeline::{GraphOrigin, OfflineSource, Pipeline, PipelineOutcome};

// Re-export commonly used items
pub use config::GraphConfig;
pub use error::{GraphError, Result};
pub use expand::{Reference, ReferenceOrigin, ReferenceRow, TableExpander};
pub use graph::{build_graph, ReferenceGraph};
