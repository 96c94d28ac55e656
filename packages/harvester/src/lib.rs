//! AI Act Harvester - Download the EU AI Act articles and recitals.
//!
//! This crate fetches every article and recital page of the EU AI Act,
//! extracts their text and stores them as a flat input table
//! (`Type,ID,Title,Content`). It also owns the item types shared with the
//! graph builder.
//!
//! # Example
//!
//! ```
//! use aiact_harvester::types::{CanonicalId, Item, ItemType};
//!
//! let item = Item::new(ItemType::Recital, 12, "Recital 12", "...").unwrap();
//! assert_eq!(item.canonical_id(), "R12".parse::<CanonicalId>().unwrap());
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Configuration constants and the harvest configuration
//! - [`types`]: Core data types (ItemType, CanonicalId, Item, Corpus)
//! - [`error`]: Error types and Result alias
//! - [`http`]: HTTP client with retries
//! - [`html`]: Page text extraction
//! - [`table`]: Input table CSV codec
//! - [`harvester`]: Main harvester service and the `CorpusSource` trait
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod config;
pub mod error;
pub mod harvester;
pub mod html;
pub mod http;
pub mod table;
pub mod types;

// Re-export main functions
pub use harvester::{CorpusSource, Harvester};

// Re-export commonly used items
pub use config::HarvestConfig;
pub use error::{HarvesterError, Result};
pub use types::{CanonicalId, Corpus, Item, ItemType};
