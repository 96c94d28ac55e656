//! Error types for the harvester.
//!
//! `HarvesterError` covers fetching, HTML extraction and the input-table
//! codec. Ingestion errors name the offending row so an operator can fix
//! the table by hand.

use thiserror::Error;

/// Main error type for the harvester library.
#[derive(Debug, Error)]
pub enum HarvesterError {
    /// Item type other than `Article` or `Recital`.
    #[error("Unknown item type '{0}'. Expected 'Article' or 'Recital'")]
    UnknownItemType(String),

    /// Item number that is blank, non-numeric or zero.
    #[error("Invalid item ID '{0}'. Expected a positive integer")]
    InvalidItemId(String),

    /// Canonical ID that is not `A<n>` or `R<n>`.
    #[error("Invalid canonical ID '{0}'. Expected A<n> or R<n> (e.g., A12, R45)")]
    InvalidCanonicalId(String),

    /// Second row with an ID that an earlier row already used.
    #[error("Duplicate item {id}: already defined in row {first_row}")]
    DuplicateItem { id: String, first_row: usize },

    /// A row of the input table failed validation.
    #[error("Invalid row {row} in {path}: {source}")]
    InvalidRow {
        row: usize,
        path: String,
        #[source]
        source: Box<HarvesterError>,
    },

    /// Invalid harvester configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to download a single article or recital page.
    #[error("Failed to download {item} from {url}: {source}")]
    PageDownload {
        item: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// All retry attempts for a request failed.
    #[error("Request failed after {attempts} attempts: {message}")]
    RetriesExhausted { attempts: u32, message: String },

    /// CSV encoding or decoding failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HarvesterError {
    /// Attach the row number and table path to an ingestion error.
    #[must_use]
    pub fn at_row(self, row: usize, path: impl Into<String>) -> Self {
        Self::InvalidRow {
            row,
            path: path.into(),
            source: Box::new(self),
        }
    }
}

/// Result type alias for harvester operations.
pub type Result<T> = std::result::Result<T, HarvesterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HarvesterError::UnknownItemType("Annex".to_string());
        assert!(err.to_string().contains("Annex"));
        assert!(err.to_string().contains("'Article' or 'Recital'"));
    }

    #[test]
    fn test_invalid_row_wraps_source() {
        let err = HarvesterError::InvalidItemId(String::new()).at_row(7, "data/items.csv");
        assert_eq!(
            err.to_string(),
            "Invalid row 7 in data/items.csv: Invalid item ID ''. Expected a positive integer"
        );
    }

    #[test]
    fn test_duplicate_item_display() {
        let err = HarvesterError::DuplicateItem {
            id: "A1".to_string(),
            first_row: 2,
        }
        .at_row(3, "data/items.csv");
        assert_eq!(
            err.to_string(),
            "Invalid row 3 in data/items.csv: Duplicate item A1: already defined in row 2"
        );
    }

    #[test]
    fn test_retries_exhausted_display() {
        let err = HarvesterError::RetriesExhausted {
            attempts: 3,
            message: "Server error: 503".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Request failed after 3 attempts: Server error: 503"
        );
    }
}
