//! Configuration for the graph pipeline.
//!
//! Every component receives its settings explicitly; the constants below are
//! only defaults.

use std::path::{Path, PathBuf};

use aiact_harvester::config::{ARTICLE_COUNT, DEFAULT_BASE_URL};

use crate::error::{GraphError, Result};

/// Default directory for the input table and the generated artifacts.
pub const DEFAULT_DATA_DIR: &str = "data";

/// File name of the input table inside the data directory.
pub const INPUT_TABLE_FILE: &str = "articles_and_recitals.csv";

/// File name of the processed reference table inside the data directory.
pub const PROCESSED_TABLE_FILE: &str = "processed_and_formatted.csv";

/// File name of the serialized graph inside the data directory.
pub const GRAPH_FILE: &str = "eu-ai-act-graph.json";

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "AIACT_DATA_DIR";

/// Everything up to and including this marker is page chrome.
pub const COPY_LINK_MARKER: &str = "Copy URL";

/// Everything up to and including this marker is the translation notice.
pub const TRANSLATIONS_MARKER: &str = "official translations.";

/// Everything from this marker on is the feedback footer.
pub const FEEDBACK_MARKER: &str = "Feedback";

/// Literal marker for the list of recitals on article pages.
pub const SUITABLE_RECITALS_MARKER: &str = "Suitable Recitals";

/// Boilerplate markers stripped from every item's content.
///
/// Markers are literal and case-sensitive. A marker that does not occur in
/// a text leaves it unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleaningRules {
    /// Strip everything up to and including the last occurrence.
    pub leading_markers: Vec<String>,

    /// Strip everything from the first occurrence on.
    pub trailing_marker: Option<String>,
}

impl Default for CleaningRules {
    fn default() -> Self {
        Self {
            leading_markers: vec![COPY_LINK_MARKER.to_string(), TRANSLATIONS_MARKER.to_string()],
            trailing_marker: Some(FEEDBACK_MARKER.to_string()),
        }
    }
}

/// Which text the in-body article mention scan reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MentionScope {
    /// The content as fetched, boilerplate included.
    #[default]
    RawContent,

    /// The cleaned primary segment only.
    PrimaryBody,
}

/// Settings for the table expander.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpanderConfig {
    /// Highest article number an in-body mention may refer to.
    pub max_article: u32,

    /// Text scanned for in-body mentions.
    pub mention_scope: MentionScope,
}

impl Default for ExpanderConfig {
    fn default() -> Self {
        Self {
            max_article: ARTICLE_COUNT,
            mention_scope: MentionScope::default(),
        }
    }
}

/// Locations and component settings for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphConfig {
    /// Directory holding the input table and the artifacts.
    pub data_dir: PathBuf,

    /// Base URL used for node links.
    pub base_url: String,

    pub cleaning: CleaningRules,

    pub expander: ExpanderConfig,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}

impl GraphConfig {
    /// Create a configuration rooted at `data_dir` with default settings.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            cleaning: CleaningRules::default(),
            expander: ExpanderConfig::default(),
        }
    }

    /// Read the data directory from `AIACT_DATA_DIR`, falling back to
    /// `data/`.
    pub fn from_env() -> Result<Self> {
        match std::env::var(DATA_DIR_ENV) {
            Ok(dir) if dir.trim().is_empty() => {
                Err(GraphError::Config(format!("{DATA_DIR_ENV} is set but empty")))
            }
            Ok(dir) => Ok(Self::new(dir)),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn input_table_path(&self) -> PathBuf {
        self.data_dir.join(INPUT_TABLE_FILE)
    }

    #[must_use]
    pub fn processed_table_path(&self) -> PathBuf {
        self.data_dir.join(PROCESSED_TABLE_FILE)
    }

    #[must_use]
    pub fn graph_path(&self) -> PathBuf {
        self.data_dir.join(GRAPH_FILE)
    }

    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
