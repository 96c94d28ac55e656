//! Configuration constants and the harvest configuration.

use std::ops::RangeInclusive;
use std::time::Duration;

use crate::error::{HarvesterError, Result};
use crate::types::{CanonicalId, ItemType};

/// Public site that hosts the consolidated EU AI Act text.
pub const DEFAULT_BASE_URL: &str = "https://artificialintelligenceact.eu";

/// Number of the last article of the regulation.
pub const ARTICLE_COUNT: u32 = 113;

/// Number of the last recital of the regulation.
pub const RECITAL_COUNT: u32 = 180;

/// HTTP timeout in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Default location of the input table, relative to the working directory.
pub const DEFAULT_INPUT_TABLE: &str = "data/articles_and_recitals.csv";

/// Settings for a harvest run.
///
/// Passed explicitly to the [`Harvester`](crate::harvester::Harvester) so
/// tests can point it at a mock server and fetch a handful of pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestConfig {
    /// Base URL without trailing slash.
    pub base_url: String,

    /// Article numbers to fetch.
    pub articles: RangeInclusive<u32>,

    /// Recital numbers to fetch.
    pub recitals: RangeInclusive<u32>,

    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            articles: 1..=ARTICLE_COUNT,
            recitals: 1..=RECITAL_COUNT,
            timeout: Duration::from_secs(HTTP_TIMEOUT_SECS),
        }
    }
}

impl HarvestConfig {
    /// Set the base URL. A trailing slash is removed.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the article range.
    #[must_use]
    pub fn with_articles(mut self, articles: RangeInclusive<u32>) -> Self {
        self.articles = articles;
        self
    }

    /// Set the recital range.
    #[must_use]
    pub fn with_recitals(mut self, recitals: RangeInclusive<u32>) -> Self {
        self.recitals = recitals;
        self
    }

    /// Reject ranges that contain item number zero.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(HarvesterError::InvalidConfig("base URL is empty".into()));
        }
        for (name, range) in [("article", &self.articles), ("recital", &self.recitals)] {
            if *range.start() == 0 && !range.is_empty() {
                return Err(HarvesterError::InvalidConfig(format!(
                    "{name} numbers start at 1"
                )));
            }
        }
        Ok(())
    }

    /// Total number of pages a full harvest requests.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.articles.clone().count() + self.recitals.clone().count()
    }

    /// Build the page URL for an item.
    ///
    /// # Examples
    /// ```
    /// use aiact_harvester::config::HarvestConfig;
    /// use aiact_harvester::types::ItemType;
    ///
    /// let config = HarvestConfig::default();
    /// assert_eq!(
    ///     config.item_url(ItemType::Recital, 12),
    ///     "https://artificialintelligenceact.eu/recital/12/"
    /// );
    /// ```
    #[must_use]
    pub fn item_url(&self, item_type: ItemType, number: u32) -> String {
        item_url(&self.base_url, item_type, number)
    }
}

/// Build the page URL for an item under `base_url`.
#[must_use]
pub fn item_url(base_url: &str, item_type: ItemType, number: u32) -> String {
    format!("{base_url}/{}/{number}/", item_type.path_segment())
}

/// Format a node label with a markdown link to its public page.
///
/// # Examples
/// ```
/// use aiact_harvester::config::{format_node_link, DEFAULT_BASE_URL};
/// use aiact_harvester::types::CanonicalId;
///
/// let id: CanonicalId = "A5".parse().unwrap();
/// assert_eq!(
///     format_node_link(&id, DEFAULT_BASE_URL),
///     "Article 5 - [go to article](https://artificialintelligenceact.eu/article/5/)"
/// );
/// ```
#[must_use]
pub fn format_node_link(id: &CanonicalId, base_url: &str) -> String {
    let item_type = id.item_type();
    format!(
        "{} {} - [go to {}]({})",
        item_type.as_str(),
        id.number(),
        item_type.path_segment(),
        item_url(base_url, item_type, id.number())
    )
}
