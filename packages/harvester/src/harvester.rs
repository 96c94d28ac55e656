//! Main harvester service that ties all components together.

use reqwest::blocking::Client;

use crate::config::HarvestConfig;
use crate::error::{HarvesterError, Result};
use crate::html::parse_page;
use crate::http::{create_client, download_page, Page};
use crate::types::{Corpus, Item, ItemType};

/// Anything that can produce the input table of the pipeline.
///
/// The graph pipeline only needs a corpus when its cached input table is
/// missing; implementing this trait lets tests and offline runs swap in a
/// local source for the live site.
pub trait CorpusSource {
    /// Produce all items of the corpus.
    fn fetch_corpus(&self) -> Result<Corpus>;
}

/// Downloads article and recital pages from the public site.
pub struct Harvester {
    client: Client,
    config: HarvestConfig,
}

impl Harvester {
    /// Create a harvester with its own HTTP client.
    pub fn new(config: HarvestConfig) -> Result<Self> {
        config.validate()?;
        let client = create_client(config.timeout)?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    /// Download and parse a single page.
    ///
    /// Returns `Ok(None)` when the page does not exist.
    pub fn fetch_item(&self, item_type: ItemType, number: u32) -> Result<Option<Item>> {
        let url = self.config.item_url(item_type, number);
        tracing::debug!(%url, "Fetching page");

        let page = download_page(&self.client, &url).map_err(|e| match e {
            HarvesterError::Http(source) => HarvesterError::PageDownload {
                item: format!("{item_type} {number}"),
                url: url.clone(),
                source,
            },
            other => other,
        })?;

        match page {
            Page::Found(html) => parse_page(&html, item_type, number).map(Some),
            Page::NotFound => Ok(None),
        }
    }

    /// Fetch every configured article, then every configured recital.
    ///
    /// `on_item` is called before each request, for progress reporting.
    /// Missing pages are skipped and recorded as warnings; any other failure
    /// aborts the harvest.
    pub fn harvest_with_progress(
        &self,
        mut on_item: impl FnMut(ItemType, u32),
    ) -> Result<Corpus> {
        let mut corpus = Corpus::default();

        let work = self
            .config
            .articles
            .clone()
            .map(|n| (ItemType::Article, n))
            .chain(self.config.recitals.clone().map(|n| (ItemType::Recital, n)));

        for (item_type, number) in work {
            on_item(item_type, number);
            match self.fetch_item(item_type, number)? {
                Some(item) => corpus.items.push(item),
                None => {
                    tracing::warn!(%item_type, number, "Page not found, skipping");
                    corpus
                        .warnings
                        .push(format!("{item_type} {number}: page not found"));
                }
            }
        }

        tracing::info!(
            articles = corpus.count(ItemType::Article),
            recitals = corpus.count(ItemType::Recital),
            skipped = corpus.warnings.len(),
            "Harvest finished"
        );
        Ok(corpus)
    }
}

impl CorpusSource for Harvester {
    fn fetch_corpus(&self) -> Result<Corpus> {
        self.harvest_with_progress(|_, _| {})
    }
}
