//! Expansion of items into typed reference rows.
//!
//! Every item becomes one [`ReferenceRow`]: its canonical ID, title, cleaned
//! body and the list of items it points at. References come from two
//! places: the fragments found by the [`ReferenceExtractor`] and article
//! numbers mentioned in running text ("Articles 3, 4 and 50").

use std::sync::LazyLock;

use aiact_harvester::types::{CanonicalId, Item, ItemType};
use regex::Regex;
use serde::Serialize;

use crate::config::{ExpanderConfig, MentionScope};
use crate::extract::{Extraction, Fragment, ReferenceExtractor};

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static FIRST_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("valid regex"));

#[allow(clippy::expect_used)]
/// "Article 5", "Articles 3, 4 and 50" and similar mention lists.
static ARTICLE_MENTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Articles? (\d+(?:, \d+)*(?: and \d+)?)").expect("valid regex")
});

#[allow(clippy::expect_used)]
static MENTION_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r", | and ").expect("valid regex"));

/// Where a reference was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceOrigin {
    /// Listed under "Suitable Recitals" on an article page.
    SuitableRecital,

    /// "Article <n>:" heading on a recital page.
    ArticleHeading,

    /// Article number mentioned in running text.
    InBodyMention,
}

/// A directed reference from one item to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Reference {
    pub target: CanonicalId,
    pub origin: ReferenceOrigin,
}

impl Reference {
    #[must_use]
    pub fn new(target: CanonicalId, origin: ReferenceOrigin) -> Self {
        Self { target, origin }
    }

    /// Whether this reference came from a reference block rather than prose.
    #[must_use]
    pub fn is_fragment(&self) -> bool {
        self.origin != ReferenceOrigin::InBodyMention
    }
}

/// One item with everything it refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceRow {
    pub id: CanonicalId,
    pub title: String,

    /// Cleaned primary text, `None` when nothing remained after cleaning.
    pub body: Option<String>,

    /// Fragment references first, then in-body mentions, each in order of
    /// appearance. Duplicates are kept.
    pub references: Vec<Reference>,
}

impl ReferenceRow {
    #[must_use]
    pub fn new(id: CanonicalId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            body: None,
            references: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    #[must_use]
    pub fn with_reference(mut self, target: CanonicalId, origin: ReferenceOrigin) -> Self {
        self.references.push(Reference::new(target, origin));
        self
    }

    #[must_use]
    pub fn item_type(&self) -> ItemType {
        self.id.item_type()
    }

    /// References from reference blocks, in order.
    pub fn fragment_references(&self) -> impl Iterator<Item = &Reference> {
        self.references.iter().filter(|r| r.is_fragment())
    }

    /// References from running text, in order.
    pub fn mentions(&self) -> impl Iterator<Item = &Reference> {
        self.references.iter().filter(|r| !r.is_fragment())
    }
}

/// Turn an "Article <n>: ..." heading into the article it names.
///
/// Uses the first run of digits. Returns `None` when there is none or the
/// number is zero.
///
/// # Examples
/// ```
/// use aiact_graph::expand::normalize_article_fragment;
///
/// let id = normalize_article_fragment("Article 7: Obligations").unwrap();
/// assert_eq!(id.to_string(), "A7");
/// assert!(normalize_article_fragment("no number").is_none());
/// ```
#[must_use]
pub fn normalize_article_fragment(fragment: &str) -> Option<CanonicalId> {
    FIRST_NUMBER
        .find(fragment)
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .filter(|&number| number > 0)
        .map(CanonicalId::article)
}

/// Find article mentions in running text.
///
/// Numbers above `max_article` (and zero) are dropped. Every occurrence is
/// returned, so a text that mentions Article 5 twice yields `A5` twice.
///
/// # Examples
/// ```
/// use aiact_graph::expand::scan_article_mentions;
///
/// let ids: Vec<String> = scan_article_mentions("See Articles 3, 4 and 117.", 113)
///     .iter()
///     .map(ToString::to_string)
///     .collect();
/// assert_eq!(ids, ["A3", "A4"]);
/// ```
#[must_use]
pub fn scan_article_mentions(text: &str, max_article: u32) -> Vec<CanonicalId> {
    ARTICLE_MENTION
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .flat_map(|list| MENTION_SEPARATOR.split(list.as_str()))
        .filter_map(|number| number.trim().parse::<u32>().ok())
        .filter(|&number| (1..=max_article).contains(&number))
        .map(CanonicalId::article)
        .collect()
}

/// Expands items into reference rows.
#[derive(Debug, Clone)]
pub struct TableExpander {
    extractor: ReferenceExtractor,
    config: ExpanderConfig,
}

impl TableExpander {
    #[must_use]
    pub fn new(extractor: ReferenceExtractor, config: ExpanderConfig) -> Self {
        Self { extractor, config }
    }

    /// Expand a single item.
    #[must_use]
    pub fn expand_item(&self, item: &Item) -> ReferenceRow {
        let id = item.canonical_id();
        let Extraction { primary, fragments } = self.extractor.extract(item);

        let mut references = Vec::with_capacity(fragments.len());
        for fragment in fragments {
            match fragment {
                Fragment::Recital(target) => {
                    references.push(Reference::new(target, ReferenceOrigin::SuitableRecital));
                }
                Fragment::ArticleHeading(text) => match normalize_article_fragment(&text) {
                    Some(target) => {
                        references.push(Reference::new(target, ReferenceOrigin::ArticleHeading));
                    }
                    None => {
                        tracing::warn!(%id, fragment = %text.trim(), "Dropping heading without article number");
                    }
                },
            }
        }

        let scanned = match self.config.mention_scope {
            MentionScope::RawContent => item.content.as_str(),
            MentionScope::PrimaryBody => primary.as_deref().unwrap_or_default(),
        };
        references.extend(
            scan_article_mentions(scanned, self.config.max_article)
                .into_iter()
                .map(|target| Reference::new(target, ReferenceOrigin::InBodyMention)),
        );

        ReferenceRow {
            id,
            title: item.title.clone(),
            body: primary,
            references,
        }
    }

    /// Expand every item, keeping input order.
    #[must_use]
    pub fn expand(&self, items: &[Item]) -> Vec<ReferenceRow> {
        let rows: Vec<_> = items.iter().map(|item| self.expand_item(item)).collect();
        tracing::debug!(
            rows = rows.len(),
            references = rows.iter().map(|r| r.references.len()).sum::<usize>(),
            "Expanded items"
        );
        rows
    }
}
