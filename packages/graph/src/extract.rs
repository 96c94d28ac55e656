//! Reference extraction from article and recital text.
//!
//! Each item's content is cleaned of page boilerplate and then segmented
//! into a primary body plus the fragments that point at other items:
//!
//! - article pages end with a "Suitable Recitals" block listing recital
//!   numbers, one per line;
//! - recital pages end with "Article <n>: <title>" lines naming the articles
//!   they explain.

use std::sync::LazyLock;

use aiact_harvester::types::{CanonicalId, Item, ItemType};
use regex::Regex;

use crate::config::{CleaningRules, SUITABLE_RECITALS_MARKER};
use crate::error::{GraphError, Result};

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
/// "Suitable Recitals" header followed by one or more numeric lines.
static RECITAL_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Suitable Recitals\s*\n(?:\d+\s*\n*)+").expect("valid regex")
});

#[allow(clippy::expect_used)]
static ARTICLE_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Article \d+:").expect("valid regex"));

/// A piece of an item's content that refers to another item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Recital listed under "Suitable Recitals" on an article page.
    Recital(CanonicalId),

    /// Raw "Article <n>: ..." segment of a recital page, normalized later.
    ArticleHeading(String),
}

/// Segmented content of one item.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Extraction {
    /// Cleaned text before the first reference block, if any.
    pub primary: Option<String>,

    /// Reference fragments in order of appearance.
    pub fragments: Vec<Fragment>,
}

/// Cleans boilerplate and splits item content into reference fragments.
#[derive(Debug, Clone)]
pub struct ReferenceExtractor {
    leading: Vec<Regex>,
    trailing: Option<Regex>,
}

impl ReferenceExtractor {
    /// Compile the cleaning rules.
    pub fn new(rules: &CleaningRules) -> Result<Self> {
        let compile = |pattern: String, marker: &str| {
            Regex::new(&pattern).map_err(|source| GraphError::InvalidRule {
                marker: marker.to_string(),
                source,
            })
        };

        let leading = rules
            .leading_markers
            .iter()
            .map(|marker| compile(format!(r"(?s)\A.*{}\s*", regex::escape(marker)), marker.as_str()))
            .collect::<Result<Vec<_>>>()?;
        let trailing = rules
            .trailing_marker
            .as_deref()
            .map(|marker| compile(format!(r"(?s){}.*\z", regex::escape(marker)), marker))
            .transpose()?;

        Ok(Self { leading, trailing })
    }

    /// Remove page chrome, the translation notice and the feedback footer.
    ///
    /// Leading rules cut through the last occurrence of their marker, the
    /// trailing rule from the first occurrence of its marker.
    pub fn clean(&self, text: &str) -> String {
        let mut cleaned = text.to_string();
        for rule in &self.leading {
            cleaned = rule.replace(&cleaned, "").into_owned();
        }
        if let Some(rule) = &self.trailing {
            cleaned = rule.replace(&cleaned, "").into_owned();
        }
        cleaned
    }

    /// Clean and segment an item according to its type.
    pub fn extract(&self, item: &Item) -> Extraction {
        let cleaned = self.clean(&item.content);
        let extraction = match item.item_type() {
            ItemType::Article => split_article(&cleaned),
            ItemType::Recital => split_recital(&cleaned),
        };
        tracing::trace!(
            id = %item.canonical_id(),
            fragments = extraction.fragments.len(),
            has_body = extraction.primary.is_some(),
            "Extracted item"
        );
        extraction
    }
}

/// Turn the text before the first reference block into the primary segment.
///
/// Trims whitespace and drops a dangling "Suitable Recitals" header that has
/// no numbers after it. Returns `None` when nothing is left.
fn primary_segment(text: &str) -> Option<String> {
    let mut body = text.trim();
    if let Some(stripped) = body.strip_suffix(SUITABLE_RECITALS_MARKER) {
        body = stripped.trim_end();
    }
    (!body.is_empty()).then(|| body.to_string())
}

/// Recital numbers listed in one "Suitable Recitals" block.
fn recital_tokens(block: &str) -> impl Iterator<Item = CanonicalId> + '_ {
    block
        .trim_start_matches(SUITABLE_RECITALS_MARKER)
        .split_whitespace()
        .filter_map(|token| token.parse::<u32>().ok())
        .filter(|&number| number > 0)
        .map(CanonicalId::recital)
}

/// Split article text at its "Suitable Recitals" blocks.
///
/// Each listed number becomes its own `R<n>` fragment. Prose that follows a
/// block is not a reference and is dropped.
///
/// # Examples
/// ```
/// use aiact_graph::extract::{split_article, Fragment};
/// use aiact_harvester::types::CanonicalId;
///
/// let extraction = split_article("Body text.\nSuitable Recitals\n12\n45\n");
/// assert_eq!(extraction.primary.as_deref(), Some("Body text."));
/// assert_eq!(
///     extraction.fragments,
///     vec![
///         Fragment::Recital(CanonicalId::recital(12)),
///         Fragment::Recital(CanonicalId::recital(45)),
///     ]
/// );
/// ```
pub fn split_article(text: &str) -> Extraction {
    let mut extraction = Extraction::default();
    let mut last_end: Option<usize> = None;

    for block in RECITAL_BLOCK.find_iter(text) {
        match last_end {
            None => extraction.primary = primary_segment(&text[..block.start()]),
            Some(end) => log_discarded(&text[end..block.start()]),
        }
        extraction
            .fragments
            .extend(recital_tokens(block.as_str()).map(Fragment::Recital));
        last_end = Some(block.end());
    }

    match last_end {
        None => extraction.primary = primary_segment(text),
        Some(end) => log_discarded(&text[end..]),
    }

    extraction
}

fn log_discarded(text: &str) {
    let text = text.trim();
    if !text.is_empty() {
        tracing::trace!(text, "Discarding text after recital block");
    }
}

/// Split recital text at its "Article <n>:" markers.
///
/// Each fragment keeps its marker and the text up to the next marker.
///
/// # Examples
/// ```
/// use aiact_graph::extract::{split_recital, Fragment};
///
/// let extraction = split_recital("Body.\nArticle 7: Obligations\nArticle 9: Risks");
/// assert_eq!(extraction.primary.as_deref(), Some("Body."));
/// assert_eq!(
///     extraction.fragments,
///     vec![
///         Fragment::ArticleHeading("Article 7: Obligations\n".to_string()),
///         Fragment::ArticleHeading("Article 9: Risks".to_string()),
///     ]
/// );
/// ```
pub fn split_recital(text: &str) -> Extraction {
    let starts: Vec<usize> = ARTICLE_HEADING.find_iter(text).map(|m| m.start()).collect();

    let Some(&first) = starts.first() else {
        return Extraction {
            primary: primary_segment(text),
            fragments: Vec::new(),
        };
    };

    let fragments = starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(text.len());
            Fragment::ArticleHeading(text[start..end].to_string())
        })
        .collect();

    Extraction {
        primary: primary_segment(&text[..first]),
        fragments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn extractor() -> ReferenceExtractor {
        ReferenceExtractor::new(&CleaningRules::default()).unwrap()
    }

    #[test]
    fn test_clean_strips_all_markers() {
        let text = "Menu\nCopy URL\nThe EU AI Act ... see the official translations.\n\
                    Actual text.\nFeedback\nPlease send feedback";
        assert_eq!(extractor().clean(text), "Actual text.\n");
    }

    #[test]
    fn test_clean_uses_last_leading_marker() {
        let text = "Copy URL one Copy URL\nkept";
        assert_eq!(extractor().clean(text), "kept");
    }

    #[test]
    fn test_clean_cuts_from_first_feedback() {
        let text = "kept Feedback middle Feedback end";
        assert_eq!(extractor().clean(text), "kept ");
    }

    #[test]
    fn test_clean_without_markers_is_identity() {
        let text = "No boilerplate here.\n";
        assert_eq!(extractor().clean(text), text);
    }

    #[test]
    fn test_clean_is_case_sensitive() {
        let text = "copy url\nfeedback";
        assert_eq!(extractor().clean(text), text);
    }

    #[test]
    fn test_custom_rules_are_escaped() {
        let rules = CleaningRules {
            leading_markers: vec!["[start]".to_string()],
            trailing_marker: None,
        };
        let extractor = ReferenceExtractor::new(&rules).unwrap();
        assert_eq!(extractor.clean("x [start] body s"), "body s");
    }

    #[test]
    fn test_split_article_separate_recital_tokens() {
        let extraction = split_article("Providers shall...\nSuitable Recitals\n12\n45\n");
        assert_eq!(extraction.primary.as_deref(), Some("Providers shall..."));
        assert_eq!(
            extraction.fragments,
            vec![
                Fragment::Recital(CanonicalId::recital(12)),
                Fragment::Recital(CanonicalId::recital(45)),
            ]
        );
    }

    #[test]
    fn test_split_article_numbers_with_trailing_spaces() {
        let extraction = split_article("Body\nSuitable Recitals \n20 \n91  \n");
        assert_eq!(
            extraction.fragments,
            vec![
                Fragment::Recital(CanonicalId::recital(20)),
                Fragment::Recital(CanonicalId::recital(91)),
            ]
        );
    }

    #[test]
    fn test_split_article_multiple_blocks_discard_prose() {
        let text = "Body\nSuitable Recitals\n1\nsome prose\nSuitable Recitals\n2\n";
        let extraction = split_article(text);
        assert_eq!(extraction.primary.as_deref(), Some("Body"));
        assert_eq!(
            extraction.fragments,
            vec![
                Fragment::Recital(CanonicalId::recital(1)),
                Fragment::Recital(CanonicalId::recital(2)),
            ]
        );
    }

    #[test]
    fn test_split_article_without_block() {
        let extraction = split_article("  Only body text.  ");
        assert_eq!(extraction.primary.as_deref(), Some("Only body text."));
        assert!(extraction.fragments.is_empty());
    }

    #[test]
    fn test_split_article_blank_primary() {
        let extraction = split_article("\n  \nSuitable Recitals\n3\n");
        assert_eq!(extraction.primary, None);
        assert_eq!(extraction.fragments, vec![Fragment::Recital(CanonicalId::recital(3))]);
    }

    #[test]
    fn test_split_article_drops_dangling_header() {
        let extraction = split_article("Body text\nSuitable Recitals\n");
        assert_eq!(extraction.primary.as_deref(), Some("Body text"));
        assert!(extraction.fragments.is_empty());

        let extraction = split_article("Suitable Recitals");
        assert_eq!(extraction, Extraction::default());
    }

    #[test]
    fn test_split_article_skips_recital_zero() {
        let extraction = split_article("Body\nSuitable Recitals\n0\n7\n");
        assert_eq!(extraction.fragments, vec![Fragment::Recital(CanonicalId::recital(7))]);
    }

    #[test]
    fn test_split_recital_keeps_markers() {
        let extraction = split_recital("Recital body.\nArticle 7: Obligations of providers");
        assert_eq!(extraction.primary.as_deref(), Some("Recital body."));
        assert_eq!(
            extraction.fragments,
            vec![Fragment::ArticleHeading(
                "Article 7: Obligations of providers".to_string()
            )]
        );
    }

    #[test]
    fn test_split_recital_ignores_unmarked_mentions() {
        // Without a colon this is a mention, not a heading
        let extraction = split_recital("See Article 5 for details.");
        assert_eq!(extraction.primary.as_deref(), Some("See Article 5 for details."));
        assert!(extraction.fragments.is_empty());
    }

    #[test]
    fn test_split_recital_blank_primary() {
        let extraction = split_recital("Article 1: Subject matter");
        assert_eq!(extraction.primary, None);
        assert_eq!(extraction.fragments.len(), 1);
    }

    #[test]
    fn test_extract_dispatches_on_type() {
        let article = Item::new(
            ItemType::Article,
            4,
            "Article 4",
            "Copy URL\nBody\nSuitable Recitals\n20\nFeedback\nfooter",
        ).unwrap();
        let extraction = extractor().extract(&article);
        assert_eq!(extraction.primary.as_deref(), Some("Body"));
        assert_eq!(extraction.fragments, vec![Fragment::Recital(CanonicalId::recital(20))]);

        let recital = Item::new(
            ItemType::Recital,
            12,
            "Recital 12",
            "official translations.\nBody\nArticle 3: Definitions\nFeedback",
        ).unwrap();
        let extraction = extractor().extract(&recital);
        assert_eq!(extraction.primary.as_deref(), Some("Body"));
        assert_eq!(
            extraction.fragments,
            vec![Fragment::ArticleHeading("Article 3: Definitions\n".to_string())]
        );
    }
}
