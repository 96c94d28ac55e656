//! Text extraction from article and recital pages.
//!
//! Pages are parsed into a DOM and the text nodes of the few elements we
//! need are kept in document order, one per line. Keeping text nodes on
//! separate lines matters: the "Suitable Recitals" list on article pages is
//! a run of links, and the reference extractor expects one recital number
//! per line.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use unicode_normalization::UnicodeNormalization;

use crate::error::Result;
use crate::types::{Item, ItemType};

#[allow(clippy::expect_used)] // Static selector that is guaranteed to be valid
static HEADING_1: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1").expect("valid selector"));

#[allow(clippy::expect_used)]
/// Paragraphs and level-4 headings, in document order.
static ARTICLE_BLOCKS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p, h4").expect("valid selector"));

#[allow(clippy::expect_used)]
static RECITAL_BLOCKS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p").expect("valid selector"));

/// Non-blank text nodes below `element`, entity-decoded and NFC-normalized.
fn text_nodes(element: ElementRef<'_>) -> impl Iterator<Item = String> + '_ {
    element
        .text()
        .filter(|text| !text.trim().is_empty())
        .map(|text| text.nfc().collect())
}

/// Extract the page title from the first `<h1>`.
pub fn extract_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let heading = document.select(&HEADING_1).next()?;
    let title = text_nodes(heading).next().map(|text| text.trim().to_string());
    title
}

/// Extract the text content of a page.
///
/// Articles include `<p>` and `<h4>` text, recitals only `<p>` text. Text
/// nodes are joined with newlines and the result is trimmed.
pub fn extract_content(html: &str, item_type: ItemType) -> String {
    let document = Html::parse_document(html);
    let blocks: &Selector = match item_type {
        ItemType::Article => &ARTICLE_BLOCKS,
        ItemType::Recital => &RECITAL_BLOCKS,
    };

    let lines: Vec<String> = document.select(blocks).flat_map(text_nodes).collect();
    lines.join("\n").trim().to_string()
}

/// Build an [`Item`] from a downloaded page.
///
/// The title falls back to "Article {n}" / "Recital {n}" when the page has
/// no `<h1>`. Number zero is rejected.
pub fn parse_page(html: &str, item_type: ItemType, number: u32) -> Result<Item> {
    let title = extract_title(html)
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| format!("{} {number}", item_type.as_str()));
    let content = extract_content(html, item_type);
    Item::new(item_type, number, title, content)
}
