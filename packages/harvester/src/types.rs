//! Core data types for the harvester.
//!
//! These types represent the two kinds of provisions in the EU AI Act and
//! the canonical identifiers (`A12`, `R45`) used across the whole corpus.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{HarvesterError, Result};

/// Kind of provision in the regulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ItemType {
    /// Numbered operative provision.
    Article,

    /// Numbered explanatory preamble paragraph.
    Recital,
}

impl ItemType {
    /// Get the string value used in tables.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Article => "Article",
            Self::Recital => "Recital",
        }
    }

    /// Letter that prefixes canonical IDs of this type.
    #[must_use]
    pub fn prefix(&self) -> char {
        match self {
            Self::Article => 'A',
            Self::Recital => 'R',
        }
    }

    /// Path segment of the public page URL.
    #[must_use]
    pub fn path_segment(&self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Recital => "recital",
        }
    }

    /// Parse from a canonical ID prefix letter.
    #[must_use]
    pub fn from_prefix(prefix: char) -> Option<Self> {
        match prefix {
            'A' => Some(Self::Article),
            'R' => Some(Self::Recital),
            _ => None,
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = HarvesterError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Article" => Ok(Self::Article),
            "Recital" => Ok(Self::Recital),
            other => Err(HarvesterError::UnknownItemType(other.to_string())),
        }
    }
}

/// Corpus-wide identifier of an article or recital, e.g. `A12` or `R45`.
///
/// Ordering is alphanumeric: articles before recitals, then by number, so
/// `A2 < A10 < R1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CanonicalId {
    item_type: ItemType,
    number: u32,
}

impl CanonicalId {
    /// Create a canonical ID.
    ///
    /// Callers are expected to pass a positive number; use
    /// [`CanonicalId::try_new`] for unchecked input.
    #[must_use]
    pub fn new(item_type: ItemType, number: u32) -> Self {
        debug_assert!(number > 0, "item numbers start at 1");
        Self { item_type, number }
    }

    /// Create a canonical ID, rejecting number zero.
    pub fn try_new(item_type: ItemType, number: u32) -> Result<Self> {
        if number == 0 {
            return Err(HarvesterError::InvalidItemId(number.to_string()));
        }
        Ok(Self { item_type, number })
    }

    /// Shorthand for an article ID.
    #[must_use]
    pub fn article(number: u32) -> Self {
        Self::new(ItemType::Article, number)
    }

    /// Shorthand for a recital ID.
    #[must_use]
    pub fn recital(number: u32) -> Self {
        Self::new(ItemType::Recital, number)
    }

    #[must_use]
    pub fn item_type(&self) -> ItemType {
        self.item_type
    }

    #[must_use]
    pub fn number(&self) -> u32 {
        self.number
    }
}

impl fmt::Display for CanonicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.item_type.prefix(), self.number)
    }
}

impl FromStr for CanonicalId {
    type Err = HarvesterError;

    /// Parse `A<n>` or `R<n>`.
    ///
    /// # Examples
    /// ```
    /// use aiact_harvester::types::{CanonicalId, ItemType};
    ///
    /// let id: CanonicalId = "R45".parse().unwrap();
    /// assert_eq!(id.item_type(), ItemType::Recital);
    /// assert_eq!(id.number(), 45);
    /// assert!("X1".parse::<CanonicalId>().is_err());
    /// assert!("A0".parse::<CanonicalId>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || HarvesterError::InvalidCanonicalId(s.to_string());

        let mut chars = s.chars();
        let item_type = chars
            .next()
            .and_then(ItemType::from_prefix)
            .ok_or_else(invalid)?;
        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let number: u32 = digits.parse().map_err(|_| invalid())?;
        Self::try_new(item_type, number).map_err(|_| invalid())
    }
}

impl TryFrom<String> for CanonicalId {
    type Error = HarvesterError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<CanonicalId> for String {
    fn from(id: CanonicalId) -> Self {
        id.to_string()
    }
}

/// Parse an item number from table or URL text.
///
/// Surrounding whitespace is ignored; blank, non-numeric and zero values are
/// rejected.
pub fn parse_item_number(raw: &str) -> Result<u32> {
    let trimmed = raw.trim();
    match trimmed.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(HarvesterError::InvalidItemId(raw.to_string())),
    }
}

/// One fetched article or recital.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    id: CanonicalId,

    /// Page title (e.g., "Article 5: Prohibited AI Practices").
    pub title: String,

    /// Raw page text, boilerplate included.
    pub content: String,
}

impl Item {
    /// Create a new item, rejecting number zero.
    pub fn new(
        item_type: ItemType,
        number: u32,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            id: CanonicalId::try_new(item_type, number)?,
            title: title.into(),
            content: content.into(),
        })
    }

    /// Article or recital.
    #[must_use]
    pub fn item_type(&self) -> ItemType {
        self.id.item_type()
    }

    /// Number within its type, starting at 1.
    #[must_use]
    pub fn number(&self) -> u32 {
        self.id.number()
    }

    /// Canonical ID of this item.
    #[must_use]
    pub fn canonical_id(&self) -> CanonicalId {
        self.id
    }
}

/// Result of a harvest: the fetched items plus non-fatal warnings.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    /// Articles first, then recitals, each in ascending order.
    pub items: Vec<Item>,

    /// Pages that were skipped and why.
    pub warnings: Vec<String>,
}

impl Corpus {
    /// Number of items of the given type.
    #[must_use]
    pub fn count(&self, item_type: ItemType) -> usize {
        self.items
            .iter()
            .filter(|item| item.item_type() == item_type)
            .count()
    }
}
