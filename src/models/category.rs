//! Facility categories and the normalized category set.
//!
//! The category table is fixed configuration: six identifiers with display
//! labels and map marker classes. It is immutable and built into the binary;
//! nothing at runtime may extend it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A facility category a travel-time computation can target.
///
/// Comparisons are case-insensitive at the parsing boundary; internally a
/// category is always its lowercase identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Education,
    Healthcare,
    Supermarket,
    Park,
    PublicTransport,
    Restaurant,
}

/// All known categories, in the canonical display order.
pub const ALL_CATEGORIES: [Category; 6] = [
    Category::Education,
    Category::Healthcare,
    Category::Supermarket,
    Category::Park,
    Category::PublicTransport,
    Category::Restaurant,
];

impl Category {
    /// Parse a category identifier, case-insensitively.
    ///
    /// Unknown identifiers yield `None`; they are never an error, because
    /// external inputs (backend responses, stored selections) may carry keys
    /// this build does not know.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "education" => Some(Category::Education),
            "healthcare" => Some(Category::Healthcare),
            "supermarket" => Some(Category::Supermarket),
            "park" => Some(Category::Park),
            "public_transport" => Some(Category::PublicTransport),
            "restaurant" => Some(Category::Restaurant),
            _ => None,
        }
    }

    /// Lowercase wire identifier.
    pub fn id(&self) -> &'static str {
        match self {
            Category::Education => "education",
            Category::Healthcare => "healthcare",
            Category::Supermarket => "supermarket",
            Category::Park => "park",
            Category::PublicTransport => "public_transport",
            Category::Restaurant => "restaurant",
        }
    }

    /// Human-readable display label.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Education => "Bildung",
            Category::Healthcare => "Gesundheit",
            Category::Supermarket => "Supermarkt",
            Category::Park => "Park",
            Category::PublicTransport => "ÖPNV",
            Category::Restaurant => "Restaurant",
        }
    }

    /// CSS marker class used by map layers.
    pub fn marker_class(&self) -> &'static str {
        match self {
            Category::Education => "poi-education",
            Category::Healthcare => "poi-healthcare",
            Category::Supermarket => "poi-supermarket",
            Category::Park => "poi-park",
            Category::PublicTransport => "poi-public_transport",
            Category::Restaurant => "poi-restaurant",
        }
    }

    /// The travel-time property key for this category (`tt_<id>`).
    pub fn travel_time_key(&self) -> &'static str {
        match self {
            Category::Education => "tt_education",
            Category::Healthcare => "tt_healthcare",
            Category::Supermarket => "tt_supermarket",
            Category::Park => "tt_park",
            Category::PublicTransport => "tt_public_transport",
            Category::Restaurant => "tt_restaurant",
        }
    }

    /// Whether `raw` names a known category (case-insensitive).
    pub fn is_valid(raw: &str) -> bool {
        Category::parse(raw).is_some()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// An ordered, deduplicated set of valid categories.
///
/// An empty set is a legal value; it disables computation rather than
/// causing an error.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategorySet(Vec<Category>);

impl CategorySet {
    /// Normalize raw identifiers into a category set.
    ///
    /// Invalid entries are silently dropped and duplicates collapse onto
    /// their first occurrence, so the result preserves input order.
    pub fn normalize<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = Vec::new();
        for item in raw {
            if let Some(cat) = Category::parse(item.as_ref()) {
                if !out.contains(&cat) {
                    out.push(cat);
                }
            }
        }
        CategorySet(out)
    }

    /// The full category table as a set.
    pub fn all() -> Self {
        CategorySet(ALL_CATEGORIES.to_vec())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, category: Category) -> bool {
        self.0.contains(&category)
    }

    pub fn iter(&self) -> impl Iterator<Item = Category> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[Category] {
        &self.0
    }

    /// Wire identifiers in set order.
    pub fn ids(&self) -> Vec<&'static str> {
        self.0.iter().map(|c| c.id()).collect()
    }
}

impl From<Vec<Category>> for CategorySet {
    fn from(mut categories: Vec<Category>) -> Self {
        let mut seen = Vec::with_capacity(categories.len());
        categories.retain(|c| {
            if seen.contains(c) {
                false
            } else {
                seen.push(*c);
                true
            }
        });
        CategorySet(categories)
    }
}
