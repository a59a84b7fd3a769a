//! Core data structures for sticker records and the catalog.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Catalog document shipped with the crate.
pub(crate) const BUNDLED_CATALOG: &str = include_str!("../data/kaomoji-inventory.json");

/// A single kaomoji sticker as loaded from the catalog.
///
/// Records are immutable once loaded; the catalog hands out shared references.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StickerRecord {
    /// Unique key within the catalog
    pub id: String,
    /// Display text (may contain multi-codepoint glyphs)
    pub symbol: String,
    /// Human-readable name
    pub name: String,
    /// Short description shown under the sticker
    #[serde(default)]
    pub description: String,
    /// Key into the animation style registry
    #[serde(rename = "animation", alias = "animationId")]
    pub animation_id: String,
    /// Grouping used by category filters
    #[serde(default)]
    pub category: String,
    /// Free-form search tags
    #[serde(default)]
    pub tags: Vec<String>,
}

impl StickerRecord {
    /// Create a record with empty description, category and tags.
    pub fn new(id: &str, symbol: &str, name: &str, animation_id: &str) -> Self {
        Self {
            id: id.to_string(),
            symbol: symbol.to_string(),
            name: name.to_string(),
            description: String::new(),
            animation_id: animation_id.to_string(),
            category: String::new(),
            tags: Vec::new(),
        }
    }

    /// Check whether the record carries the given tag.
    #[inline]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Base file name used for downloads, e.g. "table flip_kaomoji".
    pub fn file_stem(&self) -> String {
        format!("{}_kaomoji", self.name.to_lowercase())
    }
}

/// Ordered collection of sticker records with an id index.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    records: Vec<StickerRecord>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from records, rejecting empty or duplicate ids.
    pub fn from_records(records: Vec<StickerRecord>) -> Result<Self, CatalogError> {
        let mut catalog = Self {
            records: Vec::with_capacity(records.len()),
            index: HashMap::with_capacity(records.len()),
        };
        for record in records {
            catalog.add(record)?;
        }
        Ok(catalog)
    }

    /// The single built-in record used when loading fails.
    pub fn fallback() -> Self {
        let record = StickerRecord {
            id: "shrug".to_string(),
            symbol: "¯\\_(ツ)_/¯".to_string(),
            name: "Shrug".to_string(),
            description: "I don't know / Whatever".to_string(),
            animation_id: "shrug".to_string(),
            category: "expressions".to_string(),
            tags: vec![
                "shrug".to_string(),
                "dunno".to_string(),
                "whatever".to_string(),
                "indifferent".to_string(),
            ],
        };
        let mut index = HashMap::with_capacity(1);
        index.insert(record.id.clone(), 0);
        Self {
            records: vec![record],
            index,
        }
    }

    /// The catalog shipped with the crate.
    ///
    /// Falls back to [`Catalog::fallback`] if the bundled document is unreadable.
    pub fn bundled() -> Self {
        match crate::parser::parse_catalog(BUNDLED_CATALOG) {
            Ok(catalog) => catalog,
            Err(err) => {
                log::warn!("bundled catalog unreadable, using fallback: {err}");
                Self::fallback()
            }
        }
    }

    /// Append a record. Fails if the id is empty or already present.
    pub fn add(&mut self, record: StickerRecord) -> Result<(), CatalogError> {
        if record.id.is_empty() {
            return Err(CatalogError::EmptyId(self.records.len()));
        }
        if self.index.contains_key(&record.id) {
            return Err(CatalogError::DuplicateId(record.id));
        }
        self.index.insert(record.id.clone(), self.records.len());
        self.records.push(record);
        Ok(())
    }

    /// Look up a record by id.
    #[inline]
    pub fn get(&self, id: &str) -> Option<&StickerRecord> {
        self.index.get(id).map(|&i| &self.records[i])
    }

    /// Check whether a record with this id exists.
    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Records in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &StickerRecord> {
        self.records.iter()
    }

    /// Records as a slice, in catalog order.
    pub fn records(&self) -> &[StickerRecord] {
        &self.records
    }

    /// Number of records.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check whether the catalog is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in the given category, in catalog order.
    pub fn filter_by_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a StickerRecord> + 'a {
        self.records.iter().filter(move |r| r.category == category)
    }

    /// Records carrying the given tag, in catalog order.
    pub fn filter_by_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a StickerRecord> + 'a {
        self.records.iter().filter(move |r| r.has_tag(tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_is_single_shrug() {
        let catalog = Catalog::fallback();
        assert_eq!(catalog.len(), 1);
        let shrug = catalog.get("shrug").unwrap();
        assert_eq!(shrug.symbol, "¯\\_(ツ)_/¯");
        assert_eq!(shrug.animation_id, "shrug");
        assert!(shrug.has_tag("dunno"));
    }

    #[test]
    fn test_add_rejects_duplicates() {
        let mut catalog = Catalog::fallback();
        let dup = StickerRecord::new("shrug", "?", "Again", "shrug");
        assert!(matches!(catalog.add(dup), Err(CatalogError::DuplicateId(id)) if id == "shrug"));

        let empty = StickerRecord::new("", "?", "Nobody", "bounce");
        assert!(matches!(catalog.add(empty), Err(CatalogError::EmptyId(1))));

        catalog.add(StickerRecord::new("bear", "ʕ•ᴥ•ʔ", "Bear", "bear")).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.records()[1].id, "bear");
        assert!(catalog.contains("bear"));
    }

    #[test]
    fn test_filters() {
        let catalog = Catalog::bundled();
        let actions: Vec<_> = catalog.filter_by_category("actions").map(|r| r.id.as_str()).collect();
        assert!(actions.contains(&"tableflip"));
        assert!(!actions.contains(&"shrug"));

        let party: Vec<_> = catalog.filter_by_tag("party").map(|r| r.id.as_str()).collect();
        assert_eq!(party, vec!["celebrate", "dance"]);
    }

    #[test]
    fn test_file_stem() {
        let record = StickerRecord::new("tableflip", "(╯°□°)╯︵ ┻━┻", "Table Flip", "tableflip");
        assert_eq!(record.file_stem(), "table flip_kaomoji");
    }
}
