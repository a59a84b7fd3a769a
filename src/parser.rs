//! Parsing of catalog documents.

use serde::Deserialize;

use crate::data::{Catalog, StickerRecord};
use crate::error::CatalogError;

#[derive(Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    kaomoji: Option<Vec<StickerRecord>>,
}

/// Parse a catalog document into a [`Catalog`].
///
/// ## Format
///
/// A JSON object with a `kaomoji` array of records. Each record has
/// `id`, `symbol`, `name`, `animation` (or `animationId`) and optionally
/// `description`, `category` and `tags`. Other fields are ignored.
///
/// ## Example
///
/// ```rust
/// use kaomoji_core_view::parse_catalog;
///
/// let text = r#"{"kaomoji": [
///     {"id": "bear", "symbol": "ʕ•ᴥ•ʔ", "name": "Bear", "animation": "bear"}
/// ]}"#;
///
/// let catalog = parse_catalog(text).unwrap();
/// assert_eq!(catalog.len(), 1);
/// assert_eq!(catalog.get("bear").unwrap().animation_id, "bear");
/// ```
pub fn parse_catalog(text: &str) -> Result<Catalog, CatalogError> {
    let document: CatalogDocument = serde_json::from_str(text)?;
    let records = document.kaomoji.ok_or(CatalogError::MissingField)?;
    Catalog::from_records(records)
}

/// Parse a catalog document from raw bytes.
pub fn parse_catalog_bytes(bytes: &[u8]) -> Result<Catalog, CatalogError> {
    let document: CatalogDocument = serde_json::from_slice(bytes)?;
    let records = document.kaomoji.ok_or(CatalogError::MissingField)?;
    Catalog::from_records(records)
}
