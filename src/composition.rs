//! Sticker composition: how a sticker's glyph splits into sub-parts.
//!
//! Most stickers animate as a single unit. A few are split into named
//! sub-parts so that e.g. the hands of a shrug move independently of the
//! face. The split is a fixed table keyed by sticker id; [`compose`] is the
//! only place it is consulted, and every renderer and exporter goes through it.

use crate::data::StickerRecord;

/// Animation role of a sub-part.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PartRole {
    /// Never animated
    Static,
    /// Animated by the style track with this keyframe name
    Animated(&'static str),
}

/// One entry of a composite layout.
#[derive(Clone, Copy, Debug)]
pub struct PartSpec {
    pub name: &'static str,
    pub text: &'static str,
    pub role: PartRole,
}

/// Hand-authored split of one sticker's symbol.
#[derive(Clone, Copy, Debug)]
pub struct CompositeLayout {
    /// Sticker id this layout applies to
    pub sticker_id: &'static str,
    /// Prefix for sub-part CSS classes
    pub class_prefix: &'static str,
    pub parts: &'static [PartSpec],
}

impl CompositeLayout {
    /// Concatenated text of every part, in order.
    pub fn text(&self) -> String {
        self.parts.iter().map(|p| p.text).collect()
    }

    /// CSS class for a part name, e.g. "shrug-left-hand".
    pub fn class_for(&self, part: &str) -> String {
        format!("{}-{}", self.class_prefix, part)
    }
}

/// A resolved sub-part ready for rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubPart<'a> {
    pub name: &'a str,
    pub text: &'a str,
    pub class: String,
    pub role: PartRole,
}

/// Structural view of a sticker.
#[derive(Clone, Debug)]
pub enum Composition<'a> {
    /// The whole symbol animates as a unit
    Simple { symbol: &'a str },
    /// The symbol is split into independently animated parts
    Composite(&'static CompositeLayout),
}

impl<'a> Composition<'a> {
    /// Check whether this is a composite sticker.
    #[inline]
    pub fn is_composite(&self) -> bool {
        matches!(self, Composition::Composite(_))
    }

    /// Sub-parts in display order. A simple sticker has one unnamed static part.
    pub fn parts(&self) -> Vec<SubPart<'a>> {
        match self {
            Composition::Simple { symbol } => vec![SubPart {
                name: "",
                text: *symbol,
                class: String::new(),
                role: PartRole::Static,
            }],
            Composition::Composite(layout) => layout
                .parts
                .iter()
                .map(|p| SubPart {
                    name: p.name,
                    text: p.text,
                    class: layout.class_for(p.name),
                    role: p.role,
                })
                .collect(),
        }
    }

    /// The glyph as a single string.
    pub fn flattened_text(&self) -> String {
        match self {
            Composition::Simple { symbol } => symbol.to_string(),
            Composition::Composite(layout) => layout.text(),
        }
    }

    /// Inner markup of the sticker element: the escaped symbol for simple
    /// stickers, one `<span>` per part for composites.
    pub fn inner_markup(&self) -> String {
        match self {
            Composition::Simple { symbol } => escape_html(symbol),
            Composition::Composite(_) => self
                .parts()
                .iter()
                .map(|p| format!("<span class=\"{}\">{}</span>", p.class, escape_html(p.text)))
                .collect(),
        }
    }
}

/// Derive the composition of a record.
///
/// Pure and infallible: a record without a composite layout, or whose
/// symbol differs from the layout's text, is simple.
///
/// ## Example
///
/// ```rust
/// use kaomoji_core_view::{compose, StickerRecord};
///
/// let shrug = StickerRecord::new("shrug", "¯\\_(ツ)_/¯", "Shrug", "shrug");
/// let texts: Vec<_> = compose(&shrug).parts().iter().map(|p| p.text.to_string()).collect();
/// assert_eq!(texts, vec!["¯\\_", "(ツ)", "_/¯"]);
///
/// let bear = StickerRecord::new("bear", "ʕ•ᴥ•ʔ", "Bear", "bear");
/// assert!(!compose(&bear).is_composite());
/// ```
pub fn compose(record: &StickerRecord) -> Composition<'_> {
    // a record whose symbol was edited no longer fits its layout
    match layout_for(&record.id) {
        Some(layout) if layout.text() == record.symbol => Composition::Composite(layout),
        _ => Composition::Simple {
            symbol: &record.symbol,
        },
    }
}

/// Find the composite layout for a sticker id.
pub fn layout_for(id: &str) -> Option<&'static CompositeLayout> {
    COMPOSITE_LAYOUTS.iter().find(|l| l.sticker_id == id)
}

/// Every composite layout.
pub fn composite_layouts() -> &'static [CompositeLayout] {
    COMPOSITE_LAYOUTS
}

/// Options for [`sticker_markup`].
#[derive(Clone, Copy, Debug, Default)]
pub struct MarkupOptions {
    /// Add a `data-symbol` attribute carrying the full symbol
    pub data_symbol: bool,
}

/// Markup for a sticker element:
/// `<div class="kaomoji {animation}">…</div>`.
pub fn sticker_markup(record: &StickerRecord, composition: &Composition<'_>, options: MarkupOptions) -> String {
    let data = if options.data_symbol {
        format!(" data-symbol=\"{}\"", escape_html(&record.symbol))
    } else {
        String::new()
    };
    format!(
        "<div class=\"kaomoji {}\"{}>\n    {}\n</div>",
        escape_html(&record.animation_id),
        data,
        composition.inner_markup()
    )
}

/// Escape text for use in HTML content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

use PartRole::{Animated, Static};

static COMPOSITE_LAYOUTS: &[CompositeLayout] = &[
    CompositeLayout {
        sticker_id: "shrug",
        class_prefix: "shrug",
        parts: &[
            PartSpec { name: "left-hand", text: "¯\\_", role: Animated("shrugHands") },
            PartSpec { name: "face", text: "(ツ)", role: Animated("shrugFace") },
            PartSpec { name: "right-hand", text: "_/¯", role: Animated("shrugHands") },
        ],
    },
    CompositeLayout {
        sticker_id: "love",
        class_prefix: "love",
        parts: &[
            PartSpec { name: "bracket", text: "(", role: Static },
            PartSpec { name: "left-heart", text: "♥", role: Animated("loveHearts") },
            PartSpec { name: "smile", text: "‿", role: Static },
            PartSpec { name: "right-heart", text: "♥", role: Animated("loveHearts") },
            PartSpec { name: "bracket", text: ")", role: Static },
        ],
    },
    CompositeLayout {
        sticker_id: "wink",
        class_prefix: "wink",
        parts: &[
            PartSpec { name: "bracket", text: "(", role: Static },
            PartSpec { name: "eye", text: "^", role: Animated("winkEye") },
            PartSpec { name: "nose", text: "_", role: Static },
            PartSpec { name: "closed", text: "-", role: Static },
            PartSpec { name: "bracket", text: ")", role: Static },
        ],
    },
    CompositeLayout {
        sticker_id: "crying",
        class_prefix: "cry",
        parts: &[
            PartSpec { name: "bracket", text: "(", role: Static },
            PartSpec { name: "left-tear", text: "T", role: Animated("tearFlow") },
            PartSpec { name: "nose", text: "_", role: Static },
            PartSpec { name: "right-tear", text: "T", role: Animated("tearFlow") },
            PartSpec { name: "bracket", text: ")", role: Static },
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Catalog;
    use crate::style::style_for;

    #[test]
    fn test_layouts_match_catalog_symbols() {
        let catalog = Catalog::bundled();
        for layout in composite_layouts() {
            let record = catalog
                .get(layout.sticker_id)
                .unwrap_or_else(|| panic!("{} missing from catalog", layout.sticker_id));
            assert_eq!(layout.text(), record.symbol, "{}", layout.sticker_id);
        }
    }

    #[test]
    fn test_animated_parts_resolve_to_tracks() {
        let catalog = Catalog::bundled();
        for layout in composite_layouts() {
            let record = catalog.get(layout.sticker_id).unwrap();
            let style = style_for(&record.animation_id);
            for part in layout.parts {
                if let PartRole::Animated(track) = part.role {
                    assert!(style.track(track).is_some(), "{} -> {}", layout.sticker_id, track);
                }
            }
        }
    }

    #[test]
    fn test_shrug_scenario() {
        let catalog = crate::parse_catalog(
            r#"{"kaomoji": [{"id": "shrug", "symbol": "¯\\_(ツ)_/¯", "name": "Shrug", "animationId": "shrug"}]}"#,
        )
        .unwrap();
        let composition = compose(catalog.get("shrug").unwrap());
        let texts: Vec<_> = composition.parts().iter().map(|p| p.text).collect();
        assert_eq!(texts, vec!["¯\\_", "(ツ)", "_/¯"]);
    }

    #[test]
    fn test_compose_is_deterministic() {
        for record in Catalog::bundled().iter() {
            let first = compose(record);
            let second = compose(record);
            assert_eq!(first.parts(), second.parts());
            assert_eq!(first.inner_markup(), second.inner_markup());
            assert_eq!(first.flattened_text(), record.symbol);
        }
    }

    #[test]
    fn test_simple_markup_escapes() {
        let record = StickerRecord::new("x", "<(\"o\")>", "X", "bounce");
        let markup = sticker_markup(&record, &compose(&record), MarkupOptions { data_symbol: true });
        assert_eq!(
            markup,
            "<div class=\"kaomoji bounce\" data-symbol=\"&lt;(&quot;o&quot;)&gt;\">\n    &lt;(&quot;o&quot;)&gt;\n</div>"
        );
    }

    #[test]
    fn test_composite_markup() {
        let record = StickerRecord::new("crying", "(T_T)", "Crying", "cry");
        let markup = sticker_markup(&record, &compose(&record), MarkupOptions::default());
        assert_eq!(
            markup,
            "<div class=\"kaomoji cry\">\n    <span class=\"cry-bracket\">(</span><span class=\"cry-left-tear\">T</span><span class=\"cry-nose\">_</span><span class=\"cry-right-tear\">T</span><span class=\"cry-bracket\">)</span>\n</div>"
        );
    }

    #[test]
    fn test_changed_symbol_falls_back_to_simple() {
        let record = StickerRecord::new("shrug", "┐(´ー`)┌", "Shrug", "shrug");
        let composition = compose(&record);
        assert!(!composition.is_composite());
        assert_eq!(composition.flattened_text(), record.symbol);
        let markup = sticker_markup(&record, &composition, MarkupOptions::default());
        assert!(markup.contains("┐(´ー`)┌"));
        assert!(!markup.contains("shrug-left-hand"));
    }

    #[test]
    fn test_layout_keyed_by_id_not_symbol() {
        let lookalike = StickerRecord::new("shrug-2", "¯\\_(ツ)_/¯", "Shrug Again", "shrug");
        assert!(!compose(&lookalike).is_composite());
    }
}
