//! Export actions: standalone HTML document, copyable code and animated GIF.
//!
//! Every action is keyed by sticker id and re-resolves the record from the
//! catalog. An unknown id is a no-op (`None`), never an error.

use crate::composition::{compose, escape_html, sticker_markup, MarkupOptions};
use crate::config::ExportConfig;
use crate::data::{Catalog, StickerRecord};
use crate::error::{ExportError, RenderError};
use crate::render::GlyphRasterizer;
use crate::sampler::{AnimatedImage, FrameSampler};
use crate::style::{style_for, stylesheet};

/// Background of exported documents.
pub const DOCUMENT_BACKGROUND: &str = "linear-gradient(135deg, #667eea 0%, #764ba2 100%)";

/// Everything an export action needs, passed in explicitly.
#[derive(Clone, Copy)]
pub struct ExportContext<'a> {
    pub catalog: &'a Catalog,
    pub config: &'a ExportConfig,
    /// Glyph source for image export; `None` disables it
    pub rasterizer: Option<&'a dyn GlyphRasterizer>,
}

impl<'a> ExportContext<'a> {
    pub fn new(catalog: &'a Catalog, config: &'a ExportConfig) -> Self {
        Self {
            catalog,
            config,
            rasterizer: None,
        }
    }

    pub fn with_rasterizer(mut self, rasterizer: &'a dyn GlyphRasterizer) -> Self {
        self.rasterizer = Some(rasterizer);
        self
    }

    /// Frame sampler for image export.
    pub fn sampler(&self) -> Result<FrameSampler<'a>, ExportError> {
        let rasterizer = self.rasterizer.ok_or(RenderError::NoFont)?;
        Ok(FrameSampler::new(self.config.clone(), rasterizer))
    }
}

/// A standalone HTML page showing one animated sticker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentExport {
    pub file_name: String,
    pub mime: &'static str,
    pub html: String,
}

/// Markup and stylesheet for pasting into another page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeExport {
    pub markup: String,
    pub css: String,
}

impl CodeExport {
    /// Clipboard text: markup and stylesheet under labelled headings.
    pub fn text(&self) -> String {
        format!("HTML:\n{}\n\nCSS:\n{}", self.markup, self.css)
    }
}

fn sticker_css(record: &StickerRecord) -> String {
    stylesheet(&compose(record), &record.animation_id, style_for(&record.animation_id))
}

/// Build the standalone document for `id`.
///
/// ## Example
///
/// ```rust
/// use kaomoji_core_view::{Catalog, ExportConfig};
/// use kaomoji_core_view::export::{document_export, ExportContext};
///
/// let catalog = Catalog::bundled();
/// let config = ExportConfig::default();
/// let ctx = ExportContext::new(&catalog, &config);
///
/// let doc = document_export(&ctx, "bear").unwrap();
/// assert_eq!(doc.file_name, "bear_kaomoji.html");
/// assert!(doc.html.contains("@keyframes bear"));
/// assert!(document_export(&ctx, "unicorn").is_none());
/// ```
pub fn document_export(ctx: &ExportContext<'_>, id: &str) -> Option<DocumentExport> {
    let record = ctx.catalog.get(id)?;
    let composition = compose(record);
    let markup = sticker_markup(record, &composition, MarkupOptions::default());
    let css = indent(&sticker_css(record), "        ");
    let layout = if composition.is_composite() {
        "\n            display: flex;\n            justify-content: center;\n            align-items: center;\n            gap: 0;"
    } else {
        ""
    };

    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - Animated Kaomoji</title>
    <style>
{css}
        body {{
            display: flex;
            justify-content: center;
            align-items: center;
            min-height: 100vh;
            margin: 0;
            font-family: 'Courier New', monospace;
            background: {background};
        }}
        .kaomoji {{
            font-size: 4rem;
            color: white;
            text-shadow: 2px 2px 4px rgba(0, 0, 0, 0.3);
            white-space: nowrap;{layout}
        }}
    </style>
</head>
<body>
{markup}
</body>
</html>
"#,
        title = escape_html(&record.name),
        background = DOCUMENT_BACKGROUND,
        css = css,
        layout = layout,
        markup = indent(&markup, "    "),
    );

    Some(DocumentExport {
        file_name: format!("{}.html", record.file_stem()),
        mime: "text/html",
        html,
    })
}

/// Build the markup/stylesheet pair for `id`.
pub fn code_export(ctx: &ExportContext<'_>, id: &str) -> Option<CodeExport> {
    let record = ctx.catalog.get(id)?;
    Some(CodeExport {
        markup: sticker_markup(record, &compose(record), MarkupOptions::default()),
        css: sticker_css(record),
    })
}

/// Render and encode the animated GIF for `id`.
pub fn image_export(ctx: &ExportContext<'_>, id: &str) -> Option<Result<AnimatedImage, ExportError>> {
    let record = ctx.catalog.get(id)?;
    let result = ctx.sampler().and_then(|sampler| sampler.export_animation(record));
    if let Err(e) = &result {
        log::error!("Error creating GIF for {id}: {e}");
    }
    Some(result)
}

fn indent(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Browser downloads through transient object URLs.
#[cfg(feature = "web")]
pub mod web {
    use wasm_bindgen::JsCast;
    use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

    /// Create an object URL for `bytes`. Release it with [`revoke_object_url`].
    pub fn object_url(bytes: &[u8], mime: &str) -> Result<String, String> {
        let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes));
        let options = BlobPropertyBag::new();
        options.set_type(mime);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(|_| "Failed to create blob")?;
        Url::create_object_url_with_blob(&blob).map_err(|_| "Failed to create object URL".to_string())
    }

    pub fn revoke_object_url(url: &str) {
        let _ = Url::revoke_object_url(url);
    }

    /// Offer `bytes` as a file download.
    pub fn download(file_name: &str, mime: &str, bytes: &[u8]) -> Result<(), String> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or("No document available")?;
        let body = document.body().ok_or("No body available")?;
        let url = object_url(bytes, mime)?;

        let anchor = document
            .create_element("a")
            .map_err(|_| "Failed to create anchor")?
            .dyn_into::<HtmlAnchorElement>()
            .map_err(|_| "Failed to cast element to HtmlAnchorElement")?;
        anchor.set_href(&url);
        anchor.set_download(file_name);

        // Firefox ignores clicks on detached anchors
        body.append_child(&anchor).map_err(|_| "Failed to attach anchor")?;
        anchor.click();
        let _ = body.remove_child(&anchor);

        revoke_object_url(&url);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::tests::BoxRasterizer;

    fn fixture() -> (Catalog, ExportConfig) {
        (Catalog::bundled(), ExportConfig::default())
    }

    #[test]
    fn test_document_has_one_structural_class() {
        let (catalog, config) = fixture();
        let ctx = ExportContext::new(&catalog, &config);
        for record in catalog.iter() {
            let doc = document_export(&ctx, &record.id).unwrap();
            let class = format!("class=\"kaomoji {}\"", record.animation_id);
            assert_eq!(doc.html.matches(&class).count(), 1, "{}", record.id);
            for name in style_for(&record.animation_id).keyframe_names() {
                assert!(doc.html.contains(&format!("@keyframes {name} ")), "{} -> {}", record.id, name);
            }
        }
    }

    #[test]
    fn test_document_metadata() {
        let (catalog, config) = fixture();
        let ctx = ExportContext::new(&catalog, &config);
        let doc = document_export(&ctx, "tableflip").unwrap();
        assert_eq!(doc.file_name, "table flip_kaomoji.html");
        assert_eq!(doc.mime, "text/html");
        assert!(doc.html.contains("<title>Table Flip - Animated Kaomoji</title>"));
        assert!(doc.html.contains(DOCUMENT_BACKGROUND));
        assert!(doc.html.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn test_document_shows_sticker_on_gradient() {
        let (catalog, config) = fixture();
        let ctx = ExportContext::new(&catalog, &config);

        let doc = document_export(&ctx, "bear").unwrap();
        assert!(!doc.html.contains("container"));
        assert!(doc.html.contains("font-size: 4rem;"));
        assert!(doc.html.contains("color: white;"));
        assert!(doc.html.contains("text-shadow: 2px 2px 4px rgba(0, 0, 0, 0.3);"));
        assert!(doc.html.contains("<body>\n    <div class=\"kaomoji bear\">"));
        assert!(!doc.html.contains("gap: 0;"));

        // page overrides come after the shared stylesheet
        let base = doc.html.find("font-size: 3rem;").unwrap();
        let page = doc.html.find("font-size: 4rem;").unwrap();
        assert!(base < page);

        let doc = document_export(&ctx, "shrug").unwrap();
        assert!(doc.html.contains("white-space: nowrap;\n            display: flex;"));
    }

    #[test]
    fn test_document_escapes_name() {
        let mut catalog = Catalog::bundled();
        catalog
            .add(StickerRecord::new("evil", "(<_<)", "<script>", "bounce"))
            .unwrap();
        let config = ExportConfig::default();
        let doc = document_export(&ExportContext::new(&catalog, &config), "evil").unwrap();
        assert!(!doc.html.contains("<script>"));
        assert!(doc.html.contains("&lt;script&gt; - Animated Kaomoji"));
        assert!(doc.html.contains("(&lt;_&lt;)"));
    }

    #[test]
    fn test_code_export_text() {
        let (catalog, config) = fixture();
        let ctx = ExportContext::new(&catalog, &config);
        let code = code_export(&ctx, "love").unwrap();
        let text = code.text();
        assert!(text.starts_with("HTML:\n<div class=\"kaomoji love\">"));
        assert!(text.contains("\n\nCSS:\n.kaomoji {"));
        assert!(text.contains("@keyframes loveHearts"));
        assert!(code.markup.contains("<span class=\"love-left-heart\">♥</span>"));
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let (catalog, config) = fixture();
        let ctx = ExportContext::new(&catalog, &config).with_rasterizer(&BoxRasterizer);
        assert!(document_export(&ctx, "unicorn").is_none());
        assert!(code_export(&ctx, "unicorn").is_none());
        assert!(image_export(&ctx, "unicorn").is_none());
    }

    #[test]
    fn test_image_export() {
        let (catalog, config) = fixture();
        let ctx = ExportContext::new(&catalog, &config).with_rasterizer(&BoxRasterizer);
        let gif = image_export(&ctx, "bear").unwrap().unwrap();
        assert_eq!(gif.file_name, "bear_kaomoji.gif");
        assert_eq!(gif.frame_count, 30);
    }

    #[test]
    fn test_image_export_without_rasterizer_fails() {
        let (catalog, config) = fixture();
        let ctx = ExportContext::new(&catalog, &config);
        let err = image_export(&ctx, "bear").unwrap().unwrap_err();
        assert!(matches!(err, ExportError::Render(RenderError::NoFont)));
    }

    #[test]
    fn test_indent_skips_blank_lines() {
        assert_eq!(indent("a\n\nb", "  "), "  a\n\n  b");
    }
}
