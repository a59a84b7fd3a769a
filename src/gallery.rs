//! Gallery controller.
//!
//! Owns the catalog and the view state of the sticker grid: rendered cards,
//! hovered stickers, the copy toast and the export modal. The host feeds it
//! input events with a millisecond timestamp and draws what it reports.

use std::collections::HashSet;
use std::rc::Rc;

use crate::clipboard::{copy_to_clipboard, ClipboardBackend};
use crate::composition::{compose, escape_html, sticker_markup, MarkupOptions};
use crate::config::ExportConfig;
use crate::data::{Catalog, StickerRecord};
use crate::error::{CatalogError, ExportError};
use crate::export::{code_export, document_export, CodeExport, DocumentExport, ExportContext};
use crate::loader::LoadedCatalog;
use crate::render::GlyphRasterizer;
use crate::sampler::{AnimatedImage, CancelToken, FrameSampler};
use crate::style::{animation_css, animation_durations, base_css, style_for, DurationChange};

/// Delay before the toast starts fading in.
pub const TOAST_ENTER_MS: u64 = 10;
/// Time from creation until the toast starts fading out.
pub const TOAST_VISIBLE_MS: u64 = 2000;
/// Fade-out duration.
pub const TOAST_LEAVE_MS: u64 = 300;
/// How long the code copy button reads "Copied!".
pub const COPY_FLAG_MS: u64 = 2000;

/// Rendered sticker card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Card {
    pub id: String,
    pub symbol: String,
    pub html: String,
}

impl Card {
    fn new(record: &StickerRecord) -> Self {
        let markup = sticker_markup(record, &compose(record), MarkupOptions { data_symbol: true });
        let id = escape_html(&record.id);
        let html = format!(
            r#"<div class="sticker-card" data-kaomoji-id="{id}">
    {markup}
    <div class="sticker-name">{name}</div>
    <div class="sticker-description">{description}</div>
    <div class="export-controls">
        <button class="export-btn gif-export" data-action="gif" data-id="{id}">GIF</button>
        <button class="export-btn html-export" data-action="html" data-id="{id}">HTML</button>
        <button class="export-btn code-export" data-action="code" data-id="{id}">Code</button>
    </div>
</div>"#,
            markup = markup.replace('\n', "\n    "),
            name = escape_html(&record.name),
            description = escape_html(&record.description),
        );
        Self {
            id: record.id.clone(),
            symbol: record.symbol.clone(),
            html,
        }
    }
}

/// Visibility phase of the copy toast.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastPhase {
    Entering,
    Visible,
    Leaving,
    Gone,
}

/// Transient "Copied: ..." notice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub shown_at: u64,
}

impl Toast {
    pub fn phase(&self, now: u64) -> ToastPhase {
        let elapsed = now.saturating_sub(self.shown_at);
        if elapsed < TOAST_ENTER_MS {
            ToastPhase::Entering
        } else if elapsed < TOAST_VISIBLE_MS {
            ToastPhase::Visible
        } else if elapsed < TOAST_VISIBLE_MS + TOAST_LEAVE_MS {
            ToastPhase::Leaving
        } else {
            ToastPhase::Gone
        }
    }
}

/// Export action offered on every card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportKind {
    Gif,
    Html,
    Code,
}

impl ExportKind {
    /// Parse a card button's `data-action` value.
    pub fn from_action(action: &str) -> Option<Self> {
        match action {
            "gif" => Some(ExportKind::Gif),
            "html" => Some(ExportKind::Html),
            "code" => Some(ExportKind::Code),
            _ => None,
        }
    }
}

/// Body of the export modal.
#[derive(Clone, Debug)]
pub enum ModalContent {
    Document(DocumentExport),
    Code {
        export: CodeExport,
        /// When the code was last copied
        copied_at: Option<u64>,
    },
    /// Image export in flight
    Pending { id: String, cancel: CancelToken },
    Image(AnimatedImage),
    /// Image export failed; holds the user-facing message
    Failed(String),
}

/// The export modal.
#[derive(Clone, Debug)]
pub struct Modal {
    pub title: String,
    pub content: ModalContent,
    /// Object URL the host created for an image preview
    pub preview_url: Option<String>,
}

impl Modal {
    fn new(title: String, content: ModalContent) -> Self {
        Self {
            title,
            content,
            preview_url: None,
        }
    }

    /// Label of the code copy button at `now`.
    pub fn copy_label(&self, now: u64) -> &'static str {
        match &self.content {
            ModalContent::Code {
                copied_at: Some(at),
                ..
            } if now.saturating_sub(*at) < COPY_FLAG_MS => "Copied!",
            _ => "Copy to Clipboard",
        }
    }

    /// Inner markup of the modal body.
    pub fn body_html(&self) -> String {
        match &self.content {
            ModalContent::Document(doc) => format!(
                "<textarea readonly>{}</textarea>\n<button class=\"download-btn\" data-action=\"download\">Download HTML File</button>",
                escape_html(&doc.html)
            ),
            ModalContent::Code { export, .. } => format!(
                "<textarea readonly>{}</textarea>\n<button class=\"download-btn\" data-action=\"copy\">Copy to Clipboard</button>",
                escape_html(&export.text())
            ),
            ModalContent::Pending { .. } => {
                "<p>Creating animated GIF... <span class=\"loading-indicator\"></span></p>".to_string()
            }
            ModalContent::Image(image) => {
                let src = self.preview_url.as_deref().unwrap_or("");
                format!(
                    "<p><img src=\"{}\" alt=\"{}\" width=\"{}\" height=\"{}\"></p>\n<button class=\"download-btn\" data-action=\"download\">Download GIF</button>",
                    escape_html(src),
                    escape_html(&image.file_name),
                    image.width,
                    image.height
                )
            }
            ModalContent::Failed(message) => format!(
                "<p class=\"export-error\">⚠️ {}</p>\n<button class=\"download-btn\" data-action=\"close\">Close</button>",
                escape_html(message)
            ),
        }
    }
}

/// Result of a key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// Reload the page
    Reload,
    /// The export modal was closed
    CloseModal,
    /// Nothing to do
    Ignored,
}

/// Subset of stickers shown in the grid.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Filter {
    #[default]
    All,
    Category(String),
    Tag(String),
}

/// A started image export.
///
/// Self-contained so the host can run it, paced or not, while still handing
/// input events to the gallery. Report the outcome with
/// [`Gallery::complete_image_export`].
#[derive(Clone)]
pub struct ImageExportJob {
    pub record: StickerRecord,
    pub cancel: CancelToken,
    config: ExportConfig,
    rasterizer: Option<Rc<dyn GlyphRasterizer>>,
}

impl ImageExportJob {
    fn sampler(&self) -> Result<FrameSampler<'_>, ExportError> {
        let rasterizer = self
            .rasterizer
            .as_deref()
            .ok_or(crate::error::RenderError::NoFont)?;
        Ok(FrameSampler::new(self.config.clone(), rasterizer))
    }

    /// Render every frame synchronously.
    pub fn run(&self) -> Result<AnimatedImage, ExportError> {
        if self.cancel.is_cancelled() {
            return Err(ExportError::Cancelled);
        }
        self.sampler()?.export_animation(&self.record)
    }

    /// Render one frame per `yield_fn()` so the host stays responsive.
    pub async fn run_paced<Y, YFut>(&self, yield_fn: Y) -> Result<AnimatedImage, ExportError>
    where
        Y: Fn() -> YFut,
        YFut: std::future::Future<Output = ()>,
    {
        self.sampler()?
            .export_animation_paced(&self.record, &self.cancel, yield_fn)
            .await
    }
}

/// The sticker gallery.
pub struct Gallery {
    catalog: Catalog,
    config: ExportConfig,
    rasterizer: Option<Rc<dyn GlyphRasterizer>>,
    filter: Filter,
    cards: Vec<Card>,
    hovered: HashSet<String>,
    toast: Option<Toast>,
    modal: Option<Modal>,
}

impl Gallery {
    /// Create a gallery and render every sticker.
    pub fn new(catalog: Catalog, config: ExportConfig) -> Self {
        let mut gallery = Self {
            catalog,
            config,
            rasterizer: None,
            filter: Filter::All,
            cards: Vec::new(),
            hovered: HashSet::new(),
            toast: None,
            modal: None,
        };
        gallery.render();
        gallery
    }

    /// Create a gallery from a startup load.
    pub fn from_loaded(loaded: LoadedCatalog, config: ExportConfig) -> Self {
        Self::new(loaded.catalog, config)
    }

    /// Enable image export with the given glyph source.
    pub fn with_rasterizer(mut self, rasterizer: Rc<dyn GlyphRasterizer>) -> Self {
        self.rasterizer = Some(rasterizer);
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    pub fn modal_mut(&mut self) -> Option<&mut Modal> {
        self.modal.as_mut()
    }

    /// Export context over the gallery's catalog.
    pub fn export_context(&self) -> ExportContext<'_> {
        ExportContext {
            catalog: &self.catalog,
            config: &self.config,
            rasterizer: self.rasterizer.as_deref(),
        }
    }

    /// Rebuild the cards for the current filter.
    pub fn render(&mut self) -> &[Card] {
        let records: Vec<&StickerRecord> = match &self.filter {
            Filter::All => self.catalog.iter().collect(),
            Filter::Category(category) => self.catalog.filter_by_category(category).collect(),
            Filter::Tag(tag) => self.catalog.filter_by_tag(tag).collect(),
        };
        self.cards = records.into_iter().map(Card::new).collect();
        self.hovered.retain(|id| self.cards.iter().any(|c| c.id == *id));
        log::debug!("rendered {} of {} stickers", self.cards.len(), self.catalog.len());
        &self.cards
    }

    fn is_rendered(&self, id: &str) -> bool {
        self.cards.iter().any(|c| c.id == id)
    }

    /// Markup of the sticker grid.
    pub fn grid_html(&self) -> String {
        let cards: Vec<String> = self
            .cards
            .iter()
            .map(|c| {
                c.html
                    .lines()
                    .map(|l| format!("    {l}"))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .collect();
        format!("<div class=\"sticker-grid\">\n{}\n</div>", cards.join("\n"))
    }

    /// Stylesheet for every rendered card.
    pub fn page_css(&self) -> String {
        let mut blocks: Vec<String> = vec![base_css().to_string()];
        for card in &self.cards {
            let Some(record) = self.catalog.get(&card.id) else {
                continue;
            };
            let css = animation_css(&compose(record), &record.animation_id, style_for(&record.animation_id));
            if !css.is_empty() && !blocks.contains(&css) {
                blocks.push(css);
            }
        }
        blocks.join("\n\n")
    }

    /// Complete static page: grid plus stylesheet.
    pub fn render_page(&self) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Kaomoji Stickers</title>
    <style>
{css}
    </style>
</head>
<body>
{grid}
</body>
</html>
"#,
            css = self.page_css(),
            grid = self.grid_html(),
        )
    }

    /// Change the filter and re-render.
    pub fn filter(&mut self, filter: Filter) -> &[Card] {
        self.filter = filter;
        self.render()
    }

    /// Append a sticker and re-render.
    pub fn add_sticker(&mut self, record: StickerRecord) -> Result<(), CatalogError> {
        self.catalog.add(record)?;
        self.render();
        Ok(())
    }

    /// Copy the symbol of a clicked card and show the toast.
    ///
    /// Returns `false` if no card with that id is rendered. A failed copy is
    /// logged by the clipboard layer and still shows the toast.
    pub fn click_card(&mut self, id: &str, clipboard: &mut dyn ClipboardBackend, now: u64) -> bool {
        let Some(symbol) = self.cards.iter().find(|c| c.id == id).map(|c| c.symbol.clone()) else {
            return false;
        };
        copy_to_clipboard(clipboard, &symbol);
        self.toast = Some(Toast {
            message: format!("Copied: {symbol}"),
            shown_at: now,
        });
        true
    }

    /// The toast and its phase at `now`, if it is still on screen.
    pub fn toast(&mut self, now: u64) -> Option<(&Toast, ToastPhase)> {
        if self
            .toast
            .as_ref()
            .is_some_and(|t| t.phase(now) == ToastPhase::Gone)
        {
            self.toast = None;
        }
        self.toast.as_ref().map(|t| (t, t.phase(now)))
    }

    /// Pointer entered a sticker: hover durations to apply.
    pub fn pointer_enter(&mut self, id: &str) -> Vec<DurationChange> {
        if !self.is_rendered(id) {
            return Vec::new();
        }
        self.hovered.insert(id.to_string());
        self.durations(id, true)
    }

    /// Pointer left a sticker: base durations to restore.
    pub fn pointer_leave(&mut self, id: &str) -> Vec<DurationChange> {
        if !self.hovered.remove(id) {
            return Vec::new();
        }
        self.durations(id, false)
    }

    pub fn is_hovered(&self, id: &str) -> bool {
        self.hovered.contains(id)
    }

    fn durations(&self, id: &str, hovered: bool) -> Vec<DurationChange> {
        match self.catalog.get(id) {
            Some(record) => animation_durations(&compose(record), style_for(&record.animation_id), hovered),
            None => Vec::new(),
        }
    }

    /// Run a card's export button.
    ///
    /// Document and code exports open the modal directly. Image export opens
    /// it in a pending state and returns the job to run. Unknown ids do nothing.
    pub fn export(&mut self, kind: ExportKind, id: &str) -> Option<ImageExportJob> {
        match kind {
            ExportKind::Html => {
                self.open_document_export(id);
                None
            }
            ExportKind::Code => {
                self.open_code_export(id);
                None
            }
            ExportKind::Gif => self.begin_image_export(id),
        }
    }

    /// Open the modal with the standalone document. Returns `false` for an unknown id.
    pub fn open_document_export(&mut self, id: &str) -> bool {
        let Some(doc) = document_export(&self.export_context(), id) else {
            return false;
        };
        let title = self.title_for(id, "as HTML");
        self.replace_modal(Modal::new(title, ModalContent::Document(doc)));
        true
    }

    /// Open the modal with copyable code. Returns `false` for an unknown id.
    pub fn open_code_export(&mut self, id: &str) -> bool {
        let Some(export) = code_export(&self.export_context(), id) else {
            return false;
        };
        let title = self.title_for(id, "Code");
        self.replace_modal(Modal::new(title, ModalContent::Code { export, copied_at: None }));
        true
    }

    /// Open the modal for an image export.
    ///
    /// Returns the job to run, or `None` if the id is unknown or the export
    /// failed up front (the modal then shows the failure).
    pub fn begin_image_export(&mut self, id: &str) -> Option<ImageExportJob> {
        let record = self.catalog.get(id)?.clone();
        let title = self.title_for(id, "as GIF");

        if !self.is_rendered(id) {
            let err = ExportError::TargetMissing(id.to_string());
            log::error!("GIF export failed: {err}");
            self.replace_modal(Modal::new(title, ModalContent::Failed(err.user_message().to_string())));
            return None;
        }

        let cancel = CancelToken::new();
        self.replace_modal(Modal::new(
            title,
            ModalContent::Pending {
                id: id.to_string(),
                cancel: cancel.clone(),
            },
        ));
        Some(ImageExportJob {
            record,
            cancel,
            config: self.config.clone(),
            rasterizer: self.rasterizer.clone(),
        })
    }

    /// Show the outcome of an image export.
    ///
    /// Returns `false` and discards the result if the job was cancelled or
    /// its modal is no longer open.
    pub fn complete_image_export(&mut self, job: &ImageExportJob, result: Result<AnimatedImage, ExportError>) -> bool {
        if job.cancel.is_cancelled() {
            return false;
        }
        let Some(modal) = self.modal.as_mut() else {
            return false;
        };
        match &modal.content {
            ModalContent::Pending { id, .. } if *id == job.record.id => {}
            _ => return false,
        }
        modal.content = match result {
            Ok(image) => ModalContent::Image(image),
            Err(ExportError::Cancelled) => return false,
            Err(e) => {
                log::error!("GIF export failed: {e}");
                ModalContent::Failed(e.user_message().to_string())
            }
        };
        true
    }

    /// Start, run and complete an image export synchronously.
    pub fn export_image(&mut self, id: &str) -> bool {
        let Some(job) = self.begin_image_export(id) else {
            return false;
        };
        let result = job.run();
        self.complete_image_export(&job, result)
    }

    /// Copy the code shown in the modal.
    pub fn copy_code(&mut self, clipboard: &mut dyn ClipboardBackend, now: u64) -> bool {
        let Some(Modal {
            content: ModalContent::Code { export, copied_at },
            ..
        }) = self.modal.as_mut()
        else {
            return false;
        };
        if copy_to_clipboard(clipboard, &export.text()) {
            *copied_at = Some(now);
            true
        } else {
            false
        }
    }

    /// Close the modal, cancelling an in-flight image export.
    ///
    /// Returns the closed modal so the host can release its preview URL.
    pub fn close_modal(&mut self) -> Option<Modal> {
        let modal = self.modal.take()?;
        if let ModalContent::Pending { cancel, .. } = &modal.content {
            cancel.cancel();
        }
        Some(modal)
    }

    /// Click on the modal backdrop.
    pub fn backdrop_click(&mut self) -> Option<Modal> {
        self.close_modal()
    }

    /// Global key bindings.
    pub fn handle_key(&mut self, key: &str, ctrl: bool, meta: bool) -> KeyAction {
        match key {
            "r" if !ctrl && !meta => KeyAction::Reload,
            "Escape" => match self.close_modal() {
                Some(_) => KeyAction::CloseModal,
                None => KeyAction::Ignored,
            },
            _ => KeyAction::Ignored,
        }
    }

    fn replace_modal(&mut self, modal: Modal) {
        self.close_modal();
        self.modal = Some(modal);
    }

    fn title_for(&self, id: &str, suffix: &str) -> String {
        let name = self.catalog.get(id).map(|r| r.name.as_str()).unwrap_or(id);
        format!("Export {name} {suffix}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::render::tests::BoxRasterizer;
    use crate::style::AnimatedTarget;

    fn gallery() -> Gallery {
        Gallery::new(Catalog::bundled(), ExportConfig::default()).with_rasterizer(Rc::new(BoxRasterizer))
    }

    #[test]
    fn test_renders_every_card() {
        let gallery = gallery();
        assert_eq!(gallery.cards().len(), 14);
        let grid = gallery.grid_html();
        assert_eq!(grid.matches("class=\"sticker-card\"").count(), 14);
        assert!(grid.contains("data-symbol=\"(♥‿♥)\""));
        assert!(grid.contains("<div class=\"sticker-name\">Table Flip</div>"));
    }

    #[test]
    fn test_click_copies_once_and_toast_expires() {
        let mut gallery = gallery();
        let mut clipboard = MemoryClipboard::new();
        assert!(gallery.click_card("love", &mut clipboard, 1_000));
        assert_eq!(clipboard.writes, vec!["(♥‿♥)".to_string()]);

        let (toast, phase) = gallery.toast(1_000).unwrap();
        assert_eq!(toast.message, "Copied: (♥‿♥)");
        assert_eq!(phase, ToastPhase::Entering);
        assert_eq!(gallery.toast(1_500).unwrap().1, ToastPhase::Visible);
        assert_eq!(gallery.toast(3_100).unwrap().1, ToastPhase::Leaving);
        assert!(gallery.toast(3_300).is_none());
        assert_eq!(clipboard.writes.len(), 1);
    }

    #[test]
    fn test_click_unknown_card() {
        let mut gallery = gallery();
        let mut clipboard = MemoryClipboard::new();
        assert!(!gallery.click_card("unicorn", &mut clipboard, 0));
        assert!(clipboard.writes.is_empty());
        assert!(gallery.toast(0).is_none());
    }

    #[test]
    fn test_new_click_replaces_toast() {
        let mut gallery = gallery();
        let mut clipboard = MemoryClipboard::new();
        gallery.click_card("love", &mut clipboard, 0);
        gallery.click_card("bear", &mut clipboard, 1_900);
        let (toast, phase) = gallery.toast(2_100).unwrap();
        assert_eq!(toast.message, "Copied: ʕ•ᴥ•ʔ");
        assert_eq!(phase, ToastPhase::Visible);
    }

    #[test]
    fn test_hover_durations() {
        let mut gallery = gallery();
        let enter = gallery.pointer_enter("happy");
        assert_eq!(
            enter,
            vec![DurationChange {
                target: AnimatedTarget::Element,
                duration_ms: 800
            }]
        );
        assert!(gallery.is_hovered("happy"));
        assert_eq!(gallery.pointer_leave("happy")[0].duration_ms, 1500);
        assert!(gallery.pointer_leave("happy").is_empty());
    }

    #[test]
    fn test_hover_composite_skips_static_parts() {
        let mut gallery = gallery();
        let changes = gallery.pointer_enter("crying");
        let classes: Vec<_> = changes
            .iter()
            .map(|c| match &c.target {
                AnimatedTarget::Part { class, .. } => class.as_str(),
                AnimatedTarget::Element => "element",
            })
            .collect();
        assert_eq!(classes, vec!["cry-left-tear", "cry-right-tear"]);
        assert!(changes.iter().all(|c| c.duration_ms == 1500));
    }

    #[test]
    fn test_filter_and_reset() {
        let mut gallery = gallery();
        let party: Vec<_> = gallery
            .filter(Filter::Tag("party".into()))
            .iter()
            .map(|c| c.id.clone())
            .collect();
        assert_eq!(party, vec!["celebrate", "dance"]);
        assert_eq!(gallery.filter(Filter::Category("animals".into())).len(), 1);
        assert_eq!(gallery.filter(Filter::All).len(), 14);
    }

    #[test]
    fn test_filter_keeps_order_and_drops_hidden_hovers() {
        let mut gallery = gallery();
        gallery.pointer_enter("bear");
        gallery.pointer_enter("dance");

        let mut owl = StickerRecord::new("owl", "(⊙ˍ⊙)", "Owl", "pulse");
        owl.category = "animals".into();
        gallery.add_sticker(owl).unwrap();

        let animals: Vec<_> = gallery
            .filter(Filter::Category("animals".into()))
            .iter()
            .map(|c| c.id.clone())
            .collect();
        assert_eq!(animals, vec!["bear", "owl"]);
        assert!(gallery.is_hovered("bear"));
        assert!(!gallery.is_hovered("dance"));
    }

    #[test]
    fn test_add_sticker_rerenders() {
        let mut gallery = gallery();
        gallery
            .add_sticker(StickerRecord::new("owl", "(⊙ˍ⊙)", "Owl", "pulse"))
            .unwrap();
        assert_eq!(gallery.cards().len(), 15);
        assert_eq!(gallery.cards()[14].id, "owl");
        assert!(matches!(
            gallery.add_sticker(StickerRecord::new("owl", "x", "Owl", "pulse")),
            Err(CatalogError::DuplicateId(_))
        ));
    }

    #[test]
    fn test_document_and_code_modals() {
        let mut gallery = gallery();
        assert!(gallery.export(ExportKind::Html, "wink").is_none());
        let modal = gallery.modal().unwrap();
        assert_eq!(modal.title, "Export Wink as HTML");
        assert!(matches!(modal.content, ModalContent::Document(_)));

        gallery.export(ExportKind::Code, "wink");
        let modal = gallery.modal().unwrap();
        assert_eq!(modal.title, "Export Wink Code");
        assert!(modal.body_html().contains("HTML:\n&lt;div class=&quot;kaomoji wink&quot;&gt;"));
    }

    #[test]
    fn test_unknown_export_opens_nothing() {
        let mut gallery = gallery();
        for kind in [ExportKind::Gif, ExportKind::Html, ExportKind::Code] {
            assert!(gallery.export(kind, "unicorn").is_none());
            assert!(gallery.modal().is_none());
        }
    }

    #[test]
    fn test_code_copy_flag() {
        let mut gallery = gallery();
        let mut clipboard = MemoryClipboard::new();
        assert!(!gallery.copy_code(&mut clipboard, 0));

        gallery.open_code_export("bear");
        assert!(gallery.copy_code(&mut clipboard, 500));
        assert!(clipboard.writes[0].starts_with("HTML:\n"));
        let modal = gallery.modal().unwrap();
        assert_eq!(modal.copy_label(1_000), "Copied!");
        assert_eq!(modal.copy_label(2_500), "Copy to Clipboard");
    }

    #[test]
    fn test_image_export_completes() {
        let mut gallery = gallery();
        assert!(gallery.export_image("happy"));
        match &gallery.modal().unwrap().content {
            ModalContent::Image(image) => {
                assert_eq!(image.frame_count, 30);
                assert_eq!(image.file_name, "happy_kaomoji.gif");
            }
            other => panic!("unexpected modal {other:?}"),
        }
    }

    #[test]
    fn test_image_export_of_filtered_out_sticker_fails() {
        let mut gallery = gallery();
        gallery.filter(Filter::Category("animals".into()));
        assert!(gallery.begin_image_export("happy").is_none());
        match &gallery.modal().unwrap().content {
            ModalContent::Failed(message) => {
                assert_eq!(message, crate::error::IMAGE_EXPORT_FAILED_MESSAGE)
            }
            other => panic!("unexpected modal {other:?}"),
        }
    }

    #[test]
    fn test_image_export_without_rasterizer_fails() {
        let mut gallery = Gallery::new(Catalog::bundled(), ExportConfig::default());
        assert!(gallery.export_image("happy"));
        assert!(matches!(gallery.modal().unwrap().content, ModalContent::Failed(_)));
    }

    #[test]
    fn test_closing_modal_cancels_export() {
        let mut gallery = gallery();
        let job = gallery.export(ExportKind::Gif, "love").unwrap();
        assert!(matches!(gallery.modal().unwrap().content, ModalContent::Pending { .. }));

        assert_eq!(gallery.handle_key("Escape", false, false), KeyAction::CloseModal);
        assert!(job.cancel.is_cancelled());
        assert!(matches!(job.run(), Err(ExportError::Cancelled)));

        let late = FrameSampler::new(ExportConfig::default(), &BoxRasterizer).export_animation(&job.record);
        assert!(!gallery.complete_image_export(&job, late));
        assert!(gallery.modal().is_none());
    }

    #[test]
    fn test_stale_job_does_not_replace_newer_modal() {
        let mut gallery = gallery();
        let job = gallery.begin_image_export("love").unwrap();
        gallery.open_document_export("bear");
        let result = job.run();
        assert!(!gallery.complete_image_export(&job, result));
        assert!(matches!(gallery.modal().unwrap().content, ModalContent::Document(_)));
    }

    #[tokio::test]
    async fn test_paced_export_job() {
        let mut gallery = gallery();
        let job = gallery.begin_image_export("wink").unwrap();
        let result = job.run_paced(|| async {}).await;
        assert!(gallery.complete_image_export(&job, result));
        assert!(matches!(gallery.modal().unwrap().content, ModalContent::Image(_)));
    }

    #[test]
    fn test_key_bindings() {
        let mut gallery = gallery();
        assert_eq!(gallery.handle_key("r", false, false), KeyAction::Reload);
        assert_eq!(gallery.handle_key("r", true, false), KeyAction::Ignored);
        assert_eq!(gallery.handle_key("r", false, true), KeyAction::Ignored);
        assert_eq!(gallery.handle_key("Escape", false, false), KeyAction::Ignored);
        assert_eq!(gallery.handle_key("x", false, false), KeyAction::Ignored);

        gallery.open_document_export("bear");
        assert!(gallery.backdrop_click().is_some());
        assert!(gallery.modal().is_none());
    }

    #[test]
    fn test_render_page_includes_styles() {
        let page = gallery().render_page();
        assert!(page.contains(".kaomoji {"));
        for style in crate::style::registered_styles() {
            for name in style.keyframe_names() {
                assert!(page.contains(&format!("@keyframes {name} ")), "{name}");
            }
        }
    }

    #[test]
    fn test_export_kind_from_action() {
        assert_eq!(ExportKind::from_action("gif"), Some(ExportKind::Gif));
        assert_eq!(ExportKind::from_action("pdf"), None);
    }
}
