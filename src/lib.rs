//! # kaomoji-core-view
//!
//! Core library for an animated kaomoji sticker gallery.
//!
//! This crate provides platform-agnostic data structures and logic for:
//! - Loading the sticker catalog (with a built-in fallback)
//! - Splitting stickers into independently animated sub-parts
//! - Resolving animation styles and emitting their CSS keyframes
//! - Sampling one animation cycle into frames and encoding a looping GIF
//! - Exporting stickers as standalone HTML, copyable code or GIF
//! - Driving the gallery view: cards, copy toast, hover speed-up, export modal
//!
//! ## Features
//!
//! - `toml` - Read [`ExportConfig`] from TOML
//! - `web` - Canvas rendering, `fetch` catalog loading, clipboard and downloads for WASM
//!
//! ## Example
//!
//! ```rust
//! use kaomoji_core_view::{Catalog, ExportConfig, Gallery};
//! use kaomoji_core_view::clipboard::MemoryClipboard;
//!
//! let mut gallery = Gallery::new(Catalog::bundled(), ExportConfig::default());
//! let mut clipboard = MemoryClipboard::new();
//!
//! // Click a card: the symbol is copied and a toast appears
//! gallery.click_card("love", &mut clipboard, 0);
//! assert_eq!(clipboard.contents.as_deref(), Some("(♥‿♥)"));
//!
//! // Open the HTML export for a sticker
//! gallery.open_document_export("shrug");
//! assert!(gallery.modal().is_some());
//! ```

pub mod clipboard;
mod color;
pub mod composition;
mod config;
mod data;
pub mod error;
pub mod export;
pub mod gallery;
pub mod loader;
mod parser;
pub mod render;
pub mod sampler;
mod sizing;
pub mod style;

pub use color::{Palette, Rgb};
pub use composition::{compose, Composition, SubPart};
pub use config::ExportConfig;
pub use data::{Catalog, StickerRecord};
pub use error::{CatalogError, ClipboardError, ConfigError, ExportError, RenderError};
pub use gallery::Gallery;
pub use loader::{load_catalog, CatalogProvider, LoadedCatalog};
pub use parser::{parse_catalog, parse_catalog_bytes};
pub use render::{FontRasterizer, GlyphRasterizer, RenderConfig, RenderResult};
pub use sampler::{AnimatedImage, FrameSampler, SamplingSession};
pub use sizing::FontSizing;
pub use style::{style_for, AnimationStyle, TransformState};

#[cfg(feature = "web")]
pub use render::web::render_to_canvas;
