//! Error types shared across the crate.

use thiserror::Error;

/// Message shown in the export modal when an image export fails.
pub const IMAGE_EXPORT_FAILED_MESSAGE: &str =
    "Failed to create GIF. Try the HTML or Code export instead.";

/// Errors raised while reading a sticker catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The document is not valid JSON or a record has the wrong shape
    #[error("Malformed catalog document: {0}")]
    Json(#[from] serde_json::Error),

    /// The document has no `kaomoji` list
    #[error("Catalog document has no `kaomoji` field")]
    MissingField,

    /// A record has an empty id
    #[error("Sticker at position {0} has an empty id")]
    EmptyId(usize),

    /// Two records share an id
    #[error("Duplicate sticker id: {0}")]
    DuplicateId(String),

    /// The catalog source could not be read
    #[error("Failed to read catalog: {0}")]
    Source(String),
}

/// Errors raised while rasterizing text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// No font is available to the rasterizer
    #[error("No font available for rendering")]
    NoFont,

    /// Font data could not be parsed
    #[error("Invalid font data: {0}")]
    InvalidFont(String),

    /// Nothing to draw
    #[error("Cannot render empty text")]
    EmptyText,

    /// Canvas dimensions are zero
    #[error("Invalid canvas size: {width}x{height}")]
    InvalidCanvas { width: u32, height: u32 },
}

/// Errors raised by the image export pipeline.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The sticker's card is not present in the rendered gallery
    #[error("No rendered sticker found for id {0}")]
    TargetMissing(String),

    /// Frame rendering failed
    #[error("Frame rendering failed: {0}")]
    Render(#[from] RenderError),

    /// GIF encoding failed
    #[error("GIF encoding failed: {0}")]
    Encode(String),

    /// The export was cancelled before every frame was recorded
    #[error("Export cancelled")]
    Cancelled,
}

impl ExportError {
    /// The message surfaced to the user in the export modal.
    pub fn user_message(&self) -> &'static str {
        IMAGE_EXPORT_FAILED_MESSAGE
    }
}

impl From<image::ImageError> for ExportError {
    fn from(err: image::ImageError) -> Self {
        ExportError::Encode(err.to_string())
    }
}

/// Errors raised by clipboard backends.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    /// Neither the clipboard API nor the legacy copy command is available
    #[error("Clipboard unavailable")]
    Unavailable,

    /// The platform refused the write
    #[error("Clipboard write rejected: {0}")]
    Rejected(String),
}

/// Errors raised while reading export configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// TOML syntax or shape error
    #[cfg(feature = "toml")]
    #[error("Invalid export config: {0}")]
    Toml(#[from] toml::de::Error),

    /// A font file listed in the config could not be read
    #[error("Failed to read font {path}: {source}")]
    FontIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_errors_share_one_user_message() {
        let missing = ExportError::TargetMissing("shrug".into());
        let render = ExportError::from(RenderError::NoFont);
        assert_eq!(missing.user_message(), IMAGE_EXPORT_FAILED_MESSAGE);
        assert_eq!(render.user_message(), IMAGE_EXPORT_FAILED_MESSAGE);
    }

    #[test]
    fn display_includes_detail() {
        let err = CatalogError::DuplicateId("wink".into());
        assert_eq!(err.to_string(), "Duplicate sticker id: wink");

        let err = RenderError::InvalidCanvas { width: 0, height: 100 };
        assert_eq!(err.to_string(), "Invalid canvas size: 0x100");
    }
}
