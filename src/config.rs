//! Export settings: canvas size, palette, font and frame count.
//!
//! Read from TOML with the `toml` feature.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::color::Palette;
use crate::error::ConfigError;

/// Number of frames sampled per animation cycle.
pub const DEFAULT_FRAME_COUNT: usize = 30;

/// Settings for the image export pipeline.
///
/// Every field has a default matching the gallery's GIF export, so a config
/// file only needs to list what it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Canvas width in pixels
    pub canvas_width: u32,
    /// Canvas height in pixels
    pub canvas_height: u32,
    /// Preferred font size in pixels
    pub font_size: f32,
    /// CSS font stack used by canvas backends
    pub font_family: String,
    /// Frames sampled per cycle
    pub frame_count: usize,
    pub background: String,
    pub foreground: String,
    /// GIF encoder speed, 1 (best) to 30 (fastest)
    pub gif_speed: i32,
    /// Apply the sampled transform to each frame instead of drawing flat text
    pub apply_motion: bool,
    /// Shrink the font so wide symbols fit the canvas
    pub fit_text: bool,
    /// Font files for the native rasterizer, tried in order per glyph
    pub font_paths: Vec<PathBuf>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            canvas_width: 200,
            canvas_height: 100,
            font_size: 48.0,
            font_family: "'Courier New', monospace".to_string(),
            frame_count: DEFAULT_FRAME_COUNT,
            background: "#FFFFFF".to_string(),
            foreground: "#000000".to_string(),
            gif_speed: 10,
            apply_motion: false,
            fit_text: true,
            font_paths: Vec::new(),
        }
    }
}

impl ExportConfig {
    /// Parse an export config from TOML text.
    #[cfg(feature = "toml")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Frame and background colors, falling back to black on white.
    pub fn palette(&self) -> Palette {
        Palette::from_strings(&self.foreground, &self.background)
    }

    /// Number of frames to sample; never zero.
    #[inline]
    pub fn sample_count(&self) -> usize {
        self.frame_count.max(1)
    }

    /// GIF encoder speed clamped to the encoder's accepted range.
    #[inline]
    pub fn encoder_speed(&self) -> i32 {
        self.gif_speed.clamp(1, 30)
    }

    /// Read every configured font file.
    pub fn read_fonts(&self) -> Result<Vec<Vec<u8>>, ConfigError> {
        self.font_paths
            .iter()
            .map(|path| {
                std::fs::read(path).map_err(|source| ConfigError::FontIo {
                    path: path.display().to_string(),
                    source,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;

    #[test]
    fn defaults_match_gallery_export() {
        let config = ExportConfig::default();
        assert_eq!((config.canvas_width, config.canvas_height), (200, 100));
        assert_eq!(config.sample_count(), 30);
        assert_eq!(config.palette().background, Rgb::WHITE);
        assert_eq!(config.palette().foreground, Rgb::BLACK);
        assert!(!config.apply_motion);
    }

    #[test]
    fn sample_count_never_zero() {
        let config = ExportConfig {
            frame_count: 0,
            ..Default::default()
        };
        assert_eq!(config.sample_count(), 1);
    }

    #[test]
    fn encoder_speed_clamped() {
        let config = ExportConfig {
            gif_speed: 99,
            ..Default::default()
        };
        assert_eq!(config.encoder_speed(), 30);
    }

    #[test]
    fn missing_font_file_reported() {
        let config = ExportConfig {
            font_paths: vec![PathBuf::from("/definitely/not/here.ttf")],
            ..Default::default()
        };
        let err = config.read_fonts().unwrap_err();
        assert!(matches!(err, ConfigError::FontIo { ref path, .. } if path.ends_with("here.ttf")));
    }

    #[test]
    fn json_partial_config() {
        let config: ExportConfig = serde_json::from_str(r#"{"frame_count": 12, "background": "pink"}"#).unwrap();
        assert_eq!(config.frame_count, 12);
        assert_eq!(config.palette().background, Rgb(255, 192, 203));
        assert_eq!(config.canvas_width, 200);
    }

    #[cfg(feature = "toml")]
    #[test]
    fn toml_config() {
        let config = ExportConfig::from_toml_str(
            "canvas_width = 320\napply_motion = true\nfont_paths = [\"fonts/NotoSansJP.ttf\"]\n",
        )
        .unwrap();
        assert_eq!(config.canvas_width, 320);
        assert!(config.apply_motion);
        assert_eq!(config.font_paths.len(), 1);
        assert_eq!(config.canvas_height, 100);
    }
}
