//! Rendering of sticker frames.
//!
//! A frame is described by platform-agnostic draw commands ([`RenderResult`]).
//! Two backends consume them: the native raster backend below, which
//! composites glyph coverage masks into an RGBA image, and the optional web
//! backend, which draws onto an HTML canvas.

use ab_glyph::{point, Font, FontArc, Glyph, GlyphId, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};

use crate::color::{Palette, Rgb};
use crate::config::ExportConfig;
use crate::error::RenderError;
use crate::sizing::{display_columns, FontSizing};
use crate::style::TransformState;

/// Configuration for rendering a frame.
#[derive(Clone, Debug)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Preferred font size in pixels
    pub font_size: f64,
    /// CSS font stack for canvas backends
    pub font_family: String,
    pub palette: Palette,
    /// Draw the sampled transform instead of flat text
    pub apply_motion: bool,
    /// Shrink the font so the text fits the canvas
    pub fit_text: bool,
    pub sizing: FontSizing,
}

impl RenderConfig {
    /// Derive a render config from export settings.
    pub fn from_export(config: &ExportConfig) -> Self {
        Self {
            width: config.canvas_width,
            height: config.canvas_height,
            font_size: f64::from(config.font_size),
            font_family: config.font_family.clone(),
            palette: config.palette(),
            apply_motion: config.apply_motion,
            fit_text: config.fit_text,
            sizing: FontSizing::default(),
        }
    }

    /// Reject zero-sized canvases.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidCanvas {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::from_export(&ExportConfig::default())
    }
}

/// Draw commands for one frame.
#[derive(Clone, Debug)]
pub struct RenderResult {
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Solid fill drawn before any text
    pub background: Rgb,
    /// Text batches to draw
    pub batches: Vec<TextBatch>,
}

/// A run of text drawn centered on a point.
#[derive(Clone, Debug)]
pub struct TextBatch {
    pub text: String,
    /// Center X in pixels
    pub x: f64,
    /// Center Y in pixels
    pub y: f64,
    pub font_size: f64,
    pub color: Rgb,
    /// Transform applied about the center
    pub transform: TransformState,
}

impl TextBatch {
    /// CSS font shorthand for this batch.
    pub fn font_css(&self, family: &str) -> String {
        format!("{:.2}px {}", self.font_size, family)
    }
}

/// Lay out one frame: background fill plus the symbol centered on the canvas.
///
/// Font fitting here is estimated from display columns; the raster backend
/// measures real glyphs instead.
///
/// ## Example
///
/// ```rust
/// use kaomoji_core_view::{RenderConfig, TransformState};
/// use kaomoji_core_view::render::layout_frame;
///
/// let result = layout_frame("(^_-)", TransformState::IDENTITY, &RenderConfig::default());
/// assert_eq!(result.batches.len(), 1);
/// assert_eq!((result.batches[0].x, result.batches[0].y), (100.0, 50.0));
/// ```
pub fn layout_frame(text: &str, state: TransformState, config: &RenderConfig) -> RenderResult {
    let width = f64::from(config.width);
    let height = f64::from(config.height);
    let font_size = if config.fit_text {
        config
            .sizing
            .estimate(display_columns(text), config.font_size, width, height)
    } else {
        config.font_size
    };
    let transform = if config.apply_motion {
        state
    } else {
        TransformState::IDENTITY
    };

    let batches = if text.is_empty() {
        Vec::new()
    } else {
        vec![TextBatch {
            text: text.to_string(),
            x: width / 2.0,
            y: height / 2.0,
            font_size,
            color: config.palette.foreground,
            transform,
        }]
    };

    RenderResult {
        width: config.width,
        height: config.height,
        background: config.palette.background,
        batches,
    }
}

/// Coverage of rasterized text, one value in [0, 1] per pixel.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphMask {
    pub width: u32,
    pub height: u32,
    pub coverage: Vec<f32>,
}

impl GlyphMask {
    /// Coverage at a pixel, zero outside the mask.
    #[inline]
    pub fn at(&self, x: i64, y: i64) -> f32 {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return 0.0;
        }
        self.coverage[y as usize * self.width as usize + x as usize]
    }
}

/// Turns text into a coverage mask.
pub trait GlyphRasterizer {
    /// Rasterize `text` on a single line at `font_size` pixels.
    ///
    /// The mask spans the full advance width and the font's line height.
    fn rasterize(&self, text: &str, font_size: f32) -> Result<GlyphMask, RenderError>;
}

/// Native rasterizer backed by one or more TrueType/OpenType fonts.
///
/// Each character uses the first font that has a glyph for it, so a CJK or
/// symbol font can back up a Latin monospace font.
#[derive(Clone)]
pub struct FontRasterizer {
    fonts: Vec<FontArc>,
}

impl std::fmt::Debug for FontRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontRasterizer")
            .field("fonts", &self.fonts.len())
            .finish()
    }
}

impl FontRasterizer {
    /// Build from raw font files. Fails if the list is empty or a font is invalid.
    pub fn from_font_data(data: Vec<Vec<u8>>) -> Result<Self, RenderError> {
        if data.is_empty() {
            return Err(RenderError::NoFont);
        }
        let fonts = data
            .into_iter()
            .map(|bytes| FontArc::try_from_vec(bytes).map_err(|e| RenderError::InvalidFont(e.to_string())))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { fonts })
    }

    fn font_for(&self, ch: char) -> usize {
        self.fonts
            .iter()
            .position(|f| f.glyph_id(ch).0 != 0)
            .unwrap_or(0)
    }
}

impl GlyphRasterizer for FontRasterizer {
    fn rasterize(&self, text: &str, font_size: f32) -> Result<GlyphMask, RenderError> {
        if text.is_empty() {
            return Err(RenderError::EmptyText);
        }
        let primary = self.fonts.first().ok_or(RenderError::NoFont)?;
        let scale = PxScale::from(font_size);
        let ascent = primary.as_scaled(scale).ascent();
        let descent = primary.as_scaled(scale).descent();

        let mut caret = 0.0f32;
        let mut last: Option<(usize, GlyphId)> = None;
        let mut placed: Vec<(usize, Glyph)> = Vec::with_capacity(text.len());
        for ch in text.chars() {
            let font_idx = self.font_for(ch);
            let scaled = self.fonts[font_idx].as_scaled(scale);
            let id = scaled.glyph_id(ch);
            if let Some((last_idx, last_id)) = last {
                if last_idx == font_idx {
                    caret += scaled.kern(last_id, id);
                }
            }
            placed.push((font_idx, id.with_scale_and_position(scale, point(caret, ascent))));
            caret += scaled.h_advance(id);
            last = Some((font_idx, id));
        }

        let width = caret.ceil().max(1.0) as u32;
        let height = (ascent - descent).ceil().max(1.0) as u32;
        let mut coverage = vec![0.0f32; width as usize * height as usize];

        for (font_idx, glyph) in placed {
            let Some(outlined) = self.fonts[font_idx].outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|x, y, c| {
                let px = bounds.min.x as i64 + i64::from(x);
                let py = bounds.min.y as i64 + i64::from(y);
                if px >= 0 && py >= 0 && px < i64::from(width) && py < i64::from(height) {
                    let i = py as usize * width as usize + px as usize;
                    coverage[i] = (coverage[i] + c).min(1.0);
                }
            });
        }

        Ok(GlyphMask {
            width,
            height,
            coverage,
        })
    }
}

/// Rasterize `text`, shrinking it to fit the canvas when `fit_text` is set.
///
/// Glyph extents scale linearly with font size, so one measurement at the
/// preferred size is enough to find the fitted size.
pub fn prepare_text(text: &str, config: &RenderConfig, rasterizer: &dyn GlyphRasterizer) -> Result<GlyphMask, RenderError> {
    config.validate()?;
    let preferred = config.font_size as f32;
    let mask = rasterizer.rasterize(text, preferred)?;
    if !config.fit_text {
        return Ok(mask);
    }

    let per_px_width = f64::from(mask.width) / config.font_size;
    let per_px_height = f64::from(mask.height) / config.font_size;
    let fitted = config.sizing.fit(
        per_px_width,
        per_px_height,
        config.font_size,
        f64::from(config.width),
        f64::from(config.height),
    );
    if fitted < config.font_size {
        log::debug!("fitting {text:?} at {fitted:.1}px instead of {preferred}px");
        rasterizer.rasterize(text, fitted as f32)
    } else {
        Ok(mask)
    }
}

/// A reusable RGBA canvas, cleared in place between frames.
#[derive(Clone, Debug)]
pub struct RasterCanvas {
    image: RgbaImage,
}

impl RasterCanvas {
    /// Create a canvas of the given size.
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidCanvas { width, height });
        }
        Ok(Self {
            image: RgbaImage::new(width, height),
        })
    }

    /// Fill the whole canvas with one color.
    pub fn clear(&mut self, color: Rgb) {
        let pixel = Rgba(color.to_rgba());
        for p in self.image.pixels_mut() {
            *p = pixel;
        }
    }

    /// Composite a coverage mask centered at (`cx`, `cy`), transformed about
    /// its center by `state`.
    pub fn draw_mask(&mut self, mask: &GlyphMask, cx: f64, cy: f64, color: Rgb, state: &TransformState) {
        let sx = f64::from(state.scale_x);
        let sy = f64::from(state.scale_y);
        if sx.abs() < 1e-3 || sy.abs() < 1e-3 || state.opacity <= 0.0 {
            return;
        }
        let theta = f64::from(state.rotate_deg).to_radians();
        let (sin, cos) = theta.sin_cos();
        let center_x = cx + f64::from(state.translate_x);
        let center_y = cy + f64::from(state.translate_y);
        let half_w = f64::from(mask.width) / 2.0;
        let half_h = f64::from(mask.height) / 2.0;

        let (width, height) = self.image.dimensions();
        for y in 0..height {
            for x in 0..width {
                let dx = f64::from(x) + 0.5 - center_x;
                let dy = f64::from(y) + 0.5 - center_y;
                // inverse rotation, then inverse scale, back into mask space
                let rx = (dx * cos + dy * sin) / sx;
                let ry = (-dx * sin + dy * cos) / sy;
                let mx = (rx + half_w).floor() as i64;
                let my = (ry + half_h).floor() as i64;
                let alpha = mask.at(mx, my) * state.opacity;
                if alpha <= 0.0 {
                    continue;
                }
                let p = self.image.get_pixel_mut(x, y);
                let base = Rgb(p.0[0], p.0[1], p.0[2]);
                *p = Rgba(base.blend(color, alpha).to_rgba());
            }
        }
    }

    /// Current pixels.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Copy of the current pixels.
    pub fn snapshot(&self) -> RgbaImage {
        self.image.clone()
    }
}

/// Draw a laid-out frame onto a raster canvas using a prepared mask for
/// every text batch.
pub fn draw_frame(canvas: &mut RasterCanvas, result: &RenderResult, mask: &GlyphMask) {
    canvas.clear(result.background);
    for batch in &result.batches {
        canvas.draw_mask(mask, batch.x, batch.y, batch.color, &batch.transform);
    }
}

/// Web-specific rendering implementation.
#[cfg(feature = "web")]
pub mod web {
    use super::*;
    use wasm_bindgen::JsCast;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

    fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, String> {
        canvas
            .get_context("2d")
            .map_err(|_| "Failed to get 2d context")?
            .ok_or("No 2d context available")?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| "Failed to cast to CanvasRenderingContext2d".to_string())
    }

    fn create_canvas() -> Result<HtmlCanvasElement, String> {
        let window = web_sys::window().ok_or("No window available")?;
        let document = window.document().ok_or("No document available")?;
        document
            .create_element("canvas")
            .map_err(|_| "Failed to create canvas element")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| "Failed to cast element to HtmlCanvasElement".to_string())
    }

    /// Draw a laid-out frame onto an HTML canvas.
    ///
    /// The canvas is resized to the frame and cleared with the background
    /// fill; each batch is drawn centered with its transform applied.
    pub fn render_to_canvas(result: &RenderResult, canvas: &HtmlCanvasElement, font_family: &str) -> Result<(), String> {
        canvas.set_width(result.width);
        canvas.set_height(result.height);
        let ctx = context_2d(canvas)?;

        ctx.set_fill_style_str(&result.background.css());
        ctx.fill_rect(0.0, 0.0, f64::from(result.width), f64::from(result.height));
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");

        for batch in &result.batches {
            let t = &batch.transform;
            ctx.save();
            ctx.translate(batch.x + f64::from(t.translate_x), batch.y + f64::from(t.translate_y))
                .map_err(|_| "Failed to translate")?;
            ctx.rotate(f64::from(t.rotate_deg).to_radians())
                .map_err(|_| "Failed to rotate")?;
            ctx.scale(f64::from(t.scale_x), f64::from(t.scale_y))
                .map_err(|_| "Failed to scale")?;
            ctx.set_global_alpha(f64::from(t.opacity));
            ctx.set_font(&batch.font_css(font_family));
            ctx.set_fill_style_str(&batch.color.css());
            let drawn = ctx.fill_text(&batch.text, 0.0, 0.0);
            ctx.restore();
            drawn.map_err(|_| "Failed to fill text")?;
        }

        Ok(())
    }

    /// Rasterizer that lets the browser draw the glyphs.
    ///
    /// Text is drawn white on black onto an offscreen canvas and the red
    /// channel is read back as coverage.
    #[derive(Clone, Debug)]
    pub struct CanvasRasterizer {
        pub font_family: String,
        pub line_height_ratio: f64,
    }

    impl CanvasRasterizer {
        pub fn new(font_family: &str) -> Self {
            Self {
                font_family: font_family.to_string(),
                line_height_ratio: FontSizing::default().line_height_ratio,
            }
        }
    }

    impl GlyphRasterizer for CanvasRasterizer {
        fn rasterize(&self, text: &str, font_size: f32) -> Result<GlyphMask, RenderError> {
            if text.is_empty() {
                return Err(RenderError::EmptyText);
            }
            let canvas = create_canvas().map_err(RenderError::InvalidFont)?;
            let ctx = context_2d(&canvas).map_err(RenderError::InvalidFont)?;
            let font = format!("{:.2}px {}", font_size, self.font_family);

            ctx.set_font(&font);
            let measured = ctx
                .measure_text(text)
                .map_err(|_| RenderError::InvalidFont("Failed to measure text".into()))?
                .width();
            let width = measured.ceil().max(1.0) as u32;
            let height = (f64::from(font_size) * self.line_height_ratio).ceil().max(1.0) as u32;

            canvas.set_width(width);
            canvas.set_height(height);
            // resizing resets context state
            ctx.set_fill_style_str("#000000");
            ctx.fill_rect(0.0, 0.0, f64::from(width), f64::from(height));
            ctx.set_font(&font);
            ctx.set_text_align("center");
            ctx.set_text_baseline("middle");
            ctx.set_fill_style_str("#ffffff");
            ctx.fill_text(text, f64::from(width) / 2.0, f64::from(height) / 2.0)
                .map_err(|_| RenderError::InvalidFont("Failed to fill text".into()))?;

            let data = ctx
                .get_image_data(0.0, 0.0, f64::from(width), f64::from(height))
                .map_err(|_| RenderError::InvalidFont("Failed to read pixels".into()))?
                .data();
            let coverage = data.0.chunks_exact(4).map(|px| f32::from(px[0]) / 255.0).collect();

            Ok(GlyphMask {
                width,
                height,
                coverage,
            })
        }
    }
}
