//! Frame sampling and animated GIF export.
//!
//! A [`SamplingSession`] walks one animation cycle in fixed steps. Every
//! step evaluates the sticker's style at the sample time, renders the frame
//! onto a canvas that is cleared and reused, and records a copy. Frames are
//! only handed out once the whole cycle was recorded, so a cancelled export
//! never produces a partial image.

use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};

use crate::config::{ExportConfig, DEFAULT_FRAME_COUNT};
use crate::data::StickerRecord;
use crate::error::ExportError;
use crate::render::{draw_frame, layout_frame, prepare_text, GlyphMask, GlyphRasterizer, RasterCanvas, RenderConfig};
use crate::style::{style_for, AnimationStyle, TransformState};

/// Frames sampled per cycle by default.
pub const SAMPLE_COUNT: usize = DEFAULT_FRAME_COUNT;

/// MIME type of exported animations.
pub const GIF_MIME: &str = "image/gif";

/// Current state of a sampling session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// No frame recorded yet
    Idle,
    /// Some frames recorded
    Sampling,
    /// Every frame recorded
    Finished,
    /// Cancelled; recorded frames were discarded
    Cancelled,
}

/// One recorded frame.
#[derive(Clone, Debug)]
pub struct SampledFrame {
    pub index: usize,
    /// Sample time within the cycle
    pub time_ms: f64,
    /// Display delay of this frame
    pub delay_ms: f64,
    /// Style state evaluated at `time_ms`
    pub state: TransformState,
    pub image: RgbaImage,
}

/// Every frame of one cycle.
#[derive(Clone, Debug)]
pub struct FrameSet {
    pub frames: Vec<SampledFrame>,
    pub cycle_ms: u32,
    pub width: u32,
    pub height: u32,
}

impl FrameSet {
    /// Number of frames.
    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Sum of all frame delays.
    pub fn total_delay_ms(&self) -> f64 {
        self.frames.iter().map(|f| f.delay_ms).sum()
    }
}

/// An encoded animation ready for preview or download.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimatedImage {
    pub bytes: Vec<u8>,
    pub mime: &'static str,
    pub width: u32,
    pub height: u32,
    pub frame_count: usize,
    /// Per-frame delays in milliseconds
    pub delays_ms: Vec<f64>,
    /// Download file name, e.g. `happy_kaomoji.gif`
    pub file_name: String,
}

/// Shared cancellation flag for an in-flight export.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Step-by-step sampler for one sticker's animation cycle.
///
/// The caller drives the session by calling [`step`](Self::step) until it
/// returns `false`, then [`finish`](Self::finish). Frames are recorded in
/// strict index order.
#[derive(Clone, Debug)]
pub struct SamplingSession {
    style: &'static AnimationStyle,
    text: String,
    config: RenderConfig,
    mask: GlyphMask,
    canvas: RasterCanvas,
    sample_count: usize,
    cycle_ms: u32,
    frames: Vec<SampledFrame>,
    state: SessionState,
}

impl SamplingSession {
    /// Prepare a session for `record`.
    ///
    /// The record's symbol is rasterized once up front; every frame reuses
    /// the same glyph mask.
    pub fn new(record: &StickerRecord, config: &ExportConfig, rasterizer: &dyn GlyphRasterizer) -> Result<Self, ExportError> {
        let style = style_for(&record.animation_id);
        let render_config = RenderConfig::from_export(config);
        let mask = prepare_text(&record.symbol, &render_config, rasterizer)?;
        let canvas = RasterCanvas::new(render_config.width, render_config.height)?;
        let sample_count = config.sample_count();

        log::debug!(
            "sampling {} ({}) over {}ms in {} frames",
            record.id,
            style.id,
            style.cycle_ms(),
            sample_count
        );

        Ok(Self {
            style,
            text: record.symbol.clone(),
            config: render_config,
            mask,
            canvas,
            sample_count,
            cycle_ms: style.cycle_ms(),
            frames: Vec::with_capacity(sample_count),
            state: SessionState::Idle,
        })
    }

    /// Get the current state.
    #[inline]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Cycle duration being sampled.
    #[inline]
    pub fn cycle_ms(&self) -> u32 {
        self.cycle_ms
    }

    /// Frames recorded so far and the total to record.
    #[inline]
    pub fn progress(&self) -> (usize, usize) {
        (self.frames.len(), self.sample_count)
    }

    /// Sample time of frame `index`: `index * cycle / N`.
    #[inline]
    pub fn sample_time(&self, index: usize) -> f64 {
        index as f64 * f64::from(self.cycle_ms) / self.sample_count as f64
    }

    /// Display delay of frame `index`, in whole GIF centiseconds.
    #[inline]
    pub fn frame_delay_ms(&self, index: usize) -> f64 {
        f64::from(frame_delay_cs(self.cycle_ms, self.sample_count, index) * 10)
    }

    /// Record the next frame.
    ///
    /// Returns `Ok(true)` while frames remain, `Ok(false)` once the cycle is
    /// complete. Fails with [`ExportError::Cancelled`] after [`cancel`](Self::cancel).
    pub fn step(&mut self) -> Result<bool, ExportError> {
        match self.state {
            SessionState::Cancelled => return Err(ExportError::Cancelled),
            SessionState::Finished => return Ok(false),
            SessionState::Idle | SessionState::Sampling => {}
        }

        let index = self.frames.len();
        let time_ms = self.sample_time(index);
        let state = self.style.state_at(time_ms);

        let layout = layout_frame(&self.text, state, &self.config);
        draw_frame(&mut self.canvas, &layout, &self.mask);
        log::debug!("frame {}/{} at {:.1}ms", index + 1, self.sample_count, time_ms);

        self.frames.push(SampledFrame {
            index,
            time_ms,
            delay_ms: self.frame_delay_ms(index),
            state,
            image: self.canvas.snapshot(),
        });

        if self.frames.len() >= self.sample_count {
            self.state = SessionState::Finished;
            Ok(false)
        } else {
            self.state = SessionState::Sampling;
            Ok(true)
        }
    }

    /// Stop sampling and discard every recorded frame.
    pub fn cancel(&mut self) {
        self.frames.clear();
        self.state = SessionState::Cancelled;
    }

    /// Hand out the frame set. Fails unless every frame was recorded.
    pub fn finish(self) -> Result<FrameSet, ExportError> {
        if self.state != SessionState::Finished {
            return Err(ExportError::Cancelled);
        }
        Ok(FrameSet {
            frames: self.frames,
            cycle_ms: self.cycle_ms,
            width: self.config.width,
            height: self.config.height,
        })
    }
}

/// Exports sticker animations as GIFs.
pub struct FrameSampler<'r> {
    config: ExportConfig,
    rasterizer: &'r dyn GlyphRasterizer,
}

impl<'r> FrameSampler<'r> {
    pub fn new(config: ExportConfig, rasterizer: &'r dyn GlyphRasterizer) -> Self {
        Self { config, rasterizer }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Start a session for `record`.
    pub fn session(&self, record: &StickerRecord) -> Result<SamplingSession, ExportError> {
        SamplingSession::new(record, &self.config, self.rasterizer)
    }

    /// Record every frame of one cycle.
    pub fn sample(&self, record: &StickerRecord) -> Result<FrameSet, ExportError> {
        let mut session = self.session(record)?;
        while session.step()? {}
        session.finish()
    }

    /// Sample and encode one cycle synchronously.
    ///
    /// ## Example
    ///
    /// ```rust,no_run
    /// use kaomoji_core_view::{Catalog, ExportConfig, FontRasterizer, FrameSampler};
    ///
    /// let font = std::fs::read("fonts/NotoSansMonoCJK.ttf").unwrap();
    /// let rasterizer = FontRasterizer::from_font_data(vec![font]).unwrap();
    /// let sampler = FrameSampler::new(ExportConfig::default(), &rasterizer);
    ///
    /// let catalog = Catalog::bundled();
    /// let gif = sampler.export_animation(catalog.get("happy").unwrap()).unwrap();
    /// assert_eq!(gif.frame_count, 30);
    /// ```
    pub fn export_animation(&self, record: &StickerRecord) -> Result<AnimatedImage, ExportError> {
        let frames = self.sample(record)?;
        self.encode(record, &frames)
    }

    /// Sample and encode one cycle, awaiting `yield_fn()` before each frame
    /// so a single-threaded host can keep handling input.
    ///
    /// If `cancel` is triggered between frames the recorded frames are
    /// dropped and [`ExportError::Cancelled`] is returned.
    pub async fn export_animation_paced<Y, YFut>(&self, record: &StickerRecord, cancel: &CancelToken, yield_fn: Y) -> Result<AnimatedImage, ExportError>
    where
        Y: Fn() -> YFut,
        YFut: Future<Output = ()>,
    {
        let mut session = self.session(record)?;
        loop {
            yield_fn().await;
            if cancel.is_cancelled() {
                session.cancel();
                log::debug!("export of {} cancelled", record.id);
                return Err(ExportError::Cancelled);
            }
            if !session.step()? {
                break;
            }
        }
        let frames = session.finish()?;
        self.encode(record, &frames)
    }

    fn encode(&self, record: &StickerRecord, frames: &FrameSet) -> Result<AnimatedImage, ExportError> {
        let bytes = encode_gif(frames, self.config.encoder_speed())?;
        log::info!(
            "exported {} as {} frames, {} bytes",
            record.id,
            frames.len(),
            bytes.len()
        );
        Ok(AnimatedImage {
            bytes,
            mime: GIF_MIME,
            width: frames.width,
            height: frames.height,
            frame_count: frames.len(),
            delays_ms: frames.frames.iter().map(|f| f.delay_ms).collect(),
            file_name: format!("{}.gif", record.file_stem()),
        })
    }
}

/// Delay of frame `index` out of `count` over `cycle_ms`, in centiseconds.
///
/// GIF delays are whole centiseconds. Each frame ends at the rounded
/// boundary `round((index + 1) * cycle / count)`, so the rounding error does
/// not accumulate and the delays sum to the cycle rounded to 10ms.
pub fn frame_delay_cs(cycle_ms: u32, count: usize, index: usize) -> u32 {
    if count == 0 {
        return 0;
    }
    // round(k * cycle / (count * 10)) in integers
    let boundary = |k: u64| {
        let num = k * u64::from(cycle_ms);
        let den = count as u64 * 10;
        (2 * num + den) / (2 * den)
    };
    (boundary(index as u64 + 1) - boundary(index as u64)) as u32
}

/// Encode a frame set as an infinitely looping GIF.
///
/// Each frame keeps the delay recorded on it, which is already a whole
/// number of centiseconds.
pub fn encode_gif(frames: &FrameSet, speed: i32) -> Result<Vec<u8>, ExportError> {
    if frames.is_empty() {
        return Err(ExportError::Encode("no frames to encode".into()));
    }
    let mut bytes = Vec::new();
    {
        // the trailer is written when the encoder drops
        let mut encoder = GifEncoder::new_with_speed(&mut bytes, speed.clamp(1, 30));
        encoder.set_repeat(Repeat::Infinite)?;
        encoder.encode_frames(frames.frames.iter().map(|f| {
            Frame::from_parts(
                f.image.clone(),
                0,
                0,
                Delay::from_numer_denom_ms(f.delay_ms.round() as u32, 1),
            )
        }))?;
    }
    Ok(bytes)
}
