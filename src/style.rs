//! Animation style registry.
//!
//! Every animation is described once as keyframe data. The same data is
//! rendered to CSS for the live gallery and the HTML/code exports, and
//! evaluated at discrete times by the frame sampler, so both paths show the
//! same motion.

use crate::composition::{Composition, PartRole};

/// Cycle duration used when a style has no motion track.
pub const STATIC_CYCLE_MS: u32 = 2000;

/// CSS `ease-in-out` control points.
pub const EASE_IN_OUT: [f32; 4] = [0.42, 0.0, 0.58, 1.0];

/// A single CSS transform function.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransformOp {
    /// Horizontal offset in pixels
    TranslateX(f32),
    /// Vertical offset in pixels
    TranslateY(f32),
    /// Rotation in degrees
    Rotate(f32),
    /// Uniform scale factor
    Scale(f32),
    /// Vertical scale factor
    ScaleY(f32),
}

impl TransformOp {
    /// CSS text for this function, e.g. `translateY(-12px)`.
    pub fn css(&self) -> String {
        match self {
            TransformOp::TranslateX(v) => format!("translateX({v}px)"),
            TransformOp::TranslateY(v) => format!("translateY({v}px)"),
            TransformOp::Rotate(v) => format!("rotate({v}deg)"),
            TransformOp::Scale(v) => format!("scale({v})"),
            TransformOp::ScaleY(v) => format!("scaleY({v})"),
        }
    }

    fn apply(&self, state: &mut TransformState) {
        match *self {
            TransformOp::TranslateX(v) => state.translate_x = v,
            TransformOp::TranslateY(v) => state.translate_y = v,
            TransformOp::Rotate(v) => state.rotate_deg = v,
            TransformOp::Scale(v) => {
                state.scale_x = v;
                state.scale_y = v;
            }
            TransformOp::ScaleY(v) => state.scale_y = v,
        }
    }
}

/// Visual state of an element at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformState {
    pub translate_x: f32,
    pub translate_y: f32,
    pub rotate_deg: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub opacity: f32,
}

impl TransformState {
    /// The untransformed, fully opaque state.
    pub const IDENTITY: TransformState = TransformState {
        translate_x: 0.0,
        translate_y: 0.0,
        rotate_deg: 0.0,
        scale_x: 1.0,
        scale_y: 1.0,
        opacity: 1.0,
    };

    /// Component-wise linear blend.
    pub fn lerp(&self, other: &TransformState, t: f32) -> TransformState {
        TransformState {
            translate_x: lerp_f32(self.translate_x, other.translate_x, t),
            translate_y: lerp_f32(self.translate_y, other.translate_y, t),
            rotate_deg: lerp_f32(self.rotate_deg, other.rotate_deg, t),
            scale_x: lerp_f32(self.scale_x, other.scale_x, t),
            scale_y: lerp_f32(self.scale_y, other.scale_y, t),
            opacity: lerp_f32(self.opacity, other.opacity, t),
        }
    }

    /// Check whether this state draws exactly like the identity.
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for TransformState {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A keyframe block: one or more percentage offsets sharing a state.
#[derive(Clone, Copy, Debug)]
pub struct Keyframe {
    /// Offsets in percent, e.g. `&[0, 100]` for `0%, 100%`
    pub offsets: &'static [u8],
    /// Transform functions, in CSS order
    pub transform: &'static [TransformOp],
    /// Opacity, if the block sets one
    pub opacity: Option<f32>,
}

impl Keyframe {
    /// Resolve this block to a concrete state.
    pub fn state(&self) -> TransformState {
        let mut state = TransformState::IDENTITY;
        for op in self.transform {
            op.apply(&mut state);
        }
        if let Some(opacity) = self.opacity {
            state.opacity = opacity;
        }
        state
    }
}

/// A named `@keyframes` definition.
#[derive(Clone, Copy, Debug)]
pub struct KeyframeSet {
    pub name: &'static str,
    pub frames: &'static [Keyframe],
}

impl KeyframeSet {
    /// Keyframe stops sorted by offset, as (progress in [0, 1], state).
    ///
    /// Missing 0% or 100% stops resolve to the identity state, as in CSS.
    fn stops(&self) -> Vec<(f32, TransformState)> {
        let mut stops: Vec<(f32, TransformState)> = self
            .frames
            .iter()
            .flat_map(|kf| {
                let state = kf.state();
                kf.offsets
                    .iter()
                    .map(move |&pct| (f32::from(pct.min(100)) / 100.0, state))
            })
            .collect();
        stops.sort_by(|a, b| a.0.total_cmp(&b.0));
        if stops.first().map_or(true, |s| s.0 > 0.0) {
            stops.insert(0, (0.0, TransformState::IDENTITY));
        }
        if stops.last().map_or(true, |s| s.0 < 1.0) {
            stops.push((1.0, TransformState::IDENTITY));
        }
        stops
    }

    /// Evaluate the keyframes at `progress` in [0, 1] with ease-in-out
    /// timing applied per segment.
    pub fn sample(&self, progress: f32) -> TransformState {
        let stops = self.stops();
        let u = if progress.is_finite() {
            progress.clamp(0.0, 1.0)
        } else {
            0.0
        };
        for pair in stops.windows(2) {
            let (t0, s0) = pair[0];
            let (t1, s1) = pair[1];
            if u >= t0 && u <= t1 {
                if t1 - t0 <= f32::EPSILON {
                    return s1;
                }
                let local = (u - t0) / (t1 - t0);
                return s0.lerp(&s1, bezier_ease(local, EASE_IN_OUT));
            }
        }
        stops.last().map(|s| s.1).unwrap_or_default()
    }

    /// Render as a CSS `@keyframes` block.
    pub fn css(&self) -> String {
        let mut out = format!("@keyframes {} {{\n", self.name);
        for kf in self.frames {
            let offsets: Vec<String> = kf.offsets.iter().map(|o| format!("{o}%")).collect();
            out.push_str(&format!("    {} {{\n", offsets.join(", ")));
            if !kf.transform.is_empty() {
                let ops: Vec<String> = kf.transform.iter().map(TransformOp::css).collect();
                out.push_str(&format!("        transform: {};\n", ops.join(" ")));
            }
            if let Some(opacity) = kf.opacity {
                out.push_str(&format!("        opacity: {opacity};\n"));
            }
            out.push_str("    }\n");
        }
        out.push('}');
        out
    }
}

/// One animated timeline: keyframes plus timing.
#[derive(Clone, Copy, Debug)]
pub struct Track {
    pub keyframes: KeyframeSet,
    /// Base cycle duration
    pub duration_ms: u32,
    /// Cycle duration while the pointer is over the sticker
    pub hover_duration_ms: u32,
    /// CSS `transform-origin`, if not the default center
    pub transform_origin: Option<&'static str>,
}

impl Track {
    /// Evaluate the track at `time_ms` after the animation started,
    /// honouring a start delay. Before the delay elapses the element is
    /// untransformed.
    pub fn state_at(&self, time_ms: f64, delay_ms: u32) -> TransformState {
        let local = time_ms - f64::from(delay_ms);
        if local < 0.0 || self.duration_ms == 0 {
            return TransformState::IDENTITY;
        }
        let duration = f64::from(self.duration_ms);
        let progress = (local % duration) / duration;
        self.keyframes.sample(progress as f32)
    }

    /// CSS `animation` shorthand for this track at the given duration.
    pub fn animation_shorthand(&self, duration_ms: u32) -> String {
        format!(
            "{} {} ease-in-out infinite",
            self.keyframes.name,
            format_seconds(duration_ms)
        )
    }
}

/// What an animation style moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StyleScope {
    /// The whole sticker element moves as a unit
    Element,
    /// Named sub-parts of a composite sticker move independently
    Parts,
    /// Nothing moves
    Static,
}

/// A registered animation style.
#[derive(Clone, Copy, Debug)]
pub struct AnimationStyle {
    pub id: &'static str,
    pub scope: StyleScope,
    /// Motion tracks; the first one defines the cycle duration
    pub tracks: &'static [Track],
    /// Extra start delays by part name
    pub part_delays: &'static [(&'static str, u32)],
}

impl AnimationStyle {
    /// Duration of one full cycle.
    pub fn cycle_ms(&self) -> u32 {
        self.tracks
            .first()
            .map(|t| t.duration_ms)
            .unwrap_or(STATIC_CYCLE_MS)
    }

    /// Look up a track by its keyframe name.
    pub fn track(&self, name: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.keyframes.name == name)
    }

    /// Start delay for a named part.
    pub fn delay_for(&self, part: &str) -> u32 {
        self.part_delays
            .iter()
            .find(|(name, _)| *name == part)
            .map(|(_, delay)| *delay)
            .unwrap_or(0)
    }

    /// State of the primary track at `time_ms`.
    ///
    /// This is the state the frame sampler records for each frame.
    pub fn state_at(&self, time_ms: f64) -> TransformState {
        match self.tracks.first() {
            Some(track) => track.state_at(time_ms, 0),
            None => TransformState::IDENTITY,
        }
    }

    /// Names of the `@keyframes` rules this style emits.
    pub fn keyframe_names(&self) -> Vec<&'static str> {
        self.tracks.iter().map(|t| t.keyframes.name).collect()
    }

    /// Check whether the style moves anything.
    #[inline]
    pub fn is_static(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// Resolve an animation id to its style.
///
/// Unknown ids resolve to the static style, so rendering never fails on a
/// missing or misspelt identifier.
///
/// ## Example
///
/// ```rust
/// use kaomoji_core_view::style_for;
///
/// assert_eq!(style_for("bounce").cycle_ms(), 1500);
/// assert!(style_for("no-such-animation").is_static());
/// ```
pub fn style_for(animation_id: &str) -> &'static AnimationStyle {
    STYLES
        .iter()
        .find(|s| s.id == animation_id)
        .unwrap_or(&STATIC_STYLE)
}

/// Every registered style, excluding the static fallback.
pub fn registered_styles() -> &'static [AnimationStyle] {
    STYLES
}

/// Where a duration change applies in the live view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnimatedTarget {
    /// The sticker element itself
    Element,
    /// A sub-part, by position in the composition and CSS class
    Part { index: usize, class: String },
}

/// A duration to apply to one animated target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DurationChange {
    pub target: AnimatedTarget,
    pub duration_ms: u32,
}

/// Durations for every animated target of a sticker.
///
/// With `hovered` set the per-track hover durations are returned, otherwise
/// the base durations. Static parts are never listed.
pub fn animation_durations(composition: &Composition<'_>, style: &AnimationStyle, hovered: bool) -> Vec<DurationChange> {
    let pick = |track: &Track| {
        if hovered {
            track.hover_duration_ms
        } else {
            track.duration_ms
        }
    };

    // whole-element styles animate the root even when the sticker is split
    if let (StyleScope::Element, Some(track)) = (style.scope, style.tracks.first()) {
        return vec![DurationChange {
            target: AnimatedTarget::Element,
            duration_ms: pick(track),
        }];
    }

    match composition {
        Composition::Simple { .. } => Vec::new(),
        Composition::Composite(_) => composition
            .parts()
            .into_iter()
            .enumerate()
            .filter_map(|(index, part)| match part.role {
                PartRole::Animated(name) => style.track(name).map(|track| DurationChange {
                    target: AnimatedTarget::Part {
                        index,
                        class: part.class,
                    },
                    duration_ms: pick(track),
                }),
                PartRole::Static => None,
            })
            .collect(),
    }
}

/// Rules shared by every sticker stylesheet.
pub fn base_css() -> &'static str {
    ".kaomoji {
    font-family: 'Courier New', monospace;
    font-size: 3rem;
    white-space: nowrap;
    user-select: none;
}"
}

/// Animation rules for one sticker: layout, per-target animation and
/// `@keyframes` blocks. Does not include [`base_css`].
pub fn animation_css(composition: &Composition<'_>, animation_id: &str, style: &AnimationStyle) -> String {
    let mut blocks: Vec<String> = Vec::new();
    let root = format!(".kaomoji.{}", animation_id);

    let element_track = match (style.scope, style.tracks.first()) {
        (StyleScope::Element, Some(track)) => Some(track),
        _ => None,
    };

    if let Composition::Composite(_) = composition {
        blocks.push(format!(
            "{root} {{\n    display: flex;\n    justify-content: center;\n    align-items: center;\n    gap: 0;\n}}"
        ));
    }

    if let Some(track) = element_track {
        let mut rule = format!(
            "{root} {{\n    animation: {};\n",
            track.animation_shorthand(track.duration_ms)
        );
        if let Some(origin) = track.transform_origin {
            rule.push_str(&format!("    transform-origin: {origin};\n"));
        }
        rule.push('}');
        blocks.push(rule);
    }

    match composition {
        Composition::Simple { .. } => {}
        Composition::Composite(_) => {
            let parts = composition.parts();

            let mut static_classes: Vec<String> = Vec::new();
            for part in &parts {
                let is_static = match part.role {
                    PartRole::Static => true,
                    PartRole::Animated(name) => style.track(name).is_none(),
                };
                if is_static && !static_classes.contains(&part.class) {
                    static_classes.push(part.class.clone());
                }
            }
            if !static_classes.is_empty() {
                blocks.push(format!(
                    "{} {{\n    display: inline-block;\n}}",
                    selector_list(&static_classes)
                ));
            }

            for track in style.tracks {
                let mut classes: Vec<String> = Vec::new();
                for part in &parts {
                    if part.role == PartRole::Animated(track.keyframes.name)
                        && !classes.contains(&part.class)
                    {
                        classes.push(part.class.clone());
                    }
                }
                if classes.is_empty() {
                    continue;
                }
                let mut rule = format!(
                    "{} {{\n    display: inline-block;\n    animation: {};\n",
                    selector_list(&classes),
                    track.animation_shorthand(track.duration_ms)
                );
                if let Some(origin) = track.transform_origin {
                    rule.push_str(&format!("    transform-origin: {origin};\n"));
                }
                rule.push('}');
                blocks.push(rule);
            }

            for (name, delay) in style.part_delays {
                if let Some(part) = parts.iter().find(|p| p.name == *name) {
                    blocks.push(format!(
                        ".{} {{\n    animation-delay: {};\n}}",
                        part.class,
                        format_seconds(*delay)
                    ));
                }
            }
        }
    }

    for track in style.tracks {
        blocks.push(track.keyframes.css());
    }

    blocks.join("\n\n")
}

/// Complete stylesheet for one sticker: base rules plus animation rules.
pub fn stylesheet(composition: &Composition<'_>, animation_id: &str, style: &AnimationStyle) -> String {
    let animation = animation_css(composition, animation_id, style);
    if animation.is_empty() {
        base_css().to_string()
    } else {
        format!("{}\n\n{}", base_css(), animation)
    }
}

fn selector_list(classes: &[String]) -> String {
    classes
        .iter()
        .map(|c| format!(".{c}"))
        .collect::<Vec<_>>()
        .join(",\n")
}

/// Format milliseconds as CSS seconds, e.g. 1500 -> "1.5s".
pub fn format_seconds(ms: u32) -> String {
    format!("{}s", f64::from(ms) / 1000.0)
}

#[inline]
fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
fn cubic_bezier(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

/// Eased progress for a CSS cubic-bezier timing function, found by
/// bisecting the monotonic x curve.
pub fn bezier_ease(t: f32, ctrl: [f32; 4]) -> f32 {
    let [x1, y1, x2, y2] = ctrl;
    let t = t.clamp(0.0, 1.0);
    if x1 == y1 && x2 == y2 {
        return t;
    }
    let mut lo = 0.0f32;
    let mut hi = 1.0f32;
    let mut mid = t;
    for _ in 0..32 {
        let x = cubic_bezier(0.0, x1, x2, 1.0, mid);
        if (x - t).abs() < 1e-6 {
            break;
        }
        if x < t {
            lo = mid;
        } else {
            hi = mid;
        }
        mid = 0.5 * (lo + hi);
    }
    cubic_bezier(0.0, y1, y2, 1.0, mid)
}

use TransformOp::{Rotate, Scale, ScaleY, TranslateX, TranslateY};

static STATIC_STYLE: AnimationStyle = AnimationStyle {
    id: "static",
    scope: StyleScope::Static,
    tracks: &[],
    part_delays: &[],
};

static STYLES: &[AnimationStyle] = &[
    AnimationStyle {
        id: "shrug",
        scope: StyleScope::Parts,
        tracks: &[
            Track {
                keyframes: KeyframeSet {
                    name: "shrugHands",
                    frames: &[
                        Keyframe { offsets: &[0, 100], transform: &[TranslateY(0.0), Rotate(0.0)], opacity: None },
                        Keyframe { offsets: &[30], transform: &[TranslateY(-12.0), Rotate(3.0)], opacity: None },
                        Keyframe { offsets: &[70], transform: &[TranslateY(-10.0), Rotate(-1.0)], opacity: None },
                    ],
                },
                duration_ms: 1500,
                hover_duration_ms: 800,
                transform_origin: Some("bottom center"),
            },
            Track {
                keyframes: KeyframeSet {
                    name: "shrugFace",
                    frames: &[
                        Keyframe { offsets: &[0, 100], transform: &[Scale(1.0)], opacity: None },
                        Keyframe { offsets: &[50], transform: &[Scale(1.05)], opacity: None },
                    ],
                },
                duration_ms: 3000,
                hover_duration_ms: 1500,
                transform_origin: None,
            },
        ],
        part_delays: &[("right-hand", 100)],
    },
    AnimationStyle {
        id: "love",
        scope: StyleScope::Parts,
        tracks: &[Track {
            keyframes: KeyframeSet {
                name: "loveHearts",
                frames: &[
                    Keyframe { offsets: &[0, 100], transform: &[Scale(1.0)], opacity: None },
                    Keyframe { offsets: &[50], transform: &[Scale(1.5)], opacity: None },
                ],
            },
            duration_ms: 1500,
            hover_duration_ms: 800,
            transform_origin: Some("center"),
        }],
        part_delays: &[],
    },
    AnimationStyle {
        id: "wink",
        scope: StyleScope::Parts,
        tracks: &[Track {
            keyframes: KeyframeSet {
                name: "winkEye",
                frames: &[
                    Keyframe { offsets: &[0, 85], transform: &[ScaleY(1.0)], opacity: None },
                    Keyframe { offsets: &[90, 95], transform: &[ScaleY(0.1)], opacity: None },
                    Keyframe { offsets: &[100], transform: &[ScaleY(1.0)], opacity: None },
                ],
            },
            duration_ms: 2000,
            hover_duration_ms: 1000,
            transform_origin: Some("center"),
        }],
        part_delays: &[],
    },
    AnimationStyle {
        id: "cry",
        scope: StyleScope::Parts,
        tracks: &[Track {
            keyframes: KeyframeSet {
                name: "tearFlow",
                frames: &[
                    Keyframe { offsets: &[0, 100], transform: &[TranslateY(0.0), ScaleY(1.0)], opacity: Some(1.0) },
                    Keyframe { offsets: &[50], transform: &[TranslateY(3.0), ScaleY(1.2)], opacity: Some(0.8) },
                ],
            },
            duration_ms: 2500,
            hover_duration_ms: 1500,
            transform_origin: Some("top center"),
        }],
        part_delays: &[("right-tear", 300)],
    },
    AnimationStyle {
        id: "bounce",
        scope: StyleScope::Element,
        tracks: &[Track {
            keyframes: KeyframeSet {
                name: "bounce",
                frames: &[
                    Keyframe { offsets: &[0, 100], transform: &[TranslateY(0.0)], opacity: None },
                    Keyframe { offsets: &[50], transform: &[TranslateY(-10.0)], opacity: None },
                ],
            },
            duration_ms: 1500,
            hover_duration_ms: 800,
            transform_origin: None,
        }],
        part_delays: &[],
    },
    AnimationStyle {
        id: "wiggle",
        scope: StyleScope::Element,
        tracks: &[Track {
            keyframes: KeyframeSet {
                name: "wiggle",
                frames: &[
                    Keyframe { offsets: &[0, 100], transform: &[Rotate(0.0)], opacity: None },
                    Keyframe { offsets: &[25], transform: &[Rotate(-3.0)], opacity: None },
                    Keyframe { offsets: &[75], transform: &[Rotate(3.0)], opacity: None },
                ],
            },
            duration_ms: 1000,
            hover_duration_ms: 500,
            transform_origin: None,
        }],
        part_delays: &[],
    },
    AnimationStyle {
        id: "pulse",
        scope: StyleScope::Element,
        tracks: &[Track {
            keyframes: KeyframeSet {
                name: "pulse",
                frames: &[
                    Keyframe { offsets: &[0, 100], transform: &[Scale(1.0)], opacity: Some(1.0) },
                    Keyframe { offsets: &[50], transform: &[Scale(1.1)], opacity: Some(0.8) },
                ],
            },
            duration_ms: 2000,
            hover_duration_ms: 1000,
            transform_origin: None,
        }],
        part_delays: &[],
    },
    AnimationStyle {
        id: "joy",
        scope: StyleScope::Element,
        tracks: &[Track {
            keyframes: KeyframeSet {
                name: "joy",
                frames: &[
                    Keyframe { offsets: &[0, 100], transform: &[Scale(1.0), Rotate(0.0)], opacity: None },
                    Keyframe { offsets: &[25], transform: &[Scale(1.15), Rotate(-2.0)], opacity: None },
                    Keyframe { offsets: &[50], transform: &[Scale(1.25), Rotate(0.0)], opacity: None },
                    Keyframe { offsets: &[75], transform: &[Scale(1.15), Rotate(2.0)], opacity: None },
                ],
            },
            duration_ms: 1200,
            hover_duration_ms: 600,
            transform_origin: None,
        }],
        part_delays: &[],
    },
    AnimationStyle {
        id: "celebrate",
        scope: StyleScope::Element,
        tracks: &[Track {
            keyframes: KeyframeSet {
                name: "celebrate",
                frames: &[
                    Keyframe { offsets: &[0, 100], transform: &[TranslateY(0.0), Rotate(0.0), Scale(1.0)], opacity: None },
                    Keyframe { offsets: &[25], transform: &[TranslateY(-15.0), Rotate(-10.0), Scale(1.1)], opacity: None },
                    Keyframe { offsets: &[50], transform: &[TranslateY(-5.0), Rotate(0.0), Scale(1.05)], opacity: None },
                    Keyframe { offsets: &[75], transform: &[TranslateY(-15.0), Rotate(10.0), Scale(1.1)], opacity: None },
                ],
            },
            duration_ms: 1500,
            hover_duration_ms: 800,
            transform_origin: None,
        }],
        part_delays: &[],
    },
    AnimationStyle {
        id: "tableflip",
        scope: StyleScope::Element,
        tracks: &[Track {
            keyframes: KeyframeSet {
                name: "tableflip",
                frames: &[
                    Keyframe { offsets: &[0, 100], transform: &[Rotate(0.0), TranslateX(0.0)], opacity: None },
                    Keyframe { offsets: &[25], transform: &[Rotate(-5.0), TranslateX(-5.0)], opacity: None },
                    Keyframe { offsets: &[50], transform: &[Rotate(15.0), TranslateX(10.0)], opacity: None },
                    Keyframe { offsets: &[75], transform: &[Rotate(-2.0), TranslateX(-2.0)], opacity: None },
                ],
            },
            duration_ms: 2000,
            hover_duration_ms: 1000,
            transform_origin: None,
        }],
        part_delays: &[],
    },
    AnimationStyle {
        id: "tablefix",
        scope: StyleScope::Element,
        tracks: &[Track {
            keyframes: KeyframeSet {
                name: "tablefix",
                frames: &[
                    Keyframe { offsets: &[0, 100], transform: &[TranslateY(0.0), Rotate(0.0)], opacity: None },
                    Keyframe { offsets: &[30], transform: &[TranslateY(-5.0), Rotate(-1.0)], opacity: None },
                    Keyframe { offsets: &[60], transform: &[TranslateY(2.0), Rotate(1.0)], opacity: None },
                    Keyframe { offsets: &[80], transform: &[TranslateY(-2.0), Rotate(0.0)], opacity: None },
                ],
            },
            duration_ms: 3000,
            hover_duration_ms: 1500,
            transform_origin: None,
        }],
        part_delays: &[],
    },
    AnimationStyle {
        id: "dance",
        scope: StyleScope::Element,
        tracks: &[Track {
            keyframes: KeyframeSet {
                name: "dance",
                frames: &[
                    Keyframe { offsets: &[0, 100], transform: &[TranslateX(0.0), Rotate(0.0)], opacity: None },
                    Keyframe { offsets: &[25], transform: &[TranslateX(-8.0), Rotate(-5.0)], opacity: None },
                    Keyframe { offsets: &[50], transform: &[TranslateX(0.0), Rotate(0.0)], opacity: None },
                    Keyframe { offsets: &[75], transform: &[TranslateX(8.0), Rotate(5.0)], opacity: None },
                ],
            },
            duration_ms: 1000,
            hover_duration_ms: 500,
            transform_origin: None,
        }],
        part_delays: &[],
    },
    AnimationStyle {
        id: "hug",
        scope: StyleScope::Element,
        tracks: &[Track {
            keyframes: KeyframeSet {
                name: "hug",
                frames: &[
                    Keyframe { offsets: &[0, 100], transform: &[Scale(1.0), TranslateY(0.0)], opacity: None },
                    Keyframe { offsets: &[50], transform: &[Scale(1.1), TranslateY(-5.0)], opacity: None },
                ],
            },
            duration_ms: 2500,
            hover_duration_ms: 1500,
            transform_origin: None,
        }],
        part_delays: &[],
    },
    AnimationStyle {
        id: "bear",
        scope: StyleScope::Element,
        tracks: &[Track {
            keyframes: KeyframeSet {
                name: "bear",
                frames: &[
                    Keyframe { offsets: &[0, 100], transform: &[Rotate(0.0), Scale(1.0)], opacity: None },
                    Keyframe { offsets: &[25], transform: &[Rotate(-2.0), Scale(1.05)], opacity: None },
                    Keyframe { offsets: &[50], transform: &[Rotate(0.0), Scale(1.1)], opacity: None },
                    Keyframe { offsets: &[75], transform: &[Rotate(2.0), Scale(1.05)], opacity: None },
                ],
            },
            duration_ms: 1800,
            hover_duration_ms: 1000,
            transform_origin: None,
        }],
        part_delays: &[],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::compose;
    use crate::data::{Catalog, StickerRecord};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_style_for_is_total() {
        for id in ["", "bounce ", "Bounce", "definitely-not-registered", "ツ"] {
            let style = style_for(id);
            assert!(style.is_static());
            assert_eq!(style.cycle_ms(), STATIC_CYCLE_MS);
            assert!(style.state_at(500.0).is_identity());
        }
        assert_eq!(style_for("wiggle").id, "wiggle");
    }

    #[test]
    fn test_ids_are_unique() {
        let mut ids: Vec<_> = registered_styles().iter().map(|s| s.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), registered_styles().len());
        assert_eq!(registered_styles().iter().filter(|s| s.id == "cry").count(), 1);
    }

    #[test]
    fn test_bundled_catalog_resolves_every_animation() {
        for record in Catalog::bundled().iter() {
            assert!(
                !style_for(&record.animation_id).is_static(),
                "{} has no style",
                record.animation_id
            );
        }
    }

    #[test]
    fn test_hover_is_faster_than_base() {
        for style in registered_styles() {
            for track in style.tracks {
                assert!(track.hover_duration_ms < track.duration_ms, "{}", track.keyframes.name);
            }
        }
    }

    #[test]
    fn test_keyframe_sampling_hits_stops() {
        let bounce = style_for("bounce").tracks[0].keyframes;
        assert_abs_diff_eq!(bounce.sample(0.0).translate_y, 0.0);
        assert_abs_diff_eq!(bounce.sample(0.5).translate_y, -10.0);
        assert_abs_diff_eq!(bounce.sample(1.0).translate_y, 0.0);
        // ease-in-out is symmetric around the segment midpoint
        assert_abs_diff_eq!(bounce.sample(0.25).translate_y, -5.0, epsilon = 1e-3);
    }

    #[test]
    fn test_ease_in_out_shape() {
        assert_abs_diff_eq!(bezier_ease(0.0, EASE_IN_OUT), 0.0);
        assert_abs_diff_eq!(bezier_ease(1.0, EASE_IN_OUT), 1.0);
        assert_abs_diff_eq!(bezier_ease(0.5, EASE_IN_OUT), 0.5, epsilon = 1e-4);
        assert!(bezier_ease(0.1, EASE_IN_OUT) < 0.1);
        assert!(bezier_ease(0.9, EASE_IN_OUT) > 0.9);
        assert_abs_diff_eq!(bezier_ease(0.3, [0.0, 0.0, 1.0, 1.0]), 0.3);
    }

    #[test]
    fn test_shared_offset_stops_hold() {
        let wink = style_for("wink").tracks[0].keyframes;
        assert_abs_diff_eq!(wink.sample(0.5).scale_y, 1.0);
        assert_abs_diff_eq!(wink.sample(0.92).scale_y, 0.1);
        assert_abs_diff_eq!(wink.sample(0.95).scale_y, 0.1);
        assert_abs_diff_eq!(wink.sample(1.0).scale_y, 1.0);
    }

    #[test]
    fn test_track_time_wraps_and_delays() {
        let track = &style_for("cry").tracks[0];
        let mid = track.state_at(1250.0, 0);
        assert_abs_diff_eq!(mid.opacity, 0.8, epsilon = 1e-5);
        let wrapped = track.state_at(2500.0 + 1250.0, 0);
        assert_abs_diff_eq!(wrapped.translate_y, mid.translate_y, epsilon = 1e-4);
        assert!(track.state_at(200.0, 300).is_identity());
    }

    #[test]
    fn test_keyframes_css() {
        let css = style_for("pulse").tracks[0].keyframes.css();
        assert_eq!(
            css,
            "@keyframes pulse {\n    0%, 100% {\n        transform: scale(1);\n        opacity: 1;\n    }\n    50% {\n        transform: scale(1.1);\n        opacity: 0.8;\n    }\n}"
        );
    }

    #[test]
    fn test_element_stylesheet() {
        let record = StickerRecord::new("happy", "(◕‿◕)", "Happy", "bounce");
        let css = stylesheet(&compose(&record), &record.animation_id, style_for("bounce"));
        assert!(css.starts_with(base_css()));
        assert!(css.contains(".kaomoji.bounce {\n    animation: bounce 1.5s ease-in-out infinite;\n}"));
        assert!(css.contains("@keyframes bounce {"));
    }

    #[test]
    fn test_composite_stylesheet() {
        let record = StickerRecord::new("shrug", "¯\\_(ツ)_/¯", "Shrug", "shrug");
        let css = stylesheet(&compose(&record), "shrug", style_for("shrug"));
        assert!(css.contains(".kaomoji.shrug {\n    display: flex;"));
        assert!(css.contains(".shrug-left-hand,\n.shrug-right-hand {"));
        assert!(css.contains("animation: shrugHands 1.5s ease-in-out infinite;"));
        assert!(css.contains("transform-origin: bottom center;"));
        assert!(css.contains(".shrug-face {\n    display: inline-block;\n    animation: shrugFace 3s ease-in-out infinite;"));
        assert!(css.contains(".shrug-right-hand {\n    animation-delay: 0.1s;\n}"));
        assert!(css.contains("@keyframes shrugHands {"));
        assert!(css.contains("@keyframes shrugFace {"));
    }

    #[test]
    fn test_static_parts_listed_once() {
        let record = StickerRecord::new("love", "(♥‿♥)", "Love", "love");
        let css = stylesheet(&compose(&record), "love", style_for("love"));
        assert!(css.contains(".love-bracket,\n.love-smile {\n    display: inline-block;\n}"));
        assert_eq!(css.matches(".love-bracket").count(), 1);
    }

    #[test]
    fn test_unknown_animation_stylesheet_is_base_only() {
        let record = StickerRecord::new("x", "(o_o)", "X", "typo");
        let css = stylesheet(&compose(&record), "typo", style_for("typo"));
        assert_eq!(css, base_css());
    }

    #[test]
    fn test_hover_durations_element() {
        let record = StickerRecord::new("surprised", "ヽ(°〇°)ﾉ", "Surprised", "wiggle");
        let composition = compose(&record);
        let style = style_for("wiggle");
        assert_eq!(
            animation_durations(&composition, style, true),
            vec![DurationChange { target: AnimatedTarget::Element, duration_ms: 500 }]
        );
        assert_eq!(animation_durations(&composition, style, false)[0].duration_ms, 1000);
    }

    #[test]
    fn test_hover_durations_skip_static_parts() {
        let record = StickerRecord::new("wink", "(^_-)", "Wink", "wink");
        let changes = animation_durations(&compose(&record), style_for("wink"), true);
        assert_eq!(
            changes,
            vec![DurationChange {
                target: AnimatedTarget::Part { index: 1, class: "wink-eye".into() },
                duration_ms: 1000,
            }]
        );

        let record = StickerRecord::new("shrug", "¯\\_(ツ)_/¯", "Shrug", "shrug");
        let changes = animation_durations(&compose(&record), style_for("shrug"), true);
        let durations: Vec<_> = changes.iter().map(|c| c.duration_ms).collect();
        assert_eq!(durations, vec![800, 1500, 800]);
    }

    #[test]
    fn test_split_sticker_with_element_style() {
        let record = StickerRecord::new("wink", "(^_-)", "Wink", "bounce");
        let composition = compose(&record);
        assert!(composition.is_composite());

        let css = stylesheet(&composition, "bounce", style_for("bounce"));
        assert!(css.contains(".kaomoji.bounce {\n    display: flex;"));
        assert!(css.contains(".kaomoji.bounce {\n    animation: bounce 1.5s ease-in-out infinite;\n}"));
        assert!(css.contains("@keyframes bounce {"));

        assert_eq!(
            animation_durations(&composition, style_for("bounce"), true),
            vec![DurationChange { target: AnimatedTarget::Element, duration_ms: 800 }]
        );
    }

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(1500), "1.5s");
        assert_eq!(format_seconds(3000), "3s");
        assert_eq!(format_seconds(100), "0.1s");
    }
}
