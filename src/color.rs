//! Color parsing for export palettes.

/// An opaque RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    /// Parse a color string.
    ///
    /// Supports:
    /// - Hex: `#RGB` (expanded to `#RRGGBB`), `#RRGGBB`
    /// - Named colors: black, white, red, green, blue, gray/grey, pink, purple
    /// - Case-insensitive, trims whitespace
    pub fn parse(s: &str) -> Option<Rgb> {
        let s = s.trim();
        match s.strip_prefix('#') {
            Some(hex) => parse_hex(hex),
            None => parse_named(s),
        }
    }

    /// CSS hex form, e.g. `#ff6b6b`.
    pub fn css(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    /// Blend `over` onto `self` with coverage `alpha` in [0, 1].
    #[inline]
    pub fn blend(&self, over: Rgb, alpha: f32) -> Rgb {
        let a = alpha.clamp(0.0, 1.0);
        let mix = |base: u8, top: u8| -> u8 {
            (f32::from(base) + (f32::from(top) - f32::from(base)) * a).round() as u8
        };
        Rgb(mix(self.0, over.0), mix(self.1, over.1), mix(self.2, over.2))
    }

    /// RGBA pixel with full opacity.
    #[inline]
    pub fn to_rgba(&self) -> [u8; 4] {
        [self.0, self.1, self.2, 255]
    }
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()?;
            Some(Rgb(r * 17, g * 17, b * 17))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Rgb(r, g, b))
        }
        _ => None,
    }
}

fn parse_named(s: &str) -> Option<Rgb> {
    match s.to_lowercase().as_str() {
        "black"         => Some(Rgb(0, 0, 0)),
        "white"         => Some(Rgb(255, 255, 255)),
        "red"           => Some(Rgb(255, 0, 0)),
        "green"         => Some(Rgb(0, 128, 0)),
        "blue"          => Some(Rgb(0, 0, 255)),
        "gray" | "grey" => Some(Rgb(128, 128, 128)),
        "pink"          => Some(Rgb(255, 192, 203)),
        "purple"        => Some(Rgb(128, 0, 128)),
        _               => None,
    }
}

/// Text and background colors of exported frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub foreground: Rgb,
    pub background: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            foreground: Rgb::BLACK,
            background: Rgb::WHITE,
        }
    }
}

impl Palette {
    /// Parse foreground and background strings.
    /// Invalid values fall back to black text on white.
    pub fn from_strings(fg: &str, bg: &str) -> Self {
        let fallback = Palette::default();
        Self {
            foreground: Rgb::parse(fg).unwrap_or(fallback.foreground),
            background: Rgb::parse(bg).unwrap_or(fallback.background),
        }
    }
}
