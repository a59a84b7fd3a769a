//! Font sizing for fitting a sticker's text to the export canvas.

/// Font sizing configuration and calculations.
#[derive(Clone, Debug)]
pub struct FontSizing {
    /// Average glyph advance as a ratio of font size (0.6 for Courier New)
    pub char_width_ratio: f64,
    /// Line height as a ratio of font size
    pub line_height_ratio: f64,
    /// Minimum allowed font size in pixels
    pub min_font_size: f64,
    /// Padding subtracted from each canvas dimension
    pub padding: f64,
}

impl Default for FontSizing {
    fn default() -> Self {
        Self {
            char_width_ratio: 0.6,
            line_height_ratio: 1.11,
            min_font_size: 8.0,
            padding: 20.0,
        }
    }
}

impl FontSizing {
    /// Create a new FontSizing with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Estimate a font size that fits `columns` characters on one line.
    ///
    /// Used where glyphs cannot be measured (canvas backends). Never exceeds
    /// `preferred`.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use kaomoji_core_view::FontSizing;
    ///
    /// let sizing = FontSizing::default();
    /// // 5 columns at 48px are 144px wide: fits a 200px canvas
    /// assert_eq!(sizing.estimate(5, 48.0, 200.0, 100.0), 48.0);
    /// // 12 columns do not
    /// assert!(sizing.estimate(12, 48.0, 200.0, 100.0) < 48.0);
    /// ```
    pub fn estimate(&self, columns: usize, preferred: f64, canvas_width: f64, canvas_height: f64) -> f64 {
        if columns == 0 {
            return preferred;
        }
        let width_at_one = columns as f64 * self.char_width_ratio;
        let height_at_one = self.line_height_ratio;
        self.fit(width_at_one, height_at_one, preferred, canvas_width, canvas_height)
    }

    /// Fit text whose extent at a 1px font size is known.
    ///
    /// Returns the largest size not above `preferred` whose extent fits the
    /// padded canvas, clamped below by `min_font_size`.
    pub fn fit(&self, width_at_one: f64, height_at_one: f64, preferred: f64, canvas_width: f64, canvas_height: f64) -> f64 {
        if width_at_one <= 0.0 || height_at_one <= 0.0 {
            return preferred;
        }

        let available_width = canvas_width - self.padding;
        let available_height = canvas_height - self.padding;
        if available_width <= 0.0 || available_height <= 0.0 {
            return self.min_font_size.min(preferred);
        }

        let max_from_width = available_width / width_at_one;
        let max_from_height = available_height / height_at_one;

        max_from_width
            .min(max_from_height)
            .min(preferred)
            .max(self.min_font_size.min(preferred))
    }

    /// Line height in pixels for a given font size.
    #[inline]
    pub fn line_height(&self, font_size: f64) -> f64 {
        font_size * self.line_height_ratio
    }
}

/// Display columns of a symbol: wide East Asian glyphs count as two.
pub fn display_columns(text: &str) -> usize {
    text.chars().map(|c| if is_wide(c) { 2 } else { 1 }).sum()
}

fn is_wide(c: char) -> bool {
    matches!(c as u32,
        0x1100..=0x115F
        | 0x2E80..=0x303E
        | 0x3041..=0x33FF
        | 0x3400..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_fit_never_enlarges() {
        let sizing = FontSizing::default();
        assert_eq!(sizing.fit(1.0, 1.0, 48.0, 2000.0, 2000.0), 48.0);
    }

    #[test]
    fn test_fit_width_bound() {
        let sizing = FontSizing::default();
        // (200 - 20) / 6 = 30
        assert_abs_diff_eq!(sizing.fit(6.0, 1.11, 48.0, 200.0, 100.0), 30.0);
    }

    #[test]
    fn test_fit_height_bound() {
        let sizing = FontSizing::default();
        // (100 - 20) / 2 = 40
        assert_abs_diff_eq!(sizing.fit(1.0, 2.0, 48.0, 200.0, 100.0), 40.0);
    }

    #[test]
    fn test_fit_min_clamp() {
        let sizing = FontSizing::default();
        assert_eq!(sizing.fit(100.0, 1.0, 48.0, 200.0, 100.0), 8.0);
        assert_eq!(sizing.fit(1.0, 1.0, 48.0, 10.0, 10.0), 8.0);
    }

    #[test]
    fn test_estimate_zero_columns() {
        assert_eq!(FontSizing::default().estimate(0, 48.0, 200.0, 100.0), 48.0);
    }

    #[test]
    fn test_display_columns() {
        assert_eq!(display_columns("(^_-)"), 5);
        assert_eq!(display_columns("(ツ)"), 4);
        assert_eq!(display_columns("┬─┬ノ( º _ ºノ)"), 15);
    }
}
