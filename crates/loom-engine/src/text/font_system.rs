use std::collections::HashMap;

use thiserror::Error;

use super::attribute::{TextItalic, TextStretch, TextWeight};

/// Error returned by [`FontSystem::load_font`].
#[derive(Debug, Clone, Error)]
#[error("failed to load font family {family:?}: {reason}")]
pub struct FontLoadError {
    pub family: String,
    pub reason: String,
}

/// Opaque handle to a font loaded into a [`FontSystem`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FontId(pub(crate) usize);

/// The default font of a text layout, sized in points.
#[derive(Debug, Clone, PartialEq)]
pub struct FontDescriptor {
    pub family: String,
    pub size: f64,
    pub weight: TextWeight,
    pub italic: TextItalic,
    pub stretch: TextStretch,
}

impl FontDescriptor {
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: family.into(),
            size,
            weight: TextWeight::NORMAL,
            italic: TextItalic::Normal,
            stretch: TextStretch::Normal,
        }
    }
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self::new("Segoe UI", 9.0)
    }
}

/// Converts a point size to device-independent pixels (96 per inch).
#[inline]
pub fn points_to_pixels(points: f64) -> f64 {
    points * (96.0 / 72.0)
}

/// Vertical metrics of one line of text at a given pixel size.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LineMetrics {
    pub ascent: f64,
    pub descent: f64,
    pub line_gap: f64,
}

impl LineMetrics {
    #[inline]
    pub fn height(&self) -> f64 {
        self.ascent + self.descent + self.line_gap
    }
}

/// Fonts loaded by family name.
///
/// Families that were never loaded still measure, using a fixed fallback
/// metric (half an em per character, ascent 0.8 em, descent 0.2 em). That
/// keeps layout deterministic on machines without font files.
pub struct FontSystem {
    fonts: Vec<fontdue::Font>,
    families: HashMap<String, FontId>,
}

impl FontSystem {
    pub fn new() -> Self {
        Self { fonts: Vec::new(), families: HashMap::new() }
    }

    /// Parses a TrueType/OpenType font and registers it under `family`.
    /// Re-registering a family replaces the previous face.
    pub fn load_font(&mut self, family: &str, bytes: &[u8]) -> Result<FontId, FontLoadError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default()).map_err(|e| {
            FontLoadError { family: family.to_owned(), reason: e.to_string() }
        })?;
        let id = FontId(self.fonts.len());
        self.fonts.push(font);
        self.families.insert(family.to_owned(), id);
        log::debug!("loaded font family {family:?} as {id:?}");
        Ok(id)
    }

    pub fn family(&self, family: &str) -> Option<FontId> {
        self.families.get(family).copied()
    }

    fn font(&self, family: &str) -> Option<&fontdue::Font> {
        self.family(family).and_then(|id| self.fonts.get(id.0))
    }

    /// Horizontal advance of `ch` at `px` pixels.
    pub fn advance(&self, family: &str, ch: char, px: f64) -> f64 {
        match self.font(family) {
            Some(font) => font.metrics(ch, px as f32).advance_width as f64,
            None => px * 0.5,
        }
    }

    pub fn line_metrics(&self, family: &str, px: f64) -> LineMetrics {
        let fallback = LineMetrics { ascent: px * 0.8, descent: px * 0.2, line_gap: 0.0 };
        let Some(font) = self.font(family) else {
            return fallback;
        };
        match font.horizontal_line_metrics(px as f32) {
            Some(m) => LineMetrics {
                ascent: m.ascent as f64,
                descent: -(m.descent as f64),
                line_gap: m.line_gap as f64,
            },
            None => fallback,
        }
    }

    /// Width of a single unwrapped line of `text`.
    pub fn measure_line(&self, text: &str, font: &FontDescriptor) -> f64 {
        let px = points_to_pixels(font.size);
        text.chars().map(|c| self.advance(&font.family, c, px)).sum()
    }
}

impl Default for FontSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_family_uses_fallback_metrics() {
        let fonts = FontSystem::new();
        assert_eq!(fonts.advance("Nope", 'x', 20.0), 10.0);
        let m = fonts.line_metrics("Nope", 20.0);
        assert_eq!(m.height(), 20.0);
    }

    #[test]
    fn garbage_bytes_fail_to_load() {
        let mut fonts = FontSystem::new();
        let err = fonts.load_font("Broken", &[0, 1, 2, 3]).unwrap_err();
        assert_eq!(err.family, "Broken");
        assert!(fonts.family("Broken").is_none());
    }

    #[test]
    fn point_size_converts_at_96_dpi() {
        assert_eq!(points_to_pixels(12.0), 16.0);
    }

    #[test]
    fn measure_line_sums_advances() {
        let fonts = FontSystem::new();
        // 12pt = 16px, fallback advance = 8px per char
        assert_eq!(fonts.measure_line("abc", &FontDescriptor::new("Any", 12.0)), 24.0);
    }
}
