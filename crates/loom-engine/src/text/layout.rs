use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::coords::Rect;
use crate::paint::Color;

use super::attribute::{Attribute, OpenTypeFeatures, Underline, UnderlineColor};
use super::attributed_string::AttributedString;
use super::font_system::{points_to_pixels, FontDescriptor, FontSystem, LineMetrics};
use super::utf16::Utf16Map;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Input to [`TextLayout::new`].
#[derive(Debug, Clone)]
pub struct TextLayoutParams {
    pub string: AttributedString,
    pub default_font: FontDescriptor,
    /// Wrap width in pixels. Negative disables wrapping.
    pub width: f64,
    pub align: TextAlign,
}

impl TextLayoutParams {
    pub fn new(string: AttributedString, default_font: FontDescriptor) -> Self {
        Self { string, default_font, width: -1.0, align: TextAlign::Left }
    }

    pub fn width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }
}

/// Drawing effects a run carries besides its font.
///
/// Identical combinations are shared: a layout hands out one
/// `Rc<TextEffects>` per distinct value.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextEffects {
    pub color: Option<Color>,
    pub underline: Underline,
    pub underline_color: Option<UnderlineColor>,
}

type EffectsKey = (Option<[u64; 4]>, Underline, Option<(u8, Option<[u64; 4]>)>);

impl TextEffects {
    fn is_plain(&self) -> bool {
        self.color.is_none() && self.underline == Underline::None && self.underline_color.is_none()
    }

    fn key(&self) -> EffectsKey {
        let underline_color = self.underline_color.map(|c| match c {
            UnderlineColor::Custom(color) => (0, Some(color.bits())),
            UnderlineColor::Spelling => (1, None),
            UnderlineColor::Grammar => (2, None),
            UnderlineColor::Auxiliary => (3, None),
        });
        (self.color.map(Color::bits), self.underline, underline_color)
    }
}

impl PartialEq for TextEffects {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for TextEffects {}

impl Hash for TextEffects {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// A maximal range (UTF-16 offsets) with uniform font and effects.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub start: usize,
    pub end: usize,
    pub font: FontDescriptor,
    pub features: OpenTypeFeatures,
    pub effects: Option<Rc<TextEffects>>,
}

/// A background fill that has to be painted under the text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundRegion {
    pub start: usize,
    pub end: usize,
    pub color: Color,
}

/// One laid out line. Offsets are UTF-16; `end` excludes the line break.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextLine {
    pub start: usize,
    pub end: usize,
    pub x: f64,
    pub y: f64,
    /// Width without trailing whitespace.
    pub width: f64,
    pub height: f64,
    pub baseline: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Glyph {
    u16_start: usize,
    x: f64,
    advance: f64,
}

/// Attributed text broken into runs and lines.
///
/// All positions are relative to the layout origin.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    text: String,
    map: Utf16Map,
    runs: Vec<TextRun>,
    effects: HashMap<TextEffects, Rc<TextEffects>>,
    backgrounds: Vec<BackgroundRegion>,
    lines: Vec<TextLine>,
    glyphs: Vec<Glyph>,
    width: f64,
    height: f64,
}

struct CharInfo {
    u16_start: usize,
    advance: f64,
    whitespace: bool,
    newline: bool,
    run: usize,
}

impl TextLayout {
    pub fn new(params: &TextLayoutParams, fonts: &FontSystem) -> Self {
        let text = params.string.as_str().to_owned();
        let map = Utf16Map::new(&text);

        let mut effects = HashMap::new();
        let runs = build_runs(&params.string, &params.default_font, &map, &mut effects);
        let backgrounds = params
            .string
            .spans()
            .iter()
            .filter_map(|span| match span.attr {
                Attribute::Background(color) => Some(BackgroundRegion {
                    start: map.to_utf16(span.start),
                    end: map.to_utf16(span.end),
                    color,
                }),
                _ => None,
            })
            .collect();

        let mut layout = Self {
            text,
            map,
            runs,
            effects,
            backgrounds,
            lines: Vec::new(),
            glyphs: Vec::new(),
            width: 0.0,
            height: 0.0,
        };
        layout.break_lines(params, fonts);
        log::trace!(
            "text layout: {} runs, {} lines, extents {}x{}",
            layout.runs.len(),
            layout.lines.len(),
            layout.width,
            layout.height
        );
        layout
    }

    fn run_at(&self, u16_offset: usize) -> usize {
        self.runs.partition_point(|r| r.end <= u16_offset).min(self.runs.len().saturating_sub(1))
    }

    fn break_lines(&mut self, params: &TextLayoutParams, fonts: &FontSystem) {
        let chars: Vec<CharInfo> = self
            .text
            .char_indices()
            .map(|(byte, ch)| {
                let u16_start = self.map.to_utf16(byte);
                let run = self.run_at(u16_start);
                let font = &self.runs[run].font;
                let advance = if ch == '\n' {
                    0.0
                } else {
                    fonts.advance(&font.family, ch, points_to_pixels(font.size))
                };
                CharInfo {
                    u16_start,
                    advance,
                    whitespace: ch.is_whitespace(),
                    newline: ch == '\n',
                    run,
                }
            })
            .collect();

        let wrap = params.width >= 0.0;
        // (first char, end char) per line
        let mut spans: Vec<(usize, usize)> = Vec::new();
        let mut line_start = 0;
        let mut line_width: f64 = 0.0;
        let mut last_break: Option<usize> = None;
        let mut i = 0;
        while i < chars.len() {
            let c = &chars[i];
            if c.newline {
                spans.push((line_start, i));
                line_start = i + 1;
                line_width = 0.0;
                last_break = None;
                i += 1;
                continue;
            }
            if wrap && !c.whitespace && i > line_start && line_width + c.advance > params.width {
                match last_break.take() {
                    Some(b) if b > line_start => {
                        spans.push((line_start, b));
                        line_start = b;
                        line_width = chars[b..i].iter().map(|c| c.advance).sum();
                    }
                    _ => {
                        // Word longer than the line: break inside it.
                        spans.push((line_start, i));
                        line_start = i;
                        line_width = 0.0;
                    }
                }
                continue;
            }
            line_width += c.advance;
            if c.whitespace {
                last_break = Some(i + 1);
            }
            i += 1;
        }
        spans.push((line_start, chars.len()));

        let n16 = self.map.utf16_len();
        let u16_at = |i: usize| chars.get(i).map_or(n16, |c| c.u16_start);

        let mut lines = Vec::with_capacity(spans.len());
        let mut y = 0.0;
        for &(first, last) in &spans {
            let content = &chars[first..last];
            let visible = content.iter().rposition(|c| !c.whitespace).map_or(0, |p| p + 1);
            let width: f64 = content[..visible].iter().map(|c| c.advance).sum();

            let metrics = if content.is_empty() {
                let run = self.runs.get(self.run_at(u16_at(first)));
                let font = run.map_or(&params.default_font, |r| &r.font);
                fonts.line_metrics(&font.family, points_to_pixels(font.size))
            } else {
                let mut m = LineMetrics { ascent: 0.0, descent: 0.0, line_gap: 0.0 };
                for c in content {
                    let font = &self.runs[c.run].font;
                    let rm = fonts.line_metrics(&font.family, points_to_pixels(font.size));
                    m.ascent = m.ascent.max(rm.ascent);
                    m.descent = m.descent.max(rm.descent);
                    m.line_gap = m.line_gap.max(rm.line_gap);
                }
                m
            };

            lines.push(TextLine {
                start: u16_at(first),
                end: u16_at(last),
                x: 0.0,
                y,
                width,
                height: metrics.height(),
                baseline: y + metrics.ascent,
            });
            y += metrics.height();
        }

        let max_width = lines.iter().map(|l| l.width).fold(0.0, f64::max);
        let box_width = if wrap { params.width } else { max_width };
        let mut glyphs = Vec::with_capacity(chars.len());
        for (line, &(first, last)) in lines.iter_mut().zip(&spans) {
            line.x = match params.align {
                TextAlign::Left => 0.0,
                TextAlign::Center => (box_width - line.width) / 2.0,
                TextAlign::Right => box_width - line.width,
            };
            let mut x = line.x;
            for c in &chars[first..last] {
                glyphs.push(Glyph { u16_start: c.u16_start, x, advance: c.advance });
                x += c.advance;
            }
        }

        self.width = max_width;
        self.height = y;
        self.lines = lines;
        self.glyphs = glyphs;
    }

    // ── queries ───────────────────────────────────────────────────────────

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// `(width, height)` of the laid out text, trailing whitespace excluded.
    pub fn extents(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn runs(&self) -> &[TextRun] {
        &self.runs
    }

    pub fn lines(&self) -> &[TextLine] {
        &self.lines
    }

    pub fn backgrounds(&self) -> &[BackgroundRegion] {
        &self.backgrounds
    }

    /// Number of distinct effect combinations in use.
    pub fn effects_count(&self) -> usize {
        self.effects.len()
    }

    pub fn utf8_to_utf16(&self, byte_offset: usize) -> usize {
        self.map.to_utf16(byte_offset)
    }

    pub fn utf16_to_utf8(&self, u16_offset: usize) -> usize {
        self.map.to_utf8(u16_offset)
    }

    pub fn line_rects(&self) -> Vec<Rect> {
        self.lines.iter().map(|l| Rect::new(l.x, l.y, l.width, l.height)).collect()
    }

    /// Rectangles to fill before the glyphs, one per background region per
    /// line it touches.
    pub fn background_rects(&self) -> Vec<(Rect, Color)> {
        let mut out = Vec::new();
        for bg in &self.backgrounds {
            for line in &self.lines {
                let (start, end) = (bg.start.max(line.start), bg.end.min(line.end));
                if start >= end {
                    continue;
                }
                let mut covered = self
                    .glyphs
                    .iter()
                    .filter(|g| g.u16_start >= start && g.u16_start < end);
                let Some(first) = covered.next() else {
                    continue;
                };
                let left = first.x;
                let right = covered.last().map_or(first.x + first.advance, |g| g.x + g.advance);
                out.push((Rect::new(left, line.y, right - left, line.height), bg.color));
            }
        }
        out
    }
}

fn build_runs(
    string: &AttributedString,
    default_font: &FontDescriptor,
    map: &Utf16Map,
    interned: &mut HashMap<TextEffects, Rc<TextEffects>>,
) -> Vec<TextRun> {
    let spans: Vec<(usize, usize, &Attribute)> = string
        .spans()
        .iter()
        .map(|s| (map.to_utf16(s.start), map.to_utf16(s.end), &s.attr))
        .collect();

    let mut bounds = vec![0, map.utf16_len()];
    for &(s, e, _) in &spans {
        bounds.push(s);
        bounds.push(e);
    }
    bounds.sort_unstable();
    bounds.dedup();

    let mut runs: Vec<TextRun> = Vec::new();
    for w in bounds.windows(2) {
        let (a, b) = (w[0], w[1]);
        let mut font = default_font.clone();
        let mut features = OpenTypeFeatures::new();
        let mut fx = TextEffects::default();
        for &(_, _, attr) in spans.iter().filter(|(s, e, _)| *s <= a && *e >= b) {
            match attr {
                Attribute::Family(f) => font.family = f.clone(),
                Attribute::Size(s) => font.size = *s,
                Attribute::Weight(w) => font.weight = *w,
                Attribute::Italic(i) => font.italic = *i,
                Attribute::Stretch(s) => font.stretch = *s,
                Attribute::Features(f) => features = f.clone(),
                Attribute::Color(c) => fx.color = Some(*c),
                Attribute::Underline(u) => fx.underline = *u,
                Attribute::UnderlineColor(c) => fx.underline_color = Some(*c),
                Attribute::Background(_) => {}
            }
        }
        let effects = (!fx.is_plain())
            .then(|| interned.entry(fx).or_insert_with(|| Rc::new(fx)).clone());

        if let Some(prev) = runs.last_mut() {
            let same_effects = match (&prev.effects, &effects) {
                (Some(x), Some(y)) => Rc::ptr_eq(x, y),
                (None, None) => true,
                _ => false,
            };
            if prev.end == a && prev.font == font && prev.features == features && same_effects {
                prev.end = b;
                continue;
            }
        }
        runs.push(TextRun { start: a, end: b, font, features, effects });
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    // Unloaded family: 12pt = 16px, advance 8px, line height 16px.
    fn font() -> FontDescriptor {
        FontDescriptor::new("Test", 12.0)
    }

    fn layout(s: AttributedString, width: f64, align: TextAlign) -> TextLayout {
        let params = TextLayoutParams::new(s, font()).width(width).align(align);
        TextLayout::new(&params, &FontSystem::new())
    }

    fn red() -> Color {
        Color::new(1.0, 0.0, 0.0, 1.0)
    }

    // ── lines ─────────────────────────────────────────────────────────────

    #[test]
    fn empty_text_has_one_line() {
        let l = layout(AttributedString::new(""), -1.0, TextAlign::Left);
        assert_eq!(l.lines().len(), 1);
        assert_eq!(l.extents(), (0.0, 16.0));
    }

    #[test]
    fn wraps_at_whitespace() {
        let l = layout(AttributedString::new("aaa bbb ccc"), 60.0, TextAlign::Left);
        assert_eq!(l.lines().len(), 2);
        assert_eq!((l.lines()[0].start, l.lines()[0].end), (0, 8));
        assert_eq!(l.lines()[0].width, 56.0);
        assert_eq!(l.lines()[1].y, 16.0);
        assert_eq!(l.extents(), (56.0, 32.0));
    }

    #[test]
    fn negative_width_never_wraps() {
        let l = layout(AttributedString::new("aaa bbb ccc"), -1.0, TextAlign::Left);
        assert_eq!(l.lines().len(), 1);
        assert_eq!(l.extents().0, 88.0);
    }

    #[test]
    fn long_word_breaks_inside() {
        let l = layout(AttributedString::new("abcdef"), 20.0, TextAlign::Left);
        assert_eq!(l.lines().len(), 3);
        assert!(l.lines().iter().all(|line| line.width <= 20.0));
    }

    #[test]
    fn newline_forces_break() {
        let l = layout(AttributedString::new("a\nb\n"), -1.0, TextAlign::Left);
        assert_eq!(l.lines().len(), 3);
        assert_eq!((l.lines()[1].start, l.lines()[1].end), (2, 3));
        assert_eq!(l.lines()[2].width, 0.0);
    }

    #[test]
    fn alignment_offsets_lines() {
        let c = layout(AttributedString::new("ab"), 100.0, TextAlign::Center);
        assert_eq!(c.lines()[0].x, 42.0);
        let r = layout(AttributedString::new("ab"), 100.0, TextAlign::Right);
        assert_eq!(r.lines()[0].x, 84.0);
    }

    #[test]
    fn larger_size_raises_line_height() {
        let mut s = AttributedString::new("ab");
        s.set_attribute(Attribute::Size(24.0), 1, 2).unwrap();
        let l = layout(s, -1.0, TextAlign::Left);
        assert_eq!(l.lines()[0].height, 32.0);
        assert_eq!(l.extents().0, 8.0 + 16.0);
    }

    // ── runs and effects ──────────────────────────────────────────────────

    #[test]
    fn identical_effects_are_shared() {
        let mut s = AttributedString::new("abcdefgh");
        s.set_attribute(Attribute::Color(red()), 0, 2).unwrap();
        s.set_attribute(Attribute::Color(red()), 4, 6).unwrap();
        let l = layout(s, -1.0, TextAlign::Left);
        assert_eq!(l.runs().len(), 4);
        assert_eq!(l.effects_count(), 1);
        let (a, b) = (l.runs()[0].effects.as_ref().unwrap(), l.runs()[2].effects.as_ref().unwrap());
        assert!(Rc::ptr_eq(a, b));
        assert!(l.runs()[1].effects.is_none());
    }

    #[test]
    fn overlapping_effects_combine() {
        let mut s = AttributedString::new("abcdef");
        s.set_attribute(Attribute::Color(red()), 0, 4).unwrap();
        s.set_attribute(Attribute::Underline(Underline::Single), 2, 6).unwrap();
        let l = layout(s, -1.0, TextAlign::Left);
        assert_eq!(l.effects_count(), 3);
        let mid = l.runs()[1].effects.as_ref().unwrap();
        assert_eq!(mid.color, Some(red()));
        assert_eq!(mid.underline, Underline::Single);
    }

    #[test]
    fn scalar_attributes_set_run_font() {
        let mut s = AttributedString::new("abcd");
        s.set_attribute(Attribute::Family("Mono".into()), 2, 4).unwrap();
        let l = layout(s, -1.0, TextAlign::Left);
        assert_eq!(l.runs().len(), 2);
        assert_eq!(l.runs()[1].font.family, "Mono");
        assert_eq!(l.runs()[0].font.family, "Test");
    }

    #[test]
    fn ranges_are_translated_to_utf16() {
        let mut s = AttributedString::new("é😀x");
        s.set_attribute(Attribute::Color(red()), 2, 6).unwrap();
        let l = layout(s, -1.0, TextAlign::Left);
        assert_eq!((l.runs()[1].start, l.runs()[1].end), (1, 3));
        assert_eq!(l.utf8_to_utf16(6), 3);
        assert_eq!(l.utf16_to_utf8(3), 6);
    }

    // ── backgrounds ───────────────────────────────────────────────────────

    #[test]
    fn background_is_collected_not_a_run_property() {
        let mut s = AttributedString::new("abcd");
        s.set_attribute(Attribute::Background(red()), 1, 3).unwrap();
        let l = layout(s, -1.0, TextAlign::Left);
        assert_eq!(l.runs().len(), 1);
        assert_eq!(l.backgrounds(), &[BackgroundRegion { start: 1, end: 3, color: red() }]);
        assert_eq!(l.background_rects(), vec![(Rect::new(8.0, 0.0, 16.0, 16.0), red())]);
    }

    #[test]
    fn background_spanning_lines_yields_one_rect_per_line() {
        let mut s = AttributedString::new("ab\ncd");
        s.set_attribute(Attribute::Background(red()), 1, 4).unwrap();
        let l = layout(s, -1.0, TextAlign::Left);
        let rects = l.background_rects();
        assert_eq!(rects.len(), 2);
        assert_eq!(rects[1].0, Rect::new(0.0, 16.0, 8.0, 16.0));
    }
}
