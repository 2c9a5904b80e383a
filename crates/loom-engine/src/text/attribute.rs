use std::collections::BTreeMap;

use crate::paint::Color;

/// Font weight on the usual 0–1000 scale.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct TextWeight(pub u16);

impl TextWeight {
    pub const MINIMUM: TextWeight = TextWeight(0);
    pub const THIN: TextWeight = TextWeight(100);
    pub const ULTRA_LIGHT: TextWeight = TextWeight(200);
    pub const LIGHT: TextWeight = TextWeight(300);
    pub const BOOK: TextWeight = TextWeight(350);
    pub const NORMAL: TextWeight = TextWeight(400);
    pub const MEDIUM: TextWeight = TextWeight(500);
    pub const SEMI_BOLD: TextWeight = TextWeight(600);
    pub const BOLD: TextWeight = TextWeight(700);
    pub const ULTRA_BOLD: TextWeight = TextWeight(800);
    pub const HEAVY: TextWeight = TextWeight(900);
    pub const ULTRA_HEAVY: TextWeight = TextWeight(950);
    pub const MAXIMUM: TextWeight = TextWeight(1000);
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum TextItalic {
    #[default]
    Normal,
    Oblique,
    Italic,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum TextStretch {
    UltraCondensed,
    ExtraCondensed,
    Condensed,
    SemiCondensed,
    #[default]
    Normal,
    SemiExpanded,
    Expanded,
    ExtraExpanded,
    UltraExpanded,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum Underline {
    #[default]
    None,
    Single,
    Double,
    /// Wavy line used for spelling/grammar suggestions.
    Suggestion,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UnderlineColor {
    Custom(Color),
    Spelling,
    Grammar,
    Auxiliary,
}

/// OpenType feature tags and their values, e.g. `liga = 0`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct OpenTypeFeatures {
    tags: BTreeMap<[u8; 4], u32>,
}

impl OpenTypeFeatures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `tag` to `value`, replacing any previous value.
    pub fn add(&mut self, tag: [u8; 4], value: u32) {
        self.tags.insert(tag, value);
    }

    pub fn remove(&mut self, tag: [u8; 4]) {
        self.tags.remove(&tag);
    }

    pub fn get(&self, tag: [u8; 4]) -> Option<u32> {
        self.tags.get(&tag).copied()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Visits tags in byte order until `f` returns `false`.
    pub fn for_each(&self, mut f: impl FnMut([u8; 4], u32) -> bool) {
        for (tag, value) in &self.tags {
            if !f(*tag, *value) {
                break;
            }
        }
    }
}

/// A single styling attribute applied to a byte range of an
/// [`AttributedString`](super::AttributedString).
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    Family(String),
    /// Size in points.
    Size(f64),
    Weight(TextWeight),
    Italic(TextItalic),
    Stretch(TextStretch),
    Color(Color),
    Background(Color),
    Underline(Underline),
    UnderlineColor(UnderlineColor),
    Features(OpenTypeFeatures),
}

/// Discriminant of [`Attribute`]; at most one span of each kind covers a byte.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum AttributeKind {
    Family,
    Size,
    Weight,
    Italic,
    Stretch,
    Color,
    Background,
    Underline,
    UnderlineColor,
    Features,
}

impl Attribute {
    pub fn kind(&self) -> AttributeKind {
        match self {
            Attribute::Family(_) => AttributeKind::Family,
            Attribute::Size(_) => AttributeKind::Size,
            Attribute::Weight(_) => AttributeKind::Weight,
            Attribute::Italic(_) => AttributeKind::Italic,
            Attribute::Stretch(_) => AttributeKind::Stretch,
            Attribute::Color(_) => AttributeKind::Color,
            Attribute::Background(_) => AttributeKind::Background,
            Attribute::Underline(_) => AttributeKind::Underline,
            Attribute::UnderlineColor(_) => AttributeKind::UnderlineColor,
            Attribute::Features(_) => AttributeKind::Features,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn features_compare_by_content() {
        let mut a = OpenTypeFeatures::new();
        a.add(*b"liga", 0);
        a.add(*b"kern", 1);
        let mut b = OpenTypeFeatures::new();
        b.add(*b"kern", 1);
        b.add(*b"liga", 0);
        assert_eq!(a, b);
        b.remove(*b"liga");
        assert_ne!(a, b);
        assert_eq!(b.get(*b"kern"), Some(1));
    }

    #[test]
    fn for_each_stops_early() {
        let mut f = OpenTypeFeatures::new();
        f.add(*b"aaaa", 1);
        f.add(*b"bbbb", 2);
        let mut seen = Vec::new();
        f.for_each(|tag, _| {
            seen.push(tag);
            false
        });
        assert_eq!(seen, vec![*b"aaaa"]);
    }
}
