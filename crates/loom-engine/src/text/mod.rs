//! Fonts, attributed strings and text layout.
//!
//! Offsets into an [`AttributedString`] are UTF-8 bytes. A [`TextLayout`]
//! works in UTF-16 code units internally and exposes both mappings.

mod attribute;
mod attributed_string;
mod font_system;
mod layout;
mod utf16;

pub use attribute::{
    Attribute, AttributeKind, OpenTypeFeatures, TextItalic, TextStretch, TextWeight, Underline,
    UnderlineColor,
};
pub use attributed_string::{AttributeSpan, AttributedString, TextError};
pub use font_system::{
    points_to_pixels, FontDescriptor, FontId, FontLoadError, FontSystem, LineMetrics,
};
pub use layout::{
    BackgroundRegion, TextAlign, TextEffects, TextLayout, TextLayoutParams, TextLine, TextRun,
};
pub use utf16::Utf16Map;
