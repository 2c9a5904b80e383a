//! Paint sources: colors, gradients, the brushes built from them and
//! bitmaps.

pub mod bitmap;
pub mod brush;
pub mod color;
pub mod gradient;

pub use bitmap::Bitmap;
pub use brush::Brush;
pub use color::Color;
pub use gradient::{sample_stops, GradientStop, LinearGradient, RadialGradient};
