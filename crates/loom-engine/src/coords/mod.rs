//! Geometry shared by the draw engine, text layout and renderers.
//!
//! Drawing space:
//! - device-independent pixels, `f64`
//! - origin top-left, +X right, +Y down

mod matrix;
mod point;
mod rect;

pub use matrix::Matrix;
pub use point::Point;
pub use rect::Rect;
