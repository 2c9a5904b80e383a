//! loom engine crate.
//!
//! Platform-neutral drawing pieces used by the widget layer: geometry,
//! brushes, paths, a recording draw context with a clip stack, fonts and
//! text layout.

pub mod coords;
pub mod draw;
pub mod logging;
pub mod paint;
pub mod scene;
pub mod text;
