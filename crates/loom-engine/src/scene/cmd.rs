use std::rc::Rc;

use crate::coords::{Point, Rect};
use crate::draw::{DrawPath, StrokeParams};
use crate::paint::{Bitmap, Brush};
use crate::text::TextLayout;

/// Renderer-agnostic draw command.
///
/// Paths are stored already ended; brushes are already resolved, so a
/// backend never has to validate either.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Fill { path: Rc<DrawPath>, brush: Brush },
    Stroke { path: Rc<DrawPath>, brush: Brush, params: StrokeParams },
    Text(TextCmd),
    /// Bitmap scaled to fill `dest`.
    Bitmap { bitmap: Bitmap, dest: Rect },
}

/// A laid-out text block placed with its top-left corner at `origin`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextCmd {
    pub layout: Rc<TextLayout>,
    pub origin: Point,
}
