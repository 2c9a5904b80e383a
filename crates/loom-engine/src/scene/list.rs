use std::rc::Rc;

use crate::coords::{Matrix, Point};
use crate::draw::ClipGeometry;

use super::DrawCmd;

/// A recorded command together with the state it was issued under.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub cmd: DrawCmd,
    /// User-to-device transform at record time.
    pub transform: Matrix,
    /// Clip region in device space. `None` = unclipped.
    pub clip: Option<Rc<ClipGeometry>>,
}

impl DrawItem {
    /// Whether this item paints the device-space point `p`.
    ///
    /// Pure-geometry coverage: the command's shape intersected with its clip.
    /// Used by tests and by hosts that hit-test custom drawing.
    pub fn covers(&self, p: Point) -> bool {
        if let Some(clip) = &self.clip {
            if !clip.contains(p) {
                return false;
            }
        }
        let mut inv = self.transform;
        if !inv.invert() {
            return false;
        }
        let q = inv.transform_point(p);
        match &self.cmd {
            DrawCmd::Fill { path, .. } => path.contains(q),
            DrawCmd::Stroke { path, params, .. } => path
                .flatten(crate::draw::DEFAULT_TOLERANCE)
                .iter()
                .any(|poly| poly.distance_to(q) <= params.half_width()),
            DrawCmd::Text(text) => {
                let local = q - text.origin;
                text.layout.line_rects().iter().any(|r| r.contains(local))
            }
            DrawCmd::Bitmap { dest, .. } => dest.contains(q),
        }
    }
}

/// Recorded draw stream for one paint pass, in issue order.
#[derive(Debug, Default, Clone)]
pub struct DrawList {
    items: Vec<DrawItem>,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops recorded items but keeps the allocation.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[inline]
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn push(&mut self, cmd: DrawCmd, transform: Matrix, clip: Option<Rc<ClipGeometry>>) {
        self.items.push(DrawItem { cmd, transform, clip });
    }

    /// Iterates text commands only; handy for assertions in paint tests.
    pub fn texts(&self) -> impl Iterator<Item = &super::TextCmd> {
        self.items.iter().filter_map(|i| match &i.cmd {
            DrawCmd::Text(t) => Some(t),
            _ => None,
        })
    }
}
