use std::rc::Rc;

use crate::coords::{Matrix, Point, Rect};

use super::DrawPath;

/// Clip region of a [`DrawContext`](super::DrawContext).
///
/// Repeated clips are not combined eagerly: each call wraps the previous
/// region in an `Intersect` node. Regions are shared between the live state
/// and any saved states, so a `save`/`restore` pair never copies geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum ClipGeometry {
    /// A path in user space plus the transform that was active when it was clipped.
    Path { path: Rc<DrawPath>, transform: Matrix },
    Intersect(Rc<ClipGeometry>, Rc<ClipGeometry>),
}

impl ClipGeometry {
    pub fn from_path(path: Rc<DrawPath>, transform: Matrix) -> Self {
        ClipGeometry::Path { path, transform }
    }

    /// Whether the device-space point survives the clip.
    pub fn contains(&self, p: Point) -> bool {
        match self {
            ClipGeometry::Path { path, transform } => {
                let mut inv = *transform;
                if !inv.invert() {
                    return false;
                }
                path.contains(inv.transform_point(p))
            }
            ClipGeometry::Intersect(a, b) => a.contains(p) && b.contains(p),
        }
    }

    /// Device-space bounding box; `None` when the region is provably empty.
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            ClipGeometry::Path { path, transform } => {
                let b = path.bounds()?;
                let corners = [
                    b.min(),
                    Point::new(b.max().x, b.min().y),
                    b.max(),
                    Point::new(b.min().x, b.max().y),
                ]
                .map(|c| transform.transform_point(c));
                let mut r = Rect::from_points(corners[0], corners[1]);
                for c in &corners[2..] {
                    r = r.union(Rect::from_points(*c, *c));
                }
                Some(r)
            }
            ClipGeometry::Intersect(a, b) => a.bounds()?.intersect(b.bounds()?),
        }
    }

    /// Number of paths combined into this region.
    pub fn depth(&self) -> usize {
        match self {
            ClipGeometry::Path { .. } => 1,
            ClipGeometry::Intersect(a, b) => a.depth() + b.depth(),
        }
    }
}
