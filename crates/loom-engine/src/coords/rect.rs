use super::Point;

/// Axis-aligned rectangle in drawing space (top-left origin, +y down).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Point,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { origin: Point::new(x, y), width, height }
    }

    /// Smallest rectangle spanning two corner points, in any order.
    pub fn from_points(a: Point, b: Point) -> Self {
        Rect::new(a.x.min(b.x), a.y.min(b.y), (a.x - b.x).abs(), (a.y - b.y).abs())
    }

    #[inline]
    pub fn min(self) -> Point {
        self.origin
    }

    #[inline]
    pub fn max(self) -> Point {
        Point::new(self.origin.x + self.width, self.origin.y + self.height)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Flips negative extents so width/height are non-negative.
    #[inline]
    pub fn normalized(self) -> Self {
        let (mut x, mut w) = (self.origin.x, self.width);
        let (mut y, mut h) = (self.origin.y, self.height);
        if w < 0.0 {
            x += w;
            w = -w;
        }
        if h < 0.0 {
            y += h;
            h = -h;
        }
        Rect::new(x, y, w, h)
    }

    /// Half-open containment: [min, max).
    #[inline]
    pub fn contains(self, p: Point) -> bool {
        let r = self.normalized();
        p.x >= r.origin.x
            && p.y >= r.origin.y
            && p.x < r.origin.x + r.width
            && p.y < r.origin.y + r.height
    }

    pub fn intersect(self, other: Rect) -> Option<Rect> {
        let a = self.normalized();
        let b = other.normalized();

        let x0 = a.origin.x.max(b.origin.x);
        let y0 = a.origin.y.max(b.origin.y);
        let x1 = a.max().x.min(b.max().x);
        let y1 = a.max().y.min(b.max().y);

        if x1 - x0 <= 0.0 || y1 - y0 <= 0.0 {
            None
        } else {
            Some(Rect::new(x0, y0, x1 - x0, y1 - y0))
        }
    }

    pub fn union(self, other: Rect) -> Rect {
        let a = self.normalized();
        let b = other.normalized();
        let x0 = a.origin.x.min(b.origin.x);
        let y0 = a.origin.y.min(b.origin.y);
        let x1 = a.max().x.max(b.max().x);
        let y1 = a.max().y.max(b.max().y);
        Rect::new(x0, y0, x1 - x0, y1 - y0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: f64, y: f64, w: f64, h: f64) -> Rect {
        Rect::new(x, y, w, h)
    }

    // ── normalized ────────────────────────────────────────────────────────

    #[test]
    fn normalized_negative_width_moves_origin() {
        let n = r(10.0, 0.0, -4.0, 5.0).normalized();
        assert_eq!(n, r(6.0, 0.0, 4.0, 5.0));
    }

    #[test]
    fn from_points_any_order() {
        let a = Rect::from_points(Point::new(5.0, 1.0), Point::new(1.0, 4.0));
        assert_eq!(a, r(1.0, 1.0, 4.0, 3.0));
    }

    // ── contains ──────────────────────────────────────────────────────────

    #[test]
    fn contains_is_half_open() {
        let rect = r(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains(Point::new(0.0, 0.0)));
        assert!(rect.contains(Point::new(9.5, 9.5)));
        assert!(!rect.contains(Point::new(10.0, 10.0)));
    }

    // ── intersect / union ─────────────────────────────────────────────────

    #[test]
    fn intersect_overlapping() {
        let i = r(0.0, 0.0, 10.0, 10.0).intersect(r(5.0, 5.0, 10.0, 10.0));
        assert_eq!(i, Some(r(5.0, 5.0, 5.0, 5.0)));
    }

    #[test]
    fn intersect_touching_edge_is_none() {
        assert!(r(0.0, 0.0, 10.0, 10.0).intersect(r(10.0, 0.0, 5.0, 5.0)).is_none());
    }

    #[test]
    fn union_spans_both() {
        let u = r(0.0, 0.0, 2.0, 2.0).union(r(5.0, 1.0, 1.0, 4.0));
        assert_eq!(u, r(0.0, 0.0, 6.0, 5.0));
    }
}
