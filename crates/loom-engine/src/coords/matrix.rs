use super::Point;

/// 2D affine transform using the row-vector convention:
///
/// ```text
/// x' = x·m11 + y·m21 + m31
/// y' = x·m12 + y·m22 + m32
/// ```
///
/// Composition reads left to right: `a.multiply(&b)` applies `a` first, then `b`.
/// Every builder method appends its operation, so
/// `Matrix::identity().translated(5, 0).scaled(origin, 2, 2)` moves then scales.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Matrix {
    pub m11: f64,
    pub m12: f64,
    pub m21: f64,
    pub m22: f64,
    pub m31: f64,
    pub m32: f64,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix {
    pub const fn identity() -> Self {
        Self { m11: 1.0, m12: 0.0, m21: 0.0, m22: 1.0, m31: 0.0, m32: 0.0 }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    pub fn translate(&mut self, x: f64, y: f64) {
        let t = Matrix { m31: x, m32: y, ..Matrix::identity() };
        self.multiply(&t);
    }

    /// Scales by `(x, y)` around `center`.
    pub fn scale(&mut self, center: Point, x: f64, y: f64) {
        let s = Matrix {
            m11: x,
            m22: y,
            m31: center.x - x * center.x,
            m32: center.y - y * center.y,
            ..Matrix::identity()
        };
        self.multiply(&s);
    }

    /// Rotates by `radians` around `center`. Positive angles turn clockwise
    /// on screen because +y points down.
    pub fn rotate(&mut self, center: Point, radians: f64) {
        let (sin, cos) = radians.sin_cos();
        let r = Matrix {
            m11: cos,
            m12: sin,
            m21: -sin,
            m22: cos,
            m31: center.x - center.x * cos + center.y * sin,
            m32: center.y - center.x * sin - center.y * cos,
        };
        self.multiply(&r);
    }

    /// Skews by the given angles (radians) around `center`.
    pub fn skew(&mut self, center: Point, x_amount: f64, y_amount: f64) {
        let tx = x_amount.tan();
        let ty = y_amount.tan();
        let k = Matrix {
            m11: 1.0,
            m12: ty,
            m21: tx,
            m22: 1.0,
            m31: -center.y * tx,
            m32: -center.x * ty,
        };
        self.multiply(&k);
    }

    /// `self = self × other`.
    pub fn multiply(&mut self, other: &Matrix) {
        let a = *self;
        let b = other;
        self.m11 = a.m11 * b.m11 + a.m12 * b.m21;
        self.m12 = a.m11 * b.m12 + a.m12 * b.m22;
        self.m21 = a.m21 * b.m11 + a.m22 * b.m21;
        self.m22 = a.m21 * b.m12 + a.m22 * b.m22;
        self.m31 = a.m31 * b.m11 + a.m32 * b.m21 + b.m31;
        self.m32 = a.m31 * b.m12 + a.m32 * b.m22 + b.m32;
    }

    /// Returns `self × other` without mutating either.
    #[must_use]
    pub fn then(&self, other: &Matrix) -> Matrix {
        let mut m = *self;
        m.multiply(other);
        m
    }

    #[inline]
    fn determinant(&self) -> f64 {
        self.m11 * self.m22 - self.m12 * self.m21
    }

    pub fn is_invertible(&self) -> bool {
        let det = self.determinant();
        det.is_finite() && det.abs() > f64::EPSILON
    }

    /// Inverts in place. Returns `false` (leaving `self` untouched) if singular.
    pub fn invert(&mut self) -> bool {
        if !self.is_invertible() {
            return false;
        }
        let det = self.determinant();
        let a = *self;
        self.m11 = a.m22 / det;
        self.m12 = -a.m12 / det;
        self.m21 = -a.m21 / det;
        self.m22 = a.m11 / det;
        self.m31 = (a.m21 * a.m32 - a.m22 * a.m31) / det;
        self.m32 = (a.m12 * a.m31 - a.m11 * a.m32) / det;
        true
    }

    #[inline]
    pub fn transform_point(&self, p: Point) -> Point {
        Point::new(
            p.x * self.m11 + p.y * self.m21 + self.m31,
            p.x * self.m12 + p.y * self.m22 + self.m32,
        )
    }

    /// Transforms a distance vector, ignoring translation.
    #[inline]
    pub fn transform_size(&self, p: Point) -> Point {
        Point::new(p.x * self.m11 + p.y * self.m21, p.x * self.m12 + p.y * self.m22)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn approx(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn translate_then_scale_applies_in_order() {
        let mut m = Matrix::identity();
        m.translate(5.0, 0.0);
        m.scale(Point::zero(), 2.0, 2.0);
        assert!(approx(m.transform_point(Point::new(1.0, 1.0)), Point::new(12.0, 2.0)));
    }

    #[test]
    fn rotate_quarter_turn_around_center_keeps_center() {
        let c = Point::new(10.0, 10.0);
        let mut m = Matrix::identity();
        m.rotate(c, FRAC_PI_2);
        assert!(approx(m.transform_point(c), c));
        // (20, 10) is right of center; a clockwise quarter turn (y down) lands below it.
        assert!(approx(m.transform_point(Point::new(20.0, 10.0)), Point::new(10.0, 20.0)));
    }

    #[test]
    fn scale_around_center() {
        let mut m = Matrix::identity();
        m.scale(Point::new(4.0, 4.0), 2.0, 3.0);
        assert!(approx(m.transform_point(Point::new(5.0, 5.0)), Point::new(6.0, 7.0)));
    }

    #[test]
    fn transform_size_ignores_translation() {
        let mut m = Matrix::identity();
        m.translate(100.0, 100.0);
        m.scale(Point::zero(), 2.0, 2.0);
        assert!(approx(m.transform_size(Point::new(1.0, 1.0)), Point::new(2.0, 2.0)));
    }

    #[test]
    fn invert_round_trips_points() {
        let mut m = Matrix::identity();
        m.rotate(Point::new(3.0, 4.0), 0.7);
        m.translate(-2.0, 9.0);
        m.skew(Point::zero(), 0.2, 0.1);
        let mut inv = m;
        assert!(inv.invert());
        let p = Point::new(17.0, -3.5);
        assert!(approx(inv.transform_point(m.transform_point(p)), p));
    }

    #[test]
    fn singular_matrix_is_not_inverted() {
        let mut m = Matrix::identity();
        m.scale(Point::zero(), 0.0, 1.0);
        let before = m;
        assert!(!m.is_invertible());
        assert!(!m.invert());
        assert_eq!(m, before);
    }
}
