use crate::coords::Point;

use super::Color;

/// A single gradient stop. `pos` is expected in [0, 1].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GradientStop {
    pub pos: f64,
    pub color: Color,
}

impl GradientStop {
    #[inline]
    pub const fn new(pos: f64, color: Color) -> Self {
        Self { pos, color }
    }
}

/// Linear gradient running from `start` to `end` in user space.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub start: Point,
    pub end: Point,
    pub stops: Vec<GradientStop>,
}

impl LinearGradient {
    pub fn new(start: Point, end: Point, stops: Vec<GradientStop>) -> Self {
        Self { start, end, stops }
    }

    pub fn is_valid(&self) -> bool {
        self.start.is_finite()
            && self.end.is_finite()
            && stops_valid(&self.stops)
            && (self.end.x != self.start.x || self.end.y != self.start.y)
    }
}

/// Radial gradient. `start` is the focal point; `end` is the center of the
/// outer circle of radius `outer_radius`.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub start: Point,
    pub end: Point,
    pub outer_radius: f64,
    pub stops: Vec<GradientStop>,
}

impl RadialGradient {
    pub fn new(start: Point, end: Point, outer_radius: f64, stops: Vec<GradientStop>) -> Self {
        Self { start, end, outer_radius, stops }
    }

    pub fn is_valid(&self) -> bool {
        self.start.is_finite()
            && self.end.is_finite()
            && self.outer_radius.is_finite()
            && self.outer_radius > 0.0
            && stops_valid(&self.stops)
    }
}

fn stops_valid(stops: &[GradientStop]) -> bool {
    stops.len() >= 2 && stops.iter().all(|s| s.pos.is_finite() && s.color.is_finite())
}

/// Samples a stop list at `t` (clamped to [0, 1]); stops need not be sorted.
pub fn sample_stops(stops: &[GradientStop], t: f64) -> Color {
    let mut sorted: Vec<GradientStop> = stops.to_vec();
    sorted.sort_by(|a, b| a.pos.total_cmp(&b.pos));

    let t = t.clamp(0.0, 1.0);
    let (Some(first), Some(last)) = (sorted.first(), sorted.last()) else {
        return Color::transparent();
    };
    if t <= first.pos {
        return first.color;
    }
    if t >= last.pos {
        return last.color;
    }
    for pair in sorted.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t >= a.pos && t <= b.pos {
            let span = b.pos - a.pos;
            let f = if span <= 0.0 { 0.0 } else { (t - a.pos) / span };
            return Color::new(
                a.color.r + (b.color.r - a.color.r) * f,
                a.color.g + (b.color.g - a.color.g) * f,
                a.color.b + (b.color.b - a.color.b) * f,
                a.color.a + (b.color.a - a.color.a) * f,
            );
        }
    }
    last.color
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stops() -> Vec<GradientStop> {
        vec![
            GradientStop::new(1.0, Color::white()),
            GradientStop::new(0.0, Color::black()),
        ]
    }

    #[test]
    fn linear_needs_two_stops_and_distinct_points() {
        let g = LinearGradient::new(Point::zero(), Point::new(10.0, 0.0), stops());
        assert!(g.is_valid());
        let flat = LinearGradient::new(Point::zero(), Point::zero(), stops());
        assert!(!flat.is_valid());
        let single =
            LinearGradient::new(Point::zero(), Point::new(1.0, 0.0), stops()[..1].to_vec());
        assert!(!single.is_valid());
    }

    #[test]
    fn radial_needs_positive_radius() {
        assert!(RadialGradient::new(Point::zero(), Point::zero(), 5.0, stops()).is_valid());
        assert!(!RadialGradient::new(Point::zero(), Point::zero(), 0.0, stops()).is_valid());
    }

    #[test]
    fn sample_interpolates_unsorted_stops() {
        let mid = sample_stops(&stops(), 0.5);
        assert_eq!(mid, Color::new(0.5, 0.5, 0.5, 1.0));
        assert_eq!(sample_stops(&stops(), -3.0), Color::black());
        assert_eq!(sample_stops(&stops(), 3.0), Color::white());
    }
}
