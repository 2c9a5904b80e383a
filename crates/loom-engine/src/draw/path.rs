use std::f64::consts::{PI, TAU};

use crate::coords::{Point, Rect};

use super::error::PathError;

/// Relative tolerance used to decide that a sweep is a full turn.
const FULL_CIRCLE_TOLERANCE: f64 = 6.0 * f64::EPSILON;

/// How overlapping figures decide what is "inside".
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum FillMode {
    /// Non-zero winding rule.
    #[default]
    Winding,
    /// Even-odd rule.
    Alternate,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SweepDirection {
    Clockwise,
    CounterClockwise,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ArcSize {
    Small,
    Large,
}

/// A circular arc no larger than a half turn in the full-circle case, or any
/// non-full sweep otherwise.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ArcSegment {
    pub center: Point,
    pub radius: f64,
    /// Angle of the start point, radians.
    pub start_angle: f64,
    /// Signed angle actually travelled; negative is counter-clockwise.
    pub travel: f64,
    pub end: Point,
    pub direction: SweepDirection,
    pub size: ArcSize,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Segment {
    Line(Point),
    Arc(ArcSegment),
    Bezier { c1: Point, c2: Point, end: Point },
}

impl Segment {
    pub fn end(&self) -> Point {
        match self {
            Segment::Line(p) => *p,
            Segment::Arc(a) => a.end,
            Segment::Bezier { end, .. } => *end,
        }
    }
}

/// One subpath: a start point followed by connected segments.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub start: Point,
    pub segments: Vec<Segment>,
    pub closed: bool,
}

impl Figure {
    fn current_point(&self) -> Point {
        self.segments.last().map(Segment::end).unwrap_or(self.start)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum PathState {
    Closed,
    InFigure,
    Ended,
}

/// Imperatively built vector geometry.
///
/// ```text
/// Closed ──new_figure──▶ InFigure ──close_figure──▶ Closed
///    │                      │  ▲ line_to / arc_to / bezier_to
///    └─────── end ──────────┴──▶ Ended (immutable)
/// ```
///
/// Segments need an open figure. Starting a new figure while one is open
/// leaves the old one open (unclosed). After [`end`](Self::end) every
/// mutation fails with [`PathError::Ended`].
#[derive(Debug, Clone, PartialEq)]
pub struct DrawPath {
    fill_mode: FillMode,
    figures: Vec<Figure>,
    state: PathState,
}

/// Parameters of an arc request before decomposition.
#[derive(Debug, Copy, Clone)]
struct Arc {
    center: Point,
    radius: f64,
    start_angle: f64,
    sweep: f64,
    negative: bool,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum ArcStart {
    NewFigure,
    LineTo,
    None,
}

impl DrawPath {
    pub fn new(fill_mode: FillMode) -> Self {
        Self { fill_mode, figures: Vec::new(), state: PathState::Closed }
    }

    #[inline]
    pub fn fill_mode(&self) -> FillMode {
        self.fill_mode
    }

    #[inline]
    pub fn ended(&self) -> bool {
        self.state == PathState::Ended
    }

    #[inline]
    pub fn figures(&self) -> &[Figure] {
        &self.figures
    }

    fn ensure_mutable(&self) -> Result<(), PathError> {
        if self.ended() { Err(PathError::Ended) } else { Ok(()) }
    }

    fn open_figure(&mut self, op: &'static str) -> Result<&mut Figure, PathError> {
        self.ensure_mutable()?;
        if self.state != PathState::InFigure {
            return Err(PathError::NoFigure(op));
        }
        self.figures.last_mut().ok_or(PathError::NoFigure(op))
    }

    // ── building ──────────────────────────────────────────────────────────

    pub fn new_figure(&mut self, x: f64, y: f64) -> Result<(), PathError> {
        self.ensure_mutable()?;
        self.figures.push(Figure { start: Point::new(x, y), segments: Vec::new(), closed: false });
        self.state = PathState::InFigure;
        Ok(())
    }

    /// Starts a new figure at the arc's start point and adds the arc.
    pub fn new_figure_with_arc(
        &mut self,
        x_center: f64,
        y_center: f64,
        radius: f64,
        start_angle: f64,
        sweep: f64,
        negative: bool,
    ) -> Result<(), PathError> {
        self.ensure_mutable()?;
        let arc = Arc {
            center: Point::new(x_center, y_center),
            radius,
            start_angle,
            sweep,
            negative,
        };
        self.add_arc(arc, ArcStart::NewFigure)
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> Result<(), PathError> {
        let fig = self.open_figure("line_to")?;
        fig.segments.push(Segment::Line(Point::new(x, y)));
        Ok(())
    }

    /// Draws a line from the current point to the arc start, then the arc.
    pub fn arc_to(
        &mut self,
        x_center: f64,
        y_center: f64,
        radius: f64,
        start_angle: f64,
        sweep: f64,
        negative: bool,
    ) -> Result<(), PathError> {
        self.open_figure("arc_to")?;
        let arc = Arc {
            center: Point::new(x_center, y_center),
            radius,
            start_angle,
            sweep,
            negative,
        };
        self.add_arc(arc, ArcStart::LineTo)
    }

    pub fn bezier_to(
        &mut self,
        c1x: f64,
        c1y: f64,
        c2x: f64,
        c2y: f64,
        end_x: f64,
        end_y: f64,
    ) -> Result<(), PathError> {
        let fig = self.open_figure("bezier_to")?;
        fig.segments.push(Segment::Bezier {
            c1: Point::new(c1x, c1y),
            c2: Point::new(c2x, c2y),
            end: Point::new(end_x, end_y),
        });
        Ok(())
    }

    pub fn close_figure(&mut self) -> Result<(), PathError> {
        let fig = self.open_figure("close_figure")?;
        fig.closed = true;
        self.state = PathState::Closed;
        Ok(())
    }

    /// Adds a closed axis-aligned rectangle as its own figure.
    pub fn add_rectangle(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<(), PathError> {
        self.new_figure(x, y)?;
        self.line_to(x + width, y)?;
        self.line_to(x + width, y + height)?;
        self.line_to(x, y + height)?;
        self.close_figure()
    }

    /// Freezes the path. A still-open figure stays open.
    pub fn end(&mut self) -> Result<(), PathError> {
        self.ensure_mutable()?;
        self.state = PathState::Ended;
        Ok(())
    }

    fn add_arc(&mut self, mut arc: Arc, start: ArcStart) -> Result<(), PathError> {
        // A single arc segment cannot describe a closed circle: split it.
        let abs_sweep = arc.sweep.abs();
        let full_circle = abs_sweep > TAU
            || (abs_sweep - TAU).abs() <= abs_sweep * FULL_CIRCLE_TOLERANCE;
        if full_circle {
            arc.sweep = PI;
            self.add_arc(arc, start)?;
            arc.start_angle += PI;
            return self.add_arc(arc, ArcStart::None);
        }

        let (sin, cos) = arc.start_angle.sin_cos();
        let start_pt = Point::new(arc.center.x + arc.radius * cos, arc.center.y + arc.radius * sin);
        let (sin, cos) = (arc.start_angle + arc.sweep).sin_cos();
        let end_pt = Point::new(arc.center.x + arc.radius * cos, arc.center.y + arc.radius * sin);

        match start {
            ArcStart::NewFigure => self.new_figure(start_pt.x, start_pt.y)?,
            ArcStart::LineTo => self.line_to(start_pt.x, start_pt.y)?,
            ArcStart::None => {}
        }

        let (direction, size) = if arc.negative {
            let size = if arc.sweep > PI { ArcSize::Small } else { ArcSize::Large };
            (SweepDirection::CounterClockwise, size)
        } else {
            let size = if arc.sweep > PI { ArcSize::Large } else { ArcSize::Small };
            (SweepDirection::Clockwise, size)
        };

        // Counter-clockwise arcs reach the same end angle going the other way round.
        let travel = if !arc.negative || arc.sweep == 0.0 { arc.sweep } else { arc.sweep - TAU };

        let fig = self.open_figure("arc")?;
        fig.segments.push(Segment::Arc(ArcSegment {
            center: arc.center,
            radius: arc.radius,
            start_angle: arc.start_angle,
            travel,
            end: end_pt,
            direction,
            size,
        }));
        Ok(())
    }

    // ── geometry queries ──────────────────────────────────────────────────

    /// Approximates every figure as a polyline. Figures are returned with
    /// their start point first; closing is implied for filling.
    pub fn flatten(&self, tolerance: f64) -> Vec<Polyline> {
        let tolerance = tolerance.max(1e-4);
        self.figures
            .iter()
            .map(|fig| {
                let mut points = vec![fig.start];
                let mut current = fig.start;
                for seg in &fig.segments {
                    match seg {
                        Segment::Line(p) => points.push(*p),
                        Segment::Arc(a) => flatten_arc(a, tolerance, &mut points),
                        Segment::Bezier { c1, c2, end } => {
                            flatten_bezier(current, *c1, *c2, *end, tolerance, &mut points)
                        }
                    }
                    current = seg.end();
                }
                debug_assert_eq!(current, fig.current_point());
                Polyline { points, closed: fig.closed }
            })
            .collect()
    }

    /// Bounding box of the flattened geometry, or `None` for an empty path.
    pub fn bounds(&self) -> Option<Rect> {
        let polys = self.flatten(DEFAULT_TOLERANCE);
        let mut iter = polys.iter().flat_map(|p| p.points.iter());
        let first = *iter.next()?;
        let (mut min, mut max) = (first, first);
        for p in iter {
            min = Point::new(min.x.min(p.x), min.y.min(p.y));
            max = Point::new(max.x.max(p.x), max.y.max(p.y));
        }
        Some(Rect::from_points(min, max))
    }

    /// Whether `p` lies inside the filled area, honouring the fill mode.
    pub fn contains(&self, p: Point) -> bool {
        let winding: i32 = self
            .flatten(DEFAULT_TOLERANCE)
            .iter()
            .map(|poly| poly.winding_number(p))
            .sum();
        match self.fill_mode {
            FillMode::Winding => winding != 0,
            FillMode::Alternate => winding % 2 != 0,
        }
    }
}

/// Flattening tolerance used by containment and bounds queries.
pub const DEFAULT_TOLERANCE: f64 = 0.05;

/// A flattened figure.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub points: Vec<Point>,
    pub closed: bool,
}

impl Polyline {
    /// Winding number of the implicitly closed polygon around `p`.
    pub fn winding_number(&self, p: Point) -> i32 {
        let n = self.points.len();
        if n < 3 {
            return 0;
        }
        let mut wn = 0;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            let cross = (b.x - a.x) * (p.y - a.y) - (p.x - a.x) * (b.y - a.y);
            if a.y <= p.y {
                if b.y > p.y && cross > 0.0 {
                    wn += 1;
                }
            } else if b.y <= p.y && cross < 0.0 {
                wn -= 1;
            }
        }
        wn
    }

    /// Shortest distance from `p` to any edge (closing edge included when closed).
    pub fn distance_to(&self, p: Point) -> f64 {
        let n = self.points.len();
        match n {
            0 => f64::INFINITY,
            1 => self.points[0].distance(p),
            _ => {
                let edges = if self.closed { n } else { n - 1 };
                (0..edges)
                    .map(|i| segment_distance(self.points[i], self.points[(i + 1) % n], p))
                    .fold(f64::INFINITY, f64::min)
            }
        }
    }
}

fn segment_distance(a: Point, b: Point, p: Point) -> f64 {
    let ab = b - a;
    let len2 = ab.x * ab.x + ab.y * ab.y;
    if len2 == 0.0 {
        return a.distance(p);
    }
    let t = (((p.x - a.x) * ab.x + (p.y - a.y) * ab.y) / len2).clamp(0.0, 1.0);
    a.lerp(b, t).distance(p)
}

fn flatten_arc(a: &ArcSegment, tolerance: f64, out: &mut Vec<Point>) {
    if a.travel == 0.0 || a.radius <= 0.0 {
        out.push(a.end);
        return;
    }
    let step = if tolerance >= a.radius {
        PI / 2.0
    } else {
        (2.0 * (1.0 - tolerance / a.radius).acos()).max(1e-3)
    };
    let n = ((a.travel.abs() / step).ceil() as usize).clamp(1, 1024);
    for i in 1..n {
        let angle = a.start_angle + a.travel * (i as f64 / n as f64);
        let (sin, cos) = angle.sin_cos();
        out.push(Point::new(a.center.x + a.radius * cos, a.center.y + a.radius * sin));
    }
    out.push(a.end);
}

fn flatten_bezier(
    p0: Point,
    c1: Point,
    c2: Point,
    p3: Point,
    tolerance: f64,
    out: &mut Vec<Point>,
) {
    let hull = p0.distance(c1) + c1.distance(c2) + c2.distance(p3);
    let n = ((hull / tolerance).sqrt().ceil() as usize).clamp(4, 256);
    for i in 1..=n {
        let t = i as f64 / n as f64;
        let mt = 1.0 - t;
        let x = mt * mt * mt * p0.x
            + 3.0 * mt * mt * t * c1.x
            + 3.0 * mt * t * t * c2.x
            + t * t * t * p3.x;
        let y = mt * mt * mt * p0.y
            + 3.0 * mt * mt * t * c1.y
            + 3.0 * mt * t * t * c2.y
            + t * t * t * p3.y;
        out.push(Point::new(x, y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    // ── state machine ─────────────────────────────────────────────────────

    #[test]
    fn line_to_without_figure_is_rejected() {
        let mut p = DrawPath::new(FillMode::Winding);
        assert_eq!(p.line_to(1.0, 1.0), Err(PathError::NoFigure("line_to")));
        assert!(p.figures().is_empty());
    }

    #[test]
    fn segments_after_close_need_new_figure() {
        let mut p = DrawPath::new(FillMode::Winding);
        p.new_figure(0.0, 0.0).unwrap();
        p.line_to(5.0, 0.0).unwrap();
        p.close_figure().unwrap();
        assert_eq!(
            p.bezier_to(0.0, 0.0, 1.0, 1.0, 2.0, 2.0),
            Err(PathError::NoFigure("bezier_to"))
        );
        assert_eq!(p.close_figure(), Err(PathError::NoFigure("close_figure")));
    }

    #[test]
    fn mutation_after_end_is_rejected_and_path_stays_ended() {
        let mut p = DrawPath::new(FillMode::Winding);
        p.new_figure(0.0, 0.0).unwrap();
        p.end().unwrap();
        assert!(p.ended());
        assert_eq!(p.line_to(1.0, 1.0), Err(PathError::Ended));
        assert_eq!(p.new_figure(1.0, 1.0), Err(PathError::Ended));
        assert_eq!(p.end(), Err(PathError::Ended));
        assert!(p.ended());
        assert_eq!(p.figures().len(), 1);
    }

    #[test]
    fn new_figure_leaves_previous_figure_open() {
        let mut p = DrawPath::new(FillMode::Winding);
        p.new_figure(0.0, 0.0).unwrap();
        p.line_to(1.0, 0.0).unwrap();
        p.new_figure(5.0, 5.0).unwrap();
        assert_eq!(p.figures().len(), 2);
        assert!(!p.figures()[0].closed);
    }

    #[test]
    fn ended_is_false_before_end() {
        let p = DrawPath::new(FillMode::Alternate);
        assert!(!p.ended());
    }

    // ── arcs ──────────────────────────────────────────────────────────────

    #[test]
    fn full_circle_splits_into_two_half_arcs() {
        let mut p = DrawPath::new(FillMode::Winding);
        p.new_figure_with_arc(10.0, 10.0, 5.0, 0.0, TAU, false).unwrap();
        let fig = &p.figures()[0];
        assert!(approx(fig.start, Point::new(15.0, 10.0)));
        assert_eq!(fig.segments.len(), 2);
        let Segment::Arc(first) = fig.segments[0] else { panic!("expected arc") };
        let Segment::Arc(second) = fig.segments[1] else { panic!("expected arc") };
        assert!(approx(first.end, Point::new(5.0, 10.0)));
        assert!(approx(second.end, Point::new(15.0, 10.0)));
        assert_eq!(first.travel, PI);
    }

    #[test]
    fn nearly_full_sweep_counts_as_full_circle() {
        let mut p = DrawPath::new(FillMode::Winding);
        let sweep = TAU * (1.0 - 2.0 * f64::EPSILON);
        p.new_figure_with_arc(0.0, 0.0, 1.0, 0.0, sweep, false).unwrap();
        assert_eq!(p.figures()[0].segments.len(), 2);
    }

    #[test]
    fn clearly_partial_sweep_is_single_arc() {
        let mut p = DrawPath::new(FillMode::Winding);
        p.new_figure_with_arc(0.0, 0.0, 1.0, 0.0, TAU * 0.99, false).unwrap();
        assert_eq!(p.figures()[0].segments.len(), 1);
    }

    #[test]
    fn arc_size_flag_inverts_for_negative_arcs() {
        let mut p = DrawPath::new(FillMode::Winding);
        p.new_figure_with_arc(0.0, 0.0, 1.0, 0.0, PI / 2.0, false).unwrap();
        p.new_figure_with_arc(0.0, 0.0, 1.0, 0.0, PI / 2.0, true).unwrap();
        let Segment::Arc(cw) = p.figures()[0].segments[0] else { panic!() };
        let Segment::Arc(ccw) = p.figures()[1].segments[0] else { panic!() };
        assert_eq!((cw.direction, cw.size), (SweepDirection::Clockwise, ArcSize::Small));
        assert_eq!((ccw.direction, ccw.size), (SweepDirection::CounterClockwise, ArcSize::Large));
        assert!(approx(cw.end, ccw.end));
        assert!(ccw.travel < 0.0);
    }

    #[test]
    fn arc_to_draws_line_to_arc_start() {
        let mut p = DrawPath::new(FillMode::Winding);
        p.new_figure(0.0, 0.0).unwrap();
        p.arc_to(10.0, 0.0, 2.0, PI, PI / 2.0, false).unwrap();
        let fig = &p.figures()[0];
        assert_eq!(fig.segments.len(), 2);
        assert!(matches!(fig.segments[0], Segment::Line(pt) if approx(pt, Point::new(8.0, 0.0))));
    }

    #[test]
    fn arc_to_without_figure_is_rejected() {
        let mut p = DrawPath::new(FillMode::Winding);
        assert_eq!(p.arc_to(0.0, 0.0, 1.0, 0.0, 1.0, false), Err(PathError::NoFigure("arc_to")));
    }

    // ── geometry ──────────────────────────────────────────────────────────

    #[test]
    fn rectangle_contains_and_bounds() {
        let mut p = DrawPath::new(FillMode::Winding);
        p.add_rectangle(10.0, 20.0, 30.0, 40.0).unwrap();
        p.end().unwrap();
        assert!(p.contains(Point::new(25.0, 30.0)));
        assert!(!p.contains(Point::new(5.0, 30.0)));
        assert_eq!(p.bounds(), Some(Rect::new(10.0, 20.0, 30.0, 40.0)));
    }

    #[test]
    fn alternate_fill_leaves_hole_winding_does_not() {
        let build = |mode| {
            let mut p = DrawPath::new(mode);
            p.add_rectangle(0.0, 0.0, 100.0, 100.0).unwrap();
            p.add_rectangle(25.0, 25.0, 50.0, 50.0).unwrap();
            p.end().unwrap();
            p
        };
        let center = Point::new(50.0, 50.0);
        assert!(build(FillMode::Winding).contains(center));
        assert!(!build(FillMode::Alternate).contains(center));
    }

    #[test]
    fn circle_contains_center_not_corner() {
        let mut p = DrawPath::new(FillMode::Winding);
        p.new_figure_with_arc(50.0, 50.0, 10.0, 0.0, TAU, false).unwrap();
        p.close_figure().unwrap();
        p.end().unwrap();
        assert!(p.contains(Point::new(50.0, 50.0)));
        assert!(p.contains(Point::new(58.0, 50.0)));
        assert!(!p.contains(Point::new(58.0, 58.0)));
    }
}
