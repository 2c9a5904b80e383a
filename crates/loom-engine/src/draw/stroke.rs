/// Shape drawn at the open ends of a stroked figure.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum LineCap {
    #[default]
    Flat,
    Round,
    Square,
}

/// Shape drawn where two stroked segments meet.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

pub const DEFAULT_MITER_LIMIT: f64 = 10.0;

/// Stroke configuration for [`DrawContext::stroke`](super::DrawContext::stroke).
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeParams {
    pub cap: LineCap,
    pub join: LineJoin,
    pub thickness: f64,
    pub miter_limit: f64,
    /// Alternating on/off lengths, in multiples of the thickness. Empty = solid.
    pub dashes: Vec<f64>,
    pub dash_phase: f64,
}

impl Default for StrokeParams {
    fn default() -> Self {
        Self {
            cap: LineCap::Flat,
            join: LineJoin::Miter,
            thickness: 1.0,
            miter_limit: DEFAULT_MITER_LIMIT,
            dashes: Vec::new(),
            dash_phase: 0.0,
        }
    }
}

impl StrokeParams {
    pub fn thickness(mut self, v: f64) -> Self { self.thickness = v; self }
    pub fn cap(mut self, v: LineCap) -> Self { self.cap = v; self }
    pub fn join(mut self, v: LineJoin) -> Self { self.join = v; self }
    pub fn miter_limit(mut self, v: f64) -> Self { self.miter_limit = v; self }
    pub fn dashes(mut self, v: Vec<f64>, phase: f64) -> Self {
        self.dashes = v;
        self.dash_phase = phase;
        self
    }

    /// Half the stroke width, the reach of the stroke on either side of the path.
    #[inline]
    pub fn half_width(&self) -> f64 {
        self.thickness.max(0.0) * 0.5
    }
}
