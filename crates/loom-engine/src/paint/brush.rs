use crate::paint::gradient::{LinearGradient, RadialGradient};
use crate::paint::Color;

/// Paint source for filling or stroking a path.
#[derive(Debug, Clone, PartialEq)]
pub enum Brush {
    Solid(Color),
    LinearGradient(LinearGradient),
    RadialGradient(RadialGradient),
}

impl Brush {
    #[inline]
    pub fn solid(color: Color) -> Self {
        Brush::Solid(color)
    }

    pub fn is_valid(&self) -> bool {
        match self {
            Brush::Solid(c) => c.is_finite(),
            Brush::LinearGradient(g) => g.is_valid(),
            Brush::RadialGradient(g) => g.is_valid(),
        }
    }

    /// Returns a brush a renderer can always realize.
    ///
    /// Invalid gradients degrade to a solid fill of their first stop (or
    /// transparent when there is none) and are logged.
    pub fn resolve(&self) -> Brush {
        if self.is_valid() {
            return self.clone();
        }
        let fallback = match self {
            Brush::Solid(_) => Color::transparent(),
            Brush::LinearGradient(g) => g.stops.first().map(|s| s.color).unwrap_or_default(),
            Brush::RadialGradient(g) => g.stops.first().map(|s| s.color).unwrap_or_default(),
        };
        log::warn!("invalid brush {:?}; degrading to solid {:?}", self, fallback);
        Brush::Solid(fallback)
    }

    pub fn is_opaque(&self) -> bool {
        match self {
            Brush::Solid(c) => c.a >= 1.0,
            Brush::LinearGradient(g) => g.stops.iter().all(|s| s.color.a >= 1.0),
            Brush::RadialGradient(g) => g.stops.iter().all(|s| s.color.a >= 1.0),
        }
    }
}

impl From<Color> for Brush {
    fn from(c: Color) -> Self {
        Brush::Solid(c)
    }
}
