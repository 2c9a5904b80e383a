/// Straight-alpha RGBA color with `f64` channels in `[0, 1]`.
///
/// This is the form colors arrive in from table models and text attributes.
/// Renderers that blend in premultiplied space call [`Color::to_premul`].
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    #[inline]
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn transparent() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    #[inline]
    pub const fn black() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }

    #[inline]
    pub const fn white() -> Self {
        Self::new(1.0, 1.0, 1.0, 1.0)
    }

    /// Builds a color from 8-bit sRGB channels.
    #[inline]
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0, a as f64 / 255.0)
    }

    /// Channels multiplied by alpha, in `(r, g, b, a)` order.
    #[inline]
    pub fn to_premul(self) -> (f64, f64, f64, f64) {
        let c = self.clamped();
        (c.r * c.a, c.g * c.a, c.b * c.a, c.a)
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }

    #[inline]
    pub fn clamped(self) -> Self {
        Self::new(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
            self.a.clamp(0.0, 1.0),
        )
    }

    /// Bit pattern of each channel; used where colors must be hashed.
    #[inline]
    pub(crate) fn bits(self) -> [u64; 4] {
        [self.r.to_bits(), self.g.to_bits(), self.b.to_bits(), self.a.to_bits()]
    }
}
