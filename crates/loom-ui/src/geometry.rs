//! Integer pixel geometry used for native handle placement.

/// Width/height in device pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { width: 0, height: 0 }
    }
}

/// Rectangle in the parent's client coordinates.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub fn size(self) -> Size {
        Size::new(self.width, self.height)
    }

    #[inline]
    pub fn right(self) -> i32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(self) -> i32 {
        self.y + self.height
    }

    #[inline]
    pub fn contains(self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Shrinks every side by `dx`/`dy`, never below zero size.
    pub fn inset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            width: (self.width - 2 * dx).max(0),
            height: (self.height - 2 * dy).max(0),
        }
    }
}

/// Dialog-unit conversion factors of a control's font.
///
/// One horizontal dialog unit is a quarter of `base_x`, one vertical unit an
/// eighth of `base_y`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Sizing {
    pub base_x: i32,
    pub base_y: i32,
    pub internal_leading: i32,
}

/// Padding between children of a padded container, in dialog units.
pub const PADDING_DLU: (i32, i32) = (4, 4);
/// Margin around a margined window's content, in dialog units.
pub const MARGIN_DLU: (i32, i32) = (7, 7);

impl Default for Sizing {
    /// One pixel per dialog unit and no leading.
    fn default() -> Self {
        Self { base_x: 4, base_y: 8, internal_leading: 0 }
    }
}

fn mul_div(a: i32, b: i32, c: i32) -> i32 {
    ((a as i64 * b as i64) as f64 / c as f64).round() as i32
}

impl Sizing {
    #[inline]
    pub fn dlu_to_x(&self, dlu: i32) -> i32 {
        mul_div(dlu, self.base_x, 4)
    }

    #[inline]
    pub fn dlu_to_y(&self, dlu: i32) -> i32 {
        mul_div(dlu, self.base_y, 8)
    }

    /// Padding between children in pixels, or zero when not padded.
    pub fn padding(&self, padded: bool) -> (i32, i32) {
        if padded {
            (self.dlu_to_x(PADDING_DLU.0), self.dlu_to_y(PADDING_DLU.1))
        } else {
            (0, 0)
        }
    }

    pub fn margins(&self, margined: bool) -> (i32, i32) {
        if margined {
            (self.dlu_to_x(MARGIN_DLU.0), self.dlu_to_y(MARGIN_DLU.1))
        } else {
            (0, 0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialog_units_scale_with_base() {
        let s = Sizing { base_x: 7, base_y: 15, internal_leading: 3 };
        assert_eq!(s.dlu_to_x(4), 7);
        assert_eq!(s.dlu_to_y(8), 15);
        // 7 * 7 / 4 = 12.25
        assert_eq!(s.dlu_to_x(7), 12);
        // 4 * 15 / 8 = 7.5 rounds up
        assert_eq!(s.dlu_to_y(4), 8);
    }

    #[test]
    fn unpadded_is_zero() {
        assert_eq!(Sizing::default().padding(false), (0, 0));
        assert_eq!(Sizing::default().padding(true), (4, 4));
        assert_eq!(Sizing::default().margins(true), (7, 7));
    }

    #[test]
    fn inset_clamps_at_zero() {
        let b = Bounds::new(0, 0, 10, 4).inset(3, 3);
        assert_eq!(b, Bounds::new(3, 3, 4, 0));
    }
}
