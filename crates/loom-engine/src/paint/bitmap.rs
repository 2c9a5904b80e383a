use std::rc::Rc;

/// Immutable straight-alpha RGBA8 pixels, rows tightly packed.
///
/// Cloning shares the pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Rc<[u8]>,
}

impl Bitmap {
    /// Returns `None` when `pixels` is not exactly `width * height * 4` bytes.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        if pixels.len() != width as usize * height as usize * 4 {
            return None;
        }
        Some(Self { width, height, pixels: pixels.into() })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// RGBA of pixel `(x, y)`, if in range.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let p = &self.pixels[i..i + 4];
        Some([p[0], p[1], p[2], p[3]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_length_must_match_dimensions() {
        assert!(Bitmap::from_rgba8(2, 2, vec![0; 15]).is_none());
        let b = Bitmap::from_rgba8(2, 1, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        assert_eq!(b.pixel(1, 0), Some([5, 6, 7, 8]));
        assert_eq!(b.pixel(2, 0), None);
    }
}
