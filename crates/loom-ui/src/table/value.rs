use std::rc::Rc;

use image::{ImageError, ImageFormat, RgbaImage};
use loom_engine::paint::{Bitmap, Color};

use crate::error::{user_bug, UsageError};

/// Kind of value a model column holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableValueType {
    String,
    Image,
    Int,
    Color,
}

/// A single cell value.
///
/// Images are shared, so cloning a value never copies pixel data.
#[derive(Debug, Clone, PartialEq)]
pub enum TableValue {
    String(String),
    Image(Rc<Image>),
    Int(i32),
    Color(Color),
}

impl TableValue {
    pub fn value_type(&self) -> TableValueType {
        match self {
            TableValue::String(_) => TableValueType::String,
            TableValue::Image(_) => TableValueType::Image,
            TableValue::Int(_) => TableValueType::Int,
            TableValue::Color(_) => TableValueType::Color,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TableValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            TableValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            TableValue::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&Rc<Image>> {
        match self {
            TableValue::Image(i) => Some(i),
            _ => None,
        }
    }
}

impl From<&str> for TableValue {
    fn from(s: &str) -> Self {
        TableValue::String(s.to_owned())
    }
}

impl From<String> for TableValue {
    fn from(s: String) -> Self {
        TableValue::String(s)
    }
}

impl From<i32> for TableValue {
    fn from(v: i32) -> Self {
        TableValue::Int(v)
    }
}

impl From<bool> for TableValue {
    fn from(v: bool) -> Self {
        TableValue::Int(v as i32)
    }
}

impl From<Color> for TableValue {
    fn from(c: Color) -> Self {
        TableValue::Color(c)
    }
}

impl From<Rc<Image>> for TableValue {
    fn from(i: Rc<Image>) -> Self {
        TableValue::Image(i)
    }
}

/// An image with a logical size and any number of pixel representations,
/// for example 1x and 2x.
#[derive(Debug, PartialEq)]
pub struct Image {
    width: f64,
    height: f64,
    reps: Vec<Bitmap>,
}

impl Image {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, reps: Vec::new() }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn num_representations(&self) -> usize {
        self.reps.len()
    }

    /// Adds a representation from straight-alpha RGBA8 rows `byte_stride`
    /// bytes apart. The pixels are copied.
    pub fn append(&mut self, pixels: &[u8], width: u32, height: u32, byte_stride: usize) {
        let row = width as usize * 4;
        let needed = if height == 0 { 0 } else { byte_stride * (height as usize - 1) + row };
        if width == 0 || height == 0 || byte_stride < row || pixels.len() < needed {
            user_bug(UsageError::ImageBuffer {
                width,
                height,
                byte_stride,
                len: pixels.len(),
            });
        }
        let mut packed = Vec::with_capacity(row * height as usize);
        for y in 0..height as usize {
            packed.extend_from_slice(&pixels[y * byte_stride..y * byte_stride + row]);
        }
        self.push(width, height, packed);
    }

    /// Adds a representation decoded from PNG bytes.
    pub fn append_png(&mut self, bytes: &[u8]) -> Result<(), ImageError> {
        let decoded = image::load_from_memory_with_format(bytes, ImageFormat::Png)?.into_rgba8();
        let (width, height) = decoded.dimensions();
        self.push(width, height, decoded.into_raw());
        Ok(())
    }

    fn push(&mut self, width: u32, height: u32, packed: Vec<u8>) {
        match Bitmap::from_rgba8(width, height, packed) {
            Some(bitmap) => self.reps.push(bitmap),
            None => {
                log::error!("dropping {width}x{height} image representation: buffer size mismatch")
            }
        }
    }

    /// Copy of representation `index` as an `image` buffer.
    pub fn representation(&self, index: usize) -> Option<RgbaImage> {
        let b = self.reps.get(index)?;
        RgbaImage::from_raw(b.width(), b.height(), b.pixels().to_vec())
    }

    /// Smallest representation at least `width` x `height` pixels, else the
    /// largest one.
    pub fn best_for(&self, width: u32, height: u32) -> Option<&Bitmap> {
        let area = |b: &Bitmap| b.width() as u64 * b.height() as u64;
        self.reps
            .iter()
            .filter(|b| b.width() >= width && b.height() >= height)
            .min_by_key(|b| area(b))
            .or_else(|| self.reps.iter().max_by_key(|b| area(b)))
    }
}
