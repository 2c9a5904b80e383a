/// Offset translation between a UTF-8 string and its UTF-16 encoding.
///
/// Both tables have one extra entry for the end position. Offsets inside a
/// multi-unit sequence map to the start of the character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utf16Map {
    u8_to_u16: Vec<usize>,
    u16_to_u8: Vec<usize>,
}

impl Utf16Map {
    pub fn new(text: &str) -> Self {
        let mut u8_to_u16 = Vec::with_capacity(text.len() + 1);
        let mut u16_to_u8 = Vec::with_capacity(text.len() + 1);
        let mut u16_pos = 0;
        for (byte_pos, ch) in text.char_indices() {
            for _ in 0..ch.len_utf8() {
                u8_to_u16.push(u16_pos);
            }
            for _ in 0..ch.len_utf16() {
                u16_to_u8.push(byte_pos);
            }
            u16_pos += ch.len_utf16();
        }
        u8_to_u16.push(u16_pos);
        u16_to_u8.push(text.len());
        Self { u8_to_u16, u16_to_u8 }
    }

    /// Number of UTF-16 code units.
    #[inline]
    pub fn utf16_len(&self) -> usize {
        self.u16_to_u8.len() - 1
    }

    /// Offsets past the end clamp to the end.
    #[inline]
    pub fn to_utf16(&self, byte_offset: usize) -> usize {
        let i = byte_offset.min(self.u8_to_u16.len() - 1);
        self.u8_to_u16[i]
    }

    #[inline]
    pub fn to_utf8(&self, u16_offset: usize) -> usize {
        let i = u16_offset.min(self.u16_to_u8.len() - 1);
        self.u16_to_u8[i]
    }
}
