// src/assets/font.rs
use std::collections::HashMap;
use std::io::{ErrorKind, Read};
use byteorder::{BigEndian, ReadBytesExt};
use crate::errors::SkyError;

pub const BIG5_GLYPH_WIDTH: usize = 16;
/// Glyph height used by the traditional Chinese executable.
pub const CHINESE_TRADITIONAL_HEIGHT: usize = 15;

const END_OF_TABLE: u16 = 0xFFFF;

/// Fixed-width 16px bitmap font indexed by Big5 code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Big5Font {
    height: usize,
    glyphs: Vec<u8>,
    index: HashMap<u16, usize>,
}

impl Big5Font {
    pub fn glyph_bytes(height: usize) -> usize {
        BIG5_GLYPH_WIDTH / 8 * height
    }

    /// Reads records of `[code: u16 BE][height rows of 2 bytes]` until the
    /// `0xFFFF` marker or the end of the stream.
    pub fn load_prefixed_raw<R: Read>(input: &mut R, height: usize) -> Result<Self, SkyError> {
        let glyph_len = Self::glyph_bytes(height);
        let mut glyphs = Vec::new();
        let mut index = HashMap::new();

        loop {
            let code = match input.read_u16::<BigEndian>() {
                Ok(code) => code,
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => break,
                Err(e) => {
                    return Err(SkyError::Extraction(format!("Failed to read Big5 code: {}", e)))
                }
            };
            if code == END_OF_TABLE {
                break;
            }

            let start = glyphs.len();
            glyphs.resize(start + glyph_len, 0);
            input.read_exact(&mut glyphs[start..]).map_err(|e| {
                SkyError::Extraction(format!("Truncated glyph for Big5 code {:#06x}: {}", code, e))
            })?;
            index.insert(code, start / glyph_len);
        }

        log::debug!("Loaded {} Big5 glyphs", index.len());
        Ok(Self { height, glyphs, index })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn glyph(&self, code: u16) -> Option<&[u8]> {
        let glyph_len = Self::glyph_bytes(self.height);
        let slot = *self.index.get(&code)?;
        self.glyphs.get(slot * glyph_len..(slot + 1) * glyph_len)
    }

    /// Returns whether pixel `(x, y)` of the glyph is set.
    pub fn pixel(&self, code: u16, x: usize, y: usize) -> Option<bool> {
        if x >= BIG5_GLYPH_WIDTH || y >= self.height {
            return None;
        }
        let glyph = self.glyph(code)?;
        let row = &glyph[y * 2..y * 2 + 2];
        Some(row[x / 8] & (0x80 >> (x % 8)) != 0)
    }
}
