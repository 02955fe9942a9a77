//! ClassDefinition table: formats 1 (dense array from a
//! start glyph) and 2 (sorted ranges). `get(glyph) -> class_id`, `0` when
//! the glyph is not classified.

use crate::error::{ParseFail, Result};
use crate::ids::GlyphId;
use crate::stream::{FromData, LazyArray, Stream};

#[derive(Debug, Clone, Copy)]
struct ClassRangeRecord {
    start_glyph_id: GlyphId,
    end_glyph_id: GlyphId,
    class: u16,
}

impl FromData for ClassRangeRecord {
    const SIZE: usize = 6;

    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(ClassRangeRecord {
            start_glyph_id: s.read().ok()?,
            end_glyph_id: s.read().ok()?,
            class: s.read().ok()?,
        })
    }
}

#[derive(Clone, Copy)]
pub enum ClassDef<'a> {
    Format1 { start_glyph_id: GlyphId, classes: LazyArray<'a, u16> },
    Format2(LazyArray<'a, ClassRangeRecord>),
}

impl<'a> ClassDef<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        let format: u16 = s.read()?;
        match format {
            1 => {
                let start_glyph_id: GlyphId = s.read()?;
                let count: u16 = s.read()?;
                Ok(ClassDef::Format1 { start_glyph_id, classes: s.read_array(count as usize)? })
            }
            2 => {
                let count: u16 = s.read()?;
                Ok(ClassDef::Format2(s.read_array(count as usize)?))
            }
            _ => Err(ParseFail),
        }
    }

    pub fn get(&self, glyph_id: GlyphId) -> u16 {
        match self {
            ClassDef::Format1 { start_glyph_id, classes } => {
                let Some(index) = glyph_id.to_u16().checked_sub(start_glyph_id.to_u16()) else {
                    return 0;
                };
                classes.get(index as usize).unwrap_or(0)
            }
            ClassDef::Format2(array) => array
                .iter()
                .find(|r| glyph_id >= r.start_glyph_id && glyph_id <= r.end_glyph_id)
                .map(|r| r.class)
                .unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_1_is_dense_from_start_glyph() {
        let mut d = vec![0u8; 6];
        d[0..2].copy_from_slice(&1u16.to_be_bytes());
        d[2..4].copy_from_slice(&100u16.to_be_bytes()); // startGlyph
        d[4..6].copy_from_slice(&2u16.to_be_bytes()); // count
        d.extend_from_slice(&1u16.to_be_bytes());
        d.extend_from_slice(&2u16.to_be_bytes());
        let cd = ClassDef::parse(&d).unwrap();
        assert_eq!(cd.get(GlyphId::new(100)), 1);
        assert_eq!(cd.get(GlyphId::new(101)), 2);
        assert_eq!(cd.get(GlyphId::new(50)), 0);
        assert_eq!(cd.get(GlyphId::new(200)), 0);
    }
}
