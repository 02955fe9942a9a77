//! Coverage table: formats 1 (sorted glyph array) and 2
//! (sorted range records), each supporting `get(glyph) -> coverage_index?`
//! via binary search.

use crate::error::{ParseFail, Result};
use crate::ids::GlyphId;
use crate::stream::{FromData, LazyArray, Stream};

#[derive(Debug, Clone, Copy)]
struct RangeRecord {
    start_glyph_id: GlyphId,
    end_glyph_id: GlyphId,
    start_coverage_index: u16,
}

impl FromData for RangeRecord {
    const SIZE: usize = 6;

    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(RangeRecord {
            start_glyph_id: s.read().ok()?,
            end_glyph_id: s.read().ok()?,
            start_coverage_index: s.read().ok()?,
        })
    }
}

#[derive(Clone, Copy)]
pub enum Coverage<'a> {
    Format1(LazyArray<'a, GlyphId>),
    Format2(LazyArray<'a, RangeRecord>),
}

impl<'a> Coverage<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        let format: u16 = s.read()?;
        match format {
            1 => {
                let count: u16 = s.read()?;
                Ok(Coverage::Format1(s.read_array(count as usize)?))
            }
            2 => {
                let count: u16 = s.read()?;
                Ok(Coverage::Format2(s.read_array(count as usize)?))
            }
            _ => Err(ParseFail),
        }
    }

    pub fn get(&self, glyph_id: GlyphId) -> Option<u16> {
        match self {
            Coverage::Format1(array) => {
                let (index, _) = array.binary_search_by(glyph_id, |g| g)?;
                Some(index as u16)
            }
            Coverage::Format2(array) => {
                for record in array.iter() {
                    if glyph_id >= record.start_glyph_id && glyph_id <= record.end_glyph_id {
                        let offset = glyph_id.to_u16() - record.start_glyph_id.to_u16();
                        return Some(record.start_coverage_index + offset);
                    }
                }
                None
            }
        }
    }

    pub fn len(&self) -> u16 {
        match self {
            Coverage::Format1(array) => array.len() as u16,
            Coverage::Format2(array) => {
                array.iter().map(|r| r.end_glyph_id.to_u16() - r.start_glyph_id.to_u16() + 1).sum()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
