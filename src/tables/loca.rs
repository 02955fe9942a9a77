//! `loca` — per-glyph offsets into `glyf`. Stored as either `u16` offsets
//! (halved) or `u32` offsets, selected by `head.indexToLocFormat`.

use crate::error::Result;
use crate::ids::GlyphId;
use crate::stream::{LazyArray, Stream};
use crate::tables::head::IndexToLocFormat;

#[derive(Clone, Copy)]
enum Offsets<'a> {
    Short(LazyArray<'a, u16>),
    Long(LazyArray<'a, u32>),
}

#[derive(Clone, Copy)]
pub struct Loca<'a> {
    offsets: Offsets<'a>,
}

impl<'a> Loca<'a> {
    pub fn parse(data: &'a [u8], num_glyphs: u16, format: IndexToLocFormat) -> Result<Self> {
        let mut s = Stream::new(data);
        let count = num_glyphs as usize + 1;
        let offsets = match format {
            IndexToLocFormat::Short => Offsets::Short(s.read_array(count)?),
            IndexToLocFormat::Long => Offsets::Long(s.read_array(count)?),
        };
        Ok(Loca { offsets })
    }

    /// The `[start, end)` byte range of `glyph_id` within `glyf`, or `None`
    /// if the glyph has no outline (an empty range).
    pub fn glyph_range(&self, glyph_id: GlyphId) -> Option<(u32, u32)> {
        let index = glyph_id.to_u16() as usize;
        let (start, end) = match self.offsets {
            Offsets::Short(array) => {
                let start = array.get(index)? as u32 * 2;
                let end = array.get(index + 1)? as u32 * 2;
                (start, end)
            }
            Offsets::Long(array) => (array.get(index)?, array.get(index + 1)?),
        };
        if end <= start {
            return None;
        }
        Some((start, end))
    }
}
