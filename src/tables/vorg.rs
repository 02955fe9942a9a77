//! `VORG` — vertical origin overrides for CFF color/vertical fonts.

use crate::error::Result;
use crate::ids::GlyphId;
use crate::stream::{FromData, LazyArray, Stream};

#[derive(Debug, Clone, Copy)]
struct VertOriginRecord {
    glyph_id: GlyphId,
    vert_origin_y: i16,
}

impl FromData for VertOriginRecord {
    const SIZE: usize = 4;

    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(VertOriginRecord { glyph_id: s.read().ok()?, vert_origin_y: s.read().ok()? })
    }
}

#[derive(Clone, Copy)]
pub struct Vorg<'a> {
    default_vert_origin_y: i16,
    records: LazyArray<'a, VertOriginRecord>,
}

impl<'a> Vorg<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        s.skip::<u16>()?; // majorVersion
        s.skip::<u16>()?; // minorVersion
        let default_vert_origin_y: i16 = s.read()?;
        let num_vert_origin_y_metrics: u16 = s.read()?;
        let records = s.read_array(num_vert_origin_y_metrics as usize)?;
        Ok(Vorg { default_vert_origin_y, records })
    }

    pub fn y_origin(&self, glyph_id: GlyphId) -> i16 {
        self.records
            .binary_search_by(glyph_id, |r| r.glyph_id)
            .map(|(_, r)| r.vert_origin_y)
            .unwrap_or(self.default_vert_origin_y)
    }
}
