//! `hmtx`/`vmtx` — horizontal/vertical metrics tables.
//!
//! Both tables share the exact wire shape: `number_of_metrics` full
//! `(advance, side_bearing)` records followed by `num_glyphs -
//! number_of_metrics` bare side-bearing values (monospace tail). One
//! generic parser backs both `Face::glyph_hor_advance` and
//! `Face::glyph_ver_advance`.

use crate::error::{ParseFail, Result};
use crate::ids::GlyphId;
use crate::stream::{FromData, LazyArray, Stream};

#[derive(Debug, Clone, Copy)]
struct LongMetric {
    advance: u16,
    side_bearing: i16,
}

impl FromData for LongMetric {
    const SIZE: usize = 4;

    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(LongMetric { advance: s.read().ok()?, side_bearing: s.read().ok()? })
    }
}

#[derive(Clone, Copy)]
pub struct MetricsTable<'a> {
    long_metrics: LazyArray<'a, LongMetric>,
    extra_side_bearings: LazyArray<'a, i16>,
}

impl<'a> MetricsTable<'a> {
    pub fn parse(data: &'a [u8], num_glyphs: u16, number_of_metrics: u16) -> Result<Self> {
        if number_of_metrics == 0 {
            return Err(ParseFail);
        }
        let mut s = Stream::new(data);
        let long_metrics: LazyArray<LongMetric> = s.read_array(number_of_metrics as usize)?;
        let extra_count = num_glyphs.saturating_sub(number_of_metrics);
        let extra_side_bearings: LazyArray<i16> = s.read_array(extra_count as usize)?;
        Ok(MetricsTable { long_metrics, extra_side_bearings })
    }

    pub fn advance(&self, glyph_id: GlyphId) -> Option<u16> {
        let index = glyph_id.to_u16() as usize;
        if index < self.long_metrics.len() {
            Some(self.long_metrics.get(index)?.advance)
        } else {
            // Monospace tail: all glyphs past the explicit list share the
            // last metric's advance.
            self.long_metrics.get(self.long_metrics.len().checked_sub(1)?).map(|m| m.advance)
        }
    }

    pub fn side_bearing(&self, glyph_id: GlyphId) -> Option<i16> {
        let index = glyph_id.to_u16() as usize;
        if index < self.long_metrics.len() {
            Some(self.long_metrics.get(index)?.side_bearing)
        } else {
            let extra_index = index - self.long_metrics.len();
            self.extra_side_bearings.get(extra_index)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<u8> {
        let mut d = Vec::new();
        for (advance, lsb) in [(600u16, 10i16), (700, -5)] {
            d.extend_from_slice(&advance.to_be_bytes());
            d.extend_from_slice(&lsb.to_be_bytes());
        }
        d.extend_from_slice(&3i16.to_be_bytes()); // trailing lsb for glyph 2
        d
    }

    #[test]
    fn monospace_tail_reuses_last_advance() {
        let data = sample();
        let table = MetricsTable::parse(&data, 3, 2).unwrap();
        assert_eq!(table.advance(GlyphId::new(0)), Some(600));
        assert_eq!(table.advance(GlyphId::new(1)), Some(700));
        assert_eq!(table.advance(GlyphId::new(2)), Some(700));
        assert_eq!(table.side_bearing(GlyphId::new(2)), Some(3));
    }
}
