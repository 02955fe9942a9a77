//! `sbix` standalone bitmap glyph data: strikes indexed by
//! ppem; each strike maps glyph → `(x, y, format_tag, bytes)`. The `dupe`
//! tag recursively redirects to another glyph id, with a recursion limit
//! of 1 (one level of indirection, no chains).

use crate::error::{ParseFail, Result};
use crate::ids::{GlyphId, Tag};
use crate::stream::{FromData, LazyArray, Stream};

const DUPE_MAX_DEPTH: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphImage<'a> {
    pub origin_x: i16,
    pub origin_y: i16,
    pub graphic_type: Tag,
    pub data: &'a [u8],
}

/// Width/height decoded from a `png` payload's IHDR chunk, if the data is
/// at least that large. PNG signature (8) + chunk length/type (8) precede
/// the 4-byte width and 4-byte height fields.
pub fn png_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    let width_bytes: [u8; 4] = data.get(16..20)?.try_into().ok()?;
    let height_bytes: [u8; 4] = data.get(20..24)?.try_into().ok()?;
    Some((u32::from_be_bytes(width_bytes), u32::from_be_bytes(height_bytes)))
}

#[derive(Clone, Copy)]
pub struct Strike<'a> {
    pub ppem: u16,
    pub resolution: u16,
    data: &'a [u8],
    glyph_data_offsets: LazyArray<'a, u32>,
}

impl<'a> Strike<'a> {
    fn parse(data: &'a [u8], num_glyphs: u16) -> Result<Self> {
        let mut s = Stream::new(data);
        let ppem: u16 = s.read()?;
        let resolution: u16 = s.read()?;
        let glyph_data_offsets = s.read_array(num_glyphs as usize + 1)?;
        Ok(Strike { ppem, resolution, data, glyph_data_offsets })
    }

    fn raw_glyph(&self, glyph_id: GlyphId) -> Option<GlyphImage<'a>> {
        let index = glyph_id.to_u16() as usize;
        let start = self.glyph_data_offsets.get(index)?;
        let end = self.glyph_data_offsets.get(index + 1)?;
        if end <= start {
            return None;
        }
        let bytes = self.data.get(start as usize..end as usize)?;
        let mut s = Stream::new(bytes);
        let origin_x: i16 = s.read().ok()?;
        let origin_y: i16 = s.read().ok()?;
        let graphic_type: Tag = s.read().ok()?;
        let payload = s.tail().ok()?;
        Some(GlyphImage { origin_x, origin_y, graphic_type, data: payload })
    }

    /// Resolves `dupe` redirection up to one level deep.
    pub fn get(&self, glyph_id: GlyphId) -> Option<GlyphImage<'a>> {
        self.get_with_depth(glyph_id, 0)
    }

    fn get_with_depth(&self, glyph_id: GlyphId, depth: u8) -> Option<GlyphImage<'a>> {
        let image = self.raw_glyph(glyph_id)?;
        if image.graphic_type == Tag::new(b"dupe") {
            if depth >= DUPE_MAX_DEPTH || image.data.len() < 2 {
                return None;
            }
            let target = u16::from_be_bytes([image.data[0], image.data[1]]);
            return self.get_with_depth(GlyphId::new(target), depth + 1);
        }
        Some(image)
    }
}

#[derive(Clone, Copy)]
pub struct Sbix<'a> {
    data: &'a [u8],
    num_glyphs: u16,
    strike_offsets: LazyArray<'a, u32>,
}

impl<'a> Sbix<'a> {
    pub fn parse(data: &'a [u8], num_glyphs: u16) -> Result<Self> {
        let mut s = Stream::new(data);
        s.skip::<u16>()?; // version
        s.skip::<u16>()?; // flags
        let num_strikes: u32 = s.read()?;
        let strike_offsets = s.read_array(num_strikes as usize)?;
        Ok(Sbix { data, num_glyphs, strike_offsets })
    }

    pub fn strike_count(&self) -> u32 {
        self.strike_offsets.len() as u32
    }

    pub fn strike(&self, index: u32) -> Result<Strike<'a>> {
        let offset = self.strike_offsets.get(index as usize).ok_or(ParseFail)?;
        Strike::parse(self.data.get(offset as usize..).ok_or(ParseFail)?, self.num_glyphs)
    }

    /// The strike whose `ppem` is closest to, without exceeding, `ppem`,
    /// falling back to the smallest strike if all are larger.
    pub fn strike_for_ppem(&self, ppem: u16) -> Option<Strike<'a>> {
        let mut best: Option<Strike<'a>> = None;
        for i in 0..self.strike_count() {
            let Ok(candidate) = self.strike(i) else { continue };
            let better = match best {
                None => true,
                Some(b) if candidate.ppem <= ppem && candidate.ppem > b.ppem => true,
                Some(b) if b.ppem > ppem && candidate.ppem < b.ppem => true,
                _ => false,
            };
            if better {
                best = Some(candidate);
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_glyph_data(buf: &mut Vec<u8>, origin_x: i16, origin_y: i16, tag: &[u8; 4], payload: &[u8]) -> (u32, u32) {
        let start = buf.len() as u32;
        buf.extend_from_slice(&origin_x.to_be_bytes());
        buf.extend_from_slice(&origin_y.to_be_bytes());
        buf.extend_from_slice(tag);
        buf.extend_from_slice(payload);
        (start, buf.len() as u32)
    }

    #[test]
    fn dupe_tag_redirects_to_target_glyph_png() {
        // Build a minimal strike with 2 glyphs: glyph 0 = png with IHDR
        // width/height, glyph 1 = dupe -> glyph 0.
        let mut png_payload = vec![0u8; 24];
        png_payload[16..20].copy_from_slice(&100u32.to_be_bytes()); // width
        png_payload[20..24].copy_from_slice(&50u32.to_be_bytes()); // height

        let mut glyph_data = Vec::new();
        let (g0_start, g0_end) = push_glyph_data(&mut glyph_data, 0, 0, b"png ", &png_payload);
        let (g1_start, g1_end) = push_glyph_data(&mut glyph_data, 0, 0, b"dupe", &0u16.to_be_bytes());

        let mut strike_bytes = Vec::new();
        strike_bytes.extend_from_slice(&20u16.to_be_bytes()); // ppem
        strike_bytes.extend_from_slice(&72u16.to_be_bytes()); // resolution
        let header_len = strike_bytes.len() as u32;
        for off in [g0_start, g1_start, g1_end] {
            strike_bytes.extend_from_slice(&(off + header_len).to_be_bytes());
        }
        let _ = g0_end;
        strike_bytes.extend_from_slice(&glyph_data);

        let mut d = Vec::new();
        d.extend_from_slice(&1u16.to_be_bytes()); // version
        d.extend_from_slice(&0u16.to_be_bytes()); // flags
        d.extend_from_slice(&1u32.to_be_bytes()); // numStrikes
        let strike_offset_pos = d.len();
        d.extend_from_slice(&0u32.to_be_bytes());
        let strike_offset = d.len() as u32;
        d.extend_from_slice(&strike_bytes);
        d[strike_offset_pos..strike_offset_pos + 4].copy_from_slice(&strike_offset.to_be_bytes());

        let sbix = Sbix::parse(&d, 2).unwrap();
        let strike = sbix.strike(0).unwrap();
        let image = strike.get(GlyphId::new(1)).unwrap();
        assert_eq!(image.graphic_type, Tag::new(b"png "));
        assert_eq!(png_dimensions(image.data), Some((100, 50)));
    }
}
