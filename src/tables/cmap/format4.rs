use crate::error::Result;
use crate::ids::GlyphId;
use crate::stream::{LazyArray, Stream};

/// Format 4: segment mapping to delta values, the standard BMP cmap format.
#[derive(Clone, Copy)]
pub struct Format4<'a> {
    end_codes: LazyArray<'a, u16>,
    start_codes: LazyArray<'a, u16>,
    id_deltas: LazyArray<'a, i16>,
    id_range_offsets: LazyArray<'a, u16>,
    // Byte offset (from the start of `data`) of the idRangeOffsets array,
    // needed because its values are interpreted as byte offsets from their
    // own slot.
    id_range_offsets_pos: usize,
    data: &'a [u8],
}

impl<'a> Format4<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        s.skip::<u16>()?; // format
        s.skip::<u16>()?; // length
        s.skip::<u16>()?; // language
        let seg_count_x2: u16 = s.read()?;
        let seg_count = (seg_count_x2 / 2) as usize;
        s.skip::<u16>()?; // searchRange
        s.skip::<u16>()?; // entrySelector
        s.skip::<u16>()?; // rangeShift

        let end_codes = s.read_array(seg_count)?;
        s.skip::<u16>()?; // reservedPad
        let start_codes = s.read_array(seg_count)?;
        let id_deltas = s.read_array(seg_count)?;
        let id_range_offsets_pos = s.offset();
        let id_range_offsets = s.read_array(seg_count)?;

        Ok(Format4 { end_codes, start_codes, id_deltas, id_range_offsets, id_range_offsets_pos, data })
    }

    pub fn glyph_index(&self, codepoint: u32) -> Option<GlyphId> {
        if codepoint > 0xFFFF {
            return None;
        }
        let code = codepoint as u16;

        // Binary search for the first segment whose endCode >= code.
        let mut lo = 0usize;
        let mut hi = self.end_codes.len();
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let end = self.end_codes.get(mid)?;
            if end < code {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        let segment = lo;
        let start = self.start_codes.get(segment)?;
        if code < start {
            return None;
        }
        let id_delta = self.id_deltas.get(segment)?;
        let id_range_offset = self.id_range_offsets.get(segment)?;

        if id_range_offset == 0 {
            let id = code.wrapping_add_signed(id_delta);
            return (id != 0).then(|| GlyphId::new(id));
        }

        let slot = self.id_range_offsets_pos + segment * 2;
        let glyph_offset =
            slot + id_range_offset as usize + 2 * (code - start) as usize;
        let bytes = self.data.get(glyph_offset..glyph_offset + 2)?;
        let raw = u16::from_be_bytes([bytes[0], bytes[1]]);
        if raw == 0 {
            return None;
        }
        let id = raw.wrapping_add_signed(id_delta);
        (id != 0).then(|| GlyphId::new(id))
    }
}
