use crate::error::Result;
use crate::ids::GlyphId;
use crate::stream::{FromData, LazyArray, Stream};

#[derive(Debug, Clone, Copy)]
struct SubHeader {
    first_code: u16,
    entry_count: u16,
    id_delta: i16,
    id_range_offset: u16,
}

impl FromData for SubHeader {
    const SIZE: usize = 8;

    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(SubHeader {
            first_code: s.read().ok()?,
            entry_count: s.read().ok()?,
            id_delta: s.read().ok()?,
            id_range_offset: s.read().ok()?,
        })
    }
}

/// Format 2: high-byte mapping through table, for legacy mixed 8/16-bit
/// CJK encodings. The low byte of a two-byte codepoint selects a sub-header
/// (or, for single-byte codepoints, sub-header 0 is used directly).
#[derive(Clone, Copy)]
pub struct Format2<'a> {
    sub_header_keys: LazyArray<'a, u16>,
    data: &'a [u8],
    sub_headers_offset: usize,
}

impl<'a> Format2<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        s.skip::<u16>()?; // format
        s.skip::<u16>()?; // length
        s.skip::<u16>()?; // language
        let sub_header_keys = s.read_array(256)?;
        let sub_headers_offset = s.offset();
        Ok(Format2 { sub_header_keys, data, sub_headers_offset })
    }

    pub fn glyph_index(&self, codepoint: u32) -> Option<GlyphId> {
        if codepoint > 0xFFFF {
            return None;
        }
        let (high, low) = ((codepoint >> 8) as u8, (codepoint & 0xFF) as u8);
        let key = self.sub_header_keys.get(high as usize)? / 8;
        let header_bytes = self.data.get(self.sub_headers_offset + key as usize * 8..)?;
        let header = SubHeader::parse(header_bytes.get(..SubHeader::SIZE)?)?;

        let code = if key == 0 { codepoint as u16 } else { low as u16 };
        if code < header.first_code || code >= header.first_code + header.entry_count {
            return None;
        }
        let index_in_range = (code - header.first_code) as usize;

        let range_base = self.sub_headers_offset + key as usize * 8 + 6; // offset of idRangeOffset field
        let glyph_array_base = range_base + header.id_range_offset as usize;
        let glyph_offset = glyph_array_base + index_in_range * 2;
        let raw: u16 = {
            let bytes = self.data.get(glyph_offset..glyph_offset + 2)?;
            u16::from_be_bytes([bytes[0], bytes[1]])
        };
        if raw == 0 {
            return None;
        }
        let id = (raw as i32 + header.id_delta as i32) as u16;
        Some(GlyphId::new(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A single-byte-only table: every high byte keys sub-header 0, which
    /// covers the full `0..256` code range with no delta.
    fn sample(mapped_codepoint: u8, glyph_id: u16) -> Vec<u8> {
        let mut d = Vec::new();
        d.extend_from_slice(&2u16.to_be_bytes()); // format
        d.extend_from_slice(&0u16.to_be_bytes()); // length (unused)
        d.extend_from_slice(&0u16.to_be_bytes()); // language
        d.extend_from_slice(&[0u8; 512]); // subHeaderKeys[256], all 0

        // SubHeader 0: firstCode=0, entryCount=256, idDelta=0, idRangeOffset=2
        // (glyph array starts right after this 8-byte header).
        d.extend_from_slice(&0u16.to_be_bytes());
        d.extend_from_slice(&256u16.to_be_bytes());
        d.extend_from_slice(&0i16.to_be_bytes());
        d.extend_from_slice(&2u16.to_be_bytes());

        let mut glyphs = [0u16; 256];
        glyphs[mapped_codepoint as usize] = glyph_id;
        for g in glyphs {
            d.extend_from_slice(&g.to_be_bytes());
        }
        d
    }

    #[test]
    fn single_byte_codepoint_resolves_through_sub_header_zero() {
        let data = sample(65, 10);
        let table = Format2::parse(&data).unwrap();
        assert_eq!(table.glyph_index(65), Some(GlyphId::new(10)));
    }

    #[test]
    fn unmapped_codepoint_in_range_is_none() {
        let data = sample(65, 10);
        let table = Format2::parse(&data).unwrap();
        assert_eq!(table.glyph_index(66), None);
    }

    #[test]
    fn codepoint_above_0xffff_is_rejected() {
        let data = sample(65, 10);
        let table = Format2::parse(&data).unwrap();
        assert_eq!(table.glyph_index(0x1_0041), None);
    }
}
