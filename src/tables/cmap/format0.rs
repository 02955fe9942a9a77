use crate::error::Result;
use crate::ids::GlyphId;
use crate::stream::Stream;

/// Format 0: a byte-encoding table, one glyph index per codepoint in
/// `0..256`. Used only by legacy single-byte Macintosh cmaps.
#[derive(Clone, Copy)]
pub struct Format0<'a> {
    glyph_ids: &'a [u8],
}

impl<'a> Format0<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        s.skip::<u16>()?; // format
        s.skip::<u16>()?; // length
        s.skip::<u16>()?; // language
        let glyph_ids = s.read_bytes(256)?;
        Ok(Format0 { glyph_ids })
    }

    pub fn glyph_index(&self, codepoint: u32) -> Option<GlyphId> {
        let index = u8::try_from(codepoint).ok()?;
        let id = *self.glyph_ids.get(index as usize)?;
        (id != 0).then(|| GlyphId::new(id as u16))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_byte_codepoints_and_rejects_wide_ones() {
        let mut d = vec![0u8; 6];
        d.extend(std::iter::repeat_n(0u8, 256));
        d[6 + 65] = 10; // 'A' -> glyph 10
        let table = Format0::parse(&d).unwrap();
        assert_eq!(table.glyph_index(65), Some(GlyphId::new(10)));
        assert_eq!(table.glyph_index(0x1_0041), None);
        assert_eq!(table.glyph_index(66), None);
    }
}
