use crate::error::Result;
use crate::ids::GlyphId;
use crate::stream::{LazyArray, Stream};

/// Format 6: trimmed table mapping, a dense array over a contiguous
/// codepoint range.
#[derive(Clone, Copy)]
pub struct Format6<'a> {
    first_code: u16,
    glyph_ids: LazyArray<'a, u16>,
}

impl<'a> Format6<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        s.skip::<u16>()?; // format
        s.skip::<u16>()?; // length
        s.skip::<u16>()?; // language
        let first_code: u16 = s.read()?;
        let entry_count: u16 = s.read()?;
        let glyph_ids = s.read_array(entry_count as usize)?;
        Ok(Format6 { first_code, glyph_ids })
    }

    pub fn glyph_index(&self, codepoint: u32) -> Option<GlyphId> {
        let code = u16::try_from(codepoint).ok()?;
        let index = code.checked_sub(self.first_code)?;
        let id = self.glyph_ids.get(index as usize)?;
        (id != 0).then(|| GlyphId::new(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_within_contiguous_range_and_rejects_outside() {
        let mut d = vec![0u8; 10];
        d[6..8].copy_from_slice(&100u16.to_be_bytes());
        d[8..10].copy_from_slice(&3u16.to_be_bytes());
        d.extend_from_slice(&5u16.to_be_bytes());
        d.extend_from_slice(&6u16.to_be_bytes());
        d.extend_from_slice(&7u16.to_be_bytes());
        let table = Format6::parse(&d).unwrap();
        assert_eq!(table.glyph_index(100), Some(GlyphId::new(5)));
        assert_eq!(table.glyph_index(102), Some(GlyphId::new(7)));
        assert_eq!(table.glyph_index(103), None);
        assert_eq!(table.glyph_index(99), None);
    }
}
