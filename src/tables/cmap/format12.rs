use crate::error::Result;
use crate::ids::GlyphId;
use crate::stream::{FromData, LazyArray, Stream};

#[derive(Debug, Clone, Copy)]
struct SequentialGroup {
    start_char_code: u32,
    end_char_code: u32,
    start_glyph_id: u32,
}

impl FromData for SequentialGroup {
    const SIZE: usize = 12;

    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(SequentialGroup {
            start_char_code: s.read().ok()?,
            end_char_code: s.read().ok()?,
            start_glyph_id: s.read().ok()?,
        })
    }
}

/// Format 12: segmented coverage, for full Unicode (including
/// supplementary-plane) codepoints mapped to sequential glyph ids.
#[derive(Clone, Copy)]
pub struct Format12<'a> {
    groups: LazyArray<'a, SequentialGroup>,
}

impl<'a> Format12<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        s.skip::<u16>()?; // format
        s.skip::<u16>()?; // reserved
        s.skip::<u32>()?; // length
        s.skip::<u32>()?; // language
        let num_groups: u32 = s.read()?;
        let groups = s.read_array(num_groups as usize)?;
        Ok(Format12 { groups })
    }

    pub fn glyph_index(&self, codepoint: u32) -> Option<GlyphId> {
        let (_, group) = self.groups.binary_search_by(codepoint, |g| {
            if codepoint < g.start_char_code {
                g.start_char_code
            } else if codepoint > g.end_char_code {
                g.end_char_code
            } else {
                codepoint
            }
        })?;
        if codepoint < group.start_char_code || codepoint > group.end_char_code {
            return None;
        }
        let id = group.start_glyph_id + (codepoint - group.start_char_code);
        u16::try_from(id).ok().map(GlyphId::new)
    }
}
