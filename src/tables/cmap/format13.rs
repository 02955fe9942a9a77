use crate::error::Result;
use crate::ids::GlyphId;
use crate::stream::{FromData, LazyArray, Stream};

#[derive(Debug, Clone, Copy)]
struct ConstantGroup {
    start_char_code: u32,
    end_char_code: u32,
    glyph_id: u32,
}

impl FromData for ConstantGroup {
    const SIZE: usize = 12;

    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(ConstantGroup {
            start_char_code: s.read().ok()?,
            end_char_code: s.read().ok()?,
            glyph_id: s.read().ok()?,
        })
    }
}

/// Format 13: many-to-one range mapping, used by "last resort" fonts where
/// an entire codepoint range maps to a single placeholder glyph.
#[derive(Clone, Copy)]
pub struct Format13<'a> {
    groups: LazyArray<'a, ConstantGroup>,
}

impl<'a> Format13<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        s.skip::<u16>()?; // format
        s.skip::<u16>()?; // reserved
        s.skip::<u32>()?; // length
        s.skip::<u32>()?; // language
        let num_groups: u32 = s.read()?;
        let groups = s.read_array(num_groups as usize)?;
        Ok(Format13 { groups })
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
        u16::try_from(group.glyph_id).ok().map(GlyphId::new)
    }
}
