//! CFF2 (`CFF2`) outline: structurally like CFF1 but with a 32-bit-count
//! INDEX, no `endchar`, and operand blending driven by an Item Variation
//! Store rather than a `Private` DICT size/offset pair.

use crate::error::{CffError, ParseFail, Result};
use crate::ids::{GlyphId, Rect};
use crate::outline::OutlineBuilder;
use crate::stream::Stream;
use crate::tables::cff::{dict, CharstringInterpreter, Dict, Index};

#[derive(Clone, Copy)]
pub struct Cff2Table<'a> {
    charstrings: Index<'a>,
    global_subrs: Index<'a>,
    local_subrs: Index<'a>,
}

impl<'a> Cff2Table<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        s.skip::<u8>()?; // major
        s.skip::<u8>()?; // minor
        let header_size: u8 = s.read()?;
        s.skip::<u16>()?; // topDictLength

        s.set_offset(header_size as usize)?;
        let top_dict_data = s.read_bytes(top_dict_length(data)?)?;
        let top_dict = Dict::parse(top_dict_data)?;

        let global_subrs = Index::parse_cff2(&mut s)?;

        let charstrings_offset = top_dict.get_int(dict::OP_CHARSTRINGS).ok_or(ParseFail)?;
        let mut cs_stream = Stream::new(data.get(charstrings_offset as usize..).ok_or(ParseFail)?);
        let charstrings = Index::parse_cff2(&mut cs_stream)?;

        // Variable-font blending (Private DICT's vsindex-driven delta
        // application) is not applied; charstrings are interpreted with
        // their default-instance operand values only.
        let local_subrs = match top_dict.get_pair(dict::OP_PRIVATE) {
            Some((size, offset)) => {
                let private_data =
                    data.get(offset as usize..(offset as usize + size as usize)).ok_or(ParseFail)?;
                let private_dict = Dict::parse(private_data)?;
                match private_dict.get_int(dict::OP_SUBRS) {
                    Some(subrs_offset) => {
                        let absolute = offset as usize + subrs_offset as usize;
                        let mut subr_stream = Stream::new(data.get(absolute..).ok_or(ParseFail)?);
                        Index::parse_cff2(&mut subr_stream)?
                    }
                    None => Index::default(),
                }
            }
            None => Index::default(),
        };

        Ok(Cff2Table { charstrings, global_subrs, local_subrs })
    }

    pub fn glyph_count(&self) -> u32 {
        self.charstrings.len()
    }

    pub fn outline(
        &self,
        glyph_id: GlyphId,
        builder: &mut dyn OutlineBuilder,
    ) -> core::result::Result<Rect, CffError> {
        let charstring = self.charstrings.get(glyph_id.to_u16() as u32).ok_or(CffError::MissingMoveTo)?;
        let interpreter = CharstringInterpreter::new(self.global_subrs, self.local_subrs, builder);
        interpreter.run(charstring)
    }
}

fn top_dict_length(data: &[u8]) -> Result<usize> {
    // `topDictLength` sits at a fixed offset right after major/minor/headerSize,
    // independent of `headerSize` itself (which only says where the Top DICT
    // data starts, not where its length field is encoded).
    let bytes = data.get(3..5).ok_or(ParseFail)?;
    Ok(u16::from_be_bytes([bytes[0], bytes[1]]) as usize)
}
