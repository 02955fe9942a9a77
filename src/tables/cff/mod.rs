//! CFF / CFF2 outline: INDEX and DICT readers feeding a
//! Type 2 charstring interpreter.

mod charstring;
pub(crate) mod dict;
mod index;

pub use charstring::{subr_bias, CharstringInterpreter};
pub use dict::Dict;
pub use index::Index;

use crate::error::{CffError, ParseFail, Result};
use crate::ids::{GlyphId, Rect};
use crate::outline::OutlineBuilder;
use crate::stream::Stream;

/// A parsed CFF (`CFF `) table: charstrings plus the global/local subroutine
/// pools needed to interpret them.
#[derive(Clone, Copy)]
pub struct CffTable<'a> {
    charstrings: Index<'a>,
    global_subrs: Index<'a>,
    local_subrs: Index<'a>,
}

impl<'a> CffTable<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        s.skip::<u8>()?; // major
        s.skip::<u8>()?; // minor
        let header_size: u8 = s.read()?;
        s.skip::<u8>()?; // offSize

        s.set_offset(header_size as usize)?;
        let _names = Index::parse(&mut s)?;
        let top_dicts = Index::parse(&mut s)?;
        let _strings = Index::parse(&mut s)?;
        let global_subrs = Index::parse(&mut s)?;

        let top_dict_data = top_dicts.get(0).ok_or(ParseFail)?;
        let top_dict = Dict::parse(top_dict_data)?;

        let charstrings_offset = top_dict.get_int(dict::OP_CHARSTRINGS).ok_or(ParseFail)?;
        let mut cs_stream = Stream::new(data.get(charstrings_offset as usize..).ok_or(ParseFail)?);
        let charstrings = Index::parse(&mut cs_stream)?;

        let local_subrs = match top_dict.get_pair(dict::OP_PRIVATE) {
            Some((size, offset)) => {
                let private_data =
                    data.get(offset as usize..(offset as usize + size as usize)).ok_or(ParseFail)?;
                let private_dict = Dict::parse(private_data)?;
                match private_dict.get_int(dict::OP_SUBRS) {
                    Some(subrs_offset) => {
                        let absolute = offset as usize + subrs_offset as usize;
                        let mut subr_stream = Stream::new(data.get(absolute..).ok_or(ParseFail)?);
                        Index::parse(&mut subr_stream)?
                    }
                    None => Index::default(),
                }
            }
            None => Index::default(),
        };

        Ok(CffTable { charstrings, global_subrs, local_subrs })
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

#[cfg(test)]
mod tests {
    use super::*;

    struct NullBuilder;
    impl OutlineBuilder for NullBuilder {
        fn move_to(&mut self, _x: f32, _y: f32) {}
        fn line_to(&mut self, _x: f32, _y: f32) {}
        fn quad_to(&mut self, _x1: f32, _y1: f32, _x: f32, _y: f32) {}
        fn curve_to(&mut self, _x1: f32, _y1: f32, _x2: f32, _y2: f32, _x: f32, _y: f32) {}
        fn close(&mut self) {}
    }

    #[test]
    fn hmoveto_then_endchar_emits_a_point_and_closes() {
        // Charstring: 10 20 hmoveto(22), then endchar(14). The leading `10`
        // is consumed as the glyph width, leaving `dx = 20`.
        let charstring = [149u8, 159, 22, 14];
        let global_subrs = Index::default();
        let local_subrs = Index::default();

        struct Recording {
            moved_to: Option<(f32, f32)>,
            closed: bool,
        }
        impl OutlineBuilder for Recording {
            fn move_to(&mut self, x: f32, y: f32) {
                self.moved_to = Some((x, y));
            }
            fn line_to(&mut self, _x: f32, _y: f32) {}
            fn quad_to(&mut self, _x1: f32, _y1: f32, _x: f32, _y: f32) {}
            fn curve_to(&mut self, _x1: f32, _y1: f32, _x2: f32, _y2: f32, _x: f32, _y: f32) {}
            fn close(&mut self) {
                self.closed = true;
            }
        }

        let mut recorder = Recording { moved_to: None, closed: false };
        let interpreter = CharstringInterpreter::new(global_subrs, local_subrs, &mut recorder);
        let rect = interpreter.run(&charstring).unwrap();

        assert_eq!(recorder.moved_to, Some((20.0, 0.0)));
        assert!(recorder.closed);
        assert_eq!(rect, Rect { x_min: 20, y_min: 0, x_max: 20, y_max: 0 });
    }

    #[test]
    fn recursive_callsubr_hits_nesting_limit() {
        // Local subr 0: push 0, callsubr (recurses into itself forever).
        // Bias for count=1 is 107, so pushing `-107` selects index 0.
        let subr_index_operand = encode_int(-107);
        let mut subr0 = subr_index_operand.clone();
        subr0.push(10); // callsubr

        let mut offsets = vec![1u8];
        let mut index_bytes = Vec::new();
        index_bytes.extend_from_slice(&1u16.to_be_bytes()); // count
        index_bytes.push(1); // offSize
        offsets.push((1 + subr0.len()) as u8);
        index_bytes.extend_from_slice(&offsets);
        index_bytes.extend_from_slice(&subr0);

        let mut s = Stream::new(&index_bytes);
        let local_subrs = Index::parse(&mut s).unwrap();
        let global_subrs = Index::default();

        let mut charstring = subr_index_operand;
        charstring.push(10); // callsubr

        let mut builder = NullBuilder;
        let interpreter = CharstringInterpreter::new(global_subrs, local_subrs, &mut builder);
        let result = interpreter.run(&charstring);
        assert!(matches!(result, Err(CffError::NestingLimitReached)));
    }

    fn encode_int(value: i32) -> Vec<u8> {
        if (-107..=107).contains(&value) {
            vec![(value + 139) as u8]
        } else {
            let mut v = vec![28u8];
            v.extend_from_slice(&(value as i16).to_be_bytes());
            v
        }
    }
}
