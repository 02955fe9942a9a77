//! `post` — PostScript information. Versions 1.0/2.0/2.5/3.0; only 2.0
//! carries a glyph-name table (the others declare italic angle and
//! underline metrics only).

use crate::error::{ParseFail, Result};
use crate::ids::GlyphId;
use crate::numeric::Fixed;
use crate::stream::{LazyArray, Stream};

/// The 258 standard Macintosh glyph order names used by `post` format 1.0
/// and as the fallback table for format 2.0 indices `< 258`.
pub const MAC_GLYPH_NAMES: &[&str] = &[
    ".notdef", ".null", "nonmarkingreturn", "space", "exclam", "quotedbl", "numbersign", "dollar",
    "percent", "ampersand", "quotesingle", "parenleft", "parenright", "asterisk", "plus", "comma",
    "hyphen", "period", "slash", "zero", "one", "two", "three", "four", "five", "six", "seven",
    "eight", "nine", "colon", "semicolon", "less", "equal", "greater", "question", "at", "A", "B",
    "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R", "S", "T", "U",
    "V", "W", "X", "Y", "Z", "bracketleft", "backslash", "bracketright", "asciicircum",
    "underscore", "grave", "a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n",
    "o", "p", "q", "r", "s", "t", "u", "v", "w", "x", "y", "z", "braceleft", "bar", "braceright",
    "asciitilde",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Version {
    V1,
    V2,
    V2_5,
    V3,
}

#[derive(Clone, Copy)]
pub struct Post<'a> {
    version: Version,
    pub italic_angle: Fixed,
    pub underline_position: i16,
    pub underline_thickness: i16,
    pub is_fixed_pitch: bool,
    glyph_name_indices: LazyArray<'a, u16>,
    pascal_strings: &'a [u8],
}

impl<'a> Post<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        let raw_version: u32 = s.read()?;
        let italic_angle: Fixed = s.read()?;
        let underline_position: i16 = s.read()?;
        let underline_thickness: i16 = s.read()?;
        let is_fixed_pitch: u32 = s.read()?;
        s.skip::<u32>()?; // minMemType42
        s.skip::<u32>()?; // maxMemType42
        s.skip::<u32>()?; // minMemType1
        s.skip::<u32>()?; // maxMemType1

        let version = match raw_version {
            0x0001_0000 => Version::V1,
            0x0002_0000 => Version::V2,
            0x0002_5000 => Version::V2_5,
            0x0003_0000 => Version::V3,
            _ => return Err(ParseFail),
        };

        let (glyph_name_indices, pascal_strings) = if version == Version::V2 {
            let num_glyphs: u16 = s.read()?;
            let indices: LazyArray<u16> = s.read_array(num_glyphs as usize)?;
            let tail = s.tail()?;
            (indices, tail)
        } else {
            (LazyArray::empty(), &[][..])
        };

        Ok(Post {
            version,
            italic_angle,
            underline_position,
            underline_thickness,
            is_fixed_pitch: is_fixed_pitch != 0,
            glyph_name_indices,
            pascal_strings,
        })
    }

    /// Glyph name for `glyph_id`, if the `post` version carries names.
    pub fn glyph_name(&self, glyph_id: GlyphId) -> Option<&'a str> {
        if self.version != Version::V2 {
            return None;
        }
        let index = self.glyph_name_indices.get(glyph_id.to_u16() as usize)? as usize;
        if index < 258 {
            return MAC_GLYPH_NAMES.get(index).copied();
        }
        let target = index - 258;
        let mut offset = 0usize;
        for _ in 0..target {
            let len = *self.pascal_strings.get(offset)? as usize;
            offset = offset.checked_add(1)?.checked_add(len)?;
        }
        let len = *self.pascal_strings.get(offset)? as usize;
        let start = offset + 1;
        let bytes = self.pascal_strings.get(start..start + len)?;
        core::str::from_utf8(bytes).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_1_has_no_glyph_names() {
        let mut d = vec![0u8; 32];
        d[0..4].copy_from_slice(&0x0001_0000u32.to_be_bytes());
        let post = Post::parse(&d).unwrap();
        assert_eq!(post.glyph_name(GlyphId::new(0)), None);
    }

    #[test]
    fn version_2_resolves_standard_and_custom_names() {
        let mut d = vec![0u8; 32];
        d[0..4].copy_from_slice(&0x0002_0000u32.to_be_bytes());
        d.extend_from_slice(&2u16.to_be_bytes()); // numGlyphs
        d.extend_from_slice(&4u16.to_be_bytes()); // glyph 0 -> "exclam" (index 4)
        d.extend_from_slice(&258u16.to_be_bytes()); // glyph 1 -> custom name
        d.push(4); // pascal string length
        d.extend_from_slice(b"abcd");

        let post = Post::parse(&d).unwrap();
        assert_eq!(post.glyph_name(GlyphId::new(0)), Some("exclam"));
        assert_eq!(post.glyph_name(GlyphId::new(1)), Some("abcd"));
    }
}
