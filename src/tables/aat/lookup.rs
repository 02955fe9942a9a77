//! AAT `Lookup` tables: six on-disk formats, all exposing
//! `get(glyph) -> value?`. Format 10 declares a byte width per value (1, 2,
//! or 4; 8 is explicitly unsupported and treated as absent).

use crate::error::{ParseFail, Result};
use crate::ids::GlyphId;
use crate::stream::{FromData, LazyArray, Stream};

const SEARCH_TERMINATOR: u16 = 0xFFFF;

#[derive(Debug, Clone, Copy)]
struct SegmentSingle {
    last_glyph: GlyphId,
    first_glyph: GlyphId,
    value: u16,
}

impl FromData for SegmentSingle {
    const SIZE: usize = 6;

    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(SegmentSingle {
            last_glyph: s.read().ok()?,
            first_glyph: s.read().ok()?,
            value: s.read().ok()?,
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct SegmentArray {
    last_glyph: GlyphId,
    first_glyph: GlyphId,
    values_offset: u16,
}

impl FromData for SegmentArray {
    const SIZE: usize = 6;

    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(SegmentArray {
            last_glyph: s.read().ok()?,
            first_glyph: s.read().ok()?,
            values_offset: s.read().ok()?,
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct TrimmedArrayHeader {
    first_glyph: GlyphId,
    glyph_count: u16,
}

#[derive(Clone, Copy)]
pub enum AatLookup<'a> {
    Format0(LazyArray<'a, u16>),
    Format2(LazyArray<'a, SegmentSingle>),
    Format4 { segments: LazyArray<'a, SegmentArray>, base: &'a [u8] },
    Format6(LazyArray<'a, (GlyphId, u16)>),
    Format8 { header: TrimmedArrayHeader, values: LazyArray<'a, u16> },
    Format10 { header: TrimmedArrayHeader, value_size: u8, data: &'a [u8] },
}

impl FromData for (GlyphId, u16) {
    const SIZE: usize = 4;

    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some((s.read().ok()?, s.read().ok()?))
    }
}

impl<'a> AatLookup<'a> {
    pub fn parse(data: &'a [u8], num_glyphs: u16) -> Result<Self> {
        let mut s = Stream::new(data);
        let format: u16 = s.read()?;
        match format {
            0 => Ok(AatLookup::Format0(s.read_array(num_glyphs as usize)?)),
            2 => {
                s.skip::<u16>()?; // unitSize
                let n_units: u16 = s.read()?;
                s.skip::<u16>()?; // searchRange
                s.skip::<u16>()?; // entrySelector
                s.skip::<u16>()?; // rangeShift
                Ok(AatLookup::Format2(s.read_array(n_units as usize)?))
            }
            4 => {
                s.skip::<u16>()?; // unitSize
                let n_units: u16 = s.read()?;
                s.skip::<u16>()?; // searchRange
                s.skip::<u16>()?; // entrySelector
                s.skip::<u16>()?; // rangeShift
                let segments = s.read_array(n_units as usize)?;
                Ok(AatLookup::Format4 { segments, base: data })
            }
            6 => {
                s.skip::<u16>()?; // unitSize
                let n_units: u16 = s.read()?;
                s.skip::<u16>()?; // searchRange
                s.skip::<u16>()?; // entrySelector
                s.skip::<u16>()?; // rangeShift
                Ok(AatLookup::Format6(s.read_array(n_units as usize)?))
            }
            8 => {
                let first_glyph: GlyphId = s.read()?;
                let glyph_count: u16 = s.read()?;
                let values = s.read_array(glyph_count as usize)?;
                Ok(AatLookup::Format8 { header: TrimmedArrayHeader { first_glyph, glyph_count }, values })
            }
            10 => {
                let value_size: u16 = s.read()?;
                let first_glyph: GlyphId = s.read()?;
                let glyph_count: u16 = s.read()?;
                if value_size == 8 {
                    return Err(ParseFail);
                }
                let tail = s.tail()?;
                Ok(AatLookup::Format10 {
                    header: TrimmedArrayHeader { first_glyph, glyph_count },
                    value_size: value_size as u8,
                    data: tail,
                })
            }
            _ => Err(ParseFail),
        }
    }

    pub fn get(&self, glyph_id: GlyphId) -> Option<u16> {
        match self {
            AatLookup::Format0(array) => array.get(glyph_id.to_u16() as usize),
            AatLookup::Format2(array) => {
                for seg in array.iter() {
                    if seg.first_glyph == GlyphId::new(SEARCH_TERMINATOR) {
                        break;
                    }
                    if glyph_id >= seg.first_glyph && glyph_id <= seg.last_glyph {
                        return Some(seg.value);
                    }
                }
                None
            }
            AatLookup::Format4 { segments, base } => {
                for seg in segments.iter() {
                    if seg.first_glyph == GlyphId::new(SEARCH_TERMINATOR) {
                        break;
                    }
                    if glyph_id >= seg.first_glyph && glyph_id <= seg.last_glyph {
                        let index = (glyph_id.to_u16() - seg.first_glyph.to_u16()) as usize;
                        let offset = seg.values_offset as usize + index * 2;
                        let bytes = base.get(offset..offset + 2)?;
                        return Some(u16::from_be_bytes([bytes[0], bytes[1]]));
                    }
                }
                None
            }
            AatLookup::Format6(array) => {
                for (g, value) in array.iter() {
                    if g == GlyphId::new(SEARCH_TERMINATOR) {
                        break;
                    }
                    if g == glyph_id {
                        return Some(value);
                    }
                }
                None
            }
            AatLookup::Format8 { header, values } => {
                let index = glyph_id.to_u16().checked_sub(header.first_glyph.to_u16())?;
                if index >= header.glyph_count {
                    return None;
                }
                values.get(index as usize)
            }
            AatLookup::Format10 { header, value_size, data } => {
                let index = glyph_id.to_u16().checked_sub(header.first_glyph.to_u16())?;
                if index >= header.glyph_count {
                    return None;
                }
                let size = *value_size as usize;
                let start = index as usize * size;
                let bytes = data.get(start..start + size)?;
                let mut value = 0u32;
                for &b in bytes {
                    value = (value << 8) | b as u32;
                }
                u16::try_from(value).ok()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_0_is_dense_by_glyph_index() {
        let mut d = vec![0u8; 2];
        d[0..2].copy_from_slice(&0u16.to_be_bytes());
        for v in [10u16, 20, 30] {
            d.extend_from_slice(&v.to_be_bytes());
        }
        let lookup = AatLookup::parse(&d, 3).unwrap();
        assert_eq!(lookup.get(GlyphId::new(1)), Some(20));
    }

    #[test]
    fn format_6_stops_at_terminator() {
        let mut d = vec![0u8; 2];
        d[0..2].copy_from_slice(&6u16.to_be_bytes());
        d.extend_from_slice(&4u16.to_be_bytes()); // unitSize
        d.extend_from_slice(&2u16.to_be_bytes()); // nUnits
        d.extend_from_slice(&0u16.to_be_bytes());
        d.extend_from_slice(&0u16.to_be_bytes());
        d.extend_from_slice(&5u16.to_be_bytes());
        d.extend_from_slice(&99u16.to_be_bytes());
        d.extend_from_slice(&0xFFFFu16.to_be_bytes());
        d.extend_from_slice(&0u16.to_be_bytes());
        let lookup = AatLookup::parse(&d, 0).unwrap();
        assert_eq!(lookup.get(GlyphId::new(5)), Some(99));
        assert_eq!(lookup.get(GlyphId::new(0xFFFF)), None);
    }
}
