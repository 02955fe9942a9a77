use crate::error::Result;
use crate::ids::GlyphId;
use crate::stream::{FromData, LazyArray, Stream};

#[derive(Debug, Clone, Copy)]
struct VariationSelectorRecord {
    var_selector: u32, // actually a 24-bit value, top byte unused
    default_uvs_offset: u32,
    non_default_uvs_offset: u32,
}

impl FromData for VariationSelectorRecord {
    const SIZE: usize = 11;

    fn parse(data: &[u8]) -> Option<Self> {
        let var_selector = u32::from_be_bytes([0, data[0], data[1], data[2]]);
        let default_uvs_offset = u32::from_be_bytes([data[3], data[4], data[5], data[6]]);
        let non_default_uvs_offset = u32::from_be_bytes([data[7], data[8], data[9], data[10]]);
        Some(VariationSelectorRecord { var_selector, default_uvs_offset, non_default_uvs_offset })
    }
}

#[derive(Debug, Clone, Copy)]
struct UnicodeRange {
    start_unicode_value: u32, // 24-bit
    additional_count: u8,
}

impl FromData for UnicodeRange {
    const SIZE: usize = 4;

    fn parse(data: &[u8]) -> Option<Self> {
        let start_unicode_value = u32::from_be_bytes([0, data[0], data[1], data[2]]);
        Some(UnicodeRange { start_unicode_value, additional_count: data[3] })
    }
}

#[derive(Debug, Clone, Copy)]
struct UvsMapping {
    unicode_value: u32, // 24-bit
    glyph_id: u16,
}

impl FromData for UvsMapping {
    const SIZE: usize = 5;

    fn parse(data: &[u8]) -> Option<Self> {
        let unicode_value = u32::from_be_bytes([0, data[0], data[1], data[2]]);
        let glyph_id = u16::from_be_bytes([data[3], data[4]]);
        Some(UvsMapping { unicode_value, glyph_id })
    }
}

/// Result of a variation-sequence lookup: either a glyph explicitly
/// registered for this sequence, or a signal to fall back to the base
/// cmap's ordinary lookup of the base codepoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnicodeVariationResult {
    Glyph(GlyphId),
    UseDefault,
}

/// Format 14: Unicode variation sequences. Does not participate in ordinary codepoint-to-glyph lookup.
#[derive(Clone, Copy)]
pub struct Format14<'a> {
    data: &'a [u8],
    records: LazyArray<'a, VariationSelectorRecord>,
}

impl<'a> Format14<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        s.skip::<u16>()?; // format
        s.skip::<u32>()?; // length
        let num_records: u32 = s.read()?;
        let records = s.read_array(num_records as usize)?;
        Ok(Format14 { data, records })
    }

    pub fn resolve(&self, codepoint: u32, selector: u32) -> Option<UnicodeVariationResult> {
        let (_, record) = self.records.binary_search_by(selector, |r| r.var_selector)?;

        if record.non_default_uvs_offset != 0 {
            let bytes = self.data.get(record.non_default_uvs_offset as usize..)?;
            let mut s = Stream::new(bytes);
            let count: u32 = s.read().ok()?;
            let mappings: LazyArray<UvsMapping> = s.read_array(count as usize).ok()?;
            if let Some((_, mapping)) = mappings.binary_search_by(codepoint, |m| m.unicode_value) {
                return Some(UnicodeVariationResult::Glyph(GlyphId::new(mapping.glyph_id)));
            }
        }

        if record.default_uvs_offset != 0 {
            let bytes = self.data.get(record.default_uvs_offset as usize..)?;
            let mut s = Stream::new(bytes);
            let count: u32 = s.read().ok()?;
            let ranges: LazyArray<UnicodeRange> = s.read_array(count as usize).ok()?;
            for range in ranges.iter() {
                let end = range.start_unicode_value + range.additional_count as u32;
                if codepoint >= range.start_unicode_value && codepoint <= end {
                    return Some(UnicodeVariationResult::UseDefault);
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_u24(d: &mut Vec<u8>, v: u32) {
        d.extend_from_slice(&v.to_be_bytes()[1..4]);
    }

    /// One variation-selector record (selector = 1) with both a
    /// non-default UVS mapping (`0x41` -> glyph 7) and a default UVS range
    /// (`0x42..=0x44`).
    fn sample() -> Vec<u8> {
        let mut d = Vec::new();
        d.extend_from_slice(&14u16.to_be_bytes()); // format
        d.extend_from_slice(&0u32.to_be_bytes()); // length (unused)
        d.extend_from_slice(&1u32.to_be_bytes()); // numVarSelectorRecords

        let non_default_offset = 10 + 11u32;
        let default_offset = non_default_offset + 9;

        push_u24(&mut d, 1); // varSelector
        d.extend_from_slice(&default_offset.to_be_bytes());
        d.extend_from_slice(&non_default_offset.to_be_bytes());

        // non-default UVS table: one explicit mapping.
        d.extend_from_slice(&1u32.to_be_bytes());
        push_u24(&mut d, 0x41);
        d.extend_from_slice(&7u16.to_be_bytes());

        // default UVS table: one range, 0x42..=0x44.
        d.extend_from_slice(&1u32.to_be_bytes());
        push_u24(&mut d, 0x42);
        d.push(2); // additionalCount

        d
    }

    #[test]
    fn explicit_mapping_wins_over_the_default_range() {
        let data = sample();
        let table = Format14::parse(&data).unwrap();
        assert_eq!(table.resolve(0x41, 1), Some(UnicodeVariationResult::Glyph(GlyphId::new(7))));
    }

    #[test]
    fn codepoint_in_default_range_falls_back_to_the_base_cmap() {
        let data = sample();
        let table = Format14::parse(&data).unwrap();
        assert_eq!(table.resolve(0x42, 1), Some(UnicodeVariationResult::UseDefault));
        assert_eq!(table.resolve(0x44, 1), Some(UnicodeVariationResult::UseDefault));
    }

    #[test]
    fn codepoint_outside_both_tables_is_unresolved() {
        let data = sample();
        let table = Format14::parse(&data).unwrap();
        assert_eq!(table.resolve(0x99, 1), None);
    }

    #[test]
    fn unknown_selector_is_unresolved() {
        let data = sample();
        let table = Format14::parse(&data).unwrap();
        assert_eq!(table.resolve(0x41, 2), None);
    }
}
