//! The bitmap location table shared by `CBLC` and `EBLC`:
//! `(strike, glyph) -> (offset_in_data, format)`. `CBDT`/`EBDT` hold the
//! matching data table this resolves into (see `bitmap_data.rs`).

use crate::error::{ParseFail, Result};
use crate::ids::GlyphId;
use crate::stream::{FromData, LazyArray, Stream};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SbitLineMetrics {
    pub ascender: i8,
    pub descender: i8,
    pub width_max: u8,
}

#[derive(Clone, Copy)]
struct BitmapSize {
    index_subtable_array_offset: u32,
    number_of_index_subtables: u32,
    start_glyph_index: u16,
    end_glyph_index: u16,
    ppem_x: u8,
    ppem_y: u8,
    bit_depth: u8,
}

impl BitmapSize {
    const SIZE: usize = 48;

    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        let index_subtable_array_offset: u32 = s.read().ok()?;
        s.skip::<u32>().ok()?; // indexTablesSize
        let number_of_index_subtables: u32 = s.read().ok()?;
        s.skip::<u32>().ok()?; // colorRef
        s.advance(24).ok()?; // hori + vert sbitLineMetrics, 12 bytes each
        let start_glyph_index: u16 = s.read().ok()?;
        let end_glyph_index: u16 = s.read().ok()?;
        let ppem_x: u8 = s.read().ok()?;
        let ppem_y: u8 = s.read().ok()?;
        let bit_depth: u8 = s.read().ok()?;
        Some(BitmapSize {
            index_subtable_array_offset,
            number_of_index_subtables,
            start_glyph_index,
            end_glyph_index,
            ppem_x,
            ppem_y,
            bit_depth,
        })
    }
}

/// A resolved bitmap location: byte offset (into `CBDT`/`EBDT`) and the
/// data table's `imageFormat` tag for that glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapLocation {
    pub offset: u32,
    pub end_offset: u32,
    pub image_format: u16,
}

#[derive(Clone, Copy)]
pub struct BitmapLocationTable<'a> {
    data: &'a [u8],
    sizes: &'a [u8],
    num_sizes: u32,
}

impl<'a> BitmapLocationTable<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        s.skip::<u16>()?; // majorVersion
        s.skip::<u16>()?; // minorVersion
        let num_sizes: u32 = s.read()?;
        let sizes = s.read_bytes(num_sizes as usize * BitmapSize::SIZE)?;
        Ok(BitmapLocationTable { data, sizes, num_sizes })
    }

    fn size(&self, index: u32) -> Option<BitmapSize> {
        let start = (index as usize).checked_mul(BitmapSize::SIZE)?;
        BitmapSize::parse(self.sizes.get(start..start + BitmapSize::SIZE)?)
    }

    pub fn strike_for_ppem(&self, ppem: u8) -> Option<u32> {
        (0..self.num_sizes).find(|&i| self.size(i).is_some_and(|s| s.ppem_x == ppem || s.ppem_y == ppem))
    }

    pub fn bit_depth(&self, strike: u32) -> Option<u8> {
        self.size(strike).map(|s| s.bit_depth)
    }

    pub fn locate(&self, strike: u32, glyph_id: GlyphId) -> Option<BitmapLocation> {
        let size = self.size(strike)?;
        if glyph_id.to_u16() < size.start_glyph_index || glyph_id.to_u16() > size.end_glyph_index {
            return None;
        }
        let array = self.data.get(size.index_subtable_array_offset as usize..)?;
        let array: LazyArray<IndexSubTableArrayEntry> = LazyArray::new(array);
        for i in 0..size.number_of_index_subtables as usize {
            let entry = array.get(i)?;
            if glyph_id.to_u16() < entry.first_glyph_index || glyph_id.to_u16() > entry.last_glyph_index {
                continue;
            }
            let subtable_offset = size.index_subtable_array_offset as usize + entry.additional_offset as usize;
            return parse_index_subtable(self.data.get(subtable_offset..)?, entry, glyph_id);
        }
        None
    }
}

#[derive(Debug, Clone, Copy)]
struct IndexSubTableArrayEntry {
    first_glyph_index: u16,
    last_glyph_index: u16,
    additional_offset: u32,
}

impl FromData for IndexSubTableArrayEntry {
    const SIZE: usize = 8;

    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(IndexSubTableArrayEntry {
            first_glyph_index: s.read().ok()?,
            last_glyph_index: s.read().ok()?,
            additional_offset: s.read().ok()?,
        })
    }
}

fn parse_index_subtable(
    data: &[u8],
    array_entry: IndexSubTableArrayEntry,
    glyph_id: GlyphId,
) -> Option<BitmapLocation> {
    let mut s = Stream::new(data);
    let index_format: u16 = s.read().ok()?;
    let image_format: u16 = s.read().ok()?;
    let image_data_offset: u32 = s.read().ok()?;
    let index = (glyph_id.to_u16() - array_entry.first_glyph_index) as usize;

    match index_format {
        1 => {
            let offsets: LazyArray<u32> = s.read_array(index + 2).ok()?;
            let start = offsets.get(index)?;
            let end = offsets.get(index + 1)?;
            if end <= start {
                return None;
            }
            Some(BitmapLocation { offset: image_data_offset + start, end_offset: image_data_offset + end, image_format })
        }
        2 => {
            let image_size: u32 = s.read().ok()?;
            let start = image_data_offset + image_size * index as u32;
            Some(BitmapLocation { offset: start, end_offset: start + image_size, image_format })
        }
        3 => {
            let offsets: LazyArray<u16> = s.read_array(index + 2).ok()?;
            let start = offsets.get(index)? as u32;
            let end = offsets.get(index + 1)? as u32;
            if end <= start {
                return None;
            }
            Some(BitmapLocation { offset: image_data_offset + start, end_offset: image_data_offset + end, image_format })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locates_format_1_glyph_by_offset_pair() {
        // Build: header, 1 BitmapSize, one index subtable array entry,
        // index subtable format 1 with offsets for glyphs 5,6.
        let mut d = vec![0u8; 8];
        d[4..8].copy_from_slice(&1u32.to_be_bytes()); // numSizes

        let size_pos = d.len();
        d.extend_from_slice(&[0u8; BitmapSize::SIZE]);

        let array_offset = d.len() as u32;
        d.extend_from_slice(&5u16.to_be_bytes()); // firstGlyphIndex
        d.extend_from_slice(&6u16.to_be_bytes()); // lastGlyphIndex
        d.extend_from_slice(&0u32.to_be_bytes()); // additionalOffsetToIndexSubtable (relative to array_offset)

        let subtable_offset = d.len() as u32;
        d.extend_from_slice(&1u16.to_be_bytes()); // indexFormat
        d.extend_from_slice(&17u16.to_be_bytes()); // imageFormat
        d.extend_from_slice(&0u32.to_be_bytes()); // imageDataOffset
        for off in [0u32, 100] {
            d.extend_from_slice(&off.to_be_bytes());
        }
        let _ = subtable_offset;

        let mut size = vec![0u8; BitmapSize::SIZE];
        size[0..4].copy_from_slice(&array_offset.to_be_bytes());
        size[8..12].copy_from_slice(&1u32.to_be_bytes()); // numberOfIndexSubtables
        size[40..42].copy_from_slice(&5u16.to_be_bytes()); // startGlyphIndex
        size[42..44].copy_from_slice(&6u16.to_be_bytes()); // endGlyphIndex
        size[44] = 20; // ppemX
        d[size_pos..size_pos + BitmapSize::SIZE].copy_from_slice(&size);

        let table = BitmapLocationTable::parse(&d).unwrap();
        let strike = table.strike_for_ppem(20).unwrap();
        let loc = table.locate(strike, GlyphId::new(5)).unwrap();
        assert_eq!((loc.offset, loc.end_offset, loc.image_format), (0, 100, 17));
    }
}
