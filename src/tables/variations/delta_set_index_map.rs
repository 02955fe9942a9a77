//! `DeltaSetIndexMap`: maps a glyph id or other outer index
//! to an `(outer, inner)` pair into an [`ItemVariationStore`](super::ivs::ItemVariationStore).
//! Used by `HVAR`/`VVAR`/`MVAR` when deltas aren't addressed directly by
//! glyph id.

use crate::error::{ParseFail, Result};
use crate::stream::Stream;

const INNER_INDEX_BIT_COUNT_MASK: u8 = 0x0F;
const MAP_ENTRY_SIZE_MASK: u8 = 0x30;

#[derive(Clone, Copy)]
pub struct DeltaSetIndexMap<'a> {
    entry_format: u8,
    map_count: u32,
    entries: &'a [u8],
}

impl<'a> DeltaSetIndexMap<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        let format: u8 = s.read()?;
        let (map_count, entry_format) = if format == 0 {
            let count: u16 = s.read()?;
            let entry_format: u8 = s.read()?;
            (count as u32, entry_format)
        } else {
            let count: u32 = s.read()?;
            let entry_format: u8 = s.read()?;
            (count, entry_format)
        };
        let entries = s.tail()?;
        Ok(DeltaSetIndexMap { entry_format, map_count, entries })
    }

    fn entry_size(&self) -> usize {
        (((self.entry_format & MAP_ENTRY_SIZE_MASK) >> 4) + 1) as usize
    }

    fn inner_bit_count(&self) -> u32 {
        (self.entry_format & INNER_INDEX_BIT_COUNT_MASK) as u32 + 1
    }

    /// Resolves `glyph_index`, clamped to the last entry past `map_count`
    /// per spec (all glyphs beyond the map share the final entry).
    pub fn map(&self, index: u32) -> Option<(u16, u16)> {
        if self.map_count == 0 {
            return None;
        }
        let clamped = index.min(self.map_count - 1) as usize;
        let size = self.entry_size();
        let start = clamped * size;
        let bytes = self.entries.get(start..start + size)?;
        let mut raw: u32 = 0;
        for &b in bytes {
            raw = (raw << 8) | b as u32;
        }
        let inner_bits = self.inner_bit_count();
        let inner = raw & ((1u32 << inner_bits) - 1);
        let outer = raw >> inner_bits;
        Some((outer as u16, inner as u16))
    }
}

impl Default for DeltaSetIndexMap<'_> {
    fn default() -> Self {
        DeltaSetIndexMap { entry_format: 0, map_count: 0, entries: &[] }
    }
}
