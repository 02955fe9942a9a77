//! Item Variation Store: shared by `HVAR`/`VVAR`/`MVAR`.
//! `{ region_list, item_variation_data[] }`; `delta(outer, inner, coords)`
//! evaluates `Σ_r weight(region_r, coords) × delta_r`.

use crate::error::{ParseFail, Result};
use crate::numeric::F2Dot14;
use crate::stream::{FromData, LazyArray, Stream};

const LONG_WORDS_FLAG: u16 = 0x8000;
const WORD_DELTA_COUNT_MASK: u16 = 0x7FFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RegionAxisCoordinates {
    start: F2Dot14,
    peak: F2Dot14,
    end: F2Dot14,
}

impl FromData for RegionAxisCoordinates {
    const SIZE: usize = 6;

    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(RegionAxisCoordinates { start: s.read().ok()?, peak: s.read().ok()?, end: s.read().ok()? })
    }
}

/// The per-axis triangle function shared by `gvar` tuple weighting and
/// Item Variation Store region weighting: 1 at `peak`, 0 outside
/// `[start, end]`, linear in between. A peak of 0 (no restriction on this
/// axis) always contributes weight 1.
pub fn triangle_weight(start: f32, peak: f32, end: f32, coord: f32) -> f32 {
    if peak == 0.0 {
        return 1.0;
    }
    if coord == peak {
        return 1.0;
    }
    if coord < start.min(peak) || coord > end.max(peak) {
        return 0.0;
    }
    if coord < peak {
        if peak == start {
            return 1.0;
        }
        (coord - start) / (peak - start)
    } else {
        if peak == end {
            return 1.0;
        }
        (end - coord) / (end - peak)
    }
}

#[derive(Clone, Copy)]
struct RegionList<'a> {
    axis_count: u16,
    regions: LazyArray<'a, RegionAxisCoordinates>,
}

impl<'a> RegionList<'a> {
    fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        let axis_count: u16 = s.read()?;
        let region_count: u16 = s.read()?;
        let regions = s.read_array(axis_count as usize * region_count as usize)?;
        Ok(RegionList { axis_count, regions })
    }

    fn weight(&self, region_index: u16, coords: &[F2Dot14]) -> f32 {
        let base = region_index as usize * self.axis_count as usize;
        let mut weight = 1.0f32;
        for axis in 0..self.axis_count as usize {
            let Some(r) = self.regions.get(base + axis) else { return 0.0 };
            let coord = coords.get(axis).copied().unwrap_or(F2Dot14::ZERO).to_f32();
            weight *= triangle_weight(r.start.to_f32(), r.peak.to_f32(), r.end.to_f32(), coord);
            if weight == 0.0 {
                return 0.0;
            }
        }
        weight
    }
}

#[derive(Clone, Copy)]
struct ItemVariationData<'a> {
    item_count: u16,
    word_delta_count: u16,
    long_words: bool,
    region_indices: LazyArray<'a, u16>,
    rows: &'a [u8],
    row_size: usize,
}

impl<'a> ItemVariationData<'a> {
    fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        let item_count: u16 = s.read()?;
        let raw_word_delta_count: u16 = s.read()?;
        let long_words = raw_word_delta_count & LONG_WORDS_FLAG != 0;
        let word_delta_count = raw_word_delta_count & WORD_DELTA_COUNT_MASK;
        let region_index_count: u16 = s.read()?;
        let region_indices = s.read_array(region_index_count as usize)?;

        let wide_size = if long_words { 4 } else { 2 };
        let narrow_size = if long_words { 2 } else { 1 };
        let row_size = word_delta_count as usize * wide_size
            + (region_index_count as usize).saturating_sub(word_delta_count as usize) * narrow_size;
        let rows = s.read_bytes(row_size * item_count as usize)?;

        Ok(ItemVariationData { item_count, word_delta_count, long_words, region_indices, rows, row_size })
    }

    fn delta(&self, inner_index: u16, coords: &[F2Dot14], regions: &RegionList<'a>) -> Option<f32> {
        if inner_index >= self.item_count {
            return None;
        }
        let row = self.rows.get(inner_index as usize * self.row_size..(inner_index as usize + 1) * self.row_size)?;
        let wide_size = if self.long_words { 4 } else { 2 };
        let narrow_size = if self.long_words { 2 } else { 1 };

        let mut total = 0.0f32;
        for i in 0..self.region_indices.len() {
            let region_index = self.region_indices.get(i)?;
            let delta_value: i32 = if i < self.word_delta_count as usize {
                let start = i * wide_size;
                let bytes = row.get(start..start + wide_size)?;
                if self.long_words {
                    i32::from_be_bytes(bytes.try_into().ok()?)
                } else {
                    i16::from_be_bytes(bytes.try_into().ok()?) as i32
                }
            } else {
                let narrow_index = i - self.word_delta_count as usize;
                let start = self.word_delta_count as usize * wide_size + narrow_index * narrow_size;
                let bytes = row.get(start..start + narrow_size)?;
                if self.long_words {
                    i16::from_be_bytes(bytes.try_into().ok()?) as i32
                } else {
                    bytes[0] as i8 as i32
                }
            };
            total += regions.weight(region_index, coords) * delta_value as f32;
        }
        Some(total)
    }
}

#[derive(Clone, Copy)]
pub struct ItemVariationStore<'a> {
    regions: RegionList<'a>,
    data: &'a [u8],
    item_variation_data_offsets: LazyArray<'a, u32>,
}

impl<'a> ItemVariationStore<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        s.skip::<u16>()?; // format, always 1
        let region_list_offset: u32 = s.read()?;
        let count: u16 = s.read()?;
        let item_variation_data_offsets = s.read_array(count as usize)?;
        let regions = RegionList::parse(data.get(region_list_offset as usize..).ok_or(ParseFail)?)?;
        Ok(ItemVariationStore { regions, data, item_variation_data_offsets })
    }

    /// `Σ_r weight(region_r, coords) × delta_r` for `(outer, inner)`.
    pub fn delta(&self, outer: u16, inner: u16, coords: &[F2Dot14]) -> Option<f32> {
        let offset = self.item_variation_data_offsets.get(outer as usize)?;
        let sub = self.data.get(offset as usize..)?;
        let ivd = ItemVariationData::parse(sub).ok()?;
        ivd.delta(inner, coords, &self.regions)
    }
}
