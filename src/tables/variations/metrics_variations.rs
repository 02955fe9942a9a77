//! `HVAR`/`VVAR`: identical wire shape — an Item
//! Variation Store plus an optional `DeltaSetIndexMap` resolving advance
//! widths/heights (and, for `HVAR`, side bearings) by glyph id.

use crate::error::{ParseFail, Result};
use crate::ids::GlyphId;
use crate::numeric::F2Dot14;
use crate::stream::Stream;

use super::delta_set_index_map::DeltaSetIndexMap;
use super::ivs::ItemVariationStore;

#[derive(Clone, Copy)]
pub struct MetricsVariations<'a> {
    store: ItemVariationStore<'a>,
    advance_map: Option<DeltaSetIndexMap<'a>>,
    bearing_map: Option<DeltaSetIndexMap<'a>>,
}

impl<'a> MetricsVariations<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        s.skip::<u16>()?; // majorVersion
        s.skip::<u16>()?; // minorVersion
        let item_variation_store_offset: u32 = s.read()?;
        let advance_map_offset: u32 = s.read()?;
        let bearing_map_offset: u32 = s.read()?;
        // HVAR's lsb/rsb-variance map and VVAR's tsb-variance map share this
        // slot byte for byte; both are exposed uniformly as `bearing_map`.

        let store = ItemVariationStore::parse(data.get(item_variation_store_offset as usize..).ok_or(ParseFail)?)?;
        let advance_map = if advance_map_offset != 0 {
            Some(DeltaSetIndexMap::parse(data.get(advance_map_offset as usize..).ok_or(ParseFail)?)?)
        } else {
            None
        };
        let bearing_map = if bearing_map_offset != 0 {
            Some(DeltaSetIndexMap::parse(data.get(bearing_map_offset as usize..).ok_or(ParseFail)?)?)
        } else {
            None
        };

        Ok(MetricsVariations { store, advance_map, bearing_map })
    }

    /// The advance-width/height delta for `glyph_id`, resolved either
    /// through the `DeltaSetIndexMap` (if present) or directly by glyph id.
    pub fn advance_delta(&self, glyph_id: GlyphId, coords: &[F2Dot14]) -> Option<f32> {
        let (outer, inner) = match &self.advance_map {
            Some(map) => map.map(glyph_id.to_u16() as u32)?,
            None => (0, glyph_id.to_u16()),
        };
        self.store.delta(outer, inner, coords)
    }

    /// The side-bearing delta for `glyph_id`, when a bearing map is present.
    pub fn bearing_delta(&self, glyph_id: GlyphId, coords: &[F2Dot14]) -> Option<f32> {
        let (outer, inner) = self.bearing_map.as_ref()?.map(glyph_id.to_u16() as u32)?;
        self.store.delta(outer, inner, coords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A one-region, one-item-variation-data item variation store; `delta`
    /// at the region's peak always returns `magnitude`.
    fn single_region_store(magnitude: i16) -> Vec<u8> {
        let mut d = Vec::new();
        d.extend_from_slice(&1u16.to_be_bytes()); // format
        let region_list_pos = d.len();
        d.extend_from_slice(&0u32.to_be_bytes());
        d.extend_from_slice(&1u16.to_be_bytes()); // itemVariationDataCount
        let ivd_offset_pos = d.len();
        d.extend_from_slice(&0u32.to_be_bytes());

        let region_list_offset = d.len() as u32;
        d.extend_from_slice(&1u16.to_be_bytes()); // axisCount
        d.extend_from_slice(&1u16.to_be_bytes()); // regionCount
        for v in [0.0f32, 1.0, 1.0] {
            d.extend_from_slice(&F2Dot14::from_f32(v).0.to_be_bytes());
        }

        let ivd_offset = d.len() as u32;
        d.extend_from_slice(&1u16.to_be_bytes()); // itemCount
        d.extend_from_slice(&1u16.to_be_bytes()); // wordDeltaCount
        d.extend_from_slice(&1u16.to_be_bytes()); // regionIndexCount
        d.extend_from_slice(&0u16.to_be_bytes()); // regionIndexes[0]
        d.extend_from_slice(&magnitude.to_be_bytes());

        d[region_list_pos..region_list_pos + 4].copy_from_slice(&region_list_offset.to_be_bytes());
        d[ivd_offset_pos..ivd_offset_pos + 4].copy_from_slice(&ivd_offset.to_be_bytes());
        d
    }

    fn metrics_variations_without_maps(store: &[u8]) -> Vec<u8> {
        let mut d = Vec::new();
        d.extend_from_slice(&1u16.to_be_bytes()); // majorVersion
        d.extend_from_slice(&0u16.to_be_bytes()); // minorVersion
        let header_len = 12;
        d.extend_from_slice(&(header_len as u32).to_be_bytes()); // itemVariationStoreOffset
        d.extend_from_slice(&0u32.to_be_bytes()); // advanceWidthMappingOffset (none)
        d.extend_from_slice(&0u32.to_be_bytes()); // lsbMappingOffset (none)
        d.extend_from_slice(store);
        d
    }

    #[test]
    fn advance_delta_without_a_map_is_indexed_directly_by_glyph_id() {
        let store = single_region_store(50);
        let data = metrics_variations_without_maps(&store);
        let mv = MetricsVariations::parse(&data).unwrap();
        let coords = [F2Dot14::from_f32(1.0)];
        assert_eq!(mv.advance_delta(GlyphId::new(0), &coords), Some(50.0));
    }

    #[test]
    fn bearing_delta_is_none_without_a_bearing_map() {
        let store = single_region_store(50);
        let data = metrics_variations_without_maps(&store);
        let mv = MetricsVariations::parse(&data).unwrap();
        let coords = [F2Dot14::from_f32(1.0)];
        assert_eq!(mv.bearing_delta(GlyphId::new(0), &coords), None);
    }
}
