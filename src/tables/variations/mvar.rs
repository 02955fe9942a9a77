//! `MVAR`: a sorted array of `(value_tag, outer, inner)`
//! records over a shared Item Variation Store, resolving font-wide metric
//! deltas (e.g. `strikeoutSize`, `underlineOffset`) by tag instead of by
//! glyph id.

use crate::error::{ParseFail, Result};
use crate::ids::Tag;
use crate::numeric::F2Dot14;
use crate::stream::{FromData, LazyArray, Stream};

use super::ivs::ItemVariationStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ValueRecord {
    value_tag: Tag,
    outer_index: u16,
    inner_index: u16,
}

impl FromData for ValueRecord {
    const SIZE: usize = 8;

    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(ValueRecord {
            value_tag: s.read().ok()?,
            outer_index: s.read().ok()?,
            inner_index: s.read().ok()?,
        })
    }
}

#[derive(Clone, Copy)]
pub struct Mvar<'a> {
    records: LazyArray<'a, ValueRecord>,
    store: Option<ItemVariationStore<'a>>,
}

impl<'a> Mvar<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        s.skip::<u16>()?; // majorVersion
        s.skip::<u16>()?; // minorVersion
        s.skip::<u16>()?; // reserved
        s.skip::<u16>()?; // valueRecordSize (fixed at 8)
        let value_record_count: u16 = s.read()?;
        let item_variation_store_offset: u16 = s.read()?;
        let records = s.read_array(value_record_count as usize)?;

        let store = if item_variation_store_offset != 0 {
            Some(ItemVariationStore::parse(data.get(item_variation_store_offset as usize..).ok_or(ParseFail)?)?)
        } else {
            None
        };

        Ok(Mvar { records, store })
    }

    /// Binary search by `value_tag`, then evaluate its delta against the
    /// shared store.
    pub fn metric_delta(&self, tag: Tag, coords: &[F2Dot14]) -> Option<f32> {
        let (_, record) = self.records.binary_search_by(tag.to_u32(), |r| r.value_tag.to_u32())?;
        self.store.as_ref()?.delta(record.outer_index, record.inner_index, coords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_delta_for_known_tag_via_binary_search() {
        let mut d = Vec::new();
        d.extend_from_slice(&1u16.to_be_bytes());
        d.extend_from_slice(&0u16.to_be_bytes());
        d.extend_from_slice(&0u16.to_be_bytes()); // reserved
        d.extend_from_slice(&8u16.to_be_bytes()); // valueRecordSize
        d.extend_from_slice(&1u16.to_be_bytes()); // valueRecordCount
        let ivs_offset_pos = d.len();
        d.extend_from_slice(&0u16.to_be_bytes());

        d.extend_from_slice(b"unds"); // underlineSize tag stand-in
        d.extend_from_slice(&0u16.to_be_bytes()); // outerIndex
        d.extend_from_slice(&0u16.to_be_bytes()); // innerIndex

        let ivs_offset = d.len() as u16;
        d.extend_from_slice(&1u16.to_be_bytes()); // format
        let region_list_pos = d.len();
        d.extend_from_slice(&0u32.to_be_bytes());
        d.extend_from_slice(&1u16.to_be_bytes()); // itemVariationDataCount
        let ivd_offset_pos = d.len();
        d.extend_from_slice(&0u32.to_be_bytes());

        let region_list_offset = (d.len() - ivs_offset as usize) as u32;
        d.extend_from_slice(&1u16.to_be_bytes()); // axisCount
        d.extend_from_slice(&1u16.to_be_bytes()); // regionCount
        for v in [0.0f32, 1.0, 1.0] {
            d.extend_from_slice(&F2Dot14::from_f32(v).0.to_be_bytes());
        }

        let ivd_offset = (d.len() - ivs_offset as usize) as u32;
        d.extend_from_slice(&1u16.to_be_bytes()); // itemCount
        d.extend_from_slice(&1u16.to_be_bytes()); // wordDeltaCount
        d.extend_from_slice(&1u16.to_be_bytes()); // regionIndexCount
        d.extend_from_slice(&0u16.to_be_bytes());
        d.extend_from_slice(&20i16.to_be_bytes());

        d[ivs_offset_pos..ivs_offset_pos + 2].copy_from_slice(&ivs_offset.to_be_bytes());
        d[region_list_pos..region_list_pos + 4].copy_from_slice(&region_list_offset.to_be_bytes());
        d[ivd_offset_pos..ivd_offset_pos + 4].copy_from_slice(&ivd_offset.to_be_bytes());

        let mvar = Mvar::parse(&d).unwrap();
        let coords = [F2Dot14::from_f32(1.0)];
        assert_eq!(mvar.metric_delta(Tag::new(b"unds"), &coords), Some(20.0));
        assert_eq!(mvar.metric_delta(Tag::new(b"xxxx"), &coords), None);
    }
}
