//! The Script/Feature/Language `RecordList` pattern shared across GSUB/GPOS
//!: `count: u16`, `records[count] = (tag, offset)` sorted by
//! tag, offsets relative to the list header.

use crate::error::Result;
use crate::ids::Tag;
use crate::stream::{FromData, LazyArray, Stream};

#[derive(Debug, Clone, Copy)]
struct TaggedOffset {
    tag: Tag,
    offset: u16,
}

impl FromData for TaggedOffset {
    const SIZE: usize = 6;

    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(TaggedOffset { tag: s.read().ok()?, offset: s.read().ok()? })
    }
}

#[derive(Clone, Copy)]
pub struct RecordList<'a> {
    data: &'a [u8],
    records: LazyArray<'a, TaggedOffset>,
}

impl<'a> RecordList<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        let count: u16 = s.read()?;
        let records = s.read_array(count as usize)?;
        Ok(RecordList { data, records })
    }

    pub fn len(&self) -> u16 {
        self.records.len() as u16
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Binary-search by tag (the list is required to be tag-sorted).
    pub fn find(&self, tag: Tag) -> Option<&'a [u8]> {
        let (_, record) = self.records.binary_search_by(tag.to_u32(), |r| r.tag.to_u32())?;
        self.data.get(record.offset as usize..)
    }

    pub fn get(&self, index: u16) -> Option<(Tag, &'a [u8])> {
        let record = self.records.get(index as usize)?;
        let bytes = self.data.get(record.offset as usize..)?;
        Some((record.tag, bytes))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Tag, &'a [u8])> + 'a {
        let data = self.data;
        self.records.iter().filter_map(move |r| data.get(r.offset as usize..).map(|bytes| (r.tag, bytes)))
    }
}
