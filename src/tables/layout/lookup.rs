//! LookupList: a lazy array of lookups, each carrying
//! `(type, flags, subtable_offsets[], optional mark_filtering_set)`. The
//! common layer is type-agnostic; GSUB/GPOS interpret `lookup_type`
//! themselves.

use crate::error::Result;
use crate::stream::{LazyArray, Offset16, Stream};

pub const FLAG_RIGHT_TO_LEFT: u16 = 0x0001;
pub const FLAG_IGNORE_BASE_GLYPHS: u16 = 0x0002;
pub const FLAG_IGNORE_LIGATURES: u16 = 0x0004;
pub const FLAG_IGNORE_MARKS: u16 = 0x0008;
pub const FLAG_USE_MARK_FILTERING_SET: u16 = 0x0010;
pub const FLAG_MARK_ATTACHMENT_TYPE_MASK: u16 = 0xFF00;

#[derive(Clone, Copy)]
pub struct Lookup<'a> {
    pub lookup_type: u16,
    pub lookup_flag: u16,
    data: &'a [u8],
    subtable_offsets: LazyArray<'a, Offset16>,
    pub mark_filtering_set: Option<u16>,
}

impl<'a> Lookup<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        let lookup_type: u16 = s.read()?;
        let lookup_flag: u16 = s.read()?;
        let subtable_count: u16 = s.read()?;
        let subtable_offsets = s.read_array(subtable_count as usize)?;
        let mark_filtering_set =
            if lookup_flag & FLAG_USE_MARK_FILTERING_SET != 0 { Some(s.read()?) } else { None };
        Ok(Lookup { lookup_type, lookup_flag, data, subtable_offsets, mark_filtering_set })
    }

    pub fn subtable_count(&self) -> u16 {
        self.subtable_offsets.len() as u16
    }

    pub fn subtable(&self, index: u16) -> Option<&'a [u8]> {
        let offset = self.subtable_offsets.get(index as usize)?.non_null()?;
        self.data.get(offset as usize..)
    }

    pub fn mark_attachment_type(&self) -> u8 {
        ((self.lookup_flag & FLAG_MARK_ATTACHMENT_TYPE_MASK) >> 8) as u8
    }
}

/// A 1-layer extension lookup: wraps `(inner_type,
/// Offset32)`; the caller re-dispatches on `inner_type` against the bytes
/// at `inner_subtable`.
#[derive(Debug, Clone, Copy)]
pub struct ExtensionLookup<'a> {
    pub inner_type: u16,
    pub inner_subtable: &'a [u8],
}

impl<'a> ExtensionLookup<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        s.skip::<u16>()?; // format, always 1
        let inner_type: u16 = s.read()?;
        let offset: u32 = s.read()?;
        let inner_subtable = s.slice(offset as usize, data.len().saturating_sub(offset as usize))?;
        Ok(ExtensionLookup { inner_type, inner_subtable })
    }
}

#[derive(Clone, Copy)]
pub struct LookupList<'a> {
    data: &'a [u8],
    offsets: LazyArray<'a, Offset16>,
}

impl<'a> LookupList<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        let count: u16 = s.read()?;
        let offsets = s.read_array(count as usize)?;
        Ok(LookupList { data, offsets })
    }

    pub fn len(&self) -> u16 {
        self.offsets.len() as u16
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn get(&self, index: u16) -> Option<Lookup<'a>> {
        let offset = self.offsets.get(index as usize)?.non_null()?;
        let bytes = self.data.get(offset as usize..)?;
        Lookup::parse(bytes).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_list_resolves_its_one_lookup_and_subtable() {
        let mut d = Vec::new();
        d.extend_from_slice(&1u16.to_be_bytes()); // LookupList.lookupCount
        d.extend_from_slice(&4u16.to_be_bytes()); // offset to the Lookup, relative to this data

        d.extend_from_slice(&4u16.to_be_bytes()); // lookupType
        d.extend_from_slice(&0u16.to_be_bytes()); // lookupFlag (no mark filtering set)
        d.extend_from_slice(&1u16.to_be_bytes()); // subTableCount
        d.extend_from_slice(&8u16.to_be_bytes()); // subtable offset, relative to the Lookup
        d.extend_from_slice(b"SUBTABLE");

        let list = LookupList::parse(&d).unwrap();
        assert_eq!(list.len(), 1);
        let lookup = list.get(0).unwrap();
        assert_eq!(lookup.lookup_type, 4);
        assert_eq!(lookup.subtable_count(), 1);
        assert_eq!(&lookup.subtable(0).unwrap()[..8], b"SUBTABLE");
        assert!(list.get(1).is_none());
    }

    #[test]
    fn mark_filtering_set_is_read_only_when_the_flag_bit_is_set() {
        let mut d = Vec::new();
        d.extend_from_slice(&6u16.to_be_bytes()); // lookupType
        d.extend_from_slice(&FLAG_USE_MARK_FILTERING_SET.to_be_bytes());
        d.extend_from_slice(&0u16.to_be_bytes()); // subTableCount
        d.extend_from_slice(&99u16.to_be_bytes()); // markFilteringSet

        let lookup = Lookup::parse(&d).unwrap();
        assert_eq!(lookup.mark_filtering_set, Some(99));
    }

    #[test]
    fn extension_lookup_resolves_the_inner_subtable_by_offset() {
        let mut d = Vec::new();
        d.extend_from_slice(&1u16.to_be_bytes()); // format
        d.extend_from_slice(&9u16.to_be_bytes()); // extensionLookupType
        d.extend_from_slice(&8u32.to_be_bytes()); // extensionOffset
        d.extend_from_slice(b"INNERDATA");

        let ext = ExtensionLookup::parse(&d).unwrap();
        assert_eq!(ext.inner_type, 9);
        assert_eq!(&ext.inner_subtable[..9], b"INNERDATA");
    }
}
