//! Container decoding: magic dispatch, collection
//! index, table directory, and per-table byte-slice extraction.

use crate::error::{ParseFail, Result};
use crate::ids::Tag;
use crate::stream::{FromData, LazyArray, Stream};

const SFNT_VERSION_TRUETYPE: u32 = 0x0001_0000;
const SFNT_VERSION_TRUE: u32 = 0x7472_7565; // "true"
const SFNT_VERSION_OTTO: u32 = 0x4F54_544F; // "OTTO"
const TTC_MAGIC: u32 = 0x7474_6366; // "ttcf"

/// One `(tag, checksum, offset, length)` table directory record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRecord {
    pub tag: Tag,
    pub checksum: u32,
    pub offset: u32,
    pub length: u32,
}

impl FromData for TableRecord {
    const SIZE: usize = 16;

    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(TableRecord {
            tag: s.read().ok()?,
            checksum: s.read().ok()?,
            offset: s.read().ok()?,
            length: s.read().ok()?,
        })
    }
}

/// The directory and owning byte slice for a single face within a font
/// file (which may itself be a single face or one member of a `ttcf`
/// collection).
///
/// Invariant: every directory entry's byte range lies inside `data`;
/// violations are rejected in [`RawFace::parse`].
#[derive(Clone, Copy)]
pub struct RawFace<'a> {
    data: &'a [u8],
    records: LazyArray<'a, TableRecord>,
}

impl<'a> RawFace<'a> {
    /// Parse the container: magic dispatch, then (for collections) index
    /// into `face_index`, then the face's own table directory.
    pub fn parse(data: &'a [u8], face_index: u32) -> Result<Self> {
        let mut s = Stream::new(data);
        let magic: u32 = s.read()?;

        let face_offset = match magic {
            SFNT_VERSION_TRUETYPE | SFNT_VERSION_TRUE | SFNT_VERSION_OTTO => {
                if face_index != 0 {
                    return Err(ParseFail);
                }
                0
            }
            TTC_MAGIC => {
                // version (u32), num_fonts (u32), then num_fonts offsets.
                s.skip::<u32>()?; // version
                let num_fonts: u32 = s.read()?;
                if face_index >= num_fonts {
                    return Err(ParseFail);
                }
                let offsets: LazyArray<u32> = s.read_array(num_fonts as usize)?;
                let offset = offsets.get(face_index as usize).ok_or(ParseFail)?;
                let sub_magic: u32 = Stream::new_at(data, offset as usize)?.read()?;
                // A member of a collection must not itself be a collection.
                if sub_magic == TTC_MAGIC {
                    return Err(ParseFail);
                }
                if !matches!(
                    sub_magic,
                    SFNT_VERSION_TRUETYPE | SFNT_VERSION_TRUE | SFNT_VERSION_OTTO
                ) {
                    return Err(ParseFail);
                }
                offset as usize
            }
            _ => return Err(ParseFail),
        };

        Self::parse_directory(data, face_offset)
    }

    /// Whether `data`'s magic indicates a `ttcf` collection, and if so how
    /// many fonts it contains. Used by callers before committing to a
    /// `face_index`.
    pub fn fonts_in_collection(data: &[u8]) -> Option<u32> {
        let mut s = Stream::new(data);
        let magic: u32 = s.read().ok()?;
        if magic != TTC_MAGIC {
            return None;
        }
        s.skip::<u32>().ok()?; // version
        s.read().ok()
    }

    fn parse_directory(data: &'a [u8], face_offset: usize) -> Result<Self> {
        let mut s = Stream::new_at(data, face_offset)?;
        s.skip::<u32>()?; // sfnt version, already validated by the caller
        let num_tables: u16 = s.read()?;
        // searchRange, entrySelector, rangeShift: hints, discarded.
        s.skip::<u16>()?;
        s.skip::<u16>()?;
        s.skip::<u16>()?;

        let records: LazyArray<TableRecord> = s.read_array(num_tables as usize)?;
        for record in records.iter() {
            let end = (record.offset as usize)
                .checked_add(record.length as usize)
                .ok_or(ParseFail)?;
            if end > data.len() {
                return Err(ParseFail);
            }
        }

        Ok(RawFace { data, records })
    }

    /// The raw font bytes this face's directory was parsed from (the whole
    /// container, not just this face's region).
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// The byte slice for `tag`, if the directory lists it and its range
    /// is in-bounds (already validated at construction).
    pub fn table_data(&self, tag: Tag) -> Option<&'a [u8]> {
        let record = self
            .records
            .iter()
            .find(|record| record.tag == tag)?;
        self.data
            .get(record.offset as usize..(record.offset as usize + record.length as usize))
    }

    pub fn table_records(&self) -> LazyArray<'a, TableRecord> {
        self.records
    }
}
