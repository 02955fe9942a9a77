//! CFF INDEX structure: a count, an offset array of `offset_size`-byte
//! entries, then a data region the offsets index into (1-based).

use crate::error::{ParseFail, Result};
use crate::stream::Stream;

#[derive(Clone, Copy, Default)]
pub struct Index<'a> {
    offsets: &'a [u8],
    offset_size: u8,
    count: u32,
    data: &'a [u8],
}

impl<'a> Index<'a> {
    /// Parses a CFF1 INDEX (16-bit count) and returns the index plus the
    /// stream positioned right after it.
    pub fn parse(s: &mut Stream<'a>) -> Result<Self> {
        let count: u16 = s.read()?;
        Self::parse_with_count(s, count as u32)
    }

    /// Parses a CFF2 INDEX (32-bit count).
    pub fn parse_cff2(s: &mut Stream<'a>) -> Result<Self> {
        let count: u32 = s.read()?;
        Self::parse_with_count(s, count)
    }

    fn parse_with_count(s: &mut Stream<'a>, count: u32) -> Result<Self> {
        if count == 0 {
            return Ok(Index::default());
        }
        let offset_size: u8 = s.read()?;
        if !(1..=4).contains(&offset_size) {
            return Err(ParseFail);
        }
        let offsets = s.read_bytes((count as usize + 1) * offset_size as usize)?;
        let last_offset = read_offset(offsets, count as usize, offset_size).ok_or(ParseFail)?;
        let data_len = (last_offset as usize).checked_sub(1).ok_or(ParseFail)?;
        let data = s.read_bytes(data_len)?;
        Ok(Index { offsets, offset_size, count, data })
    }

    pub fn len(&self) -> u32 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn get(&self, index: u32) -> Option<&'a [u8]> {
        if index >= self.count {
            return None;
        }
        let start = read_offset(self.offsets, index as usize, self.offset_size)? as usize - 1;
        let end = read_offset(self.offsets, index as usize + 1, self.offset_size)? as usize - 1;
        if end < start {
            return None;
        }
        self.data.get(start..end)
    }
}

fn read_offset(offsets: &[u8], index: usize, offset_size: u8) -> Option<u32> {
    let size = offset_size as usize;
    let start = index.checked_mul(size)?;
    let bytes = offsets.get(start..start + size)?;
    let mut value = 0u32;
    for &b in bytes {
        value = (value << 8) | b as u32;
    }
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_two_entries_with_one_byte_offsets() {
        let mut data = Vec::new();
        data.extend_from_slice(&2u16.to_be_bytes()); // count
        data.push(1); // offSize
        data.extend_from_slice(&[1, 3, 6]); // offsets: entry0=[0,2), entry1=[2,5)
        data.extend_from_slice(b"abcde");

        let mut s = Stream::new(&data);
        let index = Index::parse(&mut s).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.get(0), Some(&b"ab"[..]));
        assert_eq!(index.get(1), Some(&b"cde"[..]));
        assert_eq!(index.get(2), None);
    }

    #[test]
    fn empty_index_is_count_only() {
        let data = 0u16.to_be_bytes();
        let mut s = Stream::new(&data);
        let index = Index::parse(&mut s).unwrap();
        assert!(index.is_empty());
    }
}
