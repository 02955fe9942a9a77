//! `name` — naming table. The one table the core is permitted to allocate
//! for: decoded name strings are returned as owned `String`s.

use crate::error::Result;
use crate::stream::{FromData, LazyArray, Stream};

#[derive(Debug, Clone, Copy)]
pub struct NameRecord {
    pub platform_id: u16,
    pub encoding_id: u16,
    pub language_id: u16,
    pub name_id: u16,
    pub length: u16,
    pub offset: u16,
}

impl FromData for NameRecord {
    const SIZE: usize = 12;

    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(NameRecord {
            platform_id: s.read().ok()?,
            encoding_id: s.read().ok()?,
            language_id: s.read().ok()?,
            name_id: s.read().ok()?,
            length: s.read().ok()?,
            offset: s.read().ok()?,
        })
    }
}

const PLATFORM_UNICODE: u16 = 0;
const PLATFORM_MACINTOSH: u16 = 1;
const PLATFORM_WINDOWS: u16 = 3;

#[derive(Clone, Copy)]
pub struct NameTable<'a> {
    records: LazyArray<'a, NameRecord>,
    storage: &'a [u8],
}

impl<'a> NameTable<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        s.skip::<u16>()?; // format
        let count: u16 = s.read()?;
        let storage_offset: u16 = s.read()?;
        let records = s.read_array(count as usize)?;
        let storage = s.slice(storage_offset as usize, data.len().saturating_sub(storage_offset as usize))?;
        Ok(NameTable { records, storage })
    }

    pub fn records(&self) -> impl Iterator<Item = NameRecord> + 'a {
        self.records.iter()
    }

    /// The decoded string for the first record matching `name_id`,
    /// preferring a Windows/Unicode BMP record over a Macintosh one.
    pub fn name(&self, name_id: u16) -> Option<String> {
        let mut mac_fallback: Option<NameRecord> = None;
        for record in self.records.iter() {
            if record.name_id != name_id {
                continue;
            }
            match record.platform_id {
                PLATFORM_WINDOWS | PLATFORM_UNICODE => return self.decode(record),
                PLATFORM_MACINTOSH if mac_fallback.is_none() => mac_fallback = Some(record),
                _ => {}
            }
        }
        mac_fallback.and_then(|record| self.decode(record))
    }

    fn decode(&self, record: NameRecord) -> Option<String> {
        let start = record.offset as usize;
        let end = start.checked_add(record.length as usize)?;
        let bytes = self.storage.get(start..end)?;
        match record.platform_id {
            PLATFORM_WINDOWS | PLATFORM_UNICODE => decode_utf16_be(bytes),
            PLATFORM_MACINTOSH => Some(decode_mac_roman(bytes)),
            _ => core::str::from_utf8(bytes).ok().map(str::to_owned),
        }
    }
}

fn decode_utf16_be(bytes: &[u8]) -> Option<String> {
    if bytes.len() % 2 != 0 {
        return None;
    }
    let units: Vec<u16> = bytes.chunks_exact(2).map(|c| u16::from_be_bytes([c[0], c[1]])).collect();
    String::from_utf16(&units).ok()
}

/// Macintosh platform, Roman encoding is ASCII-compatible in its lower
/// half; bytes `>= 0x80` map to a handful of Latin punctuation/accented
/// characters we approximate by falling back to Latin-1, which agrees with
/// MacRoman for the ASCII range used by virtually all font metadata.
fn decode_mac_roman(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(records: &[(u16, u16, u16, u16, &[u8])]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&0u16.to_be_bytes()); // format
        out.extend_from_slice(&(records.len() as u16).to_be_bytes());
        let header_len = 6 + records.len() * 12;
        out.extend_from_slice(&(header_len as u16).to_be_bytes());
        let mut storage = Vec::new();
        for (platform, encoding, name_id, lang, bytes) in records {
            out.extend_from_slice(&platform.to_be_bytes());
            out.extend_from_slice(&encoding.to_be_bytes());
            out.extend_from_slice(&lang.to_be_bytes());
            out.extend_from_slice(&name_id.to_be_bytes());
            out.extend_from_slice(&(bytes.len() as u16).to_be_bytes());
            out.extend_from_slice(&(storage.len() as u16).to_be_bytes());
            storage.extend_from_slice(bytes);
        }
        out.extend_from_slice(&storage);
        out
    }

    #[test]
    fn prefers_windows_record_over_mac() {
        let mac_bytes = b"Regular".to_vec();
        let mut win_bytes = Vec::new();
        for unit in "Regular".encode_utf16() {
            win_bytes.extend_from_slice(&unit.to_be_bytes());
        }
        let data = build(&[
            (PLATFORM_MACINTOSH, 0, 1, 0, &mac_bytes),
            (PLATFORM_WINDOWS, 1, 1, 0x409, &win_bytes),
        ]);
        let table = NameTable::parse(&data).unwrap();
        assert_eq!(table.name(1).as_deref(), Some("Regular"));
    }
}
