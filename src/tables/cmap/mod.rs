//! `cmap` — character to glyph index mapping.
//!
//! Subtable formats are dispatched lazily: [`CmapSubtable::parse`] only
//! reads the small fixed header common to all formats, the per-format
//! tables described below decode further on demand.

mod format0;
mod format12;
mod format2;
mod format4;
mod format6;
mod format13;
mod format14;

pub use format0::Format0;
pub use format12::Format12;
pub use format2::Format2;
pub use format4::Format4;
pub use format6::Format6;
pub use format13::Format13;
pub use format14::{Format14, UnicodeVariationResult};

use crate::error::{ParseFail, Result};
use crate::ids::GlyphId;
use crate::stream::Stream;

#[derive(Debug, Clone, Copy)]
pub struct EncodingRecord {
    pub platform_id: u16,
    pub encoding_id: u16,
    pub offset: u32,
}

/// A decoded `cmap` subtable, still lazy over its own body.
#[derive(Clone, Copy)]
pub enum CmapSubtable<'a> {
    Format0(Format0<'a>),
    Format2(Format2<'a>),
    Format4(Format4<'a>),
    Format6(Format6<'a>),
    Format12(Format12<'a>),
    Format13(Format13<'a>),
    Format14(Format14<'a>),
}

impl<'a> CmapSubtable<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        let format: u16 = s.read()?;
        match format {
            0 => Ok(CmapSubtable::Format0(Format0::parse(data)?)),
            2 => Ok(CmapSubtable::Format2(Format2::parse(data)?)),
            4 => Ok(CmapSubtable::Format4(Format4::parse(data)?)),
            6 => Ok(CmapSubtable::Format6(Format6::parse(data)?)),
            12 => Ok(CmapSubtable::Format12(Format12::parse(data)?)),
            13 => Ok(CmapSubtable::Format13(Format13::parse(data)?)),
            14 => Ok(CmapSubtable::Format14(Format14::parse(data)?)),
            _ => Err(ParseFail),
        }
    }

    pub fn glyph_index(&self, codepoint: u32) -> Option<GlyphId> {
        match self {
            CmapSubtable::Format0(t) => t.glyph_index(codepoint),
            CmapSubtable::Format2(t) => t.glyph_index(codepoint),
            CmapSubtable::Format4(t) => t.glyph_index(codepoint),
            CmapSubtable::Format6(t) => t.glyph_index(codepoint),
            CmapSubtable::Format12(t) => t.glyph_index(codepoint),
            CmapSubtable::Format13(t) => t.glyph_index(codepoint),
            CmapSubtable::Format14(_) => None,
        }
    }
}

/// The `cmap` table: a directory of encoding records, each pointing at a
/// lazily-parsed subtable.
#[derive(Clone, Copy)]
pub struct Cmap<'a> {
    data: &'a [u8],
    records: crate::stream::LazyArray<'a, RawEncodingRecord>,
}

#[derive(Debug, Clone, Copy)]
struct RawEncodingRecord {
    platform_id: u16,
    encoding_id: u16,
    offset: u32,
}

impl crate::stream::FromData for RawEncodingRecord {
    const SIZE: usize = 8;

    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(RawEncodingRecord {
            platform_id: s.read().ok()?,
            encoding_id: s.read().ok()?,
            offset: s.read().ok()?,
        })
    }
}

const PLATFORM_UNICODE: u16 = 0;
const PLATFORM_WINDOWS: u16 = 3;
const WINDOWS_ENCODING_SYMBOL: u16 = 0;
const WINDOWS_ENCODING_UCS2: u16 = 1;
const WINDOWS_ENCODING_UCS4: u16 = 10;

impl<'a> Cmap<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        s.skip::<u16>()?; // version
        let count: u16 = s.read()?;
        let records = s.read_array(count as usize)?;
        Ok(Cmap { data, records })
    }

    /// The subtable the facade should use for general Unicode lookups,
    /// preferring a Windows UCS-4 (format 12) table, then Windows UCS-2,
    /// then the Unicode platform, then a Windows symbol cmap as last resort.
    pub fn preferred_subtable(&self) -> Option<CmapSubtable<'a>> {
        let mut best: Option<(u32, u32)> = None; // (priority, offset)
        for record in self.records.iter() {
            let priority = match (record.platform_id, record.encoding_id) {
                (PLATFORM_WINDOWS, WINDOWS_ENCODING_UCS4) => 0,
                (PLATFORM_WINDOWS, WINDOWS_ENCODING_UCS2) => 1,
                (PLATFORM_UNICODE, _) => 2,
                (PLATFORM_WINDOWS, WINDOWS_ENCODING_SYMBOL) => 3,
                _ => continue,
            };
            if best.is_none_or(|(p, _)| priority < p) {
                best = Some((priority, record.offset));
            }
        }
        let (_, offset) = best?;
        let bytes = self.data.get(offset as usize..)?;
        CmapSubtable::parse(bytes).ok()
    }

    /// The Unicode Variation Sequences subtable (format 14), if present.
    pub fn variation_subtable(&self) -> Option<Format14<'a>> {
        for record in self.records.iter() {
            if record.platform_id == PLATFORM_UNICODE && record.encoding_id == 5 {
                let bytes = self.data.get(record.offset as usize..)?;
                if let Ok(CmapSubtable::Format14(t)) = CmapSubtable::parse(bytes) {
                    return Some(t);
                }
            }
        }
        None
    }

    pub fn subtables(&self) -> impl Iterator<Item = EncodingRecord> + 'a {
        self.records.iter().map(|r| EncodingRecord {
            platform_id: r.platform_id,
            encoding_id: r.encoding_id,
            offset: r.offset,
        })
    }
}
