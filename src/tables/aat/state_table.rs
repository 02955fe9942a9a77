//! AAT state-table engine: a deterministic finite automaton
//! indexed by `(state, class)`, shared by `kern` format 1, `kerx`, and
//! `morx`. Stateless across calls — the consumer drives it glyph-by-glyph
//! and reacts to the flags on each returned entry.

use crate::error::{ParseFail, Result};
use crate::ids::GlyphId;
use crate::stream::{FromData, LazyArray, Stream};

use super::lookup::AatLookup;

pub const CLASS_END_OF_TEXT: u16 = 0;
pub const CLASS_OUT_OF_BOUNDS: u16 = 1;
pub const CLASS_DELETED_GLYPH: u16 = 2;

pub const FLAG_DONT_ADVANCE: u16 = 0x4000;
pub const FLAG_PUSH: u16 = 0x8000;
pub const FLAG_RESET: u16 = 0x2000;
pub const MASK_VALUE_OFFSET: u16 = 0x3FFF;

/// A decoded legacy entry: `(new_state, flags, value_offset)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegacyEntry {
    pub new_state: u16,
    pub flags: u16,
    pub value_offset: u16,
}

impl FromData for LegacyEntry {
    const SIZE: usize = 6;

    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(LegacyEntry {
            new_state: s.read().ok()?,
            flags: s.read().ok()?,
            value_offset: s.read().ok()?,
        })
    }
}

/// Legacy `STHeader`-based class table: `(first_glyph, count, bytes[count])`,
/// glyphs outside the range and `0xFFFF` map to `OutOfBounds`/`DeletedGlyph`.
#[derive(Clone, Copy)]
pub struct LegacyClassTable<'a> {
    first_glyph: GlyphId,
    classes: &'a [u8],
}

impl<'a> LegacyClassTable<'a> {
    fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        let first_glyph: GlyphId = s.read()?;
        let count: u16 = s.read()?;
        let classes = s.read_bytes(count as usize)?;
        Ok(LegacyClassTable { first_glyph, classes })
    }

    pub fn class(&self, glyph_id: GlyphId) -> u16 {
        if glyph_id == GlyphId::DELETED {
            return CLASS_DELETED_GLYPH;
        }
        match glyph_id.to_u16().checked_sub(self.first_glyph.to_u16()) {
            Some(index) => self.classes.get(index as usize).map(|&c| c as u16).unwrap_or(CLASS_OUT_OF_BOUNDS),
            None => CLASS_OUT_OF_BOUNDS,
        }
    }
}

/// The legacy `STHeader` engine used by `kern` format 1 subtables: a class
/// table, a `state × number_of_classes` state array, and an entry table.
#[derive(Clone, Copy)]
pub struct LegacyStateTable<'a> {
    number_of_classes: u16,
    class_table: LegacyClassTable<'a>,
    state_array: &'a [u8],
    entry_table: LazyArray<'a, LegacyEntry>,
}

impl<'a> LegacyStateTable<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        let number_of_classes: u16 = s.read()?;
        let class_table_offset: u16 = s.read()?;
        let state_array_offset: u16 = s.read()?;
        let entry_table_offset: u16 = s.read()?;

        if number_of_classes == 0 {
            return Err(ParseFail);
        }

        let class_table = LegacyClassTable::parse(data.get(class_table_offset as usize..).ok_or(ParseFail)?)?;
        let state_array = data.get(state_array_offset as usize..).ok_or(ParseFail)?;
        let entry_bytes = data.get(entry_table_offset as usize..).ok_or(ParseFail)?;
        let entry_table = LazyArray::new(entry_bytes);

        Ok(LegacyStateTable { number_of_classes, class_table, state_array, entry_table })
    }

    pub fn class(&self, glyph_id: GlyphId) -> u16 {
        let class = self.class_table.class(glyph_id);
        if class >= self.number_of_classes {
            CLASS_OUT_OF_BOUNDS
        } else {
            class
        }
    }

    /// Look up the entry for `(state, class)`. A class at or past
    /// `number_of_classes` is coerced to `OutOfBounds` first.
    pub fn entry(&self, state: u16, class: u16) -> Option<LegacyEntry> {
        let class = if class >= self.number_of_classes { CLASS_OUT_OF_BOUNDS } else { class };
        let row_offset = state as usize * self.number_of_classes as usize;
        let index = row_offset + class as usize;
        let entry_index = *self.state_array.get(index)? as usize;
        self.entry_table.get(entry_index)
    }

    /// Absolute byte offset of an entry's associated action payload, or
    /// `None` for entries that carry no value (flags bits 0-13 all zero
    /// with no applicable action, e.g. `NOOP` kerning).
    pub fn value_at(&self, subtable_base: &'a [u8], entry: &LegacyEntry) -> Option<&'a [u8]> {
        subtable_base.get(entry.value_offset as usize..)
    }
}

/// A decoded extended (`STXHeader`) entry: `new_state`, `flags`, and a
/// format-specific `extra` index whose interpretation is left to the
/// consumer (glyph insertion list index, ligature action index, etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtendedEntry {
    pub new_state: u16,
    pub flags: u16,
    pub extra: u16,
}

impl FromData for ExtendedEntry {
    const SIZE: usize = 6;

    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(ExtendedEntry { new_state: s.read().ok()?, flags: s.read().ok()?, extra: s.read().ok()? })
    }
}

/// The extended `STXHeader` engine used by `kerx`/`morx`: classification via
/// an AAT [`AatLookup`], `state × number_of_classes` rows of `u16` entry
/// indices, and an entry table.
#[derive(Clone, Copy)]
pub struct ExtendedStateTable<'a> {
    number_of_classes: u32,
    lookup: AatLookup<'a>,
    state_array: LazyArray<'a, u16>,
    entry_table: LazyArray<'a, ExtendedEntry>,
}

impl<'a> ExtendedStateTable<'a> {
    pub fn parse(data: &'a [u8], num_glyphs: u16) -> Result<Self> {
        let mut s = Stream::new(data);
        let number_of_classes: u32 = s.read()?;
        let lookup_table_offset: u32 = s.read()?;
        let state_array_offset: u32 = s.read()?;
        let entry_table_offset: u32 = s.read()?;

        if number_of_classes == 0 {
            return Err(ParseFail);
        }

        let lookup = AatLookup::parse(data.get(lookup_table_offset as usize..).ok_or(ParseFail)?, num_glyphs)?;
        let state_array = LazyArray::new(data.get(state_array_offset as usize..).ok_or(ParseFail)?);
        let entry_table = LazyArray::new(data.get(entry_table_offset as usize..).ok_or(ParseFail)?);

        Ok(ExtendedStateTable { number_of_classes, lookup, state_array, entry_table })
    }

    pub fn class(&self, glyph_id: GlyphId) -> u16 {
        if glyph_id == GlyphId::DELETED {
            return CLASS_DELETED_GLYPH;
        }
        match self.lookup.get(glyph_id) {
            Some(class) if (class as u32) < self.number_of_classes => class,
            _ => CLASS_OUT_OF_BOUNDS,
        }
    }

    pub fn entry(&self, state: u16, class: u16) -> Option<ExtendedEntry> {
        let class = if (class as u32) >= self.number_of_classes { CLASS_OUT_OF_BOUNDS } else { class };
        let row_offset = state as usize * self.number_of_classes as usize;
        let index = row_offset + class as usize;
        let entry_index = self.state_array.get(index)?;
        self.entry_table.get(entry_index as usize)
    }
}

/// Decodes the shared flag layout: bit 15 push/mark, bit 14
/// don't-advance, bit 13 reset, bits 0-13 value offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryFlags {
    pub push: bool,
    pub dont_advance: bool,
    pub reset: bool,
    pub value_offset: u16,
}

pub fn decode_flags(flags: u16) -> EntryFlags {
    EntryFlags {
        push: flags & FLAG_PUSH != 0,
        dont_advance: flags & FLAG_DONT_ADVANCE != 0,
        reset: flags & FLAG_RESET != 0,
        value_offset: flags & MASK_VALUE_OFFSET,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_state_entries(buf: &mut Vec<u8>, state_array: &[u8], entries: &[(u16, u16, u16)]) {
        let number_of_classes = 4u16;
        buf.extend_from_slice(&number_of_classes.to_be_bytes());
        let class_table_pos = buf.len();
        buf.extend_from_slice(&0u16.to_be_bytes());
        let state_array_pos = buf.len();
        buf.extend_from_slice(&0u16.to_be_bytes());
        let entry_table_pos = buf.len();
        buf.extend_from_slice(&0u16.to_be_bytes());

        let class_table_offset = buf.len() as u16;
        buf.extend_from_slice(&GlyphId::new(4).to_u16().to_be_bytes()); // first_glyph
        buf.extend_from_slice(&2u16.to_be_bytes()); // count
        buf.extend_from_slice(&[3, 3]); // glyph 4 and 5 -> class 3

        let state_array_offset = buf.len() as u16;
        buf.extend_from_slice(state_array);

        let entry_table_offset = buf.len() as u16;
        for (new_state, flags, value_offset) in entries {
            buf.extend_from_slice(&new_state.to_be_bytes());
            buf.extend_from_slice(&flags.to_be_bytes());
            buf.extend_from_slice(&value_offset.to_be_bytes());
        }

        buf[class_table_pos..class_table_pos + 2].copy_from_slice(&class_table_offset.to_be_bytes());
        buf[state_array_pos..state_array_pos + 2].copy_from_slice(&state_array_offset.to_be_bytes());
        buf[entry_table_pos..entry_table_pos + 2].copy_from_slice(&entry_table_offset.to_be_bytes());
    }

    #[test]
    fn legacy_table_classifies_and_walks_one_step() {
        let mut d = Vec::new();
        // state 0 (start-of-text): classes 0,1,2,3 -> entry 0; state 1: class 3 -> entry 1
        let state_array = [0u8, 0, 0, 0, 0, 0, 0, 1];
        push_state_entries(&mut d, &state_array, &[(1, 0, 0), (0, FLAG_DONT_ADVANCE, 10)]);

        let table = LegacyStateTable::parse(&d).unwrap();
        assert_eq!(table.class(GlyphId::new(4)), 3);
        assert_eq!(table.class(GlyphId::new(1)), CLASS_OUT_OF_BOUNDS);
        assert_eq!(table.class(GlyphId::DELETED), CLASS_DELETED_GLYPH);

        let entry = table.entry(0, 3).unwrap();
        assert_eq!(entry.new_state, 1);

        let entry2 = table.entry(1, 3).unwrap();
        assert_eq!(entry2.new_state, 0);
        let flags = decode_flags(entry2.flags);
        assert!(flags.dont_advance);
        assert_eq!(flags.value_offset, 10);
    }

    #[test]
    fn extended_table_uses_aat_lookup_for_classification() {
        let mut d = Vec::new();
        let number_of_classes = 4u32;
        d.extend_from_slice(&number_of_classes.to_be_bytes());
        let lookup_pos = d.len();
        d.extend_from_slice(&0u32.to_be_bytes());
        let state_pos = d.len();
        d.extend_from_slice(&0u32.to_be_bytes());
        let entry_pos = d.len();
        d.extend_from_slice(&0u32.to_be_bytes());

        let lookup_offset = d.len() as u32;
        // AAT Lookup format 0, dense array over 3 glyphs
        d.extend_from_slice(&0u16.to_be_bytes());
        for v in [0u16, 1, 3] {
            d.extend_from_slice(&v.to_be_bytes());
        }

        let state_array_offset = d.len() as u32;
        // state 0: classes 0,1,2,3
        for v in [0u16, 0, 0, 1] {
            d.extend_from_slice(&v.to_be_bytes());
        }

        let entry_table_offset = d.len() as u32;
        for (new_state, flags, extra) in [(0u16, 0u16, 0u16), (1, FLAG_PUSH, 7)] {
            d.extend_from_slice(&new_state.to_be_bytes());
            d.extend_from_slice(&flags.to_be_bytes());
            d.extend_from_slice(&extra.to_be_bytes());
        }

        d[lookup_pos..lookup_pos + 4].copy_from_slice(&lookup_offset.to_be_bytes());
        d[state_pos..state_pos + 4].copy_from_slice(&state_array_offset.to_be_bytes());
        d[entry_pos..entry_pos + 4].copy_from_slice(&entry_table_offset.to_be_bytes());

        let table = ExtendedStateTable::parse(&d, 3).unwrap();
        assert_eq!(table.class(GlyphId::new(2)), 3);
        let entry = table.entry(0, 3).unwrap();
        assert_eq!(entry.new_state, 1);
        assert_eq!(decode_flags(entry.flags).push, true);
        assert_eq!(entry.extra, 7);
    }
}
