//! `CPAL` color palette table: one or more palettes of BGRA
//! color records, consumed by `COLR`.

use crate::error::Result;
use crate::stream::{FromData, LazyArray, Stream};

/// A single BGRA color record, as stored on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub blue: u8,
    pub green: u8,
    pub red: u8,
    pub alpha: u8,
}

impl FromData for Color {
    const SIZE: usize = 4;

    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(Color { blue: s.read().ok()?, green: s.read().ok()?, red: s.read().ok()?, alpha: s.read().ok()? })
    }
}

#[derive(Clone, Copy)]
pub struct Cpal<'a> {
    num_palette_entries: u16,
    num_palettes: u16,
    colors: LazyArray<'a, Color>,
    color_record_indices: LazyArray<'a, u16>,
}

impl<'a> Cpal<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        let version: u16 = s.read()?;
        let num_palette_entries: u16 = s.read()?;
        let num_palettes: u16 = s.read()?;
        let num_color_records: u16 = s.read()?;
        let color_records_offset: u32 = s.read()?;
        let color_record_indices = s.read_array(num_palettes as usize)?;
        let _ = version;

        let colors_bytes = data.get(color_records_offset as usize..).ok_or(crate::error::ParseFail)?;
        let colors: LazyArray<Color> = LazyArray::new(colors_bytes);
        if colors.len() < num_color_records as usize {
            return Err(crate::error::ParseFail);
        }

        Ok(Cpal { num_palette_entries, num_palettes, colors, color_record_indices })
    }

    pub fn num_palettes(&self) -> u16 {
        self.num_palettes
    }

    pub fn num_palette_entries(&self) -> u16 {
        self.num_palette_entries
    }

    /// `None` if `palette` or `entry` is out of range.
    pub fn color(&self, palette: u16, entry: u16) -> Option<Color> {
        if palette >= self.num_palettes || entry >= self.num_palette_entries {
            return None;
        }
        let first_index = self.color_record_indices.get(palette as usize)?;
        self.colors.get(first_index as usize + entry as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_color_by_palette_and_entry() {
        let mut d = Vec::new();
        d.extend_from_slice(&0u16.to_be_bytes()); // version
        d.extend_from_slice(&2u16.to_be_bytes()); // numPaletteEntries
        d.extend_from_slice(&1u16.to_be_bytes()); // numPalettes
        d.extend_from_slice(&2u16.to_be_bytes()); // numColorRecords
        let offset_pos = d.len();
        d.extend_from_slice(&0u32.to_be_bytes());
        d.extend_from_slice(&0u16.to_be_bytes()); // colorRecordIndices[0]

        let colors_offset = d.len() as u32;
        d.extend_from_slice(&[10, 20, 30, 255]); // entry 0: B,G,R,A
        d.extend_from_slice(&[40, 50, 60, 200]); // entry 1

        d[offset_pos..offset_pos + 4].copy_from_slice(&colors_offset.to_be_bytes());

        let cpal = Cpal::parse(&d).unwrap();
        let c = cpal.color(0, 1).unwrap();
        assert_eq!((c.blue, c.green, c.red, c.alpha), (40, 50, 60, 200));
        assert_eq!(cpal.color(0, 2), None);
        assert_eq!(cpal.color(1, 0), None);
    }
}
