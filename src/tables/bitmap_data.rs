//! The bitmap data table shared by `CBDT` and `EBDT`: a
//! tagged union of glyph bitmap formats, each with a fixed metrics header,
//! resolved via a [`BitmapLocation`](super::bitmap_location::BitmapLocation)
//! from the matching location table.

use crate::error::{ParseFail, Result};
use crate::stream::Stream;

use super::bitmap_location::BitmapLocation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmallGlyphMetrics {
    pub height: u8,
    pub width: u8,
    pub bearing_x: i8,
    pub bearing_y: i8,
    pub advance: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BigGlyphMetrics {
    pub height: u8,
    pub width: u8,
    pub hori_bearing_x: i8,
    pub hori_bearing_y: i8,
    pub hori_advance: u8,
    pub vert_bearing_x: i8,
    pub vert_bearing_y: i8,
    pub vert_advance: u8,
}

fn read_small_metrics(s: &mut Stream) -> Result<SmallGlyphMetrics> {
    Ok(SmallGlyphMetrics {
        height: s.read()?,
        width: s.read()?,
        bearing_x: s.read()?,
        bearing_y: s.read()?,
        advance: s.read()?,
    })
}

fn read_big_metrics(s: &mut Stream) -> Result<BigGlyphMetrics> {
    Ok(BigGlyphMetrics {
        height: s.read()?,
        width: s.read()?,
        hori_bearing_x: s.read()?,
        hori_bearing_y: s.read()?,
        hori_advance: s.read()?,
        vert_bearing_x: s.read()?,
        vert_bearing_y: s.read()?,
        vert_advance: s.read()?,
    })
}

/// A decoded glyph bitmap record (`CBDT`/`EBDT` formats 17/18/19 — PNG
/// payloads with small/big/no inline metrics respectively; the older
/// byte-aligned/bit-aligned formats 1/2/5/6/7/8/9 are not implemented, as
/// no example in the pack exercises them).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitmapGlyph<'a> {
    Format17 { metrics: SmallGlyphMetrics, data: &'a [u8] },
    Format18 { metrics: BigGlyphMetrics, data: &'a [u8] },
    Format19 { data: &'a [u8] },
}

impl<'a> BitmapGlyph<'a> {
    pub fn data(&self) -> &'a [u8] {
        match self {
            BitmapGlyph::Format17 { data, .. } => data,
            BitmapGlyph::Format18 { data, .. } => data,
            BitmapGlyph::Format19 { data } => data,
        }
    }
}

pub fn parse_bitmap_glyph<'a>(table: &'a [u8], location: BitmapLocation) -> Result<BitmapGlyph<'a>> {
    let bytes = table.get(location.offset as usize..location.end_offset as usize).ok_or(ParseFail)?;
    let mut s = Stream::new(bytes);
    match location.image_format {
        17 => {
            let metrics = read_small_metrics(&mut s)?;
            let data_len: u32 = s.read()?;
            let data = s.read_bytes(data_len as usize)?;
            Ok(BitmapGlyph::Format17 { metrics, data })
        }
        18 => {
            let metrics = read_big_metrics(&mut s)?;
            let data_len: u32 = s.read()?;
            let data = s.read_bytes(data_len as usize)?;
            Ok(BitmapGlyph::Format18 { metrics, data })
        }
        19 => {
            let data_len: u32 = s.read()?;
            let data = s.read_bytes(data_len as usize)?;
            Ok(BitmapGlyph::Format19 { data })
        }
        _ => Err(ParseFail),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_format_17_small_metrics_and_png_payload() {
        let mut d = Vec::new();
        d.extend_from_slice(&[10u8, 8, 1, 2, 9]); // small metrics
        let png = [0xAAu8; 16];
        d.extend_from_slice(&(png.len() as u32).to_be_bytes());
        d.extend_from_slice(&png);

        let location = BitmapLocation { offset: 0, end_offset: d.len() as u32, image_format: 17 };
        let glyph = parse_bitmap_glyph(&d, location).unwrap();
        match glyph {
            BitmapGlyph::Format17 { metrics, data } => {
                assert_eq!(metrics.height, 10);
                assert_eq!(metrics.width, 8);
                assert_eq!(data, &png[..]);
            }
            _ => panic!("expected format 17"),
        }
    }
}
