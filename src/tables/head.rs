//! `head` — font header (mandatory). A thin field-at-offset accessor; no
//! checksum validation or font-revision interpretation is performed here.

use crate::error::{ParseFail, Result};
use crate::macros::bitflags_like;
use crate::numeric::Fixed;
use crate::stream::Stream;

bitflags_like! {
    /// `head.macStyle` bits.
    pub struct MacStyle: u16 {
        const BOLD = 1 << 0;
        const ITALIC = 1 << 1;
        const UNDERLINE = 1 << 2;
        const OUTLINE = 1 << 3;
        const SHADOW = 1 << 4;
        const CONDENSED = 1 << 5;
        const EXTENDED = 1 << 6;
    }
}

/// Whether `loca` uses 16-bit (doubled) or 32-bit offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexToLocFormat {
    Short,
    Long,
}

#[derive(Debug, Clone, Copy)]
pub struct Head {
    pub font_revision: Fixed,
    pub checksum_adjustment: u32,
    pub flags: u16,
    pub units_per_em: u16,
    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
    pub mac_style: MacStyle,
    pub lowest_rec_ppem: u16,
    pub index_to_loc_format: IndexToLocFormat,
}

impl Head {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        s.skip::<u32>()?; // version
        let font_revision: Fixed = s.read()?;
        let checksum_adjustment: u32 = s.read()?;
        s.skip::<u32>()?; // magicNumber
        let flags: u16 = s.read()?;
        let units_per_em: u16 = s.read()?;
        if units_per_em == 0 {
            return Err(ParseFail);
        }
        s.skip::<u64>()?; // created
        s.skip::<u64>()?; // modified
        let x_min: i16 = s.read()?;
        let y_min: i16 = s.read()?;
        let x_max: i16 = s.read()?;
        let y_max: i16 = s.read()?;
        let mac_style_bits: u16 = s.read()?;
        let lowest_rec_ppem: u16 = s.read()?;
        s.skip::<i16>()?; // fontDirectionHint (deprecated)
        let index_to_loc_format = match s.read::<i16>()? {
            0 => IndexToLocFormat::Short,
            1 => IndexToLocFormat::Long,
            _ => return Err(ParseFail),
        };
        // glyphDataFormat: always 0, not validated.

        Ok(Head {
            font_revision,
            checksum_adjustment,
            flags,
            units_per_em,
            x_min,
            y_min,
            x_max,
            y_max,
            mac_style: MacStyle::from_bits(mac_style_bits),
            lowest_rec_ppem,
            index_to_loc_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<u8> {
        let mut d = vec![0u8; 54];
        d[0..4].copy_from_slice(&0x0001_0000u32.to_be_bytes()); // version
        d[4..8].copy_from_slice(&0x0001_0000u32.to_be_bytes()); // fontRevision = 1.0
        d[18..20].copy_from_slice(&2048u16.to_be_bytes()); // unitsPerEm
        d[36..38].copy_from_slice(&(-100i16).to_be_bytes()); // xMin
        d[50..52].copy_from_slice(&1i16.to_be_bytes()); // indexToLocFormat = long
        d
    }

    #[test]
    fn parses_mandatory_fields() {
        let head = Head::parse(&sample()).unwrap();
        assert_eq!(head.units_per_em, 2048);
        assert_eq!(head.x_min, -100);
        assert_eq!(head.index_to_loc_format, IndexToLocFormat::Long);
    }

    #[test]
    fn zero_units_per_em_is_rejected() {
        let mut data = sample();
        data[18..20].copy_from_slice(&0u16.to_be_bytes());
        assert!(Head::parse(&data).is_err());
    }
}
