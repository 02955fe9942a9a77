//! `vhea` — vertical header (optional; consumed by `vmtx`).

use crate::error::Result;
use crate::stream::Stream;

#[derive(Debug, Clone, Copy)]
pub struct Vhea {
    pub ascender: i16,
    pub descender: i16,
    pub line_gap: i16,
    pub advance_height_max: u16,
    pub min_top_side_bearing: i16,
    pub min_bottom_side_bearing: i16,
    pub y_max_extent: i16,
    pub caret_slope_rise: i16,
    pub caret_slope_run: i16,
    pub caret_offset: i16,
    pub number_of_v_metrics: u16,
}

impl Vhea {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        s.skip::<u32>()?; // version
        let ascender: i16 = s.read()?;
        let descender: i16 = s.read()?;
        let line_gap: i16 = s.read()?;
        let advance_height_max: u16 = s.read()?;
        let min_top_side_bearing: i16 = s.read()?;
        let min_bottom_side_bearing: i16 = s.read()?;
        let y_max_extent: i16 = s.read()?;
        let caret_slope_rise: i16 = s.read()?;
        let caret_slope_run: i16 = s.read()?;
        let caret_offset: i16 = s.read()?;
        s.skip::<u64>()?; // 4 reserved i16s
        s.skip::<i16>()?; // metricDataFormat
        let number_of_v_metrics: u16 = s.read()?;

        Ok(Vhea {
            ascender,
            descender,
            line_gap,
            advance_height_max,
            min_top_side_bearing,
            min_bottom_side_bearing,
            y_max_extent,
            caret_slope_rise,
            caret_slope_run,
            caret_offset,
            number_of_v_metrics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_fixed_fields_after_the_version() {
        let mut d = Vec::new();
        d.extend_from_slice(&0x00011000u32.to_be_bytes()); // version
        d.extend_from_slice(&950i16.to_be_bytes()); // ascender
        d.extend_from_slice(&(-250i16).to_be_bytes()); // descender
        d.extend_from_slice(&0i16.to_be_bytes()); // lineGap
        d.extend_from_slice(&1200u16.to_be_bytes()); // advanceHeightMax
        d.extend_from_slice(&10i16.to_be_bytes()); // minTopSideBearing
        d.extend_from_slice(&20i16.to_be_bytes()); // minBottomSideBearing
        d.extend_from_slice(&1000i16.to_be_bytes()); // yMaxExtent
        d.extend_from_slice(&1i16.to_be_bytes()); // caretSlopeRise
        d.extend_from_slice(&0i16.to_be_bytes()); // caretSlopeRun
        d.extend_from_slice(&0i16.to_be_bytes()); // caretOffset
        d.extend_from_slice(&[0u8; 8]); // 4 reserved i16s
        d.extend_from_slice(&0i16.to_be_bytes()); // metricDataFormat
        d.extend_from_slice(&42u16.to_be_bytes()); // numOfLongVerMetrics

        let vhea = Vhea::parse(&d).unwrap();
        assert_eq!(vhea.ascender, 950);
        assert_eq!(vhea.descender, -250);
        assert_eq!(vhea.advance_height_max, 1200);
        assert_eq!(vhea.number_of_v_metrics, 42);
    }
}
