//! `avar`: per-axis `SegmentMap`s that remap a normalized
//! coordinate after `fvar`'s piecewise-linear mapping, before it reaches
//! `gvar`/the Item Variation Store.

use crate::error::{ParseFail, Result};
use crate::numeric::F2Dot14;
use crate::stream::{FromData, LazyArray, Stream};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AxisValueMapRecord {
    from_coordinate: F2Dot14,
    to_coordinate: F2Dot14,
}

impl FromData for AxisValueMapRecord {
    const SIZE: usize = 4;

    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(AxisValueMapRecord { from_coordinate: s.read().ok()?, to_coordinate: s.read().ok()? })
    }
}

#[derive(Clone, Copy)]
pub struct SegmentMap<'a> {
    pairs: LazyArray<'a, AxisValueMapRecord>,
}

impl<'a> SegmentMap<'a> {
    /// Linear interpolation between the two neighboring entries; values
    /// outside the map's domain are clipped to `[-1, 1]`.
    pub fn apply(&self, value: F2Dot14) -> F2Dot14 {
        let v = value.to_f32();
        if self.pairs.is_empty() {
            return value;
        }

        let mut lower: Option<AxisValueMapRecord> = None;
        let mut upper: Option<AxisValueMapRecord> = None;
        for pair in self.pairs.iter() {
            let from = pair.from_coordinate.to_f32();
            if from == v {
                return pair.to_coordinate;
            }
            if from < v {
                lower = Some(pair);
            } else if upper.is_none() {
                upper = Some(pair);
            }
        }

        match (lower, upper) {
            (Some(lo), Some(hi)) => {
                let lo_from = lo.from_coordinate.to_f32();
                let hi_from = hi.from_coordinate.to_f32();
                let lo_to = lo.to_coordinate.to_f32();
                let hi_to = hi.to_coordinate.to_f32();
                let t = (v - lo_from) / (hi_from - lo_from);
                F2Dot14::from_f32((lo_to + t * (hi_to - lo_to)).clamp(-1.0, 1.0))
            }
            (Some(lo), None) => F2Dot14::from_f32(lo.to_coordinate.to_f32().clamp(-1.0, 1.0)),
            (None, Some(hi)) => F2Dot14::from_f32(hi.to_coordinate.to_f32().clamp(-1.0, 1.0)),
            (None, None) => F2Dot14::from_f32(v.clamp(-1.0, 1.0)),
        }
    }
}

#[derive(Clone, Copy)]
pub struct Avar<'a> {
    data: &'a [u8],
    axis_count: u16,
}

impl<'a> Avar<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        s.skip::<u16>()?; // majorVersion
        s.skip::<u16>()?; // minorVersion
        let axis_count: u16 = s.read()?;
        let body = s.tail()?;
        Ok(Avar { data: body, axis_count })
    }

    /// Walks each axis's `SegmentMap` header in order to find axis
    /// `index`'s map; offsets are not random-access (each header is
    /// variable-length), so earlier maps must be skipped sequentially.
    pub fn segment_map(&self, index: u16) -> Result<Option<SegmentMap<'a>>> {
        if index >= self.axis_count {
            return Err(ParseFail);
        }
        let mut s = Stream::new(self.data);
        for _ in 0..index {
            let count: u16 = s.read()?;
            s.advance(count as usize * AxisValueMapRecord::SIZE)?;
        }
        let count: u16 = s.read()?;
        let pairs = s.read_array(count as usize)?;
        Ok(Some(SegmentMap { pairs }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_between_neighboring_pairs() {
        let mut d = Vec::new();
        d.extend_from_slice(&1u16.to_be_bytes());
        d.extend_from_slice(&0u16.to_be_bytes());
        d.extend_from_slice(&1u16.to_be_bytes()); // axisCount

        d.extend_from_slice(&3u16.to_be_bytes()); // positionMapCount
        for (from, to) in [(-1.0f32, -1.0f32), (0.0, 0.0), (1.0, 0.6)] {
            d.extend_from_slice(&F2Dot14::from_f32(from).0.to_be_bytes());
            d.extend_from_slice(&F2Dot14::from_f32(to).0.to_be_bytes());
        }

        let avar = Avar::parse(&d).unwrap();
        let map = avar.segment_map(0).unwrap().unwrap();
        assert_eq!(map.apply(F2Dot14::from_f32(0.5)).to_f32(), 0.3);
        assert_eq!(map.apply(F2Dot14::from_f32(0.0)).to_f32(), 0.0);
    }
}
