//! `STAT` — style attributes table. Describes the axes of a variable font
//! family and, for a specific static instance, which values on those axes
//! it represents (used by font pickers to build style-linking UI).

use crate::error::{ParseFail, Result};
use crate::ids::Tag;
use crate::numeric::Fixed;
use crate::stream::{FromData, LazyArray, Offset16, Stream};

#[derive(Debug, Clone, Copy)]
pub struct AxisRecord {
    pub tag: Tag,
    pub name_id: u16,
    pub ordering: u16,
}

impl FromData for AxisRecord {
    const SIZE: usize = 8;

    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(AxisRecord { tag: s.read().ok()?, name_id: s.read().ok()?, ordering: s.read().ok()? })
    }
}

/// An axis value table, formats 1 through 4.
#[derive(Debug, Clone)]
pub enum AxisValue {
    /// Format 1: a single axis at a single value.
    Format1 { axis_index: u16, name_id: u16, value: Fixed },
    /// Format 2: a single axis, a nominal value plus a range.
    Format2 { axis_index: u16, name_id: u16, nominal_value: Fixed, range_min: Fixed, range_max: Fixed },
    /// Format 3: a single axis value with a linked alias value (e.g. Bold -> 700 linked to 400).
    Format3 { axis_index: u16, name_id: u16, value: Fixed, linked_value: Fixed },
    /// Format 4: a named combination of values across multiple axes.
    Format4 { name_id: u16, values: Vec<(u16, Fixed)> },
}

impl AxisValue {
    fn parse(data: &[u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        let format: u16 = s.read()?;
        match format {
            1 => {
                let axis_index: u16 = s.read()?;
                s.skip::<u16>()?; // flags
                let name_id: u16 = s.read()?;
                let value: Fixed = s.read()?;
                Ok(AxisValue::Format1 { axis_index, name_id, value })
            }
            2 => {
                let axis_index: u16 = s.read()?;
                s.skip::<u16>()?; // flags
                let name_id: u16 = s.read()?;
                let nominal_value: Fixed = s.read()?;
                let range_min: Fixed = s.read()?;
                let range_max: Fixed = s.read()?;
                Ok(AxisValue::Format2 { axis_index, name_id, nominal_value, range_min, range_max })
            }
            3 => {
                let axis_index: u16 = s.read()?;
                s.skip::<u16>()?; // flags
                let name_id: u16 = s.read()?;
                let value: Fixed = s.read()?;
                let linked_value: Fixed = s.read()?;
                Ok(AxisValue::Format3 { axis_index, name_id, value, linked_value })
            }
            4 => {
                let axis_count: u16 = s.read()?;
                s.skip::<u16>()?; // flags
                let name_id: u16 = s.read()?;
                let mut values = Vec::with_capacity(axis_count as usize);
                for _ in 0..axis_count {
                    let axis_index: u16 = s.read()?;
                    let value: Fixed = s.read()?;
                    values.push((axis_index, value));
                }
                Ok(AxisValue::Format4 { name_id, values })
            }
            _ => Err(ParseFail),
        }
    }

    pub fn name_id(&self) -> u16 {
        match self {
            AxisValue::Format1 { name_id, .. }
            | AxisValue::Format2 { name_id, .. }
            | AxisValue::Format3 { name_id, .. }
            | AxisValue::Format4 { name_id, .. } => *name_id,
        }
    }
}

#[derive(Clone, Copy)]
pub struct Stat<'a> {
    axis_value_base: &'a [u8],
    axes: LazyArray<'a, AxisRecord>,
    value_offsets: LazyArray<'a, Offset16>,
    pub elided_fallback_name_id: Option<u16>,
}

impl<'a> Stat<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        let major: u16 = s.read()?;
        let minor: u16 = s.read()?;
        if major != 1 {
            return Err(ParseFail);
        }
        s.skip::<u16>()?; // designAxisSize
        let design_axis_record_size: u16 = s.read()?;
        let design_axis_count: u16 = s.read()?;
        let design_axes_offset: u32 = s.read()?;
        let axis_value_count: u16 = s.read()?;
        let offset_to_axis_value_offsets: u32 = s.read()?;
        let elided_fallback_name_id = if minor >= 1 { Some(s.read()?) } else { None };

        if design_axis_record_size as usize != AxisRecord::SIZE {
            return Err(ParseFail);
        }

        let axes_len = design_axis_count as usize * AxisRecord::SIZE;
        let axes_data = s.slice(design_axes_offset as usize, axes_len)?;
        let axes = LazyArray::new(axes_data);

        let offsets_len = axis_value_count as usize * Offset16::SIZE;
        let offsets_data = s.slice(offset_to_axis_value_offsets as usize, offsets_len)?;
        let value_offsets = LazyArray::new(offsets_data);

        // Axis value table offsets are relative to the start of the axis
        // value offsets array, per the OpenType `STAT` table layout.
        let axis_value_base = data.get(offset_to_axis_value_offsets as usize..).ok_or(ParseFail)?;

        Ok(Stat { axis_value_base, axes, value_offsets, elided_fallback_name_id })
    }

    pub fn axes(&self) -> impl Iterator<Item = AxisRecord> + 'a {
        self.axes.iter()
    }

    pub fn axis_count(&self) -> u16 {
        self.axes.len() as u16
    }

    pub fn axis_value_count(&self) -> u16 {
        self.value_offsets.len() as u16
    }

    pub fn axis_value(&self, index: u16) -> Option<AxisValue> {
        let offset = self.value_offsets.get(index as usize)?;
        let table_offset = offset.non_null()? as usize;
        let bytes = self.axis_value_base.get(table_offset..)?;
        AxisValue::parse(bytes).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_format1(axis_tag: &[u8; 4], name_id: u16, value: f32) -> Vec<u8> {
        let mut header = vec![0u8; 16];
        header[0..2].copy_from_slice(&1u16.to_be_bytes()); // majorVersion
        header[2..4].copy_from_slice(&0u16.to_be_bytes()); // minorVersion
        header[4..6].copy_from_slice(&(AxisRecord::SIZE as u16).to_be_bytes());
        header[6..8].copy_from_slice(&1u16.to_be_bytes()); // designAxisCount
        header[8..12].copy_from_slice(&16u32.to_be_bytes()); // designAxesOffset
        header[12..14].copy_from_slice(&1u16.to_be_bytes()); // axisValueCount
        header[14..16].copy_from_slice(&(16 + AxisRecord::SIZE as u32).to_be_bytes());

        let mut out = header;
        out.extend_from_slice(axis_tag);
        out.extend_from_slice(&256u16.to_be_bytes()); // nameId
        out.extend_from_slice(&0u16.to_be_bytes()); // ordering

        let offsets_base = out.len();
        out.extend_from_slice(&2u16.to_be_bytes()); // offset to the one axis value table, relative to offsets_base

        out.extend_from_slice(&1u16.to_be_bytes()); // format
        out.extend_from_slice(&0u16.to_be_bytes()); // axisIndex
        out.extend_from_slice(&0u16.to_be_bytes()); // flags
        out.extend_from_slice(&name_id.to_be_bytes());
        out.extend_from_slice(&Fixed::from_f32(value).0.to_be_bytes());

        let _ = offsets_base;
        out
    }

    #[test]
    fn reads_axis_record_and_format_1_value() {
        let data = build_format1(b"wght", 257, 400.0);
        let stat = Stat::parse(&data).unwrap();
        assert_eq!(stat.axis_count(), 1);
        let axis = stat.axes().next().unwrap();
        assert_eq!(axis.tag, Tag::new(b"wght"));

        match stat.axis_value(0).unwrap() {
            AxisValue::Format1 { axis_index, name_id, value } => {
                assert_eq!(axis_index, 0);
                assert_eq!(name_id, 257);
                assert!((value.to_f32() - 400.0).abs() < 0.01);
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
