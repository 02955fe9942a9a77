//! `fvar`: axes (`tag, min, default, max, flags, name_id`)
//! plus named instances. `Fvar::normalize` implements `set_variation`'s
//! piecewise-linear mapping from a user value to a normalized coordinate.

use crate::error::{ParseFail, Result};
use crate::ids::Tag;
use crate::numeric::{F2Dot14, Fixed};
use crate::stream::{FromData, LazyArray, Stream};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariationAxis {
    pub tag: Tag,
    pub min_value: Fixed,
    pub default_value: Fixed,
    pub max_value: Fixed,
    pub flags: u16,
    pub name_id: u16,
}

impl FromData for VariationAxis {
    const SIZE: usize = 20;

    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        let tag: Tag = s.read().ok()?;
        let min_value: Fixed = s.read().ok()?;
        let default_value: Fixed = s.read().ok()?;
        let max_value: Fixed = s.read().ok()?;
        let flags: u16 = s.read().ok()?;
        let name_id: u16 = s.read().ok()?;
        Some(VariationAxis { tag, min_value, default_value, max_value, flags, name_id })
    }
}

impl VariationAxis {
    /// Piecewise-linear map `(min -> -1, default -> 0, max -> +1)`, clamping
    /// the input to `[min, max]` first.
    pub fn normalize(&self, user_value: Fixed) -> F2Dot14 {
        let v = user_value.to_f32().clamp(self.min_value.to_f32(), self.max_value.to_f32());
        let default = self.default_value.to_f32();
        let normalized = if v < default {
            let denom = default - self.min_value.to_f32();
            if denom == 0.0 { 0.0 } else { (v - default) / denom }
        } else if v > default {
            let denom = self.max_value.to_f32() - default;
            if denom == 0.0 { 0.0 } else { (v - default) / denom }
        } else {
            0.0
        };
        F2Dot14::from_f32(normalized)
    }
}

#[derive(Clone, Copy)]
pub struct InstanceRecord<'a> {
    pub subfamily_name_id: u16,
    pub coordinates: LazyArray<'a, Fixed>,
    pub postscript_name_id: Option<u16>,
}

#[derive(Clone, Copy)]
pub struct Fvar<'a> {
    axes: LazyArray<'a, VariationAxis>,
    instances_data: &'a [u8],
    instance_count: u16,
    instance_size: u16,
    axis_count: u16,
}

impl<'a> Fvar<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        s.skip::<u16>()?; // majorVersion
        s.skip::<u16>()?; // minorVersion
        let axes_array_offset: u16 = s.read()?;
        s.skip::<u16>()?; // reserved
        let axis_count: u16 = s.read()?;
        s.skip::<u16>()?; // axisSize (fixed at 20)
        let instance_count: u16 = s.read()?;
        let instance_size: u16 = s.read()?;

        let axes_bytes = data.get(axes_array_offset as usize..).ok_or(ParseFail)?;
        let axes: LazyArray<VariationAxis> = LazyArray::new(axes_bytes);
        if axes.len() < axis_count as usize {
            return Err(ParseFail);
        }

        let instances_offset = axes_array_offset as usize + axis_count as usize * VariationAxis::SIZE;
        let instances_data = data.get(instances_offset..).ok_or(ParseFail)?;

        Ok(Fvar { axes, instances_data, instance_count, instance_size, axis_count })
    }

    pub fn axis_count(&self) -> u16 {
        self.axis_count
    }

    pub fn axis(&self, index: u16) -> Option<VariationAxis> {
        self.axes.get(index as usize)
    }

    pub fn axis_by_tag(&self, tag: Tag) -> Option<(u16, VariationAxis)> {
        self.axes.iter().enumerate().find(|(_, a)| a.tag == tag).map(|(i, a)| (i as u16, a))
    }

    pub fn instance_count(&self) -> u16 {
        self.instance_count
    }

    pub fn instance(&self, index: u16) -> Option<InstanceRecord<'a>> {
        if index >= self.instance_count {
            return None;
        }
        let start = index as usize * self.instance_size as usize;
        let bytes = self.instances_data.get(start..start + self.instance_size as usize)?;
        let mut s = Stream::new(bytes);
        let subfamily_name_id: u16 = s.read().ok()?;
        s.skip::<u16>().ok()?; // flags
        let coordinates = s.read_array(self.axis_count as usize).ok()?;
        let consumed = 4 + self.axis_count as usize * Fixed::SIZE;
        let postscript_name_id =
            if self.instance_size as usize >= consumed + 2 { s.read::<u16>().ok() } else { None };
        Some(InstanceRecord { subfamily_name_id, coordinates, postscript_name_id })
    }
}
