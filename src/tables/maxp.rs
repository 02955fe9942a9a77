//! `maxp` — maximum profile (mandatory). Version 0.5 (CFF fonts) carries
//! only `num_glyphs`; version 1.0 (TrueType) adds the fields we use as
//! recursion/allocation fuel elsewhere in the crate.

use crate::error::Result;
use crate::stream::Stream;

#[derive(Debug, Clone, Copy, Default)]
pub struct Maxp {
    pub num_glyphs: u16,
    pub max_points: u16,
    pub max_contours: u16,
    pub max_component_elements: u16,
    pub max_component_depth: u16,
}

impl Maxp {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        let version: u32 = s.read()?;
        let num_glyphs: u16 = s.read()?;

        if version < 0x0001_0000 {
            return Ok(Maxp { num_glyphs, ..Default::default() });
        }

        s.skip::<u16>()?; // maxPoints
        s.skip::<u16>()?; // maxContours
        s.skip::<u16>()?; // maxCompositePoints
        s.skip::<u16>()?; // maxCompositeContours
        s.skip::<u16>()?; // maxZones
        s.skip::<u16>()?; // maxTwilightPoints
        s.skip::<u16>()?; // maxStorage
        s.skip::<u16>()?; // maxFunctionDefs
        s.skip::<u16>()?; // maxInstructionDefs
        s.skip::<u16>()?; // maxStackElements
        s.skip::<u16>()?; // maxSizeOfInstructions
        let max_component_elements: u16 = s.read()?;
        let max_component_depth: u16 = s.read()?;

        Ok(Maxp {
            num_glyphs,
            max_points: 0,
            max_contours: 0,
            max_component_elements,
            max_component_depth,
        })
    }
}
