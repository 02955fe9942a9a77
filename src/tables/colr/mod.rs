//! `COLR` color glyph table: version 0's static base-glyph +
//! layer arrays, and version 1's paint graph layered on top of the same v0
//! header fields.

pub mod v0;
pub mod v1;

use crate::error::Result;
use crate::ids::GlyphId;
use crate::paint::Painter;
use crate::stream::Stream;

pub use v0::ColrV0;
pub use v1::ColrV1;

#[derive(Clone, Copy)]
pub enum Colr<'a> {
    V0(ColrV0<'a>),
    V1 { v0: ColrV0<'a>, v1: ColrV1<'a> },
}

impl<'a> Colr<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let v0 = ColrV0::parse(data)?;

        let mut s = Stream::new(data);
        let version: u16 = s.read()?;
        if version == 0 {
            return Ok(Colr::V0(v0));
        }

        // Shared v0 header fields still precede the v1-only offsets.
        s.skip::<u16>()?; // numBaseGlyphRecords
        s.skip::<u32>()?; // baseGlyphRecordsOffset
        s.skip::<u32>()?; // layerRecordsOffset
        s.skip::<u16>()?; // numLayerRecords
        let base_glyph_list_offset: u32 = s.read()?;
        let layer_list_offset: u32 = s.read()?;
        // clipListOffset, varIndexMapOffset, itemVariationStoreOffset follow
        // but are not resolved (DeltaSetIndexMap/IVS blending out of scope).

        let v1 = ColrV1::parse(data, base_glyph_list_offset, layer_list_offset)?;
        Ok(Colr::V1 { v0, v1 })
    }

    pub fn is_color_glyph(&self, glyph_id: GlyphId) -> bool {
        match self {
            Colr::V0(v0) => v0.is_color_glyph(glyph_id),
            Colr::V1 { v0, v1 } => v0.is_color_glyph(glyph_id) || v1.has_base_glyph(glyph_id),
        }
    }

    pub fn paint(&self, glyph_id: GlyphId, painter: &mut dyn Painter) {
        match self {
            Colr::V0(v0) => v0.paint(glyph_id, painter),
            Colr::V1 { v0, v1 } => {
                if v1.has_base_glyph(glyph_id) {
                    v1.paint(glyph_id, painter);
                } else {
                    v0.paint(glyph_id, painter);
                }
            }
        }
    }
}
