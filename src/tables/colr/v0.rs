//! `COLR` version 0: a sorted array of
//! `BaseGlyphRecord(glyph_id, first_layer, num_layers)`; layers are
//! `(glyph_id, palette_index)`. Painting a base glyph enumerates its layers
//! as solid-color outlines clipped to each layer's own glyph shape.

use crate::error::Result;
use crate::ids::GlyphId;
use crate::numeric::F2Dot14;
use crate::paint::{Paint, Painter};
use crate::stream::{FromData, LazyArray, Stream};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BaseGlyphRecord {
    glyph_id: GlyphId,
    first_layer_index: u16,
    num_layers: u16,
}

impl FromData for BaseGlyphRecord {
    const SIZE: usize = 6;

    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(BaseGlyphRecord {
            glyph_id: s.read().ok()?,
            first_layer_index: s.read().ok()?,
            num_layers: s.read().ok()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LayerRecord {
    glyph_id: GlyphId,
    palette_index: u16,
}

impl FromData for LayerRecord {
    const SIZE: usize = 4;

    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(LayerRecord { glyph_id: s.read().ok()?, palette_index: s.read().ok()? })
    }
}

#[derive(Clone, Copy)]
pub struct ColrV0<'a> {
    base_glyphs: LazyArray<'a, BaseGlyphRecord>,
    layers: LazyArray<'a, LayerRecord>,
}

impl<'a> ColrV0<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        s.skip::<u16>()?; // version
        let num_base_glyphs: u16 = s.read()?;
        let base_glyph_records_offset: u32 = s.read()?;
        let layer_records_offset: u32 = s.read()?;
        let num_layer_records: u16 = s.read()?;

        let base_glyphs: LazyArray<BaseGlyphRecord> =
            LazyArray::new(data.get(base_glyph_records_offset as usize..).ok_or(crate::error::ParseFail)?);
        if base_glyphs.len() < num_base_glyphs as usize {
            return Err(crate::error::ParseFail);
        }
        let layers: LazyArray<LayerRecord> =
            LazyArray::new(data.get(layer_records_offset as usize..).ok_or(crate::error::ParseFail)?);
        if layers.len() < num_layer_records as usize {
            return Err(crate::error::ParseFail);
        }

        Ok(ColrV0 { base_glyphs, layers })
    }

    fn find_base_glyph(&self, glyph_id: GlyphId) -> Option<BaseGlyphRecord> {
        self.base_glyphs.binary_search_by(glyph_id.to_u16(), |r| r.glyph_id.to_u16()).map(|(_, r)| r)
    }

    pub fn is_color_glyph(&self, glyph_id: GlyphId) -> bool {
        self.find_base_glyph(glyph_id).is_some()
    }

    /// Emits `outline(layer) push_clip paint(solid) pop_clip` per layer, in
    /// order, for `glyph_id`'s base-glyph record.
    pub fn paint(&self, glyph_id: GlyphId, painter: &mut dyn Painter) {
        let Some(base) = self.find_base_glyph(glyph_id) else { return };
        for i in 0..base.num_layers {
            let Some(layer) = self.layers.get(base.first_layer_index as usize + i as usize) else { break };
            painter.outline_glyph(layer.glyph_id);
            painter.push_clip();
            painter.paint(&Paint::Solid { palette_index: layer.palette_index, alpha: F2Dot14::ONE });
            painter.pop_clip();
        }
    }
}
