//! `COLR` version 1: a paint graph rooted at a
//! `BaseGlyphV1List`, traversed into a linear stream of [`Painter`] calls.
//! Variable paints (`Var*` formats) are read at their stored base value;
//! resolving the `DeltaSetIndexMap`/Item Variation Store offset into an
//! actual delta is not implemented (documented limitation — see DESIGN.md).

use arrayvec::ArrayVec;

use crate::error::Result;
use crate::ids::GlyphId;
use crate::numeric::{F2Dot14, Fixed};
use crate::paint::{Affine, ColorStop, CompositeMode, Paint, Painter, Point};
use crate::stream::{FromData, LazyArray, Stream};

const MAX_PAINT_DEPTH: usize = 64;

/// Byte offsets (relative to the table a `ColrV1` was built over) on the
/// current traversal stack. Bounded by [`MAX_PAINT_DEPTH`], the same cap
/// `paint_at` enforces on recursion itself, so this never spills.
type VisitedSet = ArrayVec<usize, MAX_PAINT_DEPTH>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BaseGlyphV1Record {
    glyph_id: GlyphId,
    paint_offset: u32,
}

impl FromData for BaseGlyphV1Record {
    const SIZE: usize = 6;

    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(BaseGlyphV1Record { glyph_id: s.read().ok()?, paint_offset: s.read().ok()? })
    }
}

#[derive(Clone, Copy)]
struct BaseGlyphV1List<'a> {
    data: &'a [u8],
    records: LazyArray<'a, BaseGlyphV1Record>,
}

impl<'a> BaseGlyphV1List<'a> {
    fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        let count: u32 = s.read()?;
        let records = s.read_array(count as usize)?;
        Ok(BaseGlyphV1List { data, records })
    }

    fn find(&self, glyph_id: GlyphId) -> Option<&'a [u8]> {
        let (_, record) = self.records.binary_search_by(glyph_id.to_u16(), |r| r.glyph_id.to_u16())?;
        self.data.get(record.paint_offset as usize..)
    }
}

#[derive(Clone, Copy)]
struct LayerList<'a> {
    data: &'a [u8],
    offsets: LazyArray<'a, u32>,
}

impl<'a> LayerList<'a> {
    fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        let count: u32 = s.read()?;
        let offsets = s.read_array(count as usize)?;
        Ok(LayerList { data, offsets })
    }

    fn get(&self, index: u32) -> Option<&'a [u8]> {
        let offset = self.offsets.get(index as usize)?;
        self.data.get(offset as usize..)
    }
}

fn read_color_line<'a>(s: &mut Stream<'a>) -> Result<Vec<ColorStop>> {
    s.skip::<u8>()?; // extend mode
    let count: u16 = s.read()?;
    let mut stops = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let stop_offset: F2Dot14 = s.read()?;
        let palette_index: u16 = s.read()?;
        let alpha: F2Dot14 = s.read()?;
        stops.push(ColorStop { stop_offset, palette_index, alpha });
    }
    Ok(stops)
}

fn read_point(s: &mut Stream) -> Result<Point> {
    Ok(Point { x: s.read()?, y: s.read()? })
}

fn composite_mode_from_u8(value: u8) -> CompositeMode {
    match value {
        0 => CompositeMode::Clear,
        1 => CompositeMode::Src,
        2 => CompositeMode::Dest,
        3 => CompositeMode::SrcOver,
        4 => CompositeMode::DestOver,
        5 => CompositeMode::SrcIn,
        6 => CompositeMode::DestIn,
        7 => CompositeMode::SrcOut,
        8 => CompositeMode::DestOut,
        9 => CompositeMode::SrcAtop,
        10 => CompositeMode::DestAtop,
        11 => CompositeMode::Xor,
        12 => CompositeMode::Plus,
        13 => CompositeMode::Screen,
        14 => CompositeMode::Overlay,
        15 => CompositeMode::Darken,
        16 => CompositeMode::Lighten,
        17 => CompositeMode::ColorDodge,
        18 => CompositeMode::ColorBurn,
        19 => CompositeMode::HardLight,
        20 => CompositeMode::SoftLight,
        21 => CompositeMode::Difference,
        22 => CompositeMode::Exclusion,
        23 => CompositeMode::Multiply,
        24 => CompositeMode::Hue,
        25 => CompositeMode::Saturation,
        26 => CompositeMode::Color,
        _ => CompositeMode::Luminosity,
    }
}

#[derive(Clone, Copy)]
pub struct ColrV1<'a> {
    base_glyphs: BaseGlyphV1List<'a>,
    layers: Option<LayerList<'a>>,
}

impl<'a> ColrV1<'a> {
    pub fn parse(
        data: &'a [u8],
        base_glyph_list_offset: u32,
        layer_list_offset: u32,
    ) -> Result<Self> {
        let base_glyphs =
            BaseGlyphV1List::parse(data.get(base_glyph_list_offset as usize..).ok_or(crate::error::ParseFail)?)?;
        let layers = if layer_list_offset != 0 {
            Some(LayerList::parse(data.get(layer_list_offset as usize..).ok_or(crate::error::ParseFail)?)?)
        } else {
            None
        };
        Ok(ColrV1 { base_glyphs, layers })
    }

    pub fn has_base_glyph(&self, glyph_id: GlyphId) -> bool {
        self.base_glyphs.find(glyph_id).is_some()
    }

    pub fn paint(&self, glyph_id: GlyphId, painter: &mut dyn Painter) {
        let Some(paint_data) = self.base_glyphs.find(glyph_id) else { return };
        let mut visited = VisitedSet::new();
        self.paint_at(paint_data, painter, &mut visited, 0);
    }

    /// Traverses the paint subtree at `data`'s start. `visited` holds the
    /// byte offsets already on the current traversal stack; revisiting one
    /// silently truncates the subtree instead of recursing forever.
    fn paint_at(&self, data: &'a [u8], painter: &mut dyn Painter, visited: &mut VisitedSet, depth: usize) {
        if depth >= MAX_PAINT_DEPTH {
            return;
        }
        let key = data.as_ptr() as usize;
        if visited.contains(&key) {
            return;
        }
        if visited.try_push(key).is_err() {
            return;
        }
        let _ = self.paint_node(data, painter, visited, depth);
        visited.pop();
    }

    fn paint_node(
        &self,
        data: &'a [u8],
        painter: &mut dyn Painter,
        visited: &mut VisitedSet,
        depth: usize,
    ) -> Result<()> {
        let mut s = Stream::new(data);
        let format: u8 = s.read()?;
        match format {
            1 => {
                // PaintColrLayers: firstLayerIndex, numLayers into LayerList.
                let first_layer_index: u32 = s.read()?;
                let num_layers: u8 = s.read()?;
                if let Some(layers) = &self.layers {
                    for i in 0..num_layers as u32 {
                        if let Some(layer_data) = layers.get(first_layer_index + i) {
                            self.paint_at(layer_data, painter, visited, depth + 1);
                        }
                    }
                }
            }
            2 | 3 => {
                let palette_index: u16 = s.read()?;
                let alpha: F2Dot14 = s.read()?;
                painter.paint(&Paint::Solid { palette_index, alpha });
            }
            4 | 5 => {
                let p0 = read_point(&mut s)?;
                let p1 = read_point(&mut s)?;
                let p2 = read_point(&mut s)?;
                let stops = read_color_line(&mut s)?;
                painter.paint(&Paint::LinearGradient { p0, p1, p2, stops });
            }
            6 | 7 => {
                let c0 = read_point(&mut s)?;
                let r0: u16 = s.read()?;
                let c1 = read_point(&mut s)?;
                let r1: u16 = s.read()?;
                let stops = read_color_line(&mut s)?;
                painter.paint(&Paint::RadialGradient { c0, r0, c1, r1, stops });
            }
            8 | 9 => {
                let center = read_point(&mut s)?;
                let start_angle: F2Dot14 = s.read()?;
                let end_angle: F2Dot14 = s.read()?;
                let stops = read_color_line(&mut s)?;
                painter.paint(&Paint::SweepGradient { center, start_angle, end_angle, stops });
            }
            10 => {
                let child_offset: u32 = s.read()?;
                let glyph_id: GlyphId = s.read()?;
                painter.outline_glyph(glyph_id);
                painter.push_clip();
                if let Some(child) = data.get(child_offset as usize..) {
                    self.paint_at(child, painter, visited, depth + 1);
                }
                painter.pop_clip();
            }
            11 => {
                let base_glyph_id: GlyphId = s.read()?;
                painter.paint(&Paint::ColrGlyph { base_glyph_id });
                if let Some(child) = self.base_glyphs.find(base_glyph_id) {
                    self.paint_at(child, painter, visited, depth + 1);
                }
            }
            12 | 13 => {
                let child_offset: u32 = s.read()?;
                let a: Fixed = s.read()?;
                let b: Fixed = s.read()?;
                let c: Fixed = s.read()?;
                let d: Fixed = s.read()?;
                let e: Fixed = s.read()?;
                let f: Fixed = s.read()?;
                let affine = Affine { a, b, c, d, e, f };
                painter.push_transform(affine);
                if let Some(child) = data.get(child_offset as usize..) {
                    self.paint_at(child, painter, visited, depth + 1);
                }
                painter.pop_transform();
            }
            14 | 15 => {
                let child_offset: u32 = s.read()?;
                let dx: Fixed = s.read()?;
                let dy: Fixed = s.read()?;
                painter.push_transform(Affine { e: dx, f: dy, ..Affine::IDENTITY });
                if let Some(child) = data.get(child_offset as usize..) {
                    self.paint_at(child, painter, visited, depth + 1);
                }
                painter.pop_transform();
            }
            16..=23 => {
                let child_offset: u32 = s.read()?;
                let scale_x: F2Dot14 = s.read()?;
                let scale_y: F2Dot14 = if matches!(format, 20..=23) { scale_x } else { s.read()? };
                let around = if matches!(format, 18 | 19 | 22 | 23) {
                    Some(Point { x: s.read()?, y: s.read()? })
                } else {
                    None
                };
                let affine = Affine {
                    a: Fixed::from_f32(scale_x.to_f32()),
                    d: Fixed::from_f32(scale_y.to_f32()),
                    ..Affine::IDENTITY
                };
                painter.paint(&Paint::Scale { sx: affine.a, sy: affine.d, around });
                painter.push_transform(affine);
                if let Some(child) = data.get(child_offset as usize..) {
                    self.paint_at(child, painter, visited, depth + 1);
                }
                painter.pop_transform();
            }
            24..=27 => {
                let child_offset: u32 = s.read()?;
                let angle: F2Dot14 = s.read()?;
                let around =
                    if matches!(format, 26 | 27) { Some(Point { x: s.read()?, y: s.read()? }) } else { None };
                painter.paint(&Paint::Rotate { angle, around });
                if let Some(child) = data.get(child_offset as usize..) {
                    self.paint_at(child, painter, visited, depth + 1);
                }
            }
            28..=31 => {
                let child_offset: u32 = s.read()?;
                let x_skew_angle: F2Dot14 = s.read()?;
                let y_skew_angle: F2Dot14 = s.read()?;
                let around =
                    if matches!(format, 30 | 31) { Some(Point { x: s.read()?, y: s.read()? }) } else { None };
                painter.paint(&Paint::Skew { x_skew_angle, y_skew_angle, around });
                if let Some(child) = data.get(child_offset as usize..) {
                    self.paint_at(child, painter, visited, depth + 1);
                }
            }
            32 => {
                let src_offset: u32 = s.read()?;
                let mode: u8 = s.read()?;
                let dst_offset: u32 = s.read()?;
                let composite_mode = composite_mode_from_u8(mode);
                painter.push_layer(composite_mode);
                if let Some(dst) = data.get(dst_offset as usize..) {
                    self.paint_at(dst, painter, visited, depth + 1);
                }
                painter.paint(&Paint::Composite { mode: composite_mode });
                if let Some(src) = data.get(src_offset as usize..) {
                    self.paint_at(src, painter, visited, depth + 1);
                }
                painter.pop_layer();
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl Painter for Recorder {
        fn outline_glyph(&mut self, glyph_id: GlyphId) {
            self.calls.push(format!("outline({})", glyph_id.to_u16()));
        }
        fn push_clip(&mut self) {
            self.calls.push("push_clip".into());
        }
        fn push_clip_box(&mut self, _x_min: i16, _y_min: i16, _x_max: i16, _y_max: i16) {}
        fn pop_clip(&mut self) {
            self.calls.push("pop_clip".into());
        }
        fn paint(&mut self, paint: &Paint) {
            if let Paint::Solid { palette_index, .. } = paint {
                self.calls.push(format!("solid({palette_index})"));
            }
        }
        fn push_layer(&mut self, _mode: CompositeMode) {}
        fn pop_layer(&mut self) {}
        fn push_transform(&mut self, _affine: Affine) {
            self.calls.push("push_transform".into());
        }
        fn pop_transform(&mut self) {
            self.calls.push("pop_transform".into());
        }
    }

    #[test]
    fn glyph_paint_clips_and_recurses_into_child_solid() {
        let mut paint_table = Vec::new();
        paint_table.extend_from_slice(&10u8.to_be_bytes()); // format 10: PaintGlyph
        let child_offset_pos = paint_table.len();
        paint_table.extend_from_slice(&0u32.to_be_bytes());
        paint_table.extend_from_slice(&GlyphId::new(7).to_u16().to_be_bytes());

        let child_offset = paint_table.len() as u32;
        paint_table.push(2); // format 2: PaintSolid
        paint_table.extend_from_slice(&3u16.to_be_bytes());
        paint_table.extend_from_slice(&F2Dot14::ONE.0.to_be_bytes());

        paint_table[child_offset_pos..child_offset_pos + 4].copy_from_slice(&child_offset.to_be_bytes());

        let mut table = Vec::new();
        table.extend_from_slice(&1u32.to_be_bytes()); // BaseGlyphV1List count
        table.extend_from_slice(&GlyphId::new(3).to_u16().to_be_bytes());
        let paint_offset = (table.len() + 4) as u32;
        table.extend_from_slice(&paint_offset.to_be_bytes());
        table.extend_from_slice(&paint_table);

        let colr = ColrV1::parse(&table, 0, 0).unwrap();
        let mut rec = Recorder::default();
        colr.paint(GlyphId::new(3), &mut rec);

        assert_eq!(rec.calls, vec!["outline(7)", "push_clip", "solid(3)", "pop_clip"]);
    }
}
