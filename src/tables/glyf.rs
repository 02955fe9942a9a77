//! `glyf` — TrueType glyph outlines: flag-run-length-encoded
//! simple glyphs and composite glyphs referencing other glyphs by index,
//! recursively.

use crate::error::{ParseFail, Result};
use crate::ids::{GlyphId, Rect};
use crate::outline::OutlineBuilder;
use crate::stream::Stream;
use crate::tables::loca::Loca;

/// Composite glyph recursion is capped at this depth; a font nesting
/// components deeper than this is rejected rather than walked.
const MAX_COMPONENT_DEPTH: u8 = 32;

const FLAG_ON_CURVE: u8 = 0x01;
const FLAG_X_SHORT: u8 = 0x02;
const FLAG_Y_SHORT: u8 = 0x04;
const FLAG_REPEAT: u8 = 0x08;
const FLAG_X_SAME_OR_POSITIVE: u8 = 0x10;
const FLAG_Y_SAME_OR_POSITIVE: u8 = 0x20;

const COMPONENT_ARGS_ARE_WORDS: u16 = 0x0001;
const COMPONENT_ARGS_ARE_XY: u16 = 0x0002;
const COMPONENT_WE_HAVE_SCALE: u16 = 0x0008;
const COMPONENT_MORE_COMPONENTS: u16 = 0x0020;
const COMPONENT_WE_HAVE_X_AND_Y_SCALE: u16 = 0x0040;
const COMPONENT_WE_HAVE_A_TWO_BY_TWO: u16 = 0x0080;
const COMPONENT_USE_MY_METRICS: u16 = 0x0200;

#[derive(Clone, Copy)]
pub struct GlyfTable<'a> {
    data: &'a [u8],
}

impl<'a> GlyfTable<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        GlyfTable { data }
    }

    /// Outline the glyph into `builder`, recursing through composite
    /// components. Returns the glyph's bounding box, or `None` for glyphs
    /// with an empty outline (e.g. space).
    pub fn outline(
        &self,
        glyph_id: GlyphId,
        loca: &Loca<'a>,
        builder: &mut dyn OutlineBuilder,
    ) -> Result<Option<Rect>> {
        self.outline_at_depth(glyph_id, loca, builder, 0, 0.0, 0.0)
    }

    /// The glyph whose `hmtx`/`vmtx` metrics apply to `glyph_id`: itself for
    /// simple glyphs, or (recursively) the LAST subcomponent flagged
    /// `USE_MY_METRICS` for composites, matching HarfBuzz's tie-break when a
    /// composite names more than one such component.
    pub fn metrics_glyph(&self, glyph_id: GlyphId, loca: &Loca<'a>) -> Result<GlyphId> {
        let Some((start, end)) = loca.glyph_range(glyph_id) else {
            return Ok(glyph_id);
        };
        let glyph_data = self.data.get(start as usize..end as usize).ok_or(ParseFail)?;
        let mut s = Stream::new(glyph_data);
        let number_of_contours: i16 = s.read()?;
        if number_of_contours >= 0 {
            return Ok(glyph_id);
        }
        s.advance(8)?; // xMin, yMin, xMax, yMax

        let mut metrics_source = glyph_id;
        loop {
            let flags: u16 = s.read()?;
            let component_glyph_index: u16 = s.read()?;

            if flags & COMPONENT_ARGS_ARE_WORDS != 0 {
                s.advance(4)?;
            } else {
                s.advance(2)?;
            }
            if flags & COMPONENT_WE_HAVE_A_TWO_BY_TWO != 0 {
                s.advance(8)?;
            } else if flags & COMPONENT_WE_HAVE_X_AND_Y_SCALE != 0 {
                s.advance(4)?;
            } else if flags & COMPONENT_WE_HAVE_SCALE != 0 {
                s.advance(2)?;
            }

            if flags & COMPONENT_USE_MY_METRICS != 0 {
                metrics_source = GlyphId::new(component_glyph_index);
            }

            if flags & COMPONENT_MORE_COMPONENTS == 0 {
                break;
            }
        }

        if metrics_source == glyph_id {
            Ok(glyph_id)
        } else {
            self.metrics_glyph(metrics_source, loca)
        }
    }

    fn outline_at_depth(
        &self,
        glyph_id: GlyphId,
        loca: &Loca<'a>,
        builder: &mut dyn OutlineBuilder,
        depth: u8,
        dx: f32,
        dy: f32,
    ) -> Result<Option<Rect>> {
        if depth > MAX_COMPONENT_DEPTH {
            return Err(ParseFail);
        }

        let Some((start, end)) = loca.glyph_range(glyph_id) else {
            return Ok(None);
        };
        let glyph_data = self.data.get(start as usize..end as usize).ok_or(ParseFail)?;

        let mut s = Stream::new(glyph_data);
        let number_of_contours: i16 = s.read()?;
        let x_min: i16 = s.read()?;
        let y_min: i16 = s.read()?;
        let x_max: i16 = s.read()?;
        let y_max: i16 = s.read()?;
        let rect = Rect { x_min, y_min, x_max, y_max };

        if number_of_contours >= 0 {
            self.outline_simple(&mut s, number_of_contours as u16, builder, dx, dy)?;
        } else {
            self.outline_composite(&mut s, loca, builder, depth, dx, dy)?;
        }

        Ok(Some(rect))
    }

    fn outline_simple(
        &self,
        s: &mut Stream<'a>,
        number_of_contours: u16,
        builder: &mut dyn OutlineBuilder,
        dx: f32,
        dy: f32,
    ) -> Result<()> {
        let end_pts: crate::stream::LazyArray<u16> = s.read_array(number_of_contours as usize)?;
        let num_points = match number_of_contours {
            0 => 0,
            n => end_pts.get(n as usize - 1).ok_or(ParseFail)? as usize + 1,
        };

        let instruction_length: u16 = s.read()?;
        s.advance(instruction_length as usize)?;

        let mut flags = Vec::with_capacity(num_points);
        while flags.len() < num_points {
            let flag: u8 = s.read()?;
            flags.push(flag);
            if flag & FLAG_REPEAT != 0 {
                let repeat_count: u8 = s.read()?;
                for _ in 0..repeat_count {
                    if flags.len() >= num_points {
                        break;
                    }
                    flags.push(flag);
                }
            }
        }

        let mut xs = Vec::with_capacity(num_points);
        let mut x = 0i32;
        for &flag in &flags {
            if flag & FLAG_X_SHORT != 0 {
                let delta: u8 = s.read()?;
                x += if flag & FLAG_X_SAME_OR_POSITIVE != 0 { delta as i32 } else { -(delta as i32) };
            } else if flag & FLAG_X_SAME_OR_POSITIVE == 0 {
                let delta: i16 = s.read()?;
                x += delta as i32;
            }
            xs.push(x);
        }

        let mut ys = Vec::with_capacity(num_points);
        let mut y = 0i32;
        for &flag in &flags {
            if flag & FLAG_Y_SHORT != 0 {
                let delta: u8 = s.read()?;
                y += if flag & FLAG_Y_SAME_OR_POSITIVE != 0 { delta as i32 } else { -(delta as i32) };
            } else if flag & FLAG_Y_SAME_OR_POSITIVE == 0 {
                let delta: i16 = s.read()?;
                y += delta as i32;
            }
            ys.push(y);
        }

        let mut contour_start = 0usize;
        for c in 0..number_of_contours as usize {
            let contour_end = end_pts.get(c).ok_or(ParseFail)? as usize;
            emit_contour(
                &flags[contour_start..=contour_end],
                &xs[contour_start..=contour_end],
                &ys[contour_start..=contour_end],
                builder,
                dx,
                dy,
            );
            contour_start = contour_end + 1;
        }

        Ok(())
    }

    fn outline_composite(
        &self,
        s: &mut Stream<'a>,
        loca: &Loca<'a>,
        builder: &mut dyn OutlineBuilder,
        depth: u8,
        dx: f32,
        dy: f32,
    ) -> Result<()> {
        loop {
            let flags: u16 = s.read()?;
            let glyph_index: u16 = s.read()?;

            let (arg1, arg2) = if flags & COMPONENT_ARGS_ARE_WORDS != 0 {
                let a: i16 = s.read()?;
                let b: i16 = s.read()?;
                (a as f32, b as f32)
            } else {
                let a: i8 = s.read()?;
                let b: i8 = s.read()?;
                (a as f32, b as f32)
            };

            // Point-matching composite placement (ARGS_ARE_XY unset) is not
            // supported; such components are skipped rather than mis-placed.
            let (child_dx, child_dy) = if flags & COMPONENT_ARGS_ARE_XY != 0 {
                (arg1, arg2)
            } else {
                (0.0, 0.0)
            };

            if flags & COMPONENT_WE_HAVE_A_TWO_BY_TWO != 0 {
                s.advance(8)?; // 4 x F2Dot14; non-uniform transforms are not applied to offsets
            } else if flags & COMPONENT_WE_HAVE_X_AND_Y_SCALE != 0 {
                s.advance(4)?;
            } else if flags & COMPONENT_WE_HAVE_SCALE != 0 {
                s.advance(2)?;
            }

            self.outline_at_depth(
                GlyphId::new(glyph_index),
                loca,
                builder,
                depth + 1,
                dx + child_dx,
                dy + child_dy,
            )?;

            if flags & COMPONENT_MORE_COMPONENTS == 0 {
                break;
            }
        }
        Ok(())
    }
}

/// Emit a single contour's quadratic on/off-curve points as a sequence of
/// `move_to`/`quad_to`/`line_to` calls, synthesizing implied on-curve
/// midpoints between consecutive off-curve points.
fn emit_contour(flags: &[u8], xs: &[i32], ys: &[i32], builder: &mut dyn OutlineBuilder, dx: f32, dy: f32) {
    let n = flags.len();
    if n == 0 {
        return;
    }

    let pt = |i: usize| (xs[i] as f32 + dx, ys[i] as f32 + dy);
    let on_curve = |i: usize| flags[i] & FLAG_ON_CURVE != 0;
    let midpoint = |a: (f32, f32), b: (f32, f32)| ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0);

    let start_index = (0..n).find(|&i| on_curve(i));
    let (start, first_off_curve_index) = match start_index {
        Some(i) => (pt(i), None),
        None => (midpoint(pt(0), pt(n - 1)), Some(0)),
    };

    builder.move_to(start.0, start.1);

    let begin = first_off_curve_index.unwrap_or_else(|| start_index.unwrap() + 1);
    let mut pending_off: Option<(f32, f32)> = None;
    let mut current = start;

    for step in 0..n {
        let i = (begin + step) % n;
        let p = pt(i);
        if on_curve(i) {
            match pending_off.take() {
                Some(off) => builder.quad_to(off.0, off.1, p.0, p.1),
                None => builder.line_to(p.0, p.1),
            }
            current = p;
        } else {
            match pending_off {
                Some(off) => {
                    let mid = midpoint(off, p);
                    builder.quad_to(off.0, off.1, mid.0, mid.1);
                    current = mid;
                }
                None => {}
            }
            pending_off = Some(p);
        }
    }

    if let Some(off) = pending_off {
        builder.quad_to(off.0, off.1, start.0, start.1);
    } else if current != start {
        builder.line_to(start.0, start.1);
    }

    builder.close();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::head::IndexToLocFormat;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl OutlineBuilder for Recorder {
        fn move_to(&mut self, x: f32, y: f32) {
            self.calls.push(format!("M{x},{y}"));
        }
        fn line_to(&mut self, x: f32, y: f32) {
            self.calls.push(format!("L{x},{y}"));
        }
        fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
            self.calls.push(format!("Q{x1},{y1} {x},{y}"));
        }
        fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
            self.calls.push(format!("C{x1},{y1} {x2},{y2} {x},{y}"));
        }
        fn close(&mut self) {
            self.calls.push("Z".to_string());
        }
    }

    fn build_triangle_glyph() -> Vec<u8> {
        let mut glyph = Vec::new();
        glyph.extend_from_slice(&1i16.to_be_bytes()); // numberOfContours
        glyph.extend_from_slice(&0i16.to_be_bytes()); // xMin
        glyph.extend_from_slice(&0i16.to_be_bytes()); // yMin
        glyph.extend_from_slice(&10i16.to_be_bytes()); // xMax
        glyph.extend_from_slice(&10i16.to_be_bytes()); // yMax
        glyph.extend_from_slice(&2u16.to_be_bytes()); // endPtsOfContours[0]
        glyph.extend_from_slice(&0u16.to_be_bytes()); // instructionLength
        let on = FLAG_ON_CURVE | FLAG_X_SHORT | FLAG_X_SAME_OR_POSITIVE | FLAG_Y_SHORT | FLAG_Y_SAME_OR_POSITIVE;
        glyph.push(on);
        glyph.push(on);
        glyph.push(on);
        glyph.push(0); // x0
        glyph.push(10); // x1
        glyph.push(0); // x2
        glyph.push(0); // y0
        glyph.push(0); // y1
        glyph.push(10); // y2
        glyph
    }

    #[test]
    fn decodes_a_simple_triangle_contour() {
        let glyph = build_triangle_glyph();
        let mut glyf_data = Vec::new();
        glyf_data.extend_from_slice(&glyph);

        let mut loca_data = Vec::new();
        loca_data.extend_from_slice(&0u32.to_be_bytes());
        loca_data.extend_from_slice(&(glyph.len() as u32).to_be_bytes());

        let loca = Loca::parse(&loca_data, 1, IndexToLocFormat::Long).unwrap();
        let glyf = GlyfTable::new(&glyf_data);
        let mut recorder = Recorder::default();
        let rect = glyf.outline(GlyphId::new(0), &loca, &mut recorder).unwrap().unwrap();

        assert_eq!(rect, Rect { x_min: 0, y_min: 0, x_max: 10, y_max: 10 });
        assert_eq!(recorder.calls.first().unwrap(), "M0,0");
        assert_eq!(recorder.calls.last().unwrap(), "Z");
    }

    #[test]
    fn missing_glyph_range_yields_no_outline() {
        let loca_data = {
            let mut d = Vec::new();
            d.extend_from_slice(&0u32.to_be_bytes());
            d.extend_from_slice(&0u32.to_be_bytes());
            d
        };
        let loca = Loca::parse(&loca_data, 1, IndexToLocFormat::Long).unwrap();
        let glyf = GlyfTable::new(&[]);
        let mut recorder = Recorder::default();
        let rect = glyf.outline(GlyphId::new(0), &loca, &mut recorder).unwrap();
        assert_eq!(rect, None);
        assert!(recorder.calls.is_empty());
    }

    #[test]
    fn composite_metrics_glyph_picks_last_use_my_metrics_component() {
        let triangle = build_triangle_glyph();

        let mut composite = Vec::new();
        composite.extend_from_slice(&(-1i16).to_be_bytes()); // numberOfContours
        composite.extend_from_slice(&0i16.to_be_bytes());
        composite.extend_from_slice(&0i16.to_be_bytes());
        composite.extend_from_slice(&10i16.to_be_bytes());
        composite.extend_from_slice(&10i16.to_be_bytes());

        // Component 0: flagged USE_MY_METRICS, more components follow.
        let flags0 = COMPONENT_ARGS_ARE_XY | COMPONENT_MORE_COMPONENTS | COMPONENT_USE_MY_METRICS;
        composite.extend_from_slice(&flags0.to_be_bytes());
        composite.extend_from_slice(&1u16.to_be_bytes()); // glyph index 1
        composite.push(0);
        composite.push(0);

        // Component 1: also flagged USE_MY_METRICS, last one — wins per HarfBuzz.
        let flags1 = COMPONENT_ARGS_ARE_XY | COMPONENT_USE_MY_METRICS;
        composite.extend_from_slice(&flags1.to_be_bytes());
        composite.extend_from_slice(&2u16.to_be_bytes()); // glyph index 2
        composite.push(0);
        composite.push(0);

        let mut glyf_data = Vec::new();
        glyf_data.extend_from_slice(&composite);
        let composite_end = glyf_data.len() as u32;
        glyf_data.extend_from_slice(&triangle);
        let triangle_end = glyf_data.len() as u32;

        let mut loca_data = Vec::new();
        loca_data.extend_from_slice(&0u32.to_be_bytes());
        loca_data.extend_from_slice(&composite_end.to_be_bytes());
        loca_data.extend_from_slice(&composite_end.to_be_bytes()); // glyph 1: empty
        loca_data.extend_from_slice(&triangle_end.to_be_bytes()); // glyph 2: triangle

        let loca = Loca::parse(&loca_data, 3, IndexToLocFormat::Long).unwrap();
        let glyf = GlyfTable::new(&glyf_data);

        let metrics_glyph = glyf.metrics_glyph(GlyphId::new(0), &loca).unwrap();
        assert_eq!(metrics_glyph, GlyphId::new(2));
    }
}
