//! The color-painting sink: traversal of a `COLR` v0/v1
//! glyph emits a linear stream of calls against an injected [`Painter`],
//! mirroring how [`outline_glyph`](crate::outline::OutlineBuilder) emits a
//! linear stream of path commands.

use crate::ids::GlyphId;
use crate::numeric::{F2Dot14, Fixed};

/// A 2x3 affine transform, row-major: `x' = a*x + c*y + e`, `y' = b*x + d*y + f`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub a: Fixed,
    pub b: Fixed,
    pub c: Fixed,
    pub d: Fixed,
    pub e: Fixed,
    pub f: Fixed,
}

impl Affine {
    pub const IDENTITY: Affine = Affine {
        a: Fixed(1 << 16),
        b: Fixed(0),
        c: Fixed(0),
        d: Fixed(1 << 16),
        e: Fixed(0),
        f: Fixed(0),
    };
}

/// A point in design units, used for gradient centers and transform pivots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: i16,
    pub y: i16,
}

/// A stop in a gradient's color line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub stop_offset: F2Dot14,
    pub palette_index: u16,
    pub alpha: F2Dot14,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeMode {
    Clear,
    Src,
    Dest,
    SrcOver,
    DestOver,
    SrcIn,
    DestIn,
    SrcOut,
    DestOut,
    SrcAtop,
    DestAtop,
    Xor,
    Plus,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Multiply,
    Hue,
    Saturation,
    Color,
    Luminosity,
}

/// One node of a `COLR` v1 paint graph. `Glyph`/`Transform`/`Composite` and
/// friends recurse through a boxed child so the graph can nest arbitrarily
/// deep (bounded by the cycle-detecting traversal, not by this type).
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid { palette_index: u16, alpha: F2Dot14 },
    LinearGradient { p0: Point, p1: Point, p2: Point, stops: Vec<ColorStop> },
    RadialGradient { c0: Point, r0: u16, c1: Point, r1: u16, stops: Vec<ColorStop> },
    SweepGradient { center: Point, start_angle: F2Dot14, end_angle: F2Dot14, stops: Vec<ColorStop> },
    Glyph { glyph_id: GlyphId },
    ColrGlyph { base_glyph_id: GlyphId },
    Transform { affine: Affine },
    Translate { dx: Fixed, dy: Fixed },
    Scale { sx: Fixed, sy: Fixed, around: Option<Point> },
    Rotate { angle: F2Dot14, around: Option<Point> },
    Skew { x_skew_angle: F2Dot14, y_skew_angle: F2Dot14, around: Option<Point> },
    Composite { mode: CompositeMode },
}

/// The injected sink a `COLR` traversal drives. Every method
/// returning `()` is a "do this, keep going" call; there is no way for the
/// sink to abort a traversal short of the built-in cycle guard.
pub trait Painter {
    fn outline_glyph(&mut self, glyph_id: GlyphId);
    fn push_clip(&mut self);
    fn push_clip_box(&mut self, x_min: i16, y_min: i16, x_max: i16, y_max: i16);
    fn pop_clip(&mut self);
    fn paint(&mut self, paint: &Paint);
    fn push_layer(&mut self, mode: CompositeMode);
    fn pop_layer(&mut self);
    fn push_transform(&mut self, affine: Affine);
    fn pop_transform(&mut self);
}
