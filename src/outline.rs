//! The outline emission sink: a plain injected-sink trait, not
//! a geometry type the core owns. Callers provide an implementation and the
//! glyph walkers call back into it path-segment by path-segment.

/// Receives the path segments of a decoded glyph outline, contour by
/// contour, in font design units.
pub trait OutlineBuilder {
    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32);
    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32);
    fn close(&mut self);
}
