//! A read-only, zero-copy parser for OpenType/TrueType/AAT font containers.
//!
//! [`Face::parse`] is the entry point: it validates a container's table
//! directory up front, then parses every table this crate understands
//! best-effort (a malformed optional table is simply absent, not a hard
//! error). Every accessor is a pure function of the parsed tables and the
//! face's current variation coordinates; nothing here allocates on the
//! per-glyph hot path except the one explicitly flagged exception in
//! `gvar`'s delta accumulator and the owned `String`s returned from `name`.

pub mod error;
pub mod face;
pub mod ids;
mod macros;
pub mod numeric;
pub mod outline;
pub mod paint;
pub mod raw_face;
pub mod stream;
pub mod tables;

pub use error::{CffError, FaceParsingError, VariationSetError};
pub use face::{Face, Permissions, Style, VariationAxisInfo, Weight, Width};
pub use ids::{GlyphId, Rect, Tag};
pub use outline::OutlineBuilder;
pub use paint::{Paint, Painter};
