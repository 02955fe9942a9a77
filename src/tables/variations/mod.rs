//! Variable-font substrate: `fvar` axes/instances, `avar`
//! axis remapping, `gvar` per-glyph tuple deltas, the shared Item
//! Variation Store (`ivs`) and `DeltaSetIndexMap`, and the `HVAR`/`VVAR`/
//! `MVAR` thin wrappers built on top of them.

pub mod avar;
pub mod delta_set_index_map;
pub mod fvar;
pub mod gvar;
pub mod ivs;
pub mod metrics_variations;
pub mod mvar;

pub use avar::{Avar, SegmentMap};
pub use delta_set_index_map::DeltaSetIndexMap;
pub use fvar::{Fvar, InstanceRecord, VariationAxis};
pub use gvar::{iup_interpolate, Gvar, TupleVariation};
pub use ivs::{triangle_weight, ItemVariationStore};
pub use metrics_variations::MetricsVariations;
pub use mvar::Mvar;

use crate::ids::Tag;
use crate::numeric::{F2Dot14, Fixed};
use arrayvec::ArrayVec;

/// The largest axis count any known variable font format encodes a
/// per-axis coordinate for; also OpenType's own `fvar` axis count ceiling.
pub const MAX_AXES: usize = 64;

/// Normalized variation coordinates: one `F2Dot14` per `fvar` axis, already
/// through both `fvar::normalize` and (if present) `avar`'s remap. Backed by
/// a fixed-capacity array rather than a heap `Vec`, since no real font
/// carries more than [`MAX_AXES`] axes; axes beyond the cap are dropped
/// rather than overflowing.
#[derive(Clone, Default)]
pub struct NormalizedCoords(pub ArrayVec<F2Dot14, MAX_AXES>);

impl NormalizedCoords {
    pub fn as_slice(&self) -> &[F2Dot14] {
        &self.0
    }
}

/// Resolves a user-space `(tag, value)` variation request into normalized
/// coordinates, applying `fvar`'s per-axis piecewise-linear map and then
/// `avar`'s optional remap, in axis order. Axes the caller doesn't name
/// keep their default (0.0) normalized coordinate.
pub fn normalize_user_coords(fvar: &Fvar, avar: Option<&Avar>, user_coords: &[(Tag, Fixed)]) -> NormalizedCoords {
    let mut out = ArrayVec::<F2Dot14, MAX_AXES>::new();
    for axis_index in 0..fvar.axis_count() {
        if out.is_full() {
            break;
        }
        let Some(axis) = fvar.axis(axis_index) else { continue };
        let user_value =
            user_coords.iter().find(|(tag, _)| *tag == axis.tag).map(|(_, v)| *v).unwrap_or(axis.default_value);
        let mut normalized = axis.normalize(user_value);
        if let Some(avar) = avar {
            if let Ok(Some(map)) = avar.segment_map(axis_index) {
                normalized = map.apply(normalized);
            }
        }
        out.push(normalized);
    }
    NormalizedCoords(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::Fixed;

    fn sample_fvar() -> Vec<u8> {
        let mut d = Vec::new();
        d.extend_from_slice(&1u16.to_be_bytes());
        d.extend_from_slice(&0u16.to_be_bytes());
        d.extend_from_slice(&16u16.to_be_bytes());
        d.extend_from_slice(&0u16.to_be_bytes());
        d.extend_from_slice(&1u16.to_be_bytes());
        d.extend_from_slice(&20u16.to_be_bytes());
        d.extend_from_slice(&0u16.to_be_bytes());
        d.extend_from_slice(&0u16.to_be_bytes());

        d.extend_from_slice(b"wght");
        d.extend_from_slice(&Fixed::from_f32(100.0).0.to_be_bytes());
        d.extend_from_slice(&Fixed::from_f32(400.0).0.to_be_bytes());
        d.extend_from_slice(&Fixed::from_f32(900.0).0.to_be_bytes());
        d.extend_from_slice(&0u16.to_be_bytes());
        d.extend_from_slice(&256u16.to_be_bytes());
        d
    }

    #[test]
    fn normalizes_named_axis_and_defaults_unnamed() {
        let data = sample_fvar();
        let fvar = Fvar::parse(&data).unwrap();
        let coords = normalize_user_coords(&fvar, None, &[(Tag::new(b"wght"), Fixed::from_f32(900.0))]);
        assert_eq!(coords.as_slice()[0].to_f32(), 1.0);

        let defaulted = normalize_user_coords(&fvar, None, &[]);
        assert_eq!(defaulted.as_slice()[0].to_f32(), 0.0);
    }
}
