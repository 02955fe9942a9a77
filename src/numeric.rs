//! Fixed-point decoders and saturating numeric casts.
//!
//! These are used only at the outline-emission boundary and when resolving
//! variation coordinates; everywhere else the core works in the raw integer
//! wire types.

/// A 16-bit signed fixed-point number with 14 fractional bits, in
/// `[-2.0, 1.99994]`. Used for normalized variation coordinates and COLR
/// gradient angles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct F2Dot14(pub i16);

impl F2Dot14 {
    pub const ONE: F2Dot14 = F2Dot14(1 << 14);
    pub const ZERO: F2Dot14 = F2Dot14(0);
    pub const MINUS_ONE: F2Dot14 = F2Dot14(-(1 << 14));

    pub const fn from_bits(bits: i16) -> Self {
        F2Dot14(bits)
    }

    pub fn to_f32(self) -> f32 {
        f32::from(self.0) / 16384.0
    }

    pub fn from_f32(value: f32) -> Self {
        F2Dot14((value * 16384.0).round().clamp(-32768.0, 32767.0) as i16)
    }
}

/// A 32-bit signed fixed-point number with 16 fractional bits, used for
/// affine transform components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Fixed(pub i32);

impl Fixed {
    pub const fn from_bits(bits: i32) -> Self {
        Fixed(bits)
    }

    pub fn to_f32(self) -> f32 {
        self.0 as f32 / 65536.0
    }

    pub fn from_f32(value: f32) -> Self {
        Fixed((value * 65536.0).round().clamp(i32::MIN as f64 as f32, i32::MAX as f64 as f32) as i32)
    }
}

/// An `FWord`/`UFWord`: a 16-bit design-unit distance, signed or unsigned.
pub type FWord = i16;
pub type UfWord = u16;

/// Saturating `f32 -> i32` cast used at the outline-emission boundary.
///
/// The upper bound is `2147483520` rather than `i32::MAX` (`2147483647`) so
/// that the float-to-int rounding never pushes the result past `i32::MAX`
/// after truncation.
pub fn f32_to_i32_saturating(value: f32) -> Option<i32> {
    const MAX: f32 = 2147483520.0;
    const MIN: f32 = i32::MIN as f32;
    if value.is_nan() {
        return None;
    }
    if value >= MAX {
        return Some(MAX as i32);
    }
    if value <= MIN {
        return Some(i32::MIN);
    }
    Some(value as i32)
}

/// Saturating `f32 -> i16` cast, clamped to the `i16` range.
pub fn f32_to_i16_saturating(value: f32) -> Option<i16> {
    if value.is_nan() {
        return None;
    }
    Some(value.clamp(i16::MIN as f32, i16::MAX as f32) as i16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f2dot14_round_trips_common_values() {
        assert_eq!(F2Dot14::ONE.to_f32(), 1.0);
        assert_eq!(F2Dot14::ZERO.to_f32(), 0.0);
        assert_eq!(F2Dot14::MINUS_ONE.to_f32(), -1.0);
        assert_eq!(F2Dot14::from_f32(0.5).0, 1 << 13);
    }

    #[test]
    fn f32_to_i32_saturates_at_clamped_upper_bound() {
        assert_eq!(f32_to_i32_saturating(1e20), Some(2147483520));
        assert_eq!(f32_to_i32_saturating(-1e20), Some(i32::MIN));
        assert_eq!(f32_to_i32_saturating(f32::NAN), None);
    }
}
