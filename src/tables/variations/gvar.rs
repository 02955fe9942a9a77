//! `gvar`: per-glyph tuple variations over TrueType outline
//! points. Each glyph carries an optional shared peak-tuple list and a
//! sequence of tuple headers; the effective per-point delta is
//! `Σ_t tuple_weight(t) × delta_t`. Points a tuple doesn't reference use
//! deltas derived via IUP from neighboring referenced points.

use crate::error::{ParseFail, Result};
use crate::numeric::F2Dot14;
use crate::stream::{LazyArray, Stream};

use super::ivs::triangle_weight;

/// The number of tuple-variation headers `gvar` decoding keeps on the stack
/// before spilling the rest to the heap. 32 covers every glyph variation
/// data blob seen in practice; fonts with pathologically long tuple lists
/// still decode correctly, just with one heap allocation instead of zero.
pub const GVAR_MAX_STACK_TUPLES: usize = 32;

/// Stack-resident buffer for up to [`GVAR_MAX_STACK_TUPLES`] tuples,
/// spilling to `Vec` past the cap.
pub enum Stack32<T> {
    Inline(arrayvec::ArrayVec<T, GVAR_MAX_STACK_TUPLES>),
    Spilled(Vec<T>),
}

impl<T> Stack32<T> {
    pub fn new() -> Self {
        Stack32::Inline(arrayvec::ArrayVec::new())
    }

    pub fn push(&mut self, value: T) {
        match self {
            Stack32::Inline(v) => {
                if v.try_push(value).is_err() {
                    let mut spilled: Vec<T> = v.drain(..).collect();
                    spilled.push(value);
                    *self = Stack32::Spilled(spilled);
                } else {
                    return;
                }
            }
            Stack32::Spilled(v) => v.push(value),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        match self {
            Stack32::Inline(v) => v.iter(),
            Stack32::Spilled(v) => v.iter(),
        }
    }
}

impl<T> Default for Stack32<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Owned iteration, matching `ArrayVec`'s and `Vec`'s own `into_iter`.
pub enum Stack32IntoIter<T> {
    Inline(arrayvec::IntoIter<T, GVAR_MAX_STACK_TUPLES>),
    Spilled(std::vec::IntoIter<T>),
}

impl<T> Iterator for Stack32IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        match self {
            Stack32IntoIter::Inline(it) => it.next(),
            Stack32IntoIter::Spilled(it) => it.next(),
        }
    }
}

impl<T> IntoIterator for Stack32<T> {
    type Item = T;
    type IntoIter = Stack32IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        match self {
            Stack32::Inline(v) => Stack32IntoIter::Inline(v.into_iter()),
            Stack32::Spilled(v) => Stack32IntoIter::Spilled(v.into_iter()),
        }
    }
}

const TUPLE_INDEX_EMBEDDED_PEAK: u16 = 0x8000;
const TUPLE_INDEX_INTERMEDIATE_REGION: u16 = 0x4000;
const TUPLE_INDEX_PRIVATE_POINT_NUMBERS: u16 = 0x2000;
const TUPLE_INDEX_MASK: u16 = 0x0FFF;

const POINTS_ARE_WORDS: u8 = 0x80;
const POINT_RUN_COUNT_MASK: u8 = 0x7F;

const DELTAS_ARE_ZERO: u8 = 0x80;
const DELTAS_ARE_WORDS: u8 = 0x40;
const DELTA_RUN_COUNT_MASK: u8 = 0x3F;

/// `None` means "all points in the glyph, in order" (the packed-points
/// zero-count special case).
fn parse_packed_points(s: &mut Stream) -> Result<Option<Vec<u16>>> {
    let first: u8 = s.read()?;
    let count = if first == 0 {
        return Ok(None);
    } else if first & POINTS_ARE_WORDS != 0 {
        let low: u8 = s.read()?;
        (((first & POINT_RUN_COUNT_MASK) as u16) << 8) | low as u16
    } else {
        first as u16
    };

    let mut points = Vec::with_capacity(count as usize);
    let mut current: i32 = 0;
    while points.len() < count as usize {
        let control: u8 = s.read()?;
        let run_len = (control & POINT_RUN_COUNT_MASK) as usize + 1;
        let words = control & POINTS_ARE_WORDS != 0;
        for _ in 0..run_len {
            if points.len() >= count as usize {
                break;
            }
            let delta: i32 = if words { s.read::<u16>()? as i32 } else { s.read::<u8>()? as i32 };
            current += delta;
            points.push(current as u16);
        }
    }
    Ok(Some(points))
}

fn parse_packed_deltas(s: &mut Stream, count: usize) -> Result<Vec<i32>> {
    let mut deltas = Vec::with_capacity(count);
    while deltas.len() < count {
        let control: u8 = s.read()?;
        let run_len = (control & DELTA_RUN_COUNT_MASK) as usize + 1;
        if control & DELTAS_ARE_ZERO != 0 {
            for _ in 0..run_len {
                if deltas.len() >= count {
                    break;
                }
                deltas.push(0);
            }
        } else if control & DELTAS_ARE_WORDS != 0 {
            for _ in 0..run_len {
                if deltas.len() >= count {
                    break;
                }
                deltas.push(s.read::<i16>()? as i32);
            }
        } else {
            for _ in 0..run_len {
                if deltas.len() >= count {
                    break;
                }
                deltas.push(s.read::<i8>()? as i32);
            }
        }
    }
    Ok(deltas)
}

/// One decoded tuple variation: its region (peak + optional intermediate
/// start/end per axis), the points it references (`None` = all points),
/// and its per-point `(dx, dy)` deltas, already aligned to `point_numbers`.
pub struct TupleVariation {
    pub peak: Vec<F2Dot14>,
    pub intermediate: Option<(Vec<F2Dot14>, Vec<F2Dot14>)>,
    pub point_numbers: Option<Vec<u16>>,
    pub deltas_x: Vec<i32>,
    pub deltas_y: Vec<i32>,
}

impl TupleVariation {
    pub fn weight(&self, coords: &[F2Dot14]) -> f32 {
        let mut weight = 1.0f32;
        for (axis, &peak) in self.peak.iter().enumerate() {
            let coord = coords.get(axis).copied().unwrap_or(F2Dot14::ZERO).to_f32();
            let peak = peak.to_f32();
            let (start, end) = match &self.intermediate {
                Some((starts, ends)) => (
                    starts.get(axis).copied().unwrap_or(F2Dot14::ZERO).to_f32(),
                    ends.get(axis).copied().unwrap_or(F2Dot14::ZERO).to_f32(),
                ),
                // Implicit region for a peak-only tuple header: `[0, peak]`
                // on the side of zero that `peak` falls on.
                None if peak >= 0.0 => (0.0, peak),
                None => (peak, 0.0),
            };
            weight *= triangle_weight(start, peak, end, coord);
            if weight == 0.0 {
                return 0.0;
            }
        }
        weight
    }
}

fn parse_tuple_coords(s: &mut Stream, axis_count: u16) -> Result<Vec<F2Dot14>> {
    let array: LazyArray<F2Dot14> = s.read_array(axis_count as usize)?;
    Ok(array.iter().collect())
}

/// Parses one glyph's `GlyphVariationData`: the tuple-variation headers
/// plus the serialized shared/private point numbers and packed deltas.
pub fn parse_glyph_variations(
    data: &[u8],
    axis_count: u16,
    shared_tuples: &[Vec<F2Dot14>],
    num_points_with_phantom: usize,
) -> Result<Vec<TupleVariation>> {
    let mut s = Stream::new(data);
    let raw_count: u16 = s.read()?;
    let shared_point_numbers_flag = raw_count & 0x8000 != 0;
    let tuple_count = raw_count & 0x0FFF;
    let data_offset: u16 = s.read()?;

    struct Header {
        variation_data_size: u16,
        tuple_index: u16,
        peak: Option<Vec<F2Dot14>>,
        intermediate: Option<(Vec<F2Dot14>, Vec<F2Dot14>)>,
    }

    let mut headers: Stack32<Header> = Stack32::new();
    for _ in 0..tuple_count {
        let variation_data_size: u16 = s.read()?;
        let tuple_index: u16 = s.read()?;
        let peak = if tuple_index & TUPLE_INDEX_EMBEDDED_PEAK != 0 {
            Some(parse_tuple_coords(&mut s, axis_count)?)
        } else {
            None
        };
        let intermediate = if tuple_index & TUPLE_INDEX_INTERMEDIATE_REGION != 0 {
            let start = parse_tuple_coords(&mut s, axis_count)?;
            let end = parse_tuple_coords(&mut s, axis_count)?;
            Some((start, end))
        } else {
            None
        };
        headers.push(Header { variation_data_size, tuple_index, peak, intermediate });
    }

    let mut body = Stream::new(data.get(data_offset as usize..).ok_or(ParseFail)?);
    let shared_points =
        if shared_point_numbers_flag { parse_packed_points(&mut body)? } else { None };

    let mut out = Vec::with_capacity(tuple_count as usize);
    for header in headers {
        let peak = match header.peak {
            Some(p) => p,
            None => {
                let tuple_idx = (header.tuple_index & TUPLE_INDEX_MASK) as usize;
                shared_tuples.get(tuple_idx).cloned().ok_or(ParseFail)?
            }
        };

        let point_numbers = if header.tuple_index & TUPLE_INDEX_PRIVATE_POINT_NUMBERS != 0 {
            parse_packed_points(&mut body)?
        } else {
            shared_points.clone()
        };

        let point_count = point_numbers.as_ref().map(|p| p.len()).unwrap_or(num_points_with_phantom);
        let deltas_x = parse_packed_deltas(&mut body, point_count)?;
        let deltas_y = parse_packed_deltas(&mut body, point_count)?;

        let _ = header.variation_data_size;
        out.push(TupleVariation { peak, intermediate: header.intermediate, point_numbers, deltas_x, deltas_y });
    }

    Ok(out)
}

#[derive(Clone, Copy)]
pub struct Gvar<'a> {
    data: &'a [u8],
    axis_count: u16,
    shared_tuples: &'a [u8],
    shared_tuple_count: u16,
    glyph_variation_data_array_offset: u32,
    long_offsets: bool,
    offsets_data: &'a [u8],
}

impl<'a> Gvar<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        s.skip::<u16>()?; // majorVersion
        s.skip::<u16>()?; // minorVersion
        let axis_count: u16 = s.read()?;
        let shared_tuple_count: u16 = s.read()?;
        let shared_tuples_offset: u32 = s.read()?;
        let glyph_count: u16 = s.read()?;
        let flags: u16 = s.read()?;
        let glyph_variation_data_array_offset: u32 = s.read()?;
        let long_offsets = flags & 1 != 0;
        let offsets_data = s.tail()?;
        let needed = (glyph_count as usize + 1) * if long_offsets { 4 } else { 2 };
        if offsets_data.len() < needed {
            return Err(ParseFail);
        }
        let shared_tuples = data.get(shared_tuples_offset as usize..).ok_or(ParseFail)?;

        Ok(Gvar {
            data,
            axis_count,
            shared_tuples,
            shared_tuple_count,
            glyph_variation_data_array_offset,
            long_offsets,
            offsets_data,
        })
    }

    fn shared_tuple_list(&self) -> Vec<Vec<F2Dot14>> {
        let array: LazyArray<F2Dot14> = LazyArray::new(self.shared_tuples);
        (0..self.shared_tuple_count as usize)
            .map(|i| {
                (0..self.axis_count as usize)
                    .filter_map(|a| array.get(i * self.axis_count as usize + a))
                    .collect()
            })
            .collect()
    }

    fn glyph_offset(&self, index: u16) -> Option<(u32, u32)> {
        if self.long_offsets {
            let arr: LazyArray<u32> = LazyArray::new(self.offsets_data);
            Some((arr.get(index as usize)?, arr.get(index as usize + 1)?))
        } else {
            let arr: LazyArray<u16> = LazyArray::new(self.offsets_data);
            Some((arr.get(index as usize)? as u32 * 2, arr.get(index as usize + 1)? as u32 * 2))
        }
    }

    pub fn glyph_variations(&self, glyph_index: u16, num_points_with_phantom: usize) -> Result<Vec<TupleVariation>> {
        let (start, end) = self.glyph_offset(glyph_index).ok_or(ParseFail)?;
        if end <= start {
            return Ok(Vec::new());
        }
        let bytes = self
            .data
            .get(self.glyph_variation_data_array_offset as usize + start as usize
                ..self.glyph_variation_data_array_offset as usize + end as usize)
            .ok_or(ParseFail)?;
        let shared = self.shared_tuple_list();
        parse_glyph_variations(bytes, self.axis_count, &shared, num_points_with_phantom)
    }
}

/// IUP ("interpolate untouched points"): fills deltas for points a tuple
/// doesn't reference, per contour, from its neighboring referenced points.
/// `touched` marks which of `deltas`'s entries were already set by a
/// tuple; untouched runs between two touched points are interpolated
/// (or, outside any touched point, copied from the nearest touched one).
pub fn iup_interpolate(
    original: &[(f32, f32)],
    deltas: &mut [(f32, f32)],
    touched: &[bool],
    contour_end_points: &[u16],
) {
    let mut start = 0usize;
    for &end in contour_end_points {
        let end = end as usize;
        if end >= original.len() || end < start {
            break;
        }
        iup_interpolate_contour(original, deltas, touched, start, end);
        start = end + 1;
    }
}

fn iup_interpolate_contour(
    original: &[(f32, f32)],
    deltas: &mut [(f32, f32)],
    touched: &[bool],
    start: usize,
    end: usize,
) {
    let len = end - start + 1;
    let touched_indices: Vec<usize> = (start..=end).filter(|&i| touched[i]).collect();
    if touched_indices.is_empty() {
        return;
    }
    if touched_indices.len() == len {
        return;
    }

    for window_start in 0..touched_indices.len() {
        let a = touched_indices[window_start];
        let b = touched_indices[(window_start + 1) % touched_indices.len()];
        let mut i = (a + 1 - start) % len + start;
        while i != b {
            interpolate_point(original, deltas, a, b, i, len, start);
            i = (i + 1 - start) % len + start;
        }
    }
}

fn interpolate_point(
    original: &[(f32, f32)],
    deltas: &mut [(f32, f32)],
    a: usize,
    b: usize,
    i: usize,
    len: usize,
    start: usize,
) {
    for axis in 0..2 {
        let get = |p: (f32, f32)| if axis == 0 { p.0 } else { p.1 };
        let oa = get(original[a]);
        let ob = get(original[b]);
        let oi = get(original[i]);
        let da = get(deltas[a]);
        let db = get(deltas[b]);

        let value = if oa == ob {
            da
        } else {
            let (lo, hi, dlo, dhi) = if oa <= ob { (oa, ob, da, db) } else { (ob, oa, db, da) };
            if oi <= lo {
                dlo
            } else if oi >= hi {
                dhi
            } else {
                dlo + (oi - lo) / (hi - lo) * (dhi - dlo)
            }
        };
        if axis == 0 {
            deltas[i].0 = value;
        } else {
            deltas[i].1 = value;
        }
    }
    let _ = len;
    let _ = start;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_points_decodes_run_length_deltas() {
        let data = [2u8, 0x01, 0u8, 5u8]; // count=2, control(1 run of 2, bytes), deltas 0,5
        let mut s = Stream::new(&data);
        let points = parse_packed_points(&mut s).unwrap().unwrap();
        assert_eq!(points, vec![0, 5]);
    }

    #[test]
    fn packed_deltas_decodes_zero_run_and_byte_run() {
        let data = [0x81u8, 0x01u8, 10u8]; // zero run of 2, then byte run of 1 value=10
        let mut s = Stream::new(&data);
        let deltas = parse_packed_deltas(&mut s, 3).unwrap();
        assert_eq!(deltas, vec![0, 0, 10]);
    }

    #[test]
    fn stack32_stays_inline_under_the_cap_and_spills_past_it() {
        let mut stack: Stack32<u32> = Stack32::new();
        for i in 0..GVAR_MAX_STACK_TUPLES as u32 {
            stack.push(i);
        }
        assert!(matches!(stack, Stack32::Inline(_)));
        stack.push(GVAR_MAX_STACK_TUPLES as u32);
        assert!(matches!(stack, Stack32::Spilled(_)));
        let collected: Vec<u32> = stack.into_iter().collect();
        assert_eq!(collected.len(), GVAR_MAX_STACK_TUPLES + 1);
        assert_eq!(collected[0], 0);
        assert_eq!(collected[GVAR_MAX_STACK_TUPLES], GVAR_MAX_STACK_TUPLES as u32);
    }

    #[test]
    fn iup_interpolates_midpoint_between_touched_neighbors() {
        let original = vec![(0.0, 0.0), (5.0, 0.0), (10.0, 0.0)];
        let mut deltas = vec![(0.0, 0.0), (0.0, 0.0), (0.0, 0.0)];
        deltas[0] = (2.0, 0.0);
        deltas[2] = (4.0, 0.0);
        let touched = [true, false, true];
        iup_interpolate(&original, &mut deltas, &touched, &[2]);
        assert_eq!(deltas[1].0, 3.0);
    }
}
