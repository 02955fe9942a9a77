//! The byte reader: a forward-only cursor over an immutable
//! byte slice with big-endian fixed-width reads, bounded sub-slicing, and
//! lazy typed arrays.
//!
//! `Result`-returning throughout. The wire integers decode via
//! `bytes::Buf`'s `try_get_*` family on a `&[u8]` (which implements `Buf`
//! directly), and `Stream`'s own cursor advances by the same `remaining`/
//! `chunk`/`advance` trio rather than hand-rolling a second set of bounds
//! checks next to them.

use crate::error::{ParseFail, Result};
use bytes::Buf;

/// A type with a fixed on-the-wire size that can be decoded from exactly
/// that many bytes. Implemented for the primitive wire integers and for
/// every table record type that has a constant encoded width.
pub trait FromData: Sized {
    /// The number of bytes this type occupies on the wire.
    const SIZE: usize;

    /// Decode `Self` from a window of exactly `SIZE` bytes.
    fn parse(data: &[u8]) -> Option<Self>;
}

macro_rules! impl_from_data_for_int {
    ($ty:ty, $get:ident) => {
        impl FromData for $ty {
            const SIZE: usize = core::mem::size_of::<$ty>();

            #[inline]
            fn parse(data: &[u8]) -> Option<Self> {
                fn read(mut chunk: &[u8]) -> core::result::Result<$ty, ParseFail> {
                    Ok(chunk.$get()?)
                }
                read(data).ok()
            }
        }
    };
}

impl_from_data_for_int!(u8, try_get_u8);
impl_from_data_for_int!(i8, try_get_i8);
impl_from_data_for_int!(u16, try_get_u16);
impl_from_data_for_int!(i16, try_get_i16);
impl_from_data_for_int!(u32, try_get_u32);
impl_from_data_for_int!(i32, try_get_i32);
impl_from_data_for_int!(u64, try_get_u64);
impl_from_data_for_int!(i64, try_get_i64);

impl FromData for crate::ids::Tag {
    const SIZE: usize = 4;

    fn parse(data: &[u8]) -> Option<Self> {
        let bytes: [u8; 4] = data.try_into().ok()?;
        Some(crate::ids::Tag::new(&bytes))
    }
}

impl FromData for crate::ids::GlyphId {
    const SIZE: usize = 2;

    fn parse(data: &[u8]) -> Option<Self> {
        u16::parse(data).map(crate::ids::GlyphId)
    }
}

impl FromData for crate::numeric::F2Dot14 {
    const SIZE: usize = 2;

    fn parse(data: &[u8]) -> Option<Self> {
        i16::parse(data).map(crate::numeric::F2Dot14)
    }
}

impl FromData for crate::numeric::Fixed {
    const SIZE: usize = 4;

    fn parse(data: &[u8]) -> Option<Self> {
        i32::parse(data).map(crate::numeric::Fixed)
    }
}

/// A 16-bit offset relative to the start of an enclosing table. `0` is the
/// conventional null sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Offset16(pub u16);

impl Offset16 {
    pub fn non_null(self) -> Option<u16> {
        (self.0 != 0).then_some(self.0)
    }
}

impl FromData for Offset16 {
    const SIZE: usize = 2;

    fn parse(data: &[u8]) -> Option<Self> {
        u16::parse(data).map(Offset16)
    }
}

/// A 32-bit offset relative to the start of an enclosing table. `0` is the
/// conventional null sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Offset32(pub u32);

impl Offset32 {
    pub fn non_null(self) -> Option<u32> {
        (self.0 != 0).then_some(self.0)
    }
}

impl FromData for Offset32 {
    const SIZE: usize = 4;

    fn parse(data: &[u8]) -> Option<Self> {
        u32::parse(data).map(Offset32)
    }
}

/// A forward-only cursor over an immutable byte slice.
///
/// Every read either fully succeeds and advances the offset by exactly the
/// type's wire size, or fails with [`ParseFail`]; no read ever panics or
/// reads past the slice.
#[derive(Debug, Clone, Copy)]
pub struct Stream<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Stream<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Stream { data, offset: 0 }
    }

    pub fn new_at(data: &'a [u8], offset: usize) -> Result<Self> {
        if offset > data.len() {
            return Err(ParseFail);
        }
        Ok(Stream { data, offset })
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn at_end(&self) -> bool {
        self.offset >= self.data.len()
    }

    /// Bytes remaining from the current offset to the end of the slice.
    pub fn tail(&self) -> Result<&'a [u8]> {
        self.data.get(self.offset..).ok_or(ParseFail)
    }

    /// Read and decode a fixed-size value, advancing the cursor.
    pub fn read<T: FromData>(&mut self) -> Result<T> {
        let window = self.read_bytes(T::SIZE)?;
        T::parse(window).ok_or(ParseFail)
    }

    /// Read `count` elements into a [`LazyArray`] without decoding them.
    pub fn read_array<T: FromData>(&mut self, count: usize) -> Result<LazyArray<'a, T>> {
        let total = count.checked_mul(T::SIZE).ok_or(ParseFail)?;
        Ok(LazyArray::new(self.read_bytes(total)?))
    }

    /// Read `n` raw bytes, advancing the cursor.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        let mut rest = self.tail()?;
        if rest.remaining() < n {
            return Err(ParseFail);
        }
        let slice = &rest[..n];
        rest.advance(n);
        self.offset = self.data.len() - rest.remaining();
        Ok(slice)
    }

    /// Advance the cursor by `n` bytes without reading them.
    pub fn advance(&mut self, n: usize) -> Result<()> {
        let mut rest = self.tail()?;
        if rest.remaining() < n {
            return Err(ParseFail);
        }
        rest.advance(n);
        self.offset = self.data.len() - rest.remaining();
        Ok(())
    }

    /// Skip a value of type `T` without decoding it.
    pub fn skip<T: FromData>(&mut self) -> Result<()> {
        self.advance(T::SIZE)
    }

    /// Jump to an absolute offset from the start of the slice this `Stream`
    /// was constructed over.
    pub fn set_offset(&mut self, offset: usize) -> Result<()> {
        if offset > self.data.len() {
            return Err(ParseFail);
        }
        self.offset = offset;
        Ok(())
    }

    /// A sub-slice `[start, start+length)` of the underlying data,
    /// independent of the cursor position.
    pub fn slice(&self, start: usize, length: usize) -> Result<&'a [u8]> {
        let end = start.checked_add(length).ok_or(ParseFail)?;
        self.data.get(start..end).ok_or(ParseFail)
    }
}

/// A lazily-decoded typed view over a byte slice: a pair of `(slice,
/// element decoder)` exposing random access and binary search without
/// materializing elements.
#[derive(Debug, Clone, Copy)]
pub struct LazyArray<'a, T> {
    data: &'a [u8],
    _marker: core::marker::PhantomData<T>,
}

impl<'a, T: FromData> LazyArray<'a, T> {
    pub fn new(data: &'a [u8]) -> Self {
        LazyArray { data, _marker: core::marker::PhantomData }
    }

    pub fn empty() -> Self {
        LazyArray { data: &[], _marker: core::marker::PhantomData }
    }

    pub fn len(&self) -> usize {
        if T::SIZE == 0 { 0 } else { self.data.len() / T::SIZE }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Out-of-range indices yield `None`, never a panic.
    pub fn get(&self, index: usize) -> Option<T> {
        let start = index.checked_mul(T::SIZE)?;
        let end = start.checked_add(T::SIZE)?;
        T::parse(self.data.get(start..end)?)
    }

    pub fn iter(&self) -> LazyArrayIter<'a, T> {
        LazyArrayIter { array: *self, index: 0 }
    }

    /// Binary search for `key`, returning the matching index.
    ///
    /// `key_fn` extracts the comparison key from a decoded element;
    /// the array must already be sorted by that key.
    pub fn binary_search_by<K: Ord>(&self, key: K, key_fn: impl Fn(T) -> K) -> Option<(usize, T)> {
        let mut lo = 0usize;
        let mut hi = self.len();
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let element = self.get(mid)?;
            match key_fn(element).cmp(&key) {
                core::cmp::Ordering::Less => lo = mid + 1,
                core::cmp::Ordering::Greater => hi = mid,
                core::cmp::Ordering::Equal => return Some((mid, element)),
            }
        }
        None
    }
}

impl<T> Default for LazyArray<'_, T> {
    fn default() -> Self {
        LazyArray { data: &[], _marker: core::marker::PhantomData }
    }
}

pub struct LazyArrayIter<'a, T> {
    array: LazyArray<'a, T>,
    index: usize,
}

impl<T: FromData> Iterator for LazyArrayIter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let value = self.array.get(self.index)?;
        self.index += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.array.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_advance_exactly_and_reject_truncation() {
        let data = [0x00, 0x2A, 0x01, 0x02, 0x03, 0x04];
        let mut s = Stream::new(&data);
        assert_eq!(s.read::<u16>().unwrap(), 42);
        assert_eq!(s.offset(), 2);
        assert_eq!(s.read::<u32>().unwrap(), 0x01020304);
        assert!(s.read::<u8>().is_err());
    }

    #[test]
    fn lazy_array_out_of_range_is_absent_not_panic() {
        let data = [0, 1, 0, 2, 0, 3];
        let arr: LazyArray<u16> = LazyArray::new(&data);
        assert_eq!(arr.len(), 3);
        assert_eq!(arr.get(2), Some(3));
        assert_eq!(arr.get(3), None);
    }

    #[test]
    fn binary_search_matches_linear_scan() {
        let data: Vec<u8> = [2u16, 4, 6, 8, 10].iter().flat_map(|v| v.to_be_bytes()).collect();
        let arr: LazyArray<u16> = LazyArray::new(&data);
        for needle in 0..12u16 {
            let linear = arr.iter().position(|v| v == needle);
            let found = arr.binary_search_by(needle, |v| v).is_some();
            assert_eq!(found, linear.is_some(), "needle={needle}");
        }
    }
}
