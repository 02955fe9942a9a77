//! Error taxonomy.
//!
//! Below the [`Face`](crate::face::Face) facade every sub-parser fails with
//! a single [`ParseFail`] ("input does not conform"); the facade collapses
//! that into a small set of public [`FaceParsingError`] variants named after
//! what actually went wrong (bad magic, bad index, missing mandatory table).

use core::fmt;

/// Uniform internal failure signal raised by every sub-parser.
///
/// Optional tables downgrade a `ParseFail` to "absent" at the facade
/// boundary; mandatory tables (`head`/`hhea`/`maxp`) turn it into the
/// matching [`FaceParsingError`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseFail;

impl fmt::Display for ParseFail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("malformed or truncated table data")
    }
}

impl From<bytes::TryGetError> for ParseFail {
    fn from(_value: bytes::TryGetError) -> Self {
        ParseFail
    }
}

pub(crate) type Result<T> = core::result::Result<T, ParseFail>;

pub(crate) fn usize_will_overflow(a: usize, b: usize) -> bool {
    a.checked_add(b).is_none()
}

/// Errors surfaced by [`Face::parse`](crate::face::Face::parse).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceParsingError {
    /// A bounds or structural check failed while parsing the directory or
    /// one of the mandatory headers.
    MalformedFont,
    /// The first four bytes are none of the recognized magic numbers.
    UnknownMagic,
    /// `face_index` was out of range for the container (non-zero for a
    /// single face, or `>= num_fonts` for a collection).
    FaceIndexOutOfBounds,
    /// The `head` table is absent or failed to parse.
    NoHeadTable,
    /// The `hhea` table is absent or failed to parse.
    NoHheaTable,
    /// The `maxp` table is absent or failed to parse.
    NoMaxpTable,
}

impl fmt::Display for FaceParsingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::MalformedFont => "malformed font",
            Self::UnknownMagic => "unrecognized font magic",
            Self::FaceIndexOutOfBounds => "face index out of bounds",
            Self::NoHeadTable => "missing 'head' table",
            Self::NoHheaTable => "missing 'hhea' table",
            Self::NoMaxpTable => "missing 'maxp' table",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for FaceParsingError {}

impl From<ParseFail> for FaceParsingError {
    fn from(_value: ParseFail) -> Self {
        FaceParsingError::MalformedFont
    }
}

/// Errors a CFF/CFF2 Type 2 charstring interpreter can bubble up to
/// `outline_glyph`. Outlining is the one per-glyph query that fails loudly
/// rather than quietly returning an absent result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CffError {
    InvalidOperator,
    InvalidArgumentsStackLength,
    ArgumentsStackLimitReached,
    NestingLimitReached,
    MissingMoveTo,
    DataAfterEndChar,
    BboxOverflow,
    ZeroBBox,
}

impl fmt::Display for CffError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::InvalidOperator => "invalid charstring operator",
            Self::InvalidArgumentsStackLength => "invalid arguments stack length",
            Self::ArgumentsStackLimitReached => "arguments stack limit reached",
            Self::NestingLimitReached => "subroutine nesting limit reached",
            Self::MissingMoveTo => "path operator before the first moveto",
            Self::DataAfterEndChar => "trailing data after endchar",
            Self::BboxOverflow => "bounding box coordinate overflow",
            Self::ZeroBBox => "empty outline at endchar",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for CffError {}

impl From<ParseFail> for CffError {
    fn from(_value: ParseFail) -> Self {
        // A truncated charstream has no moveto either; this is the closest
        // named failure mode short of adding a tenth variant for it.
        CffError::MissingMoveTo
    }
}

/// Returned by [`Face::set_variation`](crate::face::Face::set_variation).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariationSetError {
    /// `fvar` has no axis with this tag.
    UnknownAxis,
    /// The user value could not be represented (e.g. the axis has an
    /// inverted or degenerate `min..max` range).
    InvalidValue,
}

impl fmt::Display for VariationSetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::UnknownAxis => "unknown variation axis tag",
            Self::InvalidValue => "invalid variation axis value",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for VariationSetError {}

#[cfg(not(feature = "debug"))]
mod regular {
    macro_rules! bail {
        () => {
            return Err($crate::error::ParseFail)
        };
    }
    pub(crate) use bail;

    macro_rules! bail_if {
        ($cond:expr) => {
            if $cond {
                return Err($crate::error::ParseFail);
            }
        };
    }
    pub(crate) use bail_if;
}
#[cfg(not(feature = "debug"))]
pub(crate) use regular::*;

#[cfg(feature = "debug")]
mod debug {
    macro_rules! bail {
        () => {
            panic!("bail!")
        };
    }
    pub(crate) use bail;

    macro_rules! bail_if {
        ($cond:expr) => {
            if $cond {
                panic!("{}", stringify!($cond))
            }
        };
    }
    pub(crate) use bail_if;
}
#[cfg(feature = "debug")]
pub(crate) use debug::*;
