//! Apple Advanced Typography plumbing: the generic AAT
//! `Lookup` formats and the state-table engine that `kern` format 1,
//! `kerx`, and `morx` are all built on top of.

pub mod lookup;
pub mod state_table;

pub use lookup::AatLookup;
pub use state_table::{
    decode_flags, ExtendedEntry, ExtendedStateTable, LegacyEntry, LegacyStateTable,
    CLASS_DELETED_GLYPH, CLASS_END_OF_TEXT, CLASS_OUT_OF_BOUNDS,
};
