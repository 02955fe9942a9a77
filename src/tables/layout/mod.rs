//! OpenType layout common substrate: Coverage, ClassDef,
//! LookupList/extension lookups, context/chained-context, and the
//! Script/Feature/Language `RecordList` pattern shared by GSUB and GPOS.
//!
//! This layer is intentionally type-agnostic: it resolves the shared
//! offset-table plumbing GSUB and GPOS both sit on top of, but does not
//! itself interpret `lookup_type`.

pub mod classdef;
pub mod context;
pub mod coverage;
pub mod lookup;
pub mod record_list;

pub use classdef::ClassDef;
pub use context::{ChainedSequenceContext, SequenceContext, SequenceLookupRecord};
pub use coverage::Coverage;
pub use lookup::{ExtensionLookup, Lookup, LookupList};
pub use record_list::RecordList;

use crate::error::Result;
use crate::ids::Tag;
use crate::stream::Stream;

/// The shared header every GSUB/GPOS table begins with: a version, then
/// offsets to the script, feature, and lookup list.
#[derive(Clone, Copy)]
pub struct LayoutTable<'a> {
    pub scripts: RecordList<'a>,
    pub features: RecordList<'a>,
    pub lookups: LookupList<'a>,
}

impl<'a> LayoutTable<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        let major: u16 = s.read()?;
        let minor: u16 = s.read()?;
        let script_list_offset: u16 = s.read()?;
        let feature_list_offset: u16 = s.read()?;
        let lookup_list_offset: u16 = s.read()?;
        if minor >= 1 {
            s.skip::<u32>()?; // featureVariationsOffset
        }
        let _ = major;

        let scripts = RecordList::parse(data.get(script_list_offset as usize..).ok_or(crate::error::ParseFail)?)?;
        let features =
            RecordList::parse(data.get(feature_list_offset as usize..).ok_or(crate::error::ParseFail)?)?;
        let lookups = LookupList::parse(data.get(lookup_list_offset as usize..).ok_or(crate::error::ParseFail)?)?;

        Ok(LayoutTable { scripts, features, lookups })
    }

    pub fn script(&self, tag: Tag) -> Option<&'a [u8]> {
        self.scripts.find(tag)
    }

    pub fn feature(&self, tag: Tag) -> Option<&'a [u8]> {
        self.features.find(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_1_0_header_with_empty_lists_parses() {
        let mut d = Vec::new();
        d.extend_from_slice(&1u16.to_be_bytes()); // majorVersion
        d.extend_from_slice(&0u16.to_be_bytes()); // minorVersion
        d.extend_from_slice(&10u16.to_be_bytes()); // scriptListOffset
        d.extend_from_slice(&12u16.to_be_bytes()); // featureListOffset
        d.extend_from_slice(&14u16.to_be_bytes()); // lookupListOffset
        d.extend_from_slice(&0u16.to_be_bytes()); // ScriptList.scriptCount
        d.extend_from_slice(&0u16.to_be_bytes()); // FeatureList.featureCount
        d.extend_from_slice(&0u16.to_be_bytes()); // LookupList.lookupCount

        let table = LayoutTable::parse(&d).unwrap();
        assert!(table.scripts.is_empty());
        assert!(table.features.is_empty());
        assert!(table.lookups.is_empty());
        assert_eq!(table.script(Tag::new(b"latn")), None);
    }

    #[test]
    fn version_1_1_header_skips_the_feature_variations_offset() {
        let mut d = Vec::new();
        d.extend_from_slice(&1u16.to_be_bytes()); // majorVersion
        d.extend_from_slice(&1u16.to_be_bytes()); // minorVersion
        d.extend_from_slice(&14u16.to_be_bytes()); // scriptListOffset
        d.extend_from_slice(&16u16.to_be_bytes()); // featureListOffset
        d.extend_from_slice(&18u16.to_be_bytes()); // lookupListOffset
        d.extend_from_slice(&0u32.to_be_bytes()); // featureVariationsOffset
        d.extend_from_slice(&0u16.to_be_bytes()); // ScriptList.scriptCount
        d.extend_from_slice(&0u16.to_be_bytes()); // FeatureList.featureCount
        d.extend_from_slice(&0u16.to_be_bytes()); // LookupList.lookupCount

        let table = LayoutTable::parse(&d).unwrap();
        assert!(table.lookups.is_empty());
    }
}
