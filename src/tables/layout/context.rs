//! Context and chained-context lookup subtables, formats 1/2/3. Parsed lazily: only offsets and record arrays are validated up
//! front; rule bodies are resolved on demand.

use crate::error::{ParseFail, Result};
use crate::stream::{FromData, LazyArray, Offset16, Stream};

use super::classdef::ClassDef;
use super::coverage::Coverage;

#[derive(Debug, Clone, Copy)]
pub struct SequenceLookupRecord {
    pub sequence_index: u16,
    pub lookup_list_index: u16,
}

impl FromData for SequenceLookupRecord {
    const SIZE: usize = 4;

    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(SequenceLookupRecord { sequence_index: s.read().ok()?, lookup_list_index: s.read().ok()? })
    }
}

/// A single rule: for format 1/2, the residual input glyphs/classes after
/// the coverage-matched first position, plus the lookup records to apply.
#[derive(Clone, Copy)]
pub struct Rule<'a> {
    input: LazyArray<'a, u16>,
    pub lookup_records: LazyArray<'a, SequenceLookupRecord>,
}

impl<'a> Rule<'a> {
    fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        let glyph_count: u16 = s.read()?;
        let lookup_count: u16 = s.read()?;
        let input_len = (glyph_count as usize).saturating_sub(1);
        let input = s.read_array(input_len)?;
        let lookup_records = s.read_array(lookup_count as usize)?;
        Ok(Rule { input, lookup_records })
    }

    pub fn input(&self) -> impl Iterator<Item = u16> + 'a {
        self.input.iter()
    }
}

#[derive(Clone, Copy)]
pub struct RuleSet<'a> {
    data: &'a [u8],
    offsets: LazyArray<'a, Offset16>,
}

impl<'a> RuleSet<'a> {
    fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        let count: u16 = s.read()?;
        let offsets = s.read_array(count as usize)?;
        Ok(RuleSet { data, offsets })
    }

    pub fn get(&self, index: u16) -> Option<Rule<'a>> {
        let offset = self.offsets.get(index as usize)?.non_null()?;
        Rule::parse(self.data.get(offset as usize..)?).ok()
    }

    pub fn len(&self) -> u16 {
        self.offsets.len() as u16
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

/// Sequence context format 1: coverage selects the first input position;
/// a per-coverage-index `RuleSet` carries the residual glyph sequences.
#[derive(Clone, Copy)]
pub struct ContextFormat1<'a> {
    pub coverage: Coverage<'a>,
    data: &'a [u8],
    rule_set_offsets: LazyArray<'a, Offset16>,
}

impl<'a> ContextFormat1<'a> {
    fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        s.skip::<u16>()?; // format
        let coverage_offset: u16 = s.read()?;
        let count: u16 = s.read()?;
        let rule_set_offsets = s.read_array(count as usize)?;
        let coverage = Coverage::parse(data.get(coverage_offset as usize..).ok_or(ParseFail)?)?;
        Ok(ContextFormat1 { coverage, data, rule_set_offsets })
    }

    pub fn rule_set(&self, coverage_index: u16) -> Option<RuleSet<'a>> {
        let offset = self.rule_set_offsets.get(coverage_index as usize)?.non_null()?;
        RuleSet::parse(self.data.get(offset as usize..)?).ok()
    }
}

/// Sequence context format 2: coverage selects the first input position;
/// a single `ClassDef` classifies all positions; rule sets are indexed by
/// class rather than raw glyph.
#[derive(Clone, Copy)]
pub struct ContextFormat2<'a> {
    pub coverage: Coverage<'a>,
    pub class_def: ClassDef<'a>,
    data: &'a [u8],
    class_set_offsets: LazyArray<'a, Offset16>,
}

impl<'a> ContextFormat2<'a> {
    fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        s.skip::<u16>()?; // format
        let coverage_offset: u16 = s.read()?;
        let class_def_offset: u16 = s.read()?;
        let count: u16 = s.read()?;
        let class_set_offsets = s.read_array(count as usize)?;
        let coverage = Coverage::parse(data.get(coverage_offset as usize..).ok_or(ParseFail)?)?;
        let class_def = ClassDef::parse(data.get(class_def_offset as usize..).ok_or(ParseFail)?)?;
        Ok(ContextFormat2 { coverage, class_def, data, class_set_offsets })
    }

    pub fn class_rule_set(&self, class: u16) -> Option<RuleSet<'a>> {
        let offset = self.class_set_offsets.get(class as usize)?.non_null()?;
        RuleSet::parse(self.data.get(offset as usize..)?).ok()
    }
}

/// Sequence context format 3: every position (backtrack, input, lookahead)
/// is its own coverage table; one lookup-record array applies directly.
#[derive(Clone, Copy)]
pub struct ContextFormat3<'a> {
    data: &'a [u8],
    backtrack_offsets: LazyArray<'a, Offset16>,
    input_offsets: LazyArray<'a, Offset16>,
    lookahead_offsets: LazyArray<'a, Offset16>,
    pub lookup_records: LazyArray<'a, SequenceLookupRecord>,
}

impl<'a> ContextFormat3<'a> {
    fn parse(data: &'a [u8], chained: bool) -> Result<Self> {
        let mut s = Stream::new(data);
        s.skip::<u16>()?; // format

        let backtrack_offsets = if chained {
            let count: u16 = s.read()?;
            s.read_array(count as usize)?
        } else {
            LazyArray::empty()
        };

        let input_count: u16 = s.read()?;
        let input_offsets = s.read_array(input_count as usize)?;

        let lookahead_offsets = if chained {
            let count: u16 = s.read()?;
            s.read_array(count as usize)?
        } else {
            LazyArray::empty()
        };

        let lookup_count: u16 = s.read()?;
        let lookup_records = s.read_array(lookup_count as usize)?;

        Ok(ContextFormat3 { data, backtrack_offsets, input_offsets, lookahead_offsets, lookup_records })
    }

    pub fn input_coverage(&self, index: u16) -> Option<Coverage<'a>> {
        self.coverage_at(&self.input_offsets, index)
    }

    pub fn backtrack_coverage(&self, index: u16) -> Option<Coverage<'a>> {
        self.coverage_at(&self.backtrack_offsets, index)
    }

    pub fn lookahead_coverage(&self, index: u16) -> Option<Coverage<'a>> {
        self.coverage_at(&self.lookahead_offsets, index)
    }

    fn coverage_at(&self, offsets: &LazyArray<'a, Offset16>, index: u16) -> Option<Coverage<'a>> {
        let offset = offsets.get(index as usize)?.non_null()?;
        Coverage::parse(self.data.get(offset as usize..)?).ok()
    }
}

/// A dispatched sequence-context subtable (non-chained variant).
#[derive(Clone, Copy)]
pub enum SequenceContext<'a> {
    Format1(ContextFormat1<'a>),
    Format2(ContextFormat2<'a>),
    Format3(ContextFormat3<'a>),
}

impl<'a> SequenceContext<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let format: u16 = Stream::new(data).read()?;
        match format {
            1 => Ok(SequenceContext::Format1(ContextFormat1::parse(data)?)),
            2 => Ok(SequenceContext::Format2(ContextFormat2::parse(data)?)),
            3 => Ok(SequenceContext::Format3(ContextFormat3::parse(data, false)?)),
            _ => Err(ParseFail),
        }
    }
}

/// A dispatched chained-sequence-context subtable.
#[derive(Clone, Copy)]
pub enum ChainedSequenceContext<'a> {
    Format1(ContextFormat1<'a>),
    Format2(ContextFormat2<'a>),
    Format3(ContextFormat3<'a>),
}

impl<'a> ChainedSequenceContext<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let format: u16 = Stream::new(data).read()?;
        match format {
            1 => Ok(ChainedSequenceContext::Format1(ContextFormat1::parse(data)?)),
            2 => Ok(ChainedSequenceContext::Format2(ContextFormat2::parse(data)?)),
            3 => Ok(ChainedSequenceContext::Format3(ContextFormat3::parse(data, true)?)),
            _ => Err(ParseFail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::GlyphId;

    #[test]
    fn format_3_reads_per_position_coverages() {
        let mut d = Vec::new();
        d.extend_from_slice(&3u16.to_be_bytes()); // format
        d.extend_from_slice(&1u16.to_be_bytes()); // backtrackGlyphCount
        let backtrack_cov_offset_pos = d.len();
        d.extend_from_slice(&0u16.to_be_bytes()); // placeholder
        d.extend_from_slice(&1u16.to_be_bytes()); // inputGlyphCount
        let input_cov_offset_pos = d.len();
        d.extend_from_slice(&0u16.to_be_bytes());
        d.extend_from_slice(&0u16.to_be_bytes()); // lookaheadGlyphCount
        d.extend_from_slice(&0u16.to_be_bytes()); // seqLookupCount

        let backtrack_cov_offset = d.len() as u16;
        d.extend_from_slice(&1u16.to_be_bytes()); // coverage format 1
        d.extend_from_slice(&1u16.to_be_bytes()); // glyphCount
        d.extend_from_slice(&GlyphId::new(5).to_u16().to_be_bytes());

        let input_cov_offset = d.len() as u16;
        d.extend_from_slice(&1u16.to_be_bytes());
        d.extend_from_slice(&1u16.to_be_bytes());
        d.extend_from_slice(&GlyphId::new(9).to_u16().to_be_bytes());

        d[backtrack_cov_offset_pos..backtrack_cov_offset_pos + 2].copy_from_slice(&backtrack_cov_offset.to_be_bytes());
        d[input_cov_offset_pos..input_cov_offset_pos + 2].copy_from_slice(&input_cov_offset.to_be_bytes());

        let ctx = ChainedSequenceContext::parse(&d).unwrap();
        match ctx {
            ChainedSequenceContext::Format3(f3) => {
                assert_eq!(f3.backtrack_coverage(0).unwrap().get(GlyphId::new(5)), Some(0));
                assert_eq!(f3.input_coverage(0).unwrap().get(GlyphId::new(9)), Some(0));
            }
            _ => panic!("expected format 3"),
        }
    }
}
