//! mashmap mapping output and pre-computed tab-delimited PAF
//!
//! Both layouts share the PAF column order for their first ten fields:
//! query name, length, start, end, strand, target name, length, start, end,
//! and a tenth column that is either an identity percentage (mashmap) or a
//! residue match count (PAF).

use super::{identity_from_matches, parse_number, require_fields, AlignmentParser, AlignmentRecord, ParseError};
use crate::types::{GenomicPos, Strand};

pub const MAPPING_FIELDS: usize = 10;

/// Field separator, which also decides how the tenth column is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    /// Runs of spaces or tabs; column 9 is already a percentage.
    #[default]
    Whitespace,
    /// Single tabs; column 9 is a match count rescaled by the shorter side.
    Tab,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MashmapParser {
    pub delimiter: Delimiter,
}

impl MashmapParser {
    pub fn new(delimiter: Delimiter) -> Self {
        Self { delimiter }
    }

    /// Parser for the pre-computed PAF tables used by the `custom` method.
    pub fn precomputed_paf() -> Self {
        Self::new(Delimiter::Tab)
    }
}

impl AlignmentParser for MashmapParser {
    fn parse_line(&self, line: &str) -> Result<Option<AlignmentRecord>, ParseError> {
        if line.starts_with('#') {
            return Ok(None);
        }

        let fields: Vec<&str> = match self.delimiter {
            Delimiter::Whitespace => line.split_whitespace().collect(),
            Delimiter::Tab => line.split('\t').collect(),
        };
        require_fields(&fields, MAPPING_FIELDS)?;

        let query_start: GenomicPos = parse_number(fields[2], "query start")?;
        let query_end: GenomicPos = parse_number(fields[3], "query end")?;
        let strand: Strand = fields[4].parse()?;
        let target_start: GenomicPos = parse_number(fields[7], "target start")?;
        let target_end: GenomicPos = parse_number(fields[8], "target end")?;
        let score: f64 = parse_number(fields[9], "identity")?;

        let identity = match self.delimiter {
            Delimiter::Whitespace => score,
            Delimiter::Tab => identity_from_matches(
                score,
                target_end.abs_diff(target_start),
                query_end.abs_diff(query_start),
            ),
        };

        Ok(Some(AlignmentRecord::new(
            fields[5],
            (target_start, target_end),
            fields[0],
            (query_start, query_end),
            strand,
            identity,
        )))
    }
}
