//! minimap2 PAF parser
//!
//! PAF has 12 mandatory tab-separated fields. minimap2 is invoked as
//! `minimap2 <fasta1> <fasta2>`, so the first FASTA is the PAF *target*
//! (fields 5-8) and becomes the reference side of the canonical record; the
//! PAF query (fields 0-3) becomes side 2.
//!
//! Query coordinates in PAF are always on the forward strand, and the strand
//! column says how the query segment maps onto the target. That is exactly the
//! canonical convention, so coordinates are taken as-is. Identity is the
//! residue match count over the shorter aligned side.

use super::{identity_from_matches, parse_number, require_fields, AlignmentParser, AlignmentRecord, ParseError};
use crate::types::{GenomicPos, Strand};

pub const PAF_FIELDS: usize = 12;

/// Parser for minimap2 PAF output
#[derive(Debug, Clone, Copy, Default)]
pub struct PafParser;

impl AlignmentParser for PafParser {
    fn parse_line(&self, line: &str) -> Result<Option<AlignmentRecord>, ParseError> {
        if line.starts_with('#') {
            return Ok(None);
        }

        let fields: Vec<&str> = line.split('\t').collect();
        require_fields(&fields, PAF_FIELDS)?;

        let query_name = fields[0];
        let query_start: GenomicPos = parse_number(fields[2], "query start")?;
        let query_end: GenomicPos = parse_number(fields[3], "query end")?;
        let strand: Strand = fields[4].parse()?;

        let target_name = fields[5];
        let target_start: GenomicPos = parse_number(fields[7], "target start")?;
        let target_end: GenomicPos = parse_number(fields[8], "target end")?;

        let residue_matches: f64 = parse_number(fields[9], "residue matches")?;

        let length1 = target_end.abs_diff(target_start);
        let length2 = query_end.abs_diff(query_start);
        let identity = identity_from_matches(residue_matches, length1, length2);

        Ok(Some(AlignmentRecord::new(
            target_name,
            (target_start, target_end),
            query_name,
            (query_start, query_end),
            strand,
            identity,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_basic_paf_line() {
        let line = "query1\t1000\t100\t900\t+\ttarget1\t2000\t500\t1300\t760\t800\t60\ttp:A:P";

        let record = PafParser.parse_line(line).unwrap().unwrap();

        assert_eq!(record.name1, "target1");
        assert_eq!(record.strand1, Strand::Forward);
        assert_eq!((record.start1, record.end1), (500, 1300));
        assert_eq!(record.name2, "query1");
        assert_eq!((record.start2, record.end2), (100, 900));
        assert_eq!(record.strand2, Strand::Forward);
        assert_eq!(record.identity, 95.0);
    }

    #[test]
    fn test_reverse_strand_keeps_forward_coordinates() {
        let line = "query1\t1000\t100\t900\t-\ttarget1\t2000\t500\t1300\t400\t800\t60";

        let record = PafParser.parse_line(line).unwrap().unwrap();
        assert_eq!(record.strand2, Strand::Reverse);
        assert_eq!(record.strand1, Strand::Forward);
        assert_eq!((record.start2, record.end2), (100, 900));
        assert_eq!(record.identity, 50.0);
    }

    #[test]
    fn test_identity_uses_shorter_side() {
        // target span 100, query span 50
        let line = "q\t1000\t0\t50\t+\tt\t2000\t0\t100\t40\t100\t60";
        let record = PafParser.parse_line(line).unwrap().unwrap();
        assert_eq!(record.identity, 80.0);
    }

    #[test]
    fn test_parse_insufficient_fields() {
        let line = "query1\t1000\t100\t900\t+\ttarget1\t2000\t500";
        let result = PafParser.parse_line(line);
        assert!(matches!(
            result,
            Err(ParseError::InsufficientFields { expected: 12, found: 8 })
        ));
    }

    #[test]
    fn test_parse_invalid_strand() {
        let line = "query1\t1000\t100\t900\tx\ttarget1\t2000\t500\t1300\t750\t800\t60";
        assert!(matches!(PafParser.parse_line(line), Err(ParseError::InvalidStrand(_))));
    }

    #[test]
    fn test_skip_comments_and_empty_lines() {
        let paf_data = "# This is a comment\n\
                        \n\
                        query1\t1000\t100\t900\t+\ttarget1\t2000\t500\t1300\t700\t800\t60\n\
                        \n\
                        query2\t800\t50\t750\t-\ttarget2\t1500\t200\t900\t650\t700\t55\n";

        let records = PafParser.parse_reader(Cursor::new(paf_data), "test").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].strand2, Strand::Reverse);
    }
}
