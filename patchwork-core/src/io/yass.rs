//! yass tabulated output
//!
//! Twelve whitespace-separated columns in BLAST tabular order:
//! `name1 name2 identity alnlen mismatches gaps start1 end1 start2 end2 evalue bitscore`.
//! Reverse-complement hits are reported with descending query coordinates.

use super::{parse_number, require_fields, AlignmentParser, AlignmentRecord, ParseError};
use crate::types::{GenomicPos, Strand};

pub const YASS_FIELDS: usize = 12;

/// Parser for yass `-d 1` output
#[derive(Debug, Clone, Copy, Default)]
pub struct YassParser;

impl AlignmentParser for YassParser {
    fn parse_line(&self, line: &str) -> Result<Option<AlignmentRecord>, ParseError> {
        if line.starts_with('#') {
            return Ok(None);
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        require_fields(&fields, YASS_FIELDS)?;

        let identity: f64 = parse_number(fields[2], "identity")?;
        let start1: GenomicPos = parse_number(fields[6], "start1")?;
        let end1: GenomicPos = parse_number(fields[7], "end1")?;
        let start2: GenomicPos = parse_number(fields[8], "start2")?;
        let end2: GenomicPos = parse_number(fields[9], "end2")?;

        // A descending side means that side was read on the reverse strand;
        // the record keeps only the relative orientation.
        let reverse1 = start1 > end1;
        let reverse2 = start2 > end2;
        let strand = Strand::from(reverse1 == reverse2);

        Ok(Some(AlignmentRecord::new(
            fields[0],
            (start1, end1),
            fields[1],
            (start2, end2),
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
    fn test_forward_hit() {
        let line = "seqA\tseqB\t91.23\t500\t40\t4\t101\t600\t1001\t1500\t1e-100\t800";
        let record = YassParser.parse_line(line).unwrap().unwrap();

        assert_eq!(record.name1, "seqA");
        assert_eq!(record.name2, "seqB");
        assert_eq!((record.start1, record.end1), (101, 600));
        assert_eq!((record.start2, record.end2), (1001, 1500));
        assert_eq!(record.strand2, Strand::Forward);
        assert_eq!(record.identity, 91.2);
    }

    #[test]
    fn test_descending_query_is_reverse() {
        let line = "seqA seqB 88.0 500 40 4 101 600 1500 1001 1e-90 700";
        let record = YassParser.parse_line(line).unwrap().unwrap();

        assert_eq!(record.strand2, Strand::Reverse);
        assert_eq!((record.start2, record.end2), (1001, 1500));
        assert_eq!(record.length2(), 499);
    }

    #[test]
    fn test_comments_are_skipped() {
        let data = "# yass output\n\
                    seqA seqB 88.0 500 40 4 101 600 1500 1001 1e-90 700\n\
                    seqA seqB 88.0 500\n";
        let records = YassParser.parse_reader(Cursor::new(data), "test").unwrap();
        assert_eq!(records.len(), 1);
    }
}
