//! lastz general format, which doubles as the canonical alignment table
//!
//! ```text
//! #name1  strand1 start1  end1    length1 name2   strand2 start2+ end2+   length2 id%
//! chr1    +       10      5010    5000    chr2    -       200     5210    5010    97.4%
//! ```
//!
//! The length columns are informational: lengths are always recomputed from the
//! coordinates so that the record invariants hold for hand-edited tables too.

use super::{parse_number, require_fields, AlignmentParser, AlignmentRecord, ParseError};
use crate::types::{GenomicPos, Strand};
use std::io::Write;

pub const CANONICAL_FIELDS: usize = 11;

/// Header line of the canonical table, also the `--format=general:` field list
/// passed to lastz.
pub const CANONICAL_HEADER: [&str; CANONICAL_FIELDS] = [
    "name1", "strand1", "start1", "end1", "length1", "name2", "strand2", "start2+", "end2+", "length2", "id%",
];

/// Parser for lastz `--format=general` output and canonical tables
#[derive(Debug, Clone, Copy, Default)]
pub struct LastzParser;

impl AlignmentParser for LastzParser {
    fn parse_line(&self, line: &str) -> Result<Option<AlignmentRecord>, ParseError> {
        if line.starts_with('#') {
            return Ok(None);
        }

        let fields: Vec<&str> = line.split('\t').collect();
        require_fields(&fields, CANONICAL_FIELDS)?;

        let strand1: Strand = fields[1].parse()?;
        let start1: GenomicPos = parse_number(fields[2], "start1")?;
        let end1: GenomicPos = parse_number(fields[3], "end1")?;

        let strand2: Strand = fields[6].parse()?;
        let start2: GenomicPos = parse_number(fields[7], "start2")?;
        let end2: GenomicPos = parse_number(fields[8], "end2")?;

        let identity: f64 = parse_number(fields[10].trim().trim_end_matches('%'), "identity")?;

        // Orientation is relative, so a reverse reference flips the query.
        let strand = Strand::from(strand1 == strand2);

        Ok(Some(AlignmentRecord::new(
            fields[0],
            (start1, end1),
            fields[5],
            (start2, end2),
            strand,
            identity,
        )))
    }
}

/// Write records as a canonical tab-delimited table with a `#name1` header.
pub fn write_canonical_table<W: Write>(records: &[AlignmentRecord], mut writer: W) -> std::io::Result<()> {
    writeln!(writer, "#{}", CANONICAL_HEADER.join("\t"))?;
    for record in records {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            record.name1,
            record.strand1,
            record.start1,
            record.end1,
            record.length1(),
            record.name2,
            record.strand2,
            record.start2,
            record.end2,
            record.length2(),
            record.identity_label(),
        )?;
    }
    writer.flush()
}
