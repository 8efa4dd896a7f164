//! Aligner output and FASTA parsers for PatchWork
//!
//! Every supported aligner writes its own tabular layout. The parsers in this
//! module convert those layouts into the canonical [`AlignmentRecord`] schema:
//! reference side ascending and always `+`, query side ascending with the
//! original orientation captured in `strand2`, identity as a percentage.
//!
//! Malformed lines are logged and skipped so that a partially failed aligner
//! run still yields the records it did produce.

pub mod fasta;
pub mod lastz;
pub mod mashmap;
pub mod paf;
pub mod record;
pub mod yass;

pub use fasta::{FastaError, FastaParser, FastaSummary};
pub use lastz::{write_canonical_table, LastzParser};
pub use mashmap::{Delimiter, MashmapParser};
pub use paf::PafParser;
pub use record::AlignmentRecord;
pub use yass::YassParser;

use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Invalid line: insufficient fields (expected {expected}, got {found})")]
    InsufficientFields { expected: usize, found: usize },
    #[error("Invalid {field} value: {value}")]
    InvalidNumber { field: &'static str, value: String },
    #[error(transparent)]
    InvalidStrand(#[from] crate::types::StrandParseError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Line-oriented parser for one aligner output layout.
pub trait AlignmentParser {
    /// Parse a single non-empty line. `Ok(None)` means the line carries no
    /// record (header or comment).
    fn parse_line(&self, line: &str) -> Result<Option<AlignmentRecord>, ParseError>;

    /// Parse records from any `BufRead` source, skipping malformed lines.
    fn parse_reader<R: BufRead>(&self, reader: R, source: &str) -> Result<Vec<AlignmentRecord>, ParseError>
    where
        Self: Sized,
    {
        collect_records(self, reader, source)
    }

    /// Parse an aligner output file. A file that does not exist yields no
    /// records: the aligner that should have produced it failed silently.
    fn parse_file(&self, path: &Path) -> Result<Vec<AlignmentRecord>, ParseError>
    where
        Self: Sized,
    {
        parse_path(self, path)
    }
}

pub(crate) fn parse_path<P: AlignmentParser + ?Sized>(
    parser: &P,
    path: &Path,
) -> Result<Vec<AlignmentRecord>, ParseError> {
    if !path.exists() {
        log::warn!("Alignment output {} does not exist, treating as empty", path.display());
        return Ok(Vec::new());
    }
    let reader = open_reader(path)?;
    collect_records(parser, reader, &path.display().to_string())
}

fn collect_records<P: AlignmentParser + ?Sized, R: BufRead>(
    parser: &P,
    reader: R,
    source: &str,
) -> Result<Vec<AlignmentRecord>, ParseError> {
    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (line_num, bytes) in reader.split(b'\n').enumerate() {
        let bytes = bytes?;
        let line = match std::str::from_utf8(&bytes) {
            Ok(line) => line,
            Err(e) => {
                skipped += 1;
                log::warn!("Skipping {} line {}: {}", source, line_num + 1, e);
                continue;
            }
        };
        let trimmed = line.trim_end_matches('\r');

        if trimmed.trim().is_empty() {
            continue;
        }

        match parser.parse_line(trimmed) {
            Ok(Some(record)) => records.push(record),
            Ok(None) => {}
            Err(e) => {
                skipped += 1;
                log::warn!("Skipping {} line {}: {}", source, line_num + 1, e);
            }
        }
    }

    if skipped > 0 {
        log::warn!("{}: kept {} records, skipped {} malformed lines", source, records.len(), skipped);
    }

    Ok(records)
}

/// Open a plain or gzip-compressed text file.
pub fn open_reader(path: &Path) -> std::io::Result<Box<dyn BufRead>> {
    let file = File::open(path)?;
    if path.to_string_lossy().ends_with(".gz") {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

pub(crate) fn require_fields(fields: &[&str], expected: usize) -> Result<(), ParseError> {
    if fields.len() < expected {
        return Err(ParseError::InsufficientFields {
            expected,
            found: fields.len(),
        });
    }
    Ok(())
}

pub(crate) fn parse_number<T: FromStr>(value: &str, field: &'static str) -> Result<T, ParseError> {
    value.trim().parse::<T>().map_err(|_| ParseError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

/// Identity from a residue match count, normalized by the shorter side.
pub(crate) fn identity_from_matches(matches: f64, length1: u64, length2: u64) -> f64 {
    let denom = length1.min(length2);
    if denom == 0 {
        0.0
    } else {
        matches / denom as f64 * 100.0
    }
}
