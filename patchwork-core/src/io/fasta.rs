//! FASTA length scanning
//!
//! Only the first record of each input FASTA matters: its residue count is the
//! length of the locus. Parsing uses needletail, which also reads gzipped
//! files transparently.

use needletail::{parse_fastx_file, parse_fastx_reader};
use std::path::Path;
use thiserror::Error;

use crate::types::GenomicPos;

#[derive(Debug, Error)]
pub enum FastaError {
    #[error("Parse error in {path}: {message}")]
    Parse { path: String, message: String },
    #[error("Empty file or no sequences found: {0}")]
    EmptyFile(String),
}

/// Identifier and length of a FASTA record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaSummary {
    pub id: String,
    pub length: GenomicPos,
}

/// FASTA parser for reading sequence summaries
pub struct FastaParser;

impl FastaParser {
    /// Summarize the first record of a FASTA/FASTQ file.
    pub fn first_record<P: AsRef<Path>>(path: P) -> Result<FastaSummary, FastaError> {
        let label = path.as_ref().display().to_string();
        let mut reader = parse_fastx_file(&path).map_err(|e| FastaError::Parse {
            path: label.clone(),
            message: e.to_string(),
        })?;
        Self::summarize_first(reader.next(), label)
    }

    /// Summarize the first record from any readable source.
    pub fn first_record_from_reader<R: std::io::Read + Send>(reader: R, label: &str) -> Result<FastaSummary, FastaError> {
        let mut fastx_reader = parse_fastx_reader(reader).map_err(|e| FastaError::Parse {
            path: label.to_string(),
            message: e.to_string(),
        })?;
        Self::summarize_first(fastx_reader.next(), label.to_string())
    }

    fn summarize_first(
        record: Option<Result<needletail::parser::SequenceRecord, needletail::errors::ParseError>>,
        label: String,
    ) -> Result<FastaSummary, FastaError> {
        let record = match record {
            Some(record) => record.map_err(|e| FastaError::Parse {
                path: label.clone(),
                message: e.to_string(),
            })?,
            None => return Err(FastaError::EmptyFile(label)),
        };

        let header = String::from_utf8_lossy(record.id()).to_string();
        let id = header.split_whitespace().next().unwrap_or_default().to_string();

        Ok(FastaSummary {
            id,
            length: record.seq().len() as GenomicPos,
        })
    }
}
