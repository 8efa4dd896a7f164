//! Input sequence table
//!
//! One row per locus, in the order that defines sequence indices:
//!
//! ```text
//! SampleID,Fasta,Label,Annotation,Strand,StartPos
//! human,loci/human.fa,Homo sapiens,genes/human.bed,,1200000
//! mouse,loci/mouse.fa,Mus musculus,,-,
//! ```
//!
//! Only `SampleID` and `Fasta` are required. A `.tsv` or `.tab` extension
//! switches the delimiter to tabs.

use crate::annotation::{AnnotationError, AnnotationTrack, BedReader};
use crate::io::{FastaError, FastaParser};
use crate::types::{GenomicPos, SeqIdx, Strand};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("Failed to read input table {path}: {source}")]
    Table {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("Input table {0} lists no sequences")]
    Empty(PathBuf),
    #[error("Duplicate SampleID '{sample}' in rows {first} and {second}")]
    DuplicateSample { sample: String, first: usize, second: usize },
    #[error("Invalid Strand '{value}' for sample '{sample}', expected '+' or '-'")]
    InvalidStrand { sample: String, value: String },
    #[error("Cannot read FASTA for sample '{sample}': {source}")]
    Fasta {
        sample: String,
        #[source]
        source: FastaError,
    },
    #[error("Cannot read annotation for sample '{sample}': {source}")]
    Annotation {
        sample: String,
        #[source]
        source: AnnotationError,
    },
}

#[derive(Debug, Deserialize)]
struct SequenceRow {
    #[serde(rename = "SampleID")]
    sample_id: String,
    #[serde(rename = "Fasta")]
    fasta: PathBuf,
    #[serde(rename = "Label", default)]
    label: Option<String>,
    #[serde(rename = "Annotation", alias = "GeneTxt", default)]
    annotation: Option<PathBuf>,
    #[serde(rename = "Strand", default)]
    strand: Option<String>,
    #[serde(rename = "StartPos", default)]
    start_pos: Option<GenomicPos>,
}

/// One input locus. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    pub idx: SeqIdx,
    pub sample_id: String,
    pub label: Option<String>,
    pub length: GenomicPos,
    pub fasta: PathBuf,
    pub strand_override: Option<Strand>,
    pub annotation: Option<AnnotationTrack>,
    pub start_pos: Option<GenomicPos>,
}

impl Sequence {
    pub fn new(sample_id: impl Into<String>, fasta: impl Into<PathBuf>, length: GenomicPos) -> Self {
        Self {
            idx: 0,
            sample_id: sample_id.into(),
            label: None,
            length,
            fasta: fasta.into(),
            strand_override: None,
            annotation: None,
            start_pos: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_strand(mut self, strand: Strand) -> Self {
        self.strand_override = Some(strand);
        self
    }

    pub fn with_start_pos(mut self, start_pos: GenomicPos) -> Self {
        self.start_pos = Some(start_pos);
        self
    }

    /// Label if set, otherwise the sample identifier.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.sample_id)
    }
}

/// All input sequences in index order
#[derive(Debug, Clone, Default)]
pub struct InputData {
    sequences: Vec<Sequence>,
}

impl InputData {
    /// Load the input table, scanning every FASTA and annotation file.
    pub fn load(path: &Path) -> Result<Self, InputError> {
        log::info!("Loading input sequences from: {}", path.display());

        let delimiter = match path.extension().and_then(|e| e.to_str()) {
            Some("tsv") | Some("tab") => b'\t',
            _ => b',',
        };
        let table_error = |source: csv::Error| InputError::Table {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(table_error)?;

        let mut sequences = Vec::new();
        for row in reader.deserialize::<SequenceRow>() {
            let row = row.map_err(table_error)?;
            sequences.push(Self::load_row(row)?);
        }

        if sequences.is_empty() {
            return Err(InputError::Empty(path.to_path_buf()));
        }

        let data = Self::from_sequences(sequences)?;
        log::info!("Loaded {} sequences", data.num_sequences());
        Ok(data)
    }

    fn load_row(row: SequenceRow) -> Result<Sequence, InputError> {
        let strand_override = match row.strand.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(value) => Some(value.parse::<Strand>().map_err(|_| InputError::InvalidStrand {
                sample: row.sample_id.clone(),
                value: value.to_string(),
            })?),
        };

        let summary = FastaParser::first_record(&row.fasta).map_err(|source| InputError::Fasta {
            sample: row.sample_id.clone(),
            source,
        })?;
        log::debug!(
            "{}: {} ({} bp) from {}",
            row.sample_id,
            summary.id,
            summary.length,
            row.fasta.display()
        );

        let annotation = match &row.annotation {
            Some(bed) => Some(
                BedReader::read_track(bed, row.start_pos.unwrap_or(0)).map_err(|source| InputError::Annotation {
                    sample: row.sample_id.clone(),
                    source,
                })?,
            ),
            None => None,
        };

        Ok(Sequence {
            idx: 0,
            sample_id: row.sample_id,
            label: row.label.filter(|l| !l.is_empty()),
            length: summary.length,
            fasta: row.fasta,
            strand_override,
            annotation,
            start_pos: row.start_pos,
        })
    }

    /// Assemble already-loaded sequences, assigning indices in order.
    pub fn from_sequences(sequences: Vec<Sequence>) -> Result<Self, InputError> {
        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut indexed = Vec::with_capacity(sequences.len());

        for (idx, mut sequence) in sequences.into_iter().enumerate() {
            if let Some(&first) = seen.get(&sequence.sample_id) {
                return Err(InputError::DuplicateSample {
                    sample: sequence.sample_id,
                    first,
                    second: idx,
                });
            }
            seen.insert(sequence.sample_id.clone(), idx);
            sequence.idx = idx;
            indexed.push(sequence);
        }

        Ok(Self { sequences: indexed })
    }

    pub fn num_sequences(&self) -> usize {
        self.sequences.len()
    }

    pub fn get(&self, idx: SeqIdx) -> Option<&Sequence> {
        self.sequences.get(idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sequence> {
        self.sequences.iter()
    }

    pub fn strand_overrides(&self) -> Vec<Option<Strand>> {
        self.sequences.iter().map(|s| s.strand_override).collect()
    }
}
