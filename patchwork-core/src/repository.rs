//! Pairwise alignment repository
//!
//! Building a repository runs the whole alignment stage: every unordered pair
//! of input sequences (self pairs included) is aligned or read back from the
//! alignment directory, parsed, length-filtered, oriented and redirected. The
//! result is a read-only matrix keyed by `(i, j)` with `i <= j`.

use crate::aligner::{PairwiseAligner, OUTPUT_EXTENSION};
use crate::annotation::AnnotationTrack;
use crate::io::AlignmentRecord;
use crate::orient::OrientationResolver;
use crate::redirect::{redirect_all, DirectedAlignment, SequenceFrame};
use crate::sequence::{InputData, Sequence};
use crate::types::{GenomicPos, PairKey, SeqIdx, Strand};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_MIN_ALIGNMENT_LENGTH: GenomicPos = 5000;
pub const ALIGNMENT_DIR_NAME: &str = "pairwise_alignments";
pub const STATS_FILE_NAME: &str = "alignment_stats.csv";

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Cannot create alignment directory {path}: {source}")]
    AlignmentDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write alignment statistics: {0}")]
    Stats(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Records shorter than this on either side are dropped
    pub min_alignment_length: GenomicPos,
    pub alignment_dir: PathBuf,
    /// Log every pair file at info level instead of debug
    pub verbose: bool,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            min_alignment_length: DEFAULT_MIN_ALIGNMENT_LENGTH,
            alignment_dir: PathBuf::from(ALIGNMENT_DIR_NAME),
            verbose: false,
        }
    }
}

/// Compact per-pair report
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PairSummary {
    pub records: usize,
    pub mean_identity: f64,
    /// Sum of reference-side lengths
    pub aligned_bases: GenomicPos,
}

#[derive(Debug, Serialize)]
struct StatsRow<'a> {
    #[serde(rename = "Label1")]
    label1: &'a str,
    #[serde(rename = "Idx1")]
    idx1: SeqIdx,
    #[serde(rename = "Label2")]
    label2: &'a str,
    #[serde(rename = "Idx2")]
    idx2: SeqIdx,
    #[serde(rename = "PI")]
    identity: f64,
}

/// Output file name of one pair, e.g. `self_0-human.tsv` or
/// `pair_0-human_1-mouse.tsv`.
pub fn pair_file_name(idx1: SeqIdx, sample1: &str, idx2: SeqIdx, sample2: &str) -> String {
    if idx1 == idx2 {
        format!("self_{}-{}.{}", idx1, sample1, OUTPUT_EXTENSION)
    } else {
        format!("pair_{}-{}_{}-{}.{}", idx1, sample1, idx2, sample2, OUTPUT_EXTENSION)
    }
}

pub struct AlignmentRepository {
    input: InputData,
    strands: Vec<Strand>,
    files: BTreeMap<PairKey, PathBuf>,
    matrix: BTreeMap<PairKey, Vec<DirectedAlignment>>,
}

impl AlignmentRepository {
    /// Run the alignment stage for every pair of `input`.
    pub fn build(
        input: InputData,
        aligner: &dyn PairwiseAligner,
        config: &RepositoryConfig,
    ) -> Result<Self, RepositoryError> {
        std::fs::create_dir_all(&config.alignment_dir).map_err(|source| RepositoryError::AlignmentDir {
            path: config.alignment_dir.clone(),
            source,
        })?;

        log::info!("Computing pairwise alignments with {}...", aligner.name());
        let files = Self::compute_alignments(&input, aligner, config);

        log::info!("Reading alignments (minimum length {})...", config.min_alignment_length);
        let filtered = Self::read_alignments(&files, aligner, config.min_alignment_length);

        log::info!("Redefining strands...");
        let overrides = input.strand_overrides();
        let resolver = OrientationResolver::new(&overrides);
        let strands = resolver.resolve_all(input.num_sequences(), |idx| {
            filtered
                .get(&PairKey::new(0, idx))
                .map(Vec::as_slice)
                .unwrap_or_default()
        });

        log::info!("Redirecting alignments...");
        let mut matrix = BTreeMap::new();
        for (key, records) in filtered {
            let frame1 = Self::frame(&input, &strands, key.first);
            let frame2 = Self::frame(&input, &strands, key.second);
            matrix.insert(key, redirect_all(records, frame1, frame2));
        }

        Ok(Self {
            input,
            strands,
            files,
            matrix,
        })
    }

    fn compute_alignments(
        input: &InputData,
        aligner: &dyn PairwiseAligner,
        config: &RepositoryConfig,
    ) -> BTreeMap<PairKey, PathBuf> {
        let sequences: Vec<&Sequence> = input.iter().collect();
        let mut files = BTreeMap::new();

        for (i, first) in sequences.iter().enumerate() {
            log::info!("Aligning {}...", first.sample_id);
            for second in &sequences[i..] {
                let key = PairKey::new(first.idx, second.idx);
                let output = config
                    .alignment_dir
                    .join(pair_file_name(first.idx, &first.sample_id, second.idx, &second.sample_id));

                match aligner.ensure_alignment(&first.fasta, &second.fasta, &output) {
                    Ok(true) => Self::log_pair(config, "computed", &output),
                    Ok(false) => Self::log_pair(config, "reused", &output),
                    Err(e) => log::warn!("{}; pair {} will be empty", e, key),
                }
                files.insert(key, output);
            }
        }

        files
    }

    fn log_pair(config: &RepositoryConfig, action: &str, output: &Path) {
        if config.verbose {
            log::info!("  {} was {}", output.display(), action);
        } else {
            log::debug!("  {} was {}", output.display(), action);
        }
    }

    fn read_alignments(
        files: &BTreeMap<PairKey, PathBuf>,
        aligner: &dyn PairwiseAligner,
        min_alignment_length: GenomicPos,
    ) -> BTreeMap<PairKey, Vec<AlignmentRecord>> {
        files
            .iter()
            .map(|(key, output)| {
                let records = match aligner.parse(output) {
                    Ok(records) => records,
                    Err(e) => {
                        log::warn!("Cannot read {}: {}; pair {} will be empty", output.display(), e, key);
                        Vec::new()
                    }
                };
                let total = records.len();
                let kept = filter_by_length(records, min_alignment_length);
                log::debug!("Pair {}: kept {} of {} alignments", key, kept.len(), total);
                (*key, kept)
            })
            .collect()
    }

    fn frame(input: &InputData, strands: &[Strand], idx: SeqIdx) -> SequenceFrame {
        let length = input.get(idx).map_or(0, |s| s.length);
        let strand = strands.get(idx).copied().unwrap_or_default();
        SequenceFrame::new(length, strand)
    }

    pub fn num_sequences(&self) -> usize {
        self.input.num_sequences()
    }

    pub fn sequence(&self, idx: SeqIdx) -> Option<&Sequence> {
        self.input.get(idx)
    }

    pub fn length(&self, idx: SeqIdx) -> Option<GenomicPos> {
        self.sequence(idx).map(|s| s.length)
    }

    pub fn sample_name(&self, idx: SeqIdx) -> Option<&str> {
        self.sequence(idx).map(|s| s.sample_id.as_str())
    }

    pub fn label(&self, idx: SeqIdx) -> Option<&str> {
        self.sequence(idx).map(Sequence::display_label)
    }

    pub fn fasta_path(&self, idx: SeqIdx) -> Option<&Path> {
        self.sequence(idx).map(|s| s.fasta.as_path())
    }

    pub fn annotation(&self, idx: SeqIdx) -> Option<&AnnotationTrack> {
        self.sequence(idx).and_then(|s| s.annotation.as_ref())
    }

    pub fn start_pos(&self, idx: SeqIdx) -> Option<GenomicPos> {
        self.sequence(idx).and_then(|s| s.start_pos)
    }

    pub fn strand(&self, idx: SeqIdx) -> Option<Strand> {
        self.strands.get(idx).copied()
    }

    pub fn strands(&self) -> &[Strand] {
        &self.strands
    }

    /// Records of pair `(idx1, idx2)`. `None` unless `idx1 <= idx2` names a
    /// pair of the matrix.
    pub fn alignments(&self, idx1: SeqIdx, idx2: SeqIdx) -> Option<&[DirectedAlignment]> {
        if idx1 > idx2 {
            return None;
        }
        self.matrix.get(&PairKey::new(idx1, idx2)).map(Vec::as_slice)
    }

    /// Output file backing pair `(idx1, idx2)`.
    pub fn alignment_file(&self, idx1: SeqIdx, idx2: SeqIdx) -> Option<&Path> {
        if idx1 > idx2 {
            return None;
        }
        self.files.get(&PairKey::new(idx1, idx2)).map(PathBuf::as_path)
    }

    /// Pair keys in matrix order: `i` ascending, then `j` ascending.
    pub fn pair_keys(&self) -> impl Iterator<Item = PairKey> + '_ {
        self.matrix.keys().copied()
    }

    pub fn summary(&self, key: PairKey) -> Option<PairSummary> {
        let records = self.matrix.get(&key)?;
        let aligned_bases = records.iter().map(|r| r.record().length1()).sum();
        let mean_identity = if records.is_empty() {
            0.0
        } else {
            records.iter().map(DirectedAlignment::identity).sum::<f64>() / records.len() as f64
        };
        Some(PairSummary {
            records: records.len(),
            mean_identity,
            aligned_bases,
        })
    }

    /// Write one row per record of every non-self pair to `path`.
    pub fn report_summary_alignment_stats(&self, path: &Path) -> Result<usize, RepositoryError> {
        let file = std::fs::File::create(path)?;
        let rows = self.write_summary_alignment_stats(file)?;
        log::info!("Wrote {} alignment statistics rows to {}", rows, path.display());
        Ok(rows)
    }

    /// Write the `Label1,Idx1,Label2,Idx2,PI` table to any writer.
    pub fn write_summary_alignment_stats<W: Write>(&self, writer: W) -> Result<usize, RepositoryError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        let mut rows = 0;

        for (key, records) in self.matrix.iter().filter(|(key, _)| !key.is_self_pair()) {
            let label1 = self.label(key.first).unwrap_or_default();
            let label2 = self.label(key.second).unwrap_or_default();
            for record in records {
                csv_writer.serialize(StatsRow {
                    label1,
                    idx1: key.first,
                    label2,
                    idx2: key.second,
                    identity: record.identity(),
                })?;
                rows += 1;
            }
        }

        // A table without rows still carries its header.
        if rows == 0 {
            csv_writer.write_record(["Label1", "Idx1", "Label2", "Idx2", "PI"])?;
        }

        csv_writer.flush()?;
        Ok(rows)
    }
}

/// Keep records reaching `min_len` on both sides.
pub fn filter_by_length(records: Vec<AlignmentRecord>, min_len: GenomicPos) -> Vec<AlignmentRecord> {
    records.into_iter().filter(|r| r.passes_min_length(min_len)).collect()
}
