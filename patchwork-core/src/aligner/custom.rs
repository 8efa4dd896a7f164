use super::{AlignerError, PairwiseAligner};
use crate::io::{AlignmentParser, AlignmentRecord, MashmapParser, ParseError};
use std::path::Path;

/// Reads alignments computed elsewhere.
///
/// Tab-delimited PAF files must already sit in the alignment directory under
/// the per-pair file names; nothing is ever launched.
#[derive(Debug, Clone, Copy, Default)]
pub struct CustomAligner;

impl PairwiseAligner for CustomAligner {
    fn name(&self) -> &'static str {
        "custom"
    }

    fn align(&self, _fasta1: &Path, _fasta2: &Path, output: &Path) -> Result<(), AlignerError> {
        log::warn!("No pre-computed alignment at {}, pair will be empty", output.display());
        Ok(())
    }

    fn parse(&self, output: &Path) -> Result<Vec<AlignmentRecord>, ParseError> {
        MashmapParser::precomputed_paf().parse_file(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_reads_precomputed_paf() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("pair_0-a_1-b.tsv");
        std::fs::write(&output, "q\t500\t0\t100\t-\tr\t800\t200\t300\t90\t100\t60\n").unwrap();

        let ran = CustomAligner
            .ensure_alignment(Path::new("a.fa"), Path::new("b.fa"), &output)
            .unwrap();
        assert!(!ran);

        let records = CustomAligner.parse(&output).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].identity, 90.0);
        assert_eq!(records[0].strand2, crate::types::Strand::Reverse);
    }

    #[test]
    fn test_custom_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("missing.tsv");
        CustomAligner.align(Path::new("a.fa"), Path::new("b.fa"), &output).unwrap();
        assert!(CustomAligner.parse(&output).unwrap().is_empty());
    }
}
