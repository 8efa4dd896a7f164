//! Strand orientation inference
//!
//! Every sequence is oriented relative to sequence 0. Unless the input table
//! fixes a strand, the orientation is a majority vote over the query strands of
//! the longest alignments between sequence 0 and that sequence.

use crate::io::AlignmentRecord;
use crate::types::{SeqIdx, Strand};
use std::collections::BTreeMap;

/// Number of longest reference-pair alignments that vote.
pub const ORIENTATION_EVIDENCE: usize = 15;

/// Majority strand among the longest records, ties resolving to `+`.
///
/// Records are ranked by reference-side length with a stable sort, so equally
/// long records keep their file order. No records means no evidence against
/// the forward strand.
pub fn vote_strand(records: &[AlignmentRecord]) -> Strand {
    let mut ranked: Vec<&AlignmentRecord> = records.iter().collect();
    ranked.sort_by(|a, b| b.length1().cmp(&a.length1()));

    let mut tally: BTreeMap<Strand, usize> = BTreeMap::new();
    for record in ranked.into_iter().take(ORIENTATION_EVIDENCE) {
        *tally.entry(record.strand2).or_insert(0) += 1;
    }

    // BTreeMap iterates `+` first; only a strictly larger count replaces it.
    let mut best = (Strand::Forward, 0usize);
    for (strand, count) in tally {
        if count > best.1 {
            best = (strand, count);
        }
    }
    best.0
}

/// Resolves one strand per sequence.
pub struct OrientationResolver<'a> {
    overrides: &'a [Option<Strand>],
}

impl<'a> OrientationResolver<'a> {
    /// `overrides[i]` is the user-supplied strand of sequence `i`, if any.
    pub fn new(overrides: &'a [Option<Strand>]) -> Self {
        Self { overrides }
    }

    /// Strand of `idx` given the filtered records of pair `(0, idx)`.
    pub fn resolve(&self, idx: SeqIdx, reference_records: &[AlignmentRecord]) -> Strand {
        let override_strand = self.overrides.get(idx).copied().flatten();

        if idx == 0 {
            if let Some(strand) = override_strand {
                if strand.is_reverse() {
                    log::warn!("Ignoring strand override '{}' for the reference sequence", strand);
                }
            }
            return Strand::Forward;
        }

        if let Some(strand) = override_strand {
            log::debug!("Sequence {} strand fixed to '{}' by input table", idx, strand);
            return strand;
        }

        let strand = vote_strand(reference_records);
        log::debug!(
            "Sequence {} strand '{}' inferred from {} reference alignments",
            idx,
            strand,
            reference_records.len().min(ORIENTATION_EVIDENCE)
        );
        strand
    }

    /// Strands for `count` sequences, fetching reference-pair evidence lazily.
    pub fn resolve_all<'r, F>(&self, count: usize, mut reference_records: F) -> Vec<Strand>
    where
        F: FnMut(SeqIdx) -> &'r [AlignmentRecord],
    {
        (0..count)
            .map(|idx| {
                if idx == 0 {
                    self.resolve(0, &[])
                } else {
                    self.resolve(idx, reference_records(idx))
                }
            })
            .collect()
    }
}
