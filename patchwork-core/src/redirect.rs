//! Coordinate redirection
//!
//! Once every sequence has a strand, each alignment interval is re-expressed in
//! the frame of its own sequence read on that strand. A position `v` on a
//! sequence of length `L` maps to `v` on `+` and `L - v + 1` on `-`, then one is
//! subtracted to make the frame zero-based.

use crate::io::AlignmentRecord;
use crate::types::{DirectedPos, GenomicPos, Strand};
use serde::{Deserialize, Serialize};

/// Length and assigned strand of one side of a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceFrame {
    pub length: GenomicPos,
    pub strand: Strand,
}

impl SequenceFrame {
    pub fn new(length: GenomicPos, strand: Strand) -> Self {
        Self { length, strand }
    }

    pub fn direct(&self, position: GenomicPos) -> DirectedPos {
        directed_position(position, self.length, self.strand)
    }
}

/// Reflect a raw position for a sequence read on `strand`, before the
/// zero-based shift.
pub fn reflect_position(position: GenomicPos, length: GenomicPos, strand: Strand) -> DirectedPos {
    match strand {
        Strand::Forward => position as DirectedPos,
        Strand::Reverse => length as DirectedPos - position as DirectedPos + 1,
    }
}

/// Reflected and zero-based position.
pub fn directed_position(position: GenomicPos, length: GenomicPos, strand: Strand) -> DirectedPos {
    reflect_position(position, length, strand) - 1
}

/// A filtered alignment record with its orientation-corrected coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectedAlignment {
    record: AlignmentRecord,
    start1_dir: DirectedPos,
    end1_dir: DirectedPos,
    start2_dir: DirectedPos,
    end2_dir: DirectedPos,
}

impl DirectedAlignment {
    /// Redirect `record` given the frames of its reference and query sequences.
    pub fn redirect(record: AlignmentRecord, frame1: SequenceFrame, frame2: SequenceFrame) -> Self {
        let (raw_start2, raw_end2) = if record.strand2.is_reverse() {
            (record.end2, record.start2)
        } else {
            (record.start2, record.end2)
        };

        Self {
            start1_dir: frame1.direct(record.start1),
            end1_dir: frame1.direct(record.end1),
            start2_dir: frame2.direct(raw_start2),
            end2_dir: frame2.direct(raw_end2),
            record,
        }
    }

    pub fn record(&self) -> &AlignmentRecord {
        &self.record
    }

    pub fn into_record(self) -> AlignmentRecord {
        self.record
    }

    pub fn start1_dir(&self) -> DirectedPos {
        self.start1_dir
    }

    pub fn end1_dir(&self) -> DirectedPos {
        self.end1_dir
    }

    pub fn start2_dir(&self) -> DirectedPos {
        self.start2_dir
    }

    pub fn end2_dir(&self) -> DirectedPos {
        self.end2_dir
    }

    /// Segment endpoints `((x1, y1), (x2, y2))` in the directed frame.
    pub fn segment(&self) -> ((DirectedPos, DirectedPos), (DirectedPos, DirectedPos)) {
        ((self.start1_dir, self.start2_dir), (self.end1_dir, self.end2_dir))
    }

    pub fn identity(&self) -> f64 {
        self.record.identity
    }
}

/// Redirect every record of one pair.
pub fn redirect_all(
    records: Vec<AlignmentRecord>,
    frame1: SequenceFrame,
    frame2: SequenceFrame,
) -> Vec<DirectedAlignment> {
    records
        .into_iter()
        .map(|record| DirectedAlignment::redirect(record, frame1, frame2))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflect_position() {
        assert_eq!(reflect_position(10, 200, Strand::Forward), 10);
        assert_eq!(reflect_position(10, 200, Strand::Reverse), 191);
        assert_eq!(directed_position(0, 200, Strand::Forward), -1);
        assert_eq!(directed_position(10, 200, Strand::Reverse), 190);
    }

    #[test]
    fn test_forward_pair_shifts_by_one() {
        let record = AlignmentRecord::new("a", (10, 20), "b", (50, 80), Strand::Forward, 99.0);
        let directed = DirectedAlignment::redirect(
            record,
            SequenceFrame::new(100, Strand::Forward),
            SequenceFrame::new(200, Strand::Forward),
        );
        assert_eq!(directed.segment(), ((9, 49), (19, 79)));
    }

    #[test]
    fn test_reverse_record_swaps_query_endpoints() {
        let record = AlignmentRecord::new("a", (10, 20), "b", (50, 80), Strand::Reverse, 99.0);
        let directed = DirectedAlignment::redirect(
            record,
            SequenceFrame::new(100, Strand::Forward),
            SequenceFrame::new(200, Strand::Forward),
        );
        assert_eq!((directed.start2_dir(), directed.end2_dir()), (79, 49));
    }

    #[test]
    fn test_reverse_record_on_reverse_sequence_runs_forward() {
        // reverse hit on a sequence that is itself flipped
        let record = AlignmentRecord::new("a", (10, 20), "b", (50, 80), Strand::Reverse, 99.0);
        let directed = DirectedAlignment::redirect(
            record,
            SequenceFrame::new(100, Strand::Forward),
            SequenceFrame::new(200, Strand::Reverse),
        );
        assert_eq!((directed.start2_dir(), directed.end2_dir()), (120, 150));
        assert!(directed.start2_dir() < directed.end2_dir());
    }

    #[test]
    fn test_record_is_preserved() {
        let record = AlignmentRecord::new("a", (1, 2), "b", (3, 4), Strand::Forward, 50.0);
        let directed = DirectedAlignment::redirect(
            record.clone(),
            SequenceFrame::new(10, Strand::Forward),
            SequenceFrame::new(10, Strand::Forward),
        );
        assert_eq!(directed.record(), &record);
        assert_eq!(directed.identity(), 50.0);
    }
}
