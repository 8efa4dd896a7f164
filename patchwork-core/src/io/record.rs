//! Canonical alignment record

use crate::types::{GenomicPos, Strand};
use serde::{Deserialize, Serialize};

/// One aligned segment between a reference (side 1) and a query (side 2).
///
/// Both intervals are stored ascending; the orientation of the query segment
/// relative to the reference is carried by `strand2`. Lengths are derived from
/// the coordinates, so `length1 == end1 - start1` always holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentRecord {
    pub name1: String,
    pub strand1: Strand,
    pub start1: GenomicPos,
    pub end1: GenomicPos,
    pub name2: String,
    pub strand2: Strand,
    pub start2: GenomicPos,
    pub end2: GenomicPos,
    /// Percent identity in [0, 100], one decimal place
    pub identity: f64,
}

impl AlignmentRecord {
    /// Build a record from raw interval endpoints in any order.
    pub fn new(
        name1: impl Into<String>,
        interval1: (GenomicPos, GenomicPos),
        name2: impl Into<String>,
        interval2: (GenomicPos, GenomicPos),
        strand2: Strand,
        identity: f64,
    ) -> Self {
        let (start1, end1) = ascending(interval1);
        let (start2, end2) = ascending(interval2);
        Self {
            name1: name1.into(),
            strand1: Strand::Forward,
            start1,
            end1,
            name2: name2.into(),
            strand2,
            start2,
            end2,
            identity: round_identity(identity),
        }
    }

    pub fn length1(&self) -> GenomicPos {
        self.end1 - self.start1
    }

    pub fn length2(&self) -> GenomicPos {
        self.end2 - self.start2
    }

    /// Identity as written in canonical tables, e.g. `97.4%`.
    pub fn identity_label(&self) -> String {
        format!("{:.1}%", self.identity)
    }

    /// True when both sides reach `min_len`.
    pub fn passes_min_length(&self, min_len: GenomicPos) -> bool {
        self.length1() >= min_len && self.length2() >= min_len
    }
}

fn ascending((a, b): (GenomicPos, GenomicPos)) -> (GenomicPos, GenomicPos) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Round to one decimal and clamp into the percentage range.
pub fn round_identity(identity: f64) -> f64 {
    if !identity.is_finite() {
        return 0.0;
    }
    ((identity * 10.0).round() / 10.0).clamp(0.0, 100.0)
}
