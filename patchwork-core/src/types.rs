//! Shared coordinate, index and strand types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Raw coordinate as reported by an aligner.
pub type GenomicPos = u64;

/// Zero-based coordinate in the orientation-corrected frame. Signed because a
/// raw coordinate of 0 maps to -1.
pub type DirectedPos = i64;

/// Index of an input sequence (row order of the input table).
pub type SeqIdx = usize;

/// Strand of a sequence or alignment segment.
///
/// The variant order follows the natural ordering of the symbols (`+` < `-`),
/// which is what orientation tie-breaking relies on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Strand {
    #[default]
    #[serde(rename = "+")]
    Forward,
    #[serde(rename = "-")]
    Reverse,
}

impl Strand {
    pub fn symbol(self) -> char {
        char::from(self)
    }

    pub fn is_reverse(self) -> bool {
        matches!(self, Strand::Reverse)
    }
}

impl From<bool> for Strand {
    fn from(forward: bool) -> Self {
        if forward {
            Strand::Forward
        } else {
            Strand::Reverse
        }
    }
}

impl From<Strand> for char {
    fn from(strand: Strand) -> Self {
        match strand {
            Strand::Forward => '+',
            Strand::Reverse => '-',
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", char::from(*self))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid strand: '{0}', expected '+' or '-'")]
pub struct StrandParseError(pub String);

impl FromStr for Strand {
    type Err = StrandParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "+" => Ok(Strand::Forward),
            "-" => Ok(Strand::Reverse),
            other => Err(StrandParseError(other.to_string())),
        }
    }
}

/// Key of one cell of the alignment matrix. Always `first <= second`; the
/// derived ordering (first, then second) is the matrix iteration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PairKey {
    pub first: SeqIdx,
    pub second: SeqIdx,
}

impl PairKey {
    /// Builds a key from two indices in either order.
    pub fn new(a: SeqIdx, b: SeqIdx) -> Self {
        Self {
            first: a.min(b),
            second: a.max(b),
        }
    }

    pub fn is_self_pair(&self) -> bool {
        self.first == self.second
    }
}

impl From<(SeqIdx, SeqIdx)> for PairKey {
    fn from((a, b): (SeqIdx, SeqIdx)) -> Self {
        PairKey::new(a, b)
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.first, self.second)
    }
}
