//! PatchWork Core Library
//!
//! Aligner adapters, output parsers, strand orientation, coordinate
//! redirection and the pairwise alignment repository behind PatchWork dot
//! plots.

pub mod aligner;
pub mod annotation;
pub mod io;
pub mod orient;
pub mod redirect;
pub mod repository;
pub mod sequence;
pub mod types;

// Re-export commonly used types and functions
pub use aligner::{AlignerFactory, AlignerSettings, AlignmentMethod, CommandRunner, PairwiseAligner};
pub use io::{AlignmentParser, AlignmentRecord, ParseError};
pub use orient::{vote_strand, OrientationResolver};
pub use redirect::{directed_position, DirectedAlignment, SequenceFrame};
pub use repository::{AlignmentRepository, PairSummary, RepositoryConfig, RepositoryError};
pub use sequence::{InputData, InputError, Sequence};
pub use types::{PairKey, Strand};

/// Version information for the PatchWork core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
