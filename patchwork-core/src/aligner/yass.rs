use super::{run_invocation, split_params, AlignerError, CommandRunner, Invocation, PairwiseAligner};
use crate::io::{AlignmentParser, AlignmentRecord, ParseError, YassParser};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct YassAligner {
    binary_path: PathBuf,
    params: Vec<String>,
    runner: Arc<dyn CommandRunner>,
}

impl YassAligner {
    pub fn new(binary_path: PathBuf, params: &str, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            binary_path,
            params: split_params(params),
            runner,
        }
    }

    pub fn invocation(&self, fasta1: &Path, fasta2: &Path, output: &Path) -> Invocation {
        Invocation::new(&self.binary_path, output)
            .args(&self.params)
            .arg("-o")
            .arg(output)
            .arg(fasta1)
            .arg(fasta2)
    }
}

impl PairwiseAligner for YassAligner {
    fn name(&self) -> &'static str {
        "yass"
    }

    fn align(&self, fasta1: &Path, fasta2: &Path, output: &Path) -> Result<(), AlignerError> {
        run_invocation(self.runner.as_ref(), &self.invocation(fasta1, fasta2, output), self.name())
    }

    fn parse(&self, output: &Path) -> Result<Vec<AlignmentRecord>, ParseError> {
        YassParser.parse_file(output)
    }
}
