use super::{run_invocation, split_params, AlignerError, CommandRunner, Invocation, PairwiseAligner};
use crate::io::{AlignmentParser, AlignmentRecord, MashmapParser, ParseError};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct MashmapAligner {
    binary_path: PathBuf,
    params: Vec<String>,
    runner: Arc<dyn CommandRunner>,
}

impl MashmapAligner {
    pub fn new(binary_path: PathBuf, params: &str, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            binary_path,
            params: split_params(params),
            runner,
        }
    }

    pub fn invocation(&self, fasta1: &Path, fasta2: &Path, output: &Path) -> Invocation {
        Invocation::new(&self.binary_path, output)
            .arg("-r")
            .arg(fasta1)
            .arg("-q")
            .arg(fasta2)
            .args(&self.params)
            .arg("-o")
            .arg(output)
    }
}

impl PairwiseAligner for MashmapAligner {
    fn name(&self) -> &'static str {
        "mashmap"
    }

    fn align(&self, fasta1: &Path, fasta2: &Path, output: &Path) -> Result<(), AlignerError> {
        run_invocation(self.runner.as_ref(), &self.invocation(fasta1, fasta2, output), self.name())
    }

    fn parse(&self, output: &Path) -> Result<Vec<AlignmentRecord>, ParseError> {
        MashmapParser::default().parse_file(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aligner::SystemRunner;

    #[test]
    fn test_mashmap_command_line() {
        let aligner = MashmapAligner::new(PathBuf::from("mashmap"), "--pi 85 -s 1000", Arc::new(SystemRunner));
        let invocation = aligner.invocation(Path::new("a.fa"), Path::new("b.fa"), Path::new("out.tsv"));
        assert_eq!(
            invocation.command_line(),
            "mashmap -r a.fa -q b.fa --pi 85 -s 1000 -o out.tsv"
        );
    }
}
