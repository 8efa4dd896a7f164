use super::{run_invocation, split_params, AlignerError, CommandRunner, Invocation, PairwiseAligner};
use crate::io::lastz::CANONICAL_HEADER;
use crate::io::{AlignmentParser, AlignmentRecord, LastzParser, ParseError};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// lastz, asked to write the canonical general format directly
pub struct LastzAligner {
    binary_path: PathBuf,
    params: Vec<String>,
    runner: Arc<dyn CommandRunner>,
}

impl LastzAligner {
    pub fn new(binary_path: PathBuf, params: &str, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            binary_path,
            params: split_params(params),
            runner,
        }
    }

    pub fn invocation(&self, fasta1: &Path, fasta2: &Path, output: &Path) -> Invocation {
        let mut output_arg = std::ffi::OsString::from("--output=");
        output_arg.push(output);

        Invocation::new(&self.binary_path, output)
            .arg(fasta1)
            .arg(fasta2)
            .args(&self.params)
            .arg(format!("--format=general:{}", CANONICAL_HEADER.join(",")))
            .arg(output_arg)
    }
}

impl PairwiseAligner for LastzAligner {
    fn name(&self) -> &'static str {
        "lastz"
    }

    fn align(&self, fasta1: &Path, fasta2: &Path, output: &Path) -> Result<(), AlignerError> {
        run_invocation(self.runner.as_ref(), &self.invocation(fasta1, fasta2, output), self.name())
    }

    fn parse(&self, output: &Path) -> Result<Vec<AlignmentRecord>, ParseError> {
        LastzParser.parse_file(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aligner::SystemRunner;

    #[test]
    fn test_lastz_command_line() {
        let aligner = LastzAligner::new(PathBuf::from("lastz"), "--step=20 --notransition", Arc::new(SystemRunner));
        let invocation = aligner.invocation(Path::new("a.fa"), Path::new("b.fa"), Path::new("out/pair.tsv"));

        assert_eq!(
            invocation.command_line(),
            "lastz a.fa b.fa --step=20 --notransition \
             --format=general:name1,strand1,start1,end1,length1,name2,strand2,start2+,end2+,length2,id% \
             --output=out/pair.tsv"
        );
    }
}
