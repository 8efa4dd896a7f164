//! Process launching

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// A fully specified external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    /// File the command is expected to write
    pub output: PathBuf,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            output: output.into(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Human-readable rendering for logs. Not meant to be fed to a shell.
    pub fn command_line(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutcome {
    pub success: bool,
    pub code: Option<i32>,
    pub stderr: String,
}

impl CommandOutcome {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            code: Some(0),
            stderr: String::new(),
        }
    }
}

/// Runs external commands. An `Err` means the process could not be started.
pub trait CommandRunner: Send + Sync {
    fn run(&self, invocation: &Invocation) -> std::io::Result<CommandOutcome>;
}

/// Runs commands with `std::process::Command`, blocking until they exit.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> std::io::Result<CommandOutcome> {
        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .output()?;

        Ok(CommandOutcome {
            success: output.status.success(),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_rendering() {
        let invocation = Invocation::new("lastz", "out.tsv")
            .arg("a.fa")
            .args(["--step=20", "--output=out.tsv"]);
        assert_eq!(invocation.command_line(), "lastz a.fa --step=20 --output=out.tsv");
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let invocation = Invocation::new("/nonexistent/patchwork-test-binary", "out.tsv");
        assert!(SystemRunner.run(&invocation).is_err());
    }
}
