//! External pairwise aligners
//!
//! Each supported tool is wrapped in a [`PairwiseAligner`] that knows how to
//! invoke it for two FASTA files and how to parse what it writes. Processes are
//! launched through a [`CommandRunner`] so that tests can substitute a fake.

use crate::io::{AlignmentRecord, ParseError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub mod custom;
pub mod lastz;
pub mod mashmap;
pub mod minimap2;
pub mod runner;
pub mod yass;

pub use custom::CustomAligner;
pub use lastz::LastzAligner;
pub use mashmap::MashmapAligner;
pub use minimap2::Minimap2Aligner;
pub use runner::{CommandOutcome, CommandRunner, Invocation, SystemRunner};
pub use yass::YassAligner;

/// Extension of per-pair alignment output files.
pub const OUTPUT_EXTENSION: &str = "tsv";

/// Errors raised while launching an aligner
#[derive(Debug, thiserror::Error)]
pub enum AlignerError {
    #[error("Failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// One external alignment tool.
pub trait PairwiseAligner {
    fn name(&self) -> &'static str;

    /// Run the tool on `fasta1` (reference) against `fasta2` (query), writing
    /// to `output`. A non-zero exit status is logged, not returned.
    fn align(&self, fasta1: &Path, fasta2: &Path, output: &Path) -> Result<(), AlignerError>;

    /// Parse an output file previously written by [`PairwiseAligner::align`].
    fn parse(&self, output: &Path) -> Result<Vec<AlignmentRecord>, ParseError>;

    /// Align unless `output` already exists. Returns whether the tool ran.
    fn ensure_alignment(&self, fasta1: &Path, fasta2: &Path, output: &Path) -> Result<bool, AlignerError> {
        if output.exists() {
            log::debug!("Reusing existing alignment {}", output.display());
            return Ok(false);
        }
        self.align(fasta1, fasta2, output)?;
        Ok(true)
    }
}

/// Supported alignment methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AlignmentMethod {
    #[default]
    Lastz,
    Yass,
    Minimap2,
    Mashmap,
    /// Pre-computed tab-delimited PAF files placed in the alignment directory
    Custom,
}

impl AlignmentMethod {
    pub const ALL: [AlignmentMethod; 5] = [
        AlignmentMethod::Lastz,
        AlignmentMethod::Yass,
        AlignmentMethod::Minimap2,
        AlignmentMethod::Mashmap,
        AlignmentMethod::Custom,
    ];

    /// Resolve a method name, falling back to lastz for anything unknown.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "lastz" => AlignmentMethod::Lastz,
            "yass" => AlignmentMethod::Yass,
            "minimap2" => AlignmentMethod::Minimap2,
            "mashmap" => AlignmentMethod::Mashmap,
            "custom" => AlignmentMethod::Custom,
            other => {
                log::warn!("Unknown alignment method '{}', falling back to lastz", other);
                AlignmentMethod::Lastz
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AlignmentMethod::Lastz => "lastz",
            AlignmentMethod::Yass => "yass",
            AlignmentMethod::Minimap2 => "minimap2",
            AlignmentMethod::Mashmap => "mashmap",
            AlignmentMethod::Custom => "custom",
        }
    }
}

impl From<String> for AlignmentMethod {
    fn from(name: String) -> Self {
        AlignmentMethod::from_name(&name)
    }
}

impl From<AlignmentMethod> for String {
    fn from(method: AlignmentMethod) -> Self {
        method.as_str().to_string()
    }
}

impl fmt::Display for AlignmentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Method selection and per-tool parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignerSettings {
    #[serde(default)]
    pub method: AlignmentMethod,
    #[serde(default = "default_lastz_params")]
    pub lastz_params: String,
    #[serde(default = "default_minimap2_params")]
    pub minimap2_params: String,
    #[serde(default = "default_mashmap_params")]
    pub mashmap_params: String,
    #[serde(default = "default_yass_params")]
    pub yass_params: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastz_binary: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimap2_binary: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mashmap_binary: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yass_binary: Option<PathBuf>,
}

fn default_lastz_params() -> String {
    "--step=20 --notransition".to_string()
}

fn default_minimap2_params() -> String {
    "-x asm10".to_string()
}

fn default_mashmap_params() -> String {
    "--pi 85 -s 1000".to_string()
}

fn default_yass_params() -> String {
    "-d 1".to_string()
}

impl Default for AlignerSettings {
    fn default() -> Self {
        Self {
            method: AlignmentMethod::default(),
            lastz_params: default_lastz_params(),
            minimap2_params: default_minimap2_params(),
            mashmap_params: default_mashmap_params(),
            yass_params: default_yass_params(),
            lastz_binary: None,
            minimap2_binary: None,
            mashmap_binary: None,
            yass_binary: None,
        }
    }
}

impl AlignerSettings {
    pub fn with_method(method: AlignmentMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }
}

/// Factory for aligner adapters
pub struct AlignerFactory;

impl AlignerFactory {
    /// Create the aligner selected by `settings`, running real processes.
    pub fn create(settings: &AlignerSettings) -> Box<dyn PairwiseAligner> {
        Self::with_runner(settings, Arc::new(SystemRunner))
    }

    /// Create the aligner selected by `settings` on top of a custom runner.
    pub fn with_runner(settings: &AlignerSettings, runner: Arc<dyn CommandRunner>) -> Box<dyn PairwiseAligner> {
        match settings.method {
            AlignmentMethod::Lastz => Box::new(LastzAligner::new(
                locate_binary("lastz", settings.lastz_binary.as_deref()),
                &settings.lastz_params,
                runner,
            )),
            AlignmentMethod::Yass => Box::new(YassAligner::new(
                locate_binary("yass", settings.yass_binary.as_deref()),
                &settings.yass_params,
                runner,
            )),
            AlignmentMethod::Minimap2 => Box::new(Minimap2Aligner::new(
                locate_binary("minimap2", settings.minimap2_binary.as_deref()),
                &settings.minimap2_params,
                runner,
            )),
            AlignmentMethod::Mashmap => Box::new(MashmapAligner::new(
                locate_binary("mashmap", settings.mashmap_binary.as_deref()),
                &settings.mashmap_params,
                runner,
            )),
            AlignmentMethod::Custom => Box::new(CustomAligner),
        }
    }

    /// List all available alignment methods
    pub fn available_methods() -> Vec<&'static str> {
        AlignmentMethod::ALL.iter().map(|m| m.as_str()).collect()
    }
}

/// Configured path if any, else the program found on `PATH`, else the bare name.
pub fn locate_binary(program: &str, configured: Option<&Path>) -> PathBuf {
    if let Some(path) = configured {
        return path.to_path_buf();
    }
    which::which(program).unwrap_or_else(|_| PathBuf::from(program))
}

/// Split a parameter string into individual arguments.
pub(crate) fn split_params(params: &str) -> Vec<String> {
    params.split_whitespace().map(str::to_string).collect()
}

/// Launch an invocation and report a failing exit status.
pub(crate) fn run_invocation(runner: &dyn CommandRunner, invocation: &Invocation, tool: &str) -> Result<(), AlignerError> {
    log::debug!("Running {}: {}", tool, invocation.command_line());

    let outcome = runner.run(invocation).map_err(|source| AlignerError::Spawn {
        program: invocation.program.display().to_string(),
        source,
    })?;

    if !outcome.success {
        log::warn!(
            "{} exited with status {} while writing {}: {}",
            tool,
            outcome.code.map_or_else(|| "unknown".to_string(), |c| c.to_string()),
            invocation.output.display(),
            outcome.stderr.trim()
        );
    }
    Ok(())
}
