//! Configuration handling for PatchWork CLI
//!
//! Supports loading configuration from patchwork.toml files with CLI argument overrides.

use anyhow::{Context, Result};
use patchwork_core::aligner::{AlignerSettings, AlignmentMethod};
use patchwork_core::repository::{ALIGNMENT_DIR_NAME, DEFAULT_MIN_ALIGNMENT_LENGTH, STATS_FILE_NAME};
use patchwork_core::RepositoryConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CliError, CliResult};

pub const DEFAULT_CONFIG_FILE: &str = "patchwork.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub alignment: AlignmentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Input sequence table (CSV or TSV)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentConfig {
    /// Minimum alignment length on both sequences
    #[serde(default = "default_min_alignment_length")]
    pub min_alignment_length: u64,

    /// Directory for per-pair alignment files (default: <output_dir>/pairwise_alignments)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment_dir: Option<PathBuf>,

    /// Aligner selection, parameters and binary paths
    #[serde(flatten)]
    pub aligner: AlignerSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,

    /// Summary statistics file name inside the output directory
    #[serde(default = "default_stats_file")]
    pub stats_file: String,
}

fn default_min_alignment_length() -> u64 { DEFAULT_MIN_ALIGNMENT_LENGTH }
fn default_stats_file() -> String { STATS_FILE_NAME.to_string() }

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            min_alignment_length: default_min_alignment_length(),
            alignment_dir: None,
            aligner: AlignerSettings::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            stats_file: default_stats_file(),
        }
    }
}

/// Command line values that take precedence over the configuration file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub input: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub aligner: Option<String>,
    pub min_alignment_length: Option<u64>,
    pub alignment_dir: Option<PathBuf>,
}

/// Everything the align command needs, with defaults filled in
#[derive(Debug, Clone, PartialEq)]
pub struct AlignRun {
    pub input_table: PathBuf,
    pub output_dir: PathBuf,
    pub stats_path: PathBuf,
    pub repository: RepositoryConfig,
    pub aligner: AlignerSettings,
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                Self::load_from_file(path)?
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    log::info!("Loading configuration from: {}", DEFAULT_CONFIG_FILE);
                    Self::load_from_file(&default_path)?
                } else {
                    log::debug!("Using default configuration");
                    Self::default()
                }
            }
        };

        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .map_err(CliError::from)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file: {}", path.display()))?;

        Ok(())
    }

    /// Generate example configuration file content
    pub fn example_toml() -> CliResult<String> {
        Ok(toml::to_string_pretty(&Self::default())?)
    }

    pub fn apply_overrides(&mut self, overrides: Overrides) {
        if let Some(input) = overrides.input {
            self.input.table = Some(input);
        }
        if let Some(output_dir) = overrides.output_dir {
            self.output.output_dir = Some(output_dir);
        }
        if let Some(aligner) = overrides.aligner {
            self.alignment.aligner.method = AlignmentMethod::from_name(&aligner);
        }
        if let Some(min_len) = overrides.min_alignment_length {
            self.alignment.min_alignment_length = min_len;
        }
        if let Some(alignment_dir) = overrides.alignment_dir {
            self.alignment.alignment_dir = Some(alignment_dir);
        }
    }

    /// Check that the input table and output directory are known.
    pub fn resolve_align_run(&self, verbose: bool) -> CliResult<AlignRun> {
        let input_table = self
            .input
            .table
            .clone()
            .ok_or_else(|| CliError::missing_argument("--input"))?;
        let output_dir = self
            .output
            .output_dir
            .clone()
            .ok_or_else(|| CliError::missing_argument("--output"))?;

        if !input_table.exists() {
            return Err(CliError::file_not_found(input_table));
        }

        let alignment_dir = self
            .alignment
            .alignment_dir
            .clone()
            .unwrap_or_else(|| output_dir.join(ALIGNMENT_DIR_NAME));

        Ok(AlignRun {
            stats_path: output_dir.join(&self.output.stats_file),
            input_table,
            output_dir,
            repository: RepositoryConfig {
                min_alignment_length: self.alignment.min_alignment_length,
                alignment_dir,
                verbose,
            },
            aligner: self.alignment.aligner.clone(),
        })
    }
}
