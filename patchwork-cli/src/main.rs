use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod error;

use config::{Config, Overrides};
use error::{print_error_and_exit, CliError};

#[derive(Parser)]
#[command(name = "patchwork")]
#[command(about = "PatchWork - pairwise alignment matrices for dot plots of genomic loci")]
#[command(version)]
#[command(long_about = "
PatchWork aligns every pair of input loci with an external aligner, infers a
consistent strand for each locus and re-expresses all alignments in one
orientation-corrected frame per locus.

Examples:
  patchwork align -i loci.csv -o results --aligner minimap2 --min-len 2000
  patchwork convert --input raw.paf --format minimap2 --output canonical.tsv
  patchwork config --example > patchwork.toml
  patchwork config --config site.toml --write patchwork.toml
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (default: ./patchwork.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (warnings and errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Align all pairs of input sequences and write alignment statistics
    Align {
        /// Input sequence table (CSV, or TSV with .tsv/.tab extension)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Alignment method (lastz, yass, minimap2, mashmap, custom)
        #[arg(long)]
        aligner: Option<String>,

        /// Minimum alignment length on both sequences
        #[arg(long)]
        min_len: Option<u64>,

        /// Directory for per-pair alignment files
        #[arg(long)]
        alignment_dir: Option<PathBuf>,
    },

    /// Convert raw aligner output to the canonical alignment table
    Convert {
        /// Raw aligner output
        #[arg(short, long)]
        input: PathBuf,

        /// Aligner that produced the input
        #[arg(long, default_value = "lastz")]
        format: String,

        /// Canonical table to write
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Show configuration
    Config {
        /// Print an example configuration file
        #[arg(long)]
        example: bool,

        /// Write the effective configuration to this file
        #[arg(long)]
        write: Option<PathBuf>,
    },
}

fn setup_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Align {
            input,
            output,
            aligner,
            min_len,
            alignment_dir,
        } => {
            let mut config = Config::load(cli.config.as_deref())?;
            config.apply_overrides(Overrides {
                input,
                output_dir: output,
                aligner,
                min_alignment_length: min_len,
                alignment_dir,
            });
            let run = config.resolve_align_run(cli.verbose > 0)?;
            commands::align::execute(&run)?;
        }

        Commands::Convert { input, format, output } => {
            commands::convert::execute(&input, &format, &output)?;
        }

        Commands::Config { example, write } => {
            if example {
                print!("{}", Config::example_toml()?);
            } else if let Some(path) = write {
                let config = Config::load(cli.config.as_deref())?;
                config.save_to_file(&path)?;
                log::info!("Configuration written to {}", path.display());
            } else {
                let config = Config::load(cli.config.as_deref())?;
                print!("{}", toml::to_string_pretty(&config).map_err(CliError::from)?);
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    if let Err(err) = run(cli) {
        if let Some(cli_err) = err.downcast_ref::<CliError>() {
            if err.chain().count() > 1 {
                log::debug!("{:#}", err);
            }
            print_error_and_exit(cli_err);
        }
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_write_saves_effective_config() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("site.toml");
        let target = dir.path().join("patchwork.toml");
        std::fs::write(&source, "[alignment]\nmethod = \"yass\"\nmin_alignment_length = 750\n").unwrap();

        let cli = Cli::try_parse_from([
            "patchwork",
            "config",
            "--config",
            source.to_str().unwrap(),
            "--write",
            target.to_str().unwrap(),
        ])
        .unwrap();
        run(cli).unwrap();

        let written = Config::load_from_file(&target).unwrap();
        assert_eq!(written, Config::load_from_file(&source).unwrap());
        assert_eq!(written.alignment.min_alignment_length, 750);
    }
}
