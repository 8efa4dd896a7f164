//! Align command implementation - run the whole alignment stage for an input table

use anyhow::{Context, Result};
use patchwork_core::{AlignerFactory, AlignmentRepository, InputData};

use crate::config::AlignRun;
use crate::error::CliError;

pub fn execute(run: &AlignRun) -> Result<AlignmentRepository> {
    prepare_dir(&run.output_dir)?;
    prepare_dir(&run.repository.alignment_dir)?;

    let input = InputData::load(&run.input_table).map_err(CliError::from)?;
    let aligner = AlignerFactory::create(&run.aligner);

    let repository = AlignmentRepository::build(input, aligner.as_ref(), &run.repository)
        .map_err(|e| CliError::alignment(aligner.name().to_string(), e.to_string()))?;

    repository
        .report_summary_alignment_stats(&run.stats_path)
        .map_err(|e| CliError::io(e.to_string()))
        .with_context(|| format!("Failed to write {}", run.stats_path.display()))?;

    log_report(&repository);
    log::info!("Alignment stage is complete");

    Ok(repository)
}

fn prepare_dir(dir: &std::path::Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .map_err(CliError::from)
        .with_context(|| format!("Failed to create directory {}", dir.display()))
}

fn log_report(repository: &AlignmentRepository) {
    for idx in 0..repository.num_sequences() {
        log::info!(
            "{} ({} bp): strand {}",
            repository.label(idx).unwrap_or_default(),
            repository.length(idx).unwrap_or_default(),
            repository.strand(idx).unwrap_or_default()
        );
    }

    for key in repository.pair_keys() {
        if let Some(summary) = repository.summary(key) {
            log::info!(
                "  pair {}: {} alignments, {} aligned bases, mean identity {:.1}%",
                key,
                summary.records,
                summary.aligned_bases,
                summary.mean_identity
            );
        }
    }
}
