//! Convert command implementation - rewrite raw aligner output as a canonical table

use anyhow::{Context, Result};
use patchwork_core::io::write_canonical_table;
use patchwork_core::{AlignerFactory, AlignerSettings, AlignmentMethod};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::error::CliError;

pub fn execute(input: &Path, format: &str, output: &Path) -> Result<usize> {
    if !input.exists() {
        return Err(CliError::file_not_found(input.to_path_buf()).into());
    }

    let method = AlignmentMethod::from_name(format);
    let aligner = AlignerFactory::create(&AlignerSettings::with_method(method));

    log::info!("Reading {} output from {}", method, input.display());
    let records = aligner
        .parse(input)
        .map_err(|e| CliError::parse(input.display().to_string(), e.to_string()))?;

    let file = File::create(output)
        .map_err(CliError::from)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    write_canonical_table(&records, BufWriter::new(file))
        .map_err(CliError::from)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    log::info!("Wrote {} alignments to {}", records.len(), output.display());
    Ok(records.len())
}
