//! Feature annotation tracks
//!
//! Each input sequence may carry a BED-like file of named features. Positions
//! are shifted by the sequence's `StartPos` on load and can be projected into
//! the same directed frame as alignments.

use crate::redirect::directed_position;
use crate::types::{DirectedPos, GenomicPos, Strand};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_FEATURE_COLOR: &str = "#000000";

#[derive(Debug, Error)]
pub enum AnnotationError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}:{line}: {message}")]
    InvalidLine { path: PathBuf, line: usize, message: String },
}

/// One BED feature, already translated into locus coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub name: String,
    pub start: GenomicPos,
    pub end: GenomicPos,
    /// Hex colour, `#rrggbb`
    pub color: String,
}

impl Annotation {
    pub fn length(&self) -> GenomicPos {
        self.end.saturating_sub(self.start)
    }

    pub fn overlaps(&self, start: GenomicPos, end: GenomicPos) -> bool {
        self.start < end && start < self.end
    }

    /// Interval in the same oriented zero-based frame as redirected alignments.
    pub fn directed_interval(&self, locus_length: GenomicPos, strand: Strand) -> (DirectedPos, DirectedPos) {
        let a = directed_position(self.start, locus_length, strand);
        let b = directed_position(self.end, locus_length, strand);
        (a.min(b), a.max(b))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationTrack {
    pub source_file: PathBuf,
    pub annotations: Vec<Annotation>,
}

impl AnnotationTrack {
    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    pub fn get_annotations_in_region(&self, start: GenomicPos, end: GenomicPos) -> Vec<&Annotation> {
        self.annotations
            .iter()
            .filter(|annotation| annotation.overlaps(start, end))
            .collect()
    }
}

pub struct BedReader;

impl BedReader {
    /// Read a BED-like file, subtracting `start_pos` from every coordinate.
    pub fn read_track(path: &Path, start_pos: GenomicPos) -> Result<AnnotationTrack, AnnotationError> {
        let file = File::open(path).map_err(|source| AnnotationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::read_from(BufReader::new(file), path, start_pos)
    }

    pub fn read_from<R: BufRead>(reader: R, path: &Path, start_pos: GenomicPos) -> Result<AnnotationTrack, AnnotationError> {
        let mut track = AnnotationTrack {
            source_file: path.to_path_buf(),
            annotations: Vec::new(),
        };

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| AnnotationError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') || line.starts_with("browser") || line.starts_with("track") {
                continue;
            }

            let annotation = Self::parse_bed_line(line, start_pos).map_err(|message| AnnotationError::InvalidLine {
                path: path.to_path_buf(),
                line: line_num + 1,
                message,
            })?;
            track.annotations.push(annotation);
        }

        Ok(track)
    }

    fn parse_bed_line(line: &str, start_pos: GenomicPos) -> Result<Annotation, String> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 3 {
            return Err(format!("BED line must have at least 3 fields, got {}", fields.len()));
        }

        let start: GenomicPos = fields[1]
            .parse()
            .map_err(|_| format!("invalid start '{}'", fields[1]))?;
        let end: GenomicPos = fields[2]
            .parse()
            .map_err(|_| format!("invalid end '{}'", fields[2]))?;

        let color = match fields.get(8) {
            Some(rgb) => rgb_to_hex(rgb).ok_or_else(|| format!("invalid colour '{}'", rgb))?,
            None => DEFAULT_FEATURE_COLOR.to_string(),
        };

        Ok(Annotation {
            name: fields[0].to_string(),
            start: start.saturating_sub(start_pos),
            end: end.saturating_sub(start_pos),
            color,
        })
    }
}

/// `"255,0,128"` to `"#ff0080"`.
pub fn rgb_to_hex(rgb: &str) -> Option<String> {
    let channels: Vec<u8> = rgb
        .split(',')
        .map(|c| c.trim().parse::<u8>())
        .collect::<Result<_, _>>()
        .ok()?;
    match channels.as_slice() {
        [r, g, b] => Some(format!("#{:02x}{:02x}{:02x}", r, g, b)),
        _ => None,
    }
}
