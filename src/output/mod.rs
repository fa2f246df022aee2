//! Output module for tool results
//!
//! This module handles:
//! - Formatting leaderboard, rank lookup and missing-segment results
//! - Writing result files line by line

use crate::ranking::{LeaderboardEntry, SegmentRank};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while writing results
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Formats one leaderboard line: `name,totalPoints,segmentsCompleted`
pub fn format_leaderboard_line(entry: &LeaderboardEntry) -> String {
    format!("{},{},{}", entry.name, entry.points, entry.segments_completed)
}

/// Formats one rank lookup line: `segmentId,rank,fieldSize`
pub fn format_rank_line(record: &SegmentRank) -> String {
    format!("{},{},{}", record.segment, record.rank, record.field_size)
}

/// Joins missing segment ids with commas
pub fn format_missing<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(",")
}

/// Writes a finished leaderboard, one athlete per line
pub fn write_leaderboard(path: &Path, entries: &[LeaderboardEntry]) -> OutputResult<()> {
    write_lines(path, entries.iter().map(format_leaderboard_line))
}

/// Writes rank lookup results, one matched segment per line
pub fn write_rank_records(path: &Path, records: &[SegmentRank]) -> OutputResult<()> {
    write_lines(path, records.iter().map(format_rank_line))
}

fn write_lines<I>(path: &Path, lines: I) -> OutputResult<()>
where
    I: IntoIterator<Item = String>,
{
    let to_error = |source: std::io::Error| OutputError::Write {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(to_error)?;
    let mut writer = BufWriter::new(file);
    for line in lines {
        writeln!(writer, "{}", line).map_err(to_error)?;
    }
    writer.flush().map_err(to_error)?;

    tracing::info!("Wrote {}", path.display());
    Ok(())
}
