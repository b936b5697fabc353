//! Source reader for `major|minor|text` line files.

use std::path::Path;

use crate::error::{Result, SonifyError};
use crate::types::Unit;

pub const RECORD_PATTERN: &str = "<int>|<int>|<text>";

/// Read and parse a whole source file.
///
/// Nothing is returned unless every non-blank line parses.
pub fn read_units(path: &Path) -> Result<Vec<Unit>> {
    let content = std::fs::read_to_string(path).map_err(|e| SonifyError::io(path, e))?;
    let units = parse_units(&content)?;
    if units.is_empty() {
        return Err(SonifyError::EmptyInput {
            path: path.to_path_buf(),
        });
    }
    log::info!("Read {} units from {}", units.len(), path.display());
    Ok(units)
}

/// Parse source text into units. Blank lines are skipped; line numbers in
/// errors are 1-based.
pub fn parse_units(content: &str) -> Result<Vec<Unit>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            parse_line(line).ok_or(SonifyError::Format {
                line: i + 1,
                expected: RECORD_PATTERN,
            })
        })
        .collect()
}

fn parse_line(line: &str) -> Option<Unit> {
    let mut fields = line.trim_start().splitn(3, '|');
    let major = parse_index(fields.next()?)?;
    let minor = parse_index(fields.next()?)?;
    let text = fields.next()?.trim_end();
    Some(Unit {
        major,
        minor,
        text: text.to_string(),
    })
}

fn parse_index(field: &str) -> Option<u32> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}
