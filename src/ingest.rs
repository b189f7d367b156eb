//! CSV ingestion for the three source exports.
//!
//! Facility exports are messy: banner rows above the header, blank cells,
//! thousands separators. A malformed row is logged and skipped, never fatal;
//! the per-file [`LoadReport`] keeps the skip count honest.

pub mod badge;
pub mod booking;
pub mod utility;

use std::{fs, io::Cursor, path::Path};

use crate::prelude::*;

/// Row accounting for one ingested file.
#[derive(Copy, Clone, Debug, serde::Serialize)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub parse_errors: usize,
}

impl std::fmt::Display for LoadReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} of {} rows loaded, {} parse errors",
            self.loaded_rows, self.total_rows, self.parse_errors,
        )
    }
}

/// Open a CSV file, dropping `skip_rows` physical lines above the header.
fn open(path: &Path, skip_rows: usize) -> Result<csv::Reader<Cursor<String>>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read `{}`", path.display()))?;
    let body = contents
        .lines()
        .skip(skip_rows)
        .flat_map(|line| [line, "\n"])
        .collect::<String>();
    Ok(csv::ReaderBuilder::new().flexible(true).trim(csv::Trim::All).from_reader(Cursor::new(body)))
}

/// Parse a numeric cell, tolerating `$`, thousands separators, and blanks.
fn parse_number(cell: &str) -> Option<f64> {
    let cleaned: String =
        cell.chars().filter(|char| !matches!(char, ',' | '$' | ' ')).collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_tolerate_separators() {
        assert_eq!(parse_number("5,978,000"), Some(5_978_000.0));
        assert_eq!(parse_number("$0.15"), Some(0.15));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("n/a"), None);
    }
}
