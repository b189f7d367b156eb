//! Badge-swipe matrix: one row per employee, one column per month.

use std::{io::Read, path::Path};

use crate::{calendar::Month, core::records::BadgeRecord, ingest::LoadReport, prelude::*};

pub fn load(path: &Path, skip_rows: usize) -> Result<(Vec<BadgeRecord>, LoadReport)> {
    let mut reader = super::open(path, skip_rows)?;
    let (records, report) = read(&mut reader)
        .with_context(|| format!("failed to ingest badge matrix `{}`", path.display()))?;
    info!(path = %path.display(), %report, "badge matrix ingested");
    Ok((records, report))
}

/// The month columns are discovered from the header: any header cell that
/// parses as a month (`Jan`, `January 2025`, …) becomes one. The floor column
/// is matched by name; remaining columns (names, employee IDs) are ignored.
pub fn read<R: Read>(reader: &mut csv::Reader<R>) -> Result<(Vec<BadgeRecord>, LoadReport)> {
    let headers = reader.headers().context("badge matrix has no header row")?.clone();
    let floor_index = headers
        .iter()
        .position(|header| header.eq_ignore_ascii_case("floor"))
        .context("badge matrix has no `Floor` column")?;
    let month_columns: Vec<(usize, Month)> = headers
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != floor_index)
        .filter_map(|(index, header)| Some((index, header.parse().ok()?)))
        .collect();
    ensure!(!month_columns.is_empty(), "badge matrix has no month columns");

    let mut records = Vec::new();
    let mut total_rows = 0;
    let mut parse_errors = 0;
    for row in reader.records() {
        total_rows += 1;
        let row = match row {
            Ok(row) => row,
            Err(error) => {
                warn!(row = total_rows, %error, "skipping malformed badge row");
                parse_errors += 1;
                continue;
            }
        };
        let Some(floor) = row.get(floor_index).filter(|cell| !cell.is_empty()) else {
            warn!(row = total_rows, "skipping badge row with no floor");
            parse_errors += 1;
            continue;
        };
        let swipes = month_columns
            .iter()
            .map(|(index, month)| {
                // A blank cell is an unreported month; garbage is an error.
                let count = match row.get(*index).map(str::trim) {
                    None | Some("") => None,
                    Some(cell) => match cell.parse() {
                        Ok(count) => Some(count),
                        Err(_) => {
                            warn!(row = total_rows, %month, cell, "unreadable swipe count");
                            parse_errors += 1;
                            None
                        }
                    },
                };
                (*month, count)
            })
            .collect();
        records.push(BadgeRecord { floor: floor.to_string(), swipes });
    }
    let report = LoadReport { total_rows, loaded_rows: records.len(), parse_errors };
    Ok((records, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(body: &str) -> csv::Reader<&[u8]> {
        csv::ReaderBuilder::new().flexible(true).trim(csv::Trim::All).from_reader(body.as_bytes())
    }

    #[test]
    fn month_columns_are_discovered_from_the_header() {
        let body = "Employee ID,Floor,January 2025,February 2025\nE-001,3,20,18\nE-002,3,,15\n";
        let (records, report) = read(&mut reader(body)).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].floor, "3");
        assert_eq!(records[0].swipes, vec![(Month::Jan, Some(20)), (Month::Feb, Some(18))]);
        // The blank January cell is an unreported month, not an error.
        assert_eq!(records[1].swipes[0], (Month::Jan, None));
        assert_eq!(report.parse_errors, 0);
    }

    #[test]
    fn garbage_cells_are_counted_not_fatal() {
        let body = "Floor,Jan\n2,twenty\n2,10\n";
        let (records, report) = read(&mut reader(body)).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].swipes[0].1, None);
        assert_eq!(report.parse_errors, 1);
    }

    #[test]
    fn missing_floor_column_is_fatal() {
        let body = "Employee,Jan\nE-001,5\n";
        assert!(read(&mut reader(body)).is_err());
    }

    #[test]
    fn annual_total_ignores_unreported_months() {
        let body = "Floor,Jan,Feb,Mar\n1,10,,5\n";
        let (records, _) = read(&mut reader(body)).unwrap();
        assert_eq!(records[0].annual_total(), 15);
    }
}
