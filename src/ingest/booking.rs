//! Conference-room reservation export.

use std::{io::Read, path::Path};

use chrono::{NaiveDate, NaiveTime};

use crate::{core::records::BookingRecord, ingest::LoadReport, prelude::*};

pub fn load(path: &Path, skip_rows: usize) -> Result<(Vec<BookingRecord>, LoadReport)> {
    let mut reader = super::open(path, skip_rows)?;
    let (records, report) = read(&mut reader)
        .with_context(|| format!("failed to ingest bookings `{}`", path.display()))?;
    info!(path = %path.display(), %report, "bookings ingested");
    Ok((records, report))
}

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y"];
const TIME_FORMATS: [&str; 3] = ["%I:%M %p", "%H:%M", "%H:%M:%S"];

fn parse_date(cell: &str) -> Result<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(cell, format).ok())
        .with_context(|| format!("unreadable date `{cell}`"))
}

/// A blank time is a legitimate all-day marker, so it maps to [`None`]
/// rather than an error.
fn parse_time(cell: &str) -> Result<Option<NaiveTime>> {
    if cell.is_empty() {
        return Ok(None);
    }
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(cell, format).ok())
        .map(Some)
        .with_context(|| format!("unreadable time `{cell}`"))
}

pub fn read<R: Read>(reader: &mut csv::Reader<R>) -> Result<(Vec<BookingRecord>, LoadReport)> {
    let headers = reader.headers().context("booking export has no header row")?.clone();
    let column = |names: &[&str]| {
        headers
            .iter()
            .position(|header| names.iter().any(|name| header.eq_ignore_ascii_case(name)))
            .with_context(|| format!("booking export has no `{}` column", names[0]))
    };
    let date_index = column(&["date"])?;
    let room_index = column(&["room", "room name"])?;
    let start_index = column(&["start", "start time"])?;
    let finish_index = column(&["finish", "end", "end time"])?;
    let attendees_index = column(&["# attendees", "attendees"])?;
    let type_index = column(&["attendance type", "type"])?;

    let mut records = Vec::new();
    let mut total_rows = 0;
    let mut parse_errors = 0;
    for row in reader.records() {
        total_rows += 1;
        let parsed = row.map_err(Error::from).and_then(|row| {
            let cell = |index: usize| row.get(index).unwrap_or_default();
            let attendees = match cell(attendees_index) {
                // A blank attendee cell is how the export spells zero.
                "" => 0,
                cell => cell.parse().with_context(|| format!("unreadable attendees `{cell}`"))?,
            };
            Ok(BookingRecord {
                date: parse_date(cell(date_index))?,
                room: cell(room_index).to_string(),
                start: parse_time(cell(start_index))?,
                finish: parse_time(cell(finish_index))?,
                attendees,
                attendance_type: cell(type_index).to_string(),
            })
        });
        match parsed {
            Ok(record) => records.push(record),
            Err(error) => {
                warn!(row = total_rows, %error, "skipping malformed booking row");
                parse_errors += 1;
            }
        }
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
    fn rows_parse_with_twelve_hour_times() {
        let body = "Date,Room,Start,Finish,# Attendees,Attendance Type\n\
                    2025-03-14,Aurora,9:00 AM,10:30 AM,6,In Person\n\
                    03/15/2025,Borealis,,,0,All Hands\n";
        let (records, report) = read(&mut reader(body)).unwrap();
        assert_eq!(report.loaded_rows, 2);
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
        assert_eq!(records[0].start, NaiveTime::from_hms_opt(9, 0, 0));
        assert_eq!(records[0].attendees, 6);
        // All-day booking: both times blank, attendees blank means zero.
        assert_eq!(records[1].start, None);
        assert_eq!(records[1].attendance_type, "All Hands");
    }

    #[test]
    fn an_unreadable_date_skips_the_row_only() {
        let body = "Date,Room,Start,Finish,# Attendees,Attendance Type\n\
                    someday,Aurora,9:00 AM,10:00 AM,4,In Person\n\
                    2025-04-01,Aurora,9:00 AM,10:00 AM,4,In Person\n";
        let (records, report) = read(&mut reader(body)).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(report.parse_errors, 1);
    }
}
