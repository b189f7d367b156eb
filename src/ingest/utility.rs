//! Utility meter readings: one row per month per resource.

use std::{io::Read, path::Path};

use crate::{core::records::UtilityRecord, ingest::LoadReport, prelude::*};

pub fn load(path: &Path, skip_rows: usize) -> Result<(Vec<UtilityRecord>, LoadReport)> {
    let mut reader = super::open(path, skip_rows)?;
    let (records, report) = read(&mut reader)
        .with_context(|| format!("failed to ingest utility readings `{}`", path.display()))?;
    info!(path = %path.display(), %report, "utility readings ingested");
    Ok((records, report))
}

pub fn read<R: Read>(reader: &mut csv::Reader<R>) -> Result<(Vec<UtilityRecord>, LoadReport)> {
    let headers = reader.headers().context("utility export has no header row")?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(name))
            .with_context(|| format!("utility export has no `{name}` column"))
    };
    let month_index = column("month")?;
    let resource_index = column("resource")?;
    let quantity_index = column("quantity")?;
    let unit_index = column("unit")?;

    let mut records = Vec::new();
    let mut total_rows = 0;
    let mut parse_errors = 0;
    for row in reader.records() {
        total_rows += 1;
        let parsed = row.map_err(Error::from).and_then(|row| {
            let cell = |index: usize| row.get(index).unwrap_or_default();
            Ok(UtilityRecord {
                month: cell(month_index).parse()?,
                resource: cell(resource_index).parse()?,
                quantity: super::parse_number(cell(quantity_index))
                    .with_context(|| format!("unreadable quantity `{}`", cell(quantity_index)))?,
                unit: cell(unit_index).parse()?,
            })
        });
        match parsed {
            Ok(record) => records.push(record),
            Err(error) => {
                warn!(row = total_rows, %error, "skipping malformed utility row");
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
    use crate::{calendar::Month, core::records::ResourceKind, quantity::convert::SourceUnit};

    fn reader(body: &str) -> csv::Reader<&[u8]> {
        csv::ReaderBuilder::new().flexible(true).trim(csv::Trim::All).from_reader(body.as_bytes())
    }

    #[test]
    fn rows_parse_in_source_native_units() {
        let body = "Month,Resource,Quantity,Unit\n\
                    January,Electricity,\"463,000\",kwh\n\
                    January,Water,5.978,mgal\n";
        let (records, report) = read(&mut reader(body)).unwrap();
        assert_eq!(report.loaded_rows, 2);
        assert_eq!(records[0].month, Month::Jan);
        assert_eq!(records[0].resource, ResourceKind::Electricity);
        assert_eq!(records[0].quantity, 463_000.0);
        assert_eq!(records[0].unit, SourceUnit::KilowattHours);
        assert_eq!(records[1].unit, SourceUnit::MillionGallons);
    }

    #[test]
    fn an_unknown_unit_skips_the_row_only() {
        let body = "Month,Resource,Quantity,Unit\n\
                    January,Electricity,463000,furlongs\n\
                    February,Electricity,413000,kwh\n";
        let (records, report) = read(&mut reader(body)).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].month, Month::Feb);
        assert_eq!(report.parse_errors, 1);
    }
}
