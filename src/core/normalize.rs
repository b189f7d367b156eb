use std::collections::BTreeMap;

use chrono::{Datelike, NaiveTime};
use serde::Serialize;

use crate::{
    calendar::{Calendar, Month},
    core::{
        records::{BadgeRecord, BookingRecord, ResourceKind, UtilityRecord},
        series::MonthlySeries,
    },
    prelude::*,
    quantity::{
        convert::Dimension,
        energy::KilowattHours,
        mass::ShortTons,
        time::Hours,
        volume::{Ccf, Gallons},
    },
};

/// Badge-matrix normalization output.
///
/// Every calendar month is present in `monthly_swipes`: a missing badge cell
/// contributes zero, it does not make the month absent.
#[derive(Debug, Serialize)]
pub struct OccupancyStatistics {
    pub monthly_swipes: MonthlySeries<f64>,

    /// Annual swipe total per employee, for utilization-tier classification.
    pub employee_totals: Vec<u32>,

    pub floors: BTreeMap<String, FloorTotals>,
}

#[derive(Copy, Clone, Debug, Default, Serialize)]
pub struct FloorTotals {
    pub swipes: u64,
    pub employees: usize,
}

impl OccupancyStatistics {
    #[instrument(skip_all, fields(n_employees = records.len()))]
    pub fn normalize(records: &[BadgeRecord], calendar: &Calendar) -> Self {
        let mut monthly_swipes = MonthlySeries::default();
        for month in &calendar.months {
            monthly_swipes.accumulate(*month, 0.0);
        }

        let mut employee_totals = Vec::with_capacity(records.len());
        let mut floors = BTreeMap::<String, FloorTotals>::new();
        for record in records {
            for (month, count) in &record.swipes {
                if let Some(count) = count {
                    monthly_swipes.accumulate(*month, f64::from(*count));
                }
            }
            let annual_total = record.annual_total();
            employee_totals.push(annual_total);
            let floor = floors.entry(record.floor.clone()).or_default();
            floor.swipes += u64::from(annual_total);
            floor.employees += 1;
        }

        info!(
            total_swipes = monthly_swipes.total(),
            n_floors = floors.len(),
            "normalized badge matrix"
        );
        Self { monthly_swipes, employee_totals, floors }
    }

    pub fn total_swipes(&self) -> f64 {
        self.monthly_swipes.total()
    }
}

/// Per-resource monthly series in the common basis.
///
/// A month never read for a resource stays absent here and in everything
/// derived from it.
#[derive(Debug, Default, Serialize)]
pub struct UtilityStatistics {
    pub electricity: MonthlySeries<KilowattHours>,
    pub gas: MonthlySeries<Ccf>,
    pub water: MonthlySeries<Gallons>,
    pub waste: MonthlySeries<ShortTons>,
}

impl UtilityStatistics {
    #[instrument(skip_all, fields(n_records = records.len()))]
    pub fn normalize(records: &[UtilityRecord], calendar: &Calendar) -> Result<Self> {
        let mut this = Self::default();
        for record in records {
            ensure!(
                calendar.contains(record.month),
                "{} reading for `{}` falls outside the analysis calendar",
                record.resource,
                record.month,
            );
            let expected_dimension = match record.resource {
                ResourceKind::Electricity => Dimension::Energy,
                ResourceKind::Gas => Dimension::GasVolume,
                ResourceKind::Water => Dimension::WaterVolume,
                ResourceKind::Waste => Dimension::Mass,
            };
            ensure!(
                record.unit.dimension() == expected_dimension,
                "unit `{}` cannot express a {} reading",
                record.unit,
                record.resource,
            );
            let value = record.unit.to_common_basis(record.quantity);
            let result = match record.resource {
                ResourceKind::Electricity => {
                    this.electricity.try_insert(record.month, KilowattHours(value))
                }
                ResourceKind::Gas => this.gas.try_insert(record.month, Ccf(value)),
                ResourceKind::Water => this.water.try_insert(record.month, Gallons(value)),
                ResourceKind::Waste => this.waste.try_insert(record.month, ShortTons(value)),
            };
            result.with_context(|| format!("invalid {} series", record.resource))?;
        }
        info!(
            electricity_months = this.electricity.len(),
            gas_months = this.gas.len(),
            water_months = this.water.len(),
            waste_months = this.waste.len(),
            "normalized utility readings"
        );
        Ok(this)
    }
}

/// Reservation-log normalization output for the analysis calendar.
///
/// Bookings are not a calendar series: the engine only needs counts, the
/// ghost split, and booked hours.
#[derive(Debug, Default, Serialize)]
pub struct BookingStatistics {
    pub total: usize,
    pub ghost: usize,
    pub attendees: u64,
    pub booked_hours: Hours,
    pub ghost_hours: Hours,
    pub by_attendance_type: BTreeMap<String, usize>,
}

impl BookingStatistics {
    /// Booked span assumed for all-day reservations, whose raw start/finish
    /// times produce a non-positive or implausible span.
    const ALL_DAY_HOURS: f64 = 15.0;

    #[instrument(skip_all, fields(n_records = records.len()))]
    pub fn normalize(
        records: &[BookingRecord],
        calendar: &Calendar,
        exempt_attendance_types: &[String],
    ) -> Self {
        let mut this = Self::default();
        let in_scope = |record: &&BookingRecord| {
            record.date.year() == calendar.year
                && Month::from_number(record.date.month())
                    .is_some_and(|month| calendar.contains(month))
        };
        for record in records.iter().filter(in_scope) {
            let hours = Self::booked_hours(record.start, record.finish);
            this.total += 1;
            this.attendees += u64::from(record.attendees);
            this.booked_hours += hours;
            *this.by_attendance_type.entry(record.attendance_type.clone()).or_default() += 1;

            let exempt = exempt_attendance_types
                .iter()
                .any(|exempted| exempted.eq_ignore_ascii_case(&record.attendance_type));
            if record.attendees == 0 && !exempt {
                this.ghost += 1;
                this.ghost_hours += hours;
            }
        }
        info!(total = this.total, ghost = this.ghost, "normalized reservation log");
        this
    }

    pub const fn utilized(&self) -> usize {
        self.total - self.ghost
    }

    #[expect(clippy::cast_precision_loss)]
    fn booked_hours(start: Option<NaiveTime>, finish: Option<NaiveTime>) -> Hours {
        let Some((start, finish)) = start.zip(finish) else {
            return Hours(Self::ALL_DAY_HOURS);
        };
        let hours = (finish - start).num_seconds() as f64 / 3600.0;
        if hours <= 0.0 || hours > 20.0 { Hours(Self::ALL_DAY_HOURS) } else { Hours(hours) }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{calendar::Month, quantity::convert::SourceUnit};

    fn calendar() -> Calendar {
        Calendar { year: 2025, months: vec![Month::Jan, Month::Feb, Month::Mar] }
    }

    fn booking(date: &str, attendees: u32, attendance_type: &str) -> BookingRecord {
        BookingRecord {
            date: date.parse::<NaiveDate>().unwrap(),
            room: "Room 133".to_string(),
            start: NaiveTime::from_hms_opt(9, 0, 0),
            finish: NaiveTime::from_hms_opt(10, 30, 0),
            attendees,
            attendance_type: attendance_type.to_string(),
        }
    }

    #[test]
    fn missing_badge_cells_are_zero_not_absent() {
        let records = [BadgeRecord {
            floor: "1".to_string(),
            swipes: vec![(Month::Jan, Some(10)), (Month::Feb, None), (Month::Mar, Some(5))],
        }];
        let occupancy = OccupancyStatistics::normalize(&records, &calendar());
        assert_eq!(occupancy.monthly_swipes.get(Month::Feb), Some(0.0));
        assert_eq!(occupancy.total_swipes(), 15.0);
        assert_eq!(occupancy.employee_totals, vec![15]);
    }

    #[test]
    fn duplicate_utility_month_is_fatal_for_the_series() {
        let records = [
            UtilityRecord {
                month: Month::Jan,
                resource: ResourceKind::Water,
                quantity: 5.978,
                unit: SourceUnit::MillionGallons,
            },
            UtilityRecord {
                month: Month::Jan,
                resource: ResourceKind::Water,
                quantity: 5.901,
                unit: SourceUnit::MillionGallons,
            },
        ];
        assert!(UtilityStatistics::normalize(&records, &calendar()).is_err());
    }

    #[test]
    fn unit_dimension_must_match_the_resource() {
        let records = [UtilityRecord {
            month: Month::Jan,
            resource: ResourceKind::Gas,
            quantity: 48.0,
            unit: SourceUnit::MegawattHours,
        }];
        assert!(UtilityStatistics::normalize(&records, &calendar()).is_err());
    }

    #[test]
    fn source_units_are_converted_to_the_common_basis() {
        let records = [UtilityRecord {
            month: Month::Jan,
            resource: ResourceKind::Gas,
            quantity: 48.0,
            unit: SourceUnit::KiloCcf,
        }];
        let utilities = UtilityStatistics::normalize(&records, &calendar()).unwrap();
        assert_eq!(utilities.gas.get(Month::Jan), Some(Ccf(48_000.0)));
    }

    #[test]
    fn default_booking_statistics_are_zeroed() {
        let stats = BookingStatistics::default();
        assert_eq!(stats.total, 0);
        assert_eq!(stats.utilized(), 0);
        assert_eq!(stats.booked_hours, Hours::ZERO);
        assert_eq!(stats.ghost_hours, Hours::ZERO);
    }

    #[test]
    fn bookings_filtered_to_the_calendar_and_split() {
        let records = [
            booking("2025-02-03", 0, "Team Meeting"),
            booking("2025-02-04", 12, "Team Meeting"),
            booking("2025-02-05", 0, "All Hands"),
            booking("2024-12-19", 0, "Team Meeting"),
            booking("2025-06-02", 4, "Team Meeting"),
        ];
        let stats = BookingStatistics::normalize(
            &records,
            &calendar(),
            &["All Hands".to_string()],
        );
        assert_eq!(stats.total, 3);
        assert_eq!(stats.ghost, 1);
        assert_eq!(stats.utilized(), 2);
    }

    #[test]
    fn implausible_booking_span_clamps_to_all_day() {
        let hours = BookingStatistics::booked_hours(
            NaiveTime::from_hms_opt(17, 0, 0),
            NaiveTime::from_hms_opt(9, 0, 0),
        );
        assert_eq!(hours, Hours(BookingStatistics::ALL_DAY_HOURS));
    }
}
