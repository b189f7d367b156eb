use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    calendar::{Calendar, Season},
    core::benchmark::Direction,
    prelude::*,
    quantity::{
        area::SquareFeet,
        cost::{
            Dollars,
            DollarsPerCcf,
            DollarsPerGallon,
            DollarsPerKilowattHour,
            KilowattHoursPerKiloGallon,
            PoundsPerCcf,
            PoundsPerKilowattHour,
        },
    },
};

/// Analysis configuration, loaded once from TOML. Configuration errors are
/// fatal: every downstream metric depends on these values.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub profile: BuildingProfile,
    pub calendar: Calendar,
    pub prices: UtilityPrices,
    pub emissions: EmissionFactors,
    pub utilization: UtilizationBins,
    pub seasons: SurgeSeasons,

    #[serde(default)]
    pub bookings: BookingPolicy,

    #[serde(default)]
    pub benchmarks: Vec<BenchmarkTableConfig>,

    #[serde(default)]
    pub scenario: Vec<ScenarioStepConfig>,
}

impl Config {
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read `{}`", path.display()))?;
        let this: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse `{}`", path.display()))?;
        this.validate()?;
        Ok(this)
    }

    pub fn validate(&self) -> Result {
        self.profile.validate()?;
        self.calendar.validate()?;
        self.utilization.validate()?;
        self.seasons.validate()?;
        for table in &self.benchmarks {
            table.validate()?;
        }
        for step in &self.scenario {
            ensure!(
                step.annual_savings >= Dollars::ZERO,
                "scenario step `{}` has negative savings",
                step.label,
            );
        }
        Ok(())
    }
}

/// Static description of the subject building.
///
/// All per-area and per-head metrics divide by these fields, so the square
/// footage and head count must be strictly positive.
#[derive(Debug, Serialize, Deserialize)]
pub struct BuildingProfile {
    pub square_footage: SquareFeet,
    pub employee_count: u32,
    pub working_days_per_year: u32,

    /// Optional per-floor square footage for the floor-efficiency breakdown.
    #[serde(default)]
    pub floors: BTreeMap<String, SquareFeet>,
}

impl BuildingProfile {
    pub fn validate(&self) -> Result {
        ensure!(
            self.square_footage > SquareFeet::ZERO,
            "building square footage must be strictly positive",
        );
        ensure!(self.employee_count > 0, "employee count must be strictly positive");
        ensure!(self.working_days_per_year > 0, "working days per year must be strictly positive");
        Ok(())
    }

    /// Working days in one month, derived from the annual figure.
    pub fn working_days_per_month(&self) -> f64 {
        f64::from(self.working_days_per_year) / 12.0
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UtilityPrices {
    pub electricity: DollarsPerKilowattHour,
    pub gas: DollarsPerCcf,
    pub water: DollarsPerGallon,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EmissionFactors {
    pub electricity: PoundsPerKilowattHour,
    pub gas: PoundsPerCcf,

    /// Embedded energy of municipal water supply plus wastewater treatment.
    pub water_embedded_energy: KilowattHoursPerKiloGallon,
}

/// Ordered, non-overlapping annual-swipe bins for utilization tiers.
///
/// `boundaries = [30, 90, 140]` with four labels reads: `<30`, `[30, 90)`,
/// `[90, 140)`, `>=140`.
#[derive(Debug, Serialize, Deserialize)]
pub struct UtilizationBins {
    pub boundaries: Vec<u32>,
    pub labels: Vec<String>,
}

impl UtilizationBins {
    pub fn validate(&self) -> Result {
        ensure!(!self.boundaries.is_empty(), "utilization bins need at least one boundary");
        ensure!(
            self.boundaries.is_sorted_by(|lhs, rhs| lhs < rhs),
            "utilization bin boundaries must be strictly increasing",
        );
        ensure!(
            self.labels.len() == self.boundaries.len() + 1,
            "expected {} utilization labels, got {}",
            self.boundaries.len() + 1,
            self.labels.len(),
        );
        Ok(())
    }

    /// Bin position of an annual swipe total, in label order.
    pub fn bin_index(&self, annual_swipes: u32) -> usize {
        self.boundaries.partition_point(|boundary| annual_swipes >= *boundary)
    }

    pub fn classify(&self, annual_swipes: u32) -> &str {
        &self.labels[self.bin_index(annual_swipes)]
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SurgeSeasons {
    pub baseline: Season,
    pub surge: Season,
}

impl SurgeSeasons {
    pub fn validate(&self) -> Result {
        ensure!(!self.baseline.0.is_empty(), "baseline season must cover at least one month");
        ensure!(!self.surge.0.is_empty(), "surge season must cover at least one month");
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingPolicy {
    /// Attendance types whose zero-attendee bookings are not ghosts
    /// (badge-free entry, e.g. all-hands meetings).
    pub exempt_attendance_types: Vec<String>,

    /// HVAC and lighting draw attributed to one conditioned room-hour.
    pub kwh_per_ghost_hour: f64,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self { exempt_attendance_types: Vec::new(), kwh_per_ghost_hour: 5.0 }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BenchmarkTableConfig {
    pub metric: BenchmarkMetric,
    pub direction: Direction,
    pub tiers: Vec<BenchmarkTierConfig>,
}

impl BenchmarkTableConfig {
    fn validate(&self) -> Result {
        ensure!(
            !self.tiers.is_empty(),
            "benchmark table for {:?} has no reference tiers",
            self.metric,
        );
        Ok(())
    }
}

/// Computed metric a benchmark table applies to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BenchmarkMetric {
    Eui,
    Wui,
    Waui,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BenchmarkTierConfig {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScenarioStepConfig {
    pub label: String,
    pub annual_savings: Dollars,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> BuildingProfile {
        BuildingProfile {
            square_footage: SquareFeet(181_616.0),
            employee_count: 356,
            working_days_per_year: 240,
            floors: BTreeMap::new(),
        }
    }

    #[test]
    fn non_positive_square_footage_is_a_configuration_error() {
        let mut profile = profile();
        profile.square_footage = SquareFeet(0.0);
        assert!(profile.validate().is_err());
    }

    #[test]
    fn zero_employees_is_a_configuration_error() {
        let mut profile = profile();
        profile.employee_count = 0;
        assert!(profile.validate().is_err());
    }

    #[test]
    fn bins_classify_into_ordered_non_overlapping_tiers() {
        let bins = UtilizationBins {
            boundaries: vec![30, 90, 140],
            labels: vec!["Very Low", "Low", "Medium", "High"]
                .into_iter()
                .map(str::to_string)
                .collect(),
        };
        bins.validate().unwrap();
        assert_eq!(bins.classify(0), "Very Low");
        assert_eq!(bins.classify(29), "Very Low");
        assert_eq!(bins.classify(30), "Low");
        assert_eq!(bins.classify(89), "Low");
        assert_eq!(bins.classify(90), "Medium");
        assert_eq!(bins.classify(140), "High");
        assert_eq!(bins.classify(220), "High");
    }

    #[test]
    fn unsorted_bins_are_rejected() {
        let bins = UtilizationBins {
            boundaries: vec![90, 30],
            labels: vec!["a".to_string(), "b".to_string(), "c".to_string()],
        };
        assert!(bins.validate().is_err());
    }

    #[test]
    fn parses_reference_config() {
        let config: Config = toml::from_str(include_str!("../analysis.toml")).unwrap();
        config.validate().unwrap();
        assert_eq!(config.profile.employee_count, 356);
        assert_eq!(config.calendar.months.len(), 9);
        assert_eq!(config.benchmarks.len(), 2);
    }
}
