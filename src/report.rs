//! Assembly of one analysis run into a single serializable report.
//!
//! The report is the contract between the engine and the output layers: the
//! tables render it, `--json` serializes it verbatim.

use std::ops::{Div, Sub};

use serde::Serialize;

use crate::{
    calendar::Month,
    config::{BenchmarkMetric, BenchmarkTableConfig, Config},
    core::{
        benchmark::{BenchmarkTable, Direction},
        metrics::{
            DerivedMetric,
            FloorEfficiency,
            MetricEngine,
            MetricValue,
            MonthOverMonth,
            ResourcePeaks,
            TierCount,
            WaterProfile,
        },
        scenario::{self, CumulativePoint, ScenarioStep},
    },
    prelude::*,
    quantity::{
        cost::Dollars,
        energy::KilowattHoursPerSquareFoot,
        mass::PoundsPerSquareFoot,
        percent::Percent,
        volume::GallonsPerSquareFoot,
    },
};

#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    pub metrics: Vec<DerivedMetric>,
    pub monthly: Vec<MonthlyRow>,
    pub utilization: Vec<TierCount>,
    pub floors: Vec<FloorEfficiency>,
    pub month_over_month: Vec<MonthOverMonth>,
    pub water: WaterProfile,
    pub peaks: Vec<ResourcePeaks>,
    pub benchmarks: Vec<BenchmarkReport>,
    pub scenario: Vec<CumulativePoint>,
}

#[derive(Debug, Serialize)]
pub struct MonthlyRow {
    pub month: Month,
    pub swipes: f64,
    pub attendance: Percent,
    pub cost_per_swipe: MetricValue<Dollars>,
}

/// One rendered benchmark table. An undefined subject metric produces a
/// report with the undefined reason and no tier comparisons; the run goes on.
#[derive(Debug, Serialize)]
pub struct BenchmarkReport {
    pub metric: BenchmarkMetric,
    pub unit: &'static str,
    pub direction: Direction,
    pub subject: MetricValue<f64>,
    pub tiers: Vec<TierComparison>,
}

#[derive(Debug, Serialize)]
pub struct TierComparison {
    pub rank: usize,
    pub label: String,
    pub value: f64,
    /// Tier value with the subject building as the 100% reference.
    pub percentage_of_baseline: MetricValue<Percent>,
    /// `subject / tier`; above 1 reads "worse" for a lower-is-better metric.
    pub ratio_to_tier: MetricValue<f64>,
    pub excess_per_square_foot: f64,
    /// Annualized spend attributable to the excess, when the resource has a
    /// configured price.
    pub annual_excess_cost: Option<Dollars>,
}

impl AnalysisReport {
    pub fn assemble(engine: &MetricEngine<'_>, config: &Config) -> Result<Self> {
        let monthly = engine
            .monthly_attendance()
            .into_iter()
            .zip(engine.monthly_cost_per_swipe())
            .map(|((month, attendance), (_, cost_per_swipe))| MonthlyRow {
                month,
                swipes: engine.monthly_swipes().get(month).unwrap_or_default(),
                attendance,
                cost_per_swipe,
            })
            .collect();
        let benchmarks =
            config.benchmarks.iter().map(|table| benchmark_report(engine, config, table)).collect::<Result<_>>()?;
        let steps: Vec<ScenarioStep> = config
            .scenario
            .iter()
            .map(|step| ScenarioStep {
                label: step.label.clone(),
                annual_savings: step.annual_savings,
            })
            .collect();
        Ok(Self {
            metrics: engine.derived_metrics(),
            monthly,
            utilization: engine.utilization_tiers(),
            floors: engine.floor_efficiency(),
            month_over_month: engine.month_over_month_swipes(),
            water: engine.water_profile(),
            peaks: engine.resource_peaks(),
            benchmarks,
            scenario: scenario::project(&steps),
        })
    }
}

fn benchmark_report(
    engine: &MetricEngine<'_>,
    config: &Config,
    table: &BenchmarkTableConfig,
) -> Result<BenchmarkReport> {
    let area = config.profile.square_footage;
    match table.metric {
        BenchmarkMetric::Eui => build(
            table,
            KilowattHoursPerSquareFoot::UNIT,
            engine.eui(),
            KilowattHoursPerSquareFoot,
            |value| value.0,
            |excess| Some(excess * area * config.prices.electricity),
        ),
        BenchmarkMetric::Wui => build(
            table,
            GallonsPerSquareFoot::UNIT,
            engine.wui(),
            GallonsPerSquareFoot,
            |value| value.0,
            |excess| Some(excess * area * config.prices.water),
        ),
        // Waste carries no configured price.
        BenchmarkMetric::Waui => build(
            table,
            PoundsPerSquareFoot::UNIT,
            engine.waui(),
            PoundsPerSquareFoot,
            |value| value.0,
            |_| None,
        ),
    }
}

fn build<V>(
    config: &BenchmarkTableConfig,
    unit: &'static str,
    subject: MetricValue<V>,
    lift: fn(f64) -> V,
    as_scalar: impl Fn(V) -> f64,
    annual_excess_cost: impl Fn(V) -> Option<Dollars>,
) -> Result<BenchmarkReport>
where
    V: Copy + PartialOrd + Div<Output = f64> + Sub<Output = V>,
{
    let subject = match subject {
        MetricValue::Defined(subject) => subject,
        MetricValue::Undefined(reason) => {
            warn!(metric = ?config.metric, %reason, "benchmark comparison skipped");
            return Ok(BenchmarkReport {
                metric: config.metric,
                unit,
                direction: config.direction,
                subject: MetricValue::Undefined(reason),
                tiers: Vec::new(),
            });
        }
    };
    let table = BenchmarkTable::try_new(
        "This building",
        subject,
        config.direction,
        config.tiers.iter().map(|tier| (tier.label.clone(), lift(tier.value))),
    )?;
    let tiers = table
        .reference_tiers()
        .iter()
        .map(|tier| {
            let excess = table.excess_over(tier);
            TierComparison {
                rank: tier.rank,
                label: tier.label.clone(),
                value: as_scalar(tier.value),
                percentage_of_baseline: table.percentage_of_baseline(tier),
                ratio_to_tier: table.ratio_to(tier),
                excess_per_square_foot: as_scalar(excess),
                annual_excess_cost: annual_excess_cost(excess),
            }
        })
        .collect();
    Ok(BenchmarkReport {
        metric: config.metric,
        unit,
        direction: config.direction,
        subject: MetricValue::Defined(as_scalar(subject)),
        tiers,
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::{
        calendar::Calendar,
        core::normalize::{BookingStatistics, OccupancyStatistics, UtilityStatistics},
        core::records::UtilityRecord,
        quantity::convert::SourceUnit,
    };

    fn config() -> Config {
        let raw = r#"
            [profile]
            square_footage = 181616
            employee_count = 356
            working_days_per_year = 240

            [calendar]
            year = 2025
            months = ["jan", "feb", "mar"]

            [prices]
            electricity = 0.15
            gas = 1.20
            water = 0.01

            [emissions]
            electricity = 0.92
            gas = 11.7
            water_embedded_energy = 27.5

            [utilization]
            boundaries = [30, 90, 140]
            labels = ["Very Low", "Low", "Medium", "High"]

            [seasons]
            baseline = ["jan", "feb"]
            surge = ["mar"]

            [[benchmarks]]
            metric = "wui"
            direction = "lower-is-better"
            tiers = [
                { label = "Typical office", value = 250.0 },
                { label = "Efficient office", value = 175.0 },
                { label = "Excellent office", value = 100.0 },
            ]

            [[scenario]]
            label = "Smart HVAC"
            annual_savings = 30000.0
        "#;
        let config: Config = toml::from_str(raw).unwrap();
        config.validate().unwrap();
        config
    }

    fn utilities(calendar: &Calendar) -> UtilityStatistics {
        let records: Vec<UtilityRecord> = [Month::Jan, Month::Feb, Month::Mar]
            .into_iter()
            .flat_map(|month| {
                [
                    UtilityRecord {
                        month,
                        resource: "electricity".parse().unwrap(),
                        quantity: 450_000.0,
                        unit: SourceUnit::KilowattHours,
                    },
                    UtilityRecord {
                        month,
                        resource: "gas".parse().unwrap(),
                        quantity: 40_000.0,
                        unit: SourceUnit::Ccf,
                    },
                    UtilityRecord {
                        month,
                        resource: "water".parse().unwrap(),
                        quantity: 43_259_000.0,
                        unit: SourceUnit::Gallons,
                    },
                ]
            })
            .collect();
        UtilityStatistics::normalize(&records, calendar).unwrap()
    }

    #[test]
    fn benchmark_tiers_are_percentages_of_the_subject() {
        let config = config();
        let occupancy = OccupancyStatistics::normalize(&[], &config.calendar);
        let utilities = utilities(&config.calendar);
        let bookings = BookingStatistics::default();
        let engine = MetricEngine::builder()
            .profile(&config.profile)
            .calendar(&config.calendar)
            .prices(&config.prices)
            .emissions(&config.emissions)
            .bins(&config.utilization)
            .seasons(&config.seasons)
            .booking_policy(&config.bookings)
            .occupancy(&occupancy)
            .utilities(&utilities)
            .bookings(&bookings)
            .build();
        let report = AnalysisReport::assemble(&engine, &config).unwrap();

        assert_eq!(report.benchmarks.len(), 1);
        let benchmark = &report.benchmarks[0];
        // 129,777,000 gal over 181,616 sqft.
        let MetricValue::Defined(subject) = benchmark.subject else {
            panic!("WUI must be defined");
        };
        assert_abs_diff_eq!(subject, 714.6, epsilon = 0.1);
        let excellent = &benchmark.tiers[2];
        let MetricValue::Defined(share) = excellent.percentage_of_baseline else {
            panic!("tier percentage must be defined");
        };
        assert_abs_diff_eq!(share.0, 14.0, epsilon = 0.1);
        assert!(matches!(excellent.ratio_to_tier, MetricValue::Defined(ratio) if ratio > 1.0));
        // Positive excess priced through the water rate.
        assert!(excellent.excess_per_square_foot > 0.0);
        let cost = excellent.annual_excess_cost.unwrap();
        assert_abs_diff_eq!(cost.0, (714.567 - 100.0) * 181_616.0 * 0.01, epsilon = 500.0);

        // Scenario starts from the zero baseline.
        assert_eq!(report.scenario[0].cumulative, Dollars::ZERO);
        assert_eq!(report.scenario[1].cumulative, Dollars(30_000.0));

        // An undefined per-month ratio is carried, not dropped.
        assert_eq!(report.monthly.len(), 3);
        assert!(matches!(report.monthly[0].cost_per_swipe, MetricValue::Undefined(_)));
    }

    #[test]
    fn undefined_subject_yields_an_empty_benchmark_table() {
        let config = config();
        let occupancy = OccupancyStatistics::normalize(&[], &config.calendar);
        let utilities = UtilityStatistics::default();
        let bookings = BookingStatistics::default();
        let engine = MetricEngine::builder()
            .profile(&config.profile)
            .calendar(&config.calendar)
            .prices(&config.prices)
            .emissions(&config.emissions)
            .bins(&config.utilization)
            .seasons(&config.seasons)
            .booking_policy(&config.bookings)
            .occupancy(&occupancy)
            .utilities(&utilities)
            .bookings(&bookings)
            .build();
        let report = AnalysisReport::assemble(&engine, &config).unwrap();
        let benchmark = &report.benchmarks[0];
        assert!(matches!(benchmark.subject, MetricValue::Undefined(_)));
        assert!(benchmark.tiers.is_empty());
    }
}
