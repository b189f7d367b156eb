use std::iter::Sum;

use bon::Builder;
use enumset::EnumSet;
use itertools::Itertools;
use serde::Serialize;

use crate::{
    calendar::{Calendar, Month},
    config::{BookingPolicy, BuildingProfile, EmissionFactors, SurgeSeasons, UtilityPrices, UtilizationBins},
    core::{
        normalize::{BookingStatistics, OccupancyStatistics, UtilityStatistics},
        records::ResourceKind,
        series::{Deltas, MonthlySeries},
    },
    quantity::{
        area::SquareFeet,
        cost::Dollars,
        energy::{KilowattHours, KilowattHoursPerSquareFoot},
        mass::{PoundsPerSquareFoot, ShortTons},
        percent::Percent,
        volume::{Ccf, CcfPerSquareFoot, Gallons, GallonsPerSquareFoot},
    },
};

/// Why a metric could not be computed. Carried inside the metric instead of
/// a NaN or an infinity, and rendered verbatim for the reader.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub enum UndefinedReason {
    ZeroDenominator(&'static str),
    NoObservations(&'static str),
    IncompleteYear { series: &'static str, missing: EnumSet<Month> },
    MissingMonth { series: &'static str, month: Month },
}

impl std::fmt::Display for UndefinedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroDenominator(denominator) => {
                write!(f, "division by zero: {denominator} is zero")
            }
            Self::NoObservations(what) => write!(f, "no observations for {what}"),
            Self::IncompleteYear { series, missing } => {
                write!(f, "{series} is missing {}", missing.iter().join(", "))
            }
            Self::MissingMonth { series, month } => {
                write!(f, "{series} has no reading for {month}")
            }
        }
    }
}

/// A computed value or an explicit reason it is undefined.
///
/// One undefined metric never aborts the batch; it travels to the report as
/// data.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricValue<V> {
    Defined(V),
    Undefined(UndefinedReason),
}

impl<V> MetricValue<V> {
    pub fn map<U>(self, map: impl FnOnce(V) -> U) -> MetricValue<U> {
        match self {
            Self::Defined(value) => MetricValue::Defined(map(value)),
            Self::Undefined(reason) => MetricValue::Undefined(reason),
        }
    }

    /// Chain a dependent computation, propagating the first undefined reason.
    pub fn and_then<U>(self, map: impl FnOnce(V) -> MetricValue<U>) -> MetricValue<U> {
        match self {
            Self::Defined(value) => map(value),
            Self::Undefined(reason) => MetricValue::Undefined(reason),
        }
    }

    pub fn defined(self) -> Option<V> {
        match self {
            Self::Defined(value) => Some(value),
            Self::Undefined(_) => None,
        }
    }

    fn from_option(value: Option<V>, reason: UndefinedReason) -> Self {
        value.map_or(Self::Undefined(reason), Self::Defined)
    }
}

impl<V: std::fmt::Display> std::fmt::Display for MetricValue<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Defined(value) => std::fmt::Display::fmt(value, f),
            Self::Undefined(reason) => write!(f, "undefined ({reason})"),
        }
    }
}

/// Denominator a metric is normalized by.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Basis {
    PerArea,
    PerHead,
    PerEvent,
    Absolute,
}

/// One named output metric. Never mutated after creation.
#[derive(Copy, Clone, Debug, Serialize)]
pub struct DerivedMetric {
    pub name: &'static str,
    pub value: MetricValue<f64>,
    pub unit: &'static str,
    pub basis: Basis,
}

#[derive(Copy, Clone, Debug, Serialize)]
pub struct Co2Breakdown {
    pub electricity: ShortTons,
    pub gas: ShortTons,
    pub water_embedded: ShortTons,
}

impl Co2Breakdown {
    pub fn total(&self) -> ShortTons {
        self.electricity + self.gas + self.water_embedded
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct TierCount {
    pub label: String,
    pub count: usize,
    pub share: Percent,
}

#[derive(Clone, Debug, Serialize)]
pub struct FloorEfficiency {
    pub floor: String,
    pub employees: usize,
    pub swipes: u64,
    pub square_footage: Option<SquareFeet>,
    pub swipes_per_square_foot: Option<f64>,
    pub attendance: MetricValue<Percent>,
}

/// Seasonal water consumption profile around the surge analysis.
#[derive(Copy, Clone, Debug, Serialize)]
pub struct WaterProfile {
    pub baseline_mean: Option<Gallons>,
    pub surge_mean: Option<Gallons>,
    pub surge_ratio: MetricValue<f64>,
}

/// Highest and lowest observed month of one resource series.
#[derive(Copy, Clone, Debug, Serialize)]
pub struct ResourcePeaks {
    pub resource: ResourceKind,
    pub unit: &'static str,
    pub peak: Option<(Month, f64)>,
    pub trough: Option<(Month, f64)>,
}

#[derive(Copy, Clone, Debug, Serialize)]
pub struct MonthOverMonth {
    pub from: Month,
    pub to: Month,
    pub change: MetricValue<Percent>,
}

/// Pure derivation of every metric for one analysis run.
///
/// The engine borrows validated configuration and normalized series; it holds
/// no state of its own and each method is a pure function of them.
#[derive(Builder)]
pub struct MetricEngine<'a> {
    profile: &'a BuildingProfile,
    calendar: &'a Calendar,
    prices: &'a UtilityPrices,
    emissions: &'a EmissionFactors,
    bins: &'a UtilizationBins,
    seasons: &'a SurgeSeasons,
    booking_policy: &'a BookingPolicy,
    occupancy: &'a OccupancyStatistics,
    utilities: &'a UtilityStatistics,
    bookings: &'a BookingStatistics,
}

impl MetricEngine<'_> {
    fn annual_total<V>(&self, series: &MonthlySeries<V>, name: &'static str) -> MetricValue<V>
    where
        V: Copy + Sum,
    {
        if series.is_empty() {
            return MetricValue::Undefined(UndefinedReason::NoObservations(name));
        }
        MetricValue::from_option(
            series.calendar_total(self.calendar),
            UndefinedReason::IncompleteYear { series: name, missing: series.missing_in(self.calendar) },
        )
    }

    /// Share of possible attendance days actually used, as a percentage.
    ///
    /// The denominator is `employee_count * working_days_per_year`: the total
    /// number of badge-swipe days the workforce could have produced in a full
    /// year. This is the single most misread denominator in the source data,
    /// hence it is spelled out here.
    pub fn occupancy_rate(&self) -> MetricValue<Percent> {
        let possible_days =
            f64::from(self.profile.employee_count) * f64::from(self.profile.working_days_per_year);
        if possible_days == 0.0 {
            return MetricValue::Undefined(UndefinedReason::ZeroDenominator(
                "employee-count * working-days denominator",
            ));
        }
        MetricValue::Defined(Percent::from_proportion(
            self.occupancy.total_swipes() / possible_days,
        ))
    }

    /// Average days in office per employee per month.
    pub fn average_days_in_office(&self) -> MetricValue<f64> {
        let employees = f64::from(self.profile.employee_count);
        MetricValue::from_option(
            self.occupancy.monthly_swipes.mean().map(|mean| mean / employees),
            UndefinedReason::NoObservations("badge swipes"),
        )
    }

    pub fn monthly_swipes(&self) -> &MonthlySeries<f64> {
        &self.occupancy.monthly_swipes
    }

    /// Per-month attendance rate against the derived days-per-month figure.
    pub fn monthly_attendance(&self) -> Vec<(Month, Percent)> {
        let possible =
            f64::from(self.profile.employee_count) * self.profile.working_days_per_month();
        self.occupancy
            .monthly_swipes
            .iter()
            .map(|(month, swipes)| (month, Percent::from_proportion(swipes / possible)))
            .collect()
    }

    /// Energy use intensity: annual electricity over building area.
    pub fn eui(&self) -> MetricValue<KilowattHoursPerSquareFoot> {
        self.annual_total(&self.utilities.electricity, "electricity")
            .map(|total| total / self.profile.square_footage)
    }

    /// Gas use intensity: annual gas over building area.
    pub fn gas_intensity(&self) -> MetricValue<CcfPerSquareFoot> {
        self.annual_total(&self.utilities.gas, "gas")
            .map(|total| total / self.profile.square_footage)
    }

    /// Water use intensity: annual water over building area.
    pub fn wui(&self) -> MetricValue<GallonsPerSquareFoot> {
        self.annual_total(&self.utilities.water, "water")
            .map(|total| total / self.profile.square_footage)
    }

    /// Waste use intensity: annual waste mass over building area.
    pub fn waui(&self) -> MetricValue<PoundsPerSquareFoot> {
        self.annual_total(&self.utilities.waste, "waste")
            .map(|total| total.to_pounds() / self.profile.square_footage)
    }

    /// Annual priced utility spend over the analysis calendar.
    pub fn annual_cost(&self) -> MetricValue<Dollars> {
        self.annual_total(&self.utilities.electricity, "electricity").and_then(|electricity| {
            self.annual_total(&self.utilities.gas, "gas").and_then(|gas| {
                self.annual_total(&self.utilities.water, "water").map(|water| {
                    electricity * self.prices.electricity
                        + gas * self.prices.gas
                        + water * self.prices.water
                })
            })
        })
    }

    pub fn cost_per_swipe(&self) -> MetricValue<Dollars> {
        let swipes = self.occupancy.total_swipes();
        if swipes == 0.0 {
            return MetricValue::Undefined(UndefinedReason::ZeroDenominator("annual swipe total"));
        }
        self.annual_cost().map(|cost| cost / swipes)
    }

    /// Per-month priced spend per swipe. A month with no swipes or a missing
    /// utility reading yields an undefined entry, not a zero.
    pub fn monthly_cost_per_swipe(&self) -> Vec<(Month, MetricValue<Dollars>)> {
        self.calendar
            .months
            .iter()
            .map(|month| {
                let value = self.month_cost(*month).and_then(|cost| {
                    match self.occupancy.monthly_swipes.get(*month) {
                        Some(swipes) if swipes > 0.0 => MetricValue::Defined(cost / swipes),
                        _ => MetricValue::Undefined(UndefinedReason::ZeroDenominator(
                            "monthly swipes",
                        )),
                    }
                });
                (*month, value)
            })
            .collect()
    }

    fn month_cost(&self, month: Month) -> MetricValue<Dollars> {
        fn reading<V: Copy>(
            series: &MonthlySeries<V>,
            name: &'static str,
            month: Month,
        ) -> MetricValue<V> {
            MetricValue::from_option(
                series.get(month),
                UndefinedReason::MissingMonth { series: name, month },
            )
        }

        reading(&self.utilities.electricity, "electricity", month).and_then(|electricity| {
            reading(&self.utilities.gas, "gas", month).and_then(|gas| {
                reading(&self.utilities.water, "water", month).map(|water| {
                    electricity * self.prices.electricity
                        + gas * self.prices.gas
                        + water * self.prices.water
                })
            })
        })
    }

    pub fn ghost_booking_ratio(&self) -> MetricValue<Percent> {
        if self.bookings.total == 0 {
            return MetricValue::Undefined(UndefinedReason::NoObservations("bookings"));
        }
        #[expect(clippy::cast_precision_loss)]
        let ratio = self.bookings.ghost as f64 / self.bookings.total as f64;
        MetricValue::Defined(Percent::from_proportion(ratio))
    }

    /// Complement of the ghost ratio, so the two always sum to exactly 100%.
    pub fn utilized_booking_ratio(&self) -> MetricValue<Percent> {
        self.ghost_booking_ratio().map(|ghost| Percent(100.0 - ghost.0))
    }

    /// Energy conditioned into rooms nobody attended.
    pub fn ghost_wasted_energy(&self) -> KilowattHours {
        KilowattHours(self.bookings.ghost_hours.0 * self.booking_policy.kwh_per_ghost_hour)
    }

    /// Ghost-booking energy cost extrapolated to a full year.
    #[expect(clippy::cast_precision_loss)]
    pub fn ghost_wasted_cost_annualized(&self) -> Dollars {
        let annualization = 12.0 / self.calendar.months.len() as f64;
        self.ghost_wasted_energy() * self.prices.electricity * annualization
    }

    /// Annual CO2 emissions: direct factors for electricity and gas, plus
    /// the embedded energy of water supply and treatment priced through the
    /// grid electricity factor.
    pub fn co2(&self) -> MetricValue<Co2Breakdown> {
        self.annual_total(&self.utilities.electricity, "electricity").and_then(|electricity| {
            self.annual_total(&self.utilities.gas, "gas").and_then(|gas| {
                self.annual_total(&self.utilities.water, "water").map(|water| Co2Breakdown {
                    electricity: (electricity * self.emissions.electricity).to_short_tons(),
                    gas: (gas * self.emissions.gas).to_short_tons(),
                    water_embedded: ((water * self.emissions.water_embedded_energy)
                        * self.emissions.electricity)
                        .to_short_tons(),
                })
            })
        })
    }

    /// Surge-season water average over baseline-season average. Absent or
    /// zero baseline months make the ratio undefined, never infinite.
    pub fn water_surge_ratio(&self) -> MetricValue<f64> {
        let Some(baseline) = self.utilities.water.season_mean(self.seasons.baseline) else {
            return MetricValue::Undefined(UndefinedReason::NoObservations(
                "baseline-season water",
            ));
        };
        let Some(surge) = self.utilities.water.season_mean(self.seasons.surge) else {
            return MetricValue::Undefined(UndefinedReason::NoObservations("surge-season water"));
        };
        let ratio = surge / baseline;
        if ratio.is_finite() {
            MetricValue::Defined(ratio)
        } else {
            MetricValue::Undefined(UndefinedReason::ZeroDenominator("baseline-season average"))
        }
    }

    pub fn water_profile(&self) -> WaterProfile {
        WaterProfile {
            baseline_mean: self.utilities.water.season_mean(self.seasons.baseline),
            surge_mean: self.utilities.water.season_mean(self.seasons.surge),
            surge_ratio: self.water_surge_ratio(),
        }
    }

    /// Peak and trough months for every metered resource, empty series
    /// included so the report always lists all four.
    pub fn resource_peaks(&self) -> Vec<ResourcePeaks> {
        fn peaks<V: Copy + Ord>(
            resource: ResourceKind,
            unit: &'static str,
            series: &MonthlySeries<V>,
            as_scalar: fn(V) -> f64,
        ) -> ResourcePeaks {
            ResourcePeaks {
                resource,
                unit,
                peak: series.peak().map(|(month, value)| (month, as_scalar(value))),
                trough: series.trough().map(|(month, value)| (month, as_scalar(value))),
            }
        }

        vec![
            peaks(
                ResourceKind::Electricity,
                KilowattHours::UNIT,
                &self.utilities.electricity,
                |value| value.0,
            ),
            peaks(ResourceKind::Gas, Ccf::UNIT, &self.utilities.gas, |value| value.0),
            peaks(ResourceKind::Water, Gallons::UNIT, &self.utilities.water, |value| value.0),
            peaks(ResourceKind::Waste, ShortTons::UNIT, &self.utilities.waste, |value| value.0),
        ]
    }

    /// Employee counts per configured annual-swipe bin, in bin order.
    pub fn utilization_tiers(&self) -> Vec<TierCount> {
        let mut counts = vec![0_usize; self.bins.labels.len()];
        for total in &self.occupancy.employee_totals {
            counts[self.bins.bin_index(*total)] += 1;
        }
        #[expect(clippy::cast_precision_loss)]
        let denominator = self.occupancy.employee_totals.len().max(1) as f64;
        self.bins
            .labels
            .iter()
            .zip(counts)
            .map(|(label, count)| {
                #[expect(clippy::cast_precision_loss)]
                let share = Percent::from_proportion(count as f64 / denominator);
                TierCount { label: label.clone(), count, share }
            })
            .collect()
    }

    /// Per-floor swipe density and attendance, using the configured per-floor
    /// square footage when available.
    pub fn floor_efficiency(&self) -> Vec<FloorEfficiency> {
        #[expect(clippy::cast_precision_loss)]
        let calendar_share = self.calendar.months.len() as f64 / 12.0;
        self.occupancy
            .floors
            .iter()
            .map(|(floor, totals)| {
                let square_footage = self.profile.floors.get(floor).copied();
                #[expect(clippy::cast_precision_loss)]
                let swipes = totals.swipes as f64;
                #[expect(clippy::cast_precision_loss)]
                let possible_days = totals.employees as f64
                    * f64::from(self.profile.working_days_per_year)
                    * calendar_share;
                let attendance = if possible_days == 0.0 {
                    MetricValue::Undefined(UndefinedReason::ZeroDenominator(
                        "floor employee count",
                    ))
                } else {
                    MetricValue::Defined(Percent::from_proportion(swipes / possible_days))
                };
                FloorEfficiency {
                    floor: floor.clone(),
                    employees: totals.employees,
                    swipes: totals.swipes,
                    square_footage,
                    swipes_per_square_foot: square_footage.map(|area| swipes / area.0),
                    attendance,
                }
            })
            .collect()
    }

    /// Month-over-month swipe change, undefined across a zero month.
    pub fn month_over_month_swipes(&self) -> Vec<MonthOverMonth> {
        self.occupancy
            .monthly_swipes
            .iter()
            .map(|(month, swipes)| (month, *swipes))
            .deltas()
            .map(|((from, to), (previous, current))| MonthOverMonth {
                from,
                to,
                change: if previous == 0.0 {
                    MetricValue::Undefined(UndefinedReason::ZeroDenominator(
                        "previous month swipes",
                    ))
                } else {
                    MetricValue::Defined(Percent::from_proportion(current / previous - 1.0))
                },
            })
            .collect()
    }

    /// The scalar metric batch. Structured outputs (tiers, floors, benchmark
    /// tables, scenario) are produced separately.
    pub fn derived_metrics(&self) -> Vec<DerivedMetric> {
        let co2 = self.co2();
        vec![
            DerivedMetric {
                name: "occupancy_rate",
                value: self.occupancy_rate().map(|percent| percent.0),
                unit: "%",
                basis: Basis::PerHead,
            },
            DerivedMetric {
                name: "average_days_in_office",
                value: self.average_days_in_office(),
                unit: "days/employee/month",
                basis: Basis::PerHead,
            },
            DerivedMetric {
                name: "eui",
                value: self.eui().map(|intensity| intensity.0),
                unit: KilowattHoursPerSquareFoot::UNIT,
                basis: Basis::PerArea,
            },
            DerivedMetric {
                name: "gas_intensity",
                value: self.gas_intensity().map(|intensity| intensity.0),
                unit: CcfPerSquareFoot::UNIT,
                basis: Basis::PerArea,
            },
            DerivedMetric {
                name: "wui",
                value: self.wui().map(|intensity| intensity.0),
                unit: GallonsPerSquareFoot::UNIT,
                basis: Basis::PerArea,
            },
            DerivedMetric {
                name: "waui",
                value: self.waui().map(|intensity| intensity.0),
                unit: PoundsPerSquareFoot::UNIT,
                basis: Basis::PerArea,
            },
            DerivedMetric {
                name: "annual_utility_cost",
                value: self.annual_cost().map(|cost| cost.0),
                unit: Dollars::UNIT,
                basis: Basis::Absolute,
            },
            DerivedMetric {
                name: "cost_per_swipe",
                value: self.cost_per_swipe().map(|cost| cost.0),
                unit: "USD/swipe",
                basis: Basis::PerEvent,
            },
            DerivedMetric {
                name: "ghost_booking_ratio",
                value: self.ghost_booking_ratio().map(|percent| percent.0),
                unit: "%",
                basis: Basis::PerEvent,
            },
            DerivedMetric {
                name: "utilized_booking_ratio",
                value: self.utilized_booking_ratio().map(|percent| percent.0),
                unit: "%",
                basis: Basis::PerEvent,
            },
            DerivedMetric {
                name: "ghost_wasted_energy",
                value: MetricValue::Defined(self.ghost_wasted_energy().0),
                unit: KilowattHours::UNIT,
                basis: Basis::Absolute,
            },
            DerivedMetric {
                name: "ghost_wasted_cost_annualized",
                value: MetricValue::Defined(self.ghost_wasted_cost_annualized().0),
                unit: "USD/yr",
                basis: Basis::Absolute,
            },
            DerivedMetric {
                name: "water_surge_ratio",
                value: self.water_surge_ratio(),
                unit: "x",
                basis: Basis::Absolute,
            },
            DerivedMetric {
                name: "co2_electricity",
                value: co2.map(|breakdown| breakdown.electricity.0),
                unit: ShortTons::UNIT,
                basis: Basis::Absolute,
            },
            DerivedMetric {
                name: "co2_gas",
                value: co2.map(|breakdown| breakdown.gas.0),
                unit: ShortTons::UNIT,
                basis: Basis::Absolute,
            },
            DerivedMetric {
                name: "co2_water_embedded",
                value: co2.map(|breakdown| breakdown.water_embedded.0),
                unit: ShortTons::UNIT,
                basis: Basis::Absolute,
            },
            DerivedMetric {
                name: "co2_total",
                value: co2.map(|breakdown| breakdown.total().0),
                unit: ShortTons::UNIT,
                basis: Basis::Absolute,
            },
        ]
    }
}
