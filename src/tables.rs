use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    core::{
        benchmark::Direction,
        metrics::{
            DerivedMetric,
            FloorEfficiency,
            MetricValue,
            MonthOverMonth,
            ResourcePeaks,
            TierCount,
            WaterProfile,
        },
        scenario::CumulativePoint,
    },
    fmt::{Money, Rounded},
    report::{BenchmarkReport, MonthlyRow},
};

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table.set_header(header);
    table
}

fn metric_cell(value: MetricValue<f64>, precision: usize) -> Cell {
    match value {
        MetricValue::Defined(value) => {
            Cell::new(format!("{value:.precision$}")).set_alignment(CellAlignment::Right)
        }
        MetricValue::Undefined(reason) => Cell::new(format!("undefined ({reason})"))
            .fg(Color::DarkYellow)
            .add_attribute(Attribute::Italic),
    }
}

pub fn build_metrics_table(metrics: &[DerivedMetric]) -> Table {
    let mut table = new_table(vec!["Metric", "Value", "Unit"]);
    for metric in metrics {
        table.add_row(vec![
            Cell::new(metric.name),
            metric_cell(metric.value, 2),
            Cell::new(metric.unit).add_attribute(Attribute::Dim),
        ]);
    }
    table
}

pub fn build_monthly_table(rows: &[MonthlyRow]) -> Table {
    let mut table = new_table(vec!["Month", "Swipes", "Attendance", "Cost per swipe"]);
    for row in rows {
        table.add_row(vec![
            Cell::new(row.month),
            Cell::new(Rounded(row.swipes)).set_alignment(CellAlignment::Right),
            Cell::new(row.attendance).set_alignment(CellAlignment::Right).fg(
                if row.attendance.0 >= 50.0 {
                    Color::Green
                } else if row.attendance.0 >= 25.0 {
                    Color::DarkYellow
                } else {
                    Color::Red
                },
            ),
            metric_cell(row.cost_per_swipe.map(|cost| cost.0), 2),
        ]);
    }
    table
}

pub fn build_utilization_table(tiers: &[TierCount]) -> Table {
    let mut table = new_table(vec!["Tier", "Employees", "Share"]);
    for tier in tiers {
        table.add_row(vec![
            Cell::new(&tier.label),
            Cell::new(tier.count).set_alignment(CellAlignment::Right),
            Cell::new(tier.share).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

pub fn build_floors_table(floors: &[FloorEfficiency]) -> Table {
    let mut table =
        new_table(vec!["Floor", "Employees", "Swipes", "Swipes per sqft", "Attendance"]);
    for floor in floors {
        table.add_row(vec![
            Cell::new(&floor.floor),
            Cell::new(floor.employees).set_alignment(CellAlignment::Right),
            Cell::new(floor.swipes).set_alignment(CellAlignment::Right),
            floor
                .swipes_per_square_foot
                .map_or_else(|| Cell::new("-").add_attribute(Attribute::Dim), |density| {
                    Cell::new(format!("{density:.3}")).set_alignment(CellAlignment::Right)
                }),
            metric_cell(floor.attendance.map(|attendance| attendance.0), 1),
        ]);
    }
    table
}

pub fn build_month_over_month_table(changes: &[MonthOverMonth]) -> Table {
    let mut table = new_table(vec!["From", "To", "Swipe change"]);
    for change in changes {
        let cell = match change.change {
            MetricValue::Defined(percent) => {
                Cell::new(format!("{:+.1}%", percent.0)).set_alignment(CellAlignment::Right).fg(
                    if percent.0 >= 0.0 { Color::Green } else { Color::Red },
                )
            }
            MetricValue::Undefined(reason) => Cell::new(format!("undefined ({reason})"))
                .fg(Color::DarkYellow)
                .add_attribute(Attribute::Italic),
        };
        table.add_row(vec![Cell::new(change.from), Cell::new(change.to), cell]);
    }
    table
}

pub fn build_water_table(water: &WaterProfile) -> Table {
    let mut table = new_table(vec!["Water", "Value"]);
    let quantity_cell = |value: Option<crate::quantity::volume::Gallons>| {
        value.map_or_else(
            || Cell::new("-").add_attribute(Attribute::Dim),
            |gallons| Cell::new(gallons).set_alignment(CellAlignment::Right),
        )
    };
    table.add_row(vec![Cell::new("Baseline-season mean"), quantity_cell(water.baseline_mean)]);
    table.add_row(vec![Cell::new("Surge-season mean"), quantity_cell(water.surge_mean)]);
    table.add_row(vec![
        Cell::new("Surge ratio"),
        match water.surge_ratio {
            MetricValue::Defined(ratio) => Cell::new(format!("{ratio:.2}x"))
                .set_alignment(CellAlignment::Right)
                .fg(if ratio > 1.2 { Color::Red } else { Color::Green }),
            MetricValue::Undefined(reason) => Cell::new(format!("undefined ({reason})"))
                .fg(Color::DarkYellow)
                .add_attribute(Attribute::Italic),
        },
    ]);
    table
}

pub fn build_peaks_table(peaks: &[ResourcePeaks]) -> Table {
    let mut table = new_table(vec!["Resource", "Peak month", "Trough month"]);
    let month_cell = |entry: Option<(crate::calendar::Month, f64)>, unit: &str| {
        entry.map_or_else(
            || Cell::new("-").add_attribute(Attribute::Dim),
            |(month, value)| Cell::new(format!("{month}: {value} {unit}")),
        )
    };
    for entry in peaks {
        table.add_row(vec![
            Cell::new(entry.resource),
            month_cell(entry.peak, entry.unit),
            month_cell(entry.trough, entry.unit),
        ]);
    }
    table
}

pub fn build_benchmark_table(benchmark: &BenchmarkReport) -> Table {
    let mut table =
        new_table(vec!["Rank", "Tier", "Value", "% of this building", "Excess cost"]);
    let mut subject_row = vec![
        Cell::new(0),
        Cell::new("This building").add_attribute(Attribute::Bold),
        metric_cell(benchmark.subject, 1),
        Cell::new("100.0 %").set_alignment(CellAlignment::Right),
        Cell::new("-").add_attribute(Attribute::Dim),
    ];
    if benchmark.tiers.is_empty() {
        // Undefined subject: the reason cell already says why.
        subject_row.truncate(3);
    }
    table.add_row(subject_row);
    for tier in &benchmark.tiers {
        // A tier the subject fails to reach reads red for a lower-is-better
        // metric: the building consumes more than the tier allows.
        let behind = match benchmark.direction {
            Direction::LowerIsBetter => tier.excess_per_square_foot > 0.0,
            Direction::HigherIsBetter => tier.excess_per_square_foot < 0.0,
        };
        table.add_row(vec![
            Cell::new(tier.rank),
            Cell::new(&tier.label),
            Cell::new(Rounded(tier.value)).set_alignment(CellAlignment::Right),
            metric_cell(tier.percentage_of_baseline.map(|percent| percent.0), 1)
                .fg(if behind { Color::Red } else { Color::Green }),
            tier.annual_excess_cost.map_or_else(
                || Cell::new("-").add_attribute(Attribute::Dim),
                |cost| Cell::new(Money(cost)).set_alignment(CellAlignment::Right),
            ),
        ]);
    }
    table
}

pub fn build_scenario_table(points: &[CumulativePoint]) -> Table {
    let mut table = new_table(vec!["Step", "Annual savings", "Cumulative"]);
    for point in points {
        table.add_row(vec![
            Cell::new(&point.label),
            Cell::new(Money(point.delta)).set_alignment(CellAlignment::Right),
            Cell::new(Money(point.cumulative))
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Bold),
        ]);
    }
    table
}
