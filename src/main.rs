#![doc = include_str!("../README.md")]

mod calendar;
mod cli;
mod config;
mod core;
mod fmt;
mod ingest;
mod prelude;
mod quantity;
mod report;
mod tables;

use clap::{Parser, crate_version};

use crate::{
    cli::Args,
    config::Config,
    core::{
        metrics::MetricEngine,
        normalize::{BookingStatistics, OccupancyStatistics, UtilityStatistics},
    },
    prelude::*,
    report::AnalysisReport,
};

fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .without_time()
        .compact()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
    info!(version = crate_version!(), "starting…");

    let args = Args::parse();
    let config = Config::load(&args.config)?;

    let (badge_records, _) = ingest::badge::load(&args.inputs.badge, args.inputs.badge_skip_rows)?;
    let (utility_records, _) =
        ingest::utility::load(&args.inputs.utility, args.inputs.utility_skip_rows)?;
    let (booking_records, _) =
        ingest::booking::load(&args.inputs.booking, args.inputs.booking_skip_rows)?;

    let occupancy = OccupancyStatistics::normalize(&badge_records, &config.calendar);
    let utilities = UtilityStatistics::normalize(&utility_records, &config.calendar)?;
    let bookings = BookingStatistics::normalize(
        &booking_records,
        &config.calendar,
        &config.bookings.exempt_attendance_types,
    );

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
    let report = AnalysisReport::assemble(&engine, &config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", tables::build_metrics_table(&report.metrics));
    println!("{}", tables::build_monthly_table(&report.monthly));
    println!("{}", tables::build_month_over_month_table(&report.month_over_month));
    println!("{}", tables::build_utilization_table(&report.utilization));
    println!("{}", tables::build_floors_table(&report.floors));
    println!("{}", tables::build_water_table(&report.water));
    println!("{}", tables::build_peaks_table(&report.peaks));
    for benchmark in &report.benchmarks {
        println!("{}", tables::build_benchmark_table(benchmark));
    }
    println!("{}", tables::build_scenario_table(&report.scenario));
    Ok(())
}
