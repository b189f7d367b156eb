use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(author, version, about)]
#[must_use]
pub struct Args {
    /// Analysis configuration: building profile, calendar, prices, benchmarks.
    #[clap(long, default_value = "analysis.toml", env = "ANALYSIS_CONFIG")]
    pub config: PathBuf,

    #[clap(flatten)]
    pub inputs: InputArgs,

    /// Emit the full report as JSON instead of tables.
    #[clap(long)]
    pub json: bool,
}

#[derive(Parser)]
pub struct InputArgs {
    /// Badge-swipe matrix: one row per employee, one column per month.
    #[clap(long = "badge-csv", env = "BADGE_CSV")]
    pub badge: PathBuf,

    /// Monthly utility readings in their source-native units.
    #[clap(long = "utility-csv", env = "UTILITY_CSV")]
    pub utility: PathBuf,

    /// Conference-room reservation log.
    #[clap(long = "booking-csv", env = "BOOKING_CSV")]
    pub booking: PathBuf,

    /// Banner lines above the badge CSV header.
    #[clap(long, default_value = "0", env = "BADGE_SKIP_ROWS")]
    pub badge_skip_rows: usize,

    /// Banner lines above the utility CSV header.
    #[clap(long, default_value = "0", env = "UTILITY_SKIP_ROWS")]
    pub utility_skip_rows: usize,

    /// Banner lines above the booking CSV header.
    #[clap(long, default_value = "0", env = "BOOKING_SKIP_ROWS")]
    pub booking_skip_rows: usize,
}
