use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use derive_getters::Getters;

#[derive(Parser, Debug, Getters)]
#[command(name = "noise-maker")]
#[command(about = "Generate fake access-log files for testing", long_about = None)]
pub struct CliArgs {
    #[arg(long, default_value = "access.log")]
    log_file: PathBuf,

    #[arg(long, default_value_t = 1000)]
    lines: usize,

    /// Make every Nth line malformed (0 keeps every line well-formed)
    #[arg(long, default_value_t = 0)]
    malformed_every: usize,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value = "2024-01-01")]
    start_date: NaiveDate,

    /// Seconds between consecutive entries
    #[arg(long, default_value_t = 60)]
    spacing_secs: u32,
}
