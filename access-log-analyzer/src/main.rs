mod error;
mod export;
mod filter;
mod invariants;
mod logging;
mod models;
mod parser;
mod pipeline;
mod snapshot;
mod sort;

use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use error::error_chain;
use filter::Criteria;
use invariants::DateBound;
use num_format::{Locale, ToFormattedString};
use pipeline::Query;
use snapshot::{DEFAULT_COMMIT_MESSAGE, GitSnapshot, Snapshot};
use sort::SortKey;
use tracing::error;

#[derive(Parser, Debug)]
#[command(version, about = "Access log analyzer: filter, sort and export to CSV", long_about = None)]
struct Args {
    /// Path to the access log file
    #[arg(long)]
    log_file: PathBuf,

    /// Path to the output CSV file
    #[arg(long)]
    output_file: PathBuf,

    #[arg(long)]
    filter_ip: Option<String>,

    #[arg(long)]
    filter_status: Option<String>,

    #[arg(long)]
    filter_method: Option<String>,

    #[arg(long, value_name = "YYYY-MM-DD")]
    filter_start_date: Option<DateBound>,

    #[arg(long, value_name = "YYYY-MM-DD")]
    filter_end_date: Option<DateBound>,

    #[arg(long, value_enum)]
    sort_by: Option<SortKey>,

    /// Sort in descending order (size always sorts largest first)
    #[arg(long)]
    reverse: bool,

    /// Skip committing the output file to git
    #[arg(long)]
    no_snapshot: bool,

    #[arg(long, default_value = DEFAULT_COMMIT_MESSAGE)]
    commit_message: String,

    /// Working tree the output file is committed to
    #[arg(long, default_value = ".")]
    repo_dir: PathBuf,
}

impl Args {
    fn query(&self) -> Query {
        Query {
            criteria: Criteria {
                ip: non_empty(&self.filter_ip),
                status: non_empty(&self.filter_status),
                method: non_empty(&self.filter_method),
                start_date: self.filter_start_date,
                end_date: self.filter_end_date,
            },
            sort_by: self.sort_by,
            descending: self.reverse,
        }
    }
}

// an empty filter value means no filter
fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.is_empty())
}

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init();

    let git = (!args.no_snapshot).then(|| GitSnapshot::new(&args.repo_dir, &args.commit_message));
    let snapshot = git.as_ref().map(|g| g as &dyn Snapshot);

    match pipeline::run(&args.log_file, &args.output_file, &args.query(), snapshot) {
        Ok(report) => {
            println!(
                "Wrote {} of {} records ({} lines read) to {}",
                report.records_kept.to_formatted_string(&Locale::en),
                report.records_parsed.to_formatted_string(&Locale::en),
                report.lines_read.to_formatted_string(&Locale::en),
                args.output_file.display()
            );
            if let Some(Err(_)) = report.snapshot {
                println!("Output was not committed, see the warning above");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", error_chain(&e));
            ExitCode::FAILURE
        }
    }
}
