mod args;
mod generator;
mod writer;

use std::{fs::File, io::BufWriter, process::ExitCode};

use args::CliArgs;
use chrono::TimeDelta;
use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};
use writer::{Plan, write_log};

fn main() -> ExitCode {
    let args = CliArgs::parse();
    let plan = Plan {
        lines: *args.lines(),
        malformed_every: *args.malformed_every(),
        start: args.start_date().and_time(chrono::NaiveTime::MIN),
        spacing: TimeDelta::seconds(i64::from(*args.spacing_secs())),
    };
    let mut rng = match args.seed() {
        Some(seed) => StdRng::seed_from_u64(*seed),
        None => StdRng::from_os_rng(),
    };

    let result = File::create(args.log_file())
        .and_then(|file| write_log(BufWriter::new(file), &mut rng, &plan));
    match result {
        Ok(malformed) => {
            println!(
                "Wrote {} log lines ({malformed} malformed) to {}",
                plan.lines,
                args.log_file().display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("cannot write {}: {e}", args.log_file().display());
            ExitCode::FAILURE
        }
    }
}
