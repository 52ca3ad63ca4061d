use std::{path::PathBuf, process::ExitStatus};

use thiserror::Error;

/// Fatal failures. Any of these aborts the run with a non-zero exit.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("invalid date '{value}', expected YYYY-MM-DD")]
    InvalidDateBound {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("record timestamp '{datetime}' is not in DD/Mon/YYYY:HH:MM:SS form")]
    DateParseInconsistency {
        datetime: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("cannot read log file {}", path.display())]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write output file {}", path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Failures of the snapshot step. Reported, never fatal.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("cannot resolve {}", path.display())]
    Resolve {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not run `git {args}`")]
    Unavailable {
        args: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`git {args}` failed ({status}): {stderr}")]
    Command {
        args: String,
        status: ExitStatus,
        stderr: String,
    },
}

/// Renders an error followed by each of its causes, `outer: inner: root`.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use asserting::prelude::*;

    #[test]
    fn chain_includes_causes() {
        let err = AnalyzerError::ReadInput {
            path: PathBuf::from("access.log"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert_that!(error_chain(&err))
            .is_equal_to("cannot read log file access.log: no such file".to_string());
    }
}
