use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    sync::LazyLock,
};

use regex::Regex;
use tracing::debug;

use crate::{error::AnalyzerError, models::LogRecord};

// 127.0.0.1 - - [25/Jul/2025:23:59:59 +0000] "GET /api HTTP/1.1" 200 512 "-" "curl/8.5.0"
// Anchored at the start only; anything after the quoted agent is ignored.
static LOG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"^(?P<ip>[\d.]+) - - \[(?P<datetime>[^\]]+)\] "#,
        r#""(?P<method>\w+) (?P<path>[^ ]+) HTTP/[^"]+" "#,
        r#"(?P<status>\d+) (?P<size>\d+) "[^"]*" "(?P<agent>[^"]+)""#,
    ))
    .expect("log pattern is a valid regex")
});

/// Matches one line against the access-log grammar. Lines that do not match yield `None`.
pub fn parse_log_line(line: &str) -> Option<LogRecord> {
    let caps = LOG_PATTERN.captures(line)?;
    Some(LogRecord {
        client_ip: caps["ip"].to_string(),
        timestamp: caps["datetime"].to_string(),
        method: caps["method"].to_string(),
        path: caps["path"].to_string(),
        status: caps["status"].to_string(),
        size: caps["size"].to_string(),
        user_agent: caps["agent"].to_string(),
    })
}

/// Records parsed from one log source, in file order.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<LogRecord>,
    lines_read: usize,
}

impl RecordStore {
    pub fn open(path: &Path) -> Result<Self, AnalyzerError> {
        let read_error = |source| AnalyzerError::ReadInput {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(read_error)?;
        Self::from_reader(BufReader::new(file)).map_err(read_error)
    }

    /// Parses every line of `reader`, silently dropping lines that do not match.
    pub fn from_reader<R: BufRead>(reader: R) -> std::io::Result<Self> {
        let mut store = Self::default();
        for raw in reader.split(b'\n') {
            let mut raw = raw?;
            if raw.last() == Some(&b'\r') {
                raw.pop();
            }
            store.lines_read += 1;
            let line = String::from_utf8_lossy(&raw);
            match parse_log_line(&line) {
                Some(record) => store.records.push(record),
                None => debug!(line = store.lines_read, "skipping malformed log line"),
            }
        }
        Ok(store)
    }

    pub fn into_records(self) -> Vec<LogRecord> {
        self.records
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn lines_read(&self) -> usize {
        self.lines_read
    }

    pub fn dropped(&self) -> usize {
        self.lines_read - self.records.len()
    }
}
