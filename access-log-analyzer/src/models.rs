use serde::{Deserialize, Serialize};

use crate::{error::AnalyzerError, invariants::Timestamp};

/// Column names of the exported table, in field order.
pub const CSV_HEADER: [&str; 7] = [
    "ip", "datetime", "method", "path", "status", "size", "agent",
];

/// One access-log line that matched the full grammar.
///
/// Every field keeps the captured text verbatim; typed views such as
/// [`LogRecord::parsed_timestamp`] and [`LogRecord::size_bytes`] are derived on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    #[serde(rename = "ip")]
    pub client_ip: String,
    #[serde(rename = "datetime")]
    pub timestamp: String,
    pub method: String,
    pub path: String,
    pub status: String,
    pub size: String,
    #[serde(rename = "agent")]
    pub user_agent: String,
}

impl LogRecord {
    pub fn parsed_timestamp(&self) -> Result<Timestamp, AnalyzerError> {
        self.timestamp.parse()
    }

    /// Response size as a number. Anything that is not purely ASCII digits counts as zero.
    pub fn size_bytes(&self) -> u64 {
        if self.size.is_empty() || !self.size.bytes().all(|b| b.is_ascii_digit()) {
            return 0;
        }
        // only overflow is left to fail here
        self.size.parse().unwrap_or(u64::MAX)
    }
}

#[cfg(test)]
pub(crate) fn record(ip: &str, timestamp: &str, status: &str, size: &str) -> LogRecord {
    LogRecord {
        client_ip: ip.into(),
        timestamp: timestamp.into(),
        method: "GET".into(),
        path: "/".into(),
        status: status.into(),
        size: size.into(),
        user_agent: "curl/8.5.0".into(),
    }
}
