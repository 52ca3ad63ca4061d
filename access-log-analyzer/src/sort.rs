use std::cmp::Reverse;

use clap::ValueEnum;

use crate::models::LogRecord;

/// Field a record sequence can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortKey {
    Ip,
    Datetime,
    Status,
    Size,
}

impl SortKey {
    fn text<'a>(self, record: &'a LogRecord) -> &'a str {
        match self {
            Self::Ip => &record.client_ip,
            Self::Datetime => &record.timestamp,
            Self::Status => &record.status,
            Self::Size => &record.size,
        }
    }
}

/// Stable sort of `records` by `key`.
///
/// `ip`, `datetime` and `status` compare their raw text, so `"99"` sorts after `"404"`.
/// `size` compares numerically and is always largest first; `descending` has no effect on it.
pub fn sort_records(mut records: Vec<LogRecord>, key: SortKey, descending: bool) -> Vec<LogRecord> {
    match key {
        SortKey::Size => records.sort_by_key(|r| Reverse(r.size_bytes())),
        _ => records.sort_by(|a, b| {
            let ord = key.text(a).cmp(key.text(b));
            if descending { ord.reverse() } else { ord }
        }),
    }
    records
}
