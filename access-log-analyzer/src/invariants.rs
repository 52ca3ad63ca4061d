use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use derive_more::{AsRef, Debug, Display};

use crate::error::AnalyzerError;

// Timestamp format for log entries: [01/Jun/1995:00:00:59 -0600]
const LOG_TIMESTAMP_FORMAT: &str = "%d/%b/%Y:%H:%M:%S";
const DATE_BOUND_FORMAT: &str = "%Y-%m-%d";

/// Wall-clock time of a log entry. The zone offset is kept in the raw text only.
#[derive(Debug, Display, AsRef, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    pub fn date(self) -> NaiveDate {
        self.0.date()
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(value: NaiveDateTime) -> Self {
        Self(value)
    }
}

impl FromStr for Timestamp {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wall_clock = s.split_once(' ').map_or(s, |(head, _)| head);
        NaiveDateTime::parse_from_str(wall_clock, LOG_TIMESTAMP_FORMAT)
            .map(Self)
            .map_err(|source| AnalyzerError::DateParseInconsistency {
                datetime: s.to_string(),
                source,
            })
    }
}

/// A calendar day given as `YYYY-MM-DD`, used as an inclusive range bound.
#[derive(Debug, Display, AsRef, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateBound(NaiveDate);

impl DateBound {
    /// True when `ts` falls on or after the first second of this day.
    pub fn starts_at_or_before(self, ts: Timestamp) -> bool {
        ts.date() >= self.0
    }

    /// True when `ts` falls on or before the last second of this day.
    pub fn ends_at_or_after(self, ts: Timestamp) -> bool {
        ts.date() <= self.0
    }
}

impl From<NaiveDate> for DateBound {
    fn from(value: NaiveDate) -> Self {
        Self(value)
    }
}

impl FromStr for DateBound {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, DATE_BOUND_FORMAT)
            .map(Self)
            .map_err(|source| AnalyzerError::InvalidDateBound {
                value: s.to_string(),
                source,
            })
    }
}
