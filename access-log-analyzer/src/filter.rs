use crate::{error::AnalyzerError, invariants::DateBound, models::LogRecord};

/// Optional conditions a record must all satisfy to be kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    pub ip: Option<String>,
    pub status: Option<String>,
    pub method: Option<String>,
    pub start_date: Option<DateBound>,
    pub end_date: Option<DateBound>,
}

impl Criteria {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn has_date_range(&self) -> bool {
        self.start_date.is_some() || self.end_date.is_some()
    }

    /// Evaluates every present condition against `record`.
    ///
    /// With a date range requested the timestamp is parsed before anything else, so a
    /// record whose timestamp cannot be read is an error even if another field would
    /// already have rejected it.
    pub fn matches(&self, record: &LogRecord) -> Result<bool, AnalyzerError> {
        if self.has_date_range() {
            let ts = record.parsed_timestamp()?;
            if self.start_date.is_some_and(|start| !start.starts_at_or_before(ts)) {
                return Ok(false);
            }
            if self.end_date.is_some_and(|end| !end.ends_at_or_after(ts)) {
                return Ok(false);
            }
        }
        Ok(field_matches(self.ip.as_deref(), &record.client_ip)
            && field_matches(self.status.as_deref(), &record.status)
            && field_matches(self.method.as_deref(), &record.method))
    }
}

fn field_matches(expected: Option<&str>, actual: &str) -> bool {
    expected.is_none_or(|expected| expected == actual)
}

/// Keeps the records that satisfy `criteria`, preserving their relative order.
pub fn filter_records(
    records: Vec<LogRecord>,
    criteria: &Criteria,
) -> Result<Vec<LogRecord>, AnalyzerError> {
    if criteria.is_empty() {
        return Ok(records);
    }
    let mut kept = Vec::with_capacity(records.len());
    for record in records {
        if criteria.matches(&record)? {
            kept.push(record);
        }
    }
    Ok(kept)
}
