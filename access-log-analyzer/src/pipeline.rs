use std::path::Path;

use tracing::{info, warn};

use crate::{
    error::{AnalyzerError, SnapshotError, error_chain},
    export::export_csv,
    filter::{Criteria, filter_records},
    models::LogRecord,
    parser::RecordStore,
    snapshot::{Snapshot, SnapshotOutcome},
    sort::{SortKey, sort_records},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub criteria: Criteria,
    pub sort_by: Option<SortKey>,
    pub descending: bool,
}

#[derive(Debug)]
pub struct RunReport {
    pub lines_read: usize,
    pub records_parsed: usize,
    pub records_kept: usize,
    /// `None` when no snapshot was requested.
    pub snapshot: Option<Result<SnapshotOutcome, SnapshotError>>,
}

/// Filters then optionally sorts `records`.
pub fn process(records: Vec<LogRecord>, query: &Query) -> Result<Vec<LogRecord>, AnalyzerError> {
    let records = filter_records(records, &query.criteria)?;
    Ok(match query.sort_by {
        Some(key) => sort_records(records, key, query.descending),
        None => records,
    })
}

/// Parses `input`, applies `query`, exports the result to `output` and, once the export
/// is on disk, hands it to `snapshot`. A snapshot failure is logged and returned in the
/// report but does not fail the run.
pub fn run(
    input: &Path,
    output: &Path,
    query: &Query,
    snapshot: Option<&dyn Snapshot>,
) -> Result<RunReport, AnalyzerError> {
    if let (Some(start), Some(end)) = (query.criteria.start_date, query.criteria.end_date)
        && start > end
    {
        warn!(%start, %end, "start date is after end date, no records can match");
    }

    let store = RecordStore::open(input)?;
    let lines_read = store.lines_read();
    let records_parsed = store.record_count();
    info!(
        lines = lines_read,
        records = records_parsed,
        skipped = store.dropped(),
        "parsed log file"
    );

    let records = process(store.into_records(), query)?;
    export_csv(output, &records)?;
    info!(rows = records.len(), output = %output.display(), "exported records");

    let snapshot = snapshot.map(|s| {
        let result = s.snapshot(output);
        match &result {
            Ok(SnapshotOutcome::Committed) => info!("snapshot committed"),
            Ok(SnapshotOutcome::Unchanged) => info!("no changes detected, skipping commit"),
            Err(e) => warn!(error = %error_chain(e), "snapshot failed"),
        }
        result
    });

    Ok(RunReport {
        lines_read,
        records_parsed,
        records_kept: records.len(),
        snapshot,
    })
}
