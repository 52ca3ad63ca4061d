use std::{
    fs,
    io::{self, Write},
    path::Path,
};

use csv::{Terminator, WriterBuilder};
use tempfile::{Builder, NamedTempFile};

use crate::{
    error::AnalyzerError,
    models::{CSV_HEADER, LogRecord},
};

/// Writes the header row followed by one row per record.
pub fn write_csv<W: Write>(writer: W, records: &[LogRecord]) -> Result<(), csv::Error> {
    // header is written by hand so an empty table still gets one
    let mut csv = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::CRLF)
        .from_writer(writer);
    csv.write_record(CSV_HEADER)?;
    for record in records {
        csv.serialize(record)?;
    }
    csv.flush()?;
    Ok(())
}

/// Replaces `path` with the exported table. The destination is only touched once the
/// whole table has been written to a sibling temporary file.
pub fn export_csv(path: &Path, records: &[LogRecord]) -> Result<(), AnalyzerError> {
    let write_error = |source: csv::Error| AnalyzerError::WriteOutput {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staging = staging_file(dir, path).map_err(|e| write_error(e.into()))?;
    write_csv(staging.as_file_mut(), records).map_err(write_error)?;
    staging
        .persist(path)
        .map_err(|e| write_error(e.error.into()))?;
    Ok(())
}

// Temp files are private by default; give the staging file the mode a plain create
// would (0666 less umask), or the mode of the file it replaces.
fn staging_file(dir: &Path, path: &Path) -> io::Result<NamedTempFile> {
    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let staging = builder.tempfile_in(dir)?;
    if let Ok(existing) = fs::metadata(path) {
        staging.as_file().set_permissions(existing.permissions())?;
    }
    Ok(staging)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record;
    use asserting::prelude::*;
    use csv::ReaderBuilder;

    fn render(records: &[LogRecord]) -> String {
        let mut buffer = Vec::new();
        write_csv(&mut buffer, records).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn empty_table_has_header_only() {
        assert_that!(render(&[]))
            .is_equal_to("ip,datetime,method,path,status,size,agent\r\n".to_string());
    }

    #[test]
    fn rows_follow_header_in_order() {
        let rows = [
            record("10.0.0.1", "01/Jan/2024:00:00:00 +0000", "200", "512"),
            record("10.0.0.2", "02/Jan/2024:00:00:00 +0000", "404", "0"),
        ];
        let text = render(&rows);
        let lines: Vec<_> = text.lines().collect();
        assert_that!(lines).is_equal_to(vec![
            "ip,datetime,method,path,status,size,agent",
            "10.0.0.1,01/Jan/2024:00:00:00 +0000,GET,/,200,512,curl/8.5.0",
            "10.0.0.2,02/Jan/2024:00:00:00 +0000,GET,/,404,0,curl/8.5.0",
        ]);
    }

    #[test]
    fn awkward_fields_read_back_verbatim() {
        let mut awkward = record("10.0.0.1", "01/Jan/2024:00:00:00 +0000", "200", "512");
        awkward.path = "/search?q=a,b&x=1".into();
        awkward.user_agent = "Mozilla/5.0 (compatible; bot, v2) 'quoted'".into();

        let text = render(std::slice::from_ref(&awkward));
        let mut reader = ReaderBuilder::new().from_reader(text.as_bytes());
        let headers = reader.headers().unwrap().clone();
        assert_that!(headers.iter().collect::<Vec<_>>()).is_equal_to(CSV_HEADER.to_vec());

        let back: Vec<LogRecord> = reader.deserialize().collect::<Result<_, _>>().unwrap();
        assert_that!(back).is_equal_to(vec![awkward]);
    }

    #[test]
    fn export_overwrites_destination() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "stale contents that are much longer than the header\n").unwrap();

        export_csv(&path, &[]).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_that!(written).is_equal_to("ip,datetime,method,path,status,size,agent\r\n".to_string());
    }

    #[test]
    fn rows_end_with_crlf() {
        let rows = [record("10.0.0.1", "01/Jan/2024:00:00:00 +0000", "200", "512")];
        let text = render(&rows);
        assert_that!(text.matches("\r\n").count()).is_equal_to(2);
        assert_that!(text.matches('\n').count()).is_equal_to(2);
    }

    #[cfg(unix)]
    #[test]
    fn export_keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "old\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o640)).unwrap();

        export_csv(&path, &[]).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_that!(mode).is_equal_to(0o640);
    }

    #[cfg(unix)]
    #[test]
    fn export_new_file_is_not_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let reference = dir.path().join("reference.csv");
        std::fs::write(&reference, "").unwrap();

        export_csv(&path, &[]).unwrap();

        let mode = |p: &Path| std::fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_that!(mode(&path)).is_equal_to(mode(&reference));
    }

    #[test]
    fn export_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");
        let err = export_csv(&path, &[]).unwrap_err();
        assert!(matches!(err, AnalyzerError::WriteOutput { .. }));
        assert_that!(path.exists()).is_false();
    }
}
