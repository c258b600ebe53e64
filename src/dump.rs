//! Writes fetched routine definitions into a clean snapshot directory,
//! one file per routine.

use crate::naming::{normalize_filename, unique_path};
use crate::warehouse::ProcedureRecord;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Outcome of one dump run.
#[derive(Debug, Default, Serialize)]
pub struct DumpReport {
    /// Rows returned by the warehouse, overloads included.
    pub found: usize,
    pub saved: usize,
    pub skipped: usize,
    /// Fully-qualified names skipped for an empty definition body.
    pub empty_definitions: Vec<String>,
}

/// Remove `path` recursively if it exists, then recreate it empty.
/// A missing directory is not an error.
pub fn ensure_clean_dir(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to clear {}", path.display()));
        }
    }
    fs::create_dir_all(path).with_context(|| format!("Failed to create {}", path.display()))
}

/// Write one `.sql` file per record into `dir`.
///
/// Records with an empty name or empty definition are skipped and
/// counted. Every file starts with a one-line provenance comment, and
/// CRLF line endings are normalized to LF.
pub fn write_definitions(dir: &Path, records: &[ProcedureRecord]) -> Result<DumpReport> {
    let mut report = DumpReport {
        found: records.len(),
        ..Default::default()
    };

    for record in records {
        let name = record.name.trim();
        if name.is_empty() {
            report.skipped += 1;
            continue;
        }
        if record.definition.trim().is_empty() {
            report
                .empty_definitions
                .push(format!("{}.{}.{}", record.catalog, record.schema, name));
            report.skipped += 1;
            continue;
        }

        let base = normalize_filename(name);
        let path = unique_path(dir, &base, ".sql");
        let header = format!("-- {}.{}.{}\n\n", record.catalog, record.schema, name);
        let body = record.definition.replace("\r\n", "\n");
        fs::write(&path, header + &body)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        report.saved += 1;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, definition: &str) -> ProcedureRecord {
        ProcedureRecord {
            catalog: "DWH".to_string(),
            schema: "AIR_TEST".to_string(),
            name: name.to_string(),
            definition: definition.to_string(),
        }
    }

    #[test]
    fn clean_dir_tolerates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("fresh");
        ensure_clean_dir(&target).unwrap();
        assert!(target.is_dir());

        fs::write(target.join("stale.sql"), "x").unwrap();
        ensure_clean_dir(&target).unwrap();
        assert_eq!(fs::read_dir(&target).unwrap().count(), 0);
    }

    #[test]
    fn writes_header_and_normalizes_line_endings() {
        let dir = tempfile::tempdir().unwrap();
        let report =
            write_definitions(dir.path(), &[record("SP_LOAD_FCT", "BEGIN\r\nEND;")]).unwrap();
        assert_eq!(report.saved, 1);

        let written = fs::read_to_string(dir.path().join("SP_LOAD_FCT.sql")).unwrap();
        assert_eq!(written, "-- DWH.AIR_TEST.SP_LOAD_FCT\n\nBEGIN\nEND;");
    }

    #[test]
    fn skips_empty_rows_and_counts_them() {
        let dir = tempfile::tempdir().unwrap();
        let records = [
            record("", "BEGIN END"),
            record("SP_EMPTY", "   "),
            record("SP_OK", "BEGIN END"),
        ];
        let report = write_definitions(dir.path(), &records).unwrap();
        assert_eq!(report.found, 3);
        assert_eq!(report.saved, 1);
        assert_eq!(report.skipped, 2);
        assert_eq!(report.empty_definitions, vec!["DWH.AIR_TEST.SP_EMPTY"]);
    }

    #[test]
    fn overloads_get_distinct_files() {
        let dir = tempfile::tempdir().unwrap();
        let records = [record("SP_GET", "BODY A"), record("SP_GET", "BODY B")];
        let report = write_definitions(dir.path(), &records).unwrap();
        assert_eq!(report.saved, 2);
        assert!(dir.path().join("SP_GET.sql").exists());
        assert!(dir.path().join("SP_GET_2.sql").exists());
    }
}
