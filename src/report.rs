//! Report assembly and CSV output.

use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::debug;

use crate::entry::Record;
use crate::error::{AuditError, AuditResult};

/// Column order of the CSV report.
pub const CSV_HEADER: [&str; 5] = [
    "Name",
    "Creation",
    "LastLogon",
    "PwdLastSet",
    "DistinguishedName",
];

/// Merges per-category results into one report, deduplicated by
/// distinguished name and sorted by account name.
pub fn assemble(batches: Vec<Vec<Record>>) -> Vec<Record> {
    let mut records: Vec<Record> = batches.into_iter().flatten().collect();

    let mut seen: HashSet<String> = HashSet::new();
    records.retain(|record| match &record.distinguished_name {
        Some(dn) => seen.insert(dn.clone()),
        None => true,
    });

    records.sort_by(|a, b| a.name.cmp(&b.name));
    records
}

fn render_timestamp(value: &Option<DateTime<Utc>>) -> String {
    value
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}

/// Writes the report as CSV, one row per record with blanks for absent
/// values.
pub fn write_csv<W: Write>(writer: W, records: &[Record]) -> AuditResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADER)
        .map_err(|e| AuditError::report_with_source("failed to write CSV header", e))?;

    for record in records {
        csv.write_record([
            record.name.clone().unwrap_or_default(),
            render_timestamp(&record.creation),
            render_timestamp(&record.last_logon),
            render_timestamp(&record.pwd_last_set),
            record.distinguished_name.clone().unwrap_or_default(),
        ])
        .map_err(|e| AuditError::report_with_source("failed to write CSV row", e))?;
    }

    csv.flush()
        .map_err(|e| AuditError::report_with_source("failed to flush CSV output", e))?;
    Ok(())
}

/// Writes the report to a file on disk.
pub fn write_csv_file(path: &Path, records: &[Record]) -> AuditResult<()> {
    debug!(path = %path.display(), rows = records.len(), "writing report");
    let file = std::fs::File::create(path).map_err(|e| {
        AuditError::report_with_source(format!("failed to create {}", path.display()), e)
    })?;
    write_csv(file, records)
}

/// Timestamped default output filename in the working directory.
pub fn default_output_path() -> PathBuf {
    PathBuf::from(format!(
        "password-never-expires-{}.csv",
        Utc::now().format("%Y%m%d-%H%M%S")
    ))
}
