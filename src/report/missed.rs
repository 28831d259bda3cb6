use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::matching::engine::ComparisonReport;
use crate::report::ReportError;

/// Name of the missed-match table written into the candidate directory
pub const MISSED_FILE_NAME: &str = "missed.txt";

const HEADER: [&str; 6] = ["Dataset", "Genome1", "Genome2", "Entry1", "Entry2", "Score"];

#[derive(Debug, Serialize)]
struct MissedRow<'a> {
    dataset: &'a str,
    genome1: &'a str,
    genome2: &'a str,
    entry1: u64,
    entry2: u64,
    score: u64,
}

/// Write one tab-separated row per missed record, after a header row.
///
/// Returns the number of data rows written.
///
/// # Errors
///
/// Returns a `csv::Error` if writing fails.
pub fn write_missed<W: Write>(
    writer: W,
    dataset: &str,
    report: &ComparisonReport,
) -> Result<usize, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(writer);

    writer.write_record(HEADER)?;
    let mut rows = 0;
    for (key, record) in report.missed() {
        writer.serialize(MissedRow {
            dataset,
            genome1: &key.genome1,
            genome2: &key.genome2,
            entry1: record.entry1,
            entry2: record.entry2,
            score: record.score,
        })?;
        rows += 1;
    }
    writer.flush()?;
    Ok(rows)
}

/// Write `missed.txt` into `dir`, returning its path.
///
/// # Errors
///
/// Returns `ReportError::Io` if the file cannot be created, or
/// `ReportError::Csv` if writing a row fails.
pub fn write_missed_file(
    dir: &Path,
    dataset: &str,
    report: &ComparisonReport,
) -> Result<PathBuf, ReportError> {
    let path = dir.join(MISSED_FILE_NAME);
    let file = std::fs::File::create(&path).map_err(|source| ReportError::Io {
        path: path.clone(),
        source,
    })?;
    write_missed(std::io::BufWriter::new(file), dataset, report).map_err(|source| {
        ReportError::Csv {
            path: path.clone(),
            source,
        }
    })?;
    Ok(path)
}
