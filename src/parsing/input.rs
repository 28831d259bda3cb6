//! Reading match report files from disk.
//!
//! Files ending in `.gz` are gzip compressed (multi-member streams are
//! accepted). Lines starting with `#` are comments and are removed before the
//! text reaches the parser.

use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Suffix is lowercase by convention
#[must_use]
pub fn is_gzipped(path: &Path) -> bool {
    path.to_string_lossy().ends_with(".gz")
}

/// Read a report file, decompressing if needed, with comment lines removed.
///
/// # Errors
///
/// Returns an IO error if the file cannot be opened, is not valid gzip when it
/// claims to be, or is not valid UTF-8.
pub fn read_report(path: &Path) -> std::io::Result<String> {
    let file = std::fs::File::open(path)?;
    if is_gzipped(path) {
        read_without_comments(BufReader::new(MultiGzDecoder::new(file)))
    } else {
        read_without_comments(BufReader::new(file))
    }
}

fn read_without_comments<R: BufRead>(reader: R) -> std::io::Result<String> {
    let mut text = String::new();
    for line in reader.lines() {
        let line = line?;
        if line.starts_with('#') {
            continue;
        }
        text.push_str(&line);
        text.push('\n');
    }
    Ok(text)
}

/// Remove comment lines from report text already in memory.
#[must_use]
pub fn strip_comments(text: &str) -> String {
    // Reading from a byte slice cannot fail on valid UTF-8 input
    read_without_comments(text.as_bytes()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const REPORT: &str = "# generated by allall\nRefinedMatches([NULL]);\n#trailer\n";

    #[test]
    fn test_strip_comments() {
        assert_eq!(strip_comments(REPORT), "RefinedMatches([NULL]);\n");
        // Only lines that start with '#' are comments
        assert_eq!(strip_comments("  # kept\n"), "  # kept\n");
    }

    #[test]
    fn test_read_plain_report() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(REPORT.as_bytes()).unwrap();

        let text = read_report(file.path()).unwrap();
        assert_eq!(text, "RefinedMatches([NULL]);\n");
    }

    #[test]
    fn test_read_gzipped_report() {
        let file = NamedTempFile::with_suffix(".gz").unwrap();
        let mut encoder = GzEncoder::new(file.reopen().unwrap(), Compression::default());
        encoder.write_all(REPORT.as_bytes()).unwrap();
        encoder.finish().unwrap();

        assert!(is_gzipped(file.path()));
        let text = read_report(file.path()).unwrap();
        assert_eq!(text, "RefinedMatches([NULL]);\n");
    }

    #[test]
    fn test_read_multi_member_gzip_report() {
        let file = NamedTempFile::with_suffix(".gz").unwrap();
        let mut output = file.reopen().unwrap();
        for part in ["# first member\nRefinedMatches([NULL]);\n", "RefinedMatches([]):\n"] {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(part.as_bytes()).unwrap();
            output.write_all(&encoder.finish().unwrap()).unwrap();
        }
        output.flush().unwrap();

        let text = read_report(file.path()).unwrap();
        assert_eq!(text, "RefinedMatches([NULL]);\nRefinedMatches([]):\n");
    }

    #[test]
    fn test_read_missing_file() {
        assert!(read_report(Path::new("/nonexistent/match/file")).is_err());
    }
}
