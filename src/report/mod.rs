//! Output files for a comparison run.
//!
//! - [`missed`]: `missed.txt`, one tab-separated row per missed match
//! - [`histogram`]: SVG histogram of missed-match scores

use std::path::PathBuf;
use thiserror::Error;

pub mod histogram;
pub mod missed;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {}", .path.display(), .source)]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
