//! Aggregation of match files into per-genome-pair collections.
//!
//! A results directory is laid out as one directory per first genome, holding
//! one or more (optionally gzipped) match files per second genome:
//!
//! ```text
//! results/
//!   GenomeA/
//!     GenomeB.gz
//!     GenomeC_1.gz
//!     GenomeC_2.gz
//!     GenomeC.sha2.txt   (ignored)
//! ```
//!
//! Every file is parsed in full, records below the minimum score are dropped,
//! and the rest are appended to the collection entry for the file's
//! [`GenomePairKey`](crate::core::types::GenomePairKey).

pub mod loader;

pub use loader::{load_matches, Aggregator, LoadError, LoaderConfig, MatchFile, DEFAULT_MIN_SCORE};
