//! # match-diff
//!
//! A library for checking how well one set of pairwise protein match results
//! reproduces another.
//!
//! Match-finding pipelines (all-against-all alignment, clustering heuristics)
//! write their significant matches as many small `RefinedMatches` report files,
//! one per pair of genomes. When a faster method is meant to replace an
//! exhaustive one, the question is which of the exhaustive method's matches it
//! still finds.
//!
//! `match-diff` answers it by parsing both result sets, grouping the matches by
//! genome pair, and comparing them as sets.
//!
//! ## Features
//!
//! - **Streaming grammar parser**: Records are produced lazily from report text
//! - **Gzip support**: Compressed report files are read transparently
//! - **Set comparison**: Shared, missed, and extra matches per genome pair
//! - **Duplicate detection**: Repeated matches are reported rather than silently merged
//! - **Reconciliation**: Extra matches that look like re-scored missed ones are flagged
//! - **Reports**: `missed.txt` table and a histogram of missed-match scores
//!
//! ## Example
//!
//! ```rust
//! use match_diff::{compare_collections, GenomePairKey, MatchCollection};
//! use match_diff::parsing::refined::parse_refined_matches_text;
//!
//! let key = GenomePairKey::new("GenomeA", "GenomeB");
//!
//! let mut reference = MatchCollection::new();
//! reference.extend(
//!     key.clone(),
//!     parse_refined_matches_text("RefinedMatches([[1,2,200,1.0,1..10,1..10,0.5]]);").unwrap(),
//! );
//!
//! let mut candidate = MatchCollection::new();
//! candidate.extend(
//!     key,
//!     parse_refined_matches_text("RefinedMatches([[1,2,199,1.0,1..11,1..10,0.5]]);").unwrap(),
//! );
//!
//! let report = compare_collections(&reference, &candidate).unwrap();
//! assert_eq!(report.totals.reference_only, 1);
//! assert_eq!(report.modification_count(), 1);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Match records and genome-pair collections
//! - [`parsing`]: `RefinedMatches` grammar parser and report file reading
//! - [`collection`]: Directory discovery and aggregation by genome pair
//! - [`matching`]: Set comparison, reconciliation, and summary statistics
//! - [`report`]: `missed.txt` and histogram output
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod collection;
pub mod core;
pub mod matching;
pub mod parsing;
pub mod report;

// Re-export commonly used types for convenience
pub use collection::{load_matches, Aggregator, LoaderConfig};
pub use core::record::{MatchRecord, Range};
pub use core::types::{GenomePairKey, MatchCollection, Source};
pub use matching::{compare_collections, ComparisonReport, SetComparison};
pub use parsing::refined::{parse_refined_matches, ParseError};
