//! Core data types for match comparison.
//!
//! - [`MatchRecord`]: one reported alignment between two entries, with ranges and a score
//! - [`Range`]: an aligned interval written `start..end` in match files
//! - [`GenomePairKey`]: the pair of genomes a match file belongs to
//! - [`MatchCollection`]: records grouped by genome pair
//!
//! [`MatchRecord`]: record::MatchRecord
//! [`Range`]: record::Range
//! [`GenomePairKey`]: types::GenomePairKey
//! [`MatchCollection`]: types::MatchCollection

pub mod record;
pub mod types;
