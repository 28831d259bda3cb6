//! Parsers for match report files.
//!
//! - [`refined`]: the `RefinedMatches` grammar, producing [`MatchRecord`]s lazily
//! - [`input`]: reading report files (gzip aware) and removing comment lines
//!
//! ## Example
//!
//! ```rust
//! use match_diff::parsing::refined::parse_refined_matches;
//!
//! let text = "RefinedMatches([NULL,[1,2,181.5,200.0,10..20,15..25,181]]);";
//! let records: Vec<_> = parse_refined_matches(text).collect::<Result<_, _>>().unwrap();
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].score, 181);
//! ```
//!
//! ## Entry fields
//!
//! | Position | Field | Kept |
//! |----------|-------|------|
//! | 1 | entry in first genome | Yes |
//! | 2 | entry in second genome | Yes |
//! | 3 | score (real) | Integer part |
//! | 4 | PAM distance (real) | No |
//! | 5 | range on first entry | Yes |
//! | 6 | range on second entry | Yes |
//! | 7 | PAM variance (real) | No |
//! | 8 | optional integer | No |
//!
//! [`MatchRecord`]: crate::core::record::MatchRecord

pub mod input;
pub mod refined;
