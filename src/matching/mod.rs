//! Comparison of reference and candidate match collections.
//!
//! ## Set comparison
//!
//! For each genome pair the reference and candidate lists are compared as sets
//! of [`MatchRecord`](crate::core::record::MatchRecord)s under structural
//! equality:
//!
//! | Category | Meaning |
//! |----------|---------|
//! | both | Record reported by reference and candidate |
//! | missed | Record only in the reference |
//! | extra | Record only in the candidate |
//!
//! Repeated records within one list are collapsed and reported separately as
//! [`DuplicateWarning`]s.
//!
//! ## Reconciliation
//!
//! An extra record that aligns the same two entries as a missed record is
//! reported as a [`Modification`]: most likely the same alignment with
//! different ranges or score. Reconciliation never changes the counts.

pub mod comparator;
pub mod engine;
pub mod reconcile;
pub mod summary;

pub use comparator::{duplicates_of, SetComparison};
pub use engine::{
    check_key_sets, compare_collections, CompareError, ComparisonReport, ComparisonTotals,
    DuplicateWarning, PairComparison,
};
pub use reconcile::{reconcile, Modification};
pub use summary::{percentage, MissedScoreStats, MissedScores};
