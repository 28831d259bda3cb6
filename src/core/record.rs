use serde::{Deserialize, Serialize};

/// An aligned interval `start..end` on one sequence entry.
///
/// The parser does not require `start <= end`; well-formed inputs satisfy it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Range {
    pub start: u64,
    pub end: u64,
}

impl Range {
    #[must_use]
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }
}

impl From<(u64, u64)> for Range {
    fn from((start, end): (u64, u64)) -> Self {
        Self::new(start, end)
    }
}

impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A single significant match between two sequence entries.
///
/// Equality and hashing are structural over all five fields: two records are
/// the same match only if entries, ranges and score are all identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Identifier of the entry in the first genome
    pub entry1: u64,

    /// Identifier of the entry in the second genome
    pub entry2: u64,

    /// Aligned interval on `entry1`
    pub range1: Range,

    /// Aligned interval on `entry2`
    pub range2: Range,

    /// Alignment score, truncated to an integer
    pub score: u64,
}

impl MatchRecord {
    #[must_use]
    pub fn new(entry1: u64, entry2: u64, range1: Range, range2: Range, score: u64) -> Self {
        Self {
            entry1,
            entry2,
            range1,
            range2,
            score,
        }
    }

    /// Whether both records align the same pair of entries.
    #[must_use]
    pub fn same_entries(&self, other: &Self) -> bool {
        self.entry1 == other.entry1 && self.entry2 == other.entry2
    }

    /// Inclusive score threshold check against a possibly fractional bound.
    #[must_use]
    pub fn passes_min_score(&self, min_score: f64) -> bool {
        #[allow(clippy::cast_precision_loss)]
        let score = self.score as f64;
        score >= min_score
    }
}

impl std::fmt::Display for MatchRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}, {}, {}, {}, score={}]",
            self.entry1, self.entry2, self.range1, self.range2, self.score
        )
    }
}
