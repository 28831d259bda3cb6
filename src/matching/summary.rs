use serde::Serialize;

/// Decimal places kept on a fraction before it is turned into a percentage
const PERCENT_PRECISION: i32 = 7;

/// Express `count` as a percentage of `total`.
///
/// The fraction is rounded to seven decimal places first. Returns `None` when
/// `total` is zero.
#[must_use]
pub fn percentage(count: usize, total: usize) -> Option<f64> {
    if total == 0 {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let fraction = count as f64 / total as f64;
    let scale = 10f64.powi(PERCENT_PRECISION);
    Some((fraction * scale).round() / scale * 100.0)
}

/// Scores of every missed match, highest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MissedScores {
    scores: Vec<u64>,
}

/// Summary statistics of a non-empty set of missed scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MissedScoreStats {
    pub count: usize,
    /// Integer mean (truncated)
    pub average: u64,
    /// Element at index `count / 2` of the descending scores
    pub median: u64,
    pub min: u64,
    pub max: u64,
}

impl MissedScores {
    pub fn new(scores: impl IntoIterator<Item = u64>) -> Self {
        let mut scores: Vec<u64> = scores.into_iter().collect();
        scores.sort_unstable_by(|a, b| b.cmp(a));
        Self { scores }
    }

    /// Scores in descending order
    #[must_use]
    pub fn descending(&self) -> &[u64] {
        &self.scores
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Statistics over the scores, or `None` when there are no missed matches.
    #[must_use]
    pub fn stats(&self) -> Option<MissedScoreStats> {
        let count = self.scores.len();
        let max = *self.scores.first()?;
        let min = *self.scores.last()?;
        let sum: u128 = self.scores.iter().map(|&s| u128::from(s)).sum();
        #[allow(clippy::cast_possible_truncation)] // Mean of u64 values fits in u64
        let average = (sum / count as u128) as u64;

        Some(MissedScoreStats {
            count,
            average,
            median: self.scores[count / 2],
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(1, 4), Some(25.0));
        assert_eq!(percentage(0, 10), Some(0.0));
        assert_eq!(percentage(3, 0), None);

        let third = percentage(1, 3).unwrap();
        assert!((third - 33.333_33).abs() < 1e-4);
    }

    #[test]
    fn test_scores_sorted_descending() {
        let scores = MissedScores::new([190, 250, 181, 300]);
        assert_eq!(scores.descending(), &[300, 250, 190, 181]);
    }

    #[test]
    fn test_stats() {
        let stats = MissedScores::new([190, 250, 181, 300]).stats().unwrap();
        assert_eq!(stats.count, 4);
        assert_eq!(stats.average, 230);
        // Index 2 of [300, 250, 190, 181]
        assert_eq!(stats.median, 190);
        assert_eq!(stats.min, 181);
        assert_eq!(stats.max, 300);
    }

    #[test]
    fn test_stats_single_score() {
        let stats = MissedScores::new([200]).stats().unwrap();
        assert_eq!(stats.average, 200);
        assert_eq!(stats.median, 200);
    }

    #[test]
    fn test_no_missed_matches() {
        let scores = MissedScores::new(Vec::new());
        assert!(scores.is_empty());
        assert_eq!(scores.stats(), None);
    }
}
