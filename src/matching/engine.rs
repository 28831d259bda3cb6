use serde::Serialize;
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::record::MatchRecord;
use crate::core::types::{GenomePairKey, MatchCollection, Source};
use crate::matching::comparator::SetComparison;
use crate::matching::reconcile::{reconcile, Modification};
use crate::matching::summary::{percentage, MissedScores};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompareError {
    #[error(
        "Reference and candidate do not have the same genome pairs ({} reference, {} candidate); differing pairs: {}",
        .reference_count,
        .candidate_count,
        format_keys(.symmetric_difference)
    )]
    KeySetMismatch {
        reference_count: usize,
        candidate_count: usize,
        /// Pairs present on exactly one side, sorted
        symmetric_difference: Vec<GenomePairKey>,
        reference_only: Vec<GenomePairKey>,
        candidate_only: Vec<GenomePairKey>,
    },
}

fn format_keys(keys: &[GenomePairKey]) -> String {
    keys.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Ensure both collections cover exactly the same genome pairs.
///
/// # Errors
///
/// Returns `CompareError::KeySetMismatch` with the symmetric difference of the
/// two key sets if they differ.
pub fn check_key_sets(
    reference: &MatchCollection,
    candidate: &MatchCollection,
) -> Result<(), CompareError> {
    let reference_keys = reference.key_set();
    let candidate_keys = candidate.key_set();
    if reference_keys == candidate_keys {
        return Ok(());
    }

    let reference_only: Vec<GenomePairKey> =
        reference_keys.difference(&candidate_keys).cloned().collect();
    let candidate_only: Vec<GenomePairKey> =
        candidate_keys.difference(&reference_keys).cloned().collect();
    let symmetric_difference = reference_keys
        .symmetric_difference(&candidate_keys)
        .cloned()
        .collect();

    Err(CompareError::KeySetMismatch {
        reference_count: reference_keys.len(),
        candidate_count: candidate_keys.len(),
        symmetric_difference,
        reference_only,
        candidate_only,
    })
}

/// Records repeated within one input list for a genome pair.
///
/// Set comparison counts each of these once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateWarning {
    pub key: GenomePairKey,
    pub source: Source,
    pub records: Vec<MatchRecord>,
}

/// Comparison of reference and candidate records for one genome pair
#[derive(Debug, Clone, Serialize)]
pub struct PairComparison {
    pub key: GenomePairKey,

    /// Distinct records in both lists
    pub in_both: usize,

    /// Distinct records in the reference list
    pub in_reference: usize,

    /// Distinct records in the candidate list
    pub in_candidate: usize,

    /// Records only in the reference, sorted
    pub missed: Vec<MatchRecord>,

    /// Records only in the candidate, sorted
    pub extra: Vec<MatchRecord>,

    /// Extra records that look like re-scored missed records
    pub modifications: Vec<Modification>,
}

impl PairComparison {
    /// Compare the records of one genome pair, collecting any duplicate warnings.
    #[must_use]
    pub fn compute(
        key: &GenomePairKey,
        reference: &[MatchRecord],
        candidate: &[MatchRecord],
    ) -> (Self, Vec<DuplicateWarning>) {
        let comparison = SetComparison::new(reference, candidate);

        let mut warnings = Vec::new();
        for (source, duplicates) in [
            (Source::Reference, comparison.duplicates_in_list1()),
            (Source::Candidate, comparison.duplicates_in_list2()),
        ] {
            if !duplicates.is_empty() {
                warn!(
                    pair = %key,
                    source = %source,
                    count = duplicates.len(),
                    "Duplicate matches found; comparison counts each only once"
                );
                warnings.push(DuplicateWarning {
                    key: key.clone(),
                    source,
                    records: duplicates.iter().copied().collect(),
                });
            }
        }

        let missed = comparison.only_in_list1();
        let extra = comparison.only_in_list2();
        let modifications = reconcile(&missed, &extra);
        for modification in &modifications {
            info!(
                pair = %key,
                candidate = %modification.candidate,
                reference = %modification.reference,
                "Match only in candidate found with modification in reference"
            );
        }

        let pair = Self {
            key: key.clone(),
            in_both: comparison.total_number_in_both(),
            in_reference: comparison.total_number_in_list1(),
            in_candidate: comparison.total_number_in_list2(),
            missed: missed.into_iter().collect(),
            extra: extra.into_iter().collect(),
            modifications,
        };
        (pair, warnings)
    }
}

/// Counts summed over every genome pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ComparisonTotals {
    pub reported_by_both: usize,
    pub reference_only: usize,
    pub candidate_only: usize,
    pub total_in_reference: usize,
    pub total_in_candidate: usize,
}

impl ComparisonTotals {
    fn add(&mut self, pair: &PairComparison) {
        self.reported_by_both += pair.in_both;
        self.reference_only += pair.missed.len();
        self.candidate_only += pair.extra.len();
        self.total_in_reference += pair.in_reference;
        self.total_in_candidate += pair.in_candidate;
    }

    /// Share of reference records also in the candidate
    #[must_use]
    pub fn percent_both(&self) -> Option<f64> {
        percentage(self.reported_by_both, self.total_in_reference)
    }

    /// Share of reference records missing from the candidate
    #[must_use]
    pub fn percent_reference_only(&self) -> Option<f64> {
        percentage(self.reference_only, self.total_in_reference)
    }

    /// Extra candidate records relative to the reference total
    #[must_use]
    pub fn percent_candidate_only(&self) -> Option<f64> {
        percentage(self.candidate_only, self.total_in_reference)
    }
}

/// Result of comparing a reference collection against a candidate collection
#[derive(Debug, Clone, Default, Serialize)]
pub struct ComparisonReport {
    /// Per-pair results, ordered by key
    pub pairs: Vec<PairComparison>,
    pub totals: ComparisonTotals,
    pub duplicate_warnings: Vec<DuplicateWarning>,
}

impl ComparisonReport {
    /// Every missed record with its genome pair, ordered by key then record
    pub fn missed(&self) -> impl Iterator<Item = (&GenomePairKey, &MatchRecord)> {
        self.pairs
            .iter()
            .flat_map(|pair| pair.missed.iter().map(move |record| (&pair.key, record)))
    }

    #[must_use]
    pub fn missed_scores(&self) -> MissedScores {
        MissedScores::new(self.missed().map(|(_, record)| record.score))
    }

    #[must_use]
    pub fn modification_count(&self) -> usize {
        self.pairs.iter().map(|pair| pair.modifications.len()).sum()
    }

    /// Genome pairs with duplicates on either side
    #[must_use]
    pub fn duplicate_pairs(&self) -> BTreeSet<&GenomePairKey> {
        self.duplicate_warnings.iter().map(|w| &w.key).collect()
    }
}

/// Compare two collections pair by pair.
///
/// # Errors
///
/// Returns `CompareError::KeySetMismatch` before any comparison if the two
/// collections do not cover the same genome pairs.
pub fn compare_collections(
    reference: &MatchCollection,
    candidate: &MatchCollection,
) -> Result<ComparisonReport, CompareError> {
    check_key_sets(reference, candidate)?;

    let mut report = ComparisonReport::default();
    for (key, reference_records) in reference.iter() {
        let candidate_records = candidate.get(key).unwrap_or_default();
        let (pair, warnings) = PairComparison::compute(key, reference_records, candidate_records);

        debug!(
            pair = %key,
            both = pair.in_both,
            missed = pair.missed.len(),
            extra = pair.extra.len(),
            "Compared genome pair"
        );

        report.totals.add(&pair);
        report.duplicate_warnings.extend(warnings);
        report.pairs.push(pair);
    }

    Ok(report)
}
