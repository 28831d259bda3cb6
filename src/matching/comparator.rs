use std::collections::{BTreeSet, HashMap};

use crate::core::record::MatchRecord;

/// Records that occur more than once in `records`, each reported once.
#[must_use]
pub fn duplicates_of(records: &[MatchRecord]) -> BTreeSet<MatchRecord> {
    let mut counts: HashMap<&MatchRecord, usize> = HashMap::new();
    for record in records {
        *counts.entry(record).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .filter(|&(_, count)| count > 1)
        .map(|(record, _)| *record)
        .collect()
}

/// Set comparison of two record lists for the same genome pair.
///
/// Each list is treated as a set: repeated records collapse into one, and
/// input order has no effect. Repeats are still available through
/// [`duplicates_in_list1`](Self::duplicates_in_list1) and
/// [`duplicates_in_list2`](Self::duplicates_in_list2) so callers can warn
/// about them.
#[derive(Debug, Clone)]
pub struct SetComparison {
    set1: BTreeSet<MatchRecord>,
    set2: BTreeSet<MatchRecord>,
    duplicates1: BTreeSet<MatchRecord>,
    duplicates2: BTreeSet<MatchRecord>,
}

impl SetComparison {
    /// `list1` is the reference list, `list2` the candidate list.
    #[must_use]
    pub fn new(list1: &[MatchRecord], list2: &[MatchRecord]) -> Self {
        Self {
            set1: list1.iter().copied().collect(),
            set2: list2.iter().copied().collect(),
            duplicates1: duplicates_of(list1),
            duplicates2: duplicates_of(list2),
        }
    }

    #[must_use]
    pub fn union(&self) -> BTreeSet<MatchRecord> {
        self.set1.union(&self.set2).copied().collect()
    }

    #[must_use]
    pub fn intersection(&self) -> BTreeSet<MatchRecord> {
        self.set1.intersection(&self.set2).copied().collect()
    }

    /// Records in the reference but not the candidate (missed)
    #[must_use]
    pub fn only_in_list1(&self) -> BTreeSet<MatchRecord> {
        self.set1.difference(&self.set2).copied().collect()
    }

    /// Records in the candidate but not the reference (extra)
    #[must_use]
    pub fn only_in_list2(&self) -> BTreeSet<MatchRecord> {
        self.set2.difference(&self.set1).copied().collect()
    }

    /// Size of the union
    #[must_use]
    pub fn total_number(&self) -> usize {
        self.set1.union(&self.set2).count()
    }

    #[must_use]
    pub fn total_number_in_both(&self) -> usize {
        self.set1.intersection(&self.set2).count()
    }

    #[must_use]
    pub fn total_number_in_list1(&self) -> usize {
        self.set1.len()
    }

    #[must_use]
    pub fn total_number_in_list2(&self) -> usize {
        self.set2.len()
    }

    #[must_use]
    pub fn duplicates_in_list1(&self) -> &BTreeSet<MatchRecord> {
        &self.duplicates1
    }

    #[must_use]
    pub fn duplicates_in_list2(&self) -> &BTreeSet<MatchRecord> {
        &self.duplicates2
    }

    #[must_use]
    pub fn list1_has_duplicates(&self) -> bool {
        !self.duplicates1.is_empty()
    }

    #[must_use]
    pub fn list2_has_duplicates(&self) -> bool {
        !self.duplicates2.is_empty()
    }
}
