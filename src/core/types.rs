use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::core::record::MatchRecord;

/// Identifies the pair of genomes whose entries were aligned against each other.
///
/// Positionally fixed: `(A, B)` and `(B, A)` are different keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GenomePairKey {
    pub genome1: String,
    pub genome2: String,
}

impl GenomePairKey {
    pub fn new(genome1: impl Into<String>, genome2: impl Into<String>) -> Self {
        Self {
            genome1: genome1.into(),
            genome2: genome2.into(),
        }
    }
}

impl std::fmt::Display for GenomePairKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.genome1, self.genome2)
    }
}

/// Which side of the comparison a collection was loaded for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Trusted ground-truth results
    Reference,
    /// Results produced by the system under evaluation
    Candidate,
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reference => write!(f, "reference"),
            Self::Candidate => write!(f, "candidate"),
        }
    }
}

/// Match records grouped by genome pair.
///
/// Record order within a key follows file and block order, but nothing
/// downstream depends on it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchCollection {
    entries: BTreeMap<GenomePairKey, Vec<MatchRecord>>,
}

impl MatchCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append records to a key, creating the key even when `records` is empty.
    pub fn extend<I>(&mut self, key: GenomePairKey, records: I)
    where
        I: IntoIterator<Item = MatchRecord>,
    {
        self.entries.entry(key).or_default().extend(records);
    }

    #[must_use]
    pub fn get(&self, key: &GenomePairKey) -> Option<&[MatchRecord]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    #[must_use]
    pub fn key_set(&self) -> BTreeSet<GenomePairKey> {
        self.entries.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GenomePairKey, &[MatchRecord])> {
        self.entries.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Number of genome pairs
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of records over all genome pairs
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}
