use serde::Serialize;
use std::collections::HashMap;

use crate::core::record::MatchRecord;

/// A candidate-only record that aligns the same entries as a reference-only record.
///
/// Likely the same alignment with different ranges or score rather than a
/// genuinely missed plus a genuinely spurious match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Modification {
    /// Record only in the candidate
    pub candidate: MatchRecord,
    /// First record only in the reference with the same entries
    pub reference: MatchRecord,
}

/// Pair up extra records with missed records aligning the same two entries.
///
/// For each record of `only_in_list2`, in order, the first record of
/// `only_in_list1` with equal `entry1` and `entry2` is reported. Records with
/// no counterpart are left out. Diagnostic only: set membership is unchanged.
pub fn reconcile<'a, I, J>(only_in_list1: I, only_in_list2: J) -> Vec<Modification>
where
    I: IntoIterator<Item = &'a MatchRecord>,
    J: IntoIterator<Item = &'a MatchRecord>,
{
    let mut first_by_entries: HashMap<(u64, u64), &MatchRecord> = HashMap::new();
    for record in only_in_list1 {
        first_by_entries
            .entry((record.entry1, record.entry2))
            .or_insert(record);
    }

    only_in_list2
        .into_iter()
        .filter_map(|candidate| {
            first_by_entries
                .get(&(candidate.entry1, candidate.entry2))
                .map(|reference| Modification {
                    candidate: *candidate,
                    reference: **reference,
                })
        })
        .collect()
}
