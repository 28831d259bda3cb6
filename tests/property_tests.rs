//! Property tests for the report parser and the set comparator.

use std::collections::{BTreeSet, HashMap};

use match_diff::matching::{duplicates_of, SetComparison};
use match_diff::parsing::refined::parse_refined_matches_text;
use match_diff::{MatchRecord, Range};
use proptest::prelude::*;

/// Small value ranges so that generated lists overlap often
fn record_strategy() -> impl Strategy<Value = MatchRecord> {
    (0u64..4, 0u64..4, 0u64..3, 0u64..3, 181u64..185).prop_map(|(e1, e2, s1, s2, score)| {
        MatchRecord::new(
            e1,
            e2,
            Range::new(s1, s1 + 10),
            Range::new(s2, s2 + 10),
            score,
        )
    })
}

/// A report entry: `None` is written as `NULL`
fn entry_strategy() -> impl Strategy<Value = Option<(MatchRecord, u8, bool)>> {
    prop::option::of((record_strategy(), 0u8..100, any::<bool>()))
}

fn write_entry(entry: &Option<(MatchRecord, u8, bool)>) -> String {
    match entry {
        None => "NULL".to_string(),
        Some((r, frac, with_extra)) => {
            let extra = if *with_extra { ",17" } else { "" };
            format!(
                "[{}, {},{}.{:02}, 3.5,{}..{} ,{}..{},\n0.25{}]",
                r.entry1,
                r.entry2,
                r.score,
                frac,
                r.range1.start,
                r.range1.end,
                r.range2.start,
                r.range2.end,
                extra
            )
        }
    }
}

proptest! {
    #[test]
    fn prop_parse_yields_one_record_per_non_null_entry(
        blocks in prop::collection::vec(prop::collection::vec(entry_strategy(), 0..6), 0..4)
    ) {
        let mut text = String::new();
        for (i, block) in blocks.iter().enumerate() {
            let entries: Vec<String> = block.iter().map(write_entry).collect();
            let terminator = if i % 2 == 0 { ';' } else { ':' };
            text.push_str(&format!("RefinedMatches([{}]){terminator}\n", entries.join(",")));
        }

        let expected: Vec<MatchRecord> = blocks
            .iter()
            .flatten()
            .filter_map(|entry| entry.map(|(record, _, _)| record))
            .collect();

        prop_assert_eq!(parse_refined_matches_text(&text).unwrap(), expected);
    }

    #[test]
    fn prop_partition_law(
        list1 in prop::collection::vec(record_strategy(), 0..30),
        list2 in prop::collection::vec(record_strategy(), 0..30),
    ) {
        let cmp = SetComparison::new(&list1, &list2);
        let both = cmp.intersection();
        let only1 = cmp.only_in_list1();
        let only2 = cmp.only_in_list2();

        prop_assert!(both.is_disjoint(&only1));
        prop_assert!(both.is_disjoint(&only2));
        prop_assert!(only1.is_disjoint(&only2));

        let rebuilt: BTreeSet<MatchRecord> =
            both.iter().chain(&only1).chain(&only2).copied().collect();
        prop_assert_eq!(rebuilt, cmp.union());
    }

    #[test]
    fn prop_cardinality_law(
        list1 in prop::collection::vec(record_strategy(), 0..30),
        list2 in prop::collection::vec(record_strategy(), 0..30),
    ) {
        let cmp = SetComparison::new(&list1, &list2);
        prop_assert_eq!(
            cmp.total_number(),
            cmp.total_number_in_list1() + cmp.total_number_in_list2() - cmp.total_number_in_both()
        );
    }

    #[test]
    fn prop_order_independence(
        list1 in prop::collection::vec(record_strategy(), 0..30),
        list2 in prop::collection::vec(record_strategy(), 0..30),
    ) {
        let cmp = SetComparison::new(&list1, &list2);

        let mut reversed1 = list1.clone();
        reversed1.reverse();
        let mut sorted2 = list2.clone();
        sorted2.sort();
        let shuffled = SetComparison::new(&reversed1, &sorted2);

        prop_assert_eq!(cmp.union(), shuffled.union());
        prop_assert_eq!(cmp.intersection(), shuffled.intersection());
        prop_assert_eq!(cmp.only_in_list1(), shuffled.only_in_list1());
        prop_assert_eq!(cmp.only_in_list2(), shuffled.only_in_list2());
        prop_assert_eq!(cmp.duplicates_in_list1(), shuffled.duplicates_in_list1());
        prop_assert_eq!(cmp.duplicates_in_list2(), shuffled.duplicates_in_list2());
    }

    #[test]
    fn prop_duplicates_are_values_seen_more_than_once(
        list in prop::collection::vec(record_strategy(), 0..40),
    ) {
        let mut counts: HashMap<MatchRecord, usize> = HashMap::new();
        for record in &list {
            *counts.entry(*record).or_default() += 1;
        }
        let expected: BTreeSet<MatchRecord> = counts
            .into_iter()
            .filter(|&(_, count)| count > 1)
            .map(|(record, _)| record)
            .collect();

        prop_assert_eq!(duplicates_of(&list), expected);
    }
}
