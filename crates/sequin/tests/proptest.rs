//! Property-based tests for sequin using proptest.

use std::collections::HashSet;

use proptest::prelude::*;
use sequin::{seq, Seq};

// ============================================================================
// Test helpers
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
struct Record {
    group: u8,
    label: String,
    position: usize,
}

// Strategy to generate records with many key collisions
fn record_strategy() -> impl Strategy<Value = (u8, String)> {
    (0u8..4, "[a-c]{1,2}")
}

fn records(raw: Vec<(u8, String)>) -> Vec<Record> {
    raw.into_iter()
        .enumerate()
        .map(|(position, (group, label))| Record {
            group,
            label,
            position,
        })
        .collect()
}

fn dedup_first_seen(items: &[i32]) -> Vec<i32> {
    let mut seen = HashSet::new();
    items.iter().copied().filter(|x| seen.insert(*x)).collect()
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Concatenation yields the first sequence followed by the second.
    #[test]
    fn concat_appends(
        a in prop::collection::vec(any::<i32>(), 0..50),
        b in prop::collection::vec(any::<i32>(), 0..50),
    ) {
        let joined = seq(a.clone()).concat(b.clone()).to_vec();
        let expected: Vec<i32> = a.into_iter().chain(b).collect();
        prop_assert_eq!(joined, expected);
    }

    /// A sequence equals itself and its own materialization.
    #[test]
    fn sequence_equal_is_reflexive(items in prop::collection::vec(any::<i32>(), 0..50)) {
        let s = seq(items).select(|x| x.wrapping_mul(3));
        prop_assert!(s.sequence_equal(s.clone()));
        prop_assert!(s.sequence_equal(s.to_vec()));
    }

    /// Sequences of different length are never equal.
    #[test]
    fn sequence_equal_detects_length(
        items in prop::collection::vec(any::<i32>(), 1..50),
    ) {
        let s = seq(items.clone());
        prop_assert!(!s.sequence_equal(items[1..].to_vec()));
        prop_assert!(!s.skip(1).sequence_equal(items));
    }

    /// Distinct keeps each value once, at its first position.
    #[test]
    fn distinct_keeps_first_seen_order(items in prop::collection::vec(0i32..10, 0..60)) {
        prop_assert_eq!(seq(items.clone()).distinct().to_vec(), dedup_first_seen(&items));
    }

    /// Ordering by a key matches a stable sort by that key.
    #[test]
    fn order_by_is_stable_sort(raw in prop::collection::vec(record_strategy(), 0..40)) {
        let data = records(raw);
        let mut expected = data.clone();
        expected.sort_by_key(|r| r.group);

        let ordered = seq(data.clone()).order_by(|r| r.group).to_vec();
        prop_assert_eq!(ordered, expected);

        let mut expected_desc = data.clone();
        expected_desc.sort_by(|a, b| b.group.cmp(&a.group));
        let ordered_desc = seq(data).order_by_descending(|r| r.group).to_vec();
        prop_assert_eq!(ordered_desc, expected_desc);
    }

    /// Float keys sort like a total order, with NaN keys at the end.
    #[test]
    fn float_keys_sort_with_nan_last(
        items in prop::collection::vec(
            prop_oneof![(-100i32..100).prop_map(f64::from), Just(f64::NAN)],
            0..40,
        ),
    ) {
        let ordered = seq(items.clone()).order_by(|x| *x).to_vec();
        let mut expected: Vec<f64> = items.iter().copied().filter(|x| !x.is_nan()).collect();
        expected.sort_by(|a, b| a.total_cmp(b));

        prop_assert_eq!(ordered.len(), items.len());
        prop_assert_eq!(&ordered[..expected.len()], &expected[..]);
        prop_assert!(ordered[expected.len()..].iter().all(|x| x.is_nan()));
    }

    /// Chained keys match a stable sort by the composite key.
    #[test]
    fn then_by_matches_composite_sort(raw in prop::collection::vec(record_strategy(), 0..40)) {
        let data = records(raw);
        let mut expected = data.clone();
        expected.sort_by(|a, b| a.group.cmp(&b.group).then_with(|| b.label.cmp(&a.label)));

        let ordered = seq(data)
            .order_by(|r| r.group)
            .then_by_descending(|r| r.label.clone())
            .to_vec();
        prop_assert_eq!(ordered, expected);
    }

    /// Except and intersect agree with membership filtering.
    #[test]
    fn except_and_intersect_match_filters(
        items in prop::collection::vec(0i32..20, 0..50),
        other in prop::collection::vec(0i32..20, 0..20),
    ) {
        let set: HashSet<i32> = other.iter().copied().collect();

        let kept = seq(items.clone()).except(other.clone()).to_vec();
        let expected: Vec<i32> = items.iter().copied().filter(|x| !set.contains(x)).collect();
        prop_assert_eq!(kept, expected);

        let shared = seq(items.clone()).intersect(other).to_vec();
        let expected: Vec<i32> = items.iter().copied().filter(|x| set.contains(x)).collect();
        prop_assert_eq!(shared, expected);
    }

    /// Union is the deduplicated concatenation.
    #[test]
    fn union_is_deduplicated_concat(
        a in prop::collection::vec(0i32..15, 0..30),
        b in prop::collection::vec(0i32..15, 0..30),
    ) {
        let merged = seq(a.clone()).union(b.clone()).to_vec();
        let all: Vec<i32> = a.into_iter().chain(b).collect();
        prop_assert_eq!(merged, dedup_first_seen(&all));
    }

    /// Take and skip partition the sequence.
    #[test]
    fn take_then_skip_partition(
        items in prop::collection::vec(any::<i32>(), 0..50),
        n in 0usize..60,
    ) {
        let s = seq(items.clone());
        let rejoined = s.take(n).concat(s.skip(n)).to_vec();
        prop_assert_eq!(rejoined, items);
    }

    /// Group sizes add up to the source length.
    #[test]
    fn group_sizes_sum_to_count(raw in prop::collection::vec(record_strategy(), 0..40)) {
        let data = seq(records(raw));
        let total: usize = data.group_by(|r| r.group).select(|g| g.count()).sum();
        prop_assert_eq!(total, data.count());
    }

    /// Reversing twice restores the original order.
    #[test]
    fn reverse_is_an_involution(items in prop::collection::vec(any::<i32>(), 0..50)) {
        prop_assert_eq!(seq(items.clone()).reverse().reverse().to_vec(), items);
    }

    /// Range yields `count` consecutive values.
    #[test]
    fn range_is_consecutive(start in -1000i64..1000, count in 0usize..100) {
        let values = Seq::range(start, count).to_vec();
        prop_assert_eq!(values.len(), count);
        prop_assert!(values.windows(2).all(|w| w[1] == w[0] + 1));
    }
}

// ============================================================================
// Edge cases
// ============================================================================

#[test]
fn empty_source_everywhere() {
    let empty: Seq<i32> = Seq::empty();
    assert!(empty.distinct().is_empty());
    assert!(empty.order_by(|x| *x).is_empty());
    assert!(empty.reverse().is_empty());
    assert!(empty.group_by(|x| *x).is_empty());
    assert!(empty.union(Seq::empty()).is_empty());
}
