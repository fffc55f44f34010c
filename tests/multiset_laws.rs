//! Property-based tests for the multiset invariants.

use counted_multiset::{CountedMultiset, Cursor, HashMultiset, Multiset};
use proptest::prelude::*;
use std::collections::HashMap;

#[derive(Debug, Clone)]
enum Op {
    Insert(u8, usize),
    Remove(u8),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..8, 0usize..4).prop_map(|(item, n)| Op::Insert(item, n)),
        (0u8..8).prop_map(Op::Remove),
    ]
}

fn apply(set: &mut dyn Multiset<u8>, model: &mut HashMap<u8, usize>, ops: &[Op]) {
    for op in ops {
        match *op {
            Op::Insert(item, n) => {
                let previous = set.insert_many(item, n);
                if n == 0 {
                    assert_eq!(previous, 0);
                } else {
                    let count = model.entry(item).or_insert(0);
                    assert_eq!(previous, *count);
                    *count += n;
                }
            }
            Op::Remove(item) => {
                let present = model.get(&item).copied().unwrap_or(0) > 0;
                assert_eq!(set.remove(&item), present);
                if present {
                    let count = model.entry(item).or_insert(0);
                    *count -= 1;
                    if *count == 0 {
                        model.remove(&item);
                    }
                }
            }
        }
    }
}

fn traverse(set: &mut dyn Multiset<u8>) -> Vec<u8> {
    let mut cursor = Cursor::new(set);
    let mut visited = Vec::new();
    while let Ok(&item) = cursor.next() {
        visited.push(item);
    }
    visited
}

fn check_against_model(set: &mut dyn Multiset<u8>, model: &HashMap<u8, usize>) {
    assert_eq!(set.len(), model.values().sum::<usize>());
    assert_eq!(set.distinct_len(), model.len());
    for item in 0u8..8 {
        assert_eq!(set.count(&item), model.get(&item).copied().unwrap_or(0));
    }

    let visited = traverse(set);
    assert_eq!(visited.len(), set.len());

    // Occurrences of each item are contiguous and follow the slot order.
    let mut expected = Vec::new();
    for slot in 0..set.distinct_len() {
        let (&item, count) = set.entry(slot).unwrap();
        assert!(count >= 1);
        expected.extend(std::iter::repeat(item).take(count));
    }
    assert_eq!(visited, expected);
}

proptest! {
    #[test]
    fn prop_counted_matches_model(ops in prop::collection::vec(op_strategy(), 0..64)) {
        let mut set: CountedMultiset<u8> = CountedMultiset::new();
        let mut model = HashMap::new();
        apply(&mut set, &mut model, &ops);
        check_against_model(&mut set, &model);
    }

    #[test]
    fn prop_hashed_matches_model(ops in prop::collection::vec(op_strategy(), 0..64)) {
        let mut set: HashMultiset<u8> = HashMultiset::new();
        let mut model = HashMap::new();
        apply(&mut set, &mut model, &ops);
        check_against_model(&mut set, &model);
    }

    #[test]
    fn prop_both_variants_keep_same_order(ops in prop::collection::vec(op_strategy(), 0..64)) {
        let mut counted: CountedMultiset<u8> = CountedMultiset::new();
        let mut hashed: HashMultiset<u8> = HashMultiset::new();
        apply(&mut counted, &mut HashMap::new(), &ops);
        apply(&mut hashed, &mut HashMap::new(), &ops);

        prop_assert_eq!(counted.iter().collect::<Vec<_>>(), hashed.iter().collect::<Vec<_>>());
        prop_assert_eq!(counted.to_string(), hashed.to_string());
        prop_assert!(counted == hashed);
    }

    #[test]
    fn prop_equality_ignores_insertion_order(
        counts in prop::collection::vec((0u8..16, 1usize..5), 0..16),
    ) {
        let mut forward = CountedMultiset::new();
        for &(item, n) in &counts {
            forward.insert_many(item, n);
        }
        let mut backward = CountedMultiset::new();
        for &(item, n) in counts.iter().rev() {
            backward.insert_many(item, n);
        }

        prop_assert_eq!(&forward, &backward);
        prop_assert_eq!(forward.len(), backward.len());
    }

    #[test]
    fn prop_cursor_removal_takes_exactly_one(
        counts in prop::collection::vec((0u8..8, 1usize..4), 1..12),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut set = HashMultiset::new();
        for &(item, n) in &counts {
            set.insert_many(item, n);
        }
        let before = set.clone();
        let target = pick.index(set.len());

        let mut cursor = set.cursor();
        let mut removed = None;
        let mut visited = 0;
        while let Ok(&item) = cursor.next() {
            if visited == target {
                cursor.remove().unwrap();
                removed = Some(item);
            }
            visited += 1;
        }
        drop(cursor);

        prop_assert_eq!(visited, before.len());
        let removed = removed.unwrap();
        prop_assert_eq!(set.len(), before.len() - 1);
        prop_assert_eq!(set.count(&removed), before.count(&removed) - 1);
        for (item, count) in before.entries() {
            if *item != removed {
                prop_assert_eq!(set.count(item), count);
            }
        }
    }

    #[test]
    fn prop_iter_matches_cursor(counts in prop::collection::vec((0u8..8, 1usize..4), 0..12)) {
        let mut set = CountedMultiset::new();
        for &(item, n) in &counts {
            set.insert_many(item, n);
        }

        let iterated: Vec<u8> = set.iter().copied().collect();
        prop_assert_eq!(set.iter().len(), set.len());
        prop_assert_eq!(iterated, traverse(&mut set));
    }
}
