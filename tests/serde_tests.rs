//! Serialization of both multisets as `(item, count)` sequences.

#![cfg(feature = "serde")]

use counted_multiset::{CountedMultiset, HashMultiset};
use rstest::rstest;
use serde::Deserialize;

const OVERFLOWING: &str = r#"[["a",18446744073709551615],["b",1]]"#;

#[rstest]
fn test_counted_serializes_entries_in_order() {
    let mut set = CountedMultiset::new();
    set.insert_many("b", 2);
    set.insert("a");

    let json = serde_json::to_string(&set).unwrap();
    assert_eq!(json, r#"[["b",2],["a",1]]"#);
}

#[rstest]
fn test_counted_roundtrip_preserves_counts_and_order() {
    let set = CountedMultiset::from(["x", "y", "x", "z", "x"]);

    let json = serde_json::to_string(&set).unwrap();
    let restored: CountedMultiset<String> = serde_json::from_str(&json).unwrap();

    assert_eq!(restored.to_string(), "[x x 3, y x 1, z x 1]");
    assert_eq!(restored.len(), 5);
}

#[rstest]
fn test_hashed_roundtrip_preserves_counts_and_order() {
    let set = HashMultiset::from([3, 1, 3, 2]);

    let json = serde_json::to_string(&set).unwrap();
    let restored: HashMultiset<i32> = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, set);
    assert_eq!(restored.to_string(), "[3 x 2, 1 x 1, 2 x 1]");
}

#[rstest]
fn test_deserialize_merges_repeated_items_and_skips_zero_counts() {
    let restored: CountedMultiset<char> =
        serde_json::from_str(r#"[["a",1],["b",0],["a",2]]"#).unwrap();

    assert_eq!(restored.count(&'a'), 3);
    assert!(!restored.contains(&'b'));
    assert_eq!(restored.distinct_len(), 1);
}

#[rstest]
#[cfg(target_pointer_width = "64")]
fn test_deserialize_rejects_total_count_overflow() {
    let counted = serde_json::from_str::<CountedMultiset<char>>(OVERFLOWING);
    let hashed = serde_json::from_str::<HashMultiset<char>>(OVERFLOWING);

    let err = counted.unwrap_err();
    assert!(err.to_string().contains("occurrence count overflow"), "{}", err);
    let err = hashed.unwrap_err();
    assert!(err.to_string().contains("occurrence count overflow"), "{}", err);
}

#[rstest]
#[cfg(target_pointer_width = "64")]
fn test_deserialize_in_place_rejects_total_count_overflow() {
    let mut place = HashMultiset::from(['z']);
    let mut deserializer = serde_json::Deserializer::from_str(OVERFLOWING);

    let err = HashMultiset::deserialize_in_place(&mut deserializer, &mut place).unwrap_err();
    assert!(err.to_string().contains("occurrence count overflow"), "{}", err);
    assert!(!place.contains(&'b'));
}
