#![allow(clippy::unwrap_used)]
use rstest::rstest;

use crate::eval::IntRange;

#[rstest]
#[case(1, 3, 3)]
#[case(3, 1, 0)]
#[case(5, 5, 1)]
#[case(-2, 2, 5)]
fn range_length(#[case] start: i64, #[case] stop: i64, #[case] expected: usize) {
    assert_eq!(IntRange::new(start, stop).len(), expected);
}

#[test]
fn range_is_inclusive_and_iterates_in_order() {
    let range = IntRange::new(1, 3);
    assert_eq!(range.iter().collect::<Vec<_>>(), vec![1, 2, 3]);
}

#[test]
fn range_positional_access_wraps_negative_indices() {
    let range = IntRange::new(1, 3);
    assert_eq!(range.at(0), Some(1));
    assert_eq!(range.at(2), Some(3));
    assert_eq!(range.at(-1), Some(3));
    assert_eq!(range.at(-3), Some(1));
    assert_eq!(range.at(3), None);
    assert_eq!(range.at(-4), None);
}

#[test]
fn range_predicates_short_circuit() {
    // A range big enough that a non-lazy check would be felt.
    let range = IntRange::new(0, i64::MAX / 2);
    let mut checked = 0usize;
    assert!(range.any(|v| {
        checked += 1;
        v == 3
    }));
    assert_eq!(checked, 4);

    let mut checked = 0usize;
    assert!(!range.all(|v| {
        checked += 1;
        v < 2
    }));
    assert_eq!(checked, 3);
}

#[test]
fn range_with_step_and_reversed() {
    let range = IntRange::with_step(10, 0, -2);
    assert_eq!(range.len(), 6);
    assert_eq!(range.at(0), Some(10));
    assert_eq!(range.at(-1), Some(0));
    assert_eq!(range.iter().collect::<Vec<_>>(), vec![10, 8, 6, 4, 2, 0]);
}
