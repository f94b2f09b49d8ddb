//! Example-based tests for PersistentVector through its public API.
//!
//! Most tests run at a branching factor of 4 so that trie growth, tail
//! flushes and root collapses happen at small sizes.

use pvector::persistent::{PersistentVector, VectorError};
use pvector::pvector;
use rstest::rstest;
use std::collections::HashSet;

type SmallVector<T> = PersistentVector<T, 4>;

// =============================================================================
// Construction
// =============================================================================

#[rstest]
fn test_new_creates_empty_vector() {
    let vector: PersistentVector<i32> = PersistentVector::new();
    assert!(vector.is_empty());
    assert_eq!(vector.len(), 0);
    assert_eq!(vector.get(0), None);
    assert_eq!(vector.last(), None);
    vector.check_invariants();
}

#[rstest]
fn test_default_is_empty() {
    let vector: SmallVector<String> = SmallVector::default();
    assert_eq!(vector, SmallVector::empty());
}

#[rstest]
fn test_singleton() {
    let vector: SmallVector<&str> = SmallVector::singleton("only");
    assert_eq!(vector.len(), 1);
    assert_eq!(vector.first(), Some(&"only"));
    assert_eq!(vector.last(), Some(&"only"));
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(4)]
#[case(17)]
#[case(64)]
#[case(65)]
#[case(1000)]
fn test_from_sequence_matches_input(#[case] length: usize) {
    let source: Vec<usize> = (0..length).collect();
    let vector: SmallVector<usize> = SmallVector::from(source.clone());
    vector.check_invariants();
    assert_eq!(vector.len(), length);
    assert_eq!(vector.to_vec(), source);
    for (index, element) in source.iter().enumerate() {
        assert_eq!(vector.get(index), Some(element));
    }
}

#[rstest]
fn test_conversions_agree() {
    let from_slice = SmallVector::from_slice(&[1, 2, 3, 4, 5]);
    let from_ref_slice: SmallVector<i32> = SmallVector::from(&[1, 2, 3, 4, 5][..]);
    let from_array: SmallVector<i32> = SmallVector::from([1, 2, 3, 4, 5]);
    let from_macro: SmallVector<i32> = pvector![1, 2, 3, 4, 5];
    let collected: SmallVector<i32> = (1..=5).collect();

    assert_eq!(from_slice, from_ref_slice);
    assert_eq!(from_slice, from_array);
    assert_eq!(from_slice, from_macro);
    assert_eq!(from_slice, collected);
    assert_eq!(Vec::from(&from_slice), vec![1, 2, 3, 4, 5]);
}

#[rstest]
fn test_construction_does_not_require_clone() {
    struct Opaque(u8);

    let vector: SmallVector<Opaque> = (0..10).map(Opaque).collect();
    assert_eq!(vector.len(), 10);
    assert_eq!(vector.get(9).map(|opaque| opaque.0), Some(9));
}

// =============================================================================
// conj
// =============================================================================

#[rstest]
fn test_conj_does_not_modify_original() {
    let vector1: SmallVector<i32> = SmallVector::new().conj(1);
    let vector2 = vector1.conj(2);

    assert_eq!(vector1, [1]);
    assert_eq!(vector2, [1, 2]);
}

#[rstest]
fn test_conj_past_tail_capacity() {
    let vector: SmallVector<i32> = SmallVector::from(vec![0, 1, 2, 3]).conj(4);
    assert_eq!(vector.len(), 5);
    assert_eq!(vector.get(4), Some(&4));
    assert_eq!(vector.last(), Some(&4));
    vector.check_invariants();
}

#[rstest]
fn test_conj_many_with_default_branching() {
    let vector = (0..5000).fold(PersistentVector::<i32>::new(), |vector, element| {
        vector.conj(element)
    });
    vector.check_invariants();
    assert_eq!(vector.len(), 5000);
    assert!(vector.iter().copied().eq(0..5000));
}

#[rstest]
fn test_conj_all_and_extend() {
    let base: SmallVector<i32> = (0..3).collect();
    let appended = base.conj_all(3..10);
    assert_eq!(appended.to_vec(), (0..10).collect::<Vec<_>>());

    let mut extended = base.clone();
    extended.extend(3..10);
    assert_eq!(extended, appended);
    assert_eq!(base.len(), 3);
}

// =============================================================================
// unconj / pop_back
// =============================================================================

#[rstest]
fn test_unconj_removes_last() {
    let vector: SmallVector<i32> = (0..10).collect();
    let popped = vector.unconj();
    assert_eq!(popped.to_vec(), (0..9).collect::<Vec<_>>());
    assert_eq!(vector.len(), 10);
}

#[rstest]
fn test_unconj_of_empty_is_empty() {
    let vector: SmallVector<i32> = SmallVector::new();
    assert!(vector.unconj().is_empty());
    assert!(vector.unconj().unconj().is_empty());
}

#[rstest]
fn test_unconj_then_conj_reuses_tail_slot() {
    let vector: SmallVector<i32> = (0..21).collect();
    let replaced = vector.unconj().conj(-20);
    replaced.check_invariants();
    assert_eq!(replaced.get(20), Some(&-20));
    assert_eq!(replaced.len(), 21);
}

#[rstest]
fn test_pop_back_drains_in_reverse() {
    let mut vector: SmallVector<i32> = (0..30).collect();
    let mut drained = Vec::new();
    while let Some((remaining, element)) = vector.pop_back() {
        drained.push(element);
        vector = remaining;
    }
    assert_eq!(drained, (0..30).rev().collect::<Vec<_>>());
    assert!(vector.is_empty());
}

// =============================================================================
// get / update
// =============================================================================

#[rstest]
fn test_get_checked_reports_length() {
    let vector: SmallVector<i32> = (0..3).collect();
    assert_eq!(vector.get_checked(2), Ok(&2));
    let error = vector.get_checked(7).unwrap_err();
    assert_eq!(
        error,
        VectorError::IndexOutOfBounds {
            index: 7,
            length: 3
        }
    );
    assert_eq!(
        error.to_string(),
        "index 7 is out of bounds for a vector of length 3"
    );
}

#[rstest]
fn test_index_operator() {
    let vector: SmallVector<i32> = (10..20).collect();
    assert_eq!(vector[0], 10);
    assert_eq!(vector[9], 19);
}

#[rstest]
fn test_update_preserves_original() {
    let vector: SmallVector<i32> = (0..8).collect();
    let updated = vector.update(6, 99);
    assert_eq!(updated.to_vec(), vec![0, 1, 2, 3, 4, 5, 99, 7]);
    assert_eq!(vector.to_vec(), (0..8).collect::<Vec<_>>());
}

#[rstest]
#[case(0)]
#[case(3)]
#[case(47)]
#[case(63)]
#[case(99)]
fn test_update_every_region(#[case] index: usize) {
    let vector: SmallVector<usize> = (0..100).collect();
    let updated = vector.update(index, usize::MAX);
    updated.check_invariants();
    assert_eq!(updated.get(index), Some(&usize::MAX));
    assert_eq!(updated.len(), 100);
    let overwritten = updated
        .iter()
        .filter(|element| **element == usize::MAX)
        .count();
    assert_eq!(overwritten, 1);
}

#[rstest]
fn test_update_out_of_range_returns_equal_vector() {
    let vector: SmallVector<i32> = (0..5).collect();
    assert_eq!(vector.update(5, 0), vector);
    assert_eq!(vector.update(usize::MAX, 0), vector);
}

// =============================================================================
// Equality and hashing
// =============================================================================

#[rstest]
fn test_equality() {
    let left: SmallVector<i32> = SmallVector::from(vec![1, 2, 3]);
    let right: SmallVector<i32> = SmallVector::from(vec![1, 2, 3]);
    let different: SmallVector<i32> = SmallVector::from(vec![1, 2, 4]);
    let shorter: SmallVector<i32> = SmallVector::from(vec![1, 2]);

    assert_eq!(left, right);
    assert_ne!(left, different);
    assert_ne!(left, shorter);
}

#[rstest]
fn test_eq_sequence_against_any_iterable() {
    let vector: SmallVector<i32> = (0..6).collect();
    assert!(vector.eq_sequence(0..6));
    assert!(!vector.eq_sequence(0..5));
    assert!(!vector.eq_sequence(0..7));
    assert!(SmallVector::<i32>::new().eq_sequence(Vec::<i32>::new()));
}

#[rstest]
fn test_equal_vectors_hash_equally() {
    let built: SmallVector<i32> = (0..40).collect();
    let conjoined = (0..40).fold(SmallVector::new(), |vector, element| vector.conj(element));
    let updated = built.update(0, 0);

    let mut set = HashSet::new();
    set.insert(built);
    assert!(set.contains(&conjoined));
    assert!(set.contains(&updated));
    assert!(!set.contains(&conjoined.conj(40)));
}

// =============================================================================
// Iteration / formatting
// =============================================================================

#[rstest]
fn test_iteration_forms() {
    let vector: SmallVector<i32> = (0..25).collect();
    let mut by_reference = Vec::new();
    for element in &vector {
        by_reference.push(*element);
    }
    let by_value: Vec<i32> = vector.clone().into_iter().collect();

    assert_eq!(by_reference, (0..25).collect::<Vec<_>>());
    assert_eq!(by_value, by_reference);
    assert_eq!(vector.iter().len(), 25);
    assert_eq!(vector.iter().sum::<i32>(), (0..25).sum::<i32>());
}

#[rstest]
fn test_display_and_debug() {
    let vector: SmallVector<i32> = (1..=3).collect();
    assert_eq!(format!("{vector}"), "[1, 2, 3]");
    assert_eq!(format!("{vector:?}"), "[1, 2, 3]");
    assert_eq!(format!("{}", SmallVector::<i32>::new()), "[]");
}

// =============================================================================
// slice / concat
// =============================================================================

#[rstest]
fn test_slice_and_concat_round_trip() {
    let vector: SmallVector<i32> = (0..50).collect();
    let left = vector.slice(0, 17);
    let right = vector.slice(17, 50);
    assert_eq!(left.concat(&right), vector);
    assert_eq!(vector.slice(0, 50), vector);
    assert!(vector.slice(60, 70).is_empty());
}
