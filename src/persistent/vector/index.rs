//! Index arithmetic for the bit-partitioned trie.
//!
//! Levels count upwards from the leaves: a leaf sits at level 0, a branch
//! whose children are leaves sits at level 1, and so on. A branch at level
//! `L` consumes the bits `[k * L, k * (L + 1))` of a global index to choose a
//! child, where `k = log2(N)`.

/// Number of index bits consumed per level (`k`, with `N = 2^k`).
#[inline]
pub(super) const fn bits_per_level<const N: usize>() -> u32 {
    N.trailing_zeros()
}

/// Bit mask selecting a slot within a single node.
#[inline]
pub(super) const fn mask<const N: usize>() -> usize {
    N - 1
}

/// Which child of a branch at `level` holds the (node-relative) `index`?
#[inline]
pub(super) const fn child_slot<const N: usize>(index: usize, level: u32) -> usize {
    (index >> (bits_per_level::<N>() * level)) & mask::<N>()
}

/// The part of `index` that is relative to the child chosen by [`child_slot`].
#[inline]
pub(super) const fn remaining_index<const N: usize>(index: usize, level: u32) -> usize {
    let shift = bits_per_level::<N>() * level;
    if shift >= usize::BITS {
        index
    } else {
        index & ((1 << shift) - 1)
    }
}

/// Maximum number of elements reachable beneath a branch at `level`
/// (`N^(level + 1)`), saturating at `usize::MAX`.
#[inline]
pub(super) const fn capacity<const N: usize>(level: u32) -> usize {
    let shift = bits_per_level::<N>() * (level + 1);
    if shift >= usize::BITS {
        usize::MAX
    } else {
        1 << shift
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 1, 0)]
    #[case(3, 1, 0)]
    #[case(4, 1, 1)]
    #[case(15, 1, 3)]
    #[case(16, 1, 0)]
    #[case(16, 2, 1)]
    #[case(63, 2, 3)]
    fn test_child_slot_with_branching_four(
        #[case] index: usize,
        #[case] level: u32,
        #[case] expected: usize,
    ) {
        assert_eq!(child_slot::<4>(index, level), expected);
    }

    #[rstest]
    #[case(0, 1, 0)]
    #[case(6, 1, 2)]
    #[case(17, 2, 1)]
    #[case(37, 2, 5)]
    fn test_remaining_index_with_branching_four(
        #[case] index: usize,
        #[case] level: u32,
        #[case] expected: usize,
    ) {
        assert_eq!(remaining_index::<4>(index, level), expected);
    }

    #[rstest]
    fn test_slot_and_remainder_recompose_index() {
        for index in 0..4096 {
            let level = 2;
            let shift = bits_per_level::<8>() * level;
            let recomposed =
                (child_slot::<8>(index, level) << shift) | remaining_index::<8>(index, level);
            assert_eq!(recomposed, index & (capacity::<8>(level) - 1));
        }
    }

    #[rstest]
    fn test_capacity() {
        assert_eq!(capacity::<4>(1), 16);
        assert_eq!(capacity::<4>(2), 64);
        assert_eq!(capacity::<32>(1), 1024);
        assert_eq!(capacity::<2>(63), usize::MAX);
    }

    #[rstest]
    fn test_bits_per_level() {
        assert_eq!(bits_per_level::<2>(), 1);
        assert_eq!(bits_per_level::<32>(), 5);
        assert_eq!(bits_per_level::<128>(), 7);
    }
}
