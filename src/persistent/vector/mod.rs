//! Persistent (immutable) vector based on a bit-partitioned trie.
//!
//! This module provides [`PersistentVector`], an immutable dynamic array
//! that uses structural sharing for efficient operations.
//!
//! # Overview
//!
//! `PersistentVector` is an `N`-way branching trie (32 by default) with a
//! tail buffer, in the style of Clojure's `PersistentVector`. It provides:
//!
//! - O(log_N n) random access (effectively O(1) for practical sizes)
//! - O(log_N n) `conj`, amortized O(1) thanks to the tail buffer
//! - O(log_N n) `update` and `unconj`
//! - O(1) `len`, `is_empty` and `last`
//!
//! All operations return new vectors without modifying the original, and
//! structural sharing ensures memory efficiency.
//!
//! # Internal Structure
//!
//! The vector consists of:
//! - A root branch (may be empty)
//! - A tail leaf (up to `N` elements) absorbing appends
//! - A cached length
//!
//! When the tail is full, the next `conj` flushes it into the trie as a new
//! rightmost leaf. When the trie itself is full, the root grows one level.
//! `unconj` reverses both steps, collapsing the root when it is left with a
//! single child.
//!
//! # Examples
//!
//! ```rust
//! use pvector::persistent::PersistentVector;
//!
//! let vector: PersistentVector<i32> = PersistentVector::new().conj(1).conj(2).conj(3);
//!
//! assert_eq!(vector.get(0), Some(&1));
//! assert_eq!(vector.get(1), Some(&2));
//! assert_eq!(vector.get(2), Some(&3));
//!
//! // Structural sharing: the original vector is preserved
//! let extended = vector.conj(4);
//! assert_eq!(vector.len(), 3);     // Original unchanged
//! assert_eq!(extended.len(), 4);   // New vector
//! ```

mod builder;
mod index;
mod iter;
mod leaf;
mod node;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Index;

pub use iter::{PersistentVectorIntoIterator, PersistentVectorIterator};

use self::leaf::Leaf;
use self::node::{Branch, Node};
use super::{Const, ReferenceCounter, ValidBranchingConstant, VectorError};

// =============================================================================
// PersistentVector Definition
// =============================================================================

/// A persistent (immutable) vector based on a bit-partitioned trie.
///
/// `N` is the branching factor: a power of two between 2 and 128, 32 by
/// default. Every node holds at most `N` children and every leaf at most `N`
/// elements.
///
/// # Time Complexity
///
/// | Operation    | Complexity                      |
/// |--------------|---------------------------------|
/// | `new`        | O(1)                            |
/// | `get`        | O(log_N n)                      |
/// | `conj`       | O(log_N n) amortized O(1)       |
/// | `unconj`     | O(log_N n)                      |
/// | `update`     | O(log_N n)                      |
/// | `last`       | O(1)                            |
/// | `slice`      | O(m) for a slice of length m    |
/// | `concat`     | O(m log_N n) for an operand of length m |
/// | `len`        | O(1)                            |
/// | `iter`       | O(1) to create, O(n) to iterate |
///
/// # Examples
///
/// ```rust
/// use pvector::persistent::PersistentVector;
///
/// let vector: PersistentVector<i32> = (0..100).collect();
/// assert_eq!(vector.len(), 100);
/// assert_eq!(vector.get(50), Some(&50));
/// ```
pub struct PersistentVector<T, const N: usize = 32>
where
    Const<N>: ValidBranchingConstant,
{
    /// Total number of elements
    length: usize,
    /// Root of the trie; holds everything except the tail
    root: ReferenceCounter<Branch<T, N>>,
    /// Tail buffer for efficient append (up to `N` elements)
    tail: ReferenceCounter<Leaf<T, N>>,
}

impl<T, const N: usize> PersistentVector<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    /// Creates a new empty vector.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pvector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = PersistentVector::new();
    /// assert!(vector.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            length: 0,
            root: ReferenceCounter::new(Branch::empty(1)),
            tail: ReferenceCounter::new(Leaf::empty()),
        }
    }

    /// Creates the canonical empty vector. Same as [`PersistentVector::new`].
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::new()
    }

    /// Creates a vector containing a single element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pvector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = PersistentVector::singleton(42);
    /// assert_eq!(vector.len(), 1);
    /// assert_eq!(vector.get(0), Some(&42));
    /// ```
    #[inline]
    #[must_use]
    pub fn singleton(element: T) -> Self {
        Self {
            length: 1,
            root: ReferenceCounter::new(Branch::empty(1)),
            tail: ReferenceCounter::new(Leaf::single(element)),
        }
    }

    /// Builds a vector from a fixed list of values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pvector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<&str> = PersistentVector::of(["a", "b", "c"]);
    /// assert_eq!(vector.len(), 3);
    /// ```
    #[must_use]
    pub fn of<const M: usize>(values: [T; M]) -> Self {
        builder::build_from_vec(Vec::from(values))
    }

    const fn from_parts(
        length: usize,
        root: ReferenceCounter<Branch<T, N>>,
        tail: ReferenceCounter<Leaf<T, N>>,
    ) -> Self {
        Self { length, root, tail }
    }

    fn into_parts(self) -> (ReferenceCounter<Branch<T, N>>, ReferenceCounter<Leaf<T, N>>) {
        (self.root, self.tail)
    }

    /// Returns the number of elements in the vector.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pvector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=5).collect();
    /// assert_eq!(vector.len(), 5);
    /// ```
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the vector contains no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the starting index of the tail buffer.
    #[inline]
    fn tail_offset(&self) -> usize {
        self.root.size()
    }

    /// Returns a reference to the element at the given index.
    ///
    /// Returns `None` if the index is out of bounds; this never panics.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pvector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=5).collect();
    /// assert_eq!(vector.get(0), Some(&1));
    /// assert_eq!(vector.get(4), Some(&5));
    /// assert_eq!(vector.get(10), None);
    /// ```
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        let tail_offset = self.tail_offset();
        if index < tail_offset {
            self.root.get(index)
        } else {
            self.tail.get(index - tail_offset)
        }
    }

    /// Returns a reference to the element at the given index, or
    /// [`VectorError::IndexOutOfBounds`].
    ///
    /// This is the asserting counterpart of [`PersistentVector::get`].
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::IndexOutOfBounds`] when `index >= self.len()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pvector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=5).collect();
    /// assert_eq!(vector.get_checked(1), Ok(&2));
    /// assert!(vector.get_checked(5).is_err());
    /// ```
    pub fn get_checked(&self, index: usize) -> Result<&T, VectorError> {
        self.get(index).ok_or(VectorError::IndexOutOfBounds {
            index,
            length: self.length,
        })
    }

    /// Returns a reference to the first element, or `None` if empty.
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.get(0)
    }

    /// Returns a reference to the last element, or `None` if empty.
    ///
    /// # Complexity
    ///
    /// O(1) - the last element is always in the tail
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pvector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=5).collect();
    /// assert_eq!(vector.last(), Some(&5));
    ///
    /// let empty: PersistentVector<i32> = PersistentVector::new();
    /// assert_eq!(empty.last(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.tail.last()
    }

    /// Returns an iterator over references to the elements, in index order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pvector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=5).collect();
    /// let collected: Vec<&i32> = vector.iter().collect();
    /// assert_eq!(collected, vec![&1, &2, &3, &4, &5]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> PersistentVectorIterator<'_, T, N> {
        PersistentVectorIterator::new(self)
    }

    /// Compares this vector elementwise against any ordered sequence.
    ///
    /// The sequences are equal when they have the same length and every pair
    /// of elements compares equal.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pvector::persistent::PersistentVector;
    /// use std::collections::VecDeque;
    ///
    /// let vector: PersistentVector<i32> = (1..=3).collect();
    /// let deque: VecDeque<i32> = (1..=3).collect();
    /// assert!(vector.eq_sequence(deque));
    /// assert!(!vector.eq_sequence([1, 2]));
    /// ```
    pub fn eq_sequence<I>(&self, other: I) -> bool
    where
        I: IntoIterator,
        T: PartialEq<I::Item>,
    {
        let mut other = other.into_iter();
        for element in self {
            match other.next() {
                Some(other_element) if *element == other_element => {}
                _ => return false,
            }
        }
        other.next().is_none()
    }

    /// Same tree shape on both sides: compare root and tail structurally.
    fn eq_structural(&self, other: &Self) -> bool
    where
        T: PartialEq,
    {
        (ReferenceCounter::ptr_eq(&self.root, &other.root) || *self.root == *other.root)
            && (ReferenceCounter::ptr_eq(&self.tail, &other.tail) || *self.tail == *other.tail)
    }

    /// Asserts every structural invariant of the trie.
    ///
    /// Intended for tests; panics with a description of the first violation.
    #[doc(hidden)]
    pub fn check_invariants(&self) {
        fn check_branch<T, const N: usize>(branch: &Branch<T, N>, rightmost: bool) {
            let children = branch.children();
            assert!(children.len() <= N, "branch has more than N children");
            assert_eq!(
                branch.size(),
                children.iter().map(Node::size).sum::<usize>(),
                "cached branch size is stale"
            );
            assert!(branch.size() <= branch.capacity(), "branch over capacity");
            assert!(
                rightmost || branch.is_full(),
                "only the rightmost path may be partial"
            );
            let last = children.len().saturating_sub(1);
            for (position, child) in children.iter().enumerate() {
                match child {
                    Node::Leaf(leaf) => {
                        assert_eq!(branch.level(), 1, "leaf below a branch above level 1");
                        assert!(leaf.is_full(), "trie leaves must be full");
                    }
                    Node::Branch(child) => {
                        assert_eq!(child.level() + 1, branch.level(), "level mismatch");
                        assert!(!child.children().is_empty(), "empty interior branch");
                        check_branch(child, rightmost && position == last);
                    }
                }
            }
        }

        assert_eq!(self.length, self.root.size() + self.tail.len());
        assert_eq!(
            self.tail.is_empty(),
            self.length == 0,
            "tail empty iff vector empty"
        );
        assert!(self.tail.len() <= N);
        assert!(self.root.level() >= 1);
        if self.root.level() > 1 {
            assert!(
                self.root.children().len() > 1,
                "root taller than necessary"
            );
        }
        check_branch(&self.root, true);
    }
}

impl<T: Clone, const N: usize> PersistentVector<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    /// Appends an element to the back of the vector.
    ///
    /// Returns a new vector with the element at the end.
    ///
    /// # Complexity
    ///
    /// O(log_N n) amortized O(1) due to the tail buffer
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pvector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = PersistentVector::new().conj(1).conj(2).conj(3);
    ///
    /// assert_eq!(vector.len(), 3);
    /// assert_eq!(vector.get(2), Some(&3));
    /// ```
    #[must_use]
    pub fn conj(&self, element: T) -> Self {
        if !self.tail.is_full() {
            return Self {
                length: self.length + 1,
                root: self.root.clone(),
                tail: ReferenceCounter::new(self.tail.conj(element)),
            };
        }

        // Tail is full: flush it into the trie, growing the root if needed.
        // The tail leaf is shared, not copied.
        let root = if self.root.is_full() {
            let grown = Branch::grow(self.root.clone(), self.tail.clone());
            tracing::trace!(
                level = grown.level(),
                length = self.length + 1,
                "grew vector root"
            );
            grown
        } else {
            self.root.conj_leaf(self.tail.clone())
        };

        Self {
            length: self.length + 1,
            root: ReferenceCounter::new(root),
            tail: ReferenceCounter::new(Leaf::single(element)),
        }
    }

    /// Appends every element of `iter`, in order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pvector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=3).collect();
    /// let extended = vector.conj_all(4..=6);
    ///
    /// assert_eq!(extended.to_vec(), vec![1, 2, 3, 4, 5, 6]);
    /// assert_eq!(vector.len(), 3);
    /// ```
    #[must_use]
    pub fn conj_all<I>(&self, iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        iter.into_iter()
            .fold(self.clone(), |vector, element| vector.conj(element))
    }

    /// Removes the last element from the vector.
    ///
    /// Popping the empty vector returns the empty vector again.
    ///
    /// # Complexity
    ///
    /// O(log_N n)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pvector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=5).collect();
    /// let remaining = vector.unconj();
    /// assert_eq!(remaining.to_vec(), vec![1, 2, 3, 4]);
    ///
    /// let empty: PersistentVector<i32> = PersistentVector::new();
    /// assert!(empty.unconj().is_empty());
    /// ```
    #[must_use]
    pub fn unconj(&self) -> Self {
        if self.length <= 1 {
            return Self::new();
        }

        if let Some(tail) = self.tail.unconj() {
            return Self {
                length: self.length - 1,
                root: self.root.clone(),
                tail: ReferenceCounter::new(tail),
            };
        }

        // The tail held a single element: refill it from the trie's last leaf.
        let Some(tail) = self.root.last_leaf().cloned() else {
            return Self::new();
        };
        let root = match self.root.unconj_leaf() {
            Some(shrunk) => match shrunk.sole_branch_child() {
                Some(only) => {
                    tracing::trace!(
                        level = only.level(),
                        length = self.length - 1,
                        "collapsed vector root"
                    );
                    only.clone()
                }
                None => ReferenceCounter::new(shrunk),
            },
            None => ReferenceCounter::new(Branch::empty(1)),
        };

        Self {
            length: self.length - 1,
            root,
            tail,
        }
    }

    /// Removes the last element from the vector.
    ///
    /// Returns `None` if the vector is empty, otherwise returns the new vector
    /// and the removed element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pvector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=5).collect();
    /// let (remaining, element) = vector.pop_back().unwrap();
    ///
    /// assert_eq!(element, 5);
    /// assert_eq!(remaining.len(), 4);
    /// ```
    #[must_use]
    pub fn pop_back(&self) -> Option<(Self, T)> {
        let element = self.last()?.clone();
        Some((self.unconj(), element))
    }

    /// Replaces the element at the given index.
    ///
    /// Only the nodes on the path from the root to `index` are copied; every
    /// other subtree is shared with `self`. An out-of-range `index` leaves the
    /// vector unchanged.
    ///
    /// # Complexity
    ///
    /// O(log_N n)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pvector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=5).collect();
    /// let updated = vector.update(2, 100);
    ///
    /// assert_eq!(updated.get(2), Some(&100));
    /// assert_eq!(vector.get(2), Some(&3)); // Original unchanged
    /// assert_eq!(vector.update(9, 100), vector);
    /// ```
    #[must_use]
    pub fn update(&self, index: usize, element: T) -> Self {
        if index >= self.length {
            return self.clone();
        }

        let tail_offset = self.tail_offset();
        if index >= tail_offset {
            Self {
                length: self.length,
                root: self.root.clone(),
                tail: ReferenceCounter::new(self.tail.update(index - tail_offset, element)),
            }
        } else {
            Self {
                length: self.length,
                root: ReferenceCounter::new(self.root.update(index, element)),
                tail: self.tail.clone(),
            }
        }
    }

    /// Returns a new vector holding the elements in `[start, end)`.
    ///
    /// `end` is clamped to the vector's length; an empty or inverted range
    /// yields an empty vector.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pvector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (0..10).collect();
    /// let sliced = vector.slice(2, 5);
    ///
    /// assert_eq!(sliced.to_vec(), vec![2, 3, 4]);
    /// assert!(vector.slice(7, 3).is_empty());
    /// ```
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> Self {
        let end = end.min(self.length);
        if start >= end {
            return Self::new();
        }
        if start == 0 && end == self.length {
            return self.clone();
        }
        self.iter().skip(start).take(end - start).cloned().collect()
    }

    /// Returns a new vector with the elements of `other` appended to `self`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pvector::persistent::PersistentVector;
    ///
    /// let left: PersistentVector<i32> = (1..=3).collect();
    /// let right: PersistentVector<i32> = (4..=6).collect();
    ///
    /// assert_eq!(left.concat(&right).to_vec(), vec![1, 2, 3, 4, 5, 6]);
    /// ```
    #[must_use]
    pub fn concat(&self, other: &Self) -> Self {
        if self.is_empty() {
            return other.clone();
        }
        self.conj_all(other.iter().cloned())
    }

    /// Creates a `PersistentVector` by cloning the elements of a slice.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pvector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = PersistentVector::from_slice(&[1, 2, 3, 4, 5]);
    /// assert_eq!(vector.len(), 5);
    /// ```
    #[must_use]
    pub fn from_slice(slice: &[T]) -> Self {
        builder::build_from_vec(slice.to_vec())
    }

    /// Copies the elements into a plain `Vec`, in index order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

#[cfg(feature = "rayon")]
impl<T: Sync, const N: usize> PersistentVector<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    /// Returns a parallel iterator over references to the elements.
    ///
    /// The references are gathered in index order first, so indexed rayon
    /// adaptors (`enumerate`, `zip`, `collect`) observe the vector's order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pvector::persistent::PersistentVector;
    /// use rayon::prelude::*;
    ///
    /// let vector: PersistentVector<i32> = (1..=100).collect();
    /// assert_eq!(vector.par_iter().sum::<i32>(), 5050);
    /// ```
    pub fn par_iter(&self) -> rayon::vec::IntoIter<&T> {
        use rayon::iter::IntoParallelIterator;
        self.iter().collect::<Vec<_>>().into_par_iter()
    }
}

// Nodes are shared through `Rc` unless the `arc` feature is enabled.
#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(PersistentVector<i32>: Send, Sync);
#[cfg(not(feature = "arc"))]
static_assertions::assert_not_impl_any!(PersistentVector<i32>: Send, Sync);

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T, const N: usize> Clone for PersistentVector<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    #[inline]
    fn clone(&self) -> Self {
        Self {
            length: self.length,
            root: self.root.clone(),
            tail: self.tail.clone(),
        }
    }
}

impl<T, const N: usize> Default for PersistentVector<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> Index<usize> for PersistentVector<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    type Output = T;

    /// Asserting subscript: `vector[index]`.
    ///
    /// [`PersistentVector::get`] is the plain subscript read and reports an
    /// out-of-range index as `None`; [`PersistentVector::get_checked`] reports
    /// it as [`VectorError::IndexOutOfBounds`]. This form is for call sites
    /// where an out-of-range index is a bug.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pvector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (0..3).collect();
    /// assert_eq!(vector[1], 1);
    /// assert_eq!(vector.get(3), None);
    /// ```
    ///
    /// ```rust,should_panic
    /// use pvector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (0..3).collect();
    /// let _ = vector[3];
    /// ```
    fn index(&self, index: usize) -> &Self::Output {
        match self.get(index) {
            Some(element) => element,
            None => panic!(
                "index {index} is out of bounds for a vector of length {}",
                self.length
            ),
        }
    }
}

impl<T, const N: usize> FromIterator<T> for PersistentVector<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        builder::build_from_vec(iter.into_iter().collect())
    }
}

impl<T, const N: usize> From<Vec<T>> for PersistentVector<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    fn from(elements: Vec<T>) -> Self {
        builder::build_from_vec(elements)
    }
}

impl<T, const N: usize, const M: usize> From<[T; M]> for PersistentVector<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    fn from(elements: [T; M]) -> Self {
        builder::build_from_vec(Vec::from(elements))
    }
}

impl<T: Clone, const N: usize> From<&[T]> for PersistentVector<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    fn from(elements: &[T]) -> Self {
        Self::from_slice(elements)
    }
}

impl<T: Clone, const N: usize> From<&PersistentVector<T, N>> for Vec<T>
where
    Const<N>: ValidBranchingConstant,
{
    fn from(vector: &PersistentVector<T, N>) -> Self {
        vector.to_vec()
    }
}

impl<T: Clone, const N: usize> Extend<T> for PersistentVector<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        *self = self.conj_all(iter);
    }
}

impl<T: Clone, const N: usize> IntoIterator for PersistentVector<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    type Item = T;
    type IntoIter = PersistentVectorIntoIterator<T, N>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        PersistentVectorIntoIterator::new(self)
    }
}

impl<'a, T, const N: usize> IntoIterator for &'a PersistentVector<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    type Item = &'a T;
    type IntoIter = PersistentVectorIterator<'a, T, N>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// =============================================================================
// Equality
// =============================================================================

impl<T: PartialEq, const N: usize> PartialEq for PersistentVector<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    /// Identity fast path, then a structural comparison of root and tail when
    /// both tries have the same shape, else an elementwise comparison.
    fn eq(&self, other: &Self) -> bool {
        if ReferenceCounter::ptr_eq(&self.root, &other.root)
            && ReferenceCounter::ptr_eq(&self.tail, &other.tail)
        {
            return true;
        }
        if self.length != other.length {
            return false;
        }
        if self.root.size() == other.root.size() && self.root.level() == other.root.level() {
            self.eq_structural(other)
        } else {
            self.iter()
                .zip(other.iter())
                .all(|(left, right)| left == right)
        }
    }
}

impl<T: Eq, const N: usize> Eq for PersistentVector<T, N>
where
    Const<N>: ValidBranchingConstant,
{
}

impl<T: PartialEq<U>, U, const N: usize> PartialEq<[U]> for PersistentVector<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    fn eq(&self, other: &[U]) -> bool {
        self.length == other.len() && self.iter().zip(other).all(|(left, right)| left == right)
    }
}

impl<T: PartialEq<U>, U, const N: usize> PartialEq<&[U]> for PersistentVector<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    fn eq(&self, other: &&[U]) -> bool {
        *self == **other
    }
}

impl<T: PartialEq<U>, U, const N: usize> PartialEq<Vec<U>> for PersistentVector<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    fn eq(&self, other: &Vec<U>) -> bool {
        *self == *other.as_slice()
    }
}

impl<T: PartialEq<U>, U, const N: usize, const M: usize> PartialEq<[U; M]>
    for PersistentVector<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    fn eq(&self, other: &[U; M]) -> bool {
        *self == other[..]
    }
}

/// Computes a hash value for this vector.
///
/// The length is hashed first, then each element in order, so equal vectors
/// produce equal hashes regardless of how their tries were built.
///
/// # Examples
///
/// ```rust
/// use pvector::persistent::PersistentVector;
/// use std::collections::HashMap;
///
/// let mut map: HashMap<PersistentVector<i32>, &str> = HashMap::new();
/// let key: PersistentVector<i32> = (1..=3).collect();
/// map.insert(key.clone(), "value");
/// assert_eq!(map.get(&key), Some(&"value"));
/// ```
impl<T: Hash, const N: usize> Hash for PersistentVector<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.length.hash(state);
        for element in self {
            element.hash(state);
        }
    }
}

// =============================================================================
// Formatting
// =============================================================================

impl<T: fmt::Debug, const N: usize> fmt::Debug for PersistentVector<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display, const N: usize> fmt::Display for PersistentVector<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "[")?;
        let mut first = true;
        for element in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{element}")?;
        }
        write!(formatter, "]")
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<T: serde::Serialize, const N: usize> serde::Serialize for PersistentVector<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for element in self {
            seq.serialize_element(element)?;
        }
        seq.end()
    }
}

#[cfg(feature = "serde")]
struct PersistentVectorVisitor<T, const N: usize> {
    marker: std::marker::PhantomData<T>,
}

#[cfg(feature = "serde")]
impl<T, const N: usize> PersistentVectorVisitor<T, N> {
    const fn new() -> Self {
        Self {
            marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, T, const N: usize> serde::de::Visitor<'de> for PersistentVectorVisitor<T, N>
where
    T: serde::Deserialize<'de>,
    Const<N>: ValidBranchingConstant,
{
    type Value = PersistentVector<T, N>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        const MAX_PREALLOCATE: usize = 4096;
        let capacity = seq.size_hint().unwrap_or(0).min(MAX_PREALLOCATE);
        let mut elements = Vec::with_capacity(capacity);
        while let Some(element) = seq.next_element()? {
            elements.push(element);
        }
        Ok(builder::build_from_vec(elements))
    }
}

#[cfg(feature = "serde")]
impl<'de, T, const N: usize> serde::Deserialize<'de> for PersistentVector<T, N>
where
    T: serde::Deserialize<'de>,
    Const<N>: ValidBranchingConstant,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(PersistentVectorVisitor::<T, N>::new())
    }
}

// =============================================================================
// Tests
// =============================================================================


#[cfg(all(test, feature = "arc"))]
mod multithread_tests {
    use super::*;
    use rstest::rstest;
    use std::thread;

    #[rstest]
    fn test_versions_diverge_independently_across_threads() {
        let base: PersistentVector<i32, 4> = (0..100).collect();

        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let local = base.clone();
                thread::spawn(move || {
                    let updated = local.update(worker, -1);
                    let extended = updated.conj(1000 + i32::try_from(worker).unwrap());
                    updated.check_invariants();
                    extended.check_invariants();
                    (updated, extended)
                })
            })
            .collect();

        for (worker, handle) in handles.into_iter().enumerate() {
            let (updated, extended) = handle.join().unwrap();
            let marker = 1000 + i32::try_from(worker).unwrap();

            assert_eq!(updated.get(worker), Some(&-1));
            assert_eq!(updated.len(), 100);
            // The update only touched the first child of the root.
            assert!(updated.root.children()[1].ptr_eq(&base.root.children()[1]));
            assert!(ReferenceCounter::ptr_eq(&updated.tail, &base.tail));

            assert_eq!(extended.get(worker), Some(&-1));
            assert_eq!(extended.last(), Some(&marker));
            assert_eq!(extended.len(), 101);
            // The full tail was flushed into the rightmost path.
            let children = extended.root.children();
            assert!(!children[1].ptr_eq(&base.root.children()[1]));
            assert!(children[0].ptr_eq(&updated.root.children()[0]));
        }
        assert_eq!(base.to_vec(), (0..100).collect::<Vec<_>>());
    }
}
