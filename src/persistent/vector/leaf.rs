//! Leaves: the base case of the trie, holding up to `N` elements directly.

use arrayvec::ArrayVec;

/// A fixed-capacity run of elements.
///
/// Leaves are never mutated once they are reachable from a published vector.
/// Every operation below builds a new leaf instead.
pub(super) struct Leaf<T, const N: usize> {
    elements: ArrayVec<T, N>,
}

impl<T, const N: usize> Leaf<T, N> {
    pub(super) const fn empty() -> Self {
        Self {
            elements: ArrayVec::new_const(),
        }
    }

    pub(super) fn single(element: T) -> Self {
        let mut elements = ArrayVec::new();
        elements.push(element);
        Self { elements }
    }

    /// Wraps a chunk produced by the bulk builder.
    pub(super) const fn from_elements(elements: ArrayVec<T, N>) -> Self {
        Self { elements }
    }

    #[inline]
    pub(super) fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub(super) fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[inline]
    pub(super) fn is_full(&self) -> bool {
        self.elements.is_full()
    }

    #[inline]
    pub(super) fn get(&self, index: usize) -> Option<&T> {
        self.elements.get(index)
    }

    #[inline]
    pub(super) fn last(&self) -> Option<&T> {
        self.elements.last()
    }

    #[inline]
    pub(super) fn as_slice(&self) -> &[T] {
        &self.elements
    }
}

impl<T: Clone, const N: usize> Leaf<T, N> {
    /// Returns a copy of this leaf with slot `index` replaced.
    ///
    /// The caller guarantees `index < self.len()`.
    pub(super) fn update(&self, index: usize, element: T) -> Self {
        debug_assert!(index < self.len());
        let mut elements = self.elements.clone();
        elements[index] = element;
        Self { elements }
    }

    /// Returns a copy of this leaf with `element` appended.
    ///
    /// The caller guarantees the leaf is not full.
    pub(super) fn conj(&self, element: T) -> Self {
        debug_assert!(!self.is_full());
        let mut elements = self.elements.clone();
        elements.push(element);
        Self { elements }
    }

    /// Returns a copy of this leaf without its last element, or `None` when
    /// nothing would be left.
    pub(super) fn unconj(&self) -> Option<Self> {
        if self.len() <= 1 {
            return None;
        }
        let mut elements = self.elements.clone();
        elements.pop();
        Some(Self { elements })
    }
}

impl<T: PartialEq, const N: usize> PartialEq for Leaf<T, N> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .elements
                .iter()
                .zip(other.elements.iter())
                .all(|(left, right)| left == right)
    }
}
