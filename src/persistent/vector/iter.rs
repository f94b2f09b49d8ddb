//! Iterators over a [`PersistentVector`].
//!
//! Both iterators walk the trie depth-first, left to right, with an explicit
//! stack, and then drain the tail. Each visits every node exactly once, so a
//! full traversal is O(N). A fresh iterator is created per traversal; the
//! vector itself is never advanced.

use std::iter::FusedIterator;

use smallvec::SmallVec;

use super::PersistentVector;
use super::leaf::Leaf;
use super::node::{Branch, Node};
use crate::persistent::{Const, ReferenceCounter, ValidBranchingConstant};

/// Inline stack depth; enough for any practical vector with `N >= 8`.
const STACK_CAPACITY: usize = 8;

// =============================================================================
// Borrowing Iterator
// =============================================================================

/// An iterator over references to elements of a [`PersistentVector`].
pub struct PersistentVectorIterator<'a, T, const N: usize = 32> {
    /// One child iterator per branch on the current root-to-leaf path
    stack: SmallVec<[std::slice::Iter<'a, Node<T, N>>; STACK_CAPACITY]>,
    /// Elements left in the current trie leaf
    leaf: std::slice::Iter<'a, T>,
    /// Elements left in the tail buffer
    tail: std::slice::Iter<'a, T>,
    remaining: usize,
}

impl<'a, T, const N: usize> PersistentVectorIterator<'a, T, N> {
    pub(super) fn new(vector: &'a PersistentVector<T, N>) -> Self
    where
        Const<N>: ValidBranchingConstant,
    {
        let mut stack = SmallVec::new();
        stack.push(vector.root.children().iter());
        Self {
            stack,
            leaf: [].iter(),
            tail: vector.tail.as_slice().iter(),
            remaining: vector.len(),
        }
    }

    /// Backtracks through the stack to the next unvisited leaf.
    ///
    /// Returns `false` once the trie is exhausted.
    fn advance_to_next_leaf(&mut self) -> bool {
        while let Some(top) = self.stack.last_mut() {
            match top.next() {
                Some(Node::Leaf(leaf)) => {
                    self.leaf = leaf.as_slice().iter();
                    return true;
                }
                Some(Node::Branch(branch)) => self.stack.push(branch.children().iter()),
                None => {
                    self.stack.pop();
                }
            }
        }
        false
    }
}

impl<'a, T, const N: usize> Iterator for PersistentVectorIterator<'a, T, N> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(element) = self.leaf.next() {
                self.remaining -= 1;
                return Some(element);
            }
            if !self.advance_to_next_leaf() {
                break;
            }
        }
        let element = self.tail.next()?;
        self.remaining -= 1;
        Some(element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T, const N: usize> ExactSizeIterator for PersistentVectorIterator<'_, T, N> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T, const N: usize> FusedIterator for PersistentVectorIterator<'_, T, N> {}

// =============================================================================
// Owning Iterator
// =============================================================================

/// An owning iterator over elements of a [`PersistentVector`].
///
/// Leaves may be shared with other vectors, so elements are cloned out of
/// them as they are returned.
pub struct PersistentVectorIntoIterator<T, const N: usize = 32> {
    /// Branches on the current path, each with the index of its next child
    stack: SmallVec<[(ReferenceCounter<Branch<T, N>>, usize); STACK_CAPACITY]>,
    leaf: Option<ReferenceCounter<Leaf<T, N>>>,
    leaf_index: usize,
    tail: ReferenceCounter<Leaf<T, N>>,
    tail_index: usize,
    remaining: usize,
}

impl<T, const N: usize> PersistentVectorIntoIterator<T, N> {
    pub(super) fn new(vector: PersistentVector<T, N>) -> Self
    where
        Const<N>: ValidBranchingConstant,
    {
        let remaining = vector.len();
        let (root, tail) = vector.into_parts();
        let mut stack = SmallVec::new();
        stack.push((root, 0));
        Self {
            stack,
            leaf: None,
            leaf_index: 0,
            tail,
            tail_index: 0,
            remaining,
        }
    }

    fn advance_to_next_leaf(&mut self) -> bool {
        while let Some((branch, child_index)) = self.stack.last_mut() {
            let next = branch.children().get(*child_index).cloned();
            *child_index += 1;
            match next {
                Some(Node::Leaf(leaf)) => {
                    self.leaf = Some(leaf);
                    self.leaf_index = 0;
                    return true;
                }
                Some(Node::Branch(child)) => self.stack.push((child, 0)),
                None => {
                    self.stack.pop();
                }
            }
        }
        false
    }
}

impl<T: Clone, const N: usize> Iterator for PersistentVectorIntoIterator<T, N> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(leaf) = &self.leaf {
                if let Some(element) = leaf.get(self.leaf_index) {
                    self.leaf_index += 1;
                    self.remaining -= 1;
                    return Some(element.clone());
                }
                self.leaf = None;
            }
            if !self.advance_to_next_leaf() {
                break;
            }
        }
        let element = self.tail.get(self.tail_index)?.clone();
        self.tail_index += 1;
        self.remaining -= 1;
        Some(element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T: Clone, const N: usize> ExactSizeIterator for PersistentVectorIntoIterator<T, N> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T: Clone, const N: usize> FusedIterator for PersistentVectorIntoIterator<T, N> {}
