//! Interior nodes of the trie.
//!
//! A [`Branch`] at level 1 holds leaves; a branch at level `L > 1` holds
//! branches of level `L - 1`. Only the rightmost path of a branch may be
//! partially filled, which is what keeps append and pop cheap.

use arrayvec::ArrayVec;

use super::index::{capacity, child_slot, remaining_index};
use super::leaf::Leaf;
use crate::persistent::ReferenceCounter;

// =============================================================================
// Node Definition
// =============================================================================

/// A child slot of a branch.
///
/// Cloning a `Node` only increments a reference count.
pub(super) enum Node<T, const N: usize> {
    /// Leaf node containing actual elements
    Leaf(ReferenceCounter<Leaf<T, N>>),
    /// Branch node containing child nodes
    Branch(ReferenceCounter<Branch<T, N>>),
}

impl<T, const N: usize> Clone for Node<T, N> {
    fn clone(&self) -> Self {
        match self {
            Self::Leaf(leaf) => Self::Leaf(leaf.clone()),
            Self::Branch(branch) => Self::Branch(branch.clone()),
        }
    }
}

impl<T, const N: usize> Node<T, N> {
    /// Number of elements reachable beneath this node.
    #[inline]
    pub(super) fn size(&self) -> usize {
        match self {
            Self::Leaf(leaf) => leaf.len(),
            Self::Branch(branch) => branch.size,
        }
    }

    /// Whether two nodes are the very same shared allocation.
    #[inline]
    pub(super) fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Leaf(left), Self::Leaf(right)) => ReferenceCounter::ptr_eq(left, right),
            (Self::Branch(left), Self::Branch(right)) => ReferenceCounter::ptr_eq(left, right),
            _ => false,
        }
    }

    /// Builds a chain of single-child branches from `level` down to `leaf`.
    fn new_path(level: u32, leaf: ReferenceCounter<Leaf<T, N>>) -> Self {
        if level == 0 {
            Self::Leaf(leaf)
        } else {
            let size = leaf.len();
            let mut children = ArrayVec::new();
            children.push(Self::new_path(level - 1, leaf));
            Self::Branch(ReferenceCounter::new(Branch {
                children,
                level,
                size,
            }))
        }
    }
}

impl<T: Clone, const N: usize> Node<T, N> {
    fn update(&self, index: usize, element: T) -> Self {
        match self {
            Self::Leaf(leaf) => Self::Leaf(ReferenceCounter::new(leaf.update(index, element))),
            Self::Branch(branch) => {
                Self::Branch(ReferenceCounter::new(branch.update(index, element)))
            }
        }
    }
}

impl<T: PartialEq, const N: usize> PartialEq for Node<T, N> {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        match (self, other) {
            (Self::Leaf(left), Self::Leaf(right)) => **left == **right,
            (Self::Branch(left), Self::Branch(right)) => **left == **right,
            _ => false,
        }
    }
}

// =============================================================================
// Branch Definition
// =============================================================================

/// An interior node with its level and a cached element count.
pub(super) struct Branch<T, const N: usize> {
    children: ArrayVec<Node<T, N>, N>,
    level: u32,
    size: usize,
}

impl<T, const N: usize> Branch<T, N> {
    /// Creates a branch with no children at the given level.
    pub(super) const fn empty(level: u32) -> Self {
        debug_assert!(level >= 1);
        Self {
            children: ArrayVec::new_const(),
            level,
            size: 0,
        }
    }

    /// Creates a branch over already-built children.
    pub(super) fn from_children(children: ArrayVec<Node<T, N>, N>, level: u32) -> Self {
        let size = children.iter().map(Node::size).sum();
        Self {
            children,
            level,
            size,
        }
    }

    #[inline]
    pub(super) const fn level(&self) -> u32 {
        self.level
    }

    #[inline]
    pub(super) const fn size(&self) -> usize {
        self.size
    }

    /// Maximum number of elements this branch can hold at full saturation.
    #[inline]
    pub(super) const fn capacity(&self) -> usize {
        capacity::<N>(self.level)
    }

    #[inline]
    pub(super) const fn is_full(&self) -> bool {
        self.size == self.capacity()
    }

    #[inline]
    pub(super) fn children(&self) -> &[Node<T, N>] {
        &self.children
    }

    /// Returns the element at the branch-relative `index`, if present.
    pub(super) fn get(&self, index: usize) -> Option<&T> {
        if index >= self.size {
            return None;
        }
        let slot = child_slot::<N>(index, self.level);
        let remaining = remaining_index::<N>(index, self.level);
        match self.children.get(slot)? {
            Node::Leaf(leaf) => leaf.get(remaining),
            Node::Branch(branch) => branch.get(remaining),
        }
    }

    /// The rightmost leaf, found by following the last child at each level.
    pub(super) fn last_leaf(&self) -> Option<&ReferenceCounter<Leaf<T, N>>> {
        match self.children.last()? {
            Node::Leaf(leaf) => Some(leaf),
            Node::Branch(branch) => branch.last_leaf(),
        }
    }

    /// Wraps a full branch and a fresh path to `leaf` in a new branch one
    /// level taller.
    pub(super) fn grow(root: ReferenceCounter<Self>, leaf: ReferenceCounter<Leaf<T, N>>) -> Self {
        let child_level = root.level;
        let mut children = ArrayVec::new();
        children.push(Node::Branch(root));
        children.push(Node::new_path(child_level, leaf));
        Self::from_children(children, child_level + 1)
    }

    /// Attaches a full leaf as the new rightmost leaf of this subtree.
    ///
    /// The caller guarantees the branch has spare capacity; a full branch must
    /// be grown with [`Branch::grow`] instead.
    pub(super) fn conj_leaf(&self, leaf: ReferenceCounter<Leaf<T, N>>) -> Self {
        debug_assert!(!self.is_full());
        let added = leaf.len();
        let mut children = self.children.clone();

        if self.level == 1 {
            children.push(Node::Leaf(leaf));
        } else {
            match children.pop() {
                Some(Node::Branch(last)) if !last.is_full() => {
                    children.push(Node::Branch(ReferenceCounter::new(last.conj_leaf(leaf))));
                }
                Some(last) => {
                    children.push(last);
                    children.push(Node::new_path(self.level - 1, leaf));
                }
                None => children.push(Node::new_path(self.level - 1, leaf)),
            }
        }

        Self {
            children,
            level: self.level,
            size: self.size + added,
        }
    }

    /// Removes the rightmost leaf of this subtree.
    ///
    /// Returns `None` when nothing is left, so that the parent can drop the
    /// slot altogether.
    pub(super) fn unconj_leaf(&self) -> Option<Self> {
        let mut children = self.children.clone();
        let removed = match children.pop()? {
            Node::Leaf(leaf) => leaf.len(),
            Node::Branch(last) => {
                let before = last.size;
                match last.unconj_leaf() {
                    Some(shrunk) => {
                        let removed = before - shrunk.size;
                        children.push(Node::Branch(ReferenceCounter::new(shrunk)));
                        removed
                    }
                    None => before,
                }
            }
        };

        if children.is_empty() {
            None
        } else {
            Some(Self {
                children,
                level: self.level,
                size: self.size - removed,
            })
        }
    }

    /// If this branch sits above level 1 and has exactly one child, returns
    /// that child.
    pub(super) fn sole_branch_child(&self) -> Option<&ReferenceCounter<Self>> {
        match self.children.as_slice() {
            [Node::Branch(only)] if self.level > 1 => Some(only),
            _ => None,
        }
    }
}

impl<T: Clone, const N: usize> Branch<T, N> {
    /// Path-copying update: one new branch per level, every sibling shared.
    ///
    /// The caller guarantees `index < self.size()`.
    pub(super) fn update(&self, index: usize, element: T) -> Self {
        let slot = child_slot::<N>(index, self.level);
        let remaining = remaining_index::<N>(index, self.level);
        let mut children = self.children.clone();
        children[slot] = children[slot].update(remaining, element);
        Self {
            children,
            level: self.level,
            size: self.size,
        }
    }
}

impl<T: PartialEq, const N: usize> PartialEq for Branch<T, N> {
    fn eq(&self, other: &Self) -> bool {
        self.level == other.level
            && self.size == other.size
            && self.children.len() == other.children.len()
            && self
                .children
                .iter()
                .zip(other.children.iter())
                .all(|(left, right)| left == right)
    }
}
