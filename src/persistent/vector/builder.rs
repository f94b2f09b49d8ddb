//! Bulk construction of a vector from an owned sequence.
//!
//! The staging `Vec` never escapes: elements are partitioned into `N`-sized
//! leaves, the leaves are assembled under branches bottom-up, and the
//! remainder chunk becomes the tail.

use arrayvec::ArrayVec;

use super::PersistentVector;
use super::leaf::Leaf;
use super::node::{Branch, Node};
use crate::persistent::{Const, ReferenceCounter, ValidBranchingConstant};

/// Builds a `PersistentVector` from a `Vec` without requiring `Clone`.
pub(super) fn build_from_vec<T, const N: usize>(mut elements: Vec<T>) -> PersistentVector<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    if elements.is_empty() {
        return PersistentVector::new();
    }

    let length = elements.len();
    // The tail always holds between 1 and N elements, exactly as repeated
    // `conj` would leave it.
    let tail_size = (length - 1) % N + 1;
    let tail_elements: ArrayVec<T, N> = elements.drain(length - tail_size..).collect();
    let root = build_root(elements);

    PersistentVector::from_parts(
        length,
        ReferenceCounter::new(root),
        ReferenceCounter::new(Leaf::from_elements(tail_elements)),
    )
}

/// Assembles a root branch over elements whose count is a multiple of `N`.
fn build_root<T, const N: usize>(elements: Vec<T>) -> Branch<T, N> {
    debug_assert_eq!(elements.len() % N, 0);

    let mut element_iter = elements.into_iter();
    let mut nodes: Vec<Node<T, N>> = Vec::new();
    loop {
        let chunk: ArrayVec<T, N> = element_iter.by_ref().take(N).collect();
        if chunk.is_empty() {
            break;
        }
        let leaf = Leaf::from_elements(chunk);
        nodes.push(Node::Leaf(ReferenceCounter::new(leaf)));
    }

    if nodes.is_empty() {
        return Branch::empty(1);
    }

    let mut level = 1;
    loop {
        let mut branches = group_into_branches(nodes, level);
        if branches.len() == 1
            && let Some(root) = branches.pop()
        {
            return root;
        }
        nodes = branches
            .into_iter()
            .map(|branch| Node::Branch(ReferenceCounter::new(branch)))
            .collect();
        level += 1;
    }
}

/// Groups consecutive nodes `N` at a time under branches at `level`.
fn group_into_branches<T, const N: usize>(nodes: Vec<Node<T, N>>, level: u32) -> Vec<Branch<T, N>> {
    let mut node_iter = nodes.into_iter();
    let mut branches = Vec::new();
    loop {
        let children: ArrayVec<Node<T, N>, N> = node_iter.by_ref().take(N).collect();
        if children.is_empty() {
            return branches;
        }
        branches.push(Branch::from_children(children, level));
    }
}
