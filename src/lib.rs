//! # pvector
//!
//! A persistent (immutable) vector for Rust.
//!
//! ## Overview
//!
//! [`PersistentVector`](persistent::PersistentVector) is a sequential
//! collection with near-constant-time indexed access, indexed update, append
//! and remove-last. Every operation returns a new version; old versions stay
//! valid and share most of their storage with the new one.
//!
//! Internally it is a height-balanced, bit-partitioned trie with a tail
//! buffer that makes appends amortized O(1).
//!
//! ## Feature Flags
//!
//! - `arc`: share nodes through `Arc` instead of `Rc`, making vectors
//!   `Send + Sync` when their elements are
//! - `serde`: serialize and deserialize vectors as plain sequences
//! - `rayon`: parallel iteration over element references (implies `arc`)
//!
//! ## Example
//!
//! ```rust
//! use pvector::prelude::*;
//!
//! let vector: PersistentVector<i32> = pvector![1, 2, 3];
//! let extended = vector.conj(4);
//!
//! assert_eq!(vector.len(), 3);
//! assert_eq!(extended, [1, 2, 3, 4]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and macros.
///
/// # Usage
///
/// ```rust
/// use pvector::prelude::*;
/// ```
pub mod prelude {
    pub use crate::persistent::*;
    pub use crate::pvector;
}

pub mod persistent;

/// Creates a [`PersistentVector`](persistent::PersistentVector) containing
/// the given elements, in order.
///
/// This is the variadic form of
/// [`PersistentVector::of`](persistent::PersistentVector::of).
///
/// # Examples
///
/// ```rust
/// use pvector::persistent::PersistentVector;
/// use pvector::pvector;
///
/// let empty: PersistentVector<i32> = pvector![];
/// assert!(empty.is_empty());
///
/// let vector: PersistentVector<i32> = pvector![1, 2, 3];
/// assert_eq!(vector.get(1), Some(&2));
/// ```
#[macro_export]
macro_rules! pvector {
    () => {
        $crate::persistent::PersistentVector::new()
    };
    ($($element:expr),+ $(,)?) => {
        $crate::persistent::PersistentVector::of([$($element),+])
    };
}

#[cfg(test)]
mod tests {
    use crate::persistent::PersistentVector;
    use rstest::rstest;

    #[rstest]
    fn test_pvector_macro_matches_of() {
        let from_macro: PersistentVector<i32, 4> = pvector![1, 2, 3, 4, 5];
        let from_of: PersistentVector<i32, 4> = PersistentVector::of([1, 2, 3, 4, 5]);
        assert_eq!(from_macro, from_of);
        from_macro.check_invariants();
    }

    #[rstest]
    fn test_pvector_macro_trailing_comma() {
        let vector: PersistentVector<&str> = pvector!["a", "b",];
        assert_eq!(vector, ["a", "b"]);
    }
}
