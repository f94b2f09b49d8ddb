//! Persistent (immutable) vector.
//!
//! This module provides [`PersistentVector`], a sequential collection where
//! every "mutating" operation returns a new version while older versions
//! remain valid and share most of their storage with the new one.
//!
//! # Structural Sharing
//!
//! Appending, popping and updating copy only the path from the root of the
//! trie to the affected leaf. Every other subtree is shared by reference
//! between the old and the new vector.
//!
//! # Examples
//!
//! ```rust
//! use pvector::persistent::PersistentVector;
//!
//! let vector: PersistentVector<i32> = (0..100).collect();
//! assert_eq!(vector.get(50), Some(&50));
//!
//! // Structural sharing: the original vector is preserved
//! let updated = vector.update(50, 999);
//! assert_eq!(vector.get(50), Some(&50));     // Original unchanged
//! assert_eq!(updated.get(50), Some(&999));   // New version
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// When the `arc` feature is enabled, this is `std::sync::Arc`,
/// which is thread-safe but has slightly higher overhead.
///
/// When the `arc` feature is disabled (default), this is `std::rc::Rc`,
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

// =============================================================================
// Branching Factor
// =============================================================================

/// [`PersistentVector`] takes a branching factor parameter, which must be a
/// reasonably-sized power of two. This trait enforces that at compile time.
pub trait ValidBranchingConstant {}

/// Type-level carrier for a branching factor.
pub struct Const<const N: usize> {}

impl ValidBranchingConstant for Const<2> {}
impl ValidBranchingConstant for Const<4> {}
impl ValidBranchingConstant for Const<8> {}
impl ValidBranchingConstant for Const<16> {}
impl ValidBranchingConstant for Const<32> {}
impl ValidBranchingConstant for Const<64> {}
impl ValidBranchingConstant for Const<128> {}

mod error;
mod vector;

pub use error::VectorError;
pub use vector::PersistentVector;
pub use vector::PersistentVectorIntoIterator;
pub use vector::PersistentVectorIterator;
