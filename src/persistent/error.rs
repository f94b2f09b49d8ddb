//! Error types for persistent collections.
//!
//! Most operations on [`PersistentVector`](super::PersistentVector) are total:
//! an out-of-range read returns `None`, an out-of-range update returns the
//! vector unchanged and popping an empty vector yields the empty vector.
//! [`VectorError`] is produced only by the accessors that are explicitly
//! asked to assert.

/// Represents errors raised by the asserting accessors of a persistent vector.
///
/// # Examples
///
/// ```rust
/// use pvector::persistent::{PersistentVector, VectorError};
///
/// let vector: PersistentVector<i32> = (0..3).collect();
/// assert_eq!(
///     vector.get_checked(5),
///     Err(VectorError::IndexOutOfBounds { index: 5, length: 3 })
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VectorError {
    /// The index is not within `[0, length)`.
    IndexOutOfBounds {
        /// The requested index.
        index: usize,
        /// The length of the vector at the time of the request.
        length: usize,
    },
}

impl std::fmt::Display for VectorError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexOutOfBounds { index, length } => write!(
                formatter,
                "index {index} is out of bounds for a vector of length {length}"
            ),
        }
    }
}

impl std::error::Error for VectorError {}
