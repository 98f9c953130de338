//! Physical storage backing the lazy-matrix view algebra.
//!
//! # Core Types
//!
//! - [`DenseStore`]: Owned row-major or column-major matrix
//! - [`SparseVector`]: Sorted index/value pairs of fixed logical length
//! - [`RegionMut`]: Writable target that views materialize into, with
//!   zero-copy sub-regions ([`OffsetRegion`], [`LimitRegion`], [`TransposedRegion`])
//! - [`StoreFactory`]: Creates zero-filled stores and identity scalars
//!
//! Views never own a [`DenseStore`]; they hold it behind a shared pointer
//! and only read from it. The store handed to a materialization is owned
//! exclusively by that call.

mod dense;
mod factory;
mod region;
mod sparse;

pub use dense::{col_major_strides, row_major_strides, DenseStore, Layout};
pub use factory::StoreFactory;
pub use region::{LimitRegion, OffsetRegion, RegionMut, RegionMutExt, TransposedRegion};
pub use sparse::SparseVector;

/// Errors that can occur while building physical stores.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Supplied element buffer does not match the requested shape.
    #[error("buffer length mismatch: expected {expected}, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    /// Row-wise input has rows of differing length.
    #[error("ragged input: row {row} has {found} elements, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Result type for store construction.
pub type Result<T> = std::result::Result<T, StoreError>;
