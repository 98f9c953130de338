//! Lazy, composable matrix views.
//!
//! A [`Matrix`] is a shared handle to an immutable tree of logical views
//! layered over one or more physical [`DenseStore`]s. Building a view never
//! copies or writes data; elements are computed on access or when the tree
//! is materialized with [`ElementsSupplier::collect`].
//!
//! # Core Types
//!
//! - [`Matrix`]: Handle over a leaf, unary, or binary view node
//! - [`MatrixView`]: Shape, element access and band bounds shared by every node
//! - [`ElementsSupplier`]: Deferred pipeline that materializes into a [`RegionMut`]
//! - [`RowsSupplier`] / [`ColumnsSupplier`]: Incrementally built sparse collections
//!
//! # Views
//!
//! | Kind | Constructors |
//! |------|--------------|
//! | leaf | [`Matrix::from_store`], [`Matrix::zero`], [`Matrix::identity`], [`Matrix::single`] |
//! | unary | [`Matrix::transpose`], [`Matrix::conjugate`], [`Matrix::adjoint`], [`Matrix::lower_triangular`], [`Matrix::diagonal`], [`Matrix::upper_hessenberg`], [`Matrix::select_rows`], [`Matrix::offsets`], [`Matrix::limits`], [`Matrix::map`] |
//! | binary | [`Matrix::left_right`], [`Matrix::above_below`], [`Matrix::superimpose`], [`Matrix::zip_with`] |
//!
//! # Example
//!
//! ```rust
//! use lazy_matrix::{ElementsSupplier, Matrix, MatrixView};
//!
//! let a = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
//!
//! // Transposing twice hands back the original node.
//! assert!(a.transpose().transpose().ptr_eq(&a));
//!
//! // Lower triangle next to an identity block, materialized once.
//! let wide = Matrix::left_right(&a.lower_triangular(false), &Matrix::identity(2)).unwrap();
//! assert_eq!(wide.get(0, 1), 0.0);
//! assert_eq!(wide.collect().to_row_major_vec(), vec![1.0, 0.0, 1.0, 0.0, 3.0, 4.0, 0.0, 1.0]);
//!
//! // Multiplying by zero never touches the operand.
//! let z = a.multiply(&Matrix::zero(2, 5)).unwrap();
//! assert!(z.is_zero_view());
//! assert_eq!(z.shape(), (2, 5));
//! ```
//!
//! # Parallelism
//!
//! With the `parallel` feature (on by default) products and scalings over
//! concatenated or patched views evaluate their two halves with
//! `rayon::join` once the work exceeds [`MIN_PARALLEL_WORK`] elements.

mod algebra;
mod compose;
mod coordinator;
mod leaf;
mod mapped;
mod offset;
mod selection;
mod shading;
mod sparse_supplier;
mod supplier;
mod transjugate;
mod view;

pub use shading::Shading;
pub use sparse_supplier::{ColumnsSupplier, RowsSupplier};
pub use supplier::{
    ElementsSupplier, MatchingOperation, PairOperation, Side, TransposedSupplier, UnaryOperation,
};
pub use view::{Matrix, MatrixView, NodeKind};

pub use matrix_store::{
    DenseStore, Layout, LimitRegion, OffsetRegion, RegionMut, RegionMutExt, SparseVector,
    StoreError, StoreFactory, TransposedRegion,
};
pub use matrix_traits::{ElementOpApply, Scalar, ScalarValue, Transjugation};

// ============================================================================
// Constants
// ============================================================================

/// Minimum number of output elements before two branches are evaluated on
/// separate threads.
pub const MIN_PARALLEL_WORK: usize = 1 << 12;

// ============================================================================
// Error types
// ============================================================================

/// Errors raised while building views or combining matrices.
#[derive(Debug, thiserror::Error)]
pub enum MatrixError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Element-wise combination of matrices with different shapes.
    #[error("shape mismatch: {0:?} vs {1:?}")]
    ShapeMismatch((usize, usize), (usize, usize)),

    /// Horizontal concatenation of matrices with different row counts.
    #[error("row count mismatch: {0} vs {1}")]
    RowMismatch(usize, usize),

    /// Vertical concatenation of matrices with different column counts.
    #[error("column count mismatch: {0} vs {1}")]
    ColumnMismatch(usize, usize),

    /// Inner dimensions of a product disagree.
    #[error("cannot multiply {left:?} by {right:?}")]
    IncompatibleProduct {
        left: (usize, usize),
        right: (usize, usize),
    },

    /// Selection refers to a row or column the base does not have.
    #[error("selected index {index} out of range for dimension {bound}")]
    InvalidSelection { index: usize, bound: usize },

    #[error("offsets ({row}, {col}) exceed {rows}x{cols} matrix")]
    OffsetOutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("limits ({row}, {col}) exceed {rows}x{cols} matrix")]
    LimitOutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// Patch does not fit inside the base at the requested position.
    #[error("{patch_rows}x{patch_cols} patch at ({row}, {col}) exceeds {rows}x{cols} base")]
    PatchOutOfRange {
        row: usize,
        col: usize,
        patch_rows: usize,
        patch_cols: usize,
        rows: usize,
        cols: usize,
    },

    /// Sparse collection index out of range.
    #[error("index {index} out of range for collection of {count}")]
    IndexOutOfRange { index: usize, count: usize },
}

/// Result type for view construction and matrix algebra.
pub type Result<T> = std::result::Result<T, MatrixError>;
