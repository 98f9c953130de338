//! Views over two children: concatenation, patch overlay and element-wise
//! binary functions.
//!
//! Shape compatibility is checked when the view is built; a composing view
//! that exists is always well-formed.

use std::sync::Arc;

use matrix_store::{RegionMut, RegionMutExt, StoreFactory};
use matrix_traits::Scalar;

use crate::supplier::{BinaryFn, ElementsSupplier};
use crate::view::{add_by_columns, supply_by_columns, Matrix, MatrixView, Node};
use crate::{MatrixError, Result};

/// Smallest band covering both `a` and `b`; empty bands are ignored.
fn union_band(a: (usize, usize), b: (usize, usize), extent: usize) -> (usize, usize) {
    match (a.0 < a.1, b.0 < b.1) {
        (true, true) => (a.0.min(b.0), a.1.max(b.1)),
        (true, false) => a,
        (false, true) => b,
        (false, false) => (extent, 0),
    }
}

/// Band of `view` along a row, clipped to the view's columns.
fn row_band<T: Scalar>(view: &Matrix<T>, row: usize) -> (usize, usize) {
    (view.first_in_row(row), view.limit_of_row(row).min(view.cols()))
}

fn column_band<T: Scalar>(view: &Matrix<T>, col: usize) -> (usize, usize) {
    (view.first_in_column(col), view.limit_of_column(col).min(view.rows()))
}

fn shift((first, limit): (usize, usize), by: usize) -> (usize, usize) {
    (first + by, limit + by)
}

// ============================================================================
// LeftRight
// ============================================================================

/// `[left | right]`.
pub(crate) struct LeftRightView<T: Scalar> {
    pub(crate) left: Matrix<T>,
    pub(crate) right: Matrix<T>,
}

impl<T: Scalar> LeftRightView<T> {
    #[inline]
    fn split(&self) -> usize {
        self.left.cols()
    }
}

impl<T: Scalar> ElementsSupplier<T> for LeftRightView<T> {
    fn rows(&self) -> usize {
        self.left.rows()
    }

    fn cols(&self) -> usize {
        self.left.cols() + self.right.cols()
    }

    fn factory(&self) -> StoreFactory {
        self.left.factory()
    }

    fn supply_to(&self, target: &mut dyn RegionMut<T>) {
        let (rows, k) = (self.rows(), self.split());
        self.left.supply_to(&mut target.region_by_limits(rows, k));
        self.right.supply_to(&mut target.region_by_offsets(0, k));
    }
}

impl<T: Scalar> MatrixView<T> for LeftRightView<T> {
    fn get(&self, row: usize, col: usize) -> T {
        let k = self.split();
        if col < k {
            self.left.get(row, col)
        } else {
            self.right.get(row, col - k)
        }
    }

    fn first_in_row(&self, row: usize) -> usize {
        let right = shift(row_band(&self.right, row), self.split());
        union_band(row_band(&self.left, row), right, self.cols()).0
    }

    fn limit_of_row(&self, row: usize) -> usize {
        let right = shift(row_band(&self.right, row), self.split());
        union_band(row_band(&self.left, row), right, self.cols()).1
    }

    fn first_in_column(&self, col: usize) -> usize {
        let k = self.split();
        if col < k {
            self.left.first_in_column(col)
        } else {
            self.right.first_in_column(col - k)
        }
    }

    fn limit_of_column(&self, col: usize) -> usize {
        let k = self.split();
        if col < k {
            self.left.limit_of_column(col)
        } else {
            self.right.limit_of_column(col - k)
        }
    }
}

// ============================================================================
// AboveBelow
// ============================================================================

/// `[above ; below]`.
pub(crate) struct AboveBelowView<T: Scalar> {
    pub(crate) above: Matrix<T>,
    pub(crate) below: Matrix<T>,
}

impl<T: Scalar> AboveBelowView<T> {
    #[inline]
    fn split(&self) -> usize {
        self.above.rows()
    }
}

impl<T: Scalar> ElementsSupplier<T> for AboveBelowView<T> {
    fn rows(&self) -> usize {
        self.above.rows() + self.below.rows()
    }

    fn cols(&self) -> usize {
        self.above.cols()
    }

    fn factory(&self) -> StoreFactory {
        self.above.factory()
    }

    fn supply_to(&self, target: &mut dyn RegionMut<T>) {
        let (k, cols) = (self.split(), self.cols());
        self.above.supply_to(&mut target.region_by_limits(k, cols));
        self.below.supply_to(&mut target.region_by_offsets(k, 0));
    }
}

impl<T: Scalar> MatrixView<T> for AboveBelowView<T> {
    fn get(&self, row: usize, col: usize) -> T {
        let k = self.split();
        if row < k {
            self.above.get(row, col)
        } else {
            self.below.get(row - k, col)
        }
    }

    fn first_in_row(&self, row: usize) -> usize {
        let k = self.split();
        if row < k {
            self.above.first_in_row(row)
        } else {
            self.below.first_in_row(row - k)
        }
    }

    fn limit_of_row(&self, row: usize) -> usize {
        let k = self.split();
        if row < k {
            self.above.limit_of_row(row)
        } else {
            self.below.limit_of_row(row - k)
        }
    }

    fn first_in_column(&self, col: usize) -> usize {
        let below = shift(column_band(&self.below, col), self.split());
        union_band(column_band(&self.above, col), below, self.rows()).0
    }

    fn limit_of_column(&self, col: usize) -> usize {
        let below = shift(column_band(&self.below, col), self.split());
        union_band(column_band(&self.above, col), below, self.rows()).1
    }
}

// ============================================================================
// Superimposed
// ============================================================================

/// `base` with `diff` added over the block starting at
/// `(row_first, col_first)`.
pub(crate) struct SuperimposedView<T: Scalar> {
    pub(crate) base: Matrix<T>,
    pub(crate) diff: Matrix<T>,
    pub(crate) row_first: usize,
    pub(crate) col_first: usize,
}

impl<T: Scalar> SuperimposedView<T> {
    #[inline]
    fn covers_row(&self, row: usize) -> bool {
        row >= self.row_first && row < self.row_first + self.diff.rows()
    }

    #[inline]
    fn covers_column(&self, col: usize) -> bool {
        col >= self.col_first && col < self.col_first + self.diff.cols()
    }

    fn row_band(&self, row: usize) -> (usize, usize) {
        let base = row_band(&self.base, row);
        if !self.covers_row(row) {
            return base;
        }
        let diff = shift(row_band(&self.diff, row - self.row_first), self.col_first);
        union_band(base, diff, self.base.cols())
    }

    fn column_band(&self, col: usize) -> (usize, usize) {
        let base = column_band(&self.base, col);
        if !self.covers_column(col) {
            return base;
        }
        let diff = shift(column_band(&self.diff, col - self.col_first), self.row_first);
        union_band(base, diff, self.base.rows())
    }
}

impl<T: Scalar> ElementsSupplier<T> for SuperimposedView<T> {
    fn rows(&self) -> usize {
        self.base.rows()
    }

    fn cols(&self) -> usize {
        self.base.cols()
    }

    fn factory(&self) -> StoreFactory {
        self.base.factory()
    }

    fn supply_to(&self, target: &mut dyn RegionMut<T>) {
        self.base.supply_to(target);
        let mut shifted = target.region_by_offsets(self.row_first, self.col_first);
        let mut patch = shifted.region_by_limits(self.diff.rows(), self.diff.cols());
        add_by_columns(&self.diff, &mut patch);
    }
}

impl<T: Scalar> MatrixView<T> for SuperimposedView<T> {
    fn get(&self, row: usize, col: usize) -> T {
        let value = self.base.get(row, col);
        if self.covers_row(row) && self.covers_column(col) {
            value + self.diff.get(row - self.row_first, col - self.col_first)
        } else {
            value
        }
    }

    fn first_in_row(&self, row: usize) -> usize {
        self.row_band(row).0
    }

    fn limit_of_row(&self, row: usize) -> usize {
        self.row_band(row).1
    }

    fn first_in_column(&self, col: usize) -> usize {
        self.column_band(col).0
    }

    fn limit_of_column(&self, col: usize) -> usize {
        self.column_band(col).1
    }
}

// ============================================================================
// Zipped
// ============================================================================

/// `f(left[i, j], right[i, j])` at every position.
pub(crate) struct ZippedView<T: Scalar> {
    left: Matrix<T>,
    right: Matrix<T>,
    f: BinaryFn<T>,
    preserves_zero: bool,
}

impl<T: Scalar> ZippedView<T> {
    fn row_band(&self, row: usize) -> (usize, usize) {
        if !self.preserves_zero {
            return (0, self.cols());
        }
        union_band(row_band(&self.left, row), row_band(&self.right, row), self.cols())
    }

    fn column_band(&self, col: usize) -> (usize, usize) {
        if !self.preserves_zero {
            return (0, self.rows());
        }
        union_band(column_band(&self.left, col), column_band(&self.right, col), self.rows())
    }
}

impl<T: Scalar> ElementsSupplier<T> for ZippedView<T> {
    fn rows(&self) -> usize {
        self.left.rows()
    }

    fn cols(&self) -> usize {
        self.left.cols()
    }

    fn factory(&self) -> StoreFactory {
        self.left.factory()
    }

    fn supply_to(&self, target: &mut dyn RegionMut<T>) {
        supply_by_columns(self, target);
    }
}

impl<T: Scalar> MatrixView<T> for ZippedView<T> {
    fn get(&self, row: usize, col: usize) -> T {
        (self.f)(self.left.get(row, col), self.right.get(row, col))
    }

    fn first_in_row(&self, row: usize) -> usize {
        self.row_band(row).0
    }

    fn limit_of_row(&self, row: usize) -> usize {
        self.row_band(row).1
    }

    fn first_in_column(&self, col: usize) -> usize {
        self.column_band(col).0
    }

    fn limit_of_column(&self, col: usize) -> usize {
        self.column_band(col).1
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl<T: Scalar> Matrix<T> {
    /// Horizontal concatenation `[left | right]`.
    pub fn left_right(left: &Matrix<T>, right: &Matrix<T>) -> Result<Matrix<T>> {
        if left.rows() != right.rows() {
            return Err(MatrixError::RowMismatch(left.rows(), right.rows()));
        }
        Ok(Matrix::from_node(Node::LeftRight(LeftRightView {
            left: left.clone(),
            right: right.clone(),
        })))
    }

    /// Vertical concatenation `[above ; below]`.
    pub fn above_below(above: &Matrix<T>, below: &Matrix<T>) -> Result<Matrix<T>> {
        if above.cols() != below.cols() {
            return Err(MatrixError::ColumnMismatch(above.cols(), below.cols()));
        }
        Ok(Matrix::from_node(Node::AboveBelow(AboveBelowView {
            above: above.clone(),
            below: below.clone(),
        })))
    }

    /// This view with `diff` added over the block starting at
    /// `(row_first, col_first)`.
    pub fn superimpose(&self, diff: &Matrix<T>, row_first: usize, col_first: usize) -> Result<Matrix<T>> {
        let (rows, cols) = self.shape();
        if row_first + diff.rows() > rows || col_first + diff.cols() > cols {
            return Err(MatrixError::PatchOutOfRange {
                row: row_first,
                col: col_first,
                patch_rows: diff.rows(),
                patch_cols: diff.cols(),
                rows,
                cols,
            });
        }
        if diff.is_zero_view() {
            log::trace!("superimpose: zero patch");
            return Ok(self.clone());
        }
        Ok(Matrix::from_node(Node::Superimposed(SuperimposedView {
            base: self.clone(),
            diff: diff.clone(),
            row_first,
            col_first,
        })))
    }

    /// Element-wise `f(self[i, j], other[i, j])`.
    pub fn zip_with<F>(&self, other: &Matrix<T>, f: F) -> Result<Matrix<T>>
    where
        F: Fn(T, T) -> T + Send + Sync + 'static,
    {
        if self.shape() != other.shape() {
            return Err(MatrixError::ShapeMismatch(self.shape(), other.shape()));
        }
        let preserves_zero = f(T::zero(), T::zero()) == T::zero();
        Ok(Matrix::from_node(Node::Zipped(ZippedView {
            left: self.clone(),
            right: other.clone(),
            f: Arc::new(f),
            preserves_zero,
        })))
    }
}
