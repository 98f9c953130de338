//! Sub-block views: shifted origin and leading-block limits.

use matrix_store::{RegionMut, StoreFactory};
use matrix_traits::Scalar;

use crate::supplier::ElementsSupplier;
use crate::view::{supply_by_columns, Matrix, MatrixView, Node};
use crate::{MatrixError, Result};

/// View whose `(0, 0)` is the base's `(row_offset, col_offset)`.
pub(crate) struct OffsetView<T: Scalar> {
    base: Matrix<T>,
    row_offset: usize,
    col_offset: usize,
}

impl<T: Scalar> ElementsSupplier<T> for OffsetView<T> {
    fn rows(&self) -> usize {
        self.base.rows() - self.row_offset
    }

    fn cols(&self) -> usize {
        self.base.cols() - self.col_offset
    }

    fn factory(&self) -> StoreFactory {
        self.base.factory()
    }

    fn supply_to(&self, target: &mut dyn RegionMut<T>) {
        supply_by_columns(self, target);
    }
}

impl<T: Scalar> MatrixView<T> for OffsetView<T> {
    fn get(&self, row: usize, col: usize) -> T {
        self.base.get(row + self.row_offset, col + self.col_offset)
    }

    fn first_in_row(&self, row: usize) -> usize {
        self.base
            .first_in_row(row + self.row_offset)
            .saturating_sub(self.col_offset)
    }

    fn limit_of_row(&self, row: usize) -> usize {
        self.base
            .limit_of_row(row + self.row_offset)
            .saturating_sub(self.col_offset)
    }

    fn first_in_column(&self, col: usize) -> usize {
        self.base
            .first_in_column(col + self.col_offset)
            .saturating_sub(self.row_offset)
    }

    fn limit_of_column(&self, col: usize) -> usize {
        self.base
            .limit_of_column(col + self.col_offset)
            .saturating_sub(self.row_offset)
    }
}

/// Leading `rows x cols` block of the base.
pub(crate) struct LimitView<T: Scalar> {
    base: Matrix<T>,
    rows: usize,
    cols: usize,
}

impl<T: Scalar> ElementsSupplier<T> for LimitView<T> {
    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.cols
    }

    fn factory(&self) -> StoreFactory {
        self.base.factory()
    }

    fn supply_to(&self, target: &mut dyn RegionMut<T>) {
        supply_by_columns(self, target);
    }
}

impl<T: Scalar> MatrixView<T> for LimitView<T> {
    fn get(&self, row: usize, col: usize) -> T {
        self.base.get(row, col)
    }

    fn first_in_row(&self, row: usize) -> usize {
        self.base.first_in_row(row).min(self.cols)
    }

    fn limit_of_row(&self, row: usize) -> usize {
        self.base.limit_of_row(row).min(self.cols)
    }

    fn first_in_column(&self, col: usize) -> usize {
        self.base.first_in_column(col).min(self.rows)
    }

    fn limit_of_column(&self, col: usize) -> usize {
        self.base.limit_of_column(col).min(self.rows)
    }
}

impl<T: Scalar> Matrix<T> {
    /// Drop the first `row_offset` rows and `col_offset` columns.
    pub fn offsets(&self, row_offset: usize, col_offset: usize) -> Result<Matrix<T>> {
        let (rows, cols) = self.shape();
        if row_offset > rows || col_offset > cols {
            return Err(MatrixError::OffsetOutOfRange {
                row: row_offset,
                col: col_offset,
                rows,
                cols,
            });
        }
        if row_offset == 0 && col_offset == 0 {
            return Ok(self.clone());
        }
        let node = match self.node() {
            Node::Zero(_) => {
                return Ok(Matrix::zero_with(rows - row_offset, cols - col_offset, self.factory()));
            }
            Node::Offset(inner) => OffsetView {
                base: inner.base.clone(),
                row_offset: inner.row_offset + row_offset,
                col_offset: inner.col_offset + col_offset,
            },
            _ => OffsetView {
                base: self.clone(),
                row_offset,
                col_offset,
            },
        };
        Ok(Matrix::from_node(Node::Offset(node)))
    }

    /// Keep the leading `rows x cols` block.
    pub fn limits(&self, rows: usize, cols: usize) -> Result<Matrix<T>> {
        if rows > self.rows() || cols > self.cols() {
            return Err(MatrixError::LimitOutOfRange {
                row: rows,
                col: cols,
                rows: self.rows(),
                cols: self.cols(),
            });
        }
        if (rows, cols) == self.shape() {
            return Ok(self.clone());
        }
        let base = match self.node() {
            Node::Zero(_) => return Ok(Matrix::zero_with(rows, cols, self.factory())),
            Node::Limit(inner) => inner.base.clone(),
            _ => self.clone(),
        };
        Ok(Matrix::from_node(Node::Limit(LimitView { base, rows, cols })))
    }

    /// The `rows x cols` block starting at `(row_first, col_first)`.
    pub fn block(&self, row_first: usize, col_first: usize, rows: usize, cols: usize) -> Result<Matrix<T>> {
        self.offsets(row_first, col_first)?.limits(rows, cols)
    }
}
