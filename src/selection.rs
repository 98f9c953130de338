//! Row and column selection views.
//!
//! A selection reads row (or column) `i` of the view from entry `i` of an
//! index array into the base. `None` entries stand for a row or column of
//! additive identities.

use std::sync::Arc;

use matrix_store::{RegionMut, StoreFactory};
use matrix_traits::Scalar;

use crate::supplier::ElementsSupplier;
use crate::view::{Matrix, MatrixView, Node};
use crate::{MatrixError, Result};

/// First and limit position in `indices` whose base index falls in
/// `first..limit`.
fn selected_band(indices: &[Option<usize>], first: usize, limit: usize) -> (usize, usize) {
    let inside = |entry: &Option<usize>| matches!(entry, Some(b) if first <= *b && *b < limit);
    match indices.iter().position(inside) {
        Some(lo) => {
            let hi = indices.iter().rposition(inside).map_or(lo + 1, |i| i + 1);
            (lo, hi)
        }
        None => (indices.len(), 0),
    }
}

fn validate(indices: &[Option<usize>], bound: usize) -> Result<()> {
    for &index in indices.iter().flatten() {
        if index >= bound {
            return Err(MatrixError::InvalidSelection { index, bound });
        }
    }
    Ok(())
}

// ============================================================================
// Rows
// ============================================================================

pub(crate) struct RowsSelectedView<T: Scalar> {
    base: Matrix<T>,
    indices: Arc<[Option<usize>]>,
}

impl<T: Scalar> ElementsSupplier<T> for RowsSelectedView<T> {
    fn rows(&self) -> usize {
        self.indices.len()
    }

    fn cols(&self) -> usize {
        self.base.cols()
    }

    fn factory(&self) -> StoreFactory {
        self.base.factory()
    }

    fn supply_to(&self, target: &mut dyn RegionMut<T>) {
        target.reset();
        for (i, entry) in self.indices.iter().enumerate() {
            if let Some(b) = *entry {
                let limit = self.base.limit_of_row(b).min(self.base.cols());
                for j in self.base.first_in_row(b)..limit {
                    target.set(i, j, self.base.get(b, j));
                }
            }
        }
    }
}

impl<T: Scalar> MatrixView<T> for RowsSelectedView<T> {
    fn get(&self, row: usize, col: usize) -> T {
        match self.indices[row] {
            Some(b) => self.base.get(b, col),
            None => T::zero(),
        }
    }

    fn first_in_row(&self, row: usize) -> usize {
        self.indices[row].map_or(self.base.cols(), |b| self.base.first_in_row(b))
    }

    fn limit_of_row(&self, row: usize) -> usize {
        self.indices[row].map_or(0, |b| self.base.limit_of_row(b))
    }

    fn first_in_column(&self, col: usize) -> usize {
        let (first, limit) = (self.base.first_in_column(col), self.base.limit_of_column(col));
        selected_band(&self.indices, first, limit).0
    }

    fn limit_of_column(&self, col: usize) -> usize {
        let (first, limit) = (self.base.first_in_column(col), self.base.limit_of_column(col));
        selected_band(&self.indices, first, limit).1
    }
}

// ============================================================================
// Columns
// ============================================================================

pub(crate) struct ColumnsSelectedView<T: Scalar> {
    base: Matrix<T>,
    indices: Arc<[Option<usize>]>,
}

impl<T: Scalar> ElementsSupplier<T> for ColumnsSelectedView<T> {
    fn rows(&self) -> usize {
        self.base.rows()
    }

    fn cols(&self) -> usize {
        self.indices.len()
    }

    fn factory(&self) -> StoreFactory {
        self.base.factory()
    }

    fn supply_to(&self, target: &mut dyn RegionMut<T>) {
        target.reset();
        for (j, entry) in self.indices.iter().enumerate() {
            if let Some(b) = *entry {
                let limit = self.base.limit_of_column(b).min(self.base.rows());
                for i in self.base.first_in_column(b)..limit {
                    target.set(i, j, self.base.get(i, b));
                }
            }
        }
    }
}

impl<T: Scalar> MatrixView<T> for ColumnsSelectedView<T> {
    fn get(&self, row: usize, col: usize) -> T {
        match self.indices[col] {
            Some(b) => self.base.get(row, b),
            None => T::zero(),
        }
    }

    fn first_in_row(&self, row: usize) -> usize {
        let (first, limit) = (self.base.first_in_row(row), self.base.limit_of_row(row));
        selected_band(&self.indices, first, limit).0
    }

    fn limit_of_row(&self, row: usize) -> usize {
        let (first, limit) = (self.base.first_in_row(row), self.base.limit_of_row(row));
        selected_band(&self.indices, first, limit).1
    }

    fn first_in_column(&self, col: usize) -> usize {
        self.indices[col].map_or(self.base.rows(), |b| self.base.first_in_column(b))
    }

    fn limit_of_column(&self, col: usize) -> usize {
        self.indices[col].map_or(0, |b| self.base.limit_of_column(b))
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl<T: Scalar> Matrix<T> {
    /// Rows `indices[0], indices[1], ...` of this view; `None` selects a
    /// zero row.
    ///
    /// Selecting from a selection composes the two index arrays.
    pub fn select_rows(&self, indices: &[Option<usize>]) -> Result<Matrix<T>> {
        validate(indices, self.rows())?;
        let (base, indices): (Matrix<T>, Arc<[Option<usize>]>) = match self.node() {
            Node::RowsSelected(inner) => (
                inner.base.clone(),
                indices.iter().map(|e| e.and_then(|b| inner.indices[b])).collect(),
            ),
            _ => (self.clone(), indices.into()),
        };
        Ok(Matrix::from_node(Node::RowsSelected(RowsSelectedView { base, indices })))
    }

    /// Columns `indices[0], indices[1], ...` of this view; `None` selects a
    /// zero column.
    pub fn select_columns(&self, indices: &[Option<usize>]) -> Result<Matrix<T>> {
        validate(indices, self.cols())?;
        let (base, indices): (Matrix<T>, Arc<[Option<usize>]>) = match self.node() {
            Node::ColumnsSelected(inner) => (
                inner.base.clone(),
                indices.iter().map(|e| e.and_then(|b| inner.indices[b])).collect(),
            ),
            _ => (self.clone(), indices.into()),
        };
        Ok(Matrix::from_node(Node::ColumnsSelected(ColumnsSelectedView { base, indices })))
    }

    /// Reorder rows by a list of existing row indices.
    pub fn permute_rows(&self, order: &[usize]) -> Result<Matrix<T>> {
        let indices: Vec<Option<usize>> = order.iter().copied().map(Some).collect();
        self.select_rows(&indices)
    }

    /// Reorder columns by a list of existing column indices.
    pub fn permute_columns(&self, order: &[usize]) -> Result<Matrix<T>> {
        let indices: Vec<Option<usize>> = order.iter().copied().map(Some).collect();
        self.select_columns(&indices)
    }
}
