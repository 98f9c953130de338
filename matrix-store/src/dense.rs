//! Owned dense matrix storage.

use std::ops::{Index, IndexMut};

use matrix_traits::Scalar;

use crate::region::RegionMut;
use crate::{Result, StoreError};

// ============================================================================
// Layout
// ============================================================================

/// Memory order of a [`DenseStore`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Layout {
    /// C order: the column index varies fastest.
    #[default]
    RowMajor,
    /// Fortran order: the row index varies fastest.
    ColumnMajor,
}

impl Layout {
    pub fn strides(self, rows: usize, cols: usize) -> [isize; 2] {
        match self {
            Layout::RowMajor => row_major_strides(rows, cols),
            Layout::ColumnMajor => col_major_strides(rows, cols),
        }
    }
}

/// Column-major strides for a `rows x cols` matrix.
pub fn col_major_strides(rows: usize, _cols: usize) -> [isize; 2] {
    [1, rows.max(1) as isize]
}

/// Row-major strides for a `rows x cols` matrix.
pub fn row_major_strides(_rows: usize, cols: usize) -> [isize; 2] {
    [cols.max(1) as isize, 1]
}

// ============================================================================
// DenseStore
// ============================================================================

/// Owned dense matrix.
///
/// The buffer is contiguous; `layout` decides whether rows or columns are
/// adjacent in memory.
#[derive(Clone, PartialEq)]
pub struct DenseStore<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
    strides: [isize; 2],
    layout: Layout,
}

impl<T: std::fmt::Debug> std::fmt::Debug for DenseStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DenseStore")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("strides", &self.strides)
            .field("layout", &self.layout)
            .finish()
    }
}

impl<T: Clone + num_traits::Zero> DenseStore<T> {
    /// Create a zero-filled store.
    pub fn zeros(rows: usize, cols: usize, layout: Layout) -> Self {
        Self {
            data: vec![T::zero(); rows * cols],
            rows,
            cols,
            strides: layout.strides(rows, cols),
            layout,
        }
    }
}

impl<T> DenseStore<T> {
    /// Create a store with values produced by a function of `(row, col)`.
    ///
    /// The function is called in the memory order of `layout`.
    pub fn from_fn(
        rows: usize,
        cols: usize,
        layout: Layout,
        mut f: impl FnMut(usize, usize) -> T,
    ) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        match layout {
            Layout::RowMajor => {
                for i in 0..rows {
                    for j in 0..cols {
                        data.push(f(i, j));
                    }
                }
            }
            Layout::ColumnMajor => {
                for j in 0..cols {
                    for i in 0..rows {
                        data.push(f(i, j));
                    }
                }
            }
        }
        Self {
            data,
            rows,
            cols,
            strides: layout.strides(rows, cols),
            layout,
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn strides(&self) -> [isize; 2] {
        self.strides
    }

    #[inline]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    #[inline]
    fn position(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.rows && col < self.cols,
            "index ({row}, {col}) out of bounds for {}x{} store",
            self.rows,
            self.cols
        );
        (row as isize * self.strides[0] + col as isize * self.strides[1]) as usize
    }
}

impl<T: Copy> DenseStore<T> {
    /// Create a row-major store from a row-major slice.
    pub fn from_row_slice(rows: usize, cols: usize, values: &[T]) -> Result<Self> {
        if values.len() != rows * cols {
            return Err(StoreError::LengthMismatch {
                expected: rows * cols,
                found: values.len(),
            });
        }
        Ok(Self {
            data: values.to_vec(),
            rows,
            cols,
            strides: row_major_strides(rows, cols),
            layout: Layout::RowMajor,
        })
    }

    /// Create a row-major store from nested rows.
    pub fn from_rows<R: AsRef<[T]>>(input: &[R]) -> Result<Self> {
        let rows = input.len();
        let cols = input.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(rows * cols);
        for (row, values) in input.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != cols {
                return Err(StoreError::RaggedRows {
                    row,
                    expected: cols,
                    found: values.len(),
                });
            }
            data.extend_from_slice(values);
        }
        Self::from_row_slice(rows, cols, &data)
    }

    /// Element at `(row, col)`.
    ///
    /// # Panics
    /// Panics if the index is out of bounds.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> T {
        self.data[self.position(row, col)]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        let idx = self.position(row, col);
        self.data[idx] = value;
    }

    /// Copy out all elements in row-major order, regardless of layout.
    pub fn to_row_major_vec(&self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.len());
        for i in 0..self.rows {
            for j in 0..self.cols {
                out.push(self.get(i, j));
            }
        }
        out
    }
}

impl<T> Index<(usize, usize)> for DenseStore<T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &T {
        &self.data[self.position(row, col)]
    }
}

impl<T> IndexMut<(usize, usize)> for DenseStore<T> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        let idx = self.position(row, col);
        &mut self.data[idx]
    }
}

impl<T: Scalar> RegionMut<T> for DenseStore<T> {
    #[inline]
    fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> T {
        DenseStore::get(self, row, col)
    }

    #[inline]
    fn set(&mut self, row: usize, col: usize, value: T) {
        DenseStore::set(self, row, col, value)
    }

    #[inline]
    fn add(&mut self, row: usize, col: usize, addend: T) {
        let idx = self.position(row, col);
        self.data[idx] = self.data[idx] + addend;
    }

    fn fill_all(&mut self, value: T) {
        self.data.fill(value);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    #[test]
    fn test_col_major_strides() {
        assert_eq!(col_major_strides(3, 4), [1, 3]);
    }

    #[test]
    fn test_row_major_strides() {
        assert_eq!(row_major_strides(3, 4), [4, 1]);
    }

    #[test]
    fn test_from_fn_layouts_agree() {
        let r = DenseStore::from_fn(2, 3, Layout::RowMajor, |i, j| (i * 10 + j) as f64);
        let c = DenseStore::from_fn(2, 3, Layout::ColumnMajor, |i, j| (i * 10 + j) as f64);
        assert_eq!(r.data(), &[0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
        assert_eq!(c.data(), &[0.0, 10.0, 1.0, 11.0, 2.0, 12.0]);
        for i in 0..2 {
            for j in 0..3 {
                assert_eq!(r.get(i, j), c.get(i, j));
            }
        }
        assert_eq!(c.to_row_major_vec(), r.data());
    }

    #[test]
    fn test_from_rows() {
        let m = DenseStore::from_rows(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]).unwrap();
        assert_eq!(m.rows(), 3);
        assert_eq!(m.cols(), 2);
        assert_eq!(m[(2, 1)], 6.0);
    }

    #[test]
    fn test_from_rows_ragged() {
        let rows: Vec<Vec<f64>> = vec![vec![1.0, 2.0], vec![3.0]];
        let err = DenseStore::from_rows(&rows).unwrap_err();
        assert!(matches!(
            err,
            StoreError::RaggedRows {
                row: 1,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn test_from_row_slice_length_mismatch() {
        assert!(DenseStore::from_row_slice(2, 2, &[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn test_layout_strides_address_every_cell_once() {
        for layout in [Layout::RowMajor, Layout::ColumnMajor] {
            let m = DenseStore::from_fn(3, 4, layout, |i, j| (i * 4 + j) as f64);
            let mut seen: Vec<f64> = m.data().to_vec();
            seen.sort_by(|a, b| a.partial_cmp(b).unwrap());
            assert_eq!(seen, m.to_row_major_vec(), "{layout:?}");
        }
    }

    #[test]
    fn test_region_add_and_fill() {
        let mut m = DenseStore::<Complex64>::zeros(2, 2, Layout::ColumnMajor);
        RegionMut::add(&mut m, 1, 0, Complex64::new(1.0, 1.0));
        RegionMut::add(&mut m, 1, 0, Complex64::new(1.0, -3.0));
        assert_eq!(m.get(1, 0), Complex64::new(2.0, -2.0));
        m.fill_all(Complex64::new(7.0, 0.0));
        assert_eq!(m.get(0, 1), Complex64::new(7.0, 0.0));
        m.reset();
        assert_eq!(m.get(1, 0), Complex64::new(0.0, 0.0));
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_get_out_of_bounds() {
        let m = DenseStore::<f64>::zeros(2, 2, Layout::RowMajor);
        m.get(2, 0);
    }
}
