//! Writable targets that matrix views materialize into.
//!
//! A [`RegionMut`] is addressed by `(row, col)` in its own coordinates and
//! can be carved into zero-copy sub-regions:
//!
//! - [`OffsetRegion`]: origin shifted by `(row_offset, col_offset)`
//! - [`LimitRegion`]: leading `rows x cols` block
//! - [`TransposedRegion`]: rows and columns exchanged
//!
//! Sub-regions borrow their parent mutably, so at most one writer exists
//! for any cell at a time.

use std::marker::PhantomData;

use matrix_traits::Scalar;

/// Consumer side of a materialization.
pub trait RegionMut<T: Scalar> {
    fn rows(&self) -> usize;

    fn cols(&self) -> usize;

    fn get(&self, row: usize, col: usize) -> T;

    fn set(&mut self, row: usize, col: usize, value: T);

    /// Add `addend` to the current value at `(row, col)`.
    fn add(&mut self, row: usize, col: usize, addend: T) {
        let current = self.get(row, col);
        self.set(row, col, current + addend);
    }

    /// Set every cell to the additive identity.
    fn reset(&mut self) {
        self.fill_all(T::zero());
    }

    fn fill_all(&mut self, value: T) {
        for j in 0..self.cols() {
            for i in 0..self.rows() {
                self.set(i, j, value);
            }
        }
    }

    /// Set cells `(row, col..cols)`.
    fn fill_row(&mut self, row: usize, col: usize, value: T) {
        for j in col..self.cols() {
            self.set(row, j, value);
        }
    }

    /// Set cells `(row..rows, col)`.
    fn fill_column(&mut self, row: usize, col: usize, value: T) {
        for i in row..self.rows() {
            self.set(i, col, value);
        }
    }

    /// Set cells `(row + k, col + k)` for as long as both stay in range.
    fn fill_diagonal(&mut self, row: usize, col: usize, value: T) {
        let mut i = row;
        let mut j = col;
        while i < self.rows() && j < self.cols() {
            self.set(i, j, value);
            i += 1;
            j += 1;
        }
    }

    /// Replace every cell `x` with `f(x)`.
    fn modify_all(&mut self, f: &dyn Fn(T) -> T) {
        for j in 0..self.cols() {
            for i in 0..self.rows() {
                let value = self.get(i, j);
                self.set(i, j, f(value));
            }
        }
    }
}

/// Sub-region constructors available on every [`RegionMut`], including
/// `dyn RegionMut<T>`.
pub trait RegionMutExt<T: Scalar>: RegionMut<T> {
    /// Region whose `(0, 0)` is this region's `(row_offset, col_offset)`.
    ///
    /// # Panics
    /// Panics if an offset exceeds the corresponding dimension.
    fn region_by_offsets(&mut self, row_offset: usize, col_offset: usize) -> OffsetRegion<'_, T, Self> {
        OffsetRegion::new(self, row_offset, col_offset)
    }

    /// Region covering the leading `rows x cols` block.
    ///
    /// # Panics
    /// Panics if a limit exceeds the corresponding dimension.
    fn region_by_limits(&mut self, rows: usize, cols: usize) -> LimitRegion<'_, T, Self> {
        LimitRegion::new(self, rows, cols)
    }

    /// Region addressed with rows and columns exchanged.
    fn region_by_transposing(&mut self) -> TransposedRegion<'_, T, Self> {
        TransposedRegion::new(self)
    }
}

impl<T: Scalar, R: RegionMut<T> + ?Sized> RegionMutExt<T> for R {}

// ============================================================================
// OffsetRegion
// ============================================================================

pub struct OffsetRegion<'a, T, R: ?Sized> {
    inner: &'a mut R,
    row_offset: usize,
    col_offset: usize,
    rows: usize,
    cols: usize,
    _elem: PhantomData<T>,
}

impl<'a, T: Scalar, R: RegionMut<T> + ?Sized> OffsetRegion<'a, T, R> {
    pub fn new(inner: &'a mut R, row_offset: usize, col_offset: usize) -> Self {
        assert!(
            row_offset <= inner.rows() && col_offset <= inner.cols(),
            "offsets ({row_offset}, {col_offset}) exceed {}x{} region",
            inner.rows(),
            inner.cols()
        );
        let rows = inner.rows() - row_offset;
        let cols = inner.cols() - col_offset;
        Self {
            inner,
            row_offset,
            col_offset,
            rows,
            cols,
            _elem: PhantomData,
        }
    }

    #[inline]
    fn check(&self, row: usize, col: usize) {
        assert!(
            row < self.rows && col < self.cols,
            "index ({row}, {col}) out of bounds for {}x{} region",
            self.rows,
            self.cols
        );
    }
}

impl<T: Scalar, R: RegionMut<T> + ?Sized> RegionMut<T> for OffsetRegion<'_, T, R> {
    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.cols
    }

    fn get(&self, row: usize, col: usize) -> T {
        self.check(row, col);
        self.inner.get(row + self.row_offset, col + self.col_offset)
    }

    fn set(&mut self, row: usize, col: usize, value: T) {
        self.check(row, col);
        self.inner
            .set(row + self.row_offset, col + self.col_offset, value);
    }

    fn add(&mut self, row: usize, col: usize, addend: T) {
        self.check(row, col);
        self.inner
            .add(row + self.row_offset, col + self.col_offset, addend);
    }
}

// ============================================================================
// LimitRegion
// ============================================================================

pub struct LimitRegion<'a, T, R: ?Sized> {
    inner: &'a mut R,
    rows: usize,
    cols: usize,
    _elem: PhantomData<T>,
}

impl<'a, T: Scalar, R: RegionMut<T> + ?Sized> LimitRegion<'a, T, R> {
    pub fn new(inner: &'a mut R, rows: usize, cols: usize) -> Self {
        assert!(
            rows <= inner.rows() && cols <= inner.cols(),
            "limits ({rows}, {cols}) exceed {}x{} region",
            inner.rows(),
            inner.cols()
        );
        Self {
            inner,
            rows,
            cols,
            _elem: PhantomData,
        }
    }

    #[inline]
    fn check(&self, row: usize, col: usize) {
        assert!(
            row < self.rows && col < self.cols,
            "index ({row}, {col}) out of bounds for {}x{} region",
            self.rows,
            self.cols
        );
    }
}

impl<T: Scalar, R: RegionMut<T> + ?Sized> RegionMut<T> for LimitRegion<'_, T, R> {
    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.cols
    }

    fn get(&self, row: usize, col: usize) -> T {
        self.check(row, col);
        self.inner.get(row, col)
    }

    fn set(&mut self, row: usize, col: usize, value: T) {
        self.check(row, col);
        self.inner.set(row, col, value);
    }

    fn add(&mut self, row: usize, col: usize, addend: T) {
        self.check(row, col);
        self.inner.add(row, col, addend);
    }
}

// ============================================================================
// TransposedRegion
// ============================================================================

pub struct TransposedRegion<'a, T, R: ?Sized> {
    inner: &'a mut R,
    _elem: PhantomData<T>,
}

impl<'a, T: Scalar, R: RegionMut<T> + ?Sized> TransposedRegion<'a, T, R> {
    pub fn new(inner: &'a mut R) -> Self {
        Self {
            inner,
            _elem: PhantomData,
        }
    }
}

impl<T: Scalar, R: RegionMut<T> + ?Sized> RegionMut<T> for TransposedRegion<'_, T, R> {
    fn rows(&self) -> usize {
        self.inner.cols()
    }

    fn cols(&self) -> usize {
        self.inner.rows()
    }

    fn get(&self, row: usize, col: usize) -> T {
        self.inner.get(col, row)
    }

    fn set(&mut self, row: usize, col: usize, value: T) {
        self.inner.set(col, row, value);
    }

    fn add(&mut self, row: usize, col: usize, addend: T) {
        self.inner.add(col, row, addend);
    }

    fn reset(&mut self) {
        self.inner.reset();
    }

    fn fill_all(&mut self, value: T) {
        self.inner.fill_all(value);
    }

    fn fill_row(&mut self, row: usize, col: usize, value: T) {
        self.inner.fill_column(col, row, value);
    }

    fn fill_column(&mut self, row: usize, col: usize, value: T) {
        self.inner.fill_row(col, row, value);
    }

    fn fill_diagonal(&mut self, row: usize, col: usize, value: T) {
        self.inner.fill_diagonal(col, row, value);
    }

    fn modify_all(&mut self, f: &dyn Fn(T) -> T) {
        self.inner.modify_all(f);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DenseStore, Layout};

    fn zeros(rows: usize, cols: usize) -> DenseStore<f64> {
        DenseStore::zeros(rows, cols, Layout::RowMajor)
    }

    #[test]
    fn test_offset_region() {
        let mut m = zeros(3, 4);
        {
            let mut r = m.region_by_offsets(1, 2);
            assert_eq!((r.rows(), r.cols()), (2, 2));
            r.set(0, 0, 5.0);
            r.add(1, 1, 2.0);
            r.add(1, 1, 2.0);
        }
        assert_eq!(m.get(1, 2), 5.0);
        assert_eq!(m.get(2, 3), 4.0);
    }

    #[test]
    fn test_limit_region_reset_leaves_outside() {
        let mut m = DenseStore::from_fn(3, 3, Layout::RowMajor, |_, _| 1.0);
        m.region_by_limits(2, 2).reset();
        assert_eq!(m.get(0, 0), 0.0);
        assert_eq!(m.get(1, 1), 0.0);
        assert_eq!(m.get(2, 2), 1.0);
        assert_eq!(m.get(0, 2), 1.0);
    }

    #[test]
    fn test_transposed_region_fills() {
        let mut m = zeros(2, 3);
        {
            let mut t = m.region_by_transposing();
            assert_eq!((t.rows(), t.cols()), (3, 2));
            t.set(2, 0, 9.0);
            t.fill_row(1, 0, 4.0);
        }
        assert_eq!(m.get(0, 2), 9.0);
        assert_eq!(m.get(0, 1), 4.0);
        assert_eq!(m.get(1, 1), 4.0);
    }

    #[test]
    fn test_fill_diagonal_rectangular() {
        let mut m = zeros(2, 4);
        m.fill_diagonal(0, 1, 1.0);
        assert_eq!(m.to_row_major_vec(), vec![0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_nested_regions_through_dyn() {
        let mut m = zeros(4, 4);
        {
            let target: &mut dyn RegionMut<f64> = &mut m;
            let mut outer = target.region_by_offsets(1, 1);
            let mut inner = outer.region_by_limits(2, 2);
            inner.fill_all(3.0);
            inner.modify_all(&|x| x * 2.0);
        }
        assert_eq!(m.get(1, 1), 6.0);
        assert_eq!(m.get(2, 2), 6.0);
        assert_eq!(m.get(3, 3), 0.0);
        assert_eq!(m.get(0, 0), 0.0);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_limit_region_rejects_outside_write() {
        let mut m = zeros(3, 3);
        m.region_by_limits(2, 2).set(2, 0, 1.0);
    }
}
