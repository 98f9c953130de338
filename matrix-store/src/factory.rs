//! Creation of concrete stores and identity scalars.

use matrix_traits::{Scalar, ScalarValue};

use crate::dense::{DenseStore, Layout};
use crate::sparse::SparseVector;

/// Factory every view delegates to when it needs a new physical matrix.
///
/// A leaf view carries the factory of the store it wraps; logical views
/// report their base's factory, so results inherit the layout of the data
/// they were computed from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StoreFactory {
    layout: Layout,
}

impl StoreFactory {
    pub const fn new(layout: Layout) -> Self {
        Self { layout }
    }

    pub const fn row_major() -> Self {
        Self::new(Layout::RowMajor)
    }

    pub const fn column_major() -> Self {
        Self::new(Layout::ColumnMajor)
    }

    #[inline]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Zero-filled `rows x cols` store.
    pub fn make_zero<T: Scalar>(&self, rows: usize, cols: usize) -> DenseStore<T> {
        DenseStore::zeros(rows, cols, self.layout)
    }

    pub fn make_filled<T: Scalar>(
        &self,
        rows: usize,
        cols: usize,
        f: impl FnMut(usize, usize) -> T,
    ) -> DenseStore<T> {
        DenseStore::from_fn(rows, cols, self.layout, f)
    }

    pub fn make_sparse<T: Scalar>(&self, length: usize) -> SparseVector<T> {
        SparseVector::new(length)
    }

    /// Additive identity of `T`.
    #[inline]
    pub fn zero<T: Scalar>(&self) -> T {
        T::zero()
    }

    /// Multiplicative identity of `T`.
    #[inline]
    pub fn one<T: Scalar>(&self) -> T {
        T::one()
    }

    #[inline]
    pub fn scalar<T: Scalar>(&self, value: T) -> ScalarValue<T> {
        ScalarValue::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    #[test]
    fn test_make_zero_uses_layout() {
        let m: DenseStore<f64> = StoreFactory::column_major().make_zero(2, 3);
        assert_eq!(m.layout(), Layout::ColumnMajor);
        assert_eq!(m.strides(), [1, 2]);
        assert!(m.data().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_identity_scalars() {
        let f = StoreFactory::default();
        assert_eq!(f.zero::<Complex64>(), Complex64::new(0.0, 0.0));
        assert_eq!(f.one::<Complex64>(), Complex64::new(1.0, 0.0));
        assert_eq!(f.scalar(2.5f64).numeric_value(), 2.5);
    }
}
