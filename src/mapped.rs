//! Element-wise unary function view.

use std::sync::Arc;

use matrix_store::{RegionMut, StoreFactory};
use matrix_traits::Scalar;

use crate::supplier::{ElementsSupplier, UnaryFn};
use crate::view::{supply_by_columns, Matrix, MatrixView, Node};

/// `f(base[i, j])` at every position.
///
/// When `f` maps zero to zero the base's bands still hold and only cells
/// inside them are evaluated; otherwise every band is full.
pub(crate) struct MappedView<T: Scalar> {
    base: Matrix<T>,
    f: UnaryFn<T>,
    preserves_zero: bool,
}

impl<T: Scalar> ElementsSupplier<T> for MappedView<T> {
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
        if self.preserves_zero {
            supply_by_columns(self, target);
        } else {
            self.base.supply_to(target);
            target.modify_all(&*self.f);
        }
    }
}

impl<T: Scalar> MatrixView<T> for MappedView<T> {
    fn get(&self, row: usize, col: usize) -> T {
        (self.f)(self.base.get(row, col))
    }

    fn first_in_row(&self, row: usize) -> usize {
        if self.preserves_zero {
            self.base.first_in_row(row)
        } else {
            0
        }
    }

    fn limit_of_row(&self, row: usize) -> usize {
        if self.preserves_zero {
            self.base.limit_of_row(row)
        } else {
            self.base.cols()
        }
    }

    fn first_in_column(&self, col: usize) -> usize {
        if self.preserves_zero {
            self.base.first_in_column(col)
        } else {
            0
        }
    }

    fn limit_of_column(&self, col: usize) -> usize {
        if self.preserves_zero {
            self.base.limit_of_column(col)
        } else {
            self.base.rows()
        }
    }
}

impl<T: Scalar> Matrix<T> {
    /// Apply `f` to every element on access.
    ///
    /// Whether `f` keeps zeros at zero is checked once here by evaluating
    /// `f(0)`, so `f` must be pure.
    pub fn map<F>(&self, f: F) -> Matrix<T>
    where
        F: Fn(T) -> T + Send + Sync + 'static,
    {
        let preserves_zero = f(T::zero()) == T::zero();
        if preserves_zero && self.is_zero_view() {
            log::trace!("map: zero-preserving function over zero");
            return self.clone();
        }
        Matrix::from_node(Node::Mapped(MappedView {
            base: self.clone(),
            f: Arc::new(f),
            preserves_zero,
        }))
    }

    /// Element-wise additive inverse.
    pub fn negate(&self) -> Matrix<T> {
        if self.is_zero_view() {
            return self.clone();
        }
        self.map(|x: T| -x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_values() {
        let a = Matrix::from_rows(&[[1.0, -2.0], [0.0, 4.0]]).unwrap();
        let sq = a.map(|x| x * x);
        assert_eq!(sq.to_row_major_vec(), vec![1.0, 4.0, 0.0, 16.0]);
        assert_eq!(sq.collect().to_row_major_vec(), sq.to_row_major_vec());
    }

    #[test]
    fn test_zero_preserving_map_keeps_bands() {
        let l = Matrix::from_fn(3, 3, |_, _| 2.0).lower_triangular(false);
        let m = l.map(|x| 3.0 * x);
        assert_eq!((m.first_in_row(0), m.limit_of_row(0)), (0, 1));
        assert_eq!(m.collect().to_row_major_vec(), vec![6.0, 0.0, 0.0, 6.0, 6.0, 0.0, 6.0, 6.0, 6.0]);
    }

    #[test]
    fn test_shifting_map_fills_everything() {
        let l = Matrix::from_fn(2, 2, |_, _| 1.0).upper_triangular(false);
        let m = l.map(|x| x + 1.0);
        assert_eq!((m.first_in_row(1), m.limit_of_row(1)), (0, 2));
        assert_eq!(m.collect().to_row_major_vec(), vec![2.0, 2.0, 1.0, 2.0]);
    }

    #[test]
    fn test_negate() {
        let a = Matrix::from_rows(&[[1.0, -2.0]]).unwrap();
        assert_eq!(a.negate().to_row_major_vec(), vec![-1.0, 2.0]);
        let z = Matrix::<f64>::zero(2, 2);
        assert!(z.negate().ptr_eq(&z));
    }
}
