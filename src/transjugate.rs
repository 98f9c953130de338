//! Transpose, conjugate and adjoint views.
//!
//! All three share one node carrying a [`Transjugation`]. Construction
//! composes with an existing transjugated base instead of nesting, so the
//! tree never holds two transjugated nodes in a row.
//!
//! Every result is linked both ways with the view it came from, so undoing
//! an operation hands back that exact view: `v.transpose().transpose()` is
//! `v` for every `v`, including views that are themselves transjugated.

use matrix_store::{RegionMut, RegionMutExt, StoreFactory};
use matrix_traits::{Scalar, Transjugation};

use crate::supplier::ElementsSupplier;
use crate::view::{Matrix, MatrixView, Node};

pub(crate) struct TransjugatedView<T: Scalar> {
    base: Matrix<T>,
    op: Transjugation,
}

impl<T: Scalar> TransjugatedView<T> {
    #[inline]
    pub(crate) fn base(&self) -> &Matrix<T> {
        &self.base
    }

    #[inline]
    pub(crate) fn op(&self) -> Transjugation {
        self.op
    }
}

impl<T: Scalar> ElementsSupplier<T> for TransjugatedView<T> {
    fn rows(&self) -> usize {
        if self.op.swaps_axes() {
            self.base.cols()
        } else {
            self.base.rows()
        }
    }

    fn cols(&self) -> usize {
        if self.op.swaps_axes() {
            self.base.rows()
        } else {
            self.base.cols()
        }
    }

    fn factory(&self) -> StoreFactory {
        self.base.factory()
    }

    fn supply_to(&self, target: &mut dyn RegionMut<T>) {
        if self.op.swaps_axes() {
            self.base.supply_to(&mut target.region_by_transposing());
        } else {
            self.base.supply_to(target);
        }
        if self.op.conjugates() {
            target.modify_all(&|x: T| x.conj());
        }
    }
}

impl<T: Scalar> MatrixView<T> for TransjugatedView<T> {
    fn get(&self, row: usize, col: usize) -> T {
        let value = if self.op.swaps_axes() {
            self.base.get(col, row)
        } else {
            self.base.get(row, col)
        };
        self.op.apply(value)
    }

    fn first_in_row(&self, row: usize) -> usize {
        if self.op.swaps_axes() {
            self.base.first_in_column(row)
        } else {
            self.base.first_in_row(row)
        }
    }

    fn limit_of_row(&self, row: usize) -> usize {
        if self.op.swaps_axes() {
            self.base.limit_of_column(row)
        } else {
            self.base.limit_of_row(row)
        }
    }

    fn first_in_column(&self, col: usize) -> usize {
        if self.op.swaps_axes() {
            self.base.first_in_row(col)
        } else {
            self.base.first_in_column(col)
        }
    }

    fn limit_of_column(&self, col: usize) -> usize {
        if self.op.swaps_axes() {
            self.base.limit_of_row(col)
        } else {
            self.base.limit_of_column(col)
        }
    }
}

impl<T: Scalar> Matrix<T> {
    /// Apply `op` to this view.
    ///
    /// The result is normalized: a transjugated base is unwrapped and its
    /// operation composed with `op`, and operations that leave the view
    /// unchanged return `self`.
    pub fn transjugate(&self, op: Transjugation) -> Matrix<T> {
        if op.is_identity() {
            return self.clone();
        }
        if let Some(known) = self.derived_transjugate(op) {
            log::trace!("transjugate: reusing {:?} view", op);
            return known;
        }
        let result = match self.node() {
            Node::Transjugated(t) => {
                let combined = t.op.compose(op);
                if combined.is_identity() {
                    log::trace!("transjugate: {:?} cancels, returning base", op);
                    t.base.clone()
                } else if let Some(known) = t.base.derived_transjugate(combined) {
                    known
                } else {
                    let fresh = wrap(t.base.clone(), combined);
                    t.base.link_transjugate(combined, &fresh);
                    fresh.link_transjugate(combined.inverse(), &t.base);
                    fresh
                }
            }
            Node::Identity(_) => return self.clone(),
            Node::Zero(_) if !op.swaps_axes() || self.rows() == self.cols() => return self.clone(),
            Node::Single(_) if !op.conjugates() => return self.clone(),
            _ => wrap(self.clone(), op),
        };
        self.link_transjugate(op, &result);
        result.link_transjugate(op.inverse(), self);
        result
    }

    /// Exchange rows and columns.
    pub fn transpose(&self) -> Matrix<T> {
        self.transjugate(Transjugation::Transpose)
    }

    /// Element-wise complex conjugate.
    pub fn conjugate(&self) -> Matrix<T> {
        self.transjugate(Transjugation::Conj)
    }

    /// Conjugate transpose.
    pub fn adjoint(&self) -> Matrix<T> {
        self.transjugate(Transjugation::Adjoint)
    }

    /// Base and operation of a transjugated node.
    pub(crate) fn as_transjugated(&self) -> Option<(&Matrix<T>, Transjugation)> {
        match self.node() {
            Node::Transjugated(t) => Some((t.base(), t.op())),
            _ => None,
        }
    }
}

fn wrap<T: Scalar>(base: Matrix<T>, op: Transjugation) -> Matrix<T> {
    Matrix::from_node(Node::Transjugated(TransjugatedView { base, op }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    fn sample() -> Matrix<Complex64> {
        Matrix::from_rows(&[[c(1.0, 1.0), c(2.0, 0.0), c(0.0, 3.0)], [c(4.0, -1.0), c(5.0, 5.0), c(6.0, 0.0)]])
            .unwrap()
    }

    #[test]
    fn test_transpose_values() {
        let a = sample();
        let t = a.transpose();
        assert_eq!(t.shape(), (3, 2));
        for i in 0..2 {
            for j in 0..3 {
                assert_eq!(t.get(j, i), a.get(i, j));
            }
        }
        assert_eq!(t.collect().to_row_major_vec(), t.to_row_major_vec());
    }

    #[test]
    fn test_double_transpose_returns_original() {
        let a = sample();
        assert!(a.transpose().transpose().ptr_eq(&a));
        assert!(a.conjugate().conjugate().ptr_eq(&a));
        assert!(a.adjoint().adjoint().ptr_eq(&a));
    }

    #[test]
    fn test_double_transjugation_of_transjugated_views() {
        let a = sample();
        let single = Matrix::single(c(2.0, -1.0)).conjugate();
        for v in [a.conjugate(), a.adjoint(), a.transpose(), single, a.lower_triangular(false)] {
            assert!(v.transpose().transpose().ptr_eq(&v));
            assert!(v.conjugate().conjugate().ptr_eq(&v));
            assert!(v.adjoint().adjoint().ptr_eq(&v));
            assert!(v.transpose().conjugate().adjoint().ptr_eq(&v));
        }
        let h = a.adjoint();
        let hcc = h.conjugate().conjugate();
        assert!(hcc.ptr_eq(&h));
        assert_eq!(hcc.get(2, 0), c(0.0, -3.0));
    }

    #[test]
    fn test_repeated_op_reuses_live_view() {
        let a = sample();
        let t = a.transpose();
        assert!(a.transpose().ptr_eq(&t));
        drop(t);
        let fresh = a.transpose();
        assert_eq!(fresh.shape(), (3, 2));
        assert!(fresh.transpose().ptr_eq(&a));
    }

    #[test]
    fn test_chained_ops_stay_one_node_deep() {
        let a = sample();
        let v = a.conjugate().transpose();
        let (base, op) = v.as_transjugated().unwrap();
        assert!(base.ptr_eq(&a));
        assert_eq!(op, Transjugation::Adjoint);
        assert_eq!(v.get(2, 1), c(6.0, 0.0));
        assert_eq!(v.get(2, 0), c(0.0, -3.0));
    }

    #[test]
    fn test_transpose_then_adjoint_is_conjugate() {
        let a = sample();
        let v = a.transpose().adjoint();
        assert_eq!(v.shape(), a.shape());
        let (base, op) = v.as_transjugated().unwrap();
        assert!(base.ptr_eq(&a));
        assert_eq!(op, Transjugation::Conj);
        assert_eq!(v.get(0, 0), c(1.0, -1.0));
    }

    #[test]
    fn test_adjoint_values_and_materialization() {
        let a = sample();
        let h = a.adjoint();
        assert_eq!(h.get(2, 0), c(0.0, -3.0));
        assert_eq!(h.get(1, 1), c(5.0, -5.0));
        let dense = h.collect();
        for i in 0..3 {
            for j in 0..2 {
                assert_eq!(dense.get(i, j), h.get(i, j));
            }
        }
    }

    #[test]
    fn test_constants_are_fixed_points() {
        let id = Matrix::<Complex64>::identity(3);
        assert!(id.transpose().ptr_eq(&id));
        assert!(id.adjoint().ptr_eq(&id));
        let z = Matrix::<f64>::zero(3, 3);
        assert!(z.transpose().ptr_eq(&z));
        let s = Matrix::single(2.0);
        assert!(s.transpose().ptr_eq(&s));
    }

    #[test]
    fn test_rectangular_zero_transpose() {
        let z = Matrix::<f64>::zero(2, 5);
        let t = z.transpose();
        assert_eq!(t.shape(), (5, 2));
        assert!(t.is_zero_view());
        assert!(t.transpose().ptr_eq(&z));
    }

    #[test]
    fn test_conjugate_of_real_is_identity_valued() {
        let a = Matrix::from_rows(&[[1.0, -2.0]]).unwrap();
        assert_eq!(a.conjugate().to_row_major_vec(), vec![1.0, -2.0]);
    }
}
