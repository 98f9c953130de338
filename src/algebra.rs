//! Matrix products, scaling and sums with algebraic short-circuits.
//!
//! Before any arithmetic is done the operands are inspected:
//!
//! - a zero operand yields a zero of the product shape
//! - an identity operand yields the other operand
//! - a single-scalar operand turns the product into a scaling
//! - two operands under the same transjugation multiply their bases
//! - a concatenated or patched operand is split by the coordinator
//!
//! Everything else goes to a dense kernel that skips the zero regions
//! reported by the operands' bands.

use std::sync::Arc;

use matrix_store::DenseStore;
use matrix_traits::Scalar;

use crate::coordinator::{multiply_composed, scale_composed};
use crate::supplier::ElementsSupplier;
use crate::view::{Matrix, MatrixView};
use crate::{MatrixError, Result};

impl<T: Scalar> Matrix<T> {
    /// `self * right`.
    ///
    /// A 1x1 single-scalar operand on either side scales the other operand
    /// instead, whatever its shape.
    pub fn multiply(&self, right: &Matrix<T>) -> Result<Matrix<T>> {
        if let Some(value) = self.single_value() {
            log::debug!("multiply: single scalar on the left, scaling");
            return right.scale(value);
        }
        if let Some(value) = right.single_value() {
            log::debug!("multiply: single scalar on the right, scaling");
            return self.scale(value);
        }
        if self.cols() != right.rows() {
            return Err(MatrixError::IncompatibleProduct {
                left: self.shape(),
                right: right.shape(),
            });
        }
        if self.is_zero_view() || right.is_zero_view() {
            log::debug!("multiply: zero operand, {}x{} zero", self.rows(), right.cols());
            return Ok(Matrix::zero_with(self.rows(), right.cols(), self.factory()));
        }
        if self.is_identity_view() {
            log::debug!("multiply: identity on the left");
            return Ok(right.clone());
        }
        if right.is_identity_view() {
            log::debug!("multiply: identity on the right");
            return Ok(self.clone());
        }
        if let (Some((a, op)), Some((b, other))) = (self.as_transjugated(), right.as_transjugated()) {
            if op == other {
                log::debug!("multiply: both operands under {op:?}, multiplying bases");
                let product = if op.swaps_axes() {
                    b.multiply(a)?
                } else {
                    a.multiply(b)?
                };
                return Ok(product.transjugate(op));
            }
        }
        if let Some(result) = multiply_composed(self, right) {
            return result;
        }
        Ok(dense_product(self, right))
    }

    /// `left * self`.
    pub fn premultiply(&self, left: &Matrix<T>) -> Result<Matrix<T>> {
        left.multiply(self)
    }

    /// Every element multiplied by `factor`.
    pub fn scale(&self, factor: T) -> Result<Matrix<T>> {
        if factor.is_zero() {
            log::debug!("scale: zero factor");
            return Ok(Matrix::zero_with(self.rows(), self.cols(), self.factory()));
        }
        if factor.is_one() || self.is_zero_view() {
            return Ok(self.clone());
        }
        if let Some(value) = self.single_value() {
            return Ok(Matrix::single_with(value * factor, self.factory()));
        }
        if let Some(result) = scale_composed(self, factor) {
            return result;
        }
        Ok(self.map(move |x| x * factor))
    }

    /// Element-wise sum. A zero operand returns the other operand.
    pub fn add(&self, other: &Matrix<T>) -> Result<Matrix<T>> {
        if self.shape() != other.shape() {
            return Err(MatrixError::ShapeMismatch(self.shape(), other.shape()));
        }
        if other.is_zero_view() {
            log::debug!("add: zero on the right");
            return Ok(self.clone());
        }
        if self.is_zero_view() {
            log::debug!("add: zero on the left");
            return Ok(other.clone());
        }
        self.zip_with(other, |x, y| x + y)
    }

    /// Element-wise difference.
    pub fn subtract(&self, other: &Matrix<T>) -> Result<Matrix<T>> {
        if other.is_zero_view() {
            if self.shape() != other.shape() {
                return Err(MatrixError::ShapeMismatch(self.shape(), other.shape()));
            }
            return Ok(self.clone());
        }
        self.zip_with(other, |x, y| x - y)
    }
}

fn shared_store<T: Scalar>(m: &Matrix<T>) -> Arc<DenseStore<T>> {
    match m.as_store() {
        Some(store) => Arc::clone(store),
        None => Arc::new(m.collect()),
    }
}

/// Dense `left * right`, accumulating `C[i, j]` only over the overlap of
/// row `i` of `left` and column `j` of `right`.
fn dense_product<T: Scalar>(left: &Matrix<T>, right: &Matrix<T>) -> Matrix<T> {
    let (m, inner) = left.shape();
    let n = right.cols();
    log::trace!("dense_product: {m}x{inner} * {inner}x{n}");

    let row_bands: Vec<(usize, usize)> = (0..m)
        .map(|i| (left.first_in_row(i), left.limit_of_row(i).min(inner)))
        .collect();
    let col_bands: Vec<(usize, usize)> = (0..n)
        .map(|j| (right.first_in_column(j), right.limit_of_column(j).min(inner)))
        .collect();

    let a = shared_store(left);
    let b = shared_store(right);
    let mut c = left.factory().make_zero(m, n);
    for (i, &(a_first, a_limit)) in row_bands.iter().enumerate() {
        for (j, &(b_first, b_limit)) in col_bands.iter().enumerate() {
            let mut acc = T::zero();
            for k in a_first.max(b_first)..a_limit.min(b_limit) {
                acc = acc + a.get(i, k) * b.get(k, j);
            }
            c.set(i, j, acc);
        }
    }
    Matrix::from_store(c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use num_complex::Complex64;

    fn naive(a: &Matrix<f64>, b: &Matrix<f64>) -> Vec<f64> {
        let (m, k) = a.shape();
        let n = b.cols();
        let mut out = vec![0.0; m * n];
        for i in 0..m {
            for j in 0..n {
                out[i * n + j] = (0..k).map(|p| a.get(i, p) * b.get(p, j)).sum();
            }
        }
        out
    }

    fn ramp(rows: usize, cols: usize) -> Matrix<f64> {
        Matrix::from_fn(rows, cols, |i, j| (i * cols + j) as f64 * 0.5 - 1.0)
    }

    #[test]
    fn test_dense_product() {
        let a = ramp(3, 4);
        let b = ramp(4, 2);
        let c = a.multiply(&b).unwrap();
        assert_eq!(c.shape(), (3, 2));
        for (x, y) in c.to_row_major_vec().iter().zip(naive(&a, &b)) {
            assert_relative_eq!(*x, y, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_incompatible_product() {
        let err = ramp(2, 3).multiply(&ramp(2, 3)).unwrap_err();
        assert!(matches!(err, MatrixError::IncompatibleProduct { left: (2, 3), right: (2, 3) }));
    }

    #[test]
    fn test_zero_absorption() {
        let a = ramp(3, 4);
        let z = a.multiply(&Matrix::zero(4, 6)).unwrap();
        assert!(z.is_zero_view());
        assert_eq!(z.shape(), (3, 6));
        let z = Matrix::zero(5, 3).multiply(&a).unwrap();
        assert_eq!(z.shape(), (5, 4));
        assert!(a.add(&Matrix::zero(3, 4)).unwrap().ptr_eq(&a));
        assert!(Matrix::zero(3, 4).add(&a).unwrap().ptr_eq(&a));
    }

    #[test]
    fn test_identity_absorption() {
        let a = ramp(3, 4);
        assert!(a.multiply(&Matrix::identity(4)).unwrap().ptr_eq(&a));
        assert!(Matrix::identity(3).multiply(&a).unwrap().ptr_eq(&a));
        assert!(a.multiply(&Matrix::identity(3)).is_err());
    }

    #[test]
    fn test_single_scales() {
        let a = ramp(2, 3);
        let s = a.multiply(&Matrix::single(2.0)).unwrap();
        let t = Matrix::single(2.0).multiply(&a).unwrap();
        for (i, x) in a.to_row_major_vec().into_iter().enumerate() {
            assert_eq!(s.to_row_major_vec()[i], 2.0 * x);
            assert_eq!(t.to_row_major_vec()[i], 2.0 * x);
        }
        assert_eq!(Matrix::single(3.0).multiply(&Matrix::single(4.0)).unwrap().single_value(), Some(12.0));
    }

    #[test]
    fn test_scale_shortcuts() {
        let a = ramp(2, 2);
        assert!(a.scale(1.0).unwrap().ptr_eq(&a));
        assert!(a.scale(0.0).unwrap().is_zero_view());
        let z = Matrix::<f64>::zero(2, 2);
        assert!(z.scale(7.0).unwrap().ptr_eq(&z));
    }

    #[test]
    fn test_transposed_operands_multiply_bases() {
        let a = ramp(3, 2);
        let b = ramp(4, 3);
        // a^T * b^T = (b * a)^T
        let c = a.transpose().multiply(&b.transpose()).unwrap();
        assert_eq!(c.shape(), (2, 4));
        assert!(c.as_transjugated().is_some());
        let expected = naive(&a.transpose().to_dense(), &b.transpose().to_dense());
        for (x, y) in c.to_row_major_vec().iter().zip(expected) {
            assert_relative_eq!(*x, y, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_adjoint_product_complex() {
        let a = Matrix::from_fn(2, 2, |i, j| Complex64::new(i as f64, j as f64 + 1.0));
        let b = Matrix::from_fn(2, 2, |i, j| Complex64::new(1.0 + j as f64, -(i as f64)));
        let lazy = a.adjoint().multiply(&b.adjoint()).unwrap();
        let eager = a.adjoint().to_dense().multiply(&b.adjoint().to_dense()).unwrap();
        for i in 0..2 {
            for j in 0..2 {
                let (x, y) = (lazy.get(i, j), eager.get(i, j));
                assert_relative_eq!(x.re, y.re, epsilon = 1e-12);
                assert_relative_eq!(x.im, y.im, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_band_aware_kernel_matches_full() {
        let l = ramp(4, 4).lower_triangular(false);
        let u = ramp(4, 4).upper_hessenberg();
        let c = l.multiply(&u).unwrap();
        for (x, y) in c.to_row_major_vec().iter().zip(naive(&l, &u)) {
            assert_relative_eq!(*x, y, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_add_and_subtract() {
        let a = ramp(2, 2);
        let b = Matrix::from_fn(2, 2, |_, _| 1.0);
        let s = a.add(&b).unwrap();
        assert_eq!(s.get(1, 1), a.get(1, 1) + 1.0);
        let d = s.subtract(&b).unwrap();
        assert_eq!(d.to_row_major_vec(), a.to_row_major_vec());
        assert!(a.add(&ramp(2, 3)).is_err());
    }

    #[test]
    fn test_premultiply() {
        let a = ramp(2, 3);
        let b = ramp(3, 2);
        let c = b.premultiply(&a).unwrap();
        for (x, y) in c.to_row_major_vec().iter().zip(naive(&a, &b)) {
            assert_relative_eq!(*x, y, epsilon = 1e-12);
        }
    }
}
