//! Structural masks: triangular, diagonal and Hessenberg.
//!
//! A shaded view reads through to its base inside the pattern and returns
//! the additive identity outside it. Unit-diagonal triangles return the
//! multiplicative identity on the diagonal. Both identities come from the
//! scalar type, never from float literals.

use matrix_store::{RegionMut, StoreFactory};
use matrix_traits::Scalar;

use crate::supplier::ElementsSupplier;
use crate::view::{supply_by_columns, Matrix, MatrixView, Node};

/// Structural pattern kept by a shaded view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shading {
    /// `col <= row`.
    Lower { unit_diagonal: bool },
    /// `col >= row`.
    Upper { unit_diagonal: bool },
    /// `col == row`.
    Diagonal,
    /// `row <= col + 1`.
    UpperHessenberg,
    /// `col <= row + 1`.
    LowerHessenberg,
}

impl Shading {
    #[inline]
    pub fn contains(self, row: usize, col: usize) -> bool {
        match self {
            Shading::Lower { .. } => col <= row,
            Shading::Upper { .. } => col >= row,
            Shading::Diagonal => col == row,
            Shading::UpperHessenberg => row <= col + 1,
            Shading::LowerHessenberg => col <= row + 1,
        }
    }

    #[inline]
    pub fn unit_diagonal(self) -> bool {
        matches!(
            self,
            Shading::Lower { unit_diagonal: true } | Shading::Upper { unit_diagonal: true }
        )
    }

    /// Columns of `row` inside the pattern, clipped to `cols`.
    fn row_interval(self, row: usize, cols: usize) -> (usize, usize) {
        match self {
            Shading::Lower { .. } => (0, (row + 1).min(cols)),
            Shading::Upper { .. } => (row.min(cols), cols),
            Shading::Diagonal => (row.min(cols), (row + 1).min(cols)),
            Shading::UpperHessenberg => (row.saturating_sub(1).min(cols), cols),
            Shading::LowerHessenberg => (0, (row + 2).min(cols)),
        }
    }

    /// Rows of `col` inside the pattern, clipped to `rows`.
    fn column_interval(self, col: usize, rows: usize) -> (usize, usize) {
        match self {
            Shading::Lower { .. } => (col.min(rows), rows),
            Shading::Upper { .. } => (0, (col + 1).min(rows)),
            Shading::Diagonal => (col.min(rows), (col + 1).min(rows)),
            Shading::UpperHessenberg => (0, (col + 2).min(rows)),
            Shading::LowerHessenberg => (col.saturating_sub(1).min(rows), rows),
        }
    }
}

pub(crate) struct ShadedView<T: Scalar> {
    base: Matrix<T>,
    shading: Shading,
    rows: usize,
    cols: usize,
}

impl<T: Scalar> ShadedView<T> {
    /// Intersect a base band with the pattern, then add the unit diagonal.
    fn band(&self, base: (usize, usize), pattern: (usize, usize), diag: usize, extent: usize) -> (usize, usize) {
        let first = base.0.max(pattern.0);
        let limit = base.1.min(pattern.1);
        if !self.shading.unit_diagonal() || diag >= extent {
            return (first, limit);
        }
        if first >= limit {
            (diag, diag + 1)
        } else {
            (first.min(diag), limit.max(diag + 1))
        }
    }

    fn row_band(&self, row: usize) -> (usize, usize) {
        let base = (
            self.base.first_in_row(row),
            self.base.limit_of_row(row).min(self.cols),
        );
        self.band(base, self.shading.row_interval(row, self.cols), row, self.cols)
    }

    fn column_band(&self, col: usize) -> (usize, usize) {
        let base = (
            self.base.first_in_column(col),
            self.base.limit_of_column(col).min(self.rows),
        );
        self.band(base, self.shading.column_interval(col, self.rows), col, self.rows)
    }
}

impl<T: Scalar> ElementsSupplier<T> for ShadedView<T> {
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

impl<T: Scalar> MatrixView<T> for ShadedView<T> {
    fn get(&self, row: usize, col: usize) -> T {
        if row == col && self.shading.unit_diagonal() {
            T::one()
        } else if self.shading.contains(row, col) {
            self.base.get(row, col)
        } else {
            T::zero()
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

impl<T: Scalar> Matrix<T> {
    /// Mask this view with `shading`, keeping its shape.
    pub fn shade(&self, shading: Shading) -> Matrix<T> {
        let (rows, cols) = self.shape();
        self.shade_with_shape(shading, rows, cols)
    }

    fn shade_with_shape(&self, shading: Shading, rows: usize, cols: usize) -> Matrix<T> {
        match self.node() {
            Node::Identity(_) if (rows, cols) == self.shape() => {
                log::trace!("shade: {shading:?} leaves identity unchanged");
                return self.clone();
            }
            Node::Zero(_) if (rows, cols) == self.shape() && !shading.unit_diagonal() => {
                log::trace!("shade: {shading:?} leaves zero unchanged");
                return self.clone();
            }
            Node::Shaded(s) if s.shading == shading && (rows, cols) == self.shape() => {
                return self.clone();
            }
            Node::Shaded(s) if is_opposite_triangle(s.shading, shading) => {
                return s.base.shade_with_shape(Shading::Diagonal, rows, cols);
            }
            _ => {}
        }
        Matrix::from_node(Node::Shaded(ShadedView {
            base: self.clone(),
            shading,
            rows,
            cols,
        }))
    }

    /// Lower triangle, `col <= row`.
    pub fn lower_triangular(&self, unit_diagonal: bool) -> Matrix<T> {
        self.shade(Shading::Lower { unit_diagonal })
    }

    /// Upper triangle, `col >= row`.
    pub fn upper_triangular(&self, unit_diagonal: bool) -> Matrix<T> {
        self.shade(Shading::Upper { unit_diagonal })
    }

    /// Main diagonal. Without `maintain_shape` the result is the
    /// `min(rows, cols)` square holding just the diagonal.
    pub fn diagonal(&self, maintain_shape: bool) -> Matrix<T> {
        if maintain_shape {
            self.shade(Shading::Diagonal)
        } else {
            let n = self.rows().min(self.cols());
            self.shade_with_shape(Shading::Diagonal, n, n)
        }
    }

    /// Zero below the first subdiagonal.
    pub fn upper_hessenberg(&self) -> Matrix<T> {
        self.shade(Shading::UpperHessenberg)
    }

    /// Zero above the first superdiagonal.
    pub fn lower_hessenberg(&self) -> Matrix<T> {
        self.shade(Shading::LowerHessenberg)
    }
}

fn is_opposite_triangle(a: Shading, b: Shading) -> bool {
    matches!(
        (a, b),
        (
            Shading::Lower { unit_diagonal: false },
            Shading::Upper { unit_diagonal: false }
        ) | (
            Shading::Upper { unit_diagonal: false },
            Shading::Lower { unit_diagonal: false }
        )
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    fn sample(rows: usize, cols: usize) -> Matrix<f64> {
        Matrix::from_fn(rows, cols, |i, j| (i * cols + j + 1) as f64)
    }

    fn assert_bands_sound(m: &Matrix<f64>) {
        let (rows, cols) = m.shape();
        for i in 0..rows {
            let (first, limit) = (m.first_in_row(i), m.limit_of_row(i));
            for j in 0..cols {
                if m.get(i, j) != 0.0 {
                    assert!(first <= j && j < limit, "row {i}: ({first}, {limit}) misses col {j}");
                }
            }
        }
        for j in 0..cols {
            let (first, limit) = (m.first_in_column(j), m.limit_of_column(j));
            for i in 0..rows {
                if m.get(i, j) != 0.0 {
                    assert!(first <= i && i < limit, "col {j}: ({first}, {limit}) misses row {i}");
                }
            }
        }
    }

    #[test]
    fn test_triangles() {
        let a = sample(3, 4);
        let lower = a.lower_triangular(false);
        let upper = a.upper_triangular(false);
        for i in 0..3 {
            for j in 0..4 {
                assert_eq!(lower.get(i, j), if j <= i { a.get(i, j) } else { 0.0 });
                assert_eq!(upper.get(i, j), if j >= i { a.get(i, j) } else { 0.0 });
            }
        }
        assert_bands_sound(&lower);
        assert_bands_sound(&upper);
        assert_eq!(lower.collect().to_row_major_vec(), lower.to_row_major_vec());
        assert_eq!(upper.collect().to_row_major_vec(), upper.to_row_major_vec());
    }

    #[test]
    fn test_unit_diagonal_uses_scalar_one() {
        let a = Matrix::from_fn(3, 3, |i, j| Complex64::new((i + j) as f64, 1.0));
        let u = a.upper_triangular(true);
        assert_eq!(u.get(1, 1), Complex64::new(1.0, 0.0));
        assert_eq!(u.get(0, 2), a.get(0, 2));
        assert_eq!(u.get(2, 0), Complex64::new(0.0, 0.0));
        assert_eq!(u.collect().get(2, 2), Complex64::new(1.0, 0.0));
    }

    #[test]
    fn test_unit_diagonal_over_zero_band() {
        let l = Matrix::<f64>::zero(3, 3).lower_triangular(true);
        assert!(!l.is_zero_view());
        assert_eq!(l.to_row_major_vec(), vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
        assert_bands_sound(&l);
        assert_eq!(l.collect().to_row_major_vec(), l.to_row_major_vec());
    }

    #[test]
    fn test_idempotent() {
        let a = sample(4, 4);
        let once = a.lower_triangular(false);
        let twice = once.lower_triangular(false);
        assert!(twice.ptr_eq(&once));
        let h = a.upper_hessenberg();
        assert_eq!(h.upper_hessenberg().to_row_major_vec(), h.to_row_major_vec());
    }

    #[test]
    fn test_opposite_triangles_make_diagonal() {
        let a = sample(3, 3);
        let d = a.lower_triangular(false).upper_triangular(false);
        assert_eq!(d.to_row_major_vec(), a.diagonal(true).to_row_major_vec());
    }

    #[test]
    fn test_diagonal_collapse() {
        let a = sample(2, 4);
        let kept = a.diagonal(true);
        let collapsed = a.diagonal(false);
        assert_eq!(kept.shape(), (2, 4));
        assert_eq!(collapsed.shape(), (2, 2));
        assert_eq!(collapsed.to_row_major_vec(), vec![1.0, 0.0, 0.0, 6.0]);
        assert_bands_sound(&kept);
        assert_bands_sound(&collapsed);
        assert_eq!(collapsed.collect().to_row_major_vec(), collapsed.to_row_major_vec());
    }

    #[test]
    fn test_hessenberg() {
        let a = sample(4, 4);
        let uh = a.upper_hessenberg();
        let lh = a.lower_hessenberg();
        for i in 0..4 {
            for j in 0..4 {
                assert_eq!(uh.get(i, j) == 0.0, i > j + 1);
                assert_eq!(lh.get(i, j) == 0.0, i + 1 < j);
            }
        }
        assert_bands_sound(&uh);
        assert_bands_sound(&lh);
        assert_eq!(uh.first_in_row(3), 2);
        assert_eq!(lh.limit_of_row(0), 2);
    }

    #[test]
    fn test_bands_through_transpose() {
        let l = sample(3, 5).lower_triangular(false).transpose();
        assert_eq!(l.shape(), (5, 3));
        assert_bands_sound(&l);
        assert_eq!(l.first_in_row(2), 2);
        assert_eq!(l.limit_of_row(2), 3);
        assert_eq!(l.first_in_row(4), 3);
    }

    #[test]
    fn test_constants_pass_through() {
        let id = Matrix::<f64>::identity(3);
        assert!(id.lower_triangular(true).ptr_eq(&id));
        let z = Matrix::<f64>::zero(2, 3);
        assert!(z.upper_hessenberg().ptr_eq(&z));
    }
}
