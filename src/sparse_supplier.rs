//! Sparse row and column collections.
//!
//! A collection is built incrementally: start empty against a fixed
//! orthogonal dimension, append vectors, and fill each vector through its
//! own [`SparseVector`] interface. Materialization forwards only the stored
//! non-zeros, so the target is expected to be zero-filled already, as it is
//! in [`ElementsSupplier::collect`].
//!
//! Both collections are also [`MatrixView`]s. Along their stored axis the
//! band of each vector is the span of its stored entries; across it every
//! band is full.

use matrix_store::{RegionMut, SparseVector};
use matrix_traits::Scalar;

use crate::supplier::ElementsSupplier;
use crate::view::{check_index, MatrixView};
use crate::{MatrixError, Result};

macro_rules! sparse_collection {
    (
        $(#[$doc:meta])*
        $name:ident, $other:ident,
        dim: $dim:ident,
        add_one: $add_one:ident, add_many: $add_many:ident,
        get: $get:ident, get_mut: $get_mut:ident,
        remove: $remove:ident, select: $select:ident,
        convert: $convert:ident,
        place: |$major:ident, $minor:ident| ($r:expr, $c:expr)
    ) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name<T> {
            $dim: usize,
            vectors: Vec<SparseVector<T>>,
        }

        impl<T: Scalar> $name<T> {
            /// Empty collection whose vectors all have length `len`.
            pub fn new(len: usize) -> Self {
                Self {
                    $dim: len,
                    vectors: Vec::new(),
                }
            }

            /// Number of vectors.
            #[inline]
            pub fn count(&self) -> usize {
                self.vectors.len()
            }

            /// Append an empty vector and return it for filling.
            pub fn $add_one(&mut self) -> &mut SparseVector<T> {
                let len = self.vectors.len();
                self.vectors.push(SparseVector::new(self.$dim));
                &mut self.vectors[len]
            }

            /// Append `n` empty vectors.
            pub fn $add_many(&mut self, n: usize) {
                let dim = self.$dim;
                self.vectors
                    .extend(std::iter::repeat_with(|| SparseVector::new(dim)).take(n));
            }

            pub fn $get(&self, index: usize) -> Result<&SparseVector<T>> {
                let count = self.count();
                self.vectors
                    .get(index)
                    .ok_or(MatrixError::IndexOutOfRange { index, count })
            }

            pub fn $get_mut(&mut self, index: usize) -> Result<&mut SparseVector<T>> {
                let count = self.count();
                self.vectors
                    .get_mut(index)
                    .ok_or(MatrixError::IndexOutOfRange { index, count })
            }

            /// Remove and return a vector; later vectors shift down by one.
            pub fn $remove(&mut self, index: usize) -> Result<SparseVector<T>> {
                let count = self.count();
                if index >= count {
                    return Err(MatrixError::IndexOutOfRange { index, count });
                }
                Ok(self.vectors.remove(index))
            }

            /// New collection holding copies of the vectors at `indices`,
            /// in that order.
            pub fn $select(&self, indices: &[usize]) -> Result<Self> {
                let vectors = indices
                    .iter()
                    .map(|&i| self.$get(i).cloned())
                    .collect::<Result<Vec<_>>>()?;
                Ok(Self {
                    $dim: self.$dim,
                    vectors,
                })
            }

            /// Visit every stored non-zero as `(row, col, value)`.
            pub fn for_each_nonzero(&self, mut f: impl FnMut(usize, usize, T)) {
                for ($major, vector) in self.vectors.iter().enumerate() {
                    for ($minor, value) in vector.nonzeros() {
                        f($r, $c, value);
                    }
                }
            }

            /// The same matrix as a collection along the other axis.
            pub fn $convert(&self) -> $other<T> {
                let mut out = $other::<T>::new(self.count());
                out.vectors = (0..self.$dim).map(|_| SparseVector::new(self.count())).collect();
                for ($major, vector) in self.vectors.iter().enumerate() {
                    for ($minor, value) in vector.nonzeros() {
                        out.vectors[$minor].set($major, value);
                    }
                }
                out
            }
        }
    };
}

sparse_collection! {
    /// Matrix stored as one sparse vector per row.
    RowsSupplier, ColumnsSupplier,
    dim: cols,
    add_one: add_row, add_many: add_rows,
    get: row, get_mut: row_mut,
    remove: remove_row, select: select_rows,
    convert: to_columns,
    place: |row, col| (row, col)
}

sparse_collection! {
    /// Matrix stored as one sparse vector per column.
    ColumnsSupplier, RowsSupplier,
    dim: rows,
    add_one: add_column, add_many: add_columns,
    get: column, get_mut: column_mut,
    remove: remove_column, select: select_columns,
    convert: to_rows,
    place: |col, row| (row, col)
}

impl<T: Scalar> ElementsSupplier<T> for RowsSupplier<T> {
    fn rows(&self) -> usize {
        self.vectors.len()
    }

    fn cols(&self) -> usize {
        self.cols
    }

    fn supply_to(&self, target: &mut dyn RegionMut<T>) {
        self.for_each_nonzero(|row, col, value| target.set(row, col, value));
    }
}

impl<T: Scalar> ElementsSupplier<T> for ColumnsSupplier<T> {
    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.vectors.len()
    }

    fn supply_to(&self, target: &mut dyn RegionMut<T>) {
        self.for_each_nonzero(|row, col, value| target.set(row, col, value));
    }
}

impl<T: Scalar> MatrixView<T> for RowsSupplier<T> {
    fn get(&self, row: usize, col: usize) -> T {
        check_index(self.vectors.len(), self.cols, row, col);
        self.vectors[row].get(col)
    }

    fn first_in_row(&self, row: usize) -> usize {
        self.vectors[row].first_index()
    }

    fn limit_of_row(&self, row: usize) -> usize {
        self.vectors[row].limit_index()
    }
}

impl<T: Scalar> MatrixView<T> for ColumnsSupplier<T> {
    fn get(&self, row: usize, col: usize) -> T {
        check_index(self.rows, self.vectors.len(), row, col);
        self.vectors[col].get(row)
    }

    fn first_in_column(&self, col: usize) -> usize {
        self.vectors[col].first_index()
    }

    fn limit_of_column(&self, col: usize) -> usize {
        self.vectors[col].limit_index()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::Matrix;

    /// Records every write instead of storing it.
    struct Recorder {
        rows: usize,
        cols: usize,
        writes: Vec<(usize, usize, f64)>,
    }

    impl RegionMut<f64> for Recorder {
        fn rows(&self) -> usize {
            self.rows
        }

        fn cols(&self) -> usize {
            self.cols
        }

        fn get(&self, _row: usize, _col: usize) -> f64 {
            0.0
        }

        fn set(&mut self, row: usize, col: usize, value: f64) {
            self.writes.push((row, col, value));
        }
    }

    #[test]
    fn test_append_remove_reappend() {
        let mut s = RowsSupplier::<f64>::new(4);
        s.add_rows(3);
        s.row_mut(0).unwrap().set(1, 1.0);
        s.row_mut(1).unwrap().set(2, 2.0);
        s.row_mut(2).unwrap().set(3, 3.0);
        let removed = s.remove_row(1).unwrap();
        assert_eq!(removed.get(2), 2.0);
        assert_eq!(s.count(), 2);
        assert_eq!(s.row(1).unwrap().get(3), 3.0);
        s.add_row().set(0, 4.0);
        assert_eq!(s.count(), 3);
        assert_eq!(s.row(2).unwrap().get(0), 4.0);
        assert!(matches!(s.row(3), Err(MatrixError::IndexOutOfRange { index: 3, count: 3 })));
        assert!(s.remove_row(5).is_err());
    }

    #[test]
    fn test_supply_touches_only_nonzeros() {
        let mut s = RowsSupplier::<f64>::new(100);
        s.add_rows(50);
        s.row_mut(7).unwrap().set(42, 1.5);
        s.row_mut(49).unwrap().set(0, -2.0);
        let mut rec = Recorder {
            rows: 50,
            cols: 100,
            writes: Vec::new(),
        };
        s.supply_to(&mut rec);
        assert_eq!(rec.writes, vec![(7, 42, 1.5), (49, 0, -2.0)]);
    }

    #[test]
    fn test_collect_and_select() {
        let mut s = RowsSupplier::<f64>::new(3);
        s.add_row().set(0, 1.0);
        s.add_row().set(2, 5.0);
        let dense = s.collect();
        assert_eq!(dense.to_row_major_vec(), vec![1.0, 0.0, 0.0, 0.0, 0.0, 5.0]);
        let picked = s.select_rows(&[1, 1, 0]).unwrap();
        assert_eq!(picked.count(), 3);
        assert_eq!(picked.collect().get(1, 2), 5.0);
        assert!(s.select_rows(&[2]).is_err());
    }

    #[test]
    fn test_columns_and_conversion() {
        let mut c = ColumnsSupplier::<f64>::new(2);
        c.add_columns(3);
        c.column_mut(2).unwrap().set(1, 9.0);
        c.column_mut(0).unwrap().set(0, 1.0);
        assert_eq!((ElementsSupplier::rows(&c), ElementsSupplier::cols(&c)), (2, 3));
        let dense = c.collect();
        assert_eq!(dense.to_row_major_vec(), vec![1.0, 0.0, 0.0, 0.0, 0.0, 9.0]);
        let r = c.to_rows();
        assert_eq!(r.count(), 2);
        assert_eq!(r.collect().to_row_major_vec(), dense.to_row_major_vec());
        assert_eq!(r.to_columns(), c);
    }

    #[test]
    fn test_pipeline_over_sparse() {
        let mut s = RowsSupplier::<f64>::new(2);
        s.add_row().set(1, 3.0);
        let t = s.transposed().collect();
        assert_eq!((t.rows(), t.cols()), (2, 1));
        assert_eq!(t.get(1, 0), 3.0);
        let m = Matrix::from_store(t);
        assert_eq!(m.get(1, 0), 3.0);
    }

    #[test]
    fn test_bands_follow_stored_entries() {
        let mut s = RowsSupplier::<f64>::new(6);
        s.add_rows(3);
        s.row_mut(0).unwrap().set(2, 1.0);
        s.row_mut(0).unwrap().set(4, 2.0);
        s.row_mut(2).unwrap().set(5, 3.0);
        assert_eq!((s.first_in_row(0), s.limit_of_row(0)), (2, 5));
        assert!(s.first_in_row(1) >= s.limit_of_row(1));
        assert_eq!((s.first_in_row(2), s.limit_of_row(2)), (5, 6));
        assert_eq!((s.first_in_column(3), s.limit_of_column(3)), (0, 3));
        assert_eq!(MatrixView::get(&s, 0, 4), 2.0);
        assert_eq!(MatrixView::get(&s, 1, 4), 0.0);

        let c = s.to_columns();
        assert_eq!((c.first_in_column(5), c.limit_of_column(5)), (2, 3));
        assert!(c.first_in_column(0) >= c.limit_of_column(0));
        assert_eq!((c.first_in_column(4), c.limit_of_column(4)), (0, 1));
        for i in 0..3 {
            for j in 0..6 {
                assert_eq!(MatrixView::get(&c, i, j), MatrixView::get(&s, i, j));
            }
        }
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_sparse_get_out_of_bounds() {
        let mut s = RowsSupplier::<f64>::new(2);
        s.add_row();
        let _ = MatrixView::get(&s, 0, 2);
    }
}
