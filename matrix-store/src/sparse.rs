//! Sparse vector storage.

use matrix_traits::Scalar;

/// Sparse vector of fixed logical length.
///
/// Non-zeros are kept as index/value pairs sorted by index. Setting an
/// entry to the additive identity removes it.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseVector<T> {
    length: usize,
    indices: Vec<usize>,
    values: Vec<T>,
}

impl<T: Scalar> SparseVector<T> {
    pub fn new(length: usize) -> Self {
        Self {
            length,
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn with_capacity(length: usize, capacity: usize) -> Self {
        Self {
            length,
            indices: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    /// Logical length (number of addressable positions).
    #[inline]
    pub fn len(&self) -> usize {
        self.length
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Number of stored non-zeros.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    fn check(&self, index: usize) {
        assert!(
            index < self.length,
            "index {index} out of bounds for sparse vector of length {}",
            self.length
        );
    }

    pub fn get(&self, index: usize) -> T {
        self.check(index);
        match self.indices.binary_search(&index) {
            Ok(pos) => self.values[pos],
            Err(_) => T::zero(),
        }
    }

    pub fn set(&mut self, index: usize, value: T) {
        self.check(index);
        match self.indices.binary_search(&index) {
            Ok(pos) => {
                if value.is_zero() {
                    self.indices.remove(pos);
                    self.values.remove(pos);
                } else {
                    self.values[pos] = value;
                }
            }
            Err(pos) => {
                if !value.is_zero() {
                    self.indices.insert(pos, index);
                    self.values.insert(pos, value);
                }
            }
        }
    }

    pub fn add(&mut self, index: usize, addend: T) {
        let current = self.get(index);
        self.set(index, current + addend);
    }

    /// Remove the entry at `index`, returning its value if it was stored.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        self.check(index);
        let pos = self.indices.binary_search(&index).ok()?;
        self.indices.remove(pos);
        Some(self.values.remove(pos))
    }

    pub fn clear(&mut self) {
        self.indices.clear();
        self.values.clear();
    }

    /// Stored entries in increasing index order.
    pub fn nonzeros(&self) -> impl Iterator<Item = (usize, T)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Index of the first stored entry, or `len()` if there is none.
    pub fn first_index(&self) -> usize {
        self.indices.first().copied().unwrap_or(self.length)
    }

    /// One past the index of the last stored entry, or `0` if there is none.
    pub fn limit_index(&self) -> usize {
        self.indices.last().map_or(0, |&i| i + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    #[test]
    fn test_set_get_keeps_order() {
        let mut v = SparseVector::<f64>::new(10);
        v.set(7, 1.0);
        v.set(2, 3.0);
        v.set(5, -1.0);
        assert_eq!(v.nnz(), 3);
        assert_eq!(v.get(2), 3.0);
        assert_eq!(v.get(3), 0.0);
        let entries: Vec<_> = v.nonzeros().collect();
        assert_eq!(entries, vec![(2, 3.0), (5, -1.0), (7, 1.0)]);
        assert_eq!(v.first_index(), 2);
        assert_eq!(v.limit_index(), 8);
    }

    #[test]
    fn test_set_zero_removes() {
        let mut v = SparseVector::<f64>::new(4);
        v.set(1, 2.0);
        v.add(1, -2.0);
        assert_eq!(v.nnz(), 0);
        assert_eq!(v.first_index(), 4);
        assert_eq!(v.limit_index(), 0);
    }

    #[test]
    fn test_remove() {
        let mut v = SparseVector::<Complex64>::with_capacity(3, 2);
        v.set(0, Complex64::new(0.0, 1.0));
        assert_eq!(v.remove(0), Some(Complex64::new(0.0, 1.0)));
        assert_eq!(v.remove(0), None);
        assert_eq!(v.len(), 3);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_out_of_bounds() {
        let mut v = SparseVector::<f64>::new(2);
        v.set(2, 1.0);
    }
}
