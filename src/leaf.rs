//! Leaf views: a wrapped physical store and the algebraic constants.

use std::sync::Arc;

use matrix_store::{DenseStore, RegionMut, StoreFactory};
use matrix_traits::Scalar;

use crate::supplier::ElementsSupplier;
use crate::view::{Matrix, MatrixView, Node};
use crate::Result;

// ============================================================================
// Dense
// ============================================================================

/// Read-only wrapper over a shared [`DenseStore`].
pub(crate) struct DenseView<T> {
    store: Arc<DenseStore<T>>,
}

impl<T: Scalar> DenseView<T> {
    pub(crate) fn store(&self) -> &Arc<DenseStore<T>> {
        &self.store
    }
}

impl<T: Scalar> ElementsSupplier<T> for DenseView<T> {
    fn rows(&self) -> usize {
        self.store.rows()
    }

    fn cols(&self) -> usize {
        self.store.cols()
    }

    fn factory(&self) -> StoreFactory {
        StoreFactory::new(self.store.layout())
    }

    fn supply_to(&self, target: &mut dyn RegionMut<T>) {
        for j in 0..self.store.cols() {
            for i in 0..self.store.rows() {
                target.set(i, j, self.store.get(i, j));
            }
        }
    }
}

impl<T: Scalar> MatrixView<T> for DenseView<T> {
    #[inline]
    fn get(&self, row: usize, col: usize) -> T {
        self.store.get(row, col)
    }
}

// A store can be fed to any pipeline directly, without wrapping it in a
// `Matrix` first.
impl<T: Scalar> ElementsSupplier<T> for DenseStore<T> {
    fn rows(&self) -> usize {
        DenseStore::rows(self)
    }

    fn cols(&self) -> usize {
        DenseStore::cols(self)
    }

    fn factory(&self) -> StoreFactory {
        StoreFactory::new(self.layout())
    }

    fn supply_to(&self, target: &mut dyn RegionMut<T>) {
        for j in 0..DenseStore::cols(self) {
            for i in 0..DenseStore::rows(self) {
                target.set(i, j, DenseStore::get(self, i, j));
            }
        }
    }
}

impl<T: Scalar> MatrixView<T> for DenseStore<T> {
    fn get(&self, row: usize, col: usize) -> T {
        DenseStore::get(self, row, col)
    }
}

// ============================================================================
// Zero
// ============================================================================

/// Every element is the additive identity; every band is empty.
pub(crate) struct ZeroView<T> {
    rows: usize,
    cols: usize,
    factory: StoreFactory,
    _elem: std::marker::PhantomData<T>,
}

impl<T: Scalar> ElementsSupplier<T> for ZeroView<T> {
    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.cols
    }

    fn factory(&self) -> StoreFactory {
        self.factory
    }

    fn supply_to(&self, target: &mut dyn RegionMut<T>) {
        target.reset();
    }
}

impl<T: Scalar> MatrixView<T> for ZeroView<T> {
    fn get(&self, _row: usize, _col: usize) -> T {
        T::zero()
    }

    fn first_in_row(&self, _row: usize) -> usize {
        self.cols
    }

    fn limit_of_row(&self, _row: usize) -> usize {
        0
    }

    fn first_in_column(&self, _col: usize) -> usize {
        self.rows
    }

    fn limit_of_column(&self, _col: usize) -> usize {
        0
    }
}

// ============================================================================
// Identity
// ============================================================================

/// Square identity constant.
pub(crate) struct IdentityView<T> {
    dim: usize,
    factory: StoreFactory,
    _elem: std::marker::PhantomData<T>,
}

impl<T: Scalar> ElementsSupplier<T> for IdentityView<T> {
    fn rows(&self) -> usize {
        self.dim
    }

    fn cols(&self) -> usize {
        self.dim
    }

    fn factory(&self) -> StoreFactory {
        self.factory
    }

    fn supply_to(&self, target: &mut dyn RegionMut<T>) {
        target.reset();
        target.fill_diagonal(0, 0, T::one());
    }
}

impl<T: Scalar> MatrixView<T> for IdentityView<T> {
    fn get(&self, row: usize, col: usize) -> T {
        if row == col {
            T::one()
        } else {
            T::zero()
        }
    }

    fn first_in_row(&self, row: usize) -> usize {
        row
    }

    fn limit_of_row(&self, row: usize) -> usize {
        row + 1
    }

    fn first_in_column(&self, col: usize) -> usize {
        col
    }

    fn limit_of_column(&self, col: usize) -> usize {
        col + 1
    }
}

// ============================================================================
// Single
// ============================================================================

/// 1x1 broadcast of one scalar.
pub(crate) struct SingleView<T> {
    value: T,
    factory: StoreFactory,
}

impl<T: Scalar> SingleView<T> {
    #[inline]
    pub(crate) fn value(&self) -> T {
        self.value
    }
}

impl<T: Scalar> ElementsSupplier<T> for SingleView<T> {
    fn rows(&self) -> usize {
        1
    }

    fn cols(&self) -> usize {
        1
    }

    fn factory(&self) -> StoreFactory {
        self.factory
    }

    fn supply_to(&self, target: &mut dyn RegionMut<T>) {
        target.set(0, 0, self.value);
    }
}

impl<T: Scalar> MatrixView<T> for SingleView<T> {
    fn get(&self, _row: usize, _col: usize) -> T {
        self.value
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl<T: Scalar> Matrix<T> {
    /// View over a shared store. The store is never copied or written.
    pub fn from_store(store: impl Into<Arc<DenseStore<T>>>) -> Self {
        Self::from_node(Node::Dense(DenseView {
            store: store.into(),
        }))
    }

    /// Row-major matrix from nested rows.
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Result<Self> {
        Ok(Self::from_store(DenseStore::from_rows(rows)?))
    }

    /// Row-major matrix with values `f(row, col)`.
    pub fn from_fn(rows: usize, cols: usize, f: impl FnMut(usize, usize) -> T) -> Self {
        Self::from_store(StoreFactory::default().make_filled(rows, cols, f))
    }

    /// The `rows x cols` zero constant.
    pub fn zero(rows: usize, cols: usize) -> Self {
        Self::zero_with(rows, cols, StoreFactory::default())
    }

    pub(crate) fn zero_with(rows: usize, cols: usize, factory: StoreFactory) -> Self {
        Self::from_node(Node::Zero(ZeroView {
            rows,
            cols,
            factory,
            _elem: std::marker::PhantomData,
        }))
    }

    /// The `dim x dim` identity constant.
    pub fn identity(dim: usize) -> Self {
        Self::identity_with(dim, StoreFactory::default())
    }

    pub(crate) fn identity_with(dim: usize, factory: StoreFactory) -> Self {
        Self::from_node(Node::Identity(IdentityView {
            dim,
            factory,
            _elem: std::marker::PhantomData,
        }))
    }

    /// 1x1 broadcast of `value`.
    pub fn single(value: T) -> Self {
        Self::single_with(value, StoreFactory::default())
    }

    pub(crate) fn single_with(value: T, factory: StoreFactory) -> Self {
        Self::from_node(Node::Single(SingleView { value, factory }))
    }

    /// Shared store behind a dense leaf.
    pub fn as_store(&self) -> Option<&Arc<DenseStore<T>>> {
        match self.node() {
            Node::Dense(d) => Some(d.store()),
            _ => None,
        }
    }

    /// Materialize into a new dense leaf.
    ///
    /// Dense leaves are returned as-is since they are already concrete.
    pub fn to_dense(&self) -> Self {
        if self.as_store().is_some() {
            return self.clone();
        }
        Self::from_store(self.collect())
    }
}

impl<T: Scalar> From<DenseStore<T>> for Matrix<T> {
    fn from(store: DenseStore<T>) -> Self {
        Self::from_store(store)
    }
}
