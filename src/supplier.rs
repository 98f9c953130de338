//! Deferred element pipelines.
//!
//! An [`ElementsSupplier`] knows the shape it will produce and how to write
//! itself into a [`RegionMut`]. Combinators wrap a supplier in another
//! supplier without evaluating anything; [`ElementsSupplier::collect`]
//! allocates a zero-filled store of the reported shape and runs the whole
//! chain into it once.
//!
//! Every [`Matrix`] is a supplier, and so are the sparse row/column
//! collections.

use std::sync::Arc;

use matrix_store::{DenseStore, RegionMut, RegionMutExt, StoreFactory};
use matrix_traits::Scalar;

use crate::view::{Matrix, MatrixView};
use crate::{MatrixError, Result};

pub(crate) type UnaryFn<T> = Arc<dyn Fn(T) -> T + Send + Sync>;
pub(crate) type BinaryFn<T> = Arc<dyn Fn(T, T) -> T + Send + Sync>;

/// Source of elements for a materialization.
pub trait ElementsSupplier<T: Scalar> {
    fn rows(&self) -> usize;

    fn cols(&self) -> usize;

    /// Write this supplier's elements into `target`.
    ///
    /// `target` must have exactly the supplier's shape. Sparse sources only
    /// write their non-zeros and expect `target` to be zero-filled.
    fn supply_to(&self, target: &mut dyn RegionMut<T>);

    /// Factory used by [`collect`](Self::collect).
    fn factory(&self) -> StoreFactory {
        StoreFactory::default()
    }

    /// Materialize into a new zero-filled store.
    fn collect(&self) -> DenseStore<T> {
        let mut store = self.factory().make_zero(self.rows(), self.cols());
        log::trace!("collect: materializing {}x{}", self.rows(), self.cols());
        self.supply_to(&mut store);
        store
    }

    /// Apply `f` to every element after this supplier has run.
    fn operate_on_all<F>(self, f: F) -> UnaryOperation<Self, T>
    where
        Self: Sized,
        F: Fn(T) -> T + Send + Sync + 'static,
    {
        UnaryOperation {
            source: self,
            f: Arc::new(f),
        }
    }

    /// Combine every element `x` with the matching element `y` of `left`
    /// as `f(y, x)`.
    fn operate_on_matching_left<F>(self, left: &Matrix<T>, f: F) -> Result<MatchingOperation<Self, T>>
    where
        Self: Sized,
        F: Fn(T, T) -> T + Send + Sync + 'static,
    {
        MatchingOperation::new(self, left.clone(), Side::Left, Arc::new(f))
    }

    /// Combine every element `x` with the matching element `y` of `right`
    /// as `f(x, y)`.
    fn operate_on_matching_right<F>(self, f: F, right: &Matrix<T>) -> Result<MatchingOperation<Self, T>>
    where
        Self: Sized,
        F: Fn(T, T) -> T + Send + Sync + 'static,
    {
        MatchingOperation::new(self, right.clone(), Side::Right, Arc::new(f))
    }

    /// Combine this supplier with another supplier element by element as
    /// `f(self, other)`.
    fn operate_on_pair<S, F>(self, other: S, f: F) -> Result<PairOperation<Self, S, T>>
    where
        Self: Sized,
        S: ElementsSupplier<T>,
        F: Fn(T, T) -> T + Send + Sync + 'static,
    {
        if (self.rows(), self.cols()) != (other.rows(), other.cols()) {
            return Err(MatrixError::ShapeMismatch(
                (self.rows(), self.cols()),
                (other.rows(), other.cols()),
            ));
        }
        Ok(PairOperation {
            first: self,
            second: other,
            f: Arc::new(f),
        })
    }

    /// Swap the reported shape and write through a transposing target.
    fn transposed(self) -> TransposedSupplier<Self>
    where
        Self: Sized,
    {
        TransposedSupplier { source: self }
    }
}

/// Which side of a binary function the fixed matrix occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

// ============================================================================
// Pipeline nodes
// ============================================================================

pub struct UnaryOperation<S, T> {
    source: S,
    f: UnaryFn<T>,
}

impl<S: ElementsSupplier<T>, T: Scalar> ElementsSupplier<T> for UnaryOperation<S, T> {
    fn rows(&self) -> usize {
        self.source.rows()
    }

    fn cols(&self) -> usize {
        self.source.cols()
    }

    fn factory(&self) -> StoreFactory {
        self.source.factory()
    }

    fn supply_to(&self, target: &mut dyn RegionMut<T>) {
        self.source.supply_to(target);
        target.modify_all(&*self.f);
    }
}

pub struct MatchingOperation<S, T: Scalar> {
    source: S,
    fixed: Matrix<T>,
    side: Side,
    f: BinaryFn<T>,
}

impl<S: ElementsSupplier<T>, T: Scalar> MatchingOperation<S, T> {
    fn new(source: S, fixed: Matrix<T>, side: Side, f: BinaryFn<T>) -> Result<Self> {
        if (source.rows(), source.cols()) != fixed.shape() {
            return Err(MatrixError::ShapeMismatch(
                (source.rows(), source.cols()),
                fixed.shape(),
            ));
        }
        Ok(Self {
            source,
            fixed,
            side,
            f,
        })
    }
}

impl<S: ElementsSupplier<T>, T: Scalar> ElementsSupplier<T> for MatchingOperation<S, T> {
    fn rows(&self) -> usize {
        self.source.rows()
    }

    fn cols(&self) -> usize {
        self.source.cols()
    }

    fn factory(&self) -> StoreFactory {
        self.source.factory()
    }

    fn supply_to(&self, target: &mut dyn RegionMut<T>) {
        self.source.supply_to(target);
        for j in 0..self.cols() {
            for i in 0..self.rows() {
                let x = target.get(i, j);
                let y = self.fixed.get(i, j);
                let value = match self.side {
                    Side::Left => (self.f)(y, x),
                    Side::Right => (self.f)(x, y),
                };
                target.set(i, j, value);
            }
        }
    }
}

pub struct PairOperation<A, B, T> {
    first: A,
    second: B,
    f: BinaryFn<T>,
}

impl<A, B, T> ElementsSupplier<T> for PairOperation<A, B, T>
where
    A: ElementsSupplier<T>,
    B: ElementsSupplier<T>,
    T: Scalar,
{
    fn rows(&self) -> usize {
        self.first.rows()
    }

    fn cols(&self) -> usize {
        self.first.cols()
    }

    fn factory(&self) -> StoreFactory {
        self.first.factory()
    }

    fn supply_to(&self, target: &mut dyn RegionMut<T>) {
        // The second operand needs its own scratch store; the first one is
        // written straight into the target and combined in place.
        let other = self.second.collect();
        self.first.supply_to(target);
        for j in 0..self.cols() {
            for i in 0..self.rows() {
                let value = (self.f)(target.get(i, j), other.get(i, j));
                target.set(i, j, value);
            }
        }
    }
}

pub struct TransposedSupplier<S> {
    source: S,
}

impl<S: ElementsSupplier<T>, T: Scalar> ElementsSupplier<T> for TransposedSupplier<S> {
    fn rows(&self) -> usize {
        self.source.cols()
    }

    fn cols(&self) -> usize {
        self.source.rows()
    }

    fn factory(&self) -> StoreFactory {
        self.source.factory()
    }

    fn supply_to(&self, target: &mut dyn RegionMut<T>) {
        self.source.supply_to(&mut target.region_by_transposing());
    }
}

impl<S> TransposedSupplier<S> {
    /// The supplier this one transposes.
    pub fn into_inner(self) -> S {
        self.source
    }
}
