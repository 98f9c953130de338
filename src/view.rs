//! The read contract shared by every node of a view tree.
//!
//! A view tree is built from a closed set of node kinds:
//!
//! - leaves wrap a physical [`DenseStore`](matrix_store::DenseStore) or represent an
//!   algebraic constant (zero, identity, single scalar)
//! - unary nodes reinterpret exactly one child (transjugation, shading,
//!   selection, offset/limit, element-wise function)
//! - binary nodes combine two children (concatenation, overlay, element-wise
//!   binary function)
//!
//! [`Matrix`] is the cheap-to-clone handle over one node. Cloning shares the
//! node; no view ever copies or mutates the storage of its children.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use matrix_store::{RegionMut, StoreFactory};
use matrix_traits::{Scalar, ScalarValue, Transjugation};

use crate::compose::{AboveBelowView, LeftRightView, SuperimposedView, ZippedView};
use crate::leaf::{DenseView, IdentityView, SingleView, ZeroView};
use crate::mapped::MappedView;
use crate::offset::{LimitView, OffsetView};
use crate::selection::{ColumnsSelectedView, RowsSelectedView};
use crate::shading::ShadedView;
use crate::supplier::ElementsSupplier;
use crate::transjugate::TransjugatedView;

/// Indexed read access with sparse-band bookkeeping.
///
/// Band bounds are half-open: every non-zero of row `r` lies in
/// `first_in_row(r)..limit_of_row(r)`, and likewise for columns. Bounds may
/// include zeros but never exclude a non-zero. A band with
/// `first >= limit` is empty.
pub trait MatrixView<T: Scalar>: ElementsSupplier<T> {
    /// Element at `(row, col)`.
    ///
    /// # Panics
    /// Panics if the index is out of bounds.
    fn get(&self, row: usize, col: usize) -> T;

    /// Plain numeric value at `(row, col)`; see [`Scalar::real_value`].
    fn value_at(&self, row: usize, col: usize) -> f64 {
        self.get(row, col).real_value()
    }

    fn scalar_at(&self, row: usize, col: usize) -> ScalarValue<T> {
        ScalarValue::new(self.get(row, col))
    }

    fn first_in_row(&self, _row: usize) -> usize {
        0
    }

    fn limit_of_row(&self, _row: usize) -> usize {
        self.cols()
    }

    fn first_in_column(&self, _col: usize) -> usize {
        0
    }

    fn limit_of_column(&self, _col: usize) -> usize {
        self.rows()
    }
}

#[inline]
pub(crate) fn check_index(rows: usize, cols: usize, row: usize, col: usize) {
    assert!(
        row < rows && col < cols,
        "index ({row}, {col}) out of bounds for {rows}x{cols} matrix"
    );
}

/// Reset `target`, then write every cell inside the column bands of `view`.
pub(crate) fn supply_by_columns<T, V>(view: &V, target: &mut dyn RegionMut<T>)
where
    T: Scalar,
    V: MatrixView<T> + ?Sized,
{
    target.reset();
    for j in 0..view.cols() {
        let limit = view.limit_of_column(j).min(view.rows());
        for i in view.first_in_column(j)..limit {
            target.set(i, j, view.get(i, j));
        }
    }
}

/// Add every cell inside the column bands of `view` onto `target`.
pub(crate) fn add_by_columns<T, V>(view: &V, target: &mut dyn RegionMut<T>)
where
    T: Scalar,
    V: MatrixView<T> + ?Sized,
{
    for j in 0..view.cols() {
        let limit = view.limit_of_column(j).min(view.rows());
        for i in view.first_in_column(j)..limit {
            target.add(i, j, view.get(i, j));
        }
    }
}

// ============================================================================
// Node
// ============================================================================

/// Structural category of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Leaf,
    Unary,
    Binary,
}

pub(crate) enum Node<T: Scalar> {
    Dense(DenseView<T>),
    Zero(ZeroView<T>),
    Identity(IdentityView<T>),
    Single(SingleView<T>),

    Transjugated(TransjugatedView<T>),
    Shaded(ShadedView<T>),
    RowsSelected(RowsSelectedView<T>),
    ColumnsSelected(ColumnsSelectedView<T>),
    Offset(OffsetView<T>),
    Limit(LimitView<T>),
    Mapped(MappedView<T>),

    LeftRight(LeftRightView<T>),
    AboveBelow(AboveBelowView<T>),
    Superimposed(SuperimposedView<T>),
    Zipped(ZippedView<T>),
}

macro_rules! dispatch {
    ($node:expr, $v:ident => $body:expr) => {
        match $node {
            Node::Dense($v) => $body,
            Node::Zero($v) => $body,
            Node::Identity($v) => $body,
            Node::Single($v) => $body,
            Node::Transjugated($v) => $body,
            Node::Shaded($v) => $body,
            Node::RowsSelected($v) => $body,
            Node::ColumnsSelected($v) => $body,
            Node::Offset($v) => $body,
            Node::Limit($v) => $body,
            Node::Mapped($v) => $body,
            Node::LeftRight($v) => $body,
            Node::AboveBelow($v) => $body,
            Node::Superimposed($v) => $body,
            Node::Zipped($v) => $body,
        }
    };
}

impl<T: Scalar> Node<T> {
    fn kind(&self) -> NodeKind {
        match self {
            Node::Dense(_) | Node::Zero(_) | Node::Identity(_) | Node::Single(_) => NodeKind::Leaf,
            Node::Transjugated(_)
            | Node::Shaded(_)
            | Node::RowsSelected(_)
            | Node::ColumnsSelected(_)
            | Node::Offset(_)
            | Node::Limit(_)
            | Node::Mapped(_) => NodeKind::Unary,
            Node::LeftRight(_) | Node::AboveBelow(_) | Node::Superimposed(_) | Node::Zipped(_) => {
                NodeKind::Binary
            }
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Node::Dense(_) => "Dense",
            Node::Zero(_) => "Zero",
            Node::Identity(_) => "Identity",
            Node::Single(_) => "Single",
            Node::Transjugated(_) => "Transjugated",
            Node::Shaded(_) => "Shaded",
            Node::RowsSelected(_) => "RowsSelected",
            Node::ColumnsSelected(_) => "ColumnsSelected",
            Node::Offset(_) => "Offset",
            Node::Limit(_) => "Limit",
            Node::Mapped(_) => "Mapped",
            Node::LeftRight(_) => "LeftRight",
            Node::AboveBelow(_) => "AboveBelow",
            Node::Superimposed(_) => "Superimposed",
            Node::Zipped(_) => "Zipped",
        }
    }
}

// ============================================================================
// Matrix
// ============================================================================

/// A node plus the transjugated views already derived from it.
///
/// The links are weak, so a derived view lives only as long as someone
/// holds it; they exist purely to hand back the same object when an
/// operation is repeated or undone.
struct Entry<T: Scalar> {
    node: Node<T>,
    transjugates: Mutex<Vec<(Transjugation, Weak<Entry<T>>)>>,
}

/// Shared handle to an immutable view tree.
pub struct Matrix<T: Scalar> {
    entry: Arc<Entry<T>>,
}

impl<T: Scalar> Clone for Matrix<T> {
    fn clone(&self) -> Self {
        Self {
            entry: Arc::clone(&self.entry),
        }
    }
}

impl<T: Scalar> fmt::Debug for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matrix")
            .field("node", &self.entry.node.name())
            .field("rows", &self.rows())
            .field("cols", &self.cols())
            .finish()
    }
}

impl<T: Scalar> Matrix<T> {
    pub(crate) fn from_node(node: Node<T>) -> Self {
        Self {
            entry: Arc::new(Entry {
                node,
                transjugates: Mutex::new(Vec::new()),
            }),
        }
    }

    #[inline]
    pub(crate) fn node(&self) -> &Node<T> {
        &self.entry.node
    }

    /// Whether both handles refer to the same node object.
    #[inline]
    pub fn ptr_eq(&self, other: &Matrix<T>) -> bool {
        Arc::ptr_eq(&self.entry, &other.entry)
    }

    pub fn kind(&self) -> NodeKind {
        self.entry.node.kind()
    }

    /// Live view previously derived from this one by `op`.
    pub(crate) fn derived_transjugate(&self, op: Transjugation) -> Option<Matrix<T>> {
        let links = self
            .entry
            .transjugates
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        links
            .iter()
            .find(|(linked, _)| *linked == op)
            .and_then(|(_, weak)| weak.upgrade())
            .map(|entry| Matrix { entry })
    }

    /// Record that `op` applied to this view yields `result`.
    pub(crate) fn link_transjugate(&self, op: Transjugation, result: &Matrix<T>) {
        let mut links = self
            .entry
            .transjugates
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        links.retain(|(linked, weak)| *linked != op && weak.strong_count() > 0);
        links.push((op, Arc::downgrade(&result.entry)));
    }

    /// `(rows, cols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows(), self.cols())
    }

    /// True for the structural zero constant, including its transpose.
    pub fn is_zero_view(&self) -> bool {
        match self.node() {
            Node::Zero(_) => true,
            Node::Transjugated(t) => matches!(t.base().node(), Node::Zero(_)),
            _ => false,
        }
    }

    /// True for the structural identity constant.
    pub fn is_identity_view(&self) -> bool {
        matches!(self.node(), Node::Identity(_))
    }

    /// Value of a single-scalar broadcast leaf.
    pub fn single_value(&self) -> Option<T> {
        match self.node() {
            Node::Single(s) => Some(s.value()),
            _ => None,
        }
    }

    /// All values in row-major order.
    pub fn to_row_major_vec(&self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.rows() * self.cols());
        for i in 0..self.rows() {
            for j in 0..self.cols() {
                out.push(self.get(i, j));
            }
        }
        out
    }
}

impl<T: Scalar> ElementsSupplier<T> for Matrix<T> {
    fn rows(&self) -> usize {
        dispatch!(self.node(), v => v.rows())
    }

    fn cols(&self) -> usize {
        dispatch!(self.node(), v => v.cols())
    }

    fn factory(&self) -> StoreFactory {
        dispatch!(self.node(), v => v.factory())
    }

    fn supply_to(&self, target: &mut dyn RegionMut<T>) {
        assert!(
            target.rows() == self.rows() && target.cols() == self.cols(),
            "target is {}x{}, view is {}x{}",
            target.rows(),
            target.cols(),
            self.rows(),
            self.cols()
        );
        dispatch!(self.node(), v => v.supply_to(target))
    }
}

impl<T: Scalar> MatrixView<T> for Matrix<T> {
    fn get(&self, row: usize, col: usize) -> T {
        check_index(self.rows(), self.cols(), row, col);
        dispatch!(self.node(), v => v.get(row, col))
    }

    fn first_in_row(&self, row: usize) -> usize {
        check_index(self.rows(), self.cols().max(1), row, 0);
        dispatch!(self.node(), v => v.first_in_row(row))
    }

    fn limit_of_row(&self, row: usize) -> usize {
        check_index(self.rows(), self.cols().max(1), row, 0);
        dispatch!(self.node(), v => v.limit_of_row(row))
    }

    fn first_in_column(&self, col: usize) -> usize {
        check_index(self.rows().max(1), self.cols(), 0, col);
        dispatch!(self.node(), v => v.first_in_column(col))
    }

    fn limit_of_column(&self, col: usize) -> usize {
        check_index(self.rows().max(1), self.cols(), 0, col);
        dispatch!(self.node(), v => v.limit_of_column(col))
    }
}
