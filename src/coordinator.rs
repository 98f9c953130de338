//! Fan-out/fan-in of products and scalings over composing views.
//!
//! A product with a concatenated or patched operand splits into two
//! independent products over the children. Both are evaluated (on two
//! rayon tasks when the `parallel` feature is on and the work is large
//! enough), the caller blocks until both finish, and a new composing view
//! is built from the two results. If either branch fails the error is
//! returned and nothing is assembled; when both fail the left error wins.

use matrix_traits::Scalar;

use crate::compose::{AboveBelowView, LeftRightView, SuperimposedView};
use crate::supplier::ElementsSupplier;
use crate::view::{Matrix, Node};
use crate::Result;

/// Run `left` and `right`, concurrently when `work` is large enough.
///
/// The pair is returned in argument order regardless of which task
/// finishes first.
pub(crate) fn join<A, B, RA, RB>(work: usize, left: A, right: B) -> (RA, RB)
where
    A: FnOnce() -> RA + Send,
    B: FnOnce() -> RB + Send,
    RA: Send,
    RB: Send,
{
    #[cfg(feature = "parallel")]
    {
        if work >= crate::MIN_PARALLEL_WORK && rayon::current_num_threads() > 1 {
            log::debug!("coordinator: fan-out over {work} elements");
            return rayon::join(left, right);
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = work;
    (left(), right())
}

/// [`join`] for fallible branches.
pub(crate) fn join_results<A, B, RA, RB>(work: usize, left: A, right: B) -> Result<(RA, RB)>
where
    A: FnOnce() -> Result<RA> + Send,
    B: FnOnce() -> Result<RB> + Send,
    RA: Send,
    RB: Send,
{
    let (ra, rb) = join(work, left, right);
    Ok((ra?, rb?))
}

/// Keep structural constants, materialize everything else.
fn concrete<T: Scalar>(m: Matrix<T>) -> Matrix<T> {
    if m.is_zero_view() || m.is_identity_view() || m.single_value().is_some() {
        m
    } else {
        m.to_dense()
    }
}

fn product_work<T: Scalar>(left: &Matrix<T>, right: &Matrix<T>) -> usize {
    left.rows()
        .saturating_mul(left.cols())
        .saturating_mul(right.cols())
}

// ============================================================================
// Products
// ============================================================================

/// `[X | Y] * R = X * R[..k, :] + Y * R[k.., :]`.
fn left_right_times<T: Scalar>(v: &LeftRightView<T>, right: &Matrix<T>) -> Result<Matrix<T>> {
    let k = v.left.cols();
    let top = right.limits(k, right.cols())?;
    let bottom = right.offsets(k, 0)?;
    let work = product_work(&v.left, right);
    let (x, y) = join_results(work, || v.left.multiply(&top), || v.right.multiply(&bottom))?;
    x.add(&y)
}

/// `L * [X | Y] = [L * X | L * Y]`.
fn times_left_right<T: Scalar>(left: &Matrix<T>, v: &LeftRightView<T>) -> Result<Matrix<T>> {
    let work = product_work(left, &v.left).saturating_add(product_work(left, &v.right));
    let (x, y) = join_results(work, || left.multiply(&v.left), || left.multiply(&v.right))?;
    Matrix::left_right(&x, &y)
}

/// `[X ; Y] * R = [X * R ; Y * R]`.
fn above_below_times<T: Scalar>(v: &AboveBelowView<T>, right: &Matrix<T>) -> Result<Matrix<T>> {
    let work = product_work(&v.above, right).saturating_add(product_work(&v.below, right));
    let (x, y) = join_results(work, || v.above.multiply(right), || v.below.multiply(right))?;
    Matrix::above_below(&x, &y)
}

/// `L * [X ; Y] = L[:, ..k] * X + L[:, k..] * Y`.
fn times_above_below<T: Scalar>(left: &Matrix<T>, v: &AboveBelowView<T>) -> Result<Matrix<T>> {
    let k = v.above.rows();
    let head = left.limits(left.rows(), k)?;
    let tail = left.offsets(0, k)?;
    let work = product_work(left, &v.above);
    let (x, y) = join_results(work, || head.multiply(&v.above), || tail.multiply(&v.below))?;
    x.add(&y)
}

/// `(B + P@(r0, c0)) * R = B * R + (P * R[c0..c0+pc, :])@(r0, 0)`.
fn superimposed_times<T: Scalar>(v: &SuperimposedView<T>, right: &Matrix<T>) -> Result<Matrix<T>> {
    let rows = right.block(v.col_first, 0, v.diff.cols(), right.cols())?;
    let work = product_work(&v.base, right);
    let (base, patch) = join_results(work, || v.base.multiply(right), || v.diff.multiply(&rows))?;
    base.superimpose(&patch, v.row_first, 0)
}

/// `L * (B + P@(r0, c0)) = L * B + (L[:, r0..r0+pr] * P)@(0, c0)`.
fn times_superimposed<T: Scalar>(left: &Matrix<T>, v: &SuperimposedView<T>) -> Result<Matrix<T>> {
    let cols = left.block(0, v.row_first, left.rows(), v.diff.rows())?;
    let work = product_work(left, &v.base);
    let (base, patch) = join_results(work, || left.multiply(&v.base), || cols.multiply(&v.diff))?;
    base.superimpose(&patch, 0, v.col_first)
}

/// Split `left * right` over a composing operand, if either side is one.
///
/// The left operand is decomposed first.
pub(crate) fn multiply_composed<T: Scalar>(left: &Matrix<T>, right: &Matrix<T>) -> Option<Result<Matrix<T>>> {
    let result = match left.node() {
        Node::LeftRight(v) => left_right_times(v, right),
        Node::AboveBelow(v) => above_below_times(v, right),
        Node::Superimposed(v) => superimposed_times(v, right),
        _ => match right.node() {
            Node::LeftRight(v) => times_left_right(left, v),
            Node::AboveBelow(v) => times_above_below(left, v),
            Node::Superimposed(v) => times_superimposed(left, v),
            _ => return None,
        },
    };
    Some(result)
}

// ============================================================================
// Scaling
// ============================================================================

/// Scale both children of a composing view and rebuild it.
pub(crate) fn scale_composed<T: Scalar>(m: &Matrix<T>, factor: T) -> Option<Result<Matrix<T>>> {
    let work = m.rows().saturating_mul(m.cols());
    let scaled = |x: &Matrix<T>| x.scale(factor).map(concrete);
    let result = match m.node() {
        Node::LeftRight(v) => join_results(work, || scaled(&v.left), || scaled(&v.right))
            .and_then(|(x, y)| Matrix::left_right(&x, &y)),
        Node::AboveBelow(v) => join_results(work, || scaled(&v.above), || scaled(&v.below))
            .and_then(|(x, y)| Matrix::above_below(&x, &y)),
        Node::Superimposed(v) => join_results(work, || scaled(&v.base), || scaled(&v.diff))
            .and_then(|(base, diff)| base.superimpose(&diff, v.row_first, v.col_first)),
        _ => return None,
    };
    Some(result)
}
