//! Element-wise operations applied lazily by transposed and conjugated views.
//!
//! Four operations form a group under composition:
//! - `Identity`: No transformation
//! - `Conj`: Complex conjugate of every element, shape unchanged
//! - `Transpose`: Rows and columns swapped
//! - `Adjoint`: Conjugate transpose
//!
//! A view tree carries at most one [`Transjugation`] per node. Composing a
//! new operation onto an existing one goes through [`Transjugation::compose`],
//! so stacking `transpose().transpose()` collapses back to `Identity` instead
//! of nesting wrappers.

use num_complex::Complex;
use num_traits::Num;

/// Value-level half of a [`Transjugation`].
///
/// Only conjugation touches element values; transposition moves them. Real
/// types take the default, which leaves the value as is.
pub trait ElementOpApply: Copy {
    #[inline]
    fn conj(self) -> Self {
        self
    }
}

macro_rules! real_element_ops {
    ($($t:ty),*) => {
        $(impl ElementOpApply for $t {})*
    };
}

real_element_ops!(f32, f64, i8, i16, i32, i64, i128, isize);

impl<T: Num + Copy + std::ops::Neg<Output = T>> ElementOpApply for Complex<T> {
    #[inline]
    fn conj(self) -> Self {
        Complex::new(self.re, -self.im)
    }
}

// ---------------------------------------------------------------------------
// Transjugation: runtime group element
// ---------------------------------------------------------------------------

/// Element operation attached to a transjugated view.
///
/// Composition table (`self.compose(other)` = apply `self`, then `other`):
/// ```text
///   compose | Id   | Conj | Trans | Adj
/// ---------|------|------|-------|------
///   Id     | Id   | Conj | Trans | Adj
///   Conj   | Conj | Id   | Adj   | Trans
///   Trans  | Trans| Adj  | Id    | Conj
///   Adj    | Adj  | Trans| Conj  | Id
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Transjugation {
    #[default]
    Identity,
    Conj,
    Transpose,
    Adjoint,
}

impl Transjugation {
    /// Apply `self` first, then `other`.
    pub const fn compose(self, other: Transjugation) -> Transjugation {
        use Transjugation::*;
        match (self, other) {
            (op, Identity) | (Identity, op) => op,
            (Conj, Conj) | (Transpose, Transpose) | (Adjoint, Adjoint) => Identity,
            (Conj, Transpose) | (Transpose, Conj) => Adjoint,
            (Conj, Adjoint) | (Adjoint, Conj) => Transpose,
            (Transpose, Adjoint) | (Adjoint, Transpose) => Conj,
        }
    }

    /// Every element of the group is its own inverse.
    #[inline]
    pub const fn inverse(self) -> Transjugation {
        self
    }

    #[inline]
    pub const fn is_identity(self) -> bool {
        matches!(self, Transjugation::Identity)
    }

    /// Whether the operation exchanges the row and column axes.
    #[inline]
    pub const fn swaps_axes(self) -> bool {
        matches!(self, Transjugation::Transpose | Transjugation::Adjoint)
    }

    /// Whether the operation conjugates element values.
    #[inline]
    pub const fn conjugates(self) -> bool {
        matches!(self, Transjugation::Conj | Transjugation::Adjoint)
    }

    /// Value seen at the moved position: conjugated when the operation
    /// conjugates, unchanged otherwise.
    #[inline]
    pub fn apply<T: ElementOpApply>(self, value: T) -> T {
        if self.conjugates() {
            value.conj()
        } else {
            value
        }
    }
}
