//! Scalar type bounds for matrix views.

use crate::element_op::ElementOpApply;
use num_complex::Complex;
use std::fmt::Debug;
use std::ops::{Add, Mul, Neg, Sub};

/// Number type a matrix view is generic over.
///
/// The additive and multiplicative identities come from
/// [`num_traits::Zero`] and [`num_traits::One`]; masking views never
/// hard-code `0.0` or `1.0`, so complex and custom number types get the
/// correct substitutes.
pub trait Scalar:
    Copy
    + Send
    + Sync
    + Debug
    + PartialEq
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
    + num_traits::Zero
    + num_traits::One
    + ElementOpApply
    + 'static
{
    /// Plain numeric value of this scalar: the real part, widened to `f64`.
    fn real_value(self) -> f64;
}

macro_rules! impl_scalar_real {
    ($($t:ty),*) => {
        $(impl Scalar for $t {
            #[inline(always)]
            fn real_value(self) -> f64 {
                self as f64
            }
        })*
    };
}

impl_scalar_real!(f32, f64, i32, i64);

macro_rules! impl_scalar_complex {
    ($($t:ty),*) => {
        $(impl Scalar for Complex<$t> {
            #[inline(always)]
            fn real_value(self) -> f64 {
                self.re as f64
            }
        })*
    };
}

impl_scalar_complex!(f32, f64);

/// Scalar wrapper returned by the "scalar" access path of a view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalarValue<T>(T);

impl<T: Scalar> ScalarValue<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        ScalarValue(value)
    }

    /// The wrapped element.
    #[inline]
    pub fn get(self) -> T {
        self.0
    }

    /// Same as [`Scalar::real_value`] on the wrapped element.
    #[inline]
    pub fn numeric_value(self) -> f64 {
        self.0.real_value()
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        num_traits::Zero::is_zero(&self.0)
    }

    pub fn conj(self) -> Self {
        ScalarValue(self.0.conj())
    }
}

impl<T: Scalar> From<T> for ScalarValue<T> {
    fn from(value: T) -> Self {
        ScalarValue(value)
    }
}

impl<T: Scalar> Add for ScalarValue<T> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        ScalarValue(self.0 + rhs.0)
    }
}

impl<T: Scalar> Mul for ScalarValue<T> {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        ScalarValue(self.0 * rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;
    use num_traits::{One, Zero};

    fn assert_scalar<T: Scalar>() {}

    #[test]
    fn test_standard_types() {
        assert_scalar::<f32>();
        assert_scalar::<f64>();
        assert_scalar::<i32>();
        assert_scalar::<i64>();
        assert_scalar::<Complex64>();
    }

    #[test]
    fn test_real_value() {
        assert_eq!(3i32.real_value(), 3.0);
        assert_eq!(Complex64::new(2.5, -1.0).real_value(), 2.5);
    }

    #[test]
    fn test_scalar_value_wrapper() {
        let a = ScalarValue::new(Complex64::new(1.0, 2.0));
        let b = ScalarValue::from(Complex64::new(3.0, -1.0));
        assert_eq!((a + b).get(), Complex64::new(4.0, 1.0));
        assert_eq!((a * b).numeric_value(), 5.0);
        assert_eq!(a.conj().get(), Complex64::new(1.0, -2.0));
        assert!(ScalarValue::new(0.0f64).is_zero());
    }

    #[test]
    fn test_custom_scalar() {
        // Numbers modulo 7; identities come from Zero/One, not float literals.
        #[derive(Debug, Clone, Copy, PartialEq)]
        struct Mod7(u8);

        impl Add for Mod7 {
            type Output = Self;
            fn add(self, rhs: Self) -> Self {
                Mod7((self.0 + rhs.0) % 7)
            }
        }
        impl Sub for Mod7 {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self {
                Mod7((self.0 + 7 - rhs.0) % 7)
            }
        }
        impl Mul for Mod7 {
            type Output = Self;
            fn mul(self, rhs: Self) -> Self {
                Mod7((self.0 * rhs.0) % 7)
            }
        }
        impl Neg for Mod7 {
            type Output = Self;
            fn neg(self) -> Self {
                Mod7((7 - self.0) % 7)
            }
        }
        impl Zero for Mod7 {
            fn zero() -> Self {
                Mod7(0)
            }
            fn is_zero(&self) -> bool {
                self.0 == 0
            }
        }
        impl One for Mod7 {
            fn one() -> Self {
                Mod7(1)
            }
        }
        impl ElementOpApply for Mod7 {}
        impl Scalar for Mod7 {
            fn real_value(self) -> f64 {
                self.0 as f64
            }
        }

        assert_scalar::<Mod7>();
        assert_eq!(Mod7(5) + Mod7(4), Mod7(2));
        assert_eq!(Mod7(3) * Mod7(5), Mod7(1));
        assert_eq!(-Mod7(3), Mod7(4));
        assert_eq!(Mod7(2) - Mod7(5), Mod7(4));
        assert!(Mod7::zero().is_zero());
        assert_eq!(ScalarValue::new(Mod7::one()).numeric_value(), 1.0);
    }
}
