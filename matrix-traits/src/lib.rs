//! Shared traits for the lazy-matrix ecosystem.
//!
//! This crate provides the number abstraction that the view algebra is
//! generic over, together with the element-operation group used by
//! transposed and conjugated views.
//!
//! External crates can depend on `matrix-traits` to implement [`Scalar`]
//! for their own number types without orphan rule violations.

pub mod element_op;
pub mod scalar;

pub use element_op::{ElementOpApply, Transjugation};
pub use scalar::{Scalar, ScalarValue};
