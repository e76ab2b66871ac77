//! Math module for computing the pool curve.
pub mod amp_ops;
pub mod curve_ops;
pub mod numerical_ops;
