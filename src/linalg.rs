//! Dense real-valued vectors and matrices backing the Kalman filter.
//!
//! Both types wrap `ndarray` containers and check operand shapes before every
//! binary operation, returning [`Error::DimensionMismatch`](crate::Error) instead
//! of panicking. Inversion goes through an LU decomposition with partial
//! pivoting and reports singular input as [`Error::Singular`](crate::Error).

mod lu;
mod matrix;
mod vector;

pub use lu::{LuDecomposition, PIVOT_EPSILON};
pub use matrix::Matrix;
pub use vector::Vector;
