//! Error type shared by the linear algebra, filtering and tracking layers.

use thiserror::Error;

/// Errors produced by the tracking engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Operands of a vector/matrix operation have incompatible shapes.
    #[error("dimension mismatch in {op}: expected {expected:?}, found {found:?}")]
    DimensionMismatch {
        op: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    },

    /// Operation requires a square matrix.
    #[error("matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    /// LU decomposition hit a pivot too close to zero.
    #[error("matrix is singular (pivot magnitude {pivot:e})")]
    Singular { pivot: f64 },

    /// A Kalman filter was configured with a wrongly shaped matrix or vector.
    #[error("kalman filter {name} must be {expected:?}, got {found:?}")]
    FilterDimension {
        name: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    },

    /// The assignment backend failed or returned an invalid permutation.
    #[error("assignment failed: {0}")]
    Assignment(String),
}

pub type Result<T> = std::result::Result<T, Error>;
