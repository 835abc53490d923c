use ndarray::Array2;

use super::matrix::Matrix;
use super::vector::Vector;
use crate::error::{Error, Result};

/// Pivots with a magnitude below this are treated as zero.
pub const PIVOT_EPSILON: f64 = 1e-12;

/// LU factorisation of a square matrix using Crout's method with implicit
/// row scaling and partial pivoting.
///
/// `lu` stores both factors in place: the strict lower triangle holds `L`
/// (unit diagonal implied) and the upper triangle including the diagonal
/// holds `U`. `pivots[k]` is the row swapped with row `k` at step `k`.
#[derive(Debug, Clone)]
pub struct LuDecomposition {
    lu: Array2<f64>,
    pivots: Vec<usize>,
}

impl LuDecomposition {
    pub fn new(matrix: &Matrix) -> Result<Self> {
        let (rows, cols) = matrix.shape();
        if rows != cols {
            return Err(Error::NotSquare { rows, cols });
        }
        let n = rows;
        let mut lu = matrix.as_array().clone();
        let mut pivots = vec![0; n];

        // implicit scaling: 1 / largest magnitude of each row
        let mut scale = Vec::with_capacity(n);
        for row in lu.rows() {
            let largest = row.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
            if largest < PIVOT_EPSILON {
                return Err(Error::Singular { pivot: largest });
            }
            scale.push(1.0 / largest);
        }

        for col in 0..n {
            for row in 0..col {
                let mut sum = lu[[row, col]];
                for k in 0..row {
                    sum -= lu[[row, k]] * lu[[k, col]];
                }
                lu[[row, col]] = sum;
            }

            let mut largest = 0.0;
            let mut pivot_row = col;
            for row in col..n {
                let mut sum = lu[[row, col]];
                for k in 0..col {
                    sum -= lu[[row, k]] * lu[[k, col]];
                }
                lu[[row, col]] = sum;

                let weighted = scale[row] * sum.abs();
                if weighted > largest {
                    largest = weighted;
                    pivot_row = row;
                }
            }

            if pivot_row != col {
                for k in 0..n {
                    lu.swap([pivot_row, k], [col, k]);
                }
                scale[pivot_row] = scale[col];
            }
            pivots[col] = pivot_row;

            let pivot = lu[[col, col]];
            if !(pivot.abs() >= PIVOT_EPSILON) {
                return Err(Error::Singular { pivot: pivot.abs() });
            }

            let inv_pivot = 1.0 / pivot;
            for row in col + 1..n {
                lu[[row, col]] *= inv_pivot;
            }
        }

        Ok(Self { lu, pivots })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.pivots.len()
    }

    /// Solve `A · x = b` for `x`.
    pub fn solve(&self, b: &Vector) -> Result<Vector> {
        let n = self.size();
        if b.len() != n {
            return Err(Error::DimensionMismatch {
                op: "lu solve",
                expected: (n, 1),
                found: (b.len(), 1),
            });
        }
        let mut x = b.clone();

        // forward substitution, unscrambling the permutation as we go
        for row in 0..n {
            let swapped = self.pivots[row];
            let mut sum = x[swapped];
            x[swapped] = x[row];
            for k in 0..row {
                sum -= self.lu[[row, k]] * x[k];
            }
            x[row] = sum;
        }

        for row in (0..n).rev() {
            let mut sum = x[row];
            for k in row + 1..n {
                sum -= self.lu[[row, k]] * x[k];
            }
            x[row] = sum / self.lu[[row, row]];
        }

        Ok(x)
    }

    /// Determinant of the decomposed matrix.
    pub fn determinant(&self) -> f64 {
        let swaps = self
            .pivots
            .iter()
            .enumerate()
            .filter(|&(k, &p)| k != p)
            .count();
        let sign = if swaps % 2 == 0 { 1.0 } else { -1.0 };
        (0..self.size()).fold(sign, |acc, k| acc * self.lu[[k, k]])
    }
}
