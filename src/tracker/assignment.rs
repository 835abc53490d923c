//! Square assignment solvers.
//!
//! A solver takes an `n x n` integer cost matrix and returns, for each row,
//! the column assigned to it such that the total cost is minimal.

use ndarray::Array2;

use crate::error::{Error, Result};

/// Minimum-cost perfect matching on a square cost matrix.
pub trait AssignmentSolver {
    /// Returns `assignment` where `assignment[row]` is the column given to `row`.
    fn solve(&self, costs: &Array2<i32>) -> Result<Vec<usize>>;
}

fn check_square(costs: &Array2<i32>) -> Result<usize> {
    let (rows, cols) = costs.dim();
    if rows != cols {
        return Err(Error::NotSquare { rows, cols });
    }
    Ok(rows)
}

/// Checks that `assignment` is a permutation of `0..n`.
pub fn validate_permutation(assignment: &[usize], n: usize) -> Result<()> {
    if assignment.len() != n {
        return Err(Error::Assignment(format!(
            "expected {n} assignments, got {}",
            assignment.len()
        )));
    }
    let mut seen = vec![false; n];
    for &col in assignment {
        if col >= n || seen[col] {
            return Err(Error::Assignment(format!(
                "column {col} is out of range or assigned twice"
            )));
        }
        seen[col] = true;
    }
    Ok(())
}

/// Hungarian algorithm with row/column potentials (shortest augmenting
/// paths), O(n³) for every finite input including fully tied matrices.
///
/// Each row is inserted in index order; every inner step marks one more
/// column as visited, so a row is placed after at most `n + 1` steps.
/// Among equal reduced costs the lowest column index wins, which makes the
/// result deterministic for identical input.
#[derive(Debug, Clone, Copy, Default)]
pub struct HungarianSolver;

impl AssignmentSolver for HungarianSolver {
    fn solve(&self, costs: &Array2<i32>) -> Result<Vec<usize>> {
        let n = check_square(costs)?;
        if n == 0 {
            return Ok(Vec::new());
        }

        // 1-based bookkeeping; index 0 is the virtual root column/row
        let mut u = vec![0_i64; n + 1];
        let mut v = vec![0_i64; n + 1];
        let mut row_of_col = vec![0_usize; n + 1];
        let mut way = vec![0_usize; n + 1];

        for row in 1..=n {
            row_of_col[0] = row;
            let mut col0 = 0;
            let mut min_slack = vec![i64::MAX; n + 1];
            let mut used = vec![false; n + 1];

            loop {
                used[col0] = true;
                let row0 = row_of_col[col0];
                let mut delta = i64::MAX;
                let mut col1 = 0;

                for col in 1..=n {
                    if used[col] {
                        continue;
                    }
                    let reduced = costs[[row0 - 1, col - 1]] as i64 - u[row0] - v[col];
                    if reduced < min_slack[col] {
                        min_slack[col] = reduced;
                        way[col] = col0;
                    }
                    if min_slack[col] < delta {
                        delta = min_slack[col];
                        col1 = col;
                    }
                }

                for col in 0..=n {
                    if used[col] {
                        u[row_of_col[col]] += delta;
                        v[col] -= delta;
                    } else {
                        min_slack[col] -= delta;
                    }
                }

                col0 = col1;
                if row_of_col[col0] == 0 {
                    break;
                }
            }

            // flip the augmenting path back to the root
            loop {
                let col1 = way[col0];
                row_of_col[col0] = row_of_col[col1];
                col0 = col1;
                if col0 == 0 {
                    break;
                }
            }
        }

        let mut assignment = vec![0; n];
        for col in 1..=n {
            assignment[row_of_col[col] - 1] = col - 1;
        }
        Ok(assignment)
    }
}

/// Jonker-Volgenant solver backed by the `lapjv` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct LapjvSolver;

impl AssignmentSolver for LapjvSolver {
    fn solve(&self, costs: &Array2<i32>) -> Result<Vec<usize>> {
        let n = check_square(costs)?;
        if n == 0 {
            return Ok(Vec::new());
        }
        // shifting every entry by a constant leaves the optimum unchanged
        let min = costs.iter().copied().min().unwrap_or(0) as f64;
        let float_costs = costs.mapv(|c| c as f64 - min);
        let (row_to_col, _) =
            lapjv::lapjv(&float_costs).map_err(|e| Error::Assignment(format!("{e:?}")))?;
        validate_permutation(&row_to_col, n)?;
        Ok(row_to_col)
    }
}
