use std::fmt;
use std::ops::{Index, IndexMut};

use ndarray::{Array1, Array2};

use super::lu::LuDecomposition;
use super::vector::Vector;
use crate::error::{Error, Result};

/// Dense row-major matrix of `f64`.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    data: Array2<f64>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: Array2::zeros((rows, cols)),
        }
    }

    pub fn identity(size: usize) -> Self {
        Self {
            data: Array2::eye(size),
        }
    }

    /// Square matrix with `diagonal` on its main diagonal.
    pub fn from_diagonal(diagonal: &[f64]) -> Self {
        Self {
            data: Array2::from_diag(&Array1::from_vec(diagonal.to_vec())),
        }
    }

    /// Build a matrix from a row-major slice.
    pub fn from_row_slice(rows: usize, cols: usize, values: &[f64]) -> Result<Self> {
        if values.len() != rows * cols {
            return Err(Error::DimensionMismatch {
                op: "matrix from_row_slice",
                expected: (rows, cols),
                found: (values.len(), 1),
            });
        }
        let data = Array2::from_shape_vec((rows, cols), values.to_vec()).map_err(|_| {
            Error::DimensionMismatch {
                op: "matrix from_row_slice",
                expected: (rows, cols),
                found: (values.len(), 1),
            }
        })?;
        Ok(Self { data })
    }

    /// Build a matrix from equally sized rows.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut values = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(Error::DimensionMismatch {
                    op: "matrix from_rows",
                    expected: (1, cols),
                    found: (1, row.len()),
                });
            }
            values.extend_from_slice(row);
        }
        Self::from_row_slice(rows.len(), cols, &values)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows() == self.cols()
    }

    pub(crate) fn as_array(&self) -> &Array2<f64> {
        &self.data
    }

    fn check_same_shape(&self, other: &Matrix, op: &'static str) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(Error::DimensionMismatch {
                op,
                expected: self.shape(),
                found: other.shape(),
            });
        }
        Ok(())
    }

    pub fn add(&self, other: &Matrix) -> Result<Matrix> {
        self.check_same_shape(other, "matrix add")?;
        Ok(Self {
            data: &self.data + &other.data,
        })
    }

    pub fn sub(&self, other: &Matrix) -> Result<Matrix> {
        self.check_same_shape(other, "matrix sub")?;
        Ok(Self {
            data: &self.data - &other.data,
        })
    }

    pub fn scale(&self, factor: f64) -> Matrix {
        Self {
            data: &self.data * factor,
        }
    }

    /// Matrix product `self · other`.
    pub fn mul(&self, other: &Matrix) -> Result<Matrix> {
        if self.cols() != other.rows() {
            return Err(Error::DimensionMismatch {
                op: "matrix mul",
                expected: (self.cols(), other.cols()),
                found: other.shape(),
            });
        }
        Ok(Self {
            data: self.data.dot(&other.data),
        })
    }

    /// Matrix-vector product `self · v`.
    pub fn mul_vector(&self, v: &Vector) -> Result<Vector> {
        if self.cols() != v.len() {
            return Err(Error::DimensionMismatch {
                op: "matrix-vector mul",
                expected: (self.cols(), 1),
                found: (v.len(), 1),
            });
        }
        Ok(Vector::from_array(self.data.dot(v.as_array())))
    }

    pub fn transpose(&self) -> Matrix {
        Self {
            data: self.data.t().to_owned(),
        }
    }

    /// Inverse via LU decomposition, one forward/back substitution per
    /// identity column.
    pub fn inverse(&self) -> Result<Matrix> {
        let lu = LuDecomposition::new(self)?;
        let n = self.rows();
        let mut inverse = Array2::zeros((n, n));
        let mut unit = Vector::zeros(n);
        for col in 0..n {
            unit[col] = 1.0;
            let solved = lu.solve(&unit)?;
            for row in 0..n {
                inverse[[row, col]] = solved[row];
            }
            unit[col] = 0.0;
        }
        Ok(Self { data: inverse })
    }

    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.data[[row, col]]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        &mut self.data[[row, col]]
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}x{}}}", self.rows(), self.cols())?;
        for row in self.data.rows() {
            write!(f, " |")?;
            for value in row {
                write!(f, " {value:.2}")?;
            }
        }
        write!(f, " |")
    }
}
