use std::ops::{Index, IndexMut};

use ndarray::Array1;

use crate::error::{Error, Result};

/// Fixed-length column vector of `f64`.
#[derive(Debug, Clone, PartialEq)]
pub struct Vector {
    data: Array1<f64>,
}

impl Vector {
    /// Zero vector of the given length.
    pub fn zeros(len: usize) -> Self {
        Self {
            data: Array1::zeros(len),
        }
    }

    pub fn from_vec(values: Vec<f64>) -> Self {
        Self {
            data: Array1::from_vec(values),
        }
    }

    pub fn from_slice(values: &[f64]) -> Self {
        Self::from_vec(values.to_vec())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        // Array1::from_vec / zeros are always contiguous
        self.data.as_slice().unwrap_or(&[])
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.data.to_vec()
    }

    pub(crate) fn as_array(&self) -> &Array1<f64> {
        &self.data
    }

    pub(crate) fn from_array(data: Array1<f64>) -> Self {
        Self { data }
    }

    fn check_len(&self, other: &Vector, op: &'static str) -> Result<()> {
        if self.len() != other.len() {
            return Err(Error::DimensionMismatch {
                op,
                expected: (self.len(), 1),
                found: (other.len(), 1),
            });
        }
        Ok(())
    }

    /// Element-wise sum.
    pub fn add(&self, other: &Vector) -> Result<Vector> {
        self.check_len(other, "vector add")?;
        Ok(Self::from_array(&self.data + &other.data))
    }

    /// Element-wise difference.
    pub fn sub(&self, other: &Vector) -> Result<Vector> {
        self.check_len(other, "vector sub")?;
        Ok(Self::from_array(&self.data - &other.data))
    }

    pub fn scale(&self, factor: f64) -> Vector {
        Self::from_array(&self.data * factor)
    }

    /// Inner product.
    pub fn dot(&self, other: &Vector) -> Result<f64> {
        self.check_len(other, "vector dot")?;
        Ok(self.data.dot(&other.data))
    }

    /// Copy of this vector with `values` appended.
    pub fn extend(&self, values: &[f64]) -> Vector {
        let mut out = self.to_vec();
        out.extend_from_slice(values);
        Self::from_vec(out)
    }

    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }
}

impl Index<usize> for Vector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.data[index]
    }
}

impl IndexMut<usize> for Vector {
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        &mut self.data[index]
    }
}

impl From<Vec<f64>> for Vector {
    fn from(values: Vec<f64>) -> Self {
        Self::from_vec(values)
    }
}
