//! Generic discrete linear Kalman filter over the crate's dense matrix types.

use crate::error::{Error, Result};
use crate::linalg::{Matrix, Vector};

/// Construction parameters for a [`KalmanFilter`].
#[derive(Debug, Clone)]
pub struct KalmanFilterParams {
    /// State dimension
    pub dim_x: usize,
    /// Measurement dimension
    pub dim_z: usize,
    /// Initial state
    pub x: Vector,
    /// Initial state covariance
    pub p: Matrix,
    /// State transition matrix
    pub f: Matrix,
    /// Measurement function
    pub h: Matrix,
    /// Measurement noise covariance
    pub r: Matrix,
    /// Process noise covariance
    pub q: Matrix,
}

#[derive(Debug, Clone)]
pub struct KalmanFilter {
    dim_x: usize,
    dim_z: usize,
    x: Vector,
    p: Matrix,
    f: Matrix,
    h: Matrix,
    r: Matrix,
    q: Matrix,
    identity: Matrix,
}

fn expect_shape(name: &'static str, found: (usize, usize), expected: (usize, usize)) -> Result<()> {
    if found != expected {
        return Err(Error::FilterDimension {
            name,
            expected,
            found,
        });
    }
    Ok(())
}

impl KalmanFilter {
    /// Create a filter, rejecting any matrix or vector whose shape does not
    /// follow from `dim_x` and `dim_z`.
    pub fn new(params: KalmanFilterParams) -> Result<Self> {
        let KalmanFilterParams {
            dim_x,
            dim_z,
            x,
            p,
            f,
            h,
            r,
            q,
        } = params;

        expect_shape("state x", (x.len(), 1), (dim_x, 1))?;
        expect_shape("covariance P", p.shape(), (dim_x, dim_x))?;
        expect_shape("transition F", f.shape(), (dim_x, dim_x))?;
        expect_shape("measurement function H", h.shape(), (dim_z, dim_x))?;
        expect_shape("measurement noise R", r.shape(), (dim_z, dim_z))?;
        expect_shape("process noise Q", q.shape(), (dim_x, dim_x))?;

        Ok(Self {
            dim_x,
            dim_z,
            x,
            p,
            f,
            h,
            r,
            q,
            identity: Matrix::identity(dim_x),
        })
    }

    #[inline]
    pub fn dim_x(&self) -> usize {
        self.dim_x
    }

    #[inline]
    pub fn dim_z(&self) -> usize {
        self.dim_z
    }

    /// Current state estimate.
    pub fn state(&self) -> &Vector {
        &self.x
    }

    /// Mutable access to the state, for model-specific constraints applied
    /// between steps.
    pub fn state_mut(&mut self) -> &mut Vector {
        &mut self.x
    }

    /// Current state covariance.
    pub fn covariance(&self) -> &Matrix {
        &self.p
    }

    /// x = F·x, P = F·P·Fᵗ + Q
    pub fn predict(&mut self) -> Result<()> {
        let x = self.f.mul_vector(&self.x)?;
        let p = self.f.mul(&self.p)?.mul(&self.f.transpose())?.add(&self.q)?;
        self.x = x;
        self.p = p;
        Ok(())
    }

    /// Measurement update with Joseph-form covariance:
    /// P = (I − K·H)·P·(I − K·H)ᵗ + K·R·Kᵗ
    ///
    /// On error the filter is left untouched.
    pub fn update(&mut self, z: &Vector) -> Result<()> {
        if z.len() != self.dim_z {
            return Err(Error::DimensionMismatch {
                op: "kalman update",
                expected: (self.dim_z, 1),
                found: (z.len(), 1),
            });
        }

        let y = z.sub(&self.h.mul_vector(&self.x)?)?;
        let ht = self.h.transpose();
        let pht = self.p.mul(&ht)?;
        let s = self.h.mul(&pht)?.add(&self.r)?;
        let k = pht.mul(&s.inverse()?)?;

        let x = self.x.add(&k.mul_vector(&y)?)?;

        let i_kh = self.identity.sub(&k.mul(&self.h)?)?;
        let p = i_kh
            .mul(&self.p)?
            .mul(&i_kh.transpose())?
            .add(&k.mul(&self.r)?.mul(&k.transpose())?)?;

        self.x = x;
        self.p = p;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn constant_velocity_params() -> KalmanFilterParams {
        // 1D position tracking, state [position, velocity]
        KalmanFilterParams {
            dim_x: 2,
            dim_z: 1,
            x: Vector::from_slice(&[0.0, 1.0]),
            p: Matrix::from_diagonal(&[1000.0, 1000.0]),
            f: Matrix::from_rows(&[[1.0, 1.0], [0.0, 1.0]]).unwrap(),
            h: Matrix::from_rows(&[[1.0, 0.0]]).unwrap(),
            r: Matrix::from_diagonal(&[0.1]),
            q: Matrix::from_diagonal(&[0.01, 0.01]),
        }
    }

    #[test]
    fn test_predict_and_update() {
        let mut kf = KalmanFilter::new(constant_velocity_params()).unwrap();

        kf.predict().unwrap();
        assert_abs_diff_eq!(kf.state()[0], 1.0, epsilon = 1e-9);

        kf.update(&Vector::from_slice(&[0.9])).unwrap();
        // posterior lies between prediction and measurement, close to the measurement
        assert!(kf.state()[0] > 0.9 && kf.state()[0] < 1.0);
    }

    #[test]
    fn test_covariance_stays_symmetric() {
        let mut kf = KalmanFilter::new(constant_velocity_params()).unwrap();
        for step in 0..50 {
            kf.predict().unwrap();
            kf.update(&Vector::from_slice(&[step as f64 * 1.1])).unwrap();
        }
        let p = kf.covariance();
        assert_abs_diff_eq!(p[(0, 1)], p[(1, 0)], epsilon = 1e-9);
        assert!(p[(0, 0)] > 0.0 && p[(1, 1)] > 0.0);
        // converges onto the true velocity
        assert_abs_diff_eq!(kf.state()[1], 1.1, epsilon = 0.05);
    }

    #[test]
    fn test_rejects_wrong_shapes() {
        let mut params = constant_velocity_params();
        params.h = Matrix::identity(2);
        assert_eq!(
            KalmanFilter::new(params).unwrap_err(),
            Error::FilterDimension {
                name: "measurement function H",
                expected: (1, 2),
                found: (2, 2),
            }
        );

        let mut params = constant_velocity_params();
        params.x = Vector::zeros(3);
        assert!(KalmanFilter::new(params).is_err());
    }

    #[test]
    fn test_update_wrong_measurement_length() {
        let mut kf = KalmanFilter::new(constant_velocity_params()).unwrap();
        let before = kf.state().clone();
        assert!(kf.update(&Vector::zeros(2)).is_err());
        assert_eq!(kf.state(), &before);
    }

    #[test]
    fn test_singular_innovation_reported() {
        let mut params = constant_velocity_params();
        params.p = Matrix::zeros(2, 2);
        params.q = Matrix::zeros(2, 2);
        params.r = Matrix::zeros(1, 1);
        let mut kf = KalmanFilter::new(params).unwrap();
        assert!(matches!(
            kf.update(&Vector::from_slice(&[1.0])),
            Err(Error::Singular { .. })
        ));
        assert_eq!(kf.state().to_vec(), vec![0.0, 1.0]);
    }
}
