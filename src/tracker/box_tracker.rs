//! Kalman filter specialised to a constant-velocity bounding box model.
//!
//! State is `[cx, cy, s, r, vcx, vcy, vs]`: center, area `s = w * h`, aspect
//! ratio `r = w / h` and the velocities of the first three. The aspect ratio
//! has no velocity term.

use crate::error::Result;
use crate::linalg::{Matrix, Vector};
use crate::tracker::kalman_filter::{KalmanFilter, KalmanFilterParams};
use crate::tracker::rect::BoundingBox;

const DIM_X: usize = 7;
const DIM_Z: usize = 4;

/// Diagonal of the initial state covariance: the measured components start
/// moderately uncertain, the unobserved velocities very uncertain.
const INITIAL_COVARIANCE: [f64; DIM_X] = [10.0, 10.0, 10.0, 10.0, 1e4, 1e4, 1e4];

/// Noise settings for a [`KalmanBoxTracker`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxNoise {
    /// Diagonal of the measurement noise covariance,
    /// i.e. uncertainties of the (cx, cy, s, r) measurement
    pub measurement: [f64; DIM_Z],
    /// Diagonal of the process noise covariance,
    /// i.e. uncertainties of (cx, cy, s, r, vcx, vcy, vs) during transition
    pub process: [f64; DIM_X],
}

impl Default for BoxNoise {
    fn default() -> Self {
        Self {
            measurement: [1.0, 1.0, 10.0, 10.0],
            process: [1.0, 1.0, 1.0, 1.0, 0.01, 0.01, 0.0001],
        }
    }
}

/// Per-object motion model; owns one [`KalmanFilter`].
#[derive(Debug, Clone)]
pub struct KalmanBoxTracker {
    kf: KalmanFilter,
}

impl KalmanBoxTracker {
    /// Start a tracker at `bbox` with zero velocity.
    pub fn new(bbox: &BoundingBox, noise: &BoxNoise) -> Result<Self> {
        #[rustfmt::skip]
        let f = Matrix::from_row_slice(DIM_X, DIM_X, &[
            1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0,
            0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0,
            0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0,
        ])?;

        let mut h = Matrix::zeros(DIM_Z, DIM_X);
        for i in 0..DIM_Z {
            h[(i, i)] = 1.0;
        }

        let kf = KalmanFilter::new(KalmanFilterParams {
            dim_x: DIM_X,
            dim_z: DIM_Z,
            x: to_measurement(bbox).extend(&[0.0; DIM_X - DIM_Z]),
            p: Matrix::from_diagonal(&INITIAL_COVARIANCE),
            f,
            h,
            r: Matrix::from_diagonal(&noise.measurement),
            q: Matrix::from_diagonal(&noise.process),
        })?;

        Ok(Self { kf })
    }

    /// Advance the state one frame and return the predicted box.
    ///
    /// The area velocity is zeroed first if it would drive the area to zero
    /// or below.
    pub fn predict(&mut self) -> Result<BoundingBox> {
        let state = self.kf.state_mut();
        if state[6] + state[2] <= 0.0 {
            state[6] = 0.0;
        }
        self.kf.predict()?;
        Ok(self.bbox())
    }

    /// Correct the state with a matched detection.
    pub fn update(&mut self, bbox: &BoundingBox) -> Result<()> {
        self.kf.update(&to_measurement(bbox))
    }

    /// Current state estimate as a box.
    pub fn bbox(&self) -> BoundingBox {
        to_bbox(self.kf.state())
    }

    /// Raw 7-dimensional state.
    pub fn state(&self) -> &Vector {
        self.kf.state()
    }
}

/// Convert a box to the `[cx, cy, area, aspect]` measurement.
pub fn to_measurement(bbox: &BoundingBox) -> Vector {
    let (cx, cy) = bbox.center();
    let width = bbox.width as f64;
    let height = bbox.height as f64;
    let aspect = if height > 0.0 { width / height } else { 0.0 };
    Vector::from_vec(vec![cx as f64, cy as f64, width * height, aspect])
}

/// Convert a `[cx, cy, s, r, ..]` state back to a box.
///
/// `w = sqrt(s * r)`, `h = s / w`. A non-positive area or aspect collapses
/// to an empty box at the center rather than producing NaN.
pub fn to_bbox(state: &Vector) -> BoundingBox {
    let area = state[2].max(0.0);
    let aspect = state[3].max(0.0);
    let width = (area * aspect).sqrt();
    let height = if width > 0.0 { area / width } else { 0.0 };
    BoundingBox::from_center(state[0] as f32, state[1] as f32, width as f32, height as f32)
}
