//! Constant-velocity Kalman filter over `[cx, cy, area, aspect]` box measurements.
//!
//! State layout is `[cx, cy, s, r, vcx, vcy, vs]`; the aspect ratio `r` is
//! modelled as constant.

use ndarray::{Array1, Array2};

const STATE_DIM: usize = 7;
const MEASUREMENT_DIM: usize = 4;

#[derive(Debug, Clone)]
pub struct KalmanFilter {
    motion_mat: Array2<f64>,
    update_mat: Array2<f64>,
    measurement_noise: Array2<f64>,
    process_noise: Array2<f64>,
}

impl Default for KalmanFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl KalmanFilter {
    pub fn new() -> Self {
        let mut motion_mat = Array2::eye(STATE_DIM);
        for i in 0..3 {
            motion_mat[[i, MEASUREMENT_DIM + i]] = 1.0;
        }

        let mut update_mat = Array2::zeros((MEASUREMENT_DIM, STATE_DIM));
        for i in 0..MEASUREMENT_DIM {
            update_mat[[i, i]] = 1.0;
        }

        // Area and aspect measurements are much noisier than the center.
        let mut measurement_noise = Array2::eye(MEASUREMENT_DIM);
        measurement_noise[[2, 2]] = 10.0;
        measurement_noise[[3, 3]] = 10.0;

        let mut process_noise = Array2::eye(STATE_DIM);
        process_noise[[4, 4]] = 0.01;
        process_noise[[5, 5]] = 0.01;
        process_noise[[6, 6]] = 1e-4;

        Self {
            motion_mat,
            update_mat,
            measurement_noise,
            process_noise,
        }
    }

    /// Start a track from its first measurement; velocities are unknown.
    pub fn initiate(&self, measurement: [f64; 4]) -> (Array1<f64>, Array2<f64>) {
        let mut mean = Array1::zeros(STATE_DIM);
        for i in 0..MEASUREMENT_DIM {
            mean[i] = measurement[i];
        }

        let mut cov = Array2::eye(STATE_DIM) * 10.0;
        for i in MEASUREMENT_DIM..STATE_DIM {
            cov[[i, i]] = 10_000.0;
        }

        (mean, cov)
    }

    pub fn predict(
        &self,
        mean: &Array1<f64>,
        covariance: &Array2<f64>,
    ) -> (Array1<f64>, Array2<f64>) {
        let new_mean = self.motion_mat.dot(mean);
        let new_covariance =
            self.motion_mat.dot(covariance).dot(&self.motion_mat.t()) + &self.process_noise;

        (new_mean, new_covariance)
    }

    /// Correct the state with a measurement.
    ///
    /// Returns `None` if the innovation covariance is singular.
    pub fn update(
        &self,
        mean: &Array1<f64>,
        covariance: &Array2<f64>,
        measurement: [f64; 4],
    ) -> Option<(Array1<f64>, Array2<f64>)> {
        let projected_mean = self.update_mat.dot(mean);
        let projected_cov = self.update_mat.dot(covariance).dot(&self.update_mat.t())
            + &self.measurement_noise;

        let innovation = Array1::from_vec(measurement.to_vec()) - projected_mean;
        let s_inv = invert_4x4(&projected_cov)?;

        // K = P * H^T * S^-1
        let pht = covariance.dot(&self.update_mat.t());
        let kalman_gain = pht.dot(&s_inv);

        let new_mean = mean + &kalman_gain.dot(&innovation);
        let identity = Array2::<f64>::eye(STATE_DIM);
        let new_covariance = (identity - kalman_gain.dot(&self.update_mat)).dot(covariance);

        Some((new_mean, new_covariance))
    }
}

/// Invert a 4x4 matrix through nalgebra, avoiding a BLAS/LAPACK dependency.
fn invert_4x4(m: &Array2<f64>) -> Option<Array2<f64>> {
    let nm = nalgebra::Matrix4::from_fn(|i, j| m[[i, j]]);
    let inv = nm.try_inverse()?;
    Some(Array2::from_shape_fn((4, 4), |(i, j)| inv[(i, j)]))
}
