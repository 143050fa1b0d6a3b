//! A single tracked object driven by its own Kalman filter state.

use ndarray::{Array1, Array2};

use crate::tracker::TrackId;
use crate::tracker::bbox::BoundingBox;
use crate::tracker::kalman_filter::KalmanFilter;

#[derive(Debug, Clone)]
pub struct KalmanTrack {
    /// Identifier handed out by the owning tracker
    pub track_id: TrackId,
    /// Total number of matched detections
    pub hits: u32,
    /// Consecutive frames with a matched detection
    pub hit_streak: u32,
    /// Frames since the track was created
    pub age: u32,
    /// Frames since the last matched detection
    pub time_since_update: u32,
    mean: Array1<f64>,
    covariance: Array2<f64>,
}

fn measurement(bbox: &BoundingBox) -> [f64; 4] {
    let z = bbox.to_center_area();
    [z[0] as f64, z[1] as f64, z[2] as f64, z[3] as f64]
}

impl KalmanTrack {
    pub fn new(track_id: TrackId, bbox: &BoundingBox, kalman_filter: &KalmanFilter) -> Self {
        let (mean, covariance) = kalman_filter.initiate(measurement(bbox));
        Self {
            track_id,
            hits: 0,
            hit_streak: 0,
            age: 0,
            time_since_update: 0,
            mean,
            covariance,
        }
    }

    /// Current filtered box, `None` once the state no longer describes a box.
    pub fn bbox(&self) -> Option<BoundingBox> {
        BoundingBox::from_center_area(
            self.mean[0] as f32,
            self.mean[1] as f32,
            self.mean[2] as f32,
            self.mean[3] as f32,
        )
        .filter(BoundingBox::is_finite)
    }

    /// Advance the state one frame and return the predicted box.
    pub fn predict(&mut self, kalman_filter: &KalmanFilter) -> Option<BoundingBox> {
        // Never let the predicted area go negative.
        if self.mean[6] + self.mean[2] <= 0.0 {
            self.mean[6] = 0.0;
        }

        let (mean, covariance) = kalman_filter.predict(&self.mean, &self.covariance);
        self.mean = mean;
        self.covariance = covariance;

        self.age += 1;
        if self.time_since_update > 0 {
            self.hit_streak = 0;
        }
        self.time_since_update += 1;

        self.bbox()
    }

    /// Correct the state with a matched detection box.
    pub fn update(&mut self, bbox: &BoundingBox, kalman_filter: &KalmanFilter) {
        self.time_since_update = 0;
        self.hits += 1;
        self.hit_streak += 1;

        match kalman_filter.update(&self.mean, &self.covariance, measurement(bbox)) {
            Some((mean, covariance)) => {
                self.mean = mean;
                self.covariance = covariance;
            }
            None => tracing::warn!(
                track_id = self.track_id,
                "singular innovation covariance, keeping prediction"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_track_reports_its_box() {
        let kf = KalmanFilter::new();
        let bbox = BoundingBox::new(10.0, 20.0, 50.0, 100.0);
        let track = KalmanTrack::new(7, &bbox, &kf);

        let state = track.bbox().unwrap();
        assert!((state.left - 10.0).abs() < 1e-3);
        assert!((state.bottom - 100.0).abs() < 1e-3);
        assert_eq!(track.track_id, 7);
        assert_eq!(track.hit_streak, 0);
    }

    #[test]
    fn test_missed_frame_resets_streak() {
        let kf = KalmanFilter::new();
        let bbox = BoundingBox::new(10.0, 20.0, 50.0, 100.0);
        let mut track = KalmanTrack::new(1, &bbox, &kf);

        track.predict(&kf);
        track.update(&bbox, &kf);
        track.predict(&kf);
        track.update(&bbox, &kf);
        assert_eq!(track.hit_streak, 2);

        track.predict(&kf);
        track.predict(&kf);
        assert_eq!(track.hit_streak, 0);
        assert_eq!(track.time_since_update, 2);
        assert_eq!(track.age, 4);
    }
}
