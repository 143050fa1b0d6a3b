//! Approach detection from the growth trend of a track's bounding box.
//!
//! A vehicle driving towards the camera grows in both width and height at a
//! rate proportional to its apparent size. A vehicle turning towards the
//! camera can instead grow taller while its width shrinks fast. Both patterns
//! count as approaching.

use ndarray::Array1;

use crate::tracker::BoundingBox;

/// Linear trend of box size over the classification window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendEstimate {
    pub width_slope: f64,
    pub height_slope: f64,
    pub avg_height: f64,
}

impl TrendEstimate {
    /// Width slope scaled by the apparent size of the object.
    pub fn weighted_width_slope(&self) -> f64 {
        self.width_slope * self.avg_height
    }

    /// Height slope scaled by the apparent size of the object.
    pub fn weighted_height_slope(&self) -> f64 {
        self.height_slope * self.avg_height
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApproachState {
    pub approaching: bool,
}

#[derive(Debug, Clone)]
pub struct ApproachClassifier {
    /// Number of most recent boxes the trend is fitted on; at least 1
    pub depth: usize,
    /// Minimum size-weighted growth per frame
    pub threshold: f64,
}

impl Default for ApproachClassifier {
    fn default() -> Self {
        Self {
            depth: 25,
            threshold: 4.0,
        }
    }
}

impl ApproachClassifier {
    pub fn new(depth: usize, threshold: f64) -> Self {
        Self { depth, threshold }
    }

    /// Fit the trend over the last `depth` boxes; `None` while the history is shorter.
    pub fn trend(&self, history: &[BoundingBox]) -> Option<TrendEstimate> {
        if self.depth == 0 || history.len() < self.depth {
            return None;
        }

        let window = &history[history.len() - self.depth..];
        let widths: Array1<f64> = window.iter().map(|b| b.width() as f64).collect();
        let heights: Array1<f64> = window.iter().map(|b| b.height() as f64).collect();

        Some(TrendEstimate {
            width_slope: least_squares_slope(&widths),
            height_slope: least_squares_slope(&heights),
            avg_height: heights.mean().unwrap_or(0.0),
        })
    }

    pub fn classify(&self, history: &[BoundingBox]) -> ApproachState {
        let approaching = self
            .trend(history)
            .is_some_and(|trend| self.is_approaching(&trend));
        ApproachState { approaching }
    }

    fn is_approaching(&self, trend: &TrendEstimate) -> bool {
        let hw = trend.weighted_height_slope();
        let ww = trend.weighted_width_slope();

        let growing = ww > self.threshold && ww > 0.5 * hw;
        let turning = ww < -10.0 * hw;
        hw > self.threshold && (growing || turning)
    }
}

/// Ordinary least-squares slope of `values` against their index.
fn least_squares_slope(values: &Array1<f64>) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }

    let xs = Array1::range(0.0, n as f64, 1.0);
    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = values.mean().unwrap_or(0.0);

    let dx = xs - x_mean;
    let dy = values - y_mean;
    dx.dot(&dy) / dx.dot(&dx)
}
