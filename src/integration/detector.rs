//! Seam between frame decoding and whatever model produces detections.

use image::RgbImage;

use crate::tracker::Detection;

/// Produces the raw detections of one decoded frame.
///
/// The pipeline calls `detect` once per frame, in stream order. An error
/// aborts the run, so backends should only fail when the frame cannot be
/// processed at all.
///
/// ```ignore
/// use approach_track_rs::{BoundingBox, Detection, DetectionSource};
/// use image::RgbImage;
///
/// /// Reports one fixed car in every frame.
/// struct ParkedCar;
///
/// impl DetectionSource for ParkedCar {
///     type Error = std::convert::Infallible;
///
///     fn detect(&mut self, _frame: &RgbImage) -> Result<Vec<Detection>, Self::Error> {
///         Ok(vec![Detection::new(BoundingBox::new(10.0, 10.0, 90.0, 60.0), 2, 0.9)])
///     }
/// }
/// ```
pub trait DetectionSource {
    /// Error type for detection failures.
    type Error: std::fmt::Display;

    /// Run inference on one frame.
    ///
    /// Returned detections are expected to already respect the backend's
    /// score threshold; class filtering happens downstream.
    fn detect(&mut self, frame: &RgbImage) -> Result<Vec<Detection>, Self::Error>;
}
