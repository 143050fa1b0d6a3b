mod bbox;
mod kalman_filter;
mod kalman_track;
mod matching;
mod sort_tracker;

pub use bbox::{BoundingBox, iou_batch};
pub use matching::{AssignmentResult, Detection, associate, linear_assignment};
pub use sort_tracker::{SortConfig, SortTracker};

/// Opaque track identifier, stable for the lifetime of a track.
pub type TrackId = u64;

/// One live track as reported by an associator for the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackRecord {
    pub bbox: BoundingBox,
    pub track_id: TrackId,
}

/// Maps each frame's detections to persistent track identities.
///
/// Called exactly once per frame, also when the frame has no detections.
/// Class ids are ignored; only boxes and scores take part in association.
/// The output need not be one-to-one with the input: tracks may be held back
/// until confirmed, or reported without a detection.
pub trait TrackAssociator {
    fn associate(&mut self, detections: &[Detection]) -> Vec<TrackRecord>;
}

impl<T: TrackAssociator + ?Sized> TrackAssociator for Box<T> {
    fn associate(&mut self, detections: &[Detection]) -> Vec<TrackRecord> {
        (**self).associate(detections)
    }
}
