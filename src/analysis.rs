//! Per-frame analysis of detections and tracks: class filtering, history and approach detection.

mod classifier;
mod filter;
mod history;

pub use classifier::{ApproachClassifier, ApproachState, TrendEstimate};
pub use filter::{DETECTED_CLASSES, TRACKED_CLASSES, filter_objects};
pub use history::TrackHistoryStore;
