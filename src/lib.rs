//! Vehicle tracking with approach detection for recorded video.
//!
//! Each frame goes through a detection source, the surviving detections are
//! associated into tracks, every track's box history is checked for an
//! "approaching" growth trend, and the frame is annotated with labels and
//! overlays before it is written out.

pub mod analysis;
pub mod config;
pub mod error;
pub mod integration;
pub mod render;
pub mod tracker;
pub mod video;

pub use analysis::{ApproachClassifier, ApproachState, TrackHistoryStore, TrendEstimate, filter_objects};
pub use error::{Error, Result};
pub use integration::{DetectionSource, FramePipeline, FrameReport, ReplayDetector};
pub use render::{AnnotationRenderer, LabelMap, Placement, TextExtent, place_label};
pub use tracker::{BoundingBox, Detection, SortConfig, SortTracker, TrackAssociator, TrackId, TrackRecord};
pub use video::{Frame, FrameSink, FrameSource};
