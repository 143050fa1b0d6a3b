//! Integration of detection backends, the associator and the analysis stages.
//!
//! This module provides the detection source trait, a replaying detection
//! source, and the per-frame pipeline that ties everything together.

mod builder;
mod detector;
mod pipeline;
mod replay;

pub use builder::DetectionBuilder;
pub use detector::DetectionSource;
pub use pipeline::{AnalyzedTrack, FramePipeline, FrameReport, RunSummary};
pub use replay::{ReplayDetector, ReplayError};
