//! Command-line configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::analysis::ApproachClassifier;
use crate::tracker::SortConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Track vehicles in a video and flag the ones approaching the camera.
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct RunConfig {
    /// Detection dump replayed as the detector output (JSON lines, one frame per line)
    #[arg(short, long)]
    pub model: PathBuf,

    /// Source video file, or a directory of frame images
    #[arg(short, long)]
    pub input: PathBuf,

    /// Labels file mapping class ids to names
    #[arg(short, long)]
    pub labels: Option<PathBuf>,

    /// Score threshold for detected objects
    #[arg(short, long, default_value_t = 0.55)]
    pub threshold: f32,

    /// Destination video file, or a directory for numbered frames
    #[arg(short, long)]
    pub output: PathBuf,

    /// 0 = plain detections, 1 = tracking with approach detection
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(0..=1))]
    pub tracking: u8,

    /// Frames a track is kept alive without associated detections
    #[arg(long, alias = "max_age", default_value_t = 3)]
    pub max_age: u32,

    /// Associated detections needed before a track is reported
    #[arg(long, alias = "min_hits", default_value_t = 3)]
    pub min_hits: u32,

    /// Minimum IoU for a detection to match a track
    #[arg(long, alias = "iou_threshold", default_value_t = 0.4)]
    pub iou_threshold: f32,

    /// Number of recent boxes the approach trend is fitted on
    #[arg(
        long,
        alias = "approach_tracking_depth",
        default_value_t = 25,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub approach_tracking_depth: u32,

    /// Minimum size-weighted growth per frame to call a track approaching
    #[arg(long, alias = "approach_tracking_threshold", default_value_t = 4.0)]
    pub approach_tracking_threshold: f64,

    /// Frame rate assumed for image directory input
    #[arg(long, default_value_t = 30.0)]
    pub fps: f64,

    /// TrueType font for label text, replacing the bundled face
    #[arg(long)]
    pub font: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl RunConfig {
    pub fn tracking_enabled(&self) -> bool {
        self.tracking == 1
    }

    pub fn sort_config(&self) -> SortConfig {
        SortConfig {
            max_age: self.max_age,
            min_hits: self.min_hits,
            iou_threshold: self.iou_threshold,
        }
    }

    pub fn classifier(&self) -> ApproachClassifier {
        ApproachClassifier::new(
            self.approach_tracking_depth as usize,
            self.approach_tracking_threshold,
        )
    }
}
