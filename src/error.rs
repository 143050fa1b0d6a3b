//! Error type shared by the pipeline, the video backends and the detection sources.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to open video source {path}: {reason}")]
    SourceOpen { path: PathBuf, reason: String },

    #[error("failed to open video sink {path}: {reason}")]
    SinkOpen { path: PathBuf, reason: String },

    #[error("failed to read frame {index}: {reason}")]
    FrameRead { index: u64, reason: String },

    #[error("failed to write frame {index}: {reason}")]
    FrameWrite { index: u64, reason: String },

    #[error("frame {index} is {got:?}, sink expects {expected:?}")]
    FrameSize {
        index: u64,
        expected: (u32, u32),
        got: (u32, u32),
    },

    #[error("detection failed on frame {index}: {reason}")]
    Detection { index: u64, reason: String },

    #[error("failed to load detections from {path}: {reason}")]
    DetectionDump { path: PathBuf, reason: String },

    #[error("failed to load font {path}: {reason}")]
    Font { path: PathBuf, reason: String },

    #[error("unsupported input {0}: video files need the `opencv` feature")]
    UnsupportedInput(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[cfg(feature = "opencv")]
    #[error(transparent)]
    OpenCv(#[from] opencv::Error),
}
