//! Frame input and output.
//!
//! Directories of still images are always supported; video files go through
//! OpenCV when the `opencv` feature is enabled.

mod image_sequence;
#[cfg(feature = "opencv")]
mod opencv_backend;

use std::path::Path;

use image::RgbImage;

#[cfg(not(feature = "opencv"))]
use crate::error::Error;
use crate::error::Result;

pub use image_sequence::{ImageSequenceSink, ImageSequenceSource};
#[cfg(feature = "opencv")]
pub use opencv_backend::{VideoFileSink, VideoFileSource};

/// A decoded frame.
#[derive(Debug, Clone)]
pub struct Frame {
    /// 1-based position in the stream
    pub index: u64,
    /// Presentation time in milliseconds
    pub timestamp_ms: f64,
    pub image: RgbImage,
}

impl Frame {
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

pub trait FrameSource {
    fn frame_rate(&self) -> f64;

    /// Total frames in the stream, if the container knows it.
    fn frame_count(&self) -> Option<u64>;

    /// `(width, height)` of every frame.
    fn dimensions(&self) -> (u32, u32);

    /// Next frame, or `None` once the stream is exhausted.
    fn read_frame(&mut self) -> Result<Option<Frame>>;

    /// Release the underlying decoder. Further reads return `None`.
    fn release(&mut self) -> Result<()>;
}

pub trait FrameSink {
    fn write_frame(&mut self, frame: &Frame) -> Result<()>;

    /// Flush and release the underlying encoder.
    fn release(&mut self) -> Result<()>;
}

/// Open `path` as a frame source: a directory of images, or a video file.
pub fn open_source(path: &Path, fallback_fps: f64) -> Result<Box<dyn FrameSource>> {
    if path.is_dir() {
        return Ok(Box::new(ImageSequenceSource::open(path, fallback_fps)?));
    }

    #[cfg(feature = "opencv")]
    {
        Ok(Box::new(VideoFileSource::open(path)?))
    }
    #[cfg(not(feature = "opencv"))]
    {
        if path.exists() {
            Err(Error::UnsupportedInput(path.to_path_buf()))
        } else {
            Err(Error::SourceOpen {
                path: path.to_path_buf(),
                reason: "no such file or directory".to_string(),
            })
        }
    }
}

/// Open a sink matching the source's frame rate and size.
///
/// Paths without an extension, or existing directories, receive numbered PNG
/// frames; anything else is encoded as a video file.
pub fn open_sink(path: &Path, frame_rate: f64, dimensions: (u32, u32)) -> Result<Box<dyn FrameSink>> {
    if path.is_dir() || path.extension().is_none() {
        return Ok(Box::new(ImageSequenceSink::create(path, dimensions)?));
    }

    #[cfg(feature = "opencv")]
    {
        Ok(Box::new(VideoFileSink::create(path, frame_rate, dimensions)?))
    }
    #[cfg(not(feature = "opencv"))]
    {
        let _ = frame_rate;
        Err(Error::UnsupportedInput(path.to_path_buf()))
    }
}
