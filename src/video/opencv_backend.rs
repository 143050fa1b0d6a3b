use std::path::{Path, PathBuf};

use image::RgbImage;
use opencv::core::{Mat, Size};
use opencv::imgproc;
use opencv::prelude::*;
use opencv::videoio::{self, VideoCapture, VideoWriter};

use crate::error::{Error, Result};
use crate::video::{Frame, FrameSink, FrameSource};

/// Decodes a video file with OpenCV. Released on drop.
pub struct VideoFileSource {
    capture: VideoCapture,
    path: PathBuf,
    frame_rate: f64,
    frame_count: Option<u64>,
    dimensions: (u32, u32),
    next_index: u64,
    released: bool,
}

impl VideoFileSource {
    pub fn open(path: &Path) -> Result<Self> {
        let open_error = |reason: String| Error::SourceOpen {
            path: path.to_path_buf(),
            reason,
        };

        let filename = path
            .to_str()
            .ok_or_else(|| open_error("path is not valid UTF-8".to_string()))?;
        let capture = VideoCapture::from_file(filename, videoio::CAP_ANY)?;
        if !capture.is_opened()? {
            return Err(open_error("decoder could not open the stream".to_string()));
        }

        let frame_rate = capture.get(videoio::CAP_PROP_FPS)?;
        let frame_count = capture.get(videoio::CAP_PROP_FRAME_COUNT)?;
        let width = capture.get(videoio::CAP_PROP_FRAME_WIDTH)? as u32;
        let height = capture.get(videoio::CAP_PROP_FRAME_HEIGHT)? as u32;

        Ok(Self {
            capture,
            path: path.to_path_buf(),
            frame_rate,
            frame_count: (frame_count > 0.0).then_some(frame_count as u64),
            dimensions: (width, height),
            next_index: 1,
            released: false,
        })
    }
}

impl FrameSource for VideoFileSource {
    fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    fn frame_count(&self) -> Option<u64> {
        self.frame_count
    }

    fn dimensions(&self) -> (u32, u32) {
        self.dimensions
    }

    fn read_frame(&mut self) -> Result<Option<Frame>> {
        if self.released {
            return Ok(None);
        }

        let index = self.next_index;
        // Position of the frame about to be decoded.
        let timestamp_ms = self.capture.get(videoio::CAP_PROP_POS_MSEC)?;
        let mut bgr = Mat::default();
        let read = self.capture.read(&mut bgr).map_err(|e| Error::FrameRead {
            index,
            reason: e.to_string(),
        })?;
        if !read || bgr.empty() {
            return Ok(None);
        }

        let image = bgr_to_rgb_image(&bgr)?.ok_or_else(|| Error::FrameRead {
            index,
            reason: format!("{}: unexpected pixel layout", self.path.display()),
        })?;
        self.next_index += 1;

        Ok(Some(Frame {
            index,
            timestamp_ms,
            image,
        }))
    }

    fn release(&mut self) -> Result<()> {
        if !self.released {
            self.released = true;
            self.capture.release()?;
        }
        Ok(())
    }
}

impl Drop for VideoFileSource {
    fn drop(&mut self) {
        if let Err(err) = self.release() {
            tracing::warn!(%err, path = %self.path.display(), "failed to release video source");
        }
    }
}

/// Encodes frames into an MP4 file with OpenCV. Released on drop.
pub struct VideoFileSink {
    writer: VideoWriter,
    path: PathBuf,
    dimensions: (u32, u32),
    released: bool,
}

impl VideoFileSink {
    pub fn create(path: &Path, frame_rate: f64, dimensions: (u32, u32)) -> Result<Self> {
        let open_error = |reason: String| Error::SinkOpen {
            path: path.to_path_buf(),
            reason,
        };

        let filename = path
            .to_str()
            .ok_or_else(|| open_error("path is not valid UTF-8".to_string()))?;
        let fourcc = VideoWriter::fourcc('m', 'p', '4', 'v')?;
        let size = Size::new(dimensions.0 as i32, dimensions.1 as i32);
        let writer = VideoWriter::new(filename, fourcc, frame_rate, size, true)?;
        if !writer.is_opened()? {
            return Err(open_error("encoder could not open the file".to_string()));
        }

        Ok(Self {
            writer,
            path: path.to_path_buf(),
            dimensions,
            released: false,
        })
    }
}

impl FrameSink for VideoFileSink {
    fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        if frame.dimensions() != self.dimensions {
            return Err(Error::FrameSize {
                index: frame.index,
                expected: self.dimensions,
                got: frame.dimensions(),
            });
        }

        let bgr = rgb_image_to_bgr(&frame.image)?;

        self.writer.write(&bgr).map_err(|e| Error::FrameWrite {
            index: frame.index,
            reason: e.to_string(),
        })
    }

    fn release(&mut self) -> Result<()> {
        if !self.released {
            self.released = true;
            self.writer.release()?;
        }
        Ok(())
    }
}

impl Drop for VideoFileSink {
    fn drop(&mut self) {
        if let Err(err) = self.release() {
            tracing::warn!(%err, path = %self.path.display(), "failed to release video sink");
        }
    }
}

/// Decoded BGR frame to an owned RGB image; `None` if the layout is not 8-bit, 3 channels.
fn bgr_to_rgb_image(bgr: &Mat) -> Result<Option<RgbImage>> {
    let mut rgb = Mat::default();
    imgproc::cvt_color_def(bgr, &mut rgb, imgproc::COLOR_BGR2RGB)?;

    let (width, height) = (rgb.cols() as u32, rgb.rows() as u32);
    let data = rgb.data_bytes()?.to_vec();
    Ok(RgbImage::from_vec(width, height, data))
}

fn rgb_image_to_bgr(image: &RgbImage) -> Result<Mat> {
    let flat = Mat::from_slice(image.as_raw())?;
    let rgb = flat.reshape(3, image.height() as i32)?;
    let mut bgr = Mat::default();
    imgproc::cvt_color_def(&*rgb, &mut bgr, imgproc::COLOR_RGB2BGR)?;
    Ok(bgr)
}
