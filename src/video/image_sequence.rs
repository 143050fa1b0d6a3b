use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::video::{Frame, FrameSink, FrameSource};

const FRAME_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Reads the images of a directory, in file name order, as consecutive frames.
#[derive(Debug)]
pub struct ImageSequenceSource {
    frames: Vec<PathBuf>,
    next: usize,
    frame_rate: f64,
    dimensions: (u32, u32),
}

impl ImageSequenceSource {
    pub fn open(dir: &Path, frame_rate: f64) -> Result<Self> {
        let open_error = |reason: String| Error::SourceOpen {
            path: dir.to_path_buf(),
            reason,
        };

        let mut frames: Vec<PathBuf> = std::fs::read_dir(dir)
            .map_err(|e| open_error(e.to_string()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| FRAME_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
            })
            .collect();
        frames.sort();

        let first = frames
            .first()
            .ok_or_else(|| open_error("directory contains no frames".to_string()))?;
        let dimensions = image::image_dimensions(first).map_err(|e| open_error(e.to_string()))?;

        if frame_rate <= 0.0 {
            return Err(open_error(format!("invalid frame rate {frame_rate}")));
        }

        Ok(Self {
            frames,
            next: 0,
            frame_rate,
            dimensions,
        })
    }
}

impl FrameSource for ImageSequenceSource {
    fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    fn frame_count(&self) -> Option<u64> {
        Some(self.frames.len() as u64)
    }

    fn dimensions(&self) -> (u32, u32) {
        self.dimensions
    }

    fn read_frame(&mut self) -> Result<Option<Frame>> {
        let Some(path) = self.frames.get(self.next) else {
            return Ok(None);
        };
        let index = self.next as u64 + 1;

        let image = image::open(path)
            .map_err(|e| Error::FrameRead {
                index,
                reason: format!("{}: {e}", path.display()),
            })?
            .to_rgb8();
        self.next += 1;

        Ok(Some(Frame {
            index,
            timestamp_ms: (index - 1) as f64 * 1000.0 / self.frame_rate,
            image,
        }))
    }

    fn release(&mut self) -> Result<()> {
        self.next = self.frames.len();
        Ok(())
    }
}

/// Writes frames as numbered PNG files into a directory.
#[derive(Debug)]
pub struct ImageSequenceSink {
    dir: PathBuf,
    dimensions: (u32, u32),
    written: u64,
}

impl ImageSequenceSink {
    pub fn create(dir: &Path, dimensions: (u32, u32)) -> Result<Self> {
        std::fs::create_dir_all(dir).map_err(|e| Error::SinkOpen {
            path: dir.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            dir: dir.to_path_buf(),
            dimensions,
            written: 0,
        })
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn frame_path(&self, index: u64) -> PathBuf {
        self.dir.join(format!("frame_{index:06}.png"))
    }
}

impl FrameSink for ImageSequenceSink {
    fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        if frame.dimensions() != self.dimensions {
            return Err(Error::FrameSize {
                index: frame.index,
                expected: self.dimensions,
                got: frame.dimensions(),
            });
        }

        let path = self.frame_path(frame.index);
        frame.image.save(&path).map_err(|e| Error::FrameWrite {
            index: frame.index,
            reason: format!("{}: {e}", path.display()),
        })?;
        self.written += 1;
        Ok(())
    }

    fn release(&mut self) -> Result<()> {
        Ok(())
    }
}
