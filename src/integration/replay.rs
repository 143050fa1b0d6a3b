//! Detection source that replays a recorded detection dump frame by frame.

use std::collections::VecDeque;
use std::path::Path;

use image::RgbImage;
use serde::Deserialize;

use super::{DetectionBuilder, DetectionSource};
use crate::error::{Error, Result};
use crate::tracker::Detection;

#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("detection dump has no entry for frame {frame}")]
    Exhausted { frame: u64 },
}

/// One detection as stored in the dump.
#[derive(Debug, Clone, Deserialize)]
struct RecordedDetection {
    /// `[left, top, right, bottom]`
    bbox: [f32; 4],
    class_id: u32,
    score: f32,
}

impl From<RecordedDetection> for Detection {
    fn from(rec: RecordedDetection) -> Self {
        let [left, top, right, bottom] = rec.bbox;
        DetectionBuilder::new()
            .ltrb(left, top, right, bottom)
            .class_id(rec.class_id)
            .score(rec.score)
            .build()
    }
}

/// Replays per-frame detections from a JSON-lines dump.
///
/// Line N holds a JSON array with the detections of frame N. Detections
/// scoring below `score_threshold` are dropped, like a live detector would.
#[derive(Debug)]
pub struct ReplayDetector {
    frames: VecDeque<Vec<Detection>>,
    score_threshold: f32,
    served: u64,
}

impl ReplayDetector {
    pub fn open(path: impl AsRef<Path>, score_threshold: f32) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| Error::DetectionDump {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut frames = Vec::new();
        for (line_no, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                frames.push(Vec::new());
                continue;
            }
            let records: Vec<RecordedDetection> =
                serde_json::from_str(line).map_err(|e| Error::DetectionDump {
                    path: path.to_path_buf(),
                    reason: format!("line {}: {e}", line_no + 1),
                })?;
            frames.push(records.into_iter().map(Detection::from).collect());
        }

        tracing::debug!(path = %path.display(), frames = frames.len(), "loaded detection dump");
        Ok(Self::from_frames(frames, score_threshold))
    }

    pub fn from_frames(frames: Vec<Vec<Detection>>, score_threshold: f32) -> Self {
        Self {
            frames: frames.into(),
            score_threshold,
            served: 0,
        }
    }

    /// Frames left to replay.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl DetectionSource for ReplayDetector {
    type Error = ReplayError;

    fn detect(&mut self, _frame: &RgbImage) -> std::result::Result<Vec<Detection>, Self::Error> {
        self.served += 1;
        let detections = self.frames.pop_front().ok_or(ReplayError::Exhausted {
            frame: self.served,
        })?;

        Ok(detections
            .into_iter()
            .filter(|d| d.score >= self.score_threshold)
            .collect())
    }
}
