//! SORT: Kalman prediction plus IoU assignment, one update per frame.

use crate::tracker::bbox::BoundingBox;
use crate::tracker::kalman_filter::KalmanFilter;
use crate::tracker::kalman_track::KalmanTrack;
use crate::tracker::matching::{self, AssignmentResult, Detection};
use crate::tracker::{TrackAssociator, TrackId, TrackRecord};

/// Configuration for the SortTracker.
#[derive(Debug, Clone)]
pub struct SortConfig {
    /// Frames a track survives without a matched detection
    pub max_age: u32,
    /// Consecutive matches before a track is reported
    pub min_hits: u32,
    /// Minimum IoU for a detection to match a track
    pub iou_threshold: f32,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            max_age: 3,
            min_hits: 3,
            iou_threshold: 0.4,
        }
    }
}

pub struct SortTracker {
    tracks: Vec<KalmanTrack>,
    frame_count: u32,
    next_id: TrackId,
    config: SortConfig,
    kalman_filter: KalmanFilter,
}

impl SortTracker {
    pub fn new(config: SortConfig) -> Self {
        Self {
            tracks: Vec::new(),
            frame_count: 0,
            next_id: 1,
            config,
            kalman_filter: KalmanFilter::default(),
        }
    }

    pub fn config(&self) -> &SortConfig {
        &self.config
    }

    /// Number of tracks alive inside the tracker, reported or not.
    pub fn live_tracks(&self) -> usize {
        self.tracks.len()
    }

    pub fn update(&mut self, detections: &[Detection]) -> Vec<TrackRecord> {
        self.frame_count += 1;

        // Step 1: Predict, dropping tracks whose state went invalid
        let mut predicted = Vec::with_capacity(self.tracks.len());
        let kalman_filter = &self.kalman_filter;
        self.tracks.retain_mut(|track| match track.predict(kalman_filter) {
            Some(bbox) => {
                predicted.push(bbox);
                true
            }
            None => {
                tracing::debug!(track_id = track.track_id, "dropping track with invalid prediction");
                false
            }
        });

        // Step 2: Associate detections with predictions
        let det_boxes: Vec<BoundingBox> = detections.iter().map(|d| d.bbox).collect();
        let AssignmentResult {
            matches,
            unmatched_detections,
            ..
        } = matching::associate(&det_boxes, &predicted, self.config.iou_threshold);

        for (idet, itrack) in matches {
            self.tracks[itrack].update(&det_boxes[idet], &self.kalman_filter);
        }

        // Step 3: Start new tracks for unmatched detections
        for idet in unmatched_detections {
            let track = KalmanTrack::new(self.next_id, &det_boxes[idet], &self.kalman_filter);
            self.next_id += 1;
            self.tracks.push(track);
        }

        // Step 4: Report confirmed tracks matched this frame
        let warming_up = self.frame_count <= self.config.min_hits;
        let records = self
            .tracks
            .iter()
            .filter(|t| t.time_since_update == 0)
            .filter(|t| warming_up || t.hit_streak >= self.config.min_hits)
            .filter_map(|t| {
                t.bbox().map(|bbox| TrackRecord {
                    bbox,
                    track_id: t.track_id,
                })
            })
            .collect();

        // Step 5: Forget stale tracks
        let max_age = self.config.max_age;
        self.tracks.retain(|t| t.time_since_update <= max_age);

        records
    }
}

impl Default for SortTracker {
    fn default() -> Self {
        Self::new(SortConfig::default())
    }
}

impl TrackAssociator for SortTracker {
    fn associate(&mut self, detections: &[Detection]) -> Vec<TrackRecord> {
        self.update(detections)
    }
}
