//! FramePipeline: detection filtering, association, approach analysis and annotation per frame.

use std::time::Instant;

use image::RgbImage;

use super::DetectionSource;
use crate::analysis::{ApproachClassifier, TrackHistoryStore, filter_objects};
use crate::error::{Error, Result};
use crate::render::{
    APPROACHING_COLOR, AnnotationRenderer, DETECTION_COLOR, LABEL_BACKGROUND, LabelMap, TRACK_COLOR,
};
use crate::tracker::{Detection, TrackAssociator, TrackRecord};
use crate::video::{FrameSink, FrameSource};

/// A track reported for the current frame together with its analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzedTrack {
    pub record: TrackRecord,
    pub approaching: bool,
}

/// What happened to one frame.
#[derive(Debug, Clone, Default)]
pub struct FrameReport {
    /// Detections that survived class filtering
    pub detections: Vec<Detection>,
    /// Tracks reported by the associator, analyzed only in tracking mode
    pub tracks: Vec<AnalyzedTrack>,
    /// Label texts in drawing order
    pub labels: Vec<String>,
    /// Whether the alert border was drawn
    pub any_approaching: bool,
}

/// Totals for a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub alert_frames: u64,
    pub tracks_seen: usize,
    pub history_entries: usize,
}

/// Sequential per-frame processing around a track associator.
///
/// Owns the track history for the lifetime of the run.
pub struct FramePipeline<A: TrackAssociator> {
    associator: A,
    history: TrackHistoryStore,
    classifier: ApproachClassifier,
    renderer: AnnotationRenderer,
    labels: LabelMap,
    tracking_enabled: bool,
}

impl<A: TrackAssociator> FramePipeline<A> {
    pub fn new(
        associator: A,
        classifier: ApproachClassifier,
        renderer: AnnotationRenderer,
        labels: LabelMap,
        tracking_enabled: bool,
    ) -> Self {
        Self {
            associator,
            history: TrackHistoryStore::new(),
            classifier,
            renderer,
            labels,
            tracking_enabled,
        }
    }

    /// Pipeline with default classifier, no font and no label names.
    pub fn with_defaults(associator: A, tracking_enabled: bool) -> Self {
        Self::new(
            associator,
            ApproachClassifier::default(),
            AnnotationRenderer::default(),
            LabelMap::new(),
            tracking_enabled,
        )
    }

    /// Process one frame's raw detections and annotate `image` in place.
    pub fn process_frame(&mut self, image: &mut RgbImage, raw: &[Detection]) -> FrameReport {
        let detections = filter_objects(raw, self.tracking_enabled);
        let records = self.associator.associate(&detections);

        let mut report = FrameReport {
            detections,
            ..Default::default()
        };

        if !self.tracking_enabled {
            for det in &report.detections {
                let label = format!("{} {:.2}", self.labels.name_for(det.class_id), det.score);
                self.renderer
                    .draw_detection(image, &det.bbox, &label, LABEL_BACKGROUND, DETECTION_COLOR);
                report.labels.push(label);
            }
            report.tracks = records
                .into_iter()
                .map(|record| AnalyzedTrack {
                    record,
                    approaching: false,
                })
                .collect();
            return report;
        }

        for record in records {
            let bbox = record.bbox.rounded();
            self.history.append(record.track_id, bbox);

            let state = self.classifier.classify(self.history.history_of(record.track_id));
            let foreground = if state.approaching {
                report.any_approaching = true;
                tracing::debug!(track_id = record.track_id, "track approaching");
                APPROACHING_COLOR
            } else {
                TRACK_COLOR
            };

            let label = record.track_id.to_string();
            self.renderer
                .draw_detection(image, &bbox, &label, LABEL_BACKGROUND, foreground);
            report.labels.push(label);
            report.tracks.push(AnalyzedTrack {
                record: TrackRecord { bbox, ..record },
                approaching: state.approaching,
            });
        }

        if report.any_approaching {
            self.renderer.draw_alert_border(image);
        }

        report
    }

    /// Run every frame of `source` through detection and processing into `sink`.
    ///
    /// Any read, detection or write failure aborts the run. Source and sink
    /// are released on every exit path.
    pub fn run<D: DetectionSource>(
        &mut self,
        source: &mut dyn FrameSource,
        sink: &mut dyn FrameSink,
        detector: &mut D,
    ) -> Result<RunSummary> {
        let outcome = self.run_frames(source, sink, detector);
        let source_released = source.release();
        let sink_released = sink.release();

        let summary = outcome?;
        source_released?;
        sink_released?;
        Ok(summary)
    }

    fn run_frames<D: DetectionSource>(
        &mut self,
        source: &mut dyn FrameSource,
        sink: &mut dyn FrameSink,
        detector: &mut D,
    ) -> Result<RunSummary> {
        let start = Instant::now();
        let total_frames = source.frame_count();
        let frame_rate = source.frame_rate();
        let mut summary = RunSummary::default();

        while let Some(mut frame) = source.read_frame()? {
            let (width, height) = frame.dimensions();

            let inference_start = Instant::now();
            let raw = detector.detect(&frame.image).map_err(|e| Error::Detection {
                index: frame.index,
                reason: e.to_string(),
            })?;
            let inference_ms = inference_start.elapsed().as_secs_f64() * 1000.0;

            let report = self.process_frame(&mut frame.image, &raw);
            sink.write_frame(&frame)?;

            summary.frames += 1;
            if report.any_approaching {
                summary.alert_frames += 1;
            }

            let elapsed_s = start.elapsed().as_secs_f64();
            let speed = if elapsed_s > 0.0 {
                summary.frames as f64 / elapsed_s
            } else {
                0.0
            };
            tracing::info!(
                frame = frame.index,
                total = ?total_frames,
                timestamp_ms = frame.timestamp_ms,
                size = %format_args!("{width}x{height}"),
                fps = frame_rate,
                elapsed_s,
                inference_ms,
                speed,
                detections = report.detections.len(),
                tracks = report.tracks.len(),
                approaching = report.any_approaching,
                "processed frame"
            );
        }

        summary.tracks_seen = self.history.len();
        summary.history_entries = self.history.total_entries();
        Ok(summary)
    }

    pub fn history(&self) -> &TrackHistoryStore {
        &self.history
    }

    pub fn associator(&self) -> &A {
        &self.associator
    }
}
