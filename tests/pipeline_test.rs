use std::cell::RefCell;
use std::rc::Rc;

use approach_track_rs::integration::RunSummary;
use approach_track_rs::video::{ImageSequenceSink, ImageSequenceSource};
use approach_track_rs::{
    ApproachClassifier, BoundingBox, Detection, Error, Frame, FramePipeline, FrameSink,
    FrameSource, ReplayDetector, SortTracker, TrackAssociator, TrackRecord,
};
use image::{Rgb, RgbImage};

/// Associator replaying a fixed script of track records, one entry per frame.
struct ScriptedAssociator {
    script: Vec<Vec<TrackRecord>>,
    frame: usize,
    seen: Rc<RefCell<Vec<usize>>>,
}

impl ScriptedAssociator {
    fn new(script: Vec<Vec<TrackRecord>>) -> Self {
        Self {
            script,
            frame: 0,
            seen: Rc::default(),
        }
    }
}

impl TrackAssociator for ScriptedAssociator {
    fn associate(&mut self, detections: &[Detection]) -> Vec<TrackRecord> {
        self.seen.borrow_mut().push(detections.len());
        let records = self.script.get(self.frame).cloned().unwrap_or_default();
        self.frame += 1;
        records
    }
}

fn car(bbox: BoundingBox) -> Detection {
    Detection::new(bbox, 2, 0.9)
}

/// One track whose box grows by `dw` x `dh` pixels per frame.
fn growing_script(frames: usize, dw: f32, dh: f32) -> Vec<Vec<TrackRecord>> {
    (0..frames)
        .map(|i| {
            let i = i as f32;
            vec![TrackRecord {
                bbox: BoundingBox::from_ltwh(200.0, 150.0, 60.0 + dw * i, 40.0 + dh * i),
                track_id: 7,
            }]
        })
        .collect()
}

fn gray_frame() -> RgbImage {
    RgbImage::from_pixel(640, 480, Rgb([90, 90, 90]))
}

#[test]
fn test_history_grows_one_entry_per_frame() {
    let mut pipeline = FramePipeline::with_defaults(ScriptedAssociator::new(growing_script(12, 0.0, 0.0)), true);
    for _ in 0..12 {
        let mut image = gray_frame();
        pipeline.process_frame(&mut image, &[car(BoundingBox::new(0.0, 0.0, 10.0, 10.0))]);
    }
    assert_eq!(pipeline.history().history_of(7).len(), 12);
    assert_eq!(pipeline.history().len(), 1);
}

#[test]
fn test_approach_flagged_from_depth_onwards() {
    // Height grows 5 px per frame, width 3 px per frame.
    let mut pipeline = FramePipeline::with_defaults(ScriptedAssociator::new(growing_script(30, 3.0, 5.0)), true);

    for frame in 1..=30 {
        let mut image = gray_frame();
        let report = pipeline.process_frame(&mut image, &[car(BoundingBox::new(0.0, 0.0, 10.0, 10.0))]);
        assert_eq!(report.tracks.len(), 1);
        assert_eq!(report.tracks[0].approaching, frame >= 25, "frame {frame}");
        assert_eq!(report.any_approaching, frame >= 25);

        // Alert border drawn only while something approaches
        let corner = *image.get_pixel(2, 2);
        assert_eq!(corner == Rgb([255, 0, 0]), frame >= 25, "frame {frame}");
    }
}

#[test]
fn test_height_growth_with_constant_width_is_not_approaching() {
    let mut pipeline = FramePipeline::with_defaults(ScriptedAssociator::new(growing_script(30, 0.0, 5.0)), true);
    for _ in 0..30 {
        let mut image = gray_frame();
        let report = pipeline.process_frame(&mut image, &[car(BoundingBox::new(0.0, 0.0, 10.0, 10.0))]);
        assert!(!report.any_approaching);
    }
}

#[test]
fn test_frame_without_surviving_detections_is_untouched() {
    let associator = ScriptedAssociator::new(vec![Vec::new()]);
    let seen = Rc::clone(&associator.seen);
    let mut pipeline = FramePipeline::with_defaults(associator, true);

    // Only a person, which is filtered out
    let person = Detection::new(BoundingBox::new(10.0, 10.0, 50.0, 90.0), 0, 0.95);
    let mut image = gray_frame();
    let report = pipeline.process_frame(&mut image, &[person]);

    assert_eq!(*seen.borrow(), vec![0]);
    assert!(report.tracks.is_empty());
    assert!(pipeline.history().is_empty());
    assert_eq!(image, gray_frame());
}

#[test]
fn test_detection_mode_labels_use_class_ids_without_names() {
    let mut pipeline = FramePipeline::with_defaults(ScriptedAssociator::new(Vec::new()), false);
    let mut image = gray_frame();
    let det = Detection::new(BoundingBox::new(100.0, 100.0, 180.0, 160.0), 3, 0.9);
    let report = pipeline.process_frame(&mut image, &[det]);

    assert_eq!(report.labels.len(), 1);
    let name = report.labels[0].split(' ').next().unwrap();
    assert_eq!(name, "3");
    assert_eq!(report.labels[0], "3 0.90");
    // Detection outline in the plain detection color
    assert_eq!(*image.get_pixel(100, 130), Rgb([0, 0, 255]));

    // Label text is rendered onto the white box above the detection
    let label_box = (80..100).flat_map(|y| (100..160).map(move |x| (x, y)));
    let inked = label_box
        .map(|(x, y)| *image.get_pixel(x, y))
        .filter(|p| ![Rgb([255, 255, 255]), Rgb([90, 90, 90]), Rgb([0, 0, 255])].contains(p))
        .count();
    assert!(inked > 0);
}

fn write_frames(dir: &std::path::Path, count: usize) {
    for i in 0..count {
        gray_frame().save(dir.join(format!("{i:04}.png"))).unwrap();
    }
}

#[test]
fn test_run_over_image_sequence() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_frames(input.path(), 6);

    let dets = (0..6)
        .map(|i| {
            let x = 100.0 + 4.0 * i as f32;
            vec![
                car(BoundingBox::new(x, 100.0, x + 80.0, 160.0)),
                Detection::new(BoundingBox::new(400.0, 50.0, 420.0, 90.0), 0, 0.99),
            ]
        })
        .collect();
    let mut detector = ReplayDetector::from_frames(dets, 0.55);

    let mut source = ImageSequenceSource::open(input.path(), 30.0).unwrap();
    let mut sink = ImageSequenceSink::create(output.path(), source.dimensions()).unwrap();

    let mut pipeline = FramePipeline::with_defaults(SortTracker::default(), true);
    let summary = pipeline.run(&mut source, &mut sink, &mut detector).unwrap();

    assert_eq!(
        summary,
        RunSummary {
            frames: 6,
            alert_frames: 0,
            tracks_seen: 1,
            history_entries: 6,
        }
    );
    assert_eq!(pipeline.associator().live_tracks(), 1);
    assert_eq!(sink.written(), 6);
    assert!(sink.frame_path(6).exists());
}

/// Source that yields blank frames and records whether it was released.
struct CountingSource {
    remaining: u64,
    next: u64,
    released: Rc<RefCell<bool>>,
}

impl FrameSource for CountingSource {
    fn frame_rate(&self) -> f64 {
        30.0
    }

    fn frame_count(&self) -> Option<u64> {
        None
    }

    fn dimensions(&self) -> (u32, u32) {
        (64, 48)
    }

    fn read_frame(&mut self) -> approach_track_rs::Result<Option<Frame>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        self.next += 1;
        Ok(Some(Frame {
            index: self.next,
            timestamp_ms: 0.0,
            image: RgbImage::new(64, 48),
        }))
    }

    fn release(&mut self) -> approach_track_rs::Result<()> {
        *self.released.borrow_mut() = true;
        Ok(())
    }
}

#[derive(Default)]
struct CollectingSink {
    frames: Vec<u64>,
    released: bool,
}

impl FrameSink for CollectingSink {
    fn write_frame(&mut self, frame: &Frame) -> approach_track_rs::Result<()> {
        self.frames.push(frame.index);
        Ok(())
    }

    fn release(&mut self) -> approach_track_rs::Result<()> {
        self.released = true;
        Ok(())
    }
}

#[test]
fn test_detection_failure_aborts_and_releases() {
    let released = Rc::new(RefCell::new(false));
    let mut source = CountingSource {
        remaining: 5,
        next: 0,
        released: Rc::clone(&released),
    };
    let mut sink = CollectingSink::default();
    // Detections for two frames only
    let mut detector = ReplayDetector::from_frames(vec![Vec::new(), Vec::new()], 0.5);

    let mut pipeline = FramePipeline::with_defaults(SortTracker::default(), true);
    let err = pipeline.run(&mut source, &mut sink, &mut detector).unwrap_err();

    assert!(matches!(err, Error::Detection { index: 3, .. }));
    assert_eq!(sink.frames, vec![1, 2]);
    assert!(sink.released);
    assert!(*released.borrow());
}

#[test]
fn test_missing_source_fails_to_open() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.mp4");
    let err = approach_track_rs::video::open_source(&missing, 30.0).err().unwrap();
    assert!(matches!(err, Error::SourceOpen { .. }));
}

#[test]
fn test_custom_classifier_depth() {
    let classifier = ApproachClassifier::new(5, 4.0);
    let mut pipeline = FramePipeline::new(
        ScriptedAssociator::new(growing_script(6, 3.0, 5.0)),
        classifier,
        Default::default(),
        Default::default(),
        true,
    );
    let flags: Vec<bool> = (0..6)
        .map(|_| {
            let mut image = gray_frame();
            pipeline
                .process_frame(&mut image, &[car(BoundingBox::new(0.0, 0.0, 10.0, 10.0))])
                .any_approaching
        })
        .collect();
    assert_eq!(flags, vec![false, false, false, false, true, true]);
}
