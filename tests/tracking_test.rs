use approach_track_rs::{BoundingBox, Detection, SortConfig, SortTracker, TrackAssociator};

fn car(left: f32, top: f32, width: f32, height: f32) -> Detection {
    Detection::new(BoundingBox::from_ltwh(left, top, width, height), 2, 0.9)
}

#[test]
fn test_basic_tracking() {
    let mut tracker = SortTracker::new(SortConfig::default());

    // Frame 1: reported immediately while the tracker warms up
    let tracks1 = tracker.associate(&[car(100.0, 100.0, 100.0, 100.0)]);
    assert_eq!(tracks1.len(), 1);
    let id1 = tracks1[0].track_id;

    // Frames 2-6: same object moving steadily keeps its id
    for step in 1..=5 {
        let offset = 5.0 * step as f32;
        let tracks = tracker.associate(&[car(100.0 + offset, 100.0 + offset, 100.0, 100.0)]);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].track_id, id1);
    }

    // Frame 7: object missing, nothing reported
    assert!(tracker.associate(&[]).is_empty());

    // Frame 8: object back near its predicted position; the streak restarts
    let tracks8 = tracker.associate(&[car(135.0, 135.0, 100.0, 100.0)]);
    assert!(tracks8.is_empty());

    // Two more hits and the same id is reported again
    tracker.associate(&[car(140.0, 140.0, 100.0, 100.0)]);
    let tracks10 = tracker.associate(&[car(145.0, 145.0, 100.0, 100.0)]);
    assert_eq!(tracks10.len(), 1);
    assert_eq!(tracks10[0].track_id, id1);
}

#[test]
fn test_two_objects_keep_distinct_ids() {
    let mut tracker = SortTracker::default();
    let mut ids = Vec::new();

    for step in 0..10 {
        let x = step as f32 * 3.0;
        let mut tracks = tracker.associate(&[
            car(10.0 + x, 10.0, 50.0, 40.0),
            car(300.0 - x, 200.0, 60.0, 50.0),
        ]);
        assert_eq!(tracks.len(), 2, "frame {}", step + 1);
        tracks.sort_by(|a, b| a.bbox.left.total_cmp(&b.bbox.left));
        ids.push((tracks[0].track_id, tracks[1].track_id));
    }

    assert!(ids.iter().all(|&pair| pair == ids[0]));
    assert_ne!(ids[0].0, ids[0].1);
}

#[test]
fn test_same_input_same_ids() {
    let run = || {
        let mut tracker = SortTracker::default();
        (0..8)
            .flat_map(|step| {
                let x = step as f32 * 4.0;
                tracker.associate(&[car(x, 0.0, 40.0, 40.0), car(200.0, x, 40.0, 40.0)])
            })
            .map(|t| t.track_id)
            .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}

#[test]
fn test_unmatched_track_expires_after_max_age() {
    let mut tracker = SortTracker::new(SortConfig {
        max_age: 1,
        min_hits: 1,
        iou_threshold: 0.3,
    });

    let first = tracker.associate(&[car(0.0, 0.0, 50.0, 50.0)]);
    tracker.associate(&[]);
    tracker.associate(&[]);

    // The old track is gone; the same spot now starts a new identity,
    // reported once it has been matched min_hits times.
    assert!(tracker.associate(&[car(0.0, 0.0, 50.0, 50.0)]).is_empty());
    let again = tracker.associate(&[car(0.0, 0.0, 50.0, 50.0)]);
    assert_eq!(again.len(), 1);
    assert_ne!(again[0].track_id, first[0].track_id);
}
