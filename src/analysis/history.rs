use std::collections::HashMap;

use crate::tracker::{BoundingBox, TrackId};

/// Per-track bounding-box history for the whole run.
///
/// Entries are appended in frame order and never evicted, so memory grows
/// with the number of track sightings over the run.
#[derive(Debug, Default)]
pub struct TrackHistoryStore {
    tracks: HashMap<TrackId, Vec<BoundingBox>>,
}

impl TrackHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, track_id: TrackId, bbox: BoundingBox) {
        self.tracks.entry(track_id).or_default().push(bbox);
    }

    /// History of a track, oldest first; empty if the track was never seen.
    pub fn history_of(&self, track_id: TrackId) -> &[BoundingBox] {
        self.tracks.get(&track_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct tracks seen so far.
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Number of boxes held across all tracks.
    pub fn total_entries(&self) -> usize {
        self.tracks.values().map(Vec::len).sum()
    }
}
