//! Detection-to-track matching on IoU.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::tracker::bbox::{BoundingBox, iou_batch};

/// A single detector output for the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Bounding box in LTRB format
    pub bbox: BoundingBox,
    /// Class index reported by the detector
    pub class_id: u32,
    /// Detection confidence score in [0, 1]
    pub score: f32,
}

impl Detection {
    pub fn new(bbox: BoundingBox, class_id: u32, score: f32) -> Self {
        Self {
            bbox,
            class_id,
            score,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AssignmentResult {
    /// `(detection index, track index)` pairs
    pub matches: Vec<(usize, usize)>,
    pub unmatched_detections: Vec<usize>,
    pub unmatched_tracks: Vec<usize>,
}

/// Match detections against predicted track boxes.
///
/// When every detection and every track has at most one candidate above the
/// threshold the pairing is read off directly; otherwise the assignment that
/// maximizes total IoU is solved. Pairs below `iou_threshold` stay unmatched.
pub fn associate(
    detections: &[BoundingBox],
    tracks: &[BoundingBox],
    iou_threshold: f32,
) -> AssignmentResult {
    if tracks.is_empty() {
        return AssignmentResult {
            unmatched_detections: (0..detections.len()).collect(),
            ..Default::default()
        };
    }
    if detections.is_empty() {
        return AssignmentResult {
            unmatched_tracks: (0..tracks.len()).collect(),
            ..Default::default()
        };
    }

    let ious = iou_batch(detections, tracks);
    let candidates = unique_pairs(&ious, iou_threshold)
        .unwrap_or_else(|| linear_assignment(&ious));

    let mut matches = Vec::new();
    let mut det_matched = vec![false; detections.len()];
    let mut trk_matched = vec![false; tracks.len()];
    for (d, t) in candidates {
        if ious[[d, t]] < iou_threshold {
            continue;
        }
        det_matched[d] = true;
        trk_matched[t] = true;
        matches.push((d, t));
    }

    AssignmentResult {
        matches,
        unmatched_detections: unset_indices(&det_matched),
        unmatched_tracks: unset_indices(&trk_matched),
    }
}

/// Pairs above the threshold if they are already one-to-one.
fn unique_pairs(ious: &Array2<f32>, iou_threshold: f32) -> Option<Vec<(usize, usize)>> {
    let (rows, cols) = ious.dim();
    let above = ious.mapv(|v| v > iou_threshold);

    let rows_unique = (0..rows).all(|i| above.row(i).iter().filter(|&&b| b).count() <= 1);
    let cols_unique = (0..cols).all(|j| above.column(j).iter().filter(|&&b| b).count() <= 1);
    if !(rows_unique && cols_unique) {
        return None;
    }

    let mut pairs = Vec::new();
    for i in 0..rows {
        for j in 0..cols {
            if above[[i, j]] {
                pairs.push((i, j));
            }
        }
    }
    Some(pairs)
}

/// Solve the IoU-maximizing assignment with LAPJV on a padded square cost matrix.
pub fn linear_assignment(ious: &Array2<f32>) -> Vec<(usize, usize)> {
    let (num_rows, num_cols) = ious.dim();
    if num_rows == 0 || num_cols == 0 {
        return Vec::new();
    }

    let size = num_rows.max(num_cols);
    let mut padded = Array2::<f64>::from_elem((size, size), 1.0);
    for i in 0..num_rows {
        for j in 0..num_cols {
            padded[[i, j]] = 1.0 - ious[[i, j]] as f64;
        }
    }

    match lapjv::lapjv(&padded) {
        Ok((row_to_col, _)) => row_to_col
            .iter()
            .enumerate()
            .filter(|&(row, &col)| row < num_rows && col < num_cols)
            .map(|(row, &col)| (row, col))
            .collect(),
        Err(err) => {
            tracing::warn!(?err, "linear assignment failed, leaving frame unmatched");
            Vec::new()
        }
    }
}

fn unset_indices(mask: &[bool]) -> Vec<usize> {
    mask.iter()
        .enumerate()
        .filter_map(|(i, &set)| if set { None } else { Some(i) })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f32, y: f32, size: f32) -> BoundingBox {
        BoundingBox::from_ltwh(x, y, size, size)
    }

    #[test]
    fn test_associate_without_tracks() {
        let dets = [square(0.0, 0.0, 10.0), square(50.0, 50.0, 10.0)];
        let result = associate(&dets, &[], 0.3);
        assert!(result.matches.is_empty());
        assert_eq!(result.unmatched_detections, vec![0, 1]);
    }

    #[test]
    fn test_associate_without_detections() {
        let tracks = [square(0.0, 0.0, 10.0)];
        let result = associate(&[], &tracks, 0.3);
        assert_eq!(result.unmatched_tracks, vec![0]);
    }

    #[test]
    fn test_associate_unique_overlaps() {
        let dets = [square(51.0, 50.0, 10.0), square(1.0, 0.0, 10.0)];
        let tracks = [square(0.0, 0.0, 10.0), square(50.0, 50.0, 10.0)];
        let result = associate(&dets, &tracks, 0.3);

        let mut matches = result.matches.clone();
        matches.sort();
        assert_eq!(matches, vec![(0, 1), (1, 0)]);
        assert!(result.unmatched_detections.is_empty());
        assert!(result.unmatched_tracks.is_empty());
    }

    #[test]
    fn test_associate_conflicting_overlaps() {
        // Both detections overlap track 0; the better overlap wins it.
        let dets = [square(2.0, 0.0, 10.0), square(0.0, 0.0, 10.0)];
        let tracks = [square(0.0, 0.0, 10.0), square(4.0, 0.0, 10.0)];
        let result = associate(&dets, &tracks, 0.3);

        let mut matches = result.matches.clone();
        matches.sort();
        assert_eq!(matches, vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn test_associate_below_threshold() {
        let dets = [square(8.0, 8.0, 10.0)];
        let tracks = [square(0.0, 0.0, 10.0)];
        let result = associate(&dets, &tracks, 0.4);
        assert!(result.matches.is_empty());
        assert_eq!(result.unmatched_detections, vec![0]);
        assert_eq!(result.unmatched_tracks, vec![0]);
    }
}
