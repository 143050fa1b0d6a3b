use crate::tracker::Detection;

/// COCO classes of interest while tracking: car, motorcycle, bus, truck.
pub const TRACKED_CLASSES: [u32; 4] = [2, 3, 5, 7];

/// Plain detection mode also keeps bicycles.
pub const DETECTED_CLASSES: [u32; 5] = [1, 2, 3, 5, 7];

/// Keep only the detections of interesting classes, in their original order.
pub fn filter_objects(detections: &[Detection], tracking_enabled: bool) -> Vec<Detection> {
    let allowed: &[u32] = if tracking_enabled {
        &TRACKED_CLASSES
    } else {
        &DETECTED_CLASSES
    };

    detections
        .iter()
        .filter(|d| allowed.contains(&d.class_id))
        .copied()
        .collect()
}
