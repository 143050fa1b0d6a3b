//! Builder for creating Detection objects from various box formats.

use crate::tracker::{BoundingBox, Detection};

/// Builder for creating `Detection` objects from various input formats.
#[derive(Debug, Clone, Default)]
pub struct DetectionBuilder {
    bbox: BoundingBox,
    class_id: u32,
    score: f32,
}

impl DetectionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set bounding box in LTRB format (left, top, right, bottom).
    pub fn ltrb(mut self, left: f32, top: f32, right: f32, bottom: f32) -> Self {
        self.bbox = BoundingBox::new(left, top, right, bottom);
        self
    }

    /// Set bounding box in XYWH format (center_x, center_y, width, height).
    pub fn xywh(mut self, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        self.bbox = BoundingBox::new(cx - w / 2.0, cy - h / 2.0, cx + w / 2.0, cy + h / 2.0);
        self
    }

    /// Set bounding box in LTWH format (left, top, width, height).
    pub fn ltwh(mut self, left: f32, top: f32, w: f32, h: f32) -> Self {
        self.bbox = BoundingBox::from_ltwh(left, top, w, h);
        self
    }

    pub fn class_id(mut self, class_id: u32) -> Self {
        self.class_id = class_id;
        self
    }

    pub fn score(mut self, score: f32) -> Self {
        self.score = score;
        self
    }

    pub fn build(self) -> Detection {
        Detection::new(self.bbox, self.class_id, self.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection_builder() {
        let det = DetectionBuilder::new()
            .ltrb(10.0, 20.0, 50.0, 80.0)
            .class_id(2)
            .score(0.95)
            .build();

        assert_eq!(det.score, 0.95);
        assert_eq!(det.class_id, 2);
        assert_eq!(det.bbox.width(), 40.0);
    }

    #[test]
    fn test_center_format() {
        let det = DetectionBuilder::new().xywh(50.0, 50.0, 20.0, 10.0).build();
        assert_eq!(det.bbox, BoundingBox::new(40.0, 45.0, 60.0, 55.0));
    }
}
