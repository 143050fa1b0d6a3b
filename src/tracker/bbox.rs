use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in left-top-right-bottom format.
///
/// Boxes come straight from the detector or the tracker; `left <= right` and
/// `top <= bottom` are assumed, not checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl BoundingBox {
    #[inline]
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Create a box from its top-left corner and size.
    #[inline]
    pub fn from_ltwh(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self::new(left, top, left + width, top + height)
    }

    /// Create a box from center, area and aspect ratio (w/h), the Kalman measurement space.
    ///
    /// Returns `None` when the area or aspect ratio cannot describe a real box.
    pub fn from_center_area(cx: f32, cy: f32, area: f32, aspect: f32) -> Option<Self> {
        let width = (area * aspect).sqrt();
        if !width.is_finite() || width <= 0.0 {
            return None;
        }
        let height = area / width;
        Some(Self::new(
            cx - width / 2.0,
            cy - height / 2.0,
            cx + width / 2.0,
            cy + height / 2.0,
        ))
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    #[inline]
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    #[inline]
    pub fn center(&self) -> (f32, f32) {
        (
            self.left + self.width() / 2.0,
            self.top + self.height() / 2.0,
        )
    }

    /// Convert to `[cx, cy, area, aspect]`.
    pub fn to_center_area(&self) -> [f32; 4] {
        let (cx, cy) = self.center();
        let aspect = if self.height() > 0.0 {
            self.width() / self.height()
        } else {
            0.0
        };
        [cx, cy, self.area(), aspect]
    }

    /// Snap every edge to the nearest whole pixel.
    pub fn rounded(&self) -> Self {
        Self::new(
            self.left.round(),
            self.top.round(),
            self.right.round(),
            self.bottom.round(),
        )
    }

    pub fn is_finite(&self) -> bool {
        self.left.is_finite()
            && self.top.is_finite()
            && self.right.is_finite()
            && self.bottom.is_finite()
    }

    /// Intersection over union with another box; 0 when the union is empty.
    pub fn iou(&self, other: &BoundingBox) -> f32 {
        let x1 = self.left.max(other.left);
        let y1 = self.top.max(other.top);
        let x2 = self.right.min(other.right);
        let y2 = self.bottom.min(other.bottom);

        let inter_area = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
        let union_area = self.area() + other.area() - inter_area;

        if union_area > 0.0 {
            inter_area / union_area
        } else {
            0.0
        }
    }
}

/// IoU matrix of shape (M, N) for `boxes_a` (M) against `boxes_b` (N).
pub fn iou_batch(boxes_a: &[BoundingBox], boxes_b: &[BoundingBox]) -> Array2<f32> {
    let mut ious = Array2::zeros((boxes_a.len(), boxes_b.len()));
    for (i, a) in boxes_a.iter().enumerate() {
        for (j, b) in boxes_b.iter().enumerate() {
            ious[[i, j]] = a.iou(b);
        }
    }
    ious
}
