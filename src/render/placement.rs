//! Label placement around a box, independent of any drawing surface.

use crate::tracker::BoundingBox;

/// Integer pixel rectangle with inclusive corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl PixelRect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_bbox(bbox: &BoundingBox) -> Self {
        Self::new(
            bbox.left.round() as i32,
            bbox.top.round() as i32,
            bbox.right.round() as i32,
            bbox.bottom.round() as i32,
        )
    }
}

/// Rendered size of a label in pixels. `height` excludes the part below the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextExtent {
    pub width: i32,
    pub height: i32,
    pub baseline: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Filled box behind the label text
    pub background: PixelRect,
    /// Left end of the text baseline
    pub text_origin: (i32, i32),
    /// The annotated object's box
    pub foreground: PixelRect,
}

/// Place a label next to `bbox` so that it stays inside a `frame` of `(width, height)`.
///
/// Candidates are tried above-left, below-left, above-right and finally
/// below-right, which is taken even if it does not fit. Above candidates are
/// rejected when they cross the top or left edge, below candidates when they
/// cross the bottom or right edge.
pub fn place_label(bbox: PixelRect, extent: TextExtent, frame: (u32, u32)) -> Placement {
    let (frame_width, frame_height) = (frame.0 as i32, frame.1 as i32);
    let label_height = extent.height + extent.baseline;

    let above = |left: i32| {
        let background = PixelRect::new(
            left,
            bbox.top - label_height,
            left + extent.width,
            bbox.top,
        );
        (background, (left, bbox.top - extent.baseline))
    };
    let below = |left: i32| {
        let background = PixelRect::new(
            left,
            bbox.bottom,
            left + extent.width,
            bbox.bottom + label_height,
        );
        (background, (left, bbox.bottom + extent.height))
    };
    let clears_top_left = |r: &PixelRect| r.top >= 0 && r.left >= 0;
    let clears_bottom_right = |r: &PixelRect| r.bottom < frame_height && r.right < frame_width;

    let right_aligned = bbox.right - extent.width;
    let above_left = above(bbox.left);
    let below_left = below(bbox.left);
    let above_right = above(right_aligned);

    let (background, text_origin) = if clears_top_left(&above_left.0) {
        above_left
    } else if clears_bottom_right(&below_left.0) {
        below_left
    } else if clears_top_left(&above_right.0) {
        above_right
    } else {
        below(right_aligned)
    };

    Placement {
        background,
        text_origin,
        foreground: bbox,
    }
}
