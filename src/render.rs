//! Frame annotation: label placement, label names and drawing.

mod annotator;
mod labels;
mod placement;

pub use annotator::{
    ALERT_BORDER_THICKNESS, ALERT_COLOR, APPROACHING_COLOR, AnnotationRenderer, DETECTION_COLOR,
    LABEL_BACKGROUND, LABEL_TEXT, TRACK_COLOR,
};
pub use labels::LabelMap;
pub use placement::{PixelRect, Placement, TextExtent, place_label};
