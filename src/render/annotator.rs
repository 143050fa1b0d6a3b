//! Drawing of labels, box outlines and the alert border onto RGB frames.

use std::path::Path;
use std::sync::Once;

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;

use crate::error::{Error, Result};
use crate::render::placement::{PixelRect, TextExtent, place_label};
use crate::tracker::BoundingBox;

pub const LABEL_BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
pub const LABEL_TEXT: Rgb<u8> = Rgb([0, 0, 0]);
pub const DETECTION_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
pub const TRACK_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
pub const APPROACHING_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
pub const ALERT_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Stroke width of the alert border; the stroke is centered on the frame edge.
pub const ALERT_BORDER_THICKNESS: u32 = 30;

const LABEL_FONT_SIZE: f32 = 16.0;

/// DejaVu Sans Mono, used unless another face is loaded.
static BUNDLED_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSansMono.ttf");

// Metrics used when no font could be loaded.
const FALLBACK_CHAR_WIDTH: i32 = 9;
const FALLBACK_TEXT_HEIGHT: i32 = 10;
const FALLBACK_BASELINE: i32 = 5;

static MISSING_FONT_WARNING: Once = Once::new();

#[derive(Debug, Clone)]
pub struct AnnotationRenderer {
    font: Option<FontArc>,
    scale: PxScale,
}

impl Default for AnnotationRenderer {
    /// Renderer using the bundled label font.
    fn default() -> Self {
        let font = match FontArc::try_from_slice(BUNDLED_FONT) {
            Ok(font) => Some(font),
            Err(err) => {
                tracing::warn!(%err, "bundled label font is unreadable");
                None
            }
        };
        Self::new(font)
    }
}

impl AnnotationRenderer {
    pub fn new(font: Option<FontArc>) -> Self {
        Self {
            font,
            scale: PxScale::from(LABEL_FONT_SIZE),
        }
    }

    pub fn from_font_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let font = FontArc::try_from_vec(bytes).map_err(|e| Error::Font {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Self::new(Some(font)))
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Pixel extent of `text` as it will be drawn.
    pub fn measure(&self, text: &str) -> TextExtent {
        match &self.font {
            Some(font) => {
                let (width, height) = text_size(self.scale, font, text);
                let baseline = font.as_scaled(self.scale).descent().abs().ceil() as i32;
                TextExtent {
                    width: width as i32,
                    height: height as i32,
                    baseline,
                }
            }
            None => TextExtent {
                width: FALLBACK_CHAR_WIDTH * text.chars().count() as i32,
                height: FALLBACK_TEXT_HEIGHT,
                baseline: FALLBACK_BASELINE,
            },
        }
    }

    /// Draw a labelled box: label background, label text, then a 1-pixel outline around `bbox`.
    pub fn draw_detection(
        &self,
        image: &mut RgbImage,
        bbox: &BoundingBox,
        label: &str,
        background: Rgb<u8>,
        foreground: Rgb<u8>,
    ) {
        let extent = self.measure(label);
        let placement = place_label(PixelRect::from_bbox(bbox), extent, image.dimensions());

        if let Some(rect) = to_rect(&placement.background) {
            draw_filled_rect_mut(image, rect, background);
        }

        match &self.font {
            Some(font) => {
                // Glyphs are laid out on a baseline one ascent below `y`.
                let (x, baseline_y) = placement.text_origin;
                let ascent = font.as_scaled(self.scale).ascent().round() as i32;
                draw_text_mut(
                    image,
                    LABEL_TEXT,
                    x,
                    baseline_y - ascent,
                    self.scale,
                    font,
                    label,
                );
            }
            None => MISSING_FONT_WARNING.call_once(|| {
                tracing::warn!("no label font loaded, drawing label boxes without text");
            }),
        }

        if let Some(rect) = to_rect(&placement.foreground) {
            draw_hollow_rect_mut(image, rect, foreground);
        }
    }

    /// Frame the whole image in the alert color.
    pub fn draw_alert_border(&self, image: &mut RgbImage) {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return;
        }
        // Half of the stroke falls outside the frame.
        let band = (ALERT_BORDER_THICKNESS / 2).min(width).min(height);

        let bands = [
            Rect::at(0, 0).of_size(width, band),
            Rect::at(0, (height - band) as i32).of_size(width, band),
            Rect::at(0, 0).of_size(band, height),
            Rect::at((width - band) as i32, 0).of_size(band, height),
        ];
        for rect in bands {
            draw_filled_rect_mut(image, rect, ALERT_COLOR);
        }
    }
}

/// Inclusive pixel rectangle to an imageproc rect; `None` if it is empty.
fn to_rect(r: &PixelRect) -> Option<Rect> {
    let width = r.right - r.left + 1;
    let height = r.bottom - r.top + 1;
    if width <= 0 || height <= 0 {
        return None;
    }
    Some(Rect::at(r.left, r.top).of_size(width as u32, height as u32))
}
