//! Text measurement used to center the label.

use crate::label_font::{read_face, LabelFont};
use log::debug;
use std::path::Path;

/// Average glyph advance as a fraction of the font size, used when a face
/// can't be measured. Rough heuristic; centering is cosmetic only.
pub const APPROX_ADVANCE_RATIO: f32 = 0.6;

/// Pixel size of a rendered line of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextExtent {
    pub width: f32,
    pub height: f32,
}

pub trait TextMeasurer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Measures `text` drawn with `font`, which was requested at `font_size`.
    fn measure(&self, font: &LabelFont, font_size: u32, text: &str) -> TextExtent;
}

/// Uses the metrics of the face itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct PreciseMeasurer;

impl TextMeasurer for PreciseMeasurer {
    fn name(&self) -> &'static str {
        "precise"
    }

    fn measure(&self, font: &LabelFont, _font_size: u32, text: &str) -> TextExtent {
        TextExtent {
            width: font.text_width(text),
            height: font.line_height(),
        }
    }
}

/// Estimates the extent from the requested size and the character count.
#[derive(Debug, Default, Clone, Copy)]
pub struct ApproximateMeasurer;

impl TextMeasurer for ApproximateMeasurer {
    fn name(&self) -> &'static str {
        "approximate"
    }

    fn measure(&self, _font: &LabelFont, font_size: u32, text: &str) -> TextExtent {
        let size = font_size as f32;
        TextExtent {
            width: size * text.chars().count() as f32 * APPROX_ADVANCE_RATIO,
            height: size,
        }
    }
}

/// Picks the measurer for a run. Without a system face the builtin face is
/// used, whose metrics are exact. A located face is only measured precisely
/// when it parses and has a glyph for every character of `label`.
pub fn select_measurer(face_path: Option<&Path>, label: &str) -> Box<dyn TextMeasurer> {
    let Some(path) = face_path else {
        return Box::new(PreciseMeasurer);
    };

    match read_face(path) {
        Ok(font) => {
            let missing: Vec<char> = label
                .chars()
                .filter(|&ch| font.glyph(ch).id().0 == 0)
                .collect();
            if missing.is_empty() {
                Box::new(PreciseMeasurer)
            } else {
                debug!("{} has no glyph for {missing:?}", path.display());
                Box::new(ApproximateMeasurer)
            }
        }
        Err(err) => {
            debug!("{err:#}");
            Box::new(ApproximateMeasurer)
        }
    }
}
