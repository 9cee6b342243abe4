//! Text fitting helpers shared by the renderers

use super::fonts::FontSpec;
use super::surface::Surface;

pub const ELLIPSIS: &str = "...";

/// Fit `text` into `max_width`, cutting trailing characters behind an ellipsis
///
/// Text that already fits is returned unchanged. One character plus the
/// ellipsis is the shortest possible result.
pub fn truncate_text<S: Surface + ?Sized>(surface: &S, text: &str, font: FontSpec, max_width: f32) -> String {
    if surface.measure_text_width(text, font) <= max_width {
        return text.to_string();
    }

    let mut truncated = text.to_string();
    while truncated.chars().count() > 1 {
        let candidate = format!("{}{}", truncated, ELLIPSIS);
        if surface.measure_text_width(&candidate, font) <= max_width {
            break;
        }
        truncated.pop();
    }
    truncated.push_str(ELLIPSIS);
    truncated
}

/// Step a font size down from `start` until `fits` accepts it or `min` is reached
pub fn shrink_font_to_fit(start: f32, min: f32, step: f32, mut fits: impl FnMut(f32) -> bool) -> f32 {
    let mut size = start;
    while size > min && !fits(size) {
        size -= step;
    }
    size.max(min)
}
