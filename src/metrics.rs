//! Node height estimation.
//!
//! The estimate is a pure function of the label and the active font size, so
//! the layout engine and the overlap resolver always agree on geometry.

const BASE_LINE_HEIGHT: f32 = 36.0;
const REFERENCE_FONT_SIZE: f32 = 14.0;
const LINE_HEIGHT_PER_UNIT: f32 = 1.2;

/// Parses the leading integer of a CSS-style font size (`"14px"` -> 14).
/// Returns `None` when no leading digits are present.
pub fn parse_font_size(raw: &str) -> Option<f32> {
    let trimmed = raw.trim_start();
    let unsigned = trimmed
        .strip_prefix('-')
        .or_else(|| trimmed.strip_prefix('+'))
        .unwrap_or(trimmed);
    let digits: usize = unsigned
        .chars()
        .take_while(|ch| ch.is_ascii_digit())
        .count();
    if digits == 0 {
        return None;
    }
    let consumed = trimmed.len() - unsigned.len() + digits;
    trimmed[..consumed].parse::<f32>().ok()
}

/// Estimated rendered height of a node's box.
///
/// Line height is 36 units at font size 14 and scales by 1.2 units per
/// font-size unit; a font size that fails to parse collapses the scaling term
/// so the base line height is used. The result is line height times the
/// number of newline-separated label lines (minimum 1).
pub fn node_height(font_size: &str, label: &str) -> f32 {
    let scaling = match parse_font_size(font_size) {
        Some(size) => (size - REFERENCE_FONT_SIZE) * LINE_HEIGHT_PER_UNIT,
        None => 0.0,
    };
    let line_height = BASE_LINE_HEIGHT + scaling;
    let lines = label.split('\n').count().max(1) as f32;
    line_height * lines
}
