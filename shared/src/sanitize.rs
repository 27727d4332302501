//! Boundary validation for wire payloads. Both sides run these before
//! trusting anything off the socket: bad values are clamped or dropped,
//! never propagated as failures.

use crate::{
    normalize_point, Stroke, DEFAULT_COLOR, DEFAULT_WIDTH, MAX_COLOR_LEN, MAX_ID_LEN, MAX_WIDTH,
    MIN_WIDTH,
};

pub fn valid_id(id: &str) -> bool {
    !id.is_empty() && id.len() <= MAX_ID_LEN
}

pub fn sanitize_color(mut color: String) -> String {
    if color.is_empty() {
        return DEFAULT_COLOR.to_string();
    }
    if color.len() > MAX_COLOR_LEN {
        color.truncate(MAX_COLOR_LEN);
    }
    color
}

pub fn sanitize_width(width: f32) -> f32 {
    let width = if width.is_finite() {
        width
    } else {
        DEFAULT_WIDTH
    };
    width.max(MIN_WIDTH).min(MAX_WIDTH)
}

/// Returns `None` when the stroke is unusable (bad id, or no finite point
/// survives). Non-finite points are filtered out rather than failing the
/// whole stroke.
pub fn sanitize_stroke(mut stroke: Stroke) -> Option<Stroke> {
    if !valid_id(&stroke.id) {
        return None;
    }
    stroke.color = sanitize_color(stroke.color);
    stroke.width = sanitize_width(stroke.width);
    stroke.points = stroke
        .points
        .into_iter()
        .filter_map(normalize_point)
        .collect();
    if stroke.points.is_empty() {
        return None;
    }
    Some(stroke)
}

pub fn sanitize_strokes(strokes: Vec<Stroke>) -> Vec<Stroke> {
    strokes.into_iter().filter_map(sanitize_stroke).collect()
}
