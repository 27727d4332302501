use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

mod sanitize;

pub use sanitize::{sanitize_color, sanitize_stroke, sanitize_strokes, sanitize_width, valid_id};

pub const MAX_ID_LEN: usize = 64;
pub const MAX_COLOR_LEN: usize = 32;
pub const DEFAULT_COLOR: &str = "#000000";
pub const DEFAULT_WIDTH: f32 = 5.0;
pub const MIN_WIDTH: f32 = 1.0;
pub const MAX_WIDTH: f32 = 60.0;

/// A model-space coordinate pair. Viewport pan/zoom never touches these;
/// every client stores and transmits the same model coordinates.
#[derive(Serialize, Deserialize, Encode, Decode, Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

pub fn normalize_point(point: Point) -> Option<Point> {
    if point.is_finite() {
        Some(point)
    } else {
        None
    }
}

#[derive(Serialize, Deserialize, Encode, Decode, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    Pen,
    Eraser,
}

/// One drawing gesture: fixed tool/color/width plus an append-only point
/// sequence. `color` only matters for `Tool::Pen`; an eraser stroke punches
/// out pixels regardless of color. `width` is in model units, so the
/// rendered thickness scales with the viewport zoom.
#[derive(Serialize, Deserialize, Encode, Decode, Clone, Debug, PartialEq)]
pub struct Stroke {
    pub id: String,
    pub tool: Tool,
    pub color: String,
    pub width: f32,
    pub points: Vec<Point>,
}

#[derive(Serialize, Deserialize, Encode, Decode, Clone, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "stroke-start")]
    StrokeStart {
        id: String,
        tool: Tool,
        color: String,
        width: f32,
        point: Point,
    },
    #[serde(rename = "stroke-point")]
    StrokePoint { id: String, point: Point },
    #[serde(rename = "stroke-points")]
    StrokePoints { id: String, points: Vec<Point> },
    #[serde(rename = "stroke-end")]
    StrokeEnd { id: String },
    #[serde(rename = "session-cleared")]
    Clear,
}

#[derive(Serialize, Deserialize, Encode, Decode, Clone, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "session-snapshot")]
    Snapshot { strokes: Vec<Stroke> },
    #[serde(rename = "stroke-start")]
    StrokeStart {
        id: String,
        tool: Tool,
        color: String,
        width: f32,
        point: Point,
    },
    #[serde(rename = "stroke-point")]
    StrokePoint { id: String, point: Point },
    #[serde(rename = "stroke-points")]
    StrokePoints { id: String, points: Vec<Point> },
    #[serde(rename = "stroke-end")]
    StrokeEnd { id: String },
    #[serde(rename = "session-cleared")]
    Clear,
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
