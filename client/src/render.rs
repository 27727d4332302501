//! Pull-based rendering contract for an external rasterizer.
//!
//! The renderer never mutates the stroke model: on every paint tick it
//! reads the log plus the current viewport and repaints. Strokes are
//! composited in log order; an eraser stroke punches out pixels that
//! earlier strokes painted (`destination-out` in canvas terms) instead of
//! painting its own color.

use scrawl_shared::{Stroke, Tool};

use crate::viewport::Viewport;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompositeOp {
    /// Normal paint.
    SourceOver,
    /// Alpha-erase whatever is already on the surface.
    DestinationOut,
}

impl CompositeOp {
    pub fn for_tool(tool: Tool) -> Self {
        match tool {
            Tool::Pen => Self::SourceOver,
            Tool::Eraser => Self::DestinationOut,
        }
    }
}

/// One stroke projected into screen space, ready to draw as a round-capped
/// polyline (a single point means a dot of `width` diameter).
#[derive(Clone, Debug, PartialEq)]
pub struct ScenePath {
    pub points: Vec<(f64, f64)>,
    pub color: String,
    /// Screen-space line width: model width times the viewport scale, so
    /// strokes zoom with the content around them.
    pub width: f64,
    pub op: CompositeOp,
}

/// The rasterizer backend. Implementations draw the path with round caps
/// and joins and must honor `op` per path, in the order paths are given.
pub trait Rasterizer {
    fn draw_path(&mut self, path: &ScenePath);
}

/// Projects the stroke log into screen-space paths in paint order. Pure;
/// safe to call on every tick.
pub fn build_scene(strokes: &[Stroke], viewport: &Viewport) -> Vec<ScenePath> {
    strokes
        .iter()
        .filter(|stroke| !stroke.points.is_empty())
        .map(|stroke| ScenePath {
            points: stroke
                .points
                .iter()
                .map(|point| viewport.to_screen(*point))
                .collect(),
            color: stroke.color.clone(),
            width: stroke.width as f64 * viewport.scale(),
            op: CompositeOp::for_tool(stroke.tool),
        })
        .collect()
}

pub fn render(strokes: &[Stroke], viewport: &Viewport, rasterizer: &mut impl Rasterizer) {
    for path in build_scene(strokes, viewport) {
        rasterizer.draw_path(&path);
    }
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
