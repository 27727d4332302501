//! Classifies a raw pointer/touch stream into stroke mutations and
//! viewport gestures.
//!
//! The router is a small state machine: `Idle`, `Drawing`, `Panning`, plus
//! a touch-only `Undecided` state. On a touch-down with a drawing tool the
//! stroke is not committed immediately; if the finger travels past the
//! configured threshold before anything was committed, the gesture
//! reclassifies to panning. The reclassification can happen at most once
//! and never after a point has been committed, so a peer never receives a
//! stroke that is later retracted into a pan.

use scrawl_shared::{Point, Tool};

use crate::config::BoardConfig;
use crate::sync::SyncSession;
use crate::viewport::Viewport;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
}

#[derive(Clone, Copy, Debug)]
pub enum PointerEvent {
    Down { x: f64, y: f64, kind: PointerKind },
    Move { x: f64, y: f64 },
    Up { x: f64, y: f64 },
    Wheel { x: f64, y: f64, delta: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveTool {
    Pen,
    Eraser,
    Pan,
}

impl ActiveTool {
    fn stroke_tool(self) -> Option<Tool> {
        match self {
            Self::Pen => Some(Tool::Pen),
            Self::Eraser => Some(Tool::Eraser),
            Self::Pan => None,
        }
    }
}

enum Gesture {
    Idle,
    /// Touch down with a drawing tool, nothing committed yet. Either the
    /// first sub-threshold move commits a stroke at `origin`, or a larger
    /// move turns the gesture into a pan.
    Undecided {
        origin: (f64, f64),
        last: (f64, f64),
    },
    Drawing {
        id: String,
    },
    Panning {
        last: (f64, f64),
    },
}

pub struct InputRouter {
    tool: ActiveTool,
    color: String,
    width: f32,
    pan_threshold: f64,
    gesture: Gesture,
}

impl InputRouter {
    pub fn new(config: &BoardConfig) -> Self {
        Self {
            tool: ActiveTool::Pen,
            color: config.default_color.clone(),
            width: config.default_width,
            pan_threshold: config.pan_threshold,
            gesture: Gesture::Idle,
        }
    }

    pub fn tool(&self) -> ActiveTool {
        self.tool
    }

    /// Tool/style changes take effect on the next gesture; an in-progress
    /// stroke keeps the metadata it was created with.
    pub fn set_tool(&mut self, tool: ActiveTool) {
        self.tool = tool;
    }

    pub fn set_color(&mut self, color: String) {
        self.color = color;
    }

    pub fn set_width(&mut self, width: f32) {
        self.width = width;
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.gesture, Gesture::Idle)
    }

    pub fn handle(
        &mut self,
        event: PointerEvent,
        viewport: &mut Viewport,
        sync: &mut SyncSession,
    ) {
        match event {
            PointerEvent::Down { x, y, kind } => self.on_down(x, y, kind, viewport, sync),
            PointerEvent::Move { x, y } => self.on_move(x, y, viewport, sync),
            PointerEvent::Up { x, y } => self.on_up(x, y, viewport, sync),
            PointerEvent::Wheel { x, y, delta } => viewport.wheel_zoom(delta, x, y),
        }
    }

    fn on_down(
        &mut self,
        x: f64,
        y: f64,
        kind: PointerKind,
        viewport: &Viewport,
        sync: &mut SyncSession,
    ) {
        if !matches!(self.gesture, Gesture::Idle) {
            return;
        }
        match self.tool.stroke_tool() {
            None => {
                self.gesture = Gesture::Panning { last: (x, y) };
            }
            Some(_) if kind == PointerKind::Touch => {
                self.gesture = Gesture::Undecided {
                    origin: (x, y),
                    last: (x, y),
                };
            }
            Some(tool) => {
                self.gesture = match self.begin_at(tool, x, y, viewport, sync) {
                    Some(id) => Gesture::Drawing { id },
                    None => Gesture::Idle,
                };
            }
        }
    }

    fn on_move(&mut self, x: f64, y: f64, viewport: &mut Viewport, sync: &mut SyncSession) {
        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::Panning { last } => {
                let (dx, dy) = (x - last.0, y - last.1);
                *last = (x, y);
                viewport.pan_by(dx, dy);
            }
            Gesture::Undecided { origin, last } => {
                let origin = *origin;
                let (dx, dy) = (x - last.0, y - last.1);
                if (x - origin.0).abs() > self.pan_threshold
                    || (y - origin.1).abs() > self.pan_threshold
                {
                    self.gesture = Gesture::Panning { last: (x, y) };
                    viewport.pan_by(dx, dy);
                    return;
                }
                // Sub-threshold movement: this is a stroke after all.
                let Some(tool) = self.tool.stroke_tool() else {
                    self.gesture = Gesture::Idle;
                    return;
                };
                match self.begin_at(tool, origin.0, origin.1, viewport, sync) {
                    Some(id) => {
                        sync.extend_local(&id, viewport.to_model(x, y));
                        self.gesture = Gesture::Drawing { id };
                    }
                    None => self.gesture = Gesture::Idle,
                }
            }
            Gesture::Drawing { id } => {
                sync.extend_local(id, viewport.to_model(x, y));
            }
        }
    }

    fn on_up(&mut self, _x: f64, _y: f64, viewport: &Viewport, sync: &mut SyncSession) {
        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Idle | Gesture::Panning { .. } => {}
            Gesture::Undecided { origin, .. } => {
                // Tap without movement: commit a single-point stroke.
                if let Some(tool) = self.tool.stroke_tool() {
                    if let Some(id) = self.begin_at(tool, origin.0, origin.1, viewport, sync) {
                        sync.end_local(&id);
                    }
                }
            }
            Gesture::Drawing { id } => {
                sync.end_local(&id);
            }
        }
    }

    fn begin_at(
        &self,
        tool: Tool,
        x: f64,
        y: f64,
        viewport: &Viewport,
        sync: &mut SyncSession,
    ) -> Option<String> {
        sync.begin_local(tool, self.color.clone(), self.width, viewport.to_model(x, y))
    }
}

#[cfg(test)]
#[path = "input_test.rs"]
mod tests;
