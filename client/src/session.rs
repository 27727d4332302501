//! Per-client aggregate of the core state: one stroke log + sync session,
//! one viewport, one input router. The embedding feeds pointer events and
//! inbound coordinator events in, and pulls outbound events and render
//! scenes out. Everything runs on one task; there is exactly one mutator.

use scrawl_shared::{ClientMessage, ServerMessage, Stroke};

use crate::board::StrokeLog;
use crate::config::BoardConfig;
use crate::input::{ActiveTool, InputRouter, PointerEvent};
use crate::render::{Rasterizer, render};
use crate::sync::SyncSession;
use crate::viewport::Viewport;

pub struct BoardSession {
    viewport: Viewport,
    input: InputRouter,
    sync: SyncSession,
}

impl BoardSession {
    pub fn new(config: &BoardConfig) -> Self {
        Self {
            viewport: Viewport::new(config.scale_min, config.scale_max),
            input: InputRouter::new(config),
            sync: SyncSession::new(),
        }
    }

    /// True once the join snapshot arrived; drawing before that is ignored.
    pub fn ready(&self) -> bool {
        self.sync.ready()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn log(&self) -> &StrokeLog {
        self.sync.log()
    }

    pub fn strokes(&self) -> &[Stroke] {
        self.sync.strokes()
    }

    pub fn set_tool(&mut self, tool: ActiveTool) {
        self.input.set_tool(tool);
    }

    pub fn set_color(&mut self, color: String) {
        self.input.set_color(color);
    }

    pub fn set_width(&mut self, width: f32) {
        self.input.set_width(width);
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) {
        self.input.handle(event, &mut self.viewport, &mut self.sync);
    }

    /// Clears the board locally and queues the clear for the coordinator.
    pub fn clear(&mut self) {
        self.sync.clear_local();
    }

    pub fn apply_remote(&mut self, message: ServerMessage) {
        self.sync.apply_remote(message);
    }

    pub fn on_disconnect(&mut self) {
        self.sync.on_disconnect();
    }

    pub fn take_outbound(&mut self) -> Vec<ClientMessage> {
        self.sync.take_outbound()
    }

    pub fn render_into(&self, rasterizer: &mut impl Rasterizer) {
        render(self.strokes(), &self.viewport, rasterizer);
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
