//! Translation between local stroke-model mutations and wire events.
//!
//! `SyncSession` owns the local `StrokeLog` and is the only component that
//! writes to it. Local gestures and inbound coordinator events funnel into
//! the same `StrokeLog` operations, so applying the same ordered event
//! sequence on two clients yields identical logs.
//!
//! A session starts gated: until the coordinator's snapshot arrives no
//! local drawing is accepted, so a late joiner never draws onto a stale or
//! empty view. A transport drop re-arms the gate; the next snapshot
//! replaces the log wholesale and discards anything that was in flight.

use std::collections::HashMap;

use scrawl_shared::{
    normalize_point, sanitize_color, sanitize_width, ClientMessage, Point, ServerMessage, Stroke,
    Tool,
};
use uuid::Uuid;

use crate::board::StrokeLog;

/// Cap on points carried by one `stroke-points` batch.
const MAX_POINTS_PER_MESSAGE: usize = 128;

pub struct SyncSession {
    log: StrokeLog,
    outbox: Vec<ClientMessage>,
    /// Points drawn locally since the last flush, batched per stroke.
    pending: HashMap<String, Vec<Point>>,
    awaiting_snapshot: bool,
}

impl Default for SyncSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncSession {
    pub fn new() -> Self {
        Self {
            log: StrokeLog::new(),
            outbox: Vec::new(),
            pending: HashMap::new(),
            awaiting_snapshot: true,
        }
    }

    /// True once the join snapshot has been applied and local input is
    /// accepted.
    pub fn ready(&self) -> bool {
        !self.awaiting_snapshot
    }

    pub fn log(&self) -> &StrokeLog {
        &self.log
    }

    pub fn strokes(&self) -> &[Stroke] {
        self.log.snapshot()
    }

    /// Starts a local stroke and queues its begin event. Returns the new
    /// stroke id, or `None` while input is gated or the point is unusable.
    pub fn begin_local(
        &mut self,
        tool: Tool,
        color: String,
        width: f32,
        point: Point,
    ) -> Option<String> {
        if self.awaiting_snapshot {
            return None;
        }
        let point = normalize_point(point)?;
        let color = sanitize_color(color);
        let width = sanitize_width(width);
        let id = Uuid::new_v4().to_string();
        self.log
            .begin_stroke(id.clone(), tool, color.clone(), width, point);
        self.outbox.push(ClientMessage::StrokeStart {
            id: id.clone(),
            tool,
            color,
            width,
            point,
        });
        Some(id)
    }

    pub fn extend_local(&mut self, id: &str, point: Point) {
        if self.awaiting_snapshot || !self.log.is_open(id) {
            return;
        }
        let Some(point) = normalize_point(point) else {
            return;
        };
        self.log.extend_stroke(id, point);
        self.pending.entry(id.to_string()).or_default().push(point);
    }

    pub fn end_local(&mut self, id: &str) {
        self.flush_pending_for(id);
        self.log.end_stroke(id);
        if !self.awaiting_snapshot {
            self.outbox.push(ClientMessage::StrokeEnd { id: id.to_string() });
        }
    }

    pub fn clear_local(&mut self) {
        self.log.clear();
        self.pending.clear();
        self.outbox.push(ClientMessage::Clear);
    }

    /// Drains everything queued for the coordinator. Pending points are
    /// batched into `stroke-points` chunks first, so per-stroke order is
    /// begin, points, end.
    pub fn take_outbound(&mut self) -> Vec<ClientMessage> {
        let ids: Vec<String> = self.pending.keys().cloned().collect();
        for id in ids {
            self.flush_pending_for(&id);
        }
        std::mem::take(&mut self.outbox)
    }

    /// Applies one coordinator event through the same stroke-model
    /// operations a local gesture uses. Malformed payloads degrade to
    /// no-ops at the `StrokeLog` boundary.
    pub fn apply_remote(&mut self, message: ServerMessage) {
        match message {
            ServerMessage::Snapshot { strokes } => {
                tracing::debug!(strokes = strokes.len(), "applying session snapshot");
                self.log.adopt(strokes);
                self.pending.clear();
                self.outbox.clear();
                self.awaiting_snapshot = false;
            }
            ServerMessage::StrokeStart {
                id,
                tool,
                color,
                width,
                point,
            } => {
                self.log.begin_stroke(
                    id,
                    tool,
                    sanitize_color(color),
                    sanitize_width(width),
                    point,
                );
            }
            ServerMessage::StrokePoint { id, point } => {
                self.log.extend_stroke(&id, point);
            }
            ServerMessage::StrokePoints { id, points } => {
                for point in points {
                    self.log.extend_stroke(&id, point);
                }
            }
            ServerMessage::StrokeEnd { id } => {
                self.log.end_stroke(&id);
            }
            ServerMessage::Clear => {
                self.log.clear();
            }
        }
    }

    /// Called when the transport drops. Local input is gated again until
    /// the reconnect snapshot replaces the log; in-flight local drawing is
    /// discarded at that point rather than spliced into the fresh state.
    pub fn on_disconnect(&mut self) {
        self.awaiting_snapshot = true;
    }

    fn flush_pending_for(&mut self, id: &str) {
        let Some(mut points) = self.pending.remove(id) else {
            return;
        };
        while !points.is_empty() {
            let chunk_size = points.len().min(MAX_POINTS_PER_MESSAGE);
            let chunk = points.drain(..chunk_size).collect::<Vec<_>>();
            self.outbox.push(ClientMessage::StrokePoints {
                id: id.to_string(),
                points: chunk,
            });
        }
    }
}

#[cfg(test)]
#[path = "sync_test.rs"]
mod tests;
