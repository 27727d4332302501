//! The append-only stroke model for one session.
//!
//! This is the single mutation path: local input and remote events both go
//! through the same operations, so replaying the same ordered event
//! sequence on any client produces an identical log. Strokes are only ever
//! appended, points are only ever appended to an open stroke, and `clear`
//! empties the whole log at once.

use std::collections::HashSet;

use scrawl_shared::{normalize_point, sanitize_strokes, Point, Stroke, Tool};

#[derive(Default)]
pub struct StrokeLog {
    strokes: Vec<Stroke>,
    /// Ids of strokes still open for appending. A stroke leaves this set on
    /// `end_stroke` (or `clear`) and is immutable from then on.
    open_ids: HashSet<String>,
}

impl StrokeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new one-point stroke. Idempotent on id: a duplicate begin
    /// (coordinator echo, redelivery) is ignored so the log cannot grow a
    /// second copy of the same stroke.
    pub fn begin_stroke(&mut self, id: String, tool: Tool, color: String, width: f32, point: Point) {
        let Some(point) = normalize_point(point) else {
            return;
        };
        if self.strokes.iter().any(|stroke| stroke.id == id) {
            tracing::debug!(%id, "duplicate stroke-start ignored");
            return;
        }
        self.strokes.push(Stroke {
            id: id.clone(),
            tool,
            color,
            width,
            points: vec![point],
        });
        self.open_ids.insert(id);
    }

    /// Appends a point to an open stroke. Silently a no-op when the stroke
    /// is unknown (its begin event was lost, or the log was cleared
    /// concurrently) or already ended.
    pub fn extend_stroke(&mut self, id: &str, point: Point) {
        let Some(point) = normalize_point(point) else {
            return;
        };
        if !self.open_ids.contains(id) {
            tracing::debug!(%id, "point for unknown or ended stroke dropped");
            return;
        }
        if let Some(stroke) = self.strokes.iter_mut().find(|stroke| stroke.id == id) {
            stroke.points.push(point);
        }
    }

    pub fn end_stroke(&mut self, id: &str) {
        self.open_ids.remove(id);
    }

    pub fn is_open(&self, id: &str) -> bool {
        self.open_ids.contains(id)
    }

    /// Empties the log. Readers see either the full previous log or an
    /// empty one, never a partial state.
    pub fn clear(&mut self) {
        self.strokes.clear();
        self.open_ids.clear();
    }

    /// Replaces the whole log with a coordinator snapshot, discarding any
    /// prior local-only state. Used on join and after reconnect. Adopted
    /// strokes are left open: a stroke still in progress at snapshot time
    /// keeps receiving its relayed points, and the coordinator relays
    /// `stroke-end` when it actually seals. Strokes that were already
    /// sealed never get points relayed for them, so the wide open set is
    /// harmless.
    pub fn adopt(&mut self, strokes: Vec<Stroke>) {
        self.strokes = sanitize_strokes(strokes);
        self.open_ids = self
            .strokes
            .iter()
            .map(|stroke| stroke.id.clone())
            .collect();
    }

    /// Read-only view in paint order; later strokes composite over earlier
    /// ones.
    pub fn snapshot(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn to_vec(&self) -> Vec<Stroke> {
        self.strokes.clone()
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }
}

#[cfg(test)]
#[path = "board_test.rs"]
mod tests;
