//! Applies validated client events to a session and produces the relay
//! messages for the other peers. Anything malformed degrades to `None`
//! (nothing applied, nothing relayed); the sender is never notified.

use scrawl_shared::{
    normalize_point, sanitize_color, sanitize_width, valid_id, ClientMessage, Point,
    ServerMessage, Stroke,
};
use uuid::Uuid;

use crate::state::{Session, MAX_POINTS_PER_STROKE, MAX_STROKES};

pub fn apply_client_message(
    session: &mut Session,
    sender: Uuid,
    message: ClientMessage,
) -> Option<Vec<ServerMessage>> {
    match message {
        ClientMessage::StrokeStart {
            id,
            tool,
            color,
            width,
            point,
        } => {
            if !valid_id(&id) {
                return None;
            }
            let point = normalize_point(point)?;
            if session.strokes.iter().any(|stroke| stroke.id == id) {
                // Redelivered begin; already applied.
                return None;
            }
            let color = sanitize_color(color);
            let width = sanitize_width(width);
            session.strokes.push(Stroke {
                id: id.clone(),
                tool,
                color: color.clone(),
                width,
                points: vec![point],
            });
            evict_overflow(session);
            session.open_ids.insert(id.clone());
            session.owners.insert(id.clone(), sender);

            Some(vec![ServerMessage::StrokeStart {
                id,
                tool,
                color,
                width,
                point,
            }])
        }
        ClientMessage::StrokePoint { id, point } => {
            let accepted = append_points(session, sender, &id, vec![point])?;
            let point = accepted.into_iter().next()?;
            Some(vec![ServerMessage::StrokePoint { id, point }])
        }
        ClientMessage::StrokePoints { id, points } => {
            let accepted = append_points(session, sender, &id, points)?;
            Some(vec![ServerMessage::StrokePoints {
                id,
                points: accepted,
            }])
        }
        ClientMessage::StrokeEnd { id } => {
            if !valid_id(&id) || session.owners.get(&id) != Some(&sender) {
                return None;
            }
            session.open_ids.remove(&id);
            Some(vec![ServerMessage::StrokeEnd { id }])
        }
        ClientMessage::Clear => {
            session.strokes.clear();
            session.open_ids.clear();
            session.owners.clear();
            Some(vec![ServerMessage::Clear])
        }
    }
}

/// Validates and appends points to an open stroke owned by `sender`.
/// Returns the accepted points, or `None` when nothing was applied.
fn append_points(
    session: &mut Session,
    sender: Uuid,
    id: &str,
    points: Vec<Point>,
) -> Option<Vec<Point>> {
    if !valid_id(id) || !session.open_ids.contains(id) {
        return None;
    }
    if session.owners.get(id) != Some(&sender) {
        tracing::debug!(%id, %sender, "points for a stroke owned by another connection dropped");
        return None;
    }
    let stroke = session.strokes.iter_mut().find(|stroke| stroke.id == id)?;
    let room = MAX_POINTS_PER_STROKE.saturating_sub(stroke.points.len());
    let accepted: Vec<Point> = points
        .into_iter()
        .filter_map(normalize_point)
        .take(room)
        .collect();
    if accepted.is_empty() {
        return None;
    }
    stroke.points.extend_from_slice(&accepted);
    Some(accepted)
}

fn evict_overflow(session: &mut Session) {
    let overflow = session.strokes.len().saturating_sub(MAX_STROKES);
    if overflow > 0 {
        let removed = session.strokes.drain(0..overflow).collect::<Vec<_>>();
        for stroke in removed {
            session.open_ids.remove(&stroke.id);
            session.owners.remove(&stroke.id);
        }
    }
}

/// Fans a message out to every peer except the sender. Peers whose channel
/// is gone are pruned. Runs under the caller's session guard, so applying
/// an event and relaying it is one atomic step: a peer registered after
/// the apply sees the event in its snapshot, a peer registered before sees
/// it on its channel, never both.
pub fn broadcast_except(session: &mut Session, sender: Uuid, message: ServerMessage) {
    let mut stale = Vec::new();
    for (id, tx) in session.peers.iter() {
        if *id == sender {
            continue;
        }
        if tx.send(message.clone()).is_err() {
            stale.push(*id);
        }
    }
    for id in stale {
        session.peers.remove(&id);
    }
}

#[cfg(test)]
#[path = "logic_test.rs"]
mod tests;
