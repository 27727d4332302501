use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use scrawl_shared::{ClientMessage, ServerMessage};

use crate::logic::{apply_client_message, broadcast_except};
use crate::sessions::{get_or_create_session, new_session_id, normalize_session_id, remove_if_empty};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/ping", get(ping_handler))
        .route("/ws/:session_id", get(ws_handler))
        .with_state(state)
}

pub async fn ping_handler() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}

/// Hands out a fresh session id. The session itself is only registered
/// once a peer actually opens the websocket, so an id that is never used
/// does not linger in the registry.
pub async fn root_handler() -> String {
    new_session_id()
}

pub async fn ws_handler(
    Path(session_id): Path<String>,
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let session_id = match normalize_session_id(&session_id) {
        Some(id) => id,
        None => return StatusCode::NOT_FOUND.into_response(),
    };
    ws.on_upgrade(move |socket| handle_socket(socket, state, session_id))
}

async fn handle_socket(socket: WebSocket, state: AppState, session_id: String) {
    let (mut socket_sender, mut socket_receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
    let connection_id = Uuid::new_v4();

    let session = get_or_create_session(&state, &session_id).await;
    // The snapshot is cloned under the same guard that registers the peer:
    // an event applied before this point is in the snapshot and nowhere
    // else, an event applied after lands only on the channel. The channel
    // drains after the snapshot frame, so the peer sees the log first.
    let strokes = {
        let mut session = session.write().await;
        session.peers.insert(connection_id, tx);
        tracing::info!(
            %session_id,
            %connection_id,
            peers = session.peers.len(),
            "peer connected"
        );
        session.strokes.clone()
    };
    let snapshot = ServerMessage::Snapshot { strokes };
    match bincode::encode_to_vec(&snapshot, bincode::config::standard()) {
        Ok(payload) => {
            if let Err(error) = socket_sender.send(Message::Binary(payload)).await {
                tracing::warn!(%session_id, %connection_id, %error, "snapshot send failed");
            }
        }
        Err(error) => {
            tracing::error!(%session_id, %connection_id, %error, "snapshot encode failed");
        }
    }

    let send_task = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            let Ok(payload) = bincode::encode_to_vec(&message, bincode::config::standard()) else {
                continue;
            };
            if socket_sender.send(Message::Binary(payload)).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(message)) = socket_receiver.next().await {
        let client_message = match message {
            Message::Binary(data) => {
                match bincode::decode_from_slice::<ClientMessage, _>(
                    &data,
                    bincode::config::standard(),
                ) {
                    Ok((client_message, _)) => client_message,
                    Err(error) => {
                        tracing::debug!(%session_id, %connection_id, %error, "bad binary frame");
                        continue;
                    }
                }
            }
            Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(client_message) => client_message,
                Err(error) => {
                    tracing::debug!(%session_id, %connection_id, %error, "bad text frame");
                    continue;
                }
            },
            Message::Close(_) => break,
            _ => continue,
        };

        let mut session_guard = session.write().await;
        if let Some(messages) =
            apply_client_message(&mut session_guard, connection_id, client_message)
        {
            for message in messages {
                broadcast_except(&mut session_guard, connection_id, message);
            }
        }
    }

    // A drop mid-stroke just stops the point flow: the stroke stays valid
    // with the points it has, and is sealed for everyone.
    {
        let mut session_guard = session.write().await;
        session_guard.peers.remove(&connection_id);
        let orphaned: Vec<String> = session_guard
            .owners
            .iter()
            .filter(|(id, owner)| {
                **owner == connection_id && session_guard.open_ids.contains(*id)
            })
            .map(|(id, _)| id.clone())
            .collect();
        for id in orphaned {
            session_guard.open_ids.remove(&id);
            broadcast_except(&mut session_guard, connection_id, ServerMessage::StrokeEnd { id });
        }
        tracing::info!(
            %session_id,
            %connection_id,
            peers = session_guard.peers.len(),
            "peer disconnected"
        );
    }
    send_task.abort();

    remove_if_empty(&state, &session_id, &session).await;
}

#[cfg(test)]
#[path = "relay_test.rs"]
mod tests;
