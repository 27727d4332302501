//! Websocket channel to the session coordinator.
//!
//! Outbound messages go over a channel to a writer task; inbound frames
//! are decoded (binary bincode preferred, JSON text accepted) and handed
//! to the embedding as [`TransportEvent`]s. Malformed frames are logged
//! and dropped, never surfaced as errors. When the reader observes a close
//! or error it emits `Closed`; the embedding is expected to call
//! `BoardSession::on_disconnect`, reconnect, and let the fresh snapshot
//! replace local state.

use futures_util::{SinkExt, StreamExt};
use scrawl_shared::{ClientMessage, ServerMessage};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::protocol::Message;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("websocket connect failed: {0}")]
    Connect(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("gave up connecting after {0} attempts")]
    Exhausted(u32),
}

#[derive(Debug)]
pub enum TransportEvent {
    /// Connection is up; a `session-snapshot` should follow shortly.
    Open,
    /// Connection dropped; reconnect and resnapshot.
    Closed,
    Message(ServerMessage),
}

/// Cheap-to-clone handle for queueing outbound messages. Sends after the
/// connection dropped are silently discarded, matching the "brief freeze,
/// never a crash" contract.
#[derive(Clone)]
pub struct WsSender {
    tx: mpsc::UnboundedSender<ClientMessage>,
}

impl WsSender {
    pub fn send(&self, message: ClientMessage) {
        if self.tx.send(message).is_err() {
            tracing::debug!("outbound message dropped, connection is gone");
        }
    }

    pub fn send_all(&self, messages: Vec<ClientMessage>) {
        for message in messages {
            self.send(message);
        }
    }
}

/// Opens the websocket and spawns the reader/writer tasks. The returned
/// receiver yields `Open` first, then decoded messages, then `Closed`
/// exactly once.
pub async fn connect(
    url: &str,
) -> Result<(WsSender, mpsc::UnboundedReceiver<TransportEvent>), TransportError> {
    let (stream, _response) = connect_async(url).await?;
    let (mut write, mut read) = stream.split();

    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<ClientMessage>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<TransportEvent>();
    let _ = event_tx.send(TransportEvent::Open);

    tokio::spawn(async move {
        while let Some(message) = out_rx.recv().await {
            let Ok(payload) = bincode::encode_to_vec(&message, bincode::config::standard()) else {
                continue;
            };
            if write.send(Message::Binary(payload.into())).await.is_err() {
                break;
            }
        }
    });

    tokio::spawn(async move {
        while let Some(frame) = read.next().await {
            let frame = match frame {
                Ok(frame) => frame,
                Err(error) => {
                    tracing::warn!(%error, "websocket read failed");
                    break;
                }
            };
            match frame {
                Message::Binary(bytes) => {
                    match bincode::decode_from_slice::<ServerMessage, _>(
                        &bytes,
                        bincode::config::standard(),
                    ) {
                        Ok((message, _)) => {
                            let _ = event_tx.send(TransportEvent::Message(message));
                        }
                        Err(error) => {
                            tracing::warn!(%error, "dropping undecodable binary frame");
                        }
                    }
                }
                Message::Text(text) => match serde_json::from_str::<ServerMessage>(text.as_str()) {
                    Ok(message) => {
                        let _ = event_tx.send(TransportEvent::Message(message));
                    }
                    Err(error) => {
                        tracing::warn!(%error, "dropping undecodable text frame");
                    }
                },
                Message::Close(_) => break,
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
            }
        }
        let _ = event_tx.send(TransportEvent::Closed);
    });

    Ok((WsSender { tx: out_tx }, event_rx))
}

/// Reconnect helper: retries with doubling delay (250ms, 500ms, ...)
/// until a connection sticks or the attempt budget runs out.
pub async fn connect_with_backoff(
    url: &str,
    max_attempts: u32,
) -> Result<(WsSender, mpsc::UnboundedReceiver<TransportEvent>), TransportError> {
    let mut delay = std::time::Duration::from_millis(250);
    for attempt in 1..=max_attempts {
        match connect(url).await {
            Ok(connection) => return Ok(connection),
            Err(error) => {
                tracing::warn!(%error, attempt, "connect attempt failed");
            }
        }
        if attempt < max_attempts {
            tokio::time::sleep(delay).await;
            delay *= 2;
        }
    }
    Err(TransportError::Exhausted(max_attempts))
}
