use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::state::{AppState, Session, SharedSession};

pub fn new_session_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn normalize_session_id(value: &str) -> Option<String> {
    let parsed = Uuid::parse_str(value).ok()?;
    Some(parsed.to_string())
}

pub async fn get_or_create_session(state: &AppState, session_id: &str) -> SharedSession {
    if let Some(session) = state.sessions.read().await.get(session_id).cloned() {
        return session;
    }
    tracing::info!(%session_id, "creating session");
    let session = Arc::new(RwLock::new(Session::default()));
    let mut sessions = state.sessions.write().await;
    sessions
        .entry(session_id.to_string())
        .or_insert_with(|| session.clone())
        .clone()
}

/// Drops a session from the registry once its last peer has left. The
/// identity check guards against racing a concurrent re-create.
pub async fn remove_if_empty(state: &AppState, session_id: &str, session: &SharedSession) {
    if !session.read().await.peers.is_empty() {
        return;
    }
    let mut sessions = state.sessions.write().await;
    if let Some(current) = sessions.get(session_id) {
        if Arc::ptr_eq(current, session) {
            sessions.remove(session_id);
            tracing::info!(%session_id, "session removed");
        }
    }
}
