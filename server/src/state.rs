use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use scrawl_shared::{ServerMessage, Stroke};
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

// Caps so one runaway client cannot grow a session without bound.
pub const MAX_STROKES: usize = 2000;
pub const MAX_POINTS_PER_STROKE: usize = 5000;

pub type SharedSession = Arc<RwLock<Session>>;

#[derive(Clone, Default)]
pub struct AppState {
    pub sessions: Arc<RwLock<HashMap<String, SharedSession>>>,
}

/// One board's canonical state: the stroke log plus per-connection
/// bookkeeping. A session lives only while peers are connected; the log
/// is never persisted.
#[derive(Default)]
pub struct Session {
    pub strokes: Vec<Stroke>,
    /// Strokes still accepting points.
    pub open_ids: HashSet<String>,
    /// Stroke ids are scoped to the connection that started them; only the
    /// owner may extend or end a stroke.
    pub owners: HashMap<String, Uuid>,
    pub peers: HashMap<Uuid, mpsc::UnboundedSender<ServerMessage>>,
}
