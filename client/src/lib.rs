mod board;
mod config;
mod input;
mod render;
mod session;
mod sync;
mod transport;
mod viewport;

pub use board::StrokeLog;
pub use config::BoardConfig;
pub use input::{ActiveTool, InputRouter, PointerEvent, PointerKind};
pub use render::{build_scene, render, CompositeOp, Rasterizer, ScenePath};
pub use session::BoardSession;
pub use sync::SyncSession;
pub use transport::{connect, connect_with_backoff, TransportError, TransportEvent, WsSender};
pub use viewport::Viewport;
