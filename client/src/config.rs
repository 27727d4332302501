/// Recognized client options. Everything has a usable default so an
/// embedding can start from `BoardConfig::default()` and override the
/// coordinator address.
#[derive(Clone, Debug)]
pub struct BoardConfig {
    /// Base websocket URL of the session coordinator, e.g. `ws://host:3000`.
    pub server_url: String,
    /// Session/board identifier appended to the websocket path.
    pub session_id: String,
    pub scale_min: f64,
    pub scale_max: f64,
    pub default_color: String,
    pub default_width: f32,
    /// Device-pixel movement after which an uncommitted touch gesture is
    /// reclassified from drawing to panning.
    pub pan_threshold: f64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            server_url: "ws://localhost:3000".to_string(),
            session_id: String::new(),
            scale_min: 0.5,
            scale_max: 3.0,
            default_color: scrawl_shared::DEFAULT_COLOR.to_string(),
            default_width: scrawl_shared::DEFAULT_WIDTH,
            pan_threshold: 10.0,
        }
    }
}

impl BoardConfig {
    pub fn websocket_url(&self) -> String {
        let base = self.server_url.trim_end_matches('/');
        if self.session_id.is_empty() {
            format!("{base}/ws")
        } else {
            format!("{base}/ws/{}", self.session_id)
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
