use crate::recognizer::ModelCache;
use std::sync::Arc;

/// Inbound frames buffered per connection before the reader stops pulling
pub const DEFAULT_FRAME_QUEUE: usize = 64;

/// Shared application state for HTTP and WebSocket handlers
#[derive(Clone)]
pub struct AppState {
    /// Speech model shared by every session
    pub models: Arc<ModelCache>,

    /// Per-connection inbound frame queue capacity
    pub frame_queue: usize,
}

impl AppState {
    pub fn new(models: Arc<ModelCache>) -> Self {
        Self {
            models,
            frame_queue: DEFAULT_FRAME_QUEUE,
        }
    }

    pub fn with_frame_queue(mut self, frame_queue: usize) -> Self {
        self.frame_queue = frame_queue.max(1);
        self
    }
}
