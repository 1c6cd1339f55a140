//! HTTP/WebSocket gateway
//!
//! - GET /ws - Recognition session (JSON control frames + binary PCM)
//! - GET /health - Model availability probe

mod handlers;
pub mod messages;
mod routes;
mod state;
mod ws;

pub use handlers::HealthResponse;
pub use messages::{ControlMessage, OutgoingMessage};
pub use routes::create_router;
pub use state::{AppState, DEFAULT_FRAME_QUEUE};
