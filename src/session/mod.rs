//! Recognition session management
//!
//! This module provides the per-connection state machine:
//! - `Session` owns one recognizer, the open segment and the results so far
//! - `SessionController` drives a session through config → segments → end,
//!   creating it on demand when a client skips the `config` message
//! - `SegmentResult` and `SessionStats` are what callers get back

mod config;
mod session;
mod stats;

pub use config::{SessionConfig, DEFAULT_SAMPLE_RATE};
pub use session::{Session, SessionController, SessionState};
pub use stats::{SegmentResult, SessionStats};
