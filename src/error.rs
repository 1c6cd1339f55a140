//! Error types for the recognition pipeline and the control protocol.

use thiserror::Error;

/// Failures raised by a speech engine or while loading its model
#[derive(Debug, Clone, Error)]
pub enum RecognizerError {
    /// The acoustic model could not be loaded (missing or unreadable directory)
    #[error("Speech model unavailable: {0}")]
    ModelUnavailable(String),

    /// The engine rejected the recognizer configuration (rate, grammar)
    #[error("Failed to create recognizer: {0}")]
    Create(String),

    /// The engine failed while decoding audio
    #[error("Decoding failed: {0}")]
    Decode(String),
}

/// Errors that end a session
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Recognizer(#[from] RecognizerError),

    /// An operation arrived after `end_session`
    #[error("Session already ended")]
    Ended,
}

/// Non-fatal problems with an inbound control frame.
///
/// The `Display` output is sent verbatim as the `detail` of an `error` reply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControlError {
    #[error("Invalid JSON")]
    InvalidJson,

    #[error("Unknown type {0}")]
    UnknownType(String),

    /// Known `type` whose fields are missing or of the wrong shape
    #[error("Invalid {kind} message: {reason}")]
    InvalidMessage { kind: String, reason: String },
}
