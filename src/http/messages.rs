//! Control protocol messages
//!
//! Control frames are JSON objects tagged by `type`; audio travels as binary
//! frames and never passes through here.

use crate::error::ControlError;
use crate::session::{SegmentResult, DEFAULT_SAMPLE_RATE};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const KNOWN_TYPES: [&str; 4] = ["config", "start_segment", "end_segment", "end_session"];

/// Client → server control messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlMessage {
    Config {
        #[serde(rename = "sampleRate", default = "default_sample_rate")]
        sample_rate: u32,
    },
    StartSegment {
        #[serde(rename = "segmentId")]
        segment_id: i64,
    },
    EndSegment,
    EndSession,
}

fn default_sample_rate() -> u32 {
    DEFAULT_SAMPLE_RATE
}

impl ControlMessage {
    /// Parse a text frame, classifying failures for the `error` reply
    pub fn parse(text: &str) -> Result<Self, ControlError> {
        let value: Value = serde_json::from_str(text).map_err(|_| ControlError::InvalidJson)?;

        let kind = match value.get("type") {
            Some(Value::String(kind)) => kind.clone(),
            Some(other) => other.to_string(),
            None => "null".to_string(),
        };

        if !KNOWN_TYPES.contains(&kind.as_str()) {
            return Err(ControlError::UnknownType(kind));
        }

        let message: Self =
            serde_json::from_value(value).map_err(|e| ControlError::InvalidMessage {
                kind: kind.clone(),
                reason: e.to_string(),
            })?;

        if let Self::Config { sample_rate: 0 } = message {
            return Err(ControlError::InvalidMessage {
                kind,
                reason: "sampleRate must be positive".to_string(),
            });
        }

        Ok(message)
    }
}

/// Server → client messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutgoingMessage {
    ConfigAck {
        #[serde(rename = "sampleRate")]
        sample_rate: u32,
    },
    StartAck {
        #[serde(rename = "segmentId")]
        segment_id: i64,
    },
    SegmentResult {
        result: Option<SegmentResult>,
    },
    SessionResults {
        results: Vec<SegmentResult>,
    },
    Error {
        detail: String,
    },
}

impl From<ControlError> for OutgoingMessage {
    fn from(err: ControlError) -> Self {
        Self::Error {
            detail: err.to_string(),
        }
    }
}
