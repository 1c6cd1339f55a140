use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one `start_segment` / `end_segment` pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentResult {
    /// Client-supplied segment id (not validated for uniqueness)
    pub segment_id: i64,

    /// Recognized syllable, if any
    pub word: Option<String>,

    /// Confidence score (0.0 to 1.0), if available
    pub confidence: Option<f64>,
}

/// Statistics about a recognition session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    /// Current sample rate (Hz)
    pub sample_rate: u32,

    /// When the session was created
    pub started_at: DateTime<Utc>,

    /// Session age in seconds
    pub duration_secs: f64,

    /// Number of segments finalized so far
    pub segments_count: usize,

    /// Total PCM bytes accepted
    pub audio_bytes: usize,
}
