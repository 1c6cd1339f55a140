use crate::solfege::VOCABULARY;

/// Sample rate used when a client streams audio without sending `config`
pub const DEFAULT_SAMPLE_RATE: u32 = 16000;

/// Configuration for a recognition session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Sample rate of the incoming PCM stream (Hz)
    pub sample_rate: u32,

    /// Grammar the recognizer is constrained to
    pub vocabulary: Vec<String>,
}

impl SessionConfig {
    pub fn with_sample_rate(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            ..Self::default()
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            vocabulary: VOCABULARY.iter().map(|w| w.to_string()).collect(),
        }
    }
}
