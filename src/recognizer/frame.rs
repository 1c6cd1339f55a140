/// Finalized engine output for one segment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecognitionFrame {
    /// Full decoded text
    pub text: String,

    /// Word-level spans in engine order (may be empty)
    pub words: Vec<RecognizedWord>,

    /// Utterance-level confidence, if the engine reports one
    pub confidence: Option<f64>,
}

/// A single recognized word with its confidence (0.0 to 1.0)
#[derive(Debug, Clone, PartialEq)]
pub struct RecognizedWord {
    pub word: String,
    pub conf: f64,
}

impl RecognizedWord {
    pub fn new(word: impl Into<String>, conf: f64) -> Self {
        Self {
            word: word.into(),
            conf,
        }
    }
}
