//! Segment result extraction
//!
//! Reduces a finalized engine result to a single (word, confidence) pair. The
//! grammar should yield at most one token per segment, but engines may report
//! zero or several spans, so the choice has to be deterministic:
//!
//! 1. With word-level spans, take the highest `conf` (first one wins ties).
//! 2. Otherwise take the first whitespace token of `text`, paired with the
//!    frame-level confidence if the engine gave one.
//! 3. Otherwise nothing was recognized.

use crate::recognizer::{RecognitionFrame, RecognizedWord};

/// The chosen word and its confidence
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub word: Option<String>,
    pub confidence: Option<f64>,
}

pub fn extract(frame: &RecognitionFrame) -> Extraction {
    let best = frame
        .words
        .iter()
        .fold(None::<&RecognizedWord>, |best, candidate| match best {
            Some(current) if current.conf >= candidate.conf => Some(current),
            _ => Some(candidate),
        });

    if let Some(best) = best {
        return Extraction {
            word: Some(best.word.clone()),
            confidence: Some(best.conf),
        };
    }

    match frame.text.split_whitespace().next() {
        Some(token) => Extraction {
            word: Some(token.to_string()),
            confidence: frame.confidence,
        },
        None => Extraction::default(),
    }
}
