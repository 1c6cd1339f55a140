//! Speech engine adapter
//!
//! The rest of the crate talks to the speech engine only through these traits:
//! - `ModelLoader` loads an acoustic model (expensive, done once per process)
//! - `SpeechModel` creates grammar-constrained recognizers from a loaded model
//! - `Recognizer` is one streaming decoder, owned by exactly one session
//!
//! `ModelCache` memoizes the first successful load and is shared by all sessions.

mod cache;
mod frame;
mod loader;

#[cfg(feature = "vosk")]
mod vosk;

pub use cache::ModelCache;
pub use frame::{RecognitionFrame, RecognizedWord};
pub use loader::ModelDirLoader;

#[cfg(feature = "vosk")]
pub use self::vosk::{VoskModel, VoskRecognizer};

use crate::error::RecognizerError;
use std::sync::Arc;

/// Streaming decoder for a single session
///
/// Audio accepted since the last `reset` is what `finalize` decodes.
/// Callers must `reset` before reusing a recognizer for a new segment; a
/// second `finalize` without a reset may return empty or stale output.
#[async_trait::async_trait]
pub trait Recognizer: Send {
    /// Discard all decoder state
    fn reset(&mut self);

    /// Feed raw 16-bit little-endian mono PCM
    fn accept_audio(&mut self, pcm: &[u8]) -> Result<(), RecognizerError>;

    /// Flush and return the best decoding since the last reset
    async fn finalize(&mut self) -> Result<RecognitionFrame, RecognizerError>;
}

/// A loaded acoustic model
pub trait SpeechModel: Send + Sync {
    /// Create a recognizer constrained to `vocabulary`
    fn create_recognizer(
        &self,
        sample_rate: u32,
        vocabulary: &[String],
    ) -> Result<Box<dyn Recognizer>, RecognizerError>;
}

/// Loads an acoustic model from wherever it lives
pub trait ModelLoader: Send + Sync {
    /// Load the model. Called on the blocking thread pool.
    fn load(&self) -> Result<Arc<dyn SpeechModel>, RecognizerError>;

    /// Loader name for logging
    fn name(&self) -> &str;
}
