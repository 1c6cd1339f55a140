//! Vosk/Kaldi engine
//!
//! `finalize` flushes the decoder on the blocking pool, so a dropped
//! connection stops waiting on it straight away (the decode itself still runs
//! to completion). `accept_audio` decodes inline on the calling task; chunks
//! are a few hundred milliseconds of audio at most.

use super::{RecognitionFrame, RecognizedWord, Recognizer, SpeechModel};
use crate::audio::Pcm16Decoder;
use crate::error::RecognizerError;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};
use vosk::{CompleteResult, Model};

pub struct VoskModel {
    model: Model,
}

impl VoskModel {
    pub fn load(path: &Path) -> Result<Self, RecognizerError> {
        let model = Model::new(path.to_string_lossy()).ok_or_else(|| {
            RecognizerError::ModelUnavailable(format!(
                "Failed to load Vosk model at {}",
                path.display()
            ))
        })?;

        Ok(Self { model })
    }
}

impl SpeechModel for VoskModel {
    fn create_recognizer(
        &self,
        sample_rate: u32,
        vocabulary: &[String],
    ) -> Result<Box<dyn Recognizer>, RecognizerError> {
        let mut recognizer =
            vosk::Recognizer::new_with_grammar(&self.model, sample_rate as f32, vocabulary)
                .ok_or_else(|| {
                    RecognizerError::Create(format!(
                        "Vosk rejected recognizer at {} Hz with {} grammar words",
                        sample_rate,
                        vocabulary.len()
                    ))
                })?;
        recognizer.set_words(true);

        Ok(Box::new(VoskRecognizer {
            recognizer: Arc::new(Mutex::new(recognizer)),
            pcm: Pcm16Decoder::new(),
        }))
    }
}

pub struct VoskRecognizer {
    /// Shared with an in-flight `finalize` on the blocking pool
    recognizer: Arc<Mutex<vosk::Recognizer>>,
    pcm: Pcm16Decoder,
}

fn lock(
    recognizer: &Mutex<vosk::Recognizer>,
) -> Result<MutexGuard<'_, vosk::Recognizer>, RecognizerError> {
    recognizer
        .lock()
        .map_err(|_| RecognizerError::Decode("Vosk recognizer lock poisoned".to_string()))
}

fn frame_from(result: CompleteResult<'_>) -> RecognitionFrame {
    match result {
        CompleteResult::Single(single) => RecognitionFrame {
            text: single.text.to_string(),
            words: single
                .result
                .iter()
                .map(|w| RecognizedWord::new(w.word, f64::from(w.conf)))
                .collect(),
            confidence: None,
        },
        // Only produced when max_alternatives > 0; alternatives carry no word confidences
        CompleteResult::Multiple(multiple) => {
            let best = multiple.alternatives.first();
            RecognitionFrame {
                text: best.map(|a| a.text.to_string()).unwrap_or_default(),
                words: Vec::new(),
                confidence: best.map(|a| f64::from(a.confidence)),
            }
        }
    }
}

#[async_trait::async_trait]
impl Recognizer for VoskRecognizer {
    fn reset(&mut self) {
        match lock(&self.recognizer) {
            Ok(mut recognizer) => recognizer.reset(),
            Err(e) => warn!("Skipping Vosk reset: {}", e),
        }
        self.pcm.reset();
    }

    fn accept_audio(&mut self, pcm: &[u8]) -> Result<(), RecognizerError> {
        let samples = self.pcm.push(pcm);
        if samples.is_empty() {
            return Ok(());
        }

        lock(&self.recognizer)?
            .accept_waveform(&samples)
            .map_err(|e| RecognizerError::Decode(format!("{:?}", e)))?;

        Ok(())
    }

    async fn finalize(&mut self) -> Result<RecognitionFrame, RecognizerError> {
        let recognizer = Arc::clone(&self.recognizer);
        let frame = tokio::task::spawn_blocking(move || {
            let mut recognizer = lock(&recognizer)?;
            let frame = frame_from(recognizer.final_result());
            Ok::<_, RecognizerError>(frame)
        })
        .await
        .map_err(|e| RecognizerError::Decode(format!("Vosk finalize task failed: {}", e)))??;

        debug!(text = %frame.text, words = frame.words.len(), "Vosk final result");
        Ok(frame)
    }
}
