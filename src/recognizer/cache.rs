use super::{ModelLoader, Recognizer, SpeechModel};
use crate::error::RecognizerError;
use crate::session::SessionConfig;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{info, warn};

/// Process-wide speech model cache
///
/// The first successful load is kept and shared read-only by every session.
/// Concurrent first loads are serialized; failed loads are not cached, so the
/// next caller retries.
pub struct ModelCache {
    loader: Arc<dyn ModelLoader>,
    model: OnceCell<Arc<dyn SpeechModel>>,
}

impl ModelCache {
    pub fn new(loader: Arc<dyn ModelLoader>) -> Self {
        Self {
            loader,
            model: OnceCell::new(),
        }
    }

    /// Get the loaded model, loading it on first use
    pub async fn model(&self) -> Result<Arc<dyn SpeechModel>, RecognizerError> {
        let model = self
            .model
            .get_or_try_init(|| async {
                let loader = Arc::clone(&self.loader);
                info!("Loading speech model via {}", loader.name());

                let result = tokio::task::spawn_blocking(move || loader.load())
                    .await
                    .map_err(|e| {
                        RecognizerError::ModelUnavailable(format!("Model loader panicked: {}", e))
                    })
                    .and_then(|loaded| loaded);

                match &result {
                    Ok(_) => info!("Speech model loaded"),
                    Err(e) => warn!("Failed to load speech model: {}", e),
                }

                result
            })
            .await?;

        Ok(Arc::clone(model))
    }

    /// Whether a model has been loaded successfully
    pub fn is_loaded(&self) -> bool {
        self.model.initialized()
    }

    /// Create a recognizer for a session
    pub async fn create_recognizer(
        &self,
        config: &SessionConfig,
    ) -> Result<Box<dyn Recognizer>, RecognizerError> {
        let model = self.model().await?;
        model.create_recognizer(config.sample_rate, &config.vocabulary)
    }
}
