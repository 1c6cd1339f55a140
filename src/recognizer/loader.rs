use super::{ModelLoader, SpeechModel};
use crate::error::RecognizerError;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Loads a Vosk model from a directory on disk
pub struct ModelDirLoader {
    path: PathBuf,
}

impl ModelDirLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ModelLoader for ModelDirLoader {
    fn load(&self) -> Result<Arc<dyn SpeechModel>, RecognizerError> {
        if !self.path.is_dir() {
            return Err(RecognizerError::ModelUnavailable(format!(
                "Vosk model not found at {}",
                self.path.display()
            )));
        }

        #[cfg(feature = "vosk")]
        {
            let model = super::vosk::VoskModel::load(&self.path)?;
            Ok(Arc::new(model))
        }

        #[cfg(not(feature = "vosk"))]
        {
            Err(RecognizerError::ModelUnavailable(format!(
                "Cannot load model at {}: built without the `vosk` feature",
                self.path.display()
            )))
        }
    }

    fn name(&self) -> &str {
        "model directory"
    }
}
