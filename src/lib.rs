pub mod audio;
pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod http;
pub mod recognizer;
pub mod session;
pub mod solfege;

pub use audio::{AudioFile, Pcm16Decoder};
pub use client::{AsrClient, ClientError};
pub use config::Config;
pub use error::{ControlError, RecognizerError, SessionError};
pub use extract::{extract, Extraction};
pub use http::{create_router, AppState, ControlMessage, OutgoingMessage};
pub use recognizer::{
    ModelCache, ModelDirLoader, ModelLoader, RecognitionFrame, RecognizedWord, Recognizer,
    SpeechModel,
};
pub use session::{SegmentResult, SessionController, SessionState, SessionStats};
pub use solfege::{Syllable, VOCABULARY};
