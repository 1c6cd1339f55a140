// Shared helpers for integration tests: a scripted speech engine and a
// server bound to an ephemeral port.
#![allow(dead_code)]

use futures::{SinkExt, StreamExt};
use serde_json::Value;
use solfege_asr::{
    create_router, AppState, ModelCache, ModelLoader, RecognitionFrame, RecognizedWord,
    Recognizer, RecognizerError, SpeechModel,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

/// Fake engine: audio bytes since the last reset are read as text.
///
/// `word:conf` tokens become word-level results; bare tokens only show up
/// in the frame text.
pub struct ScriptedRecognizer {
    buffer: Vec<u8>,
}

#[async_trait::async_trait]
impl Recognizer for ScriptedRecognizer {
    fn reset(&mut self) {
        self.buffer.clear();
    }

    fn accept_audio(&mut self, pcm: &[u8]) -> Result<(), RecognizerError> {
        self.buffer.extend_from_slice(pcm);
        Ok(())
    }

    async fn finalize(&mut self) -> Result<RecognitionFrame, RecognizerError> {
        let raw = String::from_utf8_lossy(&self.buffer).to_string();
        let mut text = Vec::new();
        let mut words = Vec::new();

        for token in raw.split_whitespace() {
            match token.split_once(':') {
                Some((word, conf)) => {
                    text.push(word.to_string());
                    if let Ok(conf) = conf.parse() {
                        words.push(RecognizedWord::new(word, conf));
                    }
                }
                None => text.push(token.to_string()),
            }
        }

        Ok(RecognitionFrame {
            text: text.join(" "),
            words,
            confidence: None,
        })
    }
}

pub struct ScriptedModel;

impl SpeechModel for ScriptedModel {
    fn create_recognizer(
        &self,
        _sample_rate: u32,
        _vocabulary: &[String],
    ) -> Result<Box<dyn Recognizer>, RecognizerError> {
        Ok(Box::new(ScriptedRecognizer { buffer: Vec::new() }))
    }
}

pub struct ScriptedLoader;

impl ModelLoader for ScriptedLoader {
    fn load(&self) -> Result<Arc<dyn SpeechModel>, RecognizerError> {
        Ok(Arc::new(ScriptedModel))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

pub struct MissingModelLoader;

impl ModelLoader for MissingModelLoader {
    fn load(&self) -> Result<Arc<dyn SpeechModel>, RecognizerError> {
        Err(RecognizerError::ModelUnavailable(
            "Vosk model not found at /nonexistent".to_string(),
        ))
    }

    fn name(&self) -> &str {
        "missing"
    }
}

/// Engine whose `finalize` never completes; flags when it is dropped
pub struct StallingRecognizer {
    dropped: Arc<AtomicBool>,
}

#[async_trait::async_trait]
impl Recognizer for StallingRecognizer {
    fn reset(&mut self) {}

    fn accept_audio(&mut self, _pcm: &[u8]) -> Result<(), RecognizerError> {
        Ok(())
    }

    async fn finalize(&mut self) -> Result<RecognitionFrame, RecognizerError> {
        std::future::pending().await
    }
}

impl Drop for StallingRecognizer {
    fn drop(&mut self) {
        self.dropped.store(true, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct StallingLoader {
    dropped: Arc<AtomicBool>,
}

impl StallingLoader {
    /// Set once a recognizer built by this loader has been dropped
    pub fn dropped(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.dropped)
    }
}

struct StallingModel {
    dropped: Arc<AtomicBool>,
}

impl SpeechModel for StallingModel {
    fn create_recognizer(
        &self,
        _sample_rate: u32,
        _vocabulary: &[String],
    ) -> Result<Box<dyn Recognizer>, RecognizerError> {
        Ok(Box::new(StallingRecognizer {
            dropped: Arc::clone(&self.dropped),
        }))
    }
}

impl ModelLoader for StallingLoader {
    fn load(&self) -> Result<Arc<dyn SpeechModel>, RecognizerError> {
        Ok(Arc::new(StallingModel {
            dropped: Arc::clone(&self.dropped),
        }))
    }

    fn name(&self) -> &str {
        "stalling"
    }
}

pub fn app_state(loader: impl ModelLoader + 'static) -> AppState {
    AppState::new(Arc::new(ModelCache::new(Arc::new(loader))))
}

/// Start a server on 127.0.0.1:0 and return its WebSocket URL
pub async fn spawn_server(loader: impl ModelLoader + 'static) -> String {
    spawn_server_with_state(app_state(loader)).await
}

pub async fn spawn_server_with_state(state: AppState) -> String {
    let app = create_router(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("ws://{}/ws", addr)
}

/// Bare WebSocket client for asserting exact wire messages
pub struct RawClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl RawClient {
    pub async fn connect(url: &str) -> Self {
        let (stream, _) = connect_async(url).await.expect("Failed to connect");
        Self { stream }
    }

    pub async fn send_json(&mut self, value: Value) {
        self.send_text(&value.to_string()).await;
    }

    pub async fn send_text(&mut self, text: &str) {
        self.stream
            .send(Message::Text(text.to_string()))
            .await
            .unwrap();
    }

    pub async fn send_binary(&mut self, data: &[u8]) {
        self.stream
            .send(Message::Binary(data.to_vec()))
            .await
            .unwrap();
    }

    /// Next JSON reply, or `None` once the server has closed the connection
    pub async fn recv(&mut self) -> Option<Value> {
        loop {
            let frame = tokio::time::timeout(std::time::Duration::from_secs(5), self.stream.next())
                .await
                .expect("Timed out waiting for server");

            match frame {
                Some(Ok(Message::Text(text))) => return Some(serde_json::from_str(&text).unwrap()),
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => return None,
                Some(Ok(_)) => continue,
            }
        }
    }
}
