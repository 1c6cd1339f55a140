//! Recognition protocol client
//!
//! Speaks the `/ws` protocol from the client side: send `config`, then for each
//! segment `start_segment`, binary PCM, `end_segment`, and finally
//! `end_session`. Used by the `replay` command and the integration tests.

use crate::audio::{encode_pcm16, samples_for_duration, AudioFile};
use crate::http::{ControlMessage, OutgoingMessage};
use crate::session::SegmentResult;
use crate::solfege::Syllable;
use futures::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Invalid server message: {0}")]
    Decode(#[from] serde_json::Error),

    /// The server answered with an `error` frame
    #[error("Server error: {0}")]
    Server(String),

    #[error("Unexpected server message: {0:?}")]
    Unexpected(OutgoingMessage),

    #[error("Connection closed by server")]
    Closed,
}

pub struct AsrClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl AsrClient {
    /// Connect and configure a session at `sample_rate`
    pub async fn connect(url: &str, sample_rate: u32) -> Result<Self, ClientError> {
        info!("Connecting to {}", url);
        let (stream, _) = connect_async(url).await?;
        let mut client = Self { stream };

        match client.request(&ControlMessage::Config { sample_rate }).await? {
            OutgoingMessage::ConfigAck { .. } => Ok(client),
            other => Err(ClientError::Unexpected(other)),
        }
    }

    pub async fn start_segment(&mut self, segment_id: i64) -> Result<(), ClientError> {
        match self
            .request(&ControlMessage::StartSegment { segment_id })
            .await?
        {
            OutgoingMessage::StartAck { .. } => Ok(()),
            other => Err(ClientError::Unexpected(other)),
        }
    }

    /// Send one chunk of 16-bit little-endian PCM
    pub async fn send_audio(&mut self, pcm: Vec<u8>) -> Result<(), ClientError> {
        self.stream.send(Message::Binary(pcm)).await?;
        Ok(())
    }

    /// Close the open segment; `None` if the server had no segment open
    pub async fn end_segment(&mut self) -> Result<Option<SegmentResult>, ClientError> {
        match self.request(&ControlMessage::EndSegment).await? {
            OutgoingMessage::SegmentResult { result } => Ok(result),
            other => Err(ClientError::Unexpected(other)),
        }
    }

    /// End the session and collect every segment result
    pub async fn end_session(mut self) -> Result<Vec<SegmentResult>, ClientError> {
        let reply = self.request(&ControlMessage::EndSession).await?;
        // The server closes after replying
        if let Err(e) = self.close().await {
            debug!("Close after end_session: {}", e);
        }

        match reply {
            OutgoingMessage::SessionResults { results } => Ok(results),
            other => Err(ClientError::Unexpected(other)),
        }
    }

    /// Send a raw text frame without waiting for a reply
    pub async fn send_text(&mut self, text: impl Into<String>) -> Result<(), ClientError> {
        self.stream.send(Message::Text(text.into())).await?;
        Ok(())
    }

    /// Close the connection without ending the session
    pub async fn close(mut self) -> Result<(), ClientError> {
        self.stream.close(None).await?;
        Ok(())
    }

    /// Next JSON message from the server, skipping non-text frames
    pub async fn next_message(&mut self) -> Result<OutgoingMessage, ClientError> {
        while let Some(frame) = self.stream.next().await {
            match frame? {
                Message::Text(text) => return Ok(serde_json::from_str(&text)?),
                Message::Close(_) => return Err(ClientError::Closed),
                _ => continue,
            }
        }

        Err(ClientError::Closed)
    }

    async fn request(&mut self, message: &ControlMessage) -> Result<OutgoingMessage, ClientError> {
        self.send_text(serde_json::to_string(message)?).await?;

        match self.next_message().await? {
            OutgoingMessage::Error { detail } => Err(ClientError::Server(detail)),
            reply => Ok(reply),
        }
    }
}

/// Stream a WAV file through the server, one segment per `segment_ms` slice.
///
/// Each slice is sent in `frame_ms` chunks, mirroring how a microphone
/// streams. Returns the server's `session_results`.
pub async fn replay(
    url: &str,
    audio: &AudioFile,
    segment_ms: u64,
    frame_ms: u64,
) -> Result<Vec<SegmentResult>, ClientError> {
    let samples = audio.mono_samples();
    let segment_len = samples_for_duration(audio.sample_rate, segment_ms).max(1);
    let frame_len = samples_for_duration(audio.sample_rate, frame_ms).max(1);

    let mut client = AsrClient::connect(url, audio.sample_rate).await?;

    for (index, segment) in samples.chunks(segment_len).enumerate() {
        let segment_id = index as i64;
        client.start_segment(segment_id).await?;

        for frame in segment.chunks(frame_len) {
            client.send_audio(encode_pcm16(frame)).await?;
        }

        match client.end_segment().await? {
            Some(result) => {
                let degree = result
                    .word
                    .as_deref()
                    .and_then(Syllable::from_word)
                    .map(Syllable::degree);
                info!(
                    "Segment {}: {:?} (degree {:?}, confidence {:?})",
                    segment_id, result.word, degree, result.confidence
                );
            }
            None => debug!("Segment {}: no result", segment_id),
        }
    }

    client.end_session().await
}
