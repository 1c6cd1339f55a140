//! WebSocket gateway
//!
//! One connection carries interleaved JSON control frames and binary PCM
//! frames. A reader task pulls frames off the socket into a bounded queue; the
//! connection task handles them one at a time, in arrival order, against the
//! connection's `SessionController`.

use super::messages::{ControlMessage, OutgoingMessage};
use super::state::AppState;
use crate::error::{ControlError, SessionError};
use crate::session::SessionController;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::stream::{SplitSink, StreamExt};
use futures::SinkExt;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// An inbound frame, classified
#[derive(Debug)]
enum Inbound {
    Control(ControlMessage),
    Audio(Vec<u8>),
    Rejected(ControlError),
    Ignored,
}

impl From<Message> for Inbound {
    fn from(message: Message) -> Self {
        match message {
            Message::Text(text) => match ControlMessage::parse(&text) {
                Ok(control) => Self::Control(control),
                Err(e) => Self::Rejected(e),
            },
            Message::Binary(data) => Self::Audio(data),
            Message::Ping(_) | Message::Pong(_) | Message::Close(_) => Self::Ignored,
        }
    }
}

/// What to do after handling a frame
enum Step {
    Continue(Option<OutgoingMessage>),
    Finish(OutgoingMessage),
}

/// GET /ws
/// Upgrade to a recognition session
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| {
        let span = info_span!("ws", conn = %Uuid::new_v4());
        handle_socket(socket, state).instrument(span)
    })
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    info!("WebSocket connection established");

    let (mut sender, mut receiver) = socket.split();
    let (frame_tx, mut frame_rx) = mpsc::channel::<Message>(state.frame_queue);
    let (closed_tx, mut closed_rx) = oneshot::channel::<()>();

    // Stops reading when the queue is full, which pushes back on the client
    let reader = tokio::spawn(
        async move {
            while let Some(result) = receiver.next().await {
                match result {
                    Ok(Message::Close(_)) => break,
                    Ok(message) => {
                        if frame_tx.send(message).await.is_err() {
                            return;
                        }
                    }
                    Err(e) => {
                        debug!("WebSocket receive error: {}", e);
                        break;
                    }
                }
            }
            info!("Client disconnected");
            let _ = closed_tx.send(());
        }
        .in_current_span(),
    );

    let mut session = SessionController::new(Arc::clone(&state.models));

    while let Some(message) = frame_rx.recv().await {
        let outcome = tokio::select! {
            biased;
            outcome = dispatch(Inbound::from(message), &mut session) => outcome,
            _ = &mut closed_rx => {
                info!("Connection dropped; abandoning in-flight work");
                break;
            }
        };

        match outcome {
            Ok(Step::Continue(None)) => {}
            Ok(Step::Continue(Some(reply))) => {
                if send(&mut sender, &reply).await.is_err() {
                    break;
                }
            }
            Ok(Step::Finish(reply)) => {
                let _ = send(&mut sender, &reply).await;
                break;
            }
            Err(e) => {
                error!("Session failed: {}", e);
                let reply = OutgoingMessage::Error {
                    detail: e.to_string(),
                };
                let _ = send(&mut sender, &reply).await;
                break;
            }
        }
    }

    reader.abort();
    if let Err(e) = sender.close().await {
        debug!("Error closing WebSocket: {}", e);
    }

    if let Some(stats) = session.stats() {
        info!(
            "Connection closed: {} segments, {} audio bytes, {:.1}s",
            stats.segments_count, stats.audio_bytes, stats.duration_secs
        );
    }
    info!("WebSocket connection terminated");
}

/// Handle one frame against the session
async fn dispatch(inbound: Inbound, session: &mut SessionController) -> Result<Step, SessionError> {
    let reply = match inbound {
        Inbound::Control(ControlMessage::Config { sample_rate }) => {
            session.apply_config(sample_rate).await?;
            OutgoingMessage::ConfigAck { sample_rate }
        }
        Inbound::Control(ControlMessage::StartSegment { segment_id }) => {
            session.start_segment(segment_id).await?;
            OutgoingMessage::StartAck { segment_id }
        }
        Inbound::Control(ControlMessage::EndSegment) => OutgoingMessage::SegmentResult {
            result: session.end_segment().await?,
        },
        Inbound::Control(ControlMessage::EndSession) => {
            let results = session.end_session()?;
            return Ok(Step::Finish(OutgoingMessage::SessionResults { results }));
        }
        Inbound::Audio(pcm) => {
            session.accept_audio(&pcm).await?;
            return Ok(Step::Continue(None));
        }
        Inbound::Rejected(e) => {
            warn!("Rejected control frame: {}", e);
            e.into()
        }
        Inbound::Ignored => return Ok(Step::Continue(None)),
    };

    Ok(Step::Continue(Some(reply)))
}

async fn send(
    sender: &mut SplitSink<WebSocket, Message>,
    message: &OutgoingMessage,
) -> Result<(), axum::Error> {
    let text = match serde_json::to_string(message) {
        Ok(text) => text,
        Err(e) => {
            error!("Failed to serialize outgoing message: {}", e);
            return Ok(());
        }
    };

    sender.send(Message::Text(text)).await.map_err(|e| {
        debug!("Failed to send WebSocket message: {}", e);
        e
    })
}
