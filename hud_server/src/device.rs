//! WebSocket bridge to the glasses.
//!
//! Inbound text frames carry transcription events; outbound text frames
//! carry the text wall to show. One connection is one device session.

use crate::hub::HubHandle;
use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Transcription event sent by the device
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechFrame {
    pub text: String,
    #[serde(default)]
    pub is_final: bool,
}

/// Display update sent to the device
#[derive(Debug, Serialize)]
pub struct DisplayFrame<'a> {
    pub view: &'static str,
    pub text: &'a str,
}

impl<'a> DisplayFrame<'a> {
    pub fn main(text: &'a str) -> Self {
        Self { view: "main", text }
    }
}

/// Serve one device connection until it closes or is superseded
pub async fn run(socket: WebSocket, hub: HubHandle) {
    let (mut sink, mut stream) = socket.split();
    let (display_tx, mut display_rx) = mpsc::unbounded_channel::<String>();

    let device = match hub.attach(display_tx).await {
        Ok(id) => id,
        Err(e) => {
            tracing::error!("Unable to attach device: {}", e);
            return;
        }
    };
    tracing::info!(%device, "Glasses connected");

    // Ends when the hub drops our display channel or the socket goes away
    let mut forward = tokio::spawn(async move {
        while let Some(text) = display_rx.recv().await {
            let frame = match serde_json::to_string(&DisplayFrame::main(&text)) {
                Ok(frame) => frame,
                Err(e) => {
                    tracing::warn!("Failed to encode display frame: {}", e);
                    continue;
                }
            };
            if sink.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    loop {
        tokio::select! {
            _ = &mut forward => break,
            msg = stream.next() => match msg {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<SpeechFrame>(text.as_str()) {
                        Ok(frame) => {
                            if hub.speech(device, frame.text, frame.is_final).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => tracing::warn!("Ignoring malformed speech frame: {}", e),
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::info!("WebSocket error: {}", e);
                    break;
                }
            }
        }
    }

    forward.abort();
    let _ = hub.detach(device).await;
    tracing::info!(%device, "Glasses disconnected");
}
