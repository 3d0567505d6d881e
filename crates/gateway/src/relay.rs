//! The `/api/generate` stream relay.
//!
//! Takes a conversation history plus a model id, opens a streaming
//! completion against the upstream provider, and re-frames every delta as a
//! `thought_chunk` SSE event. The HTTP status is always `200 OK` once the
//! stream opens; every failure mode — missing key, missing model, upstream
//! error, timeout — arrives in-band as a single terminal `error` event.

use crate::SharedState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::sse::{Event as SseEvent, Sse};
use axum::response::Json;
use futures::Stream;
use promptforge_core::error::ProviderError;
use promptforge_core::message::ChatMessage;
use promptforge_core::provider::ProviderRequest;
use promptforge_core::stream::StreamEvent;
use serde::Deserialize;
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;
use tracing::{debug, info, warn};

/// The relay's fixed timeout wording. Clients match on it, so it never
/// changes shape.
pub const TIMEOUT_MESSAGE: &str = "Request timeout - please try again";

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub history: Vec<ChatMessage>,
    #[serde(default)]
    pub model: String,
}

/// `POST /api/generate` — relay one streaming completion as SSE.
pub async fn generate_handler(
    State(state): State<SharedState>,
    Json(payload): Json<GenerateRequest>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    info!(
        model = %payload.model,
        history_len = payload.history.len(),
        "Relay request"
    );

    let (tx, rx) = mpsc::channel::<StreamEvent>(64);
    tokio::spawn(run_relay(state, payload, tx));

    let stream = ReceiverStream::new(rx).map(|event| {
        let data = serde_json::to_string(&event).unwrap_or_default();
        Ok(SseEvent::default().data(data))
    });

    Sse::new(stream)
}

/// Drive one upstream stream to completion, emitting relay events.
///
/// Exactly one terminal event (`stream_end` or `error`) is sent on every
/// path out of this function.
async fn run_relay(state: SharedState, payload: GenerateRequest, tx: mpsc::Sender<StreamEvent>) {
    // Configuration problems are reported before any upstream call.
    if state.config.provider.api_key.is_none() {
        let message = format!(
            "{} API key not configured.",
            state.config.provider.display_name()
        );
        warn!("Relay rejected: no API key configured");
        let _ = tx.send(StreamEvent::error(message)).await;
        return;
    }

    if payload.model.trim().is_empty() {
        let _ = tx.send(StreamEvent::error("Model ID is required.")).await;
        return;
    }

    let request = ProviderRequest::new(payload.model, payload.history)
        .with_temperature(state.config.provider.temperature)
        .with_max_tokens(state.config.provider.max_tokens);

    // One wall-clock budget covers connecting and the whole read.
    let deadline = tokio::time::Instant::now()
        + Duration::from_secs(state.config.provider.request_timeout_secs);

    let mut chunks = match tokio::time::timeout_at(deadline, state.provider.stream(request)).await {
        Ok(Ok(rx)) => rx,
        Ok(Err(e)) => {
            let _ = tx.send(error_event(&state, &e)).await;
            return;
        }
        Err(_) => {
            let _ = tx.send(StreamEvent::error(TIMEOUT_MESSAGE)).await;
            return;
        }
    };

    let mut forwarded = 0usize;
    loop {
        match tokio::time::timeout_at(deadline, chunks.recv()).await {
            Ok(Some(Ok(chunk))) => {
                if let Some(text) = chunk.content {
                    if !text.is_empty() {
                        forwarded += 1;
                        if tx.send(StreamEvent::chunk(text)).await.is_err() {
                            // Client went away; nothing left to relay to.
                            return;
                        }
                    }
                }
                if chunk.done {
                    debug!(chunks = forwarded, "Relay stream complete");
                    let _ = tx.send(StreamEvent::end()).await;
                    return;
                }
            }
            Ok(Some(Err(e))) => {
                let _ = tx.send(error_event(&state, &e)).await;
                return;
            }
            Ok(None) => {
                // Upstream closed without a done marker; still end cleanly.
                let _ = tx.send(StreamEvent::end()).await;
                return;
            }
            Err(_) => {
                warn!(chunks = forwarded, "Relay deadline exceeded mid-stream");
                let _ = tx.send(StreamEvent::error(TIMEOUT_MESSAGE)).await;
                return;
            }
        }
    }
}

/// Map a provider failure onto the relay's fixed message vocabulary.
fn error_event(state: &SharedState, err: &ProviderError) -> StreamEvent {
    let display = state.config.provider.display_name();
    let message = match err {
        ProviderError::ApiError { status_code, .. } => {
            format!("{display} API error: {}", reason_phrase(*status_code))
        }
        ProviderError::AuthenticationFailed(_) => {
            format!("{display} API error: Unauthorized")
        }
        ProviderError::Timeout(_) => TIMEOUT_MESSAGE.to_string(),
        other => other.to_string(),
    };
    warn!(error = %err, message = %message, "Relay upstream failure");
    StreamEvent::error(message)
}

/// HTTP reason phrase for a status code, falling back to the bare number.
fn reason_phrase(status_code: u16) -> String {
    StatusCode::from_u16(status_code)
        .ok()
        .and_then(|s| s.canonical_reason())
        .map(String::from)
        .unwrap_or_else(|| status_code.to_string())
}
