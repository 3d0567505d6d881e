//! Relay client — drives a running gateway's `/api/generate` endpoint.
//!
//! Implements `Provider` over the relay's normalized event stream, so the
//! agent loop can run against a remote relay exactly as it runs against a
//! direct provider: `thought_chunk` events become content deltas,
//! `stream_end` becomes the done chunk, and an in-band `error` event becomes
//! a stream error.

use async_trait::async_trait;
use futures::StreamExt;
use promptforge_core::error::ProviderError;
use promptforge_core::message::ChatMessage;
use promptforge_core::provider::{Provider, ProviderRequest, ProviderResponse, StreamChunk};
use promptforge_core::stream::{SseDecoder, StreamEvent};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A `Provider` backed by a Promptforge relay instead of a raw inference API.
pub struct RelayClient {
    base_url: String,
    client: reqwest::Client,
}

/// The relay's request body: `{ history, model }`.
#[derive(Serialize)]
struct GenerateBody<'a> {
    history: &'a [ChatMessage],
    model: &'a str,
}

/// The relay's `/api/models` response envelope.
#[derive(Deserialize)]
struct ModelsBody {
    models: Vec<String>,
}

impl RelayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Recover the error category from a relay error event's message.
///
/// The relay reports all failures in-band with fixed phrasings; the message
/// itself is preserved verbatim for display.
fn map_relay_error(message: String) -> ProviderError {
    if message.contains("The model") {
        ProviderError::ModelUnavailable(message)
    } else if message.contains("timeout") {
        ProviderError::Timeout(message)
    } else if message.contains("not configured") {
        ProviderError::NotConfigured(message)
    } else {
        ProviderError::Upstream(message)
    }
}

#[async_trait]
impl Provider for RelayClient {
    fn name(&self) -> &str {
        "relay"
    }

    /// Drain the relay stream into one complete response.
    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError> {
        let model = request.model.clone();
        let mut rx = self.stream(request).await?;

        let mut content = String::new();
        while let Some(chunk) = rx.recv().await {
            let chunk = chunk?;
            if let Some(delta) = chunk.content {
                content.push_str(&delta);
            }
            if chunk.done {
                break;
            }
        }

        Ok(ProviderResponse { content, model })
    }

    async fn stream(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<
        tokio::sync::mpsc::Receiver<std::result::Result<StreamChunk, ProviderError>>,
        ProviderError,
    > {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateBody {
            history: &request.messages,
            model: &request.model,
        };

        debug!(relay = %self.base_url, model = %request.model, "Opening relay stream");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(e.to_string())
                } else {
                    ProviderError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Relay returned error status");
            return Err(ProviderError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let (tx, rx) = tokio::sync::mpsc::channel(64);

        tokio::spawn(async move {
            let mut byte_stream = response.bytes_stream();
            let mut decoder = SseDecoder::new();

            while let Some(chunk_result) = byte_stream.next().await {
                let bytes = match chunk_result {
                    Ok(b) => b,
                    Err(e) => {
                        let _ = tx
                            .send(Err(ProviderError::StreamInterrupted(e.to_string())))
                            .await;
                        return;
                    }
                };

                for event in decoder.feed(&bytes) {
                    match event {
                        StreamEvent::ThoughtChunk { payload } => {
                            if tx.send(Ok(StreamChunk::delta(payload.text))).await.is_err() {
                                return; // receiver dropped
                            }
                        }
                        StreamEvent::StreamEnd { .. } => {
                            let _ = tx.send(Ok(StreamChunk::done())).await;
                            return;
                        }
                        StreamEvent::Error { payload } => {
                            let _ = tx.send(Err(map_relay_error(payload.message))).await;
                            return;
                        }
                    }
                }
            }

            // Relay closed without a terminal event — still terminate cleanly
            let _ = tx.send(Ok(StreamChunk::done())).await;
        });

        Ok(rx)
    }

    async fn list_models(&self) -> std::result::Result<Vec<String>, ProviderError> {
        let url = format!("{}/api/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let body: ModelsBody = response
            .json()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        Ok(body.models)
    }

    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok(response.status().is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_stripped() {
        let client = RelayClient::new("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn generate_body_shape() {
        let history = vec![ChatMessage::user("hi")];
        let body = GenerateBody {
            history: &history,
            model: "llama-8b",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "history": [{"role": "user", "content": "hi"}],
                "model": "llama-8b"
            })
        );
    }

    #[test]
    fn relay_error_mapping() {
        assert!(matches!(
            map_relay_error("Request timeout - please try again".into()),
            ProviderError::Timeout(_)
        ));
        assert!(matches!(
            map_relay_error("Fireworks API key not configured.".into()),
            ProviderError::NotConfigured(_)
        ));
        assert!(matches!(
            map_relay_error("The model is not available: x".into()),
            ProviderError::ModelUnavailable(_)
        ));
        assert!(matches!(
            map_relay_error("Fireworks API error: Bad Gateway".into()),
            ProviderError::Upstream(_)
        ));
    }

    #[test]
    fn upstream_error_preserves_message_verbatim() {
        let err = map_relay_error("Fireworks API error: Bad Gateway".into());
        assert_eq!(err.to_string(), "Fireworks API error: Bad Gateway");
    }
}
