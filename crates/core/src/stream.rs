//! The relay's wire envelope and its incremental decoder.
//!
//! The relay frames every application event as one SSE frame:
//! `data: {"type": ..., "payload": {...}}\n\n`. Three event types exist:
//! - `thought_chunk` — one text increment (never cumulative)
//! - `stream_end`    — exactly one per successful stream
//! - `error`         — exactly one, terminal
//!
//! `SseDecoder` is the client half: push raw bytes in, get ordered events
//! out. Lines split across chunk boundaries are buffered until complete, so
//! an envelope is never dropped no matter where the transport fragments it.

use serde::{Deserialize, Serialize};
use tracing::trace;

/// Message text carried by the final `stream_end` event.
pub const STREAM_END_MESSAGE: &str = "AI has finished generating its thought.";

/// One normalized application event on the relay stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Partial thought text from the model.
    ThoughtChunk { payload: ChunkPayload },

    /// The upstream stream finished normally.
    StreamEnd { payload: EndPayload },

    /// Terminal failure; no further events follow.
    Error { payload: ErrorPayload },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkPayload {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndPayload {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
}

impl StreamEvent {
    /// A `thought_chunk` carrying one text increment.
    pub fn chunk(text: impl Into<String>) -> Self {
        Self::ThoughtChunk {
            payload: ChunkPayload { text: text.into() },
        }
    }

    /// The single end-of-stream event.
    pub fn end() -> Self {
        Self::StreamEnd {
            payload: EndPayload {
                message: STREAM_END_MESSAGE.into(),
            },
        }
    }

    /// A terminal error event.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            payload: ErrorPayload {
                message: message.into(),
            },
        }
    }

    /// Wire name for this event type.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ThoughtChunk { .. } => "thought_chunk",
            Self::StreamEnd { .. } => "stream_end",
            Self::Error { .. } => "error",
        }
    }

    /// True for `stream_end` and `error` — the events that end a stream.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::ThoughtChunk { .. })
    }
}

/// Incremental decoder for `data: <json>` SSE frames.
///
/// Feed it byte chunks exactly as they arrive off the wire; it returns every
/// event whose frame completed within that chunk, in order. The internal
/// buffer holds raw bytes, so splits inside a multi-byte character are as
/// safe as splits between frames.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one transport chunk; returns the events completed by it.
    ///
    /// Blank lines and `:` comment lines are skipped, as are `data:` lines
    /// that do not parse as an envelope. A partial trailing line stays
    /// buffered for the next call.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<StreamEvent> {
        self.buffer.extend_from_slice(bytes);

        let mut events = Vec::new();
        while let Some(line_end) = self.buffer.iter().position(|&b| b == b'\n') {
            let line_bytes: Vec<u8> = self.buffer.drain(..=line_end).collect();
            let line = String::from_utf8_lossy(&line_bytes[..line_end]);
            let line = line.trim_end_matches('\r');

            // Skip empty lines and SSE comments
            if line.is_empty() || line.starts_with(':') {
                continue;
            }

            let Some(data) = line.strip_prefix("data:") else {
                continue;
            };
            let data = data.trim();

            match serde_json::from_str::<StreamEvent>(data) {
                Ok(event) => events.push(event),
                Err(e) => {
                    trace!(data = %data, error = %e, "Ignoring unparseable SSE frame");
                }
            }
        }
        events
    }

    /// Bytes still waiting for a line terminator.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}
