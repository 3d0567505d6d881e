//! # Promptforge Core
//!
//! Domain types, traits, and error definitions for the Promptforge agent
//! engine. This crate has **zero framework dependencies** — it defines the
//! domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! The agent loop, the stream relay, and the tool implementations all speak
//! the types defined here:
//! - Chat history is a flat `{role, content}` sequence (`ChatMessage`)
//! - Model backends implement `Provider`; the loop only sees the trait
//! - The relay's wire format is the tagged `StreamEvent` envelope, decoded
//!   incrementally by `SseDecoder`
//! - Tools implement `AgentTool` against a shared read-only `Catalog`
//! - The loop's terminal output is `GeneratedPromptRecord`

pub mod catalog;
pub mod error;
pub mod message;
pub mod provider;
pub mod record;
pub mod stream;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use catalog::{Catalog, ComponentKind, PromptComponent};
pub use error::{Error, ProviderError, Result, ToolError};
pub use message::{ChatMessage, ChatRole};
pub use provider::{Provider, ProviderRequest, ProviderResponse, StreamChunk};
pub use record::{GeneratedPromptRecord, SearchResult};
pub use stream::{SseDecoder, StreamEvent};
pub use tool::{AgentTool, ToolRegistry};
