//! LLM provider implementations for Promptforge.
//!
//! All providers implement the `promptforge_core::Provider` trait. The
//! OpenAI-compatible client talks to Fireworks (or Groq) directly; the relay
//! client talks to a running Promptforge gateway and decodes its event
//! stream back into chunks.

pub mod model_utils;
pub mod openai_compat;
pub mod relay;
pub mod suggest;

pub use model_utils::{best_helper_model, model_size, select_smallest_instruct, NO_INSTRUCT_MODELS};
pub use openai_compat::OpenAiCompatProvider;
pub use relay::RelayClient;
pub use suggest::{suggest_goals, suggest_topics};
