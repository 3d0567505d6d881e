//! The prompt generation loop — the heart of Promptforge.
//!
//! The engine follows a **Thought → Action → Observation** cycle:
//!
//! 1. **Seed** a conversation with the user's topic, goal, and personas
//! 2. **Stream** a completion from the provider into a full thought
//! 3. **If the thought names an action**: execute the tool, append the
//!    thought and an `Observation:` message, loop back to step 2
//! 4. **If it does not**: parse the thought as the final JSON answer
//!
//! The loop runs until a thought carries no `Action:` marker or the
//! iteration limit is reached. Every run owns its history; nothing is shared
//! between conversations.

pub mod action;
pub mod engine;
pub mod error;
pub mod events;
pub mod session;

pub use action::{parse_action, parse_records, parse_refined, strip_code_fences, ActionCall};
pub use engine::PromptEngine;
pub use error::{
    classify_provider_error, AgentError, MALFORMED_REFINEMENT, MALFORMED_RESPONSE,
    MODEL_UNAVAILABLE,
};
pub use events::EngineEvent;
pub use session::{PersonaRunState, PromptSession};
