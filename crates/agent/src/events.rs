//! Progress events emitted while a generation run executes.
//!
//! Consumers (the CLI, a gateway endpoint) subscribe to a channel of these to
//! render live progress. Exactly one terminal event (`Complete` or `Error`)
//! closes every run.

use promptforge_core::record::GeneratedPromptRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    /// A completed model thought for one loop iteration.
    Thought { text: String },

    /// The loop is about to execute a tool.
    ActionStarted { tool: String, args: Vec<String> },

    /// Result of a tool call, exactly as appended to the history.
    Observation { content: String },

    /// Terminal: the run produced its prompt records.
    Complete { records: Vec<GeneratedPromptRecord> },

    /// Terminal: the run failed.
    Error { message: String },
}

impl EngineEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            EngineEvent::Thought { .. } => "thought",
            EngineEvent::ActionStarted { .. } => "action_started",
            EngineEvent::Observation { .. } => "observation",
            EngineEvent::Complete { .. } => "complete",
            EngineEvent::Error { .. } => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, EngineEvent::Complete { .. } | EngineEvent::Error { .. })
    }
}
