//! The agent tool trait and registry.
//!
//! Tools are what the model can ask for mid-loop: look up catalog records,
//! search the web, suggest goals. A tool takes the shared read-only
//! [`Catalog`] plus positional string arguments (already trimmed and
//! quote-stripped by the action parser) and always produces a JSON value —
//! failures are encoded as a descriptive `"Error: ..."` string value, so the
//! loop can always form an observation message. The only way a dispatch can
//! fail is an unknown tool name.

use crate::catalog::Catalog;
use crate::error::ToolError;
use async_trait::async_trait;
use std::collections::HashMap;

/// A callable capability exposed to the model.
#[async_trait]
pub trait AgentTool: Send + Sync {
    /// The name the model must use in its `Action:` line, e.g. `searchTheWeb`.
    fn name(&self) -> &str;

    /// One-line description, listed for the model and in diagnostics.
    fn description(&self) -> &str;

    /// Run the tool. Must not fail: errors come back as a JSON string value.
    async fn execute(&self, catalog: &Catalog, args: &[String]) -> serde_json::Value;
}

/// A registry of available tools, keyed by exact name.
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn AgentTool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: Box<dyn AgentTool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn AgentTool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// Execute a tool by name. Unknown names are the registry's only error.
    pub async fn execute(
        &self,
        catalog: &Catalog,
        name: &str,
        args: &[String],
    ) -> Result<serde_json::Value, ToolError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        Ok(tool.execute(catalog, args).await)
    }

    /// All registered tool names, sorted for stable output.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// `name — description` lines for diagnostics and seed prompts.
    pub fn descriptions(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .tools
            .values()
            .map(|t| format!("{} — {}", t.name(), t.description()))
            .collect();
        lines.sort_unstable();
        lines
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
