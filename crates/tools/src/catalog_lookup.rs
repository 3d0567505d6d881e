//! Catalog lookup tools.
//!
//! Four read-only views over the shared component catalog: list persona
//! terms, fetch one persona's full record, and the same pair for tasks.
//! Detail lookups match the term case-insensitively; a miss comes back as an
//! error string so the loop can still form an observation.

use async_trait::async_trait;
use promptforge_core::catalog::Catalog;
use promptforge_core::tool::AgentTool;
use serde_json::{json, Value};
use tracing::debug;

pub struct ListAvailablePersonas;

#[async_trait]
impl AgentTool for ListAvailablePersonas {
    fn name(&self) -> &str {
        "listAvailablePersonas"
    }

    fn description(&self) -> &str {
        "List the terms of all available personas."
    }

    async fn execute(&self, catalog: &Catalog, _args: &[String]) -> Value {
        debug!("Listing available personas");
        json!(catalog.persona_terms())
    }
}

pub struct GetPersonaDetails;

#[async_trait]
impl AgentTool for GetPersonaDetails {
    fn name(&self) -> &str {
        "getPersonaDetails"
    }

    fn description(&self) -> &str {
        "Get the full record (including the content fragment) for one persona."
    }

    async fn execute(&self, catalog: &Catalog, args: &[String]) -> Value {
        let term = args.first().map(String::as_str).unwrap_or("");
        debug!(term, "Getting persona details");
        match catalog.persona(term) {
            Some(persona) => json!(persona),
            None => Value::String(format!("Error: Persona named '{term}' was not found.")),
        }
    }
}

pub struct ListAvailableTasks;

#[async_trait]
impl AgentTool for ListAvailableTasks {
    fn name(&self) -> &str {
        "listAvailableTasks"
    }

    fn description(&self) -> &str {
        "List the terms of all available tasks."
    }

    async fn execute(&self, catalog: &Catalog, _args: &[String]) -> Value {
        debug!("Listing available tasks");
        json!(catalog.task_terms())
    }
}

pub struct GetTaskDetails;

#[async_trait]
impl AgentTool for GetTaskDetails {
    fn name(&self) -> &str {
        "getTaskDetails"
    }

    fn description(&self) -> &str {
        "Get the full record for one task."
    }

    async fn execute(&self, catalog: &Catalog, args: &[String]) -> Value {
        let term = args.first().map(String::as_str).unwrap_or("");
        debug!(term, "Getting task details");
        match catalog.task(term) {
            Some(task) => json!(task),
            None => Value::String(format!("Error: Task named '{term}' was not found.")),
        }
    }
}
