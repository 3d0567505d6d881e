//! Built-in tool implementations for Promptforge.
//!
//! Tools are the actions the model can request mid-loop: list and inspect
//! catalog personas and tasks, search the web for live context, and suggest
//! goals for a topic. All of them take the shared read-only catalog plus
//! positional string arguments and always answer with a JSON observation.

use std::time::Duration;

pub mod catalog_lookup;
pub mod suggest_goals;
pub mod web_search;

use promptforge_core::tool::ToolRegistry;

pub use web_search::{search_client, search_duckduckgo, SearchError};

/// Create the default tool registry with all built-in tools.
///
/// `search_timeout` bounds the web search only; catalog tools are local and
/// synchronous.
pub fn default_registry(search_timeout: Duration) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(catalog_lookup::ListAvailablePersonas));
    registry.register(Box::new(catalog_lookup::GetPersonaDetails));
    registry.register(Box::new(catalog_lookup::ListAvailableTasks));
    registry.register(Box::new(catalog_lookup::GetTaskDetails));
    registry.register(Box::new(web_search::SearchTheWeb::new(search_timeout)));
    registry.register(Box::new(suggest_goals::SuggestGoals));
    registry
}
