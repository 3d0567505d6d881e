//! Error types for the Promptforge domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all Promptforge operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Tool errors ---
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Recoverable by picking another model; callers match on this variant
    /// to re-prompt model selection instead of restarting the whole run.
    #[error("The model is not available: {0}")]
    ModelUnavailable(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Stream interrupted: {0}")]
    StreamInterrupted(String),

    #[error("Network error: {0}")]
    Network(String),

    /// An error event reported in-band by a relay stream. Carries the relay's
    /// message verbatim.
    #[error("{0}")]
    Upstream(String),
}

#[derive(Debug, Clone, Error)]
pub enum ToolError {
    /// The only dispatch failure: tools themselves never fail the call, they
    /// return `"Error: ..."` string values instead.
    #[error("Tool not found: {0}")]
    NotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = Error::Provider(ProviderError::ApiError {
            status_code: 503,
            message: "Service Unavailable".into(),
        });
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("Service Unavailable"));
    }

    #[test]
    fn model_unavailable_mentions_the_model() {
        // Callers detect the recoverable case by this phrasing.
        let err = ProviderError::ModelUnavailable("accounts/fireworks/llama-8b".into());
        assert!(err.to_string().starts_with("The model"));
    }

    #[test]
    fn tool_error_displays_name() {
        let err = Error::Tool(ToolError::NotFound("doesNotExist".into()));
        assert!(err.to_string().contains("doesNotExist"));
    }
}
