//! Engine error types.

use promptforge_core::error::ProviderError;
use thiserror::Error;

/// Terminal parse failure on the main loop's final answer.
pub const MALFORMED_RESPONSE: &str = "The AI returned a malformed JSON response.";

/// Terminal parse failure on a refinement run's final answer.
pub const MALFORMED_REFINEMENT: &str = "The AI returned a malformed refinement response.";

/// The recoverable model-offline case. Callers show this and re-prompt model
/// selection instead of restarting the whole run.
pub const MODEL_UNAVAILABLE: &str =
    "The selected model is not available or is currently offline. Please choose a different one.";

#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The final thought was not a JSON array of prompt records. Fatal for
    /// the run; never retried, no partial salvage.
    #[error("{}", MALFORMED_RESPONSE)]
    MalformedResponse,

    /// The refinement output was not a single record (or one-element array).
    #[error("{}", MALFORMED_REFINEMENT)]
    MalformedRefinement,

    /// The requested model is gone or offline. Distinct from other provider
    /// failures so callers can offer a model switch.
    #[error("{}", MODEL_UNAVAILABLE)]
    ModelUnavailable,

    #[error("Generation exceeded the maximum of {limit} iterations")]
    IterationLimit { limit: usize },
}

impl AgentError {
    /// Whether choosing another model could make this run succeed.
    pub fn is_model_unavailable(&self) -> bool {
        matches!(self, AgentError::ModelUnavailable)
    }
}

/// Map a provider failure onto the engine's error taxonomy.
///
/// The model-offline case is detected by phrasing: both direct providers and
/// the relay word it starting with "The model", and that exact substring is
/// the documented contract.
pub fn classify_provider_error(err: ProviderError) -> AgentError {
    if err.to_string().contains("The model") {
        AgentError::ModelUnavailable
    } else {
        AgentError::Provider(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_response_has_fixed_message() {
        assert_eq!(
            AgentError::MalformedResponse.to_string(),
            "The AI returned a malformed JSON response."
        );
    }

    #[test]
    fn model_unavailable_message_asks_for_another_model() {
        let err = AgentError::ModelUnavailable;
        assert!(err.is_model_unavailable());
        assert!(err.to_string().contains("choose a different one"));
    }

    #[test]
    fn classifies_model_unavailable_by_phrasing() {
        let err = classify_provider_error(ProviderError::ModelUnavailable("llama-8b".into()));
        assert!(err.is_model_unavailable());

        let relayed = classify_provider_error(ProviderError::Upstream(
            "The model is loading, try later".into(),
        ));
        assert!(relayed.is_model_unavailable());

        let other = classify_provider_error(ProviderError::Network("refused".into()));
        assert!(!other.is_model_unavailable());
    }
}
