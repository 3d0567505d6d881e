//! Model selection helpers.
//!
//! The suggestion endpoints never hardcode a model id. They fetch the
//! provider's live model list and pick the smallest instruction-tuned model,
//! so lightweight helper calls land on a cheap model that is actually
//! deployed right now.

use promptforge_core::error::ProviderError;
use promptforge_core::provider::Provider;
use tracing::debug;

/// Surfaced when the provider serves no instruction-tuned models at all.
pub const NO_INSTRUCT_MODELS: &str =
    "No suitable 'instruct' models are currently available from the provider.";

/// Parameter size in billions parsed from a model id, e.g. `8` from
/// `llama-v3p1-8b-instruct`. The first digit run immediately followed by a
/// lowercase `b` wins. `None` when the id carries no size marker.
pub fn model_size(model_id: &str) -> Option<u32> {
    let bytes = model_id.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_digit() {
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if i < bytes.len() && bytes[i] == b'b' {
                return model_id[start..i].parse().ok();
            }
        } else {
            i += 1;
        }
    }
    None
}

/// The smallest instruction-tuned model in the list, or `None` when there is
/// no instruct model to pick. Ids without a size marker sort last; ties keep
/// the provider's order.
pub fn select_smallest_instruct(models: &[String]) -> Option<&str> {
    let mut candidates: Vec<&String> = models
        .iter()
        .filter(|id| id.contains("instruct"))
        .collect();
    candidates.sort_by_key(|id| model_size(id).unwrap_or(u32::MAX));
    candidates.first().map(|id| id.as_str())
}

/// Fetch the provider's model list and pick the helper model for suggestion
/// calls.
pub async fn best_helper_model(provider: &dyn Provider) -> Result<String, ProviderError> {
    let models = provider.list_models().await?;
    match select_smallest_instruct(&models) {
        Some(id) => {
            debug!(model = %id, "Selected helper model");
            Ok(id.to_string())
        }
        None => Err(ProviderError::ModelUnavailable(NO_INSTRUCT_MODELS.into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_size_from_model_id() {
        assert_eq!(model_size("llama-v3p1-8b-instruct"), Some(8));
        assert_eq!(model_size("accounts/fireworks/models/llama-v3-70b"), Some(70));
        assert_eq!(model_size("mixtral-8x7b-instruct"), Some(7));
    }

    #[test]
    fn size_requires_lowercase_b_suffix() {
        assert_eq!(model_size("gpt-4"), None);
        assert_eq!(model_size("llama-8B-instruct"), None);
        assert_eq!(model_size("qwen-2p5"), None);
    }

    #[test]
    fn picks_smallest_instruct_model() {
        let models = vec![
            "llama-v3-70b-instruct".to_string(),
            "llama-v3p1-8b-instruct".to_string(),
            "stable-diffusion-xl".to_string(),
            "mixtral-8x22b-instruct".to_string(),
        ];
        assert_eq!(
            select_smallest_instruct(&models),
            Some("llama-v3p1-8b-instruct")
        );
    }

    #[test]
    fn unsized_instruct_models_sort_last() {
        let models = vec![
            "custom-instruct".to_string(),
            "llama-v3-70b-instruct".to_string(),
        ];
        assert_eq!(
            select_smallest_instruct(&models),
            Some("llama-v3-70b-instruct")
        );
    }

    #[test]
    fn none_when_no_instruct_models() {
        let models = vec!["stable-diffusion-xl".to_string()];
        assert_eq!(select_smallest_instruct(&models), None);
        assert_eq!(select_smallest_instruct(&[]), None);
    }
}
