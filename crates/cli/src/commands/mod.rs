pub mod doctor;
pub mod generate;
pub mod models;
pub mod onboard;
pub mod refine;
pub mod serve;

use std::sync::Arc;

use promptforge_config::AppConfig;
use promptforge_core::provider::Provider;
use promptforge_providers::{OpenAiCompatProvider, RelayClient};

/// Build the provider the command should talk to: a relay client when
/// `--relay-url` was given, otherwise the configured inference API.
///
/// Going direct requires an API key; the error spells out how to set one.
pub(crate) fn build_provider(
    config: &AppConfig,
    relay_url: Option<String>,
) -> Result<Arc<dyn Provider>, Box<dyn std::error::Error>> {
    if let Some(url) = relay_url {
        return Ok(Arc::new(RelayClient::new(url)));
    }

    if config.provider.api_key.is_none() {
        eprintln!();
        eprintln!("  ❌ No API key configured.");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    export FIREWORKS_API_KEY=fw-...");
        eprintln!("    export GROQ_API_KEY=gsk_...");
        eprintln!();
        eprintln!("  Or add it to {}:", config_path_display());
        eprintln!("    [provider]");
        eprintln!("    api_key = \"fw-...\"");
        eprintln!();
        return Err("No API key found. Set FIREWORKS_API_KEY or add api_key to your config.".into());
    }

    let provider = OpenAiCompatProvider::from_config(&config.provider)?;
    Ok(Arc::new(provider))
}

/// Pick the model to run with: explicit flag, then the configured default.
pub(crate) fn resolve_model(
    config: &AppConfig,
    flag: Option<String>,
) -> Result<String, Box<dyn std::error::Error>> {
    flag.or_else(|| config.provider.default_model.clone())
        .ok_or_else(|| {
            "No model selected. Pass --model or set provider.default_model \
             (run `promptforge models` to see what is available)."
                .into()
        })
}

pub(crate) fn config_path_display() -> String {
    AppConfig::config_dir().join("config.toml").display().to_string()
}
