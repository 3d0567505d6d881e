//! `promptforge models` — List model ids offered by the provider.

use promptforge_config::AppConfig;
use promptforge_providers::{select_smallest_instruct, NO_INSTRUCT_MODELS};

pub async fn run(relay_url: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let provider = super::build_provider(&config, relay_url)?;

    let models = provider
        .list_models()
        .await
        .map_err(|e| format!("Failed to fetch models from the provider. {e}"))?;

    println!("🤖 Models offered by {}", provider.name());
    println!();

    if models.is_empty() {
        println!("   (none)");
        println!();
        println!("   ⚠️  {NO_INSTRUCT_MODELS}");
        println!();
        return Ok(());
    }

    let helper = select_smallest_instruct(&models);
    for model in &models {
        let default_marker = if config.provider.default_model.as_deref() == Some(model.as_str()) {
            " (default)"
        } else {
            ""
        };
        let helper_marker = if helper == Some(model.as_str()) {
            "  ← smallest instruct"
        } else {
            ""
        };
        println!("   {model}{default_marker}{helper_marker}");
    }

    if helper.is_none() {
        println!();
        println!("   ⚠️  {NO_INSTRUCT_MODELS}");
    }
    println!();

    Ok(())
}
