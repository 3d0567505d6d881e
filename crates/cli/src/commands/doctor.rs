//! `promptforge doctor` — Diagnose configuration and connectivity.

use promptforge_config::AppConfig;
use promptforge_core::provider::Provider;
use promptforge_providers::OpenAiCompatProvider;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Promptforge Doctor — System Diagnostics");
    println!("==========================================\n");

    let mut issues = 0;

    // Check config file
    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("  ✅ Config file found: {}", config_path.display());
    } else {
        println!("  ⚠️  No config file — run `promptforge onboard` (env overrides still apply)");
        issues += 1;
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Configuration valid");
            config
        }
        Err(e) => {
            println!("  ❌ Configuration invalid: {e}");
            println!();
            println!("  ⚠️  {} issue(s) found. See above for details.", issues + 1);
            return Ok(());
        }
    };

    // Check API key
    if config.provider.api_key.is_some() {
        println!(
            "  ✅ API key configured for {}",
            config.provider.display_name()
        );
    } else {
        println!("  ⚠️  No API key — set FIREWORKS_API_KEY or add api_key to config.toml");
        issues += 1;
    }

    // Check default model
    match &config.provider.default_model {
        Some(model) => println!("  ✅ Default model: {model}"),
        None => {
            println!("  ⚠️  No default model — `promptforge generate` will need --model");
            issues += 1;
        }
    }

    // Check upstream reachability (only possible with a key)
    if config.provider.api_key.is_some() {
        match OpenAiCompatProvider::from_config(&config.provider) {
            Ok(provider) => match provider.health_check().await {
                Ok(true) => println!("  ✅ Provider reachable: {}", config.provider.base_url),
                Ok(false) => {
                    println!(
                        "  ❌ Provider rejected the health probe: {}",
                        config.provider.base_url
                    );
                    issues += 1;
                }
                Err(e) => {
                    println!("  ❌ Provider unreachable: {e}");
                    issues += 1;
                }
            },
            Err(e) => {
                println!("  ❌ Provider setup failed: {e}");
                issues += 1;
            }
        }
    }

    // Summary
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
