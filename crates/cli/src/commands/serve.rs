//! `promptforge serve` — Start the HTTP gateway server.

use promptforge_config::AppConfig;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.server.port = port;
    }

    println!("🔥 Promptforge Gateway");
    println!("   Listening: {}:{}", config.server.host, config.server.port);
    println!("   Provider:  {}", config.provider.display_name());
    if config.provider.api_key.is_none() {
        println!("   ⚠️  No API key configured — /api/generate will report this per request");
    }

    promptforge_gateway::start(config).await?;

    Ok(())
}
