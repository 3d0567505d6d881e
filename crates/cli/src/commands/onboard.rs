//! `promptforge onboard` — First-time setup.

use promptforge_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    println!("🔥 Promptforge — First-Time Setup");
    println!("=================================\n");

    // Create the config directory
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    // Create config file
    if config_path.exists() {
        println!("\n⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
    } else {
        let default_toml = AppConfig::default_toml();
        std::fs::write(&config_path, &default_toml)?;
        println!("✅ Created config.toml at: {}", config_path.display());
        println!("\n📝 Next steps:");
        println!("   1. Set an API key: export FIREWORKS_API_KEY=fw-... (or edit the config)");
        println!("   2. Run: promptforge models");
        println!("   3. Run: promptforge generate --topic \"...\" --goal \"...\"\n");
    }

    println!("🎉 Setup complete! Run `promptforge doctor` to verify.\n");

    Ok(())
}
