//! `promptforge refine` — Refine a previously generated prompt.

use std::sync::Arc;
use std::time::Duration;

use promptforge_agent::PromptEngine;
use promptforge_config::AppConfig;
use promptforge_core::catalog::Catalog;
use promptforge_core::record::GeneratedPromptRecord;
use promptforge_tools::default_registry;

use crate::RefineArgs;

pub async fn run(args: RefineArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let provider = super::build_provider(&config, args.relay_url)?;
    let model = super::resolve_model(&config, args.model)?;

    let catalog = Arc::new(Catalog::seed());
    let tools = Arc::new(default_registry(Duration::from_secs(
        config.agent.search_timeout_secs,
    )));

    let engine = PromptEngine::new(provider, tools, catalog, model).tuned(&config);

    let record = GeneratedPromptRecord {
        title: args.title,
        persona_used: args.persona,
        prompt: args.prompt,
    };

    println!("✨ Refining \"{}\" with {}", record.title, engine.model());
    if let Some(instruction) = &args.instruction {
        println!("   Instruction: {instruction}");
    }
    println!();

    match engine.refine(&record, args.instruction.as_deref()).await {
        Ok(refined) => {
            println!("── {} · {}", refined.title, refined.persona_used);
            println!("{}", refined.prompt);
            println!();
            Ok(())
        }
        Err(e) if e.is_model_unavailable() => {
            eprintln!("❌ {e}");
            eprintln!("   Run `promptforge models` and retry with --model.");
            eprintln!();
            Err("model unavailable".into())
        }
        Err(e) => Err(format!("A critical error occurred: {e}").into()),
    }
}
