//! `promptforge generate` — Run the generation loop from the terminal.
//!
//! Streams loop progress as it happens (thoughts, tool calls, observations)
//! and prints the generated records when the loop completes.

use std::sync::Arc;
use std::time::Duration;

use promptforge_agent::{EngineEvent, PromptEngine, MODEL_UNAVAILABLE};
use promptforge_config::AppConfig;
use promptforge_core::catalog::Catalog;
use promptforge_core::record::GeneratedPromptRecord;
use promptforge_tools::default_registry;

use crate::GenerateArgs;

pub async fn run(args: GenerateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let provider = super::build_provider(&config, args.relay_url)?;
    let model = super::resolve_model(&config, args.model)?;

    let catalog = Arc::new(Catalog::seed());
    let tools = Arc::new(default_registry(Duration::from_secs(
        config.agent.search_timeout_secs,
    )));

    let engine = PromptEngine::new(provider, tools, catalog, model).tuned(&config);

    println!("✨ Generating prompts with {}", engine.model());
    println!("   Topic: {}", args.topic);
    println!("   Goal:  {}", args.goal);
    if !args.personas.is_empty() {
        println!("   Personas: {}", args.personas.join(", "));
    }
    println!();

    let mut events = engine.generate_stream(args.topic, args.goal, args.personas);

    while let Some(event) = events.recv().await {
        match event {
            EngineEvent::Thought { text } => {
                println!("💭 {}", first_line(&text));
            }
            EngineEvent::ActionStarted { tool, args } => {
                println!("⚙️  {}({})", tool, args.join(", "));
            }
            EngineEvent::Observation { content } => {
                println!("   ↳ {}", truncate(&content, 120));
            }
            EngineEvent::Complete { records } => {
                print_records(&records);
                return Ok(());
            }
            EngineEvent::Error { message } => {
                if message == MODEL_UNAVAILABLE {
                    eprintln!();
                    eprintln!("❌ {message}");
                    eprintln!("   Run `promptforge models` and retry with --model.");
                    eprintln!();
                    return Err("model unavailable".into());
                }
                return Err(format!("A critical error occurred: {message}").into());
            }
        }
    }

    Err("The generation stream closed without a result.".into())
}

fn print_records(records: &[GeneratedPromptRecord]) {
    println!();
    println!("🎉 Generated {} prompt(s)", records.len());
    for record in records {
        println!();
        println!("── {} · {}", record.title, record.persona_used);
        println!("{}", record.prompt);
    }
    println!();
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or(text)
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{cut}…")
    }
}
